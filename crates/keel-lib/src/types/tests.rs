use crate::grammar::parse_module;

use super::{
    resolve_type_ref, FunctionType, FunctionTypeParameter, Module, ModuleSignature, Registry, Type,
    TypeRefData,
};

fn parameter(name: &str, ty: Type) -> FunctionTypeParameter {
    FunctionTypeParameter {
        name: name.to_string(),
        ty,
        has_default: false,
    }
}

fn function(is_async: bool, parameters: Vec<FunctionTypeParameter>, return_type: Type) -> Type {
    Type::Function(Box::new(FunctionType {
        is_async,
        parameters,
        return_type,
        description: String::new(),
    }))
}

#[test]
fn display_names_are_deterministic() {
    let sync_fn = function(
        false,
        vec![parameter("a", Type::Int), parameter("b", Type::Float)],
        Type::Bool,
    );
    insta::assert_snapshot!(sync_fn.display_name(), @"sync fn(int, float) -> bool");

    let async_fn = function(true, vec![], Type::Unit);
    insta::assert_snapshot!(async_fn.display_name(), @"fn() -> Unit");

    insta::assert_snapshot!(Type::Array(Box::new(Type::Int)).display_name(), @"int[]");
    insta::assert_snapshot!(
        Type::Record(vec![("x".into(), Type::Float)]).display_name(),
        @"(x : float)"
    );

    let nested = Type::Tuple(vec![
        Type::Reference {
            module: Some("nav".into()),
            name: "Orbit".into(),
            type_args: vec![Type::Float],
        },
        Type::Union(vec![Type::Int, Type::String]),
    ]);
    insta::assert_snapshot!(nested.display_name(), @"(nav::Orbit<float>, int | string)");
}

#[test]
fn function_assignability_compares_rendered_signatures() {
    // Same shapes with different parameter names render identically and are
    // therefore interchangeable — the rendering ignores parameter names.
    let a = function(false, vec![parameter("x", Type::Int)], Type::Bool);
    let b = function(false, vec![parameter("y", Type::Int)], Type::Bool);
    assert!(a.is_assignable_from(&b));

    // A differing async marker or return type renders differently.
    let async_variant = function(true, vec![parameter("x", Type::Int)], Type::Bool);
    assert!(!a.is_assignable_from(&async_variant));

    let other_return = function(false, vec![parameter("x", Type::Int)], Type::Int);
    assert!(!a.is_assignable_from(&other_return));
}

#[test]
fn int_widens_to_float_but_not_back() {
    assert!(Type::Float.is_assignable_from(&Type::Int));
    assert!(!Type::Int.is_assignable_from(&Type::Float));
}

#[test]
fn unknown_is_assignable_both_ways() {
    assert!(Type::Unknown.is_assignable_from(&Type::String));
    assert!(Type::String.is_assignable_from(&Type::Unknown));
}

#[test]
fn record_assignability_is_structural_by_field_name() {
    let target = Type::Record(vec![("x".into(), Type::Float)]);
    let wider = Type::Record(vec![("x".into(), Type::Float), ("y".into(), Type::Float)]);
    assert!(target.is_assignable_from(&wider));
    assert!(!wider.is_assignable_from(&target));
}

#[test]
fn union_accepts_any_member() {
    let number = Type::Union(vec![Type::Int, Type::Float]);
    assert!(number.is_assignable_from(&Type::Int));
    assert!(number.is_assignable_from(&Type::Float));
    assert!(!number.is_assignable_from(&Type::String));
}

#[test]
fn type_ref_resolution_degrades_to_unknown() {
    let known = TypeRefData::Builtin {
        name: "int".to_string(),
    };
    assert_eq!(resolve_type_ref(&known), Type::Int);

    let bogus = TypeRefData::Builtin {
        name: "quaternion".to_string(),
    };
    assert_eq!(resolve_type_ref(&bogus), Type::Unknown);
}

const SIGNATURES: &str = r#"[{
    "name": "telemetry",
    "description": "Vessel telemetry feeds",
    "constants": {
        "RATE": {"type": {"kind": "builtin", "name": "float"}}
    },
    "functions": {
        "sample": {
            "isAsync": true,
            "parameters": [{"name": "channel", "type": {"kind": "builtin", "name": "string"}}],
            "returnType": {"kind": "builtin", "name": "float"}
        }
    },
    "types": {
        "Frame": {
            "fields": {"altitude": {"kind": "builtin", "name": "float"}},
            "methods": {
                "age": {"isAsync": false, "returnType": {"kind": "builtin", "name": "float"}}
            }
        }
    },
    "typeAliases": {
        "Seconds": {"kind": "builtin", "name": "float"}
    }
}]"#;

#[test]
fn referenced_module_lookups() {
    let mut registry = Registry::new();
    assert_eq!(registry.load_signatures(SIGNATURES).unwrap(), 1);

    let module = registry.find_module("telemetry").expect("module registered");
    assert_eq!(module.description(), "Vessel telemetry feeds");

    let rate = module.find_constant("RATE").expect("constant exists");
    assert_eq!(rate.value, Type::Float);
    assert!(rate.definition.is_none(), "metadata has no source definition");

    let sample = module.find_function("sample").expect("function exists");
    assert!(sample.value.is_async);
    assert_eq!(sample.value.display_name(), "fn(string) -> float");

    // Aliases resolve before direct type references.
    assert_eq!(module.find_type("Seconds"), Some(Type::Float));
    assert!(matches!(
        module.find_type("Frame"),
        Some(Type::Reference { module: Some(m), name, .. }) if m == "telemetry" && name == "Frame"
    ));

    assert_eq!(module.find_field("Frame", "altitude"), Some(Type::Float));
    let age = module.find_method("Frame", "age").expect("method exists");
    assert!(!age.is_async);
}

#[test]
fn malformed_signature_table_is_an_error() {
    let mut registry = Registry::new();
    assert!(registry.load_signatures("not json").is_err());
}

#[test]
fn source_modules_expose_the_same_surface() {
    let module = Module::Source(std::sync::Arc::new(parse_module(
        "nav",
        "pub const LIMIT : float = 1.5\npub sync fn double(x : float) -> float = x * 2.0\ntype Pair = (a : int, b : int)",
    )));

    let limit = module.find_constant("LIMIT").expect("constant");
    assert_eq!(limit.value, Type::Float);
    let definition = limit.definition.expect("source definition");
    assert_eq!(definition.module, "nav");

    let double = module.find_function("double").expect("function");
    assert_eq!(double.value.display_name(), "sync fn(float) -> float");

    assert_eq!(module.find_field("Pair", "a"), Some(Type::Int));
    assert_eq!(module.find_type("missing"), None);

    assert_eq!(module.all_constants().len(), 1);
    assert_eq!(module.all_functions().len(), 1);
    assert_eq!(module.all_types().len(), 1);
}
