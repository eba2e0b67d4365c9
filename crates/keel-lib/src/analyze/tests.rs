use indoc::indoc;

use crate::diagnostics::Diagnostics;
use crate::grammar::parse_module;
use crate::types::Registry;

fn validate(source: &str) -> Diagnostics {
    parse_module("test", source).validate(&Registry::new())
}

fn messages(diagnostics: &Diagnostics) -> Vec<String> {
    diagnostics.iter().map(|d| d.message.clone()).collect()
}

fn registry_with_other() -> Registry {
    let mut registry = Registry::new();
    registry
        .load_signatures(
            r#"[{
                "name": "other",
                "functions": {
                    "f": {
                        "isAsync": false,
                        "parameters": [{"name": "x", "type": {"kind": "builtin", "name": "int"}}],
                        "returnType": {"kind": "builtin", "name": "bool"}
                    }
                }
            }]"#,
        )
        .expect("signature table parses");
    registry
}

#[test]
fn forward_references_resolve() {
    let diagnostics = validate(indoc! {"
        sync fn a() -> Unit = { b() }
        sync fn b() -> Unit = { }
    "});
    assert!(diagnostics.is_empty(), "{:?}", messages(&diagnostics));
}

#[test]
fn mutual_recursion_resolves() {
    let diagnostics = validate(indoc! {"
        sync fn even(n : int) -> bool = if (n == 0) true else odd(n - 1)
        sync fn odd(n : int) -> bool = if (n == 0) false else even(n - 1)
    "});
    assert!(diagnostics.is_empty(), "{:?}", messages(&diagnostics));
}

#[test]
fn duplicate_function_reports_once_per_extra_occurrence() {
    let diagnostics = validate(indoc! {"
        sync fn dup() -> int = 1
        sync fn dup() -> int = 2
    "});
    let duplicates: Vec<&str> = diagnostics
        .iter()
        .filter(|d| d.message.contains("duplicate"))
        .map(|d| d.message.as_str())
        .collect();
    assert_eq!(duplicates, vec!["duplicate function `dup`"]);
}

#[test]
fn undefined_references_are_soft_errors() {
    let diagnostics = validate(indoc! {"
        sync fn a() -> Unit = { missing() }
        sync fn b() -> int = 1
    "});
    assert_eq!(messages(&diagnostics), vec!["undefined function `missing`"]);
}

#[test]
fn cross_module_call_resolves_to_bool() {
    let module = parse_module("test", "sync fn g() -> bool = other::f(1)");
    let diagnostics = module.validate(&registry_with_other());
    assert!(diagnostics.is_empty(), "{:?}", messages(&diagnostics));
}

#[test]
fn cross_module_argument_mismatch_is_one_diagnostic() {
    let module = parse_module("test", r#"sync fn g() -> bool = other::f("x")"#);
    let diagnostics = module.validate(&registry_with_other());
    assert_eq!(
        messages(&diagnostics),
        vec!["type mismatch: expected int, found string"]
    );
}

#[test]
fn unknown_module_is_reported() {
    let diagnostics = validate("sync fn g() -> Unit = { nowhere::f() }");
    assert_eq!(messages(&diagnostics), vec!["undefined module `nowhere`"]);
}

#[test]
fn constant_declared_type_is_enforced() {
    let diagnostics = validate(r#"const X : int = "s""#);
    assert_eq!(
        messages(&diagnostics),
        vec!["type mismatch: expected int, found string"]
    );
}

#[test]
fn int_widens_to_float() {
    let diagnostics = validate("const X : float = 1");
    assert!(diagnostics.is_empty(), "{:?}", messages(&diagnostics));
}

#[test]
fn assignment_to_immutable_binding() {
    let diagnostics = validate(indoc! {"
        sync fn f() -> Unit = {
            const x = 1
            x = 2
        }
    "});
    assert_eq!(messages(&diagnostics), vec!["cannot assign to immutable `x`"]);
}

#[test]
fn let_bindings_are_mutable() {
    let diagnostics = validate(indoc! {"
        sync fn f() -> int = {
            let x = 1
            x += 2
            x
        }
    "});
    assert!(diagnostics.is_empty(), "{:?}", messages(&diagnostics));
}

#[test]
fn condition_must_be_bool() {
    let diagnostics = validate("sync fn f() -> Unit = { if (1) { } }");
    assert_eq!(messages(&diagnostics), vec!["condition must be bool, found int"]);
}

#[test]
fn break_outside_loop() {
    let diagnostics = validate("sync fn f() -> Unit = { break }");
    assert_eq!(messages(&diagnostics), vec!["`break` outside of a loop"]);
}

#[test]
fn for_over_range_binds_int() {
    let diagnostics = validate(indoc! {"
        sync fn sum() -> int = {
            let total = 0
            for (i in 0..10) total += i
            total
        }
    "});
    assert!(diagnostics.is_empty(), "{:?}", messages(&diagnostics));
}

#[test]
fn return_type_is_checked() {
    let diagnostics = validate(r#"sync fn f() -> int = { return "s" }"#);
    assert_eq!(
        messages(&diagnostics),
        vec!["type mismatch: expected int, found string"]
    );
}

#[test]
fn local_type_with_impl_methods() {
    let diagnostics = validate(indoc! {"
        type Counter = (count : int)

        impl Counter {
            sync fn bump(self) -> int = self.count + 1
        }

        sync fn use_it(c : Counter) -> int = c.bump()
    "});
    assert!(diagnostics.is_empty(), "{:?}", messages(&diagnostics));
}

#[test]
fn unknown_field_on_record_type() {
    let diagnostics = validate(indoc! {"
        type Counter = (count : int)

        sync fn f(c : Counter) -> int = c.missing
    "});
    assert_eq!(
        messages(&diagnostics),
        vec!["type (count : int) has no field `missing`"]
    );
}

#[test]
fn type_aliases_realize_through_declarations() {
    let diagnostics = validate(indoc! {"
        type Meters = float

        const ALTITUDE : Meters = 120.5
    "});
    assert!(diagnostics.is_empty(), "{:?}", messages(&diagnostics));
}

#[test]
fn unresolved_type_reference_in_declaration() {
    let diagnostics = validate("const X : Missing = 1");
    assert_eq!(messages(&diagnostics), vec!["undefined type `Missing`"]);
}

#[test]
fn parse_errors_surface_through_validation() {
    let diagnostics = validate("sync fn f() -> int = { 1 + ; 3 }");
    assert!(diagnostics.iter().any(|d| d.message.contains("expected")));
}

#[test]
fn diagnostics_accumulate_across_items() {
    let diagnostics = validate(indoc! {r#"
        const A : int = "one"
        const B : int = "two"
    "#});
    assert_eq!(diagnostics.len(), 2);
}

#[test]
fn diagnostics_are_ordered_by_position() {
    let diagnostics = validate(indoc! {r#"
        const A : int = "one"
        const B : int = "two"
    "#});
    let offsets: Vec<usize> = diagnostics.iter().map(|d| d.span.start.offset).collect();
    let mut sorted = offsets.clone();
    sorted.sort_unstable();
    assert_eq!(offsets, sorted);
}

#[test]
fn calls_through_function_typed_bindings() {
    let diagnostics = validate(indoc! {"
        sync fn apply() -> int = {
            let add = fn (a : int, b : int) -> a + b
            add(1, 2)
        }
    "});
    assert!(diagnostics.is_empty(), "{:?}", messages(&diagnostics));
}
