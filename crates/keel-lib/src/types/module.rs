//! The uniform module abstraction and the registry that holds it.
//!
//! A [`Module`] answers the same lookup questions whether it is backed by a
//! freshly parsed AST or by externally supplied metadata; the validator never
//! cares which. The [`Registry`] maps module names to modules and is passed
//! explicitly into every validation call — there is no ambient global table.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::ast::{ImplItem, ModuleItem, ModuleNode, TypeRefNode};
use crate::parsing::Span;

use super::signature::{resolve_function, resolve_type_ref, ModuleSignature};
use super::{FunctionType, Type};

/// Where a name was declared: the owning module plus the declaration's span,
/// suitable for go-to-definition and hover.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct DefinitionRef {
    pub module: String,
    pub span: Span,
}

/// A looked-up value plus its definition site, when one exists in source.
/// Metadata-backed exports have no source definition.
#[derive(Debug, Clone)]
pub struct WithDefinition<T> {
    pub value: T,
    pub definition: Option<DefinitionRef>,
}

impl<T> WithDefinition<T> {
    pub fn without_definition(value: T) -> Self {
        WithDefinition {
            value,
            definition: None,
        }
    }

    pub fn defined_at(value: T, module: &str, span: Span) -> Self {
        WithDefinition {
            value,
            definition: Some(DefinitionRef {
                module: module.to_string(),
                span,
            }),
        }
    }
}

/// A module as seen by the validator.
#[derive(Debug, Clone)]
pub enum Module {
    /// Backed by a parsed AST; replaced wholesale on re-parse.
    Source(Arc<ModuleNode>),
    /// Backed by static metadata; immutable for the process lifetime.
    Referenced(ReferencedModule),
}

/// Metadata-backed module (built-ins, precompiled dependencies).
#[derive(Debug, Clone)]
pub struct ReferencedModule {
    signature: Arc<ModuleSignature>,
}

impl ReferencedModule {
    pub fn new(signature: ModuleSignature) -> Self {
        ReferencedModule {
            signature: Arc::new(signature),
        }
    }

    pub fn name(&self) -> &str {
        &self.signature.name
    }

    pub fn signature(&self) -> &ModuleSignature {
        &self.signature
    }
}

impl Module {
    pub fn name(&self) -> &str {
        match self {
            Module::Source(module) => &module.name,
            Module::Referenced(module) => module.name(),
        }
    }

    pub fn description(&self) -> &str {
        match self {
            Module::Source(module) => &module.description,
            Module::Referenced(module) => &module.signature().description,
        }
    }

    pub fn find_constant(&self, name: &str) -> Option<WithDefinition<Type>> {
        match self {
            Module::Source(module) => {
                let decl = module.constant(name)?;
                let ty = decl
                    .declared_type
                    .as_ref()
                    .map(|node| Type::from_ref_node(node).qualify(&module.name))
                    .unwrap_or(Type::Unknown);
                Some(WithDefinition::defined_at(ty, &module.name, decl.name.span))
            }
            Module::Referenced(module) => {
                let constant = module.signature().constants.get(name)?;
                Some(WithDefinition::without_definition(resolve_type_ref(
                    &constant.type_ref,
                )))
            }
        }
    }

    pub fn all_constants(&self) -> Vec<(String, WithDefinition<Type>)> {
        match self {
            Module::Source(module) => module
                .constants()
                .filter_map(|decl| {
                    Some((decl.name.value.clone(), self.find_constant(&decl.name.value)?))
                })
                .collect(),
            Module::Referenced(module) => module
                .signature()
                .constants
                .iter()
                .map(|(name, constant)| {
                    (
                        name.clone(),
                        WithDefinition::without_definition(resolve_type_ref(&constant.type_ref)),
                    )
                })
                .collect(),
        }
    }

    /// Resolve an exported type name. For metadata modules, the alias table
    /// is consulted before direct type references.
    pub fn find_type(&self, name: &str) -> Option<Type> {
        match self {
            Module::Source(module) => {
                let decl = module.type_declaration(name)?;
                Some(Type::from_ref_node(&decl.definition).qualify(&module.name))
            }
            Module::Referenced(module) => {
                let signature = module.signature();
                if let Some(aliased) = signature.type_aliases.get(name) {
                    return Some(resolve_type_ref(aliased));
                }
                signature.types.get(name).map(|_| Type::Reference {
                    module: Some(signature.name.clone()),
                    name: name.to_string(),
                    type_args: Vec::new(),
                })
            }
        }
    }

    pub fn all_types(&self) -> Vec<(String, Type)> {
        match self {
            Module::Source(module) => module
                .type_declarations()
                .filter_map(|decl| {
                    Some((decl.name.value.clone(), self.find_type(&decl.name.value)?))
                })
                .collect(),
            Module::Referenced(module) => {
                let signature = module.signature();
                let mut types = Vec::new();
                for (name, aliased) in &signature.type_aliases {
                    types.push((name.clone(), resolve_type_ref(aliased)));
                }
                for name in signature.types.keys() {
                    types.push((
                        name.clone(),
                        Type::Reference {
                            module: Some(signature.name.clone()),
                            name: name.clone(),
                            type_args: Vec::new(),
                        },
                    ));
                }
                types
            }
        }
    }

    pub fn find_function(&self, name: &str) -> Option<WithDefinition<FunctionType>> {
        match self {
            Module::Source(module) => {
                let decl = module.function(name)?;
                let mut function = FunctionType::from_declaration(decl);
                function.return_type = function.return_type.qualify(&module.name);
                for parameter in &mut function.parameters {
                    parameter.ty = parameter.ty.clone().qualify(&module.name);
                }
                Some(WithDefinition::defined_at(
                    function,
                    &module.name,
                    decl.name.span,
                ))
            }
            Module::Referenced(module) => {
                let function = module.signature().functions.get(name)?;
                Some(WithDefinition::without_definition(resolve_function(function)))
            }
        }
    }

    pub fn all_functions(&self) -> Vec<(String, WithDefinition<FunctionType>)> {
        match self {
            Module::Source(module) => module
                .functions()
                .filter_map(|decl| {
                    Some((decl.name.value.clone(), self.find_function(&decl.name.value)?))
                })
                .collect(),
            Module::Referenced(module) => module
                .signature()
                .functions
                .iter()
                .map(|(name, function)| {
                    (
                        name.clone(),
                        WithDefinition::without_definition(resolve_function(function)),
                    )
                })
                .collect(),
        }
    }

    /// The type of `type_name.field`, for nominal types this module exports.
    pub fn find_field(&self, type_name: &str, field: &str) -> Option<Type> {
        match self {
            Module::Source(module) => {
                let decl = module.type_declaration(type_name)?;
                match &decl.definition {
                    TypeRefNode::Record { fields, .. } => fields
                        .iter()
                        .find(|(name, _)| name.value == field)
                        .map(|(_, ty)| Type::from_ref_node(ty).qualify(&module.name)),
                    _ => None,
                }
            }
            Module::Referenced(module) => {
                let signature = module.signature().types.get(type_name)?;
                signature.fields.get(field).map(resolve_type_ref)
            }
        }
    }

    /// The signature of `type_name.method(...)`, for nominal types this
    /// module exports.
    pub fn find_method(&self, type_name: &str, method: &str) -> Option<FunctionType> {
        match self {
            Module::Source(module) => {
                for item in &module.items {
                    let ModuleItem::Impl(impl_decl) = item else {
                        continue;
                    };
                    if impl_decl.name.value != type_name {
                        continue;
                    }
                    for impl_item in &impl_decl.methods {
                        if let ImplItem::Method(decl) = impl_item {
                            if decl.name.value == method {
                                let mut function = FunctionType::from_declaration(decl);
                                function.return_type =
                                    function.return_type.qualify(&module.name);
                                for parameter in &mut function.parameters {
                                    parameter.ty = parameter.ty.clone().qualify(&module.name);
                                }
                                return Some(function);
                            }
                        }
                    }
                }
                None
            }
            Module::Referenced(module) => {
                let signature = module.signature().types.get(type_name)?;
                signature.methods.get(method).map(resolve_function)
            }
        }
    }
}

/// Explicit lookup from module name to module, passed into each validation
/// call. Cloning is cheap: both module variants are reference-counted.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    modules: IndexMap<String, Module>,
}

impl Registry {
    pub fn new() -> Self {
        Registry::default()
    }

    pub fn insert(&mut self, module: Module) {
        self.modules.insert(module.name().to_string(), module);
    }

    pub fn insert_source(&mut self, module: Arc<ModuleNode>) {
        self.insert(Module::Source(module));
    }

    pub fn insert_signature(&mut self, signature: ModuleSignature) {
        self.insert(Module::Referenced(ReferencedModule::new(signature)));
    }

    /// Load an array of module signatures from JSON, as exported by a host
    /// binding layer. Returns how many modules were added.
    pub fn load_signatures(&mut self, json: &str) -> Result<usize, crate::Error> {
        let signatures: Vec<ModuleSignature> = serde_json::from_str(json)?;
        let count = signatures.len();
        for signature in signatures {
            self.insert_signature(signature);
        }
        Ok(count)
    }

    pub fn find_module(&self, name: &str) -> Option<&Module> {
        self.modules.get(name)
    }

    pub fn module_names(&self) -> impl Iterator<Item = &str> {
        self.modules.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}
