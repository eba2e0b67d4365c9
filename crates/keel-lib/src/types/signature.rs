//! Static metadata describing precompiled or built-in modules.
//!
//! Signature tables are supplied by the host (typically as JSON) and are
//! never mutated by the analysis core. Type references inside the metadata
//! use a resolvable encoding that [`resolve_type_ref`] turns into concrete
//! [`Type`] values, or [`Type::Unknown`] when a name does not resolve.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::{FunctionType, FunctionTypeParameter, Type};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleSignature {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub constants: IndexMap<String, ConstantSignature>,
    #[serde(default)]
    pub functions: IndexMap<String, FunctionSignature>,
    #[serde(default)]
    pub types: IndexMap<String, TypeSignature>,
    #[serde(default)]
    pub type_aliases: IndexMap<String, TypeRefData>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstantSignature {
    #[serde(rename = "type")]
    pub type_ref: TypeRefData,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionSignature {
    #[serde(default)]
    pub is_async: bool,
    #[serde(default)]
    pub parameters: Vec<ParameterSignature>,
    pub return_type: TypeRefData,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterSignature {
    pub name: String,
    #[serde(rename = "type")]
    pub type_ref: TypeRefData,
    #[serde(default)]
    pub has_default: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeSignature {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub fields: IndexMap<String, TypeRefData>,
    #[serde(default)]
    pub methods: IndexMap<String, FunctionSignature>,
}

/// Resolvable type-reference encoding used throughout signature tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TypeRefData {
    /// `{"kind": "builtin", "name": "int"}`
    Builtin { name: String },
    Array {
        element: Box<TypeRefData>,
    },
    Tuple {
        elements: Vec<TypeRefData>,
    },
    Record {
        fields: IndexMap<String, TypeRefData>,
    },
    Function {
        #[serde(default)]
        is_async: bool,
        #[serde(default)]
        parameters: Vec<ParameterSignature>,
        return_type: Box<TypeRefData>,
    },
    /// A type exported by another referenced module.
    Reference { module: String, name: String },
}

/// Turn a metadata type reference into a concrete type. Unresolvable builtin
/// names degrade to [`Type::Unknown`] rather than failing the whole table.
pub fn resolve_type_ref(data: &TypeRefData) -> Type {
    match data {
        TypeRefData::Builtin { name } => Type::builtin(name).unwrap_or(Type::Unknown),
        TypeRefData::Array { element } => Type::Array(Box::new(resolve_type_ref(element))),
        TypeRefData::Tuple { elements } => {
            Type::Tuple(elements.iter().map(resolve_type_ref).collect())
        }
        TypeRefData::Record { fields } => Type::Record(
            fields
                .iter()
                .map(|(name, ty)| (name.clone(), resolve_type_ref(ty)))
                .collect(),
        ),
        TypeRefData::Function {
            is_async,
            parameters,
            return_type,
        } => Type::Function(Box::new(FunctionType {
            is_async: *is_async,
            parameters: parameters.iter().map(resolve_parameter).collect(),
            return_type: resolve_type_ref(return_type),
            description: String::new(),
        })),
        TypeRefData::Reference { module, name } => Type::Reference {
            module: Some(module.clone()),
            name: name.clone(),
            type_args: Vec::new(),
        },
    }
}

pub(super) fn resolve_parameter(parameter: &ParameterSignature) -> FunctionTypeParameter {
    FunctionTypeParameter {
        name: parameter.name.clone(),
        ty: resolve_type_ref(&parameter.type_ref),
        has_default: parameter.has_default,
    }
}

pub(super) fn resolve_function(signature: &FunctionSignature) -> FunctionType {
    FunctionType {
        is_async: signature.is_async,
        parameters: signature.parameters.iter().map(resolve_parameter).collect(),
        return_type: resolve_type_ref(&signature.return_type),
        description: signature.description.clone(),
    }
}
