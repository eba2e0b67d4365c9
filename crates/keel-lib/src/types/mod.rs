//! The structural type algebra and the module abstraction on top of it.

mod module;
mod signature;

#[cfg(test)]
mod tests;

pub use module::{DefinitionRef, Module, ReferencedModule, Registry, WithDefinition};
pub use signature::{
    ConstantSignature, FunctionSignature, ModuleSignature, ParameterSignature, TypeRefData,
    TypeSignature, resolve_type_ref,
};

use std::fmt;

use crate::ast::{FunctionDeclaration, FunctionParameter, TypeRefNode};

/// A Keel type. Types are small values cloned freely; identity is structural
/// except where noted on [`Type::is_assignable_from`].
#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    /// Placeholder for anything that could not be resolved. Assignable in
    /// both directions so one resolution failure does not cascade.
    Unknown,
    Unit,
    Bool,
    Int,
    Float,
    String,
    Range,
    Array(Box<Type>),
    Tuple(Vec<Type>),
    /// Ordered field name/type pairs.
    Record(Vec<(String, Type)>),
    Function(Box<FunctionType>),
    Union(Vec<Type>),
    /// A named type resolved lazily against a module context; `module` of
    /// `None` means "the module currently being validated".
    Reference {
        module: Option<String>,
        name: String,
        type_args: Vec<Type>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionType {
    pub is_async: bool,
    pub parameters: Vec<FunctionTypeParameter>,
    pub return_type: Type,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionTypeParameter {
    pub name: String,
    pub ty: Type,
    pub has_default: bool,
}

impl FunctionType {
    /// Parameters a call site cannot omit.
    pub fn required_parameters(&self) -> usize {
        self.parameters.iter().filter(|p| !p.has_default).count()
    }

    /// The deterministic rendering of this signature: the async marker, the
    /// parameter types in order, and the return type.
    pub fn display_name(&self) -> String {
        let parameters = self
            .parameters
            .iter()
            .map(|p| p.ty.display_name())
            .collect::<Vec<_>>()
            .join(", ");
        let marker = if self.is_async { "" } else { "sync " };
        format!("{marker}fn({parameters}) -> {}", self.return_type.display_name())
    }

    /// Build the signature a function declaration exposes. Parameter and
    /// return types stay lazy references until validation realizes them.
    pub fn from_declaration(decl: &FunctionDeclaration) -> Self {
        FunctionType {
            is_async: decl.is_async(),
            parameters: decl.parameters.iter().map(FunctionTypeParameter::from_ast).collect(),
            return_type: Type::from_ref_node(&decl.return_type),
            description: String::new(),
        }
    }
}

impl FunctionTypeParameter {
    fn from_ast(parameter: &FunctionParameter) -> Self {
        FunctionTypeParameter {
            name: parameter.name.value.clone(),
            ty: parameter
                .ty
                .as_ref()
                .map(Type::from_ref_node)
                .unwrap_or(Type::Unknown),
            has_default: parameter.default.is_some(),
        }
    }
}

impl Type {
    /// Map a syntactic type reference to a semantic type without consulting
    /// any module: builtins become primitives, everything named stays a lazy
    /// [`Type::Reference`].
    pub fn from_ref_node(node: &TypeRefNode) -> Type {
        match node {
            TypeRefNode::Named {
                path, type_args, ..
            } => {
                if path.len() == 1 && type_args.is_empty() {
                    if let Some(builtin) = Type::builtin(&path[0].value) {
                        return builtin;
                    }
                }
                let (module, name) = match path.split_last() {
                    Some((last, prefix)) if !prefix.is_empty() => {
                        let module = prefix
                            .iter()
                            .map(|segment| segment.value.as_str())
                            .collect::<Vec<_>>()
                            .join("::");
                        (Some(module), last.value.clone())
                    }
                    Some((last, _)) => (None, last.value.clone()),
                    None => (None, String::new()),
                };
                Type::Reference {
                    module,
                    name,
                    type_args: type_args.iter().map(Type::from_ref_node).collect(),
                }
            }
            TypeRefNode::Array { element, .. } => {
                Type::Array(Box::new(Type::from_ref_node(element)))
            }
            TypeRefNode::Tuple { elements, .. } => {
                Type::Tuple(elements.iter().map(Type::from_ref_node).collect())
            }
            TypeRefNode::Record { fields, .. } => Type::Record(
                fields
                    .iter()
                    .map(|(name, ty)| (name.value.clone(), Type::from_ref_node(ty)))
                    .collect(),
            ),
            TypeRefNode::Function {
                is_async,
                parameters,
                return_type,
                ..
            } => Type::Function(Box::new(FunctionType {
                is_async: *is_async,
                parameters: parameters
                    .iter()
                    .enumerate()
                    .map(|(i, ty)| FunctionTypeParameter {
                        name: format!("param{i}"),
                        ty: Type::from_ref_node(ty),
                        has_default: false,
                    })
                    .collect(),
                return_type: Type::from_ref_node(return_type),
                description: String::new(),
            })),
            TypeRefNode::Union { variants, .. } => {
                Type::Union(variants.iter().map(Type::from_ref_node).collect())
            }
        }
    }

    pub fn builtin(name: &str) -> Option<Type> {
        match name {
            "int" => Some(Type::Int),
            "float" => Some(Type::Float),
            "bool" => Some(Type::Bool),
            "string" => Some(Type::String),
            "Unit" => Some(Type::Unit),
            "Range" => Some(Type::Range),
            _ => None,
        }
    }

    pub fn display_name(&self) -> String {
        match self {
            Type::Unknown => "Unknown".into(),
            Type::Unit => "Unit".into(),
            Type::Bool => "bool".into(),
            Type::Int => "int".into(),
            Type::Float => "float".into(),
            Type::String => "string".into(),
            Type::Range => "Range".into(),
            Type::Array(element) => format!("{}[]", element.display_name()),
            Type::Tuple(elements) => {
                let inner = elements
                    .iter()
                    .map(Type::display_name)
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("({inner})")
            }
            Type::Record(fields) => {
                let inner = fields
                    .iter()
                    .map(|(name, ty)| format!("{name} : {}", ty.display_name()))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("({inner})")
            }
            Type::Function(function) => function.display_name(),
            Type::Union(variants) => variants
                .iter()
                .map(Type::display_name)
                .collect::<Vec<_>>()
                .join(" | "),
            Type::Reference {
                module,
                name,
                type_args,
            } => {
                let mut out = String::new();
                if let Some(module) = module {
                    out.push_str(module);
                    out.push_str("::");
                }
                out.push_str(name);
                if !type_args.is_empty() {
                    out.push('<');
                    for (i, arg) in type_args.iter().enumerate() {
                        if i > 0 {
                            out.push_str(", ");
                        }
                        out.push_str(&arg.display_name());
                    }
                    out.push('>');
                }
                out
            }
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Type::Int | Type::Float)
    }

    /// Whether a value of `other` can be used where `self` is expected.
    ///
    /// Mostly structural, with two deliberate deviations:
    /// - `int` is accepted where `float` is expected;
    /// - function types compare by their rendered [`FunctionType::display_name`]
    ///   only. Two signatures that render identically are interchangeable even
    ///   if parameter names differ, and renderings that differ only in a
    ///   detail the rendering omits would wrongly compare unequal. Known
    ///   quirk, kept intentionally.
    pub fn is_assignable_from(&self, other: &Type) -> bool {
        match (self, other) {
            (Type::Unknown, _) | (_, Type::Unknown) => true,
            (Type::Float, Type::Int) => true,
            (Type::Array(a), Type::Array(b)) => a.is_assignable_from(b),
            (Type::Tuple(a), Type::Tuple(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.is_assignable_from(y))
            }
            (Type::Record(a), Type::Record(b)) => a.iter().all(|(name, ty)| {
                b.iter()
                    .find(|(other_name, _)| other_name == name)
                    .is_some_and(|(_, other_ty)| ty.is_assignable_from(other_ty))
            }),
            (Type::Function(a), Type::Function(b)) => a.display_name() == b.display_name(),
            (Type::Union(variants), other) => {
                variants.iter().any(|variant| variant.is_assignable_from(other))
            }
            (target, Type::Union(variants)) => {
                variants.iter().all(|variant| target.is_assignable_from(variant))
            }
            (
                Type::Reference {
                    module: a_module,
                    name: a_name,
                    type_args: a_args,
                },
                Type::Reference {
                    module: b_module,
                    name: b_name,
                    type_args: b_args,
                },
            ) => a_module == b_module && a_name == b_name && a_args == b_args,
            (a, b) => a == b,
        }
    }

    /// Rewrite unqualified references to point at `module`. Applied when a
    /// type definition leaves the module it was declared in, so that its
    /// internal references still resolve at the consumer's side.
    pub fn qualify(self, module: &str) -> Type {
        match self {
            Type::Reference {
                module: None,
                name,
                type_args,
            } => Type::Reference {
                module: Some(module.to_string()),
                name,
                type_args: type_args.into_iter().map(|arg| arg.qualify(module)).collect(),
            },
            Type::Reference {
                module: Some(existing),
                name,
                type_args,
            } => Type::Reference {
                module: Some(existing),
                name,
                type_args: type_args.into_iter().map(|arg| arg.qualify(module)).collect(),
            },
            Type::Array(element) => Type::Array(Box::new(element.qualify(module))),
            Type::Tuple(elements) => {
                Type::Tuple(elements.into_iter().map(|ty| ty.qualify(module)).collect())
            }
            Type::Record(fields) => Type::Record(
                fields
                    .into_iter()
                    .map(|(name, ty)| (name, ty.qualify(module)))
                    .collect(),
            ),
            Type::Function(function) => {
                let FunctionType {
                    is_async,
                    parameters,
                    return_type,
                    description,
                } = *function;
                Type::Function(Box::new(FunctionType {
                    is_async,
                    parameters: parameters
                        .into_iter()
                        .map(|parameter| FunctionTypeParameter {
                            ty: parameter.ty.qualify(module),
                            ..parameter
                        })
                        .collect(),
                    return_type: return_type.qualify(module),
                    description,
                }))
            }
            Type::Union(variants) => {
                Type::Union(variants.into_iter().map(|ty| ty.qualify(module)).collect())
            }
            other => other,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name())
    }
}
