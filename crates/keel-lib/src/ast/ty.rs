//! Syntactic type references, as written in source.
//!
//! These are resolved into semantic [`crate::types::Type`] values during
//! validation; the AST keeps only what was spelled out.

use std::fmt;

use crate::parsing::{Span, WithSpan};

use super::NodeRef;

#[derive(Debug, Clone)]
pub enum TypeRefNode {
    /// `int`, `Vessel`, `nav::Orbit`, `Option<float>`.
    Named {
        path: Vec<WithSpan<String>>,
        type_args: Vec<TypeRefNode>,
        span: Span,
    },
    /// `T[]`
    Array {
        element: Box<TypeRefNode>,
        span: Span,
    },
    /// `(int, float)`
    Tuple {
        elements: Vec<TypeRefNode>,
        span: Span,
    },
    /// `(x: float, y: float)`
    Record {
        fields: Vec<(WithSpan<String>, TypeRefNode)>,
        span: Span,
    },
    /// `fn(int) -> bool`, `sync fn(int) -> bool`
    Function {
        is_async: bool,
        parameters: Vec<TypeRefNode>,
        return_type: Box<TypeRefNode>,
        span: Span,
    },
    /// `A | B`
    Union {
        variants: Vec<TypeRefNode>,
        span: Span,
    },
}

impl TypeRefNode {
    pub fn span(&self) -> Span {
        match self {
            TypeRefNode::Named { span, .. }
            | TypeRefNode::Array { span, .. }
            | TypeRefNode::Tuple { span, .. }
            | TypeRefNode::Record { span, .. }
            | TypeRefNode::Function { span, .. }
            | TypeRefNode::Union { span, .. } => *span,
        }
    }

    pub fn visit<'a>(&'a self, f: &mut impl FnMut(NodeRef<'a>)) {
        f(NodeRef::TypeRef(self));
        match self {
            TypeRefNode::Named { type_args, .. } => {
                for arg in type_args {
                    arg.visit(f);
                }
            }
            TypeRefNode::Array { element, .. } => element.visit(f),
            TypeRefNode::Tuple { elements, .. } => {
                for element in elements {
                    element.visit(f);
                }
            }
            TypeRefNode::Record { fields, .. } => {
                for (_, ty) in fields {
                    ty.visit(f);
                }
            }
            TypeRefNode::Function {
                parameters,
                return_type,
                ..
            } => {
                for parameter in parameters {
                    parameter.visit(f);
                }
                return_type.visit(f);
            }
            TypeRefNode::Union { variants, .. } => {
                for variant in variants {
                    variant.visit(f);
                }
            }
        }
    }
}

impl fmt::Display for TypeRefNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRefNode::Named {
                path, type_args, ..
            } => {
                let mut first = true;
                for segment in path {
                    if !first {
                        write!(f, "::")?;
                    }
                    first = false;
                    write!(f, "{}", segment.value)?;
                }
                if !type_args.is_empty() {
                    write!(f, "<")?;
                    for (i, arg) in type_args.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{arg}")?;
                    }
                    write!(f, ">")?;
                }
                Ok(())
            }
            TypeRefNode::Array { element, .. } => write!(f, "{element}[]"),
            TypeRefNode::Tuple { elements, .. } => {
                write!(f, "(")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{element}")?;
                }
                write!(f, ")")
            }
            TypeRefNode::Record { fields, .. } => {
                write!(f, "(")?;
                for (i, (name, ty)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{} : {ty}", name.value)?;
                }
                write!(f, ")")
            }
            TypeRefNode::Function {
                is_async,
                parameters,
                return_type,
                ..
            } => {
                if !is_async {
                    write!(f, "sync ")?;
                }
                write!(f, "fn(")?;
                for (i, parameter) in parameters.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{parameter}")?;
                }
                write!(f, ") -> {return_type}")
            }
            TypeRefNode::Union { variants, .. } => {
                for (i, variant) in variants.iter().enumerate() {
                    if i > 0 {
                        write!(f, " | ")?;
                    }
                    write!(f, "{variant}")?;
                }
                Ok(())
            }
        }
    }
}
