//! Typed AST for Keel modules.
//!
//! Every node carries the [`Span`] of source text it was parsed from and is
//! immutable after construction. The [`NodeRef`] traversal visits a node
//! before its children, children in left-to-right source order — the
//! ordering the semantic-token and symbol collectors rely on.

mod expr;
mod item;
mod module;
mod print;
mod ty;

pub use expr::{
    AssignOp, AssignTarget, BinaryOp, BlockItem, BoolOp, DeclarationParameter, DeclarationTarget,
    ErrorNode, Expression, FunctionParameter, LineComment, UnaryOp,
};
pub use item::{
    ConstDeclaration, FunctionDeclaration, ImplDeclaration, ImplItem, ModuleItem, TypeDeclaration,
};
pub use module::ModuleNode;
pub use print::{format_expression, format_module};
pub use ty::TypeRefNode;

use crate::parsing::Span;

/// Borrowed view of any AST node, handed to traversal callbacks.
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    Item(&'a ModuleItem),
    Expression(&'a Expression),
    TypeRef(&'a TypeRefNode),
    Comment(&'a LineComment),
    Error(&'a ErrorNode),
}

impl NodeRef<'_> {
    pub fn span(&self) -> Span {
        match self {
            NodeRef::Item(item) => item.span(),
            NodeRef::Expression(expr) => expr.span(),
            NodeRef::TypeRef(ty) => ty.span(),
            NodeRef::Comment(comment) => comment.span,
            NodeRef::Error(error) => error.span,
        }
    }
}
