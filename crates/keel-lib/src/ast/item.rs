//! Module-level items.

use crate::parsing::{Span, WithSpan};

use super::expr::{ErrorNode, Expression, FunctionParameter, LineComment};
use super::{NodeRef, TypeRefNode};

#[derive(Debug, Clone)]
pub enum ModuleItem {
    Constant(ConstDeclaration),
    Function(FunctionDeclaration),
    Type(TypeDeclaration),
    Impl(ImplDeclaration),
    Comment(LineComment),
    Error(ErrorNode),
}

/// `pub? const NAME (: type)? = expr`
#[derive(Debug, Clone)]
pub struct ConstDeclaration {
    pub is_public: bool,
    pub keyword: Span,
    pub name: WithSpan<String>,
    pub declared_type: Option<TypeRefNode>,
    pub initializer: Expression,
    pub span: Span,
}

/// `pub? sync? fn name(params) -> type = expr`
///
/// Functions are asynchronous unless marked `sync`.
#[derive(Debug, Clone)]
pub struct FunctionDeclaration {
    pub is_public: bool,
    pub sync_kw: Option<Span>,
    pub fn_kw: Span,
    pub name: WithSpan<String>,
    pub parameters: Vec<FunctionParameter>,
    pub return_type: TypeRefNode,
    pub body: Expression,
    pub span: Span,
}

impl FunctionDeclaration {
    pub fn is_async(&self) -> bool {
        self.sync_kw.is_none()
    }
}

/// `pub? type Name = definition`
#[derive(Debug, Clone)]
pub struct TypeDeclaration {
    pub is_public: bool,
    pub keyword: Span,
    pub name: WithSpan<String>,
    pub definition: TypeRefNode,
    pub span: Span,
}

/// `impl Name { ...methods... }`
#[derive(Debug, Clone)]
pub struct ImplDeclaration {
    pub keyword: Span,
    pub name: WithSpan<String>,
    pub methods: Vec<ImplItem>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum ImplItem {
    Method(FunctionDeclaration),
    Comment(LineComment),
    Error(ErrorNode),
}

impl ImplItem {
    pub fn span(&self) -> Span {
        match self {
            ImplItem::Method(method) => method.span,
            ImplItem::Comment(comment) => comment.span,
            ImplItem::Error(error) => error.span,
        }
    }
}

impl ModuleItem {
    pub fn span(&self) -> Span {
        match self {
            ModuleItem::Constant(decl) => decl.span,
            ModuleItem::Function(decl) => decl.span,
            ModuleItem::Type(decl) => decl.span,
            ModuleItem::Impl(decl) => decl.span,
            ModuleItem::Comment(comment) => comment.span,
            ModuleItem::Error(error) => error.span,
        }
    }

    /// Pre-order traversal: the item, then its children in source order.
    pub fn visit<'a>(&'a self, f: &mut impl FnMut(NodeRef<'a>)) {
        f(NodeRef::Item(self));
        match self {
            ModuleItem::Constant(decl) => {
                if let Some(ty) = &decl.declared_type {
                    ty.visit(f);
                }
                decl.initializer.visit(f);
            }
            ModuleItem::Function(decl) => visit_function(decl, f),
            ModuleItem::Type(decl) => decl.definition.visit(f),
            ModuleItem::Impl(decl) => {
                for method in &decl.methods {
                    match method {
                        ImplItem::Method(method) => visit_function(method, f),
                        ImplItem::Comment(comment) => f(NodeRef::Comment(comment)),
                        ImplItem::Error(error) => f(NodeRef::Error(error)),
                    }
                }
            }
            ModuleItem::Comment(_) | ModuleItem::Error(_) => {}
        }
    }
}

fn visit_function<'a>(decl: &'a FunctionDeclaration, f: &mut impl FnMut(NodeRef<'a>)) {
    for parameter in &decl.parameters {
        if let Some(ty) = &parameter.ty {
            ty.visit(f);
        }
        if let Some(default) = &parameter.default {
            default.visit(f);
        }
    }
    decl.return_type.visit(f);
    decl.body.visit(f);
}
