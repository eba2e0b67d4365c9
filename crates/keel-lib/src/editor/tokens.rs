//! Semantic-token extraction for syntax highlighting.

use serde::Serialize;

use crate::ast::{
    Expression, ImplItem, ModuleItem, ModuleNode, NodeRef,
};
use crate::parsing::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TokenKind {
    Keyword,
    Type,
    Function,
    Variable,
    Constant,
    Comment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TokenModifier {
    Declaration,
    Readonly,
}

#[derive(Debug, Clone, Serialize)]
pub struct SemanticToken {
    pub span: Span,
    pub kind: TokenKind,
    pub modifiers: Vec<TokenModifier>,
}

impl SemanticToken {
    fn new(span: Span, kind: TokenKind) -> Self {
        SemanticToken {
            span,
            kind,
            modifiers: Vec::new(),
        }
    }

    fn with_modifiers(span: Span, kind: TokenKind, modifiers: &[TokenModifier]) -> Self {
        SemanticToken {
            span,
            kind,
            modifiers: modifiers.to_vec(),
        }
    }
}

/// Extract highlighting tokens from one AST walk, ordered by source
/// position.
pub fn semantic_tokens(module: &ModuleNode) -> Vec<SemanticToken> {
    let mut tokens = Vec::new();
    for item in &module.items {
        item_tokens(item, &mut tokens);
    }
    tokens.sort_by_key(|token| (token.span.start.offset, token.span.end.offset));
    tokens
}

fn item_tokens(item: &ModuleItem, tokens: &mut Vec<SemanticToken>) {
    match item {
        ModuleItem::Constant(decl) => {
            tokens.push(SemanticToken::new(decl.keyword, TokenKind::Keyword));
            tokens.push(SemanticToken::with_modifiers(
                decl.name.span,
                TokenKind::Constant,
                &[TokenModifier::Declaration, TokenModifier::Readonly],
            ));
            expression_tokens(&decl.initializer, tokens);
        }
        ModuleItem::Function(decl) => function_tokens(decl, tokens),
        ModuleItem::Type(decl) => {
            tokens.push(SemanticToken::new(decl.keyword, TokenKind::Keyword));
            tokens.push(SemanticToken::with_modifiers(
                decl.name.span,
                TokenKind::Type,
                &[TokenModifier::Declaration],
            ));
        }
        ModuleItem::Impl(decl) => {
            tokens.push(SemanticToken::new(decl.keyword, TokenKind::Keyword));
            tokens.push(SemanticToken::with_modifiers(
                decl.name.span,
                TokenKind::Type,
                &[TokenModifier::Declaration],
            ));
            for impl_item in &decl.methods {
                match impl_item {
                    ImplItem::Method(method) => function_tokens(method, tokens),
                    ImplItem::Comment(comment) => {
                        tokens.push(SemanticToken::new(comment.span, TokenKind::Comment));
                    }
                    ImplItem::Error(_) => {}
                }
            }
        }
        ModuleItem::Comment(comment) => {
            tokens.push(SemanticToken::new(comment.span, TokenKind::Comment));
        }
        ModuleItem::Error(_) => {}
    }
}

fn function_tokens(decl: &crate::ast::FunctionDeclaration, tokens: &mut Vec<SemanticToken>) {
    if let Some(sync_kw) = decl.sync_kw {
        tokens.push(SemanticToken::new(sync_kw, TokenKind::Keyword));
    }
    tokens.push(SemanticToken::new(decl.fn_kw, TokenKind::Keyword));
    tokens.push(SemanticToken::with_modifiers(
        decl.name.span,
        TokenKind::Function,
        &[TokenModifier::Declaration],
    ));
    for parameter in &decl.parameters {
        tokens.push(SemanticToken::with_modifiers(
            parameter.name.span,
            TokenKind::Variable,
            &[TokenModifier::Declaration],
        ));
        if let Some(default) = &parameter.default {
            expression_tokens(default, tokens);
        }
    }
    expression_tokens(&decl.body, tokens);
}

fn expression_tokens(expr: &Expression, tokens: &mut Vec<SemanticToken>) {
    expr.visit(&mut |node| match node {
        NodeRef::Comment(comment) => {
            tokens.push(SemanticToken::new(comment.span, TokenKind::Comment));
        }
        NodeRef::Expression(expr) => match expr {
            Expression::If { if_kw, else_kw, .. } => {
                tokens.push(SemanticToken::new(*if_kw, TokenKind::Keyword));
                if let Some(else_kw) = else_kw {
                    tokens.push(SemanticToken::new(*else_kw, TokenKind::Keyword));
                }
            }
            Expression::While { while_kw, .. } => {
                tokens.push(SemanticToken::new(*while_kw, TokenKind::Keyword));
            }
            Expression::ForIn { for_kw, in_kw, variable, .. } => {
                tokens.push(SemanticToken::new(*for_kw, TokenKind::Keyword));
                tokens.push(SemanticToken::new(*in_kw, TokenKind::Keyword));
                tokens.push(SemanticToken::with_modifiers(
                    variable.name.span,
                    TokenKind::Variable,
                    &[TokenModifier::Declaration],
                ));
            }
            Expression::ForInDeconstruct { for_kw, in_kw, .. } => {
                tokens.push(SemanticToken::new(*for_kw, TokenKind::Keyword));
                tokens.push(SemanticToken::new(*in_kw, TokenKind::Keyword));
            }
            Expression::Return { return_kw, .. } => {
                tokens.push(SemanticToken::new(*return_kw, TokenKind::Keyword));
            }
            Expression::Break { span } | Expression::Continue { span } => {
                tokens.push(SemanticToken::new(*span, TokenKind::Keyword));
            }
            Expression::VariableDeclaration {
                keyword,
                declaration,
                is_const,
                ..
            } => {
                tokens.push(SemanticToken::new(keyword.span, TokenKind::Keyword));
                let modifiers: &[TokenModifier] = if *is_const {
                    &[TokenModifier::Declaration, TokenModifier::Readonly]
                } else {
                    &[TokenModifier::Declaration]
                };
                tokens.push(SemanticToken::with_modifiers(
                    declaration.name.span,
                    TokenKind::Variable,
                    modifiers,
                ));
            }
            Expression::TupleDeconstructDeclaration { keyword, .. } => {
                tokens.push(SemanticToken::new(keyword.span, TokenKind::Keyword));
            }
            Expression::Lambda { fn_kw, .. } => {
                tokens.push(SemanticToken::new(*fn_kw, TokenKind::Keyword));
            }
            _ => {}
        },
        _ => {}
    });
}
