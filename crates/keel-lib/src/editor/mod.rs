//! Editor integration surface: semantic tokens, symbol queries, and the
//! incremental analysis [`Workspace`].

mod tokens;
mod workspace;

#[cfg(test)]
mod tests;

pub use tokens::{semantic_tokens, SemanticToken, TokenKind, TokenModifier};
pub use workspace::{Document, Workspace};

use serde::Serialize;

use crate::types::{DefinitionRef, Module, Type};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SymbolKind {
    Constant,
    Function,
    Type,
}

/// One exported name with its resolved type, for hover and go-to-definition.
#[derive(Debug, Clone)]
pub struct SymbolInfo {
    pub name: String,
    pub kind: SymbolKind,
    pub ty: Type,
    pub definition: Option<DefinitionRef>,
}

/// Enumerate a module's exports: constants, then functions, then types, in
/// declaration order within each category.
pub fn symbols(module: &Module) -> Vec<SymbolInfo> {
    let mut symbols = Vec::new();
    for (name, constant) in module.all_constants() {
        symbols.push(SymbolInfo {
            name,
            kind: SymbolKind::Constant,
            ty: constant.value,
            definition: constant.definition,
        });
    }
    for (name, function) in module.all_functions() {
        symbols.push(SymbolInfo {
            name,
            kind: SymbolKind::Function,
            ty: Type::Function(Box::new(function.value)),
            definition: function.definition,
        });
    }
    for (name, ty) in module.all_types() {
        let definition = match module {
            Module::Source(source) => source
                .type_declaration(&name)
                .map(|decl| DefinitionRef {
                    module: source.name.clone(),
                    span: decl.name.span,
                }),
            Module::Referenced(_) => None,
        };
        symbols.push(SymbolInfo {
            name,
            kind: SymbolKind::Type,
            ty,
            definition,
        });
    }
    symbols
}
