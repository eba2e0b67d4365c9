//! A parsed module: the ordered item list plus O(1) per-category name lookup.

use indexmap::IndexMap;

use crate::parsing::Span;

use super::expr::ErrorNode;
use super::item::{ConstDeclaration, FunctionDeclaration, ModuleItem, TypeDeclaration};
use super::NodeRef;

/// AST-backed module. Constructed once per successful parse of a document
/// and replaced wholesale on re-parse; nothing mutates it afterwards.
///
/// Names are unique per category; on redeclaration the first occurrence wins
/// the lookup table and the validator reports the extras.
#[derive(Debug)]
pub struct ModuleNode {
    pub name: String,
    /// Leading line comments of the document.
    pub description: String,
    pub items: Vec<ModuleItem>,
    pub span: Span,
    constants: IndexMap<String, usize>,
    functions: IndexMap<String, usize>,
    types: IndexMap<String, usize>,
}

impl ModuleNode {
    pub fn new(name: impl Into<String>, items: Vec<ModuleItem>, span: Span) -> Self {
        let mut constants = IndexMap::new();
        let mut functions = IndexMap::new();
        let mut types = IndexMap::new();
        let mut description = String::new();

        for (index, item) in items.iter().enumerate() {
            match item {
                ModuleItem::Constant(decl) => {
                    constants.entry(decl.name.value.clone()).or_insert(index);
                }
                ModuleItem::Function(decl) => {
                    functions.entry(decl.name.value.clone()).or_insert(index);
                }
                ModuleItem::Type(decl) => {
                    types.entry(decl.name.value.clone()).or_insert(index);
                }
                ModuleItem::Comment(comment) => {
                    // Only the comment block before the first declaration
                    // contributes to the module description.
                    if constants.is_empty() && functions.is_empty() && types.is_empty() {
                        if !description.is_empty() {
                            description.push('\n');
                        }
                        description.push_str(comment.text.trim());
                    }
                }
                ModuleItem::Impl(_) | ModuleItem::Error(_) => {}
            }
        }

        ModuleNode {
            name: name.into(),
            description,
            items,
            span,
            constants,
            functions,
            types,
        }
    }

    pub fn constant(&self, name: &str) -> Option<&ConstDeclaration> {
        match &self.items[*self.constants.get(name)?] {
            ModuleItem::Constant(decl) => Some(decl),
            _ => None,
        }
    }

    pub fn function(&self, name: &str) -> Option<&FunctionDeclaration> {
        match &self.items[*self.functions.get(name)?] {
            ModuleItem::Function(decl) => Some(decl),
            _ => None,
        }
    }

    pub fn type_declaration(&self, name: &str) -> Option<&TypeDeclaration> {
        match &self.items[*self.types.get(name)?] {
            ModuleItem::Type(decl) => Some(decl),
            _ => None,
        }
    }

    pub fn constants(&self) -> impl Iterator<Item = &ConstDeclaration> {
        self.constants.values().filter_map(|index| match &self.items[*index] {
            ModuleItem::Constant(decl) => Some(decl),
            _ => None,
        })
    }

    pub fn functions(&self) -> impl Iterator<Item = &FunctionDeclaration> {
        self.functions.values().filter_map(|index| match &self.items[*index] {
            ModuleItem::Function(decl) => Some(decl),
            _ => None,
        })
    }

    pub fn type_declarations(&self) -> impl Iterator<Item = &TypeDeclaration> {
        self.types.values().filter_map(|index| match &self.items[*index] {
            ModuleItem::Type(decl) => Some(decl),
            _ => None,
        })
    }

    /// Pre-order traversal of every node of every item, in source order.
    pub fn visit<'a>(&'a self, f: &mut impl FnMut(NodeRef<'a>)) {
        for item in &self.items {
            item.visit(f);
        }
    }

    /// Every error node embedded by parser recovery, in source order.
    pub fn syntax_errors(&self) -> Vec<&ErrorNode> {
        let mut errors = Vec::new();
        self.visit(&mut |node| match node {
            NodeRef::Item(ModuleItem::Error(error)) => errors.push(error),
            NodeRef::Expression(super::Expression::Error(error)) => errors.push(error),
            NodeRef::Error(error) => errors.push(error),
            _ => {}
        });
        errors
    }
}
