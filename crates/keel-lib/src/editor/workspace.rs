//! Incremental re-analysis of a set of open documents.

use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};

use crate::ast::{Expression, ModuleNode, NodeRef, TypeRefNode};
use crate::diagnostics::Diagnostics;
use crate::grammar::parse_module;
use crate::types::{Module, ModuleSignature, Registry};

use super::tokens::{semantic_tokens, SemanticToken};
use super::{symbols, SymbolInfo};

/// One open document and the analysis results published for it.
#[derive(Debug)]
pub struct Document {
    pub version: u64,
    pub source: String,
    pub module: Arc<ModuleNode>,
    pub diagnostics: Diagnostics,
    /// Names of modules this document references, used to find dependents.
    dependencies: IndexSet<String>,
}

/// The set of open documents plus the immutable referenced-module table.
///
/// Every edit re-parses the changed document and re-validates it together
/// with every open dependent, all against one registry snapshot; results are
/// published per document only when its analysis ran to completion, so a
/// reader never observes a half-updated module. Stale updates (version not
/// newer than the published one) are discarded: last write wins.
#[derive(Debug, Default)]
pub struct Workspace {
    referenced: IndexMap<String, Module>,
    documents: IndexMap<String, Document>,
}

impl Workspace {
    pub fn new() -> Self {
        Workspace::default()
    }

    /// Register a built-in/precompiled module visible to every document.
    pub fn add_referenced(&mut self, signature: ModuleSignature) {
        let module = Module::Referenced(crate::types::ReferencedModule::new(signature));
        self.referenced.insert(module.name().to_string(), module);
    }

    /// Load a JSON array of module signatures (see [`Registry::load_signatures`]).
    pub fn load_signatures(&mut self, json: &str) -> Result<usize, crate::Error> {
        let signatures: Vec<ModuleSignature> = serde_json::from_str(json)?;
        let count = signatures.len();
        for signature in signatures {
            self.add_referenced(signature);
        }
        Ok(count)
    }

    /// Parse and re-validate `name` at `version`, plus all open dependents.
    /// Returns false when the update is stale and was discarded.
    pub fn update(&mut self, name: &str, version: u64, source: &str) -> bool {
        if let Some(existing) = self.documents.get(name) {
            if version <= existing.version {
                return false;
            }
        }

        let module = Arc::new(parse_module(name, source));
        let dependencies = collect_dependencies(&module);
        self.documents.insert(
            name.to_string(),
            Document {
                version,
                source: source.to_string(),
                module,
                diagnostics: Diagnostics::new(),
                dependencies,
            },
        );

        let registry = self.registry_snapshot();
        let affected: Vec<String> = self
            .documents
            .iter()
            .filter(|(document_name, document)| {
                document_name.as_str() == name || document.dependencies.contains(name)
            })
            .map(|(document_name, _)| document_name.clone())
            .collect();
        for document_name in affected {
            let module = Arc::clone(&self.documents[&document_name].module);
            let diagnostics = module.validate(&registry);
            if let Some(document) = self.documents.get_mut(&document_name) {
                document.diagnostics = diagnostics;
            }
        }
        true
    }

    /// Drop a closed document; dependents keep their last published
    /// diagnostics until their next update.
    pub fn remove(&mut self, name: &str) -> bool {
        self.documents.shift_remove(name).is_some()
    }

    /// A consistent view of every module visible right now. Cheap: modules
    /// are reference-counted, never deep-copied.
    pub fn registry_snapshot(&self) -> Registry {
        let mut registry = Registry::new();
        for module in self.referenced.values() {
            registry.insert(module.clone());
        }
        for document in self.documents.values() {
            registry.insert_source(Arc::clone(&document.module));
        }
        registry
    }

    pub fn document(&self, name: &str) -> Option<&Document> {
        self.documents.get(name)
    }

    pub fn diagnostics(&self, name: &str) -> Option<&Diagnostics> {
        self.documents.get(name).map(|document| &document.diagnostics)
    }

    pub fn semantic_tokens(&self, name: &str) -> Option<Vec<SemanticToken>> {
        self.documents
            .get(name)
            .map(|document| semantic_tokens(&document.module))
    }

    pub fn symbols(&self, name: &str) -> Option<Vec<SymbolInfo>> {
        let document = self.documents.get(name)?;
        Some(symbols(&Module::Source(Arc::clone(&document.module))))
    }

    pub fn document_names(&self) -> impl Iterator<Item = &str> {
        self.documents.keys().map(String::as_str)
    }
}

/// Module names a document references through qualified value, call, or
/// type paths.
fn collect_dependencies(module: &ModuleNode) -> IndexSet<String> {
    let mut dependencies = IndexSet::new();
    module.visit(&mut |node| {
        let path = match node {
            NodeRef::Expression(Expression::VariableGet { path, .. })
            | NodeRef::Expression(Expression::Call { path, .. }) => path,
            NodeRef::TypeRef(TypeRefNode::Named { path, .. }) => path,
            _ => return,
        };
        if path.len() > 1 {
            let module_name = path[..path.len() - 1]
                .iter()
                .map(|segment| segment.value.as_str())
                .collect::<Vec<_>>()
                .join("::");
            dependencies.insert(module_name);
        }
    });
    dependencies
}
