//! Two-pass whole-module validation.
//!
//! Pass 1 registers every item's name so that pass 2 can check bodies
//! against a symbol table that already contains declarations appearing later
//! in the source. All failures are soft diagnostics: validation never stops
//! at the first problem, and syntactically broken fragments (error nodes)
//! surface here alongside the semantic findings.

mod context;
mod expr;
mod item;

#[cfg(test)]
mod tests;

pub use context::{BlockContext, LocalBinding, ModuleContext};

use crate::ast::ModuleNode;
use crate::diagnostics::Diagnostics;
use crate::types::Registry;

impl ModuleNode {
    /// Validate this module against `registry`. Both passes always run over
    /// the full item list; the result is the ordered list of everything
    /// found, parse errors included.
    pub fn validate(&self, registry: &Registry) -> Diagnostics {
        let mut ctx = ModuleContext::new(&self.name, registry);
        let mut diagnostics = Diagnostics::new();

        for item in &self.items {
            item::declare(item, &mut ctx, &mut diagnostics);
        }
        for item in &self.items {
            item::check(item, &ctx, &mut diagnostics);
        }

        diagnostics.sort();
        diagnostics
    }
}
