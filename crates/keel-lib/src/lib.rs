//! Keel: parsing and static analysis for a small statically-typed scripting
//! language.
//!
//! The pipeline is text → position-stamped AST → diagnostics plus resolved
//! symbol and type information. It is built to serve both a batch compiler
//! front-end and a live editor: parsing recovers from malformed fragments
//! instead of aborting, validation runs in two passes so declarations may
//! reference each other in any order, and every result is ordinary data —
//! nothing in the pipeline throws.
//!
//! # Example
//!
//! ```
//! use keel_lib::{parse_module, Registry};
//!
//! let module = parse_module("demo", r#"
//!     const GREETING : string = "hello"
//!
//!     pub sync fn shout(message : string) -> string = message + "!"
//! "#);
//! let diagnostics = module.validate(&Registry::new());
//! assert!(diagnostics.is_empty(), "{}", diagnostics.printer().render());
//! ```

pub mod analyze;
pub mod ast;
pub mod diagnostics;
pub mod editor;
pub mod grammar;
pub mod parsing;
pub mod types;

pub use ast::ModuleNode;
pub use diagnostics::{Diagnostic, Diagnostics, DiagnosticsPrinter, Severity};
pub use editor::{SemanticToken, SymbolInfo, TokenKind, Workspace};
pub use grammar::parse_module;
pub use types::{Module, ModuleSignature, Registry, Type};

/// Errors at the library boundary. Analysis itself never fails — malformed
/// source yields diagnostics, not errors — so this covers only host-supplied
/// inputs.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A referenced-module signature table could not be deserialized.
    #[error("invalid module signature table: {0}")]
    InvalidSignatures(#[from] serde_json::Error),
}
