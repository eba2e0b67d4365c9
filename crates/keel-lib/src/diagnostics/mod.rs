//! Diagnostic collection and rendering.
//!
//! Parse failures (surfaced through error nodes) and validation errors end
//! up in one ordered [`Diagnostics`] list; nothing in the pipeline throws.

mod printer;

#[cfg(test)]
mod tests;

pub use printer::DiagnosticsPrinter;

use crate::parsing::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Serialize)]
pub enum Severity {
    Error,
    Warning,
}

/// A single reported problem, anchored to the smallest enclosing span.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Diagnostic {
    pub span: Span,
    pub severity: Severity,
    pub message: String,
}

impl Diagnostic {
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Ordered list of diagnostics for one analysis run.
///
/// Later entries never suppress earlier ones; everything found in both
/// validation passes is collected and reported together.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    messages: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Diagnostics::default()
    }

    pub fn error(&mut self, message: impl Into<String>, span: Span) {
        self.messages.push(Diagnostic {
            span,
            severity: Severity::Error,
            message: message.into(),
        });
    }

    pub fn warning(&mut self, message: impl Into<String>, span: Span) {
        self.messages.push(Diagnostic {
            span,
            severity: Severity::Warning,
            message: message.into(),
        });
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.messages.extend(other.messages);
    }

    /// Order by source position, keeping insertion order within ties.
    pub fn sort(&mut self) {
        self.messages
            .sort_by_key(|diagnostic| (diagnostic.span.start.offset, diagnostic.span.end.offset));
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.messages.iter()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        self.messages.iter().any(Diagnostic::is_error)
    }

    pub fn error_count(&self) -> usize {
        self.messages.iter().filter(|d| d.is_error()).count()
    }

    pub fn printer(&self) -> DiagnosticsPrinter<'_, '_> {
        DiagnosticsPrinter::new(self)
    }

    /// Plain-text rendering against `source`.
    pub fn render(&self, source: &str) -> String {
        self.printer().source(source).render()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}
