//! Builder-pattern printer for rendering diagnostics.

use std::fmt::Write;

use annotate_snippets::{AnnotationKind, Group, Level, Renderer, Snippet};

use super::{Diagnostics, Severity};

/// Renders diagnostics with various options.
///
/// Without a source, diagnostics degrade to one `severity: message @ span`
/// line each; with a source, annotate-snippets draws the offending lines.
pub struct DiagnosticsPrinter<'d, 's> {
    diagnostics: &'d Diagnostics,
    source: Option<&'s str>,
    path: Option<&'s str>,
    colored: bool,
}

impl<'d, 's> DiagnosticsPrinter<'d, 's> {
    pub fn new(diagnostics: &'d Diagnostics) -> Self {
        Self {
            diagnostics,
            source: None,
            path: None,
            colored: false,
        }
    }

    pub fn source(mut self, source: &'s str) -> Self {
        self.source = Some(source);
        self
    }

    pub fn path(mut self, path: &'s str) -> Self {
        self.path = Some(path);
        self
    }

    pub fn colored(mut self, value: bool) -> Self {
        self.colored = value;
        self
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        self.format(&mut out).expect("String write never fails");
        out
    }

    pub fn format(&self, w: &mut impl Write) -> std::fmt::Result {
        let Some(source) = self.source else {
            return self.format_plain(w);
        };

        if self.diagnostics.is_empty() {
            return Ok(());
        }

        let renderer = if self.colored {
            Renderer::styled()
        } else {
            Renderer::plain()
        };

        for (i, diagnostic) in self.diagnostics.iter().enumerate() {
            let range = adjust_range(diagnostic.span.byte_range(), source.len());

            let mut snippet = Snippet::source(source).line_start(1).annotation(
                AnnotationKind::Primary
                    .span(range)
                    .label(&diagnostic.message),
            );

            if let Some(p) = self.path {
                snippet = snippet.path(p);
            }

            let level = severity_to_level(diagnostic.severity);
            let report: Vec<Group> = vec![level.primary_title(&diagnostic.message).element(snippet)];

            if i > 0 {
                writeln!(w)?;
            }
            write!(w, "{}", renderer.render(&report))?;
        }

        Ok(())
    }

    fn format_plain(&self, w: &mut impl Write) -> std::fmt::Result {
        for diagnostic in self.diagnostics.iter() {
            let severity = match diagnostic.severity {
                Severity::Error => "error",
                Severity::Warning => "warning",
            };
            writeln!(
                w,
                "{severity}: {} @ {}",
                diagnostic.message, diagnostic.span
            )?;
        }
        Ok(())
    }
}

fn severity_to_level(severity: Severity) -> Level<'static> {
    match severity {
        Severity::Error => Level::ERROR,
        Severity::Warning => Level::WARNING,
    }
}

/// Clamp a byte range to the source and widen zero-width spans to one char
/// so the caret stays visible.
fn adjust_range(range: std::ops::Range<usize>, source_len: usize) -> std::ops::Range<usize> {
    let start = range.start.min(source_len);
    let end = range.end.min(source_len);
    if start == end {
        start..(start + 1).min(source_len)
    } else {
        start..end
    }
}
