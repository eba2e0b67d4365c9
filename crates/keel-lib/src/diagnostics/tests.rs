use crate::parsing::{Position, Span};

use super::{Diagnostics, Severity};

fn span(start: usize, end: usize) -> Span {
    Span {
        start: Position {
            line: 1,
            column: start as u32 + 1,
            offset: start,
        },
        end: Position {
            line: 1,
            column: end as u32 + 1,
            offset: end,
        },
    }
}

#[test]
fn collects_in_insertion_order() {
    let mut diagnostics = Diagnostics::new();
    diagnostics.error("first", span(5, 6));
    diagnostics.warning("second", span(0, 1));

    let messages: Vec<&str> = diagnostics.iter().map(|d| d.message.as_str()).collect();
    assert_eq!(messages, vec!["first", "second"]);
    assert!(diagnostics.has_errors());
    assert_eq!(diagnostics.error_count(), 1);
}

#[test]
fn sort_orders_by_span_start() {
    let mut diagnostics = Diagnostics::new();
    diagnostics.error("later", span(5, 6));
    diagnostics.error("earlier", span(0, 1));
    diagnostics.sort();

    let messages: Vec<&str> = diagnostics.iter().map(|d| d.message.as_str()).collect();
    assert_eq!(messages, vec!["earlier", "later"]);
}

#[test]
fn plain_format_without_source() {
    let mut diagnostics = Diagnostics::new();
    diagnostics.error("undefined variable `x`", span(0, 1));

    let rendered = diagnostics.printer().render();
    assert_eq!(rendered, "error: undefined variable `x` @ 1:1..1:2\n");
}

#[test]
fn snippet_rendering_points_at_the_span() {
    let source = "const X: int = true";
    let mut diagnostics = Diagnostics::new();
    diagnostics.error("type mismatch: expected int, found bool", span(15, 19));

    let rendered = diagnostics.render(source);
    assert!(rendered.contains("type mismatch: expected int, found bool"));
    assert!(rendered.contains("const X: int = true"));
}

#[test]
fn severities_are_ordered_error_first() {
    assert!(Severity::Error < Severity::Warning);
}
