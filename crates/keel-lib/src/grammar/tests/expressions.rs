use indoc::indoc;

use crate::ast::{Expression, NodeRef};

use super::helpers::{expr_snapshot, parse_expr};

#[test]
fn multiplication_binds_tighter_than_addition() {
    assert_eq!(
        expr_snapshot("1 + 2 * 3"),
        indoc! {"
            Binary +
              Int 1
              Binary *
                Int 2
                Int 3
        "}
    );
}

#[test]
fn range_binds_looser_than_additive() {
    assert_eq!(
        expr_snapshot("1 .. 2 + 3"),
        indoc! {"
            Range ..
              Int 1
              Binary +
                Int 2
                Int 3
        "}
    );
}

#[test]
fn inclusive_range() {
    assert_eq!(
        expr_snapshot("0...5"),
        indoc! {"
            Range ...
              Int 0
              Int 5
        "}
    );
}

#[test]
fn assignment_target_chain() {
    // All but the last suffix build a read chain; the last one becomes the
    // assignment form.
    assert_eq!(
        expr_snapshot("a.b[0] += 1"),
        indoc! {"
            IndexAssign +=
              FieldGet b
                Variable a
              Int 0
              Int 1
        "}
    );
}

#[test]
fn plain_assignment_does_not_shadow_comparison() {
    assert_eq!(
        expr_snapshot("a == b"),
        indoc! {"
            Binary ==
              Variable a
              Variable b
        "}
    );
}

#[test]
fn unary_applies_to_suffixed_term() {
    assert_eq!(
        expr_snapshot("-x.y"),
        indoc! {"
            Unary -
              FieldGet y
                Variable x
        "}
    );
}

#[test]
fn method_call_then_field() {
    assert_eq!(
        expr_snapshot("a.b(1).c"),
        indoc! {"
            FieldGet c
              MethodCall b
                Variable a
                Int 1
        "}
    );
}

#[test]
fn unwrap_suffix() {
    assert_eq!(
        expr_snapshot("value?"),
        indoc! {"
            Unwrap
              Variable value
        "}
    );
}

#[test]
fn lambda_with_typed_parameter() {
    assert_eq!(
        expr_snapshot("fn (x : int) -> x + 1"),
        indoc! {"
            Lambda (x)
              Binary +
                Variable x
                Int 1
        "}
    );
}

#[test]
fn if_then_else() {
    assert_eq!(
        expr_snapshot("if (flag) 1 else 2"),
        indoc! {"
            If
              Variable flag
              Int 1
              Int 2
        "}
    );
}

#[test]
fn while_with_compound_assignment_body() {
    // Loops are block items, not free expressions.
    assert_eq!(
        expr_snapshot("{ while (go) n += 1 }"),
        indoc! {"
            Block
              While
                Variable go
                Assign n +=
                  Int 1
        "}
    );
}

#[test]
fn for_in_with_tuple_deconstruction() {
    assert_eq!(
        expr_snapshot("{ for ((a, b) in pairs) a }"),
        indoc! {"
            Block
              ForIn (a, b)
                Variable pairs
                Variable a
        "}
    );
}

#[test]
fn parenthesized_expression_is_not_a_tuple() {
    assert_eq!(expr_snapshot("(1)"), "Int 1\n");
    assert_eq!(
        expr_snapshot("(1, 2)"),
        indoc! {"
            Tuple
              Int 1
              Int 2
        "}
    );
}

#[test]
fn record_construction() {
    assert_eq!(
        expr_snapshot("(x: 1, y: 2)"),
        indoc! {"
            Record
              Field x
                Int 1
              Field y
                Int 2
        "}
    );
}

#[test]
fn array_with_element_type_hint() {
    assert_eq!(
        expr_snapshot("<int>[1, 2]"),
        indoc! {"
            Array
              Int 1
              Int 2
        "}
    );
}

#[test]
fn block_with_declaration_and_value() {
    assert_eq!(
        expr_snapshot("{ let x = 1 x }"),
        indoc! {"
            Block
              Let x
                Int 1
              Variable x
        "}
    );
}

#[test]
fn tuple_deconstruct_assignment() {
    assert_eq!(
        expr_snapshot("(a, _, c) = f()"),
        indoc! {"
            TupleAssign (a, _, c)
              Call f
        "}
    );
}

#[test]
fn unapply_pattern() {
    assert_eq!(
        expr_snapshot("Some(x) = opt"),
        indoc! {"
            Unapply Some(x)
              Variable opt
        "}
    );
}

#[test]
fn boolean_operators_fold_left() {
    assert_eq!(
        expr_snapshot("a && b || c"),
        indoc! {"
            BinaryBool ||
              BinaryBool &&
                Variable a
                Variable b
              Variable c
        "}
    );
}

#[test]
fn comparison_chains_left_associatively() {
    assert_eq!(
        expr_snapshot("1 < 2 == true"),
        indoc! {"
            Binary ==
              Binary <
                Int 1
                Int 2
              Bool true
        "}
    );
}

#[test]
fn qualified_path_reference() {
    assert_eq!(expr_snapshot("nav::core::speed"), "Variable nav::core::speed\n");
}

#[test]
fn integer_literal_formats() {
    assert!(matches!(
        parse_expr("0xff"),
        Expression::LiteralInt { value: 255, .. }
    ));
    assert!(matches!(
        parse_expr("0b1010"),
        Expression::LiteralInt { value: 10, .. }
    ));
    assert!(matches!(
        parse_expr("1_000_000"),
        Expression::LiteralInt { value: 1_000_000, .. }
    ));
}

#[test]
fn float_literals_leave_ranges_alone() {
    assert!(matches!(
        parse_expr("2.5e2"),
        Expression::LiteralFloat { value, .. } if value == 250.0
    ));
    assert!(matches!(
        parse_expr("80_000.0"),
        Expression::LiteralFloat { value, .. } if value == 80_000.0
    ));
    // `1..2` must stay a range over integers, not parse `1.` as a float.
    assert!(matches!(parse_expr("1..2"), Expression::RangeCreate { .. }));
}

#[test]
fn string_escapes_decode() {
    assert!(matches!(
        parse_expr(r#""a\tb\n""#),
        Expression::LiteralString { value, .. } if value == "a\tb\n"
    ));
}

#[test]
fn parsing_is_deterministic() {
    let source = "{ let x = f(1, 2) x.field[3] + 4 }";
    assert_eq!(expr_snapshot(source), expr_snapshot(source));
}

#[test]
fn spans_are_ordered_and_contained() {
    let expr = parse_expr("1 + 2 * 3");
    let root = expr.span();
    assert_eq!(root.start.offset, 0);
    assert_eq!(root.end.offset, 9);
    expr.visit(&mut |node: NodeRef<'_>| {
        let span = node.span();
        assert!(span.start.offset <= span.end.offset);
        assert!(root.contains(span));
    });

    let Expression::Binary { right, .. } = &expr else {
        panic!("expected binary root");
    };
    // The nested multiplication spans exactly `2 * 3`.
    assert_eq!(right.span().start.offset, 4);
    assert_eq!(right.span().end.offset, 9);
    assert!(expr.span().contains(right.span()));
}
