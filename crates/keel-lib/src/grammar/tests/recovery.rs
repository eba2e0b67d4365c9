use indoc::indoc;

use crate::ast::{BlockItem, Expression, ModuleItem};

use super::helpers::{parse, parse_expr};

fn block_items(expr: &Expression) -> &[BlockItem] {
    match expr {
        Expression::Block { items, .. } => items,
        other => panic!("expected a block, got {other:?}"),
    }
}

#[test]
fn malformed_fragments_yield_error_nodes_not_failure() {
    let block = parse_expr("{ 1 + ; 2 + ; 3 }");
    let items = block_items(&block);

    let mut ints = Vec::new();
    let mut errors = 0;
    for item in items {
        match item {
            BlockItem::Expression(Expression::LiteralInt { value, .. }) => ints.push(*value),
            BlockItem::Expression(Expression::Error(_)) => errors += 1,
            other => panic!("unexpected block item: {other:?}"),
        }
    }

    // The two malformed fragments produce at least one error node each, and
    // the well-formed items around them survive.
    assert_eq!(ints, vec![1, 2, 3]);
    assert!(errors >= 2, "expected at least 2 error nodes, got {errors}");
}

#[test]
fn error_nodes_carry_the_expected_description() {
    let block = parse_expr("{ @ }");
    let items = block_items(&block);
    assert_eq!(items.len(), 1);
    let BlockItem::Expression(Expression::Error(error)) = &items[0] else {
        panic!("expected an error node");
    };
    assert_eq!(error.expected, "<block item>");
}

#[test]
fn module_level_garbage_recovers_before_next_item() {
    let module = parse(indoc! {"
        @@@

        const X : int = 1
    "});
    assert!(matches!(module.items[0], ModuleItem::Error(_)));
    assert!(module.constant("X").is_some());
    assert_eq!(module.syntax_errors().len(), 1);
}

#[test]
fn errors_survive_inside_function_bodies() {
    let module = parse("sync fn f() -> int = { 1 + ; 3 }");
    assert!(module.function("f").is_some());
    assert!(!module.syntax_errors().is_empty());
}

#[test]
fn unterminated_block_still_produces_a_module() {
    let module = parse("sync fn f() -> int = { 1 +");
    assert!(!module.syntax_errors().is_empty());
}

#[test]
fn pathological_nesting_fails_soft() {
    let mut source = String::from("const X : int = ");
    for _ in 0..400 {
        source.push('(');
    }
    source.push('1');
    for _ in 0..400 {
        source.push(')');
    }
    let module = parse(&source);
    assert!(!module.syntax_errors().is_empty());
}

#[test]
fn error_spans_cover_the_skipped_text() {
    let module = parse("???? const X : int = 1");
    let errors = module.syntax_errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].span.start.offset, 0);
    // The error node swallows the garbage and the whitespace after it.
    assert_eq!(errors[0].span.end.offset, 5);
    assert!(module.constant("X").is_some());
}

#[test]
fn recovery_is_deterministic() {
    let source = "{ 1 + ; 2 + ; 3 }";
    let first = format!("{:?}", parse_expr(source));
    let second = format!("{:?}", parse_expr(source));
    assert_eq!(first, second);
}
