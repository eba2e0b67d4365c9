use crate::ast::{format_expression, format_module, Expression, ModuleNode};
use crate::grammar::expression::expression;
use crate::grammar::parse_module;
use crate::parsing::Input;

/// Parse a standalone expression, requiring the whole input to be consumed.
pub fn parse_expr(source: &str) -> Expression {
    let (rest, expr) = expression(Input::new(source)).expect("expression should parse");
    assert!(
        rest.at_end(),
        "unparsed input after expression: {:?}",
        rest.rest()
    );
    expr
}

pub fn expr_snapshot(source: &str) -> String {
    format_expression(&parse_expr(source))
}

pub fn parse(source: &str) -> ModuleNode {
    parse_module("test", source)
}

pub fn module_snapshot(source: &str) -> String {
    format_module(&parse(source))
}
