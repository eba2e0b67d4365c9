//! The expression grammar, layered by precedence.
//!
//! Each precedence level is one `chain`/`fold0` over the next-tighter level,
//! from primary terms through postfix suffixes, unary prefixes, the binary
//! operator tower, ranges, comparisons and boolean operators, up to the
//! top-level assignment forms. Blocks recover from malformed items instead
//! of failing, so a broken document still yields a tree.

use crate::ast::{
    AssignOp, AssignTarget, BinaryOp, BlockItem, BoolOp, DeclarationParameter, DeclarationTarget,
    Expression, FunctionParameter, UnaryOp,
};
use crate::parsing::branch::alt;
use crate::parsing::combinator::{map, nested, opt, recognize_as, with_span};
use crate::parsing::multi::{
    chain, delimited0, delimited1, delimited_m_n, delimited_until, delimited_until_recover, fold0,
    many0,
};
use crate::parsing::recognize::{spacing0, tag, whitespace0, whitespace1};
use crate::parsing::sequence::{between, pair, preceded, seq, terminated};
use crate::parsing::{Input, ParseFailure, ParseResult, Parser, Span, WithSpan};

use super::common::{
    comma_delimiter, declaration_parameter, declaration_target, eq_delimiter, identifier,
    identifier_path, keyword, line_comment, type_ref, type_spec,
};
use super::literals::{literal_bool, literal_float, literal_int, literal_string};
use super::recover_error_node;

/// Postfix operations applied left-to-right onto a primary term.
enum Suffix {
    Field(WithSpan<String>),
    Method {
        name: WithSpan<String>,
        args: Vec<Expression>,
    },
    Index(Expression),
    Unwrap,
}

impl Suffix {
    fn into_expression(
        self,
        target: Expression,
        start: crate::parsing::Position,
        end: crate::parsing::Position,
    ) -> Expression {
        let span = Span::new(start, end);
        match self {
            Suffix::Field(field) => Expression::FieldGet {
                target: Box::new(target),
                field,
                span,
            },
            Suffix::Method { name, args } => Expression::MethodCall {
                target: Box::new(target),
                method: name,
                args,
                span,
            },
            Suffix::Index(index) => Expression::IndexGet {
                target: Box::new(target),
                index: Box::new(index),
                span,
            },
            Suffix::Unwrap => Expression::Unwrap {
                target: Box::new(target),
                span,
            },
        }
    }
}

/// Suffixes legal on an assignment's left-hand side. All but the last build
/// a read chain; the last becomes the assignment form itself.
enum AssignSuffix {
    Field(WithSpan<String>),
    Index(Expression),
}

impl AssignSuffix {
    fn into_expression(
        self,
        target: Expression,
        span: Span,
    ) -> Expression {
        match self {
            AssignSuffix::Field(field) => Expression::FieldGet {
                target: Box::new(target),
                field,
                span,
            },
            AssignSuffix::Index(index) => Expression::IndexGet {
                target: Box::new(target),
                index: Box::new(index),
                span,
            },
        }
    }

    fn into_assignment(
        self,
        target: Expression,
        op: AssignOp,
        value: Expression,
        span: Span,
    ) -> Expression {
        match self {
            AssignSuffix::Field(field) => Expression::FieldAssign {
                target: Box::new(target),
                field,
                op,
                value: Box::new(value),
                span,
            },
            AssignSuffix::Index(index) => Expression::IndexAssign {
                target: Box::new(target),
                index: Box::new(index),
                op,
                value: Box::new(value),
                span,
            },
        }
    }
}

fn let_or_const(input: Input<'_>) -> ParseResult<'_, (WithSpan<&'static str>, bool)> {
    alt((
        map(terminated(keyword("let"), whitespace1()), |kw, _, _| {
            (kw, false)
        }),
        map(terminated(keyword("const"), whitespace1()), |kw, _, _| {
            (kw, true)
        }),
    ))
    .parse(input)
}

enum DeclarationHead {
    Single(DeclarationParameter),
    Tuple(Vec<DeclarationTarget>),
}

fn declaration_head(input: Input<'_>) -> ParseResult<'_, DeclarationHead> {
    alt((
        map(declaration_parameter, |parameter, _, _| {
            DeclarationHead::Single(parameter)
        }),
        map(
            between(
                terminated(tag("("), whitespace0()),
                delimited1(declaration_target, comma_delimiter, "<var declaration>"),
                preceded(whitespace0(), tag(")")),
            ),
            |targets, _, _| DeclarationHead::Tuple(targets),
        ),
    ))
    .parse(input)
}

pub fn variable_declaration(input: Input<'_>) -> ParseResult<'_, Expression> {
    map(
        seq((let_or_const, declaration_head, preceded(eq_delimiter, expression))),
        |((keyword, is_const), head, value), start, end| {
            let span = Span::new(start, end);
            match head {
                DeclarationHead::Single(declaration) => Expression::VariableDeclaration {
                    keyword,
                    is_const,
                    declaration,
                    value: Box::new(value),
                    span,
                },
                DeclarationHead::Tuple(declarations) => Expression::TupleDeconstructDeclaration {
                    keyword,
                    is_const,
                    declarations,
                    value: Box::new(value),
                    span,
                },
            }
        },
    )
    .parse(input)
}

pub fn return_expression(input: Input<'_>) -> ParseResult<'_, Expression> {
    map(
        pair(keyword("return"), opt(preceded(spacing0(), expression))),
        |(kw, value), start, end| Expression::Return {
            return_kw: kw.span,
            value: value.map(Box::new),
            span: Span::new(start, end),
        },
    )
    .parse(input)
}

pub fn while_expression(input: Input<'_>) -> ParseResult<'_, Expression> {
    map(
        seq((
            keyword("while"),
            between(
                between(whitespace0(), tag("("), whitespace0()),
                expression,
                preceded(whitespace0(), tag(")")),
            ),
            preceded(whitespace0(), expression),
        )),
        |(kw, condition, body), start, end| Expression::While {
            while_kw: kw.span,
            condition: Box::new(condition),
            body: Box::new(body),
            span: Span::new(start, end),
        },
    )
    .parse(input)
}

pub fn for_in_expression(input: Input<'_>) -> ParseResult<'_, Expression> {
    map(
        seq((
            keyword("for"),
            preceded(between(whitespace0(), tag("("), whitespace0()), declaration_head),
            preceded(whitespace1(), keyword("in")),
            preceded(whitespace1(), expression),
            preceded(
                between(whitespace0(), tag(")"), whitespace0()),
                expression,
            ),
        )),
        |(kw, head, in_kw, source, body), start, end| {
            let span = Span::new(start, end);
            match head {
                DeclarationHead::Single(variable) => Expression::ForIn {
                    for_kw: kw.span,
                    variable,
                    in_kw: in_kw.span,
                    source: Box::new(source),
                    body: Box::new(body),
                    span,
                },
                DeclarationHead::Tuple(variables) => Expression::ForInDeconstruct {
                    for_kw: kw.span,
                    variables,
                    in_kw: in_kw.span,
                    source: Box::new(source),
                    body: Box::new(body),
                    span,
                },
            }
        },
    )
    .parse(input)
}

pub fn break_expression(input: Input<'_>) -> ParseResult<'_, Expression> {
    map(keyword("break"), |_, start, end| Expression::Break {
        span: Span::new(start, end),
    })
    .parse(input)
}

pub fn continue_expression(input: Input<'_>) -> ParseResult<'_, Expression> {
    map(keyword("continue"), |_, start, end| Expression::Continue {
        span: Span::new(start, end),
    })
    .parse(input)
}

fn block_item(input: Input<'_>) -> ParseResult<'_, BlockItem> {
    alt((
        map(expression, |expr, _, _| BlockItem::Expression(expr)),
        map(line_comment, |comment, _, _| BlockItem::Comment(comment)),
        map(variable_declaration, |expr, _, _| {
            BlockItem::Expression(expr)
        }),
        map(return_expression, |expr, _, _| BlockItem::Expression(expr)),
        map(for_in_expression, |expr, _, _| BlockItem::Expression(expr)),
        map(while_expression, |expr, _, _| BlockItem::Expression(expr)),
        map(break_expression, |expr, _, _| BlockItem::Expression(expr)),
        map(continue_expression, |expr, _, _| {
            BlockItem::Expression(expr)
        }),
    ))
    .parse(input)
}

/// Skip to the next whitespace or closing brace, wrap the skipped text in an
/// error node, and resume block-item parsing right after.
fn recover_block_item(failure: ParseFailure<'_>) -> (Input<'_>, BlockItem) {
    let (resume, node) = recover_error_node(failure, true);
    (resume, BlockItem::Expression(Expression::Error(node)))
}

pub fn block(input: Input<'_>) -> ParseResult<'_, Expression> {
    map(
        preceded(
            terminated(tag("{"), whitespace0()),
            delimited_until_recover(
                block_item,
                whitespace1(),
                tag("}"),
                "<block item>",
                recover_block_item,
            ),
        ),
        |items, start, end| Expression::Block {
            items,
            span: Span::new(start, end),
        },
    )
    .parse(input)
}

pub fn call_arguments(input: Input<'_>) -> ParseResult<'_, Vec<Expression>> {
    preceded(
        terminated(tag("("), whitespace0()),
        delimited_until(
            expression,
            comma_delimiter,
            preceded(whitespace0(), tag(")")),
            "<call argument>",
        ),
    )
    .parse(input)
}

fn variable_ref_or_call(input: Input<'_>) -> ParseResult<'_, Expression> {
    map(
        pair(identifier_path, opt(preceded(spacing0(), call_arguments))),
        |(path, args), start, end| {
            let span = Span::new(start, end);
            match args {
                Some(args) => Expression::Call { path, args, span },
                None => Expression::VariableGet { path, span },
            }
        },
    )
    .parse(input)
}

fn tuple_create(input: Input<'_>) -> ParseResult<'_, Expression> {
    map(
        between(
            terminated(tag("("), whitespace0()),
            delimited_m_n(2, None, expression, comma_delimiter, "<expression>"),
            preceded(whitespace0(), tag(")")),
        ),
        |elements, start, end| Expression::TupleCreate {
            elements,
            span: Span::new(start, end),
        },
    )
    .parse(input)
}

fn type_hint(input: Input<'_>) -> ParseResult<'_, crate::ast::TypeRefNode> {
    between(
        terminated(tag("<"), whitespace0()),
        type_ref,
        preceded(whitespace0(), tag(">")),
    )
    .parse(input)
}

fn record_create(input: Input<'_>) -> ParseResult<'_, Expression> {
    map(
        pair(
            opt(type_hint),
            between(
                terminated(tag("("), whitespace0()),
                delimited1(
                    pair(
                        with_span(identifier),
                        preceded(between(spacing0(), tag(":"), spacing0()), expression),
                    ),
                    comma_delimiter,
                    "<record item>",
                ),
                preceded(whitespace0(), tag(")")),
            ),
        ),
        |(declared_type, fields), start, end| Expression::RecordCreate {
            declared_type,
            fields,
            span: Span::new(start, end),
        },
    )
    .parse(input)
}

fn array_create(input: Input<'_>) -> ParseResult<'_, Expression> {
    map(
        pair(
            opt(type_hint),
            preceded(
                terminated(tag("["), whitespace0()),
                delimited_until(
                    expression,
                    comma_delimiter,
                    preceded(whitespace0(), tag("]")),
                    "<expression>",
                ),
            ),
        ),
        |(element_type, elements), start, end| Expression::ArrayCreate {
            element_type,
            elements,
            span: Span::new(start, end),
        },
    )
    .parse(input)
}

fn lambda_parameter(input: Input<'_>) -> ParseResult<'_, FunctionParameter> {
    map(
        pair(with_span(identifier), opt(type_spec)),
        |(name, ty), start, end| FunctionParameter {
            name,
            ty,
            default: None,
            span: Span::new(start, end),
        },
    )
    .parse(input)
}

fn lambda(input: Input<'_>) -> ParseResult<'_, Expression> {
    map(
        seq((
            keyword("fn"),
            preceded(
                spacing0(),
                preceded(
                    terminated(tag("("), whitespace0()),
                    delimited_until(
                        lambda_parameter,
                        comma_delimiter,
                        preceded(whitespace0(), tag(")")),
                        "<lambda parameter>",
                    ),
                ),
            ),
            preceded(between(whitespace0(), tag("->"), whitespace0()), expression),
        )),
        |(kw, parameters, body), start, end| Expression::Lambda {
            fn_kw: kw.span,
            parameters,
            body: Box::new(body),
            span: Span::new(start, end),
        },
    )
    .parse(input)
}

fn bracket_term(input: Input<'_>) -> ParseResult<'_, Expression> {
    between(
        terminated(tag("("), whitespace0()),
        expression,
        preceded(whitespace0(), tag(")")),
    )
    .parse(input)
}

fn term(input: Input<'_>) -> ParseResult<'_, Expression> {
    alt((
        literal_bool,
        literal_float,
        literal_int,
        literal_string,
        bracket_term,
        block,
        array_create,
        tuple_create,
        record_create,
        variable_ref_or_call,
        lambda,
    ))
    .parse(input)
}

fn suffix_op(input: Input<'_>) -> ParseResult<'_, Suffix> {
    alt((
        map(
            pair(
                preceded(
                    between(whitespace0(), tag("."), whitespace0()),
                    with_span(identifier),
                ),
                opt(call_arguments),
            ),
            |(name, args), _, _| match args {
                Some(args) => Suffix::Method { name, args },
                None => Suffix::Field(name),
            },
        ),
        map(
            preceded(
                spacing0(),
                between(
                    terminated(tag("["), whitespace0()),
                    expression,
                    preceded(whitespace0(), tag("]")),
                ),
            ),
            |index, _, _| Suffix::Index(index),
        ),
        map(preceded(spacing0(), tag("?")), |_, _, _| Suffix::Unwrap),
    ))
    .parse(input)
}

fn term_with_suffix(input: Input<'_>) -> ParseResult<'_, Expression> {
    fold0(term, suffix_op, |target, suffix, start, end| {
        suffix.into_expression(target, start, end)
    })
    .parse(input)
}

fn unary_op(input: Input<'_>) -> ParseResult<'_, WithSpan<UnaryOp>> {
    with_span(alt((
        recognize_as(tag("-"), UnaryOp::Neg),
        recognize_as(tag("!"), UnaryOp::Not),
        recognize_as(tag("~"), UnaryOp::BitNot),
    )))
    .parse(input)
}

fn unary_prefix(input: Input<'_>) -> ParseResult<'_, Expression> {
    alt((
        map(
            pair(unary_op, preceded(whitespace0(), term_with_suffix)),
            |(op, right), start, end| Expression::UnaryPrefix {
                op,
                right: Box::new(right),
                span: Span::new(start, end),
            },
        ),
        term_with_suffix,
    ))
    .parse(input)
}

fn combine_binary(
    left: Expression,
    op: WithSpan<BinaryOp>,
    right: Expression,
    start: crate::parsing::Position,
    end: crate::parsing::Position,
) -> Expression {
    Expression::Binary {
        left: Box::new(left),
        op,
        right: Box::new(right),
        span: Span::new(start, end),
    }
}

fn mul_div_op(input: Input<'_>) -> ParseResult<'_, WithSpan<BinaryOp>> {
    between(
        whitespace0(),
        with_span(alt((
            recognize_as(tag("*"), BinaryOp::Mul),
            recognize_as(tag("/"), BinaryOp::Div),
            recognize_as(tag("%"), BinaryOp::Rem),
        ))),
        whitespace0(),
    )
    .parse(input)
}

fn mul_div_expr(input: Input<'_>) -> ParseResult<'_, Expression> {
    chain(unary_prefix, mul_div_op, combine_binary).parse(input)
}

fn add_sub_op(input: Input<'_>) -> ParseResult<'_, WithSpan<BinaryOp>> {
    between(
        whitespace0(),
        with_span(alt((
            recognize_as(tag("+"), BinaryOp::Add),
            recognize_as(tag("-"), BinaryOp::Sub),
        ))),
        whitespace0(),
    )
    .parse(input)
}

fn add_sub_expr(input: Input<'_>) -> ParseResult<'_, Expression> {
    chain(mul_div_expr, add_sub_op, combine_binary).parse(input)
}

fn bit_op(input: Input<'_>) -> ParseResult<'_, WithSpan<BinaryOp>> {
    between(
        whitespace0(),
        with_span(alt((
            recognize_as(tag("&"), BinaryOp::BitAnd),
            recognize_as(tag("|"), BinaryOp::BitOr),
            recognize_as(tag("^"), BinaryOp::BitXor),
        ))),
        whitespace0(),
    )
    .parse(input)
}

fn bit_expr(input: Input<'_>) -> ParseResult<'_, Expression> {
    chain(add_sub_expr, bit_op, combine_binary).parse(input)
}

fn range_create(input: Input<'_>) -> ParseResult<'_, Expression> {
    map(
        pair(
            bit_expr,
            opt(pair(
                preceded(spacing0(), pair(tag(".."), opt(tag(".")))),
                preceded(spacing0(), bit_expr),
            )),
        ),
        |(from, rest), start, end| match rest {
            Some(((_, inclusive_dot), to)) => Expression::RangeCreate {
                from: Box::new(from),
                to: Box::new(to),
                inclusive: inclusive_dot.is_some(),
                span: Span::new(start, end),
            },
            None => from,
        },
    )
    .parse(input)
}

fn unapply_expr(input: Input<'_>) -> ParseResult<'_, Expression> {
    map(
        seq((
            with_span(identifier),
            preceded(
                spacing0(),
                between(
                    terminated(tag("("), spacing0()),
                    delimited0(with_span(identifier), comma_delimiter, "<identifier>"),
                    preceded(spacing0(), tag(")")),
                ),
            ),
            preceded(eq_delimiter, bit_expr),
        )),
        |(pattern, extracted, value), start, end| Expression::Unapply {
            pattern,
            extracted,
            value: Box::new(value),
            span: Span::new(start, end),
        },
    )
    .parse(input)
}

fn compare_op(input: Input<'_>) -> ParseResult<'_, WithSpan<BinaryOp>> {
    between(
        whitespace0(),
        with_span(alt((
            recognize_as(tag("=="), BinaryOp::Eq),
            recognize_as(tag("!="), BinaryOp::Ne),
            recognize_as(tag("<="), BinaryOp::Le),
            recognize_as(tag(">="), BinaryOp::Ge),
            recognize_as(tag("<"), BinaryOp::Lt),
            recognize_as(tag(">"), BinaryOp::Gt),
        ))),
        whitespace0(),
    )
    .parse(input)
}

fn compare_expr(input: Input<'_>) -> ParseResult<'_, Expression> {
    chain(
        alt((unapply_expr, range_create)),
        compare_op,
        combine_binary,
    )
    .parse(input)
}

fn boolean_op(input: Input<'_>) -> ParseResult<'_, WithSpan<BoolOp>> {
    between(
        whitespace0(),
        with_span(alt((
            recognize_as(tag("&&"), BoolOp::And),
            recognize_as(tag("||"), BoolOp::Or),
        ))),
        whitespace0(),
    )
    .parse(input)
}

pub fn boolean_expr(input: Input<'_>) -> ParseResult<'_, Expression> {
    chain(compare_expr, boolean_op, |left, op, right, start, end| {
        Expression::BinaryBool {
            left: Box::new(left),
            op,
            right: Box::new(right),
            span: Span::new(start, end),
        }
    })
    .parse(input)
}

fn if_body(input: Input<'_>) -> ParseResult<'_, Expression> {
    alt((
        expression,
        return_expression,
        break_expression,
        continue_expression,
    ))
    .parse(input)
}

pub fn if_expr(input: Input<'_>) -> ParseResult<'_, Expression> {
    map(
        seq((
            keyword("if"),
            between(
                between(whitespace0(), tag("("), whitespace0()),
                boolean_expr,
                preceded(whitespace0(), tag(")")),
            ),
            preceded(whitespace0(), if_body),
            opt(pair(
                preceded(whitespace1(), keyword("else")),
                preceded(whitespace1(), if_body),
            )),
        )),
        |(if_kw, condition, then_body, else_part), start, end| {
            let (else_kw, else_body) = match else_part {
                Some((kw, body)) => (Some(kw.span), Some(Box::new(body))),
                None => (None, None),
            };
            Expression::If {
                if_kw: if_kw.span,
                condition: Box::new(condition),
                then_body: Box::new(then_body),
                else_kw,
                else_body,
                span: Span::new(start, end),
            }
        },
    )
    .parse(input)
}

fn assign_op(input: Input<'_>) -> ParseResult<'_, AssignOp> {
    between(
        whitespace0(),
        alt((
            recognize_as(tag("="), AssignOp::Assign),
            recognize_as(tag("+="), AssignOp::Add),
            recognize_as(tag("-="), AssignOp::Sub),
            recognize_as(tag("*="), AssignOp::Mul),
            recognize_as(tag("/="), AssignOp::Div),
            recognize_as(tag("%="), AssignOp::Rem),
            recognize_as(tag("|="), AssignOp::BitOr),
            recognize_as(tag("&="), AssignOp::BitAnd),
            recognize_as(tag("^="), AssignOp::BitXor),
        )),
        whitespace0(),
    )
    .parse(input)
}

fn assign_suffix(input: Input<'_>) -> ParseResult<'_, AssignSuffix> {
    alt((
        map(
            preceded(
                between(whitespace0(), tag("."), whitespace0()),
                with_span(identifier),
            ),
            |field, _, _| AssignSuffix::Field(field),
        ),
        map(
            preceded(
                spacing0(),
                between(
                    terminated(tag("["), whitespace0()),
                    expression,
                    preceded(whitespace0(), tag("]")),
                ),
            ),
            |index, _, _| AssignSuffix::Index(index),
        ),
    ))
    .parse(input)
}

fn assignment(input: Input<'_>) -> ParseResult<'_, Expression> {
    map(
        seq((
            with_span(identifier),
            many0(assign_suffix),
            assign_op,
            alt((boolean_expr, if_expr)),
        )),
        |(name, mut suffixes, op, value), start, end| {
            let span = Span::new(start, end);
            if suffixes.is_empty() {
                return Expression::VariableAssign {
                    name,
                    op,
                    value: Box::new(value),
                    span,
                };
            }
            let last = suffixes.pop().expect("non-empty suffix chain");
            let base = Expression::VariableGet {
                path: vec![name],
                span,
            };
            let target = suffixes
                .into_iter()
                .fold(base, |target, suffix| suffix.into_expression(target, span));
            last.into_assignment(target, op, value, span)
        },
    )
    .parse(input)
}

fn source_target(input: Input<'_>) -> ParseResult<'_, AssignTarget> {
    alt((
        map(
            pair(
                with_span(identifier),
                preceded(
                    between(spacing0(), tag("@"), spacing0()),
                    with_span(identifier),
                ),
            ),
            |(field, name), _, _| AssignTarget::Renamed { field, name },
        ),
        map(tag("_"), |_, start, end| {
            AssignTarget::Skip(Span::new(start, end))
        }),
        map(with_span(identifier), |name, _, _| {
            AssignTarget::Variable(name)
        }),
    ))
    .parse(input)
}

fn tuple_deconstruct_assignment(input: Input<'_>) -> ParseResult<'_, Expression> {
    map(
        pair(
            between(
                terminated(tag("("), whitespace0()),
                delimited1(source_target, comma_delimiter, "<tuple target>"),
                preceded(whitespace0(), tag(")")),
            ),
            preceded(eq_delimiter, alt((boolean_expr, if_expr))),
        ),
        |(targets, value), start, end| Expression::TupleDeconstructAssign {
            targets,
            value: Box::new(value),
            span: Span::new(start, end),
        },
    )
    .parse(input)
}

fn top_level_expression(input: Input<'_>) -> ParseResult<'_, Expression> {
    alt((
        tuple_deconstruct_assignment,
        assignment,
        if_expr,
        boolean_expr,
    ))
    .parse(input)
}

/// The full expression grammar. This is the recursive entry point, so it
/// also carries the nesting guard.
pub fn expression(input: Input<'_>) -> ParseResult<'_, Expression> {
    nested(top_level_expression).parse(input)
}
