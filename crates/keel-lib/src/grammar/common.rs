//! Lexical building blocks shared by the item and expression grammars.

use unicode_ident::{is_xid_continue, is_xid_start};

use crate::ast::{
    DeclarationParameter, DeclarationTarget, FunctionParameter, LineComment, TypeRefNode,
};
use crate::parsing::branch::alt;
use crate::parsing::combinator::{map, nested, opt, with_span};
use crate::parsing::multi::{delimited1, delimited_m_n, delimited_until, fold0};
use crate::parsing::recognize::{spacing0, spacing1, tag, take_while0, whitespace0};
use crate::parsing::sequence::{between, pair, preceded, seq, terminated};
use crate::parsing::{Input, ParseFailure, ParseResult, Parser, Span, WithSpan};

use super::expression::expression;

/// Words that can never be identifiers.
const RESERVED: &[&str] = &[
    "as", "break", "const", "continue", "else", "false", "fn", "for", "if", "impl", "in", "let",
    "pub", "return", "sync", "true", "type", "use", "while",
];

/// An unreserved identifier: XID start (or `_`) followed by XID continue
/// chars. A lone `_` is a placeholder, not an identifier.
pub fn identifier(input: Input<'_>) -> ParseResult<'_, String> {
    let rest = input.rest();
    let mut end = 0;
    for (index, ch) in rest.char_indices() {
        let valid = if index == 0 {
            is_xid_start(ch) || ch == '_'
        } else {
            is_xid_continue(ch)
        };
        if !valid {
            break;
        }
        end = index + ch.len_utf8();
    }
    let word = &rest[..end];
    if word.is_empty() || word == "_" || RESERVED.contains(&word) {
        return Err(ParseFailure::new("<identifier>", input));
    }
    Ok((input.advance(end), word.to_string()))
}

/// Match `word` as a whole keyword (not a prefix of a longer identifier).
pub fn keyword<'src>(word: &'static str) -> impl Parser<'src, Output = WithSpan<&'static str>> {
    move |input: Input<'src>| {
        let after = input.rest().strip_prefix(word);
        let followed_by_ident = after
            .and_then(|rest| rest.chars().next())
            .is_some_and(is_xid_continue);
        if after.is_none() || followed_by_ident {
            return Err(ParseFailure::new(word, input));
        }
        let rest = input.advance(word.len());
        Ok((
            rest,
            WithSpan::new(word, Span::new(input.position(), rest.position())),
        ))
    }
}

/// `a::b::c`
pub fn identifier_path(input: Input<'_>) -> ParseResult<'_, Vec<WithSpan<String>>> {
    delimited1(with_span(identifier), tag("::"), "<identifier>").parse(input)
}

pub fn comma_delimiter(input: Input<'_>) -> ParseResult<'_, &str> {
    between(whitespace0(), tag(","), whitespace0()).parse(input)
}

pub fn eq_delimiter(input: Input<'_>) -> ParseResult<'_, &str> {
    between(whitespace0(), tag("="), whitespace0()).parse(input)
}

/// `// ...` to the end of the line.
pub fn line_comment(input: Input<'_>) -> ParseResult<'_, LineComment> {
    map(
        preceded(tag("//"), take_while0(|ch| ch != '\n')),
        |text: &str, start, end| LineComment {
            text: text.to_string(),
            span: Span::new(start, end),
        },
    )
    .parse(input)
}

/// `: type` annotation.
pub fn type_spec(input: Input<'_>) -> ParseResult<'_, TypeRefNode> {
    preceded(between(spacing0(), tag(":"), spacing0()), type_ref).parse(input)
}

/// A type as written in source, with postfix `[]` binding tightest.
pub fn type_ref(input: Input<'_>) -> ParseResult<'_, TypeRefNode> {
    nested(fold0(
        base_type_ref,
        preceded(spacing0(), tag("[]")),
        |element, _, start, end| TypeRefNode::Array {
            element: Box::new(element),
            span: Span::new(start, end),
        },
    ))
    .parse(input)
}

fn base_type_ref(input: Input<'_>) -> ParseResult<'_, TypeRefNode> {
    alt((
        function_type_ref,
        record_type_ref,
        tuple_type_ref,
        named_type_ref,
    ))
    .parse(input)
}

fn function_type_ref(input: Input<'_>) -> ParseResult<'_, TypeRefNode> {
    map(
        seq((
            opt(terminated(keyword("sync"), spacing1())),
            keyword("fn"),
            preceded(
                preceded(spacing0(), terminated(tag("("), whitespace0())),
                delimited_until(
                    type_ref,
                    comma_delimiter,
                    preceded(whitespace0(), tag(")")),
                    "<parameter type>",
                ),
            ),
            preceded(between(whitespace0(), tag("->"), whitespace0()), type_ref),
        )),
        |(sync, _, parameters, return_type), start, end| TypeRefNode::Function {
            is_async: sync.is_none(),
            parameters,
            return_type: Box::new(return_type),
            span: Span::new(start, end),
        },
    )
    .parse(input)
}

fn record_type_ref(input: Input<'_>) -> ParseResult<'_, TypeRefNode> {
    map(
        between(
            terminated(tag("("), whitespace0()),
            delimited1(
                pair(with_span(identifier), type_spec),
                comma_delimiter,
                "<record field>",
            ),
            preceded(whitespace0(), tag(")")),
        ),
        |fields, start, end| TypeRefNode::Record {
            fields,
            span: Span::new(start, end),
        },
    )
    .parse(input)
}

fn tuple_type_ref(input: Input<'_>) -> ParseResult<'_, TypeRefNode> {
    map(
        between(
            terminated(tag("("), whitespace0()),
            delimited_m_n(1, None, type_ref, comma_delimiter, "<type>"),
            preceded(whitespace0(), tag(")")),
        ),
        |mut elements, start, end| {
            if elements.len() == 1 {
                // Parenthesized grouping, not a one-element tuple.
                elements.remove(0)
            } else {
                TypeRefNode::Tuple {
                    elements,
                    span: Span::new(start, end),
                }
            }
        },
    )
    .parse(input)
}

fn named_type_ref(input: Input<'_>) -> ParseResult<'_, TypeRefNode> {
    map(
        pair(
            identifier_path,
            opt(preceded(
                spacing0(),
                between(
                    terminated(tag("<"), whitespace0()),
                    delimited1(type_ref, comma_delimiter, "<type argument>"),
                    preceded(whitespace0(), tag(">")),
                ),
            )),
        ),
        |(path, type_args), start, end| TypeRefNode::Named {
            path,
            type_args: type_args.unwrap_or_default(),
            span: Span::new(start, end),
        },
    )
    .parse(input)
}

/// A type declaration's right-hand side: one type, or a `|`-separated union.
pub fn type_def(input: Input<'_>) -> ParseResult<'_, TypeRefNode> {
    map(
        delimited1(
            type_ref,
            between(whitespace0(), tag("|"), whitespace0()),
            "<type>",
        ),
        |mut variants, start, end| {
            if variants.len() == 1 {
                variants.remove(0)
            } else {
                TypeRefNode::Union {
                    variants,
                    span: Span::new(start, end),
                }
            }
        },
    )
    .parse(input)
}

/// `name (: type)?` in `let`/`const`/`for` heads.
pub fn declaration_parameter(input: Input<'_>) -> ParseResult<'_, DeclarationParameter> {
    map(
        pair(with_span(identifier), opt(type_spec)),
        |(name, ty), _, _| DeclarationParameter { name, ty },
    )
    .parse(input)
}

/// A declaration parameter or the `_` placeholder in deconstructions.
pub fn declaration_target(input: Input<'_>) -> ParseResult<'_, DeclarationTarget> {
    alt((
        map(declaration_parameter, |parameter, _, _| {
            DeclarationTarget::Binding(parameter)
        }),
        map(tag("_"), |_, start, end| {
            DeclarationTarget::Placeholder(Span::new(start, end))
        }),
    ))
    .parse(input)
}

/// `name (: type)? (= default)?` in function signatures.
pub fn function_parameter(input: Input<'_>) -> ParseResult<'_, FunctionParameter> {
    map(
        seq((
            with_span(identifier),
            opt(type_spec),
            opt(preceded(eq_delimiter, expression)),
        )),
        |(name, ty, default), start, end| FunctionParameter {
            name,
            ty,
            default,
            span: Span::new(start, end),
        },
    )
    .parse(input)
}
