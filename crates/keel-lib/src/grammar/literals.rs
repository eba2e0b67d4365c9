//! Literal parsers. These scan manually rather than through the combinators:
//! numeric literals need one-pass disambiguation against range syntax
//! (`1..2` contains no float) and strings need escape decoding.

use crate::ast::Expression;
use crate::parsing::branch::alt;
use crate::parsing::combinator::map;
use crate::parsing::{Input, ParseFailure, ParseResult, Parser, Span};

use super::common::keyword;

pub fn literal_bool(input: Input<'_>) -> ParseResult<'_, Expression> {
    alt((
        map(keyword("true"), |_, start, end| Expression::LiteralBool {
            value: true,
            span: Span::new(start, end),
        }),
        map(keyword("false"), |_, start, end| Expression::LiteralBool {
            value: false,
            span: Span::new(start, end),
        }),
    ))
    .parse(input)
}

fn decimal_digits(text: &str) -> usize {
    let mut len = 0;
    for ch in text.chars() {
        if ch.is_ascii_digit() || (ch == '_' && len > 0) {
            len += 1;
        } else {
            break;
        }
    }
    len
}

/// Integer literal: decimal with optional `_` separators, or `0x`/`0o`/`0b`.
pub fn literal_int(input: Input<'_>) -> ParseResult<'_, Expression> {
    let rest = input.rest();

    for (prefix, radix) in [("0x", 16), ("0o", 8), ("0b", 2)] {
        if let Some(body) = rest.strip_prefix(prefix) {
            let len = body
                .chars()
                .take_while(|ch| ch.is_digit(radix) || *ch == '_')
                .count();
            if len == 0 {
                return Err(ParseFailure::new("<integer literal>", input));
            }
            let digits: String = body[..len].chars().filter(|ch| *ch != '_').collect();
            let Ok(value) = i64::from_str_radix(&digits, radix) else {
                return Err(ParseFailure::new("<integer literal>", input));
            };
            let consumed = prefix.len() + len;
            let rest = input.advance(consumed);
            return Ok((
                rest,
                Expression::LiteralInt {
                    value,
                    span: Span::new(input.position(), rest.position()),
                },
            ));
        }
    }

    let len = decimal_digits(rest);
    if len == 0 {
        return Err(ParseFailure::new("<integer literal>", input));
    }
    let digits: String = rest[..len].chars().filter(|ch| *ch != '_').collect();
    let Ok(value) = digits.parse::<i64>() else {
        return Err(ParseFailure::new("<integer literal>", input));
    };
    let advanced = input.advance(len);
    Ok((
        advanced,
        Expression::LiteralInt {
            value,
            span: Span::new(input.position(), advanced.position()),
        },
    ))
}

/// Float literal: `1.5`, `1_000.5e3`, `2e-4`. A bare `1.` is not a float so
/// that `1..2` stays a range over integers.
pub fn literal_float(input: Input<'_>) -> ParseResult<'_, Expression> {
    let rest = input.rest();
    let int_len = decimal_digits(rest);
    if int_len == 0 {
        return Err(ParseFailure::new("<float literal>", input));
    }

    let mut len = int_len;
    let mut is_float = false;

    if rest[len..].starts_with('.') {
        let frac_len = decimal_digits(&rest[len + 1..]);
        if frac_len == 0 {
            return Err(ParseFailure::new("<float literal>", input));
        }
        len += 1 + frac_len;
        is_float = true;
    }

    let exp_body = &rest[len..];
    if exp_body.starts_with('e') || exp_body.starts_with('E') {
        let mut exp_len = 1;
        if exp_body[exp_len..].starts_with('+') || exp_body[exp_len..].starts_with('-') {
            exp_len += 1;
        }
        let exp_digits = exp_body[exp_len..].chars().take_while(char::is_ascii_digit).count();
        if exp_digits > 0 {
            len += exp_len + exp_digits;
            is_float = true;
        }
    }

    if !is_float {
        return Err(ParseFailure::new("<float literal>", input));
    }

    let digits: String = rest[..len].chars().filter(|ch| *ch != '_').collect();
    let Ok(value) = digits.parse::<f64>() else {
        return Err(ParseFailure::new("<float literal>", input));
    };
    let advanced = input.advance(len);
    Ok((
        advanced,
        Expression::LiteralFloat {
            value,
            span: Span::new(input.position(), advanced.position()),
        },
    ))
}

/// Double-quoted string with `\n \r \t \\ \" \'` escapes.
pub fn literal_string(input: Input<'_>) -> ParseResult<'_, Expression> {
    let rest = input.rest();
    if !rest.starts_with('"') {
        return Err(ParseFailure::new("<string literal>", input));
    }

    let mut value = String::new();
    let mut chars = rest.char_indices().skip(1);
    while let Some((index, ch)) = chars.next() {
        match ch {
            '"' => {
                let advanced = input.advance(index + 1);
                return Ok((
                    advanced,
                    Expression::LiteralString {
                        value,
                        span: Span::new(input.position(), advanced.position()),
                    },
                ));
            }
            '\\' => match chars.next() {
                Some((_, 'n')) => value.push('\n'),
                Some((_, 'r')) => value.push('\r'),
                Some((_, 't')) => value.push('\t'),
                Some((_, '\\')) => value.push('\\'),
                Some((_, '"')) => value.push('"'),
                Some((_, '\'')) => value.push('\''),
                Some((escape_index, _)) => {
                    return Err(ParseFailure::new(
                        "<string escape>",
                        input.advance(escape_index),
                    ));
                }
                None => return Err(ParseFailure::new("<closing \">", input.advance(index))),
            },
            _ => value.push(ch),
        }
    }

    Err(ParseFailure::new("<closing \">", input))
}
