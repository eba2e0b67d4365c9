//! Character-level recognizers the grammar is built from.

use super::{Input, Parser, ParseFailure, ParseResult};

/// Match `expected` literally, yielding the matched slice.
pub fn tag<'src>(expected: &'static str) -> impl Parser<'src, Output = &'src str> {
    move |input: Input<'src>| {
        if input.starts_with(expected) {
            let rest = input.advance(expected.len());
            Ok((rest, &input.rest()[..expected.len()]))
        } else {
            Err(ParseFailure::new(expected, input))
        }
    }
}

/// A single char satisfying `pred`.
pub fn char_matching<'src>(
    pred: impl Fn(char) -> bool,
    description: &'static str,
) -> impl Parser<'src, Output = char> {
    move |input: Input<'src>| match input.peek() {
        Some(ch) if pred(ch) => Ok((input.advance(ch.len_utf8()), ch)),
        _ => Err(ParseFailure::new(description, input)),
    }
}

/// Longest (possibly empty) prefix of chars satisfying `pred`.
pub fn take_while0<'src>(pred: impl Fn(char) -> bool) -> impl Parser<'src, Output = &'src str> {
    move |input: Input<'src>| {
        let matched = input.take_while(&pred);
        Ok((input.advance(matched.len()), matched))
    }
}

/// Longest non-empty prefix of chars satisfying `pred`.
pub fn take_while1<'src>(
    pred: impl Fn(char) -> bool,
    description: &'static str,
) -> impl Parser<'src, Output = &'src str> {
    move |input: Input<'src>| {
        let matched = input.take_while(&pred);
        if matched.is_empty() {
            return Err(ParseFailure::new(description, input));
        }
        Ok((input.advance(matched.len()), matched))
    }
}

fn is_spacing(ch: char) -> bool {
    ch.is_whitespace() && ch != '\n' && ch != '\r'
}

/// Zero or more whitespace chars, line breaks included.
pub fn whitespace0<'src>() -> impl Parser<'src, Output = &'src str> {
    take_while0(char::is_whitespace)
}

/// One or more whitespace chars, line breaks included.
pub fn whitespace1<'src>() -> impl Parser<'src, Output = &'src str> {
    take_while1(char::is_whitespace, "<whitespace>")
}

/// Zero or more whitespace chars on the current line.
pub fn spacing0<'src>() -> impl Parser<'src, Output = &'src str> {
    take_while0(is_spacing)
}

/// One or more whitespace chars on the current line.
pub fn spacing1<'src>() -> impl Parser<'src, Output = &'src str> {
    take_while1(is_spacing, "<spacing>")
}

/// Succeeds only when the input is exhausted.
pub fn eof(input: Input<'_>) -> ParseResult<'_, ()> {
    if input.at_end() {
        Ok((input, ()))
    } else {
        Err(ParseFailure::new("<end of input>", input))
    }
}
