//! Repetition, separated lists, and operator-chain folding.

use super::{Input, Parser, ParseFailure, ParseResult, Position};

/// Zero or more applications of `parser`. Stops at the first failure, or at
/// the first zero-width success (which would otherwise never terminate).
pub fn many0<'src, P>(parser: P) -> impl Parser<'src, Output = Vec<P::Output>>
where
    P: Parser<'src>,
{
    move |input: Input<'src>| {
        let mut items = Vec::new();
        let mut current = input;
        while let Ok((rest, value)) = parser.parse(current) {
            if rest.offset() == current.offset() {
                break;
            }
            items.push(value);
            current = rest;
        }
        Ok((current, items))
    }
}

/// One or more applications of `parser`.
pub fn many1<'src, P>(parser: P, description: &'static str) -> impl Parser<'src, Output = Vec<P::Output>>
where
    P: Parser<'src>,
{
    move |input: Input<'src>| {
        let (mut current, first) = parser
            .parse(input)
            .map_err(|failure| failure.expecting(description))?;
        let mut items = vec![first];
        while let Ok((rest, value)) = parser.parse(current) {
            if rest.offset() == current.offset() {
                break;
            }
            items.push(value);
            current = rest;
        }
        Ok((current, items))
    }
}

/// Zero or more `parser` separated by `separator`. A trailing separator is
/// not consumed: when an element fails after a separator, both are backed
/// out and the list ends before that separator.
pub fn delimited0<'src, P, S>(
    parser: P,
    separator: S,
    description: &'static str,
) -> impl Parser<'src, Output = Vec<P::Output>>
where
    P: Parser<'src>,
    S: Parser<'src>,
{
    let inner = delimited_m_n(0, None, parser, separator, description);
    move |input: Input<'src>| inner.parse(input)
}

/// One or more `parser` separated by `separator`.
pub fn delimited1<'src, P, S>(
    parser: P,
    separator: S,
    description: &'static str,
) -> impl Parser<'src, Output = Vec<P::Output>>
where
    P: Parser<'src>,
    S: Parser<'src>,
{
    let inner = delimited_m_n(1, None, parser, separator, description);
    move |input: Input<'src>| inner.parse(input)
}

/// Between `min` and `max` (inclusive, `None` = unbounded) occurrences of
/// `parser` separated by `separator`.
pub fn delimited_m_n<'src, P, S>(
    min: usize,
    max: Option<usize>,
    parser: P,
    separator: S,
    description: &'static str,
) -> impl Parser<'src, Output = Vec<P::Output>>
where
    P: Parser<'src>,
    S: Parser<'src>,
{
    move |input: Input<'src>| {
        let mut items = Vec::new();
        let mut current = input;
        match parser.parse(current) {
            Ok((rest, value)) => {
                items.push(value);
                current = rest;
            }
            Err(failure) => {
                if min > 0 {
                    return Err(failure.expecting(description));
                }
                return Ok((current, items));
            }
        }
        while max.is_none_or(|max| items.len() < max) {
            let Ok((after_separator, _)) = separator.parse(current) else {
                break;
            };
            match parser.parse(after_separator) {
                Ok((rest, value)) => {
                    items.push(value);
                    current = rest;
                }
                Err(_) => break,
            }
        }
        if items.len() < min {
            return Err(ParseFailure::new(description, current));
        }
        Ok((current, items))
    }
}

/// Elements separated by `separator`, repeated until `terminator` succeeds.
/// An element failure before the terminator propagates as-is.
pub fn delimited_until<'src, P, S, E>(
    parser: P,
    separator: S,
    terminator: E,
    description: &'static str,
) -> impl Parser<'src, Output = Vec<P::Output>>
where
    P: Parser<'src>,
    S: Parser<'src>,
    E: Parser<'src>,
{
    move |input: Input<'src>| {
        separated_until(&parser, &separator, &terminator, description, None, input)
    }
}

/// Like [`delimited_until`], but an element (or separator) failure before the
/// terminator is handed to `recover`, which produces a placeholder element
/// plus the cursor to resume from. This is the hook the grammar uses to turn
/// malformed block fragments into error nodes and keep going.
///
/// Termination: a recovery that makes no progress is tolerated once per
/// position (the terminator may match right there); the second stall at the
/// same position aborts with the terminator's own failure.
pub fn delimited_until_recover<'src, P, S, E, R>(
    parser: P,
    separator: S,
    terminator: E,
    description: &'static str,
    recover: R,
) -> impl Parser<'src, Output = Vec<P::Output>>
where
    P: Parser<'src>,
    S: Parser<'src>,
    E: Parser<'src>,
    R: Fn(ParseFailure<'src>) -> (Input<'src>, P::Output),
{
    move |input: Input<'src>| {
        separated_until(
            &parser,
            &separator,
            &terminator,
            description,
            Some(&recover),
            input,
        )
    }
}

fn separated_until<'src, P, S, E>(
    parser: &P,
    separator: &S,
    terminator: &E,
    description: &'static str,
    recover: Option<&dyn Fn(ParseFailure<'src>) -> (Input<'src>, P::Output)>,
    input: Input<'src>,
) -> ParseResult<'src, Vec<P::Output>>
where
    P: Parser<'src>,
    S: Parser<'src>,
    E: Parser<'src>,
{
    // The separator is required between parsed elements, but merely optional
    // right after a recovery: the recovery may already have swallowed it.
    enum Separator {
        NotYet,
        Required,
        Optional,
    }

    let mut items = Vec::new();
    let mut current = input;
    let mut state = Separator::NotYet;
    let mut stalled_at: Option<usize> = None;

    loop {
        if let Ok((rest, _)) = terminator.parse(current) {
            return Ok((rest, items));
        }

        match state {
            Separator::NotYet => {}
            Separator::Required => match separator.parse(current) {
                Ok((rest, _)) => {
                    current = rest;
                    if let Ok((rest, _)) = terminator.parse(current) {
                        return Ok((rest, items));
                    }
                }
                Err(failure) => {
                    let Some(recover) = recover else {
                        return Err(failure);
                    };
                    current = recover_step(
                        recover,
                        failure,
                        current,
                        &mut items,
                        &mut stalled_at,
                        terminator,
                    )?;
                    state = Separator::Optional;
                    continue;
                }
            },
            Separator::Optional => {
                if let Ok((rest, _)) = separator.parse(current) {
                    current = rest;
                    if let Ok((rest, _)) = terminator.parse(current) {
                        return Ok((rest, items));
                    }
                }
            }
        }

        match parser.parse(current) {
            Ok((rest, value)) => {
                if rest.offset() == current.offset() {
                    return Err(ParseFailure::new(description, current));
                }
                items.push(value);
                current = rest;
                state = Separator::Required;
            }
            Err(failure) => {
                let failure = if failure.position().offset == current.offset() {
                    failure.expecting(description)
                } else {
                    failure
                };
                let Some(recover) = recover else {
                    return Err(failure);
                };
                current = recover_step(
                    recover,
                    failure,
                    current,
                    &mut items,
                    &mut stalled_at,
                    terminator,
                )?;
                state = Separator::Optional;
            }
        }
    }
}

fn recover_step<'src, T, E>(
    recover: &dyn Fn(ParseFailure<'src>) -> (Input<'src>, T),
    failure: ParseFailure<'src>,
    current: Input<'src>,
    items: &mut Vec<T>,
    stalled_at: &mut Option<usize>,
    terminator: &E,
) -> Result<Input<'src>, ParseFailure<'src>>
where
    E: Parser<'src>,
{
    let before = current.offset();
    let (rest, value) = recover(failure);
    items.push(value);
    if rest.offset() == before {
        if *stalled_at == Some(before) {
            // Two stalls at one position: give up with the terminator's failure
            // so the caller sees "expected `}`" rather than looping forever.
            return match terminator.parse(rest) {
                Ok(_) => Ok(rest),
                Err(failure) => Err(failure),
            };
        }
        *stalled_at = Some(before);
    }
    Ok(rest)
}

/// Parse one operand, then fold zero or more suffixes onto it left-to-right.
/// The combiner receives the start of the whole chain and the end of the
/// suffix just folded, so postfix expressions span their full extent.
pub fn fold0<'src, P, S, F, T>(operand: P, suffix: S, combine: F) -> impl Parser<'src, Output = T>
where
    P: Parser<'src, Output = T>,
    S: Parser<'src>,
    F: Fn(T, S::Output, Position, Position) -> T,
{
    move |input: Input<'src>| {
        let start = input.position();
        let (mut current, mut value) = operand.parse(input)?;
        loop {
            match suffix.parse(current) {
                Ok((rest, suffix_value)) => {
                    if rest.offset() == current.offset() {
                        break;
                    }
                    value = combine(value, suffix_value, start, rest.position());
                    current = rest;
                }
                Err(_) => break,
            }
        }
        Ok((current, value))
    }
}

/// Left-associative binary-operator chaining: one operand, then repeated
/// `(operator, operand)` pairs folded as they appear. Every precedence level
/// of the expression grammar is one `chain` over the next-tighter level.
///
/// A dangling operator (operator matches, right operand does not) is backed
/// out entirely; the chain ends before the operator.
pub fn chain<'src, P, O, F, T>(operand: P, operator: O, combine: F) -> impl Parser<'src, Output = T>
where
    P: Parser<'src, Output = T>,
    O: Parser<'src>,
    F: Fn(T, O::Output, T, Position, Position) -> T,
{
    move |input: Input<'src>| {
        let start = input.position();
        let (mut current, mut left) = operand.parse(input)?;
        loop {
            let Ok((after_operator, op)) = operator.parse(current) else {
                break;
            };
            match operand.parse(after_operator) {
                Ok((rest, right)) => {
                    left = combine(left, op, right, start, rest.position());
                    current = rest;
                }
                Err(_) => break,
            }
        }
        Ok((current, left))
    }
}
