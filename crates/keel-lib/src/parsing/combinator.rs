//! Single-parser adapters.

use super::{Input, Parser, Position, Span, WithSpan};

/// Apply `f` to the parsed value. `f` also receives the start and end
/// positions spanning the matched input, which is how every AST node gets
/// its span stamped.
pub fn map<'src, P, F, U>(parser: P, f: F) -> impl Parser<'src, Output = U>
where
    P: Parser<'src>,
    F: Fn(P::Output, Position, Position) -> U,
{
    move |input: Input<'src>| {
        let start = input.position();
        let (rest, value) = parser.parse(input)?;
        Ok((rest, f(value, start, rest.position())))
    }
}

/// Success with `None` when the inner parser fails; never itself fails.
pub fn opt<'src, P>(parser: P) -> impl Parser<'src, Output = Option<P::Output>>
where
    P: Parser<'src>,
{
    move |input: Input<'src>| match parser.parse(input) {
        Ok((rest, value)) => Ok((rest, Some(value))),
        Err(_) => Ok((input, None)),
    }
}

/// Discard the parsed value and yield a clone of `value` instead.
pub fn recognize_as<'src, P, T>(parser: P, value: T) -> impl Parser<'src, Output = T>
where
    P: Parser<'src>,
    T: Clone,
{
    move |input: Input<'src>| {
        let (rest, _) = parser.parse(input)?;
        Ok((rest, value.clone()))
    }
}

/// Count the inner parser as one nesting level, failing past
/// [`super::MAX_DEPTH`]. Wrapped around the recursive entry points of a
/// grammar so adversarial nesting cannot overflow the stack.
pub fn nested<'src, P>(parser: P) -> impl Parser<'src, Output = P::Output>
where
    P: Parser<'src>,
{
    move |input: Input<'src>| {
        let inner = input.descend()?;
        let (rest, value) = parser.parse(inner)?;
        Ok((rest.ascend(), value))
    }
}

/// Wrap the parsed value together with the span it was matched from.
pub fn with_span<'src, P>(parser: P) -> impl Parser<'src, Output = WithSpan<P::Output>>
where
    P: Parser<'src>,
{
    move |input: Input<'src>| {
        let start = input.position();
        let (rest, value) = parser.parse(input)?;
        Ok((rest, WithSpan::new(value, Span::new(start, rest.position()))))
    }
}
