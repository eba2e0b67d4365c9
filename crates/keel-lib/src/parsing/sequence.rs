//! Sequential composition.

use super::{Input, Parser, ParseResult};

/// Heterogeneous parser tuples that run in order, threading the cursor.
/// Any failure propagates immediately; there are no partial results.
pub trait Sequence<'src> {
    type Output;

    fn run(&self, input: Input<'src>) -> ParseResult<'src, Self::Output>;
}

macro_rules! impl_sequence {
    ($(($parser:ident, $value:ident)),+) => {
        impl<'src, $($parser),+> Sequence<'src> for ($($parser,)+)
        where
            $($parser: Parser<'src>),+
        {
            type Output = ($($parser::Output,)+);

            fn run(&self, input: Input<'src>) -> ParseResult<'src, Self::Output> {
                #[allow(non_snake_case)]
                let ($($parser,)+) = self;
                $(let (input, $value) = $parser.parse(input)?;)+
                Ok((input, ($($value,)+)))
            }
        }
    };
}

impl_sequence!((P1, v1), (P2, v2));
impl_sequence!((P1, v1), (P2, v2), (P3, v3));
impl_sequence!((P1, v1), (P2, v2), (P3, v3), (P4, v4));
impl_sequence!((P1, v1), (P2, v2), (P3, v3), (P4, v4), (P5, v5));
impl_sequence!((P1, v1), (P2, v2), (P3, v3), (P4, v4), (P5, v5), (P6, v6));
impl_sequence!((P1, v1), (P2, v2), (P3, v3), (P4, v4), (P5, v5), (P6, v6), (P7, v7));
impl_sequence!(
    (P1, v1),
    (P2, v2),
    (P3, v3),
    (P4, v4),
    (P5, v5),
    (P6, v6),
    (P7, v7),
    (P8, v8)
);

/// Run every parser of the tuple in order, producing a tuple of their values.
pub fn seq<'src, S>(parsers: S) -> impl Parser<'src, Output = S::Output>
where
    S: Sequence<'src>,
{
    move |input: Input<'src>| parsers.run(input)
}

/// Both parsers in order, keeping both values.
pub fn pair<'src, P1, P2>(first: P1, second: P2) -> impl Parser<'src, Output = (P1::Output, P2::Output)>
where
    P1: Parser<'src>,
    P2: Parser<'src>,
{
    move |input: Input<'src>| {
        let (rest, a) = first.parse(input)?;
        let (rest, b) = second.parse(rest)?;
        Ok((rest, (a, b)))
    }
}

/// Both parsers in order, keeping only the second value.
pub fn preceded<'src, P1, P2>(first: P1, second: P2) -> impl Parser<'src, Output = P2::Output>
where
    P1: Parser<'src>,
    P2: Parser<'src>,
{
    move |input: Input<'src>| {
        let (rest, _) = first.parse(input)?;
        second.parse(rest)
    }
}

/// Both parsers in order, keeping only the first value.
pub fn terminated<'src, P1, P2>(first: P1, second: P2) -> impl Parser<'src, Output = P1::Output>
where
    P1: Parser<'src>,
    P2: Parser<'src>,
{
    move |input: Input<'src>| {
        let (rest, value) = first.parse(input)?;
        let (rest, _) = second.parse(rest)?;
        Ok((rest, value))
    }
}

/// `left`, then `middle`, then `right`, keeping the middle value.
pub fn between<'src, L, M, R>(left: L, middle: M, right: R) -> impl Parser<'src, Output = M::Output>
where
    L: Parser<'src>,
    M: Parser<'src>,
    R: Parser<'src>,
{
    move |input: Input<'src>| {
        let (rest, _) = left.parse(input)?;
        let (rest, value) = middle.parse(rest)?;
        let (rest, _) = right.parse(rest)?;
        Ok((rest, value))
    }
}
