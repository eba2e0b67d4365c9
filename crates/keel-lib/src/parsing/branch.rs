//! Alternation.

use super::{Input, Parser, ParseFailure, ParseResult};

/// Homogeneous-output parser tuples tried in order from the same cursor.
///
/// The first success wins. When every branch fails, the reported failure is
/// the one that advanced furthest into the input, not simply the last one —
/// the deepest failure is almost always the most useful diagnostic.
pub trait Alternative<'src> {
    type Output;

    fn choice(&self, input: Input<'src>) -> ParseResult<'src, Self::Output>;
}

macro_rules! impl_alternative {
    ($($parser:ident),+) => {
        impl<'src, Out, $($parser),+> Alternative<'src> for ($($parser,)+)
        where
            $($parser: Parser<'src, Output = Out>),+
        {
            type Output = Out;

            fn choice(&self, input: Input<'src>) -> ParseResult<'src, Out> {
                #[allow(non_snake_case)]
                let ($($parser,)+) = self;
                let mut best: Option<ParseFailure<'src>> = None;
                $(
                    match $parser.parse(input) {
                        Ok(success) => return Ok(success),
                        Err(failure) => {
                            best = Some(match best {
                                Some(prev) => prev.furthest(failure),
                                None => failure,
                            });
                        }
                    }
                )+
                Err(best.expect("alternative tuples are non-empty"))
            }
        }
    };
}

impl_alternative!(P1, P2);
impl_alternative!(P1, P2, P3);
impl_alternative!(P1, P2, P3, P4);
impl_alternative!(P1, P2, P3, P4, P5);
impl_alternative!(P1, P2, P3, P4, P5, P6);
impl_alternative!(P1, P2, P3, P4, P5, P6, P7);
impl_alternative!(P1, P2, P3, P4, P5, P6, P7, P8);
impl_alternative!(P1, P2, P3, P4, P5, P6, P7, P8, P9);
impl_alternative!(P1, P2, P3, P4, P5, P6, P7, P8, P9, P10);
impl_alternative!(P1, P2, P3, P4, P5, P6, P7, P8, P9, P10, P11);
impl_alternative!(P1, P2, P3, P4, P5, P6, P7, P8, P9, P10, P11, P12);

/// Try each parser of the tuple in order from the original cursor.
pub fn alt<'src, A>(alternatives: A) -> impl Parser<'src, Output = A::Output>
where
    A: Alternative<'src>,
{
    move |input: Input<'src>| alternatives.choice(input)
}
