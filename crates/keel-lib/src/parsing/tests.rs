use super::branch::alt;
use super::combinator::{map, opt, with_span};
use super::multi::{chain, delimited1, delimited_m_n, delimited_until_recover, fold0, many0};
use super::recognize::{tag, take_while1, whitespace1};
use super::sequence::{preceded, seq};
use super::{Input, Parser, ParseResult};

fn digits(input: Input<'_>) -> ParseResult<'_, &str> {
    take_while1(|ch: char| ch.is_ascii_digit(), "<digits>").parse(input)
}

#[test]
fn tag_matches_and_advances() {
    let input = Input::new("let x");
    let (rest, matched) = tag("let").parse(input).unwrap();
    assert_eq!(matched, "let");
    assert_eq!(rest.rest(), " x");
    assert_eq!(rest.position().offset, 3);
    assert_eq!(rest.position().column, 4);
}

#[test]
fn tag_failure_is_data_not_panic() {
    let failure = tag("let").parse(Input::new("fn x")).unwrap_err();
    assert_eq!(failure.expected, "let");
    assert_eq!(failure.position().offset, 0);
}

#[test]
fn advance_tracks_lines_and_columns() {
    let input = Input::new("a\nbc\nd");
    let rest = input.advance(5);
    assert_eq!(rest.position().line, 3);
    assert_eq!(rest.position().column, 1);
    assert_eq!(rest.rest(), "d");
}

#[test]
fn sequence_threads_cursor_and_fails_without_partial_results() {
    let parser = seq((tag("a"), tag("b"), tag("c")));
    let (rest, (a, b, c)) = parser.parse(Input::new("abcd")).unwrap();
    assert_eq!((a, b, c), ("a", "b", "c"));
    assert_eq!(rest.rest(), "d");

    let failure = parser.parse(Input::new("abx")).unwrap_err();
    assert_eq!(failure.expected, "c");
    assert_eq!(failure.position().offset, 2);
}

#[test]
fn alternative_reports_furthest_failure() {
    let parser = alt((preceded(tag("a"), tag("b")), tag("c")));
    let failure = parser.parse(Input::new("ax")).unwrap_err();
    // The first branch got one char further than the second.
    assert_eq!(failure.expected, "b");
    assert_eq!(failure.position().offset, 1);
}

#[test]
fn alternative_takes_first_success_from_original_cursor() {
    let parser = alt((tag("ab"), tag("a")));
    let (rest, matched) = parser.parse(Input::new("a")).unwrap();
    assert_eq!(matched, "a");
    assert!(rest.at_end());
}

#[test]
fn opt_never_fails_and_never_consumes_on_failure() {
    let parser = opt(tag("x"));
    let (rest, value) = parser.parse(Input::new("y")).unwrap();
    assert_eq!(value, None);
    assert_eq!(rest.position().offset, 0);
}

#[test]
fn map_receives_span_of_matched_input() {
    let parser = map(tag("abc"), |_, start, end| (start.offset, end.offset));
    let (_, (start, end)) = parser.parse(Input::new("abcdef")).unwrap();
    assert_eq!((start, end), (0, 3));
}

#[test]
fn with_span_stamps_value() {
    let parser = preceded(tag("  "), with_span(digits));
    let (_, spanned) = parser.parse(Input::new("  42")).unwrap();
    assert_eq!(spanned.value, "42");
    assert_eq!(spanned.span.start.offset, 2);
    assert_eq!(spanned.span.end.offset, 4);
}

#[test]
fn delimited1_rejects_trailing_separator() {
    let parser = delimited1(digits, tag(","), "<number>");
    let (rest, items) = parser.parse(Input::new("1,2,3,")).unwrap();
    assert_eq!(items, vec!["1", "2", "3"]);
    assert_eq!(rest.rest(), ",");
}

#[test]
fn delimited_m_n_enforces_minimum() {
    let parser = delimited_m_n(2, None, digits, tag(","), "<number>");
    assert!(parser.parse(Input::new("1")).is_err());
    let (_, items) = parser.parse(Input::new("1,2")).unwrap();
    assert_eq!(items.len(), 2);
}

#[test]
fn many0_stops_cleanly_at_first_failure() {
    let parser = many0(preceded(tag(" "), digits));
    let (rest, items) = parser.parse(Input::new(" 1 2x")).unwrap();
    assert_eq!(items, vec!["1", "2"]);
    assert_eq!(rest.rest(), "x");
}

#[test]
fn chain_folds_left_associatively() {
    let parser = chain(
        map(digits, |d, _, _| d.to_string()),
        tag("+"),
        |left, _, right, _, _| format!("({left}+{right})"),
    );
    let (_, value) = parser.parse(Input::new("1+2+3")).unwrap();
    assert_eq!(value, "((1+2)+3)");
}

#[test]
fn chain_backs_out_dangling_operator() {
    let parser = chain(
        map(digits, |d, _, _| d.to_string()),
        tag("+"),
        |left, _, right, _, _| format!("({left}+{right})"),
    );
    let (rest, value) = parser.parse(Input::new("1+")).unwrap();
    assert_eq!(value, "1");
    assert_eq!(rest.rest(), "+");
}

#[test]
fn fold0_spans_cover_whole_postfix_chain() {
    let parser = fold0(
        map(digits, |d, _, _| d.to_string()),
        preceded(tag("."), digits),
        |base, field, start, end| format!("{base}.{field}@{}..{}", start.offset, end.offset),
    );
    let (_, value) = parser.parse(Input::new("1.2")).unwrap();
    assert_eq!(value, "1.2@0..3");
}

#[test]
fn delimited_until_recover_skips_bad_elements() {
    fn recover<'a>(failure: super::ParseFailure<'a>) -> (Input<'a>, &'a str) {
        let input = failure.remaining;
        let skip = input
            .find_next(|ch| ch == ',' || ch == ')')
            .unwrap_or_else(|| input.available());
        let skip = skip.max(1).min(input.available());
        (input.advance(skip), "<error>")
    }
    let parser = delimited_until_recover(digits, tag(","), tag(")"), "<number>", recover);
    let (rest, items) = parser.parse(Input::new("1,x,3)")).unwrap();
    assert_eq!(items, vec!["1", "<error>", "3"]);
    assert!(rest.at_end());
}

#[test]
fn delimited_until_recover_terminates_without_terminator() {
    fn recover<'a>(failure: super::ParseFailure<'a>) -> (Input<'a>, &'a str) {
        let input = failure.remaining;
        let skip = input.available().min(1);
        (input.advance(skip), "<error>")
    }
    let parser = delimited_until_recover(digits, tag(","), tag(")"), "<number>", recover);
    let failure = parser.parse(Input::new("1,x")).unwrap_err();
    assert_eq!(failure.expected, ")");
}

#[test]
fn whitespace1_requires_at_least_one_char() {
    assert!(whitespace1().parse(Input::new("x")).is_err());
    let (rest, _) = whitespace1().parse(Input::new(" \n\tx")).unwrap();
    assert_eq!(rest.rest(), "x");
}
