//! The concrete Keel grammar.
//!
//! Built entirely from the combinators in [`crate::parsing`]; no parser
//! state is shared between rules. Parsing a document always produces a
//! [`ModuleNode`] — malformed fragments become error nodes via the recovery
//! strategy rather than failing the parse, which is what keeps diagnostics
//! flowing while a document is being edited.

pub mod common;
pub mod expression;
pub mod literals;

#[cfg(test)]
mod tests;

use crate::ast::{
    ConstDeclaration, ErrorNode, FunctionDeclaration, ImplDeclaration, ImplItem, ModuleItem,
    ModuleNode, TypeDeclaration,
};
use crate::parsing::branch::alt;
use crate::parsing::combinator::{map, opt, with_span};
use crate::parsing::multi::{delimited_until, delimited_until_recover};
use crate::parsing::recognize::{eof, spacing0, tag, whitespace0, whitespace1};
use crate::parsing::sequence::{between, preceded, seq, terminated};
use crate::parsing::{Input, ParseFailure, ParseResult, Parser, Position, Span};

use common::{
    comma_delimiter, eq_delimiter, function_parameter, identifier, keyword, line_comment, type_def,
    type_ref, type_spec,
};
use expression::expression;

/// Parse a whole document. Never fails: anything the grammar cannot make
/// sense of ends up as an error node in the returned module.
pub fn parse_module(name: &str, source: &str) -> ModuleNode {
    let parser = preceded(
        whitespace0(),
        delimited_until_recover(
            module_item,
            whitespace1(),
            eof,
            "<module item>",
            recover_module_item,
        ),
    );

    let input = Input::new(source);
    match parser.parse(input) {
        Ok((rest, items)) => ModuleNode::new(
            name,
            items,
            Span::new(Position::start(), rest.position()),
        ),
        // Unreachable in practice (the terminator is end-of-input and
        // recovery always makes progress), but the fail-soft contract is
        // kept even here: one error item spanning the unparsed text.
        Err(failure) => {
            let end = Input::new(source).advance(source.len()).position();
            let item = ModuleItem::Error(ErrorNode {
                expected: failure.expected.to_string(),
                span: Span::new(failure.position(), end),
            });
            ModuleNode::new(name, vec![item], Span::new(Position::start(), end))
        }
    }
}

/// Scan from the failure point to the next whitespace (or closing brace, for
/// brace-delimited bodies), swallow any trailing whitespace, and describe the
/// skipped text with the failure's own expectation. Always makes progress
/// unless the very next char is a recovery stop.
fn recover_error_node(failure: ParseFailure<'_>, stop_at_brace: bool) -> (Input<'_>, ErrorNode) {
    let remaining = failure.remaining;
    let scan = remaining.find_next(|ch| ch.is_whitespace() || (stop_at_brace && ch == '}'));
    let recover_at = remaining.advance(scan.unwrap_or_else(|| remaining.available()));
    let resume = match whitespace1().parse(recover_at) {
        Ok((rest, _)) => rest,
        Err(_) => recover_at,
    };
    let node = ErrorNode {
        expected: failure.expected.to_string(),
        span: Span::new(remaining.position(), resume.position()),
    };
    (resume, node)
}

fn recover_module_item(failure: ParseFailure<'_>) -> (Input<'_>, ModuleItem) {
    let (resume, node) = recover_error_node(failure, false);
    (resume, ModuleItem::Error(node))
}

fn module_item(input: Input<'_>) -> ParseResult<'_, ModuleItem> {
    alt((
        map(line_comment, |comment, _, _| ModuleItem::Comment(comment)),
        const_declaration,
        map(function_declaration, |decl, _, _| {
            ModuleItem::Function(decl)
        }),
        type_declaration,
        impl_declaration,
    ))
    .parse(input)
}

fn public_keyword(input: Input<'_>) -> ParseResult<'_, Option<crate::parsing::WithSpan<&'static str>>> {
    opt(terminated(keyword("pub"), whitespace1())).parse(input)
}

fn const_declaration(input: Input<'_>) -> ParseResult<'_, ModuleItem> {
    map(
        seq((
            public_keyword,
            terminated(keyword("const"), whitespace1()),
            with_span(identifier),
            opt(type_spec),
            preceded(eq_delimiter, expression),
        )),
        |(public, kw, name, declared_type, initializer), start, end| {
            ModuleItem::Constant(ConstDeclaration {
                is_public: public.is_some(),
                keyword: kw.span,
                name,
                declared_type,
                initializer,
                span: Span::new(start, end),
            })
        },
    )
    .parse(input)
}

fn function_declaration(input: Input<'_>) -> ParseResult<'_, FunctionDeclaration> {
    map(
        seq((
            public_keyword,
            opt(terminated(keyword("sync"), whitespace1())),
            keyword("fn"),
            preceded(whitespace1(), with_span(identifier)),
            preceded(
                spacing0(),
                preceded(
                    terminated(tag("("), whitespace0()),
                    delimited_until(
                        function_parameter,
                        comma_delimiter,
                        preceded(whitespace0(), tag(")")),
                        "<parameter>",
                    ),
                ),
            ),
            preceded(between(whitespace0(), tag("->"), whitespace0()), type_ref),
            preceded(eq_delimiter, expression),
        )),
        |(public, sync, fn_kw, name, parameters, return_type, body), start, end| {
            FunctionDeclaration {
                is_public: public.is_some(),
                sync_kw: sync.map(|kw| kw.span),
                fn_kw: fn_kw.span,
                name,
                parameters,
                return_type,
                body,
                span: Span::new(start, end),
            }
        },
    )
    .parse(input)
}

fn type_declaration(input: Input<'_>) -> ParseResult<'_, ModuleItem> {
    map(
        seq((
            public_keyword,
            terminated(keyword("type"), whitespace1()),
            with_span(identifier),
            preceded(eq_delimiter, type_def),
        )),
        |(public, kw, name, definition), start, end| {
            ModuleItem::Type(TypeDeclaration {
                is_public: public.is_some(),
                keyword: kw.span,
                name,
                definition,
                span: Span::new(start, end),
            })
        },
    )
    .parse(input)
}

fn impl_item(input: Input<'_>) -> ParseResult<'_, ImplItem> {
    alt((
        map(line_comment, |comment, _, _| ImplItem::Comment(comment)),
        map(function_declaration, |decl, _, _| ImplItem::Method(decl)),
    ))
    .parse(input)
}

fn recover_impl_item(failure: ParseFailure<'_>) -> (Input<'_>, ImplItem) {
    let (resume, node) = recover_error_node(failure, true);
    (resume, ImplItem::Error(node))
}

fn impl_declaration(input: Input<'_>) -> ParseResult<'_, ModuleItem> {
    map(
        seq((
            terminated(keyword("impl"), whitespace1()),
            with_span(identifier),
            preceded(
                between(whitespace0(), tag("{"), whitespace0()),
                delimited_until_recover(
                    impl_item,
                    whitespace1(),
                    tag("}"),
                    "<method>",
                    recover_impl_item,
                ),
            ),
        )),
        |(kw, name, methods), start, end| {
            ModuleItem::Impl(ImplDeclaration {
                keyword: kw.span,
                name,
                methods,
                span: Span::new(start, end),
            })
        },
    )
    .parse(input)
}
