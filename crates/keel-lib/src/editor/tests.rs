use indoc::indoc;

use crate::grammar::parse_module;

use super::tokens::{semantic_tokens, TokenKind, TokenModifier};
use super::{symbols, SymbolKind, Workspace};

#[test]
fn tokens_cover_keywords_and_declarations() {
    let module = parse_module(
        "test",
        indoc! {"
            // helpers
            const MAX : int = 10
            sync fn f(x : int) -> int = { let y = x y }
        "},
    );
    let tokens = semantic_tokens(&module);

    let kinds: Vec<TokenKind> = tokens.iter().map(|token| token.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Comment,  // // helpers
            TokenKind::Keyword,  // const
            TokenKind::Constant, // MAX
            TokenKind::Keyword,  // sync
            TokenKind::Keyword,  // fn
            TokenKind::Function, // f
            TokenKind::Variable, // x
            TokenKind::Keyword,  // let
            TokenKind::Variable, // y
        ]
    );

    // Ordered by source position, and declarations carry the modifier.
    let offsets: Vec<usize> = tokens.iter().map(|token| token.span.start.offset).collect();
    let mut sorted = offsets.clone();
    sorted.sort_unstable();
    assert_eq!(offsets, sorted);

    let max = &tokens[2];
    assert!(max.modifiers.contains(&TokenModifier::Declaration));
    assert!(max.modifiers.contains(&TokenModifier::Readonly));
}

#[test]
fn type_declarations_get_type_tokens() {
    let module = parse_module("test", "type Vec2 = (x : float, y : float)");
    let tokens = semantic_tokens(&module);
    assert_eq!(tokens[0].kind, TokenKind::Keyword);
    assert_eq!(tokens[1].kind, TokenKind::Type);
    assert!(tokens[1].modifiers.contains(&TokenModifier::Declaration));
}

#[test]
fn symbols_expose_definitions_for_goto() {
    let mut workspace = Workspace::new();
    workspace.update("nav", 1, "pub const LIMIT : float = 1.5\npub sync fn go() -> Unit = { }");

    let symbols = workspace.symbols("nav").expect("document is open");
    assert_eq!(symbols.len(), 2);
    assert_eq!(symbols[0].kind, SymbolKind::Constant);
    assert_eq!(symbols[0].name, "LIMIT");
    let definition = symbols[0].definition.as_ref().expect("source definition");
    assert_eq!(definition.module, "nav");
    assert_eq!(symbols[1].kind, SymbolKind::Function);
}

#[test]
fn dependents_are_revalidated_on_update() {
    let mut workspace = Workspace::new();
    workspace.update("a", 1, "pub sync fn one() -> int = 1");
    workspace.update("b", 1, "sync fn two() -> int = a::one()");

    assert!(workspace.diagnostics("b").unwrap().is_empty());

    // Renaming the export breaks the dependent, which is re-validated even
    // though its own text did not change.
    workspace.update("a", 2, "pub sync fn uno() -> int = 1");
    let diagnostics = workspace.diagnostics("b").unwrap();
    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics.iter().any(|d| d.message.contains("no function `one`")));
}

#[test]
fn stale_updates_are_discarded() {
    let mut workspace = Workspace::new();
    workspace.update("a", 2, "pub sync fn one() -> int = 1");

    // An older version arriving late must not win.
    assert!(!workspace.update("a", 1, "garbage that would not even parse"));
    assert!(workspace.diagnostics("a").unwrap().is_empty());

    assert!(workspace.update("a", 3, "pub sync fn one() -> bool = true"));
}

#[test]
fn referenced_modules_are_visible_to_documents() {
    let mut workspace = Workspace::new();
    workspace
        .load_signatures(
            r#"[{
                "name": "other",
                "functions": {
                    "f": {
                        "isAsync": false,
                        "returnType": {"kind": "builtin", "name": "bool"}
                    }
                }
            }]"#,
        )
        .expect("signature table parses");

    workspace.update("doc", 1, "sync fn g() -> bool = other::f()");
    assert!(workspace.diagnostics("doc").unwrap().is_empty());
}

#[test]
fn broken_documents_still_publish_diagnostics() {
    let mut workspace = Workspace::new();
    workspace.update("doc", 1, "sync fn f() -> int = { 1 + ; 2 }");
    let diagnostics = workspace.diagnostics("doc").unwrap();
    assert!(!diagnostics.is_empty());
}
