//! Bracket matching over tagged and untagged text.

use std::sync::Arc;

use synscan::{
    lexer::{Highlighter, tables::languages},
    text::{
        BracketDetail, BracketTable, Document, MAX_BRACKET_NESTING, NOT_BRACKET, TextBuffer,
        TextPosition, match_backward, match_forward,
    },
};

fn fwd(text: &str, start: usize) -> usize {
    match_forward(&Document::new(text), &BracketTable::standard(), start)
}

fn back(text: &str, start: usize) -> usize {
    match_backward(&Document::new(text), &BracketTable::standard(), start)
}

#[test]
fn nested_pairs_round_trip() {
    let text = "foo(bar[baz])qux";
    assert_eq!(fwd(text, 3), 13);
    assert_eq!(back(text, 13), 3);
    assert_eq!(fwd(text, 7), 12);
    assert_eq!(back(text, 12), 7);
}

#[test]
fn escaped_quote_does_not_close() {
    let text = r#""a\"b""#;
    assert_eq!(fwd(text, 0), 6);
    assert_eq!(back(text, 6), 0);
}

#[test]
fn even_escape_run_leaves_quote_active() {
    let text = r#""a\\"b"#;
    assert_eq!(fwd(text, 0), 5);
    assert_eq!(back(text, 5), 0);
}

#[test]
fn escaped_paren_is_skipped() {
    let text = r"(a\)b)";
    assert_eq!(fwd(text, 0), 6);
    assert_eq!(back(text, 6), 0);
}

#[test]
fn nesting_past_the_bound_stops_at_the_extra_opener() {
    let opens = "(".repeat(MAX_BRACKET_NESTING + 1);
    assert_eq!(fwd(&opens, 0), MAX_BRACKET_NESTING);

    let balanced = format!("{opens}{}", ")".repeat(MAX_BRACKET_NESTING + 1));
    assert_eq!(fwd(&balanced, 0), MAX_BRACKET_NESTING);

    let closes = ")".repeat(MAX_BRACKET_NESTING + 1);
    assert_eq!(back(&closes, closes.len()), 1);
}

#[test]
fn nesting_at_the_bound_still_matches() {
    let text = format!(
        "{}{}",
        "(".repeat(MAX_BRACKET_NESTING),
        ")".repeat(MAX_BRACKET_NESTING)
    );
    assert_eq!(fwd(&text, 0), text.len());
    assert_eq!(back(&text, text.len()), 0);
}

#[test]
fn forward_edge_cases() {
    // Closer with nothing open.
    assert_eq!(fwd("a)b", 0), 2);
    // Opener first seen away from the caret.
    assert_eq!(fwd("ab(c)", 0), 2);
    // Mismatched closer lands on the opener it failed.
    assert_eq!(fwd("{ if (foo }", 0), 5);
    // Ran out of text.
    assert_eq!(fwd("(ab", 0), 0);
    assert_eq!(fwd("abc", 1), 1);
    assert_eq!(fwd("abc", 3), 3);
}

#[test]
fn backward_edge_cases() {
    // Opener with nothing open.
    assert_eq!(back("x(ab", 4), 1);
    // Closer first seen away from the caret.
    assert_eq!(back("(a)b", 4), 3);
    // Mismatch keeps the caret.
    assert_eq!(back("(]", 2), 2);
    // Ran out of text.
    assert_eq!(back("ab)", 3), 3);
    assert_eq!(back("abc", 2), 2);
    assert_eq!(back("abc", 0), 0);
}

#[test]
fn offsets_past_the_end_are_clamped() {
    assert_eq!(fwd("()", 9), 2);
    assert_eq!(back("()", 9), 0);
}

#[test]
fn differently_tagged_delimiters_are_ignored() {
    let mut doc = Document::new("(x)y)");
    doc.set_syntax(0, 5, "string");
    doc.set_syntax(2, 3, "comment");
    let brackets = BracketTable::standard();
    assert_eq!(match_forward(&doc, &brackets, 0), 5);
    assert_eq!(match_backward(&doc, &brackets, 5), 0);
}

#[test]
fn normal_tags_match_any_context() {
    let brackets = BracketTable::standard();

    let mut doc = Document::new("(x)y)");
    doc.set_syntax(0, 5, "string");
    doc.set_syntax(2, 3, "normal");
    assert_eq!(match_forward(&doc, &brackets, 0), 3);

    let mut doc = Document::new("(a)");
    doc.set_syntax(2, 3, "normal");
    assert_eq!(match_forward(&doc, &brackets, 0), 3);
}

#[test]
fn untagged_code_is_its_own_context() {
    let brackets = BracketTable::standard();
    let mut doc = Document::new("(a)");
    doc.set_syntax(2, 3, "comment");
    assert_eq!(match_forward(&doc, &brackets, 0), 0);
    assert_eq!(match_backward(&doc, &brackets, 3), 3);
}

#[test]
fn code_brackets_skip_strings_and_comments() {
    let h = Highlighter::new(Arc::new(languages::c_like().unwrap()));
    let brackets = BracketTable::standard();

    let mut doc = Document::new(r#"f(")")"#);
    h.highlight(&mut doc);
    assert_eq!(doc.syntax_at(1), "");
    assert_eq!(match_forward(&doc, &brackets, 1), 6);
    assert_eq!(match_backward(&doc, &brackets, 6), 1);

    let mut doc = Document::new("g(/* ) */)");
    h.highlight(&mut doc);
    assert_eq!(match_forward(&doc, &brackets, 1), 10);
    assert_eq!(match_backward(&doc, &brackets, 10), 1);
}

#[test]
fn code_round_trip_over_mixed_source() {
    let h = Highlighter::new(Arc::new(languages::c_like().unwrap()));
    let brackets = BracketTable::standard();
    let mut doc = Document::new(r#"call(a[0], "([{", ')', /* ] */ b) + 1; // )"#);
    h.highlight(&mut doc);

    assert_eq!(match_forward(&doc, &brackets, 4), 33);
    assert_eq!(match_backward(&doc, &brackets, 33), 4);
    assert_eq!(match_forward(&doc, &brackets, 6), 9);
    assert_eq!(match_backward(&doc, &brackets, 9), 6);
}

#[test]
fn quotes_do_not_nest() {
    assert_eq!(fwd(r#""it's""#, 0), 6);
    assert_eq!(back(r#""it's""#, 6), 0);
    assert_eq!(fwd(r#"'say "hi"'"#, 0), 10);

    let h = Highlighter::new(Arc::new(languages::c_like().unwrap()));
    let brackets = BracketTable::standard();
    let mut doc = Document::new(r#"x = 'a'; y = "it's";"#);
    h.highlight(&mut doc);
    assert_eq!(match_forward(&doc, &brackets, 13), 19);
    assert_eq!(match_backward(&doc, &brackets, 19), 13);
}

#[test]
fn highlighted_comment_brackets_stay_apart() {
    let h = Highlighter::new(Arc::new(languages::c_like().unwrap()));
    let brackets = BracketTable::standard();

    // The comment's own `]` mismatches before any code closer is reached.
    let mut doc = Document::new("/* (a ] */ ) ]");
    h.highlight(&mut doc);
    assert_eq!(doc.syntax_at(3), "comment");
    assert_eq!(match_forward(&doc, &brackets, 3), 3);

    let mut doc = Document::new("/* (a) */ )");
    h.highlight(&mut doc);
    assert_eq!(match_forward(&doc, &brackets, 3), 6);
    assert_eq!(match_backward(&doc, &brackets, 6), 3);
}

#[test]
fn highlighted_string_with_escaped_quote() {
    let h = Highlighter::new(Arc::new(languages::c_like().unwrap()));
    let mut doc = Document::new(r#"x = "a\"b";"#);
    h.highlight(&mut doc);
    assert_eq!(doc.syntax_at(4), "string");

    let brackets = BracketTable::standard();
    assert_eq!(match_forward(&doc, &brackets, 4), 10);
    assert_eq!(match_backward(&doc, &brackets, 10), 4);
}

#[test]
fn custom_tables_change_what_matches() {
    let mut brackets = BracketTable::empty();
    brackets.set_pair('<', '>');
    let doc = Document::new("<a(b>");
    assert_eq!(match_forward(&doc, &brackets, 0), 5);

    brackets.set('<', NOT_BRACKET).set('>', NOT_BRACKET);
    assert_eq!(match_forward(&doc, &brackets, 0), 0);

    brackets.set('|', BracketDetail::left('|'));
    let doc = Document::new("|a|");
    assert_eq!(match_forward(&doc, &brackets, 0), 3);
}

#[test]
fn position_moves_by_bracket() {
    let doc = Document::new("f(a[1]) + g");
    let brackets = BracketTable::standard();
    let mut p = TextPosition::new(&doc, 1).unwrap();

    p.move_bracket(&brackets, 0);
    assert_eq!(p.offset(), 1);
    p.move_bracket(&brackets, 1);
    assert_eq!(p.offset(), 7);
    p.move_bracket(&brackets, -1);
    assert_eq!(p.offset(), 1);
    assert_eq!(p.char_code(), '(' as u32);
}
