// src/lexer/tables/languages.rs
// Built-in language tables. Labels follow the painter conventions:
// "" is plain text, everything else is a highlight class.

use anyhow::{Result, bail};

use super::{DfaBuilder, GROUND, Tables};

pub const LANGUAGES: &[&str] = &["string", "c", "gn"];

pub const SYNTAX_COMMENT: &str = "comment";
pub const SYNTAX_IDENTIFIER: &str = "identifier";
pub const SYNTAX_KEYWORD: &str = "keyword";
pub const SYNTAX_NUMBER: &str = "number";
pub const SYNTAX_STRING: &str = "string";

const WHITESPACE: &[u8] = b" \t\r\n\x0b\x0c";

const C_KEYWORDS: &[&str] = &[
    "auto", "break", "case", "char", "const", "continue", "default", "do", "double", "else",
    "enum", "extern", "float", "for", "goto", "if", "inline", "int", "long", "register",
    "return", "short", "signed", "sizeof", "static", "struct", "switch", "typedef", "union",
    "unsigned", "void", "volatile", "while",
];

const GN_KEYWORDS: &[&str] = &[
    "assert",
    "declare_args",
    "defined",
    "else",
    "false",
    "foreach",
    "forward_variables_from",
    "if",
    "import",
    "template",
    "true",
];

pub fn by_name(name: &str) -> Result<Tables> {
    match name {
        "string" => string_literal(),
        "c" => c_like(),
        "gn" => gn(),
        _ => bail!("unknown language '{name}' (known: {})", LANGUAGES.join(", ")),
    }
}

/// Built-in keywords for a language; empty for unknown names.
pub fn keywords(name: &str) -> &'static [&'static str] {
    match name {
        "c" => C_KEYWORDS,
        "gn" => GN_KEYWORDS,
        _ => &[],
    }
}

/// Double-quoted strings over plain text, nothing else.
pub fn string_literal() -> Result<Tables> {
    let mut b = DfaBuilder::new("string", "");
    let body = b.state("string body", SYNTAX_STRING, false);
    let end = b.state("string end", SYNTAX_STRING, true);
    let plain = b.state("plain", "", false);

    b.set_all_except(GROUND, b"\"", plain)
        .set(GROUND, b"\"", body);
    b.set_all_except(body, b"\"", body).set(body, b"\"", end);
    b.set_all_except(plain, b"\"", plain);
    b.build()
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

fn ident_start_bytes() -> Vec<u8> {
    (0u8..128).filter(|&b| is_ident_start(b)).collect()
}

fn ident_bytes() -> Vec<u8> {
    (0u8..128)
        .filter(|&b| is_ident_start(b) || b.is_ascii_digit())
        .collect()
}

/// Quoted literal closed by `quote`, with backslash escapes; an unescaped
/// newline ends it.
fn quoted(b: &mut DfaBuilder, what: &str, quote: u8) -> u16 {
    let body = b.state(&format!("{what} body"), SYNTAX_STRING, false);
    let escape = b.state(&format!("{what} escape"), SYNTAX_STRING, false);
    let end = b.state(&format!("{what} end"), SYNTAX_STRING, true);

    b.set(GROUND, &[quote], body);
    b.set_all_except(body, &[quote, b'\\', b'\n'], body)
        .set(body, &[quote], end)
        .set(body, b"\\", escape);
    b.set_all_except(escape, &[], body);
    body
}

/// Shared skeleton: punctuation fallback, whitespace, identifiers, numbers.
fn common(name: &str) -> DfaBuilder {
    let mut b = DfaBuilder::new(name, "");
    let punct = b.state("punctuation", "", true);
    let white = b.state("whitespace", "", false);
    let ident = b.state("identifier", SYNTAX_IDENTIFIER, false);
    let number = b.state("number", SYNTAX_NUMBER, false);

    b.set_all_except(GROUND, &[], punct)
        .set(GROUND, WHITESPACE, white)
        .set(GROUND, &ident_start_bytes(), ident)
        .set_non_ascii(GROUND, ident)
        .set_range(GROUND, b'0', b'9', number);
    b.set(white, WHITESPACE, white);
    b.set(ident, &ident_bytes(), ident).set_non_ascii(ident, ident);
    b.set(number, &ident_bytes(), number).set(number, b".", number);
    b
}

/// C-family sources: `//` and `/* */` comments, strings and char literals.
pub fn c_like() -> Result<Tables> {
    let mut b = common("c");
    quoted(&mut b, "string", b'"');
    quoted(&mut b, "char", b'\'');

    // A lone `/` is an operator. When a comment follows, the run joins it
    // and classify paints the slash as comment.
    let slash = b.state("slash", "", false);
    let line = b.state("line comment", SYNTAX_COMMENT, false);
    let block = b.state("block comment", SYNTAX_COMMENT, false);
    let star = b.state("block comment star", SYNTAX_COMMENT, false);
    let done = b.state("block comment end", SYNTAX_COMMENT, true);

    b.set(GROUND, b"/", slash);
    b.set(slash, b"/", line).set(slash, b"*", block);
    b.set_all_except(line, b"\n", line);
    b.set_all_except(block, b"*", block).set(block, b"*", star);
    b.set_all_except(star, b"*/", block)
        .set(star, b"*", star)
        .set(star, b"/", done);
    b.build()
}

/// GN build files: `#` comments and double-quoted strings.
pub fn gn() -> Result<Tables> {
    let mut b = common("gn");
    quoted(&mut b, "string", b'"');

    let line = b.state("line comment", SYNTAX_COMMENT, false);
    b.set(GROUND, b"#", line);
    b.set_all_except(line, b"\n", line);
    b.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_builtin_builds() {
        for name in LANGUAGES {
            let t = by_name(name).unwrap();
            assert_eq!(t.name(), *name);
            assert!(!t.is_acceptable(GROUND));
        }
    }

    #[test]
    fn ground_never_loops_to_itself() {
        for name in LANGUAGES {
            let t = by_name(name).unwrap();
            for a in 0..t.num_alphabets() {
                assert_ne!(t.next_state(GROUND, a), GROUND, "{name}: class {a}");
            }
        }
    }

    #[test]
    fn unknown_language_is_an_error() {
        assert!(by_name("cobol").is_err());
        assert!(keywords("cobol").is_empty());
    }
}
