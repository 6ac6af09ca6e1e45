// src/lexer/painter.rs
// Drives the token state machine over a buffer and writes syntax tags back.

use std::sync::Arc;

use hashbrown::HashSet;

use crate::{
    lexer::{
        machine::{LINE_SEPARATOR, TokenStateMachine},
        tables::{
            GROUND, Tables,
            languages::{self, SYNTAX_IDENTIFIER, SYNTAX_KEYWORD},
        },
    },
    text::TextBuffer,
};

/// Identifiers longer than this are never keywords.
const MAX_KEYWORD_LEN: usize = 64;

/// A run of characters the machine spent in one state.
///
/// `joined` is set when the run was entered straight from the previous run's
/// state, without passing through the ground state: both belong to one lexeme
/// (`/` then `*` of a block comment).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub start: usize,
    pub end: usize,
    pub state: u16,
    pub joined: bool,
}

impl Token {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxRange {
    pub start: usize,
    pub end: usize,
    pub syntax: String,
}

impl SyntaxRange {
    pub fn new(start: usize, end: usize, syntax: &str) -> Self {
        Self {
            start,
            end,
            syntax: syntax.to_string(),
        }
    }
}

fn vchr(char_code: u32) -> String {
    match char::from_u32(char_code) {
        Some('\n') => "\\n".into(),
        Some('"') => "\\\"".into(),
        Some('\\') => "\\\\".into(),
        Some(c) => c.to_string(),
        None => format!("\\u{{{char_code:x}}}"),
    }
}

/// Splits the whole buffer into state runs.
///
/// Single left-to-right pass. Entering an acceptable state closes the token
/// at once and restarts the machine from the ground state, so the next
/// character begins a fresh token (maximal munch without backtracking).
pub fn tokenize<B: TextBuffer + ?Sized>(tables: &Tables, buffer: &B) -> Vec<Token> {
    let mut machine = TokenStateMachine::new(tables);
    machine.reset_to(GROUND);
    machine.update_state(LINE_SEPARATOR);

    let length = buffer.len();
    let mut tokens = Vec::new();
    let mut open: Option<(usize, u16, bool)> = None;

    for offset in 0..length {
        let last_state = machine.state();
        let char_code = buffer.char_code_at(offset);
        let state = machine.advance(char_code);
        if state == last_state && open.is_some() {
            continue;
        }
        log::trace!(
            "  transit {offset} s{last_state}-\"{}\"->s{state} {}",
            vchr(char_code),
            if machine.is_acceptable(state) {
                "ACCEPT"
            } else {
                "continue"
            }
        );
        let direct = open.is_some()
            && last_state != GROUND
            && tables.next_state(last_state, tables.alphabet_of(char_code)) == state;
        if let Some((start, open_state, joined)) = open.take() {
            tokens.push(Token {
                start,
                end: offset,
                state: open_state,
                joined,
            });
        }
        if machine.is_acceptable(state) {
            machine.reset_to(GROUND);
        }
        open = Some((offset, state, direct));
    }
    if let Some((start, state, joined)) = open {
        tokens.push(Token {
            start,
            end: length,
            state,
            joined,
        });
    }
    tokens
}

/// Chooses the tag written for a token. `label` is the machine's label for
/// the token's state.
pub trait Painter {
    fn syntax_for<'a>(&'a self, buffer: &dyn TextBuffer, token: &Token, label: &'a str)
    -> &'a str;
}

/// Writes machine labels unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct LabelPainter;

impl Painter for LabelPainter {
    fn syntax_for<'a>(&'a self, _: &dyn TextBuffer, _: &Token, label: &'a str) -> &'a str {
        label
    }
}

/// Mutable keyword set owned by one highlighting session.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct KeywordSet {
    words: HashSet<String>,
}

impl KeywordSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh copy of a language's built-in keywords.
    pub fn for_language(name: &str) -> Self {
        languages::keywords(name).iter().copied().collect()
    }

    pub fn add(&mut self, word: &str) -> bool {
        self.words.insert(word.to_string())
    }

    pub fn remove(&mut self, word: &str) -> bool {
        self.words.remove(word)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }
}

impl<'a> FromIterator<&'a str> for KeywordSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        Self {
            words: iter.into_iter().map(str::to_string).collect(),
        }
    }
}

/// Relabels identifier tokens spelled like a keyword.
#[derive(Debug, Default, Clone)]
pub struct KeywordPainter {
    keywords: KeywordSet,
}

impl KeywordPainter {
    pub fn new(keywords: KeywordSet) -> Self {
        Self { keywords }
    }

    pub fn keywords(&self) -> &KeywordSet {
        &self.keywords
    }

    pub fn keywords_mut(&mut self) -> &mut KeywordSet {
        &mut self.keywords
    }
}

impl Painter for KeywordPainter {
    fn syntax_for<'a>(
        &'a self,
        buffer: &dyn TextBuffer,
        token: &Token,
        label: &'a str,
    ) -> &'a str {
        if label != SYNTAX_IDENTIFIER || token.len() > MAX_KEYWORD_LEN || self.keywords.is_empty()
        {
            return label;
        }
        let word: Option<String> = (token.start..token.end)
            .map(|offset| char::from_u32(buffer.char_code_at(offset)))
            .collect();
        match word {
            Some(word) if self.keywords.contains(&word) => SYNTAX_KEYWORD,
            _ => label,
        }
    }
}

/// Tokenizes, paints each token, and merges neighbours with equal tags.
///
/// An unlabelled token joined to the next one takes that token's label, so
/// the opening `/` of a comment is painted as comment.
///
/// The result is contiguous, non-overlapping, and covers `[0, len)`.
pub fn classify<B: TextBuffer>(
    tables: &Tables,
    painter: &dyn Painter,
    buffer: &B,
) -> Vec<SyntaxRange> {
    let tokens = tokenize(tables, buffer);
    let mut labels: Vec<&str> = tokens.iter().map(|t| tables.syntax_of(t.state)).collect();
    for i in (1..tokens.len()).rev() {
        if tokens[i].joined && labels[i - 1].is_empty() {
            labels[i - 1] = labels[i];
        }
    }

    let mut ranges: Vec<SyntaxRange> = Vec::new();
    for (token, label) in tokens.iter().zip(labels) {
        debug_assert!(!token.is_empty(), "empty token at {}", token.start);
        let syntax = painter.syntax_for(buffer, token, label);
        match ranges.last_mut() {
            Some(last) if last.syntax == syntax => last.end = token.end,
            _ => ranges.push(SyntaxRange::new(token.start, token.end, syntax)),
        }
    }
    ranges
}

/// [`classify`], then clears the buffer's tags and writes every non-empty one.
pub fn paint<B: TextBuffer>(
    tables: &Tables,
    painter: &dyn Painter,
    buffer: &mut B,
) -> Vec<SyntaxRange> {
    let ranges = classify(tables, painter, &*buffer);
    buffer.set_syntax(0, buffer.len(), "");
    for range in ranges.iter().filter(|r| !r.syntax.is_empty()) {
        buffer.set_syntax(range.start, range.end, &range.syntax);
    }
    log::debug!(
        "[paint] '{}': {} chars -> {} ranges",
        tables.name(),
        buffer.len(),
        ranges.len()
    );
    ranges
}

/// One highlighting session: shared tables plus its own keyword set.
#[derive(Debug, Clone)]
pub struct Highlighter {
    tables: Arc<Tables>,
    painter: KeywordPainter,
}

impl Highlighter {
    /// Starts with the built-in keywords of the tables' language.
    pub fn new(tables: Arc<Tables>) -> Self {
        let keywords = KeywordSet::for_language(tables.name());
        Self::with_keywords(tables, keywords)
    }

    pub fn with_keywords(tables: Arc<Tables>, keywords: KeywordSet) -> Self {
        Self {
            tables,
            painter: KeywordPainter::new(keywords),
        }
    }

    pub fn tables(&self) -> &Tables {
        &self.tables
    }

    pub fn keywords(&self) -> &KeywordSet {
        self.painter.keywords()
    }

    pub fn add_keyword(&mut self, word: &str) -> bool {
        self.painter.keywords_mut().add(word)
    }

    pub fn remove_keyword(&mut self, word: &str) -> bool {
        self.painter.keywords_mut().remove(word)
    }

    pub fn tokenize<B: TextBuffer>(&self, buffer: &B) -> Vec<Token> {
        tokenize(&self.tables, buffer)
    }

    pub fn classify<B: TextBuffer>(&self, buffer: &B) -> Vec<SyntaxRange> {
        classify(&self.tables, &self.painter, buffer)
    }

    pub fn highlight<B: TextBuffer>(&self, buffer: &mut B) -> Vec<SyntaxRange> {
        paint(&self.tables, &self.painter, buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::Document;

    #[test]
    fn keyword_set_edits() {
        let mut set: KeywordSet = ["if", "else"].into_iter().collect();
        assert!(set.add("while"));
        assert!(!set.add("if"));
        assert!(set.remove("else"));
        let mut words: Vec<&str> = set.iter().collect();
        words.sort_unstable();
        assert_eq!(words, vec!["if", "while"]);
    }

    #[test]
    fn joined_prefix_borrows_the_following_label() {
        let tables = languages::c_like().unwrap();
        let doc = Document::new("/*x*/");
        let tokens = tokenize(&tables, &doc);
        assert_eq!(tables.syntax_of(tokens[0].state), "");
        assert!(tokens[1].joined);
        assert_eq!(
            classify(&tables, &LabelPainter, &doc),
            vec![SyntaxRange::new(0, 5, "comment")]
        );
    }
}
