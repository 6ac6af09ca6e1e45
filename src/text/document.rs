// src/text/document.rs
use std::ops::Range;

use hashbrown::HashMap;

/// Tag that matches any other tag when comparing bracket contexts. The empty
/// tag painted on plain code is an ordinary tag.
pub const NORMAL_SYNTAX: &str = "normal";

#[inline]
pub fn is_normal_syntax(syntax: &str) -> bool {
    syntax == NORMAL_SYNTAX
}

/// The buffer surface the scanners need. Offsets are character indices.
///
/// Callers must not mutate the buffer through other means while a scan or a
/// bracket search holds it.
pub trait TextBuffer {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Requires `offset < len()`.
    fn char_code_at(&self, offset: usize) -> u32;

    /// Requires `offset < len()`.
    fn syntax_at(&self, offset: usize) -> &str;

    /// Tags `[start, end)`; `end` is clamped to `len()`.
    fn set_syntax(&mut self, start: usize, end: usize, syntax: &str);
}

/// In-memory text with one interned syntax tag per character.
#[derive(Debug, Clone)]
pub struct Document {
    chars: Vec<char>,
    tags: Vec<u32>,
    syntaxes: Vec<String>, // id -> tag; id 0 is ""
    ids: HashMap<String, u32>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new("")
    }
}

impl Document {
    pub fn new(text: &str) -> Self {
        let chars: Vec<char> = text.chars().collect();
        let tags = vec![0; chars.len()];
        let mut ids = HashMap::new();
        ids.insert(String::new(), 0);
        Self {
            chars,
            tags,
            syntaxes: vec![String::new()],
            ids,
        }
    }

    pub fn text(&self) -> String {
        self.chars.iter().collect()
    }

    pub fn slice(&self, start: usize, end: usize) -> String {
        let end = end.min(self.chars.len());
        let start = start.min(end);
        self.chars[start..end].iter().collect()
    }

    /// Replaces `[start, end)` with `text`. Inserted characters carry the
    /// empty tag until the next paint.
    pub fn replace(&mut self, start: usize, end: usize, text: &str) {
        let end = end.min(self.chars.len());
        let start = start.min(end);
        let inserted: Vec<char> = text.chars().collect();
        let n = inserted.len();
        self.chars.splice(start..end, inserted);
        self.tags.splice(start..end, std::iter::repeat_n(0, n));
    }

    /// Maximal runs of equal tags, in offset order.
    pub fn syntax_runs(&self) -> Vec<(Range<usize>, &str)> {
        let mut runs: Vec<(Range<usize>, &str)> = Vec::new();
        for (offset, &id) in self.tags.iter().enumerate() {
            let syntax = self.syntaxes[id as usize].as_str();
            match runs.last_mut() {
                Some((range, last)) if *last == syntax => range.end = offset + 1,
                _ => runs.push((offset..offset + 1, syntax)),
            }
        }
        runs
    }

    fn intern(&mut self, syntax: &str) -> u32 {
        if let Some(&id) = self.ids.get(syntax) {
            return id;
        }
        let id = self.syntaxes.len() as u32;
        self.syntaxes.push(syntax.to_string());
        self.ids.insert(syntax.to_string(), id);
        id
    }
}

impl From<&str> for Document {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl TextBuffer for Document {
    fn len(&self) -> usize {
        self.chars.len()
    }

    fn char_code_at(&self, offset: usize) -> u32 {
        self.chars[offset] as u32
    }

    fn syntax_at(&self, offset: usize) -> &str {
        &self.syntaxes[self.tags[offset] as usize]
    }

    fn set_syntax(&mut self, start: usize, end: usize, syntax: &str) {
        let end = end.min(self.chars.len());
        if start >= end {
            return;
        }
        let id = self.intern(syntax);
        self.tags[start..end].fill(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_follow_edits() {
        let mut doc = Document::new("abcdef");
        doc.set_syntax(1, 4, "string");
        doc.replace(2, 3, "XY");
        assert_eq!(doc.text(), "abXYdef");
        assert_eq!(doc.syntax_at(1), "string");
        assert_eq!(doc.syntax_at(2), "");
        assert_eq!(doc.syntax_at(4), "string");
        assert_eq!(
            doc.syntax_runs(),
            vec![(0..1, ""), (1..2, "string"), (2..4, ""), (4..5, "string"), (5..7, "")]
        );
    }

    #[test]
    fn set_syntax_clamps_to_length() {
        let mut doc = Document::new("ab");
        doc.set_syntax(1, 99, "comment");
        assert_eq!(doc.syntax_at(1), "comment");
        doc.set_syntax(5, 9, "comment");
        assert_eq!(doc.len(), 2);
    }

    #[test]
    fn char_codes_are_scalar_values() {
        let doc = Document::new("aé");
        assert_eq!(doc.char_code_at(0), 'a' as u32);
        assert_eq!(doc.char_code_at(1), 0xE9);
        assert!(!is_normal_syntax(""));
        assert!(is_normal_syntax(NORMAL_SYNTAX));
        assert!(!is_normal_syntax("string"));
    }
}
