// src/text/position.rs
// Bracket matching over painted text.
//
// Syntax tags keep brackets in strings, comments and code apart: once the
// first delimiter fixes the context tag, candidates carrying a different
// non-normal tag are ignored.

use anyhow::{Result, bail};

use super::{
    bracket::{BracketDetail, BracketKind, BracketTable},
    document::{TextBuffer, is_normal_syntax},
};

/// Deepest bracket nesting a single search tracks.
pub const MAX_BRACKET_NESTING: usize = 10;

#[derive(Debug, Clone, Copy)]
struct BracketMatch {
    detail: BracketDetail,
    offset: usize,
    symmetric: bool,
}

impl BracketMatch {
    fn new(detail: BracketDetail, char_code: u32, offset: usize) -> Self {
        Self {
            detail,
            offset,
            symmetric: detail.is_symmetric(char_code),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Open,
    Close,
    Escape,
}

fn syntax_equals(a: &str, b: &str) -> bool {
    a == b || is_normal_syntax(a) || is_normal_syntax(b)
}

/// Quotes do not nest: while a symmetric delimiter is innermost, only its
/// partner and escapes are delimiters.
fn is_quoted_out(detail: BracketDetail, char_code: u32, stack: &[BracketMatch]) -> bool {
    match stack.last() {
        Some(top) if top.symmetric => {
            detail.kind != BracketKind::Escape && top.detail.pair != char_code
        }
        _ => false,
    }
}

/// Open/close role of a delimiter for the scan direction. A symmetric
/// delimiter closes when the innermost open entry pairs with it.
fn role_of(detail: BracketDetail, char_code: u32, stack: &[BracketMatch], forward: bool) -> Role {
    if detail.kind == BracketKind::Escape {
        return Role::Escape;
    }
    if detail.is_symmetric(char_code) {
        return match stack.last() {
            Some(top) if top.detail.pair == char_code => Role::Close,
            _ => Role::Open,
        };
    }
    match (detail.kind, forward) {
        (BracketKind::Left, true) | (BracketKind::Right, false) => Role::Open,
        _ => Role::Close,
    }
}

/// Caret in a buffer. The offset is a plain index; nothing is borrowed from
/// the text beyond the buffer reference itself.
#[derive(Debug)]
pub struct TextPosition<'a, B: TextBuffer + ?Sized> {
    buffer: &'a B,
    offset: usize,
}

impl<B: TextBuffer + ?Sized> Clone for TextPosition<'_, B> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<B: TextBuffer + ?Sized> Copy for TextPosition<'_, B> {}

impl<'a, B: TextBuffer + ?Sized> TextPosition<'a, B> {
    pub fn new(buffer: &'a B, offset: usize) -> Result<Self> {
        if offset > buffer.len() {
            bail!("invalid offset {offset} for buffer of length {}", buffer.len());
        }
        Ok(Self { buffer, offset })
    }

    pub fn buffer(&self) -> &'a B {
        self.buffer
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Requires `offset() < buffer().len()`.
    pub fn char_code(&self) -> u32 {
        self.buffer.char_code_at(self.offset)
    }

    /// Requires `offset() < buffer().len()`.
    pub fn char_syntax(&self) -> &'a str {
        self.buffer.syntax_at(self.offset)
    }

    /// Moves by `count` characters, clamped to the buffer.
    pub fn move_chars(&mut self, count: isize) -> &mut Self {
        self.offset = self
            .offset
            .saturating_add_signed(count)
            .min(self.buffer.len());
        self
    }

    /// Moves while `predicate` holds for the character being crossed, at
    /// most `|count|` characters; negative counts move backward.
    pub fn move_while<F>(&mut self, mut predicate: F, count: isize) -> &mut Self
    where
        F: FnMut(&Self) -> bool,
    {
        let end = self.buffer.len();
        let mut remaining = count.unsigned_abs();
        if count < 0 {
            while remaining > 0 && self.offset > 0 {
                self.offset -= 1;
                if !predicate(self) {
                    self.offset += 1;
                    break;
                }
                remaining -= 1;
            }
        } else {
            while remaining > 0 && self.offset < end {
                if !predicate(self) {
                    break;
                }
                self.offset += 1;
                remaining -= 1;
            }
        }
        self
    }

    /// Positive `count` jumps forward to the matching bracket, negative
    /// backward; zero stays put.
    pub fn move_bracket(&mut self, brackets: &BracketTable, count: isize) -> &mut Self {
        if count > 0 {
            self.offset = match_forward(self.buffer, brackets, self.offset);
        } else if count < 0 {
            self.offset = match_backward(self.buffer, brackets, self.offset);
        }
        self
    }

    fn is_escape_in(&self, brackets: &BracketTable, context: &str) -> bool {
        brackets.detail_of(self.char_code()).kind == BracketKind::Escape
            && syntax_equals(self.char_syntax(), context)
    }
}

/// Caret after searching forward from `start` for the bracket matching the
/// one at `start`.
///
/// Never fails: unbalanced or overly deep text resolves to a caret position.
/// - matched: just past the closer;
/// - closer with nothing open: just past it;
/// - mismatched closer: the opener it failed to match;
/// - a left delimiter first seen away from `start`, or nesting beyond
///   [`MAX_BRACKET_NESTING`]: that delimiter;
/// - end of text: the outermost still-open entry, else `start`.
pub fn match_forward<B: TextBuffer + ?Sized>(
    buffer: &B,
    brackets: &BracketTable,
    start: usize,
) -> usize {
    let length = buffer.len();
    let start = start.min(length);
    let mut stack: Vec<BracketMatch> = Vec::with_capacity(MAX_BRACKET_NESTING);
    let mut context: Option<&str> = None;
    let mut position = TextPosition {
        buffer,
        offset: start,
    };

    while position.offset < length {
        let offset = position.offset;
        let char_code = position.char_code();
        let detail = brackets.detail_of(char_code);
        if detail.kind == BracketKind::None {
            position.offset += 1;
            continue;
        }
        let syntax = position.char_syntax();
        let context_syntax = *context.get_or_insert(syntax);
        if !syntax_equals(syntax, context_syntax) || is_quoted_out(detail, char_code, &stack) {
            position.offset += 1;
            continue;
        }

        match role_of(detail, char_code, &stack, true) {
            Role::Escape => {
                position.move_while(|p| p.is_escape_in(brackets, context_syntax), isize::MAX);
                if (position.offset - offset) % 2 == 1 {
                    // The character after an odd run is escaped.
                    position.offset += 1;
                }
                continue;
            }
            Role::Open => {
                if stack.is_empty() && offset != start {
                    return offset;
                }
                if stack.len() == MAX_BRACKET_NESTING {
                    log::debug!("[bracket] nesting exceeds {MAX_BRACKET_NESTING} at {offset}");
                    return offset;
                }
                stack.push(BracketMatch::new(detail, char_code, offset));
            }
            Role::Close => {
                let Some(last) = stack.pop() else {
                    return offset + 1;
                };
                if last.detail.pair != char_code {
                    log::debug!(
                        "[bracket] mismatched closer at {offset}, opener at {}",
                        last.offset
                    );
                    return last.offset;
                }
                if stack.is_empty() {
                    return offset + 1;
                }
            }
        }
        position.offset += 1;
    }

    match stack.first() {
        Some(outermost) => outermost.offset,
        None => start,
    }
}

/// Mirror of [`match_forward`], scanning left from the caret at `start`.
///
/// - matched: the opener;
/// - opener with nothing open: that opener;
/// - a right delimiter first seen away from the caret, or nesting beyond
///   [`MAX_BRACKET_NESTING`]: just past it;
/// - mismatch or start of text: `start`.
pub fn match_backward<B: TextBuffer + ?Sized>(
    buffer: &B,
    brackets: &BracketTable,
    start: usize,
) -> usize {
    let start = start.min(buffer.len());
    let mut stack: Vec<BracketMatch> = Vec::with_capacity(MAX_BRACKET_NESTING);
    let mut context: Option<&str> = None;
    let mut position = TextPosition {
        buffer,
        offset: start,
    };

    while position.offset > 0 {
        position.offset -= 1;
        let offset = position.offset;
        let char_code = position.char_code();
        let detail = brackets.detail_of(char_code);
        if detail.kind == BracketKind::None {
            continue;
        }
        let syntax = position.char_syntax();
        let context_syntax = *context.get_or_insert(syntax);
        if !syntax_equals(syntax, context_syntax) || is_quoted_out(detail, char_code, &stack) {
            continue;
        }

        position.move_while(|p| p.is_escape_in(brackets, context_syntax), isize::MIN);
        if (offset - position.offset) % 2 == 1 {
            continue;
        }

        match role_of(detail, char_code, &stack, false) {
            Role::Escape => {}
            Role::Open => {
                if stack.is_empty() && offset + 1 != start {
                    return offset + 1;
                }
                if stack.len() == MAX_BRACKET_NESTING {
                    log::debug!("[bracket] nesting exceeds {MAX_BRACKET_NESTING} at {offset}");
                    return offset + 1;
                }
                stack.push(BracketMatch::new(detail, char_code, offset));
            }
            Role::Close => {
                let Some(last) = stack.pop() else {
                    return offset;
                };
                if last.detail.pair != char_code {
                    log::debug!(
                        "[bracket] mismatched opener at {offset}, closer at {}",
                        last.offset
                    );
                    break;
                }
                if stack.is_empty() {
                    return offset;
                }
            }
        }
    }
    start
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::Document;

    #[test]
    fn position_rejects_offsets_past_the_end() {
        let doc = Document::new("abc");
        assert!(TextPosition::new(&doc, 3).is_ok());
        assert!(TextPosition::new(&doc, 4).is_err());
    }

    #[test]
    fn move_while_honours_count_and_direction() {
        let doc = Document::new("aaab");
        let mut p = TextPosition::new(&doc, 0).unwrap();
        p.move_while(|p| p.char_code() == 'a' as u32, 2);
        assert_eq!(p.offset(), 2);
        p.move_while(|p| p.char_code() == 'a' as u32, isize::MAX);
        assert_eq!(p.offset(), 3);
        p.move_while(|p| p.char_code() == 'a' as u32, -1);
        assert_eq!(p.offset(), 2);
        p.move_while(|p| p.char_code() == 'a' as u32, isize::MIN);
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn move_chars_clamps() {
        let doc = Document::new("abc");
        let mut p = TextPosition::new(&doc, 1).unwrap();
        assert_eq!(p.move_chars(-5).offset(), 0);
        assert_eq!(p.move_chars(10).offset(), 3);
    }

    #[test]
    fn symmetric_role_depends_on_innermost_entry() {
        let quote = BracketDetail::left('"');
        let q = '"' as u32;
        assert_eq!(role_of(quote, q, &[], true), Role::Open);
        let open = [BracketMatch::new(quote, q, 0)];
        assert_eq!(role_of(quote, q, &open, true), Role::Close);
        assert_eq!(role_of(quote, q, &open, false), Role::Close);
        assert_eq!(role_of(BracketDetail::right('('), ')' as u32, &[], false), Role::Open);
    }

    #[test]
    fn only_the_partner_and_escapes_count_inside_quotes() {
        let q = '"' as u32;
        let open = [BracketMatch::new(BracketDetail::left('"'), q, 0)];
        assert!(is_quoted_out(BracketDetail::left('\''), '\'' as u32, &open));
        assert!(is_quoted_out(BracketDetail::left(')'), '(' as u32, &open));
        assert!(!is_quoted_out(BracketDetail::left('"'), q, &open));
        assert!(!is_quoted_out(BracketDetail::escape(), '\\' as u32, &open));

        let paren = [BracketMatch::new(BracketDetail::left(')'), '(' as u32, 0)];
        assert!(!is_quoted_out(BracketDetail::left('\''), '\'' as u32, &paren));
    }
}
