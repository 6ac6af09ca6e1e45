// src/text/mod.rs
pub mod bracket;
pub mod document;
pub mod position;

pub use bracket::{BracketDetail, BracketKind, BracketTable, NOT_BRACKET};
pub use document::{Document, NORMAL_SYNTAX, TextBuffer, is_normal_syntax};
pub use position::{MAX_BRACKET_NESTING, TextPosition, match_backward, match_forward};
