// src/lexer/mod.rs
pub mod machine;
pub mod painter;
pub mod tables;

pub use machine::TokenStateMachine;
pub use painter::{
    Highlighter, KeywordPainter, KeywordSet, LabelPainter, Painter, SyntaxRange, Token, classify,
    paint, tokenize,
};
pub use tables::Tables;
