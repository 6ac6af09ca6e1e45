// src/lib.rs
pub mod config;
pub mod dev;
pub mod lexer;
pub mod text;
