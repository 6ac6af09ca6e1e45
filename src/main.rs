// src/main.rs
use std::{env, fs};

use anyhow::{Context, Result};
use synscan::{
    config::Config,
    text::{BracketKind, BracketTable, Document, TextBuffer, match_backward, match_forward},
};

fn visible(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

fn run() -> Result<()> {
    // A tiny sample covering identifiers, strings with escapes, comments, and brackets.
    let src = match env::args().nth(1) {
        Some(path) => fs::read_to_string(&path).with_context(|| format!("read {path}"))?,
        None => r#"
            int main(void) {
                puts("a(\"b\")"); /* ) */ // (
                return f(x[1], {2});
            }
        "#
        .to_string(),
    };

    let config = Config::from_env()?;
    let highlighter = config.highlighter()?;
    let mut doc = Document::new(&src);
    let ranges = highlighter.highlight(&mut doc);

    let mut keywords: Vec<&str> = highlighter.keywords().iter().collect();
    keywords.sort_unstable();
    println!("KEYWORDS ({}): {}", keywords.len(), keywords.join(" "));

    println!("RANGES ({}):", highlighter.tables().name());
    for r in &ranges {
        if r.syntax.is_empty() {
            continue;
        }
        println!(
            "[{:>4}, {:>4}) {:<10} \"{}\"",
            r.start,
            r.end,
            r.syntax,
            visible(&doc.slice(r.start, r.end))
        );
    }

    let brackets = BracketTable::standard();
    println!("BRACKETS:");
    for offset in 0..doc.len() {
        let code = doc.char_code_at(offset);
        if brackets.detail_of(code).kind != BracketKind::Left {
            continue;
        }
        let end = match_forward(&doc, &brackets, offset);
        let back = match_backward(&doc, &brackets, end);
        println!(
            "{:>4} {:?} [{}] -> {:>4} -> {:>4}",
            offset,
            char::from_u32(code).unwrap_or('?'),
            doc.syntax_at(offset),
            end,
            back
        );
    }
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("synscan: {e:#}");
        std::process::exit(1);
    }
}
