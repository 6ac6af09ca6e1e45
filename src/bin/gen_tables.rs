// src/bin/gen_tables.rs
// Writes every built-in language table to tables/<name>.{bin,json}.
//   GEN_TABLES_DIR=... overrides the output directory.

use std::{fs, path::PathBuf};

use anyhow::Result;
use synscan::lexer::tables::{languages, save_tables_bin, save_tables_json};

fn main() -> Result<()> {
    let out_dir =
        PathBuf::from(std::env::var("GEN_TABLES_DIR").unwrap_or_else(|_| "tables".into()));
    fs::create_dir_all(&out_dir)?;

    for name in languages::LANGUAGES {
        let tables = languages::by_name(name)?;
        let bin = out_dir.join(format!("{name}.bin"));
        let json = out_dir.join(format!("{name}.json"));
        save_tables_bin(&bin, &tables)?;
        save_tables_json(&json, &tables)?;

        let bytes = fs::metadata(&bin)?.len();
        println!(
            "[gen_tables] {name}: {} states x {} alphabets, {} bytes -> {}",
            tables.num_states(),
            tables.num_alphabets(),
            bytes,
            bin.display()
        );
    }
    Ok(())
}
