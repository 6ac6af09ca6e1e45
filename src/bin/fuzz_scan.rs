// src/bin/fuzz_scan.rs
// Generate many random sources, highlight them, and check the scanner
// invariants in parallel.
//   FUZZ_CASES=N      number of cases (default 2000)
//   FUZZ_LEN=N        target length per case (default 512)
//   FUZZ_SEED=N       base seed (default 42)
//   FUZZ_LANG=name    built-in language (default "c")
//   FUZZ_DIR=dir      where failing cases are saved (default "fuzz-cases")

use std::{fs, path::Path, sync::Arc};

use anyhow::{Context, Result};
use rand::{SeedableRng, rngs::StdRng};
use rayon::prelude::*;
use synscan::{
    dev::generator::{gen_balanced, gen_source},
    lexer::{Highlighter, SyntaxRange, tables::languages},
    text::{BracketTable, Document, TextBuffer, match_backward, match_forward},
};

fn env_u64(name: &str, default: u64) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(default)
}

fn check_partition(ranges: &[SyntaxRange], len: usize) -> Result<(), String> {
    let mut at = 0;
    for (i, r) in ranges.iter().enumerate() {
        if r.start != at || r.end <= r.start {
            return Err(format!(
                "range {i} [{}, {}) does not continue at {at}",
                r.start, r.end
            ));
        }
        at = r.end;
    }
    if at != len {
        return Err(format!("ranges end at {at}, buffer length {len}"));
    }
    Ok(())
}

fn check_case(
    highlighter: &Highlighter,
    brackets: &BracketTable,
    seed: u64,
    len: usize,
) -> Result<(), String> {
    let mut rng = StdRng::seed_from_u64(seed);
    let src = gen_source(&mut rng, len);

    let mut doc = Document::new(&src);
    let first = highlighter.highlight(&mut doc);
    check_partition(&first, doc.len())?;
    let second = highlighter.highlight(&mut doc);
    if first != second {
        return Err("second highlight differs from the first".into());
    }

    for offset in 0..doc.len() {
        let fwd = match_forward(&doc, brackets, offset);
        let back = match_backward(&doc, brackets, offset);
        if fwd > doc.len() || back > doc.len() {
            return Err(format!("match from {offset} left the buffer: {fwd}/{back}"));
        }
    }

    let balanced = Document::new(&gen_balanced(&mut rng, 8));
    let end = match_forward(&balanced, brackets, 0);
    if end != balanced.len() {
        return Err(format!("balanced text matched to {end}, length {}", balanced.len()));
    }
    let back = match_backward(&balanced, brackets, end);
    if back != 0 {
        return Err(format!("balanced text matched back to {back}"));
    }
    Ok(())
}

fn save_case(dir: &str, seed: u64, len: usize, reason: &str) -> Result<String> {
    fs::create_dir_all(dir).with_context(|| format!("create {dir}"))?;
    let path = Path::new(dir).join(format!("scan_seed{seed}_len{len}.json"));
    let meta = serde_json::json!({
        "seed": seed,
        "target_len": len,
        "reason": reason,
        "replay": format!("FUZZ_SEED={seed} FUZZ_CASES=1 FUZZ_LEN={len} cargo run --bin fuzz_scan"),
    });
    let mut text = serde_json::to_string_pretty(&meta)?;
    text.push('\n');
    fs::write(&path, text).with_context(|| format!("write {}", path.display()))?;
    Ok(path.display().to_string())
}

fn main() -> Result<()> {
    let cases = env_u64("FUZZ_CASES", 2000);
    let len = env_u64("FUZZ_LEN", 512) as usize;
    let seed = env_u64("FUZZ_SEED", 42);
    let lang = std::env::var("FUZZ_LANG").unwrap_or_else(|_| "c".into());
    let dir = std::env::var("FUZZ_DIR").unwrap_or_else(|_| "fuzz-cases".into());

    let highlighter = Highlighter::new(Arc::new(languages::by_name(&lang)?));
    let brackets = BracketTable::standard();

    println!("[fuzz_scan] {cases} cases, len {len}, seed {seed}, language {lang}");
    let failures: Vec<(u64, String)> = (0..cases)
        .into_par_iter()
        .filter_map(|i| {
            let case_seed = seed.wrapping_add(i);
            check_case(&highlighter, &brackets, case_seed, len)
                .err()
                .map(|reason| (case_seed, reason))
        })
        .collect();

    for (case_seed, reason) in &failures {
        let saved = save_case(&dir, *case_seed, len, reason)?;
        eprintln!("❌ seed {case_seed}: {reason}\n  saved: {saved}");
    }
    if !failures.is_empty() {
        anyhow::bail!("{} of {cases} cases failed", failures.len());
    }
    println!("✅ all {cases} cases passed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_case_writes_replay_metadata() {
        let dir = std::env::temp_dir().join(format!("synscan-fuzz-{}", std::process::id()));
        let dir = dir.to_str().unwrap().to_string();
        let path = save_case(&dir, 7, 64, "boom").unwrap();
        let meta: serde_json::Value = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
        assert_eq!(meta["seed"], 7);
        assert_eq!(meta["reason"], "boom");
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn save_case_reports_io_errors() {
        let file = std::env::temp_dir().join(format!("synscan-fuzz-file-{}", std::process::id()));
        fs::write(&file, b"not a directory").unwrap();
        assert!(save_case(file.to_str().unwrap(), 1, 1, "x").is_err());
        fs::remove_file(&file).unwrap();
    }
}
