// src/config.rs
// Session configuration: defaults, then an optional JSON file, then env.
//
//   SYNSCAN_CONFIG=path.json   JSON file with any of the fields below
//   SYNSCAN_LANG=c|gn|string   built-in language
//   SYNSCAN_TABLES=path        .json/.bin tables overriding the built-in
//   SYNSCAN_KEYWORDS=a,b,c     extra session keywords

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::lexer::{
    Highlighter, KeywordSet,
    tables::{Tables, languages, load_tables_file},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub language: String,
    pub tables: Option<PathBuf>,
    pub keywords: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: "c".into(),
            tables: None,
            keywords: Vec::new(),
        }
    }
}

fn env_nonempty(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    pub fn from_json_bytes(data: &[u8]) -> Result<Self> {
        serde_json::from_slice(data).context("failed to parse config JSON")
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let data = std::fs::read(path).with_context(|| format!("read {}", path.display()))?;
        Self::from_json_bytes(&data).with_context(|| format!("load {}", path.display()))
    }

    /// Defaults, overlaid by `SYNSCAN_CONFIG` and the other `SYNSCAN_*` vars.
    pub fn from_env() -> Result<Self> {
        let mut config = match env_nonempty("SYNSCAN_CONFIG") {
            Some(path) => Self::from_file(Path::new(&path))?,
            None => Self::default(),
        };
        if let Some(lang) = env_nonempty("SYNSCAN_LANG") {
            config.language = lang;
        }
        if let Some(path) = env_nonempty("SYNSCAN_TABLES") {
            config.tables = Some(PathBuf::from(path));
        }
        if let Some(words) = env_nonempty("SYNSCAN_KEYWORDS") {
            config.keywords.extend(
                words
                    .split(',')
                    .map(str::trim)
                    .filter(|w| !w.is_empty())
                    .map(str::to_string),
            );
        }
        Ok(config)
    }

    pub fn tables(&self) -> Result<Tables> {
        match &self.tables {
            Some(path) => load_tables_file(path),
            None => languages::by_name(&self.language),
        }
    }

    /// Built-in keywords of the language plus the configured extras.
    pub fn keywords(&self) -> KeywordSet {
        let mut set = KeywordSet::for_language(&self.language);
        for word in &self.keywords {
            set.add(word);
        }
        set
    }

    pub fn highlighter(&self) -> Result<Highlighter> {
        let tables = self.tables()?;
        Ok(Highlighter::with_keywords(Arc::new(tables), self.keywords()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_fields_default_individually() {
        let c = Config::from_json_bytes(br#"{"language":"gn","keywords":["group"]}"#).unwrap();
        assert_eq!(c.language, "gn");
        assert_eq!(c.tables, None);
        let kw = c.keywords();
        assert!(kw.contains("group"));
        assert!(kw.contains("foreach"));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(Config::from_json_bytes(br#"{"lang":"c"}"#).is_err());
    }

    #[test]
    fn default_builds_a_c_highlighter() {
        let h = Config::default().highlighter().unwrap();
        assert_eq!(h.tables().name(), "c");
        assert!(h.keywords().contains("while"));
    }
}
