// src/lexer/tables/mod.rs
pub mod dfa;
pub mod io;
pub mod languages;

use anyhow::{Result, bail};

pub use dfa::DfaBuilder;
pub use io::{
    load_tables_bin_bytes, load_tables_file, load_tables_json_bytes, save_tables_bin,
    save_tables_json, write_tables_bin,
};

/// The ground state: initial state, and the value a transition yields when
/// the previous token just completed.
pub const GROUND: u16 = 0;

/// Character codes at or above this collapse to alphabet class 0.
pub const ASCII_LIMIT: u32 = 128;

/// Immutable automaton description for one language.
///
/// Built once (by [`DfaBuilder`] or a loader) and shared by every scan of
/// that language. All fields are validated on construction, so lookups never
/// go out of bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tables {
    name: String,
    num_states: u16,
    num_alphabets: u16,
    alphabet_of: [u16; 256],
    accept: Vec<bool>,
    labels: Vec<String>,
    transitions: Vec<u16>, // num_states * num_alphabets, state-major
}

impl Tables {
    pub fn new(
        name: impl Into<String>,
        num_states: u16,
        num_alphabets: u16,
        alphabet_of: [u16; 256],
        accept: Vec<bool>,
        labels: Vec<String>,
        transitions: Vec<u16>,
    ) -> Result<Self> {
        let name = name.into();
        if num_states == 0 {
            bail!("tables '{name}': at least the ground state is required");
        }
        if num_alphabets == 0 {
            bail!("tables '{name}': at least one alphabet class is required");
        }
        if accept.len() != num_states as usize {
            bail!(
                "tables '{name}': accept has {} entries, expected {num_states}",
                accept.len()
            );
        }
        if labels.len() != num_states as usize {
            bail!(
                "tables '{name}': label has {} entries, expected {num_states}",
                labels.len()
            );
        }
        let expected = num_states as usize * num_alphabets as usize;
        if transitions.len() != expected {
            bail!(
                "tables '{name}': transitions has {} entries, expected {expected}",
                transitions.len()
            );
        }
        if let Some((code, &a)) = alphabet_of
            .iter()
            .enumerate()
            .find(|&(_, &a)| a >= num_alphabets)
        {
            bail!("tables '{name}': alphabet_of[{code}] = {a} out of range (< {num_alphabets})");
        }
        if let Some((i, &s)) = transitions
            .iter()
            .enumerate()
            .find(|&(_, &s)| s >= num_states)
        {
            let n = num_alphabets as usize;
            bail!(
                "tables '{name}': transition s{}/a{} -> s{s} out of range (< {num_states})",
                i / n,
                i % n
            );
        }
        Ok(Self {
            name,
            num_states,
            num_alphabets,
            alphabet_of,
            accept,
            labels,
            transitions,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn num_states(&self) -> u16 {
        self.num_states
    }

    pub fn num_alphabets(&self) -> u16 {
        self.num_alphabets
    }

    pub fn alphabet_map(&self) -> &[u16; 256] {
        &self.alphabet_of
    }

    pub fn accept_flags(&self) -> &[bool] {
        &self.accept
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn transition_matrix(&self) -> &[u16] {
        &self.transitions
    }

    /// Alphabet class of a character code; everything non-ASCII is class 0.
    #[inline]
    pub fn alphabet_of(&self, char_code: u32) -> u16 {
        if char_code >= ASCII_LIMIT {
            0
        } else {
            self.alphabet_of[char_code as usize]
        }
    }

    #[inline]
    pub fn next_state(&self, state: u16, alphabet: u16) -> u16 {
        debug_assert!(state < self.num_states, "state {state}");
        debug_assert!(alphabet < self.num_alphabets, "alphabet {alphabet}");
        self.transitions[state as usize * self.num_alphabets as usize + alphabet as usize]
    }

    #[inline]
    pub fn is_acceptable(&self, state: u16) -> bool {
        self.accept[state as usize]
    }

    #[inline]
    pub fn syntax_of(&self, state: u16) -> &str {
        &self.labels[state as usize]
    }
}
