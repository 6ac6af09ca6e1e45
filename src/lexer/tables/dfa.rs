// src/lexer/tables/dfa.rs
use anyhow::{Result, bail};
use hashbrown::HashMap;

use super::{GROUND, Tables};

/// Column 128 stands for every character code >= 128.
const NON_ASCII: usize = 128;
const N_COLUMNS: usize = 129;

struct StateSpec {
    comment: String,
    label: String,
    accept: bool,
}

/// Hand-built DFA, materialized per character code and then compressed into
/// alphabet classes.
///
/// Edges that are never set lead to the ground state, i.e. "token complete,
/// redispatch this character".
pub struct DfaBuilder {
    name: String,
    states: Vec<StateSpec>,
    next: Vec<[u16; N_COLUMNS]>, // [state][column] -> state
}

impl DfaBuilder {
    /// Starts a builder whose state 0 is the ground state with `ground_label`.
    pub fn new(name: &str, ground_label: &str) -> Self {
        let mut b = Self {
            name: name.to_string(),
            states: Vec::new(),
            next: Vec::new(),
        };
        b.state("ground", ground_label, false);
        b
    }

    pub fn state(&mut self, comment: &str, label: &str, accept: bool) -> u16 {
        let id = self.states.len() as u16;
        self.states.push(StateSpec {
            comment: comment.to_string(),
            label: label.to_string(),
            accept,
        });
        self.next.push([GROUND; N_COLUMNS]);
        id
    }

    pub fn set(&mut self, from: u16, bytes: &[u8], to: u16) -> &mut Self {
        for &b in bytes {
            debug_assert!(b.is_ascii(), "non-ASCII byte {b:#x}; use set_non_ascii");
            self.next[from as usize][b as usize] = to;
        }
        self
    }

    pub fn set_range(&mut self, from: u16, lo: u8, hi: u8, to: u16) -> &mut Self {
        for b in lo..=hi {
            self.next[from as usize][b as usize] = to;
        }
        self
    }

    pub fn set_non_ascii(&mut self, from: u16, to: u16) -> &mut Self {
        self.next[from as usize][NON_ASCII] = to;
        self
    }

    /// Every ASCII code outside `except`, plus non-ASCII.
    pub fn set_all_except(&mut self, from: u16, except: &[u8], to: u16) -> &mut Self {
        let mut skip = [false; N_COLUMNS];
        for &e in except {
            skip[e as usize] = true;
        }
        for (column, next) in self.next[from as usize].iter_mut().enumerate() {
            if !skip[column] {
                *next = to;
            }
        }
        self
    }

    /// Interns identical columns into alphabet classes and emits validated tables.
    pub fn build(&self) -> Result<Tables> {
        let n_states = self.states.len();
        if n_states > u16::MAX as usize {
            bail!("dfa '{}': {n_states} states do not fit in u16", self.name);
        }

        let column = |c: usize| -> Vec<u16> { self.next.iter().map(|row| row[c]).collect() };

        // Non-ASCII goes first so it is always class 0.
        let mut classes: Vec<Vec<u16>> = vec![column(NON_ASCII)];
        let mut map: HashMap<Vec<u16>, u16> = HashMap::new();
        map.insert(classes[0].clone(), 0);

        let mut alphabet_of = [0u16; 256];
        for c in 0..NON_ASCII {
            let col = column(c);
            let id = *map.entry(col.clone()).or_insert_with(|| {
                classes.push(col);
                (classes.len() - 1) as u16
            });
            alphabet_of[c] = id;
        }

        let num_alphabets = classes.len();
        let mut transitions = vec![GROUND; n_states * num_alphabets];
        for (a, col) in classes.iter().enumerate() {
            for (s, &to) in col.iter().enumerate() {
                transitions[s * num_alphabets + a] = to;
            }
        }

        log::debug!(
            "[dfa] '{}': {} states, {} alphabet classes",
            self.name,
            n_states,
            num_alphabets
        );
        for (id, spec) in self.states.iter().enumerate() {
            log::trace!(
                "  s{id} {:<20} label={:?}{}",
                spec.comment,
                spec.label,
                if spec.accept { " ACCEPT" } else { "" }
            );
        }

        Tables::new(
            self.name.clone(),
            n_states as u16,
            num_alphabets as u16,
            alphabet_of,
            self.states.iter().map(|s| s.accept).collect(),
            self.states.iter().map(|s| s.label.clone()).collect(),
            transitions,
        )
    }
}
