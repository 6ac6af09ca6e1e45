// src/lexer/machine.rs
// Table-driven token state machine, one character code per step.

use crate::lexer::tables::{GROUND, Tables};

/// Line separator fed once before a scan so the first real character sees
/// the same state it would after a line break.
pub const LINE_SEPARATOR: u32 = '\n' as u32;

#[derive(Debug, Clone)]
pub struct TokenStateMachine<'t> {
    tables: &'t Tables,
    state: u16,
}

impl<'t> TokenStateMachine<'t> {
    pub fn new(tables: &'t Tables) -> Self {
        Self {
            tables,
            state: GROUND,
        }
    }

    pub fn tables(&self) -> &'t Tables {
        self.tables
    }

    pub fn state(&self) -> u16 {
        self.state
    }

    /// One table lookup. A result of [`GROUND`] means the previous token just
    /// completed and `char_code` is still unclassified.
    #[inline]
    pub fn update_state(&mut self, char_code: u32) -> u16 {
        let alphabet = self.tables.alphabet_of(char_code);
        self.state = self.tables.next_state(self.state, alphabet);
        self.state
    }

    /// [`update_state`](Self::update_state) plus the redispatch rule: on
    /// [`GROUND`], the same character is fed again from the fresh state.
    #[inline]
    pub fn advance(&mut self, char_code: u32) -> u16 {
        let state = self.update_state(char_code);
        if state != GROUND {
            return state;
        }
        self.update_state(char_code)
    }

    pub fn is_acceptable(&self, state: u16) -> bool {
        self.tables.is_acceptable(state)
    }

    pub fn syntax_of(&self, state: u16) -> &'t str {
        self.tables.syntax_of(state)
    }

    pub fn reset_to(&mut self, state: u16) {
        debug_assert!(state < self.tables.num_states(), "state {state}");
        self.state = state;
    }
}

impl std::fmt::Display for TokenStateMachine<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "TokenStateMachine({}, state: {})",
            self.tables.name(),
            self.state
        )
    }
}
