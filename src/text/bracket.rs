// src/text/bracket.rs
use hashbrown::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BracketKind {
    None,
    Left,
    Right,
    Escape,
}

/// Delimiter class of one character code plus, for LEFT/RIGHT, the code of
/// its partner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BracketDetail {
    pub kind: BracketKind,
    pub pair: u32,
}

pub const NOT_BRACKET: BracketDetail = BracketDetail {
    kind: BracketKind::None,
    pair: 0,
};

impl BracketDetail {
    pub const fn left(pair: char) -> Self {
        Self {
            kind: BracketKind::Left,
            pair: pair as u32,
        }
    }

    pub const fn right(pair: char) -> Self {
        Self {
            kind: BracketKind::Right,
            pair: pair as u32,
        }
    }

    pub const fn escape() -> Self {
        Self {
            kind: BracketKind::Escape,
            pair: 0,
        }
    }

    /// A LEFT paired with itself, such as a quote: it both opens and closes.
    #[inline]
    pub fn is_symmetric(&self, char_code: u32) -> bool {
        self.kind == BracketKind::Left && self.pair == char_code
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BracketTable {
    entries: HashMap<u32, BracketDetail>,
}

impl BracketTable {
    pub fn empty() -> Self {
        Self::default()
    }

    /// `()`, `[]`, `{}`, backslash escape, and `"`/`'` as symmetric delimiters.
    pub fn standard() -> Self {
        let mut t = Self::empty();
        t.set_pair('(', ')')
            .set_pair('[', ']')
            .set_pair('{', '}')
            .set('"', BracketDetail::left('"'))
            .set('\'', BracketDetail::left('\''))
            .set('\\', BracketDetail::escape());
        t
    }

    pub fn set(&mut self, ch: char, detail: BracketDetail) -> &mut Self {
        if detail.kind == BracketKind::None {
            self.entries.remove(&(ch as u32));
        } else {
            self.entries.insert(ch as u32, detail);
        }
        self
    }

    pub fn set_pair(&mut self, left: char, right: char) -> &mut Self {
        self.set(left, BracketDetail::left(right))
            .set(right, BracketDetail::right(left))
    }

    #[inline]
    pub fn detail_of(&self, char_code: u32) -> BracketDetail {
        self.entries.get(&char_code).copied().unwrap_or(NOT_BRACKET)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_pairs_point_at_each_other() {
        let t = BracketTable::standard();
        assert_eq!(t.detail_of('(' as u32), BracketDetail::left(')'));
        assert_eq!(t.detail_of('}' as u32), BracketDetail::right('{'));
        assert_eq!(t.detail_of('\\' as u32).kind, BracketKind::Escape);
        assert_eq!(t.detail_of('x' as u32), NOT_BRACKET);
        assert!(t.detail_of('"' as u32).is_symmetric('"' as u32));
        assert!(!t.detail_of('(' as u32).is_symmetric('(' as u32));
    }

    #[test]
    fn setting_none_removes_an_entry() {
        let mut t = BracketTable::standard();
        t.set('\'', NOT_BRACKET);
        assert_eq!(t.detail_of('\'' as u32), NOT_BRACKET);
    }
}
