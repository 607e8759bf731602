use std::cmp::Ordering;

use hashbrown::HashSet;

use super::tokens::{INVALID_TOKEN, TokenKind};
use crate::lexer::error::TableError;

/// Class every char falls into when no explicit class covers it.
pub const OTHER_CLASS: u16 = 0;

pub const ASCII_LEN: usize = 128;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(pub u32);

impl StateId {
    #[inline]
    pub fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Inclusive code point range `lo..=hi` mapped to one class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassRange {
    pub lo: u32,
    pub hi: u32,
    pub class: u16,
}

/// char -> class id. ASCII is a flat array; everything above is a sorted,
/// disjoint list of ranges, and anything not listed is `OTHER_CLASS`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassMap {
    pub ascii: [u16; ASCII_LEN],
    pub ranges: Vec<ClassRange>,
}

impl Default for ClassMap {
    fn default() -> Self {
        Self {
            ascii: [OTHER_CLASS; ASCII_LEN],
            ranges: Vec::new(),
        }
    }
}

impl ClassMap {
    #[inline]
    pub fn class_of(&self, ch: char) -> u16 {
        let c = ch as u32;
        if c < ASCII_LEN as u32 {
            return self.ascii[c as usize];
        }
        self.ranges
            .binary_search_by(|r| {
                if r.hi < c {
                    Ordering::Less
                } else if r.lo > c {
                    Ordering::Greater
                } else {
                    Ordering::Equal
                }
            })
            .map(|i| self.ranges[i].class)
            .unwrap_or(OTHER_CLASS)
    }

    /// Code point ranges belonging to `class`, ascending. `OTHER_CLASS` also
    /// includes the gaps, which are not listed.
    pub fn ranges_of(&self, class: u16) -> Vec<(u32, u32)> {
        let mut out: Vec<(u32, u32)> = Vec::new();
        let mut push = |lo: u32, hi: u32| match out.last_mut() {
            Some(last) if last.1 + 1 == lo => last.1 = hi,
            _ => out.push((lo, hi)),
        };
        for (c, &k) in self.ascii.iter().enumerate() {
            if k == class {
                push(c as u32, c as u32);
            }
        }
        for r in &self.ranges {
            if r.class == class {
                push(r.lo, r.hi);
            }
        }
        out
    }

    fn validate(&self, n_classes: u32) -> Result<(), TableError> {
        for &k in &self.ascii {
            if u32::from(k) >= n_classes {
                return Err(TableError::ClassOutOfRange {
                    class: k.into(),
                    n_classes,
                });
            }
        }
        let mut prev_hi: Option<u32> = None;
        for (index, r) in self.ranges.iter().enumerate() {
            let sorted = prev_hi.is_none_or(|hi| r.lo > hi);
            if r.lo > r.hi || r.lo < ASCII_LEN as u32 || r.hi > char::MAX as u32 || !sorted {
                return Err(TableError::BadClassRange { index });
            }
            if u32::from(r.class) >= n_classes {
                return Err(TableError::ClassOutOfRange {
                    class: r.class.into(),
                    n_classes,
                });
            }
            prev_hi = Some(r.hi);
        }
        Ok(())
    }
}

/// Raw construction contract handed over by a rule compiler (or loaded
/// from disk). Turned into an `AutomatonTable` only after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableParts {
    pub n_states: u32,
    pub n_classes: u32,
    pub classes: ClassMap,
    /// `n_states * n_classes`, row-major by state.
    pub next: Vec<u32>,
    /// Per state: token kind id, or `INVALID_TOKEN` when not accepting.
    pub token_of: Vec<u32>,
    pub kind_names: Vec<String>,
    pub start: u32,
    pub error: u32,
}

/// Compiled DFA, immutable after construction. Share it by reference across
/// as many scanners (and threads) as needed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutomatonTable {
    classes: ClassMap,
    n_states: u32,
    n_classes: u32,
    next: Vec<u32>,
    token_of: Vec<u32>,
    kind_names: Vec<String>,
    start: StateId,
    error: StateId,
}

impl AutomatonTable {
    pub fn from_parts(parts: TableParts) -> Result<Self, TableError> {
        let TableParts {
            n_states,
            n_classes,
            classes,
            next,
            token_of,
            kind_names,
            start,
            error,
        } = parts;

        if n_states == 0 {
            return Err(TableError::NoStates);
        }
        if n_classes == 0 {
            return Err(TableError::NoClasses);
        }
        if n_classes > u32::from(u16::MAX) + 1 {
            return Err(TableError::TooManyClasses {
                classes: n_classes as usize,
            });
        }
        if start >= n_states {
            return Err(TableError::InitialOutOfRange {
                state: start,
                n_states,
            });
        }
        if error >= n_states {
            return Err(TableError::ErrorOutOfRange {
                state: error,
                n_states,
            });
        }

        let expected = n_states as usize * n_classes as usize;
        if next.len() != expected {
            return Err(TableError::TransitionShape {
                expected,
                found: next.len(),
            });
        }
        if token_of.len() != n_states as usize {
            return Err(TableError::TokenMapShape {
                expected: n_states as usize,
                found: token_of.len(),
            });
        }

        for (i, &target) in next.iter().enumerate() {
            if target >= n_states {
                return Err(TableError::TargetOutOfRange {
                    state: (i / n_classes as usize) as u32,
                    class: (i % n_classes as usize) as u32,
                    target,
                });
            }
        }

        for (state, &kind) in token_of.iter().enumerate() {
            if kind != INVALID_TOKEN && kind as usize >= kind_names.len() {
                return Err(TableError::UnknownKind {
                    state: state as u32,
                    kind,
                    n_kinds: kind_names.len(),
                });
            }
        }
        {
            let mut seen = HashSet::with_capacity(kind_names.len());
            for name in &kind_names {
                if name == TokenKind::ERROR_NAME || !seen.insert(name.as_str()) {
                    return Err(TableError::DuplicateKindName(name.clone()));
                }
            }
        }

        let error_kind = token_of[error as usize];
        if error_kind != INVALID_TOKEN {
            return Err(TableError::ErrorStateAccepting {
                state: error,
                kind: error_kind,
            });
        }

        classes.validate(n_classes)?;

        log::debug!(
            "[tables] automaton ready: {n_states} states, {n_classes} classes, {} kinds",
            kind_names.len()
        );

        Ok(Self {
            classes,
            n_states,
            n_classes,
            next,
            token_of,
            kind_names,
            start: StateId(start),
            error: StateId(error),
        })
    }

    pub fn to_parts(&self) -> TableParts {
        TableParts {
            n_states: self.n_states,
            n_classes: self.n_classes,
            classes: self.classes.clone(),
            next: self.next.clone(),
            token_of: self.token_of.clone(),
            kind_names: self.kind_names.clone(),
            start: self.start.0,
            error: self.error.0,
        }
    }

    #[inline]
    pub fn initial_state(&self) -> StateId {
        self.start
    }

    #[inline]
    pub fn error_state(&self) -> StateId {
        self.error
    }

    #[inline]
    pub fn state_count(&self) -> usize {
        self.n_states as usize
    }

    #[inline]
    pub fn class_count(&self) -> usize {
        self.n_classes as usize
    }

    pub fn class_map(&self) -> &ClassMap {
        &self.classes
    }

    #[inline]
    pub fn class_of(&self, ch: char) -> u16 {
        self.classes.class_of(ch)
    }

    #[inline]
    pub fn transition_class(&self, state: StateId, class: u16) -> StateId {
        StateId(self.next[state.idx() * self.n_classes as usize + class as usize])
    }

    /// Total transition function; unmapped pairs land in the error state.
    #[inline]
    pub fn transition(&self, state: StateId, ch: char) -> StateId {
        self.transition_class(state, self.class_of(ch))
    }

    #[inline]
    pub fn token_kind(&self, state: StateId) -> Option<TokenKind> {
        match self.token_of[state.idx()] {
            INVALID_TOKEN => None,
            k => Some(TokenKind(k)),
        }
    }

    #[inline]
    pub fn is_accepting(&self, state: StateId) -> bool {
        self.token_of[state.idx()] != INVALID_TOKEN
    }

    #[inline]
    pub fn is_error(&self, state: StateId) -> bool {
        state == self.error
    }

    pub fn kind_count(&self) -> usize {
        self.kind_names.len()
    }

    /// Stable diagnostic name of `kind`; `"?"` for ids this table never issued.
    pub fn kind_name(&self, kind: TokenKind) -> &str {
        if kind.is_error() {
            return TokenKind::ERROR_NAME;
        }
        self.kind_names
            .get(kind.0 as usize)
            .map(String::as_str)
            .unwrap_or("?")
    }

    pub fn kind_by_name(&self, name: &str) -> Option<TokenKind> {
        if name == TokenKind::ERROR_NAME {
            return Some(TokenKind::ERROR);
        }
        self.kind_names
            .iter()
            .position(|n| n == name)
            .map(|i| TokenKind(i as u32))
    }

    pub fn kinds(&self) -> impl Iterator<Item = (TokenKind, &str)> + '_ {
        self.kind_names
            .iter()
            .enumerate()
            .map(|(i, n)| (TokenKind(i as u32), n.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Two states plus error: 0 --[a]--> 1 (accepts kind 0), everything else errors.
    fn parts() -> TableParts {
        let mut classes = ClassMap::default();
        classes.ascii[b'a' as usize] = 1;
        TableParts {
            n_states: 3,
            n_classes: 2,
            classes,
            next: vec![2, 1, 2, 2, 2, 2],
            token_of: vec![INVALID_TOKEN, 0, INVALID_TOKEN],
            kind_names: vec!["A".into()],
            start: 0,
            error: 2,
        }
    }

    #[test]
    fn lookups_follow_matrix() {
        let t = AutomatonTable::from_parts(parts()).unwrap();
        assert_eq!(t.transition(t.initial_state(), 'a'), StateId(1));
        assert_eq!(t.transition(t.initial_state(), 'b'), t.error_state());
        assert_eq!(t.transition(t.initial_state(), 'é'), t.error_state());
        assert_eq!(t.token_kind(StateId(1)), Some(TokenKind(0)));
        assert_eq!(t.kind_name(TokenKind(0)), "A");
        assert_eq!(t.kind_name(TokenKind::ERROR), "ERROR");
        assert_eq!(t.kind_name(TokenKind(7)), "?");
    }

    #[test]
    fn rejects_initial_out_of_range() {
        let mut p = parts();
        p.start = 3;
        assert!(matches!(
            AutomatonTable::from_parts(p),
            Err(TableError::InitialOutOfRange { state: 3, .. })
        ));
    }

    #[test]
    fn rejects_accepting_error_state() {
        let mut p = parts();
        p.token_of[2] = 0;
        assert!(matches!(
            AutomatonTable::from_parts(p),
            Err(TableError::ErrorStateAccepting { state: 2, .. })
        ));
    }

    #[test]
    fn rejects_reserved_and_repeated_kind_names() {
        let mut p = parts();
        p.kind_names = vec!["ERROR".into()];
        assert!(matches!(
            AutomatonTable::from_parts(p),
            Err(TableError::DuplicateKindName(name)) if name == "ERROR"
        ));

        let mut p = parts();
        p.kind_names = vec!["A".into(), "A".into()];
        assert!(matches!(
            AutomatonTable::from_parts(p),
            Err(TableError::DuplicateKindName(name)) if name == "A"
        ));
    }

    #[test]
    fn rejects_dangling_target_and_bad_shape() {
        let mut p = parts();
        p.next[1] = 9;
        assert!(matches!(
            AutomatonTable::from_parts(p),
            Err(TableError::TargetOutOfRange { target: 9, .. })
        ));

        let mut p = parts();
        p.next.pop();
        assert!(matches!(
            AutomatonTable::from_parts(p),
            Err(TableError::TransitionShape { expected: 6, found: 5 })
        ));
    }

    #[test]
    fn rejects_overlapping_class_ranges() {
        let mut p = parts();
        p.classes.ranges = vec![
            ClassRange { lo: 0x100, hi: 0x200, class: 1 },
            ClassRange { lo: 0x150, hi: 0x300, class: 1 },
        ];
        assert!(matches!(
            AutomatonTable::from_parts(p),
            Err(TableError::BadClassRange { index: 1 })
        ));
    }

    #[test]
    fn non_ascii_ranges_are_binary_searched() {
        let mut p = parts();
        p.classes.ranges = vec![
            ClassRange { lo: 0x3B1, hi: 0x3C9, class: 1 },
            ClassRange { lo: 0x4E00, hi: 0x9FFF, class: 1 },
        ];
        let t = AutomatonTable::from_parts(p).unwrap();
        assert_eq!(t.class_of('β'), 1);
        assert_eq!(t.class_of('中'), 1);
        assert_eq!(t.class_of('§'), OTHER_CLASS);
        assert_eq!(t.transition(t.initial_state(), 'λ'), StateId(1));
    }
}
