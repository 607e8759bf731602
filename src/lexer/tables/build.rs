// src/lexer/tables/build.rs
use std::{collections::BTreeSet, time::Instant};

use hashbrown::HashMap;

use super::{
    dfa::{ASCII_LEN, AutomatonTable, ClassMap, ClassRange, OTHER_CLASS, StateId, TableParts},
    tokens::{INVALID_TOKEN, TokenKind},
};
use crate::lexer::error::TableError;

const CHAR_END: u32 = char::MAX as u32 + 1;

#[derive(Clone, Default)]
struct StateSpec {
    // (lo, hi, target), inclusive; earlier edges win on overlap
    edges: Vec<(u32, u32, u32)>,
    default: Option<u32>,
    accept: Option<u32>,
}

/// Assembles an `AutomatonTable` from per-state char-range edges.
///
/// The char space is cut at every edge boundary; each resulting interval
/// gets a column (target per state) and identical columns are interned
/// into one character class. State 0 is the initial state and state 1 the
/// error sink.
pub struct TableBuilder {
    states: Vec<StateSpec>,
    kind_names: Vec<String>,
    kind_ids: HashMap<String, u32>,
    dangling: Option<u32>,
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TableBuilder {
    pub const START: StateId = StateId(0);
    pub const ERROR: StateId = StateId(1);

    pub fn new() -> Self {
        Self {
            states: vec![StateSpec::default(), StateSpec::default()],
            kind_names: Vec::new(),
            kind_ids: HashMap::new(),
            dangling: None,
        }
    }

    /// Registers a token kind name; ids are handed out in call order.
    pub fn kind(&mut self, name: &str) -> Result<TokenKind, TableError> {
        if name == TokenKind::ERROR_NAME || self.kind_ids.contains_key(name) {
            return Err(TableError::DuplicateKindName(name.to_string()));
        }
        let id = self.kind_names.len() as u32;
        self.kind_names.push(name.to_string());
        self.kind_ids.insert(name.to_string(), id);
        Ok(TokenKind(id))
    }

    pub fn state(&mut self) -> StateId {
        self.states.push(StateSpec::default());
        StateId(self.states.len() as u32 - 1)
    }

    /// New state that accepts `kind`.
    pub fn accepting(&mut self, kind: TokenKind) -> StateId {
        let s = self.state();
        self.states[s.idx()].accept = Some(kind.0);
        s
    }

    pub fn accept(&mut self, state: StateId, kind: TokenKind) -> &mut Self {
        if let Some(spec) = self.spec(state) {
            spec.accept = Some(kind.0);
        }
        self
    }

    pub fn on(&mut self, from: StateId, ch: char, to: StateId) -> &mut Self {
        self.on_range(from, ch, ch, to)
    }

    pub fn on_range(&mut self, from: StateId, lo: char, hi: char, to: StateId) -> &mut Self {
        if let Some(spec) = self.spec(from) {
            spec.edges.push((lo as u32, hi as u32, to.0));
        }
        self
    }

    pub fn on_any(&mut self, from: StateId, chars: &str, to: StateId) -> &mut Self {
        for ch in chars.chars() {
            self.on(from, ch, to);
        }
        self
    }

    /// Target for every char no explicit edge of `from` covers.
    pub fn otherwise(&mut self, from: StateId, to: StateId) -> &mut Self {
        if let Some(spec) = self.spec(from) {
            spec.default = Some(to.0);
        }
        self
    }

    // Unknown ids are remembered and reported by `build`.
    fn spec(&mut self, state: StateId) -> Option<&mut StateSpec> {
        if state.idx() >= self.states.len() {
            self.dangling.get_or_insert(state.0);
            return None;
        }
        self.states.get_mut(state.idx())
    }

    pub fn build(&self) -> Result<AutomatonTable, TableError> {
        let t0 = Instant::now();
        let n_states = self.states.len() as u32;
        let error = Self::ERROR.0;

        if let Some(state) = self.dangling {
            return Err(TableError::UnknownState(state));
        }
        for spec in &self.states {
            for &(lo, hi, to) in &spec.edges {
                if lo > hi {
                    return Err(TableError::EmptyCharRange {
                        lo: char::from_u32(lo).unwrap_or(char::REPLACEMENT_CHARACTER),
                        hi: char::from_u32(hi).unwrap_or(char::REPLACEMENT_CHARACTER),
                    });
                }
                if to >= n_states {
                    return Err(TableError::UnknownState(to));
                }
            }
            if let Some(to) = spec.default {
                if to >= n_states {
                    return Err(TableError::UnknownState(to));
                }
            }
        }

        let mut cuts: BTreeSet<u32> = BTreeSet::from([0, ASCII_LEN as u32, CHAR_END]);
        for spec in &self.states {
            for &(lo, hi, _) in &spec.edges {
                cuts.insert(lo);
                cuts.insert(hi + 1);
            }
        }
        let cuts: Vec<u32> = cuts.into_iter().collect();

        let column_at = |c: Option<u32>| -> Vec<u32> {
            self.states
                .iter()
                .enumerate()
                .map(|(s, spec)| {
                    if s as u32 == error {
                        return error;
                    }
                    c.and_then(|c| {
                        spec.edges
                            .iter()
                            .find(|&&(lo, hi, _)| lo <= c && c <= hi)
                            .map(|&(_, _, to)| to)
                    })
                    .or(spec.default)
                    .unwrap_or(error)
                })
                .collect()
        };

        // Interner (column -> class id); the "no edge matches" column is class 0.
        let mut columns: Vec<Vec<u32>> = Vec::new();
        let mut interned: HashMap<Vec<u32>, u16> = HashMap::new();
        let other = column_at(None);
        interned.insert(other.clone(), OTHER_CLASS);
        columns.push(other);

        let mut classes = ClassMap::default();
        for w in cuts.windows(2) {
            let (lo, hi) = (w[0], w[1] - 1);
            let col = column_at(Some(lo));
            let class = match interned.get(&col) {
                Some(&id) => id,
                None => {
                    let id = u16::try_from(columns.len()).map_err(|_| {
                        TableError::TooManyClasses {
                            classes: columns.len() + 1,
                        }
                    })?;
                    interned.insert(col.clone(), id);
                    columns.push(col);
                    id
                }
            };

            if lo < ASCII_LEN as u32 {
                for c in lo..=hi.min(ASCII_LEN as u32 - 1) {
                    classes.ascii[c as usize] = class;
                }
            } else if class != OTHER_CLASS {
                match classes.ranges.last_mut() {
                    Some(prev) if prev.class == class && prev.hi + 1 == lo => prev.hi = hi,
                    _ => classes.ranges.push(ClassRange { lo, hi, class }),
                }
            }
        }

        let n_classes = columns.len();
        let mut next = vec![error; n_states as usize * n_classes];
        for (class, col) in columns.iter().enumerate() {
            for (s, &to) in col.iter().enumerate() {
                next[s * n_classes + class] = to;
            }
        }

        let token_of = self
            .states
            .iter()
            .map(|s| s.accept.unwrap_or(INVALID_TOKEN))
            .collect();

        log::debug!(
            "[tables] built {} states, {} cuts -> {} classes in {:?}",
            n_states,
            cuts.len(),
            n_classes,
            t0.elapsed()
        );

        AutomatonTable::from_parts(TableParts {
            n_states,
            n_classes: n_classes as u32,
            classes,
            next,
            token_of,
            kind_names: self.kind_names.clone(),
            start: Self::START.0,
            error,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_share_one_class() {
        let mut b = TableBuilder::new();
        let num = b.kind("NUM").unwrap();
        let s = b.accepting(num);
        b.on_range(TableBuilder::START, '0', '9', s)
            .on_range(s, '0', '9', s);
        let t = b.build().unwrap();

        assert_eq!(t.class_count(), 2);
        assert_eq!(t.class_of('0'), t.class_of('7'));
        assert_eq!(t.class_of('a'), OTHER_CLASS);
        assert_eq!(t.transition(t.initial_state(), '5'), s);
        assert_eq!(t.transition(s, 'x'), t.error_state());
    }

    #[test]
    fn first_edge_wins_and_default_covers_rest() {
        let mut b = TableBuilder::new();
        let k = b.kind("K").unwrap();
        let a = b.accepting(k);
        let other = b.accepting(k);
        b.on(TableBuilder::START, '\n', TableBuilder::ERROR)
            .on_range(TableBuilder::START, '\0', 'z', a)
            .otherwise(TableBuilder::START, other);
        let t = b.build().unwrap();

        assert_eq!(t.transition(t.initial_state(), '\n'), t.error_state());
        assert_eq!(t.transition(t.initial_state(), 'q'), a);
        assert_eq!(t.transition(t.initial_state(), '~'), other);
        assert_eq!(t.transition(t.initial_state(), '中'), other);
    }

    #[test]
    fn non_ascii_ranges_become_class_ranges() {
        let mut b = TableBuilder::new();
        let k = b.kind("GREEK").unwrap();
        let s = b.accepting(k);
        b.on_range(TableBuilder::START, 'α', 'ω', s);
        let t = b.build().unwrap();

        assert_eq!(t.class_map().ranges.len(), 1);
        assert_eq!(t.transition(t.initial_state(), 'λ'), s);
        assert_eq!(t.transition(t.initial_state(), 'a'), t.error_state());
    }

    #[test]
    fn duplicate_kind_and_dangling_state_are_rejected() {
        let mut b = TableBuilder::new();
        b.kind("A").unwrap();
        assert!(matches!(b.kind("A"), Err(TableError::DuplicateKindName(_))));
        assert!(matches!(b.kind("ERROR"), Err(TableError::DuplicateKindName(_))));

        b.on(TableBuilder::START, 'a', StateId(42));
        assert!(matches!(b.build(), Err(TableError::UnknownState(42))));

        let mut b = TableBuilder::new();
        b.on(StateId(7), 'a', TableBuilder::START);
        assert!(matches!(b.build(), Err(TableError::UnknownState(7))));
    }

    #[test]
    fn accepting_error_state_is_rejected() {
        let mut b = TableBuilder::new();
        let k = b.kind("A").unwrap();
        b.accept(TableBuilder::ERROR, k);
        assert!(matches!(
            b.build(),
            Err(TableError::ErrorStateAccepting { state: 1, .. })
        ));
    }
}
