// Maximal-munch walk over an automaton table. Both scanning protocols drive
// this one state value; they only differ in where characters come from.
//
// A rollback rewinds to the last accept, so the same (state, offset) pairs
// can be walked again by later tokens. Pairs that were walked after the last
// accept of a token are remembered as dead: reaching one again means the
// walk would fail without another accept, so it stops right there. Every
// pair is then walked at most once past its token's last accept, which keeps
// a whole scan linear in the input length.

use hashbrown::HashSet;

use crate::lexer::tables::{
    dfa::{AutomatonTable, StateId},
    tokens::{Token, TokenKind},
};

/// What one character did to the walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The character was consumed; the token is still open.
    Continue,
    /// The character could not extend the token, so a token was finalized
    /// and the walk rewound to its end. The character was not consumed
    /// unless the token is a one-char `ERROR` starting at it.
    Boundary(Token),
}

/// Mutable walk state of one scanner. Offsets are byte offsets into the
/// caller's text; the walk itself never sees that text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannerState {
    state: StateId,
    token_start: usize,
    cursor: usize,
    // byte length of the char at `token_start`, 0 until one is seen
    first_len: usize,
    last_accept: Option<(StateId, usize)>,
    // (state, offset) pairs known to fail before reaching an accept
    dead: HashSet<(u32, usize)>,
    // pairs walked since the last accept of the open token
    trail: Vec<(u32, usize)>,
    prune_at: usize,
}

const PRUNE_MIN: usize = 4096;

impl ScannerState {
    pub fn new(table: &AutomatonTable) -> Self {
        Self::at(table, 0)
    }

    /// Fresh walk whose next token starts at `offset`.
    pub fn at(table: &AutomatonTable, offset: usize) -> Self {
        Self {
            state: table.initial_state(),
            token_start: offset,
            cursor: offset,
            first_len: 0,
            last_accept: None,
            dead: HashSet::new(),
            trail: Vec::new(),
            prune_at: PRUNE_MIN,
        }
    }

    pub fn reset(&mut self, table: &AutomatonTable, offset: usize) {
        *self = Self::at(table, offset);
    }

    #[inline]
    pub fn current_state(&self) -> StateId {
        self.state
    }

    #[inline]
    pub fn token_start(&self) -> usize {
        self.token_start
    }

    #[inline]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Most recent accepting state since `token_start`, with the offset
    /// just past its last char.
    #[inline]
    pub fn last_accept(&self) -> Option<(StateId, usize)> {
        self.last_accept
    }

    /// True when chars have been consumed into a token not yet emitted.
    #[inline]
    pub fn is_pending(&self) -> bool {
        self.cursor > self.token_start
    }

    /// Number of (state, offset) pairs currently remembered as dead.
    pub fn dead_pairs(&self) -> usize {
        self.dead.len()
    }

    pub fn step(&mut self, table: &AutomatonTable, ch: char) -> Step {
        let next = table.transition(self.state, ch);
        if self.cursor == self.token_start {
            self.first_len = ch.len_utf8();
        }

        let at = self.cursor + ch.len_utf8();
        if table.is_error(next) || self.dead.contains(&(next.0, at)) {
            return Step::Boundary(self.finalize(table));
        }

        self.state = next;
        self.cursor = at;
        if table.is_accepting(next) {
            self.last_accept = Some((next, at));
            self.trail.clear();
        } else {
            self.trail.push((next.0, at));
        }
        self.debug_check();
        Step::Continue
    }

    /// End of input: finalizes the open token, if any. The walk is rewound
    /// to the token's end, so chars after it must be fed again.
    ///
    /// Pairs walked up to the end are remembered as dead, so the input must
    /// not grow past this point without a [`reset`](Self::reset).
    pub fn finish(&mut self, table: &AutomatonTable) -> Option<Token> {
        if !self.is_pending() {
            return None;
        }
        Some(self.finalize(table))
    }

    fn finalize(&mut self, table: &AutomatonTable) -> Token {
        let start = self.token_start;
        let token = match self.last_accept.take() {
            Some((state, end)) => Token {
                start,
                end,
                kind: table.token_kind(state).unwrap_or(TokenKind::ERROR),
            },
            // Nothing matched: the first char alone becomes an error token.
            None => Token {
                start,
                end: start + self.first_len,
                kind: TokenKind::ERROR,
            },
        };

        self.dead.extend(self.trail.drain(..));
        if self.dead.len() > self.prune_at {
            // nothing before the new token start is ever walked again
            self.dead.retain(|&(_, at)| at > token.end);
            self.prune_at = (self.dead.len() * 2).max(PRUNE_MIN);
        }

        self.state = table.initial_state();
        self.cursor = token.end;
        self.token_start = token.end;
        self.first_len = 0;
        self.debug_check();
        token
    }

    #[inline]
    fn debug_check(&self) {
        debug_assert!(self.token_start <= self.cursor);
        if let Some((_, at)) = self.last_accept {
            debug_assert!(self.token_start <= at && at <= self.cursor);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tables::TableBuilder;

    // "ab" accepts AB, "abcd" accepts ABCD; "abc" alone matches nothing.
    fn table() -> AutomatonTable {
        let mut b = TableBuilder::new();
        let ab = b.kind("AB").unwrap();
        let abcd = b.kind("ABCD").unwrap();
        let s1 = b.state();
        let s2 = b.accepting(ab);
        let s3 = b.state();
        let s4 = b.accepting(abcd);
        b.on(TableBuilder::START, 'a', s1)
            .on(s1, 'b', s2)
            .on(s2, 'c', s3)
            .on(s3, 'd', s4);
        b.build().unwrap()
    }

    #[test]
    fn rewinds_to_last_accept() {
        let t = table();
        let mut w = ScannerState::new(&t);
        for ch in "abc".chars() {
            assert_eq!(w.step(&t, ch), Step::Continue);
        }
        assert_eq!(w.last_accept().map(|(_, at)| at), Some(2));

        let Step::Boundary(tok) = w.step(&t, 'x') else {
            panic!("expected boundary");
        };
        assert_eq!((tok.start, tok.end), (0, 2));
        assert_eq!(t.kind_name(tok.kind), "AB");
        assert_eq!(w.cursor(), 2);
        assert_eq!(w.token_start(), 2);
        assert_eq!(w.current_state(), t.initial_state());
        assert!(w.last_accept().is_none());
    }

    #[test]
    fn error_token_covers_first_char_only() {
        let t = table();
        let mut w = ScannerState::new(&t);
        assert_eq!(w.step(&t, 'a'), Step::Continue);
        let Step::Boundary(tok) = w.step(&t, 'q') else {
            panic!("expected boundary");
        };
        assert_eq!(tok, Token { start: 0, end: 1, kind: TokenKind::ERROR });
        assert_eq!(w.cursor(), 1);
    }

    #[test]
    fn error_token_spans_whole_multibyte_char() {
        let t = table();
        let mut w = ScannerState::at(&t, 3);
        let Step::Boundary(tok) = w.step(&t, '§') else {
            panic!("expected boundary");
        };
        assert_eq!(tok, Token { start: 3, end: 5, kind: TokenKind::ERROR });
        assert_eq!(w.cursor(), 5);
    }

    // "x" accepts X, "yz" accepts YZ, and "x" may run on into the y-loop.
    fn overlapping_table() -> AutomatonTable {
        let mut b = TableBuilder::new();
        let x = b.kind("X").unwrap();
        let yz = b.kind("YZ").unwrap();
        let sx = b.accepting(x);
        let sy = b.state();
        let sz = b.accepting(yz);
        b.on(TableBuilder::START, 'x', sx)
            .on(TableBuilder::START, 'y', sy)
            .on(sx, 'y', sy)
            .on(sy, 'y', sy)
            .on(sy, 'z', sz);
        b.build().unwrap()
    }

    #[test]
    fn failed_pairs_stop_later_walks() {
        let t = overlapping_table();
        let mut w = ScannerState::new(&t);
        for ch in "xyyy".chars() {
            assert_eq!(w.step(&t, ch), Step::Continue);
        }
        let tok = w.finish(&t).unwrap();
        assert_eq!((tok.start, tok.end), (0, 1));
        assert_eq!(w.dead_pairs(), 3);

        // The first 'y' lands on a pair already walked to a dead end, so the
        // walk fails at once instead of running to the end again.
        let Step::Boundary(tok) = w.step(&t, 'y') else {
            panic!("expected boundary");
        };
        assert_eq!(tok, Token { start: 1, end: 2, kind: TokenKind::ERROR });
        let Step::Boundary(tok) = w.step(&t, 'y') else {
            panic!("expected boundary");
        };
        assert_eq!(tok, Token { start: 2, end: 3, kind: TokenKind::ERROR });
    }

    #[test]
    fn reset_forgets_dead_pairs() {
        let t = table();
        let mut w = ScannerState::new(&t);
        for ch in "abc".chars() {
            w.step(&t, ch);
        }
        w.finish(&t);
        assert!(w.dead_pairs() > 0);
        w.reset(&t, 0);
        assert_eq!(w.dead_pairs(), 0);
    }

    #[test]
    fn finish_only_when_pending() {
        let t = table();
        let mut w = ScannerState::new(&t);
        assert_eq!(w.finish(&t), None);
        w.step(&t, 'a');
        w.step(&t, 'b');
        let tok = w.finish(&t).unwrap();
        assert_eq!((tok.start, tok.end), (0, 2));
        assert_eq!(w.finish(&t), None);
    }
}
