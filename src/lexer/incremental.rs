//! Push protocol: the caller feeds one character at a time.
//!
//! A boundary is only known once the first char that cannot extend the
//! current token has been seen, so `add` reports `Done` one char late. At
//! that point the walk has rewound to [`Scanner::cursor`] and the caller
//! must resume feeding from there; the scanner keeps no replay buffer.

use crate::lexer::{
    tables::{AutomatonTable, Token, TokenKind},
    walk::{ScannerState, Step},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feed {
    /// Keep feeding.
    Continue,
    /// A token was completed; read it with [`Scanner::token`].
    Done,
}

pub struct Scanner<'t> {
    table: &'t AutomatonTable,
    walk: ScannerState,
    token: Option<Token>,
}

impl<'t> Scanner<'t> {
    pub fn new(table: &'t AutomatonTable) -> Self {
        Self {
            table,
            walk: ScannerState::new(table),
            token: None,
        }
    }

    pub fn reset(&mut self) {
        self.walk.reset(self.table, 0);
        self.token = None;
    }

    pub fn add(&mut self, ch: char) -> Feed {
        match self.walk.step(self.table, ch) {
            Step::Continue => Feed::Continue,
            Step::Boundary(tok) => self.complete(tok),
        }
    }

    /// Signals end of input. Returns `Done` while a trailing token was
    /// finalized (feed again from `cursor()` and call `finish` again), and
    /// `Continue` once nothing is left.
    pub fn finish(&mut self) -> Feed {
        match self.walk.finish(self.table) {
            Some(tok) => self.complete(tok),
            None => Feed::Continue,
        }
    }

    fn complete(&mut self, tok: Token) -> Feed {
        if tok.is_error() {
            log::debug!("[scan] unrecognized input at {}..{}", tok.start, tok.end);
        } else {
            log::trace!(
                "[scan] {} {}..{}",
                self.table.kind_name(tok.kind),
                tok.start,
                tok.end
            );
        }
        self.token = Some(tok);
        Feed::Done
    }

    /// Where the caller must resume feeding after `Done`.
    pub fn cursor(&self) -> usize {
        self.walk.cursor()
    }

    pub fn state(&self) -> &ScannerState {
        &self.walk
    }

    /// Last completed token; `None` before the first `Done`.
    pub fn token(&self) -> Option<Token> {
        self.token
    }

    pub fn token_kind(&self) -> Option<TokenKind> {
        self.token.map(|t| t.kind)
    }

    pub fn token_start(&self) -> usize {
        self.token.map_or(0, |t| t.start)
    }

    pub fn token_end(&self) -> usize {
        self.token.map_or(0, |t| t.end)
    }

    /// Name of the last token's kind, `""` before the first `Done`.
    pub fn token_kind_name(&self) -> &'t str {
        self.token.map_or("", |t| self.table.kind_name(t.kind))
    }
}

/// Drives a [`Scanner`] over `src` one char at a time, replaying from the
/// rewound cursor after every boundary the way a push-mode caller must.
pub fn tokenize_incremental(table: &AutomatonTable, src: &str) -> Vec<Token> {
    let mut scanner = Scanner::new(table);
    let mut out = Vec::new();
    let mut pos = 0;

    'outer: loop {
        for ch in src[pos..].chars() {
            if scanner.add(ch) == Feed::Done {
                out.extend(scanner.token());
                pos = scanner.cursor();
                continue 'outer;
            }
        }
        match scanner.finish() {
            Feed::Done => {
                out.extend(scanner.token());
                pos = scanner.cursor();
            }
            Feed::Continue => break,
        }
    }
    out
}
