//! Pull protocol: the whole text is bound up front and tokens are requested
//! one at a time.

use crate::lexer::{
    error::ScanError,
    tables::{AutomatonTable, Token, TokenKind},
    walk::{ScannerState, Step},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Next {
    Token(Token),
    /// The buffer is exhausted. Every later call returns this again.
    Finished,
}

pub struct BufferScanner<'t, 's> {
    table: &'t AutomatonTable,
    src: &'s str,
    walk: ScannerState,
    token: Option<Token>,
    finished: bool,
}

impl<'t, 's> BufferScanner<'t, 's> {
    /// Scanner with an empty buffer; call [`feed`](Self::feed) before scanning.
    pub fn new(table: &'t AutomatonTable) -> Self {
        Self::with_source(table, "")
    }

    pub fn with_source(table: &'t AutomatonTable, src: &'s str) -> Self {
        Self {
            table,
            src,
            walk: ScannerState::new(table),
            token: None,
            finished: false,
        }
    }

    /// Binds a new buffer and resets the scan to its start.
    pub fn feed(&mut self, src: &'s str) {
        self.src = src;
        self.walk.reset(self.table, 0);
        self.token = None;
        self.finished = false;
    }

    pub fn source(&self) -> &'s str {
        self.src
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn next_token(&mut self) -> Result<Next, ScanError> {
        if self.finished {
            return Ok(Next::Finished);
        }

        let tok = loop {
            let offset = self.walk.cursor();
            let Some(rest) = self.src.get(offset..) else {
                self.finished = true;
                return Err(ScanError::Stalled { offset });
            };
            match rest.chars().next() {
                Some(ch) => match self.walk.step(self.table, ch) {
                    Step::Continue => continue,
                    Step::Boundary(tok) => break tok,
                },
                None => match self.walk.finish(self.table) {
                    Some(tok) => break tok,
                    None => {
                        self.finished = true;
                        log::trace!("[scan] finished at {offset}");
                        return Ok(Next::Finished);
                    }
                },
            }
        };

        if tok.is_empty() {
            self.finished = true;
            return Err(ScanError::Stalled { offset: tok.start });
        }

        if tok.is_error() {
            log::debug!(
                "[scan] unrecognized input {:?} at {}..{}",
                tok.text(self.src),
                tok.start,
                tok.end
            );
        } else {
            log::trace!(
                "[scan] {} {}..{}",
                self.table.kind_name(tok.kind),
                tok.start,
                tok.end
            );
        }
        self.token = Some(tok);
        Ok(Next::Token(tok))
    }

    /// Last completed token; `None` before the first one.
    pub fn token(&self) -> Option<Token> {
        self.token
    }

    pub fn token_kind(&self) -> Option<TokenKind> {
        self.token.map(|t| t.kind)
    }

    pub fn token_kind_name(&self) -> &'t str {
        self.token.map_or("", |t| self.table.kind_name(t.kind))
    }

    pub fn token_start(&self) -> usize {
        self.token.map_or(0, |t| t.start)
    }

    pub fn token_end(&self) -> usize {
        self.token.map_or(0, |t| t.end)
    }

    pub fn token_text(&self) -> &'s str {
        self.token.map_or("", |t| t.text(self.src))
    }

    /// Copies as much of the token text as fits into `dst`, never splitting
    /// a UTF-8 sequence. Returns the number of bytes written.
    pub fn copy_token_text(&self, dst: &mut [u8]) -> usize {
        let text = self.token_text();
        let mut n = text.len().min(dst.len());
        while !text.is_char_boundary(n) {
            n -= 1;
        }
        dst[..n].copy_from_slice(&text.as_bytes()[..n]);
        n
    }
}

impl Iterator for BufferScanner<'_, '_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        match self.next_token() {
            Ok(Next::Token(tok)) => Some(tok),
            Ok(Next::Finished) => None,
            Err(e) => {
                log::error!("[scan] {e}");
                None
            }
        }
    }
}
