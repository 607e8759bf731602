// src/lexer/tables/tokens.rs

use std::fmt;

/// Marks a non-accepting state in the per-state token map (also on disk).
pub const INVALID_TOKEN: u32 = u32::MAX;

/// Opaque token category. The numeric id indexes the table's kind names;
/// the engine only ever looks at it to tell `ERROR` apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TokenKind(pub u32);

impl TokenKind {
    /// Reserved kind for a character no rule matches. Never a table index.
    pub const ERROR: TokenKind = TokenKind(u32::MAX - 1);

    pub const ERROR_NAME: &'static str = "ERROR";

    #[inline]
    pub fn id(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn is_error(self) -> bool {
        self == Self::ERROR
    }
}

/// A classified span `[start, end)` of the caller's text, in byte offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Token {
    pub start: usize,
    pub end: usize,
    pub kind: TokenKind,
}

impl Token {
    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }

    #[inline]
    pub fn is_error(&self) -> bool {
        self.kind.is_error()
    }

    /// Slice of `src` covered by this token, or `""` if the span does not fit.
    pub fn text<'s>(&self, src: &'s str) -> &'s str {
        src.get(self.start..self.end).unwrap_or("")
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{},{})", self.kind.0, self.start, self.end)
    }
}

/// Whitespace and comments, which drivers usually hide.
pub fn is_trivia_name(name: &str) -> bool {
    matches!(
        name,
        "WHITESPACE" | "NEWLINE" | "LINE_COMMENT" | "BLOCK_COMMENT"
    )
}
