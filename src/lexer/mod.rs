pub mod buffer;
pub mod error;
pub mod incremental;
pub mod tables;
pub mod walk;

use rayon::prelude::*;

pub use buffer::{BufferScanner, Next};
pub use error::{ScanError, TableError};
pub use incremental::{Feed, Scanner, tokenize_incremental};
pub use tables::{AutomatonTable, Token, TokenKind};
pub use walk::{ScannerState, Step};

/// Every token of `src`, in order, via the buffer protocol.
pub fn tokenize(table: &AutomatonTable, src: &str) -> Vec<Token> {
    BufferScanner::with_source(table, src).collect()
}

/// Scans many independent buffers in parallel against one shared table.
pub fn tokenize_many<S: AsRef<str> + Sync>(
    table: &AutomatonTable,
    sources: &[S],
) -> Vec<Vec<Token>> {
    sources
        .par_iter()
        .map(|src| tokenize(table, src.as_ref()))
        .collect()
}
