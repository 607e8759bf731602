// src/lexer/tables/mod.rs
pub mod build;
pub mod compact;
pub mod dfa;
pub mod dot;
pub mod grammar;
pub mod io;
pub mod tokens;

pub use build::TableBuilder;
pub use compact::{load_table_bin_bytes, save_table_bin, write_table_bin};
pub use dfa::{AutomatonTable, ClassMap, ClassRange, StateId, TableParts};
pub use dot::write_dot;
pub use grammar::demo_table;
pub use io::{load_table_json_bytes, save_table_json, table_to_json_string};
pub use tokens::{INVALID_TOKEN, Token, TokenKind, is_trivia_name};

use std::path::Path;

use crate::lexer::error::TableError;

/// Loads a table file, picking the binary format for `.bin` and JSON otherwise.
pub fn load_table_file(path: &Path) -> Result<AutomatonTable, TableError> {
    let data = std::fs::read(path)?;
    log::debug!("[tables] loading {} ({} bytes)", path.display(), data.len());
    match path.extension().and_then(|e| e.to_str()) {
        Some("bin") => load_table_bin_bytes(&data),
        _ => load_table_json_bytes(&data),
    }
}

pub fn save_table_file(path: &Path, t: &AutomatonTable) -> Result<(), TableError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("bin") => save_table_bin(path, t),
        _ => save_table_json(path, t),
    }
}
