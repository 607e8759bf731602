use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use serde::{Deserialize, Serialize};
use serde_with::serde_as;

use super::dfa::{ASCII_LEN, AutomatonTable, ClassMap, ClassRange, TableParts};
use crate::lexer::error::TableError;

// -------------------- JSON (de)serialization --------------------

#[derive(Serialize, Deserialize)]
struct ClassRangeDisk {
    lo: u32,
    hi: u32,
    class: u16,
}

#[serde_as]
#[derive(Serialize, Deserialize)]
struct TableDisk {
    n_states: u32,
    n_classes: u32,
    #[serde_as(as = "[_; 128]")]
    ascii_class: [u16; ASCII_LEN],
    #[serde(default)]
    class_ranges: Vec<ClassRangeDisk>,
    next: Vec<u32>,
    /// `null` marks a non-accepting state.
    token_of: Vec<Option<u32>>,
    kind_names: Vec<String>,
    start: u32,
    error: u32,
}

impl From<&AutomatonTable> for TableDisk {
    fn from(t: &AutomatonTable) -> Self {
        let p = t.to_parts();
        Self {
            n_states: p.n_states,
            n_classes: p.n_classes,
            ascii_class: p.classes.ascii,
            class_ranges: p
                .classes
                .ranges
                .iter()
                .map(|r| ClassRangeDisk {
                    lo: r.lo,
                    hi: r.hi,
                    class: r.class,
                })
                .collect(),
            next: p.next,
            token_of: p
                .token_of
                .iter()
                .map(|&k| (k != super::INVALID_TOKEN).then_some(k))
                .collect(),
            kind_names: p.kind_names,
            start: p.start,
            error: p.error,
        }
    }
}

impl TableDisk {
    fn into_parts(self) -> TableParts {
        TableParts {
            n_states: self.n_states,
            n_classes: self.n_classes,
            classes: ClassMap {
                ascii: self.ascii_class,
                ranges: self
                    .class_ranges
                    .into_iter()
                    .map(|r| ClassRange {
                        lo: r.lo,
                        hi: r.hi,
                        class: r.class,
                    })
                    .collect(),
            },
            next: self.next,
            token_of: self
                .token_of
                .into_iter()
                .map(|k| k.unwrap_or(super::INVALID_TOKEN))
                .collect(),
            kind_names: self.kind_names,
            start: self.start,
            error: self.error,
        }
    }
}

pub fn save_table_json(path: &Path, t: &AutomatonTable) -> Result<(), TableError> {
    let f = File::create(path)?;
    let mut w = BufWriter::new(f);
    serde_json::to_writer(&mut w, &TableDisk::from(t))?;
    w.flush()?;
    log::debug!("[tables] wrote JSON table to {}", path.display());
    Ok(())
}

pub fn table_to_json_string(t: &AutomatonTable) -> Result<String, TableError> {
    Ok(serde_json::to_string_pretty(&TableDisk::from(t))?)
}

/// Parses and validates a JSON table.
pub fn load_table_json_bytes(data: &[u8]) -> Result<AutomatonTable, TableError> {
    let disk = serde_json::from_slice::<TableDisk>(data)?;
    AutomatonTable::from_parts(disk.into_parts())
}
