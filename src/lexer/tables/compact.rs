// Compact little-endian binary form of an automaton table:
//   magic: 8  bytes  = "SCNTBL01"
//   u32:   n_states, n_classes, start, error, n_ranges, n_kinds
//   u16:   ascii_class[128]
//   (u32 lo, u32 hi, u16 class)[n_ranges]
//   u32:   next[n_states * n_classes]      // row-major by state
//   u32:   token_of[n_states]              // INVALID = 0xFFFF_FFFF
//   (u32 len, utf8 bytes)[n_kinds]         // kind names

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use super::dfa::{ASCII_LEN, AutomatonTable, ClassMap, ClassRange, TableParts};
use crate::lexer::error::TableError;

const MAGIC: &[u8; 8] = b"SCNTBL01";

#[inline]
fn take<'a>(buf: &mut &'a [u8], n: usize, what: &'static str) -> Result<&'a [u8], TableError> {
    if buf.len() < n {
        return Err(TableError::Truncated(what));
    }
    let (head, rest) = buf.split_at(n);
    *buf = rest;
    Ok(head)
}

#[inline]
fn take_u32(buf: &mut &[u8], what: &'static str) -> Result<u32, TableError> {
    let mut le = [0u8; 4];
    le.copy_from_slice(take(buf, 4, what)?);
    Ok(u32::from_le_bytes(le))
}

#[inline]
fn take_u16(buf: &mut &[u8], what: &'static str) -> Result<u16, TableError> {
    let mut le = [0u8; 2];
    le.copy_from_slice(take(buf, 2, what)?);
    Ok(u16::from_le_bytes(le))
}

pub fn write_table_bin<W: Write>(w: &mut W, t: &AutomatonTable) -> Result<(), TableError> {
    let p = t.to_parts();

    w.write_all(MAGIC)?;
    for v in [
        p.n_states,
        p.n_classes,
        p.start,
        p.error,
        p.classes.ranges.len() as u32,
        p.kind_names.len() as u32,
    ] {
        w.write_all(&v.to_le_bytes())?;
    }
    for k in &p.classes.ascii {
        w.write_all(&k.to_le_bytes())?;
    }
    for r in &p.classes.ranges {
        w.write_all(&r.lo.to_le_bytes())?;
        w.write_all(&r.hi.to_le_bytes())?;
        w.write_all(&r.class.to_le_bytes())?;
    }
    for v in p.next.iter().chain(p.token_of.iter()) {
        w.write_all(&v.to_le_bytes())?;
    }
    for name in &p.kind_names {
        w.write_all(&(name.len() as u32).to_le_bytes())?;
        w.write_all(name.as_bytes())?;
    }
    Ok(())
}

pub fn save_table_bin(path: &Path, t: &AutomatonTable) -> Result<(), TableError> {
    let mut w = BufWriter::new(File::create(path)?);
    write_table_bin(&mut w, t)?;
    w.flush()?;
    log::debug!("[tables] wrote binary table to {}", path.display());
    Ok(())
}

/// Parses and validates a binary table.
pub fn load_table_bin_bytes(mut data: &[u8]) -> Result<AutomatonTable, TableError> {
    if take(&mut data, MAGIC.len(), "magic")? != MAGIC {
        return Err(TableError::BadMagic);
    }

    let n_states = take_u32(&mut data, "header")?;
    let n_classes = take_u32(&mut data, "header")?;
    let start = take_u32(&mut data, "header")?;
    let error = take_u32(&mut data, "header")?;
    let n_ranges = take_u32(&mut data, "header")? as usize;
    let n_kinds = take_u32(&mut data, "header")? as usize;

    let mut classes = ClassMap::default();
    for slot in classes.ascii.iter_mut().take(ASCII_LEN) {
        *slot = take_u16(&mut data, "ascii classes")?;
    }

    // Caps keep a lying header from reserving more than the input could hold.
    classes.ranges.reserve(n_ranges.min(data.len() / 10));
    for _ in 0..n_ranges {
        let lo = take_u32(&mut data, "class ranges")?;
        let hi = take_u32(&mut data, "class ranges")?;
        let class = take_u16(&mut data, "class ranges")?;
        classes.ranges.push(ClassRange { lo, hi, class });
    }

    let n_next = (n_states as usize)
        .checked_mul(n_classes as usize)
        .ok_or(TableError::Truncated("transition matrix"))?;
    let mut next = Vec::with_capacity(n_next.min(data.len() / 4));
    for _ in 0..n_next {
        next.push(take_u32(&mut data, "transition matrix")?);
    }

    let mut token_of = Vec::with_capacity((n_states as usize).min(data.len() / 4));
    for _ in 0..n_states {
        token_of.push(take_u32(&mut data, "token map")?);
    }

    let mut kind_names = Vec::with_capacity(n_kinds.min(data.len() / 4));
    for index in 0..n_kinds {
        let len = take_u32(&mut data, "kind names")? as usize;
        let raw = take(&mut data, len, "kind names")?;
        let name = std::str::from_utf8(raw).map_err(|_| TableError::BadKindName { index })?;
        kind_names.push(name.to_string());
    }

    if !data.is_empty() {
        log::warn!("[tables] ignoring {} trailing bytes in binary table", data.len());
    }

    AutomatonTable::from_parts(TableParts {
        n_states,
        n_classes,
        classes,
        next,
        token_of,
        kind_names,
        start,
        error,
    })
}
