// src/bin/gen_tables.rs
// Build the demo grammar table once and write it to disk.
// Usage:
//   cargo run --bin gen_tables                       # writes tables/scanner_tables.json
//   cargo run --bin gen_tables -- /path/out.bin      # compact binary form
//   SCAN_DOT=machine.dot cargo run --bin gen_tables  # also write a Graphviz file

use std::{
    env, fs,
    io::{BufWriter, Write},
    path::Path,
};

use anyhow::{Context, Result};
use scanrt::lexer::tables::{demo_table, save_table_file, write_dot};

fn main() -> Result<()> {
    let out = env::args()
        .nth(1)
        .unwrap_or_else(|| "tables/scanner_tables.json".to_string());
    let out_path = Path::new(&out);

    if let Some(parent) = out_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    println!("[gen_tables] building demo grammar table…");
    let t = demo_table().context("building demo grammar")?;
    println!(
        "[gen_tables] states = {}, classes = {}, kinds = {}, matrix = {} entries",
        t.state_count(),
        t.class_count(),
        t.kind_count(),
        t.state_count() * t.class_count()
    );
    for (kind, name) in t.kinds() {
        println!("[gen_tables]   kind {:>2} = {name}", kind.id());
    }

    save_table_file(out_path, &t)
        .with_context(|| format!("failed to write {}", out_path.display()))?;
    println!("[gen_tables] wrote {}", out_path.display());

    if let Ok(dot) = env::var("SCAN_DOT") {
        let f = fs::File::create(&dot).with_context(|| format!("failed to create {dot}"))?;
        let mut w = BufWriter::new(f);
        write_dot(&t, &mut w)
            .and_then(|()| w.flush())
            .with_context(|| format!("writing {dot}"))?;
        println!("[gen_tables] wrote {dot}");
    }
    Ok(())
}
