// src/main.rs
use std::{io::Read, path::Path};

use anyhow::{Context, Result, bail};
use scanrt::lexer::{
    tables::{demo_table, is_trivia_name, load_table_file},
    tokenize, tokenize_incremental,
};

// A tiny sample covering numbers, identifiers, comments and operators.
const SAMPLE: &str = "67432 2323.3  bla  ++ mo\nx = 12.5e /* cmt */ -> y // done\n";

fn main() -> Result<()> {
    let table = match std::env::var("SCAN_TABLE") {
        Ok(path) => load_table_file(Path::new(&path)).with_context(|| format!("loading {path}"))?,
        Err(_) => demo_table().context("building demo grammar")?,
    };

    let src = match std::env::args().nth(1).as_deref() {
        Some("-") => {
            let mut s = String::new();
            std::io::stdin()
                .read_to_string(&mut s)
                .context("reading stdin")?;
            s
        }
        Some(text) => text.to_string(),
        None => SAMPLE.to_string(),
    };

    let mode = std::env::var("SCAN_MODE").unwrap_or_else(|_| "buffer".to_string());
    let tokens = match mode.as_str() {
        "buffer" => tokenize(&table, &src),
        "incremental" => tokenize_incremental(&table, &src),
        other => bail!("unknown SCAN_MODE {other:?} (expected buffer or incremental)"),
    };
    let skip_trivia = std::env::var("SCAN_SKIP_TRIVIA").ok().as_deref() == Some("1");

    println!("Scanning {} bytes ({mode} mode)", src.len());
    let mut errors = 0usize;
    for t in &tokens {
        let name = table.kind_name(t.kind);
        if t.is_error() {
            errors += 1;
        } else if skip_trivia && is_trivia_name(name) {
            continue;
        }
        println!("TOK: typ={name} {}-{}: [{}]", t.start, t.end, t.text(&src).escape_debug());
    }
    println!("{} tokens, {errors} unrecognized", tokens.len());
    Ok(())
}
