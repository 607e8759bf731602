// src/bin/fuzz_lex.rs
// Generate random inputs, scan them with both protocols, compare.
//   - FUZZ_SEED / FUZZ_LEN / FUZZ_ITERS   generator knobs
//   - FUZZ_INPUT=path                     replay a saved case
//   - FUZZ_SAVE=1 and FUZZ_DIR=...        save failing cases

use std::{
    fs,
    path::{Path, PathBuf},
    time::Instant,
};

use anyhow::{Context, Result, bail};
use rand::{SeedableRng, rngs::StdRng};
use scanrt::{
    dev::generator::gen_source,
    lexer::{AutomatonTable, Token, tables::demo_table, tokenize, tokenize_incremental},
};

fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|s| s.parse::<T>().ok())
        .unwrap_or(default)
}

fn main() -> Result<()> {
    let table = demo_table().context("building demo grammar")?;

    if let Ok(path) = std::env::var("FUZZ_INPUT") {
        let src = fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
        println!("[fuzz] replaying {path} ({} bytes)", src.len());
        if !run_once(&table, &src) {
            bail!("replay {path} failed");
        }
        println!("[fuzz] replay ok");
        return Ok(());
    }

    let save_cases = std::env::var("FUZZ_SAVE").ok().as_deref() == Some("1");
    let out_dir = std::env::var("FUZZ_DIR").unwrap_or_else(|_| "fuzz-cases".to_string());
    let len: usize = env_parse("FUZZ_LEN", 4096);
    let iters: usize = env_parse("FUZZ_ITERS", 200);
    let seed: u64 = env_parse("FUZZ_SEED", 0x5EED);

    println!("[fuzz] seed={seed} len={len} iters={iters}");
    let mut rng = StdRng::seed_from_u64(seed);
    let t0 = Instant::now();
    let mut failures = 0usize;
    for iter in 0..iters {
        let src = gen_source(&mut rng, len);
        if !run_once(&table, &src) {
            failures += 1;
            if save_cases {
                let path = save_case(Path::new(&out_dir), seed, iter, &src)?;
                eprintln!("[fuzz] saved failing case to {}", path.display());
            }
        }
    }
    println!(
        "[fuzz] {iters} iterations, {failures} failures in {:?}",
        t0.elapsed()
    );
    if failures > 0 {
        bail!("{failures} fuzz iterations failed");
    }
    Ok(())
}

fn run_once(table: &AutomatonTable, src: &str) -> bool {
    let pulled = tokenize(table, src);
    let pushed = tokenize_incremental(table, src);

    if pulled != pushed {
        let i = first_divergence_idx(&pulled, &pushed);
        eprintln!(
            "[diff] protocols diverge at token {i}: buffer={:?} incremental={:?}",
            pulled.get(i),
            pushed.get(i)
        );
        dump_near(table, src, &pulled, i);
        return false;
    }

    // Tokens must tile the input exactly, and errors cover one char each.
    let mut at = 0usize;
    for (i, t) in pulled.iter().enumerate() {
        let single_char = t.text(src).chars().count() == 1;
        if t.start != at || t.is_empty() || (t.is_error() && !single_char) {
            eprintln!("[diff] bad token #{i} {t:?} (expected start {at})");
            dump_near(table, src, &pulled, i);
            return false;
        }
        at = t.end;
    }
    if at != src.len() {
        eprintln!("[diff] tokens stop at {at}, input has {} bytes", src.len());
        return false;
    }
    true
}

fn first_divergence_idx(a: &[Token], b: &[Token]) -> usize {
    a.iter()
        .zip(b.iter())
        .position(|(x, y)| x != y)
        .unwrap_or(a.len().min(b.len()))
}

fn dump_near(table: &AutomatonTable, src: &str, toks: &[Token], from: usize) {
    let lo = from.saturating_sub(2);
    let hi = (from + 3).min(toks.len());
    eprintln!("--- context tokens [{lo}..{hi}) ---");
    for (i, t) in toks.iter().enumerate().take(hi).skip(lo) {
        eprintln!(
            "#{i:06} {} {}..{} {:?}",
            table.kind_name(t.kind),
            t.start,
            t.end,
            t.text(src)
        );
    }
}

fn save_case(dir: &Path, seed: u64, iter: usize, src: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    let path = dir.join(format!("fuzz_seed{seed}_iter{iter}_n{}.txt", src.len()));
    fs::write(&path, src).with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}
