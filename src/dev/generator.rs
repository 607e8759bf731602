// Random text for the demo grammar. Mostly well-formed tokens, with a
// sprinkling of inputs that force rollback (`12.`, `/*` without `*/`) and
// chars no rule matches, so both scan protocols get exercised on every path.
//
// Lives here rather than in src/bin/fuzz_lex.rs so tests/size_sweep.rs can
// share it with the fuzzer.

use rand::Rng;

pub fn gen_source<R: Rng>(rng: &mut R, target_len: usize) -> String {
    let mut out = String::with_capacity(target_len + target_len / 8);

    while out.len() < target_len {
        let roll = rng.random_range(0u32..100);

        match roll {
            0..=21 => push_ident(rng, &mut out),          // ~22%
            22..=33 => push_int(rng, &mut out),           // ~12%
            34..=41 => push_float(rng, &mut out),         // ~8%
            42..=56 => push_ws(rng, &mut out),            // ~15%
            57..=61 => push_line_comment(rng, &mut out),  // ~5%
            62..=67 => push_block_comment(rng, &mut out), // ~6%
            68..=91 => push_operator(rng, &mut out),      // ~24%
            92..=99 => push_noise(rng, &mut out),         // ~8%
            _ => unreachable!(),
        }
    }

    out
}

fn push_ident<R: Rng>(rng: &mut R, out: &mut String) {
    let len = rng.random_range(1..=12);
    out.push(random_alpha(rng));
    for _ in 1..len {
        if rng.random_bool(0.6) {
            out.push(random_alpha(rng));
        } else {
            out.push(random_digit(rng));
        }
    }
}

fn push_int<R: Rng>(rng: &mut R, out: &mut String) {
    let len = rng.random_range(1..=8);
    for _ in 0..len {
        out.push(random_digit(rng));
    }
}

fn push_float<R: Rng>(rng: &mut R, out: &mut String) {
    push_int(rng, out);
    out.push('.');
    // a bare "12." rolls back to an integer followed by '.'
    if rng.random_bool(0.85) {
        push_int(rng, out);
    }
}

fn push_ws<R: Rng>(rng: &mut R, out: &mut String) {
    let opts: [char; 4] = [' ', '\t', '\r', '\n'];
    let len = rng.random_range(1..=8);
    for _ in 0..len {
        let i = rng.random_range(0..opts.len());
        out.push(opts[i]);
    }
}

fn push_line_comment<R: Rng>(rng: &mut R, out: &mut String) {
    out.push_str("//");
    let len = rng.random_range(0..=40);
    const ALPH: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789 +-*/&|![]{}()<>=*§λ";
    let chars: Vec<char> = ALPH.chars().collect();
    for _ in 0..len {
        let i = rng.random_range(0..chars.len());
        out.push(chars[i]);
    }
    out.push('\n');
}

fn push_block_comment<R: Rng>(rng: &mut R, out: &mut String) {
    out.push_str("/*");
    let chunks = rng.random_range(0..=15);
    const BODY: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789 +-![]{}()<>=&|";
    let bytes = BODY.as_bytes();
    for _ in 0..chunks {
        let k = rng.random_range(1..=8);
        for _ in 0..k {
            let i = rng.random_range(0..bytes.len());
            out.push(bytes[i] as char);
        }
        if rng.random_bool(0.2) {
            out.push('*');
        }
        if rng.random_bool(0.2) {
            out.push('\n');
        }
    }
    // occasionally left open, which rolls back to a lone '/'
    if rng.random_bool(0.9) {
        out.push_str("*/");
    }
}

fn push_operator<R: Rng>(rng: &mut R, out: &mut String) {
    let ops = [
        "(", ")", "+", "++", "+=", "-", "--", "->", "*", "=", "/", "/=", "!", "!=", "[", "]",
        "{", "}", "<", "<=", "<<", ">", ">=", ">>", "==", "&", "&&", "|", "||", ";", ",", ".",
    ];
    let i = rng.random_range(0..ops.len());
    out.push_str(ops[i]);
    if rng.random_bool(0.25) {
        out.push(' ');
    }
}

fn push_noise<R: Rng>(rng: &mut R, out: &mut String) {
    let junk = ['§', '@', '#', '$', '`', '\'', '"', '€', '\u{0}', 'λ', 'é'];
    let i = rng.random_range(0..junk.len());
    out.push(junk[i]);
}

fn random_alpha<R: Rng>(rng: &mut R) -> char {
    let set = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ_";
    let i = rng.random_range(0..set.len());
    set[i] as char
}

fn random_digit<R: Rng>(rng: &mut R) -> char {
    let set = b"0123456789";
    let i = rng.random_range(0..set.len());
    set[i] as char
}
