// Hand-built demo grammar: numbers, identifiers, whitespace, newlines,
// comments and operators. Real scanners get their table from the rule
// compiler; this one exists for the demo driver, the fuzzer and the tests.

use super::{
    build::TableBuilder,
    dfa::{AutomatonTable, StateId},
};
use crate::lexer::error::TableError;

pub const INTEGER: &str = "INTEGER";
pub const FLOAT: &str = "FLOAT";
pub const IDENTIFIER: &str = "IDENTIFIER";
pub const WHITESPACE: &str = "WHITESPACE";
pub const NEWLINE: &str = "NEWLINE";
pub const LINE_COMMENT: &str = "LINE_COMMENT";
pub const BLOCK_COMMENT: &str = "BLOCK_COMMENT";
pub const OPERATOR: &str = "OPERATOR";

/// Operators that stand alone.
const SINGLE_OPS: &str = "*%^~?:;,.()[]{}";

/// Operators that may be followed by a second char: (first, seconds).
const DOUBLE_OPS: &[(char, &str)] = &[
    ('+', "+="),
    ('-', "-=>"),
    ('=', "="),
    ('<', "=<"),
    ('>', "=>"),
    ('!', "="),
    ('&', "&"),
    ('|', "|"),
];

// Latin-1 letters (minus × and ÷) and Greek, so identifiers are not ASCII-only.
const ALPHA_RANGES: &[(char, char)] = &[
    ('A', 'Z'),
    ('a', 'z'),
    ('_', '_'),
    ('À', 'Ö'),
    ('Ø', 'ö'),
    ('ø', 'ÿ'),
    ('Α', 'Ω'),
    ('α', 'ω'),
];

fn on_alpha(b: &mut TableBuilder, from: StateId, to: StateId) {
    for &(lo, hi) in ALPHA_RANGES {
        b.on_range(from, lo, hi, to);
    }
}

pub fn demo_table() -> Result<AutomatonTable, TableError> {
    let mut b = TableBuilder::new();
    let start = TableBuilder::START;
    let reject = TableBuilder::ERROR;

    let integer = b.kind(INTEGER)?;
    let float = b.kind(FLOAT)?;
    let ident_k = b.kind(IDENTIFIER)?;
    let white_k = b.kind(WHITESPACE)?;
    let newline_k = b.kind(NEWLINE)?;
    let line_k = b.kind(LINE_COMMENT)?;
    let block_k = b.kind(BLOCK_COMMENT)?;
    let op = b.kind(OPERATOR)?;

    // Numbers: [0-9]+ and [0-9]+ '.' [0-9]+
    let int = b.accepting(integer);
    let int_dot = b.state();
    let frac = b.accepting(float);
    b.on_range(start, '0', '9', int)
        .on_range(int, '0', '9', int)
        .on(int, '.', int_dot)
        .on_range(int_dot, '0', '9', frac)
        .on_range(frac, '0', '9', frac);

    // Identifiers
    let ident = b.accepting(ident_k);
    on_alpha(&mut b, start, ident);
    on_alpha(&mut b, ident, ident);
    b.on_range(ident, '0', '9', ident);

    // Whitespace never swallows a newline.
    let white = b.accepting(white_k);
    b.on_any(start, " \t", white).on_any(white, " \t", white);

    let lf = b.accepting(newline_k);
    let cr = b.accepting(newline_k);
    b.on(start, '\n', lf).on(start, '\r', cr).on(cr, '\n', lf);

    // '/', '/=', "//..." and "/* ... */"
    let slash = b.accepting(op);
    let op_done = b.accepting(op);
    let line = b.accepting(line_k);
    let block = b.state();
    let block_star = b.state();
    let block_done = b.accepting(block_k);
    b.on(start, '/', slash)
        .on(slash, '=', op_done)
        .on(slash, '/', line)
        .on(slash, '*', block);
    b.on_any(line, "\r\n", reject).otherwise(line, line);
    b.on(block, '*', block_star).otherwise(block, block);
    b.on(block_star, '/', block_done)
        .on(block_star, '*', block_star)
        .otherwise(block_star, block);

    b.on_any(start, SINGLE_OPS, op_done);
    for &(first, seconds) in DOUBLE_OPS {
        let s = b.accepting(op);
        b.on(start, first, s).on_any(s, seconds, op_done);
    }

    b.build()
}
