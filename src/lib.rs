//! Runtime half of a table-driven scanner generator: walks a compiled DFA
//! over text and yields maximal-munch token spans, either pushed one char at
//! a time ([`lexer::Scanner`]) or pulled from a whole buffer
//! ([`lexer::BufferScanner`]).

pub mod dev;
pub mod lexer;
