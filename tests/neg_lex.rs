//! Unrecognized input never aborts a scan: it becomes one-char ERROR tokens
//! and scanning resumes right after them.

use scanrt::lexer::{
    Token, TokenKind,
    tables::{AutomatonTable, demo_table},
    tokenize, tokenize_incremental,
};

fn spans<'t>(table: &'t AutomatonTable, src: &str) -> Vec<(&'t str, usize, usize)> {
    let toks = tokenize(table, src);
    assert_eq!(toks, tokenize_incremental(table, src), "protocols diverge on {src:?}");
    toks.iter()
        .map(|t| (table.kind_name(t.kind), t.start, t.end))
        .collect()
}

#[test]
fn stray_section_sign_is_one_error_char() {
    let t = demo_table().unwrap();
    let toks = tokenize(&t, "§");
    assert_eq!(
        toks,
        vec![Token {
            start: 0,
            end: '§'.len_utf8(),
            kind: TokenKind::ERROR
        }]
    );
    assert_eq!(toks[0].text("§").chars().count(), 1);
}

#[test]
fn scanning_resumes_after_error() {
    let t = demo_table().unwrap();
    assert_eq!(
        spans(&t, "a§b"),
        vec![("IDENTIFIER", 0, 1), ("ERROR", 1, 3), ("IDENTIFIER", 3, 4)]
    );
}

#[test]
fn consecutive_junk_is_not_merged() {
    let t = demo_table().unwrap();
    assert_eq!(
        spans(&t, "@@ #"),
        vec![
            ("ERROR", 0, 1),
            ("ERROR", 1, 2),
            ("WHITESPACE", 2, 3),
            ("ERROR", 3, 4)
        ]
    );
}

#[test]
fn nul_and_quotes_are_errors() {
    let t = demo_table().unwrap();
    let toks = tokenize(&t, "\0'\"");
    assert_eq!(toks.len(), 3);
    assert!(toks.iter().all(|t| t.is_error() && t.len() == 1));
}

#[test]
fn unterminated_block_comment_rolls_back_to_slash() {
    let t = demo_table().unwrap();
    assert_eq!(
        spans(&t, "/*ab"),
        vec![("OPERATOR", 0, 1), ("OPERATOR", 1, 2), ("IDENTIFIER", 2, 4)]
    );
}

#[test]
fn error_kind_has_reserved_name() {
    let t = demo_table().unwrap();
    assert_eq!(t.kind_name(TokenKind::ERROR), "ERROR");
    assert_eq!(t.kind_by_name("ERROR"), Some(TokenKind::ERROR));
}
