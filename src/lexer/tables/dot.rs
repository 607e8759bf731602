use std::io::Write;

use super::dfa::{AutomatonTable, OTHER_CLASS, StateId};

fn char_label(c: u32) -> String {
    match char::from_u32(c) {
        Some(ch) if ch.is_alphanumeric() || ch.is_ascii_punctuation() => match ch {
            '"' | '\\' => format!("\\{ch}"),
            _ => ch.to_string(),
        },
        _ => format!("\\\\u{{{c:x}}}"),
    }
}

/// Human-readable label for a character class, e.g. `0-9` or `a-z,_`.
pub fn class_label(t: &AutomatonTable, class: u16) -> String {
    if class == OTHER_CLASS {
        return "other".to_string();
    }
    t.class_map()
        .ranges_of(class)
        .iter()
        .map(|&(lo, hi)| {
            if lo == hi {
                char_label(lo)
            } else {
                format!("{}-{}", char_label(lo), char_label(hi))
            }
        })
        .collect::<Vec<_>>()
        .join(",")
}

/// Graphviz rendering of the automaton. Edges into the error state are left
/// out; accepting states get a double border and their kind name.
pub fn write_dot<W: Write>(t: &AutomatonTable, w: &mut W) -> std::io::Result<()> {
    writeln!(w, "digraph state_machine {{")?;
    writeln!(w, "  rankdir=LR;")?;
    for s in 0..t.state_count() {
        let state = StateId(s as u32);
        if t.is_error(state) {
            continue;
        }
        match t.token_kind(state) {
            Some(kind) => writeln!(
                w,
                "  {s} [peripheries=2, label=\"{s}\\n{}\"];",
                t.kind_name(kind)
            )?,
            None if state == t.initial_state() => writeln!(w, "  {s} [shape=box];")?,
            None => {}
        }

        for class in 0..t.class_count() {
            let to = t.transition_class(state, class as u16);
            if t.is_error(to) {
                continue;
            }
            writeln!(
                w,
                "  {s} -> {} [label=\"{}\"];",
                to.0,
                class_label(t, class as u16)
            )?;
        }
    }
    writeln!(w, "}}")
}
