use thiserror::Error;

/// Structural problems with a compiled automaton. Raised while building or
/// loading a table, never while scanning.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("table has no states")]
    NoStates,

    #[error("table has no character classes")]
    NoClasses,

    #[error("{classes} character classes exceed the u16 class id space")]
    TooManyClasses { classes: usize },

    #[error("initial state {state} is out of range (states = {n_states})")]
    InitialOutOfRange { state: u32, n_states: u32 },

    #[error("error state {state} is out of range (states = {n_states})")]
    ErrorOutOfRange { state: u32, n_states: u32 },

    #[error("error state {state} is accepting kind {kind}")]
    ErrorStateAccepting { state: u32, kind: u32 },

    #[error("transition matrix has {found} entries, expected {expected}")]
    TransitionShape { expected: usize, found: usize },

    #[error("token map has {found} entries, expected {expected}")]
    TokenMapShape { expected: usize, found: usize },

    #[error("transition from state {state} on class {class} targets missing state {target}")]
    TargetOutOfRange { state: u32, class: u32, target: u32 },

    #[error("character class {class} is out of range (classes = {n_classes})")]
    ClassOutOfRange { class: u32, n_classes: u32 },

    #[error("class range #{index} is empty, unsorted, overlapping, or inside ASCII")]
    BadClassRange { index: usize },

    #[error("state {state} accepts unknown token kind {kind} (kinds = {n_kinds})")]
    UnknownKind { state: u32, kind: u32, n_kinds: usize },

    #[error("token kind name {0:?} is reserved or defined twice")]
    DuplicateKindName(String),

    #[error("token kind name #{index} is not valid UTF-8")]
    BadKindName { index: usize },

    #[error("state {0} does not exist in this builder")]
    UnknownState(u32),

    #[error("char range {lo:?}..={hi:?} is empty")]
    EmptyCharRange { lo: char, hi: char },

    #[error("bad magic in table file")]
    BadMagic,

    #[error("table file truncated while reading {0}")]
    Truncated(&'static str),

    #[error("table JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Defensive failure of the buffer protocol. Ordinary unrecognized input is
/// an `ERROR` token, not this.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScanError {
    #[error("scanner made no progress at offset {offset}; automaton is malformed")]
    Stalled { offset: usize },
}
