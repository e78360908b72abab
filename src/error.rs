use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrieError {
    #[error("empty words cannot be stored")]
    EmptyWord,

    #[error("invalid symbol {symbol:?} at byte {position} of {word:?}, only a-z is supported")]
    InvalidSymbol {
        word: String,
        symbol: char,
        position: usize,
    },

    #[error("failed to read word list {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Pattern(#[from] glob::PatternError),
}
