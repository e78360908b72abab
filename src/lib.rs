//! A lowercase a-z prefix-tree dictionary with pruning deletion and
//! two-word compound detection, plus the word-list loading and query session
//! used by the `wordtrie` binary.

pub mod error;
pub mod session;
pub mod trie;
pub mod wordlist;

pub use error::TrieError;
pub use session::Session;
pub use trie::Trie;
