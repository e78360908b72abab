use hashbrown::HashMap;
use serde_json::{json, Map, Value};
use simple_log::{debug, info};
use thiserror::Error;
use tokio::sync::Mutex;

use crate::error::TrieError;
use crate::trie::Trie;
use crate::wordlist::WordList;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Query<'a> {
    Contains(&'a str),
    Delete(&'a str),
    Insert(&'a str),
    Compound(&'a str),
    Split(&'a str),
    Stats,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum QueryError {
    #[error("unknown command: {}", .0)]
    UnknownCommand(String),

    #[error("missing word for {}", .0)]
    MissingWord(String),

    #[error("unexpected argument: {}", .0)]
    UnexpectedArgument(String),
}

impl<'a> Query<'a> {
    /// Parses one `<command> <word>` line. Blank lines and `#` comments
    /// parse to `None`.
    pub fn parse(line: &'a str) -> Result<Option<Self>, QueryError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let mut parts = line.split_whitespace();
        let command = parts.next().unwrap_or_default();
        let word = parts.next();
        if let Some(extra) = parts.next() {
            return Err(QueryError::UnexpectedArgument(extra.to_string()));
        }

        let query = match (command, word) {
            ("stats", None) => Query::Stats,
            ("stats", Some(extra)) => {
                return Err(QueryError::UnexpectedArgument(extra.to_string()));
            }
            ("contains" | "delete" | "insert" | "compound" | "split", None) => {
                return Err(QueryError::MissingWord(command.to_string()));
            }
            ("contains", Some(word)) => Query::Contains(word),
            ("delete", Some(word)) => Query::Delete(word),
            ("insert", Some(word)) => Query::Insert(word),
            ("compound", Some(word)) => Query::Compound(word),
            ("split", Some(word)) => Query::Split(word),
            _ => return Err(QueryError::UnknownCommand(command.to_string())),
        };
        Ok(Some(query))
    }
}

/// Owns the dictionary for the lifetime of the process.
///
/// Every query holds the trie lock for its whole duration, so a pruning chain
/// in `delete` is never observed half done.
#[derive(Debug, Default)]
pub struct Session {
    trie: Mutex<Trie>,
    sources: Mutex<HashMap<String, usize>>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            trie: Mutex::new(Trie::new()),
            sources: Mutex::new(HashMap::new()),
        }
    }

    pub async fn add_word_list(&self, word_list: &WordList) -> Result<usize, TrieError> {
        self.add_words(&word_list.name, &word_list.words).await
    }

    /// Loads `words` as one batch and records them under `source`.
    pub async fn add_words(&self, source: &str, words: &[String]) -> Result<usize, TrieError> {
        let mut trie_lock = self.trie.lock().await;
        let added = trie_lock.load(words)?;
        info!("loaded {} new words from {} ({} given)", added, source, words.len());

        let mut sources_lock = self.sources.lock().await;
        *sources_lock.entry(source.to_string()).or_insert(0) += added;
        Ok(added)
    }

    pub async fn execute(&self, query: Query<'_>) -> Value {
        let mut trie_lock = self.trie.lock().await;
        match query {
            Query::Contains(word) => {
                json!({"op": "contains", "word": word, "result": trie_lock.contains(word)})
            }
            Query::Delete(word) => {
                let result = trie_lock.delete(word);
                if result {
                    debug!("deleted {}", word);
                }
                json!({"op": "delete", "word": word, "result": result})
            }
            Query::Insert(word) => match trie_lock.insert(word) {
                Ok(result) => json!({"op": "insert", "word": word, "result": result}),
                Err(e) => json!({"op": "insert", "word": word, "error": e.to_string()}),
            },
            Query::Compound(word) => json!({
                "op": "compound",
                "word": word,
                "result": trie_lock.is_concatenation_of_two_words(word),
            }),
            Query::Split(word) => {
                let result = match trie_lock.split_into_two_words(word) {
                    Some((head, tail)) => json!([head, tail]),
                    None => Value::Null,
                };
                json!({"op": "split", "word": word, "result": result})
            }
            Query::Stats => {
                let sources_lock = self.sources.lock().await;
                let mut sources = Map::new();
                for (name, count) in sources_lock.iter() {
                    sources.insert(name.clone(), json!(count));
                }
                json!({
                    "op": "stats",
                    "words": trie_lock.len(),
                    "nodes": trie_lock.node_count(),
                    "sources": sources,
                })
            }
        }
    }

    /// Answers one input line, or `None` for lines that carry no query.
    pub async fn answer(&self, line: &str) -> Option<Value> {
        match Query::parse(line) {
            Ok(Some(query)) => Some(self.execute(query).await),
            Ok(None) => None,
            Err(e) => Some(json!({"error": e.to_string()})),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn words(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_parse_query() {
        assert_eq!(Ok(Some(Query::Contains("hello"))), Query::parse("contains hello"));
        assert_eq!(Ok(Some(Query::Split("ab"))), Query::parse("  split   ab  "));
        assert_eq!(Ok(Some(Query::Stats)), Query::parse("stats"));
        assert_eq!(Ok(None), Query::parse("   "));
        assert_eq!(Ok(None), Query::parse("# contains hello"));

        assert_eq!(
            Err(QueryError::UnknownCommand("find".to_string())),
            Query::parse("find hello")
        );
        assert_eq!(
            Err(QueryError::MissingWord("delete".to_string())),
            Query::parse("delete")
        );
        assert_eq!(
            Err(QueryError::UnexpectedArgument("world".to_string())),
            Query::parse("contains hello world")
        );
        assert_eq!(
            Err(QueryError::UnexpectedArgument("now".to_string())),
            Query::parse("stats now")
        );
    }

    #[tokio::test]
    async fn test_answer_queries() {
        let session = Session::new();
        let added = session
            .add_words("test", &words(&["hello", "world", "hell", "o"]))
            .await
            .unwrap();
        assert_eq!(4, added);

        assert_eq!(
            Some(json!({"op": "contains", "word": "hello", "result": true})),
            session.answer("contains hello").await
        );
        assert_eq!(
            Some(json!({"op": "compound", "word": "helloworld", "result": true})),
            session.answer("compound helloworld").await
        );
        assert_eq!(
            Some(json!({"op": "split", "word": "helloworld", "result": ["hello", "world"]})),
            session.answer("split helloworld").await
        );
        assert_eq!(
            Some(json!({"op": "split", "word": "hello", "result": null})),
            session.answer("split hello").await
        );
        assert_eq!(
            Some(json!({"op": "delete", "word": "hello", "result": true})),
            session.answer("delete hello").await
        );
        assert_eq!(
            Some(json!({"op": "delete", "word": "hello", "result": false})),
            session.answer("delete hello").await
        );
        assert_eq!(
            Some(json!({"op": "contains", "word": "hell", "result": true})),
            session.answer("contains hell").await
        );
        assert_eq!(None, session.answer("").await);
        assert_eq!(
            Some(json!({"error": "unknown command: find"})),
            session.answer("find hello").await
        );
    }

    #[tokio::test]
    async fn test_insert_and_stats() {
        let session = Session::new();
        session.add_words("a", &words(&["sun"])).await.unwrap();

        assert_eq!(
            Some(json!({"op": "insert", "word": "sky", "result": true})),
            session.answer("insert sky").await
        );
        let rejected = session.answer("insert Sky").await.unwrap();
        assert!(rejected["error"].as_str().unwrap().contains("'S'"));

        assert_eq!(
            Some(json!({
                "op": "stats",
                "words": 2,
                "nodes": 6,
                "sources": {"a": 1},
            })),
            session.answer("stats").await
        );
    }

    #[tokio::test]
    async fn test_add_words_rejects_batch() {
        let session = Session::new();
        let err = session
            .add_words("bad", &words(&["ok", "not ok"]))
            .await
            .unwrap_err();
        assert!(matches!(err, TrieError::InvalidSymbol { position: 3, .. }));
        assert_eq!(
            Some(json!({"op": "contains", "word": "ok", "result": false})),
            session.answer("contains ok").await
        );
    }
}
