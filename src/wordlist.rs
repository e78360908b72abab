use glob::{glob, Pattern};
use regex::Regex;
use simple_log::{debug, error};
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use crate::error::TrieError;

pub const WORD_LIST_EXTENSION: &str = "words";

#[derive(Debug, Clone)]
pub struct WordList {
    pub name: String,
    pub words: Vec<String>,
}

fn word_pattern() -> &'static Regex {
    static WORD: OnceLock<Regex> = OnceLock::new();
    WORD.get_or_init(|| Regex::new(r"[A-Za-z]+").expect("word pattern is valid"))
}

/// Splits free text into lowercase a-z words, dropping runs shorter than
/// `min_word_len`.
pub fn extract_words(content: &str, min_word_len: usize) -> Vec<String> {
    word_pattern()
        .find_iter(content)
        .map(|mat| mat.as_str().to_ascii_lowercase())
        .filter(|word| word.len() >= min_word_len.max(1))
        .collect()
}

fn get_file_basename(path: &Path) -> String {
    match path.file_name().and_then(|name| name.to_str()) {
        Some(filename) => match filename.find('.') {
            Some(index) => filename[0..index].to_string(),
            None => filename.to_string(),
        },
        None => String::new(),
    }
}

pub fn read_word_list(path: &Path, min_word_len: usize) -> Result<WordList, TrieError> {
    let content = fs::read_to_string(path).map_err(|source| TrieError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(WordList {
        name: get_file_basename(path),
        words: extract_words(&content, min_word_len),
    })
}

/// Reads every `*.words` file directly inside `folder`, sorted by name.
/// Files that cannot be read are logged and skipped.
pub fn load_word_lists(folder: &Path, min_word_len: usize) -> Result<Vec<WordList>, TrieError> {
    let folder = Pattern::escape(&folder.display().to_string());
    let target = format!("{}/*.{}", folder, WORD_LIST_EXTENSION);
    let mut word_lists = Vec::new();
    for entry in glob(&target)? {
        match entry {
            Ok(path) => match read_word_list(&path, min_word_len) {
                Ok(word_list) => {
                    debug!("read {} words from {}", word_list.words.len(), path.display());
                    word_lists.push(word_list);
                }
                Err(e) => {
                    error!("{}", e);
                }
            },
            Err(e) => {
                error!("{:?}", e);
            }
        }
    }
    word_lists.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(word_lists)
}

#[cfg(test)]
mod test {
    use super::*;
    use std::path::PathBuf;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("wordtrie-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_extract_words() {
        let words = extract_words("Hello, world! 123 abc_def it's", 1);
        assert_eq!(vec!["hello", "world", "abc", "def", "it", "s"], words);

        let words = extract_words("Hello, world! 123 abc_def it's", 3);
        assert_eq!(vec!["hello", "world", "abc", "def"], words);

        let words = extract_words("naïve café", 0);
        assert_eq!(vec!["na", "ve", "caf"], words);
    }

    #[test]
    fn test_get_file_basename() {
        let filename = get_file_basename(Path::new("a/b/c/d.words"));
        assert_eq!("d", filename);

        let filename = get_file_basename(Path::new("english.common.words"));
        assert_eq!("english", filename);
    }

    #[test]
    fn test_load_word_lists() {
        let dir = scratch_dir("load");
        fs::write(dir.join("colors.words"), "red green\nblue").unwrap();
        fs::write(dir.join("animals.words"), "Cat DOG\n# comment bird").unwrap();
        fs::write(dir.join("ignored.txt"), "never loaded").unwrap();

        let word_lists = load_word_lists(&dir, 1).unwrap();
        assert_eq!(2, word_lists.len());
        assert_eq!("animals", word_lists[0].name);
        assert_eq!(vec!["cat", "dog", "comment", "bird"], word_lists[0].words);
        assert_eq!("colors", word_lists[1].name);
        assert_eq!(vec!["red", "green", "blue"], word_lists[1].words);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_load_folder_with_glob_characters() {
        for name in ["brackets[x]", "open[bracket", "star*question?"] {
            let dir = scratch_dir(name);
            fs::write(dir.join("a.words"), "alpha beta").unwrap();

            let word_lists = load_word_lists(&dir, 1).unwrap();
            assert_eq!(1, word_lists.len());
            assert_eq!(vec!["alpha", "beta"], word_lists[0].words);

            fs::remove_dir_all(&dir).unwrap();
        }
    }

    #[test]
    fn test_load_missing_folder() {
        let dir = std::env::temp_dir().join("wordtrie-doesnt-exist");
        let word_lists = load_word_lists(&dir, 1).unwrap();
        assert_eq!(0, word_lists.len());
    }

    #[test]
    fn test_read_missing_file() {
        let err = read_word_list(Path::new("doesnt_exist.words"), 1).unwrap_err();
        assert!(matches!(err, TrieError::Io { .. }));
    }
}
