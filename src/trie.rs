use crate::error::TrieError;

const ALPHABET_SIZE: usize = 26;

type Children = [Option<Box<TrieNode>>; ALPHABET_SIZE];

/// One position in the `a..=z` path space.
///
/// `children` is lazy on two levels: the container itself is only allocated
/// once the first child is inserted, and each slot holds a node only for
/// symbols that some stored word actually uses. A container is never kept
/// around with every slot empty.
#[derive(Debug, Default)]
pub struct TrieNode {
    children: Option<Box<Children>>,
    is_word_end: bool,
}

#[derive(Debug, Default)]
pub struct Trie {
    root: TrieNode,
    word_count: usize,
}

fn symbol_index(symbol: u8) -> Option<usize> {
    if symbol.is_ascii_lowercase() {
        Some((symbol - b'a') as usize)
    } else {
        None
    }
}

fn validate_word(word: &str) -> Result<(), TrieError> {
    if word.is_empty() {
        return Err(TrieError::EmptyWord);
    }
    match word.char_indices().find(|(_, ch)| !ch.is_ascii_lowercase()) {
        Some((position, symbol)) => Err(TrieError::InvalidSymbol {
            word: word.to_string(),
            symbol,
            position,
        }),
        None => Ok(()),
    }
}

impl TrieNode {
    fn child(&self, index: usize) -> Option<&TrieNode> {
        self.children.as_ref()?[index].as_deref()
    }

    fn child_mut(&mut self, index: usize) -> Option<&mut TrieNode> {
        self.children.as_mut()?[index].as_deref_mut()
    }

    fn child_or_insert(&mut self, index: usize) -> &mut TrieNode {
        let children = self.children.get_or_insert_with(Box::default);
        children[index].get_or_insert_with(Box::default)
    }

    /// Drops the child at `index` together with its whole subtree, and the
    /// container as well once no slot is left.
    fn detach_child(&mut self, index: usize) {
        if let Some(children) = self.children.as_mut() {
            children[index] = None;
            if children.iter().all(Option::is_none) {
                self.children = None;
            }
        }
    }

    fn child_count(&self) -> usize {
        self.children
            .as_ref()
            .map_or(0, |children| children.iter().filter(|slot| slot.is_some()).count())
    }

    fn count_nodes(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            if let Some(children) = node.children.as_ref() {
                stack.extend(children.iter().flatten().map(|child| &**child));
            }
        }
        count
    }
}

/// Tears the subtree down with an explicit stack. Each node is emptied before
/// it is dropped, so the depth of a stored word never reaches the call stack.
impl Drop for TrieNode {
    fn drop(&mut self) {
        let mut stack: Vec<Box<TrieNode>> = Vec::new();
        if let Some(children) = self.children.take() {
            stack.extend((*children).into_iter().flatten());
        }
        while let Some(mut node) = stack.pop() {
            if let Some(children) = node.children.take() {
                stack.extend((*children).into_iter().flatten());
            }
        }
    }
}

impl Trie {
    pub fn new() -> Self {
        Trie {
            root: TrieNode::default(),
            word_count: 0,
        }
    }

    /// Inserts every word of the batch.
    ///
    /// The whole batch is validated first, so a rejected word leaves the trie
    /// exactly as it was. Returns how many words were not already present.
    pub fn load<I, S>(&mut self, words: I) -> Result<usize, TrieError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words: Vec<S> = words.into_iter().collect();
        for word in words.iter() {
            validate_word(word.as_ref())?;
        }

        let mut added = 0;
        for word in words.iter() {
            if self.insert_validated(word.as_ref()) {
                added += 1;
            }
        }
        Ok(added)
    }

    /// Inserts a single word, returning whether it was newly added.
    pub fn insert(&mut self, word: &str) -> Result<bool, TrieError> {
        validate_word(word)?;
        Ok(self.insert_validated(word))
    }

    fn insert_validated(&mut self, word: &str) -> bool {
        let mut node = &mut self.root;
        for symbol in word.bytes() {
            // validated words only hold a..=z
            let Some(index) = symbol_index(symbol) else {
                return false;
            };
            node = node.child_or_insert(index);
        }

        if node.is_word_end {
            return false;
        }
        node.is_word_end = true;
        self.word_count += 1;
        true
    }

    fn find(&self, word: &str) -> Option<&TrieNode> {
        word.bytes()
            .try_fold(&self.root, |node, symbol| node.child(symbol_index(symbol)?))
    }

    /// Exact-word membership. Empty input and symbols outside `a..=z` are
    /// never stored, so both answer `false`.
    pub fn contains(&self, word: &str) -> bool {
        if word.is_empty() {
            return false;
        }
        self.find(word).is_some_and(|node| node.is_word_end)
    }

    /// Removes `word` and prunes every node that no longer leads to a stored
    /// word. Returns `false` without touching anything if the word is absent.
    pub fn delete(&mut self, word: &str) -> bool {
        if word.is_empty() || !self.contains(word) {
            return false;
        }
        let Some(path) = word.bytes().map(symbol_index).collect::<Option<Vec<usize>>>() else {
            return false;
        };

        // The deepest node on the path that outlives the deletion: the root, a
        // word end, or a fork. Everything below it is a dead chain once the
        // terminal loses its flag, unless the terminal still has children.
        let mut keeper = 0;
        let mut node = &self.root;
        for (depth, &index) in path.iter().enumerate() {
            if depth > 0 && (node.is_word_end || node.child_count() > 1) {
                keeper = depth;
            }
            match node.child(index) {
                Some(child) => node = child,
                None => return false,
            }
        }
        let terminal_has_children = node.children.is_some();

        if terminal_has_children {
            let Some(terminal) = self.node_mut(&path) else {
                return false;
            };
            terminal.is_word_end = false;
        } else {
            let Some(parent) = self.node_mut(&path[..keeper]) else {
                return false;
            };
            parent.detach_child(path[keeper]);
        }
        self.word_count -= 1;
        true
    }

    fn node_mut(&mut self, path: &[usize]) -> Option<&mut TrieNode> {
        let mut node = &mut self.root;
        for &index in path {
            node = node.child_mut(index)?;
        }
        Some(node)
    }

    /// Finds the first split of `word` into two stored words, shortest head
    /// first.
    ///
    /// A word that is itself stored never qualifies. The head is walked with a
    /// single cursor, so the scan stops as soon as no stored word can start
    /// with the current head.
    pub fn split_into_two_words<'a>(&self, word: &'a str) -> Option<(&'a str, &'a str)> {
        if word.is_empty() || self.contains(word) {
            return None;
        }

        let symbols = word.as_bytes();
        let mut node = &self.root;
        for (i, &symbol) in symbols[..symbols.len() - 1].iter().enumerate() {
            node = node.child(symbol_index(symbol)?)?;
            if node.is_word_end {
                // every symbol up to i is ascii, so i + 1 is a char boundary
                let (head, tail) = word.split_at(i + 1);
                if self.contains(tail) {
                    return Some((head, tail));
                }
            }
        }
        None
    }

    pub fn is_concatenation_of_two_words(&self, word: &str) -> bool {
        self.split_into_two_words(word).is_some()
    }

    /// Number of stored words.
    pub fn len(&self) -> usize {
        self.word_count
    }

    pub fn is_empty(&self) -> bool {
        self.word_count == 0
    }

    /// Number of live nodes, root included.
    pub fn node_count(&self) -> usize {
        self.root.count_nodes()
    }
}
