use std::fs::File;
use std::hash::BuildHasher;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use hashbrown::{DefaultHashBuilder, HashTable};
use log::debug;
use smallvec::SmallVec;
use thiserror::Error;

use super::graph::Dawg;
use super::node::{DawgChar, Node, NodeId};

/// Trait for types that can be used as a word when building or querying a graph.
///
/// Implemented for common string and sequence types so that [`Builder::add_word`],
/// [`build_dawg`] and [`Dawg::contains`] accept them directly.
pub trait IntoWord<C: DawgChar> {
    /// Collects this word into a letter buffer.
    fn collect_word(self) -> SmallVec<[C; 32]>;
}

macro_rules! string_words {
    ($($ty:ty),*) => {
        $(impl IntoWord<char> for $ty {
            fn collect_word(self) -> SmallVec<[char; 32]> {
                self.chars().collect()
            }
        })*
    };
}

string_words!(&str, &&str, String, &String);

impl<C: DawgChar> IntoWord<C> for &[C] {
    fn collect_word(self) -> SmallVec<[C; 32]> {
        SmallVec::from_slice(self)
    }
}

impl<C: DawgChar> IntoWord<C> for Vec<C> {
    fn collect_word(self) -> SmallVec<[C; 32]> {
        SmallVec::from_vec(self)
    }
}

impl<C: DawgChar> IntoWord<C> for &Vec<C> {
    fn collect_word(self) -> SmallVec<[C; 32]> {
        SmallVec::from_slice(self)
    }
}

impl<C: DawgChar, const N: usize> IntoWord<C> for [C; N] {
    fn collect_word(self) -> SmallVec<[C; 32]> {
        self.into_iter().collect()
    }
}

impl<C: DawgChar, const N: usize> IntoWord<C> for &[C; N] {
    fn collect_word(self) -> SmallVec<[C; 32]> {
        SmallVec::from_slice(self)
    }
}

/// Errors that can occur while building a lexicon graph.
#[derive(Debug, PartialEq, Eq, Error)]
pub enum BuilderError<C: DawgChar> {
    /// Words were not supplied in strictly increasing lexicographic order.
    ///
    /// Duplicates count as out of order.
    #[error("words out of order: {previous:?} came before {word:?}")]
    OutOfOrder {
        /// The previously added word.
        previous: Vec<C>,
        /// The word that should have come first.
        word: Vec<C>,
    },
    /// An empty word was supplied.
    #[error("empty word in lexicon (after {previous:?})")]
    EmptyWord {
        /// The previously added word, empty if none.
        previous: Vec<C>,
    },
}

/// Errors from building a graph out of a word list file.
#[derive(Debug, Error)]
pub enum WordListError {
    /// The word list could not be read.
    #[error("failed to read word list: {0}")]
    Io(#[from] io::Error),
    /// The words violated a builder precondition.
    #[error(transparent)]
    Build(#[from] BuilderError<char>),
}

/// An edge created but not yet frozen: the letter leading into `node` from the
/// entry below it on the stack.
struct BuildState<C: DawgChar> {
    ch: C,
    node: Node<C>,
}

/// Incremental builder for a minimal lexicon graph.
///
/// Words must be added in strictly increasing lexicographic order. Because of
/// that, once a new word diverges from the previous one, every open node below
/// the shared prefix is complete and is frozen right away: it is either
/// registered as a new canonical node or replaced by an existing node with the
/// same structure.
///
/// ```
/// use lexdawg::dawg::builder::Builder;
///
/// let mut builder = Builder::new();
/// builder.add_word("CAT").unwrap();
/// builder.add_word("HAT").unwrap();
/// let dawg = builder.build();
///
/// let cat = dawg.root().get('C').unwrap().get('A').unwrap();
/// let hat = dawg.root().get('H').unwrap().get('A').unwrap();
/// assert_eq!(cat, hat);
/// ```
pub struct Builder<C: DawgChar> {
    /// Frozen nodes, children always before parents.
    nodes: Vec<Node<C>>,
    /// The root, open until [`Builder::build`].
    root: Node<C>,
    /// Open nodes along the previous word's path, one per letter.
    build_state: Vec<BuildState<C>>,
    /// Canonical node ids, hashed by structure.
    registry: HashTable<NodeId>,
    hasher: DefaultHashBuilder,
    word_count: usize,
}

impl<C: DawgChar> Default for Builder<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: DawgChar> Builder<C> {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Builder {
            nodes: Vec::new(),
            root: Node::new(false),
            build_state: Vec::new(),
            registry: HashTable::new(),
            hasher: DefaultHashBuilder::default(),
            word_count: 0,
        }
    }

    /// Adds a word to the graph being constructed.
    ///
    /// The word can be any type that implements [`IntoWord`], including `&str`,
    /// `String`, `&[u8]`, `Vec<u8>`, or fixed-size arrays like `[u8; 3]`.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::OutOfOrder`] if the word does not sort strictly after
    /// the previously added word, and [`BuilderError::EmptyWord`] for an empty word.
    /// The builder is left unchanged by a rejected word.
    pub fn add_word(&mut self, word: impl IntoWord<C>) -> Result<(), BuilderError<C>> {
        let word = word.collect_word();
        self.add_word_slice(&word)
    }

    fn add_word_slice(&mut self, word: &[C]) -> Result<(), BuilderError<C>> {
        if word.is_empty() {
            return Err(BuilderError::EmptyWord {
                previous: self.previous_word(),
            });
        }
        let prefix_length = self.prefix_length(word)?;
        self.freeze_suffix(prefix_length);
        let last = word.len() - 1;
        self.build_state.extend(
            word.iter()
                .enumerate()
                .skip(prefix_length)
                .map(|(i, &ch)| BuildState {
                    ch,
                    node: Node::new(i == last),
                }),
        );
        self.word_count += 1;
        Ok(())
    }

    /// Length of the prefix `word` shares with the previous word, or an error if
    /// `word` does not sort after it.
    fn prefix_length(&self, word: &[C]) -> Result<usize, BuilderError<C>> {
        let mut prefix_len = 0;
        for (i, &ch) in word.iter().enumerate() {
            let is_last = i == word.len() - 1;
            let Some(prev_state) = self.build_state.get(prefix_len) else {
                break;
            };
            if ch > prev_state.ch {
                break;
            }
            if ch < prev_state.ch || is_last {
                return Err(BuilderError::OutOfOrder {
                    previous: self.previous_word(),
                    word: word.to_vec(),
                });
            }
            prefix_len += 1;
        }
        Ok(prefix_len)
    }

    fn previous_word(&self) -> Vec<C> {
        self.build_state.iter().map(|e| e.ch).collect()
    }

    /// Freezes open nodes until only `target_length` letters of the previous
    /// word remain on the stack.
    fn freeze_suffix(&mut self, target_length: usize) {
        debug_assert!(self.build_state.len() >= target_length);
        while self.build_state.len() > target_length {
            let Some(state) = self.build_state.pop() else {
                break;
            };
            let child = self.canonicalize(state.node);
            self.open_parent().insert(state.ch, child);
        }
    }

    /// The deepest open node: the top of the stack, or the root once it is empty.
    fn open_parent(&mut self) -> &mut Node<C> {
        match self.build_state.last_mut() {
            Some(state) => &mut state.node,
            None => &mut self.root,
        }
    }

    /// Returns the id of the canonical node structurally equal to `node`,
    /// registering `node` if it is the first of its kind.
    fn canonicalize(&mut self, node: Node<C>) -> NodeId {
        debug_assert!(
            node.edges().all(|(_, id)| id.index() < self.nodes.len()),
            "Cannot canonicalize unless all children are canonical"
        );

        let hash = self.hasher.hash_one(&node);
        let nodes = &self.nodes;
        if let Some(&id) = self.registry.find(hash, |&id| nodes[id.index()] == node) {
            return id;
        }

        let id = NodeId::from_index(self.nodes.len());
        self.nodes.push(node);
        let (nodes, hasher) = (&self.nodes, &self.hasher);
        self.registry
            .insert_unique(hash, id, |&id| hasher.hash_one(&nodes[id.index()]));
        id
    }

    /// Number of words added so far.
    pub fn word_count(&self) -> usize {
        self.word_count
    }

    /// Freezes everything still open and returns the finished graph.
    pub fn build(mut self) -> Dawg<C> {
        self.freeze_suffix(0);
        let root_node = std::mem::replace(&mut self.root, Node::new(false));
        let root = self.canonicalize(root_node);
        debug!(
            "built lexicon graph: {} words, {} nodes",
            self.word_count,
            self.nodes.len()
        );
        Dawg::from_parts(self.nodes, root, self.word_count)
    }
}

/// Builds a minimal lexicon graph from an iterator of words.
///
/// Words **must** be provided in strictly increasing lexicographic order, or this
/// function returns an error; no partial graph is returned.
///
/// ```
/// use lexdawg::dawg::builder::build_dawg;
///
/// let dawg = build_dawg(["APPLE", "BANANA", "CHERRY"]).unwrap();
/// assert!(dawg.contains("BANANA"));
/// assert!(!dawg.contains("APRICOT"));
///
/// let bytes = build_dawg([vec![1u8, 2, 3], vec![1, 2, 4]]).unwrap();
/// assert!(bytes.contains([1u8, 2, 4]));
/// ```
pub fn build_dawg<C, W>(words: impl IntoIterator<Item = W>) -> Result<Dawg<C>, BuilderError<C>>
where
    C: DawgChar,
    W: IntoWord<C>,
{
    let mut builder = Builder::new();
    for word in words {
        builder.add_word(word)?;
    }
    Ok(builder.build())
}

/// Builds a graph from a sorted word list, one word per line.
///
/// Trailing whitespace is trimmed; blank lines and lines starting with `#` are skipped.
pub fn build_dawg_from_reader(mut reader: impl BufRead) -> Result<Dawg<char>, WordListError> {
    let mut builder = Builder::new();
    // Reuse one line buffer instead of allocating a String per line.
    let mut buf = String::with_capacity(80);
    while reader.read_line(&mut buf)? > 0 {
        if let Some(word) = word_on_line(&buf) {
            builder.add_word(word)?;
        }
        buf.clear();
    }
    Ok(builder.build())
}

/// Reads the words of a word list, skipping lines as [`build_dawg_from_reader`] does.
///
/// No order is required, which makes this the input for [`cross_check`](super::cross_check).
pub fn read_word_list(reader: impl BufRead) -> io::Result<Vec<String>> {
    let mut words = Vec::new();
    for line in reader.lines() {
        if let Some(word) = word_on_line(&line?) {
            words.push(word.to_owned());
        }
    }
    Ok(words)
}

fn word_on_line(line: &str) -> Option<&str> {
    let word = line.trim_end();
    (!word.is_empty() && !is_comment(word)).then_some(word)
}

/// Builds a graph from a sorted word list file. See [`build_dawg_from_reader`].
///
/// ```no_run
/// use lexdawg::dawg::builder::build_dawg_from_file;
///
/// let dawg = build_dawg_from_file("words-en.txt").unwrap();
/// ```
pub fn build_dawg_from_file(path: impl AsRef<Path>) -> Result<Dawg<char>, WordListError> {
    let file = File::open(path.as_ref())?;
    build_dawg_from_reader(BufReader::new(file))
}

/// Returns true if this line is a comment.
pub(crate) fn is_comment(line: &str) -> bool {
    line.trim_start().starts_with('#')
}
