//! Unminimized prefix tree used to cross-check the minimal graph.
//!
//! One node per distinct prefix and no ordering requirement on the input, so
//! its answers are trivially right. [`cross_check`] compares it against a
//! [`Dawg`] built from the same words; `lexdawg build --check` runs it on the
//! source word list.

use hashbrown::HashMap;
use thiserror::Error;

use super::builder::IntoWord;
use super::graph::Dawg;
use super::node::DawgChar;

#[derive(Clone, Debug)]
struct TrieNode<C: DawgChar> {
    children: HashMap<C, usize>,
    end: bool,
}

/// A plain prefix tree.
#[derive(Clone, Debug)]
pub struct Trie<C: DawgChar> {
    nodes: Vec<TrieNode<C>>,
}

impl<C: DawgChar> Default for Trie<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: DawgChar> Trie<C> {
    /// Creates a trie holding only the root.
    pub fn new() -> Self {
        Trie {
            nodes: vec![TrieNode {
                children: HashMap::new(),
                end: false,
            }],
        }
    }

    /// Inserts a word. Returns false if it was already present.
    pub fn insert(&mut self, word: impl IntoWord<C>) -> bool {
        let mut current = 0;
        for ch in word.collect_word() {
            current = match self.nodes[current].children.get(&ch) {
                Some(&next) => next,
                None => {
                    let next = self.nodes.len();
                    self.nodes.push(TrieNode {
                        children: HashMap::new(),
                        end: false,
                    });
                    self.nodes[current].children.insert(ch, next);
                    next
                }
            };
        }
        !std::mem::replace(&mut self.nodes[current].end, true)
    }

    /// Returns true if the word was inserted.
    pub fn contains(&self, word: impl IntoWord<C>) -> bool {
        word.collect_word()
            .into_iter()
            .try_fold(0, |node, ch| self.nodes[node].children.get(&ch).copied())
            .is_some_and(|node| self.nodes[node].end)
    }

    /// Number of nodes, including the root.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

/// Builds a trie from words in any order.
pub fn build_trie<C, W>(words: impl IntoIterator<Item = W>) -> Trie<C>
where
    C: DawgChar,
    W: IntoWord<C>,
{
    let mut trie = Trie::new();
    for word in words {
        trie.insert(word);
    }
    trie
}

/// A disagreement found by [`cross_check`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CrossCheckError<C: DawgChar> {
    /// The graph's words and the distinct source words first differ at `word`.
    #[error("graph word list differs from the source at {word:?}")]
    WordList {
        /// The smaller of the two words at the first difference.
        word: Vec<C>,
    },
    /// The graph and the trie give different membership answers.
    #[error("graph says {in_graph} but trie says {in_trie} for {word:?}")]
    Membership {
        /// The word that was looked up.
        word: Vec<C>,
        /// Answer of [`Dawg::contains`].
        in_graph: bool,
        /// Answer of [`Trie::contains`].
        in_trie: bool,
    },
}

/// Checks `dawg` against a trie built from `words`, which may be unsorted and repeat.
///
/// The graph must list exactly the distinct source words in order. It must
/// also answer membership like the trie for every source word, every prefix of
/// one, and every source word extended by a letter labelling a root edge.
/// Returns the trie on success.
///
/// ```
/// use lexdawg::dawg::{build_dawg, cross_check, CrossCheckError};
///
/// let dawg = build_dawg(["AT", "HAT"]).unwrap();
/// assert!(cross_check(&dawg, ["HAT", "AT"]).is_ok());
/// assert_eq!(
///     cross_check(&dawg, ["AT", "CAT"]).unwrap_err(),
///     CrossCheckError::WordList { word: vec!['C', 'A', 'T'] }
/// );
/// ```
pub fn cross_check<C, W>(
    dawg: &Dawg<C>,
    words: impl IntoIterator<Item = W>,
) -> Result<Trie<C>, CrossCheckError<C>>
where
    C: DawgChar,
    W: IntoWord<C>,
{
    let mut source: Vec<Vec<C>> = words
        .into_iter()
        .map(|word| word.collect_word().into_vec())
        .collect();
    source.sort_unstable();
    source.dedup();
    let trie = build_trie(source.iter().map(Vec::as_slice));

    let mut listed = dawg.words();
    for expected in &source {
        match listed.next() {
            Some(word) if word == *expected => {}
            Some(word) => {
                return Err(CrossCheckError::WordList {
                    word: word.min(expected.clone()),
                })
            }
            None => {
                return Err(CrossCheckError::WordList {
                    word: expected.clone(),
                })
            }
        }
    }
    if let Some(word) = listed.next() {
        return Err(CrossCheckError::WordList { word });
    }

    let extensions: Vec<C> = dawg.root().children().map(|(ch, _)| ch).collect();
    for word in &source {
        let prefixes = (1..=word.len()).map(|end| word[..end].to_vec());
        let extended = extensions.iter().map(|&ch| {
            let mut longer = word.clone();
            longer.push(ch);
            longer
        });
        for probe in prefixes.chain(extended) {
            let in_graph = dawg.contains(probe.as_slice());
            let in_trie = trie.contains(probe.as_slice());
            if in_graph != in_trie {
                return Err(CrossCheckError::Membership {
                    word: probe,
                    in_graph,
                    in_trie,
                });
            }
        }
    }
    Ok(trie)
}

#[cfg(test)]
mod test {
    use super::super::builder::build_dawg;
    use super::*;

    const LEXICON: [&str; 9] = [
        "AT", "ATE", "CAT", "CATS", "EAT", "EATS", "HAT", "HATS", "TEA",
    ];

    #[test]
    fn order_does_not_matter() {
        let trie = build_trie(["TEA", "AT", "HATS", "AT"]);
        assert!(trie.contains("AT"));
        assert!(trie.contains("HATS"));
        assert!(!trie.contains("HAT"));
        assert!(!trie.contains("T"));
    }

    #[test]
    fn one_node_per_prefix() {
        let trie = build_trie(["CAT", "CATS", "CAB"]);
        // root, C, CA, CAT, CATS, CAB
        assert_eq!(trie.node_count(), 6);
    }

    #[test]
    fn insert_reports_duplicates() {
        let mut trie = Trie::new();
        assert!(trie.insert("AT"));
        assert!(!trie.insert("AT"));
        assert!(trie.insert("A"));
    }

    #[test]
    fn agrees_with_minimal_graph() {
        let trie = build_trie(LEXICON);
        let dawg = build_dawg(LEXICON).unwrap();
        let probes = [
            "A", "AT", "ATE", "ATES", "C", "CA", "CAT", "CATS", "CATSS", "E", "EAT", "HA",
            "HAT", "HATE", "T", "TE", "TEA", "TEAS", "ZZZ",
        ];
        for probe in probes {
            assert_eq!(trie.contains(probe), dawg.contains(probe), "{probe}");
        }
        assert!(dawg.node_count() < trie.node_count());
    }

    #[test]
    fn cross_check_accepts_graph_of_same_words() {
        let dawg = build_dawg(LEXICON).unwrap();
        let shuffled = ["TEA", "HATS", "AT", "CATS", "EAT", "AT", "ATE", "HAT", "CAT", "EATS"];
        let trie = cross_check(&dawg, shuffled).unwrap();
        assert_eq!(trie.node_count(), build_trie(LEXICON).node_count());
    }

    #[test]
    fn cross_check_rejects_graph_of_other_words() {
        let dawg = build_dawg(["AT", "CAT", "HAT"]).unwrap();

        let missing = cross_check(&dawg, ["AT", "CAT", "EAT", "HAT"]);
        assert_eq!(
            missing.unwrap_err(),
            CrossCheckError::WordList { word: "EAT".chars().collect() }
        );

        let extra = cross_check(&dawg, ["AT", "CAT"]);
        assert_eq!(
            extra.unwrap_err(),
            CrossCheckError::WordList { word: "HAT".chars().collect() }
        );
    }
}
