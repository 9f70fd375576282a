use std::fmt;

use super::builder::IntoWord;
use super::node::{DawgChar, Node, NodeId, NodeRef};

/// A minimal lexicon graph that owns its nodes.
///
/// Nodes are stored in one arena and refer to their children by [`NodeId`], so
/// the graph can be freely moved, cloned, shared across threads and persisted.
/// It is never mutated after [`Builder::build`](super::builder::Builder::build).
///
/// ```
/// use lexdawg::dawg::builder::build_dawg;
///
/// let dawg = build_dawg(["BAKE", "CAKE", "FAKE", "LAKE", "MAKE"]).unwrap();
/// assert!(dawg.contains("CAKE"));
/// assert!(!dawg.contains("AKE"));
/// assert!(dawg.has_prefix("MA"));
///
/// let root = dawg.root();
/// assert!(root.get('L').unwrap().has_suffix("AKE".chars()));
/// ```
#[derive(Clone)]
pub struct Dawg<C: DawgChar> {
    nodes: Vec<Node<C>>,
    root: NodeId,
    word_count: usize,
}

impl<C: DawgChar> Dawg<C> {
    pub(crate) fn from_parts(nodes: Vec<Node<C>>, root: NodeId, word_count: usize) -> Self {
        debug_assert!(root.index() < nodes.len());
        Dawg {
            nodes,
            root,
            word_count,
        }
    }

    /// Returns a cursor on the root node.
    pub fn root(&self) -> NodeRef<'_, C> {
        NodeRef::new(self, self.root)
    }

    /// Returns the node with the given id.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this graph.
    #[inline]
    pub fn node(&self, id: NodeId) -> &Node<C> {
        &self.nodes[id.index()]
    }

    /// All nodes, children before parents.
    pub fn nodes(&self) -> &[Node<C>] {
        &self.nodes
    }

    /// Returns the number of unique nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of edges in the graph.
    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(Node::child_count).sum()
    }

    /// Returns the number of words the graph was built from.
    pub fn word_count(&self) -> usize {
        self.word_count
    }

    /// Returns true if the word is in the lexicon.
    ///
    /// Words up to 32 letters are checked without allocating.
    pub fn contains(&self, word: impl IntoWord<C>) -> bool {
        self.contains_letters(word.collect_word())
    }

    /// Like [`contains`](Dawg::contains), for any iterator of letters.
    pub fn contains_letters(&self, letters: impl IntoIterator<Item = C>) -> bool {
        self.walk(letters).is_some_and(|id| self.node(id).is_word())
    }

    /// Returns true if some word in the lexicon starts with `prefix`.
    pub fn has_prefix(&self, prefix: impl IntoWord<C>) -> bool {
        self.walk(prefix.collect_word()).is_some()
    }

    fn walk(&self, letters: impl IntoIterator<Item = C>) -> Option<NodeId> {
        letters
            .into_iter()
            .try_fold(self.root, |id, ch| self.node(id).get(ch))
    }

    /// Returns an iterator over every word in the lexicon, in lexicographic order.
    pub fn words(&self) -> Words<'_, C> {
        Words {
            graph: self,
            stack: vec![(self.root, 0)],
            prefix: Vec::new(),
            root_pending: self.node(self.root).is_word(),
        }
    }
}

impl Dawg<char> {
    /// Returns every word in the lexicon as a `String`, in lexicographic order.
    pub fn word_strings(&self) -> impl Iterator<Item = String> + '_ {
        self.words().map(|letters| letters.into_iter().collect())
    }
}

impl<C: DawgChar> fmt::Debug for Dawg<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dawg")
            .field("node_count", &self.node_count())
            .field("word_count", &self.word_count)
            .finish()
    }
}

/// Depth-first iterator over the words of a [`Dawg`].
pub struct Words<'g, C: DawgChar> {
    graph: &'g Dawg<C>,
    /// Node and index of the next edge to follow, per depth.
    stack: Vec<(NodeId, usize)>,
    prefix: Vec<C>,
    root_pending: bool,
}

impl<C: DawgChar> Iterator for Words<'_, C> {
    type Item = Vec<C>;

    fn next(&mut self) -> Option<Self::Item> {
        if std::mem::take(&mut self.root_pending) {
            return Some(Vec::new());
        }
        loop {
            let (id, index) = self.stack.last_mut()?;
            match self.graph.node(*id).children_ref().get(*index) {
                Some((ch, child)) => {
                    *index += 1;
                    self.prefix.push(ch);
                    self.stack.push((child, 0));
                    if self.graph.node(child).is_word() {
                        return Some(self.prefix.clone());
                    }
                }
                None => {
                    self.stack.pop();
                    self.prefix.pop();
                }
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::super::builder::build_dawg;
    use super::*;

    fn is_word(root: NodeRef<'_, char>, word: &str) -> bool {
        word.chars()
            .try_fold(root, |n, ch| n.get(ch))
            .is_some_and(|n| n.is_word())
    }

    #[test]
    fn basic_word_lookup() {
        let dawg = build_dawg(["BAKE", "CAKE", "FAKE", "LAKE"]).unwrap();
        let root = dawg.root();
        assert!(is_word(root, "BAKE"));
        assert!(is_word(root, "CAKE"));
        assert!(!is_word(root, "MAKE"));
        assert!(!is_word(root, "BAK"));
    }

    #[test]
    fn contains_rejects_prefixes_and_extensions() {
        let dawg = build_dawg(["AT", "CATS", "HAT", "HATS"]).unwrap();
        assert!(dawg.contains("CATS"));
        assert!(dawg.contains("HAT"));
        assert!(!dawg.contains("CAT"));
        assert!(!dawg.contains("CATSS"));
        assert!(!dawg.contains("DOG"));
        assert!(!dawg.contains(""));
    }

    #[test]
    fn has_prefix() {
        let dawg = build_dawg(["BAKE", "BAKED", "BAKER", "CAKE"]).unwrap();
        assert!(dawg.has_prefix("BA"));
        assert!(dawg.has_prefix("BAKER"));
        assert!(dawg.has_prefix(""));
        assert!(!dawg.has_prefix("BAKERS"));
        assert!(!dawg.has_prefix("MA"));
    }

    #[test]
    fn words_come_back_sorted() {
        let words = ["BAKE", "BAKED", "BAKER", "CAKE", "CAKED", "FAKE", "LAKE"];
        let dawg = build_dawg(words).unwrap();
        let listed: Vec<String> = dawg.word_strings().collect();
        assert_eq!(listed, words);
    }

    #[test]
    fn words_of_empty_graph() {
        let dawg = build_dawg::<u8, Vec<u8>>(Vec::new()).unwrap();
        assert_eq!(dawg.words().next(), None);
    }

    #[test]
    fn counts() {
        let dawg = build_dawg(["ABC", "ABD"]).unwrap();
        // root, A, B, then C and D collapse into one terminal leaf.
        assert_eq!(dawg.node_count(), 4);
        assert_eq!(dawg.edge_count(), 4);
        assert_eq!(dawg.word_count(), 2);
    }

    #[test]
    fn node_refs_from_different_graphs_differ() {
        let a = build_dawg(["A"]).unwrap();
        let b = build_dawg(["A"]).unwrap();
        assert_eq!(a.root().id(), b.root().id());
        assert_ne!(a.root(), b.root());
    }

    #[test]
    fn dawg_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Dawg<char>>();
    }
}
