use std::fmt::{self, Debug};
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use super::graph::Dawg;

/// A letter that can label a graph edge.
///
/// Edge lists are kept sorted and nodes are hash-consed, so letters need a
/// total order and a hash. `char` is what the game uses; byte words work too.
pub trait DawgChar: Copy + Ord + Hash + Debug {}

impl<T: Copy + Ord + Hash + Debug> DawgChar for T {}

/// Index of a frozen node inside a [`Dawg`]'s node arena.
///
/// Nodes are frozen bottom-up, so a child's id is always smaller than its
/// parent's id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(u32);

impl NodeId {
    /// Position of the node in the arena.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub(crate) fn from_index(index: usize) -> Self {
        NodeId(u32::try_from(index).expect("node arena exceeds u32::MAX nodes"))
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A compact representation of the outgoing edges of a node that doesn't allocate until
/// there are at least three of them. Edges are kept sorted by letter.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Children<C> {
    /// No children.
    None,
    /// Exactly one child (letter, node).
    One((C, NodeId)),
    /// Exactly two children (letter1, node1, letter2, node2).
    Two((C, NodeId, C, NodeId)),
    /// Three or more children stored in a vector.
    Many(Vec<(C, NodeId)>),
}

impl<C: DawgChar> Children<C> {
    /// Gets the edge at the specified position.
    ///
    /// Returns `None` if the position is out of bounds.
    #[inline]
    pub fn get(&self, index: usize) -> Option<(C, NodeId)> {
        match self {
            Children::None => None,
            Children::One(child) => match index {
                0 => Some(*child),
                _ => None,
            },
            Children::Two((c1, n1, c2, n2)) => match index {
                0 => Some((*c1, *n1)),
                1 => Some((*c2, *n2)),
                _ => None,
            },
            Children::Many(children) => children.get(index).copied(),
        }
    }

    /// Number of edges.
    #[inline]
    pub fn len(&self) -> usize {
        match self {
            Children::None => 0,
            Children::One(_) => 1,
            Children::Two(_) => 2,
            Children::Many(children) => children.len(),
        }
    }

    /// True if there are no edges.
    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, Children::None)
    }

    /// Returns the target of the edge labelled `letter`.
    #[inline]
    pub fn find(&self, letter: C) -> Option<NodeId> {
        match self {
            Children::None => None,
            Children::One((ch, node)) => (*ch == letter).then_some(*node),
            Children::Two((c1, n1, c2, n2)) => {
                if letter == *c1 {
                    Some(*n1)
                } else if letter == *c2 {
                    Some(*n2)
                } else {
                    None
                }
            }
            Children::Many(children) => {
                // Unrolled by 2 for load-level parallelism on small fan-outs.
                let chunks = children.chunks_exact(2);
                let remainder = chunks.remainder();
                for chunk in chunks {
                    if chunk[0].0 == letter {
                        return Some(chunk[0].1);
                    }
                    if chunk[1].0 == letter {
                        return Some(chunk[1].1);
                    }
                }
                remainder
                    .iter()
                    .find(|&&(ch, _)| ch == letter)
                    .map(|&(_, node)| node)
            }
        }
    }

    /// Appends an edge. Callers must append in increasing letter order.
    pub(crate) fn push(&mut self, letter: C, node: NodeId) {
        debug_assert!(
            self.get(self.len().wrapping_sub(1))
                .map_or(true, |(last, _)| last < letter),
            "edges must be appended in sorted order"
        );
        let c = (letter, node);
        match self {
            Children::None => *self = Children::One(c),
            Children::One((c1, n1)) => *self = Children::Two((*c1, *n1, c.0, c.1)),
            Children::Two((c1, n1, c2, n2)) => {
                *self = Children::Many(vec![(*c1, *n1), (*c2, *n2), c])
            }
            Children::Many(children) => children.push(c),
        }
    }

    /// True if the variant matches the edge count, which keeps derived
    /// equality structural.
    pub(crate) fn is_compact(&self) -> bool {
        match self {
            Children::Many(children) => children.len() > 2,
            _ => true,
        }
    }
}

/// An iterator over the outgoing edges of a [`Node`].
#[derive(Clone)]
pub struct Edges<'n, C> {
    children: &'n Children<C>,
    index: usize,
}

impl<C: DawgChar> Iterator for Edges<'_, C> {
    type Item = (C, NodeId);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let edge = self.children.get(self.index)?;
        self.index += 1;
        Some(edge)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.children.len().saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

impl<C: DawgChar> ExactSizeIterator for Edges<'_, C> {}

/// A vertex of the lexicon graph: a terminal flag plus letter-labelled edges.
///
/// Equality and hashing are derived over the flag and the `(letter, NodeId)`
/// pairs. Since children are always canonical before their parent is frozen,
/// this is exactly structural equivalence of the whole subgraph.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Node<C> {
    children: Children<C>,
    word: bool,
}

impl<C: DawgChar> Node<C> {
    /// Creates a node without edges.
    ///
    /// # Arguments
    ///
    /// * `word` - Whether some word ends at this node
    pub fn new(word: bool) -> Self {
        Node {
            children: Children::None,
            word,
        }
    }

    /// True if a word ends at this node.
    #[inline]
    pub fn is_word(&self) -> bool {
        self.word
    }

    /// Returns the id that `letter`'s edge leads to, or None if no such edge exists.
    #[inline]
    pub fn get(&self, letter: C) -> Option<NodeId> {
        self.children.find(letter)
    }

    /// Returns an iterator over the edges of this node, in letter order.
    #[inline]
    pub fn edges(&self) -> Edges<'_, C> {
        Edges {
            children: &self.children,
            index: 0,
        }
    }

    /// Returns the number of outgoing edges.
    #[inline]
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    pub(crate) fn insert(&mut self, letter: C, child: NodeId) {
        self.children.push(letter, child);
    }

    pub(crate) fn children_ref(&self) -> &Children<C> {
        &self.children
    }
}

/// A borrowed cursor on a node of a [`Dawg`].
///
/// This is the handle used to walk the graph: `root.get('C')?.get('A')?`.
pub struct NodeRef<'g, C: DawgChar> {
    graph: &'g Dawg<C>,
    id: NodeId,
}

impl<'g, C: DawgChar> NodeRef<'g, C> {
    pub(crate) fn new(graph: &'g Dawg<C>, id: NodeId) -> Self {
        NodeRef { graph, id }
    }

    /// The arena id of this node.
    #[inline]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The underlying node.
    #[inline]
    pub fn node(&self) -> &'g Node<C> {
        self.graph.node(self.id)
    }

    /// Follows the edge labelled `letter`.
    #[inline]
    pub fn get(&self, letter: C) -> Option<NodeRef<'g, C>> {
        self.node().get(letter).map(|id| NodeRef::new(self.graph, id))
    }

    /// True if this node corresponds to the end of a word.
    #[inline]
    pub fn is_word(&self) -> bool {
        self.node().is_word()
    }

    /// Returns true if following `suffix` from here ends on a word.
    pub fn has_suffix(&self, suffix: impl IntoIterator<Item = C>) -> bool {
        suffix
            .into_iter()
            .try_fold(*self, |n, ch| n.get(ch))
            .is_some_and(|n| n.is_word())
    }

    /// Returns the outgoing edges as `(letter, child)` pairs, in letter order.
    pub fn children(&self) -> impl ExactSizeIterator<Item = (C, NodeRef<'g, C>)> + 'g {
        let graph = self.graph;
        self.node()
            .edges()
            .map(move |(ch, id)| (ch, NodeRef::new(graph, id)))
    }

    /// Returns the number of outgoing edges.
    #[inline]
    pub fn child_count(&self) -> usize {
        self.node().child_count()
    }
}

impl<C: DawgChar> Clone for NodeRef<'_, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C: DawgChar> Copy for NodeRef<'_, C> {}

// Two cursors are the same node only if they point into the same graph.
impl<C: DawgChar> PartialEq for NodeRef<'_, C> {
    fn eq(&self, rhs: &Self) -> bool {
        std::ptr::eq(self.graph, rhs.graph) && self.id == rhs.id
    }
}

impl<C: DawgChar> Eq for NodeRef<'_, C> {}

impl<C: DawgChar> fmt::Debug for NodeRef<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("word", &self.is_word())
            .field("children", &self.child_count())
            .finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn id(i: usize) -> NodeId {
        NodeId::from_index(i)
    }

    #[test]
    fn no_children() {
        let n = Node::<char>::new(false);
        assert_eq!(n.edges().next(), None);
        assert_eq!(n.child_count(), 0);
        assert_eq!(n.get('a'), None);
    }

    #[test]
    fn one_child() {
        let mut n = Node::new(false);
        n.insert('a', id(0));
        let mut edges = n.edges();
        assert_eq!(edges.next(), Some(('a', id(0))));
        assert_eq!(edges.next(), None);
        assert_eq!(n.child_count(), 1);
        assert_eq!(n.get('a'), Some(id(0)));
        assert_eq!(n.get('b'), None);
    }

    #[test]
    fn two_children() {
        let mut n = Node::new(false);
        n.insert('a', id(0));
        n.insert('b', id(1));
        let edges: Vec<_> = n.edges().collect();
        assert_eq!(edges, vec![('a', id(0)), ('b', id(1))]);
        assert_eq!(n.get('b'), Some(id(1)));
    }

    #[test]
    fn three_children_switch_to_vec() {
        let mut n = Node::new(false);
        n.insert('a', id(0));
        n.insert('b', id(1));
        n.insert('c', id(2));
        assert!(matches!(n.children_ref(), Children::Many(_)));
        assert_eq!(n.edges().len(), 3);
        assert_eq!(n.get('c'), Some(id(2)));
        assert_eq!(n.get('d'), None);
    }

    #[test]
    fn a_thousand_children() {
        let mut n = Node::new(false);
        let letters = (0..).filter_map(std::char::from_u32).take(1000);
        for (i, ch) in letters.clone().enumerate() {
            n.insert(ch, id(i));
        }
        for (i, ch) in letters.enumerate() {
            assert_eq!(n.get(ch), Some(id(i)));
        }
        assert_eq!(n.child_count(), 1000);
        assert_eq!(n.edges().len(), 1000);
    }

    #[test]
    fn equal_structure_hashes_equal() {
        use std::hash::BuildHasher;
        let state = hashbrown::DefaultHashBuilder::default();

        let mut a = Node::new(true);
        a.insert('S', id(3));
        let mut b = Node::new(true);
        b.insert('S', id(3));
        assert_eq!(a, b);
        assert_eq!(state.hash_one(&a), state.hash_one(&b));

        let mut c = Node::new(false);
        c.insert('S', id(3));
        assert_ne!(a, c);
    }

    #[test]
    fn compactness() {
        assert!(Children::<char>::None.is_compact());
        assert!(!Children::Many(vec![('a', id(0))]).is_compact());
        assert!(Children::Many(vec![('a', id(0)), ('b', id(1)), ('c', id(2))]).is_compact());
    }
}
