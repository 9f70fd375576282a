/// Minimal graph builder consuming sorted word lists.
pub mod builder;
/// Owned graph: lookups and word enumeration.
pub mod graph;
/// Node, edge-list and cursor types.
pub mod node;
/// Binary persistence with structural validation.
pub mod persist;
pub mod trie;

pub use builder::{
    build_dawg, build_dawg_from_file, read_word_list, Builder, BuilderError, IntoWord,
};
pub use graph::Dawg;
pub use node::{DawgChar, Node, NodeId, NodeRef};
pub use persist::PersistError;
pub use trie::{build_trie, cross_check, CrossCheckError, Trie};
