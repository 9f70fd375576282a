//! Binary save/load of a built graph.
//!
//! Layout: a bincode header `{ magic: b"LXDG", version }` followed by the node
//! arena. Loading re-checks every structural property the builder guarantees,
//! so a corrupt or hand-crafted file can never yield a graph with cycles or
//! duplicate nodes.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use hashbrown::HashSet;
use log::debug;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::graph::Dawg;
use super::node::{DawgChar, Node, NodeId};

const MAGIC: [u8; 4] = *b"LXDG";
const VERSION: u8 = 1;

/// Errors from saving or loading a graph.
#[derive(Debug, Error)]
pub enum PersistError {
    /// Underlying file error.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The graph could not be encoded.
    #[error("serialization error: {0}")]
    Encode(bincode::Error),

    /// The input is not a valid encoding.
    #[error("deserialization error: {0}")]
    Decode(bincode::Error),

    /// The input does not start with the graph magic bytes.
    #[error("invalid magic bytes (expected LXDG)")]
    BadMagic,

    /// The input was written by an incompatible version.
    #[error("unsupported version: {0}")]
    UnsupportedVersion(u8),

    /// The decoded graph violates a structural invariant. The graph has to be
    /// rebuilt from its word list.
    #[error("malformed graph: {reason}")]
    MalformedGraph {
        /// What was wrong.
        reason: String,
    },
}

fn malformed(reason: impl Into<String>) -> PersistError {
    PersistError::MalformedGraph {
        reason: reason.into(),
    }
}

#[derive(Serialize, Deserialize)]
struct Header {
    magic: [u8; 4],
    version: u8,
}

#[derive(Serialize)]
struct GraphImageRef<'a, C> {
    root: NodeId,
    word_count: u64,
    nodes: &'a [Node<C>],
}

#[derive(Deserialize)]
struct GraphImage<C> {
    root: NodeId,
    word_count: u64,
    nodes: Vec<Node<C>>,
}

impl<C: DawgChar> GraphImage<C> {
    fn validate(&self) -> Result<(), PersistError> {
        if self.nodes.is_empty() {
            return Err(malformed("graph has no nodes"));
        }
        if self.root.index() >= self.nodes.len() {
            return Err(malformed(format!(
                "root {} out of range ({} nodes)",
                self.root,
                self.nodes.len()
            )));
        }
        let mut seen = HashSet::with_capacity(self.nodes.len());
        for (i, node) in self.nodes.iter().enumerate() {
            if !node.children_ref().is_compact() {
                return Err(malformed(format!("node #{i} has a non-canonical edge list")));
            }
            let mut previous: Option<C> = None;
            for (ch, child) in node.edges() {
                // Children precede parents, which rules out cycles.
                if child.index() >= i {
                    return Err(malformed(format!("node #{i} has a forward edge to {child}")));
                }
                if previous.is_some_and(|p| p >= ch) {
                    return Err(malformed(format!("node #{i} has unsorted edges")));
                }
                previous = Some(ch);
            }
            if node.child_count() == 0 && !node.is_word() && i != self.root.index() {
                return Err(malformed(format!("node #{i} is a dead end")));
            }
            if !seen.insert(node) {
                return Err(malformed(format!("node #{i} duplicates an earlier node")));
            }
        }
        Ok(())
    }
}

impl<C: DawgChar + Serialize + DeserializeOwned> Dawg<C> {
    /// Writes the graph to `writer`.
    pub fn save(&self, mut writer: impl Write) -> Result<(), PersistError> {
        let header = Header {
            magic: MAGIC,
            version: VERSION,
        };
        let image = GraphImageRef {
            root: self.root().id(),
            word_count: self.word_count() as u64,
            nodes: self.nodes(),
        };
        bincode::serialize_into(&mut writer, &header).map_err(PersistError::Encode)?;
        bincode::serialize_into(&mut writer, &image).map_err(PersistError::Encode)?;
        writer.flush()?;
        Ok(())
    }

    /// Reads and validates a graph written by [`save`](Dawg::save).
    pub fn load(mut reader: impl Read) -> Result<Self, PersistError> {
        let header: Header =
            bincode::deserialize_from(&mut reader).map_err(PersistError::Decode)?;
        if header.magic != MAGIC {
            return Err(PersistError::BadMagic);
        }
        if header.version != VERSION {
            return Err(PersistError::UnsupportedVersion(header.version));
        }
        let image: GraphImage<C> =
            bincode::deserialize_from(&mut reader).map_err(PersistError::Decode)?;
        image.validate()?;
        let word_count = usize::try_from(image.word_count)
            .map_err(|_| malformed("word count does not fit in memory"))?;
        debug!(
            "loaded lexicon graph: {} words, {} nodes",
            word_count,
            image.nodes.len()
        );
        Ok(Dawg::from_parts(image.nodes, image.root, word_count))
    }

    /// Saves the graph to a file, replacing it if it exists.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), PersistError> {
        let file = File::create(path.as_ref())?;
        self.save(BufWriter::new(file))
    }

    /// Loads a graph saved by [`save_to_file`](Dawg::save_to_file).
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, PersistError> {
        let file = File::open(path.as_ref())?;
        Self::load(BufReader::new(file))
    }
}

#[cfg(test)]
mod test {
    use super::super::builder::build_dawg;
    use super::*;

    const WORDS: [&str; 7] = ["BAKE", "BAKED", "BAKER", "CAKE", "CAKED", "FAKE", "LAKE"];

    fn encode<C: Serialize>(root: usize, nodes: &[Node<C>]) -> Vec<u8> {
        let mut buf = Vec::new();
        bincode::serialize_into(
            &mut buf,
            &Header {
                magic: MAGIC,
                version: VERSION,
            },
        )
        .unwrap();
        bincode::serialize_into(
            &mut buf,
            &GraphImageRef {
                root: NodeId::from_index(root),
                word_count: 1,
                nodes,
            },
        )
        .unwrap();
        buf
    }

    fn reason(err: PersistError) -> String {
        match err {
            PersistError::MalformedGraph { reason } => reason,
            other => panic!("expected a malformed graph, got {other:?}"),
        }
    }

    #[test]
    fn save_and_load_preserve_structure() {
        let dawg = build_dawg(WORDS).unwrap();
        let mut buf = Vec::new();
        dawg.save(&mut buf).unwrap();
        let loaded = Dawg::<char>::load(buf.as_slice()).unwrap();
        assert_eq!(loaded.nodes(), dawg.nodes());
        assert_eq!(loaded.root().id(), dawg.root().id());
        assert_eq!(loaded.word_count(), WORDS.len());
        assert!(loaded.word_strings().eq(WORDS.iter().map(|w| w.to_string())));
    }

    #[test]
    fn file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("en.dawg");
        let dawg = build_dawg(WORDS).unwrap();
        dawg.save_to_file(&path).unwrap();
        let loaded = Dawg::<char>::load_from_file(&path).unwrap();
        assert!(loaded.contains("CAKED"));
        assert!(!loaded.contains("CAKES"));
    }

    #[test]
    fn wrong_magic_is_rejected() {
        let mut buf = Vec::new();
        build_dawg(WORDS).unwrap().save(&mut buf).unwrap();
        buf[0] = b'X';
        assert!(matches!(
            Dawg::<char>::load(buf.as_slice()),
            Err(PersistError::BadMagic)
        ));
    }

    #[test]
    fn wrong_version_is_rejected() {
        let mut buf = Vec::new();
        build_dawg(WORDS).unwrap().save(&mut buf).unwrap();
        buf[4] = 9;
        assert!(matches!(
            Dawg::<char>::load(buf.as_slice()),
            Err(PersistError::UnsupportedVersion(9))
        ));
    }

    #[test]
    fn truncated_input_is_a_decode_error() {
        let mut buf = Vec::new();
        build_dawg(WORDS).unwrap().save(&mut buf).unwrap();
        buf.truncate(buf.len() / 2);
        assert!(matches!(
            Dawg::<char>::load(buf.as_slice()),
            Err(PersistError::Decode(_))
        ));
    }

    #[test]
    fn cycle_is_rejected() {
        let mut leaf = Node::new(true);
        leaf.insert('A', NodeId::from_index(1));
        let mut root = Node::new(false);
        root.insert('A', NodeId::from_index(0));
        let buf = encode(1, &[leaf, root]);
        let err = Dawg::<char>::load(buf.as_slice()).unwrap_err();
        assert!(reason(err).contains("forward edge"));
    }

    #[test]
    fn root_out_of_range_is_rejected() {
        let buf = encode(5, &[Node::<char>::new(true)]);
        let err = Dawg::<char>::load(buf.as_slice()).unwrap_err();
        assert!(reason(err).contains("out of range"));
    }

    #[test]
    fn duplicate_nodes_are_rejected() {
        let mut root = Node::new(false);
        root.insert('A', NodeId::from_index(0));
        root.insert('B', NodeId::from_index(1));
        let buf = encode(2, &[Node::<char>::new(true), Node::new(true), root]);
        let err = Dawg::<char>::load(buf.as_slice()).unwrap_err();
        assert!(reason(err).contains("duplicates"));
    }

    #[test]
    fn dead_end_is_rejected() {
        let mut root = Node::new(false);
        root.insert('A', NodeId::from_index(0));
        let buf = encode(1, &[Node::<char>::new(false), root]);
        let err = Dawg::<char>::load(buf.as_slice()).unwrap_err();
        assert!(reason(err).contains("dead end"));
    }

    #[test]
    fn empty_arena_is_rejected() {
        let buf = encode::<char>(0, &[]);
        let err = Dawg::<char>::load(buf.as_slice()).unwrap_err();
        assert!(reason(err).contains("no nodes"));
    }
}
