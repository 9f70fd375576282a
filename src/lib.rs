//! # lexdawg
//!
//! Compresses a word list into a minimal
//! [DAWG](https://en.wikipedia.org/wiki/Deterministic_acyclic_finite_state_automaton)
//! (Directed Acyclic Word Graph) and uses it to enumerate the words a rack of
//! tiles can form along one row of a word-game board.
//!
//! The graph is built in a single pass over a sorted word list, freezing and
//! deduplicating suffixes as soon as no later word can change them
//! ([Daciuk et al. (2000)](https://arxiv.org/abs/cs/0007009v1)). Nodes live in
//! one arena and refer to each other by index, so a built [`Dawg`](dawg::Dawg)
//! is immutable, `Send + Sync` and cheap to persist.
//!
//! ## Quick Start
//!
//! ```
//! use lexdawg::dawg::build_dawg;
//!
//! let dawg = build_dawg(["AT", "CATS", "HAT", "HATS"]).unwrap();
//! assert!(dawg.contains("CATS"));
//! assert!(!dawg.contains("CAT"));
//! assert!(!dawg.contains("DOG"));
//! ```
//!
//! ## Move Generation
//!
//! ```
//! use lexdawg::dawg::build_dawg;
//! use lexdawg::game::{Language, MoveGenerator, Rack, Row};
//!
//! let dawg = build_dawg(["HE", "HES", "HET", "THE"]).unwrap();
//! let scores = Language::English.point_values();
//! let row: Row = "H......".parse().unwrap();
//! let rack: Rack = "ESTO".parse().unwrap();
//!
//! let plays = MoveGenerator::new(&dawg, &scores).generate(row.square(0), &rack);
//! assert_eq!(plays.get("HES"), Some(6));
//! assert_eq!(plays.get("THE"), Some(6));
//! assert!(!plays.contains("HO"));
//! ```

#![warn(missing_docs)]

/// Lexicon graph: node types, builder, lookups and persistence.
pub mod dawg;
/// Single-row move generation: rows, racks, scoring and configuration.
pub mod game;
