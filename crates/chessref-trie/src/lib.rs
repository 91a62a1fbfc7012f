#![forbid(unsafe_code)]
//! chessref-trie: move trees for opening visualisations.
//!
//! A `MoveTree` is a prefix trie over move sequences. Each node is one
//! `(parent, move)` edge and counts how many inserted games passed through
//! it. Depth is bounded per insertion, so only the opening moves of each
//! game are kept. The flat node list (`nodes()`) is the export format:
//! consumers rebuild the tree from `parent_id` back-references.

pub mod error;
pub mod node;
pub mod tokenize;
pub mod tree;

pub use error::{Result, TrieError};
pub use node::{NodeId, TrieNode, ROOT_ID, ROOT_MOVE};
pub use tokenize::tokenize;
pub use tree::MoveTree;
