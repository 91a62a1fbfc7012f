use thiserror::Error;

use crate::node::NodeId;

/// Result type local to chessref-trie.
pub type Result<T> = std::result::Result<T, TrieError>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TrieError {
    #[error("no node with id {0}")]
    UnknownNode(NodeId),

    #[error("move tokens must not be empty")]
    EmptyMove,
}
