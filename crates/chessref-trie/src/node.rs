use serde::{Deserialize, Serialize};

pub type NodeId = u64;

/// Id of the synthetic root every tree starts with.
pub const ROOT_ID: NodeId = 0;

/// Label carried by the root in place of a real move.
pub const ROOT_MOVE: &str = "root";

/// One edge of the tree, stored on its child end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrieNode {
    pub id: NodeId,
    /// Move played to reach this node from `parent_id`.
    #[serde(rename = "move")]
    pub mv: String,
    /// `None` only for the root.
    pub parent_id: Option<NodeId>,
    /// Inserted sequences whose prefix passed through this edge. On the root,
    /// the number of inserted sequences.
    pub move_count: u64,
    /// Distance from the root.
    pub layer: usize,
}

impl TrieNode {
    pub(crate) fn root() -> Self {
        Self {
            id: ROOT_ID,
            mv: ROOT_MOVE.to_string(),
            parent_id: None,
            move_count: 0,
            layer: 0,
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}
