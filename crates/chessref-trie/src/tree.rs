//! The move tree itself.
//!
//! Nodes are appended in creation order and ids are handed out sequentially
//! from the root's id, so a node's id is also its index in `nodes`. Edge
//! lookup goes through a `(parent_id, move)` index instead of scanning the
//! node list; the resulting nodes, ids and counts are the same as with a scan.

use std::collections::HashMap;

use serde::{Serialize, Serializer};

use crate::error::{Result, TrieError};
use crate::node::{NodeId, TrieNode, ROOT_ID};

#[derive(Debug, Clone)]
pub struct MoveTree {
    nodes: Vec<TrieNode>,
    next_id: NodeId,
    edges: HashMap<(NodeId, String), NodeId>,
}

impl Default for MoveTree {
    fn default() -> Self {
        Self::new()
    }
}

impl MoveTree {
    pub fn new() -> Self {
        Self {
            nodes: vec![TrieNode::root()],
            next_id: ROOT_ID,
            edges: HashMap::new(),
        }
    }

    /// Build a tree from many sequences, inserted in iteration order.
    pub fn from_sequences<I>(sequences: I, max_depth: usize) -> Self
    where
        I: IntoIterator,
        I::Item: IntoIterator,
        <I::Item as IntoIterator>::Item: AsRef<str>,
    {
        let mut tree = Self::new();
        for seq in sequences {
            tree.insert(seq, max_depth);
        }
        tree
    }

    pub fn root(&self) -> &TrieNode {
        &self.nodes[0]
    }

    /// Every node, root first, in creation order.
    pub fn nodes(&self) -> &[TrieNode] {
        &self.nodes
    }

    pub fn into_nodes(self) -> Vec<TrieNode> {
        self.nodes
    }

    /// Number of nodes including the root.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when nothing but the root exists.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    pub fn get(&self, id: NodeId) -> Option<&TrieNode> {
        let idx = usize::try_from(id).ok()?;
        self.nodes.get(idx)
    }

    /// Follow the `(parent_id, mv)` edge, counting the visit. A missing edge
    /// is created with a count of one.
    pub fn get_or_create_edge(&mut self, parent_id: NodeId, mv: &str) -> Result<NodeId> {
        if mv.is_empty() {
            return Err(TrieError::EmptyMove);
        }
        let parent_layer = self
            .get(parent_id)
            .ok_or(TrieError::UnknownNode(parent_id))?
            .layer;

        if let Some(&id) = self.edges.get(&(parent_id, mv.to_string())) {
            let node = &mut self.nodes[id as usize];
            node.move_count += 1;
            return Ok(id);
        }

        self.next_id += 1;
        let id = self.next_id;
        debug_assert_eq!(id as usize, self.nodes.len());
        self.nodes.push(TrieNode {
            id,
            mv: mv.to_string(),
            parent_id: Some(parent_id),
            move_count: 1,
            layer: parent_layer + 1,
        });
        self.edges.insert((parent_id, mv.to_string()), id);
        tracing::trace!(id, parent_id, %mv, layer = parent_layer + 1, "new move node");
        Ok(id)
    }

    /// Walk the first `max_depth` moves of `moves` from the root. Shorter
    /// sequences stop early; an empty sequence only touches the root.
    /// Empty tokens end the walk.
    pub fn insert<I>(&mut self, moves: I, max_depth: usize)
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.nodes[0].move_count += 1;
        let mut current = ROOT_ID;
        for mv in moves.into_iter().take(max_depth) {
            match self.get_or_create_edge(current, mv.as_ref()) {
                Ok(next) => current = next,
                Err(e) => {
                    tracing::debug!(error = %e, parent_id = current, "move sequence cut short");
                    break;
                }
            }
        }
    }

    /// Direct children of `parent_id`, in creation order.
    pub fn children(&self, parent_id: NodeId) -> impl Iterator<Item = &TrieNode> {
        self.nodes
            .iter()
            .filter(move |n| n.parent_id == Some(parent_id))
    }

    /// The child of `parent_id` reached by `mv`, if that edge exists.
    pub fn child(&self, parent_id: NodeId, mv: &str) -> Option<&TrieNode> {
        let id = *self.edges.get(&(parent_id, mv.to_string()))?;
        self.get(id)
    }

    /// Moves leading from the root to `id` (empty for the root).
    pub fn path(&self, id: NodeId) -> Option<Vec<&str>> {
        let mut node = self.get(id)?;
        let mut moves = Vec::with_capacity(node.layer);
        while let Some(parent) = node.parent_id {
            moves.push(node.mv.as_str());
            node = self.get(parent)?;
        }
        moves.reverse();
        Some(moves)
    }

    /// Nodes visited at least `min_count` times, plus the root. Counts never
    /// grow going down the tree, so every kept node's parent is kept too.
    pub fn pruned(&self, min_count: u64) -> Vec<TrieNode> {
        self.nodes
            .iter()
            .filter(|n| n.is_root() || n.move_count >= min_count)
            .cloned()
            .collect()
    }

    /// Deepest layer present.
    pub fn depth(&self) -> usize {
        self.nodes.iter().map(|n| n.layer).max().unwrap_or(0)
    }
}

impl Serialize for MoveTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.nodes.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::ROOT_MOVE;

    fn non_root(tree: &MoveTree) -> Vec<&TrieNode> {
        tree.nodes().iter().filter(|n| !n.is_root()).collect()
    }

    #[test]
    fn depth_bound_stops_before_fifth_move() {
        let mut tree = MoveTree::new();
        tree.insert(&["e4", "e5", "Nf3", "Nc6", "Bb5"], 4);
        assert_eq!(non_root(&tree).len(), 4);
        assert!(tree.nodes().iter().all(|n| n.mv != "Bb5"));
        assert_eq!(tree.depth(), 4);
    }

    #[test]
    fn repeated_sequence_reuses_edges() {
        let mut tree = MoveTree::new();
        tree.insert(&["e4", "e5"], 2);
        tree.insert(&["e4", "e5"], 2);
        let nodes = non_root(&tree);
        assert_eq!(nodes.len(), 2);
        assert!(nodes.iter().all(|n| n.move_count == 2));
    }

    #[test]
    fn diverging_sequence_creates_one_new_edge() {
        let mut tree = MoveTree::new();
        tree.insert(&["e4", "e5"], 2);
        tree.insert(&["e4", "d4"], 2);
        let nodes = non_root(&tree);
        assert_eq!(nodes.len(), 3);

        let e4 = tree.child(ROOT_ID, "e4").unwrap();
        assert_eq!(e4.move_count, 2);
        let seconds: Vec<_> = tree.children(e4.id).collect();
        assert_eq!(seconds.len(), 2);
        assert!(seconds.iter().all(|n| n.move_count == 1 && n.layer == 2));
    }

    #[test]
    fn same_move_under_different_parents_is_distinct() {
        let tree = MoveTree::from_sequences(vec![vec!["Nf3", "d5"], vec!["d4", "Nf3"]], 2);
        let nf3: Vec<_> = tree.nodes().iter().filter(|n| n.mv == "Nf3").collect();
        assert_eq!(nf3.len(), 2);
        assert_ne!(nf3[0].parent_id, nf3[1].parent_id);
    }

    #[test]
    fn ids_follow_creation_order() {
        let tree = MoveTree::from_sequences(vec![vec!["c4", "e5"], vec!["Nf3"]], 3);
        let ids: Vec<_> = tree.nodes().iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);
        assert_eq!(tree.get(3).unwrap().mv, "Nf3");
        assert_eq!(tree.get(3).unwrap().parent_id, Some(ROOT_ID));
    }

    #[test]
    fn empty_sequence_only_touches_root() {
        let mut tree = MoveTree::new();
        tree.insert(Vec::<&str>::new(), 4);
        assert!(tree.is_empty());
        assert_eq!(tree.root().move_count, 1);
        assert_eq!(tree.root().mv, ROOT_MOVE);
    }

    #[test]
    fn empty_token_ends_the_walk() {
        let mut tree = MoveTree::new();
        tree.insert(&["d4", "", "c4"], 3);
        let moves: Vec<_> = non_root(&tree).iter().map(|n| n.mv.as_str()).collect();
        assert_eq!(moves, vec!["d4"]);
        assert_eq!(tree.root().move_count, 1);
        assert_eq!(tree.get_or_create_edge(1, ""), Err(TrieError::EmptyMove));
    }

    #[test]
    fn paths_and_pruning() {
        let tree = MoveTree::from_sequences(
            vec![vec!["d4", "Nf6", "c4"], vec!["d4", "Nf6", "Nf3"], vec!["e4"]],
            3,
        );
        let nf6 = tree.child(1, "Nf6").unwrap();
        assert_eq!(tree.path(nf6.id).unwrap(), vec!["d4", "Nf6"]);
        assert_eq!(tree.path(ROOT_ID).unwrap(), Vec::<&str>::new());
        assert!(tree.path(99).is_none());

        let kept = tree.pruned(2);
        let moves: Vec<_> = kept.iter().map(|n| n.mv.as_str()).collect();
        assert_eq!(moves, vec![ROOT_MOVE, "d4", "Nf6"]);
    }

    #[test]
    fn unknown_parent_and_empty_move_are_rejected() {
        let mut tree = MoveTree::new();
        assert_eq!(tree.get_or_create_edge(7, "e4"), Err(TrieError::UnknownNode(7)));
        assert_eq!(tree.get_or_create_edge(ROOT_ID, ""), Err(TrieError::EmptyMove));
    }

    #[test]
    fn serializes_as_node_array() {
        let tree = MoveTree::from_sequences(vec![vec!["e4"]], 1);
        let json = serde_json::to_value(&tree).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                {"id": 0, "move": "root", "parent_id": null, "move_count": 1, "layer": 0},
                {"id": 1, "move": "e4", "parent_id": 0, "move_count": 1, "layer": 1}
            ])
        );
    }
}
