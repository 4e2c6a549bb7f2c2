//! Arena-based DOM tree storage.
//!
//! All nodes live in a single `Vec` and reference each other by index.
//! This eliminates Rc/Arc overhead, keeps nodes cache-friendly, and makes
//! node identity a plain integer comparison.

use crate::error::{DomError, Result};
use crate::types::{DomNode, NodeId};

/// Arena allocator for DOM nodes.
#[derive(Debug)]
pub struct DomArena {
    /// All nodes stored sequentially.
    nodes: Vec<DomNode>,

    /// Root node ID (if set).
    root_id: Option<NodeId>,
}

impl DomArena {
    /// Create a new empty arena.
    pub fn new() -> Self {
        Self::with_capacity(1024)
    }

    /// Create arena with specific capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            root_id: None,
        }
    }

    /// Add a node to the arena, returns its ID.
    pub fn add_node(&mut self, mut node: DomNode) -> NodeId {
        let node_id = self.nodes.len() as NodeId;
        node.node_id = node_id;
        self.nodes.push(node);
        node_id
    }

    /// Get node by ID (immutable).
    pub fn get(&self, node_id: NodeId) -> Result<&DomNode> {
        self.nodes
            .get(node_id as usize)
            .ok_or(DomError::NodeNotFound(node_id))
    }

    /// Get node by ID (mutable).
    pub fn get_mut(&mut self, node_id: NodeId) -> Result<&mut DomNode> {
        self.nodes
            .get_mut(node_id as usize)
            .ok_or(DomError::NodeNotFound(node_id))
    }

    /// Set root node.
    pub fn set_root(&mut self, node_id: NodeId) -> Result<()> {
        // Verify node exists
        self.get(node_id)?;
        self.root_id = Some(node_id);
        Ok(())
    }

    /// Get root node ID.
    pub fn root_id(&self) -> Option<NodeId> {
        self.root_id
    }

    /// Get root node.
    pub fn root(&self) -> Result<&DomNode> {
        let root_id = self
            .root_id
            .ok_or_else(|| DomError::MalformedTree("no root node set".to_string()))?;
        self.get(root_id)
    }

    /// Total number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if arena is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterator over all nodes.
    pub fn iter(&self) -> impl Iterator<Item = &DomNode> {
        self.nodes.iter()
    }

    /// Iterator over all node IDs.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(|i| i as NodeId)
    }

    /// Get parent of a node.
    pub fn parent(&self, node_id: NodeId) -> Result<Option<&DomNode>> {
        let node = self.get(node_id)?;
        match node.parent_id {
            Some(parent_id) => Ok(Some(self.get(parent_id)?)),
            None => Ok(None),
        }
    }

    /// Traverse a subtree depth-first, in document order (iterative, no
    /// recursion). Shadow roots hang off `shadow_root_ids` and are not
    /// visited.
    pub fn traverse_df<F>(&self, start_id: NodeId, mut visit: F) -> Result<()>
    where
        F: FnMut(&DomNode) -> Result<()>,
    {
        let mut stack = vec![start_id];

        while let Some(node_id) = stack.pop() {
            let node = self.get(node_id)?;
            visit(node)?;

            // Push children in reverse order (so they're visited left-to-right)
            for &child_id in node.children_ids.iter().rev() {
                stack.push(child_id);
            }
        }

        Ok(())
    }

    /// Find nodes matching predicate.
    pub fn find<F>(&self, predicate: F) -> Vec<NodeId>
    where
        F: Fn(&DomNode) -> bool,
    {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(idx, node)| {
                if predicate(node) {
                    Some(idx as NodeId)
                } else {
                    None
                }
            })
            .collect()
    }

    /// Find first node matching predicate.
    pub fn find_one<F>(&self, predicate: F) -> Option<NodeId>
    where
        F: Fn(&DomNode) -> bool,
    {
        self.nodes.iter().enumerate().find_map(|(idx, node)| {
            if predicate(node) {
                Some(idx as NodeId)
            } else {
                None
            }
        })
    }
}

impl Default for DomArena {
    fn default() -> Self {
        Self::new()
    }
}
