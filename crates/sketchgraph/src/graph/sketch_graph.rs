//! The in-memory graph owned by one editing session.

use super::body::NodeBody;
use super::types::{Node, NodeId, NodeType};
use crate::error::{Result, SketchError};
use log::{debug, trace};
use std::collections::HashMap;

/// Arena of argument nodes and the parent/child edges between them.
///
/// Every edge is recorded on both endpoints; `add_child` and `remove_child`
/// are the only ways to change relations, so the two sides never disagree.
/// Nodes are never deleted, only orphaned.
#[derive(Debug, Clone)]
pub struct SketchGraph {
    nodes: HashMap<NodeId, Node>,
    // Insertion order, for deterministic iteration and export
    order: Vec<NodeId>,
    sketch_prefix: String,
    sketch_counter: u64,
}

impl Default for SketchGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SketchGraph {
    /// Create an empty graph using the `"sketch-"` id prefix.
    pub fn new() -> Self {
        Self::with_prefix("sketch-")
    }

    /// Create an empty graph whose sketch nodes use `prefix` for their ids.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            nodes: HashMap::new(),
            order: Vec::new(),
            sketch_prefix: prefix.into(),
            sketch_counter: 0,
        }
    }

    /// Add an unpersisted, untyped node and return its client-side id.
    pub fn add_sketch_node(&mut self) -> NodeId {
        loop {
            let id = NodeId::sketch(&self.sketch_prefix, self.sketch_counter);
            self.sketch_counter += 1;
            // Loaded data may already use a sketch-looking id
            if !self.nodes.contains_key(&id) {
                debug!("Adding sketch node {id}");
                self.order.push(id.clone());
                self.nodes.insert(id.clone(), Node::sketch(id.clone()));
                return id;
            }
        }
    }

    /// Insert a fully built node, typically one loaded from backing data.
    ///
    /// The node must not carry relations yet; attach them with [`Self::add_child`].
    ///
    /// # Errors
    ///
    /// Returns [`SketchError::DuplicateNode`] if the id is already present.
    pub fn insert_node(&mut self, node: Node) -> Result<NodeId> {
        let id = node.id().clone();
        if self.nodes.contains_key(&id) {
            return Err(SketchError::DuplicateNode {
                node_id: id.to_string(),
            });
        }
        debug!("Inserting node {id} (persisted={})", node.is_persisted());
        self.order.push(id.clone());
        self.nodes.insert(id.clone(), node);
        Ok(id)
    }

    /// Get a node by id.
    ///
    /// # Errors
    ///
    /// Returns [`SketchError::NodeNotFound`] if the node doesn't exist.
    pub fn node(&self, id: &NodeId) -> Result<&Node> {
        self.nodes.get(id).ok_or_else(|| SketchError::node_not_found(id))
    }

    pub(crate) fn node_mut(&mut self, id: &NodeId) -> Result<&mut Node> {
        self.nodes
            .get_mut(id)
            .ok_or_else(|| SketchError::node_not_found(id))
    }

    /// Mutable access to a node's body. Types and relations stay read-only.
    pub fn body_mut(&mut self, id: &NodeId) -> Result<&mut NodeBody> {
        Ok(&mut self.node_mut(id)?.body)
    }

    /// Check whether a node exists.
    pub fn contains(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Iterate over nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.order.iter().filter_map(move |id| self.nodes.get(id))
    }

    /// All edges as `(parent, child)` pairs, grouped by parent in insertion order.
    pub fn edges(&self) -> Vec<(NodeId, NodeId)> {
        self.nodes()
            .flat_map(|node| {
                node.children()
                    .iter()
                    .map(move |child| (node.id().clone(), child.clone()))
            })
            .collect()
    }

    /// Total number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Total number of edges.
    pub fn edge_count(&self) -> usize {
        self.nodes.values().map(|n| n.children().len()).sum()
    }

    /// Check whether the edge `parent -> child` exists.
    pub fn has_edge(&self, parent: &NodeId, child: &NodeId) -> bool {
        self.nodes
            .get(parent)
            .map(|p| p.has_child(child))
            .unwrap_or(false)
    }

    /// Append `child` to `parent`'s children and record the reverse relation.
    ///
    /// Returns `false` without changing anything for a self-loop or an edge
    /// that already exists.
    ///
    /// # Errors
    ///
    /// Returns [`SketchError::NodeNotFound`] if either endpoint is missing.
    pub fn add_child(&mut self, parent: &NodeId, child: &NodeId) -> Result<bool> {
        self.node(child)?;
        if parent == child {
            trace!("Refusing self-loop on {parent}");
            return Ok(false);
        }
        if self.node(parent)?.has_child(child) {
            trace!("Edge {parent} -> {child} already exists");
            return Ok(false);
        }

        debug!("Adding edge {parent} -> {child}");
        self.node_mut(parent)?.push_child(child.clone());
        self.node_mut(child)?.push_parent(parent.clone());
        Ok(true)
    }

    /// Remove the edge `parent -> child` from both endpoints.
    ///
    /// Returns whether an edge existed.
    ///
    /// # Errors
    ///
    /// Returns [`SketchError::NodeNotFound`] if either endpoint is missing.
    pub fn remove_child(&mut self, parent: &NodeId, child: &NodeId) -> Result<bool> {
        self.node(child)?;
        let removed = self.node_mut(parent)?.drop_child(child);
        let removed_parent = self.node_mut(child)?.drop_parent(parent);
        if removed || removed_parent {
            debug!("Removed edge {parent} -> {child}");
        }
        Ok(removed || removed_parent)
    }

    pub(crate) fn set_type(&mut self, id: &NodeId, node_type: NodeType) -> Result<()> {
        let node = self.node_mut(id)?;
        debug!("Node {id}: {} -> {node_type}", node.node_type());
        node.set_type(node_type);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_sketch_ids_are_sequential() {
        let mut graph = SketchGraph::new();
        assert_eq!(graph.add_sketch_node().as_str(), "sketch-0");
        assert_eq!(graph.add_sketch_node().as_str(), "sketch-1");
        assert_eq!(graph.node_count(), 2);
    }

    #[test]
    fn test_sketch_ids_skip_taken_ids() {
        let mut graph = SketchGraph::new();
        let taken = Node::persisted(
            NodeId::from("sketch-0"),
            Uuid::new_v4(),
            NodeType::Assertion,
            NodeBody::new(),
        );
        graph.insert_node(taken).unwrap();
        assert_eq!(graph.add_sketch_node().as_str(), "sketch-1");
    }

    #[test]
    fn test_duplicate_insert_rejected() {
        let mut graph = SketchGraph::new();
        let node = Node::sketch(NodeId::from("x"));
        graph.insert_node(node.clone()).unwrap();
        assert!(matches!(
            graph.insert_node(node),
            Err(SketchError::DuplicateNode { .. })
        ));
    }

    #[test]
    fn test_edges_listed_per_parent() {
        let mut graph = SketchGraph::new();
        let a = graph.add_sketch_node();
        let b = graph.add_sketch_node();
        let c = graph.add_sketch_node();
        graph.add_child(&a, &b).unwrap();
        graph.add_child(&a, &c).unwrap();
        graph.add_child(&b, &c).unwrap();

        assert_eq!(
            graph.edges(),
            vec![(a.clone(), b.clone()), (a, c.clone()), (b, c)]
        );
        assert_eq!(graph.edge_count(), 3);
    }
}
