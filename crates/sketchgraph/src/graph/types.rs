//! Core graph types: node ids, semantic roles, and the node itself.

use super::body::NodeBody;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a node, unique within a session.
///
/// Sketch nodes get client-side ids (`"sketch-N"`), persisted nodes keep the
/// id assigned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Wrap an existing id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Build the client-side id of the `n`th sketch node.
    pub fn sketch(prefix: &str, n: u64) -> Self {
        Self(format!("{prefix}{n}"))
    }

    /// The raw id string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Semantic role of a node in the argument graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    /// No role assigned yet
    #[default]
    Unset,
    /// Cited material at the bottom of an argument
    Source,
    /// A reading of exactly one piece of support
    Interpretation,
    /// A claim supported by interpretations or further assertions
    Assertion,
}

impl NodeType {
    /// Whether a role has been assigned.
    pub fn is_set(self) -> bool {
        self != NodeType::Unset
    }
}

impl std::fmt::Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeType::Unset => write!(f, "unset"),
            NodeType::Source => write!(f, "source"),
            NodeType::Interpretation => write!(f, "interpretation"),
            NodeType::Assertion => write!(f, "assertion"),
        }
    }
}

/// A vertex of the argument graph.
///
/// Relations are stored on both endpoints. Only [`super::SketchGraph`] edits
/// them, which keeps every edge present on both sides.
#[derive(Debug, Clone)]
pub struct Node {
    id: NodeId,
    stable_id: Uuid,
    node_type: NodeType,
    persisted: bool,
    /// Content payload, ignored by the engine
    pub body: NodeBody,
    parents: Vec<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    /// Create an unpersisted sketch node with no role.
    pub fn sketch(id: NodeId) -> Self {
        Self {
            id,
            stable_id: Uuid::new_v4(),
            node_type: NodeType::Unset,
            persisted: false,
            body: NodeBody::new(),
            parents: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Create a node that is already committed to backing storage.
    pub fn persisted(id: NodeId, stable_id: Uuid, node_type: NodeType, body: NodeBody) -> Self {
        Self {
            id,
            stable_id,
            node_type,
            persisted: true,
            body,
            parents: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Session-unique id.
    pub fn id(&self) -> &NodeId {
        &self.id
    }

    /// Identifier that survives across versions of the node.
    pub fn stable_id(&self) -> Uuid {
        self.stable_id
    }

    /// Current role.
    pub fn node_type(&self) -> NodeType {
        self.node_type
    }

    /// Persisted nodes are fixed points of type propagation.
    pub fn is_persisted(&self) -> bool {
        self.persisted
    }

    /// Parents in the order they were attached.
    pub fn parents(&self) -> &[NodeId] {
        &self.parents
    }

    /// Children in attachment order. Cardinality repair relies on this order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// A leaf has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Whether `child` is one of this node's children.
    pub fn has_child(&self, child: &NodeId) -> bool {
        self.children.contains(child)
    }

    /// Whether `parent` is one of this node's parents.
    pub fn has_parent(&self, parent: &NodeId) -> bool {
        self.parents.contains(parent)
    }

    /// Whether assigning `node_type` is consistent with this node's position.
    ///
    /// - `unset` is never legal
    /// - `source` only on a leaf
    /// - `interpretation` with at most one child
    /// - `assertion` anywhere
    pub fn is_legal_type(&self, node_type: NodeType) -> bool {
        match node_type {
            NodeType::Unset => false,
            NodeType::Source => self.is_leaf(),
            NodeType::Interpretation => self.children.len() <= 1,
            NodeType::Assertion => true,
        }
    }

    pub(crate) fn set_type(&mut self, node_type: NodeType) {
        self.node_type = node_type;
    }

    pub(crate) fn push_child(&mut self, child: NodeId) {
        self.children.push(child);
    }

    pub(crate) fn push_parent(&mut self, parent: NodeId) {
        self.parents.push(parent);
    }

    pub(crate) fn drop_child(&mut self, child: &NodeId) -> bool {
        let before = self.children.len();
        self.children.retain(|c| c != child);
        self.children.len() != before
    }

    pub(crate) fn drop_parent(&mut self, parent: &NodeId) -> bool {
        let before = self.parents.len();
        self.parents.retain(|p| p != parent);
        self.parents.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sketch_id_format() {
        assert_eq!(NodeId::sketch("sketch-", 3).as_str(), "sketch-3");
    }

    #[test]
    fn test_node_type_serde_names() {
        let json = serde_json::to_string(&NodeType::Interpretation).unwrap();
        assert_eq!(json, "\"interpretation\"");
        let parsed: NodeType = serde_json::from_str("\"unset\"").unwrap();
        assert_eq!(parsed, NodeType::Unset);
    }

    #[test]
    fn test_legality_of_leaf() {
        let node = Node::sketch(NodeId::from("a"));
        assert!(!node.is_legal_type(NodeType::Unset));
        assert!(node.is_legal_type(NodeType::Source));
        assert!(node.is_legal_type(NodeType::Interpretation));
        assert!(node.is_legal_type(NodeType::Assertion));
    }

    #[test]
    fn test_legality_with_children() {
        let mut node = Node::sketch(NodeId::from("a"));
        node.push_child(NodeId::from("b"));
        assert!(!node.is_legal_type(NodeType::Source));
        assert!(node.is_legal_type(NodeType::Interpretation));

        node.push_child(NodeId::from("c"));
        assert!(!node.is_legal_type(NodeType::Interpretation));
        assert!(node.is_legal_type(NodeType::Assertion));
    }
}
