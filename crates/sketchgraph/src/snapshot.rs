//! Loading persisted argument data into a sketch graph.
//!
//! The backend hands over a flat list of nodes and `(parent, child)` edges
//! plus the id of the root being viewed. Every node loaded this way is
//! persisted, so the engine reads its type but never changes it.

use crate::error::{Result, SketchError};
use crate::graph::{Node, NodeBody, NodeId, NodeType, SketchGraph};
use log::info;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A persisted node as delivered by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotNode {
    /// Server-assigned id
    pub id: String,
    /// Version-independent id; generated when absent
    #[serde(default)]
    pub stable_id: Option<Uuid>,
    /// Committed role
    #[serde(rename = "type")]
    pub node_type: NodeType,
    /// Content payload
    #[serde(default)]
    pub body: NodeBody,
}

/// A persisted support relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotEdge {
    /// Supported node
    pub parent: String,
    /// Supporting node
    pub child: String,
}

/// A persisted graph rooted at the node being viewed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphSnapshot {
    /// Root node id, if the data is rooted
    #[serde(default)]
    pub root_id: Option<String>,
    /// All nodes
    #[serde(default)]
    pub nodes: Vec<SnapshotNode>,
    /// All edges, in child order per parent
    #[serde(default)]
    pub edges: Vec<SnapshotEdge>,
}

impl GraphSnapshot {
    /// Decode a snapshot from JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| SketchError::serialization("Failed to deserialize graph snapshot", Some(e)))
    }

    /// Insert every node and edge into `graph` as persisted data.
    ///
    /// Validation happens before anything is inserted, so a rejected snapshot
    /// leaves the graph untouched. Returns the root id, if any.
    ///
    /// # Errors
    ///
    /// - [`SketchError::DuplicateNode`] if a node id repeats or is already in the graph
    /// - [`SketchError::NodeNotFound`] if an edge or the root names an unknown node
    /// - [`SketchError::InvalidOperation`] for a self-referencing edge
    pub fn load_into(&self, graph: &mut SketchGraph) -> Result<Option<NodeId>> {
        self.validate(graph)?;

        for node in &self.nodes {
            graph.insert_node(Node::persisted(
                NodeId::new(node.id.clone()),
                node.stable_id.unwrap_or_else(Uuid::new_v4),
                node.node_type,
                node.body.clone(),
            ))?;
        }

        for edge in &self.edges {
            graph.add_child(
                &NodeId::new(edge.parent.clone()),
                &NodeId::new(edge.child.clone()),
            )?;
        }

        info!(
            "Loaded {} persisted nodes and {} edges",
            self.nodes.len(),
            self.edges.len()
        );
        Ok(self.root_id.clone().map(NodeId::new))
    }

    fn validate(&self, graph: &SketchGraph) -> Result<()> {
        let mut seen = std::collections::HashSet::new();
        for node in &self.nodes {
            if !seen.insert(node.id.as_str()) || graph.contains(&NodeId::from(node.id.as_str())) {
                return Err(SketchError::DuplicateNode {
                    node_id: node.id.clone(),
                });
            }
        }

        let known = |id: &str| seen.contains(id) || graph.contains(&NodeId::from(id));
        for edge in &self.edges {
            if edge.parent == edge.child {
                return Err(SketchError::InvalidOperation {
                    message: format!("Edge {} -> {} is a self-loop", edge.parent, edge.child),
                });
            }
            for end in [&edge.parent, &edge.child] {
                if !known(end.as_str()) {
                    return Err(SketchError::node_not_found(end));
                }
            }
        }

        if let Some(root) = &self.root_id {
            if !known(root.as_str()) {
                return Err(SketchError::node_not_found(root));
            }
        }

        Ok(())
    }
}
