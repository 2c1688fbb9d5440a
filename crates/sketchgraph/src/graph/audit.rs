//! Structural checks over a settled graph.
//!
//! None of these should ever fire after the engine has finished a pass; they
//! exist so callers and tests can assert that.

use super::sketch_graph::SketchGraph;
use super::types::{NodeId, NodeType};
use serde::Serialize;

/// A broken structural invariant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    /// The edge is recorded on only one endpoint
    AsymmetricEdge {
        /// Parent endpoint
        parent: NodeId,
        /// Child endpoint
        child: NodeId,
    },
    /// A node lists itself as parent or child
    SelfLoop {
        /// Offending node
        node: NodeId,
    },
    /// An interpretation supports more than one child
    OverfullInterpretation {
        /// Offending node
        node: NodeId,
        /// Number of children it holds
        children: usize,
    },
}

/// Collect every invariant violation in the graph.
pub fn audit(graph: &SketchGraph) -> Vec<Violation> {
    let mut violations = Vec::new();

    for node in graph.nodes() {
        let id = node.id();

        if node.has_child(id) || node.has_parent(id) {
            violations.push(Violation::SelfLoop { node: id.clone() });
        }

        for child in node.children() {
            let mirrored = graph
                .node(child)
                .map(|c| c.has_parent(id))
                .unwrap_or(false);
            if !mirrored {
                violations.push(Violation::AsymmetricEdge {
                    parent: id.clone(),
                    child: child.clone(),
                });
            }
        }

        for parent in node.parents() {
            let mirrored = graph
                .node(parent)
                .map(|p| p.has_child(id))
                .unwrap_or(false);
            if !mirrored {
                violations.push(Violation::AsymmetricEdge {
                    parent: parent.clone(),
                    child: id.clone(),
                });
            }
        }

        if node.node_type() == NodeType::Interpretation && node.children().len() > 1 {
            violations.push(Violation::OverfullInterpretation {
                node: id.clone(),
                children: node.children().len(),
            });
        }
    }

    violations
}
