//! Interactive tools that turn node taps into graph mutations.
//!
//! - [`EdgeTool`]: two-phase parent/child selection that commits a new edge
//! - [`detach_parents`]: removes the non-persisted support above a node
//! - [`highlight_node`]: records and announces the highlighted node

mod detach;
mod edge;
mod select;

pub use detach::detach_parents;
pub use edge::{EdgeOutcome, EdgeState, EdgeTool};
pub use select::highlight_node;

use crate::graph::NodeId;
use serde::{Deserialize, Serialize};

/// The tool currently bound to node taps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Tool {
    /// Taps highlight a node
    #[default]
    SelectionTool,
    /// Taps pick a parent, then a child
    EdgeTool,
    /// Taps detach a node from its non-persisted parents
    DetachTool,
}

impl std::fmt::Display for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tool::SelectionTool => write!(f, "selectionTool"),
            Tool::EdgeTool => write!(f, "edgeTool"),
            Tool::DetachTool => write!(f, "detachTool"),
        }
    }
}

/// Why a user operation was refused. The graph is left exactly as it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rejection {
    /// The child selected is the candidate parent itself
    SelfLoop,
    /// The candidate parent is persisted and cannot gain support here
    PersistedParent,
    /// The edge already exists
    DuplicateEdge,
    /// An edge in the opposite direction exists and flipping is disabled
    ReverseEdgeExists,
    /// A persisted node cannot be retyped
    PersistedNode,
    /// A type change was requested with no node highlighted
    NothingHighlighted,
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rejection::SelfLoop => write!(f, "A card can't support itself."),
            Rejection::PersistedParent => {
                write!(f, "Can't use the sketch tool to add support to this node.")
            }
            Rejection::DuplicateEdge => write!(f, "Those cards are already connected."),
            Rejection::ReverseEdgeExists => {
                write!(f, "Those cards are already connected the other way.")
            }
            Rejection::PersistedNode => write!(f, "Can't change the type of a published card."),
            Rejection::NothingHighlighted => write!(f, "Select a card first."),
        }
    }
}

/// Effect of a single node tap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TapOutcome {
    /// The edge tool advanced, committed, or refused
    Edge(EdgeOutcome),
    /// The node was detached from these parents
    Detached(Vec<NodeId>),
    /// The node became the highlighted node
    Highlighted(NodeId),
}
