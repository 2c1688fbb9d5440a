//! # sketchgraph
//!
//! Type-propagation and edge-mutation engine for sketching argument graphs.
//!
//! An argument graph is a directed graph of claims connected by support
//! relations. Every node plays one of three roles (`source`,
//! `interpretation`, `assertion`) and the roles must stay structurally
//! consistent while the user adds, removes, flips and retypes edges by hand.
//!
//! ## Architecture
//!
//! ```text
//! Session controller (active tool, highlighted node)
//!     ↓
//! Tools (edge state machine, detach, select)
//!     ↓
//! Consistency engine (propagate_type_change, find_legal_type)
//!     ↓
//! Graph arena (nodes, parent/child relations)
//! ```
//!
//! Every mutation is announced on a synchronous [`EventBus`]; renderers
//! subscribe to it and never mutate the graph themselves.
//!
//! ## Example
//!
//! ```
//! use sketchgraph::{Intent, SketchSession, Tool, Topic};
//!
//! # fn example() -> sketchgraph::Result<()> {
//! let mut session = SketchSession::new();
//! let edges = session.bus_mut().record(&[Topic::EdgeAdded]);
//!
//! let a = session.add_node();
//! let b = session.add_node();
//! session.set_active_tool(Tool::EdgeTool);
//! session.handle_intent(Intent::NodeTapped(a))?;
//! session.handle_intent(Intent::NodeTapped(b))?;
//!
//! assert_eq!(edges.len(), 1);
//! assert!(session.audit().is_empty());
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod export;
pub mod graph;
pub mod session;
pub mod snapshot;
pub mod tools;

// Re-export main types
pub use config::SketchConfig;
pub use engine::{find_legal_type, propagate_type_change, ConsistencyEngine, PropagationStats};
pub use error::{Result, SketchError};
pub use events::{EventBus, EventRecorder, Intent, Notice, SketchEvent, SubscriptionId, Topic};
pub use graph::{audit, BodyValue, Node, NodeBody, NodeId, NodeType, SketchGraph, Violation};
pub use session::{RetypeOutcome, SketchSession};
pub use snapshot::{GraphSnapshot, SnapshotEdge, SnapshotNode};
pub use tools::{
    detach_parents, highlight_node, EdgeOutcome, EdgeState, EdgeTool, Rejection, TapOutcome, Tool,
};
