//! Core graph types and operations.
//!
//! This module defines the fundamental building blocks:
//! - [`Node`]: A typed argument card with parent/child relations
//! - [`NodeBody`]: The opaque content a node carries
//! - [`SketchGraph`]: The arena that keeps both sides of every edge in sync

mod body;
mod sketch_graph;
mod types;
pub mod audit;

pub use audit::{audit, Violation};
pub use body::{BodyValue, NodeBody, TEXT_KEY, TITLE_KEY};
pub use sketch_graph::SketchGraph;
pub use types::{Node, NodeId, NodeType};
