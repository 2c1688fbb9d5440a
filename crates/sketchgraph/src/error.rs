//! Error types for sketch graph operations.
//!
//! Only programmer-facing failures (unknown ids, malformed input) are errors.
//! Rejected user gestures are reported as [`crate::tools::Rejection`] outcomes
//! instead, because they never leave the graph in a different state.

use thiserror::Error;

/// Result type alias for sketch graph operations.
pub type Result<T> = std::result::Result<T, SketchError>;

/// Error type for all sketch graph operations.
#[derive(Error, Debug)]
pub enum SketchError {
    /// Node not found in the graph
    #[error("Node not found: {node_id}")]
    NodeNotFound {
        /// ID of the missing node
        node_id: String,
    },

    /// A node with this id is already present
    #[error("Duplicate node: {node_id}")]
    DuplicateNode {
        /// ID that was inserted twice
        node_id: String,
    },

    /// Invalid operation (e.g., a self-referencing edge in loaded data)
    #[error("Invalid operation: {message}")]
    InvalidOperation {
        /// Description of what went wrong
        message: String,
    },

    /// Serialization/deserialization error
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error details
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl SketchError {
    /// Create a not-found error for the given id.
    pub fn node_not_found(node_id: impl ToString) -> Self {
        Self::NodeNotFound {
            node_id: node_id.to_string(),
        }
    }

    /// Create a serialization error from a message and optional source.
    pub fn serialization<E>(message: impl Into<String>, source: Option<E>) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Serialization {
            message: message.into(),
            source: source.map(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>),
        }
    }
}
