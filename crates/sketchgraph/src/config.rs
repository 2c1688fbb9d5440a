//! Session configuration.

use crate::error::{Result, SketchError};
use serde::{Deserialize, Serialize};

/// Configuration for a sketch editing session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SketchConfig {
    /// Prefix for client-side node ids ("sketch-" gives "sketch-0", "sketch-1", ...)
    pub sketch_id_prefix: String,

    /// Return the edge tool to `SeekingParent` after refusing to attach support
    /// to a persisted parent. When false the tool keeps waiting for a child.
    pub reset_on_persisted_parent: bool,

    /// Remove an existing opposite-direction edge before adding the new one.
    /// When false such a selection is rejected.
    pub flip_reverse_edges: bool,
}

impl Default for SketchConfig {
    fn default() -> Self {
        Self {
            sketch_id_prefix: "sketch-".to_string(),
            reset_on_persisted_parent: true,
            flip_reverse_edges: true,
        }
    }
}

impl SketchConfig {
    /// Config matching the legacy sketch editor: a persisted-parent rejection
    /// leaves the edge tool in `SeekingChild`.
    pub fn compatible() -> Self {
        Self {
            reset_on_persisted_parent: false,
            ..Default::default()
        }
    }

    /// Decode a config from JSON. Missing fields take their default values.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| SketchError::serialization("Failed to deserialize config", Some(e)))
    }

    /// Set the id prefix for sketch nodes
    pub fn with_sketch_id_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.sketch_id_prefix = prefix.into();
        self
    }

    /// Set whether a persisted-parent rejection resets the edge tool
    pub fn with_reset_on_persisted_parent(mut self, reset: bool) -> Self {
        self.reset_on_persisted_parent = reset;
        self
    }

    /// Enable or disable the flip gesture
    pub fn with_flip_reverse_edges(mut self, flip: bool) -> Self {
        self.flip_reverse_edges = flip;
        self
    }
}
