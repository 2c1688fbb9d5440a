//! Content payload carried by every node.
//!
//! The consistency engine never reads a body. It only travels with the node
//! so renderers and editors have something to show.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Key holding the card title.
pub const TITLE_KEY: &str = "title";
/// Key holding the markdown text of the card.
pub const TEXT_KEY: &str = "body";

/// A single value stored in a [`NodeBody`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BodyValue {
    /// Text (title, markdown body, qualifier)
    String(String),
    /// Integer (vote tallies, version numbers)
    Int(i64),
    /// Boolean flag
    Bool(bool),
    /// Explicit null/absence of value
    Null,
}

impl From<String> for BodyValue {
    fn from(value: String) -> Self {
        BodyValue::String(value)
    }
}

impl From<&str> for BodyValue {
    fn from(value: &str) -> Self {
        BodyValue::String(value.to_string())
    }
}

impl From<i64> for BodyValue {
    fn from(value: i64) -> Self {
        BodyValue::Int(value)
    }
}

impl From<i32> for BodyValue {
    fn from(value: i32) -> Self {
        BodyValue::Int(value as i64)
    }
}

impl From<bool> for BodyValue {
    fn from(value: bool) -> Self {
        BodyValue::Bool(value)
    }
}

/// Opaque key-value content of a node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeBody {
    data: BTreeMap<String, BodyValue>,
}

impl NodeBody {
    /// Create an empty body.
    pub fn new() -> Self {
        Self {
            data: BTreeMap::new(),
        }
    }

    /// Builder pattern: add a value and return self.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<BodyValue>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// Insert a value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<BodyValue>) {
        self.data.insert(key.into(), value.into());
    }

    /// Get a value by key.
    pub fn get(&self, key: &str) -> Option<&BodyValue> {
        self.data.get(key)
    }

    /// Number of stored values.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the body is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Type-safe getter for string values.
    pub fn get_string(&self, key: &str) -> Option<&str> {
        match self.data.get(key) {
            Some(BodyValue::String(s)) => Some(s),
            _ => None,
        }
    }

    /// Type-safe getter for integer values.
    pub fn get_int(&self, key: &str) -> Option<i64> {
        match self.data.get(key) {
            Some(BodyValue::Int(i)) => Some(*i),
            _ => None,
        }
    }

    /// The card title, if any.
    pub fn title(&self) -> Option<&str> {
        self.get_string(TITLE_KEY)
    }

    /// The markdown text, if any.
    pub fn text(&self) -> Option<&str> {
        self.get_string(TEXT_KEY)
    }

    /// Replace the markdown text.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.insert(TEXT_KEY, text.into());
    }
}
