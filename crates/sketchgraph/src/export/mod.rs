//! Export for force-directed renderers.
//!
//! - **JSON**: `nodes` and `links` arrays in the shape D3.js and VivaGraph layouts expect

pub mod json;

pub use json::{export_json, export_json_filtered};
