//! JSON export with "nodes" and "links" arrays.

use crate::error::{Result, SketchError};
use crate::graph::{Node, SketchGraph};
use serde_json::{json, Value};
use std::collections::HashSet;

/// Export the whole graph.
pub fn export_json(graph: &SketchGraph) -> Result<String> {
    export_json_filtered(graph, |_| true)
}

/// Export the nodes accepted by `node_filter` and the links between them.
pub fn export_json_filtered(
    graph: &SketchGraph,
    node_filter: impl Fn(&Node) -> bool,
) -> Result<String> {
    let mut nodes_array = Vec::new();
    let mut kept = HashSet::new();

    for node in graph.nodes().filter(|n| node_filter(*n)) {
        nodes_array.push(node_to_json(node));
        kept.insert(node.id().clone());
    }

    let links_array: Vec<Value> = graph
        .edges()
        .into_iter()
        .filter(|(parent, child)| kept.contains(parent) && kept.contains(child))
        .map(|(parent, child)| {
            json!({
                "source": parent,
                "target": child,
            })
        })
        .collect();

    let result = json!({
        "nodes": nodes_array,
        "links": links_array,
    });

    serde_json::to_string_pretty(&result)
        .map_err(|e| SketchError::serialization("Failed to serialize graph", Some(e)))
}

fn node_to_json(node: &Node) -> Value {
    json!({
        "id": node.id(),
        "stableId": node.stable_id(),
        "type": node.node_type(),
        "persisted": node.is_persisted(),
        "body": node.body,
    })
}
