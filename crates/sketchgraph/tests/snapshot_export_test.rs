//! Loading persisted data and exporting the sketch for rendering.

use serde_json::Value;
use sketchgraph::export::export_json_filtered;
use sketchgraph::{
    GraphSnapshot, Intent, NodeId, NodeType, SketchError, SketchGraph, SketchSession, Tool,
};

const FIXTURE: &str = r#"{
    "rootId": "1",
    "nodes": [
        {"id": "1", "stableId": "6f1c2a8e-3b0d-4c55-9a61-2f4f3b7c9d10", "type": "assertion",
         "body": {"title": "Cities should fund night buses", "votes": 12}},
        {"id": "2", "type": "interpretation", "body": {"body": "Ridership data shows demand"}},
        {"id": "3", "type": "source", "body": {"body": "Transit report, table 4", "public": true}}
    ],
    "edges": [
        {"parent": "1", "child": "2"},
        {"parent": "2", "child": "3"}
    ]
}"#;

#[test]
fn test_fixture_loads_with_bodies_and_stable_ids() {
    let snapshot = GraphSnapshot::from_json_str(FIXTURE).unwrap();
    let mut graph = SketchGraph::new();
    snapshot.load_into(&mut graph).unwrap();

    let root = graph.node(&NodeId::from("1")).unwrap();
    assert_eq!(
        root.stable_id().to_string(),
        "6f1c2a8e-3b0d-4c55-9a61-2f4f3b7c9d10"
    );
    assert_eq!(root.body.title(), Some("Cities should fund night buses"));
    assert_eq!(root.body.get_int("votes"), Some(12));
    assert_eq!(
        graph.node(&NodeId::from("3")).unwrap().body.text(),
        Some("Transit report, table 4")
    );
    assert_eq!(graph.node(&NodeId::from("2")).unwrap().children(), &[NodeId::from("3")]);
}

#[test]
fn test_malformed_snapshot_is_serialization_error() {
    let result = GraphSnapshot::from_json_str(r#"{"nodes": [{"id": "1", "type": "opinion"}]}"#);
    assert!(matches!(result, Err(SketchError::Serialization { .. })));
}

#[test]
fn test_duplicate_ids_rejected_before_insertion() {
    let snapshot = GraphSnapshot::from_json_str(
        r#"{"nodes": [{"id": "1", "type": "source"}, {"id": "1", "type": "assertion"}]}"#,
    )
    .unwrap();
    let mut graph = SketchGraph::new();

    assert!(matches!(
        snapshot.load_into(&mut graph),
        Err(SketchError::DuplicateNode { .. })
    ));
    assert_eq!(graph.node_count(), 0);
}

#[test]
fn test_sketch_can_extend_loaded_graph() {
    let mut session = SketchSession::new();
    session
        .load_graph(&GraphSnapshot::from_json_str(FIXTURE).unwrap())
        .unwrap();
    let extra = session.add_node();

    // Support a persisted node from below
    session.set_active_tool(Tool::EdgeTool);
    session.handle_intent(Intent::NodeTapped(extra.clone())).unwrap();
    session
        .handle_intent(Intent::NodeTapped(NodeId::from("1")))
        .unwrap();

    assert!(session.graph().has_edge(&extra, &NodeId::from("1")));
    assert_eq!(
        session.graph().node(&extra).unwrap().node_type(),
        NodeType::Assertion
    );
    assert_eq!(
        session.graph().node(&NodeId::from("1")).unwrap().node_type(),
        NodeType::Assertion
    );
    assert!(session.audit().is_empty());
}

#[test]
fn test_export_lists_nodes_and_links() {
    let mut session = SketchSession::new();
    session
        .load_graph(&GraphSnapshot::from_json_str(FIXTURE).unwrap())
        .unwrap();
    let draft = session.add_node();
    session.set_body(&draft, "New thought").unwrap();

    let value: Value = serde_json::from_str(&session.export_json().unwrap()).unwrap();
    let nodes = value["nodes"].as_array().unwrap();
    let links = value["links"].as_array().unwrap();

    assert_eq!(nodes.len(), 4);
    assert_eq!(links.len(), 2);
    assert_eq!(nodes[0]["id"], "1");
    assert_eq!(nodes[0]["persisted"], true);
    assert_eq!(nodes[0]["body"]["votes"], 12);
    assert_eq!(nodes[3]["id"], draft.as_str());
    assert_eq!(nodes[3]["type"], "unset");
    assert_eq!(nodes[3]["body"]["body"], "New thought");
    assert_eq!(links[1]["source"], "2");
    assert_eq!(links[1]["target"], "3");
}

#[test]
fn test_export_sketch_only() {
    let mut session = SketchSession::new();
    session
        .load_graph(&GraphSnapshot::from_json_str(FIXTURE).unwrap())
        .unwrap();
    session.add_node();

    let json = export_json_filtered(session.graph(), |node| !node.is_persisted()).unwrap();
    let value: Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["nodes"].as_array().unwrap().len(), 1);
    assert!(value["links"].as_array().unwrap().is_empty());
}
