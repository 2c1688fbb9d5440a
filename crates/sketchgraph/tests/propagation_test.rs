//! Tests for type propagation and cardinality repair.

use sketchgraph::{
    audit, propagate_type_change, EventBus, Node, NodeBody, NodeId, NodeType, Notice, SketchEvent,
    SketchGraph, Topic,
};
use uuid::Uuid;

fn type_of(graph: &SketchGraph, id: &NodeId) -> NodeType {
    graph.node(id).unwrap().node_type()
}

fn link(graph: &mut SketchGraph, parent: &NodeId, child: &NodeId) {
    assert!(graph.add_child(parent, child).unwrap());
}

#[test]
fn test_assertions_chain_upward_from_leaf() {
    let mut graph = SketchGraph::new();
    let mut bus = EventBus::new();
    let ids: Vec<_> = (0..4).map(|_| graph.add_sketch_node()).collect();
    for pair in ids.windows(2) {
        link(&mut graph, &pair[0], &pair[1]);
    }

    propagate_type_change(&mut graph, &mut bus, &ids[3], NodeType::Source, None, true).unwrap();

    assert_eq!(type_of(&graph, &ids[0]), NodeType::Assertion);
    assert_eq!(type_of(&graph, &ids[1]), NodeType::Assertion);
    assert_eq!(type_of(&graph, &ids[2]), NodeType::Interpretation);
    assert_eq!(type_of(&graph, &ids[3]), NodeType::Source);
}

#[test]
fn test_diamond_terminates_with_consistent_types() {
    let mut graph = SketchGraph::new();
    let mut bus = EventBus::new();
    let top = graph.add_sketch_node();
    let left = graph.add_sketch_node();
    let right = graph.add_sketch_node();
    let bottom = graph.add_sketch_node();
    link(&mut graph, &top, &left);
    link(&mut graph, &top, &right);
    link(&mut graph, &left, &bottom);
    link(&mut graph, &right, &bottom);

    let stats =
        propagate_type_change(&mut graph, &mut bus, &bottom, NodeType::Source, None, true).unwrap();

    assert_eq!(type_of(&graph, &top), NodeType::Assertion);
    assert_eq!(type_of(&graph, &left), NodeType::Interpretation);
    assert_eq!(type_of(&graph, &right), NodeType::Interpretation);
    assert_eq!(type_of(&graph, &bottom), NodeType::Source);
    assert_eq!(stats.calls, 5);
    assert_eq!(stats.type_writes, 4);
    assert!(audit(&graph).is_empty());
}

#[test]
fn test_cycle_terminates() {
    let mut graph = SketchGraph::new();
    let mut bus = EventBus::new();
    let a = graph.add_sketch_node();
    let b = graph.add_sketch_node();
    let c = graph.add_sketch_node();
    link(&mut graph, &a, &b);
    link(&mut graph, &b, &c);
    link(&mut graph, &c, &a);

    let stats =
        propagate_type_change(&mut graph, &mut bus, &a, NodeType::Interpretation, None, true)
            .unwrap();

    // Every node has a parent, so assertions close the loop
    for id in [&a, &b, &c] {
        assert_eq!(type_of(&graph, id), NodeType::Assertion);
    }
    assert!(stats.calls < 20);
}

#[test]
fn test_repair_keeps_first_child_without_originator() {
    let mut graph = SketchGraph::new();
    let mut bus = EventBus::new();
    let recorder = bus.record(&[]);
    let p = graph.add_sketch_node();
    let kids: Vec<_> = (0..3).map(|_| graph.add_sketch_node()).collect();
    for kid in &kids {
        link(&mut graph, &p, kid);
    }

    let stats =
        propagate_type_change(&mut graph, &mut bus, &p, NodeType::Interpretation, None, true)
            .unwrap();

    assert_eq!(graph.node(&p).unwrap().children(), &[kids[0].clone()]);
    assert_eq!(stats.edges_detached, 2);
    assert_eq!(
        recorder.events(),
        vec![
            SketchEvent::EdgeRemoved {
                parent: p.clone(),
                child: kids[1].clone(),
            },
            SketchEvent::EdgeRemoved {
                parent: p.clone(),
                child: kids[2].clone(),
            },
            SketchEvent::Notice(Notice::NodesDetached {
                node: p.clone(),
                detached: vec![kids[1].clone(), kids[2].clone()],
            }),
        ]
    );

    // Detached children are orphaned, not deleted
    assert!(graph.contains(&kids[1]));
    assert!(graph.node(&kids[2]).unwrap().parents().is_empty());
}

#[test]
fn test_repair_keeps_originating_child() {
    let mut graph = SketchGraph::new();
    let mut bus = EventBus::new();
    let p = graph.add_sketch_node();
    let first = graph.add_sketch_node();
    let second = graph.add_sketch_node();
    link(&mut graph, &p, &first);
    link(&mut graph, &p, &second);

    propagate_type_change(&mut graph, &mut bus, &second, NodeType::Source, None, true).unwrap();

    assert_eq!(type_of(&graph, &p), NodeType::Interpretation);
    assert_eq!(graph.node(&p).unwrap().children(), &[second.clone()]);
    assert!(graph.node(&first).unwrap().parents().is_empty());
}

#[test]
fn test_unforced_repeat_is_silent() {
    let mut graph = SketchGraph::new();
    let mut bus = EventBus::new();
    let p = graph.add_sketch_node();
    let c = graph.add_sketch_node();
    link(&mut graph, &p, &c);
    propagate_type_change(&mut graph, &mut bus, &c, NodeType::Source, None, true).unwrap();

    let recorder = bus.record(&[]);
    let stats =
        propagate_type_change(&mut graph, &mut bus, &c, NodeType::Source, None, false).unwrap();

    assert_eq!(stats.calls, 1);
    assert_eq!(stats.type_writes, 0);
    assert!(recorder.is_empty());
}

#[test]
fn test_type_changed_notices_report_overwrites() {
    let mut graph = SketchGraph::new();
    let mut bus = EventBus::new();
    let a = graph.add_sketch_node();
    let b = graph.add_sketch_node();
    link(&mut graph, &a, &b);

    // Unset -> typed transitions are silent
    let first = bus.record(&[Topic::Notice]);
    propagate_type_change(&mut graph, &mut bus, &b, NodeType::Source, None, true).unwrap();
    assert!(first.is_empty());
    assert_eq!(type_of(&graph, &a), NodeType::Interpretation);

    // An assertion over a leaf falls back to interpretation
    let second = bus.record(&[Topic::Notice]);
    propagate_type_change(&mut graph, &mut bus, &a, NodeType::Assertion, None, true).unwrap();

    assert_eq!(
        second.notices(),
        vec![
            Notice::TypeChanged {
                node: a.clone(),
                from: NodeType::Interpretation,
                to: NodeType::Assertion,
            },
            Notice::TypeChanged {
                node: b.clone(),
                from: NodeType::Source,
                to: NodeType::Interpretation,
            },
            Notice::TypeChanged {
                node: a.clone(),
                from: NodeType::Assertion,
                to: NodeType::Interpretation,
            },
        ]
    );
    assert_eq!(type_of(&graph, &a), NodeType::Interpretation);
    assert_eq!(type_of(&graph, &b), NodeType::Interpretation);
}

#[test]
fn test_persisted_nodes_are_never_written() {
    let mut graph = SketchGraph::new();
    let mut bus = EventBus::new();
    let root = graph
        .insert_node(Node::persisted(
            NodeId::from("100"),
            Uuid::new_v4(),
            NodeType::Assertion,
            NodeBody::new(),
        ))
        .unwrap();
    let leaf = graph
        .insert_node(Node::persisted(
            NodeId::from("200"),
            Uuid::new_v4(),
            NodeType::Source,
            NodeBody::new(),
        ))
        .unwrap();
    let sketch = graph.add_sketch_node();
    link(&mut graph, &root, &sketch);
    link(&mut graph, &sketch, &leaf);

    // Forcing a persisted node re-asserts its own type onto its neighbors
    let stats =
        propagate_type_change(&mut graph, &mut bus, &leaf, NodeType::Assertion, None, true)
            .unwrap();

    assert_eq!(type_of(&graph, &leaf), NodeType::Source);
    assert_eq!(type_of(&graph, &sketch), NodeType::Interpretation);
    assert_eq!(type_of(&graph, &root), NodeType::Assertion);
    assert_eq!(stats.type_writes, 1);

    // Direct retypes are ignored too
    propagate_type_change(&mut graph, &mut bus, &root, NodeType::Source, None, true).unwrap();
    assert_eq!(type_of(&graph, &root), NodeType::Assertion);
}

#[test]
fn test_source_is_pushed_onto_non_leaf_children() {
    let mut graph = SketchGraph::new();
    let mut bus = EventBus::new();
    let top = graph.add_sketch_node();
    let mid = graph.add_sketch_node();
    let low = graph.add_sketch_node();
    link(&mut graph, &top, &mid);
    link(&mut graph, &mid, &low);

    propagate_type_change(&mut graph, &mut bus, &top, NodeType::Interpretation, None, true)
        .unwrap();

    assert_eq!(type_of(&graph, &top), NodeType::Interpretation);
    assert_eq!(type_of(&graph, &mid), NodeType::Source);
    assert_eq!(type_of(&graph, &low), NodeType::Unset);
}

#[test]
fn test_layered_graph_stays_consistent_under_every_retype() {
    let mut graph = SketchGraph::new();
    let mut bus = EventBus::new();
    let layers: Vec<Vec<NodeId>> = (0..5)
        .map(|_| (0..4).map(|_| graph.add_sketch_node()).collect())
        .collect();
    for pair in layers.windows(2) {
        for (i, parent) in pair[0].iter().enumerate() {
            link(&mut graph, parent, &pair[1][i]);
            link(&mut graph, parent, &pair[1][(i + 1) % 4]);
        }
    }

    let all: Vec<NodeId> = layers.into_iter().flatten().collect();
    for id in &all {
        for node_type in [
            NodeType::Source,
            NodeType::Interpretation,
            NodeType::Assertion,
        ] {
            let stats =
                propagate_type_change(&mut graph, &mut bus, id, node_type, None, true).unwrap();
            assert!(stats.calls <= 50 * all.len(), "runaway pass: {stats:?}");
            assert!(audit(&graph).is_empty(), "{:?}", audit(&graph));
        }
    }
}
