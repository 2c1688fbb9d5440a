//! Graph consistency engine.
//!
//! Re-derives node types across the graph after a local change so that the
//! role of every non-persisted node matches its position:
//!
//! - the parents of a leaf are interpretations
//! - an interpretation has at most one child; a non-leaf child is a source,
//!   and its parents are assertions
//! - the leaf children of an assertion are interpretations, and its parents
//!   are assertions
//!
//! Propagation is a recursive walk. Every call either changes a node's type or
//! stops at the base case (the node already holds the candidate type), which is
//! what bounds the walk. Forced calls skip the base case. Callers force the
//! entry call of a pass; inside a pass the walk forces only the step from a leaf
//! to its parents.

use crate::error::Result;
use crate::events::{EventBus, Notice, SketchEvent};
use crate::graph::{Node, NodeId, NodeType, SketchGraph};
use log::{debug, trace};

/// Counters collected during one propagation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PropagationStats {
    /// Number of `propagate_type_change` invocations, recursive ones included
    pub calls: usize,
    /// Number of type assignments that changed a node's type
    pub type_writes: usize,
    /// Number of edges removed by cardinality repair
    pub edges_detached: usize,
}

/// Pick a type that is legal for `node` in its current position.
///
/// Keeps the current type when it is legal, otherwise tries `source`, then
/// `interpretation`, then falls back to `assertion`.
pub fn find_legal_type(node: &Node) -> NodeType {
    if node.is_legal_type(node.node_type()) {
        return node.node_type();
    }

    [NodeType::Source, NodeType::Interpretation]
        .into_iter()
        .find(|t| node.is_legal_type(*t))
        .unwrap_or(NodeType::Assertion)
}

/// Run one propagation pass and return its counters.
///
/// See [`ConsistencyEngine::propagate_type_change`].
pub fn propagate_type_change(
    graph: &mut SketchGraph,
    bus: &mut EventBus,
    node: &NodeId,
    candidate: NodeType,
    originator: Option<&NodeId>,
    force: bool,
) -> Result<PropagationStats> {
    let mut engine = ConsistencyEngine::new(graph, bus);
    engine.propagate_type_change(node, candidate, originator, force)?;
    Ok(engine.stats())
}

/// Borrowed view over a graph and its event channel that repairs typing.
pub struct ConsistencyEngine<'a> {
    graph: &'a mut SketchGraph,
    bus: &'a mut EventBus,
    stats: PropagationStats,
}

impl<'a> ConsistencyEngine<'a> {
    /// Create an engine over `graph`, announcing mutations on `bus`.
    pub fn new(graph: &'a mut SketchGraph, bus: &'a mut EventBus) -> Self {
        Self {
            graph,
            bus,
            stats: PropagationStats::default(),
        }
    }

    /// Counters accumulated since the engine was created.
    pub fn stats(&self) -> PropagationStats {
        self.stats
    }

    /// Assign `candidate` to `node` and repair the types of its neighbors.
    ///
    /// `originator` is the neighbor that triggered this call; an interpretation
    /// that must shed children keeps it when it is among them. `force` skips the
    /// early exit taken when the node already holds `candidate`.
    ///
    /// A persisted node is never written. A forced call on one spreads the
    /// type it would legally hold ([`find_legal_type`]) onto its non-persisted
    /// neighbors instead; unforced calls are no-ops.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SketchError::NodeNotFound`] if `node` is not in the graph.
    pub fn propagate_type_change(
        &mut self,
        node: &NodeId,
        candidate: NodeType,
        originator: Option<&NodeId>,
        force: bool,
    ) -> Result<()> {
        self.stats.calls += 1;
        let current = self.graph.node(node)?;

        if current.is_persisted() {
            if !force {
                trace!("Skipping persisted node {node}");
                return Ok(());
            }
            // A loaded node may sit in a position its stored type doesn't allow
            let fixed = find_legal_type(current);
            debug!("Re-asserting persisted {node} as {fixed}");
            return self.spread(node, fixed, originator, false);
        }

        let previous = current.node_type();
        if previous == candidate && !force {
            trace!("{node} already {candidate}");
            return Ok(());
        }

        if previous != candidate {
            if previous.is_set() {
                self.bus.notify(Notice::TypeChanged {
                    node: node.clone(),
                    from: previous,
                    to: candidate,
                });
            }
            self.graph.set_type(node, candidate)?;
            self.stats.type_writes += 1;
        }

        self.spread(node, candidate, originator, true)
    }

    fn spread(
        &mut self,
        node: &NodeId,
        node_type: NodeType,
        originator: Option<&NodeId>,
        repair: bool,
    ) -> Result<()> {
        let current = self.graph.node(node)?;
        let is_leaf = current.is_leaf();
        let parents = current.parents().to_vec();
        let children = current.children().to_vec();

        if is_leaf {
            for parent in &parents {
                if self.is_open_parent(parent, node)? {
                    self.propagate_type_change(parent, NodeType::Interpretation, Some(node), true)?;
                }
            }
            return Ok(());
        }

        match node_type {
            NodeType::Interpretation => {
                let children = if repair && children.len() > 1 {
                    self.repair_cardinality(node, &children, originator)?
                } else {
                    children
                };

                for child in &children {
                    if self.is_open_child(node, child)? && !self.graph.node(child)?.is_leaf() {
                        self.propagate_type_change(child, NodeType::Source, Some(node), false)?;
                    }
                }
                for parent in &parents {
                    if self.is_open_parent(parent, node)? {
                        self.propagate_type_change(parent, NodeType::Assertion, Some(node), false)?;
                    }
                }
            }
            NodeType::Assertion => {
                for child in &children {
                    if self.is_open_child(node, child)? && self.graph.node(child)?.is_leaf() {
                        self.propagate_type_change(
                            child,
                            NodeType::Interpretation,
                            Some(node),
                            false,
                        )?;
                    }
                }
                for parent in &parents {
                    if self.is_open_parent(parent, node)? {
                        self.propagate_type_change(parent, NodeType::Assertion, Some(node), false)?;
                    }
                }
            }
            NodeType::Source | NodeType::Unset => {}
        }

        Ok(())
    }

    /// Detach all but one child of an interpretation. Keeps `originator` when it
    /// is a child, otherwise the first child. Returns the surviving children.
    fn repair_cardinality(
        &mut self,
        node: &NodeId,
        children: &[NodeId],
        originator: Option<&NodeId>,
    ) -> Result<Vec<NodeId>> {
        let keep = originator
            .filter(|o| children.contains(*o))
            .unwrap_or(&children[0])
            .clone();

        let mut detached = Vec::new();
        for child in children.iter().filter(|c| **c != keep) {
            if self.graph.remove_child(node, child)? {
                self.stats.edges_detached += 1;
                self.bus.publish(SketchEvent::EdgeRemoved {
                    parent: node.clone(),
                    child: child.clone(),
                });
                detached.push(child.clone());
            }
        }

        debug!("Interpretation {node} keeps {keep}, detached {}", detached.len());
        if !detached.is_empty() {
            self.bus.notify(Notice::NodesDetached {
                node: node.clone(),
                detached,
            });
        }

        Ok(vec![keep])
    }

    // Neighbors are snapshotted before recursing; an earlier step of the same
    // pass may have detached them since.
    fn is_open_parent(&self, parent: &NodeId, node: &NodeId) -> Result<bool> {
        Ok(self.graph.has_edge(parent, node) && !self.graph.node(parent)?.is_persisted())
    }

    fn is_open_child(&self, node: &NodeId, child: &NodeId) -> Result<bool> {
        Ok(self.graph.has_edge(node, child) && !self.graph.node(child)?.is_persisted())
    }
}
