//! Two-phase edge creation: pick a parent, then a child.

use super::Rejection;
use crate::config::SketchConfig;
use crate::engine::{find_legal_type, propagate_type_change, PropagationStats};
use crate::error::Result;
use crate::events::{EventBus, Notice, SketchEvent};
use crate::graph::{NodeId, NodeType, SketchGraph};
use log::debug;

/// Phase of the edge tool.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EdgeState {
    /// Edge mode is off
    #[default]
    Inactive,
    /// Waiting for the parent of the next edge
    SeekingParent,
    /// Parent chosen, waiting for the child
    SeekingChild {
        /// Candidate parent of the edge
        parent: NodeId,
    },
}

/// Result of feeding one selection to the edge tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EdgeOutcome {
    /// Edge mode is off; the selection was not consumed
    Ignored,
    /// The node was recorded as the candidate parent
    ParentSelected(NodeId),
    /// The edge `parent -> child` was added and typing repaired
    Committed {
        /// Parent endpoint
        parent: NodeId,
        /// Child endpoint
        child: NodeId,
        /// Whether an opposite-direction edge was removed first
        flipped: bool,
        /// Counters of the propagation pass that followed
        stats: PropagationStats,
    },
    /// The selection was refused and nothing changed
    Rejected(Rejection),
}

/// State machine of the edge tool.
///
/// Holds at most one piece of state between gestures: the candidate parent.
#[derive(Debug, Clone, Default)]
pub struct EdgeTool {
    state: EdgeState,
}

impl EdgeTool {
    /// Create an inactive tool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter edge mode, discarding any candidate parent.
    pub fn enter(&mut self) {
        self.state = EdgeState::SeekingParent;
    }

    /// Leave edge mode, discarding any candidate parent.
    pub fn exit(&mut self) {
        self.state = EdgeState::Inactive;
    }

    /// Current phase.
    pub fn state(&self) -> &EdgeState {
        &self.state
    }

    /// The parent picked in the first phase, if any.
    pub fn candidate_parent(&self) -> Option<&NodeId> {
        match &self.state {
            EdgeState::SeekingChild { parent } => Some(parent),
            _ => None,
        }
    }

    /// Whether the next selection picks a parent.
    pub fn is_seeking_parent(&self) -> bool {
        self.state == EdgeState::SeekingParent
    }

    /// Whether the next selection picks a child.
    pub fn is_seeking_child(&self) -> bool {
        matches!(self.state, EdgeState::SeekingChild { .. })
    }

    /// Feed a node selection to the tool.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SketchError::NodeNotFound`] if `node` is not in the graph.
    pub fn select(
        &mut self,
        graph: &mut SketchGraph,
        bus: &mut EventBus,
        config: &SketchConfig,
        node: &NodeId,
    ) -> Result<EdgeOutcome> {
        graph.node(node)?;

        match &self.state {
            EdgeState::Inactive => Ok(EdgeOutcome::Ignored),
            EdgeState::SeekingParent => {
                debug!("Edge tool: parent {node}");
                self.state = EdgeState::SeekingChild {
                    parent: node.clone(),
                };
                Ok(EdgeOutcome::ParentSelected(node.clone()))
            }
            EdgeState::SeekingChild { parent } => {
                let parent = parent.clone();
                self.attach(graph, bus, config, &parent, node)
            }
        }
    }

    fn attach(
        &mut self,
        graph: &mut SketchGraph,
        bus: &mut EventBus,
        config: &SketchConfig,
        parent: &NodeId,
        child: &NodeId,
    ) -> Result<EdgeOutcome> {
        if parent == child {
            return Ok(self.reject(bus, Rejection::SelfLoop));
        }

        if graph.node(parent)?.is_persisted() {
            let outcome = self.reject(bus, Rejection::PersistedParent);
            if config.reset_on_persisted_parent {
                self.state = EdgeState::SeekingParent;
            }
            return Ok(outcome);
        }

        if graph.has_edge(parent, child) {
            return Ok(self.reject(bus, Rejection::DuplicateEdge));
        }

        let flipped = graph.has_edge(child, parent);
        if flipped {
            if !config.flip_reverse_edges {
                return Ok(self.reject(bus, Rejection::ReverseEdgeExists));
            }
            graph.remove_child(child, parent)?;
            bus.publish(SketchEvent::EdgeRemoved {
                parent: child.clone(),
                child: parent.clone(),
            });
        }

        graph.add_child(parent, child)?;
        bus.publish(SketchEvent::EdgeAdded {
            parent: parent.clone(),
            child: child.clone(),
        });

        let parent_node = graph.node(parent)?;
        let child_node = graph.node(child)?;
        if !parent_node.node_type().is_set()
            && !child_node.node_type().is_set()
            && !child_node.is_persisted()
        {
            graph.set_type(child, NodeType::Assertion)?;
        }

        let parent_node = graph.node(parent)?;
        let child_node = graph.node(child)?;
        let parent_type = parent_node.node_type();
        let stats = if parent_node.is_legal_type(parent_type) && !child_node.is_persisted() {
            debug!("Propagating down from {parent} ({parent_type})");
            propagate_type_change(graph, bus, parent, parent_type, None, true)?
        } else {
            let child_type = find_legal_type(child_node);
            debug!("Propagating up from {child} ({child_type})");
            propagate_type_change(graph, bus, child, child_type, None, true)?
        };

        self.state = EdgeState::SeekingParent;
        Ok(EdgeOutcome::Committed {
            parent: parent.clone(),
            child: child.clone(),
            flipped,
            stats,
        })
    }

    fn reject(&self, bus: &mut EventBus, reason: Rejection) -> EdgeOutcome {
        debug!("Edge tool rejected selection: {reason:?}");
        bus.notify(Notice::Rejected { reason });
        EdgeOutcome::Rejected(reason)
    }
}
