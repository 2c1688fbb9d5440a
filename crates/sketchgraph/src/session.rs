//! The session controller: one owner for the graph and all tool state.

use crate::config::SketchConfig;
use crate::engine::{propagate_type_change, PropagationStats};
use crate::error::Result;
use crate::events::{EventBus, Intent, Notice, SketchEvent};
use crate::graph::{audit, NodeId, NodeType, SketchGraph, Violation};
use crate::snapshot::GraphSnapshot;
use crate::tools::{detach_parents, highlight_node, EdgeTool, Rejection, TapOutcome, Tool};
use log::{debug, info};

/// Result of an explicit type change request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetypeOutcome {
    /// The type was applied and the graph repaired
    Applied(PropagationStats),
    /// The request was refused; nothing changed
    Rejected(Rejection),
}

/// An editing session over one sketch graph.
///
/// Every gesture runs to completion, including all nested repairs, before the
/// method returns. Collaborators observe the session through its event bus.
///
/// # Example
///
/// ```
/// use sketchgraph::{Intent, NodeType, SketchSession, Tool};
///
/// # fn example() -> sketchgraph::Result<()> {
/// let mut session = SketchSession::new();
/// let claim = session.add_node();
/// let support = session.add_node();
///
/// session.set_active_tool(Tool::EdgeTool);
/// session.handle_intent(Intent::NodeTapped(claim.clone()))?;
/// session.handle_intent(Intent::NodeTapped(support.clone()))?;
///
/// assert_eq!(session.graph().node(&claim)?.node_type(), NodeType::Interpretation);
/// assert_eq!(session.graph().node(&support)?.node_type(), NodeType::Assertion);
/// # Ok(())
/// # }
/// # example().unwrap();
/// ```
#[derive(Debug)]
pub struct SketchSession {
    graph: SketchGraph,
    bus: EventBus,
    config: SketchConfig,
    active_tool: Tool,
    edge_tool: EdgeTool,
    highlighted: Option<NodeId>,
    root: Option<NodeId>,
}

impl Default for SketchSession {
    fn default() -> Self {
        Self::new()
    }
}

impl SketchSession {
    /// Create a session with the default configuration.
    pub fn new() -> Self {
        Self::with_config(SketchConfig::default())
    }

    /// Create a session with a custom configuration.
    pub fn with_config(config: SketchConfig) -> Self {
        Self {
            graph: SketchGraph::with_prefix(config.sketch_id_prefix.clone()),
            bus: EventBus::new(),
            config,
            active_tool: Tool::default(),
            edge_tool: EdgeTool::new(),
            highlighted: None,
            root: None,
        }
    }

    /// The graph being edited.
    pub fn graph(&self) -> &SketchGraph {
        &self.graph
    }

    /// The event channel, for subscribing collaborators.
    pub fn bus_mut(&mut self) -> &mut EventBus {
        &mut self.bus
    }

    /// Active configuration.
    pub fn config(&self) -> &SketchConfig {
        &self.config
    }

    /// The tool bound to node taps.
    pub fn active_tool(&self) -> Tool {
        self.active_tool
    }

    /// Edge tool state, for rendering "pick a parent / pick a child" hints.
    pub fn edge_tool(&self) -> &EdgeTool {
        &self.edge_tool
    }

    /// The highlighted node, if any.
    pub fn highlighted(&self) -> Option<&NodeId> {
        self.highlighted.as_ref()
    }

    /// Root of the loaded persisted graph, if any.
    pub fn root(&self) -> Option<&NodeId> {
        self.root.as_ref()
    }

    /// Create a new sketch node and announce it.
    pub fn add_node(&mut self) -> NodeId {
        let node = self.graph.add_sketch_node();
        self.bus.publish(SketchEvent::NodeAdded {
            parent: None,
            node: node.clone(),
        });
        node
    }

    /// Switch tools. Selecting the edge tool (again) starts a fresh edge;
    /// any other tool clears the edge in progress.
    pub fn set_active_tool(&mut self, tool: Tool) {
        debug!("Active tool: {} -> {tool}", self.active_tool);
        if tool == Tool::EdgeTool {
            self.edge_tool.enter();
        } else {
            self.edge_tool.exit();
        }
        self.active_tool = tool;
    }

    /// Handle an intent reported by a rendering collaborator.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SketchError::NodeNotFound`] if the intent names an unknown node.
    pub fn handle_intent(&mut self, intent: Intent) -> Result<TapOutcome> {
        match intent {
            Intent::NodeTapped(node) => self.tap(&node),
            Intent::HighlightRequested(node) => {
                highlight_node(&self.graph, &mut self.bus, &mut self.highlighted, &node)?;
                Ok(TapOutcome::Highlighted(node))
            }
        }
    }

    fn tap(&mut self, node: &NodeId) -> Result<TapOutcome> {
        match self.active_tool {
            Tool::EdgeTool => {
                let outcome =
                    self.edge_tool
                        .select(&mut self.graph, &mut self.bus, &self.config, node)?;
                Ok(TapOutcome::Edge(outcome))
            }
            Tool::DetachTool => {
                let detached = detach_parents(&mut self.graph, &mut self.bus, node)?;
                Ok(TapOutcome::Detached(detached))
            }
            Tool::SelectionTool => {
                highlight_node(&self.graph, &mut self.bus, &mut self.highlighted, node)?;
                Ok(TapOutcome::Highlighted(node.clone()))
            }
        }
    }

    /// Retype the highlighted node and repair the graph around it.
    ///
    /// Uses the same propagation path as structural changes, forced so the
    /// neighbors are revisited even when the type is unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SketchError::NodeNotFound`] if the highlighted node vanished.
    pub fn change_type(&mut self, requested: NodeType) -> Result<RetypeOutcome> {
        let Some(node) = self.highlighted.clone() else {
            return Ok(self.reject(Rejection::NothingHighlighted));
        };
        if self.graph.node(&node)?.is_persisted() {
            return Ok(self.reject(Rejection::PersistedNode));
        }

        info!("Retyping {node} as {requested}");
        let stats =
            propagate_type_change(&mut self.graph, &mut self.bus, &node, requested, None, true)?;
        Ok(RetypeOutcome::Applied(stats))
    }

    /// Replace the markdown text of a node. Types and edges are untouched.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SketchError::NodeNotFound`] if the node doesn't exist.
    pub fn set_body(&mut self, node: &NodeId, text: impl Into<String>) -> Result<()> {
        self.graph.body_mut(node)?.set_text(text);
        Ok(())
    }

    /// Load persisted argument data and announce its root.
    ///
    /// # Errors
    ///
    /// Propagates validation errors from [`GraphSnapshot::load_into`]; the graph
    /// is unchanged in that case.
    pub fn load_graph(&mut self, snapshot: &GraphSnapshot) -> Result<Option<NodeId>> {
        let root = snapshot.load_into(&mut self.graph)?;
        self.bus.publish(SketchEvent::GraphLoaded { root: root.clone() });
        self.root = root.clone();
        Ok(root)
    }

    /// Structural invariant violations, empty when the graph is consistent.
    pub fn audit(&self) -> Vec<Violation> {
        audit(&self.graph)
    }

    /// Export the graph as renderer JSON.
    pub fn export_json(&self) -> Result<String> {
        crate::export::export_json(&self.graph)
    }

    fn reject(&mut self, reason: Rejection) -> RetypeOutcome {
        self.bus.notify(Notice::Rejected { reason });
        RetypeOutcome::Rejected(reason)
    }
}
