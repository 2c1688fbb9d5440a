use crate::error::Result;
use crate::events::{EventBus, SketchEvent};
use crate::graph::{NodeId, SketchGraph};

/// Record `node` as the highlighted node and announce it. No graph mutation.
///
/// # Errors
///
/// Returns [`crate::SketchError::NodeNotFound`] if `node` is not in the graph.
pub fn highlight_node(
    graph: &SketchGraph,
    bus: &mut EventBus,
    highlighted: &mut Option<NodeId>,
    node: &NodeId,
) -> Result<()> {
    graph.node(node)?;
    *highlighted = Some(node.clone());
    bus.publish(SketchEvent::NodeHighlighted { node: node.clone() });
    Ok(())
}
