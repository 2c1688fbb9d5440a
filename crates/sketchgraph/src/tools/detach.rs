use crate::error::Result;
use crate::events::{EventBus, SketchEvent};
use crate::graph::{NodeId, SketchGraph};
use log::debug;

/// Remove every edge from a non-persisted parent down to `node`.
///
/// Persisted parents keep their edge. Returns the parents that were detached,
/// in the order they were attached.
///
/// # Errors
///
/// Returns [`crate::SketchError::NodeNotFound`] if `node` is not in the graph.
pub fn detach_parents(
    graph: &mut SketchGraph,
    bus: &mut EventBus,
    node: &NodeId,
) -> Result<Vec<NodeId>> {
    let parents = graph.node(node)?.parents().to_vec();
    let mut detached = Vec::new();

    for parent in parents {
        if graph.node(&parent)?.is_persisted() {
            continue;
        }
        if graph.remove_child(&parent, node)? {
            bus.publish(SketchEvent::EdgeRemoved {
                parent: parent.clone(),
                child: node.clone(),
            });
            detached.push(parent);
        }
    }

    debug!("Detached {node} from {} parents", detached.len());
    Ok(detached)
}
