//! Publish/subscribe channel between the engine and its collaborators.
//!
//! The engine announces graph mutations and user notices here; renderers and
//! toast widgets subscribe. Delivery is synchronous and in emission order, and
//! handlers only ever see ids, so they cannot mutate the graph mid-pass.
//!
//! User intents travel the other way as [`Intent`] values handed to
//! [`crate::SketchSession::handle_intent`].

use crate::graph::{NodeId, NodeType};
use crate::tools::Rejection;
use log::{info, trace, warn};
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;

/// Fixed set of topics on the channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Topic {
    /// A sketch node was created
    NodeAdded,
    /// An edge was committed
    EdgeAdded,
    /// An edge was removed (detach, flip, or cardinality repair)
    EdgeRemoved,
    /// A node became the highlighted node
    NodeHighlighted,
    /// Persisted graph data was loaded
    GraphLoaded,
    /// A user-facing notification
    Notice,
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Topic::NodeAdded => write!(f, "nodeAdded"),
            Topic::EdgeAdded => write!(f, "edgeAdded"),
            Topic::EdgeRemoved => write!(f, "edgeRemoved"),
            Topic::NodeHighlighted => write!(f, "nodeHighlighted"),
            Topic::GraphLoaded => write!(f, "graphLoaded"),
            Topic::Notice => write!(f, "notice"),
        }
    }
}

/// Non-fatal notification for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    /// Propagation overwrote a defined type with a different one
    TypeChanged {
        /// Retyped node
        node: NodeId,
        /// Previous type
        from: NodeType,
        /// New type
        to: NodeType,
    },
    /// Excess children were detached from an interpretation
    NodesDetached {
        /// The interpretation node
        node: NodeId,
        /// Children that lost their edge
        detached: Vec<NodeId>,
    },
    /// A user operation was refused without touching the graph
    Rejected {
        /// Why it was refused
        reason: Rejection,
    },
}

impl Notice {
    /// Whether this notice reports a refused operation rather than a repair.
    pub fn is_error(&self) -> bool {
        matches!(self, Notice::Rejected { .. })
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Notice::TypeChanged { .. } => {
                write!(f, "Changed a card type to keep everything proper!")
            }
            Notice::NodesDetached { .. } => {
                write!(f, "Detached some nodes to keep everything proper!")
            }
            Notice::Rejected { reason } => write!(f, "{reason}"),
        }
    }
}

/// An event delivered to subscribers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "topic", rename_all = "camelCase")]
pub enum SketchEvent {
    /// A node was created, optionally under a parent
    NodeAdded {
        /// Parent it was created under, if any
        parent: Option<NodeId>,
        /// The new node
        node: NodeId,
    },
    /// The edge `parent -> child` was committed
    EdgeAdded {
        /// Parent endpoint
        parent: NodeId,
        /// Child endpoint
        child: NodeId,
    },
    /// The edge `parent -> child` was removed
    EdgeRemoved {
        /// Parent endpoint
        parent: NodeId,
        /// Child endpoint
        child: NodeId,
    },
    /// A node was highlighted
    NodeHighlighted {
        /// The highlighted node
        node: NodeId,
    },
    /// Persisted data was loaded under this root
    GraphLoaded {
        /// Root of the loaded graph
        root: Option<NodeId>,
    },
    /// A user-facing notification
    Notice(Notice),
}

impl SketchEvent {
    /// The topic this event is published on.
    pub fn topic(&self) -> Topic {
        match self {
            SketchEvent::NodeAdded { .. } => Topic::NodeAdded,
            SketchEvent::EdgeAdded { .. } => Topic::EdgeAdded,
            SketchEvent::EdgeRemoved { .. } => Topic::EdgeRemoved,
            SketchEvent::NodeHighlighted { .. } => Topic::NodeHighlighted,
            SketchEvent::GraphLoaded { .. } => Topic::GraphLoaded,
            SketchEvent::Notice(_) => Topic::Notice,
        }
    }
}

/// A user-originated intent reported by a rendering collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// The user tapped a node; the effect depends on the active tool
    NodeTapped(NodeId),
    /// A rendering gesture asked for a node to be highlighted
    HighlightRequested(NodeId),
}

/// Handle returned by [`EventBus::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Boxed subscriber callback.
pub type Handler = Box<dyn FnMut(&SketchEvent)>;

struct Subscriber {
    id: SubscriptionId,
    // None subscribes to every topic
    topic: Option<Topic>,
    handler: Handler,
}

/// Synchronous, ordered event channel.
#[derive(Default)]
pub struct EventBus {
    subscribers: Vec<Subscriber>,
    next_id: u64,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl EventBus {
    /// Create a bus with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to a single topic.
    pub fn subscribe(
        &mut self,
        topic: Topic,
        handler: impl FnMut(&SketchEvent) + 'static,
    ) -> SubscriptionId {
        self.add_subscriber(Some(topic), Box::new(handler))
    }

    /// Subscribe to every topic.
    pub fn subscribe_all(&mut self, handler: impl FnMut(&SketchEvent) + 'static) -> SubscriptionId {
        self.add_subscriber(None, Box::new(handler))
    }

    /// Remove a subscription. Returns whether it existed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|s| s.id != id);
        self.subscribers.len() != before
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Deliver an event to every matching subscriber, in subscription order.
    pub fn publish(&mut self, event: SketchEvent) {
        let topic = event.topic();
        trace!("Publishing {topic}: {event:?}");
        if let SketchEvent::Notice(notice) = &event {
            if notice.is_error() {
                warn!("{notice}");
            } else {
                info!("{notice}");
            }
        }

        for subscriber in &mut self.subscribers {
            if subscriber.topic.map_or(true, |t| t == topic) {
                (subscriber.handler)(&event);
            }
        }
    }

    /// Publish a notice.
    pub fn notify(&mut self, notice: Notice) {
        self.publish(SketchEvent::Notice(notice));
    }

    /// Record every event on the given topics (all topics when empty).
    pub fn record(&mut self, topics: &[Topic]) -> EventRecorder {
        let recorder = EventRecorder::default();
        let sink = Rc::clone(&recorder.events);
        let topics = topics.to_vec();
        self.subscribe_all(move |event| {
            if topics.is_empty() || topics.contains(&event.topic()) {
                sink.borrow_mut().push(event.clone());
            }
        });
        recorder
    }

    fn add_subscriber(&mut self, topic: Option<Topic>, handler: Handler) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push(Subscriber { id, topic, handler });
        id
    }
}

/// Shared log of delivered events, filled by [`EventBus::record`].
#[derive(Debug, Clone, Default)]
pub struct EventRecorder {
    events: Rc<RefCell<Vec<SketchEvent>>>,
}

impl EventRecorder {
    /// Copy of all events recorded so far.
    pub fn events(&self) -> Vec<SketchEvent> {
        self.events.borrow().clone()
    }

    /// Number of events recorded so far.
    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    /// Drain the log, returning what it held.
    pub fn take(&self) -> Vec<SketchEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    /// Recorded notices only.
    pub fn notices(&self) -> Vec<Notice> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                SketchEvent::Notice(n) => Some(n.clone()),
                _ => None,
            })
            .collect()
    }
}
