// SPDX-License-Identifier: MIT OR Apache-2.0
//! Domain events emitted by the graph editor.
//!
//! The graph queues an event for every successful mutation. The session
//! flushes the queue to host subscribers after each input call, so the host
//! decides how to react instead of binding callbacks into the model.

use crate::connection::{Connection, ConnectionId};
use crate::node::NodeId;
use crate::props::PropValue;
use egui::Pos2;
use indexmap::IndexMap;

/// What is currently selected on the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    /// Nothing selected
    #[default]
    None,
    /// A single node
    Node(NodeId),
    /// A single connection
    Connection(ConnectionId),
}

impl Selection {
    /// The selected node, if any
    pub fn node(&self) -> Option<NodeId> {
        match self {
            Self::Node(id) => Some(*id),
            _ => None,
        }
    }

    /// The selected connection, if any
    pub fn connection(&self) -> Option<ConnectionId> {
        match self {
            Self::Connection(id) => Some(*id),
            _ => None,
        }
    }
}

/// A change to the graph or selection
#[derive(Debug, Clone, PartialEq)]
pub enum GraphEvent {
    /// A node entered the graph
    NodeAdded {
        /// New node
        node: NodeId,
    },
    /// A node changed position
    NodeMoved {
        /// Moved node
        node: NodeId,
        /// New position (graph space)
        position: Pos2,
    },
    /// A node left the graph together with every incident connection
    NodeRemoved {
        /// Removed node
        node: NodeId,
        /// Connections removed by the cascade
        connections: Vec<ConnectionId>,
    },
    /// A wire was committed
    ConnectionAdded {
        /// New connection
        connection: Connection,
    },
    /// A wire was removed directly
    ConnectionRemoved {
        /// Removed connection
        connection: Connection,
    },
    /// Node properties were patched
    PropertyChanged {
        /// Patched node
        node: NodeId,
        /// The applied patch
        patch: IndexMap<String, PropValue>,
    },
    /// The canvas selection changed
    SelectionChanged {
        /// New selection
        selection: Selection,
    },
}

impl GraphEvent {
    /// Whether this event changes persisted graph state
    pub fn is_mutation(&self) -> bool {
        !matches!(self, Self::SelectionChanged { .. })
    }
}

/// Host-registered event handler
pub type EventHandler = Box<dyn FnMut(&GraphEvent)>;

/// Fan-out of queued events to subscribers
#[derive(Default)]
pub struct EventBus {
    subscribers: Vec<EventHandler>,
}

impl EventBus {
    /// Create a bus with no subscribers
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler; it sees every event dispatched afterwards
    pub fn subscribe(&mut self, handler: impl FnMut(&GraphEvent) + 'static) {
        self.subscribers.push(Box::new(handler));
    }

    /// Deliver events to every subscriber, in order
    pub fn dispatch(&mut self, events: &[GraphEvent]) {
        for event in events {
            for subscriber in &mut self.subscribers {
                subscriber(event);
            }
        }
    }

    /// Number of subscribers
    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    /// Whether nobody is subscribed
    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
