// SPDX-License-Identifier: MIT OR Apache-2.0
//! Connection (wire) definitions for the graph.

use crate::node::NodeId;
use crate::socket::SocketId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(pub Uuid);

impl ConnectionId {
    /// Create a new random connection ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

/// One end of a connection
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint {
    /// Node ID
    pub node: NodeId,
    /// Socket ID within the node
    pub socket: SocketId,
}

impl Endpoint {
    /// Create an endpoint
    pub fn new(node: NodeId, socket: impl Into<SocketId>) -> Self {
        Self {
            node,
            socket: socket.into(),
        }
    }
}

/// A directed wire from an output socket to an input socket.
///
/// Serialized field names match the persisted graph shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    /// Unique connection ID
    pub id: ConnectionId,
    /// Source node ID
    pub from_node: NodeId,
    /// Source socket ID
    pub from_socket: SocketId,
    /// Target node ID
    pub to_node: NodeId,
    /// Target socket ID
    pub to_socket: SocketId,
}

impl Connection {
    /// Create a new connection
    pub fn new(from: Endpoint, to: Endpoint) -> Self {
        Self {
            id: ConnectionId::new(),
            from_node: from.node,
            from_socket: from.socket,
            to_node: to.node,
            to_socket: to.socket,
        }
    }

    /// Source endpoint
    pub fn from(&self) -> Endpoint {
        Endpoint::new(self.from_node, self.from_socket.clone())
    }

    /// Target endpoint
    pub fn to(&self) -> Endpoint {
        Endpoint::new(self.to_node, self.to_socket.clone())
    }

    /// Check if this connection involves a specific node
    pub fn involves_node(&self, node_id: NodeId) -> bool {
        self.from_node == node_id || self.to_node == node_id
    }

    /// Check if both connections join the same four endpoints
    pub fn same_endpoints(&self, other: &Connection) -> bool {
        self.from_node == other.from_node
            && self.from_socket == other.from_socket
            && self.to_node == other.to_node
            && self.to_socket == other.to_socket
    }
}
