// SPDX-License-Identifier: MIT OR Apache-2.0
//! Graph data structure containing nodes and connections.
//!
//! Every mutation goes through [`Graph`], which validates it, applies it as a
//! single step and queues one [`GraphEvent`] describing it.

use crate::connection::{Connection, ConnectionId, Endpoint};
use crate::events::GraphEvent;
use crate::node::{Node, NodeDefinition, NodeId};
use crate::props::{PropValue, PropertyError};
use crate::socket::{SocketDirection, SocketId, SocketType};
use egui::{Pos2, Vec2};
use indexmap::IndexMap;

/// A blueprint graph
#[derive(Debug, Clone, Default)]
pub struct Graph {
    /// Nodes in the graph, in draw order
    nodes: IndexMap<NodeId, Node>,
    /// Connections between nodes
    connections: Vec<Connection>,
    /// Whether an input socket may receive more than one wire
    allow_fan_in: bool,
    /// Events not yet taken by the host
    events: Vec<GraphEvent>,
}

impl Graph {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Allow or forbid several wires into one input socket
    pub fn set_allow_fan_in(&mut self, allow: bool) {
        self.allow_fan_in = allow;
    }

    /// Whether fan-in is allowed
    pub fn allows_fan_in(&self) -> bool {
        self.allow_fan_in
    }

    /// Create a node from a definition and add it
    pub fn add_node(&mut self, definition: &NodeDefinition, position: Pos2) -> NodeId {
        self.insert_node(Node::new(definition, position))
    }

    /// Add an already built node
    pub fn insert_node(&mut self, node: Node) -> NodeId {
        let id = node.id;
        tracing::debug!(node = %id, node_type = %node.node_type, "node added");
        self.nodes.insert(id, node);
        self.events.push(GraphEvent::NodeAdded { node: id });
        id
    }

    /// Add a copy of a node, offset from the original
    pub fn duplicate_node(&mut self, node_id: NodeId, offset: Vec2) -> Result<NodeId, GraphError> {
        let node = self.nodes.get(&node_id).ok_or(GraphError::NodeNotFound(node_id))?;
        let copy = node.duplicate_at(node.position + offset);
        Ok(self.insert_node(copy))
    }

    /// Remove a node and, in the same step, every connection touching it
    pub fn remove_node(&mut self, node_id: NodeId) -> Result<Node, GraphError> {
        let node = self
            .nodes
            .shift_remove(&node_id)
            .ok_or(GraphError::NodeNotFound(node_id))?;

        let mut removed = Vec::new();
        self.connections.retain(|c| {
            if c.involves_node(node_id) {
                removed.push(c.id);
                false
            } else {
                true
            }
        });

        tracing::debug!(node = %node_id, cascaded = removed.len(), "node removed");
        self.events.push(GraphEvent::NodeRemoved {
            node: node_id,
            connections: removed,
        });
        Ok(node)
    }

    /// Move a node to a new graph-space position
    pub fn move_node(&mut self, node_id: NodeId, position: Pos2) -> Result<(), GraphError> {
        let node = self.nodes.get_mut(&node_id).ok_or(GraphError::NodeNotFound(node_id))?;
        if node.position == position {
            return Ok(());
        }
        node.position = position;
        self.events.push(GraphEvent::NodeMoved { node: node_id, position });
        Ok(())
    }

    /// Apply a partial property patch; keys not in the patch keep their values
    pub fn update_node_props(
        &mut self,
        node_id: NodeId,
        patch: IndexMap<String, PropValue>,
    ) -> Result<(), GraphError> {
        let node = self.nodes.get_mut(&node_id).ok_or(GraphError::NodeNotFound(node_id))?;
        node.props.apply_patch(&patch)?;
        tracing::debug!(node = %node_id, keys = patch.len(), "properties changed");
        self.events.push(GraphEvent::PropertyChanged { node: node_id, patch });
        Ok(())
    }

    /// Get a node by ID
    pub fn node(&self, node_id: NodeId) -> Option<&Node> {
        self.nodes.get(&node_id)
    }

    /// Get all nodes, in draw order
    pub fn nodes(&self) -> impl DoubleEndedIterator<Item = &Node> {
        self.nodes.values()
    }

    /// Get all node IDs
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    /// Get the number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Check whether a wire from `from` into `to` would be accepted
    pub fn validate_connection(&self, from: &Endpoint, to: &Endpoint) -> Result<(), ConnectionError> {
        let source = self.endpoint_socket(from)?;
        let target = self.endpoint_socket(to)?;

        if source.direction != SocketDirection::Output || target.direction != SocketDirection::Input {
            return Err(ConnectionError::IncompatibleSocketDirection {
                from: source.direction,
                to: target.direction,
            });
        }

        if !source.socket_type.can_connect_to(&target.socket_type) {
            return Err(ConnectionError::IncompatibleSocketType {
                from: source.socket_type.clone(),
                to: target.socket_type.clone(),
            });
        }

        if let Some(existing) = self.connections.iter().find(|c| {
            c.from_node == from.node
                && c.from_socket == from.socket
                && c.to_node == to.node
                && c.to_socket == to.socket
        }) {
            return Err(ConnectionError::DuplicateConnection(existing.id));
        }

        if !self.allow_fan_in && self.connections_to(to).next().is_some() {
            return Err(ConnectionError::InputAlreadyConnected {
                node: to.node,
                socket: to.socket.clone(),
            });
        }

        Ok(())
    }

    /// Add a connection between sockets.
    ///
    /// A rejected connection leaves the graph unchanged.
    pub fn add_connection(&mut self, from: Endpoint, to: Endpoint) -> Result<Connection, ConnectionError> {
        self.insert_connection(Connection::new(from, to))
    }

    /// Add an already built connection, keeping its ID
    pub fn insert_connection(&mut self, connection: Connection) -> Result<Connection, ConnectionError> {
        if let Err(err) = self.validate_connection(&connection.from(), &connection.to()) {
            tracing::warn!(error = %err, "connection rejected");
            return Err(err);
        }

        tracing::debug!(
            from = %connection.from_node,
            to = %connection.to_node,
            "connection added"
        );
        self.connections.push(connection.clone());
        self.events.push(GraphEvent::ConnectionAdded {
            connection: connection.clone(),
        });
        Ok(connection)
    }

    /// Remove a connection
    pub fn remove_connection(&mut self, connection_id: ConnectionId) -> Result<Connection, GraphError> {
        let index = self
            .connections
            .iter()
            .position(|c| c.id == connection_id)
            .ok_or(GraphError::ConnectionNotFound(connection_id))?;
        let connection = self.connections.remove(index);
        tracing::debug!(connection = ?connection_id, "connection removed");
        self.events.push(GraphEvent::ConnectionRemoved {
            connection: connection.clone(),
        });
        Ok(connection)
    }

    /// Get a connection by ID
    pub fn connection(&self, connection_id: ConnectionId) -> Option<&Connection> {
        self.connections.iter().find(|c| c.id == connection_id)
    }

    /// Get all connections, in creation order
    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.connections.iter()
    }

    /// Get connections ending at an input socket
    pub fn connections_to<'a>(&'a self, to: &'a Endpoint) -> impl Iterator<Item = &'a Connection> {
        self.connections
            .iter()
            .filter(move |c| c.to_node == to.node && c.to_socket == to.socket)
    }

    /// Get connections leaving an output socket
    pub fn connections_from<'a>(&'a self, from: &'a Endpoint) -> impl Iterator<Item = &'a Connection> {
        self.connections
            .iter()
            .filter(move |c| c.from_node == from.node && c.from_socket == from.socket)
    }

    /// Get connections involving a node
    pub fn connections_for_node(&self, node_id: NodeId) -> impl Iterator<Item = &Connection> {
        self.connections.iter().filter(move |c| c.involves_node(node_id))
    }

    /// Get the number of connections
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Take all queued events, oldest first
    pub fn drain_events(&mut self) -> Vec<GraphEvent> {
        std::mem::take(&mut self.events)
    }

    /// Drop queued events without delivering them
    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    pub(crate) fn emit(&mut self, event: GraphEvent) {
        self.events.push(event);
    }

    fn endpoint_socket(&self, endpoint: &Endpoint) -> Result<&crate::socket::Socket, ConnectionError> {
        self.nodes
            .get(&endpoint.node)
            .and_then(|n| n.socket(&endpoint.socket))
            .ok_or_else(|| ConnectionError::UnknownEndpoint {
                node: endpoint.node,
                socket: endpoint.socket.clone(),
            })
    }
}

/// Reason a connection was rejected
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConnectionError {
    /// Wire does not run from an output into an input
    #[error("Incompatible socket directions: {from:?} -> {to:?}")]
    IncompatibleSocketDirection {
        /// Direction of the source socket
        from: SocketDirection,
        /// Direction of the target socket
        to: SocketDirection,
    },

    /// Socket type tags do not match
    #[error("Incompatible socket types: {from} -> {to}")]
    IncompatibleSocketType {
        /// Source tag
        from: SocketType,
        /// Target tag
        to: SocketType,
    },

    /// Same four endpoints are already connected
    #[error("Duplicate connection: {0:?}")]
    DuplicateConnection(ConnectionId),

    /// Node or socket does not exist
    #[error("Unknown endpoint: {node}/{socket}")]
    UnknownEndpoint {
        /// Node ID
        node: NodeId,
        /// Socket ID
        socket: SocketId,
    },

    /// Input already has a wire and fan-in is disabled
    #[error("Input already connected: {node}/{socket}")]
    InputAlreadyConnected {
        /// Node ID
        node: NodeId,
        /// Socket ID
        socket: SocketId,
    },
}

/// Error from a graph operation
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// Node not found
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    /// Connection not found
    #[error("Connection not found: {0:?}")]
    ConnectionNotFound(ConnectionId),

    /// Catalog has no such node type
    #[error("Unknown node type: {0}")]
    UnknownNodeType(String),

    /// Connection rejected
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    /// Property patch rejected
    #[error(transparent)]
    Property(#[from] PropertyError),

    /// Malformed JSON
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Snapshot breaks a graph invariant
    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeKind;
    use crate::props::PropShape;
    use crate::socket::Socket;

    fn start_def() -> NodeDefinition {
        NodeDefinition::new("Start", "Start", "Events", NodeKind::Event)
            .with_output(Socket::output("exec_out", "Exec", SocketType::Exec))
    }

    fn print_def() -> NodeDefinition {
        NodeDefinition::new("Print", "Print", "Debug", NodeKind::Exec)
            .with_input(Socket::input("exec_in", "Exec", SocketType::Exec))
            .with_input(Socket::input("message_in", "Message", SocketType::String))
            .with_output(Socket::output("exec_out", "Exec", SocketType::Exec))
            .with_props(PropShape::Message)
    }

    fn float_def() -> NodeDefinition {
        NodeDefinition::new("FloatConstant", "Float", "Constants", NodeKind::Data)
            .with_output(Socket::output("value_out", "Value", SocketType::Float))
            .with_props(PropShape::FloatValue)
    }

    #[test]
    fn test_connect_exec_output_to_exec_input() {
        let mut graph = Graph::new();
        let start = graph.add_node(&start_def(), Pos2::ZERO);
        let print = graph.add_node(&print_def(), Pos2::new(300.0, 0.0));

        let conn = graph
            .add_connection(Endpoint::new(start, "exec_out"), Endpoint::new(print, "exec_in"))
            .unwrap();
        assert_eq!(conn.from_node, start);
        assert_eq!(graph.connection_count(), 1);
    }

    #[test]
    fn test_rejections_leave_graph_unchanged() {
        let mut graph = Graph::new();
        let start = graph.add_node(&start_def(), Pos2::ZERO);
        let print = graph.add_node(&print_def(), Pos2::new(300.0, 0.0));
        let value = graph.add_node(&float_def(), Pos2::new(0.0, 200.0));
        graph.drain_events();

        let cases = [
            (
                Endpoint::new(print, "exec_in"),
                Endpoint::new(start, "exec_out"),
                "direction",
            ),
            (
                Endpoint::new(value, "value_out"),
                Endpoint::new(print, "message_in"),
                "type",
            ),
            (
                Endpoint::new(start, "exec_out"),
                Endpoint::new(print, "missing"),
                "unknown",
            ),
            (
                Endpoint::new(NodeId::new(), "exec_out"),
                Endpoint::new(print, "exec_in"),
                "unknown",
            ),
        ];

        for (from, to, expected) in cases {
            let err = graph.add_connection(from, to).unwrap_err();
            let kind = match err {
                ConnectionError::IncompatibleSocketDirection { .. } => "direction",
                ConnectionError::IncompatibleSocketType { .. } => "type",
                ConnectionError::UnknownEndpoint { .. } => "unknown",
                _ => "other",
            };
            assert_eq!(kind, expected);
        }

        assert_eq!(graph.connection_count(), 0);
        assert!(graph.drain_events().is_empty());
    }

    #[test]
    fn test_duplicate_connection_rejected() {
        let mut graph = Graph::new();
        graph.set_allow_fan_in(true);
        let start = graph.add_node(&start_def(), Pos2::ZERO);
        let print = graph.add_node(&print_def(), Pos2::new(300.0, 0.0));

        let first = graph
            .add_connection(Endpoint::new(start, "exec_out"), Endpoint::new(print, "exec_in"))
            .unwrap();
        let err = graph
            .add_connection(Endpoint::new(start, "exec_out"), Endpoint::new(print, "exec_in"))
            .unwrap_err();
        assert_eq!(err, ConnectionError::DuplicateConnection(first.id));
        assert_eq!(graph.connection_count(), 1);
    }

    #[test]
    fn test_fan_in_disabled_by_default_fan_out_allowed() {
        let mut graph = Graph::new();
        let start_a = graph.add_node(&start_def(), Pos2::ZERO);
        let start_b = graph.add_node(&start_def(), Pos2::new(0.0, 100.0));
        let print_a = graph.add_node(&print_def(), Pos2::new(300.0, 0.0));
        let print_b = graph.add_node(&print_def(), Pos2::new(300.0, 100.0));

        graph
            .add_connection(Endpoint::new(start_a, "exec_out"), Endpoint::new(print_a, "exec_in"))
            .unwrap();
        // Fan-out from the same output
        graph
            .add_connection(Endpoint::new(start_a, "exec_out"), Endpoint::new(print_b, "exec_in"))
            .unwrap();
        // Fan-in into an occupied input
        let err = graph
            .add_connection(Endpoint::new(start_b, "exec_out"), Endpoint::new(print_a, "exec_in"))
            .unwrap_err();
        assert!(matches!(err, ConnectionError::InputAlreadyConnected { .. }));

        graph.set_allow_fan_in(true);
        graph
            .add_connection(Endpoint::new(start_b, "exec_out"), Endpoint::new(print_a, "exec_in"))
            .unwrap();
        assert_eq!(graph.connection_count(), 3);
    }

    #[test]
    fn test_cascade_delete() {
        let mut graph = Graph::new();
        graph.set_allow_fan_in(true);
        let start = graph.add_node(&start_def(), Pos2::ZERO);
        let print_a = graph.add_node(&print_def(), Pos2::new(300.0, 0.0));
        let print_b = graph.add_node(&print_def(), Pos2::new(600.0, 0.0));

        graph
            .add_connection(Endpoint::new(start, "exec_out"), Endpoint::new(print_a, "exec_in"))
            .unwrap();
        graph
            .add_connection(Endpoint::new(print_a, "exec_out"), Endpoint::new(print_b, "exec_in"))
            .unwrap();
        graph
            .add_connection(Endpoint::new(start, "exec_out"), Endpoint::new(print_b, "exec_in"))
            .unwrap();
        graph.drain_events();

        let m = graph.connection_count();
        let k = graph.connections_for_node(print_a).count();
        let n = graph.node_count();

        graph.remove_node(print_a).unwrap();

        assert_eq!(graph.connection_count(), m - k);
        assert_eq!(graph.node_count(), n - 1);
        assert!(graph.connections().all(|c| !c.involves_node(print_a)));

        // One notification for the whole cascade
        let events = graph.drain_events();
        assert_eq!(events.len(), 1);
        match &events[0] {
            GraphEvent::NodeRemoved { node, connections } => {
                assert_eq!(*node, print_a);
                assert_eq!(connections.len(), k);
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn test_update_props_partial_patch() {
        let mut graph = Graph::new();
        let print = graph.add_node(&print_def(), Pos2::ZERO);
        let mut patch = IndexMap::new();
        patch.insert("message".to_string(), PropValue::String("hi".into()));
        graph.update_node_props(print, patch).unwrap();
        assert_eq!(
            graph.node(print).unwrap().props.get("message"),
            Some(PropValue::String("hi".into()))
        );

        let mut bad = IndexMap::new();
        bad.insert("nope".to_string(), PropValue::Bool(true));
        assert!(matches!(
            graph.update_node_props(print, bad),
            Err(GraphError::Property(PropertyError::UnknownProperty(_)))
        ));
    }

    #[test]
    fn test_move_and_missing_node() {
        let mut graph = Graph::new();
        let start = graph.add_node(&start_def(), Pos2::ZERO);
        graph.drain_events();

        graph.move_node(start, Pos2::new(5.0, 6.0)).unwrap();
        graph.move_node(start, Pos2::new(5.0, 6.0)).unwrap();
        assert_eq!(graph.drain_events().len(), 1);

        let missing = NodeId::new();
        assert!(matches!(
            graph.move_node(missing, Pos2::ZERO),
            Err(GraphError::NodeNotFound(id)) if id == missing
        ));
        assert!(graph.remove_node(missing).is_err());
    }

    #[test]
    fn test_remove_connection() {
        let mut graph = Graph::new();
        let start = graph.add_node(&start_def(), Pos2::ZERO);
        let print = graph.add_node(&print_def(), Pos2::new(300.0, 0.0));
        let conn = graph
            .add_connection(Endpoint::new(start, "exec_out"), Endpoint::new(print, "exec_in"))
            .unwrap();

        let removed = graph.remove_connection(conn.id).unwrap();
        assert_eq!(removed.id, conn.id);
        assert_eq!(graph.connection_count(), 0);
        assert!(graph.remove_connection(conn.id).is_err());
    }
}
