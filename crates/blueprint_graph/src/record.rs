// SPDX-License-Identifier: MIT OR Apache-2.0
//! Persisted graph shape.
//!
//! ```json
//! { "nodes": { "<id>": NodeRecord }, "connections": [ConnectionRecord] }
//! ```
//!
//! Field names are fixed; external persistence reads and writes this shape
//! verbatim.

use crate::connection::Connection;
use crate::graph::{Graph, GraphError};
use crate::node::{Node, NodeCatalog, NodeId, NodeKind};
use crate::props::{NodeProps, PropShape, PropValue};
use crate::socket::{Socket, SocketDirection};
use egui::Pos2;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Serialized node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRecord {
    /// Node ID, same as its key in the node map
    pub id: NodeId,
    /// Definition type
    #[serde(rename = "type")]
    pub node_type: String,
    /// Top-left corner (graph space)
    pub position: Pos2,
    /// Input sockets
    #[serde(default)]
    pub inputs: Vec<Socket>,
    /// Output sockets
    #[serde(default)]
    pub outputs: Vec<Socket>,
    /// Property values
    #[serde(default)]
    pub props: IndexMap<String, PropValue>,
    /// Node variant
    #[serde(default, rename = "nodeType")]
    pub kind: NodeKind,
    /// Display title
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,
}

/// Serialized connection
pub type ConnectionRecord = Connection;

/// Serialized graph
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphRecord {
    /// Nodes by ID
    pub nodes: IndexMap<NodeId, NodeRecord>,
    /// Connections in creation order
    #[serde(default)]
    pub connections: Vec<ConnectionRecord>,
}

impl From<&Node> for NodeRecord {
    fn from(node: &Node) -> Self {
        Self {
            id: node.id,
            node_type: node.node_type.clone(),
            position: node.position,
            inputs: node.inputs.clone(),
            outputs: node.outputs.clone(),
            props: node.props.to_map(),
            kind: node.kind,
            title: node.title.clone(),
        }
    }
}

impl From<&Graph> for GraphRecord {
    fn from(graph: &Graph) -> Self {
        Self {
            nodes: graph.nodes().map(|n| (n.id, NodeRecord::from(n))).collect(),
            connections: graph.connections().cloned().collect(),
        }
    }
}

impl GraphRecord {
    /// Parse the JSON shape
    pub fn from_json(json: &str) -> Result<Self, GraphError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Write the JSON shape
    pub fn to_json(&self) -> Result<String, GraphError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Rebuild a graph, rejecting records that break graph invariants.
    ///
    /// Property shapes come from the catalog; types it does not know keep
    /// their props as a custom map. Fan-in present in the record is kept,
    /// the returned graph then forbids new fan-in until configured
    /// otherwise. No events are queued.
    pub fn into_graph(self, catalog: &NodeCatalog) -> Result<Graph, GraphError> {
        let mut graph = Graph::new();
        graph.set_allow_fan_in(true);

        for (key, record) in self.nodes {
            if key != record.id {
                return Err(GraphError::InvalidSnapshot(format!(
                    "node key {key} does not match id {}",
                    record.id
                )));
            }
            graph.insert_node(node_from_record(record, catalog)?);
        }

        let mut seen = HashSet::new();
        for connection in self.connections {
            if !seen.insert(connection.id) {
                return Err(GraphError::InvalidSnapshot(format!(
                    "duplicate connection id {}",
                    connection.id.0
                )));
            }
            let id = connection.id;
            graph
                .insert_connection(connection)
                .map_err(|err| GraphError::InvalidSnapshot(format!("connection {}: {err}", id.0)))?;
        }

        graph.set_allow_fan_in(false);
        graph.clear_events();
        Ok(graph)
    }
}

fn node_from_record(record: NodeRecord, catalog: &NodeCatalog) -> Result<Node, GraphError> {
    let mut seen = HashSet::new();
    for socket in record.inputs.iter().chain(&record.outputs) {
        if !seen.insert(socket.id.as_str()) {
            return Err(GraphError::InvalidSnapshot(format!(
                "node {} repeats socket {}",
                record.id, socket.id
            )));
        }
    }
    let misplaced = record
        .inputs
        .iter()
        .any(|s| s.direction != SocketDirection::Input)
        || record.outputs.iter().any(|s| s.direction != SocketDirection::Output);
    if misplaced {
        return Err(GraphError::InvalidSnapshot(format!(
            "node {} lists a socket on the wrong side",
            record.id
        )));
    }

    let definition = catalog.get(&record.node_type);
    let shape = definition.map_or(PropShape::Custom, |d| d.props);
    let props = NodeProps::from_map(shape, &record.props)?;
    let title = if !record.title.is_empty() {
        record.title
    } else {
        definition.map_or_else(|| record.node_type.clone(), |d| d.title.clone())
    };

    Ok(Node {
        id: record.id,
        node_type: record.node_type,
        title,
        kind: record.kind,
        position: record.position,
        inputs: record.inputs,
        outputs: record.outputs,
        props,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::Endpoint;
    use crate::library::create_gameplay_catalog;

    fn sample() -> (Graph, NodeId, NodeId) {
        let catalog = create_gameplay_catalog();
        let mut graph = Graph::new();
        let start = graph.add_node(catalog.get("Start").unwrap(), Pos2::new(10.0, 20.0));
        let print = graph.add_node(catalog.get("Print").unwrap(), Pos2::new(300.0, 20.0));
        graph
            .add_connection(Endpoint::new(start, "exec_out"), Endpoint::new(print, "exec_in"))
            .unwrap();
        let mut patch = IndexMap::new();
        patch.insert("message".to_string(), PropValue::String("Hello".into()));
        graph.update_node_props(print, patch).unwrap();
        (graph, start, print)
    }

    #[test]
    fn test_json_field_names() {
        let (graph, start, print) = sample();
        let json = GraphRecord::from(&graph).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        let node = &value["nodes"][print.to_string()];
        assert_eq!(node["type"], "Print");
        assert_eq!(node["nodeType"], "exec");
        assert_eq!(node["position"]["x"], 300.0);
        assert_eq!(node["props"]["message"], "Hello");
        assert_eq!(node["inputs"][0]["type"], "exec");
        assert_eq!(node["inputs"][0]["direction"], "input");

        let conn = &value["connections"][0];
        assert_eq!(conn["fromNode"], start.to_string());
        assert_eq!(conn["fromSocket"], "exec_out");
        assert_eq!(conn["toSocket"], "exec_in");
    }

    #[test]
    fn test_reload_preserves_graph() {
        let (graph, _, print) = sample();
        let json = GraphRecord::from(&graph).to_json().unwrap();
        let loaded = GraphRecord::from_json(&json)
            .unwrap()
            .into_graph(&create_gameplay_catalog())
            .unwrap();

        assert_eq!(loaded.node_count(), 2);
        assert_eq!(loaded.connection_count(), 1);
        assert_eq!(loaded.node(print), graph.node(print));
        assert_eq!(
            loaded.connections().next().map(|c| c.id),
            graph.connections().next().map(|c| c.id)
        );
        assert!(!loaded.allows_fan_in());
    }

    #[test]
    fn test_dangling_connection_rejected() {
        let (graph, _, print) = sample();
        let mut record = GraphRecord::from(&graph);
        record.nodes.shift_remove(&print);
        assert!(matches!(
            record.into_graph(&create_gameplay_catalog()),
            Err(GraphError::InvalidSnapshot(_))
        ));
    }

    #[test]
    fn test_reversed_connection_rejected() {
        let (graph, start, print) = sample();
        let mut record = GraphRecord::from(&graph);
        record.connections.push(Connection::new(
            Endpoint::new(print, "exec_in"),
            Endpoint::new(start, "exec_out"),
        ));
        assert!(matches!(
            record.into_graph(&create_gameplay_catalog()),
            Err(GraphError::InvalidSnapshot(_))
        ));
    }

    #[test]
    fn test_mismatched_key_rejected() {
        let (graph, _, print) = sample();
        let mut record = GraphRecord::from(&graph);
        if let Some(node) = record.nodes.get_mut(&print) {
            node.id = NodeId::new();
        }
        assert!(matches!(
            record.into_graph(&create_gameplay_catalog()),
            Err(GraphError::InvalidSnapshot(_))
        ));
    }

    #[test]
    fn test_unknown_type_keeps_custom_props() {
        let id = NodeId::new();
        let json = format!(
            r#"{{"nodes": {{"{id}": {{"id": "{id}", "type": "Spawner", "position": {{"x": 1, "y": 2}},
                "props": {{"prefab": "Enemy", "count": 3}}, "nodeType": "data"}}}},
               "connections": []}}"#
        );
        let mut graph = GraphRecord::from_json(&json)
            .unwrap()
            .into_graph(&create_gameplay_catalog())
            .unwrap();
        assert!(graph.drain_events().is_empty());
        let node = graph.node(id).unwrap();
        assert_eq!(node.title, "Spawner");
        assert_eq!(node.kind, NodeKind::Data);
        assert_eq!(node.props.get("count"), Some(PropValue::Int(3)));
    }

    #[test]
    fn test_schemaless_props_survive_reload() {
        let id = NodeId::new();
        let json = format!(
            r#"{{"nodes": {{"{id}": {{"id": "{id}", "type": "Spawner", "position": {{"x": 0, "y": 0}},
                "props": {{"target": null, "tags": ["a", "b"], "wave": {{"size": 4}}}}, "nodeType": "default"}}}},
               "connections": []}}"#
        );
        let catalog = create_gameplay_catalog();
        let graph = GraphRecord::from_json(&json).unwrap().into_graph(&catalog).unwrap();
        let node = graph.node(id).unwrap();
        assert_eq!(node.props.get("target"), Some(PropValue::Json(serde_json::Value::Null)));

        let saved = GraphRecord::from(&graph).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&saved).unwrap();
        let props = &value["nodes"][id.to_string()]["props"];
        assert_eq!(props["target"], serde_json::Value::Null);
        assert_eq!(props["tags"], serde_json::json!(["a", "b"]));
        assert_eq!(props["wave"]["size"], 4);

        let reloaded = GraphRecord::from_json(&saved).unwrap().into_graph(&catalog).unwrap();
        assert_eq!(reloaded.node(id), graph.node(id));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            GraphRecord::from_json("{\"nodes\": 3}"),
            Err(GraphError::Serialization(_))
        ));
    }
}
