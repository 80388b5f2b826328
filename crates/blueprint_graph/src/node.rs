// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node definitions and the node catalog.

use crate::props::{NodeProps, PropShape};
use crate::socket::{Socket, SocketId};
use egui::Pos2;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub Uuid);

impl NodeId {
    /// Create a new random node ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Visual/behavioral variant of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// Participates in execution flow
    Exec,
    /// Pure data node
    Data,
    /// Event entry point
    Event,
    /// Anything else
    #[default]
    Default,
}

/// Node type definition, as listed in the palette
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDefinition {
    /// Unique type identifier (e.g. `Print`)
    #[serde(rename = "type")]
    pub node_type: String,
    /// Display title
    pub title: String,
    /// Palette category
    pub category: String,
    /// Optional icon name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Optional description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Node variant
    #[serde(default, rename = "nodeType")]
    pub kind: NodeKind,
    /// Input sockets, in display order
    #[serde(default)]
    pub inputs: Vec<Socket>,
    /// Output sockets, in display order
    #[serde(default)]
    pub outputs: Vec<Socket>,
    /// Property schema
    #[serde(default)]
    pub props: PropShape,
}

impl NodeDefinition {
    /// Start a definition with no sockets and no properties
    pub fn new(
        node_type: impl Into<String>,
        title: impl Into<String>,
        category: impl Into<String>,
        kind: NodeKind,
    ) -> Self {
        Self {
            node_type: node_type.into(),
            title: title.into(),
            category: category.into(),
            icon: None,
            description: None,
            kind,
            inputs: Vec::new(),
            outputs: Vec::new(),
            props: PropShape::None,
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the icon
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Append an input socket
    pub fn with_input(mut self, socket: Socket) -> Self {
        self.inputs.push(socket);
        self
    }

    /// Append an output socket
    pub fn with_output(mut self, socket: Socket) -> Self {
        self.outputs.push(socket);
        self
    }

    /// Set the property schema
    pub fn with_props(mut self, props: PropShape) -> Self {
        self.props = props;
        self
    }
}

/// A node instance in the graph
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Unique instance ID
    pub id: NodeId,
    /// Definition type (e.g. `Print`)
    pub node_type: String,
    /// Display title
    pub title: String,
    /// Node variant
    pub kind: NodeKind,
    /// Top-left corner in graph space
    pub position: Pos2,
    /// Input sockets
    pub inputs: Vec<Socket>,
    /// Output sockets
    pub outputs: Vec<Socket>,
    /// Property values
    pub props: NodeProps,
}

impl Node {
    /// Create a new node from a definition
    pub fn new(definition: &NodeDefinition, position: Pos2) -> Self {
        Self {
            id: NodeId::new(),
            node_type: definition.node_type.clone(),
            title: definition.title.clone(),
            kind: definition.kind,
            position,
            inputs: definition.inputs.clone(),
            outputs: definition.outputs.clone(),
            props: NodeProps::defaults(definition.props),
        }
    }

    /// Copy of this node with a fresh ID at another position
    pub fn duplicate_at(&self, position: Pos2) -> Self {
        Self {
            id: NodeId::new(),
            position,
            ..self.clone()
        }
    }

    /// Get an input socket by ID
    pub fn input(&self, socket_id: &SocketId) -> Option<&Socket> {
        self.inputs.iter().find(|s| s.id == *socket_id)
    }

    /// Get an output socket by ID
    pub fn output(&self, socket_id: &SocketId) -> Option<&Socket> {
        self.outputs.iter().find(|s| s.id == *socket_id)
    }

    /// Get a socket by ID, inputs first
    pub fn socket(&self, socket_id: &SocketId) -> Option<&Socket> {
        self.input(socket_id).or_else(|| self.output(socket_id))
    }

    /// Get all sockets
    pub fn sockets(&self) -> impl Iterator<Item = &Socket> {
        self.inputs.iter().chain(self.outputs.iter())
    }
}

/// Catalog of available node types
#[derive(Debug, Clone, Default)]
pub struct NodeCatalog {
    /// Registered definitions by type
    definitions: IndexMap<String, NodeDefinition>,
}

impl NodeCatalog {
    /// Create a new empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from a list of definitions; later duplicates win
    pub fn from_definitions(definitions: impl IntoIterator<Item = NodeDefinition>) -> Self {
        let mut catalog = Self::new();
        for definition in definitions {
            catalog.register(definition);
        }
        catalog
    }

    /// Parse a catalog supplied by the host as a JSON array
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let definitions: Vec<NodeDefinition> = serde_json::from_str(json)?;
        Ok(Self::from_definitions(definitions))
    }

    /// Register a node definition
    pub fn register(&mut self, definition: NodeDefinition) {
        self.definitions.insert(definition.node_type.clone(), definition);
    }

    /// Get a definition by type
    pub fn get(&self, node_type: &str) -> Option<&NodeDefinition> {
        self.definitions.get(node_type)
    }

    /// All definitions in registration order
    pub fn definitions(&self) -> impl Iterator<Item = &NodeDefinition> {
        self.definitions.values()
    }

    /// Definitions in one category
    pub fn in_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a NodeDefinition> {
        self.definitions.values().filter(move |d| d.category == category)
    }

    /// Distinct categories, sorted
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = self.definitions.values().map(|d| d.category.as_str()).collect();
        categories.sort_unstable();
        categories.dedup();
        categories
    }

    /// Number of definitions
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Whether the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
