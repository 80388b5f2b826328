// SPDX-License-Identifier: MIT OR Apache-2.0
//! Blueprint graph editor core.
//!
//! A typed node graph for visual gameplay scripting, with an interactive
//! pan/zoom canvas on top:
//! - Typed input/output sockets and connection validation
//! - Deterministic node layout and socket anchoring
//! - Bezier wire routing and hit-testing
//! - A gesture state machine for placing, dragging, connecting and deleting
//! - A searchable node palette and a property inspector
//!
//! ## Architecture
//!
//! The host constructs a [`GraphEditorSession`] from a graph snapshot, a
//! [`NodeCatalog`] and the canvas size, then feeds it input. Every mutation
//! goes through [`Graph`], which queues a [`GraphEvent`]; the session
//! delivers queued events to subscribers after each call. Drawing uses
//! [`render_scene`], a pure function of the current state. The [`ui`]
//! module paints scenes and forwards input with egui.

pub mod config;
pub mod connection;
pub mod controller;
pub mod events;
pub mod graph;
pub mod inspector;
pub mod library;
pub mod node;
pub mod palette;
pub mod props;
pub mod record;
pub mod render;
pub mod scene;
pub mod session;
pub mod socket;
pub mod ui;
pub mod viewport;
pub mod wire;

pub use config::{ConfigError, EditorConfig};
pub use connection::{Connection, ConnectionId, Endpoint};
pub use controller::{CanvasController, CanvasHit, InteractionMode, WireDrag};
pub use events::{EventBus, GraphEvent, Selection};
pub use graph::{ConnectionError, Graph, GraphError};
pub use inspector::{Inspector, PropertyField};
pub use library::create_gameplay_catalog;
pub use node::{Node, NodeCatalog, NodeDefinition, NodeId, NodeKind};
pub use palette::{NodePalette, PlacementIntent};
pub use props::{NodeProps, PropKind, PropShape, PropValue, PropertyError};
pub use record::{ConnectionRecord, GraphRecord, NodeRecord};
pub use render::{render_node, NodeVisual, SocketAnchor};
pub use scene::{render_scene, CanvasScene};
pub use session::{GraphEditorSession, SaveStatus};
pub use socket::{Socket, SocketDirection, SocketId, SocketType};
pub use viewport::{ViewportTransform, ZoomAnchor};
pub use wire::{WirePath, WireRouter, WireVisual};
