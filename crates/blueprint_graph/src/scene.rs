// SPDX-License-Identifier: MIT OR Apache-2.0
//! Full-canvas render pass.
//!
//! [`render_scene`] is a pure function of the graph, the selection and the
//! active wire gesture. Calling it twice on unchanged state yields equal
//! scenes, so hosts may re-render every frame.

use crate::controller::WireDrag;
use crate::events::Selection;
use crate::graph::Graph;
use crate::render::{anchor_for, render_node, NodeVisual};
use crate::socket::SocketDirection;
use crate::wire::{WireRouter, WireVisual};
use egui::Pos2;

/// Text shown on an empty canvas
pub const EMPTY_PLACEHOLDER: &str = "Drag nodes from palette";

/// Everything the canvas draws, in graph space
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasScene {
    /// Nodes in draw order (last is topmost)
    pub nodes: Vec<NodeVisual>,
    /// Committed wires
    pub wires: Vec<WireVisual>,
    /// Wire following the pointer during a connect gesture
    pub floating_wire: Option<WireVisual>,
    /// Hint for an empty graph
    pub placeholder: Option<&'static str>,
}

impl CanvasScene {
    /// Topmost node under a graph point
    pub fn node_at(&self, point: Pos2) -> Option<&NodeVisual> {
        self.nodes.iter().rev().find(|n| n.contains(point))
    }
}

/// Lay out the whole canvas
pub fn render_scene(
    graph: &Graph,
    selection: Selection,
    router: &WireRouter,
    wire_drag: Option<&WireDrag>,
) -> CanvasScene {
    let nodes = graph
        .nodes()
        .map(|node| render_node(node, selection.node() == Some(node.id)))
        .collect();

    let wires = graph
        .connections()
        .filter_map(|c| router.route_connection(graph, c, selection.connection() == Some(c.id)))
        .collect();

    let floating_wire = wire_drag.and_then(|drag| {
        let node = graph.node(drag.from.node)?;
        let anchor = anchor_for(node, &drag.from.socket)?;
        Some(match drag.direction {
            SocketDirection::Output => router.route(anchor, drag.floating, &drag.socket_type),
            SocketDirection::Input => router.route(drag.floating, anchor, &drag.socket_type),
        })
    });

    CanvasScene {
        nodes,
        wires,
        floating_wire,
        placeholder: graph.is_empty().then_some(EMPTY_PLACEHOLDER),
    }
}
