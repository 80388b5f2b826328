// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node layout: header, body and socket anchor geometry.
//!
//! Everything here is a pure function of the node (position and socket
//! order) and its selection flag, in graph space. The canvas maps the result
//! through the viewport when painting.

use crate::node::{Node, NodeId, NodeKind};
use crate::socket::{SocketDirection, SocketId, SocketType};
use egui::{Color32, Pos2, Rect, Vec2};

/// Node visual dimensions
pub const NODE_WIDTH: f32 = 180.0;
/// Height of the title bar
pub const NODE_HEADER_HEIGHT: f32 = 24.0;
/// Vertical slot per socket row
pub const SOCKET_ROW_HEIGHT: f32 = 22.0;
/// Radius of the drawn socket circle
pub const SOCKET_RADIUS: f32 = 6.0;
/// Padding below the last socket row
pub const NODE_BOTTOM_PADDING: f32 = 8.0;

const SELECTED_BORDER: Color32 = Color32::from_rgb(100, 150, 255);
const BORDER: Color32 = Color32::from_rgb(38, 41, 47);
const BODY: Color32 = Color32::from_rgb(45, 45, 48);
const BODY_SELECTED: Color32 = Color32::from_rgb(60, 70, 90);

/// Header color for a node variant
pub fn header_color(kind: NodeKind) -> Color32 {
    match kind {
        NodeKind::Exec => Color32::from_rgb(0x4A, 0x90, 0xE2),
        NodeKind::Data => Color32::from_rgb(0x7B, 0x68, 0xEE),
        NodeKind::Event => Color32::from_rgb(0xFF, 0xD7, 0x00),
        NodeKind::Default => Color32::from_rgb(0x5A, 0x62, 0x70),
    }
}

/// Full node rectangle in graph space
pub fn node_bounds(node: &Node) -> Rect {
    let rows = node.inputs.len().max(node.outputs.len());
    let height = NODE_HEADER_HEIGHT + rows as f32 * SOCKET_ROW_HEIGHT + NODE_BOTTOM_PADDING;
    Rect::from_min_size(node.position, Vec2::new(NODE_WIDTH, height))
}

/// Anchor of the `index`-th socket on one side of a node.
///
/// Inputs sit on the left edge, outputs on the right, one fixed row per
/// socket below the header.
pub fn socket_anchor(position: Pos2, direction: SocketDirection, index: usize) -> Pos2 {
    let x = match direction {
        SocketDirection::Input => position.x,
        SocketDirection::Output => position.x + NODE_WIDTH,
    };
    let y = position.y + NODE_HEADER_HEIGHT + index as f32 * SOCKET_ROW_HEIGHT + SOCKET_ROW_HEIGHT / 2.0;
    Pos2::new(x, y)
}

/// Anchor of a socket by ID, searching inputs then outputs
pub fn anchor_for(node: &Node, socket_id: &SocketId) -> Option<Pos2> {
    if let Some(i) = node.inputs.iter().position(|s| s.id == *socket_id) {
        return Some(socket_anchor(node.position, SocketDirection::Input, i));
    }
    node.outputs
        .iter()
        .position(|s| s.id == *socket_id)
        .map(|i| socket_anchor(node.position, SocketDirection::Output, i))
}

/// Anchor geometry of one socket
#[derive(Debug, Clone, PartialEq)]
pub struct SocketAnchor {
    /// Socket ID
    pub socket: SocketId,
    /// Socket label
    pub name: String,
    /// Side of the node
    pub direction: SocketDirection,
    /// Type tag (drives the color)
    pub socket_type: SocketType,
    /// Center in graph space
    pub position: Pos2,
}

/// Renderable geometry of a node
#[derive(Debug, Clone, PartialEq)]
pub struct NodeVisual {
    /// Node ID
    pub node: NodeId,
    /// Title shown in the header
    pub title: String,
    /// Header fill, keyed by variant
    pub header_color: Color32,
    /// Body fill
    pub body_color: Color32,
    /// Outline color
    pub border_color: Color32,
    /// Title bar rectangle
    pub header_bounds: Rect,
    /// Whole node rectangle
    pub body_bounds: Rect,
    /// Whether the node is selected
    pub selected: bool,
    /// Input anchors in socket order
    pub inputs: Vec<SocketAnchor>,
    /// Output anchors in socket order
    pub outputs: Vec<SocketAnchor>,
}

impl NodeVisual {
    /// Whether a graph point lies on the node
    pub fn contains(&self, point: Pos2) -> bool {
        self.body_bounds.contains(point)
    }

    /// Closest socket within `radius` of a graph point
    pub fn socket_at(&self, point: Pos2, radius: f32) -> Option<&SocketAnchor> {
        self.inputs
            .iter()
            .chain(self.outputs.iter())
            .map(|a| (a, a.position.distance(point)))
            .filter(|(_, d)| *d <= radius)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(a, _)| a)
    }

    /// All anchors, inputs first
    pub fn anchors(&self) -> impl Iterator<Item = &SocketAnchor> {
        self.inputs.iter().chain(self.outputs.iter())
    }
}

/// Lay out a node
pub fn render_node(node: &Node, is_selected: bool) -> NodeVisual {
    let body_bounds = node_bounds(node);
    let header_bounds = Rect::from_min_size(node.position, Vec2::new(NODE_WIDTH, NODE_HEADER_HEIGHT));

    let anchors = |direction: SocketDirection, sockets: &[crate::socket::Socket]| {
        sockets
            .iter()
            .enumerate()
            .map(|(i, s)| SocketAnchor {
                socket: s.id.clone(),
                name: s.name.clone(),
                direction,
                socket_type: s.socket_type.clone(),
                position: socket_anchor(node.position, direction, i),
            })
            .collect::<Vec<_>>()
    };

    NodeVisual {
        node: node.id,
        title: node.title.clone(),
        header_color: header_color(node.kind),
        body_color: if is_selected { BODY_SELECTED } else { BODY },
        border_color: if is_selected { SELECTED_BORDER } else { BORDER },
        header_bounds,
        body_bounds,
        selected: is_selected,
        inputs: anchors(SocketDirection::Input, node.inputs.as_slice()),
        outputs: anchors(SocketDirection::Output, node.outputs.as_slice()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeDefinition;
    use crate::socket::Socket;

    fn branch() -> Node {
        let def = NodeDefinition::new("Branch", "Branch", "Flow", NodeKind::Exec)
            .with_input(Socket::input("exec_in", "Exec", SocketType::Exec))
            .with_input(Socket::input("condition_in", "Condition", SocketType::Bool))
            .with_output(Socket::output("true_out", "True", SocketType::Exec))
            .with_output(Socket::output("false_out", "False", SocketType::Exec));
        Node::new(&def, Pos2::new(100.0, 50.0))
    }

    #[test]
    fn test_anchor_stability() {
        let node = branch();
        let first = render_node(&node, false);
        let second = render_node(&node, false);
        assert_eq!(first, second);

        let selected = render_node(&node, true);
        let positions = |v: &NodeVisual| v.anchors().map(|a| a.position).collect::<Vec<_>>();
        assert_eq!(positions(&first), positions(&selected));
    }

    #[test]
    fn test_anchor_slots() {
        let node = branch();
        let visual = render_node(&node, false);

        assert_eq!(visual.inputs[0].position, Pos2::new(100.0, 50.0 + 24.0 + 11.0));
        assert_eq!(visual.inputs[1].position, Pos2::new(100.0, 50.0 + 24.0 + 22.0 + 11.0));
        assert_eq!(visual.outputs[1].position, Pos2::new(280.0, 50.0 + 24.0 + 22.0 + 11.0));
        assert_eq!(
            anchor_for(&node, &SocketId::new("false_out")),
            Some(visual.outputs[1].position)
        );
        assert_eq!(anchor_for(&node, &SocketId::new("nope")), None);
    }

    #[test]
    fn test_anchors_follow_position_only() {
        let mut node = branch();
        let before = render_node(&node, false);
        node.position += Vec2::new(10.0, -5.0);
        let after = render_node(&node, false);
        for (a, b) in before.anchors().zip(after.anchors()) {
            assert_eq!(b.position - a.position, Vec2::new(10.0, -5.0));
        }
    }

    #[test]
    fn test_header_color_by_kind() {
        let kinds = [NodeKind::Exec, NodeKind::Data, NodeKind::Event, NodeKind::Default];
        for (i, a) in kinds.iter().enumerate() {
            for b in &kinds[i + 1..] {
                assert_ne!(header_color(*a), header_color(*b));
            }
        }
        assert_eq!(render_node(&branch(), false).header_color, header_color(NodeKind::Exec));
    }

    #[test]
    fn test_socket_hit() {
        let visual = render_node(&branch(), false);
        let near = visual.outputs[0].position + Vec2::new(3.0, 2.0);
        assert_eq!(
            visual.socket_at(near, 8.0).map(|a| a.socket.as_str()),
            Some("true_out")
        );
        assert!(visual.socket_at(Pos2::new(190.0, 60.0), 8.0).is_none());
        assert!(visual.contains(Pos2::new(190.0, 60.0)));
    }
}
