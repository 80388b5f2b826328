// SPDX-License-Identifier: MIT OR Apache-2.0
//! Wire routing, coloring and hit-testing.

use crate::connection::{Connection, ConnectionId};
use crate::graph::Graph;
use crate::render::anchor_for;
use crate::socket::SocketType;
use egui::{Color32, Pos2, Vec2};

/// Horizontal control-point offset (graph units)
pub const CURVE_FACTOR: f32 = 50.0;
/// Width of the visible stroke (graph units)
pub const WIRE_STROKE_WIDTH: f32 = 2.5;
/// Width of the invisible hit stroke (graph units)
pub const WIRE_HIT_WIDTH: f32 = 12.0;
/// Segments used to flatten a wire
pub const WIRE_SEGMENTS: usize = 32;

const SELECTED_WIRE: Color32 = Color32::WHITE;

/// Cubic Bezier between two socket anchors
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WirePath {
    /// Start (output anchor)
    pub from: Pos2,
    /// First control point
    pub control1: Pos2,
    /// Second control point
    pub control2: Pos2,
    /// End (input anchor)
    pub to: Pos2,
}

impl WirePath {
    /// Route from `from` to `to` with horizontal tangents.
    ///
    /// The offset does not depend on the vertical distance, so every wire
    /// gets the same S-curve.
    pub fn new(from: Pos2, to: Pos2, curve_factor: f32) -> Self {
        Self {
            from,
            control1: from + Vec2::new(curve_factor, 0.0),
            control2: to - Vec2::new(curve_factor, 0.0),
            to,
        }
    }

    /// Point on the curve at `t` in `[0, 1]`
    pub fn point_at(&self, t: f32) -> Pos2 {
        let mt = 1.0 - t;
        let a = mt * mt * mt;
        let b = 3.0 * mt * mt * t;
        let c = 3.0 * mt * t * t;
        let d = t * t * t;
        Pos2::new(
            a * self.from.x + b * self.control1.x + c * self.control2.x + d * self.to.x,
            a * self.from.y + b * self.control1.y + c * self.control2.y + d * self.to.y,
        )
    }

    /// Flatten into `segments + 1` points
    pub fn sample(&self, segments: usize) -> Vec<Pos2> {
        let segments = segments.max(1);
        (0..=segments)
            .map(|i| self.point_at(i as f32 / segments as f32))
            .collect()
    }

    /// Approximate distance from a point to the curve
    pub fn distance_to(&self, point: Pos2, segments: usize) -> f32 {
        self.sample(segments)
            .windows(2)
            .map(|w| distance_to_segment(point, w[0], w[1]))
            .fold(f32::INFINITY, f32::min)
    }
}

fn distance_to_segment(p: Pos2, a: Pos2, b: Pos2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_sq();
    if len_sq <= f32::EPSILON {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// Renderable wire
#[derive(Debug, Clone, PartialEq)]
pub struct WireVisual {
    /// Connection this wire draws; `None` for the wire being dragged
    pub connection: Option<ConnectionId>,
    /// Curve geometry (graph space)
    pub path: WirePath,
    /// Stroke color
    pub color: Color32,
    /// Visible stroke width
    pub stroke_width: f32,
    /// Invisible hit stroke width
    pub hit_width: f32,
}

impl WireVisual {
    /// Whether a graph point falls within the hit stroke
    pub fn hit(&self, point: Pos2) -> bool {
        self.path.distance_to(point, WIRE_SEGMENTS) <= self.hit_width / 2.0
    }

    /// Whether a graph point falls on the visible stroke
    pub fn on_visible_stroke(&self, point: Pos2) -> bool {
        self.path.distance_to(point, WIRE_SEGMENTS) <= self.stroke_width / 2.0
    }
}

/// Computes wire geometry and colors
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WireRouter {
    /// Horizontal control-point offset
    pub curve_factor: f32,
    /// Visible stroke width
    pub stroke_width: f32,
    /// Hit stroke width
    pub hit_width: f32,
}

impl WireRouter {
    /// Stroke color for a type tag
    pub fn color(socket_type: &SocketType) -> Color32 {
        socket_type.color()
    }

    /// Route a wire between two anchors
    pub fn route(&self, from: Pos2, to: Pos2, socket_type: &SocketType) -> WireVisual {
        WireVisual {
            connection: None,
            path: WirePath::new(from, to, self.curve_factor),
            color: Self::color(socket_type),
            stroke_width: self.stroke_width,
            hit_width: self.hit_width,
        }
    }

    /// Route a committed connection; `None` if an endpoint is missing
    pub fn route_connection(&self, graph: &Graph, connection: &Connection, selected: bool) -> Option<WireVisual> {
        let from_node = graph.node(connection.from_node)?;
        let to_node = graph.node(connection.to_node)?;
        let socket = from_node.output(&connection.from_socket)?;
        let from = anchor_for(from_node, &connection.from_socket)?;
        let to = anchor_for(to_node, &connection.to_socket)?;

        let mut wire = self.route(from, to, &socket.socket_type);
        wire.connection = Some(connection.id);
        if selected {
            wire.color = SELECTED_WIRE;
        }
        Some(wire)
    }

    /// Closest connection whose hit stroke contains a graph point
    pub fn hit_test<'a>(
        &self,
        wires: impl IntoIterator<Item = &'a WireVisual>,
        point: Pos2,
    ) -> Option<ConnectionId> {
        wires
            .into_iter()
            .filter_map(|w| {
                let id = w.connection?;
                let distance = w.path.distance_to(point, WIRE_SEGMENTS);
                (distance <= w.hit_width / 2.0).then_some((id, distance))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }
}

impl Default for WireRouter {
    fn default() -> Self {
        Self {
            curve_factor: CURVE_FACTOR,
            stroke_width: WIRE_STROKE_WIDTH,
            hit_width: WIRE_HIT_WIDTH,
        }
    }
}
