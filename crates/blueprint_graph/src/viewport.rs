// SPDX-License-Identifier: MIT OR Apache-2.0
//! Pan/zoom mapping between screen space and graph space.

use egui::{Pos2, Vec2};
use serde::{Deserialize, Serialize};

/// Smallest allowed zoom
pub const MIN_ZOOM: f32 = 0.1;
/// Largest allowed zoom
pub const MAX_ZOOM: f32 = 3.0;
/// Zoom change per unit of wheel delta
pub const WHEEL_ZOOM_SENSITIVITY: f32 = 0.001;

/// Which point stays fixed while zooming
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ZoomAnchor {
    /// Zoom about the screen origin; content under the cursor drifts
    Origin,
    /// Keep the graph point under the cursor in place
    #[default]
    Cursor,
}

/// Affine viewport: `screen = graph * zoom + pan`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportTransform {
    /// Screen-space offset of the graph origin
    pub pan: Vec2,
    /// Scale factor, kept within the zoom limits
    zoom: f32,
    /// Size of the canvas in screen pixels
    pub size: Vec2,
    min_zoom: f32,
    max_zoom: f32,
    wheel_sensitivity: f32,
    anchor: ZoomAnchor,
}

impl ViewportTransform {
    /// Create an identity viewport of the given screen size
    pub fn new(size: Vec2) -> Self {
        Self {
            pan: Vec2::ZERO,
            zoom: 1.0,
            size,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            wheel_sensitivity: WHEEL_ZOOM_SENSITIVITY,
            anchor: ZoomAnchor::default(),
        }
    }

    /// Override the zoom limits; the current zoom is re-clamped
    pub fn with_zoom_limits(mut self, min: f32, max: f32) -> Self {
        self.min_zoom = min.min(max);
        self.max_zoom = max.max(min);
        self.zoom = self.clamp_zoom(self.zoom);
        self
    }

    /// Override the wheel sensitivity
    pub fn with_wheel_sensitivity(mut self, sensitivity: f32) -> Self {
        self.wheel_sensitivity = sensitivity;
        self
    }

    /// Choose the zoom anchor
    pub fn with_anchor(mut self, anchor: ZoomAnchor) -> Self {
        self.anchor = anchor;
        self
    }

    /// Current zoom
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Set the zoom; out-of-range values are clamped, never rejected
    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = self.clamp_zoom(zoom);
    }

    /// Zoom limits as `(min, max)`
    pub fn zoom_limits(&self) -> (f32, f32) {
        (self.min_zoom, self.max_zoom)
    }

    /// Map a screen point into graph space
    pub fn to_graph_space(&self, screen: Pos2) -> Pos2 {
        Pos2::new(
            (screen.x - self.pan.x) / self.zoom,
            (screen.y - self.pan.y) / self.zoom,
        )
    }

    /// Map a graph point onto the screen
    pub fn to_screen_space(&self, graph: Pos2) -> Pos2 {
        Pos2::new(graph.x * self.zoom + self.pan.x, graph.y * self.zoom + self.pan.y)
    }

    /// Convert a screen-space length into graph units
    pub fn screen_len_to_graph(&self, len: f32) -> f32 {
        len / self.zoom
    }

    /// Apply a pan gesture delta (screen space)
    pub fn pan_by(&mut self, screen_delta: Vec2) {
        self.pan += screen_delta;
    }

    /// Apply wheel input at a cursor position (screen space)
    pub fn apply_wheel(&mut self, wheel_delta_y: f32, cursor: Pos2) {
        if wheel_delta_y == 0.0 || !wheel_delta_y.is_finite() {
            return;
        }
        let anchor_graph = self.to_graph_space(cursor);
        let old_zoom = self.zoom;
        self.zoom = self.clamp_zoom(self.zoom - wheel_delta_y * self.wheel_sensitivity);

        if self.anchor == ZoomAnchor::Cursor && self.zoom != old_zoom {
            // Re-solve pan so the anchor maps back under the cursor
            self.pan = cursor.to_vec2() - anchor_graph.to_vec2() * self.zoom;
        }
    }

    /// Reset pan and zoom
    pub fn reset(&mut self) {
        self.pan = Vec2::ZERO;
        self.zoom = self.clamp_zoom(1.0);
    }

    fn clamp_zoom(&self, zoom: f32) -> f32 {
        if zoom.is_nan() {
            return self.zoom.clamp(self.min_zoom, self.max_zoom);
        }
        zoom.clamp(self.min_zoom, self.max_zoom)
    }
}

impl Default for ViewportTransform {
    fn default() -> Self {
        Self::new(Vec2::new(1280.0, 720.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-3;

    fn close(a: Pos2, b: Pos2) -> bool {
        (a.x - b.x).abs() < EPS && (a.y - b.y).abs() < EPS
    }

    #[test]
    fn test_round_trip_transform() {
        let mut viewport = ViewportTransform::default();
        let points = [
            Pos2::ZERO,
            Pos2::new(123.5, -42.25),
            Pos2::new(-900.0, 640.0),
            Pos2::new(0.001, 1e4),
        ];

        for (pan, zoom) in [
            (Vec2::ZERO, 1.0),
            (Vec2::new(37.0, -12.0), 0.1),
            (Vec2::new(-400.0, 250.0), 2.75),
            (Vec2::new(5.5, 5.5), 3.0),
        ] {
            viewport.pan = pan;
            viewport.set_zoom(zoom);
            for p in points {
                let back = viewport.to_graph_space(viewport.to_screen_space(p));
                let tolerance = EPS * (1.0 + p.x.abs().max(p.y.abs()));
                assert!(
                    (back.x - p.x).abs() < tolerance && (back.y - p.y).abs() < tolerance,
                    "{p:?} -> {back:?}"
                );
            }
        }
    }

    #[test]
    fn test_zoom_clamped_for_any_wheel_sequence() {
        let mut viewport = ViewportTransform::default();
        let deltas = [
            -5000.0, -5000.0, 120.0, 99999.0, -1.0, 0.0, -2500.0, 3.0, 1e9, -1e9, f32::NAN, 42.0,
        ];
        for delta in deltas {
            viewport.apply_wheel(delta, Pos2::new(300.0, 200.0));
            let zoom = viewport.zoom();
            assert!((MIN_ZOOM..=MAX_ZOOM).contains(&zoom), "zoom {zoom} after {delta}");
        }
    }

    #[test]
    fn test_wheel_formula_origin_anchor() {
        let mut viewport = ViewportTransform::default().with_anchor(ZoomAnchor::Origin);
        viewport.apply_wheel(-100.0, Pos2::new(400.0, 300.0));
        assert!((viewport.zoom() - 1.1).abs() < 1e-6);
        assert_eq!(viewport.pan, Vec2::ZERO);
    }

    #[test]
    fn test_cursor_anchor_keeps_point_fixed() {
        let mut viewport = ViewportTransform::default();
        viewport.pan = Vec2::new(20.0, -30.0);
        let cursor = Pos2::new(420.0, 310.0);
        let under_cursor = viewport.to_graph_space(cursor);

        viewport.apply_wheel(-500.0, cursor);
        assert!((viewport.zoom() - 1.5).abs() < 1e-6);
        assert!(close(viewport.to_screen_space(under_cursor), cursor));
    }

    #[test]
    fn test_pan_by_adds_screen_delta() {
        let mut viewport = ViewportTransform::default();
        viewport.set_zoom(2.0);
        viewport.pan_by(Vec2::new(10.0, 5.0));
        viewport.pan_by(Vec2::new(-4.0, 1.0));
        assert_eq!(viewport.pan, Vec2::new(6.0, 6.0));
        assert!(close(viewport.to_screen_space(Pos2::new(1.0, 1.0)), Pos2::new(8.0, 8.0)));
    }

    #[test]
    fn test_set_zoom_clamps() {
        let mut viewport = ViewportTransform::default();
        viewport.set_zoom(10.0);
        assert_eq!(viewport.zoom(), MAX_ZOOM);
        viewport.set_zoom(0.0);
        assert_eq!(viewport.zoom(), MIN_ZOOM);
    }
}
