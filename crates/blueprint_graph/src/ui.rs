// SPDX-License-Identifier: MIT OR Apache-2.0
//! egui front end for a [`GraphEditorSession`].
//!
//! Features:
//! - Canvas painting from the rendered scene (grid, wires, nodes, sockets)
//! - Pointer, wheel and keyboard forwarding to the session
//! - Node palette panel
//! - Property inspector panel
//!
//! Session positions are canvas-local; this module offsets them by the
//! canvas rectangle.

use crate::props::{PropKind, PropValue};
use crate::render::{NodeVisual, SOCKET_RADIUS};
use crate::scene::CanvasScene;
use crate::session::GraphEditorSession;
use crate::socket::SocketDirection;
use crate::viewport::ViewportTransform;
use crate::wire::{WireVisual, WIRE_SEGMENTS};
use egui::{Align2, Color32, FontId, Pos2, Rect, Stroke, Vec2};

const NODE_ROUNDING: f32 = 6.0;
const NODE_SHADOW_OFFSET: f32 = 3.0;
const SOCKET_LABEL_PADDING: f32 = 12.0;

/// Grid parameters
const GRID_SPACING: f32 = 20.0;
const GRID_MAJOR_EVERY: f32 = 5.0;

/// Canvas widget state
#[derive(Debug, Clone)]
pub struct GraphCanvas {
    /// Show grid
    pub show_grid: bool,
}

impl Default for GraphCanvas {
    fn default() -> Self {
        Self { show_grid: true }
    }
}

impl GraphCanvas {
    /// Create a canvas widget
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle input and paint the session into the remaining space
    pub fn ui(&mut self, ui: &mut egui::Ui, session: &mut GraphEditorSession) -> egui::Response {
        let rect = ui.available_rect_before_wrap();
        let response = ui.allocate_rect(rect, egui::Sense::click_and_drag());

        session.resize(rect.size());
        self.handle_input(ui, &response, rect, session);

        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, Color32::from_rgb(24, 24, 27));
        if self.show_grid {
            draw_grid(&painter, rect, session.viewport());
        }

        let scene = session.scene();
        draw_scene(&painter, rect, session.viewport(), &scene);
        response
    }

    fn handle_input(
        &mut self,
        ui: &egui::Ui,
        response: &egui::Response,
        rect: Rect,
        session: &mut GraphEditorSession,
    ) {
        let local = |pos: Pos2| (pos - rect.min).to_pos2();
        let events = ui.input(|i| i.events.clone());
        let active = response.hovered() || !session.controller().is_idle();

        for event in events {
            match event {
                egui::Event::PointerButton {
                    pos,
                    button,
                    pressed: true,
                    modifiers,
                } if rect.contains(pos) => {
                    response.request_focus();
                    if let Err(err) = session.pointer_down(local(pos), button, modifiers) {
                        tracing::warn!(error = %err, "canvas press rejected");
                    }
                }
                egui::Event::PointerButton { pos, pressed: false, .. } if active => {
                    session.pointer_up(local(pos));
                }
                egui::Event::PointerMoved(pos) if active => {
                    if rect.contains(pos) || !session.controller().is_idle() {
                        session.pointer_move(local(pos));
                    } else {
                        session.pointer_leave();
                    }
                }
                egui::Event::PointerGone => session.pointer_leave(),
                egui::Event::Key {
                    key,
                    pressed: true,
                    modifiers,
                    ..
                } if response.has_focus() || response.hovered() => {
                    if let Err(err) = session.key_pressed(key, modifiers) {
                        tracing::warn!(error = %err, "canvas key rejected");
                    }
                }
                _ => {}
            }
        }

        // egui reports wheel-up as positive, the zoom rule expects the opposite
        if response.hovered() {
            let (scroll, hover) = ui.input(|i| (i.raw_scroll_delta.y, i.pointer.hover_pos()));
            if let Some(pos) = hover {
                session.wheel(-scroll, local(pos));
            }
        }
    }
}

fn draw_grid(painter: &egui::Painter, rect: Rect, viewport: &ViewportTransform) {
    let spacing = GRID_SPACING * viewport.zoom();
    if spacing < 4.0 {
        return;
    }
    let major_spacing = spacing * GRID_MAJOR_EVERY;
    let minor = Stroke::new(1.0, Color32::from_rgba_unmultiplied(60, 60, 60, 100));
    let major = Stroke::new(1.0, Color32::from_rgba_unmultiplied(80, 80, 80, 150));

    for (step, stroke) in [(spacing, minor), (major_spacing, major)] {
        let mut x = rect.left() + viewport.pan.x.rem_euclid(step);
        while x < rect.right() {
            painter.line_segment([Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())], stroke);
            x += step;
        }
        let mut y = rect.top() + viewport.pan.y.rem_euclid(step);
        while y < rect.bottom() {
            painter.line_segment([Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)], stroke);
            y += step;
        }
    }
}

fn draw_scene(painter: &egui::Painter, rect: Rect, viewport: &ViewportTransform, scene: &CanvasScene) {
    let to_screen = |p: Pos2| rect.min + viewport.to_screen_space(p).to_vec2();
    let zoom = viewport.zoom();

    // Wires sit below nodes
    for wire in scene.wires.iter().chain(scene.floating_wire.as_ref()) {
        draw_wire(painter, wire, zoom, to_screen);
    }
    for node in &scene.nodes {
        draw_node(painter, node, zoom, to_screen);
    }

    if let Some(text) = scene.placeholder {
        painter.text(
            rect.center(),
            Align2::CENTER_CENTER,
            text,
            FontId::proportional(16.0),
            Color32::from_gray(120),
        );
    }
}

fn draw_wire(painter: &egui::Painter, wire: &WireVisual, zoom: f32, to_screen: impl Fn(Pos2) -> Pos2) {
    let points: Vec<Pos2> = wire.path.sample(WIRE_SEGMENTS).into_iter().map(to_screen).collect();
    let stroke = Stroke::new(wire.stroke_width * zoom, wire.color);
    for segment in points.windows(2) {
        painter.line_segment([segment[0], segment[1]], stroke);
    }
}

fn draw_node(painter: &egui::Painter, node: &NodeVisual, zoom: f32, to_screen: impl Fn(Pos2) -> Pos2) {
    let body = Rect::from_min_max(to_screen(node.body_bounds.min), to_screen(node.body_bounds.max));
    if !painter.clip_rect().intersects(body) {
        return;
    }
    let header = Rect::from_min_max(to_screen(node.header_bounds.min), to_screen(node.header_bounds.max));
    let rounding = NODE_ROUNDING * zoom;

    painter.rect_filled(
        body.translate(Vec2::splat(NODE_SHADOW_OFFSET)),
        rounding,
        Color32::from_rgba_unmultiplied(0, 0, 0, 60),
    );
    painter.rect_filled(body, rounding, node.body_color);
    painter.rect_filled(
        header,
        egui::Rounding {
            nw: rounding,
            ne: rounding,
            sw: 0.0,
            se: 0.0,
        },
        node.header_color,
    );
    painter.text(
        header.center(),
        Align2::CENTER_CENTER,
        &node.title,
        FontId::proportional(12.0 * zoom),
        Color32::WHITE,
    );
    let border = if node.selected { 2.0 } else { 1.0 };
    painter.rect_stroke(body, rounding, Stroke::new(border, node.border_color));

    for anchor in node.anchors() {
        let pos = to_screen(anchor.position);
        painter.circle_filled(pos, SOCKET_RADIUS * zoom, anchor.socket_type.color());
        painter.circle_stroke(pos, SOCKET_RADIUS * zoom, Stroke::new(1.0, Color32::from_gray(30)));

        let (offset, align) = match anchor.direction {
            SocketDirection::Input => (SOCKET_LABEL_PADDING * zoom, Align2::LEFT_CENTER),
            SocketDirection::Output => (-SOCKET_LABEL_PADDING * zoom, Align2::RIGHT_CENTER),
        };
        painter.text(
            Pos2::new(pos.x + offset, pos.y),
            align,
            &anchor.name,
            FontId::proportional(10.0 * zoom),
            Color32::from_gray(200),
        );
    }
}

/// Searchable palette; clicking an entry arms placement on the canvas
pub fn palette_ui(ui: &mut egui::Ui, session: &mut GraphEditorSession) {
    let mut query = session.palette().query().to_string();
    if ui.text_edit_singleline(&mut query).changed() {
        session.palette_mut().set_query(query);
    }

    let current = session.palette().category().map(str::to_string);
    let categories: Vec<String> = session.palette().categories().into_iter().map(str::to_string).collect();
    let mut picked = None;
    ui.horizontal_wrapped(|ui| {
        if ui.selectable_label(current.is_none(), "All").clicked() {
            picked = Some(None);
        }
        for category in categories {
            let selected = current.as_deref() == Some(category.as_str());
            if ui.selectable_label(selected, &category).clicked() {
                picked = Some(Some(category));
            }
        }
    });
    if let Some(category) = picked {
        session.palette_mut().set_category(category);
    }
    ui.separator();

    let armed = session.controller().pending_placement().map(|p| p.node_type.clone());
    let mut chosen = None;
    for (category, definitions) in session.palette().grouped() {
        ui.collapsing(category, |ui| {
            for definition in definitions {
                let selected = armed.as_deref() == Some(definition.node_type.as_str());
                let mut response = ui.selectable_label(selected, &definition.title);
                if let Some(description) = &definition.description {
                    response = response.on_hover_text(description);
                }
                if response.clicked() {
                    chosen = Some(definition.node_type.clone());
                }
            }
        });
    }
    if let Some(node_type) = chosen {
        if let Err(err) = session.select_palette_entry(&node_type) {
            tracing::warn!(error = %err, "palette selection rejected");
        }
    }
}

/// Property editor for the selected node
pub fn inspector_ui(ui: &mut egui::Ui, session: &mut GraphEditorSession) {
    let fields = session.inspector_fields();
    if fields.is_empty() {
        ui.weak("No properties");
        return;
    }

    let mut edits = Vec::new();
    egui::Grid::new("blueprint_inspector").num_columns(2).show(ui, |ui| {
        for field in fields {
            ui.label(&field.key);
            if let Some(value) = field_widget(ui, field.kind, field.value) {
                edits.push((field.key, value));
            }
            ui.end_row();
        }
    });

    for (key, value) in edits {
        if let Err(err) = session.edit_property(&key, value) {
            tracing::warn!(error = %err, key = %key, "property edit rejected");
        }
    }
}

/// Draw one edit widget; returns the new value when it changed
fn field_widget(ui: &mut egui::Ui, kind: PropKind, value: PropValue) -> Option<PropValue> {
    match (kind, value) {
        (PropKind::Bool, PropValue::Bool(mut v)) => ui.checkbox(&mut v, "").changed().then_some(PropValue::Bool(v)),
        (PropKind::Int, PropValue::Int(mut v)) => ui
            .add(egui::DragValue::new(&mut v))
            .changed()
            .then_some(PropValue::Int(v)),
        (PropKind::Float, PropValue::Float(mut v)) => ui
            .add(egui::DragValue::new(&mut v).speed(0.1))
            .changed()
            .then_some(PropValue::Float(v)),
        (PropKind::String, PropValue::String(mut v)) => ui
            .text_edit_singleline(&mut v)
            .changed()
            .then_some(PropValue::String(v)),
        (PropKind::Vector3, PropValue::Vector3(mut v)) => {
            let changed = ui
                .horizontal(|ui| {
                    v.iter_mut().fold(false, |changed, c| {
                        ui.add(egui::DragValue::new(c).speed(0.1)).changed() || changed
                    })
                })
                .inner;
            changed.then_some(PropValue::Vector3(v))
        }
        (PropKind::Json, PropValue::Json(v)) => {
            ui.weak(v.to_string());
            None
        }
        (_, other) => {
            ui.label(format!("{other:?}"));
            None
        }
    }
}
