// SPDX-License-Identifier: MIT OR Apache-2.0
//! Graph editor session.
//!
//! A [`GraphEditorSession`] is built explicitly by the host and owns every
//! piece of editor state: the graph, the viewport, the canvas controller,
//! the palette, the inspector and the event subscribers. Each input call
//! runs synchronously and then flushes the queued [`GraphEvent`]s to
//! subscribers before returning.

use crate::config::EditorConfig;
use crate::controller::CanvasController;
use crate::events::{EventBus, GraphEvent, Selection};
use crate::graph::{Graph, GraphError};
use crate::inspector::{Inspector, PropertyField};
use crate::node::NodeCatalog;
use crate::palette::NodePalette;
use crate::props::PropValue;
use crate::record::GraphRecord;
use crate::scene::{render_scene, CanvasScene};
use crate::viewport::ViewportTransform;
use egui::{Key, Modifiers, PointerButton, Pos2, Vec2};
use std::fmt;

/// Persistence state as seen by the editor
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SaveStatus {
    /// Matches the last successful save
    #[default]
    Clean,
    /// Changed since the last successful save
    Dirty,
    /// The last save attempt failed
    Failed(String),
}

/// One open blueprint graph and its editor state
pub struct GraphEditorSession {
    graph: Graph,
    viewport: ViewportTransform,
    controller: CanvasController,
    palette: NodePalette,
    inspector: Inspector,
    bus: EventBus,
    save_status: SaveStatus,
}

impl GraphEditorSession {
    /// Open a session on a graph snapshot
    pub fn new(mut graph: Graph, catalog: NodeCatalog, viewport_size: Vec2, config: EditorConfig) -> Self {
        graph.set_allow_fan_in(config.allow_input_fan_in);
        graph.clear_events();

        let viewport = ViewportTransform::new(viewport_size)
            .with_zoom_limits(config.min_zoom, config.max_zoom)
            .with_wheel_sensitivity(config.wheel_zoom_sensitivity)
            .with_anchor(config.zoom_anchor);

        tracing::info!(
            nodes = graph.node_count(),
            connections = graph.connection_count(),
            catalog = catalog.len(),
            "graph editor session opened"
        );

        Self {
            graph,
            viewport,
            controller: CanvasController::new(config),
            palette: NodePalette::new(catalog),
            inspector: Inspector::new(),
            bus: EventBus::new(),
            save_status: SaveStatus::Clean,
        }
    }

    /// Open a session on a persisted record
    pub fn from_record(
        record: GraphRecord,
        catalog: NodeCatalog,
        viewport_size: Vec2,
        config: EditorConfig,
    ) -> Result<Self, GraphError> {
        let graph = record.into_graph(&catalog)?;
        Ok(Self::new(graph, catalog, viewport_size, config))
    }

    /// Open a session on persisted JSON
    pub fn from_json(
        json: &str,
        catalog: NodeCatalog,
        viewport_size: Vec2,
        config: EditorConfig,
    ) -> Result<Self, GraphError> {
        Self::from_record(GraphRecord::from_json(json)?, catalog, viewport_size, config)
    }

    /// Snapshot in the persisted shape
    pub fn to_record(&self) -> GraphRecord {
        GraphRecord::from(&self.graph)
    }

    /// Snapshot as JSON
    pub fn to_json(&self) -> Result<String, GraphError> {
        self.to_record().to_json()
    }

    /// The graph
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// The viewport
    pub fn viewport(&self) -> &ViewportTransform {
        &self.viewport
    }

    /// The canvas controller
    pub fn controller(&self) -> &CanvasController {
        &self.controller
    }

    /// The palette
    pub fn palette(&self) -> &NodePalette {
        &self.palette
    }

    /// The palette, for query and filter changes
    pub fn palette_mut(&mut self) -> &mut NodePalette {
        &mut self.palette
    }

    /// The inspector
    pub fn inspector(&self) -> &Inspector {
        &self.inspector
    }

    /// Current selection
    pub fn selection(&self) -> Selection {
        self.controller.selection()
    }

    /// Current save status
    pub fn save_status(&self) -> &SaveStatus {
        &self.save_status
    }

    /// Settings in use
    pub fn config(&self) -> &EditorConfig {
        self.controller.config()
    }

    /// Register an event handler
    pub fn subscribe(&mut self, handler: impl FnMut(&GraphEvent) + 'static) {
        self.bus.subscribe(handler);
    }

    /// Canvas was resized
    pub fn resize(&mut self, size: Vec2) {
        self.viewport.size = size;
    }

    /// Lay out the canvas for drawing
    pub fn scene(&self) -> CanvasScene {
        render_scene(
            &self.graph,
            self.controller.selection(),
            self.controller.router(),
            self.controller.wire_drag(),
        )
    }

    /// Arm placement of a palette entry
    pub fn select_palette_entry(&mut self, node_type: &str) -> Result<(), GraphError> {
        let intent = self.palette.select(node_type)?;
        self.controller.arm_placement(intent);
        Ok(())
    }

    /// Pointer pressed at a screen position
    pub fn pointer_down(&mut self, screen: Pos2, button: PointerButton, modifiers: Modifiers) -> Result<(), GraphError> {
        let result = self.controller.pointer_down(
            &mut self.graph,
            &self.viewport,
            self.palette.catalog(),
            screen,
            button,
            modifiers,
        );
        self.flush();
        result
    }

    /// Pointer moved to a screen position
    pub fn pointer_move(&mut self, screen: Pos2) {
        self.controller.pointer_move(&mut self.graph, &mut self.viewport, screen);
        self.flush();
    }

    /// Pointer released at a screen position
    pub fn pointer_up(&mut self, screen: Pos2) {
        self.controller.pointer_up(&mut self.graph, &self.viewport, screen);
        self.flush();
    }

    /// Pointer left the canvas
    pub fn pointer_leave(&mut self) {
        self.controller.pointer_leave();
        self.flush();
    }

    /// Pointer gesture cancelled
    pub fn pointer_cancel(&mut self) {
        self.controller.pointer_cancel();
        self.flush();
    }

    /// Wheel scrolled at a screen position
    pub fn wheel(&mut self, delta_y: f32, screen: Pos2) {
        self.controller.wheel(&mut self.viewport, delta_y, screen);
        self.flush();
    }

    /// Key pressed on the canvas
    pub fn key_pressed(&mut self, key: Key, modifiers: Modifiers) -> Result<(), GraphError> {
        let result = self.controller.key_pressed(&mut self.graph, key, modifiers);
        self.flush();
        result
    }

    /// Edit one property of the inspected node
    pub fn edit_property(&mut self, key: &str, value: PropValue) -> Result<(), GraphError> {
        let result = self.inspector.edit(&mut self.graph, key, value);
        self.flush();
        result
    }

    /// Fields shown by the inspector
    pub fn inspector_fields(&self) -> Vec<PropertyField> {
        self.inspector.fields(&self.graph)
    }

    /// Change the selection programmatically
    pub fn select(&mut self, selection: Selection) {
        self.controller.select(&mut self.graph, selection);
        self.flush();
    }

    /// Run a host command against the graph, then deliver its events
    pub fn apply<R>(&mut self, command: impl FnOnce(&mut Graph) -> R) -> R {
        let result = command(&mut self.graph);
        self.flush();
        result
    }

    /// Record the outcome of a host save; the graph is never touched
    pub fn report_save<E: fmt::Display>(&mut self, result: Result<(), E>) {
        let status = match result {
            Ok(()) => SaveStatus::Clean,
            Err(err) => {
                tracing::warn!(error = %err, "graph save failed");
                SaveStatus::Failed(err.to_string())
            }
        };
        self.set_save_status(status);
    }

    fn set_save_status(&mut self, status: SaveStatus) {
        if self.save_status != status {
            tracing::info!(from = ?self.save_status, to = ?status, "save status changed");
            self.save_status = status;
        }
    }

    fn flush(&mut self) {
        let events = self.graph.drain_events();
        if events.is_empty() {
            return;
        }
        for event in &events {
            match event {
                GraphEvent::SelectionChanged { selection } => self.inspector.on_selection(*selection),
                e if e.is_mutation() => self.set_save_status(SaveStatus::Dirty),
                _ => {}
            }
        }
        self.bus.dispatch(&events);
    }
}

impl fmt::Debug for GraphEditorSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphEditorSession")
            .field("nodes", &self.graph.node_count())
            .field("connections", &self.graph.connection_count())
            .field("selection", &self.controller.selection())
            .field("save_status", &self.save_status)
            .field("subscribers", &self.bus.len())
            .finish_non_exhaustive()
    }
}
