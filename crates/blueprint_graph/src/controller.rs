// SPDX-License-Identifier: MIT OR Apache-2.0
//! Canvas interaction state machine.
//!
//! Translates pointer and keyboard input into graph and viewport changes.
//! All positions handed to the controller are in screen space; it converts
//! them through the [`ViewportTransform`] before touching the graph.
//!
//! Gesture-scoped state (the floating wire, the grab offset, the pan anchor)
//! lives only inside [`InteractionMode`] and is dropped on every transition
//! back to [`InteractionMode::Idle`].

use crate::config::EditorConfig;
use crate::connection::{ConnectionId, Endpoint};
use crate::events::{GraphEvent, Selection};
use crate::graph::{ConnectionError, Graph, GraphError};
use crate::node::{Node, NodeCatalog, NodeId};
use crate::palette::PlacementIntent;
use crate::render::{render_node, SocketAnchor};
use crate::socket::{SocketDirection, SocketType};
use crate::viewport::ViewportTransform;
use crate::wire::WireRouter;
use egui::{Key, Modifiers, PointerButton, Pos2, Vec2};

/// Wire being dragged out of a socket
#[derive(Debug, Clone, PartialEq)]
pub struct WireDrag {
    /// Socket the drag started on
    pub from: Endpoint,
    /// Direction of that socket
    pub direction: SocketDirection,
    /// Type tag of that socket (wire color)
    pub socket_type: SocketType,
    /// Pointer position (graph space)
    pub floating: Pos2,
}

/// Graph editor interaction mode
#[derive(Debug, Clone, Default, PartialEq)]
pub enum InteractionMode {
    /// No gesture in progress
    #[default]
    Idle,
    /// Panning the view
    Panning {
        /// Previous pointer position (screen space)
        last: Pos2,
    },
    /// Dragging a node
    DraggingNode {
        /// Node being dragged
        node: NodeId,
        /// Pointer offset from the node origin (graph space)
        grab_offset: Vec2,
    },
    /// Creating a connection
    DraggingWire(WireDrag),
}

impl InteractionMode {
    fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Panning { .. } => "panning",
            Self::DraggingNode { .. } => "dragging_node",
            Self::DraggingWire(_) => "dragging_wire",
        }
    }
}

/// What lies under a canvas point
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasHit {
    /// A socket anchor
    Socket {
        /// Owning node
        node: NodeId,
        /// The socket
        anchor: SocketAnchor,
    },
    /// A node body
    Node(NodeId),
    /// A wire's hit stroke
    Wire(ConnectionId),
    /// Empty canvas
    Empty,
}

/// Interaction state for one canvas
#[derive(Debug, Clone)]
pub struct CanvasController {
    mode: InteractionMode,
    selection: Selection,
    pending: Option<PlacementIntent>,
    clipboard: Option<Node>,
    last_pointer: Pos2,
    last_rejection: Option<ConnectionError>,
    config: EditorConfig,
    router: WireRouter,
}

impl CanvasController {
    /// Create an idle controller
    pub fn new(config: EditorConfig) -> Self {
        Self {
            mode: InteractionMode::Idle,
            selection: Selection::None,
            pending: None,
            clipboard: None,
            last_pointer: Pos2::ZERO,
            last_rejection: None,
            router: config.wire_router(),
            config,
        }
    }

    /// Current mode
    pub fn mode(&self) -> &InteractionMode {
        &self.mode
    }

    /// Whether no gesture is active
    pub fn is_idle(&self) -> bool {
        self.mode == InteractionMode::Idle
    }

    /// Current selection
    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Active wire gesture, if any
    pub fn wire_drag(&self) -> Option<&WireDrag> {
        match &self.mode {
            InteractionMode::DraggingWire(drag) => Some(drag),
            _ => None,
        }
    }

    /// Placement armed by the palette
    pub fn pending_placement(&self) -> Option<&PlacementIntent> {
        self.pending.as_ref()
    }

    /// Node held for paste
    pub fn clipboard(&self) -> Option<&Node> {
        self.clipboard.as_ref()
    }

    /// Last pointer position (graph space)
    pub fn last_pointer(&self) -> Pos2 {
        self.last_pointer
    }

    /// Why the most recent wire drop did not commit
    pub fn last_rejection(&self) -> Option<&ConnectionError> {
        self.last_rejection.as_ref()
    }

    /// Wire router in use
    pub fn router(&self) -> &WireRouter {
        &self.router
    }

    /// Settings in use
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Arm the next empty-canvas click to place a node
    pub fn arm_placement(&mut self, intent: PlacementIntent) {
        tracing::trace!(node_type = %intent.node_type, "placement armed");
        self.pending = Some(intent);
    }

    /// Drop a pending placement
    pub fn disarm_placement(&mut self) {
        self.pending = None;
    }

    /// Change the selection, queueing `SelectionChanged` when it differs
    pub fn select(&mut self, graph: &mut Graph, selection: Selection) {
        if self.selection == selection {
            return;
        }
        tracing::trace!(?selection, "selection changed");
        self.selection = selection;
        graph.emit(GraphEvent::SelectionChanged { selection });
    }

    /// Find what lies under a screen point
    pub fn hit_test(&self, graph: &Graph, viewport: &ViewportTransform, screen: Pos2) -> CanvasHit {
        let point = viewport.to_graph_space(screen);
        let radius = viewport.screen_len_to_graph(self.config.socket_hit_radius);

        for node in graph.nodes().rev() {
            let visual = render_node(node, false);
            if let Some(anchor) = visual.socket_at(point, radius) {
                return CanvasHit::Socket {
                    node: node.id,
                    anchor: anchor.clone(),
                };
            }
            if visual.contains(point) {
                return CanvasHit::Node(node.id);
            }
        }

        let wires: Vec<_> = graph
            .connections()
            .filter_map(|c| self.router.route_connection(graph, c, false))
            .collect();
        match self.router.hit_test(&wires, point) {
            Some(id) => CanvasHit::Wire(id),
            None => CanvasHit::Empty,
        }
    }

    /// Handle a pointer press
    pub fn pointer_down(
        &mut self,
        graph: &mut Graph,
        viewport: &ViewportTransform,
        catalog: &NodeCatalog,
        screen: Pos2,
        button: PointerButton,
        modifiers: Modifiers,
    ) -> Result<(), GraphError> {
        self.prune_selection(graph);
        self.last_pointer = viewport.to_graph_space(screen);

        if button == PointerButton::Middle || (button == PointerButton::Primary && modifiers.shift) {
            self.set_mode(InteractionMode::Panning { last: screen });
            return Ok(());
        }
        if button != PointerButton::Primary || !self.is_idle() {
            return Ok(());
        }

        let point = self.last_pointer;
        match self.hit_test(graph, viewport, screen) {
            CanvasHit::Socket { node, anchor } => {
                self.last_rejection = None;
                self.set_mode(InteractionMode::DraggingWire(WireDrag {
                    from: Endpoint::new(node, anchor.socket),
                    direction: anchor.direction,
                    socket_type: anchor.socket_type,
                    floating: point,
                }));
            }
            CanvasHit::Node(id) => {
                self.select(graph, Selection::Node(id));
                if let Some(node) = graph.node(id) {
                    let grab_offset = point - node.position;
                    self.set_mode(InteractionMode::DraggingNode { node: id, grab_offset });
                }
            }
            CanvasHit::Wire(id) => {
                if modifiers.alt {
                    graph.remove_connection(id)?;
                    self.prune_selection(graph);
                } else {
                    self.select(graph, Selection::Connection(id));
                }
            }
            CanvasHit::Empty => match self.pending.take() {
                Some(intent) => {
                    let definition = catalog.get(&intent.node_type).ok_or_else(|| {
                        tracing::warn!(node_type = %intent.node_type, "placement of unknown node type");
                        GraphError::UnknownNodeType(intent.node_type.clone())
                    })?;
                    let position = Pos2::new(self.config.snap(point.x), self.config.snap(point.y));
                    let id = graph.add_node(definition, position);
                    self.select(graph, Selection::Node(id));
                }
                None => self.select(graph, Selection::None),
            },
        }
        Ok(())
    }

    /// Handle pointer motion
    pub fn pointer_move(&mut self, graph: &mut Graph, viewport: &mut ViewportTransform, screen: Pos2) {
        self.last_pointer = viewport.to_graph_space(screen);
        let point = self.last_pointer;

        match &mut self.mode {
            InteractionMode::Idle => {}
            InteractionMode::Panning { last } => {
                viewport.pan_by(screen - *last);
                *last = screen;
                // Pan moved the graph under the pointer
                self.last_pointer = viewport.to_graph_space(screen);
            }
            InteractionMode::DraggingNode { node, grab_offset } => {
                let target = point - *grab_offset;
                let position = Pos2::new(self.config.snap(target.x), self.config.snap(target.y));
                let node = *node;
                if graph.move_node(node, position).is_err() {
                    tracing::warn!(%node, "dragged node disappeared");
                    self.set_mode(InteractionMode::Idle);
                }
            }
            InteractionMode::DraggingWire(drag) => {
                drag.floating = point;
            }
        }
    }

    /// Handle a pointer release; a wire drag commits or is discarded here
    pub fn pointer_up(&mut self, graph: &mut Graph, viewport: &ViewportTransform, screen: Pos2) {
        self.last_pointer = viewport.to_graph_space(screen);
        let mode = std::mem::take(&mut self.mode);
        tracing::trace!(from = mode.name(), to = "idle", "gesture ended");

        let InteractionMode::DraggingWire(drag) = mode else {
            return;
        };
        let CanvasHit::Socket { node, anchor } = self.hit_test(graph, viewport, screen) else {
            tracing::trace!("wire dropped on empty canvas");
            return;
        };
        if node == drag.from.node {
            tracing::trace!("wire dropped on its own node");
            return;
        }

        let target = Endpoint::new(node, anchor.socket);
        let (from, to) = match drag.direction {
            SocketDirection::Output => (drag.from, target),
            SocketDirection::Input => (target, drag.from),
        };
        if let Err(err) = graph.add_connection(from, to) {
            self.last_rejection = Some(err);
        }
    }

    /// Pointer left the canvas
    pub fn pointer_leave(&mut self) {
        self.cancel_gesture();
    }

    /// Pointer gesture was cancelled by the platform
    pub fn pointer_cancel(&mut self) {
        self.cancel_gesture();
    }

    /// Handle wheel input at a screen position
    pub fn wheel(&mut self, viewport: &mut ViewportTransform, delta_y: f32, screen: Pos2) {
        viewport.apply_wheel(delta_y, screen);
        self.last_pointer = viewport.to_graph_space(screen);
    }

    /// Handle a key press
    pub fn key_pressed(&mut self, graph: &mut Graph, key: Key, modifiers: Modifiers) -> Result<(), GraphError> {
        self.prune_selection(graph);

        match key {
            Key::Escape => {
                self.cancel_gesture();
                self.pending = None;
            }
            Key::Delete | Key::Backspace => self.delete_selected(graph)?,
            Key::D if modifiers.command => self.duplicate_selected(graph)?,
            Key::C if modifiers.command => self.copy_selected(graph),
            Key::V if modifiers.command => self.paste(graph),
            _ => {}
        }
        Ok(())
    }

    /// Remove the selected node (with its wires) or connection
    pub fn delete_selected(&mut self, graph: &mut Graph) -> Result<(), GraphError> {
        match self.selection {
            Selection::None => return Ok(()),
            Selection::Node(id) => {
                if matches!(self.mode, InteractionMode::DraggingNode { node, .. } if node == id) {
                    self.set_mode(InteractionMode::Idle);
                }
                self.select(graph, Selection::None);
                graph.remove_node(id)?;
            }
            Selection::Connection(id) => {
                self.select(graph, Selection::None);
                graph.remove_connection(id)?;
            }
        }
        Ok(())
    }

    /// Copy the selected node next to itself and select the copy
    pub fn duplicate_selected(&mut self, graph: &mut Graph) -> Result<(), GraphError> {
        let Some(id) = self.selection.node() else {
            return Ok(());
        };
        let offset = self.config.duplicate_offset;
        let copy = graph.duplicate_node(id, Vec2::splat(offset))?;
        self.select(graph, Selection::Node(copy));
        Ok(())
    }

    /// Put the selected node on the clipboard
    pub fn copy_selected(&mut self, graph: &Graph) {
        if let Some(node) = self.selection.node().and_then(|id| graph.node(id)) {
            tracing::trace!(node = %node.id, "node copied");
            self.clipboard = Some(node.clone());
        }
    }

    /// Paste the clipboard at the last pointer position and select it
    pub fn paste(&mut self, graph: &mut Graph) {
        let Some(template) = &self.clipboard else {
            return;
        };
        let position = Pos2::new(self.config.snap(self.last_pointer.x), self.config.snap(self.last_pointer.y));
        let id = graph.insert_node(template.duplicate_at(position));
        self.select(graph, Selection::Node(id));
    }

    fn cancel_gesture(&mut self) {
        if !self.is_idle() {
            self.set_mode(InteractionMode::Idle);
        }
    }

    fn set_mode(&mut self, mode: InteractionMode) {
        tracing::trace!(from = self.mode.name(), to = mode.name(), "gesture transition");
        self.mode = mode;
    }

    /// Clear a selection whose target no longer exists
    fn prune_selection(&mut self, graph: &mut Graph) {
        let stale = match self.selection {
            Selection::None => false,
            Selection::Node(id) => graph.node(id).is_none(),
            Selection::Connection(id) => graph.connection(id).is_none(),
        };
        if stale {
            self.select(graph, Selection::None);
        }
    }
}

impl Default for CanvasController {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}
