// SPDX-License-Identifier: MIT OR Apache-2.0
//! Property inspector bound to the selected node.

use crate::events::Selection;
use crate::graph::{Graph, GraphError};
use crate::node::NodeId;
use crate::props::{PropKind, PropValue};
use indexmap::IndexMap;

/// One editable property row
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyField {
    /// Property name
    pub key: String,
    /// Current value
    pub value: PropValue,
    /// Value kind, picks the edit widget
    pub kind: PropKind,
}

/// Edits the props of at most one node
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Inspector {
    node: Option<NodeId>,
}

impl Inspector {
    /// Create an unbound inspector
    pub fn new() -> Self {
        Self::default()
    }

    /// Node currently shown
    pub fn node(&self) -> Option<NodeId> {
        self.node
    }

    /// Follow a selection change; anything but a node unbinds
    pub fn on_selection(&mut self, selection: Selection) {
        self.node = selection.node();
    }

    /// Fields of the bound node, empty if unbound or the node is gone
    pub fn fields(&self, graph: &Graph) -> Vec<PropertyField> {
        self.node
            .and_then(|id| graph.node(id))
            .map(|node| {
                node.props
                    .entries()
                    .into_iter()
                    .map(|(key, value)| PropertyField {
                        kind: value.kind(),
                        key,
                        value,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Write one field as a single-key patch.
    ///
    /// Does nothing when no node is bound.
    pub fn edit(&self, graph: &mut Graph, key: &str, value: PropValue) -> Result<(), GraphError> {
        let Some(node) = self.node else {
            return Ok(());
        };
        let mut patch = IndexMap::new();
        patch.insert(key.to_string(), value);
        graph.update_node_props(node, patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::create_gameplay_catalog;
    use crate::node::{NodeDefinition, NodeKind};
    use crate::props::{PropShape, PropertyError};
    use egui::Pos2;

    #[test]
    fn test_binds_to_selected_node() {
        let catalog = create_gameplay_catalog();
        let mut graph = Graph::new();
        let print = graph.add_node(catalog.get("Print").unwrap(), Pos2::ZERO);

        let mut inspector = Inspector::new();
        assert!(inspector.fields(&graph).is_empty());

        inspector.on_selection(Selection::Node(print));
        let fields = inspector.fields(&graph);
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].key, "message");
        assert_eq!(fields[0].kind, PropKind::String);

        inspector.on_selection(Selection::None);
        assert_eq!(inspector.node(), None);
    }

    #[test]
    fn test_edit_preserves_other_keys() {
        let mut graph = Graph::new();
        let def = NodeDefinition::new("Note", "Note", "Misc", NodeKind::Default).with_props(PropShape::Custom);
        let node = graph.add_node(&def, Pos2::ZERO);
        let mut seed = IndexMap::new();
        seed.insert("text".to_string(), PropValue::String("a".into()));
        seed.insert("size".to_string(), PropValue::Int(12));
        graph.update_node_props(node, seed).unwrap();

        let mut inspector = Inspector::new();
        inspector.on_selection(Selection::Node(node));
        inspector.edit(&mut graph, "text", PropValue::String("b".into())).unwrap();

        let props = &graph.node(node).unwrap().props;
        assert_eq!(props.get("text"), Some(PropValue::String("b".into())));
        assert_eq!(props.get("size"), Some(PropValue::Int(12)));
    }

    #[test]
    fn test_edit_type_mismatch_rejected() {
        let catalog = create_gameplay_catalog();
        let mut graph = Graph::new();
        let delay = graph.add_node(catalog.get("Delay").unwrap(), Pos2::ZERO);

        let mut inspector = Inspector::new();
        inspector.on_selection(Selection::Node(delay));
        let err = inspector
            .edit(&mut graph, "duration", PropValue::String("soon".into()))
            .unwrap_err();
        assert!(matches!(err, GraphError::Property(PropertyError::TypeMismatch { .. })));

        inspector.edit(&mut graph, "duration", PropValue::Int(3)).unwrap();
        assert_eq!(
            graph.node(delay).unwrap().props.get("duration"),
            Some(PropValue::Float(3.0))
        );
    }
}
