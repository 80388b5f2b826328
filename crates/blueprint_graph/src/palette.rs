// SPDX-License-Identifier: MIT OR Apache-2.0
//! Searchable node palette.
//!
//! The palette never places nodes itself. Selecting an entry yields a
//! [`PlacementIntent`] that the canvas consumes on its next empty click.

use crate::graph::GraphError;
use crate::node::{NodeCatalog, NodeDefinition};
use indexmap::IndexMap;

/// Pending "place a node of this type" request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementIntent {
    /// Node type to place
    pub node_type: String,
}

/// Catalog browser with a text query and an optional category filter
#[derive(Debug, Clone, Default)]
pub struct NodePalette {
    catalog: NodeCatalog,
    query: String,
    category: Option<String>,
}

impl NodePalette {
    /// Create a palette over a host-supplied catalog
    pub fn new(catalog: NodeCatalog) -> Self {
        Self {
            catalog,
            query: String::new(),
            category: None,
        }
    }

    /// The catalog being browsed
    pub fn catalog(&self) -> &NodeCatalog {
        &self.catalog
    }

    /// Current search text
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Set the search text
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Current category filter
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Restrict results to one category, or `None` for all
    pub fn set_category(&mut self, category: Option<String>) {
        self.category = category;
    }

    /// Distinct categories, sorted
    pub fn categories(&self) -> Vec<&str> {
        self.catalog.categories()
    }

    /// Definitions matching `query` (case-insensitive substring of title or
    /// category) and the category filter, in catalog order
    pub fn filter(&self, query: &str) -> Vec<&NodeDefinition> {
        let needle = query.trim().to_lowercase();
        self.catalog
            .definitions()
            .filter(|d| self.category.as_deref().map_or(true, |c| d.category == c))
            .filter(|d| {
                needle.is_empty()
                    || d.title.to_lowercase().contains(&needle)
                    || d.category.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Definitions matching the current query
    pub fn results(&self) -> Vec<&NodeDefinition> {
        self.filter(&self.query)
    }

    /// Current results grouped by category, categories sorted
    pub fn grouped(&self) -> IndexMap<&str, Vec<&NodeDefinition>> {
        let mut groups: IndexMap<&str, Vec<&NodeDefinition>> = IndexMap::new();
        for definition in self.results() {
            groups.entry(definition.category.as_str()).or_default().push(definition);
        }
        groups.sort_keys();
        groups
    }

    /// Pick an entry, producing a placement intent
    pub fn select(&self, node_type: &str) -> Result<PlacementIntent, GraphError> {
        if self.catalog.get(node_type).is_none() {
            tracing::warn!(node_type, "palette selection of unknown node type");
            return Err(GraphError::UnknownNodeType(node_type.to_string()));
        }
        Ok(PlacementIntent {
            node_type: node_type.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::create_gameplay_catalog;

    fn titles<'a>(defs: &[&'a NodeDefinition]) -> Vec<&'a str> {
        defs.iter().map(|d| d.title.as_str()).collect()
    }

    #[test]
    fn test_filter_case_insensitive() {
        let palette = NodePalette::new(create_gameplay_catalog());
        let hits = palette.filter("PRINT");
        assert_eq!(titles(&hits), vec!["Print"]);

        // Category text matches too
        let math = palette.filter("mat");
        assert!(math.len() >= 4);
        assert!(math.iter().all(|d| d.category == "Math"));

        assert_eq!(palette.filter("").len(), palette.catalog().len());
        assert!(palette.filter("zzz").is_empty());
    }

    #[test]
    fn test_category_filter_combines_with_query() {
        let mut palette = NodePalette::new(create_gameplay_catalog());
        palette.set_category(Some("Flow".to_string()));
        assert!(palette.filter("").iter().all(|d| d.category == "Flow"));
        assert!(palette.filter("print").is_empty());
        assert_eq!(titles(&palette.filter("delay")), vec!["Delay"]);
    }

    #[test]
    fn test_grouped_sorted_by_category() {
        let palette = NodePalette::new(create_gameplay_catalog());
        let groups = palette.grouped();
        let keys: Vec<_> = groups.keys().copied().collect();
        let mut sorted = keys.clone();
        sorted.sort_unstable();
        assert_eq!(keys, sorted);
        assert_eq!(keys, palette.categories());
    }

    #[test]
    fn test_select() {
        let palette = NodePalette::new(create_gameplay_catalog());
        assert_eq!(palette.select("Start").unwrap().node_type, "Start");
        assert!(matches!(
            palette.select("Teleport"),
            Err(GraphError::UnknownNodeType(t)) if t == "Teleport"
        ));
    }
}
