// SPDX-License-Identifier: MIT OR Apache-2.0
//! Editor configuration, loadable from RON.

use crate::viewport::{ZoomAnchor, MAX_ZOOM, MIN_ZOOM, WHEEL_ZOOM_SENSITIVITY};
use crate::wire::{WireRouter, CURVE_FACTOR, WIRE_HIT_WIDTH, WIRE_STROKE_WIDTH};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// RON could not be parsed
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

/// Tunables for a graph editor session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Smallest zoom
    pub min_zoom: f32,
    /// Largest zoom
    pub max_zoom: f32,
    /// Zoom change per wheel unit
    pub wheel_zoom_sensitivity: f32,
    /// Point kept fixed while zooming
    pub zoom_anchor: ZoomAnchor,
    /// Snap dragged nodes to the grid
    pub snap_to_grid: bool,
    /// Grid cell size (graph units)
    pub grid_size: f32,
    /// Allow several wires into one input socket
    pub allow_input_fan_in: bool,
    /// Horizontal wire control-point offset
    pub wire_curve_factor: f32,
    /// Visible wire width
    pub wire_stroke_width: f32,
    /// Invisible wire hit width
    pub wire_hit_width: f32,
    /// Pointer distance that still grabs a socket (screen pixels)
    pub socket_hit_radius: f32,
    /// Offset applied to duplicated nodes (graph units)
    pub duplicate_offset: f32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            wheel_zoom_sensitivity: WHEEL_ZOOM_SENSITIVITY,
            zoom_anchor: ZoomAnchor::default(),
            snap_to_grid: false,
            grid_size: 10.0,
            allow_input_fan_in: false,
            wire_curve_factor: CURVE_FACTOR,
            wire_stroke_width: WIRE_STROKE_WIDTH,
            wire_hit_width: WIRE_HIT_WIDTH,
            socket_hit_radius: 8.0,
            duplicate_offset: 50.0,
        }
    }
}

impl EditorConfig {
    /// Parse from a RON string; missing fields take their defaults
    pub fn from_ron_str(source: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(source)?)
    }

    /// Load from a RON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)?;
        let config = Self::from_ron_str(&source)?;
        tracing::info!(path = %path.display(), "loaded editor config");
        Ok(config)
    }

    /// Serialize to pretty RON
    pub fn to_ron_string(&self) -> Result<String, ron::Error> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
    }

    /// Wire router using these settings
    pub fn wire_router(&self) -> WireRouter {
        WireRouter {
            curve_factor: self.wire_curve_factor,
            stroke_width: self.wire_stroke_width,
            hit_width: self.wire_hit_width,
        }
    }

    /// Snap a coordinate to the grid when snapping is on
    pub fn snap(&self, value: f32) -> f32 {
        if self.snap_to_grid && self.grid_size > 0.0 {
            (value / self.grid_size).round() * self.grid_size
        } else {
            value
        }
    }
}
