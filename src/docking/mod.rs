//! Docking: drag-to-dock interaction and tiling of docked panes.
//!
//! # Modules
//!
//! - [`engine`]: drag state machine (payload, active zone, drop commit)
//! - [`layout`]: per-zone tiling of docked panes
//!
//! # Example
//!
//! ```rust
//! use paneflow::docking::{DockingConfig, DockingEngine};
//! use paneflow::domain::DockZone;
//! use paneflow::input::NormalizedPointer;
//!
//! let mut engine = DockingEngine::new(DockingConfig::default());
//! engine.begin_drag("notes-1".into());
//! assert!(engine.on_drag_over(&NormalizedPointer::mouse(10.0, 500.0), None));
//! assert_eq!(engine.active_zone(), Some(DockZone::Left));
//! ```

pub mod engine;
pub mod layout;

pub use engine::DockingEngine;

use crate::domain::geometry::Rect;
use serde::{Deserialize, Serialize};

/// Width of the edge hit-test bands.
pub const DEFAULT_EDGE_BAND: f64 = 64.0;

/// Fraction of the viewport an occupied edge zone reserves.
pub const DEFAULT_DOCK_EXTENT: f64 = 0.25;

const MIN_DOCK_EXTENT: f64 = 0.05;
const MAX_DOCK_EXTENT: f64 = 0.45;

/// Geometry parameters of the docking engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct DockingConfig {
    pub viewport: Rect,
    pub edge_band: f64,
    pub dock_extent: f64,
}

impl Default for DockingConfig {
    fn default() -> Self {
        Self {
            viewport: Rect::new(0.0, 0.0, 1920.0, 1080.0),
            edge_band: DEFAULT_EDGE_BAND,
            dock_extent: DEFAULT_DOCK_EXTENT,
        }
    }
}

impl DockingConfig {
    /// Dock extent clamped so opposite bands always leave room between them.
    #[must_use]
    pub fn effective_extent(&self) -> f64 {
        if self.dock_extent.is_finite() {
            self.dock_extent.clamp(MIN_DOCK_EXTENT, MAX_DOCK_EXTENT)
        } else {
            DEFAULT_DOCK_EXTENT
        }
    }
}
