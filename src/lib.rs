//! Paneflow: a pane and window management engine for multi-pane workspaces.
//!
//! Paneflow keeps the authoritative state of every pane in a workspace and
//! provides:
//! - Pane lifecycle, movement, resizing and z-order with grid snapping
//! - Collision detection and minimal push-out resolution
//! - Drag-to-dock into edge and center zones with automatic tiling
//! - Scoped keyboard shortcuts with canonical key chords
//! - Pointer normalization across mouse, touch and pen
//! - Focus restoration around modal overlays
//! - Layout persistence and cross-instance sync hooks

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Headless host (main.rs)                            │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │
//! │  - Workspace facade, event handling, actions        │
//! │  - Window-state store with listeners                │
//! └─────────────────────────────────────────────────────┘
//!         │               │               │              │
//! ┌─────────────┐ ┌─────────────┐ ┌─────────────┐ ┌─────────────┐
//! │ docking/    │ │ shortcuts/  │ │ registry/   │ │ sync/       │
//! │ zones, tile │ │ scoped keys │ │ pane types  │ │ transport   │
//! └─────────────┘ └─────────────┘ └─────────────┘ └─────────────┘
//!         │               │               │              │
//! ┌─────────────────────────────────────────────────────┐
//! │  Domain, input, focus, storage, infrastructure      │
//! │  - Geometry, pane model, errors (domain/)           │
//! │  - Pointer and key normalization (input/)           │
//! │  - Layout files (storage/), data paths              │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │  ← Optional
//! │  - OpenTelemetry tracing to a rotated span log      │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Configuration
//!
//! ```toml
//! grid_step = 8.0
//! edge_band = 64.0
//! dock_extent = 0.25
//! layout_file = "~/.local/share/paneflow/layout.json"
//! trace_level = "info"
//!
//! [viewport]
//! x = 0.0
//! y = 0.0
//! w = 1920.0
//! h = 1080.0
//!
//! [[shortcuts]]
//! combo = "ctrl+k"
//! action = "palette.open"
//! ```
//!
//! # Example
//!
//! ```rust
//! use paneflow::registry::{PaneMetadata, PaneRegistry, TextRenderable};
//! use paneflow::{handle_event, initialize, Config, Event};
//! use std::rc::Rc;
//!
//! let mut registry = PaneRegistry::new();
//! registry.register("crm", Rc::new(TextRenderable::new("CRM")), PaneMetadata::new("Customers"))?;
//!
//! let mut workspace = initialize(&Config::default(), registry);
//! let event: Event = serde_json::from_str(r#"{ "type": "create_pane", "typeId": "crm", "id": "crm" }"#)?;
//! let (render, actions) = handle_event(&mut workspace, &event)?;
//! assert!(render);
//! assert_eq!(actions.len(), 1); // broadcast of the new pane
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod app;
pub mod docking;
pub mod domain;
pub mod focus;
pub mod infrastructure;
pub mod input;
pub mod registry;
pub mod shortcuts;
pub mod storage;
pub mod sync;

pub mod observability;

pub use app::{handle_event, Action, Event, InteractionMode, WindowStore, Workspace};
pub use domain::{PaneflowError, Result};

use docking::{DockingConfig, DEFAULT_DOCK_EXTENT, DEFAULT_EDGE_BAND};
use domain::geometry::{Rect, DEFAULT_GRID_STEP};
use serde::{Deserialize, Serialize};
use shortcuts::ShortcutConfig;
use std::path::{Path, PathBuf};

/// Workspace configuration, usually read from a TOML file.
///
/// Every field is optional in the file; missing ones take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Grid step for snap-on-move. A step of `0` disables snapping. Default: `8`
    pub grid_step: Option<f64>,

    /// Width of the edge bands that trigger docking. Default: `64`
    pub edge_band: f64,

    /// Fraction of the viewport an occupied edge zone reserves. Default: `0.25`
    pub dock_extent: f64,

    /// Workspace viewport. Default: `0,0 1920x1080`
    pub viewport: Rect,

    /// Saved layout location; `~` is expanded. Default: `<data dir>/layout.json`
    pub layout_file: Option<String>,

    /// Tracing level for OpenTelemetry spans.
    ///
    /// Options: `trace`, `debug`, `info`, `warn`, `error`. Default: `"info"`
    pub trace_level: Option<String>,

    /// Global shortcut bindings. Invalid combos are logged and skipped.
    pub shortcuts: Vec<ShortcutConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            grid_step: Some(DEFAULT_GRID_STEP),
            edge_band: DEFAULT_EDGE_BAND,
            dock_extent: DEFAULT_DOCK_EXTENT,
            viewport: DockingConfig::default().viewport,
            layout_file: None,
            trace_level: None,
            shortcuts: Vec::new(),
        }
    }
}

impl Config {
    /// Parses a TOML configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PaneflowError::Config`] if the TOML is malformed or a field has
    /// the wrong type.
    ///
    /// ```rust
    /// use paneflow::Config;
    ///
    /// let config = Config::from_toml_str("edge_band = 32.0\n[[shortcuts]]\ncombo = \"ctrl+k\"\naction = \"palette\"")?;
    /// assert_eq!(config.edge_band, 32.0);
    /// assert_eq!(config.dock_extent, 0.25);
    /// assert_eq!(config.shortcuts.len(), 1);
    /// # Ok::<(), paneflow::PaneflowError>(())
    /// ```
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| PaneflowError::Config(format!("Failed to parse config TOML: {e}")))
    }

    /// Reads and parses a TOML configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`PaneflowError::Config`] if the file cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| PaneflowError::Config(format!("Failed to read config file: {e}")))?;
        Self::from_toml_str(&contents)
    }

    /// Docking parameters derived from this configuration.
    #[must_use]
    pub const fn docking(&self) -> DockingConfig {
        DockingConfig {
            viewport: self.viewport,
            edge_band: self.edge_band,
            dock_extent: self.dock_extent,
        }
    }

    /// Saved layout location, tilde-expanded, falling back to the data directory.
    #[must_use]
    pub fn layout_path(&self) -> PathBuf {
        self.layout_file.as_deref().map_or_else(infrastructure::default_layout_path, |file| {
            PathBuf::from(infrastructure::expand_tilde(file))
        })
    }
}

/// Builds a workspace from configuration and the boot-time pane registry.
///
/// The registry is frozen: pane types cannot be added afterwards. Tracing is not
/// installed here; hosts call [`observability::init_tracing`] first if they want
/// spans recorded.
///
/// ```rust
/// use paneflow::registry::PaneRegistry;
/// use paneflow::{initialize, Config};
///
/// let workspace = initialize(&Config::default(), PaneRegistry::new());
/// assert!(workspace.get_state().panes.is_empty());
/// ```
#[must_use]
pub fn initialize(config: &Config, registry: registry::PaneRegistry) -> Workspace {
    tracing::debug!(pane_types = registry.len(), "initializing paneflow workspace");
    Workspace::init(config.clone(), registry)
}
