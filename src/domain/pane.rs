//! Pane domain model.
//!
//! A pane is an independently positioned, resizable content region of the
//! workspace. This module holds its identity ([`PaneId`]), its authoritative
//! record ([`PaneState`]), the creation request ([`PaneSpec`]), dock zones and
//! the typed content descriptors carried by panes.

use super::geometry::Rect;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Opaque unique pane identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaneId(String);

impl PaneId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Id handed out when the caller does not supply one.
    #[must_use]
    pub fn generated(seq: u64) -> Self {
        Self(format!("pane-{seq}"))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PaneId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for PaneId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Named screen-edge region a pane can be docked into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DockZone {
    Left,
    Right,
    Top,
    Bottom,
    Center,
}

impl DockZone {
    /// Every zone, in layout order (edges first, center last).
    pub const ALL: [Self; 5] = [Self::Left, Self::Right, Self::Top, Self::Bottom, Self::Center];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Center => "center",
        }
    }
}

impl fmt::Display for DockZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DockZone {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            "top" => Ok(Self::Top),
            "bottom" => Ok(Self::Bottom),
            "center" => Ok(Self::Center),
            other => Err(format!("unknown dock zone: {other}")),
        }
    }
}

/// One row of a timeline pane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEntry {
    /// Unix timestamp (seconds) of the entry.
    pub at: i64,
    pub label: String,
}

/// One entry of a menu pane.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub label: String,
    /// Command id dispatched when the item is chosen.
    pub command: String,
}

/// Typed content descriptor carried by a pane.
///
/// The engine never interprets content; it stores and persists it so renderers
/// can match exhaustively on known kinds. Unknown kinds travel as
/// [`PaneContent::Custom`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PaneContent {
    Text {
        body: String,
    },
    Table {
        columns: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    Timeline {
        entries: Vec<TimelineEntry>,
    },
    Menu {
        items: Vec<MenuItem>,
    },
    Custom {
        #[serde(rename = "customKind")]
        custom_kind: String,
        #[serde(default)]
        data: serde_json::Value,
    },
}

/// Authoritative record of one live pane.
///
/// Instances are only ever produced and mutated by the window-state store;
/// everything outside it sees clones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaneState {
    pub id: PaneId,
    pub rect: Rect,
    /// Stacking rank; higher is closer to the viewer.
    pub z: i64,
    pub type_id: String,
    pub docked: Option<DockZone>,
    pub visible: bool,
    pub locked: bool,
    /// Creation sequence, breaks `z` ties.
    pub seq: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<PaneContent>,
}

impl PaneState {
    /// Sort key giving the strict stacking order.
    #[must_use]
    pub const fn stacking_key(&self) -> (i64, u64) {
        (self.z, self.seq)
    }

    #[must_use]
    pub const fn is_floating(&self) -> bool {
        self.docked.is_none()
    }
}

/// Request to create a pane.
///
/// Only `type_id` is mandatory; the store fills in a generated id, the registry
/// default size and the next stacking rank.
///
/// ```
/// use paneflow::domain::{PaneSpec, Rect};
///
/// let spec = PaneSpec::new("notes")
///     .with_id("p1")
///     .with_rect(Rect::new(0.0, 0.0, 100.0, 100.0))
///     .with_z(1);
/// assert_eq!(spec.id.as_ref().map(|id| id.as_str()), Some("p1"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaneSpec {
    #[serde(default)]
    pub id: Option<PaneId>,
    pub type_id: String,
    #[serde(default)]
    pub rect: Option<Rect>,
    #[serde(default)]
    pub z: Option<i64>,
    #[serde(default)]
    pub docked: Option<DockZone>,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub content: Option<PaneContent>,
}

const fn default_true() -> bool {
    true
}

impl PaneSpec {
    pub fn new(type_id: impl Into<String>) -> Self {
        Self {
            id: None,
            type_id: type_id.into(),
            rect: None,
            z: None,
            docked: None,
            visible: true,
            locked: false,
            content: None,
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<PaneId>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub const fn with_rect(mut self, rect: Rect) -> Self {
        self.rect = Some(rect);
        self
    }

    #[must_use]
    pub const fn with_z(mut self, z: i64) -> Self {
        self.z = Some(z);
        self
    }

    #[must_use]
    pub const fn docked(mut self, zone: DockZone) -> Self {
        self.docked = Some(zone);
        self
    }

    #[must_use]
    pub fn with_content(mut self, content: PaneContent) -> Self {
        self.content = Some(content);
        self
    }
}
