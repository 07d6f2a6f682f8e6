//! Persisted layout records.
//!
//! These types are the on-disk shape of a saved workspace layout. They are kept
//! separate from [`PaneState`] so the file format can stay stable while the live
//! model evolves: creation sequence numbers are not stored (file order is
//! creation order) and missing fields get sensible defaults on load.

use crate::domain::{DockZone, PaneContent, PaneId, PaneState, Rect};
use serde::{Deserialize, Serialize};

/// Newest layout format this build can read and the one it writes.
pub const CURRENT_LAYOUT_VERSION: u32 = 1;

const fn default_version() -> u32 {
    1
}

const fn default_true() -> bool {
    true
}

/// A saved workspace layout.
///
/// ```json
/// {
///   "version": 1,
///   "savedAt": 1718000000,
///   "panes": [
///     { "id": "crm", "typeId": "crm", "x": 0, "y": 0, "w": 480, "h": 320,
///       "z": 1, "docked": "left", "visible": true, "locked": false }
///   ]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutDocument {
    #[serde(default = "default_version")]
    pub version: u32,

    /// Unix timestamp of the save.
    #[serde(default)]
    pub saved_at: i64,

    /// Panes in creation order.
    #[serde(default)]
    pub panes: Vec<PaneRecord>,
}

impl LayoutDocument {
    /// Builds a document from live panes, stamped with the current time.
    #[must_use]
    pub fn from_panes<'a>(panes: impl IntoIterator<Item = &'a PaneState>) -> Self {
        let mut records: Vec<(u64, PaneRecord)> = panes.into_iter().map(|p| (p.seq, PaneRecord::from(p))).collect();
        records.sort_by_key(|(seq, _)| *seq);

        Self {
            version: CURRENT_LAYOUT_VERSION,
            saved_at: chrono::Utc::now().timestamp(),
            panes: records.into_iter().map(|(_, record)| record).collect(),
        }
    }
}

/// One pane of a saved layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaneRecord {
    pub id: PaneId,
    pub type_id: String,
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    #[serde(default)]
    pub z: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docked: Option<DockZone>,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub locked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<PaneContent>,
}

impl PaneRecord {
    #[must_use]
    pub const fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }

    /// Live pane for this record with the given creation sequence.
    #[must_use]
    pub fn into_state(self, seq: u64) -> PaneState {
        PaneState {
            rect: self.rect(),
            id: self.id,
            z: self.z,
            type_id: self.type_id,
            docked: self.docked,
            visible: self.visible,
            locked: self.locked,
            seq,
            content: self.content,
        }
    }
}

impl From<&PaneState> for PaneRecord {
    fn from(pane: &PaneState) -> Self {
        Self {
            id: pane.id.clone(),
            type_id: pane.type_id.clone(),
            x: pane.rect.x,
            y: pane.rect.y,
            w: pane.rect.w,
            h: pane.rect.h,
            z: pane.z,
            docked: pane.docked,
            visible: pane.visible,
            locked: pane.locked,
            content: pane.content.clone(),
        }
    }
}
