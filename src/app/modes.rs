//! Interaction mode of a workspace.
//!
//! The mode decides how input is routed:
//! - **Idle**: pane-scoped and global shortcuts are live
//! - **Dragging**: a pane is being dragged toward a dock zone
//! - **Modal**: an overlay owns the keyboard; only global shortcuts fire, and
//!   dismissing the overlay restores the previously focused element
//!
//! ```rust
//! use paneflow::app::InteractionMode;
//!
//! let mode = InteractionMode::Dragging { pane: "crm".into() };
//! assert!(mode.is_dragging());
//! assert!(!InteractionMode::Modal.allows_pane_shortcuts());
//! ```

use crate::domain::PaneId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum InteractionMode {
    #[default]
    Idle,

    /// A drag carrying `pane` is in progress.
    Dragging { pane: PaneId },

    Modal,
}

impl InteractionMode {
    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging { .. })
    }

    #[must_use]
    pub const fn allows_pane_shortcuts(&self) -> bool {
        !matches!(self, Self::Modal)
    }
}
