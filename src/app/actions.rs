//! Side effects requested by the event handler.
//!
//! [`handle_event`](crate::app::handle_event) mutates the workspace and returns a
//! `Vec<Action>` for the host to carry out: running commands bound to shortcuts,
//! sending sync messages to peers, writing the layout, and reporting shortcut
//! conflicts.
//!
//! ```rust
//! use paneflow::app::Action;
//! use paneflow::sync::SyncMessage;
//!
//! let actions = vec![Action::Broadcast {
//!     message: SyncMessage::pane_closed("crm".into()),
//! }];
//! assert_eq!(actions.len(), 1);
//! ```

use crate::input::KeyCombo;
use crate::shortcuts::{CommandId, ShortcutScope};
use crate::storage::LayoutDocument;
use crate::sync::SyncMessage;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    /// Run the command a shortcut resolved to.
    RunCommand {
        command: CommandId,
        /// Scope whose binding matched.
        scope: ShortcutScope,
    },

    /// Send a change to peer workspaces.
    Broadcast { message: SyncMessage },

    /// Write this layout to storage.
    PersistLayout { document: LayoutDocument },

    /// A shortcut registration replaced an earlier binding.
    ShortcutConflict { combo: KeyCombo, scope: ShortcutScope },
}
