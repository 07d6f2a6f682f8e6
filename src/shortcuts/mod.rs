//! Scoped keyboard shortcuts.
//!
//! Bindings map a canonical [`KeyCombo`](crate::input::KeyCombo) within a
//! [`ShortcutScope`] to a command id. Dispatch prefers the binding of the focused
//! pane's scope and falls back to the global one.
//!
//! - [`router`]: binding table, dispatch and per-pane scopes

pub mod router;

pub use router::{CommandId, Shortcut, ShortcutConfig, ShortcutRouter, ShortcutScope};
