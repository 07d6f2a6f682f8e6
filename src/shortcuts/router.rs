//! Shortcut routing table.
//!
//! One binding exists per `(combo, scope)` pair. Registering the same pair twice
//! replaces the earlier command and reports the conflict to the caller, so
//! hosts can surface it without the router failing.
//!
//! The router does not track pane lifetimes. When a pane closes, the owner drops
//! the scope's bindings with [`ShortcutRouter::drop_scope`] and stops
//! dispatching from that scope.
//!
//! # Example
//!
//! ```rust
//! use paneflow::input::KeyCombo;
//! use paneflow::shortcuts::{Shortcut, ShortcutRouter, ShortcutScope};
//!
//! let mut router = ShortcutRouter::new();
//! let save = KeyCombo::parse("ctrl+s")?;
//! router.register(Shortcut::new(save.clone(), ShortcutScope::Global, "workspace.save"));
//! router.register(Shortcut::new(save.clone(), ShortcutScope::pane("editor-1"), "editor.save"));
//!
//! assert_eq!(router.dispatch(&save, Some(&"editor-1".into())).as_deref(), Some("editor.save"));
//! assert_eq!(router.dispatch(&save, None).as_deref(), Some("workspace.save"));
//! # Ok::<(), paneflow::PaneflowError>(())
//! ```

use crate::domain::PaneId;
use crate::input::KeyCombo;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Identifier of the command a shortcut triggers.
pub type CommandId = String;

/// Where a binding applies.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShortcutScope {
    Global,
    Pane(PaneId),
}

impl ShortcutScope {
    pub fn pane(id: impl Into<PaneId>) -> Self {
        Self::Pane(id.into())
    }
}

impl fmt::Display for ShortcutScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Global => f.write_str("global"),
            Self::Pane(id) => write!(f, "pane:{id}"),
        }
    }
}

/// A single binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shortcut {
    pub combo: KeyCombo,
    pub scope: ShortcutScope,
    pub action: CommandId,
}

impl Shortcut {
    pub fn new(combo: KeyCombo, scope: ShortcutScope, action: impl Into<CommandId>) -> Self {
        Self {
            combo,
            scope,
            action: action.into(),
        }
    }
}

/// Global binding as written in the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortcutConfig {
    pub combo: String,
    pub action: String,
}

#[derive(Debug, Default, Clone)]
pub struct ShortcutRouter {
    bindings: HashMap<(KeyCombo, ShortcutScope), CommandId>,
}

impl ShortcutRouter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a router holding the configured global bindings.
    ///
    /// Entries whose combo does not parse are logged and skipped.
    #[must_use]
    pub fn from_config(entries: &[ShortcutConfig]) -> Self {
        let mut router = Self::new();
        for entry in entries {
            match KeyCombo::parse(&entry.combo) {
                Ok(combo) => {
                    router.register(Shortcut::new(combo, ShortcutScope::Global, entry.action.clone()));
                }
                Err(e) => {
                    tracing::warn!(combo = %entry.combo, action = %entry.action, error = %e, "skipping invalid shortcut");
                }
            }
        }
        tracing::info!(bindings = router.len(), "shortcut router initialized");
        router
    }

    /// Adds a binding. Returns `true` when it replaced an earlier binding for the
    /// same combo and scope.
    pub fn register(&mut self, shortcut: Shortcut) -> bool {
        let Shortcut { combo, scope, action } = shortcut;
        let key = (combo, scope);
        match self.bindings.insert(key.clone(), action.clone()) {
            Some(previous) if previous != action => {
                tracing::warn!(
                    combo = %key.0,
                    scope = %key.1,
                    previous = %previous,
                    action = %action,
                    "shortcut conflict, later binding wins"
                );
                true
            }
            Some(_) => true,
            None => {
                tracing::debug!(combo = %key.0, scope = %key.1, action = %action, "shortcut registered");
                false
            }
        }
    }

    /// Removes a binding and returns its command.
    pub fn unregister(&mut self, combo: &KeyCombo, scope: &ShortcutScope) -> Option<CommandId> {
        self.bindings.remove(&(combo.clone(), scope.clone()))
    }

    /// Resolves `combo` pressed while `current` (the focused pane, if any) is active.
    #[must_use]
    pub fn dispatch(&self, combo: &KeyCombo, current: Option<&PaneId>) -> Option<CommandId> {
        self.dispatch_scoped(combo, current).map(|(command, _)| command)
    }

    /// Like [`dispatch`](Self::dispatch), also returning the scope whose binding matched.
    #[must_use]
    pub fn dispatch_scoped(&self, combo: &KeyCombo, current: Option<&PaneId>) -> Option<(CommandId, ShortcutScope)> {
        if let Some(pane) = current {
            let scope = ShortcutScope::Pane(pane.clone());
            if let Some(action) = self.bindings.get(&(combo.clone(), scope.clone())) {
                return Some((action.clone(), scope));
            }
        }

        self.bindings
            .get(&(combo.clone(), ShortcutScope::Global))
            .map(|action| (action.clone(), ShortcutScope::Global))
    }

    /// Drops every binding of a pane's scope. Returns how many were removed.
    pub fn drop_scope(&mut self, pane: &PaneId) -> usize {
        let before = self.bindings.len();
        self.bindings
            .retain(|(_, scope), _| !matches!(scope, ShortcutScope::Pane(id) if id == pane));
        let dropped = before - self.bindings.len();
        if dropped > 0 {
            tracing::debug!(pane_id = %pane, dropped, "pane shortcut scope dropped");
        }
        dropped
    }

    /// All bindings, global first, then by pane id and combo.
    #[must_use]
    pub fn bindings(&self) -> Vec<Shortcut> {
        let mut all: Vec<Shortcut> = self
            .bindings
            .iter()
            .map(|((combo, scope), action)| Shortcut::new(combo.clone(), scope.clone(), action.clone()))
            .collect();
        all.sort_by(|a, b| a.scope.cmp(&b.scope).then_with(|| a.combo.cmp(&b.combo)));
        all
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn combo(s: &str) -> KeyCombo {
        KeyCombo::parse(s).unwrap()
    }

    #[test]
    fn pane_scope_wins_over_global() {
        let mut router = ShortcutRouter::new();
        router.register(Shortcut::new(combo("ctrl+k"), ShortcutScope::Global, "palette.open"));
        router.register(Shortcut::new(combo("ctrl+k"), ShortcutScope::pane("crm"), "crm.search"));

        let crm = PaneId::from("crm");
        let other = PaneId::from("schedule");
        assert_eq!(router.dispatch(&combo("Control+K"), Some(&crm)).as_deref(), Some("crm.search"));
        assert_eq!(router.dispatch(&combo("ctrl+k"), Some(&other)).as_deref(), Some("palette.open"));
        assert_eq!(router.dispatch(&combo("ctrl+j"), Some(&crm)), None);
    }

    #[test]
    fn conflicting_registration_replaces_and_reports() {
        let mut router = ShortcutRouter::new();
        assert!(!router.register(Shortcut::new(combo("ctrl+s"), ShortcutScope::Global, "a")));
        assert!(router.register(Shortcut::new(combo("shift+ctrl+S"), ShortcutScope::Global, "b")));
        assert_eq!(router.len(), 1);
        assert_eq!(router.dispatch(&combo("ctrl+shift+s"), None).as_deref(), Some("b"));
    }

    #[test]
    fn dropping_a_scope_keeps_other_bindings() {
        let mut router = ShortcutRouter::new();
        let pane = PaneId::from("notes-1");
        router.register(Shortcut::new(combo("ctrl+d"), ShortcutScope::Global, "global.delete"));
        router.register(Shortcut::new(combo("ctrl+d"), ShortcutScope::Pane(pane.clone()), "notes.delete"));
        router.register(Shortcut::new(combo("ctrl+e"), ShortcutScope::Pane(pane.clone()), "notes.edit"));
        router.register(Shortcut::new(combo("ctrl+e"), ShortcutScope::pane("notes-2"), "other.edit"));

        assert_eq!(router.drop_scope(&pane), 2);
        assert_eq!(router.len(), 2);
        assert_eq!(router.dispatch(&combo("ctrl+d"), Some(&pane)).as_deref(), Some("global.delete"));
        assert_eq!(router.drop_scope(&pane), 0);
    }

    #[test]
    fn from_config_skips_invalid_entries() {
        let router = ShortcutRouter::from_config(&[
            ShortcutConfig { combo: "ctrl+p".into(), action: "palette".into() },
            ShortcutConfig { combo: "ctrl+".into(), action: "broken".into() },
            ShortcutConfig { combo: "hyper+x".into(), action: "broken".into() },
        ]);
        assert_eq!(router.len(), 1);
        assert_eq!(router.bindings()[0].action, "palette");
    }

    #[test]
    fn unregister_and_listing() {
        let mut router = ShortcutRouter::new();
        router.register(Shortcut::new(combo("ctrl+b"), ShortcutScope::pane("a"), "a.bold"));
        router.register(Shortcut::new(combo("ctrl+a"), ShortcutScope::Global, "select"));

        let listed: Vec<String> = router.bindings().into_iter().map(|s| s.action).collect();
        assert_eq!(listed, vec!["select", "a.bold"]);

        assert_eq!(router.unregister(&combo("ctrl+a"), &ShortcutScope::Global).as_deref(), Some("select"));
        assert_eq!(router.dispatch(&combo("ctrl+a"), None), None);
    }
}
