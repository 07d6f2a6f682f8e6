//! Event handling for a workspace.
//!
//! Hosts translate their input into [`Event`]s and feed them to [`handle_event`],
//! which mutates the [`Workspace`] and returns whether a re-render is needed along
//! with the [`Action`]s to carry out.
//!
//! Events fall into several categories:
//! - **Panes**: `CreatePane`, `MovePane`, `MovePaneBy`, `ResizePane`, `FocusPane`,
//!   `ClosePane`, `SetVisible`, `SetLocked`
//! - **Docking**: `DragStart`, `DragOver`, `Drop`, `DragCancel`, `Viewport`
//! - **Keyboard**: `Key`, `RegisterShortcut`, `ModalOpened`, `ModalDismissed`
//! - **Host**: `Degraded`, `Remote`, `SaveLayout`
//!
//! Every sync message queued by the workspace while handling the event is drained
//! into trailing [`Action::Broadcast`]s.
//!
//! # Example
//!
//! ```rust
//! use paneflow::app::{handle_event, Action, Event};
//! use paneflow::registry::{PaneMetadata, PaneRegistry, TextRenderable};
//! use paneflow::{Config, Workspace};
//! use std::rc::Rc;
//!
//! let mut registry = PaneRegistry::new();
//! registry.register("notes", Rc::new(TextRenderable::new("Notes")), PaneMetadata::new("Notes"))?;
//! let mut workspace = Workspace::init(Config::default(), registry);
//!
//! let event: Event = serde_json::from_str(r#"{ "type": "key", "combo": "ctrl+k" }"#)?;
//! let (render, actions) = handle_event(&mut workspace, &event)?;
//! assert!(!render);
//! assert!(actions.is_empty()); // nothing bound
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::app::{Action, Workspace};
use crate::domain::error::Result;
use crate::domain::geometry::Rect;
use crate::domain::{DockZone, PaneId, PaneSpec};
use crate::input::{KeyCombo, RawPointerEvent};
use crate::shortcuts::{CommandId, Shortcut, ShortcutScope};
use crate::sync::SyncMessage;
use serde::{Deserialize, Serialize};

/// Input to the workspace, as reported by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    CreatePane(PaneSpec),
    MovePane {
        id: PaneId,
        x: f64,
        y: f64,
    },
    MovePaneBy {
        id: PaneId,
        dx: f64,
        dy: f64,
    },
    ResizePane {
        id: PaneId,
        w: f64,
        h: f64,
    },
    FocusPane {
        id: PaneId,
    },
    ClosePane {
        id: PaneId,
    },
    SetVisible {
        id: PaneId,
        visible: bool,
    },
    SetLocked {
        id: PaneId,
        locked: bool,
    },

    /// A pane's drag handle was grabbed.
    DragStart {
        id: PaneId,
    },
    /// Pointer moved during a drag. `zone` is the drop target the host hit-tested, if any.
    DragOver {
        pointer: RawPointerEvent,
        #[serde(default)]
        zone: Option<DockZone>,
    },
    Drop {
        pointer: RawPointerEvent,
    },
    DragCancel,

    /// A key chord was pressed. `scope` defaults to the topmost pane.
    Key {
        combo: KeyCombo,
        #[serde(default)]
        scope: Option<PaneId>,
    },
    RegisterShortcut {
        combo: KeyCombo,
        scope: ShortcutScope,
        action: CommandId,
    },
    ModalOpened,
    ModalDismissed,

    /// The host is struggling to keep up; grid snapping is suspended while `on`.
    Degraded {
        on: bool,
    },
    Viewport {
        rect: Rect,
    },
    /// A change made by a peer workspace.
    Remote {
        message: SyncMessage,
    },
    SaveLayout,
}

impl Event {
    /// Short name for logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::CreatePane(_) => "create_pane",
            Self::MovePane { .. } => "move_pane",
            Self::MovePaneBy { .. } => "move_pane_by",
            Self::ResizePane { .. } => "resize_pane",
            Self::FocusPane { .. } => "focus_pane",
            Self::ClosePane { .. } => "close_pane",
            Self::SetVisible { .. } => "set_visible",
            Self::SetLocked { .. } => "set_locked",
            Self::DragStart { .. } => "drag_start",
            Self::DragOver { .. } => "drag_over",
            Self::Drop { .. } => "drop",
            Self::DragCancel => "drag_cancel",
            Self::Key { .. } => "key",
            Self::RegisterShortcut { .. } => "register_shortcut",
            Self::ModalOpened => "modal_opened",
            Self::ModalDismissed => "modal_dismissed",
            Self::Degraded { .. } => "degraded",
            Self::Viewport { .. } => "viewport",
            Self::Remote { .. } => "remote",
            Self::SaveLayout => "save_layout",
        }
    }
}

/// Processes one event.
///
/// Returns `(render, actions)`: whether visible state changed, and the side
/// effects for the host.
///
/// # Errors
///
/// Whatever the workspace operation returns. A failed event leaves the
/// workspace as it was and queues no broadcast.
#[allow(clippy::too_many_lines)]
pub fn handle_event(workspace: &mut Workspace, event: &Event) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event_type = event.name()).entered();

    let (render, mut actions) = match event {
        Event::CreatePane(spec) => {
            let id = workspace.create_pane(spec.clone())?;
            tracing::debug!(pane_id = %id, "pane created from event");
            (true, vec![])
        }
        Event::MovePane { id, x, y } => {
            workspace.move_pane(id.as_str(), *x, *y)?;
            (true, vec![])
        }
        Event::MovePaneBy { id, dx, dy } => {
            workspace.move_pane_by(id.as_str(), *dx, *dy)?;
            (true, vec![])
        }
        Event::ResizePane { id, w, h } => {
            workspace.resize_pane(id.as_str(), *w, *h)?;
            (true, vec![])
        }
        Event::FocusPane { id } => {
            workspace.focus_pane(id.as_str())?;
            (true, vec![])
        }
        Event::ClosePane { id } => {
            workspace.close_pane(id.as_str())?;
            (true, vec![])
        }
        Event::SetVisible { id, visible } => {
            workspace.set_visible(id.as_str(), *visible)?;
            (true, vec![])
        }
        Event::SetLocked { id, locked } => {
            workspace.set_locked(id.as_str(), *locked)?;
            (false, vec![])
        }
        Event::DragStart { id } => {
            workspace.begin_drag(id.as_str())?;
            (true, vec![])
        }
        Event::DragOver { pointer, zone } => (workspace.drag_over(pointer, *zone)?, vec![]),
        Event::Drop { pointer } => {
            let zone = workspace.drop_pane(pointer)?;
            tracing::debug!(zone = ?zone, "drop handled");
            (true, vec![])
        }
        Event::DragCancel => {
            workspace.cancel_drag();
            (true, vec![])
        }
        Event::Key { combo, scope } => match workspace.dispatch_shortcut(combo, scope.as_ref()) {
            Some((command, scope)) => {
                tracing::debug!(combo = %combo, command = %command, scope = %scope, "shortcut matched");
                (false, vec![Action::RunCommand { command, scope }])
            }
            None => {
                tracing::trace!(combo = %combo, "no shortcut bound");
                (false, vec![])
            }
        },
        Event::RegisterShortcut { combo, scope, action } => {
            let replaced =
                workspace.register_shortcut(Shortcut::new(combo.clone(), scope.clone(), action.clone()))?;
            if replaced {
                (false, vec![Action::ShortcutConflict {
                    combo: combo.clone(),
                    scope: scope.clone(),
                }])
            } else {
                (false, vec![])
            }
        }
        Event::ModalOpened => {
            workspace.open_modal()?;
            (true, vec![])
        }
        Event::ModalDismissed => {
            let restored = workspace.dismiss_modal();
            tracing::debug!(restored, "modal dismissed");
            (true, vec![])
        }
        Event::Degraded { on } => {
            workspace.set_degraded(*on);
            (false, vec![])
        }
        Event::Viewport { rect } => {
            workspace.set_viewport(*rect)?;
            (true, vec![])
        }
        Event::Remote { message } => {
            workspace.apply_remote(message)?;
            (true, vec![])
        }
        Event::SaveLayout => (false, vec![Action::PersistLayout {
            document: workspace.layout_document(),
        }]),
    };

    actions.extend(
        workspace
            .take_outgoing()
            .into_iter()
            .map(|message| Action::Broadcast { message }),
    );

    Ok((render, actions))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PaneflowError;
    use crate::registry::{PaneMetadata, PaneRegistry, TextRenderable};
    use crate::Config;
    use std::rc::Rc;

    fn workspace() -> Workspace {
        let mut registry = PaneRegistry::new();
        registry
            .register("notes", Rc::new(TextRenderable::new("Notes")), PaneMetadata::new("Notes"))
            .unwrap();
        Workspace::init(
            Config {
                grid_step: None,
                viewport: Rect::new(0.0, 0.0, 1000.0, 800.0),
                ..Config::default()
            },
            registry,
        )
    }

    fn event(json: &str) -> Event {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn create_and_move_broadcast_changes() {
        let mut ws = workspace();
        let (render, actions) = handle_event(&mut ws, &event(r#"{"type":"create_pane","typeId":"notes","id":"n1"}"#)).unwrap();
        assert!(render);
        assert!(matches!(&actions[..], [Action::Broadcast { message: SyncMessage::PaneCreated { .. } }]));

        let (_, actions) = handle_event(&mut ws, &event(r#"{"type":"move_pane","id":"n1","x":30,"y":40}"#)).unwrap();
        assert!(matches!(
            &actions[..],
            [Action::Broadcast { message: SyncMessage::PaneMoved { x, y, .. } }] if *x == 30.0 && *y == 40.0
        ));
    }

    #[test]
    fn failed_event_propagates_error() {
        let mut ws = workspace();
        let result = handle_event(&mut ws, &event(r#"{"type":"close_pane","id":"missing"}"#));
        assert!(matches!(result, Err(PaneflowError::NotFound(_))));
        assert!(ws.take_outgoing().is_empty());
    }

    #[test]
    fn key_runs_bound_command_in_matching_scope() {
        let mut ws = workspace();
        handle_event(&mut ws, &event(r#"{"type":"create_pane","typeId":"notes","id":"n1"}"#)).unwrap();
        handle_event(
            &mut ws,
            &event(r#"{"type":"register_shortcut","combo":"ctrl+b","scope":{"pane":"n1"},"action":"notes.bold"}"#),
        )
        .unwrap();

        let (_, actions) = handle_event(&mut ws, &event(r#"{"type":"key","combo":"Control+B"}"#)).unwrap();
        assert_eq!(actions, vec![Action::RunCommand {
            command: "notes.bold".into(),
            scope: ShortcutScope::pane("n1"),
        }]);
    }

    #[test]
    fn duplicate_registration_reports_conflict() {
        let mut ws = workspace();
        let register = |action: &str| {
            event(&format!(
                r#"{{"type":"register_shortcut","combo":"ctrl+s","scope":"global","action":"{action}"}}"#
            ))
        };
        let (_, first) = handle_event(&mut ws, &register("a")).unwrap();
        let (_, second) = handle_event(&mut ws, &register("b")).unwrap();
        assert!(first.is_empty());
        assert!(matches!(&second[..], [Action::ShortcutConflict { scope: ShortcutScope::Global, .. }]));
    }

    #[test]
    fn save_layout_requests_persistence() {
        let mut ws = workspace();
        handle_event(&mut ws, &event(r#"{"type":"create_pane","typeId":"notes"}"#)).unwrap();
        let (render, actions) = handle_event(&mut ws, &Event::SaveLayout).unwrap();
        assert!(!render);
        assert!(matches!(&actions[..], [Action::PersistLayout { document }] if document.panes.len() == 1));
    }

    #[test]
    fn drag_events_dock_a_pane() {
        let mut ws = workspace();
        handle_event(&mut ws, &event(r#"{"type":"create_pane","typeId":"notes","id":"n1"}"#)).unwrap();
        ws.take_outgoing();

        handle_event(&mut ws, &event(r#"{"type":"drag_start","id":"n1"}"#)).unwrap();
        let (changed, _) =
            handle_event(&mut ws, &event(r#"{"type":"drag_over","pointer":{"clientX":990,"clientY":400}}"#)).unwrap();
        assert!(changed);
        let (_, actions) =
            handle_event(&mut ws, &event(r#"{"type":"drop","pointer":{"clientX":990,"clientY":400}}"#)).unwrap();

        assert_eq!(ws.get_state().pane("n1").unwrap().docked, Some(DockZone::Right));
        assert!(actions
            .iter()
            .any(|a| matches!(a, Action::Broadcast { message: SyncMessage::PaneDocked { .. } })));
    }
}
