//! Headless host and entry point.
//!
//! Drives a [`Workspace`] from the command line: events arrive as JSON lines on
//! stdin and every reply is a JSON line on stdout.
//!
//! ```text
//! stdin  → {"type":"create_pane","typeId":"notes"}
//! stdout ← {"render":true,"actions":[{"action":"broadcast",...}],"frame":["[Notes] pane-1"]}
//! ```
//!
//! # Lifecycle
//!
//! 1. **Load**: Parse the TOML config given as first argument (or defaults),
//!    initialize tracing, register the built-in pane types
//! 2. **Restore**: Load the saved layout from `layout_file`, if present
//! 3. **Loop**: Handle each event and execute the resulting actions
//! 4. **Exit**: On EOF the layout is saved and the workspace disposed
//!
//! # Actions
//!
//! - `persist_layout`: written to the layout file
//! - `run_command`, `broadcast`, `shortcut_conflict`: echoed to stdout for the
//!   embedding process to act on

#![allow(clippy::multiple_crate_versions)]

use std::io::{self, BufRead, Write};
use std::rc::Rc;

use paneflow::registry::{PaneMetadata, PaneRegistry, TextRenderable};
use paneflow::storage::{JsonLayoutStorage, LayoutStorage};
use paneflow::{handle_event, Action, Config, Event, Workspace};

/// Host state wrapper.
struct Host {
    workspace: Workspace,

    /// Layout file backend; `None` when the data directory is unusable.
    storage: Option<JsonLayoutStorage>,
}

impl Host {
    fn load(config: Config) -> Self {
        let span = tracing::debug_span!("host_load");
        let _guard = span.entered();

        let mut workspace = paneflow::initialize(&config, builtin_registry());

        let storage = match JsonLayoutStorage::new(config.layout_path()) {
            Ok(storage) => Some(storage),
            Err(e) => {
                tracing::warn!(error = %e, path = ?config.layout_path(), "layout storage unavailable");
                None
            }
        };

        if let Some(storage) = &storage {
            match workspace.load_layout(storage) {
                Ok(restored) => tracing::info!(restored, "layout loaded"),
                Err(e) => tracing::warn!(error = %e, "failed to restore layout, starting empty"),
            }
        }
        // Restoring is not a local change peers need to hear about.
        workspace.take_outgoing();

        Self { workspace, storage }
    }

    fn update(&mut self, line: &str) -> serde_json::Value {
        let event: Event = match serde_json::from_str(line) {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!(error = %e, "ignoring malformed event");
                return serde_json::json!({ "error": e.to_string() });
            }
        };

        let span = tracing::debug_span!("host_update", event_type = event.name());
        let _guard = span.entered();

        match handle_event(&mut self.workspace, &event) {
            Ok((should_render, actions)) => {
                tracing::debug!(action_count = actions.len(), should_render, "event handled successfully");
                for action in &actions {
                    self.execute_action(action);
                }
                let frame: Option<Vec<String>> = should_render.then(|| self.frame());
                serde_json::json!({
                    "render": should_render,
                    "actions": actions,
                    "frame": frame,
                })
            }
            Err(e) => {
                tracing::debug!(error = %e, "error handling event");
                serde_json::json!({ "error": e.to_string() })
            }
        }
    }

    fn frame(&self) -> Vec<String> {
        self.workspace
            .render_all()
            .into_iter()
            .map(|render| match render {
                paneflow::registry::PaneRender::Rendered { output, .. } => output,
                paneflow::registry::PaneRender::Failed { pane_id, message } => {
                    format!("[failed] {pane_id}: {message}")
                }
            })
            .collect()
    }

    #[tracing::instrument(level = "debug", skip(self))]
    fn execute_action(&mut self, action: &Action) {
        match action {
            Action::PersistLayout { document } => match self.storage.as_mut() {
                Some(storage) => {
                    if let Err(e) = storage.save(document) {
                        tracing::error!(error = %e, "failed to persist layout");
                    }
                }
                None => tracing::debug!("no layout storage, skipping persist"),
            },
            Action::RunCommand { command, scope } => {
                tracing::debug!(command = %command, scope = %scope, "command handed to embedder");
            }
            Action::Broadcast { message } => {
                tracing::trace!(kind = message.kind(), "broadcast handed to embedder");
            }
            Action::ShortcutConflict { combo, scope } => {
                tracing::debug!(combo = %combo, scope = %scope, "shortcut conflict reported");
            }
        }
    }

    fn shutdown(&mut self) {
        if let Some(storage) = self.storage.as_mut() {
            if let Err(e) = self.workspace.save_layout(storage) {
                tracing::error!(error = %e, "failed to save layout on exit");
            }
        }
        self.workspace.dispose();
    }
}

fn builtin_registry() -> PaneRegistry {
    let mut registry = PaneRegistry::new();
    let builtins = [
        ("notes", PaneMetadata::new("Notes").with_icon("note")),
        ("table", PaneMetadata::new("Table").with_default_size(480.0, 320.0)),
        ("timeline", PaneMetadata::new("Timeline").with_default_size(640.0, 200.0)),
        ("menu", PaneMetadata::new("Menu").with_default_size(200.0, 360.0)),
        ("assistant", PaneMetadata::new("Assistant").singleton()),
    ];
    for (type_id, metadata) in builtins {
        let heading = metadata.title.clone();
        if let Err(e) = registry.register(type_id, Rc::new(TextRenderable::new(heading)), metadata) {
            tracing::warn!(type_id, error = %e, "failed to register built-in pane type");
        }
    }
    registry
}

fn main() {
    let config = match std::env::args().nth(1) {
        Some(path) => Config::from_file(&path).unwrap_or_else(|e| {
            eprintln!("paneflow: {e}, using defaults");
            Config::default()
        }),
        None => Config::default(),
    };
    paneflow::observability::init_tracing(&config);

    let mut host = Host::load(config);
    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                tracing::error!(error = %e, "failed to read stdin");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        let reply = host.update(&line);
        if writeln!(stdout, "{reply}").and_then(|()| stdout.flush()).is_err() {
            break;
        }
    }

    host.shutdown();
}
