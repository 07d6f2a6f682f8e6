//! Workspace: one live instance of the window-management engine.
//!
//! A [`Workspace`] ties together the window-state store, the docking engine, the
//! shortcut router and the focus manager, and keeps them consistent:
//! - closing a pane drops its shortcut bindings and re-tiles its dock zone
//! - shortcuts only dispatch from, and only bind to, live panes
//! - moving a docked pane out of its zone re-tiles the zone it left
//!
//! Structural store changes are queued as [`SyncMessage`]s for peers; changes
//! replayed through [`Workspace::apply_remote`] are not queued again.
//!
//! After [`Workspace::dispose`] every mutating call fails with
//! [`PaneflowError::Disposed`].
//!
//! # Example
//!
//! ```rust
//! use paneflow::domain::{DockZone, PaneSpec};
//! use paneflow::input::RawPointerEvent;
//! use paneflow::registry::{PaneMetadata, PaneRegistry, TextRenderable};
//! use paneflow::{Config, Workspace};
//! use std::rc::Rc;
//!
//! let mut registry = PaneRegistry::new();
//! registry.register("crm", Rc::new(TextRenderable::new("CRM")), PaneMetadata::new("Customers"))?;
//!
//! let mut workspace = Workspace::init(Config::default(), registry);
//! let id = workspace.create_pane(PaneSpec::new("crm"))?;
//!
//! workspace.begin_drag(id.as_str())?;
//! workspace.drag_over(&RawPointerEvent::mouse(5.0, 500.0), None)?;
//! assert_eq!(workspace.drop_pane(&RawPointerEvent::mouse(5.0, 500.0))?, Some(DockZone::Left));
//! # Ok::<(), paneflow::PaneflowError>(())
//! ```

use crate::app::modes::InteractionMode;
use crate::app::store::{Listener, ListenerId, StoreEvent, StoreSnapshot, WindowStore};
use crate::docking::DockingEngine;
use crate::domain::error::{PaneflowError, Result};
use crate::domain::geometry::Rect;
use crate::domain::{DockZone, PaneId, PaneSpec, PaneState};
use crate::focus::{FocusManager, FocusTarget};
use crate::input::{normalize, KeyCombo, RawPointerEvent};
use crate::registry::{render_pane, PaneRegistry, PaneRender, RegistryMatch};
use crate::shortcuts::{CommandId, Shortcut, ShortcutRouter, ShortcutScope};
use crate::storage::{LayoutDocument, LayoutStorage, PaneRecord, CURRENT_LAYOUT_VERSION};
use crate::sync::{publish, SyncMessage, Transport};
use crate::Config;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[derive(Debug)]
pub struct Workspace {
    config: Config,
    store: WindowStore,
    docking: DockingEngine,
    shortcuts: ShortcutRouter,
    focus: FocusManager,
    mode: InteractionMode,
    outbox: Rc<RefCell<Vec<SyncMessage>>>,
    applying_remote: Rc<Cell<bool>>,
    disposed: bool,
}

impl Workspace {
    /// Creates a workspace. `registry` is frozen from here on.
    #[must_use]
    pub fn init(config: Config, registry: PaneRegistry) -> Self {
        let _span = tracing::debug_span!("workspace_init", pane_types = registry.len()).entered();

        let mut store = WindowStore::new(Rc::new(registry), config.grid_step);
        let outbox = Rc::new(RefCell::new(Vec::new()));
        let applying_remote = Rc::new(Cell::new(false));

        let sink = Rc::clone(&outbox);
        let remote = Rc::clone(&applying_remote);
        store.subscribe(Box::new(move |event: &StoreEvent, snapshot: &StoreSnapshot| -> Result<()> {
            if remote.get() {
                return Ok(());
            }
            if let Some(message) = SyncMessage::from_store_event(event, snapshot) {
                sink.borrow_mut().push(message);
            }
            Ok(())
        }));

        let docking = DockingEngine::new(config.docking());
        let shortcuts = ShortcutRouter::from_config(&config.shortcuts);

        tracing::info!(
            grid_step = ?config.grid_step,
            shortcuts = shortcuts.len(),
            "workspace initialized"
        );

        Self {
            config,
            store,
            docking,
            shortcuts,
            focus: FocusManager::new(),
            mode: InteractionMode::Idle,
            outbox,
            applying_remote,
            disposed: false,
        }
    }

    /// Tears the workspace down: listeners, drag state, remembered focus and
    /// queued sync messages are dropped. Idempotent.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.store.clear_listeners();
        self.docking.cancel();
        self.focus.clear();
        self.outbox.borrow_mut().clear();
        self.mode = InteractionMode::Idle;
        self.disposed = true;
        tracing::info!(panes = self.store.len(), "workspace disposed");
    }

    #[must_use]
    pub const fn is_disposed(&self) -> bool {
        self.disposed
    }

    fn ensure_live(&self) -> Result<()> {
        if self.disposed {
            Err(PaneflowError::Disposed)
        } else {
            Ok(())
        }
    }

    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub const fn store(&self) -> &WindowStore {
        &self.store
    }

    #[must_use]
    pub fn registry(&self) -> &PaneRegistry {
        self.store.registry()
    }

    #[must_use]
    pub const fn docking(&self) -> &DockingEngine {
        &self.docking
    }

    #[must_use]
    pub const fn shortcuts(&self) -> &ShortcutRouter {
        &self.shortcuts
    }

    #[must_use]
    pub const fn mode(&self) -> &InteractionMode {
        &self.mode
    }

    // Pane operations

    /// Creates a pane; see [`WindowStore::create_pane`].
    ///
    /// # Errors
    ///
    /// Store validation errors, or [`PaneflowError::Disposed`].
    pub fn create_pane(&mut self, spec: PaneSpec) -> Result<PaneId> {
        self.ensure_live()?;
        let docked = spec.docked.is_some();
        let id = self.store.create_pane(spec)?;
        if docked {
            self.relayout()?;
        }
        Ok(id)
    }

    /// Moves a pane to `(x, y)`. A docked pane becomes floating and its former
    /// zone is re-tiled.
    ///
    /// # Errors
    ///
    /// [`PaneflowError::NotFound`], [`PaneflowError::Locked`],
    /// [`PaneflowError::InvalidDimension`] or [`PaneflowError::Disposed`].
    pub fn move_pane(&mut self, id: &str, x: f64, y: f64) -> Result<()> {
        self.ensure_live()?;
        let was_docked = self.is_docked(id);
        self.store.move_pane(id, x, y)?;
        if was_docked {
            self.relayout()?;
        }
        Ok(())
    }

    /// Moves a pane by a relative offset.
    ///
    /// # Errors
    ///
    /// Same as [`Workspace::move_pane`].
    pub fn move_pane_by(&mut self, id: &str, dx: f64, dy: f64) -> Result<()> {
        self.ensure_live()?;
        let was_docked = self.is_docked(id);
        self.store.move_pane_by(id, dx, dy)?;
        if was_docked {
            self.relayout()?;
        }
        Ok(())
    }

    /// # Errors
    ///
    /// See [`WindowStore::resize_pane`], plus [`PaneflowError::Disposed`].
    pub fn resize_pane(&mut self, id: &str, w: f64, h: f64) -> Result<()> {
        self.ensure_live()?;
        self.store.resize_pane(id, w, h)
    }

    /// # Errors
    ///
    /// [`PaneflowError::NotFound`] or [`PaneflowError::Disposed`].
    pub fn focus_pane(&mut self, id: &str) -> Result<()> {
        self.ensure_live()?;
        self.store.focus_pane(id)
    }

    /// Closes a pane and drops its shortcut bindings.
    ///
    /// A drag carrying the pane is abandoned; a docked pane's zone is re-tiled.
    ///
    /// # Errors
    ///
    /// [`PaneflowError::NotFound`] or [`PaneflowError::Disposed`].
    pub fn close_pane(&mut self, id: &str) -> Result<PaneState> {
        self.ensure_live()?;
        let closed = self.store.close_pane(id)?;
        self.shortcuts.drop_scope(&closed.id);

        if self.docking.payload() == Some(&closed.id) {
            self.cancel_drag();
        }
        if closed.docked.is_some() {
            self.relayout()?;
        }
        Ok(closed)
    }

    /// Docks a pane into `zone`, or floats it with `None`, then re-tiles.
    ///
    /// # Errors
    ///
    /// [`PaneflowError::NotFound`], [`PaneflowError::Locked`] or
    /// [`PaneflowError::Disposed`].
    pub fn set_docked(&mut self, id: &str, zone: Option<DockZone>) -> Result<()> {
        self.ensure_live()?;
        self.store.set_docked(id, zone)?;
        self.relayout()
    }

    /// # Errors
    ///
    /// [`PaneflowError::NotFound`] or [`PaneflowError::Disposed`].
    pub fn set_visible(&mut self, id: &str, visible: bool) -> Result<()> {
        self.ensure_live()?;
        self.store.set_visible(id, visible)
    }

    /// # Errors
    ///
    /// [`PaneflowError::NotFound`] or [`PaneflowError::Disposed`].
    pub fn set_locked(&mut self, id: &str, locked: bool) -> Result<()> {
        self.ensure_live()?;
        self.store.set_locked(id, locked)
    }

    #[must_use]
    pub fn get_state(&self) -> StoreSnapshot {
        self.store.get_state()
    }

    /// # Errors
    ///
    /// [`PaneflowError::Disposed`].
    pub fn subscribe(&mut self, listener: Listener) -> Result<ListenerId> {
        self.ensure_live()?;
        Ok(self.store.subscribe(listener))
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.store.unsubscribe(id)
    }

    /// Performance-degradation signal from the host; suspends grid snapping.
    pub fn set_degraded(&mut self, degraded: bool) {
        self.store.set_degraded(degraded);
    }

    fn is_docked(&self, id: &str) -> bool {
        self.store.pane(id).is_some_and(|p| p.docked.is_some())
    }

    // Docking

    /// Re-tiles every docked pane.
    ///
    /// # Errors
    ///
    /// Propagates store layout errors.
    pub fn relayout(&mut self) -> Result<()> {
        self.docking.relayout(&mut self.store)
    }

    /// Changes the viewport and re-tiles docked panes.
    ///
    /// # Errors
    ///
    /// [`PaneflowError::InvalidDimension`] for a degenerate viewport, or
    /// [`PaneflowError::Disposed`].
    pub fn set_viewport(&mut self, viewport: Rect) -> Result<()> {
        self.ensure_live()?;
        if !viewport.is_valid() {
            return Err(PaneflowError::InvalidDimension {
                width: viewport.w,
                height: viewport.h,
            });
        }
        self.config.viewport = viewport;
        self.docking.set_viewport(viewport);
        self.relayout()
    }

    /// Starts dragging a live pane.
    ///
    /// # Errors
    ///
    /// [`PaneflowError::NotFound`] or [`PaneflowError::Disposed`].
    pub fn begin_drag(&mut self, id: &str) -> Result<()> {
        self.ensure_live()?;
        let pane = self.store.pane(id).ok_or_else(|| PaneflowError::NotFound(id.to_string()))?.id.clone();
        self.docking.begin_drag(pane.clone());
        self.mode = InteractionMode::Dragging { pane };
        Ok(())
    }

    /// Feeds a raw pointer sample to the drag; returns whether the active zone changed.
    ///
    /// # Errors
    ///
    /// [`PaneflowError::Disposed`].
    pub fn drag_over(&mut self, raw: &RawPointerEvent, zone_hint: Option<DockZone>) -> Result<bool> {
        self.ensure_live()?;
        Ok(self.docking.on_drag_over(&normalize(raw), zone_hint))
    }

    /// Ends the drag, docking the dragged pane into the active zone if possible.
    ///
    /// # Errors
    ///
    /// [`PaneflowError::Disposed`], or store errors from the relayout.
    pub fn drop_pane(&mut self, raw: &RawPointerEvent) -> Result<Option<DockZone>> {
        self.ensure_live()?;
        if self.mode.is_dragging() {
            self.mode = InteractionMode::Idle;
        }
        self.docking.on_drop(&normalize(raw), &mut self.store)
    }

    pub fn cancel_drag(&mut self) {
        self.docking.cancel();
        if self.mode.is_dragging() {
            self.mode = InteractionMode::Idle;
        }
    }

    // Shortcuts

    /// Registers a binding; returns `true` if it replaced an earlier one.
    ///
    /// A binding scoped to a pane that is not live is ignored.
    ///
    /// # Errors
    ///
    /// [`PaneflowError::Disposed`].
    pub fn register_shortcut(&mut self, shortcut: Shortcut) -> Result<bool> {
        self.ensure_live()?;
        if let ShortcutScope::Pane(id) = &shortcut.scope {
            if !self.store.contains(id.as_str()) {
                tracing::warn!(combo = %shortcut.combo, scope = %shortcut.scope, "ignoring binding for closed pane");
                return Ok(false);
            }
        }
        Ok(self.shortcuts.register(shortcut))
    }

    pub fn unregister_shortcut(&mut self, combo: &KeyCombo, scope: &ShortcutScope) -> Option<CommandId> {
        self.shortcuts.unregister(combo, scope)
    }

    /// Resolves a key chord to a command and the scope that matched.
    ///
    /// `scope` defaults to the topmost pane. A scope naming a pane that is not
    /// live resolves to nothing, not even a global binding. While a modal is
    /// open only global bindings fire.
    #[must_use]
    pub fn dispatch_shortcut(&self, combo: &KeyCombo, scope: Option<&PaneId>) -> Option<(CommandId, ShortcutScope)> {
        if self.disposed {
            return None;
        }
        if !self.mode.allows_pane_shortcuts() {
            return self.shortcuts.dispatch_scoped(combo, None);
        }
        if let Some(pane) = scope {
            if !self.store.contains(pane.as_str()) {
                tracing::debug!(combo = %combo, pane_id = %pane, "dispatch from closed pane scope");
                return None;
            }
        }
        let current = scope.or_else(|| self.store.top_pane().map(|p| &p.id));
        self.shortcuts.dispatch_scoped(combo, current)
    }

    // Focus

    /// Remembers the element to refocus when the next modal is dismissed.
    pub fn remember_focus(&mut self, target: &Rc<dyn FocusTarget>) {
        self.focus.remember(target);
    }

    /// Enters modal mode.
    ///
    /// # Errors
    ///
    /// [`PaneflowError::Disposed`].
    pub fn open_modal(&mut self) -> Result<()> {
        self.ensure_live()?;
        self.cancel_drag();
        self.mode = InteractionMode::Modal;
        Ok(())
    }

    /// Leaves modal mode and restores the remembered focus. Returns whether
    /// focus was restored.
    pub fn dismiss_modal(&mut self) -> bool {
        if self.mode == InteractionMode::Modal {
            self.mode = InteractionMode::Idle;
        }
        self.focus.restore()
    }

    // Rendering and lookup

    /// Renders visible panes bottom to top. A failing pane yields a placeholder
    /// and does not affect the others.
    #[must_use]
    pub fn render_all(&self) -> Vec<PaneRender> {
        let _span = tracing::debug_span!("render_all", panes = self.store.len()).entered();
        self.store
            .panes_by_z()
            .into_iter()
            .filter(|p| p.visible)
            .map(|p| render_pane(self.store.registry(), p))
            .collect()
    }

    /// Fuzzy-searches registered pane types, for pane pickers.
    #[must_use]
    pub fn search_pane_types(&self, query: &str) -> Vec<RegistryMatch> {
        self.store.registry().search(query)
    }

    // Persistence

    #[must_use]
    pub fn layout_document(&self) -> LayoutDocument {
        LayoutDocument::from_panes(self.store.panes())
    }

    /// Replaces all panes with those of a saved layout.
    ///
    /// Records of unknown types, with invalid geometry, with an id already
    /// restored, or a second record of a singleton type are skipped with a
    /// warning. Docked panes are re-tiled for the current viewport. Returns the
    /// number of panes restored.
    ///
    /// # Errors
    ///
    /// [`PaneflowError::Storage`] for a document newer than this build
    /// understands, or [`PaneflowError::Disposed`].
    pub fn restore_layout(&mut self, document: &LayoutDocument) -> Result<usize> {
        self.ensure_live()?;
        let _span = tracing::debug_span!("restore_layout", records = document.panes.len()).entered();

        if document.version > CURRENT_LAYOUT_VERSION {
            return Err(PaneflowError::Storage(format!(
                "layout version {} is newer than supported version {CURRENT_LAYOUT_VERSION}",
                document.version
            )));
        }

        let mut accepted = Vec::with_capacity(document.panes.len());
        for record in &document.panes {
            let Some(entry) = self.store.registry().resolve(&record.type_id) else {
                tracing::warn!(pane_id = %record.id, type_id = %record.type_id, "skipping pane of unknown type");
                continue;
            };
            if !record.rect().is_valid() {
                tracing::warn!(pane_id = %record.id, "skipping pane with invalid geometry");
                continue;
            }
            if accepted.iter().any(|r: &PaneRecord| r.id == record.id) {
                tracing::warn!(pane_id = %record.id, "skipping duplicate pane id");
                continue;
            }
            if entry.metadata.singleton && accepted.iter().any(|r| r.type_id == record.type_id) {
                tracing::warn!(pane_id = %record.id, type_id = %record.type_id, "skipping second singleton pane");
                continue;
            }
            accepted.push(record.clone());
        }

        let panes: Vec<PaneState> = accepted
            .into_iter()
            .map(|record| {
                let seq = self.store.allocate_seq();
                record.into_state(seq)
            })
            .collect();

        let dropped: Vec<PaneId> = self
            .store
            .panes()
            .iter()
            .filter(|old| !panes.iter().any(|p| p.id == old.id))
            .map(|old| old.id.clone())
            .collect();
        for id in &dropped {
            self.shortcuts.drop_scope(id);
        }

        self.cancel_drag();
        let count = panes.len();
        self.store.replace_all(panes);
        self.relayout()?;

        tracing::info!(restored = count, skipped = document.panes.len() - count, "layout restored");
        Ok(count)
    }

    /// Writes the current layout to `storage`.
    ///
    /// # Errors
    ///
    /// Storage write errors.
    pub fn save_layout(&self, storage: &mut dyn LayoutStorage) -> Result<()> {
        storage.save(&self.layout_document())
    }

    /// Restores the layout saved in `storage`, if any. Returns the number of
    /// panes restored.
    ///
    /// # Errors
    ///
    /// Storage read errors, or those of [`Workspace::restore_layout`].
    pub fn load_layout(&mut self, storage: &dyn LayoutStorage) -> Result<usize> {
        match storage.load()? {
            Some(document) => self.restore_layout(&document),
            None => Ok(0),
        }
    }

    // Sync

    /// Drains the sync messages queued by local changes.
    pub fn take_outgoing(&self) -> Vec<SyncMessage> {
        std::mem::take(&mut *self.outbox.borrow_mut())
    }

    /// Drains queued sync messages into `transport`. Returns how many were sent.
    ///
    /// # Errors
    ///
    /// The first transport error; messages after it stay unsent and are dropped.
    pub fn publish_outgoing(&self, transport: &dyn Transport) -> Result<usize> {
        let outgoing = self.take_outgoing();
        for message in &outgoing {
            publish(transport, message)?;
        }
        Ok(outgoing.len())
    }

    /// Replays a change made by a peer. The change is not queued for broadcast.
    ///
    /// # Errors
    ///
    /// Whatever the replayed operation returns, e.g. [`PaneflowError::NotFound`]
    /// for a pane this workspace never saw.
    pub fn apply_remote(&mut self, message: &SyncMessage) -> Result<()> {
        self.ensure_live()?;
        let _span = tracing::debug_span!("apply_remote", kind = message.kind(), pane_id = %message.pane_id()).entered();

        self.applying_remote.set(true);
        let result = self.replay(message);
        self.applying_remote.set(false);

        if let Err(e) = &result {
            tracing::warn!(error = %e, "remote change rejected");
        }
        result
    }

    fn replay(&mut self, message: &SyncMessage) -> Result<()> {
        match message {
            SyncMessage::PaneCreated { pane, .. } => {
                let spec = PaneSpec {
                    id: Some(pane.id.clone()),
                    type_id: pane.type_id.clone(),
                    rect: Some(pane.rect),
                    z: Some(pane.z),
                    docked: pane.docked,
                    visible: pane.visible,
                    locked: pane.locked,
                    content: pane.content.clone(),
                };
                self.create_pane(spec).map(|_| ())
            }
            SyncMessage::PaneMoved { id, x, y, .. } => self.move_pane(id.as_str(), *x, *y),
            SyncMessage::PaneResized { id, w, h, .. } => self.resize_pane(id.as_str(), *w, *h),
            SyncMessage::PaneFocused { id, .. } => self.focus_pane(id.as_str()),
            SyncMessage::PaneClosed { id, .. } => self.close_pane(id.as_str()).map(|_| ()),
            SyncMessage::PaneDocked { id, zone, .. } => self.set_docked(id.as_str(), *zone),
            SyncMessage::PaneVisibility { id, visible, .. } => self.set_visible(id.as_str(), *visible),
            SyncMessage::PaneLocked { id, locked, .. } => self.set_locked(id.as_str(), *locked),
        }
    }
}
