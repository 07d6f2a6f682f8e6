//! Window-state store: the authoritative collection of pane records.
//!
//! [`WindowStore`] owns every [`PaneState`] and is the only place they are
//! mutated. All operations are synchronous. After each successful mutation every
//! subscribed listener runs, in registration order, before the call returns.
//!
//! # Listener isolation
//!
//! Listeners receive the event and an owned [`StoreSnapshot`], never the store
//! itself, so they cannot corrupt it. A listener that returns an error or panics
//! is logged and skipped; the remaining listeners still run and the mutation
//! stands.
//!
//! # Missing ids
//!
//! Every per-pane operation on an id that is not live (never created, or
//! already closed) returns [`PaneflowError::NotFound`] without touching state.
//!
//! # Example
//!
//! ```rust
//! use paneflow::app::WindowStore;
//! use paneflow::domain::{PaneSpec, Rect};
//! use paneflow::registry::{PaneMetadata, PaneRegistry, TextRenderable};
//! use std::rc::Rc;
//!
//! let mut registry = PaneRegistry::new();
//! registry.register("notes", Rc::new(TextRenderable::new("Notes")), PaneMetadata::new("Notes"))?;
//!
//! let mut store = WindowStore::new(Rc::new(registry), None);
//! store.create_pane(PaneSpec::new("notes").with_id("p1").with_rect(Rect::new(0.0, 0.0, 100.0, 100.0)))?;
//! store.move_pane("p1", 10.0, 10.0)?;
//! assert_eq!(store.pane("p1").map(|p| (p.rect.x, p.rect.y)), Some((10.0, 10.0)));
//! # Ok::<(), paneflow::PaneflowError>(())
//! ```

use crate::domain::error::{PaneflowError, Result};
use crate::domain::geometry::{snap, Rect};
use crate::domain::{DockZone, PaneId, PaneSpec, PaneState};
use crate::registry::boundary::panic_message;
use crate::registry::PaneRegistry;
use serde::{Deserialize, Serialize};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::rc::Rc;

/// Callback invoked after every store mutation.
pub type Listener = Box<dyn FnMut(&StoreEvent, &StoreSnapshot) -> Result<()>>;

/// Handle returned by [`WindowStore::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

/// What changed in the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StoreEvent {
    Created { id: PaneId },
    Moved { id: PaneId, rect: Rect },
    Resized { id: PaneId, rect: Rect },
    Focused { id: PaneId },
    Closed { id: PaneId },
    Docked { id: PaneId, zone: Option<DockZone> },
    VisibilityChanged { id: PaneId, visible: bool },
    LockChanged { id: PaneId, locked: bool },
    /// Batched rect update from a layout recompute.
    LayoutApplied { ids: Vec<PaneId> },
    /// The whole pane set was replaced (layout restore).
    Replaced { count: usize },
}

impl StoreEvent {
    /// Pane the event is about, if it concerns a single pane.
    #[must_use]
    pub const fn pane_id(&self) -> Option<&PaneId> {
        match self {
            Self::Created { id }
            | Self::Moved { id, .. }
            | Self::Resized { id, .. }
            | Self::Focused { id }
            | Self::Closed { id }
            | Self::Docked { id, .. }
            | Self::VisibilityChanged { id, .. }
            | Self::LockChanged { id, .. } => Some(id),
            Self::LayoutApplied { .. } | Self::Replaced { .. } => None,
        }
    }
}

/// Read-only copy of the store contents, in creation order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub panes: Vec<PaneState>,
}

impl StoreSnapshot {
    #[must_use]
    pub fn pane(&self, id: &str) -> Option<&PaneState> {
        self.panes.iter().find(|p| p.id.as_str() == id)
    }

    /// Topmost pane in stacking order.
    #[must_use]
    pub fn top(&self) -> Option<&PaneState> {
        self.panes.iter().max_by_key(|p| p.stacking_key())
    }
}

/// Authoritative, ordered pane collection with synchronous change notification.
pub struct WindowStore {
    registry: Rc<PaneRegistry>,
    panes: Vec<PaneState>,
    next_seq: u64,
    grid_step: Option<f64>,
    degraded: bool,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener: u64,
}

impl std::fmt::Debug for WindowStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WindowStore")
            .field("panes", &self.panes)
            .field("grid_step", &self.grid_step)
            .field("degraded", &self.degraded)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl WindowStore {
    /// Creates an empty store validating pane types against `registry`.
    ///
    /// `grid_step` enables snap-on-move when set.
    #[must_use]
    pub fn new(registry: Rc<PaneRegistry>, grid_step: Option<f64>) -> Self {
        Self {
            registry,
            panes: Vec::new(),
            next_seq: 1,
            grid_step,
            degraded: false,
            listeners: Vec::new(),
            next_listener: 1,
        }
    }

    #[must_use]
    pub fn registry(&self) -> &PaneRegistry {
        &self.registry
    }

    pub fn set_grid_step(&mut self, step: Option<f64>) {
        self.grid_step = step;
    }

    #[must_use]
    pub const fn grid_step(&self) -> Option<f64> {
        self.grid_step
    }

    /// Performance-degradation signal. While set, moves are not snapped.
    pub fn set_degraded(&mut self, degraded: bool) {
        if self.degraded != degraded {
            tracing::info!(degraded, "store degradation signal changed");
        }
        self.degraded = degraded;
    }

    #[must_use]
    pub const fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// Creates a pane from `spec` and returns its id.
    ///
    /// # Errors
    ///
    /// - [`PaneflowError::DuplicateId`] if the id is already live
    /// - [`PaneflowError::UnknownType`] if the type is not registered
    /// - [`PaneflowError::SingletonViolation`] if the type is singleton and open
    /// - [`PaneflowError::InvalidDimension`] for a degenerate rect
    ///
    /// A rejected creation leaves the store untouched and notifies nobody.
    pub fn create_pane(&mut self, spec: PaneSpec) -> Result<PaneId> {
        let _span = tracing::debug_span!("create_pane", type_id = %spec.type_id).entered();

        let seq = self.next_seq;
        let id = match spec.id.clone() {
            Some(id) => id,
            None => self.generate_id(),
        };

        if self.index_of(id.as_str()).is_some() {
            return Err(PaneflowError::DuplicateId(id.to_string()));
        }

        let entry = self
            .registry
            .resolve(&spec.type_id)
            .ok_or_else(|| PaneflowError::UnknownType(spec.type_id.clone()))?;

        if entry.metadata.singleton {
            if let Some(existing) = self.panes.iter().find(|p| p.type_id == spec.type_id) {
                return Err(PaneflowError::SingletonViolation {
                    type_id: spec.type_id.clone(),
                    existing: existing.id.to_string(),
                });
            }
        }

        let size = entry.metadata.default_size;
        let rect = spec.rect.unwrap_or_else(|| Rect::new(0.0, 0.0, size.w, size.h));
        if !rect.is_valid() {
            return Err(PaneflowError::InvalidDimension {
                width: rect.w,
                height: rect.h,
            });
        }

        let z = match spec.z {
            Some(z) => z,
            None => self.next_z(),
        };

        self.next_seq += 1;
        self.panes.push(PaneState {
            id: id.clone(),
            rect,
            z,
            type_id: spec.type_id,
            docked: spec.docked,
            visible: spec.visible,
            locked: spec.locked,
            seq,
            content: spec.content,
        });

        tracing::debug!(pane_id = %id, z, ?rect, "pane created");
        self.notify(&StoreEvent::Created { id: id.clone() });
        Ok(id)
    }

    /// Moves a pane to `(x, y)`, snapping to the grid when one is active.
    ///
    /// A docked pane that is moved becomes floating.
    ///
    /// # Errors
    ///
    /// [`PaneflowError::NotFound`], or [`PaneflowError::Locked`] for locked panes.
    pub fn move_pane(&mut self, id: &str, x: f64, y: f64) -> Result<()> {
        let _span = tracing::debug_span!("move_pane", pane_id = %id, x, y).entered();

        if !(x.is_finite() && y.is_finite()) {
            return Err(PaneflowError::InvalidDimension { width: x, height: y });
        }
        let (x, y) = match self.active_grid() {
            Some(step) => (snap(x, step), snap(y, step)),
            None => (x, y),
        };

        let pane = self.unlocked_mut(id)?;
        pane.rect = pane.rect.at(x, y);
        if pane.docked.take().is_some() {
            tracing::debug!("moved pane left its dock zone");
        }
        let event = StoreEvent::Moved {
            id: pane.id.clone(),
            rect: pane.rect,
        };

        self.notify(&event);
        Ok(())
    }

    /// Moves a pane by a relative offset.
    ///
    /// # Errors
    ///
    /// Same as [`WindowStore::move_pane`].
    pub fn move_pane_by(&mut self, id: &str, dx: f64, dy: f64) -> Result<()> {
        let rect = self.pane(id).ok_or_else(|| PaneflowError::NotFound(id.to_string()))?.rect;
        self.move_pane(id, rect.x + dx, rect.y + dy)
    }

    /// Resizes a pane.
    ///
    /// # Errors
    ///
    /// [`PaneflowError::InvalidDimension`] for non-positive or non-finite sizes,
    /// [`PaneflowError::NotFound`], or [`PaneflowError::Locked`].
    pub fn resize_pane(&mut self, id: &str, w: f64, h: f64) -> Result<()> {
        let _span = tracing::debug_span!("resize_pane", pane_id = %id, w, h).entered();

        if !(w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0) {
            return Err(PaneflowError::InvalidDimension { width: w, height: h });
        }

        let pane = self.unlocked_mut(id)?;
        pane.rect = pane.rect.sized(w, h);
        let event = StoreEvent::Resized {
            id: pane.id.clone(),
            rect: pane.rect,
        };

        self.notify(&event);
        Ok(())
    }

    /// Raises a pane above all others and emits a focus event.
    ///
    /// # Errors
    ///
    /// [`PaneflowError::NotFound`].
    pub fn focus_pane(&mut self, id: &str) -> Result<()> {
        let _span = tracing::debug_span!("focus_pane", pane_id = %id).entered();

        let index = self.index_of(id).ok_or_else(|| PaneflowError::NotFound(id.to_string()))?;
        let is_top = self
            .panes
            .iter()
            .enumerate()
            .all(|(i, p)| i == index || p.stacking_key() < self.panes[index].stacking_key());

        if !is_top {
            let z = self.next_z();
            self.panes[index].z = z;
            tracing::debug!(z, "pane raised");
        }

        let event = StoreEvent::Focused {
            id: self.panes[index].id.clone(),
        };
        self.notify(&event);
        Ok(())
    }

    /// Removes a pane and returns its final state.
    ///
    /// # Errors
    ///
    /// [`PaneflowError::NotFound`].
    pub fn close_pane(&mut self, id: &str) -> Result<PaneState> {
        let _span = tracing::debug_span!("close_pane", pane_id = %id).entered();

        let index = self.index_of(id).ok_or_else(|| PaneflowError::NotFound(id.to_string()))?;
        let closed = self.panes.remove(index);

        tracing::debug!(remaining = self.panes.len(), "pane closed");
        self.notify(&StoreEvent::Closed { id: closed.id.clone() });
        Ok(closed)
    }

    /// Sets or clears a pane's dock zone.
    ///
    /// # Errors
    ///
    /// [`PaneflowError::NotFound`], or [`PaneflowError::Locked`].
    pub fn set_docked(&mut self, id: &str, zone: Option<DockZone>) -> Result<()> {
        let pane = self.unlocked_mut(id)?;
        if pane.docked == zone {
            return Ok(());
        }
        pane.docked = zone;
        let event = StoreEvent::Docked {
            id: pane.id.clone(),
            zone,
        };

        tracing::debug!(pane_id = %id, ?zone, "dock zone changed");
        self.notify(&event);
        Ok(())
    }

    /// Shows or hides a pane.
    ///
    /// # Errors
    ///
    /// [`PaneflowError::NotFound`].
    pub fn set_visible(&mut self, id: &str, visible: bool) -> Result<()> {
        let pane = self.pane_mut(id)?;
        if pane.visible == visible {
            return Ok(());
        }
        pane.visible = visible;
        let event = StoreEvent::VisibilityChanged {
            id: pane.id.clone(),
            visible,
        };
        self.notify(&event);
        Ok(())
    }

    /// Locks or unlocks a pane's geometry.
    ///
    /// # Errors
    ///
    /// [`PaneflowError::NotFound`].
    pub fn set_locked(&mut self, id: &str, locked: bool) -> Result<()> {
        let pane = self.pane_mut(id)?;
        if pane.locked == locked {
            return Ok(());
        }
        pane.locked = locked;
        let event = StoreEvent::LockChanged {
            id: pane.id.clone(),
            locked,
        };
        self.notify(&event);
        Ok(())
    }

    /// Applies a batch of rects computed by a layout pass, notifying once.
    ///
    /// The whole batch is validated first; on error nothing is applied. Lock flags
    /// are not consulted: layout passes only place docked panes.
    ///
    /// # Errors
    ///
    /// [`PaneflowError::NotFound`] or [`PaneflowError::InvalidDimension`].
    pub fn apply_layout(&mut self, updates: &[(PaneId, Rect)]) -> Result<()> {
        let _span = tracing::debug_span!("apply_layout", count = updates.len()).entered();

        let mut indices = Vec::with_capacity(updates.len());
        for (id, rect) in updates {
            if !rect.is_valid() {
                return Err(PaneflowError::InvalidDimension {
                    width: rect.w,
                    height: rect.h,
                });
            }
            let index = self
                .index_of(id.as_str())
                .ok_or_else(|| PaneflowError::NotFound(id.to_string()))?;
            indices.push(index);
        }

        let mut changed = Vec::new();
        for (index, (id, rect)) in indices.into_iter().zip(updates) {
            if self.panes[index].rect != *rect {
                self.panes[index].rect = *rect;
                changed.push(id.clone());
            }
        }

        if changed.is_empty() {
            tracing::trace!("layout unchanged, skipping notification");
            return Ok(());
        }
        self.notify(&StoreEvent::LayoutApplied { ids: changed });
        Ok(())
    }

    /// Replaces every pane at once (layout restore). Callers validate first.
    pub(crate) fn replace_all(&mut self, panes: Vec<PaneState>) {
        let max_seq = panes.iter().map(|p| p.seq).max().unwrap_or(0);
        self.next_seq = self.next_seq.max(max_seq + 1);
        self.panes = panes;
        let count = self.panes.len();
        tracing::debug!(count, "pane set replaced");
        self.notify(&StoreEvent::Replaced { count });
    }

    /// Takes the next creation sequence number.
    pub(crate) fn allocate_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    /// Owned snapshot of the current panes.
    #[must_use]
    pub fn get_state(&self) -> StoreSnapshot {
        StoreSnapshot {
            panes: self.panes.clone(),
        }
    }

    /// Panes in creation order.
    #[must_use]
    pub fn panes(&self) -> &[PaneState] {
        &self.panes
    }

    #[must_use]
    pub fn pane(&self, id: &str) -> Option<&PaneState> {
        self.panes.iter().find(|p| p.id.as_str() == id)
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.index_of(id).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.panes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.panes.is_empty()
    }

    /// Panes from bottom to top of the stacking order.
    #[must_use]
    pub fn panes_by_z(&self) -> Vec<&PaneState> {
        let mut ordered: Vec<&PaneState> = self.panes.iter().collect();
        ordered.sort_by_key(|p| p.stacking_key());
        ordered
    }

    /// The topmost pane, which is the focused one after [`WindowStore::focus_pane`].
    #[must_use]
    pub fn top_pane(&self) -> Option<&PaneState> {
        self.panes.iter().max_by_key(|p| p.stacking_key())
    }

    /// Registers a listener; it runs after every mutation, in registration order.
    pub fn subscribe(&mut self, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, listener));
        tracing::debug!(listener = id.0, total = self.listeners.len(), "listener subscribed");
        id
    }

    /// Removes a listener. Returns `false` if it was not subscribed.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        before != self.listeners.len()
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Drops every listener.
    pub fn clear_listeners(&mut self) {
        self.listeners.clear();
    }

    fn notify(&mut self, event: &StoreEvent) {
        if self.listeners.is_empty() {
            return;
        }

        let snapshot = self.get_state();
        for (id, listener) in &mut self.listeners {
            match catch_unwind(AssertUnwindSafe(|| listener(event, &snapshot))) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    tracing::error!(listener = id.0, error = %e, ?event, "store listener failed");
                }
                Err(panic) => {
                    tracing::error!(
                        listener = id.0,
                        panic = %panic_message(panic.as_ref()),
                        ?event,
                        "store listener panicked"
                    );
                }
            }
        }
    }

    /// First `pane-<n>` id, starting at the next sequence number, that is not live.
    fn generate_id(&self) -> PaneId {
        (self.next_seq..)
            .map(PaneId::generated)
            .find(|candidate| !self.contains(candidate.as_str()))
            .unwrap_or_else(|| PaneId::generated(self.next_seq))
    }

    fn active_grid(&self) -> Option<f64> {
        if self.degraded {
            None
        } else {
            self.grid_step
        }
    }

    fn max_z(&self) -> Option<i64> {
        self.panes.iter().map(|p| p.z).max()
    }

    /// Rank above every live pane. When `max_z + 1` would overflow, ranks are
    /// first compacted to `1..=n` in stacking order.
    fn next_z(&mut self) -> i64 {
        let Some(max) = self.max_z() else {
            return 1;
        };
        if let Some(z) = max.checked_add(1) {
            return z;
        }

        let mut order: Vec<usize> = (0..self.panes.len()).collect();
        order.sort_by_key(|&i| self.panes[i].stacking_key());
        let mut rank = 0_i64;
        for i in order {
            rank += 1;
            self.panes[i].z = rank;
        }
        tracing::debug!(panes = self.panes.len(), "stacking ranks compacted");
        rank + 1
    }

    fn index_of(&self, id: &str) -> Option<usize> {
        self.panes.iter().position(|p| p.id.as_str() == id)
    }

    fn pane_mut(&mut self, id: &str) -> Result<&mut PaneState> {
        self.panes
            .iter_mut()
            .find(|p| p.id.as_str() == id)
            .ok_or_else(|| PaneflowError::NotFound(id.to_string()))
    }

    fn unlocked_mut(&mut self, id: &str) -> Result<&mut PaneState> {
        let pane = self.pane_mut(id)?;
        if pane.locked {
            return Err(PaneflowError::Locked(id.to_string()));
        }
        Ok(pane)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{PaneMetadata, TextRenderable};
    use std::cell::RefCell;

    fn store(grid: Option<f64>) -> WindowStore {
        let mut registry = PaneRegistry::new();
        registry
            .register("notes", Rc::new(TextRenderable::new("Notes")), PaneMetadata::new("Notes"))
            .unwrap();
        registry
            .register(
                "assistant",
                Rc::new(TextRenderable::new("Assistant")),
                PaneMetadata::new("Assistant").with_default_size(300.0, 200.0).singleton(),
            )
            .unwrap();
        WindowStore::new(Rc::new(registry), grid)
    }

    fn square(id: &str) -> PaneSpec {
        PaneSpec::new("notes").with_id(id).with_rect(Rect::new(0.0, 0.0, 100.0, 100.0))
    }

    #[test]
    fn create_then_move_scenario() {
        let mut store = store(None);
        store.create_pane(square("p1").with_z(1)).unwrap();
        assert_eq!(store.get_state().panes.len(), 1);

        store.move_pane("p1", 10.0, 10.0).unwrap();
        let pane = store.pane("p1").unwrap();
        assert_eq!((pane.rect.x, pane.rect.y), (10.0, 10.0));
    }

    #[test]
    fn duplicate_id_fails_without_mutation() {
        let mut store = store(None);
        store.create_pane(square("p1")).unwrap();
        let before = store.get_state();

        let err = store
            .create_pane(square("p1").with_rect(Rect::new(50.0, 50.0, 10.0, 10.0)))
            .unwrap_err();
        assert!(matches!(err, PaneflowError::DuplicateId(ref id) if id == "p1"));
        assert_eq!(store.get_state(), before);
    }

    #[test]
    fn singleton_type_rejects_second_instance() {
        let mut store = store(None);
        let first = store.create_pane(PaneSpec::new("assistant")).unwrap();
        let err = store.create_pane(PaneSpec::new("assistant")).unwrap_err();
        assert!(matches!(err, PaneflowError::SingletonViolation { ref existing, .. } if *existing == first.to_string()));
        assert_eq!(store.len(), 1);

        // Closing frees the slot.
        store.close_pane(first.as_str()).unwrap();
        store.create_pane(PaneSpec::new("assistant")).unwrap();
    }

    #[test]
    fn unknown_type_and_bad_rect_are_rejected() {
        let mut store = store(None);
        assert!(matches!(
            store.create_pane(PaneSpec::new("payroll")),
            Err(PaneflowError::UnknownType(_))
        ));
        assert!(matches!(
            store.create_pane(square("p").with_rect(Rect::new(0.0, 0.0, 0.0, 10.0))),
            Err(PaneflowError::InvalidDimension { .. })
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn defaults_fill_id_size_and_z() {
        let mut store = store(None);
        let a = store.create_pane(PaneSpec::new("assistant")).unwrap();
        let b = store.create_pane(PaneSpec::new("notes")).unwrap();
        assert_ne!(a, b);

        let a = store.pane(a.as_str()).unwrap();
        assert_eq!((a.rect.w, a.rect.h), (300.0, 200.0));
        assert_eq!(a.z, 1);
        assert_eq!(store.pane(b.as_str()).unwrap().z, 2);
    }

    #[test]
    fn relative_move_round_trips_without_grid() {
        let mut store = store(None);
        store
            .create_pane(square("p1").with_rect(Rect::new(3.25, -7.5, 40.0, 40.0)))
            .unwrap();
        let original = store.pane("p1").unwrap().rect;

        store.move_pane_by("p1", 17.125, -4.5).unwrap();
        store.move_pane_by("p1", -17.125, 4.5).unwrap();
        assert_eq!(store.pane("p1").unwrap().rect, original);
    }

    #[test]
    fn grid_snaps_moves_unless_degraded() {
        let mut store = store(Some(8.0));
        store.create_pane(square("p1")).unwrap();

        store.move_pane("p1", 13.0, 7.0).unwrap();
        assert_eq!((store.pane("p1").unwrap().rect.x, store.pane("p1").unwrap().rect.y), (16.0, 8.0));

        store.set_degraded(true);
        store.move_pane("p1", 13.0, 7.0).unwrap();
        assert_eq!((store.pane("p1").unwrap().rect.x, store.pane("p1").unwrap().rect.y), (13.0, 7.0));
    }

    #[test]
    fn resize_rejects_non_positive_dimensions() {
        let mut store = store(None);
        store.create_pane(square("p1")).unwrap();
        for (w, h) in [(0.0, 10.0), (10.0, -1.0), (f64::INFINITY, 10.0)] {
            assert!(matches!(
                store.resize_pane("p1", w, h),
                Err(PaneflowError::InvalidDimension { .. })
            ));
        }
        store.resize_pane("p1", 250.0, 125.0).unwrap();
        assert_eq!(store.pane("p1").unwrap().rect, Rect::new(0.0, 0.0, 250.0, 125.0));
    }

    #[test]
    fn focus_raises_above_all_others() {
        let mut store = store(None);
        store.create_pane(square("a")).unwrap();
        store.create_pane(square("b")).unwrap();
        store.create_pane(square("c").with_z(2)).unwrap();
        assert_eq!(store.top_pane().unwrap().id.as_str(), "c");

        store.focus_pane("a").unwrap();
        assert_eq!(store.top_pane().unwrap().id.as_str(), "a");
        let order: Vec<&str> = store.panes_by_z().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(order, vec!["b", "c", "a"]);

        let z = store.pane("a").unwrap().z;
        store.focus_pane("a").unwrap();
        assert_eq!(store.pane("a").unwrap().z, z);
    }

    #[test]
    fn raising_past_the_largest_rank_compacts_instead_of_overflowing() {
        let mut store = store(None);
        store.create_pane(square("a").with_z(i64::MAX)).unwrap();
        store.create_pane(square("b").with_z(5)).unwrap();
        store.create_pane(square("c").with_z(i64::MAX - 1)).unwrap();

        store.focus_pane("b").unwrap();
        let order: Vec<&str> = store.panes_by_z().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(order, vec!["c", "a", "b"]);
        assert_eq!(store.pane("b").unwrap().z, 4);

        store.create_pane(square("d").with_z(i64::MAX)).unwrap();
        store.create_pane(square("e")).unwrap();
        assert_eq!(store.top_pane().unwrap().id.as_str(), "e");
        assert!(store.panes().iter().all(|p| p.z > 0));
    }

    #[test]
    fn operations_on_missing_or_closed_ids_return_not_found() {
        let mut store = store(None);
        store.create_pane(square("p1")).unwrap();
        store.close_pane("p1").unwrap();

        assert!(matches!(store.move_pane("p1", 1.0, 1.0), Err(PaneflowError::NotFound(_))));
        assert!(matches!(store.resize_pane("p1", 1.0, 1.0), Err(PaneflowError::NotFound(_))));
        assert!(matches!(store.focus_pane("p1"), Err(PaneflowError::NotFound(_))));
        assert!(matches!(store.close_pane("p1"), Err(PaneflowError::NotFound(_))));
        assert!(matches!(store.set_docked("p1", None), Err(PaneflowError::NotFound(_))));
    }

    #[test]
    fn locked_panes_refuse_geometry_changes() {
        let mut store = store(None);
        store.create_pane(square("p1")).unwrap();
        store.set_locked("p1", true).unwrap();
        assert!(matches!(store.move_pane("p1", 5.0, 5.0), Err(PaneflowError::Locked(_))));
        assert!(matches!(store.resize_pane("p1", 5.0, 5.0), Err(PaneflowError::Locked(_))));
        store.focus_pane("p1").unwrap();
    }

    #[test]
    fn moving_a_docked_pane_makes_it_floating() {
        let mut store = store(None);
        store.create_pane(square("p1").docked(DockZone::Left)).unwrap();
        store.move_pane("p1", 200.0, 200.0).unwrap();
        assert!(store.pane("p1").unwrap().is_floating());
    }

    #[test]
    fn listeners_run_in_order_and_see_new_state() {
        let mut store = store(None);
        let log = Rc::new(RefCell::new(Vec::new()));

        for name in ["first", "second"] {
            let log = Rc::clone(&log);
            store.subscribe(Box::new(move |event: &StoreEvent, snapshot: &StoreSnapshot| {
                log.borrow_mut().push(format!("{name}:{}:{}", event.pane_id().map_or("-", |id| id.as_str()), snapshot.panes.len()));
                Ok(())
            }));
        }

        store.create_pane(square("p1")).unwrap();
        store.close_pane("p1").unwrap();
        assert_eq!(*log.borrow(), vec!["first:p1:1", "second:p1:1", "first:p1:0", "second:p1:0"]);
    }

    #[test]
    fn failing_listeners_are_contained() {
        let mut store = store(None);
        let reached = Rc::new(RefCell::new(0));

        store.subscribe(Box::new(|_: &StoreEvent, _: &StoreSnapshot| -> Result<()> {
            panic!("listener bug")
        }));
        store.subscribe(Box::new(|_: &StoreEvent, _: &StoreSnapshot| {
            Err(PaneflowError::Transport("offline".into()))
        }));
        let counter = Rc::clone(&reached);
        store.subscribe(Box::new(move |_: &StoreEvent, _: &StoreSnapshot| {
            *counter.borrow_mut() += 1;
            Ok(())
        }));

        store.create_pane(square("p1")).unwrap();
        store.move_pane("p1", 4.0, 4.0).unwrap();

        assert_eq!(*reached.borrow(), 2);
        assert_eq!(store.pane("p1").unwrap().rect.x, 4.0);
    }

    #[test]
    fn unsubscribe_stops_notifications() {
        let mut store = store(None);
        let hits = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&hits);
        let id = store.subscribe(Box::new(move |_: &StoreEvent, _: &StoreSnapshot| {
            *counter.borrow_mut() += 1;
            Ok(())
        }));

        store.create_pane(square("p1")).unwrap();
        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.close_pane("p1").unwrap();
        assert_eq!(*hits.borrow(), 1);
    }

    #[test]
    fn apply_layout_is_all_or_nothing() {
        let mut store = store(None);
        store.create_pane(square("a")).unwrap();
        let before = store.get_state();

        let err = store
            .apply_layout(&[
                (PaneId::from("a"), Rect::new(5.0, 5.0, 10.0, 10.0)),
                (PaneId::from("missing"), Rect::new(0.0, 0.0, 10.0, 10.0)),
            ])
            .unwrap_err();
        assert!(matches!(err, PaneflowError::NotFound(_)));
        assert_eq!(store.get_state(), before);

        store.apply_layout(&[(PaneId::from("a"), Rect::new(5.0, 5.0, 10.0, 10.0))]).unwrap();
        assert_eq!(store.pane("a").unwrap().rect, Rect::new(5.0, 5.0, 10.0, 10.0));
    }
}
