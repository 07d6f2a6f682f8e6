//! Drag-to-dock state machine.
//!
//! A drag starts with [`DockingEngine::begin_drag`], which records the dragged
//! pane as the payload. Every pointer sample goes through
//! [`DockingEngine::on_drag_over`], which tracks the zone under the pointer. A
//! drop commits the payload to that zone; a cancel discards everything. Both
//! leave the engine idle, so a stale zone can never leak into the next drag.

use super::{layout, DockingConfig};
use crate::app::store::WindowStore;
use crate::domain::error::{PaneflowError, Result};
use crate::domain::geometry::Rect;
use crate::domain::{DockZone, PaneId};
use crate::input::NormalizedPointer;

#[derive(Debug, Clone, Default)]
pub struct DockingEngine {
    config: DockingConfig,
    payload: Option<PaneId>,
    active_zone: Option<DockZone>,
}

impl DockingEngine {
    #[must_use]
    pub const fn new(config: DockingConfig) -> Self {
        Self {
            config,
            payload: None,
            active_zone: None,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &DockingConfig {
        &self.config
    }

    /// Updates the viewport, e.g. after the host window was resized.
    /// Callers relayout afterwards.
    pub fn set_viewport(&mut self, viewport: Rect) {
        self.config.viewport = viewport;
    }

    #[must_use]
    pub const fn active_zone(&self) -> Option<DockZone> {
        self.active_zone
    }

    #[must_use]
    pub const fn payload(&self) -> Option<&PaneId> {
        self.payload.as_ref()
    }

    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        self.payload.is_some()
    }

    /// Starts a drag carrying `pane_id`. Any previous drag state is dropped.
    pub fn begin_drag(&mut self, pane_id: PaneId) {
        tracing::debug!(pane_id = %pane_id, "drag started");
        self.payload = Some(pane_id);
        self.active_zone = None;
    }

    /// Zone under `pointer`: the nearest edge within the edge band, `Center` in
    /// the interior, `None` outside the viewport. Equidistant edges resolve in
    /// the order left, right, top, bottom.
    #[must_use]
    pub fn hit_test(&self, pointer: &NormalizedPointer) -> Option<DockZone> {
        let v = &self.config.viewport;
        if !v.contains(pointer.x, pointer.y) {
            return None;
        }

        let distances = [
            (DockZone::Left, pointer.x - v.x),
            (DockZone::Right, v.right() - pointer.x),
            (DockZone::Top, pointer.y - v.y),
            (DockZone::Bottom, v.bottom() - pointer.y),
        ];

        let nearest = distances
            .into_iter()
            .filter(|(_, d)| *d < self.config.edge_band)
            .fold(None, |best: Option<(DockZone, f64)>, (zone, d)| match best {
                Some((_, best_d)) if best_d <= d => best,
                _ => Some((zone, d)),
            });

        Some(nearest.map_or(DockZone::Center, |(zone, _)| zone))
    }

    /// Updates the active zone from a pointer sample.
    ///
    /// `zone_hint` (the drop target the host reports under the pointer) wins
    /// over geometric hit-testing. Returns `true` only when the active zone
    /// changed, so hosts can skip redundant highlight updates.
    pub fn on_drag_over(&mut self, pointer: &NormalizedPointer, zone_hint: Option<DockZone>) -> bool {
        let zone = zone_hint.or_else(|| self.hit_test(pointer));
        if zone == self.active_zone {
            return false;
        }
        tracing::trace!(?zone, x = pointer.x, y = pointer.y, "active dock zone changed");
        self.active_zone = zone;
        true
    }

    /// Ends the drag, committing the payload pane to the active zone.
    ///
    /// Returns the zone the pane was docked into, or `None` when nothing was
    /// committed: no payload, no active zone, pointer outside the viewport,
    /// the pane no longer exists, or it is locked. The engine is idle afterwards
    /// in every case.
    ///
    /// # Errors
    ///
    /// Propagates store errors from the follow-up relayout.
    pub fn on_drop(&mut self, pointer: &NormalizedPointer, store: &mut WindowStore) -> Result<Option<DockZone>> {
        let _span = tracing::debug_span!("dock_drop", x = pointer.x, y = pointer.y).entered();

        let zone = self.active_zone.take();
        let Some(pane_id) = self.payload.take() else {
            tracing::debug!("drop without payload ignored");
            return Ok(None);
        };
        let Some(zone) = zone else {
            tracing::debug!(pane_id = %pane_id, "drop outside any zone ignored");
            return Ok(None);
        };
        if !self.config.viewport.contains(pointer.x, pointer.y) {
            tracing::debug!(pane_id = %pane_id, "drop outside viewport ignored");
            return Ok(None);
        }

        match store.set_docked(pane_id.as_str(), Some(zone)) {
            Ok(()) => {}
            Err(PaneflowError::NotFound(_)) => {
                tracing::debug!(pane_id = %pane_id, "dropped pane no longer exists");
                return Ok(None);
            }
            Err(PaneflowError::Locked(_)) => {
                tracing::warn!(pane_id = %pane_id, "locked pane cannot be docked");
                return Ok(None);
            }
            Err(e) => return Err(e),
        }

        self.relayout(store)?;
        tracing::info!(pane_id = %pane_id, zone = %zone, "pane docked");
        Ok(Some(zone))
    }

    /// Abandons the current drag without committing anything.
    pub fn cancel(&mut self) {
        if self.payload.is_some() || self.active_zone.is_some() {
            tracing::debug!("drag cancelled");
        }
        self.payload = None;
        self.active_zone = None;
    }

    /// Recomputes the rects of every docked pane. Floating panes are untouched.
    ///
    /// # Errors
    ///
    /// Propagates [`WindowStore::apply_layout`] errors.
    pub fn relayout(&self, store: &mut WindowStore) -> Result<()> {
        let placements = layout::compute(store.panes(), &self.config);
        store.apply_layout(&placements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PaneSpec;
    use crate::registry::{PaneMetadata, PaneRegistry, TextRenderable};
    use std::rc::Rc;

    fn store() -> WindowStore {
        let mut registry = PaneRegistry::new();
        registry
            .register("notes", Rc::new(TextRenderable::new("Notes")), PaneMetadata::new("Notes"))
            .unwrap();
        WindowStore::new(Rc::new(registry), None)
    }

    fn engine() -> DockingEngine {
        DockingEngine::new(DockingConfig {
            viewport: Rect::new(0.0, 0.0, 1000.0, 800.0),
            ..DockingConfig::default()
        })
    }

    #[test]
    fn hit_test_maps_edges_center_and_outside() {
        let engine = engine();
        let at = |x, y| engine.hit_test(&NormalizedPointer::mouse(x, y));
        assert_eq!(at(10.0, 400.0), Some(DockZone::Left));
        assert_eq!(at(990.0, 400.0), Some(DockZone::Right));
        assert_eq!(at(500.0, 5.0), Some(DockZone::Top));
        assert_eq!(at(500.0, 790.0), Some(DockZone::Bottom));
        assert_eq!(at(500.0, 400.0), Some(DockZone::Center));
        assert_eq!(at(-1.0, 400.0), None);
        assert_eq!(at(500.0, 900.0), None);
        // Corner: nearest edge wins.
        assert_eq!(at(30.0, 5.0), Some(DockZone::Top));
    }

    #[test]
    fn drag_over_reports_only_zone_changes() {
        let mut engine = engine();
        engine.begin_drag("a".into());
        assert!(engine.on_drag_over(&NormalizedPointer::mouse(10.0, 400.0), None));
        assert!(!engine.on_drag_over(&NormalizedPointer::mouse(12.0, 420.0), None));
        assert!(engine.on_drag_over(&NormalizedPointer::mouse(12.0, 420.0), Some(DockZone::Bottom)));
        assert_eq!(engine.active_zone(), Some(DockZone::Bottom));
    }

    #[test]
    fn drop_commits_and_tiles() {
        let mut store = store();
        let id = store.create_pane(PaneSpec::new("notes")).unwrap();
        let mut engine = engine();

        engine.begin_drag(id.clone());
        engine.on_drag_over(&NormalizedPointer::mouse(10.0, 400.0), None);
        let zone = engine.on_drop(&NormalizedPointer::mouse(10.0, 400.0), &mut store).unwrap();

        assert_eq!(zone, Some(DockZone::Left));
        let pane = store.pane(id.as_str()).unwrap();
        assert_eq!(pane.docked, Some(DockZone::Left));
        assert_eq!(pane.rect, Rect::new(0.0, 0.0, 250.0, 800.0));
        assert!(engine.active_zone().is_none());
        assert!(!engine.is_dragging());
    }

    #[test]
    fn drop_without_payload_is_a_noop() {
        let mut store = store();
        let id = store.create_pane(PaneSpec::new("notes")).unwrap();
        let before = store.get_state();
        let mut engine = engine();

        engine.on_drag_over(&NormalizedPointer::mouse(10.0, 400.0), None);
        let zone = engine.on_drop(&NormalizedPointer::mouse(10.0, 400.0), &mut store).unwrap();

        assert_eq!(zone, None);
        assert_eq!(store.get_state(), before);
        assert!(store.pane(id.as_str()).unwrap().docked.is_none());
        assert!(engine.active_zone().is_none());
    }

    #[test]
    fn drop_of_closed_pane_or_outside_viewport_commits_nothing() {
        let mut store = store();
        let id = store.create_pane(PaneSpec::new("notes")).unwrap();
        let mut engine = engine();

        engine.begin_drag(id.clone());
        engine.on_drag_over(&NormalizedPointer::mouse(10.0, 400.0), Some(DockZone::Left));
        assert_eq!(engine.on_drop(&NormalizedPointer::mouse(-5.0, 400.0), &mut store).unwrap(), None);
        assert!(store.pane(id.as_str()).unwrap().docked.is_none());

        engine.begin_drag("ghost".into());
        engine.on_drag_over(&NormalizedPointer::mouse(10.0, 400.0), None);
        assert_eq!(engine.on_drop(&NormalizedPointer::mouse(10.0, 400.0), &mut store).unwrap(), None);
    }

    #[test]
    fn cancel_resets_without_commit() {
        let mut store = store();
        let id = store.create_pane(PaneSpec::new("notes")).unwrap();
        let mut engine = engine();

        engine.begin_drag(id.clone());
        engine.on_drag_over(&NormalizedPointer::mouse(10.0, 400.0), None);
        engine.cancel();

        assert!(engine.active_zone().is_none());
        assert_eq!(engine.on_drop(&NormalizedPointer::mouse(10.0, 400.0), &mut store).unwrap(), None);
        assert!(store.pane(id.as_str()).unwrap().docked.is_none());
    }

    #[test]
    fn relayout_leaves_floating_panes_alone() {
        let mut store = store();
        let floating = store
            .create_pane(PaneSpec::new("notes").with_rect(Rect::new(300.0, 300.0, 100.0, 100.0)))
            .unwrap();
        let docked = store.create_pane(PaneSpec::new("notes").docked(DockZone::Top)).unwrap();

        engine().relayout(&mut store).unwrap();

        assert_eq!(store.pane(floating.as_str()).unwrap().rect, Rect::new(300.0, 300.0, 100.0, 100.0));
        assert_eq!(store.pane(docked.as_str()).unwrap().rect, Rect::new(0.0, 0.0, 1000.0, 200.0));
    }
}
