//! Tiling layout for docked panes.
//!
//! Edge zones reserve a band of the viewport only while they hold panes. Left and
//! right bands span the full height; top and bottom bands span the width left
//! between them; the center takes what remains. Inside a zone, panes tile in
//! creation order: left/right stack vertically, top/bottom/center split
//! horizontally.
//!
//! Region and tile boundaries are whole units, so adjacent tiles share an edge
//! exactly and never overlap under floating-point addition. A zone holding more
//! panes than it is units long falls back to exact binary fractions of a unit,
//! and its tiles still never leave the zone.

use super::DockingConfig;
use crate::domain::geometry::Rect;
use crate::domain::{DockZone, PaneId, PaneState};
use std::collections::BTreeMap;

/// Axis along which a zone's tiles are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Horizontal,
    Vertical,
}

/// Reserved region of each occupied zone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ZoneRegions {
    regions: BTreeMap<DockZone, Rect>,
}

impl ZoneRegions {
    #[must_use]
    pub fn get(&self, zone: DockZone) -> Option<Rect> {
        self.regions.get(&zone).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (DockZone, Rect)> + '_ {
        self.regions.iter().map(|(z, r)| (*z, *r))
    }
}

/// Computes the reserved region of every occupied zone.
#[must_use]
pub fn zone_regions(panes: &[PaneState], config: &DockingConfig) -> ZoneRegions {
    let occupied = |zone: DockZone| panes.iter().any(|p| p.docked == Some(zone));

    let vx = config.viewport.x.floor();
    let vy = config.viewport.y.floor();
    let vw = config.viewport.w.floor().max(1.0);
    let vh = config.viewport.h.floor().max(1.0);
    let extent = config.effective_extent();

    let band = |len: f64, zone: DockZone| if occupied(zone) { (len * extent).floor().max(1.0) } else { 0.0 };
    let lw = band(vw, DockZone::Left);
    let rw = band(vw, DockZone::Right);
    let th = band(vh, DockZone::Top);
    let bh = band(vh, DockZone::Bottom);

    let mid_w = (vw - lw - rw).max(1.0);
    let mid_h = (vh - th - bh).max(1.0);

    let mut regions = BTreeMap::new();
    for zone in DockZone::ALL {
        if !occupied(zone) {
            continue;
        }
        let rect = match zone {
            DockZone::Left => Rect::new(vx, vy, lw, vh),
            DockZone::Right => Rect::new(vx + vw - rw, vy, rw, vh),
            DockZone::Top => Rect::new(vx + lw, vy, mid_w, th),
            DockZone::Bottom => Rect::new(vx + lw, vy + vh - bh, mid_w, bh),
            DockZone::Center => Rect::new(vx + lw, vy + th, mid_w, mid_h),
        };
        regions.insert(zone, rect);
    }

    ZoneRegions { regions }
}

/// Computes the rect of every docked pane. Floating panes are not included.
#[must_use]
pub fn compute(panes: &[PaneState], config: &DockingConfig) -> Vec<(PaneId, Rect)> {
    let regions = zone_regions(panes, config);
    let mut placements = Vec::new();

    for (zone, region) in regions.iter() {
        let mut members: Vec<&PaneState> = panes.iter().filter(|p| p.docked == Some(zone)).collect();
        members.sort_by_key(|p| p.seq);

        let axis = match zone {
            DockZone::Left | DockZone::Right => Axis::Vertical,
            DockZone::Top | DockZone::Bottom | DockZone::Center => Axis::Horizontal,
        };

        let tiles = split(region, members.len(), axis);
        placements.extend(members.into_iter().map(|p| p.id.clone()).zip(tiles));
    }

    tracing::trace!(placed = placements.len(), "docked layout computed");
    placements
}

/// Splits `region` into `n` tiles that stay inside it.
///
/// Boundaries are whole units while the region is at least `n` units long.
/// A shorter region is split in equal power-of-two fractions of a unit, which
/// are still exact in `f64`; the last tile takes the remainder.
fn split(region: Rect, n: usize, axis: Axis) -> Vec<Rect> {
    if n == 0 {
        return Vec::new();
    }

    let (start, len) = match axis {
        Axis::Horizontal => (region.x, region.w),
        Axis::Vertical => (region.y, region.h),
    };
    let end = start + len;

    #[allow(clippy::cast_precision_loss)]
    let count = n as f64;
    let mut bounds = Vec::with_capacity(n + 1);
    bounds.push(start);
    if len >= count {
        for i in 1..n {
            #[allow(clippy::cast_precision_loss)]
            let ideal = start + (len * i as f64 / count).floor();
            bounds.push(ideal.max(bounds[i - 1] + 1.0));
        }
    } else {
        let mut step = 1.0_f64;
        while step * count > len && step > f64::EPSILON {
            step /= 2.0;
        }
        for i in 1..n {
            #[allow(clippy::cast_precision_loss)]
            bounds.push(start + step * i as f64);
        }
    }
    bounds.push(end);

    bounds
        .windows(2)
        .map(|w| match axis {
            Axis::Horizontal => Rect::new(w[0], region.y, w[1] - w[0], region.h),
            Axis::Vertical => Rect::new(region.x, w[0], region.w, w[1] - w[0]),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::geometry::collide;

    fn pane(id: &str, seq: u64, docked: Option<DockZone>) -> PaneState {
        PaneState {
            id: PaneId::from(id),
            rect: Rect::new(500.0, 500.0, 50.0, 50.0),
            z: 1,
            type_id: "notes".into(),
            docked,
            visible: true,
            locked: false,
            seq,
            content: None,
        }
    }

    fn config() -> DockingConfig {
        DockingConfig {
            viewport: Rect::new(0.0, 0.0, 1000.0, 800.0),
            ..DockingConfig::default()
        }
    }

    #[test]
    fn left_zone_stacks_vertically_in_creation_order() {
        let panes = vec![
            pane("b", 2, Some(DockZone::Left)),
            pane("a", 1, Some(DockZone::Left)),
            pane("c", 3, Some(DockZone::Left)),
        ];
        let placed = compute(&panes, &config());
        let ids: Vec<&str> = placed.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);

        assert_eq!(placed[0].1, Rect::new(0.0, 0.0, 250.0, 266.0));
        assert_eq!(placed[1].1, Rect::new(0.0, 266.0, 250.0, 267.0));
        assert_eq!(placed[2].1, Rect::new(0.0, 533.0, 250.0, 267.0));
    }

    #[test]
    fn floating_panes_are_not_placed() {
        let panes = vec![pane("f", 1, None), pane("d", 2, Some(DockZone::Bottom))];
        let placed = compute(&panes, &config());
        assert_eq!(placed.len(), 1);
        assert_eq!(placed[0].0.as_str(), "d");
        assert_eq!(placed[0].1, Rect::new(0.0, 600.0, 1000.0, 200.0));
    }

    #[test]
    fn no_two_docked_panes_overlap() {
        let mut panes = Vec::new();
        let mut seq = 0;
        for zone in DockZone::ALL {
            for _ in 0..3 {
                seq += 1;
                panes.push(pane(&format!("{zone}-{seq}"), seq, Some(zone)));
            }
        }
        let placed = compute(&panes, &DockingConfig {
            viewport: Rect::new(0.5, 0.25, 1333.3, 777.7),
            ..DockingConfig::default()
        });
        assert_eq!(placed.len(), 15);
        for (i, (a_id, a)) in placed.iter().enumerate() {
            assert!(a.is_valid(), "{a_id} {a:?}");
            for (b_id, b) in placed.iter().skip(i + 1) {
                assert!(!collide(a, b), "{a_id} {a:?} overlaps {b_id} {b:?}");
            }
        }
    }

    #[test]
    fn regions_only_exist_for_occupied_zones() {
        let panes = vec![pane("c", 1, Some(DockZone::Center)), pane("r", 2, Some(DockZone::Right))];
        let regions = zone_regions(&panes, &config());
        assert!(regions.get(DockZone::Left).is_none());
        assert_eq!(regions.get(DockZone::Right), Some(Rect::new(750.0, 0.0, 250.0, 800.0)));
        assert_eq!(regions.get(DockZone::Center), Some(Rect::new(0.0, 0.0, 750.0, 800.0)));
    }

    #[test]
    fn short_regions_keep_every_tile_inside() {
        let region = Rect::new(10.0, 0.0, 2.0, 10.0);
        let tiles = split(region, 5, Axis::Horizontal);
        assert_eq!(tiles.len(), 5);
        for (i, tile) in tiles.iter().enumerate() {
            assert!(tile.is_valid(), "{tile:?}");
            assert!(tile.x >= region.x && tile.x + tile.w <= region.x + region.w, "{tile:?}");
            for other in tiles.iter().skip(i + 1) {
                assert!(!collide(tile, other), "{tile:?} overlaps {other:?}");
            }
        }
        assert_eq!(tiles[0], Rect::new(10.0, 0.0, 0.25, 10.0));
        assert_eq!(tiles[4], Rect::new(11.0, 0.0, 1.0, 10.0));
    }

    #[test]
    fn crowded_bottom_zone_stays_in_the_viewport() {
        let panes: Vec<PaneState> = (1..=6).map(|seq| pane(&format!("b{seq}"), seq, Some(DockZone::Bottom))).collect();
        let config = DockingConfig {
            viewport: Rect::new(0.0, 0.0, 4.0, 4.0),
            ..DockingConfig::default()
        };
        let placed = compute(&panes, &config);
        assert_eq!(placed.len(), 6);
        for (id, rect) in &placed {
            assert!(rect.is_valid(), "{id} {rect:?}");
            assert!(rect.x >= 0.0 && rect.x + rect.w <= 4.0, "{id} {rect:?}");
            assert!(rect.y >= 0.0 && rect.y + rect.h <= 4.0, "{id} {rect:?}");
        }
    }
}
