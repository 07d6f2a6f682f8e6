//! Axis-aligned rectangle math: collision, push-out resolution and grid snapping.
//!
//! All functions here are pure. Coordinates live in the workspace coordinate space
//! (`f64`, origin top-left, `y` growing downward).

use serde::{Deserialize, Serialize};

/// Default grid step used by [`snap`] callers when no step is configured.
pub const DEFAULT_GRID_STEP: f64 = 8.0;

/// Decimal places kept after snapping, so repeated snapping cannot drift.
const SNAP_PRECISION: f64 = 10_000.0;

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    #[must_use]
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Right edge (`x + w`).
    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    /// Bottom edge (`y + h`).
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    /// Returns a copy moved to `(x, y)`.
    #[must_use]
    pub const fn at(self, x: f64, y: f64) -> Self {
        Self { x, y, ..self }
    }

    /// Returns a copy with size `(w, h)`.
    #[must_use]
    pub const fn sized(self, w: f64, h: f64) -> Self {
        Self { w, h, ..self }
    }

    /// True when every component is finite and both dimensions are positive.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        [self.x, self.y, self.w, self.h].iter().all(|v| v.is_finite()) && self.w > 0.0 && self.h > 0.0
    }

    /// True when the point lies inside the rectangle (right and bottom edges excluded).
    #[must_use]
    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.x && px < self.right() && py >= self.y && py < self.bottom()
    }
}

/// Returns true iff the projections of `a` and `b` overlap on both axes.
///
/// Rectangles that merely share an edge do not collide.
///
/// ```
/// use paneflow::domain::geometry::{collide, Rect};
///
/// let a = Rect::new(0.0, 0.0, 10.0, 10.0);
/// assert!(collide(&a, &Rect::new(5.0, 5.0, 10.0, 10.0)));
/// assert!(!collide(&a, &Rect::new(20.0, 20.0, 10.0, 10.0)));
/// ```
#[must_use]
pub fn collide(a: &Rect, b: &Rect) -> bool {
    let separated = a.x + a.w <= b.x || b.x + b.w <= a.x || a.y + a.h <= b.y || b.y + b.h <= a.y;
    !separated
}

/// Direction in which [`resolve`] pushes the moving rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Push {
    Left,
    Right,
    Up,
    Down,
}

/// Pushes `moving` out of `fixed` along the axis needing the smallest displacement.
///
/// Returns `moving` unchanged when the two do not collide. The result keeps the size
/// of `moving` and never collides with `fixed`. Ties prefer left, then right, up and
/// down.
#[must_use]
pub fn resolve(moving: &Rect, fixed: &Rect) -> Rect {
    if !collide(moving, fixed) {
        return *moving;
    }

    let candidates = [
        (Push::Left, moving.right() - fixed.x),
        (Push::Right, fixed.right() - moving.x),
        (Push::Up, moving.bottom() - fixed.y),
        (Push::Down, fixed.bottom() - moving.y),
    ];

    let (push, _) = candidates
        .iter()
        .copied()
        .fold(candidates[0], |best, c| if c.1 < best.1 { c } else { best });

    let resolved = match push {
        Push::Left => moving.at(settle_before(fixed.x, moving.w), moving.y),
        Push::Right => moving.at(fixed.x + fixed.w, moving.y),
        Push::Up => moving.at(moving.x, settle_before(fixed.y, moving.h)),
        Push::Down => moving.at(moving.x, fixed.y + fixed.h),
    };

    tracing::trace!(?push, ?moving, ?fixed, ?resolved, "resolved collision");
    resolved
}

/// Largest start position such that `start + len <= edge` holds in floating point.
fn settle_before(edge: f64, len: f64) -> f64 {
    let mut start = edge - len;
    while start + len > edge {
        start -= start.abs().max(len).max(1.0) * f64::EPSILON;
    }
    start
}

/// Rounds `value` to the nearest multiple of `step`, then to 4 decimal places.
///
/// Non-positive or non-finite steps leave `value` unchanged.
///
/// ```
/// use paneflow::domain::geometry::snap;
///
/// assert_eq!(snap(7.0, 8.0), 8.0);
/// assert_eq!(snap(11.0, 8.0), 8.0);
/// assert_eq!(snap(13.0, 8.0), 16.0);
/// ```
#[must_use]
pub fn snap(value: f64, step: f64) -> f64 {
    if !(step.is_finite() && step > 0.0) || !value.is_finite() {
        return value;
    }
    let snapped = (value / step).round() * step;
    (snapped * SNAP_PRECISION).round() / SNAP_PRECISION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collide_detects_overlap_and_separation() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(collide(&a, &Rect::new(5.0, 5.0, 10.0, 10.0)));
        assert!(!collide(&a, &Rect::new(20.0, 20.0, 10.0, 10.0)));
    }

    #[test]
    fn touching_edges_do_not_collide() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(!collide(&a, &Rect::new(10.0, 0.0, 10.0, 10.0)));
        assert!(!collide(&a, &Rect::new(0.0, 10.0, 10.0, 10.0)));
    }

    #[test]
    fn collide_is_symmetric() {
        let rects = [
            Rect::new(0.0, 0.0, 10.0, 10.0),
            Rect::new(5.0, 5.0, 10.0, 10.0),
            Rect::new(9.5, -3.0, 1.0, 4.0),
            Rect::new(20.0, 20.0, 1.0, 1.0),
            Rect::new(-5.0, 2.0, 30.0, 2.0),
        ];
        for a in &rects {
            for b in &rects {
                assert_eq!(collide(a, b), collide(b, a), "{a:?} vs {b:?}");
            }
        }
    }

    #[test]
    fn resolve_leaves_non_colliding_rect_alone() {
        let moving = Rect::new(50.0, 50.0, 10.0, 10.0);
        let fixed = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(resolve(&moving, &fixed), moving);
    }

    #[test]
    fn resolve_uses_minimal_translation() {
        let fixed = Rect::new(0.0, 0.0, 100.0, 100.0);

        // Mostly below: pushing down by 10 is cheapest.
        let moving = Rect::new(40.0, 90.0, 20.0, 20.0);
        assert_eq!(resolve(&moving, &fixed), Rect::new(40.0, 100.0, 20.0, 20.0));

        // Poking in from the right.
        let moving = Rect::new(95.0, 40.0, 20.0, 20.0);
        assert_eq!(resolve(&moving, &fixed), Rect::new(100.0, 40.0, 20.0, 20.0));

        // Poking in from the left.
        let moving = Rect::new(-15.0, 40.0, 20.0, 20.0);
        assert_eq!(resolve(&moving, &fixed), Rect::new(-20.0, 40.0, 20.0, 20.0));
    }

    #[test]
    fn resolve_never_leaves_a_collision() {
        let fixed = Rect::new(0.1, 0.3, 33.3, 17.7);
        let mut offset = -40.0;
        while offset < 40.0 {
            let moving = Rect::new(offset, offset * 0.5, 0.2 + offset.abs() / 7.0, 0.7);
            let out = resolve(&moving, &fixed);
            assert!(!collide(&out, &fixed), "{moving:?} -> {out:?}");
            assert_eq!((out.w, out.h), (moving.w, moving.h));
            offset += 0.37;
        }
    }

    #[test]
    fn snap_examples() {
        assert_eq!(snap(7.0, 8.0), 8.0);
        assert_eq!(snap(11.0, 8.0), 8.0);
        assert_eq!(snap(13.0, 8.0), 16.0);
        assert_eq!(snap(0.0, 8.0), 0.0);
    }

    #[test]
    fn snap_is_idempotent_and_monotonic() {
        let steps = [8.0, 0.1, 2.5, 3.0];
        for step in steps {
            let mut prev = f64::NEG_INFINITY;
            let mut v = -50.0;
            while v < 50.0 {
                let once = snap(v, step);
                assert_eq!(snap(once, step), once, "v={v} step={step}");
                assert!(once >= prev, "monotonic v={v} step={step}");
                prev = once;
                v += 0.173;
            }
        }
    }

    #[test]
    fn snap_ignores_degenerate_step() {
        assert_eq!(snap(7.3, 0.0), 7.3);
        assert_eq!(snap(7.3, -8.0), 7.3);
        assert_eq!(snap(7.3, f64::NAN), 7.3);
    }

    #[test]
    fn rect_validity() {
        assert!(Rect::new(0.0, 0.0, 1.0, 1.0).is_valid());
        assert!(!Rect::new(0.0, 0.0, 0.0, 1.0).is_valid());
        assert!(!Rect::new(0.0, 0.0, 1.0, -1.0).is_valid());
        assert!(!Rect::new(f64::NAN, 0.0, 1.0, 1.0).is_valid());
    }
}
