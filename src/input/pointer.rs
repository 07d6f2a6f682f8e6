//! Pointer, touch and pen input normalization.
//!
//! Hosts deliver raw events in whatever shape their windowing layer produces. The
//! docking engine only needs a position and a device kind, so [`normalize`] folds
//! every raw event into a [`NormalizedPointer`].

use serde::{Deserialize, Serialize};

/// Input device that produced a pointer sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerKind {
    Mouse,
    Touch,
    Pen,
}

/// One contact point of a touch event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchPoint {
    pub x: f64,
    pub y: f64,
}

/// Raw input event as reported by the host.
///
/// Any field may be missing; touch events usually carry `touches` and no client
/// coordinates, pointer events the reverse.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPointerEvent {
    #[serde(default)]
    pub client_x: Option<f64>,
    #[serde(default)]
    pub client_y: Option<f64>,
    /// Host-reported device name, e.g. `"mouse"`, `"pen"`, `"touch"`.
    #[serde(default)]
    pub pointer_type: Option<String>,
    #[serde(default)]
    pub touches: Vec<TouchPoint>,
}

impl RawPointerEvent {
    /// Mouse event at `(x, y)`.
    #[must_use]
    pub fn mouse(x: f64, y: f64) -> Self {
        Self {
            client_x: Some(x),
            client_y: Some(y),
            pointer_type: Some("mouse".to_string()),
            touches: Vec::new(),
        }
    }

    /// Touch event with the given contact points.
    #[must_use]
    pub fn touch(points: &[(f64, f64)]) -> Self {
        Self {
            touches: points.iter().map(|&(x, y)| TouchPoint { x, y }).collect(),
            ..Self::default()
        }
    }
}

/// Device-independent pointer sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedPointer {
    pub x: f64,
    pub y: f64,
    pub kind: PointerKind,
}

impl NormalizedPointer {
    #[must_use]
    pub const fn new(x: f64, y: f64, kind: PointerKind) -> Self {
        Self { x, y, kind }
    }

    #[must_use]
    pub const fn mouse(x: f64, y: f64) -> Self {
        Self::new(x, y, PointerKind::Mouse)
    }
}

/// Maps a raw event to a normalized pointer sample.
///
/// The first touch point wins over pointer coordinates. Without touches, the
/// host's `pointer_type` picks the kind (unknown types count as mouse) and missing
/// coordinates read as `0`.
///
/// ```
/// use paneflow::input::{normalize, PointerKind, RawPointerEvent};
///
/// let mut raw = RawPointerEvent::touch(&[(3.0, 4.0), (9.0, 9.0)]);
/// raw.client_x = Some(100.0);
/// let p = normalize(&raw);
/// assert_eq!((p.x, p.y, p.kind), (3.0, 4.0, PointerKind::Touch));
/// ```
#[must_use]
pub fn normalize(raw: &RawPointerEvent) -> NormalizedPointer {
    if let Some(first) = raw.touches.first() {
        return NormalizedPointer::new(first.x, first.y, PointerKind::Touch);
    }

    let kind = match raw.pointer_type.as_deref().map(str::to_ascii_lowercase).as_deref() {
        Some("pen") => PointerKind::Pen,
        Some("touch") => PointerKind::Touch,
        _ => PointerKind::Mouse,
    };

    NormalizedPointer::new(raw.client_x.unwrap_or(0.0), raw.client_y.unwrap_or(0.0), kind)
}
