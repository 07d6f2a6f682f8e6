//! Domain layer: pane model, geometry and errors.
//!
//! Types here carry no behavior tied to hosts, storage or transports.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`geometry`]: Rectangles, collision, resolution and snapping
//! - [`pane`]: Pane identity, state, creation specs and content
//!
//! # Examples
//!
//! ```
//! use paneflow::domain::{geometry::collide, Rect};
//!
//! let a = Rect::new(0.0, 0.0, 10.0, 10.0);
//! let b = Rect::new(5.0, 5.0, 10.0, 10.0);
//! assert!(collide(&a, &b));
//! ```

pub mod error;
pub mod geometry;
pub mod pane;

pub use error::{PaneflowError, Result};
pub use geometry::Rect;
pub use pane::{DockZone, MenuItem, PaneContent, PaneId, PaneSpec, PaneState, TimelineEntry};
