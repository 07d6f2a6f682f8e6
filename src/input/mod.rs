//! Input abstraction layer.
//!
//! - [`pointer`]: raw pointer/touch/pen events → [`NormalizedPointer`]
//! - [`keys`]: key chord strings → canonical [`KeyCombo`]

pub mod keys;
pub mod pointer;

pub use keys::{KeyCombo, Modifiers};
pub use pointer::{normalize, NormalizedPointer, PointerKind, RawPointerEvent, TouchPoint};
