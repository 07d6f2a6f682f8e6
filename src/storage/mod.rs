//! Storage layer for saved workspace layouts.
//!
//! # Modules
//!
//! - `backend`: storage trait abstraction
//! - `json`: JSON file implementation with atomic writes
//! - `models`: on-disk record types, separate from the live pane model

pub mod backend;
pub mod json;
pub mod models;

pub use backend::LayoutStorage;
pub use json::JsonLayoutStorage;
pub use models::{LayoutDocument, PaneRecord, CURRENT_LAYOUT_VERSION};
