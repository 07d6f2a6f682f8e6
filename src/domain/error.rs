//! Error types for the pane engine.
//!
//! This module defines the centralized error type [`PaneflowError`] and a type alias
//! [`Result`] used by every layer of the crate. Variants are implemented with the
//! `thiserror` crate.
//!
//! Non-fatal conditions are deliberately absent: a shortcut conflict is reported as a
//! `bool` by the router, and a drop without payload is a no-op.

use thiserror::Error;

/// The main error type for pane engine operations.
///
/// # Examples
///
/// ```
/// use paneflow::domain::PaneflowError;
///
/// let err = PaneflowError::NotFound("p1".to_string());
/// assert_eq!(err.to_string(), "Pane not found: p1");
/// ```
#[derive(Debug, Error)]
pub enum PaneflowError {
    /// A pane with this id is already live in the store.
    #[error("Duplicate pane id: {0}")]
    DuplicateId(String),

    /// The pane type is registered as singleton and a live instance already exists.
    #[error("Pane type '{type_id}' is singleton and already open as '{existing}'")]
    SingletonViolation {
        /// Registry type id that was requested.
        type_id: String,
        /// Id of the live pane holding the singleton slot.
        existing: String,
    },

    /// A registry entry with this type id was already registered.
    #[error("Duplicate pane type: {0}")]
    DuplicateType(String),

    /// The type id has no registry entry.
    #[error("Unknown pane type: {0}")]
    UnknownType(String),

    /// No live pane has this id.
    ///
    /// Every per-pane store operation returns this for absent or closed ids.
    #[error("Pane not found: {0}")]
    NotFound(String),

    /// Width or height is non-positive, or a coordinate is not finite.
    #[error("Invalid dimension: {width} x {height}")]
    InvalidDimension {
        /// Requested width.
        width: f64,
        /// Requested height.
        height: f64,
    },

    /// The pane is locked against geometry changes.
    #[error("Pane is locked: {0}")]
    Locked(String),

    /// A key chord string could not be parsed.
    #[error("Invalid key combo '{combo}': {reason}")]
    InvalidCombo {
        /// The offending input.
        combo: String,
        /// What was wrong with it.
        reason: String,
    },

    /// The workspace was disposed and accepts no further mutations.
    #[error("Workspace has been disposed")]
    Disposed,

    /// Layout storage read, write or format failure.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration is invalid or unreadable.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A sync transport could not deliver or decode a message.
    #[error("Transport error: {0}")]
    Transport(String),
}

/// A specialized `Result` type for pane engine operations.
pub type Result<T> = std::result::Result<T, PaneflowError>;
