//! Layout storage abstraction.
//!
//! The [`LayoutStorage`] trait hides where saved layouts live, so the workspace
//! can persist to a file in production and to anything else in embedding hosts.

use crate::domain::error::Result;
use crate::storage::models::LayoutDocument;

/// Persistent home of a workspace layout.
///
/// # Implementations
///
/// - [`JsonLayoutStorage`](crate::storage::JsonLayoutStorage): JSON file with atomic writes
///
/// # Examples
///
/// ```no_run
/// use paneflow::storage::{JsonLayoutStorage, LayoutStorage};
/// use std::path::PathBuf;
///
/// let storage = JsonLayoutStorage::new(PathBuf::from("/tmp/paneflow/layout.json"))?;
/// if let Some(doc) = storage.load()? {
///     println!("{} panes saved", doc.panes.len());
/// }
/// # Ok::<(), paneflow::PaneflowError>(())
/// ```
pub trait LayoutStorage: Send {
    /// Returns the saved layout, or `None` if nothing was saved yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the layout cannot be read or is in a newer format.
    fn load(&self) -> Result<Option<LayoutDocument>>;

    /// Replaces the saved layout.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn save(&mut self, document: &LayoutDocument) -> Result<()>;
}
