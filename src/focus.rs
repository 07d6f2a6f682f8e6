//! Focus restoration around transient overlays.
//!
//! Before a modal opens, the host remembers the element that had focus; when the
//! modal is dismissed, focus goes back to it. Only a weak reference is held, so a
//! remembered element that gets torn down in the meantime is simply forgotten.

use std::rc::{Rc, Weak};

/// An element that can take keyboard focus.
pub trait FocusTarget {
    /// Whether the element is still attached to the live view tree.
    fn is_mounted(&self) -> bool;

    fn focus(&self);
}

#[derive(Default)]
pub struct FocusManager {
    remembered: Option<Weak<dyn FocusTarget>>,
}

impl std::fmt::Debug for FocusManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FocusManager")
            .field("remembered", &self.has_remembered())
            .finish()
    }
}

impl FocusManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Remembers `target`, replacing whatever was remembered before.
    pub fn remember(&mut self, target: &Rc<dyn FocusTarget>) {
        self.remembered = Some(Rc::downgrade(target));
    }

    /// Refocuses the remembered element if it is still alive and mounted.
    ///
    /// Returns whether focus was restored. A live, mounted target stays
    /// remembered until [`remember`](Self::remember) replaces it; a dropped or
    /// unmounted one is forgotten.
    pub fn restore(&mut self) -> bool {
        let Some(target) = self.remembered.as_ref().and_then(Weak::upgrade) else {
            tracing::trace!("no live focus target to restore");
            self.remembered = None;
            return false;
        };
        if !target.is_mounted() {
            tracing::debug!("remembered focus target was unmounted");
            self.remembered = None;
            return false;
        }
        target.focus();
        true
    }

    #[must_use]
    pub fn has_remembered(&self) -> bool {
        self.remembered.as_ref().is_some_and(|weak| weak.strong_count() > 0)
    }

    pub fn clear(&mut self) {
        self.remembered = None;
    }
}
