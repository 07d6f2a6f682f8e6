//! Pane type registry.
//!
//! Content modules register their pane types once at boot: a type id, a
//! [`Renderable`] that draws panes of that type, and [`PaneMetadata`] (title, icon,
//! default size, singleton flag). The window-state store consults the registry to
//! validate type ids, apply default sizes and enforce singletons.
//!
//! # Modules
//!
//! - [`boundary`]: per-pane render isolation
//!
//! # Example
//!
//! ```rust
//! use paneflow::registry::{PaneMetadata, PaneRegistry, TextRenderable};
//! use std::rc::Rc;
//!
//! let mut registry = PaneRegistry::new();
//! registry.register("crm", Rc::new(TextRenderable::new("CRM")), PaneMetadata::new("Customers"))?;
//! assert!(registry.resolve("crm").is_some());
//! # Ok::<(), paneflow::PaneflowError>(())
//! ```

pub mod boundary;

pub use boundary::{render_pane, PaneRender};

use crate::domain::error::{PaneflowError, Result};
use crate::domain::PaneState;
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

/// Something that can draw the content of a pane.
///
/// The engine treats the output as opaque markup handed back to the host.
pub trait Renderable {
    /// Renders `pane`.
    ///
    /// # Errors
    ///
    /// Implementations report content failures; the render boundary turns them
    /// into a placeholder for that pane only.
    fn render(&self, pane: &PaneState) -> Result<String>;
}

/// Minimal renderable that prints a fixed heading plus the pane id.
///
/// Used by the headless host and handy for tests.
#[derive(Debug, Clone)]
pub struct TextRenderable {
    heading: String,
}

impl TextRenderable {
    pub fn new(heading: impl Into<String>) -> Self {
        Self { heading: heading.into() }
    }
}

impl Renderable for TextRenderable {
    fn render(&self, pane: &PaneState) -> Result<String> {
        Ok(format!("[{}] {}", self.heading, pane.id))
    }
}

/// Width and height of a pane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub w: f64,
    pub h: f64,
}

impl Default for Size {
    fn default() -> Self {
        Self { w: 480.0, h: 320.0 }
    }
}

/// Descriptive metadata of a pane type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaneMetadata {
    pub title: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub default_size: Size,
    /// At most one live pane of this type may exist.
    #[serde(default)]
    pub singleton: bool,
}

impl PaneMetadata {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            icon: None,
            default_size: Size::default(),
            singleton: false,
        }
    }

    #[must_use]
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    #[must_use]
    pub const fn with_default_size(mut self, w: f64, h: f64) -> Self {
        self.default_size = Size { w, h };
        self
    }

    #[must_use]
    pub const fn singleton(mut self) -> Self {
        self.singleton = true;
        self
    }
}

/// A registered pane type.
#[derive(Clone)]
pub struct RegistryEntry {
    pub type_id: String,
    pub renderable: Rc<dyn Renderable>,
    pub metadata: PaneMetadata,
}

impl fmt::Debug for RegistryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryEntry")
            .field("type_id", &self.type_id)
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}

/// Search hit returned by [`PaneRegistry::search`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryMatch {
    pub type_id: String,
    pub title: String,
    pub score: i64,
}

/// Map of pane type ids to their entries.
#[derive(Debug, Default, Clone)]
pub struct PaneRegistry {
    entries: BTreeMap<String, RegistryEntry>,
}

impl PaneRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a pane type.
    ///
    /// # Errors
    ///
    /// Returns [`PaneflowError::DuplicateType`] if `type_id` is already registered;
    /// the existing entry is kept.
    pub fn register(
        &mut self,
        type_id: impl Into<String>,
        renderable: Rc<dyn Renderable>,
        metadata: PaneMetadata,
    ) -> Result<()> {
        let type_id = type_id.into();
        if self.entries.contains_key(&type_id) {
            tracing::warn!(type_id = %type_id, "rejected duplicate pane type registration");
            return Err(PaneflowError::DuplicateType(type_id));
        }

        tracing::debug!(
            type_id = %type_id,
            title = %metadata.title,
            singleton = metadata.singleton,
            "registered pane type"
        );
        self.entries.insert(
            type_id.clone(),
            RegistryEntry {
                type_id,
                renderable,
                metadata,
            },
        );
        Ok(())
    }

    #[must_use]
    pub fn resolve(&self, type_id: &str) -> Option<&RegistryEntry> {
        self.entries.get(type_id)
    }

    #[must_use]
    pub fn contains(&self, type_id: &str) -> bool {
        self.entries.contains_key(type_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in type id order.
    pub fn iter(&self) -> impl Iterator<Item = &RegistryEntry> {
        self.entries.values()
    }

    /// Fuzzy-searches pane types by title and type id, best match first.
    ///
    /// Every whitespace-separated token must match. An empty query lists all
    /// types in type id order with a score of zero.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<RegistryMatch> {
        let _span = tracing::debug_span!("registry_search", query_len = query.len()).entered();

        let tokens: Vec<String> = query.split_whitespace().map(str::to_lowercase).collect();
        if tokens.is_empty() {
            return self
                .iter()
                .map(|e| RegistryMatch {
                    type_id: e.type_id.clone(),
                    title: e.metadata.title.clone(),
                    score: 0,
                })
                .collect();
        }

        let matcher = SkimMatcherV2::default();
        let mut hits: Vec<RegistryMatch> = self
            .iter()
            .filter_map(|entry| {
                let haystack = format!("{} {}", entry.metadata.title, entry.type_id).to_lowercase();
                let mut total = 0;
                for token in &tokens {
                    total += matcher.fuzzy_match(&haystack, token)?;
                }
                Some(RegistryMatch {
                    type_id: entry.type_id.clone(),
                    title: entry.metadata.title.clone(),
                    score: total,
                })
            })
            .collect();

        hits.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.type_id.cmp(&b.type_id)));
        tracing::debug!(hits = hits.len(), "registry search complete");
        hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> PaneRegistry {
        let mut registry = PaneRegistry::new();
        registry
            .register("crm", Rc::new(TextRenderable::new("CRM")), PaneMetadata::new("Customer Relations"))
            .unwrap();
        registry
            .register(
                "schedule",
                Rc::new(TextRenderable::new("Schedule")),
                PaneMetadata::new("Staff Schedule").with_default_size(640.0, 480.0),
            )
            .unwrap();
        registry
            .register("assistant", Rc::new(TextRenderable::new("AI")), PaneMetadata::new("Assistant").singleton())
            .unwrap();
        registry
    }

    #[test]
    fn duplicate_registration_is_rejected_and_keeps_original() {
        let mut registry = registry();
        let err = registry
            .register("crm", Rc::new(TextRenderable::new("Other")), PaneMetadata::new("Other"))
            .unwrap_err();
        assert!(matches!(err, PaneflowError::DuplicateType(ref t) if t == "crm"));
        assert_eq!(registry.resolve("crm").unwrap().metadata.title, "Customer Relations");
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn resolve_returns_metadata() {
        let registry = registry();
        let entry = registry.resolve("schedule").unwrap();
        assert_eq!(entry.metadata.default_size, Size { w: 640.0, h: 480.0 });
        assert!(registry.resolve("assistant").unwrap().metadata.singleton);
        assert!(registry.resolve("payroll").is_none());
    }

    #[test]
    fn search_ranks_fuzzy_matches() {
        let registry = registry();
        let hits = registry.search("sched");
        assert_eq!(hits.first().map(|h| h.type_id.as_str()), Some("schedule"));
        assert!(registry.search("zzzz").is_empty());
        assert_eq!(registry.search("").len(), 3);
    }
}
