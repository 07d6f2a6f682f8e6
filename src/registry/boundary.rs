//! Per-pane render isolation.
//!
//! Each pane is rendered inside its own boundary: a renderable that returns an
//! error or panics produces a [`PaneRender::Failed`] placeholder for that pane,
//! and the caller keeps rendering the remaining panes.

use super::PaneRegistry;
use crate::domain::{PaneId, PaneState};
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Outcome of rendering one pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaneRender {
    Rendered { pane_id: PaneId, output: String },
    Failed { pane_id: PaneId, message: String },
}

impl PaneRender {
    #[must_use]
    pub const fn pane_id(&self) -> &PaneId {
        match self {
            Self::Rendered { pane_id, .. } | Self::Failed { pane_id, .. } => pane_id,
        }
    }

    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Renders `pane` with its registered renderable, containing any failure.
#[must_use]
pub fn render_pane(registry: &PaneRegistry, pane: &PaneState) -> PaneRender {
    let Some(entry) = registry.resolve(&pane.type_id) else {
        tracing::warn!(pane_id = %pane.id, type_id = %pane.type_id, "no renderable for pane type");
        return PaneRender::Failed {
            pane_id: pane.id.clone(),
            message: format!("unknown pane type '{}'", pane.type_id),
        };
    };

    match catch_unwind(AssertUnwindSafe(|| entry.renderable.render(pane))) {
        Ok(Ok(output)) => PaneRender::Rendered {
            pane_id: pane.id.clone(),
            output,
        },
        Ok(Err(e)) => {
            tracing::error!(pane_id = %pane.id, error = %e, "pane render failed");
            PaneRender::Failed {
                pane_id: pane.id.clone(),
                message: e.to_string(),
            }
        }
        Err(panic) => {
            let message = panic_message(panic.as_ref());
            tracing::error!(pane_id = %pane.id, panic = %message, "pane renderer panicked");
            PaneRender::Failed {
                pane_id: pane.id.clone(),
                message,
            }
        }
    }
}

/// Extracts a readable message from a panic payload.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string())
}
