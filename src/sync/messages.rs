//! Sync message types exchanged between workspace instances.
//!
//! Messages mirror the store's per-pane changes so a peer can replay them:
//! creation, geometry, focus, closing, docking, visibility and locking. Layout
//! passes and whole-set replacement are not sent; each peer re-tiles on its own
//! viewport and restores its own layout file. Each message carries an optional
//! tracing context so a peer's spans link to the span that produced the change.

use crate::app::store::{StoreEvent, StoreSnapshot};
use crate::domain::{DockZone, PaneId, PaneState};
use serde::{Deserialize, Serialize};

/// Distributed tracing context for cross-instance span propagation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceContext {
    /// OpenTelemetry trace ID as a hex string.
    pub trace_id: String,

    /// Span that produced the message.
    pub parent_span_id: String,
}

impl TraceContext {
    /// Captures the OpenTelemetry ids of the current tracing span.
    ///
    /// Returns `None` when no valid span context is active, e.g. when tracing
    /// was never initialized.
    #[must_use]
    pub fn from_current() -> Option<Self> {
        use opentelemetry::trace::TraceContextExt;
        use tracing_opentelemetry::OpenTelemetrySpanExt;

        let span = tracing::Span::current();
        let otel_context = span.context();
        let span_ref = otel_context.span();
        let span_context = span_ref.span_context();

        if !span_context.is_valid() {
            return None;
        }

        Some(Self {
            trace_id: format!("{:032x}", span_context.trace_id()),
            parent_span_id: format!("{:016x}", span_context.span_id()),
        })
    }
}

/// Generates constructors that attach the current trace context.
macro_rules! sync_message_builders {
    (
        $(
            $builder_name:ident($variant:ident { $($field:ident: $ty:ty),* $(,)? })
        ),* $(,)?
    ) => {
        impl SyncMessage {
            $(
                #[doc = concat!("Create a ", stringify!($variant), " message with current trace context")]
                #[must_use]
                pub fn $builder_name($($field: $ty),*) -> Self {
                    Self::$variant {
                        $($field,)*
                        trace_context: TraceContext::from_current(),
                    }
                }
            )*
        }
    };
}

sync_message_builders! {
    pane_created(PaneCreated { pane: PaneState }),
    pane_moved(PaneMoved { id: PaneId, x: f64, y: f64 }),
    pane_resized(PaneResized { id: PaneId, w: f64, h: f64 }),
    pane_focused(PaneFocused { id: PaneId }),
    pane_closed(PaneClosed { id: PaneId }),
    pane_docked(PaneDocked { id: PaneId, zone: Option<DockZone> }),
    pane_visibility(PaneVisibility { id: PaneId, visible: bool }),
    pane_locked(PaneLocked { id: PaneId, locked: bool }),
}

/// A replayable workspace change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SyncMessage {
    PaneCreated {
        pane: PaneState,

        #[serde(default, skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    PaneMoved {
        id: PaneId,
        x: f64,
        y: f64,

        #[serde(default, skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    PaneResized {
        id: PaneId,
        w: f64,
        h: f64,

        #[serde(default, skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    PaneFocused {
        id: PaneId,

        #[serde(default, skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    PaneClosed {
        id: PaneId,

        #[serde(default, skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// `zone` is `None` when the pane went back to floating.
    PaneDocked {
        id: PaneId,
        zone: Option<DockZone>,

        #[serde(default, skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    PaneVisibility {
        id: PaneId,
        visible: bool,

        #[serde(default, skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    PaneLocked {
        id: PaneId,
        locked: bool,

        #[serde(default, skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },
}

impl SyncMessage {
    /// Derives the message for a store change, if the change is replayable.
    ///
    /// Layout passes and restores produce nothing.
    #[must_use]
    pub fn from_store_event(event: &StoreEvent, snapshot: &StoreSnapshot) -> Option<Self> {
        match event {
            StoreEvent::Created { id } => snapshot.pane(id.as_str()).cloned().map(Self::pane_created),
            StoreEvent::Moved { id, rect } => Some(Self::pane_moved(id.clone(), rect.x, rect.y)),
            StoreEvent::Resized { id, rect } => Some(Self::pane_resized(id.clone(), rect.w, rect.h)),
            StoreEvent::Focused { id } => Some(Self::pane_focused(id.clone())),
            StoreEvent::Closed { id } => Some(Self::pane_closed(id.clone())),
            StoreEvent::Docked { id, zone } => Some(Self::pane_docked(id.clone(), *zone)),
            StoreEvent::VisibilityChanged { id, visible } => Some(Self::pane_visibility(id.clone(), *visible)),
            StoreEvent::LockChanged { id, locked } => Some(Self::pane_locked(id.clone(), *locked)),
            StoreEvent::LayoutApplied { .. }
            | StoreEvent::Replaced { .. } => None,
        }
    }

    /// Wire name of the message, used as the transport `kind`.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::PaneCreated { .. } => "pane_created",
            Self::PaneMoved { .. } => "pane_moved",
            Self::PaneResized { .. } => "pane_resized",
            Self::PaneFocused { .. } => "pane_focused",
            Self::PaneClosed { .. } => "pane_closed",
            Self::PaneDocked { .. } => "pane_docked",
            Self::PaneVisibility { .. } => "pane_visibility",
            Self::PaneLocked { .. } => "pane_locked",
        }
    }

    #[must_use]
    pub fn pane_id(&self) -> &PaneId {
        match self {
            Self::PaneCreated { pane, .. } => &pane.id,
            Self::PaneMoved { id, .. }
            | Self::PaneResized { id, .. }
            | Self::PaneFocused { id, .. }
            | Self::PaneClosed { id, .. }
            | Self::PaneDocked { id, .. }
            | Self::PaneVisibility { id, .. }
            | Self::PaneLocked { id, .. } => id,
        }
    }
}
