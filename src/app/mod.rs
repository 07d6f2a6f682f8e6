//! Application layer coordinating state, events, and actions.
//!
//! This module sits between the host (main.rs or an embedding UI) and the
//! domain, docking, shortcut and storage layers.
//!
//! # Architecture
//!
//! The application layer follows a unidirectional data flow pattern:
//!
//! ```text
//! Host Input → Events → Event Handler → Workspace → Store Mutations → Actions
//!                                                        ↓
//!                                     Listeners ← Store Events → Sync Outbox
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effect commands emitted by the event handler
//! - [`handler`]: Event processing and the host-facing event type
//! - [`modes`]: Interaction mode (idle, dragging, modal)
//! - [`store`]: Authoritative window-state store with listeners
//! - [`workspace`]: Facade keeping store, docking, shortcuts and focus consistent

pub mod actions;
pub mod handler;
pub mod modes;
pub mod store;
pub mod workspace;

pub use actions::Action;
pub use handler::{handle_event, Event};
pub use modes::InteractionMode;
pub use store::{Listener, ListenerId, StoreEvent, StoreSnapshot, WindowStore};
pub use workspace::Workspace;
