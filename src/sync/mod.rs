//! Cross-instance synchronization hooks.
//!
//! Store changes are turned into [`SyncMessage`]s and sent through a
//! [`Transport`]; a receiving workspace replays them with
//! `Workspace::apply_remote`, which does not re-broadcast.
//!
//! # Modules
//!
//! - [`messages`]: wire message types with trace context propagation
//! - [`transport`]: transport capability and the in-process [`LocalBus`]

pub mod messages;
pub mod transport;

pub use messages::{SyncMessage, TraceContext};
pub use transport::{decode, publish, LocalBus, LocalTransport, Transport, TransportHandler};
