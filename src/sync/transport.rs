//! Transport capability for sync messages.
//!
//! A [`Transport`] moves `(kind, payload)` pairs between workspace instances.
//! [`LocalBus`] is the in-process implementation: every endpoint obtained from
//! [`LocalBus::connect`] receives what the other endpoints send, synchronously.

use super::messages::SyncMessage;
use crate::domain::error::{PaneflowError, Result};
use serde_json::Value;
use std::cell::RefCell;
use std::rc::Rc;

/// Callback receiving `(kind, payload)` pairs from a transport.
pub type TransportHandler = Box<dyn FnMut(&str, &Value) -> Result<()>>;

/// Message channel between workspace instances.
pub trait Transport {
    /// Sends a payload to the peers.
    ///
    /// # Errors
    ///
    /// Returns [`PaneflowError::Transport`] when the message cannot be delivered.
    fn send(&self, kind: &str, payload: &Value) -> Result<()>;

    /// Registers a handler for messages coming from peers.
    fn on(&mut self, handler: TransportHandler);
}

/// Serializes and sends a sync message.
///
/// # Errors
///
/// Returns [`PaneflowError::Transport`] on serialization or delivery failure.
pub fn publish(transport: &dyn Transport, message: &SyncMessage) -> Result<()> {
    let payload = serde_json::to_value(message).map_err(|e| PaneflowError::Transport(e.to_string()))?;
    transport.send(message.kind(), &payload)
}

/// Decodes a received payload, checking it against its `kind`.
///
/// # Errors
///
/// Returns [`PaneflowError::Transport`] for malformed payloads or a kind mismatch.
pub fn decode(kind: &str, payload: &Value) -> Result<SyncMessage> {
    let message: SyncMessage =
        serde_json::from_value(payload.clone()).map_err(|e| PaneflowError::Transport(e.to_string()))?;
    if message.kind() != kind {
        return Err(PaneflowError::Transport(format!(
            "payload of type '{}' sent as '{kind}'",
            message.kind()
        )));
    }
    Ok(message)
}

type SharedHandler = Rc<RefCell<TransportHandler>>;

#[derive(Default)]
struct BusInner {
    /// Handlers per endpoint, indexed by endpoint id.
    endpoints: Vec<Vec<SharedHandler>>,
}

/// In-process broadcast bus.
#[derive(Clone, Default)]
pub struct LocalBus {
    inner: Rc<RefCell<BusInner>>,
}

impl std::fmt::Debug for LocalBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalBus")
            .field("endpoints", &self.inner.borrow().endpoints.len())
            .finish()
    }
}

impl LocalBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an endpoint to the bus.
    #[must_use]
    pub fn connect(&self) -> LocalTransport {
        let mut inner = self.inner.borrow_mut();
        inner.endpoints.push(Vec::new());
        LocalTransport {
            bus: Rc::clone(&self.inner),
            endpoint: inner.endpoints.len() - 1,
        }
    }
}

/// One endpoint of a [`LocalBus`].
pub struct LocalTransport {
    bus: Rc<RefCell<BusInner>>,
    endpoint: usize,
}

impl std::fmt::Debug for LocalTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalTransport").field("endpoint", &self.endpoint).finish()
    }
}

impl Transport for LocalTransport {
    /// Delivers to every handler of every other endpoint.
    ///
    /// Handler failures are logged and do not stop delivery. A handler that is
    /// already running further up the stack (a send from inside a receive loop
    /// back to it) is skipped.
    fn send(&self, kind: &str, payload: &Value) -> Result<()> {
        let _span = tracing::debug_span!("transport_send", kind, endpoint = self.endpoint).entered();

        let targets: Vec<SharedHandler> = {
            let inner = self.bus.borrow();
            inner
                .endpoints
                .iter()
                .enumerate()
                .filter(|(index, _)| *index != self.endpoint)
                .flat_map(|(_, handlers)| handlers.iter().cloned())
                .collect()
        };

        for handler in targets {
            let Ok(mut handler) = handler.try_borrow_mut() else {
                tracing::warn!("skipping re-entrant delivery");
                continue;
            };
            if let Err(e) = (*handler)(kind, payload) {
                tracing::error!(error = %e, "transport handler failed");
            }
        }
        Ok(())
    }

    fn on(&mut self, handler: TransportHandler) {
        let mut inner = self.bus.borrow_mut();
        if let Some(handlers) = inner.endpoints.get_mut(self.endpoint) {
            handlers.push(Rc::new(RefCell::new(handler)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_reach_other_endpoints_only() {
        let bus = LocalBus::new();
        let a = bus.connect();
        let mut b = bus.connect();
        let mut c = bus.connect();

        let received = Rc::new(RefCell::new(Vec::new()));
        for endpoint in [&mut b, &mut c] {
            let sink = Rc::clone(&received);
            endpoint.on(Box::new(move |kind: &str, _: &Value| -> Result<()> {
                sink.borrow_mut().push(kind.to_string());
                Ok(())
            }));
        }

        a.send("ping", &Value::Null).unwrap();
        assert_eq!(*received.borrow(), vec!["ping", "ping"]);

        b.send("pong", &Value::Null).unwrap();
        assert_eq!(received.borrow().len(), 3);
    }

    #[test]
    fn failing_handler_does_not_stop_delivery() {
        let bus = LocalBus::new();
        let a = bus.connect();
        let mut b = bus.connect();
        let hits = Rc::new(RefCell::new(0));

        b.on(Box::new(|_: &str, _: &Value| -> Result<()> { Err(PaneflowError::Transport("down".into())) }));
        let sink = Rc::clone(&hits);
        b.on(Box::new(move |_: &str, _: &Value| -> Result<()> {
            *sink.borrow_mut() += 1;
            Ok(())
        }));

        a.send("x", &Value::Null).unwrap();
        assert_eq!(*hits.borrow(), 1);
    }

    #[test]
    fn publish_then_decode() {
        let bus = LocalBus::new();
        let a = bus.connect();
        let mut b = bus.connect();
        let got = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&got);
        b.on(Box::new(move |kind: &str, payload: &Value| -> Result<()> {
            *sink.borrow_mut() = Some(decode(kind, payload)?);
            Ok(())
        }));

        let message = SyncMessage::pane_closed("crm".into());
        publish(&a, &message).unwrap();
        assert_eq!(got.borrow().as_ref(), Some(&message));

        let err = decode("pane_moved", &serde_json::to_value(&message).unwrap()).unwrap_err();
        assert!(matches!(err, PaneflowError::Transport(_)));
    }
}
