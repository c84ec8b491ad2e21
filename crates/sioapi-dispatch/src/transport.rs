use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use crate::dispatcher::WrappedHandler;
use crate::error::EmitError;
use crate::error_handler::ErrorHandler;

/// Namespace used when none is given.
pub const DEFAULT_NAMESPACE: &str = "/";

/// Registration surface of the host socket framework.
///
/// Wrapped handlers are forwarded here after validation has been attached.
/// The namespace is passed through unmodified.
pub trait EventTransport {
    fn on(&mut self, event: &str, namespace: Option<&str>, handler: WrappedHandler);

    fn on_error_default(&mut self, handler: Arc<dyn ErrorHandler>);
}

/// In-process transport: an event table and an emit entry point.
///
/// Behaves like a socket test client. No connections, no I/O.
#[derive(Default)]
pub struct LocalTransport {
    handlers: HashMap<(String, String), WrappedHandler>,
    error_handler: Option<Arc<dyn ErrorHandler>>,
}

impl LocalTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit `event` on the default namespace and return its acknowledgement.
    pub fn emit(&self, event: &str, payload: Option<Value>) -> Result<Value, EmitError> {
        self.emit_to(DEFAULT_NAMESPACE, event, payload)
    }

    /// Emit `event` on `namespace`.
    ///
    /// Failures go through the fallback error handler when one is registered;
    /// whatever it re-raises comes back as [`EmitError::Fatal`].
    pub fn emit_to(
        &self,
        namespace: &str,
        event: &str,
        payload: Option<Value>,
    ) -> Result<Value, EmitError> {
        let key = (namespace.to_string(), event.to_string());
        let handler = self
            .handlers
            .get(&key)
            .ok_or_else(|| EmitError::UnknownEvent {
                namespace: namespace.to_string(),
                event: event.to_string(),
            })?;

        match handler.call(payload) {
            Ok(ack) => Ok(ack),
            Err(err) => match &self.error_handler {
                Some(fallback) => fallback.handle(event, err).map_err(EmitError::Fatal),
                None => Err(EmitError::Fatal(err)),
            },
        }
    }

    /// Bound `(namespace, event)` pairs, sorted.
    pub fn events(&self) -> Vec<(&str, &str)> {
        let mut events: Vec<(&str, &str)> = self
            .handlers
            .keys()
            .map(|(ns, ev)| (ns.as_str(), ev.as_str()))
            .collect();
        events.sort_unstable();
        events
    }

    pub fn has_error_handler(&self) -> bool {
        self.error_handler.is_some()
    }
}

impl EventTransport for LocalTransport {
    fn on(&mut self, event: &str, namespace: Option<&str>, handler: WrappedHandler) {
        let namespace = namespace.unwrap_or(DEFAULT_NAMESPACE);
        if self
            .handlers
            .insert((namespace.to_string(), event.to_string()), handler)
            .is_some()
        {
            tracing::warn!(event, namespace, "replaced existing event handler");
        }
    }

    fn on_error_default(&mut self, handler: Arc<dyn ErrorHandler>) {
        self.error_handler = Some(handler);
    }
}
