use std::fmt;
use std::sync::Arc;

use sioapi_schema::{ModelSchema, SchemaRef};

use crate::handler::EventHandler;

/// One event binding recorded for documentation.
#[derive(Clone)]
pub struct EventRegistration {
    event_name: String,
    namespace: Option<String>,
    request_schema: SchemaRef,
    response_schema: SchemaRef,
    description: Option<String>,
    handler: Arc<dyn EventHandler>,
}

impl EventRegistration {
    pub fn new(
        event_name: impl Into<String>,
        namespace: Option<String>,
        request_schema: SchemaRef,
        response_schema: SchemaRef,
        handler: Arc<dyn EventHandler>,
    ) -> Self {
        let description = handler.description().map(str::to_string);
        Self {
            event_name: event_name.into(),
            namespace,
            request_schema,
            response_schema,
            description,
            handler,
        }
    }

    pub fn event_name(&self) -> &str {
        &self.event_name
    }

    /// Namespace passed through to the transport, if any.
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn request_schema(&self) -> &SchemaRef {
        &self.request_schema
    }

    pub fn response_schema(&self) -> &SchemaRef {
        &self.response_schema
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn handler(&self) -> &Arc<dyn EventHandler> {
        &self.handler
    }
}

impl fmt::Debug for EventRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventRegistration")
            .field("event_name", &self.event_name)
            .field("namespace", &self.namespace)
            .field("request_schema", &self.request_schema.display_name())
            .field("response_schema", &self.response_schema.display_name())
            .finish()
    }
}

/// Append-only, registration-ordered list of event bindings.
///
/// Used for documentation export only; dispatch never consults it.
#[derive(Debug, Clone, Default)]
pub struct DocRegistry {
    registrations: Vec<EventRegistration>,
    error_model: Option<Arc<ModelSchema>>,
}

impl DocRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, registration: EventRegistration) {
        self.registrations.push(registration);
    }

    pub fn iter(&self) -> impl Iterator<Item = &EventRegistration> {
        self.registrations.iter()
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// Event names in registration order.
    pub fn event_names(&self) -> Vec<&str> {
        self.registrations.iter().map(|r| r.event_name()).collect()
    }

    /// Model describing the fallback error acknowledgement.
    pub fn error_model(&self) -> Option<&Arc<ModelSchema>> {
        self.error_model.as_ref()
    }

    pub fn set_error_model(&mut self, model: Arc<ModelSchema>) {
        self.error_model = Some(model);
    }
}

impl<'a> IntoIterator for &'a DocRegistry {
    type Item = &'a EventRegistration;
    type IntoIter = std::slice::Iter<'a, EventRegistration>;

    fn into_iter(self) -> Self::IntoIter {
        self.registrations.iter()
    }
}
