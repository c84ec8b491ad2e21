use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use sioapi_schema::{CompiledSchema, SchemaRef, ValidatorConfig};

use crate::error::{DispatchError, Result};
use crate::handler::{EventHandler, Reply};
use crate::registry::{DocRegistry, EventRegistration};

/// Per-registration settings.
#[derive(Debug, Clone)]
pub struct RegisterOptions {
    /// Resolved request schema.
    pub request_schema: SchemaRef,
    /// Resolved acknowledgement schema.
    pub response_schema: SchemaRef,
    /// Enforce the schemas on every invocation.
    pub validate: bool,
    /// Record the binding in the [`DocRegistry`].
    pub document: bool,
    /// Namespace recorded with the binding.
    pub namespace: Option<String>,
}

impl Default for RegisterOptions {
    fn default() -> Self {
        Self {
            request_schema: SchemaRef::Unresolved,
            response_schema: SchemaRef::Unresolved,
            validate: true,
            document: false,
            namespace: None,
        }
    }
}

/// Wraps handlers with request/acknowledgement validation and records bindings.
#[derive(Debug, Default)]
pub struct ValidatingDispatcher {
    registry: DocRegistry,
    validator_config: ValidatorConfig,
}

impl ValidatingDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(validator_config: ValidatorConfig) -> Self {
        Self {
            registry: DocRegistry::new(),
            validator_config,
        }
    }

    /// Wrap `handler` for `event_name`.
    ///
    /// Concrete schemas are compiled here, once. When `options.document` is set the
    /// binding is appended to the registry whether or not validation is enabled.
    pub fn register(
        &mut self,
        event_name: &str,
        handler: Arc<dyn EventHandler>,
        options: RegisterOptions,
    ) -> Result<WrappedHandler> {
        let (request, response) = if options.validate {
            (
                self.compile(&options.request_schema)?,
                self.compile(&options.response_schema)?,
            )
        } else {
            (None, None)
        };

        if options.document {
            self.registry.append(EventRegistration::new(
                event_name,
                options.namespace.clone(),
                options.request_schema.clone(),
                options.response_schema.clone(),
                handler.clone(),
            ));
        }

        tracing::debug!(
            event = event_name,
            request = options.request_schema.display_name(),
            response = options.response_schema.display_name(),
            validate = options.validate,
            document = options.document,
            "registered event handler"
        );

        Ok(WrappedHandler {
            inner: Arc::new(WrappedInner {
                event_name: event_name.to_string(),
                handler,
                request,
                response,
            }),
        })
    }

    pub fn registry(&self) -> &DocRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut DocRegistry {
        &mut self.registry
    }

    pub fn validator_config(&self) -> &ValidatorConfig {
        &self.validator_config
    }

    fn compile(&self, schema: &SchemaRef) -> Result<Option<CompiledSchema>> {
        match schema.concrete() {
            Some(model) => CompiledSchema::compile(model.clone(), &self.validator_config)
                .map(Some)
                .map_err(DispatchError::Schema),
            None => Ok(None),
        }
    }
}

/// A handler wrapped with validation. Cheap to clone and safe to share.
#[derive(Clone)]
pub struct WrappedHandler {
    inner: Arc<WrappedInner>,
}

struct WrappedInner {
    event_name: String,
    handler: Arc<dyn EventHandler>,
    request: Option<CompiledSchema>,
    response: Option<CompiledSchema>,
}

impl WrappedHandler {
    pub fn event_name(&self) -> &str {
        &self.inner.event_name
    }

    /// Invoke the handler.
    ///
    /// Without a payload the handler runs unvalidated and its raw result is returned.
    /// Otherwise: validate the payload, invoke with defaults filled in, validate the
    /// reply, and serialize model replies to JSON text.
    pub fn call(&self, payload: Option<Value>) -> Result<Value> {
        let inner = &*self.inner;

        // Zero-argument events skip validation even when a request schema exists.
        let Some(payload) = payload else {
            tracing::debug!(
                event = %inner.event_name,
                "no payload supplied, invoking without validation"
            );
            return Ok(inner.handler.call(None)?.into_value());
        };

        let payload = match &inner.request {
            Some(schema) => schema.validate(&payload).map_err(|err| {
                tracing::debug!(event = %inner.event_name, model = schema.name(), error = %err, "request rejected");
                DispatchError::RequestValidation(err)
            })?,
            None => payload,
        };

        let reply = inner.handler.call(Some(payload))?;

        if let Some(schema) = &inner.response {
            schema.validate(reply.as_value()).map_err(|err| {
                tracing::debug!(event = %inner.event_name, model = schema.name(), error = %err, "acknowledgement rejected");
                DispatchError::ResponseValidation(err)
            })?;
        }

        match reply {
            Reply::Model(value) => Ok(Value::String(serde_json::to_string(&value)?)),
            Reply::Value(value) => Ok(value),
        }
    }
}

impl fmt::Debug for WrappedHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WrappedHandler")
            .field("event_name", &self.inner.event_name)
            .field("request", &self.inner.request)
            .field("response", &self.inner.response)
            .finish()
    }
}
