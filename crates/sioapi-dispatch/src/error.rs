use sioapi_schema::SchemaError;

/// Failure raised by a handler's own logic.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    /// Handler-reported failure.
    #[error("{0}")]
    Failed(String),

    /// Payload or reply could not be converted to or from the handler's types.
    #[error("payload conversion failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl HandlerError {
    pub fn failed(message: impl Into<String>) -> Self {
        HandlerError::Failed(message.into())
    }
}

/// Errors produced while registering or invoking a wrapped handler.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// The inbound payload does not conform to the request schema.
    /// The handler was not invoked.
    #[error("request validation failed: {0}")]
    RequestValidation(SchemaError),

    /// The handler produced an acknowledgement that violates its response schema.
    #[error("response validation failed: {0}")]
    ResponseValidation(SchemaError),

    /// The handler itself failed.
    #[error("handler failed: {0}")]
    Handler(#[from] HandlerError),

    /// A resolved schema could not be compiled at registration.
    #[error("schema error: {0}")]
    Schema(SchemaError),

    /// A structured acknowledgement could not be serialized.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DispatchError {
    pub fn is_request_validation(&self) -> bool {
        matches!(self, DispatchError::RequestValidation(_))
    }

    pub fn is_response_validation(&self) -> bool {
        matches!(self, DispatchError::ResponseValidation(_))
    }

    /// Human-readable cause without the error-kind prefix.
    pub fn cause(&self) -> String {
        match self {
            DispatchError::RequestValidation(err)
            | DispatchError::ResponseValidation(err)
            | DispatchError::Schema(err) => err.to_string(),
            DispatchError::Handler(err) => err.to_string(),
            DispatchError::Json(err) => err.to_string(),
        }
    }
}

/// Errors surfaced to the caller of [`LocalTransport::emit`](crate::LocalTransport::emit).
#[derive(Debug, thiserror::Error)]
pub enum EmitError {
    /// No handler is bound to the event in the namespace.
    #[error("no handler for event '{event}' in namespace '{namespace}'")]
    UnknownEvent { namespace: String, event: String },

    /// The invocation failed and the fallback handler re-raised it.
    #[error(transparent)]
    Fatal(#[from] DispatchError),
}

pub type Result<T> = std::result::Result<T, DispatchError>;
