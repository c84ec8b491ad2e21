use serde::{Deserialize, Serialize};
use serde_json::Value;
use sioapi_schema::{FieldDef, FieldType, Model, ModelSchema};

use crate::error::DispatchError;

/// Process-wide fallback for failed invocations.
///
/// Returning `Ok` sends the value as the acknowledgement. Returning `Err` re-raises
/// the failure to the transport.
pub trait ErrorHandler: Send + Sync {
    fn handle(&self, event: &str, error: DispatchError) -> Result<Value, DispatchError>;
}

impl<F> ErrorHandler for F
where
    F: Fn(&str, DispatchError) -> Result<Value, DispatchError> + Send + Sync,
{
    fn handle(&self, event: &str, error: DispatchError) -> Result<Value, DispatchError> {
        self(event, error)
    }
}

/// Wire shape of a failed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

impl Model for ErrorResponse {
    fn schema() -> ModelSchema {
        ModelSchema::new("ErrorResponse")
            .describe("Error response")
            .field(
                FieldDef::optional("success", FieldType::Boolean)
                    .with_default(false)
                    .describe("Success status"),
            )
            .field(
                FieldDef::required("error", FieldType::String)
                    .describe("Error message if any")
                    .example("Invalid request"),
            )
    }
}

/// `{"success": false, "error": message}` as JSON text, the same shape as model replies.
pub fn error_response(message: &str) -> Value {
    let text = serde_json::to_string(&ErrorResponse::new(message))
        .unwrap_or_else(|_| r#"{"success":false,"error":"internal error"}"#.to_string());
    Value::String(text)
}

/// Fallback policy: invalid requests are answered, everything else is re-raised.
///
/// - request validation failure: warning, serialized [`ErrorResponse`] acknowledgement
/// - response validation failure: error, re-raised
/// - anything else: error, re-raised
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultErrorHandler;

impl ErrorHandler for DefaultErrorHandler {
    fn handle(&self, event: &str, error: DispatchError) -> Result<Value, DispatchError> {
        match &error {
            DispatchError::RequestValidation(cause) => {
                tracing::warn!(event, error = %cause, "request validation error");
                Ok(error_response(&cause.to_string()))
            }
            DispatchError::ResponseValidation(cause) => {
                tracing::error!(event, error = %cause, "response validation error");
                Err(error)
            }
            other => {
                tracing::error!(event, error = %other, "unhandled event error");
                Err(error)
            }
        }
    }
}
