/// Errors that can occur while compiling or enforcing a model schema.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// The generated JSON Schema could not be compiled.
    #[error("failed to compile schema: {0}")]
    CompileFailed(String),

    /// The value does not conform to the model.
    #[error("{message}")]
    ValidationFailed { model: String, message: String },
}

impl SchemaError {
    /// Name of the model that rejected the value, if this is a validation failure.
    pub fn model(&self) -> Option<&str> {
        match self {
            SchemaError::ValidationFailed { model, .. } => Some(model),
            SchemaError::CompileFailed(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, SchemaError>;
