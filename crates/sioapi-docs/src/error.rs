/// Errors that can occur while rendering a document.
#[derive(Debug, thiserror::Error)]
pub enum DocError {
    #[error("json encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("yaml encoding failed: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, DocError>;
