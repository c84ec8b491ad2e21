use std::fmt;
use std::io;

use sioapi::dispatch::{DispatchError, EmitError};
use sioapi::docs::DocError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => FAILURE,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn dispatch_error(context: &str, err: DispatchError) -> CliError {
    match err {
        DispatchError::RequestValidation(_) => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
        other => CliError::new(INTERNAL, format!("{context}: {other}")),
    }
}

pub fn emit_error(context: &str, err: EmitError) -> CliError {
    match err {
        EmitError::UnknownEvent { .. } => CliError::new(USAGE, format!("{context}: {err}")),
        EmitError::Fatal(err) => dispatch_error(context, err),
    }
}

pub fn doc_error(context: &str, err: DocError) -> CliError {
    CliError::new(INTERNAL, format!("{context}: {err}"))
}

#[cfg(test)]
mod tests {
    use sioapi::dispatch::HandlerError;
    use sioapi::schema::SchemaError;

    use super::*;

    fn invalid() -> SchemaError {
        SchemaError::ValidationFailed {
            model: "DownloadFileRequest".to_string(),
            message: "1 validation error for DownloadFileRequest: url is required".to_string(),
        }
    }

    #[test]
    fn unknown_event_is_usage_error() {
        let err = emit_error(
            "emit failed",
            EmitError::UnknownEvent {
                namespace: "/".to_string(),
                event: "nope".to_string(),
            },
        );
        assert_eq!(err.code, USAGE);
        assert!(err.message.starts_with("emit failed: "));
    }

    #[test]
    fn request_validation_is_data_invalid() {
        let err = emit_error(
            "emit failed",
            EmitError::Fatal(DispatchError::RequestValidation(invalid())),
        );
        assert_eq!(err.code, DATA_INVALID);
    }

    #[test]
    fn response_and_handler_faults_are_internal() {
        assert_eq!(
            dispatch_error("x", DispatchError::ResponseValidation(invalid())).code,
            INTERNAL
        );
        assert_eq!(
            dispatch_error("x", DispatchError::Handler(HandlerError::failed("boom"))).code,
            INTERNAL
        );
    }
}
