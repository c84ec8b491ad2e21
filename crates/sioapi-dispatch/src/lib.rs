//! Validating event dispatch for socket event frameworks.
//!
//! Handlers are registered once per event. At registration the request and
//! acknowledgement schemas are resolved (explicitly, or from the handler's declared
//! signature), the handler is wrapped so every invocation is validated on both sides,
//! and the binding is appended to a [`DocRegistry`] for API documentation.
//!
//! The socket transport itself is not implemented here. Wrapped handlers are handed
//! to an [`EventTransport`]; [`LocalTransport`] is an in-process table for driving
//! events without a network.

pub mod dispatcher;
pub mod error;
pub mod error_handler;
pub mod handler;
pub mod registry;
pub mod resolver;
pub mod transport;

pub use dispatcher::{RegisterOptions, ValidatingDispatcher, WrappedHandler};
pub use error::{DispatchError, EmitError, HandlerError, Result};
pub use error_handler::{error_response, DefaultErrorHandler, ErrorHandler, ErrorResponse};
pub use handler::{
    handler_fn, nullary, typed, DeclaredType, EventHandler, FnHandler, HandlerSignature,
    NullaryHandler, Param, Reply, TypedHandler,
};
pub use registry::{DocRegistry, EventRegistration};
pub use resolver::{resolve, resolve_signature};
pub use transport::{EventTransport, LocalTransport, DEFAULT_NAMESPACE};
