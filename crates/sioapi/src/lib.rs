//! Schema-validated socket events with AsyncAPI documentation.
//!
//! sioapi sits between a socket event framework and your handlers. Every event is
//! bound with a request model and an acknowledgement model, both enforced on each
//! invocation and both exported into an AsyncAPI document.
//!
//! # Crate Structure
//!
//! - [`schema`]: Models, field definitions, JSON Schema validation
//! - [`dispatch`]: Schema resolution, handler wrapping, fallback errors, transports
//! - [`docs`]: AsyncAPI export
//! - [`AsyncApiSocket`]: Registration API tying the three together

mod socket;

pub use socket::{AsyncApiSocket, OnBuilder, SocketConfig};

/// Re-export schema types.
pub mod schema {
    pub use sioapi_schema::*;
}

/// Re-export dispatch types.
pub mod dispatch {
    pub use sioapi_dispatch::*;
}

/// Re-export documentation types.
pub mod docs {
    pub use sioapi_docs::*;
}
