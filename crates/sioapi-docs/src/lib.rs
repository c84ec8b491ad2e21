//! AsyncAPI document export for registered socket events.
//!
//! [`AsyncApiDoc::build`] is a pure function of the API metadata and a
//! [`DocRegistry`](sioapi_dispatch::DocRegistry). Events appear in registration order.

pub mod asyncapi;
pub mod error;
pub mod info;
pub mod ordered;
pub mod schema;

pub use asyncapi::{message_key, AsyncApiDoc, Channel, Message, MessageRef, ASYNCAPI_VERSION};
pub use error::{DocError, Result};
pub use info::ApiInfo;
pub use ordered::OrderedMap;
pub use schema::SchemaObject;
