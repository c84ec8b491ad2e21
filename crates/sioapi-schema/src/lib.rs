//! Structured event models and JSON Schema validation for socket event payloads.
//!
//! A [`ModelSchema`] describes a named structured type field by field. Types that
//! implement [`Model`] carry their schema with them, which is how handlers declare
//! what they accept and what they acknowledge with.
//!
//! Schemas compile to JSON Schema 2020-12 and are enforced through
//! [`CompiledSchema`].

pub mod config;
pub mod error;
pub mod model;
pub mod validator;

pub use config::ValidatorConfig;
pub use error::{Result, SchemaError};
pub use model::{FieldDef, FieldType, Model, ModelSchema, SchemaRef};
pub use validator::CompiledSchema;
