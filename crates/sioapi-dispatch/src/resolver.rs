//! Effective schema resolution for a handler.
//!
//! Explicit schemas win. When inference is requested, a side that is still
//! [`SchemaRef::Unresolved`] takes the model declared by the handler: the first
//! parameter for the request, the return type for the acknowledgement. Anything
//! that is not a model resolves to `Unresolved`, which skips validation.

use sioapi_schema::SchemaRef;

use crate::handler::{DeclaredType, EventHandler, HandlerSignature};

/// Resolve `(request, response)` schemas for `handler`.
pub fn resolve(
    handler: &dyn EventHandler,
    explicit_request: SchemaRef,
    explicit_response: SchemaRef,
    infer_from_signature: bool,
) -> (SchemaRef, SchemaRef) {
    if !infer_from_signature {
        return (explicit_request, explicit_response);
    }
    resolve_signature(
        &handler.signature(),
        explicit_request,
        explicit_response,
        true,
    )
}

/// Resolve against an explicit signature description.
pub fn resolve_signature(
    signature: &HandlerSignature,
    explicit_request: SchemaRef,
    explicit_response: SchemaRef,
    infer_from_signature: bool,
) -> (SchemaRef, SchemaRef) {
    if !infer_from_signature {
        return (explicit_request, explicit_response);
    }

    let request = match explicit_request {
        SchemaRef::Unresolved => signature
            .params
            .first()
            .map(|param| declared_schema(&param.declared))
            .unwrap_or(SchemaRef::Unresolved),
        explicit => explicit,
    };

    let response = match explicit_response {
        SchemaRef::Unresolved => declared_schema(&signature.returns),
        explicit => explicit,
    };

    (request, response)
}

fn declared_schema(declared: &DeclaredType) -> SchemaRef {
    match declared {
        DeclaredType::Model(schema) => SchemaRef::Concrete(schema.clone()),
        DeclaredType::Undeclared | DeclaredType::Other(_) => SchemaRef::Unresolved,
    }
}
