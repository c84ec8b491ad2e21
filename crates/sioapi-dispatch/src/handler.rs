use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use serde_json::Value;
use sioapi_schema::{Model, ModelSchema};

use crate::error::HandlerError;

/// Type declared for a handler parameter or return value.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum DeclaredType {
    /// No type information.
    #[default]
    Undeclared,
    /// A structured model.
    Model(Arc<ModelSchema>),
    /// A named non-model type such as `str`. Never validated.
    Other(String),
}

impl DeclaredType {
    pub fn of<T: Model>() -> Self {
        DeclaredType::Model(Arc::new(T::schema()))
    }

    pub fn other(name: impl Into<String>) -> Self {
        DeclaredType::Other(name.into())
    }
}

/// A declared handler parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub declared: DeclaredType,
}

/// Declared parameter list and return type of a handler.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HandlerSignature {
    pub params: Vec<Param>,
    pub returns: DeclaredType,
}

impl HandlerSignature {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn param(mut self, name: impl Into<String>, declared: DeclaredType) -> Self {
        self.params.push(Param {
            name: name.into(),
            declared,
        });
        self
    }

    pub fn returns(mut self, declared: DeclaredType) -> Self {
        self.returns = declared;
        self
    }
}

/// Value produced by a handler, before acknowledgement.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Instance of a structured model. Serialized to JSON text when acknowledged.
    Model(Value),
    /// Plain value. Acknowledged unchanged.
    Value(Value),
}

impl Reply {
    pub fn model<T: Model>(model: &T) -> Result<Self, HandlerError> {
        Ok(Reply::Model(serde_json::to_value(model)?))
    }

    pub fn value(value: impl Into<Value>) -> Self {
        Reply::Value(value.into())
    }

    pub fn none() -> Self {
        Reply::Value(Value::Null)
    }

    pub fn as_value(&self) -> &Value {
        match self {
            Reply::Model(value) | Reply::Value(value) => value,
        }
    }

    pub fn into_value(self) -> Value {
        match self {
            Reply::Model(value) | Reply::Value(value) => value,
        }
    }

    pub fn is_model(&self) -> bool {
        matches!(self, Reply::Model(_))
    }
}

/// A socket event handler.
///
/// `payload` is `None` when the event was emitted without arguments.
pub trait EventHandler: Send + Sync {
    /// Declared parameter and return types. Used only for schema inference.
    fn signature(&self) -> HandlerSignature {
        HandlerSignature::default()
    }

    /// Handler documentation, exported as the event description.
    fn description(&self) -> Option<&str> {
        None
    }

    fn call(&self, payload: Option<Value>) -> Result<Reply, HandlerError>;
}

impl<H: EventHandler + ?Sized> EventHandler for Arc<H> {
    fn signature(&self) -> HandlerSignature {
        (**self).signature()
    }

    fn description(&self) -> Option<&str> {
        (**self).description()
    }

    fn call(&self, payload: Option<Value>) -> Result<Reply, HandlerError> {
        (**self).call(payload)
    }
}

/// Handler over raw JSON payloads.
pub struct FnHandler<F> {
    handler: F,
    signature: HandlerSignature,
    description: Option<String>,
}

/// Wrap a closure taking the raw payload.
///
/// The signature declares a single untyped `payload` parameter; override it with
/// [`FnHandler::with_signature`] to make the closure eligible for inference.
pub fn handler_fn<F>(handler: F) -> FnHandler<F>
where
    F: Fn(Option<Value>) -> Result<Reply, HandlerError> + Send + Sync,
{
    FnHandler {
        handler,
        signature: HandlerSignature::new().param("payload", DeclaredType::Undeclared),
        description: None,
    }
}

impl<F> FnHandler<F> {
    pub fn with_signature(mut self, signature: HandlerSignature) -> Self {
        self.signature = signature;
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl<F> EventHandler for FnHandler<F>
where
    F: Fn(Option<Value>) -> Result<Reply, HandlerError> + Send + Sync,
{
    fn signature(&self) -> HandlerSignature {
        self.signature.clone()
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    fn call(&self, payload: Option<Value>) -> Result<Reply, HandlerError> {
        (self.handler)(payload)
    }
}

impl<F> fmt::Debug for FnHandler<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnHandler")
            .field("signature", &self.signature)
            .field("description", &self.description)
            .finish()
    }
}

/// Handler taking a request model and returning an acknowledgement model.
///
/// Its signature declares both models, so with inference enabled the request and
/// response schemas come from `Req` and `Resp`.
pub struct TypedHandler<Req, Resp, F> {
    handler: F,
    description: Option<String>,
    _types: PhantomData<fn(Req) -> Resp>,
}

pub fn typed<Req, Resp, F>(handler: F) -> TypedHandler<Req, Resp, F>
where
    Req: Model,
    Resp: Model,
    F: Fn(Req) -> Result<Resp, HandlerError> + Send + Sync,
{
    TypedHandler {
        handler,
        description: None,
        _types: PhantomData,
    }
}

impl<Req, Resp, F> TypedHandler<Req, Resp, F> {
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl<Req, Resp, F> EventHandler for TypedHandler<Req, Resp, F>
where
    Req: Model,
    Resp: Model,
    F: Fn(Req) -> Result<Resp, HandlerError> + Send + Sync,
{
    fn signature(&self) -> HandlerSignature {
        HandlerSignature::new()
            .param("request", DeclaredType::of::<Req>())
            .returns(DeclaredType::of::<Resp>())
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    fn call(&self, payload: Option<Value>) -> Result<Reply, HandlerError> {
        let request: Req = serde_json::from_value(payload.unwrap_or(Value::Null))?;
        let response = (self.handler)(request)?;
        Reply::model(&response)
    }
}

/// Handler for events that carry no payload.
pub struct NullaryHandler<F> {
    handler: F,
    returns: DeclaredType,
    description: Option<String>,
}

pub fn nullary<F>(handler: F) -> NullaryHandler<F>
where
    F: Fn() -> Result<Reply, HandlerError> + Send + Sync,
{
    NullaryHandler {
        handler,
        returns: DeclaredType::Undeclared,
        description: None,
    }
}

impl<F> NullaryHandler<F> {
    pub fn returns(mut self, declared: DeclaredType) -> Self {
        self.returns = declared;
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl<F> EventHandler for NullaryHandler<F>
where
    F: Fn() -> Result<Reply, HandlerError> + Send + Sync,
{
    fn signature(&self) -> HandlerSignature {
        HandlerSignature::new().returns(self.returns.clone())
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    fn call(&self, _payload: Option<Value>) -> Result<Reply, HandlerError> {
        (self.handler)()
    }
}
