use std::sync::Arc;

use sioapi_dispatch::{
    resolve, DispatchError, DocRegistry, ErrorHandler, EventHandler, EventTransport,
    LocalTransport, RegisterOptions, ValidatingDispatcher, WrappedHandler,
};
use sioapi_docs::{ApiInfo, AsyncApiDoc};
use sioapi_schema::{Model, ModelSchema, SchemaRef, ValidatorConfig};

/// Socket-level settings, fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocketConfig {
    /// Validate requests and acknowledgements.
    pub validate: bool,
    /// Record registrations for AsyncAPI export.
    pub generate_docs: bool,
    /// Document metadata.
    pub info: ApiInfo,
    pub validator: ValidatorConfig,
}

impl Default for SocketConfig {
    fn default() -> Self {
        Self {
            validate: true,
            generate_docs: false,
            info: ApiInfo::default(),
            validator: ValidatorConfig::default(),
        }
    }
}

/// Validating, self-documenting event registration over a host transport.
///
/// ```ignore
/// let mut socket = AsyncApiSocket::new(LocalTransport::new(), SocketConfig::default());
/// socket
///     .on("get_token")
///     .request_model::<RequestToken>()
///     .response_model::<Token>()
///     .register(handler_fn(|_| Ok(Reply::value(json!({"token": 1234})))))?;
/// ```
pub struct AsyncApiSocket<T: EventTransport = LocalTransport> {
    transport: T,
    dispatcher: ValidatingDispatcher,
    config: SocketConfig,
}

impl<T: EventTransport> AsyncApiSocket<T> {
    pub fn new(transport: T, config: SocketConfig) -> Self {
        Self {
            transport,
            dispatcher: ValidatingDispatcher::with_config(config.validator),
            config,
        }
    }

    /// Start registering a handler for `event`.
    pub fn on(&mut self, event: impl Into<String>) -> OnBuilder<'_, T> {
        OnBuilder {
            socket: self,
            event: event.into(),
            namespace: None,
            infer_from_signature: false,
            request_schema: SchemaRef::Unresolved,
            response_schema: SchemaRef::Unresolved,
        }
    }

    /// Register the single process-wide fallback error handler.
    pub fn on_error_default(&mut self, handler: impl ErrorHandler + 'static) {
        self.transport.on_error_default(Arc::new(handler));
    }

    /// Register the fallback error handler and document its acknowledgement model.
    ///
    /// The model does not change dispatch.
    pub fn on_error_default_with_model(
        &mut self,
        model: ModelSchema,
        handler: impl ErrorHandler + 'static,
    ) {
        if self.config.generate_docs {
            self.dispatcher
                .registry_mut()
                .set_error_model(Arc::new(model));
        }
        self.on_error_default(handler);
    }

    pub fn asyncapi_doc(&self) -> AsyncApiDoc {
        AsyncApiDoc::build(&self.config.info, self.dispatcher.registry())
    }

    pub fn doc_registry(&self) -> &DocRegistry {
        self.dispatcher.registry()
    }

    pub fn config(&self) -> &SocketConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn into_transport(self) -> T {
        self.transport
    }
}

/// Pending registration created by [`AsyncApiSocket::on`].
pub struct OnBuilder<'a, T: EventTransport> {
    socket: &'a mut AsyncApiSocket<T>,
    event: String,
    namespace: Option<String>,
    infer_from_signature: bool,
    request_schema: SchemaRef,
    response_schema: SchemaRef,
}

impl<T: EventTransport> OnBuilder<'_, T> {
    /// Namespace forwarded to the transport unmodified.
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Fill unresolved schemas from the handler's declared types.
    pub fn infer_from_signature(mut self, infer: bool) -> Self {
        self.infer_from_signature = infer;
        self
    }

    pub fn request_schema(mut self, schema: SchemaRef) -> Self {
        self.request_schema = schema;
        self
    }

    pub fn response_schema(mut self, schema: SchemaRef) -> Self {
        self.response_schema = schema;
        self
    }

    pub fn request_model<M: Model>(self) -> Self {
        self.request_schema(M::schema_ref())
    }

    pub fn response_model<M: Model>(self) -> Self {
        self.response_schema(M::schema_ref())
    }

    /// Resolve schemas, wrap `handler`, and bind it on the transport.
    pub fn register(
        self,
        handler: impl EventHandler + 'static,
    ) -> Result<WrappedHandler, DispatchError> {
        let handler: Arc<dyn EventHandler> = Arc::new(handler);
        let (request_schema, response_schema) = resolve(
            handler.as_ref(),
            self.request_schema,
            self.response_schema,
            self.infer_from_signature,
        );

        let socket = self.socket;
        let wrapped = socket.dispatcher.register(
            &self.event,
            handler,
            RegisterOptions {
                request_schema,
                response_schema,
                validate: socket.config.validate,
                document: socket.config.generate_docs,
                namespace: self.namespace.clone(),
            },
        )?;

        socket
            .transport
            .on(&self.event, self.namespace.as_deref(), wrapped.clone());
        tracing::info!(
            event = %self.event,
            namespace = self.namespace.as_deref().unwrap_or(sioapi_dispatch::DEFAULT_NAMESPACE),
            "event bound"
        );
        Ok(wrapped)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use serde::{Deserialize, Serialize};
    use serde_json::{json, Value};
    use sioapi_dispatch::{
        handler_fn, nullary, typed, DefaultErrorHandler, EmitError, ErrorResponse, Reply,
    };
    use sioapi_schema::{FieldDef, FieldType};

    use super::*;

    #[derive(Debug, Clone, Serialize, Deserialize)]
    struct DownloadFileRequest {
        url: String,
        location: String,
        #[serde(default)]
        check_hash: Option<bool>,
    }

    impl Model for DownloadFileRequest {
        fn schema() -> ModelSchema {
            ModelSchema::new("DownloadFileRequest")
                .field(FieldDef::required("url", FieldType::Url))
                .field(FieldDef::required("location", FieldType::Path))
                .field(FieldDef::optional("check_hash", FieldType::Boolean).with_default(false))
        }
    }

    #[derive(Debug, Serialize, Deserialize)]
    struct Accepted {
        is_accepted: bool,
    }

    impl Model for Accepted {
        fn schema() -> ModelSchema {
            ModelSchema::new("Accepted").field(FieldDef::required("is_accepted", FieldType::Boolean))
        }
    }

    fn documented() -> SocketConfig {
        SocketConfig {
            generate_docs: true,
            ..SocketConfig::default()
        }
    }

    #[test]
    fn downloader_scenario_end_to_end() {
        let queue: Arc<Mutex<Vec<DownloadFileRequest>>> = Arc::default();
        let sink = queue.clone();

        let mut socket = AsyncApiSocket::new(LocalTransport::new(), documented());
        socket
            .on("download_file")
            .infer_from_signature(true)
            .register(typed(move |request: DownloadFileRequest| {
                sink.lock()
                    .map_err(|_| sioapi_dispatch::HandlerError::failed("queue poisoned"))?
                    .push(request);
                Ok(Accepted { is_accepted: true })
            }))
            .unwrap();
        socket.on_error_default(DefaultErrorHandler);

        let ack = socket
            .transport()
            .emit(
                "download_file",
                Some(json!({"url": "https://x/y.jpg", "location": "/tmp/y.jpg"})),
            )
            .unwrap();
        assert_eq!(ack, Value::String(r#"{"is_accepted":true}"#.to_string()));

        let queued = queue.lock().unwrap();
        assert_eq!(queued.len(), 1);
        assert_eq!(queued[0].url, "https://x/y.jpg");
        assert_eq!(queued[0].check_hash, Some(false));
        drop(queued);

        let ack = socket
            .transport()
            .emit("download_file", Some(json!({"location": "/tmp/y.jpg"})))
            .unwrap();
        let body: ErrorResponse = serde_json::from_str(ack.as_str().unwrap()).unwrap();
        assert!(!body.success);
        assert!(body.error.contains("1 validation error "));
        assert!(body.error.contains("url"));
        assert_eq!(queue.lock().unwrap().len(), 1);
    }

    #[test]
    fn invalid_acknowledgement_propagates() {
        let mut socket = AsyncApiSocket::new(LocalTransport::new(), SocketConfig::default());
        socket
            .on("download_file")
            .response_model::<Accepted>()
            .register(handler_fn(|_| Ok(Reply::Model(json!({"success": true})))))
            .unwrap();
        socket.on_error_default(DefaultErrorHandler);

        let err = socket
            .transport()
            .emit("download_file", Some(json!({})))
            .unwrap_err();
        assert!(matches!(err, EmitError::Fatal(DispatchError::ResponseValidation(_))));
    }

    #[test]
    fn explicit_request_schema_wins_over_inference() {
        let strict_request = ModelSchema::new("Strict")
            .field(FieldDef::required("token", FieldType::Integer));

        let mut socket = AsyncApiSocket::new(LocalTransport::new(), documented());
        socket
            .on("download_file")
            .infer_from_signature(true)
            .request_schema(SchemaRef::model(strict_request))
            .register(typed(|_: DownloadFileRequest| Ok(Accepted { is_accepted: true })))
            .unwrap();

        let registration = socket.doc_registry().iter().next().unwrap();
        assert_eq!(registration.request_schema().display_name(), "Strict");
        assert_eq!(registration.response_schema().display_name(), "Accepted");
    }

    #[test]
    fn zero_argument_emit_skips_validation() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();

        let mut socket = AsyncApiSocket::new(LocalTransport::new(), SocketConfig::default());
        socket
            .on("status")
            .request_model::<DownloadFileRequest>()
            .response_model::<Accepted>()
            .register(nullary(move || {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(Reply::value(json!({"queued": 3})))
            }))
            .unwrap();

        let ack = socket.transport().emit("status", None).unwrap();
        assert_eq!(ack, json!({"queued": 3}));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn docs_follow_registration_order() {
        let mut socket = AsyncApiSocket::new(LocalTransport::new(), documented());
        for event in ["A", "B", "C"] {
            socket
                .on(event)
                .register(nullary(|| Ok(Reply::none())))
                .unwrap();
        }

        let doc = socket.asyncapi_doc();
        assert_eq!(doc.event_names(), vec!["A", "B", "C"]);
    }

    #[test]
    fn reregistering_an_event_updates_its_docs_in_place() {
        let first = ModelSchema::new("FirstA").field(FieldDef::required("a", FieldType::String));
        let second = ModelSchema::new("SecondA").field(FieldDef::required("b", FieldType::String));

        let mut socket = AsyncApiSocket::new(LocalTransport::new(), documented());
        socket
            .on("A")
            .request_schema(SchemaRef::model(first))
            .register(nullary(|| Ok(Reply::value("first"))))
            .unwrap();
        socket
            .on("B")
            .register(nullary(|| Ok(Reply::none())))
            .unwrap();
        socket
            .on("A")
            .request_schema(SchemaRef::model(second))
            .register(nullary(|| Ok(Reply::value("second"))))
            .unwrap();

        let doc = socket.asyncapi_doc();
        assert_eq!(doc.event_names(), vec!["A", "B"]);
        assert_eq!(doc.channels.get("/").unwrap().publish.message.one_of.len(), 2);

        let value = doc.to_value().unwrap();
        assert_eq!(
            value["components"]["messages"]["A"]["payload"]["title"],
            json!("SecondA")
        );
        assert_eq!(socket.transport().emit("A", None).unwrap(), json!("second"));
        assert_eq!(
            socket.transport().emit("A", Some(json!({"b": "x"}))).unwrap(),
            json!("second")
        );
    }

    #[test]
    fn same_event_in_two_namespaces_is_documented_twice() {
        let root = ModelSchema::new("RootPing").field(FieldDef::required("n", FieldType::Integer));
        let admin =
            ModelSchema::new("AdminPing").field(FieldDef::required("token", FieldType::String));

        let mut socket = AsyncApiSocket::new(LocalTransport::new(), documented());
        socket
            .on("ping")
            .request_schema(SchemaRef::model(root))
            .register(nullary(|| Ok(Reply::value("root"))))
            .unwrap();
        socket
            .on("ping")
            .namespace("/admin")
            .request_schema(SchemaRef::model(admin))
            .register(nullary(|| Ok(Reply::value("admin"))))
            .unwrap();

        let value = socket.asyncapi_doc().to_value().unwrap();
        assert_eq!(
            value["channels"]["/"]["publish"]["message"]["oneOf"][0]["$ref"],
            json!("#/components/messages/ping")
        );
        assert_eq!(
            value["channels"]["/admin"]["publish"]["message"]["oneOf"][0]["$ref"],
            json!("#/components/messages/admin.ping")
        );
        assert_eq!(
            value["components"]["messages"]["ping"]["payload"]["title"],
            json!("RootPing")
        );
        assert_eq!(
            value["components"]["messages"]["admin.ping"]["payload"]["title"],
            json!("AdminPing")
        );
        assert_eq!(
            value["components"]["messages"]["admin.ping"]["name"],
            json!("ping")
        );
    }

    #[test]
    fn docs_disabled_records_nothing() {
        let mut socket = AsyncApiSocket::new(LocalTransport::new(), SocketConfig::default());
        socket
            .on("A")
            .register(nullary(|| Ok(Reply::none())))
            .unwrap();
        socket.on_error_default_with_model(ErrorResponse::schema(), DefaultErrorHandler);

        assert!(socket.doc_registry().is_empty());
        assert!(socket.doc_registry().error_model().is_none());
        assert!(socket.transport().has_error_handler());
    }

    #[test]
    fn error_model_is_documented() {
        let mut socket = AsyncApiSocket::new(LocalTransport::new(), documented());
        socket.on_error_default_with_model(ErrorResponse::schema(), DefaultErrorHandler);

        let value = socket.asyncapi_doc().to_value().unwrap();
        assert!(value["components"]["schemas"]["ErrorResponse"].is_object());
    }

    #[test]
    fn validation_can_be_disabled() {
        let mut socket = AsyncApiSocket::new(
            LocalTransport::new(),
            SocketConfig {
                validate: false,
                ..SocketConfig::default()
            },
        );
        socket
            .on("echo")
            .request_model::<DownloadFileRequest>()
            .register(handler_fn(|payload| Ok(Reply::value(payload.unwrap_or(Value::Null)))))
            .unwrap();

        let ack = socket.transport().emit("echo", Some(json!({"x": 1}))).unwrap();
        assert_eq!(ack, json!({"x": 1}));
    }

    #[test]
    fn namespace_is_passed_through() {
        let mut socket = AsyncApiSocket::new(LocalTransport::new(), documented());
        socket
            .on("ping")
            .namespace("/admin")
            .register(nullary(|| Ok(Reply::value("pong"))))
            .unwrap();

        assert_eq!(socket.transport().events(), vec![("/admin", "ping")]);
        assert_eq!(
            socket.transport().emit_to("/admin", "ping", None).unwrap(),
            json!("pong")
        );
        assert!(socket.asyncapi_doc().channels.get("/admin").is_some());
    }
}
