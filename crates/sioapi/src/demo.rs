//! Built-in downloader app used by the CLI.
//!
//! Clients ask the server to download a URL to a local path. Accepted requests are
//! queued; nothing is fetched.

use std::path::Path;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use sioapi::dispatch::{
    nullary, typed, DefaultErrorHandler, DispatchError, HandlerError, LocalTransport, Reply,
};
use sioapi::schema::{FieldDef, FieldType, Model, ModelSchema};
use sioapi::{AsyncApiSocket, SocketConfig};

pub type DownloadQueue = Arc<Mutex<Vec<DownloadFileRequest>>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadFileRequest {
    pub url: String,
    pub location: String,
    #[serde(default)]
    pub check_hash: Option<bool>,
}

impl Model for DownloadFileRequest {
    fn schema() -> ModelSchema {
        ModelSchema::new("DownloadFileRequest")
            .field(
                FieldDef::required("url", FieldType::Url)
                    .describe("URL to download")
                    .example("https://cdn.pixabay.com/photo/2015/04/23/22/00/tree-736885__480.jpg"),
            )
            .field(
                FieldDef::required("location", FieldType::Path)
                    .describe("Destination local to file system; should be an absolute path")
                    .example("/tmp/tree.jpg"),
            )
            .field(FieldDef::optional("check_hash", FieldType::Boolean).with_default(false))
    }
}

/// Fields shared by every acknowledgement.
pub fn base_response_schema() -> ModelSchema {
    ModelSchema::new("SocketBaseResponse")
        .describe("Base model for all responses")
        .field(
            FieldDef::optional("success", FieldType::Boolean)
                .with_default(true)
                .describe("Success status"),
        )
        .field(
            FieldDef::optional("error", FieldType::String)
                .describe("Error message if any")
                .example("Invalid request"),
        )
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcceptedData {
    pub is_accepted: bool,
}

impl Model for AcceptedData {
    fn schema() -> ModelSchema {
        ModelSchema::new("Data")
            .field(FieldDef::optional("is_accepted", FieldType::Boolean).with_default(true))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadAccepted {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub data: AcceptedData,
}

impl Model for DownloadAccepted {
    fn schema() -> ModelSchema {
        ModelSchema::new("DownloadAccepted")
            .field(FieldDef::required("data", FieldType::model::<AcceptedData>()))
            .extend(&base_response_schema())
    }
}

/// Build the downloader socket and the queue its handler feeds.
pub fn build_app(config: SocketConfig) -> Result<(AsyncApiSocket, DownloadQueue), DispatchError> {
    let queue: DownloadQueue = Arc::default();
    let mut socket = AsyncApiSocket::new(LocalTransport::new(), config);

    let sink = queue.clone();
    socket
        .on("download_file")
        .infer_from_signature(true)
        .register(
            typed(move |request: DownloadFileRequest| download_file(&sink, request))
                .describe("Download a file from a URL to a server file system"),
        )?;

    let counter = queue.clone();
    socket.on("queue_size").register(
        nullary(move || {
            let queued = counter
                .lock()
                .map_err(|_| HandlerError::failed("download queue poisoned"))?
                .len();
            Ok(Reply::value(serde_json::json!({ "queued": queued })))
        })
        .describe("Number of queued downloads"),
    )?;

    socket.on_error_default_with_model(base_response_schema(), DefaultErrorHandler);
    Ok((socket, queue))
}

fn download_file(
    queue: &DownloadQueue,
    request: DownloadFileRequest,
) -> Result<DownloadAccepted, HandlerError> {
    if Path::new(&request.location).exists() {
        return Ok(DownloadAccepted {
            success: false,
            error: Some("File already exists".to_string()),
            data: AcceptedData { is_accepted: false },
        });
    }

    tracing::info!(url = %request.url, location = %request.location, "download queued");
    queue
        .lock()
        .map_err(|_| HandlerError::failed("download queue poisoned"))?
        .push(request);

    Ok(DownloadAccepted {
        success: true,
        error: None,
        data: AcceptedData { is_accepted: true },
    })
}
