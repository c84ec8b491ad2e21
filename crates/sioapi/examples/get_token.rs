//! Token issuing event with explicit request and acknowledgement models.
//!
//! Run with: `cargo run -p sioapi --example get_token`

use serde::{Deserialize, Serialize};
use serde_json::json;
use sioapi::dispatch::{handler_fn, DefaultErrorHandler, LocalTransport, Reply};
use sioapi::schema::{FieldDef, FieldType, Model, ModelSchema};
use sioapi::{AsyncApiSocket, SocketConfig};

#[derive(Debug, Serialize, Deserialize)]
struct RequestToken {
    username: String,
}

impl Model for RequestToken {
    fn schema() -> ModelSchema {
        ModelSchema::new("RequestToken").field(FieldDef::required("username", FieldType::String))
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Token {
    token: i64,
}

impl Model for Token {
    fn schema() -> ModelSchema {
        ModelSchema::new("Token").field(FieldDef::required("token", FieldType::Integer))
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut socket = AsyncApiSocket::new(
        LocalTransport::new(),
        SocketConfig {
            generate_docs: true,
            ..SocketConfig::default()
        },
    );

    socket
        .on("get_token")
        .request_model::<RequestToken>()
        .response_model::<Token>()
        .register(handler_fn(|_| Ok(Reply::value(json!({"token": 1234})))))?;
    socket.on_error_default(DefaultErrorHandler);

    let ack = socket
        .transport()
        .emit("get_token", Some(json!({"username": "ada"})))?;
    println!("ack: {ack}");

    let rejected = socket.transport().emit("get_token", Some(json!({})))?;
    println!("rejected: {rejected}");

    println!("{}", socket.asyncapi_doc().to_yaml()?);
    Ok(())
}
