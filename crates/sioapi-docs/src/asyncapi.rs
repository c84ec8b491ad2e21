use serde::Serialize;
use sioapi_dispatch::{DocRegistry, DEFAULT_NAMESPACE};
use sioapi_schema::SchemaRef;

use crate::error::Result;
use crate::info::ApiInfo;
use crate::ordered::OrderedMap;
use crate::schema::SchemaObject;

/// AsyncAPI specification version emitted.
pub const ASYNCAPI_VERSION: &str = "2.5.0";

const SERVER_PROTOCOL: &str = "socketio";

/// An AsyncAPI document describing the registered events.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AsyncApiDoc {
    pub asyncapi: String,
    pub info: Info,
    pub servers: OrderedMap<Server>,
    pub channels: OrderedMap<Channel>,
    pub components: Components,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Info {
    pub title: String,
    pub version: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Server {
    pub url: String,
    pub protocol: String,
}

/// One socket namespace.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Channel {
    pub publish: Operation,
}

/// Events the server accepts on a channel.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Operation {
    pub message: OneOf,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OneOf {
    #[serde(rename = "oneOf")]
    pub one_of: Vec<MessageRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageRef {
    #[serde(rename = "$ref")]
    pub reference: String,
}

/// Event payload and acknowledgement description.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<SchemaObject>,
    #[serde(rename = "x-ack", skip_serializing_if = "Option::is_none")]
    pub ack: Option<SchemaObject>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Components {
    pub messages: OrderedMap<Message>,
    #[serde(skip_serializing_if = "OrderedMap::is_empty")]
    pub schemas: OrderedMap<SchemaObject>,
}

impl AsyncApiDoc {
    /// Build a document from startup metadata and the registry.
    ///
    /// Registrations are grouped by namespace; within a channel the message list
    /// follows registration order. Messages are keyed by namespace and event (see
    /// [`message_key`]), so an event registered twice in one namespace keeps its first
    /// position with the latest schemas, and the same event name in two namespaces
    /// yields two messages.
    pub fn build(info: &ApiInfo, registry: &DocRegistry) -> Self {
        let mut servers = OrderedMap::new();
        servers.insert(
            info.server_name.clone(),
            Server {
                url: info.server_url.clone(),
                protocol: SERVER_PROTOCOL.to_string(),
            },
        );

        let mut channels: OrderedMap<Channel> = OrderedMap::new();
        let mut components = Components::default();

        for registration in registry {
            let event = registration.event_name();
            let namespace = registration.namespace().unwrap_or(DEFAULT_NAMESPACE);

            let key = message_key(namespace, event);
            let reference = MessageRef {
                reference: format!("#/components/messages/{key}"),
            };
            let channel = channels.get_or_insert_with(namespace, Channel::default);
            if !channel.publish.message.one_of.contains(&reference) {
                channel.publish.message.one_of.push(reference);
            }

            components.messages.insert(
                key,
                Message {
                    name: event.to_string(),
                    description: registration.description().map(str::to_string),
                    payload: render(registration.request_schema()),
                    ack: render(registration.response_schema()),
                },
            );
        }

        if let Some(model) = registry.error_model() {
            components
                .schemas
                .insert(model.name.clone(), SchemaObject::from_model(model));
        }

        Self {
            asyncapi: ASYNCAPI_VERSION.to_string(),
            info: Info {
                title: info.title.clone(),
                version: info.version.clone(),
                description: info.description.clone(),
            },
            servers,
            channels,
            components,
        }
    }

    /// Event names in document order. Repeats when an event is bound in several namespaces.
    pub fn event_names(&self) -> Vec<&str> {
        self.components
            .messages
            .values()
            .map(|message| message.name.as_str())
            .collect()
    }

    /// Component keys of the messages, in document order.
    pub fn message_keys(&self) -> Vec<&str> {
        self.components.messages.keys().collect()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn to_value(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Component key for `event` bound in `namespace`.
///
/// The default namespace uses the bare event name. Other namespaces prefix it with the
/// namespace path, `/` separators becoming `.`: `ping` in `/admin` is `admin.ping`.
/// Characters outside `[A-Za-z0-9._-]` become `_`.
pub fn message_key(namespace: &str, event: &str) -> String {
    let path = namespace.trim_matches('/');
    let key = if path.is_empty() {
        event.to_string()
    } else {
        format!("{}.{event}", path.replace('/', "."))
    };
    key.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn render(schema: &SchemaRef) -> Option<SchemaObject> {
    schema.concrete().map(|model| SchemaObject::from_model(model))
}
