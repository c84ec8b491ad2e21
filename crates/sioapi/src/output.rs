use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use serde_json::Value;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

/// One registered event as listed by `sioapi events`.
#[derive(Debug, Clone, Serialize)]
pub struct EventRow {
    pub namespace: String,
    pub event: String,
    pub request: String,
    pub response: String,
    pub description: Option<String>,
}

#[derive(Serialize)]
struct EventsOutput<'a> {
    schema_id: &'a str,
    events: &'a [EventRow],
}

#[derive(Serialize)]
struct AckOutput<'a> {
    schema_id: &'a str,
    event: &'a str,
    namespace: &'a str,
    ack: &'a Value,
}

pub fn print_events(rows: &[EventRow], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = EventsOutput {
                schema_id: "https://schemas.sioapi.dev/cli/v1/events.schema.json",
                events: rows,
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["NAMESPACE", "EVENT", "REQUEST", "RESPONSE", "DESCRIPTION"]);
            for row in rows {
                table.add_row(vec![
                    row.namespace.clone(),
                    row.event.clone(),
                    row.request.clone(),
                    row.response.clone(),
                    row.description.clone().unwrap_or_default(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for row in rows {
                println!(
                    "{}{} request={} response={}",
                    row.namespace, row.event, row.request, row.response
                );
            }
        }
        OutputFormat::Raw => {
            for row in rows {
                println!("{}", row.event);
            }
        }
    }
}

/// Print an acknowledgement. Acks carrying JSON text are shown decoded except in raw mode.
pub fn print_ack(event: &str, namespace: &str, ack: &Value, format: OutputFormat) {
    let decoded = decode_ack(ack);
    match format {
        OutputFormat::Json => {
            let out = AckOutput {
                schema_id: "https://schemas.sioapi.dev/cli/v1/ack.schema.json",
                event,
                namespace,
                ack: &decoded,
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["EVENT", "NAMESPACE", "ACK"])
                .add_row(vec![event.to_string(), namespace.to_string(), decoded.to_string()]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "{}",
                serde_json::to_string_pretty(&decoded).unwrap_or_else(|_| decoded.to_string())
            );
        }
        OutputFormat::Raw => match ack {
            Value::String(text) => print_raw(text.as_bytes()),
            other => print_raw(other.to_string().as_bytes()),
        },
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.write_all(b"\n");
    let _ = out.flush();
}

/// Structured acks arrive as JSON text; anything else is returned as is.
pub fn decode_ack(ack: &Value) -> Value {
    match ack {
        Value::String(text) => serde_json::from_str(text).unwrap_or_else(|_| ack.clone()),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn json_text_acks_are_decoded() {
        let ack = Value::String(r#"{"success":false,"error":"bad"}"#.to_string());
        assert_eq!(decode_ack(&ack), json!({"success": false, "error": "bad"}));
    }

    #[test]
    fn plain_acks_pass_through() {
        assert_eq!(decode_ack(&json!("pong")), json!("pong"));
        assert_eq!(decode_ack(&json!({"queued": 2})), json!({"queued": 2}));
    }
}
