use serde_json::Value;

use crate::cmd::{AppArgs, EmitArgs};
use crate::demo::build_app;
use crate::exit::{dispatch_error, emit_error, CliError, CliResult, DATA_INVALID, SUCCESS, USAGE};
use crate::output::{decode_ack, print_ack, OutputFormat};

pub fn run(args: EmitArgs, app: &AppArgs, format: OutputFormat) -> CliResult<i32> {
    let payload = parse_payload(args.json.as_deref())?;
    let (socket, _queue) =
        build_app(app.socket_config()).map_err(|err| dispatch_error("app setup failed", err))?;

    let ack = socket
        .transport()
        .emit_to(&args.namespace, &args.event, payload)
        .map_err(|err| emit_error("emit failed", err))?;

    print_ack(&args.event, &args.namespace, &ack, format);
    Ok(exit_code_for(&ack))
}

fn parse_payload(json: Option<&str>) -> CliResult<Option<Value>> {
    json.map(|text| {
        serde_json::from_str(text)
            .map_err(|err| CliError::new(USAGE, format!("invalid --json payload: {err}")))
    })
    .transpose()
}

/// Acknowledgements reporting `"success": false` exit with DATA_INVALID.
fn exit_code_for(ack: &Value) -> i32 {
    match decode_ack(ack).get("success") {
        Some(Value::Bool(false)) => DATA_INVALID,
        _ => SUCCESS,
    }
}
