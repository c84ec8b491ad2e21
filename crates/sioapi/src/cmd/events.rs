use sioapi::dispatch::DEFAULT_NAMESPACE;

use crate::cmd::{AppArgs, EventsArgs};
use crate::demo::build_app;
use crate::exit::{dispatch_error, CliResult, SUCCESS};
use crate::output::{print_events, EventRow, OutputFormat};

pub fn run(_args: EventsArgs, app: &AppArgs, format: OutputFormat) -> CliResult<i32> {
    let (socket, _queue) =
        build_app(app.socket_config()).map_err(|err| dispatch_error("app setup failed", err))?;

    let rows: Vec<EventRow> = socket
        .doc_registry()
        .iter()
        .map(|registration| EventRow {
            namespace: registration
                .namespace()
                .unwrap_or(DEFAULT_NAMESPACE)
                .to_string(),
            event: registration.event_name().to_string(),
            request: registration.request_schema().display_name().to_string(),
            response: registration.response_schema().display_name().to_string(),
            description: registration.description().map(str::to_string),
        })
        .collect();

    print_events(&rows, format);
    Ok(SUCCESS)
}
