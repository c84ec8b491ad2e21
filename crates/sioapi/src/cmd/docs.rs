use sioapi::docs::AsyncApiDoc;

use crate::cmd::{AppArgs, DocOutput, DocsArgs};
use crate::demo::build_app;
use crate::exit::{dispatch_error, doc_error, io_error, CliResult, SUCCESS};

pub fn run(args: DocsArgs, app: &AppArgs) -> CliResult<i32> {
    let (socket, _queue) =
        build_app(app.socket_config()).map_err(|err| dispatch_error("app setup failed", err))?;
    let rendered = render(&socket.asyncapi_doc(), args.output)?;

    match args.out {
        Some(path) => {
            std::fs::write(&path, rendered)
                .map_err(|err| io_error(&format!("write {}", path.display()), err))?;
            tracing::info!(path = %path.display(), "asyncapi document written");
        }
        None => print!("{rendered}"),
    }

    Ok(SUCCESS)
}

fn render(doc: &AsyncApiDoc, output: DocOutput) -> CliResult<String> {
    let rendered = match output {
        DocOutput::Yaml => doc.to_yaml(),
        DocOutput::Json => doc.to_json().map(|json| json + "\n"),
    };
    rendered.map_err(|err| doc_error("render failed", err))
}
