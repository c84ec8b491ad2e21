mod cmd;
mod demo;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::{AppArgs, Command};
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(
    name = "sioapi",
    version,
    about = "Validated socket events and AsyncAPI docs for the downloader app"
)]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "warn", global = true)]
    log_level: LogLevel,

    /// Extra filter directives, e.g. `sioapi_dispatch=debug` (stderr).
    #[arg(long, value_name = "DIRECTIVES", env = "SIOAPI_LOG", global = true)]
    log_filter: Option<String>,

    #[command(flatten)]
    app: AppArgs,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level, cli.log_filter.as_deref());

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let result = cmd::run(cli.command, &cli.app, format);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_emit_subcommand() {
        let cli = Cli::try_parse_from([
            "sioapi",
            "emit",
            "download_file",
            "--json",
            "{\"url\":\"https://example.com/a.jpg\",\"location\":\"/tmp/a.jpg\"}",
        ])
        .expect("emit args should parse");

        assert!(matches!(cli.command, Command::Emit(_)));
    }

    #[test]
    fn app_flags_are_global() {
        let cli = Cli::try_parse_from([
            "sioapi",
            "docs",
            "--title",
            "Downloader",
            "--no-validate",
        ])
        .expect("docs args should parse");

        assert_eq!(cli.app.title.as_deref(), Some("Downloader"));
        assert!(cli.app.no_validate);
        assert!(matches!(cli.command, Command::Docs(_)));
    }

    #[test]
    fn parses_log_filter() {
        let cli = Cli::try_parse_from([
            "sioapi",
            "events",
            "--log-filter",
            "sioapi_dispatch=debug",
        ])
        .expect("log filter should parse");

        assert_eq!(cli.log_filter.as_deref(), Some("sioapi_dispatch=debug"));
    }

    #[test]
    fn rejects_unknown_doc_output() {
        let err = Cli::try_parse_from(["sioapi", "docs", "--output", "xml"])
            .expect_err("unknown output should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }
}
