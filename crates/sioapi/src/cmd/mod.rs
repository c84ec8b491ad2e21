use clap::{Args, Subcommand, ValueEnum};
use std::path::PathBuf;

use sioapi::docs::ApiInfo;
use sioapi::SocketConfig;

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod docs;
pub mod emit;
pub mod events;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the AsyncAPI document of the downloader app.
    Docs(DocsArgs),
    /// List registered events and their schemas.
    Events(EventsArgs),
    /// Emit one event and print its acknowledgement.
    Emit(EmitArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, app: &AppArgs, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Docs(args) => docs::run(args, app),
        Command::Events(args) => events::run(args, app, format),
        Command::Emit(args) => emit::run(args, app, format),
        Command::Version(args) => version::run(args),
    }
}

/// API metadata and socket switches shared by all commands.
#[derive(Args, Debug, Default)]
pub struct AppArgs {
    /// API title.
    #[arg(long, env = "SIOAPI_TITLE", global = true)]
    pub title: Option<String>,
    /// API version.
    #[arg(long, env = "SIOAPI_API_VERSION", global = true)]
    pub api_version: Option<String>,
    /// API description.
    #[arg(long, env = "SIOAPI_DESCRIPTION", global = true)]
    pub description: Option<String>,
    /// Server URL.
    #[arg(long, env = "SIOAPI_SERVER_URL", global = true)]
    pub server_url: Option<String>,
    /// Server name.
    #[arg(long, env = "SIOAPI_SERVER_NAME", global = true)]
    pub server_name: Option<String>,
    /// Skip request and acknowledgement validation.
    #[arg(long, global = true)]
    pub no_validate: bool,
}

impl AppArgs {
    pub fn socket_config(&self) -> SocketConfig {
        let defaults = ApiInfo {
            title: "Downloader API".to_string(),
            description: "Request downloading of a file from a URL to the server".to_string(),
            server_name: "DOWNLOADER_BACKEND".to_string(),
            ..ApiInfo::default()
        };
        let info = ApiInfo {
            title: self.title.clone().unwrap_or(defaults.title),
            description: self.description.clone().unwrap_or(defaults.description),
            version: self.api_version.clone().unwrap_or(defaults.version),
            server_url: self.server_url.clone().unwrap_or(defaults.server_url),
            server_name: self.server_name.clone().unwrap_or(defaults.server_name),
        };

        SocketConfig {
            validate: !self.no_validate,
            generate_docs: true,
            info,
            ..SocketConfig::default()
        }
    }
}

#[derive(Copy, Clone, Debug, Default, ValueEnum)]
pub enum DocOutput {
    #[default]
    Yaml,
    Json,
}

#[derive(Args, Debug)]
pub struct DocsArgs {
    /// Document serialization.
    #[arg(long, value_enum, default_value = "yaml")]
    pub output: DocOutput,
    /// Write the document to a file instead of stdout.
    #[arg(long, value_name = "FILE")]
    pub out: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub struct EventsArgs {}

#[derive(Args, Debug)]
pub struct EmitArgs {
    /// Event name.
    pub event: String,
    /// JSON payload. Omit to emit without arguments.
    #[arg(long)]
    pub json: Option<String>,
    /// Namespace to emit on.
    #[arg(long, default_value = "/")]
    pub namespace: String,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_defaults_describe_downloader() {
        let config = AppArgs::default().socket_config();
        assert!(config.validate);
        assert!(config.generate_docs);
        assert_eq!(config.info.title, "Downloader API");
        assert_eq!(config.info.version, "1.0.0");
        assert_eq!(config.info.server_url, "http://localhost:5000");
    }

    #[test]
    fn metadata_flags_override_defaults() {
        let app = AppArgs {
            title: Some("Files".to_string()),
            server_name: Some("EDGE".to_string()),
            no_validate: true,
            ..AppArgs::default()
        };
        let config = app.socket_config();
        assert!(!config.validate);
        assert_eq!(config.info.title, "Files");
        assert_eq!(config.info.server_name, "EDGE");
    }
}
