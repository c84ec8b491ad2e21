use clap::ValueEnum;
use tracing_subscriber::EnvFilter;

/// Target prefix shared by the binary and every sioapi library crate.
const SIOAPI_TARGET: &str = "sioapi";

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_directive(self) -> &'static str {
        match self {
            LogLevel::Off => "off",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Filter directives: `level` for everything, then per-target overrides such as
/// `sioapi_dispatch=debug`. A bare level in `overrides` applies to every `sioapi*` target.
pub fn filter_directives(level: LogLevel, overrides: Option<&str>) -> String {
    let mut directives = vec![level.as_directive().to_string()];
    for directive in overrides
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|d| !d.is_empty())
    {
        if directive.contains('=') {
            directives.push(directive.to_string());
        } else {
            directives.push(format!("{SIOAPI_TARGET}={directive}"));
        }
    }
    directives.join(",")
}

/// Install the stderr subscriber. Stdout stays reserved for command output.
pub fn init_logging(format: LogFormat, level: LogLevel, overrides: Option<&str>) {
    let directives = filter_directives(level, overrides);
    let filter = EnvFilter::try_new(&directives).unwrap_or_else(|err| {
        eprintln!("warning: ignoring invalid --log-filter '{directives}': {err}");
        EnvFilter::new(level.as_directive())
    });

    let builder = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(overrides.is_some());

    match format {
        LogFormat::Text => {
            let _ = builder.try_init();
        }
        LogFormat::Json => {
            let _ = builder.json().try_init();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_alone_is_the_only_directive() {
        assert_eq!(filter_directives(LogLevel::Warn, None), "warn");
        assert_eq!(filter_directives(LogLevel::Off, Some(" ")), "off");
    }

    #[test]
    fn target_overrides_are_appended() {
        assert_eq!(
            filter_directives(LogLevel::Warn, Some("sioapi_dispatch=debug")),
            "warn,sioapi_dispatch=debug"
        );
    }

    #[test]
    fn bare_override_applies_to_sioapi_targets() {
        assert_eq!(
            filter_directives(LogLevel::Error, Some("trace")),
            "error,sioapi=trace"
        );
    }

    #[test]
    fn built_directives_parse() {
        let directives = filter_directives(LogLevel::Info, Some("sioapi_docs=debug,trace"));
        assert!(EnvFilter::try_new(directives).is_ok());
    }
}
