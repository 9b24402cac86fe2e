use std::fmt;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::ParseError;

use crate::config::{LOG_LEVEL_VAR, TelemetryConfig};

/// Target a bare configured level applies to.
const CRATE_DIRECTIVE: &str = "affordability";

#[derive(Debug)]
pub enum TelemetryError {
    /// `AFFORDABILITY_LOG_LEVEL` is not a valid `EnvFilter` directive.
    LogLevel { value: String, source: ParseError },
    Subscriber(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryError::LogLevel { value, .. } => write!(
                f,
                "{LOG_LEVEL_VAR} must be a level such as 'info' or a filter such as \
                 'affordability=debug', got '{value}'"
            ),
            TelemetryError::Subscriber(err) => {
                write!(f, "unable to install the affordability log subscriber: {err}")
            }
        }
    }
}

impl std::error::Error for TelemetryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TelemetryError::LogLevel { source, .. } => Some(source),
            TelemetryError::Subscriber(err) => Some(&**err),
        }
    }
}

/// Picks the log filter: a non-empty `RUST_LOG` wins, otherwise the configured level.
///
/// A bare level like `debug` applies to this crate only, so axum and hyper stay quiet.
fn build_filter(rust_log: Option<String>, log_level: &str) -> Result<EnvFilter, TelemetryError> {
    if let Some(directives) = rust_log.filter(|d| !d.trim().is_empty()) {
        if let Ok(filter) = EnvFilter::try_new(&directives) {
            return Ok(filter);
        }
    }

    let level = log_level.trim();
    let directives = if level.contains('=') || level.contains(',') {
        level.to_string()
    } else {
        format!("warn,{CRATE_DIRECTIVE}={level}")
    };

    EnvFilter::try_new(&directives).map_err(|source| TelemetryError::LogLevel {
        value: log_level.to_string(),
        source,
    })
}

/// Installs the global fmt subscriber, writing compact lines to stderr so that
/// `calculate --json` output on stdout stays machine-readable.
pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let filter = build_filter(std::env::var("RUST_LOG").ok(), &config.log_level)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .with_ansi(false)
        .try_init()
        .map_err(TelemetryError::Subscriber)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_level_is_scoped_to_this_crate() {
        let filter = build_filter(None, "debug").expect("debug is a valid level");
        let rendered = filter.to_string().to_lowercase();
        assert!(rendered.contains("affordability=debug"), "{rendered}");
        assert!(rendered.contains("warn"), "{rendered}");
    }

    #[test]
    fn explicit_directives_pass_through() {
        let filter =
            build_filter(None, "info,tower_http=debug").expect("directive list is valid");
        assert!(filter.to_string().to_lowercase().contains("tower_http=debug"));
    }

    #[test]
    fn rust_log_overrides_configured_level() {
        let filter = build_filter(Some("trace".to_string()), "info").expect("RUST_LOG is valid");
        let rendered = filter.to_string().to_lowercase();
        assert!(rendered.contains("trace"), "{rendered}");
        assert!(!rendered.contains("affordability"), "{rendered}");
    }

    #[test]
    fn blank_or_invalid_rust_log_falls_back_to_configured_level() {
        let blank = build_filter(Some("  ".to_string()), "info").expect("falls back");
        assert!(blank.to_string().to_lowercase().contains("affordability=info"));

        let invalid =
            build_filter(Some("affordability=loud".to_string()), "info").expect("falls back");
        assert!(invalid.to_string().to_lowercase().contains("affordability=info"));
    }

    #[test]
    fn invalid_level_names_the_environment_variable() {
        let err = build_filter(None, "loud").expect_err("'loud' is not a level");
        assert!(matches!(err, TelemetryError::LogLevel { .. }));
        let message = err.to_string();
        assert!(message.contains("AFFORDABILITY_LOG_LEVEL"), "{message}");
        assert!(message.contains("'loud'"), "{message}");
    }
}
