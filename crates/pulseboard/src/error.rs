//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use pulseboard_config::ConfigError;
use pulseboard_core::CoreError;

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
    pub const UNHEALTHY: i32 = 9;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to backend at {url}")]
    #[diagnostic(
        code(pulseboard::connection_failed),
        help(
            "Check that the backend is running and reachable.\n\
             Reason: {reason}\n\
             Try: pulseboard --url http://<host>:<port> health"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out")]
    #[diagnostic(
        code(pulseboard::timeout),
        help("Increase the timeout with --timeout or check backend responsiveness.")
    )]
    Timeout,

    // ── Backend responses ────────────────────────────────────────────
    #[error("Backend returned HTTP {status}")]
    #[diagnostic(code(pulseboard::http))]
    Http {
        status: u16,
        #[help]
        body: Option<String>,
    },

    #[error("Unexpected response from backend: {message}")]
    #[diagnostic(
        code(pulseboard::invalid_response),
        help("Check that --url points at a pulseboard backend.")
    )]
    InvalidResponse { message: String },

    #[error("Backend is {status}")]
    #[diagnostic(code(pulseboard::unhealthy))]
    Unhealthy {
        status: String,
        #[help]
        error: Option<String>,
    },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(pulseboard::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(pulseboard::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Run: pulseboard config path  to locate the config file"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(code(pulseboard::config))]
    Config(Box<ConfigError>),

    #[error("Internal error: {0}")]
    #[diagnostic(code(pulseboard::internal))]
    Internal(String),

    // ── IO / Serialization ────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Could not render config as TOML: {0}")]
    Toml(#[from] toml::ser::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::Http { status: 404, .. } => exit_code::NOT_FOUND,
            Self::Unhealthy { .. } => exit_code::UNHEALTHY,
            Self::Validation { .. } | Self::ProfileNotFound { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => Self::ConnectionFailed { url, reason },
            CoreError::Timeout => Self::Timeout,
            CoreError::Http { status, body } => Self::Http {
                status,
                body: (!body.trim().is_empty()).then_some(body),
            },
            CoreError::InvalidResponse { message } => Self::InvalidResponse { message },
            CoreError::Config { message } => Self::Validation {
                field: "input".into(),
                reason: message,
            },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::UnknownProfile { name, available } => {
                Self::ProfileNotFound { name, available }
            }
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            other => Self::Config(Box::new(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreachable_backend_exits_with_connection_code() {
        let err = CliError::from(CoreError::ConnectionFailed {
            url: "http://127.0.0.1:9".into(),
            reason: "connection refused".into(),
        });
        assert_eq!(err.exit_code(), exit_code::CONNECTION);
        assert_eq!(CliError::from(CoreError::Timeout).exit_code(), exit_code::TIMEOUT);
    }

    #[test]
    fn blank_http_body_is_dropped() {
        let err = CliError::from(CoreError::Http {
            status: 404,
            body: "  ".into(),
        });
        assert!(matches!(err, CliError::Http { body: None, .. }));
        assert_eq!(err.exit_code(), exit_code::NOT_FOUND);
    }

    #[test]
    fn bad_filter_date_is_a_usage_error() {
        let err = CliError::from(pulseboard_core::parse_date("yesterday").unwrap_err());
        assert_eq!(err.exit_code(), exit_code::USAGE);
    }
}
