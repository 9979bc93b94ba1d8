// ── Core error types ──
//
// User-facing errors from pulseboard-core. Consumers never match on HTTP
// status codes or JSON parse failures directly; the
// `From<pulseboard_api::Error>` impl translates transport-layer errors
// into these variants.

use thiserror::Error;

/// Unified error type for the core crate.
///
/// `Clone` so a failed fetch can travel through the UI action channel.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach backend at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Backend request timed out")]
    Timeout,

    // ── Response errors ──────────────────────────────────────────────
    #[error("Backend returned HTTP {status}")]
    Http { status: u16, body: String },

    #[error("Invalid response from backend: {message}")]
    InvalidResponse { message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<pulseboard_api::Error> for CoreError {
    fn from(err: pulseboard_api::Error) -> Self {
        match err {
            pulseboard_api::Error::Network(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                }
            }
            pulseboard_api::Error::Http { status, body, .. } => CoreError::Http { status, body },
            pulseboard_api::Error::Parse { message, .. } => CoreError::InvalidResponse { message },
            pulseboard_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("invalid URL: {e}"),
            },
            pulseboard_api::Error::Client(message) => CoreError::Config { message },
        }
    }
}
