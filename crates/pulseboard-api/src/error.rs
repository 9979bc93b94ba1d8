use thiserror::Error;

/// Top-level error type for the `pulseboard-api` crate.
///
/// Every fetch reports exactly one of these to its caller. Nothing here
/// retries; `pulseboard-core` decides how a failure is surfaced.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// Connection refused, DNS failure, timeout, or a broken body stream.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("HTTP {status} from {url}")]
    Http {
        status: u16,
        url: String,
        body: String,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// The response body was not the JSON shape we expected.
    #[error("Malformed response: {message}")]
    Parse { message: String, body: String },

    // ── Construction ────────────────────────────────────────────────
    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The underlying `reqwest::Client` could not be built.
    #[error("Failed to build HTTP client: {0}")]
    Client(String),
}

/// Coarse classification of an [`Error`], used for user-facing messages
/// and exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    Http,
    Parse,
    Config,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Network(_) => ErrorKind::Network,
            Self::Http { .. } => ErrorKind::Http,
            Self::Parse { .. } => ErrorKind::Parse,
            Self::InvalidUrl(_) | Self::Client(_) => ErrorKind::Config,
        }
    }
}
