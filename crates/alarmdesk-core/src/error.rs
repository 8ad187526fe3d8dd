// ── Core error types ──
//
// User-facing errors from alarmdesk-core. Consumers never see HTTP
// status codes or JSON parse failures directly; the
// `From<alarmdesk_api::Error>` impl maps transport-layer errors into
// domain variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to platform at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Not connected -- call connect() first")]
    NotConnected,

    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Alarm not found: {identifier}")]
    AlarmNotFound { identifier: String },

    /// The platform answered 404 for something other than a known alarm,
    /// e.g. the entity a search was scoped to.
    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Unexpected {field} value from platform: {value}")]
    UnexpectedValue { field: &'static str, value: String },

    /// The alarm fetch collaborator failed. Never retried by the core.
    #[error("Fetching alarms failed: {source}")]
    FetchFailed {
        #[source]
        source: Box<CoreError>,
    },

    // ── Operation errors ─────────────────────────────────────────────
    #[error("Permission denied: {message}")]
    PermissionDenied { message: String },

    #[error("Operation rejected by platform: {message}")]
    Rejected { message: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// Platform error code, when the response carried one.
        code: Option<i64>,
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Wrap an error raised while fetching a page of alarms.
    pub fn fetch_failed(err: impl Into<CoreError>) -> Self {
        Self::FetchFailed {
            source: Box::new(err.into()),
        }
    }

    /// Unwrap `FetchFailed` layers down to the underlying error.
    pub fn root(&self) -> &CoreError {
        match self {
            Self::FetchFailed { source } => source.root(),
            other => other,
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<alarmdesk_api::Error> for CoreError {
    fn from(err: alarmdesk_api::Error) -> Self {
        match err {
            alarmdesk_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            alarmdesk_api::Error::SessionExpired => CoreError::AuthenticationFailed {
                message: "Session expired -- re-authentication required".into(),
            },
            alarmdesk_api::Error::NotLoggedIn => CoreError::NotConnected,
            alarmdesk_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout { timeout_secs: 0 }
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        code: None,
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            alarmdesk_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            alarmdesk_api::Error::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            alarmdesk_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            alarmdesk_api::Error::Api {
                status: 404,
                message,
                ..
            } => CoreError::NotFound { message },
            alarmdesk_api::Error::Api {
                status: 403,
                message,
                ..
            } => CoreError::PermissionDenied { message },
            alarmdesk_api::Error::Api {
                status,
                message,
                error_code,
            } => CoreError::Api {
                message,
                code: error_code,
                status: Some(status),
            },
            alarmdesk_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}
