//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors
//! with actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use alarmdesk_config::ConfigError;
use alarmdesk_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const PERMISSION: i32 = 5;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to platform at {url}")]
    #[diagnostic(
        code(alarmdesk::connection_failed),
        help(
            "Check that the platform is running and reachable.\n\
             URL: {url}\n\
             For self-signed certificates try: alarmdesk --insecure alarms list"
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(alarmdesk::auth_failed),
        help(
            "Verify the username and password of the active profile.\n\
             Run: alarmdesk config set-password"
        )
    )]
    AuthFailed { message: String },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(alarmdesk::no_credentials),
        help(
            "Configure credentials with: alarmdesk config init\n\
             Or set ALARMDESK_USERNAME and ALARMDESK_PASSWORD."
        )
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(alarmdesk::not_found),
        help("Run: alarmdesk {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("Not found: {message}")]
    #[diagnostic(
        code(alarmdesk::not_found),
        help("Check the ids given on the command line, e.g. --entity TYPE:UUID.")
    )]
    ResourceNotFound { message: String },

    #[error("Permission denied: {message}")]
    #[diagnostic(
        code(alarmdesk::permission_denied),
        help("Customer users may only acknowledge or clear their own customer's alarms.")
    )]
    PermissionDenied { message: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("API error ({code}): {message}")]
    #[diagnostic(code(alarmdesk::api_error))]
    ApiError { code: String, message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(alarmdesk::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(alarmdesk::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: alarmdesk config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Configuration file not found")]
    #[diagnostic(
        code(alarmdesk::no_config),
        help(
            "Create one with: alarmdesk config init\n\
             Expected at: {path}\n\
             Or pass --url with ALARMDESK_USERNAME / ALARMDESK_PASSWORD set."
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(alarmdesk::config))]
    Config(ConfigError),

    // ── Output ───────────────────────────────────────────────────────
    #[error("Could not render {format} output: {message}")]
    #[diagnostic(code(alarmdesk::render), help("Try another --output format."))]
    Render { format: String, message: String },

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(alarmdesk::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── Timeout ──────────────────────────────────────────────────────
    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(alarmdesk::timeout),
        help("Increase timeout with --timeout or check platform responsiveness.")
    )]
    Timeout { seconds: u64 },

    // ── IO ───────────────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { profile } => Self::NoCredentials { profile },
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            other => Self::Config(other),
        }
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } | Self::ResourceNotFound { .. } => exit_code::NOT_FOUND,
            Self::PermissionDenied { .. } => exit_code::PERMISSION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::FetchFailed { source } => CliError::from(*source),

            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed {
                url,
                source: reason.into(),
            },

            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },

            CoreError::NotConnected => CliError::AuthFailed {
                message: "not signed in".into(),
            },

            CoreError::Timeout { timeout_secs } => CliError::Timeout {
                seconds: timeout_secs,
            },

            CoreError::AlarmNotFound { identifier } => CliError::NotFound {
                resource_type: "alarm".into(),
                identifier,
                list_command: "alarms list".into(),
            },

            CoreError::NotFound { message } => CliError::ResourceNotFound { message },

            CoreError::PermissionDenied { message } => CliError::PermissionDenied { message },

            CoreError::Rejected { message } => CliError::ApiError {
                code: "rejected".into(),
                message,
            },

            CoreError::Api {
                message,
                code,
                status,
            } => CliError::ApiError {
                code: code
                    .map(|c| c.to_string())
                    .or_else(|| status.map(|s| format!("HTTP {s}")))
                    .unwrap_or_default(),
                message,
            },

            CoreError::UnexpectedValue { field, value } => CliError::ApiError {
                code: "unexpected_value".into(),
                message: format!("unexpected {field} '{value}'"),
            },

            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },

            CoreError::Internal(message) => CliError::ApiError {
                code: "internal".into(),
                message,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permission_denied_exits_with_5() {
        let err = CliError::from(CoreError::PermissionDenied {
            message: "nope".into(),
        });
        assert_eq!(err.exit_code(), exit_code::PERMISSION);
    }

    #[test]
    fn fetch_failure_unwraps_to_cause() {
        let err = CliError::from(CoreError::fetch_failed(CoreError::Timeout { timeout_secs: 5 }));
        assert_eq!(err.exit_code(), exit_code::TIMEOUT);
    }

    #[test]
    fn missing_alarm_exits_with_4() {
        let err = CliError::from(CoreError::AlarmNotFound {
            identifier: "abc".into(),
        });
        assert_eq!(err.exit_code(), exit_code::NOT_FOUND);
        assert!(err.to_string().contains("alarm 'abc'"));
    }

    #[test]
    fn generic_not_found_is_not_reported_as_alarm() {
        let err = CliError::from(CoreError::fetch_failed(CoreError::NotFound {
            message: "Device with id [x] is not found".into(),
        }));
        assert_eq!(err.exit_code(), exit_code::NOT_FOUND);
        assert_eq!(err.to_string(), "Not found: Device with id [x] is not found");
    }

    #[test]
    fn render_failure_is_a_general_error() {
        let err = CliError::Render {
            format: "yaml".into(),
            message: "bad key".into(),
        };
        assert_eq!(err.exit_code(), exit_code::GENERAL);
        assert_eq!(err.to_string(), "Could not render yaml output: bad key");
    }
}
