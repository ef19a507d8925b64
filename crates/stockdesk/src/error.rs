//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and a per-category exit code.

use miette::Diagnostic;
use thiserror::Error;

use stockdesk_config::ConfigError;
use stockdesk_core::{CoreError, ErrorCategory};

/// Process exit codes.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const PERMISSION: i32 = 5;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the server at {url}")]
    #[diagnostic(
        code(stockdesk::connection_failed),
        help(
            "Check that the backend is running and the API URL is right.\n\
             Reason: {reason}\n\
             Self-signed certificate? Try --insecure (-k) or set ca_cert in your profile."
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(stockdesk::timeout),
        help("Increase the timeout with --timeout or check backend responsiveness.")
    )]
    Timeout { seconds: u64 },

    #[error("Request cancelled")]
    #[diagnostic(code(stockdesk::cancelled))]
    Cancelled,

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(stockdesk::auth_failed),
        help("Your session may have expired. Run: stockdesk login")
    )]
    AuthFailed { message: String },

    #[error("You do not have permission to do that: {message}")]
    #[diagnostic(
        code(stockdesk::forbidden),
        help("This action needs an account with a different role.")
    )]
    PermissionDenied { message: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(stockdesk::not_found),
        help("Run: stockdesk {list_command} to see what exists")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("Conflict: {message}")]
    #[diagnostic(code(stockdesk::conflict))]
    Conflict { message: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("Rejected by server: {message}")]
    #[diagnostic(code(stockdesk::rejected))]
    Rejected { message: String },

    #[error("API error{}: {message}", .status.map(|s| format!(" ({s})")).unwrap_or_default())]
    #[diagnostic(code(stockdesk::api_error))]
    ApiError {
        message: String,
        status: Option<u16>,
    },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(stockdesk::validation))]
    Validation { field: String, reason: String },

    #[error("Invalid input: {message}")]
    #[diagnostic(
        code(stockdesk::invalid_form),
        help("Fix the listed fields and try again.")
    )]
    InvalidForm { message: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(stockdesk::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: stockdesk config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No API URL configured")]
    #[diagnostic(
        code(stockdesk::no_config),
        help(
            "Create a profile with: stockdesk config init\n\
             Or pass --api-url / set STOCKDESK_API_URL.\n\
             Expected config at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(stockdesk::config))]
    Config(Box<ConfigError>),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(stockdesk::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render output: {0}")]
    #[diagnostic(code(stockdesk::render))]
    Render(String),
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            other => Self::Config(Box::new(other)),
        }
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::AuthFailed { .. } => exit_code::AUTH,
            Self::PermissionDenied { .. } => exit_code::PERMISSION,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Conflict { .. } => exit_code::CONFLICT,
            Self::Validation { .. }
            | Self::InvalidForm { .. }
            | Self::Rejected { .. }
            | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Whether the stored session token should be forgotten.
    pub fn is_session_expired(&self) -> bool {
        matches!(self, Self::AuthFailed { .. })
    }

    /// Name the missing record in a generic 404.
    pub fn for_resource(self, resource_type: &str, identifier: &str, list_command: &str) -> Self {
        match self {
            Self::NotFound { .. } => Self::NotFound {
                resource_type: resource_type.into(),
                identifier: identifier.into(),
                list_command: list_command.into(),
            },
            other => other,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        let category = err.category();
        match err {
            CoreError::ConnectionFailed { url, reason } => Self::ConnectionFailed { url, reason },
            CoreError::Timeout { timeout_secs } => Self::Timeout {
                seconds: timeout_secs,
            },
            CoreError::Cancelled => Self::Cancelled,
            CoreError::AuthenticationFailed { message } => Self::AuthFailed { message },
            CoreError::PermissionDenied { message } => Self::PermissionDenied { message },
            CoreError::NotFound {
                entity_type,
                identifier,
            } => Self::NotFound {
                list_command: format!("{}s list", entity_type.to_lowercase()),
                resource_type: entity_type,
                identifier,
            },
            CoreError::ValidationFailed { message } => Self::InvalidForm { message },
            CoreError::Conflict { message } => Self::Conflict { message },
            CoreError::Rejected { message } => Self::Rejected { message },
            CoreError::Api { message, status } => {
                let message = match category.notice() {
                    Some(notice) if category == ErrorCategory::Server => {
                        format!("{message} ({})", notice.message)
                    }
                    _ => message,
                };
                Self::ApiError { message, status }
            }
            CoreError::Config { message } => Self::Validation {
                field: "config".into(),
                reason: message,
            },
            CoreError::Internal(message) => Self::ApiError {
                message,
                status: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_statuses_reach_their_exit_codes() {
        let cases = [
            (401, exit_code::AUTH),
            (403, exit_code::PERMISSION),
            (404, exit_code::NOT_FOUND),
            (409, exit_code::CONFLICT),
            (422, exit_code::USAGE),
            (500, exit_code::GENERAL),
        ];
        for (status, expected) in cases {
            let core = CoreError::from(stockdesk_core::api::Error::Http {
                status,
                message: "x".into(),
            });
            assert_eq!(CliError::from(core).exit_code(), expected, "status {status}");
        }
    }

    #[test]
    fn timeouts_and_connection_failures() {
        let timeout = CliError::from(CoreError::Timeout { timeout_secs: 5 });
        assert_eq!(timeout.exit_code(), exit_code::TIMEOUT);

        let down = CliError::from(CoreError::ConnectionFailed {
            url: "http://localhost".into(),
            reason: "refused".into(),
        });
        assert_eq!(down.exit_code(), exit_code::CONNECTION);
    }

    #[test]
    fn not_found_gets_resource_context() {
        let err = CliError::from(CoreError::NotFound {
            entity_type: "Record".into(),
            identifier: "Branch not found".into(),
        })
        .for_resource("Branch", "42", "branches list");
        assert_eq!(err.to_string(), "Branch '42' not found");
        assert_eq!(err.exit_code(), exit_code::NOT_FOUND);
    }

    #[test]
    fn session_expiry_is_detected() {
        let err = CliError::from(CoreError::AuthenticationFailed {
            message: "jwt expired".into(),
        });
        assert!(err.is_session_expired());
        assert_eq!(err.exit_code(), exit_code::AUTH);
    }
}
