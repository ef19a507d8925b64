// ── Core error types ──
//
// User-facing errors from stockdesk-core. Consumers never match on HTTP
// status codes or JSON parse failures directly: the `From<stockdesk_api::Error>`
// impl translates transport-layer errors into domain variants, and
// `category()` buckets those into the handful of cases the console reacts to.

use strum::{Display, EnumIter};
use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach the server at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("Request cancelled")]
    Cancelled,

    // ── Session errors ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Permission denied: {message}")]
    PermissionDenied { message: String },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: String,
        identifier: String,
    },

    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    /// The backend answered 2xx but refused the operation (`success: false`).
    #[error("Operation rejected by server: {message}")]
    Rejected { message: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<stockdesk_api::Error> for CoreError {
    fn from(err: stockdesk_api::Error) -> Self {
        use stockdesk_api::Error as ApiError;

        match err {
            ApiError::Authentication { message } => CoreError::AuthenticationFailed { message },
            ApiError::MissingToken => CoreError::AuthenticationFailed {
                message: "not logged in".into(),
            },
            ApiError::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout { timeout_secs: 0 }
                } else if e.is_connect() || e.is_request() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            ApiError::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            ApiError::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            ApiError::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            ApiError::Http { status, message } => from_status(status, message),
            ApiError::Rejected { message } => CoreError::Rejected { message },
            ApiError::Deserialization { message, .. } => CoreError::Api {
                message: format!("unexpected response from server: {message}"),
                status: None,
            },
        }
    }
}

fn from_status(status: u16, message: String) -> CoreError {
    match status {
        400 | 422 => CoreError::ValidationFailed { message },
        401 => CoreError::AuthenticationFailed { message },
        403 => CoreError::PermissionDenied { message },
        404 => CoreError::NotFound {
            entity_type: "Record".into(),
            identifier: message,
        },
        409 => CoreError::Conflict { message },
        _ => CoreError::Api {
            message,
            status: Some(status),
        },
    }
}

// ── Categories and notices ───────────────────────────────────────────

/// Coarse failure buckets the presentation layer reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorCategory {
    Network,
    Timeout,
    Cancelled,
    Unauthorized,
    Forbidden,
    NotFound,
    Validation,
    Conflict,
    Server,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A transient user-facing message (what a toast would show).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl ErrorCategory {
    /// Default notice for this category.
    ///
    /// `Unauthorized` yields nothing because the session is torn down
    /// instead; `Cancelled` is silent.
    pub fn notice(self) -> Option<Notice> {
        let (level, message) = match self {
            Self::Unauthorized | Self::Cancelled => return None,
            Self::Network => (
                NoticeLevel::Error,
                "Cannot reach the server. Check your connection.",
            ),
            Self::Timeout => (NoticeLevel::Error, "The server took too long to respond."),
            Self::Forbidden => (
                NoticeLevel::Warning,
                "You do not have permission to do that.",
            ),
            Self::NotFound => (
                NoticeLevel::Warning,
                "The requested record no longer exists.",
            ),
            Self::Validation => (NoticeLevel::Warning, "Some fields are invalid."),
            Self::Conflict => (
                NoticeLevel::Warning,
                "The record conflicts with existing data.",
            ),
            Self::Server => (
                NoticeLevel::Error,
                "The server encountered an error. Try again later.",
            ),
            Self::Unknown => (NoticeLevel::Error, "Something went wrong."),
        };
        Some(Notice {
            level,
            message: message.to_owned(),
        })
    }
}

impl CoreError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ConnectionFailed { .. } => ErrorCategory::Network,
            Self::Timeout { .. } => ErrorCategory::Timeout,
            Self::Cancelled => ErrorCategory::Cancelled,
            Self::AuthenticationFailed { .. } => ErrorCategory::Unauthorized,
            Self::PermissionDenied { .. } => ErrorCategory::Forbidden,
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::ValidationFailed { .. } | Self::Rejected { .. } => ErrorCategory::Validation,
            Self::Conflict { .. } => ErrorCategory::Conflict,
            Self::Api {
                status: Some(500..=599),
                ..
            } => ErrorCategory::Server,
            Self::Api { .. } | Self::Config { .. } | Self::Internal(_) => ErrorCategory::Unknown,
        }
    }

    /// Notice for this error. Backend-supplied messages win over the
    /// category default where the backend is the better narrator.
    pub fn notice(&self) -> Option<Notice> {
        let mut notice = self.category().notice()?;
        match self {
            Self::ValidationFailed { message }
            | Self::Rejected { message }
            | Self::Conflict { message }
            | Self::PermissionDenied { message }
                if !message.is_empty() =>
            {
                notice.message.clone_from(message);
            }
            _ => {}
        }
        Some(notice)
    }

    /// Whether the stored session should be discarded.
    pub fn is_session_expired(&self) -> bool {
        self.category() == ErrorCategory::Unauthorized
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn http_statuses_map_to_categories() {
        let cases = [
            (400, ErrorCategory::Validation),
            (401, ErrorCategory::Unauthorized),
            (403, ErrorCategory::Forbidden),
            (404, ErrorCategory::NotFound),
            (409, ErrorCategory::Conflict),
            (422, ErrorCategory::Validation),
            (500, ErrorCategory::Server),
            (503, ErrorCategory::Server),
            (418, ErrorCategory::Unknown),
        ];
        for (status, expected) in cases {
            let err = CoreError::from(stockdesk_api::Error::Http {
                status,
                message: "x".into(),
            });
            assert_eq!(err.category(), expected, "status {status}");
        }
    }

    #[test]
    fn unauthorized_and_cancelled_are_silent() {
        for category in ErrorCategory::iter() {
            let silent = matches!(
                category,
                ErrorCategory::Unauthorized | ErrorCategory::Cancelled
            );
            assert_eq!(category.notice().is_none(), silent, "{category}");
        }
    }

    #[test]
    fn backend_message_reaches_the_notice() {
        let err = CoreError::from(stockdesk_api::Error::Rejected {
            message: "Insufficient certificate stock".into(),
        });
        let notice = err.notice().unwrap();
        assert_eq!(notice.level, NoticeLevel::Warning);
        assert_eq!(notice.message, "Insufficient certificate stock");
    }

    #[test]
    fn missing_token_expires_session() {
        let err = CoreError::from(stockdesk_api::Error::MissingToken);
        assert!(err.is_session_expired());
        assert!(err.notice().is_none());
    }

    #[test]
    fn api_timeout_keeps_duration() {
        let err = CoreError::from(stockdesk_api::Error::Timeout { timeout_secs: 30 });
        assert_eq!(err.category(), ErrorCategory::Timeout);
        assert_eq!(err.to_string(), "Request timed out after 30s");
    }
}
