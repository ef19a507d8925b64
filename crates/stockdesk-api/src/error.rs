use thiserror::Error;

/// Top-level error type for the `stockdesk-api` crate.
///
/// Wrappers never classify failures for presentation: they hand back the
/// raw transport or HTTP failure and `stockdesk-core` maps it into the
/// user-facing taxonomy.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// The backend answered 401 (missing, expired, or revoked token).
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// A call that needs a session was made before `login`.
    #[error("Not logged in -- run `stockdesk login` first")]
    MissingToken,

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request timed out.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// TLS setup error (unreadable or invalid CA certificate).
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Backend ─────────────────────────────────────────────────────
    /// Non-2xx response. `message` is the backend's `message` field when
    /// the body carried one, otherwise a truncated body preview.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// 2xx response whose envelope reported `success: false`.
    #[error("Request rejected: {message}")]
    Rejected { message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// HTTP status code carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Authentication { .. } | Self::MissingToken => Some(401),
            Self::Http { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns `true` if the session is gone and a fresh login is required.
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::Authentication { .. } | Self::MissingToken)
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Returns `true` if the request never got an answer in time.
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout(),
            Self::Timeout { .. } => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_is_exposed_for_http_errors() {
        let err = Error::Http {
            status: 409,
            message: "Branch code already exists".into(),
        };
        assert_eq!(err.status(), Some(409));
        assert!(!err.is_not_found());
    }

    #[test]
    fn auth_errors_report_401() {
        assert_eq!(Error::MissingToken.status(), Some(401));
        assert!(
            Error::Authentication {
                message: "expired".into()
            }
            .is_auth_expired()
        );
    }

    #[test]
    fn rejected_envelope_has_no_status() {
        let err = Error::Rejected {
            message: "Insufficient stock".into(),
        };
        assert_eq!(err.status(), None);
        assert!(!err.is_timeout());
    }
}
