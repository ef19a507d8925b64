// ── Runtime connection configuration ──
//
// Describes *how* to reach the backend. Built by the CLI from the merged
// profile/env/flag settings and handed in; core never reads config files.

use std::time::Duration;

use secrecy::SecretString;
use stockdesk_api::{TlsMode, TransportConfig};
use url::Url;

use crate::context::Theme;
use crate::debounce;
use crate::list::DEFAULT_PAGE_SIZE;

/// Configuration for one console session.
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// API root, e.g. `https://stock.example.com/api/`.
    pub api_url: Url,
    /// Bearer token from a previous login, if any.
    pub token: Option<SecretString>,
    pub tls: TlsMode,
    pub timeout: Duration,
    /// Quiescence window for interactive search.
    pub search_debounce: Duration,
    /// Rows per page for client-paged lists.
    pub page_size: usize,
    pub theme: Theme,
}

impl ConsoleConfig {
    pub fn new(api_url: Url) -> Self {
        Self {
            api_url,
            token: None,
            tls: TlsMode::System,
            timeout: Duration::from_secs(30),
            search_debounce: debounce::DEFAULT_WINDOW,
            page_size: DEFAULT_PAGE_SIZE,
            theme: Theme::default(),
        }
    }

    pub(crate) fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: self.tls.clone(),
            timeout: self.timeout,
            ..TransportConfig::default()
        }
    }
}
