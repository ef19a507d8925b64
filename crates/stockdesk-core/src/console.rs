// ── Console facade ──
//
// One `Console` per session: it owns the API client and the shared
// `AppContext`, runs every backend call through a single error path
// (translation, cancellation, session teardown on 401), and wires list
// fetches into `ListPage` with the stale-response guard.

use std::future::Future;
use std::sync::Arc;

use secrecy::SecretString;
use stockdesk_api::{ApiClient, CurrentUser, LogEntry, LogQuery, Page};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::ConsoleConfig;
use crate::context::AppContext;
use crate::error::CoreError;
use crate::list::ListPage;
use crate::model::Record;

/// Cheaply cloneable handle over the API client and shared state.
#[derive(Clone)]
pub struct Console {
    inner: Arc<ConsoleInner>,
}

struct ConsoleInner {
    config: ConsoleConfig,
    api: ApiClient,
    context: AppContext,
    cancel: CancellationToken,
}

impl Console {
    /// Build the HTTP client and install any stored session token. Does
    /// not touch the network.
    pub fn new(config: ConsoleConfig) -> Result<Self, CoreError> {
        let api = ApiClient::new(config.api_url.clone(), &config.transport())?;
        if let Some(token) = config.token.clone() {
            api.set_token(token);
        }
        let context = AppContext::new(config.theme);
        Ok(Self::from_parts(config, api, context))
    }

    /// Assemble a console around an existing client (tests, embedding).
    pub fn from_parts(config: ConsoleConfig, api: ApiClient, context: AppContext) -> Self {
        Self {
            inner: Arc::new(ConsoleInner {
                config,
                api,
                context,
                cancel: CancellationToken::new(),
            }),
        }
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.inner.config
    }

    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    pub fn context(&self) -> &AppContext {
        &self.inner.context
    }

    /// Token that aborts in-flight calls (Ctrl-C, view teardown).
    pub fn cancel_token(&self) -> CancellationToken {
        self.inner.cancel.clone()
    }

    // ── Call path ────────────────────────────────────────────────────

    /// Await a backend call, translating its error. Cancellation wins over
    /// the call; an expired session drops the token so the next call fails
    /// fast with `AuthenticationFailed`.
    pub async fn call<T, Fut>(&self, fut: Fut) -> Result<T, CoreError>
    where
        Fut: Future<Output = Result<T, stockdesk_api::Error>>,
    {
        let result = tokio::select! {
            biased;
            () = self.inner.cancel.cancelled() => Err(CoreError::Cancelled),
            result = fut => result.map_err(CoreError::from),
        };
        if let Err(err) = &result {
            if err.is_session_expired() && self.inner.api.has_token() {
                warn!("session expired, discarding token");
                self.inner.api.clear_token();
            }
        }
        result
    }

    // ── Session ──────────────────────────────────────────────────────

    /// Log in and return the token for persisting alongside the user.
    pub async fn login(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<(CurrentUser, SecretString), CoreError> {
        let response = self.call(self.api().login(username, password)).await?;
        info!(user = %response.user.username, "logged in");
        Ok((response.user, response.token.into()))
    }

    pub async fn logout(&self) -> Result<(), CoreError> {
        self.call(self.api().logout()).await
    }

    pub async fn current_user(&self) -> Result<CurrentUser, CoreError> {
        self.call(self.api().current_user()).await
    }

    // ── Lists ────────────────────────────────────────────────────────

    /// Fetch a full collection into a client-paged list. Returns `false`
    /// when the response was discarded as stale.
    ///
    /// ```ignore
    /// console.load(&mut branches, console.api().list_branches()).await;
    /// ```
    pub async fn load<T, Fut>(&self, page: &mut ListPage<T>, fetch: Fut) -> bool
    where
        T: Record,
        Fut: Future<Output = Result<Vec<T>, stockdesk_api::Error>>,
    {
        let ticket = page.begin_fetch();
        let result = self.call(fetch).await;
        page.apply(ticket, result)
    }

    /// Fetch the current page of the activity log. Search, the `action`
    /// filter, and the `branch_code` filter are passed to the backend.
    pub async fn load_logs(&self, page: &mut ListPage<LogEntry>) -> bool {
        let query = log_query(page);
        debug!(?query, "fetching log page");
        let ticket = page.begin_fetch();
        let result: Result<Page<LogEntry>, CoreError> =
            self.call(self.api().list_logs(&query)).await;
        page.apply_page(ticket, result)
    }

    /// Refresh the branch picker cache.
    pub async fn refresh_branch_options(&self) -> Result<usize, CoreError> {
        let options = self.call(self.api().branch_options()).await?;
        let count = options.len();
        self.context().dropdowns().replace_branches(options);
        Ok(count)
    }
}

fn log_query(page: &ListPage<LogEntry>) -> LogQuery {
    let query = page.query();
    let filter = |key: &str| {
        query
            .filters
            .get(key)
            .map(|v| v.trim().to_owned())
            .filter(|v| !v.is_empty())
    };
    LogQuery {
        page: query.page,
        limit: query.page_size,
        search: Some(query.search_term.trim().to_owned()).filter(|s| !s.is_empty()),
        action: filter("action"),
        branch_code: filter("branch_code"),
    }
}
