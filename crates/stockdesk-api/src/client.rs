// Stock-management API HTTP client
//
// Wraps `reqwest::Client` with base-URL joining, bearer-token auth, and
// envelope unwrapping. Endpoint methods live in `endpoints/*` as inherent
// impls so this module stays focused on transport mechanics.

use std::sync::RwLock;

use reqwest::{Method, RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::envelope::{Envelope, Page};
use crate::error::Error;
use crate::transport::TransportConfig;

const BODY_PREVIEW_CHARS: usize = 200;

/// HTTP client for the stock-management REST backend.
///
/// Every response is `{success, data, message}`; the helpers return the
/// unwrapped `data` and turn non-2xx answers and `success: false` into
/// [`Error`] values carrying the status code and backend message. Nothing
/// is retried.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    token: RwLock<Option<SecretString>>,
    timeout_secs: u64,
}

impl ApiClient {
    /// Create a client from a `TransportConfig`.
    ///
    /// `base_url` is the API root (e.g. `https://stock.example.com/api/`);
    /// a trailing slash is added when missing so relative paths join under it.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url: normalize_base(base_url),
            token: RwLock::new(None),
            timeout_secs: transport.timeout_secs(),
        })
    }

    /// Create a client around a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url: normalize_base(base_url),
            token: RwLock::new(None),
            timeout_secs: TransportConfig::default().timeout_secs(),
        }
    }

    /// The API root every endpoint path is joined onto.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── Session token ────────────────────────────────────────────────

    /// Install a bearer token (from login or the credential store).
    pub fn set_token(&self, token: SecretString) {
        debug!("storing session token");
        *self.token.write().expect("token lock poisoned") = Some(token);
    }

    /// Forget the bearer token.
    pub fn clear_token(&self) {
        *self.token.write().expect("token lock poisoned") = None;
    }

    pub fn has_token(&self) -> bool {
        self.token.read().expect("token lock poisoned").is_some()
    }

    /// A copy of the current bearer token, for persisting after login.
    pub fn token(&self) -> Option<SecretString> {
        self.token.read().expect("token lock poisoned").clone()
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Join a relative endpoint path (e.g. `branches/12`) onto the base URL.
    pub(crate) fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Attach the bearer token. `required` calls fail fast without one.
    fn authorize(&self, builder: RequestBuilder, required: bool) -> Result<RequestBuilder, Error> {
        let guard = self.token.read().expect("token lock poisoned");
        match guard.as_ref() {
            Some(token) => Ok(builder.bearer_auth(token.expose_secret())),
            None if required => Err(Error::MissingToken),
            None => Ok(builder),
        }
    }

    fn request(&self, method: Method, path: &str, authed: bool) -> Result<RequestBuilder, Error> {
        let url = self.url(path)?;
        debug!("{method} {url}");
        self.authorize(self.http.request(method, url), authed)
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<Envelope<T>, Error> {
        let resp = builder.send().await.map_err(|e| self.transport_error(e))?;
        self.parse_envelope(resp).await
    }

    fn transport_error(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                timeout_secs: self.timeout_secs,
            }
        } else {
            Error::Transport(err)
        }
    }

    /// Send a GET request and unwrap `data`.
    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let builder = self.request(Method::GET, path, true)?;
        self.send(builder).await?.into_data()
    }

    /// Send a GET request with query parameters and keep the envelope, so the
    /// caller can resolve pagination from it.
    pub(crate) async fn get_page<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
        page_size: usize,
    ) -> Result<Page<T>, Error> {
        let builder = self.request(Method::GET, path, true)?.query(params);
        let envelope = self.send::<Vec<T>>(builder).await?;
        Ok(Page::from_envelope(envelope, page_size))
    }

    /// Send a POST request with JSON body and unwrap `data`.
    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        let builder = self.request(Method::POST, path, true)?.json(body);
        self.send(builder).await?.into_data()
    }

    /// Send a POST request that needs no session (login).
    pub(crate) async fn post_anonymous<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        let builder = self.request(Method::POST, path, false)?.json(body);
        self.send(builder).await?.into_data()
    }

    /// Send a POST request whose answer carries no payload worth keeping.
    pub(crate) async fn post_ack(&self, path: &str) -> Result<(), Error> {
        let builder = self.request(Method::POST, path, true)?;
        self.send::<serde_json::Value>(builder).await.map(drop)
    }

    /// Send a PUT request with JSON body and unwrap `data`.
    pub(crate) async fn put<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        let builder = self.request(Method::PUT, path, true)?.json(body);
        self.send(builder).await?.into_data()
    }

    /// Send a bodiless PATCH request and unwrap `data`.
    pub(crate) async fn patch<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let builder = self.request(Method::PATCH, path, true)?;
        self.send(builder).await?.into_data()
    }

    /// Send a DELETE request. The backend answers with an empty `data`.
    pub(crate) async fn delete(&self, path: &str) -> Result<(), Error> {
        let builder = self.request(Method::DELETE, path, true)?;
        self.send::<serde_json::Value>(builder).await.map(drop)
    }

    /// Check the HTTP status, then parse `{success, data, message}`.
    ///
    /// 401 becomes `Error::Authentication`, any other non-2xx becomes
    /// `Error::Http` with the backend's `message` (or a body preview), and a
    /// 2xx envelope with `success: false` becomes `Error::Rejected`.
    async fn parse_envelope<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<Envelope<T>, Error> {
        let status = resp.status();
        let body = resp.text().await.map_err(|e| self.transport_error(e))?;
        trace!(%status, bytes = body.len(), "response received");

        if status == StatusCode::UNAUTHORIZED {
            return Err(Error::Authentication {
                message: backend_message(&body)
                    .unwrap_or_else(|| "session expired or invalid credentials".into()),
            });
        }

        if !status.is_success() {
            return Err(Error::Http {
                status: status.as_u16(),
                message: backend_message(&body).unwrap_or_else(|| preview(&body)),
            });
        }

        if body.trim().is_empty() {
            return Ok(Envelope::empty());
        }

        let envelope: Envelope<T> =
            serde_json::from_str(&body).map_err(|e| Error::Deserialization {
                message: format!("{e} (body preview: {:?})", preview(&body)),
                body: body.clone(),
            })?;

        if !envelope.success {
            return Err(Error::Rejected {
                message: envelope
                    .message
                    .unwrap_or_else(|| "request rejected by server".into()),
            });
        }

        Ok(envelope)
    }
}

fn normalize_base(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

/// The `message` (or `error`) string of a JSON error body, if any.
fn backend_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .or_else(|| value.get("error"))
        .and_then(serde_json::Value::as_str)
        .filter(|m| !m.is_empty())
        .map(ToOwned::to_owned)
}

fn preview(body: &str) -> String {
    body.chars().take(BODY_PREVIEW_CHARS).collect()
}
