// Session endpoints: login, logout, and the current-user probe.

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::types::{CurrentUser, LoginResponse};

impl ApiClient {
    /// Exchange credentials for a bearer token.
    ///
    /// On success the token is installed on this client and returned with
    /// the signed-in user so the caller can persist it.
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<LoginResponse, Error> {
        debug!(username, "logging in");
        let body = json!({
            "username": username,
            "password": password.expose_secret(),
        });
        let response: LoginResponse = self.post_anonymous("auth/login", &body).await?;
        self.set_token(response.token.clone().into());
        debug!("login successful");
        Ok(response)
    }

    /// End the session server-side. The local token is dropped even when
    /// the backend call fails.
    pub async fn logout(&self) -> Result<(), Error> {
        let result = self.post_ack("auth/logout").await;
        self.clear_token();
        debug!("logout complete");
        result
    }

    /// The user the current token belongs to.
    pub async fn current_user(&self) -> Result<CurrentUser, Error> {
        self.get("auth/me").await
    }
}
