use crate::config::Credentials;
use crate::constants::LOGIN_ENDPOINT;
use crate::error::AuthError;
use crate::storage::{TokenKind, TokenStore};
use crate::transport::http_client::WadasHttpClient;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// Creates and destroys the session held by a [`TokenStore`].
pub struct Authenticator {
    http: WadasHttpClient,
    store: Arc<dyn TokenStore>,
}

impl Authenticator {
    pub fn new(http: WadasHttpClient, store: Arc<dyn TokenStore>) -> Self {
        Self { http, store }
    }

    /// Logs in and stores both tokens. Empty fields are rejected before any
    /// request is sent.
    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<(), AuthError> {
        if username.is_empty() || password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        let request = LoginRequest { username, password };
        let response = self.http.post_json(LOGIN_ENDPOINT, &request).await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            warn!("Login rejected for user {}", username);
            return Err(AuthError::BadCredentials);
        }
        if !status.is_success() {
            warn!("Login failed with status {}", status);
            return Err(AuthError::Unexpected(status));
        }

        let body = response.text().await?;
        let tokens: LoginResponse = serde_json::from_str(&body)?;

        self.store.set(TokenKind::Access, &tokens.access_token);
        self.store.set(TokenKind::Refresh, &tokens.refresh_token);
        info!("User {} logged in", username);
        Ok(())
    }

    pub async fn login_with(&self, credentials: &Credentials) -> Result<(), AuthError> {
        self.login(&credentials.username, &credentials.password)
            .await
    }

    /// Drops both tokens. The server keeps no session, so this is local only.
    pub fn logout(&self) {
        self.store.clear_all();
        debug!("Session cleared");
    }

    /// A stored refresh token is enough to keep going: the access token is
    /// recovered on the first authorization failure.
    pub fn is_logged_in(&self) -> bool {
        self.store.get(TokenKind::Refresh).is_some()
    }
}
