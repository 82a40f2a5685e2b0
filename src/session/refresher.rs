/******************************************************************************
    Author: Joaquín Béjar García
    Email: jb@taunais.com
    Date: 7/9/24
 ******************************************************************************/
use crate::constants::REFRESH_ENDPOINT;
use crate::error::RefreshError;
use crate::session::interface::TokenRefresher;
use crate::storage::{TokenKind, TokenStore};
use crate::transport::http_client::WadasHttpClient;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, instrument};

#[derive(Debug, Serialize)]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct RefreshResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// Refreshes the access token against `api/v1/token/refresh`.
///
/// Only the access token is replaced; the refresh token is sent as-is and
/// kept.
pub struct HttpTokenRefresher {
    http: WadasHttpClient,
    store: Arc<dyn TokenStore>,
    timeout: Duration,
}

impl HttpTokenRefresher {
    pub fn new(http: WadasHttpClient, store: Arc<dyn TokenStore>, timeout: Duration) -> Self {
        Self {
            http,
            store,
            timeout,
        }
    }

    async fn exchange(&self, refresh_token: &str) -> Result<RefreshResponse, RefreshError> {
        let request = RefreshRequest { refresh_token };
        let response = self.http.post_json(REFRESH_ENDPOINT, &request).await?;

        let status = response.status();
        if !status.is_success() {
            error!("Token refresh rejected with status {}", status);
            return Err(RefreshError::Rejected(status));
        }

        Ok(response.json::<RefreshResponse>().await?)
    }
}

#[async_trait]
impl TokenRefresher for HttpTokenRefresher {
    #[instrument(skip(self))]
    async fn refresh(&self) -> Result<String, RefreshError> {
        let refresh_token = self
            .store
            .get(TokenKind::Refresh)
            .ok_or(RefreshError::Missing)?;

        let response = match tokio::time::timeout(self.timeout, self.exchange(&refresh_token)).await
        {
            Ok(result) => result?,
            Err(_) => {
                error!("Token refresh timed out after {:?}", self.timeout);
                return Err(RefreshError::Unreachable(format!(
                    "timed out after {}s",
                    self.timeout.as_secs_f64()
                )));
            }
        };

        self.store.set(TokenKind::Access, &response.access_token);
        debug!(
            "Access token refreshed (type {})",
            response.token_type.as_deref().unwrap_or("unknown")
        );
        Ok(response.access_token)
    }
}
