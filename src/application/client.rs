/******************************************************************************
    Author: Joaquín Béjar García
    Email: jb@taunais.com
    Date: 12/5/25
 ******************************************************************************/
use crate::error::ClientError;
use crate::session::interface::TokenRefresher;
use crate::storage::TokenStore;
use crate::transport::executor::{AuthenticatedRequestExecutor, RequestOutcome};
use crate::transport::model::{Payload, RawResponse};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Runs requests with the stored access token and recovers from one expired
/// token per call.
///
/// For each call:
///
/// 1. The request factory runs with the current access token.
/// 2. A success returns immediately. A non-authorization failure returns
///    [`ClientError::Other`] without refreshing.
/// 3. On an authorization failure the token is refreshed once. If that fails
///    the call ends with [`ClientError::Unauthorized`] and the factory is not
///    run again.
/// 4. The factory runs a second time. A second authorization failure is
///    [`ClientError::Unauthorized`]; any other failure here is
///    [`ClientError::Unknown`].
///
/// Refreshing is purely reactive. Concurrent calls are independent; whether
/// their refreshes are coalesced depends on the [`TokenRefresher`] given.
#[derive(Clone)]
pub struct RetryingSessionClient {
    executor: AuthenticatedRequestExecutor,
    refresher: Arc<dyn TokenRefresher>,
}

impl RetryingSessionClient {
    pub fn new(
        store: Arc<dyn TokenStore>,
        refresher: Arc<dyn TokenRefresher>,
        timeout: Duration,
    ) -> Self {
        Self {
            executor: AuthenticatedRequestExecutor::new(store, timeout),
            refresher,
        }
    }

    pub fn from_parts(
        executor: AuthenticatedRequestExecutor,
        refresher: Arc<dyn TokenRefresher>,
    ) -> Self {
        Self {
            executor,
            refresher,
        }
    }

    pub async fn execute<F, Fut>(&self, factory: F) -> Result<Payload, ClientError>
    where
        F: Fn(Option<String>) -> Fut,
        Fut: Future<Output = anyhow::Result<RawResponse>>,
    {
        match self.executor.execute(&factory).await {
            RequestOutcome::Success(payload) => return Ok(payload),
            RequestOutcome::OtherFailure(detail) => return Err(ClientError::Other(detail)),
            RequestOutcome::AuthorizationFailure => {
                debug!("Access token rejected, refreshing before retry");
            }
        }

        if let Err(e) = self.refresher.refresh().await {
            warn!("Token refresh failed: {}", e);
            return Err(ClientError::Unauthorized);
        }

        match self.executor.execute(&factory).await {
            RequestOutcome::Success(payload) => Ok(payload),
            RequestOutcome::AuthorizationFailure => {
                warn!("Access token still rejected after refresh");
                Err(ClientError::Unauthorized)
            }
            RequestOutcome::OtherFailure(detail) => {
                warn!("Retried request failed: {}", detail);
                Err(ClientError::Unknown)
            }
        }
    }
}
