/******************************************************************************
    Author: Joaquín Béjar García
    Email: jb@taunais.com
    Date: 8/9/24
 ******************************************************************************/
use crate::storage::{TokenKind, TokenStore};
use crate::transport::model::{Payload, RawResponse};
use reqwest::StatusCode;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Classified result of one request attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestOutcome {
    Success(Payload),
    AuthorizationFailure,
    OtherFailure(String),
}

/// Issues one request with the current access token and classifies what
/// comes back.
///
/// The request itself is produced by a *request factory*: a closure that is
/// handed the access token (or `None`) and returns the pending response. A
/// factory may be invoked more than once per logical call, so it must not
/// mutate shared state before its request completes.
#[derive(Clone)]
pub struct AuthenticatedRequestExecutor {
    store: Arc<dyn TokenStore>,
    timeout: Duration,
}

impl AuthenticatedRequestExecutor {
    pub fn new(store: Arc<dyn TokenStore>, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Runs the factory once. A missing access token is not a precondition
    /// failure: the request still goes out and the server decides.
    pub async fn execute<F, Fut>(&self, factory: &F) -> RequestOutcome
    where
        F: Fn(Option<String>) -> Fut,
        Fut: Future<Output = anyhow::Result<RawResponse>>,
    {
        let access_token = self.store.get(TokenKind::Access);
        if access_token.is_none() {
            debug!("No access token stored, sending request without one");
        }

        match tokio::time::timeout(self.timeout, factory(access_token)).await {
            Ok(result) => classify(result),
            Err(_) => {
                warn!("Request timed out after {:?}", self.timeout);
                RequestOutcome::OtherFailure(format!(
                    "request timed out after {}s",
                    self.timeout.as_secs_f64()
                ))
            }
        }
    }
}

/// 401 responses and errors whose message mentions "Unauthorized" are
/// authorization failures; every other non-success is an other failure
/// carrying the status or message.
pub fn classify(result: anyhow::Result<RawResponse>) -> RequestOutcome {
    match result {
        Ok(response) if response.status.is_success() => {
            RequestOutcome::Success(response.into_payload())
        }
        Ok(response) if response.status == StatusCode::UNAUTHORIZED => {
            debug!("Server denied authorization");
            RequestOutcome::AuthorizationFailure
        }
        Ok(response) => {
            warn!("Request failed with status {}", response.status);
            RequestOutcome::OtherFailure(response.status.to_string())
        }
        Err(e) => {
            let message = format!("{e:#}");
            if message.contains("Unauthorized") {
                debug!("Request error reports authorization failure: {}", message);
                RequestOutcome::AuthorizationFailure
            } else {
                warn!("Request error: {}", message);
                RequestOutcome::OtherFailure(message)
            }
        }
    }
}
