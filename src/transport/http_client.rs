use crate::config::RestApiConfig;
use crate::constants::ACCESS_TOKEN_HEADER;
use crate::transport::model::{disposition_file_name, RawResponse};
use anyhow::{Context, Result};
use reqwest::{header, Client, Response};
use serde::Serialize;
use std::fmt;
use tracing::{debug, error, instrument};

/// Thin HTTP client for the WADAS REST API.
///
/// It only moves bytes: it never interprets the status code, so the caller
/// (usually [`crate::transport::executor::AuthenticatedRequestExecutor`])
/// decides what an error status means.
#[derive(Debug, Clone)]
pub struct WadasHttpClient {
    client: Client,
    rest_api: RestApiConfig,
}

impl WadasHttpClient {
    /// Creates a new instance of the WadasHttpClient.
    ///
    /// # Arguments
    ///
    /// * `rest_api` - Base URL and per-request timeout.
    ///
    /// # Returns
    ///
    /// A Result containing the WadasHttpClient instance or an error.
    pub fn new(rest_api: &RestApiConfig) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(rest_api.timeout())
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            rest_api: rest_api.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.rest_api.base_url
    }

    pub fn url(&self, endpoint: &str) -> String {
        self.rest_api.url(endpoint)
    }

    /// Sends a GET request carrying the access token header, when one is
    /// available. Any status is returned as a [`RawResponse`]; only transport
    /// failures are errors.
    #[instrument(skip(self, access_token))]
    pub async fn get(
        &self,
        endpoint: &str,
        query: &[(String, String)],
        access_token: Option<&str>,
    ) -> Result<RawResponse> {
        let url = self.url(endpoint);
        debug!("Sending GET request to {}", url);

        let mut request = self.client.get(&url).query(query);
        if let Some(token) = access_token {
            request = request.header(ACCESS_TOKEN_HEADER, token);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                error!("Failed to send GET request: {:?}", e);
                anyhow::bail!("Failed to send GET request: {}", e)
            }
        };

        Self::read_response(response).await
    }

    /// Sends an unauthenticated JSON POST (login and token refresh).
    #[instrument(skip(self, body))]
    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<Response, reqwest::Error> {
        let url = self.url(endpoint);
        debug!("Sending POST request to {}", url);

        self.client.post(&url).json(body).send().await
    }

    async fn read_response(response: Response) -> Result<RawResponse> {
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|h| h.to_str().ok())
            .map(String::from);
        let file_name = response
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .and_then(|h| h.to_str().ok())
            .and_then(disposition_file_name);
        let body = response
            .bytes()
            .await
            .context("Failed to read response body")?;

        debug!("Response Status: {}", status);
        debug!("Response Length: {}", body.len());

        Ok(RawResponse {
            status,
            content_type,
            file_name,
            body: body.to_vec(),
        })
    }
}

impl fmt::Display for WadasHttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{\"base_url\":\"{}\"}}", self.rest_api.base_url)
    }
}
