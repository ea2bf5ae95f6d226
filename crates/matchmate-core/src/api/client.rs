//! HTTP client for the random user API.
//!
//! This module provides the `ApiClient` struct, the production
//! `ProfileSource`. It issues one GET per fetch and retries only on
//! rate limiting.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{header, Client};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::source::{ProfileSource, RemoteUser, RemoteUsersResponse};
use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// Endpoint returning randomly generated users
pub const DEFAULT_API_URL: &str = "https://randomuser.me/api/";

/// Number of users requested per fetch
pub const DEFAULT_BATCH_SIZE: usize = 10;

/// HTTP request timeout in seconds.
/// A request that exceeds it resolves as a single failure.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Maximum number of retries for rate-limited (429) requests.
const MAX_RATE_LIMIT_RETRIES: u32 = 3;

/// Initial backoff delay in milliseconds for rate limiting.
const INITIAL_BACKOFF_MS: u64 = 1000;

/// API client for the random user service.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    batch_size: usize,
}

impl ApiClient {
    /// Create a client against the default endpoint and batch size
    pub fn new() -> Result<Self> {
        Self::with_endpoint(DEFAULT_API_URL, DEFAULT_BATCH_SIZE)
    }

    /// Create a client against a specific endpoint
    pub fn with_endpoint(base_url: impl Into<String>, batch_size: usize) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            batch_size,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Check if response is successful, returning an error with body if not.
    /// Returns Ok(Some(response)) for success, Ok(None) for rate limit (should retry),
    /// or Err for other errors.
    async fn check_response_for_retry(
        response: reqwest::Response,
    ) -> Result<Option<reqwest::Response>> {
        if response.status().is_success() {
            Ok(Some(response))
        } else if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            Ok(None)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body).into())
        }
    }

    async fn get<T: DeserializeOwned>(&self, url: &str, query: &[(&str, String)]) -> Result<T> {
        let mut retries = 0;
        let mut backoff_ms = INITIAL_BACKOFF_MS;

        loop {
            let response = self
                .client
                .get(url)
                .header(header::ACCEPT, "application/json")
                .query(query)
                .send()
                .await
                .map_err(ApiError::from)
                .with_context(|| format!("Failed to send GET request to {}", url))?;

            match Self::check_response_for_retry(response).await? {
                Some(response) => {
                    return response
                        .json()
                        .await
                        .map_err(|e| ApiError::InvalidResponse(e.to_string()))
                        .with_context(|| format!("Failed to parse JSON response from {}", url));
                }
                None => {
                    retries += 1;
                    if retries > MAX_RATE_LIMIT_RETRIES {
                        return Err(ApiError::RateLimited.into());
                    }
                    warn!(url = url, retry = retries, backoff_ms = backoff_ms, "Rate limited, backing off");
                    tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                    backoff_ms *= 2;
                }
            }
        }
    }

    /// Fetch one batch of users
    pub async fn fetch_users(&self) -> Result<Vec<RemoteUser>> {
        let query = [("results", self.batch_size.to_string())];
        let response: RemoteUsersResponse = self.get(&self.base_url, &query).await?;
        debug!(count = response.results.len(), "Users response received");
        Ok(response.results)
    }
}

#[async_trait]
impl ProfileSource for ApiClient {
    async fn fetch_profiles(&self) -> Result<Vec<RemoteUser>> {
        self.fetch_users().await
    }
}
