//! Practicum homework statuses API client
//!
//! Issues a single authenticated GET per poll and hands back the decoded body
//! untouched; shape validation lives in [`crate::homework`].

use async_trait::async_trait;
use reqwest::{Client as HttpClient, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::config::{Credentials, Settings};
use crate::error::BotError;

/// Source of homework status updates
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HomeworkApi: Send + Sync {
    /// Fetches homework updates that happened after `timestamp` (Unix seconds).
    ///
    /// # Errors
    ///
    /// Returns `BotError::ApiAnswer` on transport or decoding failures and
    /// `BotError::ApiStatus` when the endpoint answers with anything but 200.
    async fn get_api_answer(&self, timestamp: i64) -> Result<Value, BotError>;
}

/// Creates an HTTP client with the given request timeout.
#[must_use]
pub fn create_http_client(timeout: Duration) -> HttpClient {
    HttpClient::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| HttpClient::new())
}

/// HTTP client for the Practicum homework statuses endpoint
#[derive(Debug, Clone)]
pub struct PracticumClient {
    http: HttpClient,
    endpoint: String,
    auth_header: String,
}

impl PracticumClient {
    /// Creates a client for `endpoint` authenticated with `token`.
    #[must_use]
    pub fn new(http: HttpClient, endpoint: impl Into<String>, token: &str) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
            auth_header: format!("OAuth {token}"),
        }
    }

    /// Builds a client from loaded settings and validated credentials.
    #[must_use]
    pub fn from_settings(settings: &Settings, credentials: &Credentials) -> Self {
        Self::new(
            create_http_client(settings.http_timeout()),
            settings.practicum_endpoint.clone(),
            &credentials.practicum_token,
        )
    }
}

#[async_trait]
impl HomeworkApi for PracticumClient {
    async fn get_api_answer(&self, timestamp: i64) -> Result<Value, BotError> {
        debug!(from_date = timestamp, "Requesting homework statuses");

        let response = self
            .http
            .get(&self.endpoint)
            .header("Authorization", &self.auth_header)
            .query(&[("from_date", timestamp)])
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(BotError::ApiStatus(status.as_u16()));
        }

        response.json::<Value>().await.map_err(BotError::from)
    }
}
