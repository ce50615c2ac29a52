//! Backend fetchers.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use serde_json::Value;
use thiserror::Error;

/// Why a single source could not produce a raw payload.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),
    #[error("backend returned status {0}")]
    Status(u16),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("timed out after {0:?}")]
    Timeout(Duration),
}

/// One backend read. Implementations must be side-effect free.
#[async_trait]
pub trait SourceFetcher: Send + Sync {
    async fn fetch(&self) -> Result<Value, FetchError>;
}

/// Authenticated `GET` against a single backend endpoint.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    url: String,
    token: Option<String>,
}

impl HttpSource {
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
            token: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl SourceFetcher for HttpSource {
    async fn fetch(&self) -> Result<Value, FetchError> {
        let mut req = self.client.get(&self.url).header(ACCEPT, "application/json");

        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(FetchError::Status(resp.status().as_u16()));
        }

        resp.json::<Value>()
            .await
            .map_err(|e| FetchError::Parse(e.to_string()))
    }
}
