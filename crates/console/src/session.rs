//! Host-owned session state.
//!
//! The store is the one place the current user lives. Everything else
//! subscribes to it and receives the record as an explicit value.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::watch;
use tracing::info;

use atrium_auth::{Permission, SessionClaims, SessionError, User, validate_claims};

/// Single source of truth for the authenticated user.
#[derive(Debug)]
pub struct SessionStore {
    tx: watch::Sender<Option<User>>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx }
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<User>> {
        self.tx.subscribe()
    }

    pub fn current(&self) -> Option<User> {
        self.tx.borrow().clone()
    }

    pub fn login(&self, user: User) {
        info!(user_id = %user.id, "session started");
        self.tx.send_replace(Some(user));
    }

    pub fn logout(&self) {
        if self.tx.send_replace(None).is_some() {
            info!("session ended");
        }
    }

    /// Replace the current user's permissions (e.g. after a role edit).
    /// No-op without a user.
    pub fn replace_permissions(&self, permissions: BTreeSet<Permission>) {
        self.tx.send_if_modified(|current| match current {
            Some(user) if user.permissions != permissions => {
                user.permissions = permissions;
                true
            }
            _ => false,
        });
    }
}

#[derive(Debug, Error)]
pub enum SessionFetchError {
    #[error("no auth token configured")]
    MissingToken,
    #[error("network error: {0}")]
    Network(String),
    #[error("session endpoint returned status {0}")]
    Status(u16),
    #[error("parse error: {0}")]
    Parse(String),
    #[error(transparent)]
    Invalid(#[from] SessionError),
}

/// Reads the current session from the backend's `auth/me` endpoint.
#[derive(Debug, Clone)]
pub struct SessionClient {
    client: reqwest::Client,
    url: String,
    token: Option<String>,
}

impl SessionClient {
    pub fn new(client: reqwest::Client, url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            client,
            url: url.into(),
            token,
        }
    }

    pub async fn fetch_claims(&self) -> Result<SessionClaims, SessionFetchError> {
        let token = self.token.as_ref().ok_or(SessionFetchError::MissingToken)?;

        let resp = self
            .client
            .get(&self.url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| SessionFetchError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(SessionFetchError::Status(resp.status().as_u16()));
        }

        resp.json()
            .await
            .map_err(|e| SessionFetchError::Parse(e.to_string()))
    }

    /// Fetch and validate the session, yielding the user record.
    pub async fn fetch_user(&self, now: DateTime<Utc>) -> Result<User, SessionFetchError> {
        let claims = self.fetch_claims().await?;
        validate_claims(&claims, now)?;
        Ok(claims.into_user())
    }
}
