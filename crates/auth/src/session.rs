//! Session claims issued by the authentication provider.
//!
//! Signature verification and token decoding happen upstream; this module
//! only checks the claim time window and turns the claims into a [`User`].

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Module, Permission, Role, User, UserId};

/// Claims returned by the session provider for the current bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject / user identifier.
    pub sub: UserId,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub roles: BTreeSet<Role>,

    #[serde(default)]
    pub permissions: BTreeSet<Permission>,

    #[serde(default)]
    pub modules: BTreeSet<Module>,

    pub issued_at: DateTime<Utc>,

    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("session has expired")]
    Expired,

    #[error("session not yet valid (issued_at is in the future)")]
    NotYetValid,

    #[error("invalid session time window (expires_at <= issued_at)")]
    InvalidTimeWindow,
}

/// Deterministically validate the claim time window against `now`.
pub fn validate_claims(claims: &SessionClaims, now: DateTime<Utc>) -> Result<(), SessionError> {
    if claims.expires_at <= claims.issued_at {
        return Err(SessionError::InvalidTimeWindow);
    }
    if now < claims.issued_at {
        return Err(SessionError::NotYetValid);
    }
    if now >= claims.expires_at {
        return Err(SessionError::Expired);
    }
    Ok(())
}

impl SessionClaims {
    pub fn into_user(self) -> User {
        User {
            id: self.sub,
            display_name: self.name,
            roles: self.roles,
            permissions: self.permissions,
            modules: self.modules,
        }
    }
}
