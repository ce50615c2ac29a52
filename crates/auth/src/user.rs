//! User record supplied by the session provider.
//!
//! The record is read-only from this crate's point of view: the host
//! application owns the session store and hands a `User` (or `None`) to the
//! section selector whenever it changes.

use std::collections::BTreeSet;

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Module, Permission, Role};

// ─────────────────────────────────────────────────────────────────────────────
// User ID
// ─────────────────────────────────────────────────────────────────────────────

/// Identity of an authenticated user.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for UserId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<Uuid> for UserId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl FromStr for UserId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::from_str(s)?))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// User
// ─────────────────────────────────────────────────────────────────────────────

/// Identity plus authorization facts.
///
/// Every set defaults to empty when absent from the wire, so a malformed
/// record degrades to a guest that only sees unrestricted sections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub roles: BTreeSet<Role>,
    #[serde(default)]
    pub permissions: BTreeSet<Permission>,
    #[serde(default)]
    pub modules: BTreeSet<Module>,
}

impl User {
    /// A user with no roles, permissions or modules.
    pub fn guest(id: UserId) -> Self {
        Self {
            id,
            display_name: None,
            roles: BTreeSet::new(),
            permissions: BTreeSet::new(),
            modules: BTreeSet::new(),
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn with_role(mut self, role: impl Into<Role>) -> Self {
        self.roles.insert(role.into());
        self
    }

    pub fn with_permission(mut self, permission: impl Into<Permission>) -> Self {
        self.permissions.insert(permission.into());
        self
    }

    pub fn with_module(mut self, module: impl Into<Module>) -> Self {
        self.modules.insert(module.into());
        self
    }

    pub fn has_permission(&self, permission: &Permission) -> bool {
        self.permissions.contains(permission)
    }

    pub fn has_module(&self, module: &Module) -> bool {
        self.modules.contains(module)
    }

    /// True when the record carries no permissions and no modules.
    pub fn is_guest(&self) -> bool {
        self.permissions.is_empty() && self.modules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_sets_deserialize_as_empty() {
        let id = UserId::new();
        let json = serde_json::json!({ "id": id.to_string() });

        let user: User = serde_json::from_value(json).unwrap();
        assert_eq!(user.id, id);
        assert!(user.roles.is_empty());
        assert!(user.is_guest());
    }

    #[test]
    fn builder_accumulates_grants() {
        let user = User::guest(UserId::new())
            .with_role("editor")
            .with_permission("jobs.view")
            .with_permission("jobs.view")
            .with_module("careers");

        assert_eq!(user.permissions.len(), 1);
        assert!(user.has_permission(&Permission::from("jobs.view")));
        assert!(user.has_module(&Module::from("careers")));
        assert!(!user.has_module(&Module::from("blog")));
        assert!(!user.is_guest());
    }

    #[test]
    fn user_id_parses_from_string() {
        let id = UserId::new();
        let parsed: UserId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
        assert!("not-a-uuid".parse::<UserId>().is_err());
    }
}
