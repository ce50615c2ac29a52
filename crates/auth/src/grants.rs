//! Opaque authorization facts carried by a user record.
//!
//! Permissions, roles and modules are plain strings issued by the session
//! provider (e.g. "jobs.view", "editor", "careers"). This layer never
//! interprets their contents: a requirement is satisfied only by an exact
//! match, so a typo or stale catalog entry can never grant access.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

macro_rules! impl_grant_newtype {
    ($(#[$meta:meta])* $t:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $t(Cow<'static, str>);

        impl $t {
            pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
                Self(name.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&'static str> for $t {
            fn from(value: &'static str) -> Self {
                Self(Cow::Borrowed(value))
            }
        }

        impl From<String> for $t {
            fn from(value: String) -> Self {
                Self(Cow::Owned(value))
            }
        }
    };
}

impl_grant_newtype!(
    /// Fine-grained permission identifier (e.g. "jobs.view").
    Permission
);

impl_grant_newtype!(
    /// Role name. Informational for this layer; roles never grant sections
    /// on their own.
    Role
);

impl_grant_newtype!(
    /// Coarse feature flag enabled for the user's organisation (e.g. "blog").
    Module
);
