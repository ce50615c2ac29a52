//! `atrium-auth`: pure access-control boundary for the admin console.
//!
//! This crate is intentionally decoupled from HTTP and from any global
//! session state: callers pass the `User` in.

pub mod grants;
pub mod oracle;
pub mod section;
pub mod selector;
pub mod session;
pub mod user;

pub use grants::{Module, Permission, Role};
pub use oracle::{AccessExplanation, accessible_sections, explain_access, group_by_category, is_accessible};
pub use section::{Catalog, CatalogError, SectionCategory, SectionDescriptor, SectionId};
pub use selector::{SectionSelector, SelectorError, SelectorState};
pub use session::{SessionClaims, SessionError, validate_claims};
pub use user::{User, UserId};
