//! `atrium-console`
//!
//! **Responsibility:** Host for the admin console core.
//!
//! This crate provides:
//! - The session store (the only place the current user lives)
//! - Session retrieval from the backend
//! - The admin shell that keeps navigation and the overview dashboard in
//!   step with session changes

pub mod session;
pub mod shell;

pub use session::{SessionClient, SessionFetchError, SessionStore};
pub use shell::{AdminShell, NavGroup, NavItem, ShellView};
