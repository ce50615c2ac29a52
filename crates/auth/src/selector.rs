//! Active-section state machine.
//!
//! The selector owns the "currently active section" and keeps it inside the
//! accessible set. It never reads session state itself: the host pushes every
//! user-record change in through [`SectionSelector::on_user_changed`], and the
//! repair happens before that call returns.

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::{Catalog, SectionId, User, accessible_sections};

/// Observable selector state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "active", rename_all = "snake_case")]
pub enum SelectorState {
    /// No authenticated user yet (or logged out).
    NoUser,
    /// Authenticated and `0` is the active, accessible section.
    Active(SectionId),
    /// Authenticated but nothing is accessible; the UI shows a "no access" state.
    Empty,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SelectorError {
    #[error("no authenticated user")]
    NoUser,

    #[error("section '{0}' is not accessible")]
    NotAccessible(SectionId),
}

#[derive(Debug, Clone)]
pub struct SectionSelector {
    catalog: Catalog,
    accessible: Vec<SectionId>,
    state: SelectorState,
}

impl SectionSelector {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            accessible: Vec::new(),
            state: SelectorState::NoUser,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn state(&self) -> SelectorState {
        self.state
    }

    pub fn active(&self) -> Option<SectionId> {
        match self.state {
            SelectorState::Active(id) => Some(id),
            SelectorState::NoUser | SelectorState::Empty => None,
        }
    }

    /// Current accessible set, in catalog order.
    pub fn accessible(&self) -> &[SectionId] {
        &self.accessible
    }

    /// Recompute the accessible set and repair the active section.
    ///
    /// The active section survives when it is still accessible; otherwise it
    /// moves to the first accessible section in catalog order, or the
    /// selector becomes `Empty`. `None` means logout.
    pub fn on_user_changed(&mut self, user: Option<&User>) -> SelectorState {
        let previous = self.state;

        let Some(user) = user else {
            self.accessible.clear();
            self.state = SelectorState::NoUser;
            if previous != SelectorState::NoUser {
                info!(from = ?previous, "section selector reset after logout");
            }
            return self.state;
        };

        self.accessible = accessible_sections(user, &self.catalog);

        self.state = match (previous, self.accessible.first()) {
            (_, None) => SelectorState::Empty,
            (SelectorState::Active(current), Some(_)) if self.accessible.contains(&current) => {
                SelectorState::Active(current)
            }
            (_, Some(first)) => SelectorState::Active(*first),
        };

        if self.state != previous {
            info!(
                user_id = %user.id,
                from = ?previous,
                to = ?self.state,
                accessible = self.accessible.len(),
                "active section reassigned"
            );
        }

        self.state
    }

    /// Navigate to `target` if it is accessible.
    ///
    /// A rejected navigation leaves the state untouched.
    pub fn navigate(&mut self, target: SectionId) -> Result<SelectorState, SelectorError> {
        if self.state == SelectorState::NoUser {
            debug!(target = %target, "navigation rejected: no user");
            return Err(SelectorError::NoUser);
        }

        if !self.accessible.contains(&target) {
            debug!(target = %target, "navigation rejected: section not accessible");
            return Err(SelectorError::NotAccessible(target));
        }

        self.state = SelectorState::Active(target);
        Ok(self.state)
    }

    /// Active section is a member of the accessible set, or the set is empty
    /// and nothing is active.
    pub fn is_consistent(&self) -> bool {
        match self.state {
            SelectorState::NoUser => self.accessible.is_empty(),
            SelectorState::Empty => self.accessible.is_empty(),
            SelectorState::Active(id) => self.accessible.contains(&id),
        }
    }
}
