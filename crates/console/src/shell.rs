//! Admin shell: wires session changes into the section selector and the
//! overview dashboard.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::debug;

use atrium_auth::{
    Catalog, SectionCategory, SectionId, SectionSelector, SelectorError, SelectorState, User,
    group_by_category,
};
use atrium_dashboard::{DashboardAggregator, SnapshotBoard};

pub const NO_ACCESS_NOTICE: &str = "Your account does not have access to any admin section.";

pub struct AdminShell {
    selector: SectionSelector,
    aggregator: Arc<DashboardAggregator>,
    board: Arc<SnapshotBoard>,
}

/// Navigation entry as handed to the rendering layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub id: SectionId,
    pub label: &'static str,
    pub icon: &'static str,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavGroup {
    pub category: SectionCategory,
    pub label: &'static str,
    pub items: Vec<NavItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShellView {
    pub state: SelectorState,
    pub navigation: Vec<NavGroup>,
    pub notice: Option<String>,
}

impl AdminShell {
    pub fn new(catalog: Catalog, aggregator: Arc<DashboardAggregator>) -> Self {
        Self {
            selector: SectionSelector::new(catalog),
            aggregator,
            board: Arc::new(SnapshotBoard::new()),
        }
    }

    pub fn selector(&self) -> &SectionSelector {
        &self.selector
    }

    pub fn board(&self) -> &Arc<SnapshotBoard> {
        &self.board
    }

    /// Apply a user-record change; the active section is repaired before
    /// this returns. Signing out also drops the displayed snapshot.
    pub fn apply_user(&mut self, user: Option<&User>) -> SelectorState {
        let state = self.selector.on_user_changed(user);
        if state == SelectorState::NoUser {
            self.board.clear();
        }
        state
    }

    /// Navigate to `target`. Arriving at the overview starts a refresh.
    pub fn navigate(&mut self, target: SectionId) -> Result<SelectorState, SelectorError> {
        let had_dashboard = self.wants_dashboard();
        let state = self.selector.navigate(target)?;
        if !had_dashboard && self.wants_dashboard() {
            self.spawn_refresh();
        }
        Ok(state)
    }

    pub fn wants_dashboard(&self) -> bool {
        self.selector.active() == Some(SectionId::Overview)
    }

    /// Start a dashboard refresh in the background. Overlapping refreshes
    /// resolve latest-request-wins on the board.
    pub fn spawn_refresh(&self) -> JoinHandle<bool> {
        let aggregator = self.aggregator.clone();
        let board = self.board.clone();
        tokio::spawn(async move { board.refresh(&aggregator).await })
    }

    /// Follow the session and navigation requests until the session store
    /// goes away. A closed navigation channel only stops navigation.
    pub async fn run(
        mut self,
        mut session: watch::Receiver<Option<User>>,
        mut navigation: mpsc::Receiver<SectionId>,
    ) -> Self {
        let user = session.borrow_and_update().clone();
        self.follow_session(user.as_ref());

        loop {
            tokio::select! {
                changed = session.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let user = session.borrow_and_update().clone();
                    self.follow_session(user.as_ref());
                }
                Some(target) = navigation.recv() => {
                    if let Err(e) = self.navigate(target) {
                        debug!(section = %target, error = %e, "navigation request rejected");
                    }
                }
            }
        }
        self
    }

    fn follow_session(&mut self, user: Option<&User>) {
        self.apply_user(user);
        if self.wants_dashboard() {
            debug!("overview active; refreshing dashboard");
            self.spawn_refresh();
        }
    }

    pub fn view(&self) -> ShellView {
        let active = self.selector.active();

        let navigation = group_by_category(self.selector.catalog(), self.selector.accessible())
            .into_iter()
            .map(|(category, ids)| NavGroup {
                category,
                label: category.label(),
                items: ids
                    .into_iter()
                    .map(|id| NavItem {
                        id,
                        label: id.label(),
                        icon: id.icon(),
                        active: active == Some(id),
                    })
                    .collect(),
            })
            .collect();

        let notice = match self.selector.state() {
            SelectorState::Empty => Some(NO_ACCESS_NOTICE.to_string()),
            SelectorState::Active(SectionId::Overview) => {
                self.board.current().and_then(|snapshot| snapshot.notice())
            }
            SelectorState::Active(_) | SelectorState::NoUser => None,
        };

        ShellView {
            state: self.selector.state(),
            navigation,
            notice,
        }
    }
}
