//! Latest-request-wins holder for the displayed snapshot.
//!
//! Overlapping refreshes are allowed to finish, but only the snapshot of the
//! most recently *initiated* refresh is ever applied. Subscribers observe the
//! displayed snapshot through a `watch` channel.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use crate::aggregator::DashboardAggregator;
use crate::snapshot::DashboardSnapshot;

/// Identifies one refresh, in initiation order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

/// What subscribers see.
#[derive(Debug, Clone, Default)]
pub struct Displayed {
    latest_ticket: u64,
    applied_ticket: u64,
    snapshot: Option<Arc<DashboardSnapshot>>,
}

impl Displayed {
    pub fn snapshot(&self) -> Option<&Arc<DashboardSnapshot>> {
        self.snapshot.as_ref()
    }

    /// A refresh newer than the displayed snapshot is still running.
    pub fn is_refreshing(&self) -> bool {
        self.latest_ticket > self.applied_ticket
    }
}

#[derive(Debug)]
pub struct SnapshotBoard {
    tx: watch::Sender<Displayed>,
}

impl Default for SnapshotBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotBoard {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Displayed::default());
        Self { tx }
    }

    pub fn subscribe(&self) -> watch::Receiver<Displayed> {
        self.tx.subscribe()
    }

    /// Currently displayed snapshot.
    pub fn current(&self) -> Option<Arc<DashboardSnapshot>> {
        self.tx.borrow().snapshot.clone()
    }

    /// Register a new refresh. Any older ticket becomes stale.
    pub fn begin(&self) -> Ticket {
        let mut ticket = Ticket(0);
        // Updating the counter alone is not a change subscribers care about.
        self.tx.send_if_modified(|displayed| {
            displayed.latest_ticket += 1;
            ticket = Ticket(displayed.latest_ticket);
            false
        });
        ticket
    }

    /// Apply `snapshot` if `ticket` is still the latest refresh.
    ///
    /// Returns whether the snapshot was applied.
    pub fn publish(&self, ticket: Ticket, snapshot: DashboardSnapshot) -> bool {
        let applied = self.tx.send_if_modified(|displayed| {
            if ticket.0 != displayed.latest_ticket {
                return false;
            }
            displayed.applied_ticket = ticket.0;
            displayed.snapshot = Some(Arc::new(snapshot));
            true
        });

        if !applied {
            debug!(ticket = ticket.0, "discarding stale dashboard snapshot");
        }
        applied
    }

    /// Drop the displayed snapshot. Refreshes still in flight become stale.
    pub fn clear(&self) {
        self.tx.send_if_modified(|displayed| {
            displayed.latest_ticket += 1;
            displayed.applied_ticket = displayed.latest_ticket;
            displayed.snapshot.take().is_some()
        });
    }

    /// Run one aggregation and publish its result under latest-request-wins.
    pub async fn refresh(&self, aggregator: &DashboardAggregator) -> bool {
        let ticket = self.begin();
        let snapshot = aggregator.aggregate().await;
        self.publish(ticket, snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::Merged;
    use crate::normalize::ResourceSummary;
    use crate::source::SourceKey;

    fn snapshot(total: u64) -> DashboardSnapshot {
        DashboardSnapshot::assemble([(
            SourceKey::Jobs,
            Merged {
                summary: ResourceSummary {
                    total,
                    ..ResourceSummary::default()
                },
                cause: None,
            },
        )])
    }

    #[test]
    fn clear_drops_snapshot_and_stales_in_flight_refresh() {
        let board = SnapshotBoard::new();
        let first = board.begin();
        assert!(board.publish(first, snapshot(1)));

        let in_flight = board.begin();
        board.clear();
        assert!(board.current().is_none());
        assert!(!board.subscribe().borrow().is_refreshing());

        assert!(!board.publish(in_flight, snapshot(2)));
        assert!(board.current().is_none());
    }

    #[test]
    fn latest_ticket_wins() {
        let board = SnapshotBoard::new();
        let first = board.begin();
        let second = board.begin();

        assert!(board.publish(second, snapshot(2)));
        assert!(!board.publish(first, snapshot(1)));
        assert_eq!(board.current().unwrap().stats().total_jobs, 2);
    }

    #[test]
    fn stale_result_never_applies_even_if_it_lands_first() {
        let board = SnapshotBoard::new();
        let first = board.begin();
        let second = board.begin();

        assert!(!board.publish(first, snapshot(1)));
        assert!(board.current().is_none());
        assert!(board.subscribe().borrow().is_refreshing());

        assert!(board.publish(second, snapshot(2)));
        assert!(!board.subscribe().borrow().is_refreshing());
    }

    #[tokio::test]
    async fn subscribers_only_wake_on_applied_snapshots() {
        let board = SnapshotBoard::new();
        let mut rx = board.subscribe();

        let ticket = board.begin();
        assert!(!rx.has_changed().unwrap());

        board.publish(ticket, snapshot(7));
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().snapshot().unwrap().stats().total_jobs, 7);
    }

    #[tokio::test]
    async fn refresh_publishes_aggregation() {
        let aggregator =
            DashboardAggregator::new(Vec::new(), std::time::Duration::from_secs(1)).unwrap();
        let board = SnapshotBoard::new();

        assert!(board.refresh(&aggregator).await);
        assert!(board.current().unwrap().sources().is_empty());
    }
}
