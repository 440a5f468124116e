//! Push-based availability feed
//!
//! The read path of the booking subsystem: a continuously updated view of
//! every class offering with its live `spots_left`. The orchestrator
//! publishes a fresh snapshot after each successful mutation; consumers
//! subscribe and re-render on change. Dropping a subscription unsubscribes
//! it - the receiver is its own cancellation token. The catalog is tens of
//! classes, so snapshots carry the full set with no pagination.

use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, watch};

use studio_types::{BookingId, ClassAvailability, ClassId, UserId};

/// A materialized view of the whole catalog with live availability
#[derive(Debug, Clone, Default)]
pub struct AvailabilitySnapshot {
    pub classes: Vec<ClassAvailability>,
    pub generated_at: Option<DateTime<Utc>>,
}

impl AvailabilitySnapshot {
    /// Look up one class in the snapshot
    pub fn class(&self, id: ClassId) -> Option<&ClassAvailability> {
        self.classes.iter().find(|c| c.offering.id == id)
    }
}

/// What changed in the booking ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerChangeKind {
    Booked,
    Cancelled,
    AttendanceMarked,
}

/// A single ledger change, broadcast so per-user views (a member's booking
/// list) know when to re-query without polling
#[derive(Debug, Clone, Copy)]
pub struct LedgerChange {
    pub kind: LedgerChangeKind,
    pub booking_id: BookingId,
    pub class_id: ClassId,
    pub user_id: UserId,
}

/// Publisher side of the availability view
///
/// Held by the orchestrator; everything else only gets subscriptions.
#[derive(Debug, Clone)]
pub struct AvailabilityFeed {
    snapshot_tx: watch::Sender<AvailabilitySnapshot>,
    changes_tx: broadcast::Sender<LedgerChange>,
}

impl AvailabilityFeed {
    /// Create an empty feed; the first published snapshot replaces it
    pub fn new() -> Self {
        let (snapshot_tx, _) = watch::channel(AvailabilitySnapshot::default());
        let (changes_tx, _) = broadcast::channel(256);
        Self {
            snapshot_tx,
            changes_tx,
        }
    }

    /// Subscribe to catalog snapshots
    pub fn subscribe(&self) -> AvailabilitySubscription {
        AvailabilitySubscription {
            rx: self.snapshot_tx.subscribe(),
        }
    }

    /// Subscribe to raw ledger changes
    pub fn subscribe_changes(&self) -> broadcast::Receiver<LedgerChange> {
        self.changes_tx.subscribe()
    }

    /// Publish a fresh snapshot to all subscribers
    pub fn publish(&self, classes: Vec<ClassAvailability>) {
        let snapshot = AvailabilitySnapshot {
            classes,
            generated_at: Some(Utc::now()),
        };
        // send only fails with no receivers, which is fine
        let _ = self.snapshot_tx.send(snapshot);
    }

    /// Announce a ledger change
    pub fn announce(&self, change: LedgerChange) {
        let _ = self.changes_tx.send(change);
    }
}

impl Default for AvailabilityFeed {
    fn default() -> Self {
        Self::new()
    }
}

/// Consumer side of the availability view
///
/// Drop it to unsubscribe.
#[derive(Debug)]
pub struct AvailabilitySubscription {
    rx: watch::Receiver<AvailabilitySnapshot>,
}

impl AvailabilitySubscription {
    /// The latest snapshot
    pub fn current(&self) -> AvailabilitySnapshot {
        self.rx.borrow().clone()
    }

    /// Wait for the next snapshot; `None` once the feed is gone
    pub async fn changed(&mut self) -> Option<AvailabilitySnapshot> {
        match self.rx.changed().await {
            Ok(()) => Some(self.rx.borrow_and_update().clone()),
            Err(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_see_published_snapshots() {
        let feed = AvailabilityFeed::new();
        let mut sub = feed.subscribe();

        assert!(sub.current().classes.is_empty());

        feed.publish(vec![]);
        let snapshot = sub.changed().await.unwrap();
        assert!(snapshot.generated_at.is_some());
    }

    #[tokio::test]
    async fn dropped_feed_ends_subscription() {
        let feed = AvailabilityFeed::new();
        let mut sub = feed.subscribe();
        drop(feed);
        assert!(sub.changed().await.is_none());
    }

    #[tokio::test]
    async fn changes_are_broadcast() {
        let feed = AvailabilityFeed::new();
        let mut rx = feed.subscribe_changes();

        feed.announce(LedgerChange {
            kind: LedgerChangeKind::Booked,
            booking_id: BookingId::new(),
            class_id: ClassId::new(),
            user_id: UserId::new(),
        });

        let change = rx.recv().await.unwrap();
        assert_eq!(change.kind, LedgerChangeKind::Booked);
    }
}
