use std::sync::Arc;
use tokio::sync::watch;

use crate::snapshot::Snapshot;
use crate::telemetry::log::LogManager;

/// Latest-value channel for snapshots. Readers always see the newest snapshot and
/// never block the dispatcher; intermediate snapshots may be skipped.
pub struct SnapshotPublisher {
    sender: watch::Sender<Arc<Snapshot>>,
    published: u64,
    logger: LogManager,
}

impl SnapshotPublisher {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(Arc::new(Snapshot::default()));
        Self {
            sender,
            published: 0,
            logger: LogManager::new("publisher"),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<Snapshot>> {
        self.sender.subscribe()
    }

    /// Replaces the current snapshot, whether or not anyone is listening.
    pub fn publish(&mut self, snapshot: Snapshot) {
        self.sender.send_replace(Arc::new(snapshot));
        self.published += 1;
        if self.published % 60 == 0 {
            self.logger.debug(&format!(
                "{} snapshots published, {} subscribers",
                self.published,
                self.sender.receiver_count()
            ));
        }
    }

    pub fn latest(&self) -> Arc<Snapshot> {
        self.sender.borrow().clone()
    }

    pub fn published(&self) -> u64 {
        self.published
    }
}

impl Default for SnapshotPublisher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscribers_see_the_latest_snapshot() {
        let mut publisher = SnapshotPublisher::new();
        let mut receiver = publisher.subscribe();
        assert!(!receiver.has_changed().unwrap());

        let mut snapshot = Snapshot::default();
        snapshot.wind_stale = true;
        publisher.publish(snapshot.clone());

        assert!(receiver.has_changed().unwrap());
        assert_eq!(**receiver.borrow_and_update(), snapshot);
        assert_eq!(publisher.published(), 1);
        assert!(publisher.latest().wind_stale);
    }

    #[test]
    fn publishing_without_subscribers_is_fine() {
        let mut publisher = SnapshotPublisher::new();
        publisher.publish(Snapshot::default());
        assert_eq!(publisher.published(), 1);
    }
}
