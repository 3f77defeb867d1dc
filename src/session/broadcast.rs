//! Change notification for session consumers
//!
//! Every mutation of the session publishes a fresh [`SessionSnapshot`].
//! Subscribers start from the snapshot current at subscription time.

use crate::models::SessionSnapshot;
use log::{debug, warn};
use tokio::sync::broadcast;

/// Default number of snapshots buffered per subscriber before it lags
pub const DEFAULT_BROADCAST_CAPACITY: usize = 16;

#[derive(Debug, Clone)]
pub struct SessionBroadcaster {
    tx: broadcast::Sender<SessionSnapshot>,
}

impl SessionBroadcaster {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Publish a snapshot; returns how many subscribers received it
    pub fn publish(&self, snapshot: SessionSnapshot) -> usize {
        // No subscribers is fine: nobody is listening yet
        self.tx.send(snapshot).unwrap_or(0)
    }

    /// Subscribe, seeding the subscription with `current`
    #[must_use]
    pub fn subscribe(&self, current: SessionSnapshot) -> SessionSubscription {
        SessionSubscription {
            current,
            rx: self.tx.subscribe(),
        }
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for SessionBroadcaster {
    fn default() -> Self {
        Self::new(DEFAULT_BROADCAST_CAPACITY)
    }
}

/// A consumer's view of the session: latest snapshot plus change notifications
#[derive(Debug)]
pub struct SessionSubscription {
    current: SessionSnapshot,
    rx: broadcast::Receiver<SessionSnapshot>,
}

impl SessionSubscription {
    /// Latest snapshot seen by this subscription
    #[must_use]
    pub fn current(&self) -> &SessionSnapshot {
        &self.current
    }

    /// Wait for the next change
    ///
    /// Returns `None` once the controller is gone. A lagging subscriber skips
    /// straight to the newest buffered snapshot.
    pub async fn changed(&mut self) -> Option<&SessionSnapshot> {
        loop {
            match self.rx.recv().await {
                Ok(snapshot) => {
                    self.current = snapshot;
                    return Some(&self.current);
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!("Session subscriber lagged, skipped {skipped} snapshots");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    debug!("Session broadcast channel closed");
                    return None;
                }
            }
        }
    }

    /// Apply any already-published changes without waiting
    pub fn refresh(&mut self) -> &SessionSnapshot {
        loop {
            match self.rx.try_recv() {
                Ok(snapshot) => self.current = snapshot,
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    warn!("Session subscriber lagged, skipped {skipped} snapshots");
                }
                Err(broadcast::error::TryRecvError::Empty | broadcast::error::TryRecvError::Closed) => {
                    return &self.current;
                }
            }
        }
    }
}
