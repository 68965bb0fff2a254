//! The authoritative score board: a match store plus the broadcaster that
//! mirrors it to subscribers.

use std::sync::Arc;

use parking_lot::Mutex;
use scoreboard_core::{Match, MatchId, MatchPatch, NewMatch};
use scoreboard_store::{InMemoryStore, MatchStore, StoreError};

use crate::broadcast::{Broadcaster, Subscription};

/// Store and broadcaster behind one lock.
///
/// Every mutation fans out the full list before the lock is released, so each
/// subscriber sees snapshots in mutation order and a subscriber registered
/// under the lock never misses a later mutation.
pub struct LiveScoreboard {
    store: Mutex<Box<dyn MatchStore>>,
    broadcaster: Arc<Broadcaster>,
}

impl LiveScoreboard {
    pub fn new(store: impl MatchStore + 'static, broadcaster: Arc<Broadcaster>) -> Self {
        Self {
            store: Mutex::new(Box::new(store)),
            broadcaster,
        }
    }

    /// Empty in-memory board.
    pub fn in_memory(subscriber_queue: usize) -> Self {
        Self::new(InMemoryStore::new(), Arc::new(Broadcaster::new(subscriber_queue)))
    }

    pub fn list(&self) -> Vec<Match> {
        self.store.lock().list()
    }

    pub fn match_count(&self) -> usize {
        self.store.lock().len()
    }

    pub fn subscriber_count(&self) -> usize {
        self.broadcaster.count()
    }

    pub fn create(&self, new: &NewMatch) -> Result<Match, StoreError> {
        let mut store = self.store.lock();
        let created = store.create(new)?;
        self.fan_out(&**store);
        tracing::info!(match_id = %created.id, team1 = %created.team1, team2 = %created.team2, "Match created");
        Ok(created)
    }

    pub fn update(&self, id: MatchId, patch: &MatchPatch) -> Result<Match, StoreError> {
        let mut store = self.store.lock();
        let updated = store.update(id, patch)?;
        self.fan_out(&**store);
        tracing::info!(match_id = %id, score = %updated.score, "Match updated");
        Ok(updated)
    }

    pub fn delete(&self, id: MatchId) -> Result<(), StoreError> {
        let mut store = self.store.lock();
        store.delete(id)?;
        self.fan_out(&**store);
        tracing::info!(match_id = %id, "Match deleted");
        Ok(())
    }

    /// Open a subscription whose first message is the current snapshot.
    pub fn subscribe(&self) -> Subscription {
        let store = self.store.lock();
        let subscription = Subscription::new(Arc::clone(&self.broadcaster));
        if let Some(payload) = snapshot_json(&store.list()) {
            let _ = self.broadcaster.send_to(subscription.id(), payload);
        }
        tracing::info!(
            subscriber_id = %subscription.id(),
            subscribers = self.broadcaster.count(),
            "Subscriber connected"
        );
        subscription
    }

    fn fan_out(&self, store: &dyn MatchStore) {
        if self.broadcaster.count() == 0 {
            return;
        }
        if let Some(payload) = snapshot_json(&store.list()) {
            let delivered = self.broadcaster.broadcast(&payload);
            tracing::debug!(delivered, "Snapshot broadcast");
        }
    }
}

/// Serialize a snapshot as the JSON array sent on the wire.
pub fn snapshot_json(matches: &[Match]) -> Option<String> {
    match serde_json::to_string(matches) {
        Ok(json) => Some(json),
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize snapshot");
            None
        }
    }
}
