//! Snapshot fan-out to connected event-stream subscribers.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use dashmap::DashMap;
use futures::{FutureExt, Stream, StreamExt};
use scoreboard_core::SubscriberId;
use tokio::sync::broadcast;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;

/// Registry of open subscriptions, each with its own bounded queue.
///
/// Sends never block. A full queue evicts its oldest snapshot, so the newest
/// one is always delivered; a closed queue drops the subscriber.
pub struct Broadcaster {
    subscribers: DashMap<SubscriberId, broadcast::Sender<String>>,
    max_queue: usize,
}

impl Broadcaster {
    pub fn new(max_queue: usize) -> Self {
        Self {
            subscribers: DashMap::new(),
            max_queue: max_queue.max(1),
        }
    }

    /// Register a new subscriber and return its ID + receiver.
    pub fn register(&self) -> (SubscriberId, broadcast::Receiver<String>) {
        let id = SubscriberId::new();
        let (tx, rx) = broadcast::channel(self.max_queue);
        let _ = self.subscribers.insert(id.clone(), tx);
        (id, rx)
    }

    /// Remove a subscriber by ID. Returns whether it was registered.
    pub fn unregister(&self, id: &SubscriberId) -> bool {
        self.subscribers.remove(id).is_some()
    }

    /// Queue a message for one subscriber.
    pub fn send_to(&self, id: &SubscriberId, message: String) -> bool {
        let Some(tx) = self.subscribers.get(id).map(|e| e.value().clone()) else {
            return false;
        };
        if tx.send(message).is_ok() {
            true
        } else {
            let _ = self.unregister(id);
            false
        }
    }

    /// Queue a message for every subscriber. Returns how many accepted it.
    pub fn broadcast(&self, message: &str) -> usize {
        let mut delivered = 0;
        let mut closed = Vec::new();

        for entry in self.subscribers.iter() {
            match entry.value().send(message.to_string()) {
                Ok(_) => delivered += 1,
                Err(_) => closed.push(entry.key().clone()),
            }
        }

        // Removal must happen after the iterator releases its shard locks.
        for id in closed {
            let _ = self.unregister(&id);
            tracing::debug!(subscriber_id = %id, "Dropped closed subscriber");
        }
        delivered
    }

    /// Number of registered subscribers.
    pub fn count(&self) -> usize {
        self.subscribers.len()
    }
}

/// Receiving end of one subscription. Deregisters itself when dropped.
pub struct Subscription {
    id: SubscriberId,
    rx: BroadcastStream<String>,
    broadcaster: Arc<Broadcaster>,
}

impl Subscription {
    pub fn new(broadcaster: Arc<Broadcaster>) -> Self {
        let (id, rx) = broadcaster.register();
        Self {
            id,
            rx: BroadcastStream::new(rx),
            broadcaster,
        }
    }

    pub fn id(&self) -> &SubscriberId {
        &self.id
    }

    /// Next queued snapshot, or `None` once deregistered.
    pub async fn recv(&mut self) -> Option<String> {
        self.next().await
    }

    /// Non-blocking variant of [`Subscription::recv`].
    pub fn try_recv(&mut self) -> Option<String> {
        self.next().now_or_never().flatten()
    }
}

impl Stream for Subscription {
    type Item = String;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        loop {
            match self.rx.poll_next_unpin(cx) {
                Poll::Ready(Some(Ok(payload))) => return Poll::Ready(Some(payload)),
                Poll::Ready(Some(Err(BroadcastStreamRecvError::Lagged(skipped)))) => {
                    tracing::warn!(
                        subscriber_id = %self.id,
                        skipped,
                        "Send queue full, skipped older snapshots"
                    );
                }
                Poll::Ready(None) => return Poll::Ready(None),
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if self.broadcaster.unregister(&self.id) {
            tracing::info!(subscriber_id = %self.id, "Subscriber disconnected");
        }
    }
}
