//! In-process broadcast hub fanning refresh hints out to WebSocket feeds.
//!
//! Mutation services publish through the [`RefreshPublisher`] port; each
//! WebSocket connection subscribes and filters the stream down to its own
//! user. The channel is bounded, so a consumer that falls behind loses
//! hints instead of exerting back-pressure on mutations. Hints are
//! re-fetch nudges, not a durable event log.

use async_trait::async_trait;
use tokio::sync::broadcast;
use tracing::debug;

use crate::domain::ids::UserId;
use crate::domain::ports::{RefreshPublishError, RefreshPublisher, RefreshScope, RefreshSignal};

/// How many undelivered hints the hub buffers per subscriber.
pub const DEFAULT_HUB_CAPACITY: usize = 64;

/// Broadcast hub connecting mutation services to the refresh feeds.
#[derive(Debug)]
pub struct RefreshHub {
    sender: broadcast::Sender<RefreshSignal>,
}

impl RefreshHub {
    /// Create a hub buffering up to `capacity` hints per subscriber.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Open a subscription carrying every user's hints.
    ///
    /// The hub does not shard per user; feeds filter by user id.
    pub fn subscribe(&self) -> broadcast::Receiver<RefreshSignal> {
        self.sender.subscribe()
    }
}

impl Default for RefreshHub {
    fn default() -> Self {
        Self::new(DEFAULT_HUB_CAPACITY)
    }
}

#[async_trait]
impl RefreshPublisher for RefreshHub {
    async fn publish(&self, user: &UserId, scope: RefreshScope) -> Result<(), RefreshPublishError> {
        let signal = RefreshSignal {
            user: user.clone(),
            scope,
        };
        // `send` fails only when nobody is subscribed.
        if self.sender.send(signal).is_err() {
            debug!(scope = scope.as_str(), "refresh hint had no subscribers");
        }
        Ok(())
    }
}
