//! Sequenced feed of pool events.
//!
//! Every committed mutation is published once on the [`EventBus`] and
//! stamped with the next sequence number, so subscribers see commit order
//! and can spot gaps. Each subscriber reads through its own [`EventFeed`],
//! which drops the event types it did not ask for and reports how many
//! events it lost when it falls behind.

use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;

use super::PoolEvent;

/// A [`PoolEvent`] stamped with its position in commit order.
#[derive(Debug, Clone, Serialize)]
pub struct SequencedEvent {
    /// Position in commit order, starting at 1.
    pub sequence: u64,
    /// The event itself, serialized inline next to `sequence`.
    #[serde(flatten)]
    pub event: PoolEvent,
}

/// Publishing side of the pool event feed.
///
/// Cloning shares the channel and the sequence counter.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<SequencedEvent>,
    last_sequence: Arc<Mutex<u64>>,
}

impl EventBus {
    /// Creates a bus buffering up to `capacity` events per lagging
    /// subscriber.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender,
            last_sequence: Arc::new(Mutex::new(0)),
        }
    }

    /// Stamps `event` with the next sequence number and broadcasts it.
    ///
    /// Returns the assigned sequence. Events published with no subscriber
    /// still consume a number.
    pub fn publish(&self, event: PoolEvent) -> u64 {
        // Held across the send so broadcast order matches sequence order.
        let mut last = self
            .last_sequence
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *last += 1;
        let sequence = *last;
        let _ = self.sender.send(SequencedEvent { sequence, event });
        sequence
    }

    /// Sequence number of the most recently published event, 0 if none.
    #[must_use]
    pub fn last_sequence(&self) -> u64 {
        *self
            .last_sequence
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Opens a feed receiving every event published from now on.
    #[must_use]
    pub fn subscribe(&self) -> EventFeed {
        EventFeed {
            receiver: self.sender.subscribe(),
        }
    }
}

/// Item yielded by an [`EventFeed`].
#[derive(Debug, Clone)]
pub enum FeedItem {
    /// Next event accepted by the feed's filter.
    Event(SequencedEvent),
    /// The subscriber fell behind and `missed` events were discarded.
    Lagged {
        /// Number of events lost.
        missed: u64,
    },
}

/// Receiving side of the event feed, one per subscriber.
#[derive(Debug)]
pub struct EventFeed {
    receiver: broadcast::Receiver<SequencedEvent>,
}

impl EventFeed {
    /// Waits for the next event of any type.
    #[cfg(test)]
    pub(crate) async fn next(&mut self) -> Option<FeedItem> {
        self.next_matching(|_| true).await
    }

    /// Waits for the next event accepted by `wanted`, skipping the rest.
    ///
    /// Returns `None` once every [`EventBus`] handle is gone. A lag is reported as soon as it is detected, whatever the filter.
    /// Cancelling the returned future loses no accepted event.
    pub async fn next_matching<F>(&mut self, wanted: F) -> Option<FeedItem>
    where
        F: Fn(&PoolEvent) -> bool,
    {
        loop {
            match self.receiver.recv().await {
                Ok(item) if wanted(&item.event) => return Some(FeedItem::Event(item)),
                Ok(_) => {}
                Err(RecvError::Lagged(missed)) => return Some(FeedItem::Lagged { missed }),
                Err(RecvError::Closed) => return None,
            }
        }
    }
}
