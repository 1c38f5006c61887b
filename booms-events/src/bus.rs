//! Per-topic fan-out. Each topic gets its own `broadcast` channel,
//! created lazily on first publish or subscribe; channels with no
//! subscribers are cheap to keep around and are never proactively
//! cleaned up, matching the teacher's connection-map lifecycle (pruned
//! only when a send fails).

use crate::event::{BoomsEvent, Topic};
use std::collections::HashMap;
use std::sync::Mutex;
use tokio::sync::broadcast;

const CHANNEL_CAPACITY: usize = 256;

pub struct EventBus {
    channels: Mutex<HashMap<Topic, broadcast::Sender<BoomsEvent>>>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self { channels: Mutex::new(HashMap::new()) }
    }

    fn sender_for(&self, topic: Topic) -> broadcast::Sender<BoomsEvent> {
        let mut channels = self.channels.lock().expect("event bus mutex poisoned");
        channels
            .entry(topic)
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .clone()
    }

    /// Publishes `event` to every current subscriber of `topic`. A
    /// publish with no subscribers is a no-op, not an error.
    pub fn publish(&self, topic: Topic, event: BoomsEvent) {
        let sender = self.sender_for(topic);
        let _ = sender.send(event);
    }

    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<BoomsEvent> {
        self.sender_for(topic).subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::BoomsEventBody;
    use bigdecimal::BigDecimal;

    #[tokio::test]
    async fn subscriber_receives_published_events() {
        let bus = EventBus::new();
        let mut receiver = bus.subscribe(Topic::User(1));
        bus.publish(
            Topic::User(1),
            BoomsEvent::new(BoomsEventBody::BalanceUpdate {
                user_id: 1,
                real_available: BigDecimal::from(100),
                virtual_balance: BigDecimal::from(0),
            }),
        );
        let received = receiver.recv().await.unwrap();
        assert!(matches!(received.body, BoomsEventBody::BalanceUpdate { user_id: 1, .. }));
    }

    #[tokio::test]
    async fn publish_without_subscribers_does_not_panic() {
        let bus = EventBus::new();
        bus.publish(Topic::Treasury, BoomsEvent::new(BoomsEventBody::TreasuryUpdate {
            balance: BigDecimal::from(0),
            total_fees_collected: BigDecimal::from(0),
        }));
    }
}
