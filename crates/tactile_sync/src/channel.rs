//! The synchronization channel
//!
//! [`SyncChannel`] publishes local presses under `"<name>/<identity>"` and
//! queues every delivery of the channel key. Deliveries arrive on whichever
//! thread wrote to the store; they are only applied when the frame loop calls
//! [`SyncChannel::drain`].

use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;

use serde_json::Value;
use tactile_core::{EventSink, SyncEvent, World};

use crate::error::SyncError;
use crate::listener::SyncListener;
use crate::store::{DeliveryCallback, RealtimeStore, SubscriptionId};

/// Default channel key
pub const DEFAULT_CHANNEL: &str = "buttons";

/// One participant's view of the shared channel
pub struct SyncChannel {
    store: Arc<dyn RealtimeStore>,
    name: String,
    listener: SyncListener,
    receiver: Option<Receiver<Value>>,
    subscription: Option<SubscriptionId>,
    published: usize,
}

impl SyncChannel {
    /// Create an unsubscribed channel for `identity`
    pub fn new(store: Arc<dyn RealtimeStore>, name: impl Into<String>, identity: impl Into<String>) -> Self {
        Self {
            store,
            name: name.into(),
            listener: SyncListener::new(identity),
            receiver: None,
            subscription: None,
            published: 0,
        }
    }

    /// Channel key
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Local identity
    pub fn identity(&self) -> &str {
        self.listener.identity()
    }

    /// Path local events are written to
    pub fn publish_path(&self) -> String {
        format!("{}/{}", self.name, self.listener.identity())
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    /// Number of events written so far
    pub fn published(&self) -> usize {
        self.published
    }

    /// Start receiving deliveries; resubscribing replaces the old subscription
    pub fn subscribe(&mut self) -> Result<(), SyncError> {
        self.unsubscribe();

        let (sender, receiver) = mpsc::channel();
        let callback: DeliveryCallback = Arc::new(move |value| {
            // The receiver is gone once the channel is dropped
            let _ = sender.send(value);
        });
        self.receiver = Some(receiver);
        self.listener.reset();
        self.subscription = Some(self.store.subscribe(&self.name, callback)?);
        log::info!("Subscribed to channel '{}' as '{}'", self.name, self.identity());
        Ok(())
    }

    /// Stop receiving deliveries and drop anything still queued
    pub fn unsubscribe(&mut self) {
        if let Some(id) = self.subscription.take() {
            self.store.unsubscribe(id);
            log::debug!("Unsubscribed from channel '{}'", self.name);
        }
        self.receiver = None;
    }

    /// Write one event under the local identity
    pub fn try_publish(&mut self, event: &SyncEvent) -> Result<(), SyncError> {
        let value = serde_json::to_value(event)?;
        self.store.set(&self.publish_path(), value)?;
        self.published += 1;
        log::debug!("Published {:?} for '{}' to '{}'", event.position, event.target, self.publish_path());
        Ok(())
    }

    /// Apply every queued delivery; returns the number of objects activated
    pub fn drain(&mut self, world: &mut World) -> Result<usize, SyncError> {
        let receiver = self.receiver.as_ref().ok_or(SyncError::NotSubscribed)?;
        let deliveries: Vec<Value> = receiver.try_iter().collect();

        let mut activated = 0;
        for value in deliveries {
            activated += self.listener.deliver(value, world);
        }
        Ok(activated)
    }
}

impl EventSink for SyncChannel {
    fn publish(&mut self, event: SyncEvent) {
        if let Err(e) = self.try_publish(&event) {
            log::warn!("Dropping sync event for '{}': {}", event.target, e);
        }
    }
}

impl Drop for SyncChannel {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use tactile_core::PressPosition;

    #[test]
    fn test_publish_path() {
        let channel = SyncChannel::new(Arc::new(MemoryStore::new()), "buttons", "alice");
        assert_eq!(channel.publish_path(), "buttons/alice");
        assert!(!channel.is_subscribed());
    }

    #[test]
    fn test_publish_writes_entry_under_identity() {
        let store = MemoryStore::new();
        let mut channel = SyncChannel::new(Arc::new(store.clone()), "buttons", "alice");
        channel.publish(SyncEvent::new("alice", "bob", PressPosition::Down));

        let snapshot = store.snapshot("buttons").unwrap();
        assert_eq!(snapshot["alice"]["target"], "bob");
        assert_eq!(snapshot["alice"]["position"], "down");
        assert_eq!(channel.published(), 1);
    }

    #[test]
    fn test_drain_requires_subscription() {
        let mut channel = SyncChannel::new(Arc::new(MemoryStore::new()), "buttons", "alice");
        let mut world = World::new();
        assert!(matches!(channel.drain(&mut world), Err(SyncError::NotSubscribed)));
    }

    #[test]
    fn test_initial_snapshot_is_queued_and_discarded() {
        let store = MemoryStore::new();
        store
            .set(
                "buttons/bob",
                serde_json::to_value(SyncEvent::new("bob", "alice", PressPosition::Down)).unwrap(),
            )
            .unwrap();

        let mut channel = SyncChannel::new(Arc::new(store), "buttons", "alice");
        channel.subscribe().unwrap();
        let mut world = World::new();
        assert_eq!(channel.drain(&mut world).unwrap(), 0);
    }

    #[test]
    fn test_drop_unsubscribes() {
        let store = MemoryStore::new();
        {
            let mut channel = SyncChannel::new(Arc::new(store.clone()), "buttons", "alice");
            channel.subscribe().unwrap();
            assert_eq!(store.subscriber_count(), 1);
        }
        assert_eq!(store.subscriber_count(), 0);
    }
}
