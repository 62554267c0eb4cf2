//! Realtime key-value stores
//!
//! A store holds one mapping per top-level key. Writing `"<key>/<child>"`
//! replaces one entry of that mapping, after which every subscriber of
//! `<key>` receives the whole mapping. A fresh subscription immediately
//! receives the current mapping as its first delivery.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use serde_json::{Map, Value};

use crate::error::SyncError;

/// Callback invoked with the full mapping under a subscribed key
pub type DeliveryCallback = Arc<dyn Fn(Value) + Send + Sync>;

/// Handle returned by [`RealtimeStore::subscribe`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

/// The two capabilities the channel needs from a realtime store
pub trait RealtimeStore: Send + Sync {
    /// Write `value` at `path`, `"<key>/<child>"`
    fn set(&self, path: &str, value: Value) -> Result<(), SyncError>;

    /// Receive the mapping under `key` now and after every write to it
    fn subscribe(&self, key: &str, callback: DeliveryCallback) -> Result<SubscriptionId, SyncError>;

    /// Stop deliveries for a subscription
    fn unsubscribe(&self, id: SubscriptionId);
}

struct Subscriber {
    id: SubscriptionId,
    key: String,
    callback: DeliveryCallback,
}

#[derive(Default)]
struct StoreState {
    data: BTreeMap<String, Map<String, Value>>,
    subscribers: Vec<Subscriber>,
    next_id: u64,
}

impl StoreState {
    fn snapshot(&self, key: &str) -> Value {
        Value::Object(self.data.get(key).cloned().unwrap_or_default())
    }

    fn callbacks_for(&self, key: &str) -> Vec<DeliveryCallback> {
        self.subscribers
            .iter()
            .filter(|s| s.key == key)
            .map(|s| s.callback.clone())
            .collect()
    }
}

/// In-process store shared by every participant holding a clone
///
/// Callbacks run on the writing thread, after the state lock is released but
/// while the delivery lock is held, so every subscriber sees snapshots in
/// write order and its initial snapshot first. Callbacks may read the store
/// but must not write to it or subscribe.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<StoreState>>,
    delivery: Arc<Mutex<()>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current mapping under `key`
    pub fn snapshot(&self, key: &str) -> Result<Value, SyncError> {
        let state = self.lock()?;
        Ok(state.snapshot(key))
    }

    /// Number of live subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.lock().map(|s| s.subscribers.len()).unwrap_or(0)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, StoreState>, SyncError> {
        self.state
            .lock()
            .map_err(|_| SyncError::Unavailable("store lock poisoned".to_string()))
    }

    fn lock_delivery(&self) -> Result<std::sync::MutexGuard<'_, ()>, SyncError> {
        self.delivery
            .lock()
            .map_err(|_| SyncError::Unavailable("delivery lock poisoned".to_string()))
    }
}

fn split_path(path: &str) -> (&str, Option<&str>) {
    match path.split_once('/') {
        Some((key, child)) if !child.is_empty() => (key, Some(child)),
        Some((key, _)) => (key, None),
        None => (path, None),
    }
}

impl RealtimeStore for MemoryStore {
    fn set(&self, path: &str, value: Value) -> Result<(), SyncError> {
        let (key, child) = split_path(path);
        let _delivery = self.lock_delivery()?;
        let (snapshot, callbacks) = {
            let mut state = self.lock()?;
            match child {
                Some(child) => {
                    state.data.entry(key.to_string()).or_default().insert(child.to_string(), value);
                }
                None => {
                    let map = match value {
                        Value::Object(map) => map,
                        other => {
                            log::warn!("Ignoring non-mapping value written to '{}': {}", key, other);
                            return Ok(());
                        }
                    };
                    state.data.insert(key.to_string(), map);
                }
            }
            (state.snapshot(key), state.callbacks_for(key))
        };

        for callback in callbacks {
            callback(snapshot.clone());
        }
        Ok(())
    }

    fn subscribe(&self, key: &str, callback: DeliveryCallback) -> Result<SubscriptionId, SyncError> {
        let _delivery = self.lock_delivery()?;
        let (id, snapshot) = {
            let mut state = self.lock()?;
            let id = SubscriptionId(state.next_id);
            state.next_id += 1;
            state.subscribers.push(Subscriber {
                id,
                key: key.to_string(),
                callback: callback.clone(),
            });
            (id, state.snapshot(key))
        };
        callback(snapshot);
        Ok(id)
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        if let Ok(mut state) = self.lock() {
            state.subscribers.retain(|s| s.id != id);
        }
    }
}
