//! Applying channel deliveries to the local world

use std::collections::BTreeMap;

use serde_json::Value;
use tactile_core::{SyncEvent, World};

/// Decoded channel mapping, keyed by publisher identity
pub type ChannelSnapshot = BTreeMap<String, SyncEvent>;

/// Decode a wire value, skipping entries that are not events
pub fn decode_snapshot(value: Value) -> ChannelSnapshot {
    let Value::Object(map) = value else {
        if !value.is_null() {
            log::warn!("Ignoring channel delivery that is not a mapping");
        }
        return ChannelSnapshot::new();
    };

    map.into_iter()
        .filter_map(|(key, entry)| match serde_json::from_value::<SyncEvent>(entry) {
            Ok(event) => Some((key, event)),
            Err(e) => {
                log::warn!("Ignoring malformed channel entry '{}': {}", key, e);
                None
            }
        })
        .collect()
}

/// Mirrors remote presses onto local non-clickable objects
///
/// The first delivery of a subscription is the store's initial snapshot and
/// is never applied.
#[derive(Debug, Clone)]
pub struct SyncListener {
    identity: String,
    primed: bool,
}

impl SyncListener {
    pub fn new(identity: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            primed: false,
        }
    }

    /// Local identity entries are matched against
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Whether the initial snapshot has been seen
    pub fn is_primed(&self) -> bool {
        self.primed
    }

    /// Forget the initial snapshot, for a fresh subscription
    pub fn reset(&mut self) {
        self.primed = false;
    }

    /// Handle one delivery; returns the number of objects activated
    pub fn deliver(&mut self, value: Value, world: &mut World) -> usize {
        if !self.primed {
            self.primed = true;
            log::debug!("Discarding initial channel snapshot");
            return 0;
        }
        self.apply(&decode_snapshot(value), world)
    }

    /// Activate every mirror whose state disagrees with an entry addressed here
    pub fn apply(&self, snapshot: &ChannelSnapshot, world: &mut World) -> usize {
        let mut activated = 0;
        for (key, event) in snapshot {
            if event.target != self.identity {
                continue;
            }
            let pressed = event.position.is_pressed();
            for object_key in world.objects_with_uid(key) {
                let Some(object) = world.get_mut(object_key) else {
                    continue;
                };
                if object.is_clickable() || object.is_pressed() == pressed {
                    continue;
                }
                object.activate();
                activated += 1;
                log::debug!("Mirrored {:?} from '{}' onto '{}'", event.position, key, object.identity().name);
            }
        }
        activated
    }
}
