//! Realtime state synchronization for Tactile scenes
//!
//! Participants share one key of a realtime store. Each participant writes
//! its latest press under its own identity and receives the whole mapping
//! after every write:
//!
//! - [`RealtimeStore`] - The publish/subscribe capabilities of a store
//! - [`MemoryStore`] - An in-process store shareable between participants
//! - [`SyncChannel`] - Publishes local presses and queues deliveries
//! - [`SyncListener`] - Mirrors entries addressed to the local identity

mod error;
mod store;
mod listener;
mod channel;

pub use error::SyncError;
pub use store::{DeliveryCallback, MemoryStore, RealtimeStore, SubscriptionId};
pub use listener::{decode_snapshot, ChannelSnapshot, SyncListener};
pub use channel::{SyncChannel, DEFAULT_CHANNEL};
