//! Press events exchanged over the synchronization channel

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Serialize, Deserialize};

/// Press position carried by an event
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PressPosition {
    Up,
    Down,
}

impl PressPosition {
    /// Position for a pressed state
    pub fn from_pressed(pressed: bool) -> Self {
        if pressed {
            PressPosition::Down
        } else {
            PressPosition::Up
        }
    }

    /// Whether this position means pressed
    pub fn is_pressed(self) -> bool {
        self == PressPosition::Down
    }
}

/// One press/release record published to the channel
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SyncEvent {
    /// Identity of the object that was toggled
    pub uid: String,
    /// Identity of the participant the event is addressed to
    pub target: String,
    /// Milliseconds since the Unix epoch
    pub date: u64,
    pub position: PressPosition,
}

impl SyncEvent {
    /// Create an event stamped with the current time
    pub fn new(uid: impl Into<String>, target: impl Into<String>, position: PressPosition) -> Self {
        Self {
            uid: uid.into(),
            target: target.into(),
            date: now_millis(),
            position,
        }
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Outbound side of the channel, as seen by interactive objects
pub trait EventSink {
    /// Publish one event
    fn publish(&mut self, event: SyncEvent);
}

/// Sink that keeps every event, for scenes without a channel
impl EventSink for Vec<SyncEvent> {
    fn publish(&mut self, event: SyncEvent) {
        self.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_from_pressed() {
        assert_eq!(PressPosition::from_pressed(true), PressPosition::Down);
        assert_eq!(PressPosition::from_pressed(false), PressPosition::Up);
        assert!(PressPosition::Down.is_pressed());
        assert!(!PressPosition::Up.is_pressed());
    }

    #[test]
    fn test_wire_shape() {
        let event = SyncEvent {
            uid: "c3".to_string(),
            target: "local".to_string(),
            date: 1_700_000_000_000,
            position: PressPosition::Down,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["uid"], "c3");
        assert_eq!(json["target"], "local");
        assert_eq!(json["date"], 1_700_000_000_000u64);
        assert_eq!(json["position"], "down");
    }

    #[test]
    fn test_parse_wire_value() {
        let event: SyncEvent = serde_json::from_str(
            r#"{"uid":"peer-a","target":"peer-b","date":12,"position":"up"}"#,
        )
        .unwrap();
        assert_eq!(event.position, PressPosition::Up);
        assert_eq!(event.target, "peer-b");
    }

    #[test]
    fn test_new_stamps_date() {
        let event = SyncEvent::new("a", "b", PressPosition::Down);
        assert!(event.date > 0);
    }

    #[test]
    fn test_vec_sink_collects() {
        let mut sink: Vec<SyncEvent> = Vec::new();
        sink.publish(SyncEvent::new("a", "b", PressPosition::Up));
        assert_eq!(sink.len(), 1);
    }
}
