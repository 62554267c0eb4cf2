//! Error types for the synchronization channel

use std::fmt;

/// Errors raised while publishing to or subscribing on a realtime store
#[derive(Debug)]
pub enum SyncError {
    /// An event could not be encoded as a wire value
    Encode(serde_json::Error),
    /// The store can no longer be reached
    Unavailable(String),
    /// Publishing or draining before `subscribe`
    NotSubscribed,
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncError::Encode(e) => write!(f, "Failed to encode sync event: {}", e),
            SyncError::Unavailable(reason) => write!(f, "Realtime store unavailable: {}", reason),
            SyncError::NotSubscribed => write!(f, "Channel is not subscribed"),
        }
    }
}

impl std::error::Error for SyncError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SyncError::Encode(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for SyncError {
    fn from(e: serde_json::Error) -> Self {
        SyncError::Encode(e)
    }
}
