//! Session context: who we are and who the peers are
//!
//! Loaded once from the participants file and passed by reference to the
//! scene composer and the synchronization channel. The local identity may be
//! overridden at startup so several simulated participants can share one
//! participants file.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use serde::{Serialize, Deserialize};

use crate::visual::Material;

/// A remote participant
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Peer {
    pub name: String,
    pub uid: String,
    #[serde(default)]
    pub title: String,
    /// Accent color as `#rrggbb`
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default, rename = "emissiveIntensity")]
    pub emissive_intensity: Option<f32>,
}

impl Peer {
    pub fn new(uid: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            uid: uid.into(),
            title: String::new(),
            color: None,
            emissive_intensity: None,
        }
    }

    /// Material built from the peer's color, if it has a valid one
    pub fn material(&self) -> Option<Material> {
        let material = Material::from_hex(self.color.as_deref()?)?;
        Some(material.with_emissive(self.emissive_intensity.unwrap_or(0.0)))
    }
}

/// On-disk shape of the participants file
#[derive(Clone, Debug, Serialize, Deserialize)]
struct ParticipantsFile {
    #[serde(rename = "UID")]
    uid: String,
    #[serde(rename = "NAME", default)]
    name: String,
    #[serde(rename = "OTHERS", default)]
    others: Vec<Peer>,
}

/// Error type for session loading
#[derive(Debug)]
pub enum SessionError {
    /// IO error reading the participants file
    Io(io::Error),
    /// Malformed participants JSON
    Parse(serde_json::Error),
    /// The local identity is empty
    MissingIdentity,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::Io(e) => write!(f, "Failed to read participants file: {}", e),
            SessionError::Parse(e) => write!(f, "Failed to parse participants file: {}", e),
            SessionError::MissingIdentity => write!(f, "Participants file has no local identity"),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SessionError::Io(e) => Some(e),
            SessionError::Parse(e) => Some(e),
            SessionError::MissingIdentity => None,
        }
    }
}

impl From<io::Error> for SessionError {
    fn from(e: io::Error) -> Self {
        SessionError::Io(e)
    }
}

impl From<serde_json::Error> for SessionError {
    fn from(e: serde_json::Error) -> Self {
        SessionError::Parse(e)
    }
}

/// Local identity, display name and peers of the running session
#[derive(Clone, Debug, PartialEq)]
pub struct SessionContext {
    identity: String,
    display_name: String,
    peers: Vec<Peer>,
}

impl SessionContext {
    pub fn new(identity: impl Into<String>, display_name: impl Into<String>, peers: Vec<Peer>) -> Self {
        Self {
            identity: identity.into(),
            display_name: display_name.into(),
            peers,
        }
    }

    /// Parse a participants document
    pub fn from_json(json: &str) -> Result<Self, SessionError> {
        let file: ParticipantsFile = serde_json::from_str(json)?;
        if file.uid.trim().is_empty() {
            return Err(SessionError::MissingIdentity);
        }
        Ok(Self::new(file.uid, file.name, file.others))
    }

    /// Load a participants file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SessionError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Replace the local identity when an override is given
    ///
    /// The overriding participant is removed from the peer list, and the
    /// former identity, if it was not a peer already, takes its place.
    pub fn with_identity_override(mut self, identity: Option<&str>) -> Self {
        let Some(identity) = identity.map(str::trim).filter(|id| !id.is_empty()) else {
            return self;
        };
        if identity == self.identity {
            return self;
        }

        log::info!("Local identity overridden: '{}' -> '{}'", self.identity, identity);
        let previous = std::mem::replace(&mut self.identity, identity.to_string());
        let previous_name = std::mem::take(&mut self.display_name);
        match self.peers.iter().position(|p| p.uid == identity) {
            Some(index) => {
                let me = self.peers.remove(index);
                self.display_name = me.name.clone();
                if !self.peers.iter().any(|p| p.uid == previous) {
                    self.peers.insert(index, Peer { uid: previous, name: previous_name, ..me });
                }
            }
            None => {
                self.display_name = identity.to_string();
                if !self.peers.iter().any(|p| p.uid == previous) {
                    self.peers.push(Peer::new(previous, previous_name));
                }
            }
        }
        self
    }

    /// Identity other participants address us by
    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn peers(&self) -> &[Peer] {
        &self.peers
    }

    pub fn peer(&self, uid: &str) -> Option<&Peer> {
        self.peers.iter().find(|p| p.uid == uid)
    }
}
