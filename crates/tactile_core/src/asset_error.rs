//! Asset error types
//!
//! Errors raised while resolving model descriptors to loaded visuals.

use std::io;
use std::fmt;

/// Error type for asset operations
#[derive(Debug)]
pub enum AssetError {
    /// IO error (file not found, permission denied, etc.)
    Io(io::Error),
    /// Parse error (invalid file format, deserialization failure)
    Parse(String),
    /// The model format has no loader
    UnsupportedFormat(String),
    /// The file loaded but contains no geometry
    Empty(String),
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetError::Io(err) => write!(f, "Asset IO error: {}", err),
            AssetError::Parse(msg) => write!(f, "Asset parse error: {}", msg),
            AssetError::UnsupportedFormat(what) => write!(f, "Unsupported model format: {}", what),
            AssetError::Empty(path) => write!(f, "Asset has no geometry: {}", path),
        }
    }
}

impl std::error::Error for AssetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AssetError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for AssetError {
    fn from(err: io::Error) -> Self {
        AssetError::Io(err)
    }
}

impl From<gltf::Error> for AssetError {
    fn from(err: gltf::Error) -> Self {
        match err {
            gltf::Error::Io(e) => AssetError::Io(e),
            other => AssetError::Parse(other.to_string()),
        }
    }
}

impl From<String> for AssetError {
    fn from(msg: String) -> Self {
        AssetError::Parse(msg)
    }
}

impl From<&str> for AssetError {
    fn from(msg: &str) -> Self {
        AssetError::Parse(msg.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_display() {
        let asset_err = AssetError::Io(io::Error::new(io::ErrorKind::NotFound, "file missing"));
        let msg = format!("{}", asset_err);
        assert!(msg.contains("IO error"));
        assert!(msg.contains("file missing"));
    }

    #[test]
    fn test_unsupported_display() {
        let msg = format!("{}", AssetError::UnsupportedFormat("fbx".to_string()));
        assert!(msg.contains("Unsupported"));
        assert!(msg.contains("fbx"));
    }

    #[test]
    fn test_from_str() {
        match AssetError::from("bad data") {
            AssetError::Parse(msg) => assert_eq!(msg, "bad data"),
            _ => panic!("Expected Parse variant"),
        }
    }

    #[test]
    fn test_error_source() {
        use std::error::Error;

        let asset_err = AssetError::Io(io::Error::new(io::ErrorKind::NotFound, "missing"));
        assert!(asset_err.source().is_some());
        assert!(AssetError::Parse("bad".to_string()).source().is_none());
        assert!(AssetError::Empty("x.obj".to_string()).source().is_none());
    }
}
