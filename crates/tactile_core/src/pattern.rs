//! Grid pattern: which cells are buttons and which mirror peers
//!
//! The pattern file is a JSON matrix of 0/1 values. A `1` cell becomes a
//! solid button, a `0` cell a translucent remote mirror. A pattern that
//! cannot be read or does not match the grid dimensions is replaced by an
//! all-button matrix.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Serialize, Deserialize};

/// Kind of object placed in a grid cell
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellKind {
    Button,
    RemoteMirror,
}

/// Row-major 0/1 matrix
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GridPattern {
    cells: Vec<Vec<u8>>,
}

/// Why a pattern was rejected
#[derive(Debug, PartialEq, Eq)]
pub enum PatternError {
    Unreadable(String),
    Dimensions {
        expected: (usize, usize),
        found: (usize, usize),
    },
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternError::Unreadable(msg) => write!(f, "Unreadable grid pattern: {}", msg),
            PatternError::Dimensions { expected, found } => write!(
                f,
                "Grid pattern is {}x{}, expected {}x{}",
                found.0, found.1, expected.0, expected.1
            ),
        }
    }
}

impl std::error::Error for PatternError {}

impl GridPattern {
    /// All-button pattern
    pub fn solid(rows: usize, cols: usize) -> Self {
        Self {
            cells: vec![vec![1; cols]; rows],
        }
    }

    pub fn from_rows(cells: Vec<Vec<u8>>) -> Self {
        Self { cells }
    }

    /// Parse and check against the grid dimensions
    pub fn parse(json: &str, rows: usize, cols: usize) -> Result<Self, PatternError> {
        let pattern: GridPattern =
            serde_json::from_str(json).map_err(|e| PatternError::Unreadable(e.to_string()))?;
        pattern.validate(rows, cols)?;
        Ok(pattern)
    }

    /// Load the pattern file, falling back to [`GridPattern::solid`]
    pub fn load_or_solid(path: impl AsRef<Path>, rows: usize, cols: usize) -> Self {
        let path = path.as_ref();
        let result = fs::read_to_string(path)
            .map_err(|e| PatternError::Unreadable(e.to_string()))
            .and_then(|json| Self::parse(&json, rows, cols));
        match result {
            Ok(pattern) => pattern,
            Err(e) => {
                log::warn!("{} ({}), using an all-button grid", e, path.display());
                Self::solid(rows, cols)
            }
        }
    }

    /// Check that every row exists and has `cols` cells
    pub fn validate(&self, rows: usize, cols: usize) -> Result<(), PatternError> {
        let found_cols = self.cells.first().map_or(0, Vec::len);
        if self.cells.len() != rows || self.cells.iter().any(|row| row.len() != cols) {
            return Err(PatternError::Dimensions {
                expected: (rows, cols),
                found: (self.cells.len(), found_cols),
            });
        }
        Ok(())
    }

    pub fn rows(&self) -> usize {
        self.cells.len()
    }

    pub fn cols(&self) -> usize {
        self.cells.first().map_or(0, Vec::len)
    }

    /// Kind of the cell at `(row, col)`; out-of-range cells are buttons
    pub fn cell(&self, row: usize, col: usize) -> CellKind {
        match self.cells.get(row).and_then(|r| r.get(col)) {
            Some(0) => CellKind::RemoteMirror,
            _ => CellKind::Button,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        let pattern = GridPattern::parse("[[1,0,1,1],[0,0,1,1],[1,1,1,0]]", 3, 4).unwrap();
        assert_eq!(pattern.cell(0, 1), CellKind::RemoteMirror);
        assert_eq!(pattern.cell(0, 0), CellKind::Button);
        assert_eq!(pattern.cell(2, 3), CellKind::RemoteMirror);
        assert_eq!(pattern.rows(), 3);
        assert_eq!(pattern.cols(), 4);
    }

    #[test]
    fn test_wrong_row_count() {
        let err = GridPattern::parse("[[1,1,1,1]]", 3, 4).unwrap_err();
        assert_eq!(err, PatternError::Dimensions { expected: (3, 4), found: (1, 4) });
    }

    #[test]
    fn test_ragged_rows_rejected() {
        assert!(GridPattern::parse("[[1,1,1,1],[1,1],[1,1,1,1]]", 3, 4).is_err());
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(matches!(
            GridPattern::parse("{\"rows\": 3}", 3, 4),
            Err(PatternError::Unreadable(_))
        ));
    }

    #[test]
    fn test_load_falls_back_to_solid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grid.json");
        fs::write(&path, "[[0,0],[0,0]]").unwrap();
        assert_eq!(GridPattern::load_or_solid(&path, 3, 4), GridPattern::solid(3, 4));
        assert_eq!(GridPattern::load_or_solid(dir.path().join("missing.json"), 2, 2), GridPattern::solid(2, 2));
    }

    #[test]
    fn test_load_valid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grid.json");
        fs::write(&path, "[[0,1],[1,0]]").unwrap();
        let pattern = GridPattern::load_or_solid(&path, 2, 2);
        assert_eq!(pattern.cell(0, 0), CellKind::RemoteMirror);
        assert_eq!(pattern.cell(0, 1), CellKind::Button);
    }

    #[test]
    fn test_out_of_range_is_button() {
        assert_eq!(GridPattern::solid(1, 1).cell(5, 5), CellKind::Button);
    }
}
