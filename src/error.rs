//! Error types
//!
//! Every failure here is local and synchronous: a bad level or config file is
//! reported to whoever asked for it, and the process carries on.

use std::path::PathBuf;

use thiserror::Error;

/// A rectangle that cannot exist in level space
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    /// Width or height is zero or negative
    #[error("degenerate rectangle {width}x{height} at ({x}, {y})")]
    Degenerate { x: f32, y: f32, width: f32, height: f32 },
    /// A coordinate or extent is NaN or infinite
    #[error("non-finite rectangle component")]
    NonFinite,
}

/// Failure to turn a level description into a playable level
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("level description is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("level description is missing `{0}`")]
    MissingField(&'static str),

    #[error("level bounds must be positive, got {width}x{height}")]
    InvalidBounds { width: f32, height: f32 },

    #[error("{what} #{index} has bad geometry: {source}")]
    Geometry {
        what: &'static str,
        index: usize,
        #[source]
        source: GeometryError,
    },

    #[error("player does not fit the level: {0}")]
    Player(#[source] GeometryError),

    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error("no built-in level with id {0}")]
    UnknownLevel(u32),
}

/// Failure to translate a character grid into a level description
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("layout has no rows")]
    Empty,

    #[error("row {row} has {found} columns, expected {expected}")]
    Ragged { row: usize, expected: usize, found: usize },

    #[error("layout has no `{0}` cell")]
    MissingMarker(char),

    #[error("layout has more than one `{marker}` cell (second at row {row}, column {col})")]
    DuplicateMarker { marker: char, row: usize, col: usize },
}

/// Invalid physics tuning
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("tuning is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("tuning value `{name}` must be {requirement}, got {value}")]
    OutOfRange {
        name: &'static str,
        requirement: &'static str,
        value: f32,
    },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Failure reading or writing a persisted JSON file
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
