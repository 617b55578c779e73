//! Error type shared by the grid, the generator and the export surfaces.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while configuring, loading, editing or exporting a map.
#[derive(Debug, Error)]
pub enum MapError {
    /// Invalid grid dimensions or continent range for the generator.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Unrecognised character in a grid text file (1-based row and column).
    #[error("unknown tile '{found}' at {row}, {column}")]
    Parse { row: usize, column: usize, found: char },

    /// Grid file missing or unreadable.
    #[error("cannot access '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Explicit `set` outside the grid.
    #[error("coordinates ({x}, {y}) out of range for {width}x{height} map")]
    Bounds { x: usize, y: usize, width: usize, height: usize },

    /// Malformed JSON snapshot or parameter file.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

impl MapError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        MapError::Io { path: path.into(), source }
    }
}

pub type Result<T> = std::result::Result<T, MapError>;
