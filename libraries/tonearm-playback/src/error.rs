//! Error types for playback traversal

use thiserror::Error;

/// Playback errors
///
/// Transport and navigation never fail; only explicit track selection does.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlaybackError {
    /// Index out of bounds
    #[error("Index out of bounds: {index} (track count {len})")]
    IndexOutOfBounds { index: usize, len: usize },

    /// No track with this id in the current list
    #[error("Track not found: {0}")]
    TrackNotFound(String),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
