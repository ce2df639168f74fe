//! Core types for playback traversal

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// A track in the library
///
/// Owned by the external track collection. The controller only reads it and
/// compares tracks by `id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Track {
    /// Unique track identifier from the collection
    pub id: String,

    /// Playable audio reference (file path or URL handed to the media layer)
    pub path: PathBuf,

    /// Display title
    pub title: String,
}

impl Track {
    /// Create a track
    pub fn new(id: impl Into<String>, path: impl Into<PathBuf>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
            title: title.into(),
        }
    }

    /// Identity comparison used for all index lookups
    #[inline]
    pub fn same_as(&self, other: &Track) -> bool {
        self.id == other.id
    }
}

/// Transport status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlaybackStatus {
    /// Halted at position zero
    #[default]
    Stopped,

    /// Currently playing
    Playing,

    /// Paused mid-track
    Paused,
}

/// Repeat mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatMode {
    /// Stop at the natural end of the list
    #[default]
    Off,

    /// Replay the current track when it ends
    One,

    /// Wrap around to the start of the list
    All,
}

impl RepeatMode {
    /// Next mode in the toggle cycle: off -> all -> one -> off
    pub fn cycle(self) -> Self {
        match self {
            Self::Off => Self::All,
            Self::All => Self::One,
            Self::One => Self::Off,
        }
    }
}

impl fmt::Display for RepeatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Off => "off",
            Self::One => "one",
            Self::All => "all",
        };
        f.write_str(s)
    }
}

/// Configuration for the playback controller
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Initial shuffle flag (default: false)
    pub shuffle: bool,

    /// Initial repeat mode (default: Off)
    pub repeat: RepeatMode,

    /// Initial volume, 0.0-1.0 (default: 1.0)
    pub volume: f32,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            shuffle: false,
            repeat: RepeatMode::Off,
            volume: 1.0,
        }
    }
}

/// Read-only view of the controller state for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackSnapshot {
    pub tracks: Vec<Track>,
    pub current_track: Option<Track>,
    pub status: PlaybackStatus,
    pub is_playing: bool,
    pub shuffle: bool,
    pub repeat: RepeatMode,
    pub shuffled_order: Vec<usize>,
    pub volume: f32,
    pub muted: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = PlaybackConfig::default();
        assert!(!config.shuffle);
        assert_eq!(config.repeat, RepeatMode::Off);
        assert_eq!(config.volume, 1.0);
    }

    #[test]
    fn repeat_cycle_visits_all_modes() {
        let mut mode = RepeatMode::Off;
        mode = mode.cycle();
        assert_eq!(mode, RepeatMode::All);
        mode = mode.cycle();
        assert_eq!(mode, RepeatMode::One);
        mode = mode.cycle();
        assert_eq!(mode, RepeatMode::Off);
    }

    #[test]
    fn repeat_mode_serializes_lowercase() {
        let json = serde_json::to_string(&RepeatMode::All).unwrap();
        assert_eq!(json, "\"all\"");
        assert_eq!(RepeatMode::One.to_string(), "one");
    }

    #[test]
    fn partial_config_uses_defaults() {
        let config: PlaybackConfig = serde_json::from_str(r#"{"repeat":"one"}"#).unwrap();
        assert_eq!(config.repeat, RepeatMode::One);
        assert!(!config.shuffle);
        assert_eq!(config.volume, 1.0);
    }

    #[test]
    fn tracks_compare_by_id() {
        let a = Track::new("1", "/music/a.mp3", "A");
        let renamed = Track::new("1", "/music/a.flac", "A (remaster)");
        let b = Track::new("2", "/music/b.mp3", "B");

        assert!(a.same_as(&renamed));
        assert!(!a.same_as(&b));
    }
}
