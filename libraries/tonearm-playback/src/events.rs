//! Playback events
//!
//! The controller never drives the audio stream directly. Every transport
//! action queues a [`StreamCommand`] describing what the host's media layer
//! should do, alongside state notifications for the UI.

use crate::types::{PlaybackStatus, RepeatMode, Track};
use serde::{Deserialize, Serialize};

/// Intent for the platform media stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StreamCommand {
    /// Load a new track into the stream (does not start it)
    Load(Track),

    /// Start or resume the stream at its current position
    Play,

    /// Pause the stream, keeping its position
    Pause,

    /// Seek the stream to zero and halt it
    Stop,

    /// Seek the stream to zero and keep playing
    Restart,
}

/// Events emitted by the playback controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlaybackEvent {
    /// Something the media layer must act on
    Stream(StreamCommand),

    /// Transport status changed
    StateChanged {
        /// The new status
        status: PlaybackStatus,
    },

    /// Current track changed
    TrackChanged {
        /// ID of the new current track (`None` when cleared by a reload)
        track_id: Option<String>,
        /// ID of the previous track (if any)
        previous_track_id: Option<String>,
    },

    /// Shuffle toggled
    ShuffleChanged {
        enabled: bool,
    },

    /// Repeat mode changed
    RepeatChanged {
        mode: RepeatMode,
    },

    /// Volume changed
    VolumeChanged {
        /// New volume level (0.0-1.0)
        level: f32,
        /// Whether audio is muted
        is_muted: bool,
    },

    /// Track list replaced
    TracksReloaded {
        /// New list length
        length: usize,
    },
}

impl PlaybackEvent {
    /// The stream command carried by this event, if any
    pub fn as_stream_command(&self) -> Option<&StreamCommand> {
        match self {
            Self::Stream(cmd) => Some(cmd),
            _ => None,
        }
    }
}
