//! Tonearm - Playback Traversal
//!
//! Platform-agnostic track traversal for Tonearm.
//!
//! This crate provides:
//! - Transport state machine (Stopped, Playing, Paused)
//! - Next/previous resolution over an ordered track list
//! - Shuffle via a stored, uniformly random index permutation
//! - Repeat modes (Off, One, All)
//! - Volume control (0.0-1.0, mute/unmute)
//!
//! # Architecture
//!
//! `tonearm-playback` never touches an audio stream. Every transport action
//! queues a [`StreamCommand`] that the host's media layer executes, and the
//! host reports the end of a track back through
//! [`PlaybackController::on_track_ended`].
//!
//! # Example: Basic Traversal
//!
//! ```rust
//! use tonearm_playback::{PlaybackController, PlaybackConfig, RepeatMode, Track};
//!
//! let mut controller = PlaybackController::new(PlaybackConfig::default());
//! controller.set_tracks(vec![
//!     Track::new("a", "/music/a.mp3", "Track A"),
//!     Track::new("b", "/music/b.mp3", "Track B"),
//! ]);
//!
//! controller.select_index(0).unwrap();
//! controller.next();
//! assert_eq!(controller.current_track().unwrap().id, "b");
//!
//! // End of the list with repeat off stops playback
//! controller.next();
//! assert!(!controller.is_playing());
//!
//! controller.set_repeat(RepeatMode::All);
//! controller.next();
//! assert_eq!(controller.current_track().unwrap().id, "a");
//! ```
//!
//! # Example: Driving the Stream
//!
//! ```rust
//! use tonearm_playback::{PlaybackController, PlaybackEvent, StreamCommand, Track};
//!
//! let mut controller = PlaybackController::default();
//! controller.set_tracks(vec![Track::new("a", "/music/a.mp3", "Track A")]);
//! controller.select_track("a").unwrap();
//!
//! for event in controller.drain_events() {
//!     if let PlaybackEvent::Stream(command) = event {
//!         match command {
//!             StreamCommand::Load(track) => { /* open track.path */ }
//!             StreamCommand::Play => { /* start output */ }
//!             _ => {}
//!         }
//!     }
//! }
//! ```

mod controller;
mod error;
mod events;
mod shuffle;
pub mod types;
mod volume;

// Public exports
pub use controller::PlaybackController;
pub use error::{PlaybackError, Result};
pub use events::{PlaybackEvent, StreamCommand};
pub use shuffle::ShuffleOrderGenerator;
pub use types::{PlaybackConfig, PlaybackSnapshot, PlaybackStatus, RepeatMode, Track};
pub use volume::Volume;
