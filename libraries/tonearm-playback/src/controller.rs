//! Playback controller - traversal state machine
//!
//! Resolves next/previous tracks under shuffle and repeat modes and drives the
//! Stopped/Playing/Paused transitions. Side effects on the real audio stream
//! are reported as [`StreamCommand`]s through the event queue.

use crate::{
    error::{PlaybackError, Result},
    events::{PlaybackEvent, StreamCommand},
    shuffle::ShuffleOrderGenerator,
    types::{PlaybackConfig, PlaybackSnapshot, PlaybackStatus, RepeatMode, Track},
    volume::Volume,
};
use tracing::debug;

/// Direction of a navigation step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Forward,
    Backward,
}

/// Track-level playback state machine
///
/// Play state (stopped/playing/paused) and the mode flags (shuffle, repeat)
/// are orthogonal. The track list is owned by the caller and replaced
/// wholesale through [`PlaybackController::set_tracks`].
///
/// Invariants:
/// - `shuffled_order` is non-empty only while shuffle is on and there are at
///   least two tracks; when non-empty it is a permutation of `0..tracks.len()`.
/// - `current_track`, when set, is an element of `tracks` (compared by id).
pub struct PlaybackController {
    // State
    status: PlaybackStatus,
    current_track: Option<Track>,
    tracks: Vec<Track>,

    // Modes
    shuffle: bool,
    repeat: RepeatMode,
    shuffled_order: Vec<usize>,
    shuffler: ShuffleOrderGenerator,

    volume: Volume,

    // Event queue for the host (stream intents + UI sync)
    pending_events: Vec<PlaybackEvent>,
}

impl PlaybackController {
    /// Create a controller with an entropy-seeded shuffler
    pub fn new(config: PlaybackConfig) -> Self {
        Self::with_shuffler(config, ShuffleOrderGenerator::new())
    }

    /// Create a controller with a specific shuffle generator
    pub fn with_shuffler(config: PlaybackConfig, shuffler: ShuffleOrderGenerator) -> Self {
        Self {
            status: PlaybackStatus::Stopped,
            current_track: None,
            tracks: Vec::new(),
            shuffle: config.shuffle,
            repeat: config.repeat,
            shuffled_order: Vec::new(),
            shuffler,
            volume: Volume::new(config.volume),
            pending_events: Vec::new(),
        }
    }

    // ===== Track List =====

    /// Replace the track list (library reload)
    ///
    /// Discards the shuffled order. The current track survives only if a
    /// track with the same id is in the new list; otherwise it is cleared and
    /// playback stops.
    pub fn set_tracks(&mut self, tracks: Vec<Track>) {
        debug!(count = tracks.len(), "Reloading track list");
        self.tracks = tracks;
        self.shuffled_order.clear();

        if let Some(current) = self.current_track.take() {
            match self.tracks.iter().find(|t| t.same_as(&current)) {
                Some(fresh) => self.current_track = Some(fresh.clone()),
                None => {
                    debug!(track_id = %current.id, "Current track gone after reload");
                    if self.status != PlaybackStatus::Stopped {
                        self.emit_stream(StreamCommand::Stop);
                        self.set_status(PlaybackStatus::Stopped);
                    }
                    self.pending_events.push(PlaybackEvent::TrackChanged {
                        track_id: None,
                        previous_track_id: Some(current.id),
                    });
                }
            }
        }

        self.pending_events.push(PlaybackEvent::TracksReloaded {
            length: self.tracks.len(),
        });
    }

    /// Make the track at `index` current and start playing it
    pub fn select_index(&mut self, index: usize) -> Result<()> {
        if index >= self.tracks.len() {
            return Err(PlaybackError::IndexOutOfBounds {
                index,
                len: self.tracks.len(),
            });
        }
        self.go_to(index);
        Ok(())
    }

    /// Make the track with `id` current and start playing it
    pub fn select_track(&mut self, id: &str) -> Result<()> {
        let index = self
            .tracks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| PlaybackError::TrackNotFound(id.to_string()))?;
        self.go_to(index);
        Ok(())
    }

    // ===== Transport =====

    /// Start or resume playback of the current track
    ///
    /// No-op without a current track or when already playing.
    pub fn play(&mut self) {
        if self.current_track.is_none() {
            debug!("play() ignored: no current track");
            return;
        }
        if self.status == PlaybackStatus::Playing {
            return;
        }
        self.emit_stream(StreamCommand::Play);
        self.set_status(PlaybackStatus::Playing);
    }

    /// Pause playback (only from Playing)
    pub fn pause(&mut self) {
        if self.status == PlaybackStatus::Playing {
            self.emit_stream(StreamCommand::Pause);
            self.set_status(PlaybackStatus::Paused);
        }
    }

    /// Rewind the stream to zero and stop
    ///
    /// The current track is kept so `play()` starts it again from the top.
    pub fn stop(&mut self) {
        self.emit_stream(StreamCommand::Stop);
        self.set_status(PlaybackStatus::Stopped);
    }

    /// Advance to the next track
    ///
    /// Wrapping past the end of the list (or of the shuffled order) stops
    /// playback instead when repeat is off.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) {
        let Some((index, wrapped)) = self.resolve(Step::Forward) else {
            return;
        };

        if wrapped && self.repeat == RepeatMode::Off {
            debug!("Reached end of list with repeat off, stopping");
            self.stop();
            return;
        }

        self.go_to(index);
    }

    /// Step back to the previous track
    ///
    /// Backward wraparound is unconditional: unlike `next()` it never stops,
    /// whatever the repeat mode.
    pub fn prev(&mut self) {
        if let Some((index, _)) = self.resolve(Step::Backward) {
            self.go_to(index);
        }
    }

    /// Handle the stream reporting that the current track finished
    pub fn on_track_ended(&mut self) {
        if self.repeat == RepeatMode::One && self.current_track.is_some() {
            debug!("Repeat one: restarting current track");
            self.emit_stream(StreamCommand::Restart);
            self.set_status(PlaybackStatus::Playing);
            return;
        }
        self.next();
    }

    // ===== Shuffle & Repeat =====

    /// Enable or disable shuffle
    ///
    /// Every enable generates a fresh order (with at least two tracks), also
    /// when shuffle is already on; turning it off always discards the order.
    /// The current track is never changed.
    pub fn set_shuffle(&mut self, enabled: bool) {
        if enabled {
            self.shuffled_order = if self.tracks.len() > 1 {
                self.shuffler.generate(self.tracks.len())
            } else {
                Vec::new()
            };
            debug!(order_len = self.shuffled_order.len(), "Shuffle order regenerated");
            if self.shuffle {
                return;
            }
            self.shuffle = true;
        } else {
            self.shuffled_order.clear();
            if !self.shuffle {
                return;
            }
            self.shuffle = false;
            debug!("Shuffle disabled");
        }
        self.pending_events
            .push(PlaybackEvent::ShuffleChanged { enabled });
    }

    /// Flip the shuffle flag
    pub fn toggle_shuffle(&mut self) {
        self.set_shuffle(!self.shuffle);
    }

    /// Set repeat mode
    pub fn set_repeat(&mut self, mode: RepeatMode) {
        if self.repeat == mode {
            return;
        }
        debug!(%mode, "Repeat mode changed");
        self.repeat = mode;
        self.pending_events
            .push(PlaybackEvent::RepeatChanged { mode });
    }

    /// Advance repeat mode: off -> all -> one -> off
    pub fn cycle_repeat(&mut self) -> RepeatMode {
        self.set_repeat(self.repeat.cycle());
        self.repeat
    }

    // ===== Volume =====

    /// Set volume (clamped to 0.0-1.0)
    pub fn set_volume(&mut self, level: f32) {
        self.volume.set_level(level);
        self.emit_volume_changed();
    }

    /// Mute without losing the level
    pub fn mute(&mut self) {
        self.volume.mute();
        self.emit_volume_changed();
    }

    /// Restore the level after a mute
    pub fn unmute(&mut self) {
        self.volume.unmute();
        self.emit_volume_changed();
    }

    /// Flip the mute flag
    pub fn toggle_mute(&mut self) {
        self.volume.toggle_mute();
        self.emit_volume_changed();
    }

    // ===== State Queries =====

    /// Current transport status
    pub fn status(&self) -> PlaybackStatus {
        self.status
    }

    /// Whether the stream should be producing audio
    pub fn is_playing(&self) -> bool {
        self.status == PlaybackStatus::Playing
    }

    /// Currently resolved track
    pub fn current_track(&self) -> Option<&Track> {
        self.current_track.as_ref()
    }

    /// Position of the current track in the list
    pub fn current_index(&self) -> Option<usize> {
        let current = self.current_track.as_ref()?;
        self.tracks.iter().position(|t| t.same_as(current))
    }

    /// The track list in library order
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Shuffle flag
    pub fn shuffle(&self) -> bool {
        self.shuffle
    }

    /// Repeat mode
    pub fn repeat(&self) -> RepeatMode {
        self.repeat
    }

    /// Stored shuffle permutation (empty when shuffle is off)
    pub fn shuffled_order(&self) -> &[usize] {
        &self.shuffled_order
    }

    /// Volume level (0.0-1.0), ignoring mute
    pub fn volume(&self) -> f32 {
        self.volume.level()
    }

    /// Volume the stream should use (0.0 when muted)
    pub fn effective_volume(&self) -> f32 {
        self.volume.effective()
    }

    /// Whether audio is muted
    pub fn is_muted(&self) -> bool {
        self.volume.is_muted()
    }

    /// Serializable copy of the whole state
    pub fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            tracks: self.tracks.clone(),
            current_track: self.current_track.clone(),
            status: self.status,
            is_playing: self.is_playing(),
            shuffle: self.shuffle,
            repeat: self.repeat,
            shuffled_order: self.shuffled_order.clone(),
            volume: self.volume.level(),
            muted: self.volume.is_muted(),
        }
    }

    // ===== Events =====

    /// Take all queued events
    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Check whether events are waiting
    pub fn has_pending_events(&self) -> bool {
        !self.pending_events.is_empty()
    }

    // ===== Internals =====

    /// Resolve the neighbouring track index
    ///
    /// Returns the target index and whether the step wrapped around the end
    /// (or start) of the traversal sequence. `None` only for an empty list.
    fn resolve(&self, step: Step) -> Option<(usize, bool)> {
        let len = self.tracks.len();
        if len == 0 {
            return None;
        }

        // A current track missing from the list cannot happen while the
        // invariants hold; treat it as index 0.
        let index = self.current_index().unwrap_or(0);

        if self.shuffle && !self.shuffled_order.is_empty() {
            let order = &self.shuffled_order;
            let pos = order.iter().position(|&i| i == index).unwrap_or(0);
            let (target_pos, wrapped) = step_modulo(pos, order.len(), step);
            if let Some(&target) = order.get(target_pos).filter(|&&i| i < len) {
                return Some((target, wrapped));
            }
        }

        Some(step_modulo(index, len, step))
    }

    fn go_to(&mut self, index: usize) {
        let track = self.tracks[index].clone();
        let same_track = self
            .current_track
            .as_ref()
            .is_some_and(|current| current.same_as(&track));

        if same_track {
            self.emit_stream(StreamCommand::Restart);
        } else {
            let previous_track_id = self.current_track.as_ref().map(|t| t.id.clone());
            debug!(track_id = %track.id, index, "Track changed");
            self.pending_events.push(PlaybackEvent::TrackChanged {
                track_id: Some(track.id.clone()),
                previous_track_id,
            });
            self.emit_stream(StreamCommand::Load(track.clone()));
            self.emit_stream(StreamCommand::Play);
        }

        self.current_track = Some(track);
        self.set_status(PlaybackStatus::Playing);
    }

    fn set_status(&mut self, status: PlaybackStatus) {
        if self.status == status {
            return;
        }
        debug!(from = ?self.status, to = ?status, "Playback status changed");
        self.status = status;
        self.pending_events
            .push(PlaybackEvent::StateChanged { status });
    }

    fn emit_stream(&mut self, command: StreamCommand) {
        self.pending_events.push(PlaybackEvent::Stream(command));
    }

    fn emit_volume_changed(&mut self) {
        self.pending_events.push(PlaybackEvent::VolumeChanged {
            level: self.volume.level(),
            is_muted: self.volume.is_muted(),
        });
    }
}

impl Default for PlaybackController {
    fn default() -> Self {
        Self::new(PlaybackConfig::default())
    }
}

/// One modular step through a sequence of `len` positions
fn step_modulo(pos: usize, len: usize, step: Step) -> (usize, bool) {
    match step {
        Step::Forward => {
            let next = (pos + 1) % len;
            (next, next == 0)
        }
        Step::Backward => {
            let prev = (pos + len - 1) % len;
            (prev, pos == 0)
        }
    }
}
