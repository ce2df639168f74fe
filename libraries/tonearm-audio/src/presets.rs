//! Equalizer presets
//!
//! Built-in presets are fixed and name-reserved. User presets are kept in
//! insertion order, must have unique names, and are handed to an optional
//! [`PresetSink`] after every change so the host can persist them.

use crate::effects::{clamp_gain, BAND_COUNT};
use crate::error::PresetError;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Name of the all-zero preset
pub const FLAT_PRESET: &str = "flat";

/// Built-in presets in canonical order
pub const BUILTIN_PRESETS: [(&str, [f32; BAND_COUNT]); 5] = [
    (FLAT_PRESET, [0.0, 0.0, 0.0, 0.0, 0.0, 0.0]),
    ("pop", [0.0, 2.0, 4.0, 2.0, 0.0, -2.0]),
    ("rock", [4.0, 2.0, -2.0, -2.0, 2.0, 4.0]),
    ("jazz", [3.0, 2.0, 0.0, 2.0, 3.0, 4.0]),
    ("classical", [0.0, 0.0, 2.0, 4.0, 2.0, 0.0]),
];

/// A named gain vector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    pub name: String,
    pub gains: [f32; BAND_COUNT],
}

impl Preset {
    pub fn new(name: impl Into<String>, gains: [f32; BAND_COUNT]) -> Self {
        Self {
            name: name.into(),
            gains,
        }
    }
}

/// Receives the full user preset list after every save or delete
///
/// Fire-and-forget: the store does not wait for or read back a result.
pub trait PresetSink: Send {
    fn store(&self, presets: &[Preset]);
}

/// Built-in plus user-defined presets
#[derive(Default)]
pub struct PresetStore {
    user: Vec<Preset>,
    sink: Option<Box<dyn PresetSink>>,
}

impl PresetStore {
    /// Store with only the built-in presets
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with user presets loaded by the persistence layer
    ///
    /// Entries with empty, reserved or duplicate names are dropped.
    pub fn with_user_presets(presets: Vec<Preset>) -> Self {
        let mut store = Self::new();
        store.replace_user_presets(presets);
        store
    }

    /// Attach a persistence sink
    #[must_use]
    pub fn with_sink(mut self, sink: Box<dyn PresetSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Whether `name` is a built-in preset
    pub fn is_builtin(name: &str) -> bool {
        BUILTIN_PRESETS.iter().any(|(builtin, _)| *builtin == name)
    }

    /// Built-in names in canonical order
    pub fn builtin_names() -> impl Iterator<Item = &'static str> {
        BUILTIN_PRESETS.iter().map(|(name, _)| *name)
    }

    /// User preset names in insertion order
    pub fn user_names(&self) -> impl Iterator<Item = &str> {
        self.user.iter().map(|p| p.name.as_str())
    }

    /// User presets in insertion order
    pub fn user_presets(&self) -> &[Preset] {
        &self.user
    }

    /// Look up gains by exact name, built-ins first
    pub fn get(&self, name: &str) -> Option<[f32; BAND_COUNT]> {
        BUILTIN_PRESETS
            .iter()
            .find(|(builtin, _)| *builtin == name)
            .map(|(_, gains)| *gains)
            .or_else(|| self.user.iter().find(|p| p.name == name).map(|p| p.gains))
    }

    /// Whether any preset has this name
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// First preset whose gains equal `gains` exactly, built-ins first
    pub fn find_by_gains(&self, gains: &[f32; BAND_COUNT]) -> Option<&str> {
        BUILTIN_PRESETS
            .iter()
            .find(|(_, g)| g == gains)
            .map(|(name, _)| *name)
            .or_else(|| {
                self.user
                    .iter()
                    .find(|p| &p.gains == gains)
                    .map(|p| p.name.as_str())
            })
    }

    /// Save a user preset
    ///
    /// The name is trimmed; the match against existing names is exact and
    /// case-sensitive. Gains are clamped to the band range.
    pub fn save_user_preset(&mut self, name: &str, gains: [f32; BAND_COUNT]) -> Result<(), PresetError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(PresetError::EmptyName);
        }
        if self.contains(name) {
            debug!(name, "Preset name already exists");
            return Err(PresetError::NameConflict(name.to_string()));
        }

        let gains = gains.map(|g| clamp_gain(g).unwrap_or(0.0));
        self.user.push(Preset::new(name, gains));
        debug!(name, count = self.user.len(), "Saved user preset");
        self.persist();
        Ok(())
    }

    /// Delete a user preset
    ///
    /// The name is trimmed like on save. Built-in and unknown names are
    /// ignored. Returns whether a preset was removed.
    pub fn delete_user_preset(&mut self, name: &str) -> bool {
        let name = name.trim();
        if Self::is_builtin(name) {
            debug!(name, "Refusing to delete built-in preset");
            return false;
        }
        let Some(pos) = self.user.iter().position(|p| p.name == name) else {
            return false;
        };
        self.user.remove(pos);
        debug!(name, "Deleted user preset");
        self.persist();
        true
    }

    /// Replace the user presets wholesale, without notifying the sink
    pub fn replace_user_presets(&mut self, presets: Vec<Preset>) {
        self.user.clear();
        for preset in presets {
            let name = preset.name.trim();
            if name.is_empty() || self.contains(name) {
                warn!(name = %preset.name, "Dropping invalid or duplicate user preset");
                continue;
            }
            let gains = preset.gains.map(|g| clamp_gain(g).unwrap_or(0.0));
            self.user.push(Preset::new(name, gains));
        }
    }

    fn persist(&self) {
        if let Some(sink) = &self.sink {
            sink.store(&self.user);
        }
    }
}

impl std::fmt::Debug for PresetStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PresetStore")
            .field("user", &self.user)
            .field("has_sink", &self.sink.is_some())
            .finish()
    }
}
