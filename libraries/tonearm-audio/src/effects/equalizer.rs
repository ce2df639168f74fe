//! Six-band equalizer
//!
//! Split in two halves:
//! - [`EqualizerGraph`] lives on the control thread. It owns the band gains,
//!   the preset store and the active-preset bookkeeping.
//! - [`EqualizerProcessor`] lives on the audio thread. It runs the filter
//!   cascade (band 0 -> band 5) and feeds the [`OutputTap`].
//!
//! The two share an array of atomic gains. Each gain is an independent scalar,
//! so no lock is needed and a multi-band update is never atomic as a whole.

use super::effect::AudioEffect;
use super::filter_band::{Band, FilterBand, FilterType};
use crate::atomic::AtomicF32;
use crate::error::PresetError;
use crate::presets::{Preset, PresetStore, FLAT_PRESET};
use crate::spectrum::OutputTap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Number of equalizer bands
pub const BAND_COUNT: usize = 6;

/// Band frequencies in Hz, low to high
pub const BAND_FREQUENCIES: [f32; BAND_COUNT] = [60.0, 170.0, 350.0, 1000.0, 3500.0, 10000.0];

/// Filter kind per band: shelves at the edges, peaking in between
pub const BAND_TYPES: [FilterType; BAND_COUNT] = [
    FilterType::LowShelf,
    FilterType::Peaking,
    FilterType::Peaking,
    FilterType::Peaking,
    FilterType::Peaking,
    FilterType::HighShelf,
];

/// Lowest band gain in dB
pub const MIN_GAIN_DB: f32 = -12.0;

/// Highest band gain in dB
pub const MAX_GAIN_DB: f32 = 12.0;

/// Slider granularity in dB
pub const GAIN_STEP_DB: f32 = 0.5;

/// Default samples kept by the output tap
const DEFAULT_TAP_CAPACITY: usize = 4096;

/// Equalizer filter shape configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EqualizerConfig {
    /// Q of the four peaking bands (default: 1.0)
    pub peaking_q: f32,

    /// Slope S of the two shelf bands (default: 1.0)
    pub shelf_slope: f32,

    /// Samples retained by the output tap for spectrum analysis
    pub tap_capacity: usize,
}

impl Default for EqualizerConfig {
    fn default() -> Self {
        Self {
            peaking_q: 1.0,
            shelf_slope: 1.0,
            tap_capacity: DEFAULT_TAP_CAPACITY,
        }
    }
}

/// Which preset the current gains correspond to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivePreset {
    /// Gains equal this preset's vector
    Named(String),
    /// Gains match no known preset
    Custom,
}

impl ActivePreset {
    /// Display name, `"custom"` for the sentinel
    pub fn name(&self) -> &str {
        match self {
            Self::Named(name) => name,
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for ActivePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Gains shared between the control and audio threads
#[derive(Debug, Default)]
struct SharedGains {
    gains: [AtomicF32; BAND_COUNT],
}

impl SharedGains {
    fn snapshot(&self) -> [f32; BAND_COUNT] {
        std::array::from_fn(|i| self.gains[i].get())
    }
}

/// Clamp a gain into the band range
///
/// NaN is rejected (`None`); everything else is clamped.
pub fn clamp_gain(gain_db: f32) -> Option<f32> {
    if gain_db.is_nan() {
        None
    } else {
        Some(gain_db.clamp(MIN_GAIN_DB, MAX_GAIN_DB))
    }
}

/// Display label for a band frequency (`60Hz`, `3.5kHz`, ...)
pub fn band_label(frequency: f32) -> String {
    if frequency >= 1000.0 {
        let khz = frequency / 1000.0;
        if khz.fract() == 0.0 {
            format!("{}kHz", khz as u32)
        } else {
            format!("{:.1}kHz", khz)
        }
    } else {
        format!("{}Hz", frequency as u32)
    }
}

/// Control-side equalizer
///
/// Gain writes are visible to every [`EqualizerProcessor`] created from this
/// graph on its next processed block.
pub struct EqualizerGraph {
    gains: Arc<SharedGains>,
    config: EqualizerConfig,
    presets: PresetStore,
    last_preset: Option<String>,
    tap: OutputTap,
}

impl EqualizerGraph {
    /// Create a flat equalizer
    pub fn new(presets: PresetStore) -> Self {
        Self::with_config(EqualizerConfig::default(), presets)
    }

    /// Create a flat equalizer with custom filter shapes
    pub fn with_config(config: EqualizerConfig, presets: PresetStore) -> Self {
        Self {
            gains: Arc::new(SharedGains::default()),
            config,
            presets,
            last_preset: Some(FLAT_PRESET.to_string()),
            tap: OutputTap::new(config.tap_capacity),
        }
    }

    /// Create an audio-thread processor driven by this graph's gains
    pub fn processor(&self) -> EqualizerProcessor {
        EqualizerProcessor::new(Arc::clone(&self.gains), self.config, self.tap.clone())
    }

    /// Tap at the end of the cascade, for the spectrum sampler
    pub fn output_tap(&self) -> OutputTap {
        self.tap.clone()
    }

    /// Set one band's gain
    ///
    /// Out-of-range indices are ignored; gains are clamped to ±12 dB.
    pub fn set_band(&mut self, index: usize, gain_db: f32) {
        let Some(cell) = self.gains.gains.get(index) else {
            debug!(index, "Ignoring gain for nonexistent band");
            return;
        };
        let Some(gain) = clamp_gain(gain_db) else {
            debug!(index, "Ignoring NaN gain");
            return;
        };
        cell.set(gain);
    }

    /// Set bands in order, one `set_band` per value
    pub fn set_bands(&mut self, gains: &[f32]) {
        for (index, &gain) in gains.iter().enumerate() {
            self.set_band(index, gain);
        }
    }

    /// Apply a preset by name (built-ins first, then user presets)
    ///
    /// Unknown names are ignored. Returns whether a preset was applied.
    pub fn apply_preset(&mut self, name: &str) -> bool {
        let Some(gains) = self.presets.get(name) else {
            debug!(name, "Unknown preset, ignoring");
            return false;
        };
        self.set_bands(&gains);
        self.last_preset = Some(name.to_string());
        debug!(name, "Applied preset");
        true
    }

    /// Current gains, exactly as last written
    pub fn get_bands(&self) -> [f32; BAND_COUNT] {
        self.gains.snapshot()
    }

    /// Band descriptors (frequency, kind, gain)
    pub fn bands(&self) -> [Band; BAND_COUNT] {
        let gains = self.get_bands();
        std::array::from_fn(|i| Band {
            frequency: BAND_FREQUENCIES[i],
            filter_type: BAND_TYPES[i],
            gain_db: gains[i],
        })
    }

    /// Display labels for the bands
    pub fn band_labels() -> [String; BAND_COUNT] {
        std::array::from_fn(|i| band_label(BAND_FREQUENCIES[i]))
    }

    /// All gains back to 0 dB
    pub fn reset(&mut self) {
        self.apply_preset(FLAT_PRESET);
    }

    /// The preset the current gains correspond to
    ///
    /// Prefers the most recently applied preset when its gains still match,
    /// then any built-in, then any user preset.
    pub fn active_preset(&self) -> ActivePreset {
        let gains = self.get_bands();

        if let Some(name) = &self.last_preset {
            if self.presets.get(name) == Some(gains) {
                return ActivePreset::Named(name.clone());
            }
        }

        self.presets
            .find_by_gains(&gains)
            .map_or(ActivePreset::Custom, |name| ActivePreset::Named(name.to_string()))
    }

    /// Save the current gains as a user preset
    pub fn save_user_preset(&mut self, name: &str) -> Result<(), PresetError> {
        let gains = self.get_bands();
        self.presets.save_user_preset(name, gains)?;
        self.last_preset = Some(name.trim().to_string());
        Ok(())
    }

    /// Delete a user preset, falling back to flat if it was active
    pub fn delete_user_preset(&mut self, name: &str) -> bool {
        let name = name.trim();
        let was_active = self.active_preset() == ActivePreset::Named(name.to_string());
        if !self.presets.delete_user_preset(name) {
            return false;
        }
        if was_active {
            debug!(name, "Deleted the active preset, falling back to flat");
            self.reset();
        }
        true
    }

    /// Preset store (read-only)
    pub fn presets(&self) -> &PresetStore {
        &self.presets
    }

    /// Replace user presets, e.g. after the persistence layer reloads them
    pub fn load_user_presets(&mut self, presets: Vec<Preset>) {
        self.presets.replace_user_presets(presets);
        if let Some(name) = &self.last_preset {
            if !self.presets.contains(name) {
                warn!(name, "Active preset vanished on reload");
                self.last_preset = None;
            }
        }
    }
}

impl Default for EqualizerGraph {
    fn default() -> Self {
        Self::new(PresetStore::new())
    }
}

/// Audio-thread half of the equalizer
///
/// Runs the six-band cascade over interleaved stereo and writes the mono mix
/// of the result into the output tap. When disabled it passes audio through
/// untouched but still feeds the tap.
pub struct EqualizerProcessor {
    gains: Arc<SharedGains>,
    filters: [FilterBand; BAND_COUNT],
    sample_rate: u32,
    enabled: bool,
    tap: OutputTap,
}

impl EqualizerProcessor {
    fn new(gains: Arc<SharedGains>, config: EqualizerConfig, tap: OutputTap) -> Self {
        let filters = std::array::from_fn(|i| {
            let shape = match BAND_TYPES[i] {
                FilterType::Peaking => config.peaking_q,
                FilterType::LowShelf | FilterType::HighShelf => config.shelf_slope,
            };
            FilterBand::new(BAND_TYPES[i], BAND_FREQUENCIES[i], shape)
        });

        Self {
            gains,
            filters,
            sample_rate: 0,
            enabled: true,
            tap,
        }
    }

    /// Gains the filters are currently configured with
    pub fn applied_gains(&self) -> [f32; BAND_COUNT] {
        std::array::from_fn(|i| self.filters[i].gain_db())
    }

    /// Pick up gain or sample-rate changes since the last block
    fn sync_coefficients(&mut self, sample_rate: u32) {
        let rate_changed = sample_rate != self.sample_rate;
        self.sample_rate = sample_rate;

        for (filter, cell) in self.filters.iter_mut().zip(self.gains.gains.iter()) {
            let gain = cell.get();
            if rate_changed || gain != filter.gain_db() {
                filter.configure(sample_rate, gain);
            }
        }
    }
}

impl AudioEffect for EqualizerProcessor {
    fn process(&mut self, buffer: &mut [f32], sample_rate: u32) {
        if self.enabled {
            self.sync_coefficients(sample_rate);
        }

        for frame in buffer.chunks_exact_mut(2) {
            let (mut left, mut right) = (frame[0], frame[1]);
            if self.enabled {
                for filter in &mut self.filters {
                    (left, right) = filter.process_frame(left, right);
                }
                frame[0] = left;
                frame[1] = right;
            }
            self.tap.push((left + right) * 0.5);
        }
    }

    fn reset(&mut self) {
        for filter in &mut self.filters {
            filter.reset();
        }
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn name(&self) -> &str {
        "Equalizer"
    }
}
