//! Tonearm - Equalizer and Spectrum
//!
//! Fixed six-band equalizer with presets, plus a pull-based spectrum sampler
//! for visualizing the equalizer output.
//!
//! This crate provides:
//! - Six cascaded biquad bands (60Hz low shelf, 170Hz-3.5kHz peaking, 10kHz high shelf)
//! - Built-in presets (flat, pop, rock, jazz, classical) and unique user presets
//! - Lock-free gain sharing between the control and audio threads
//! - Spectrum frames of 6 bands x 12 segments, normalized to [0, 1]
//!
//! # Architecture
//!
//! [`EqualizerGraph`] is the control surface. It hands out
//! [`EqualizerProcessor`]s for the host's audio thread, and an [`OutputTap`]
//! that a [`SpectrumSampler`] reads whenever the UI wants a new frame.
//! Nothing in this crate opens an audio device or spawns a thread.
//!
//! # Example
//!
//! ```rust
//! use tonearm_audio::{AudioEffect, EqualizerGraph, SpectrumSampler};
//!
//! let mut eq = EqualizerGraph::default();
//! eq.apply_preset("rock");
//! assert_eq!(eq.get_bands(), [4.0, 2.0, -2.0, -2.0, 2.0, 4.0]);
//! assert_eq!(eq.active_preset().name(), "rock");
//!
//! eq.set_band(2, 15.0);
//! assert_eq!(eq.get_bands()[2], 12.0);
//! assert_eq!(eq.active_preset().name(), "custom");
//!
//! // Audio thread
//! let mut processor = eq.processor();
//! let mut buffer = vec![0.0f32; 1024];
//! processor.process(&mut buffer, 44100);
//!
//! // Render loop
//! let mut sampler = SpectrumSampler::with_defaults(eq.output_tap()).unwrap();
//! let frame = sampler.sample_frame();
//! assert!(frame.per_band.iter().flatten().all(|v| (0.0..=1.0).contains(v)));
//! ```

mod atomic;
pub mod effects;
mod error;
pub mod presets;
pub mod spectrum;

pub use effects::{
    ActivePreset, AudioEffect, Band, EqualizerConfig, EqualizerGraph, EqualizerProcessor, FilterType, BAND_COUNT,
    BAND_FREQUENCIES, MAX_GAIN_DB, MIN_GAIN_DB,
};
pub use error::{PresetError, SpectrumError};
pub use presets::{Preset, PresetSink, PresetStore, BUILTIN_PRESETS, FLAT_PRESET};
pub use spectrum::{OutputTap, SpectrumConfig, SpectrumFrame, SpectrumSampler, SEGMENTS_PER_BAND};
