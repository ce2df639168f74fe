//! Audio effects processing
//!
//! Effects operate in place on interleaved stereo f32 samples.
//!
//! Available effects:
//! - **EqualizerProcessor**: fixed six-band equalizer (low shelf, four peaking, high shelf)

mod effect;
mod equalizer;
mod filter_band;

pub use effect::AudioEffect;
pub use equalizer::{
    band_label, clamp_gain, ActivePreset, EqualizerConfig, EqualizerGraph, EqualizerProcessor, BAND_COUNT,
    BAND_FREQUENCIES, BAND_TYPES, GAIN_STEP_DB, MAX_GAIN_DB, MIN_GAIN_DB,
};
pub use filter_band::{Band, FilterBand, FilterType};
