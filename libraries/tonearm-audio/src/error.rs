//! Equalizer and spectrum errors
use thiserror::Error;

/// Preset store errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PresetError {
    /// A built-in or user preset already has this name
    #[error("Preset already exists: {0}")]
    NameConflict(String),

    /// Name is empty after trimming
    #[error("Preset name must not be empty")]
    EmptyName,
}

/// Spectrum sampler configuration errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SpectrumError {
    /// FFT size is not a power of two in 32..=32768
    #[error("Invalid FFT size: {0} (must be a power of two between 32 and 32768)")]
    InvalidFftSize(usize),

    /// Decibel window is empty or inverted
    #[error("Invalid decibel range: min {min} dB, max {max} dB")]
    InvalidDecibelRange { min: f32, max: f32 },

    /// The tap cannot hold a full FFT window
    #[error("Output tap holds {capacity} samples, FFT needs {fft_size}")]
    TapTooSmall { fft_size: usize, capacity: usize },
}
