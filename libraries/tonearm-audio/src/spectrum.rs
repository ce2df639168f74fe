//! Spectrum sampling for equalizer visuals
//!
//! The equalizer processor writes its output into an [`OutputTap`]. The host's
//! render loop calls [`SpectrumSampler::sample_frame`] whenever it wants a new
//! picture; each call reads the latest tap window, runs one FFT and folds the
//! bins into a [`SpectrumFrame`] of 6 bands x 12 segments.
//!
//! Frames are independent. Skipping, delaying or sampling stale data is
//! harmless and nothing here feeds back into playback or gain state.

use crate::atomic::AtomicF32;
use crate::effects::BAND_COUNT;
use crate::error::SpectrumError;
use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Segments per band in a frame
pub const SEGMENTS_PER_BAND: usize = 12;

/// Spectrum analysis configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpectrumConfig {
    /// FFT size in samples; yields `fft_size / 2` frequency bins (default: 256)
    pub fft_size: usize,

    /// Bin level mapped to 0.0 (default: -100 dB)
    pub min_decibels: f32,

    /// Bin level mapped to 1.0, the largest representable magnitude (default: -30 dB)
    pub max_decibels: f32,
}

impl Default for SpectrumConfig {
    fn default() -> Self {
        Self {
            fft_size: 256,
            min_decibels: -100.0,
            max_decibels: -30.0,
        }
    }
}

impl SpectrumConfig {
    fn validate(&self) -> Result<(), SpectrumError> {
        if !self.fft_size.is_power_of_two() || !(32..=32768).contains(&self.fft_size) {
            return Err(SpectrumError::InvalidFftSize(self.fft_size));
        }
        if self.min_decibels.is_nan() || self.max_decibels.is_nan() || self.max_decibels <= self.min_decibels {
            return Err(SpectrumError::InvalidDecibelRange {
                min: self.min_decibels,
                max: self.max_decibels,
            });
        }
        Ok(())
    }
}

/// One picture of the spectrum: per band, per segment intensity in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpectrumFrame {
    pub per_band: [[f32; SEGMENTS_PER_BAND]; BAND_COUNT],
}

impl SpectrumFrame {
    /// All segments dark
    pub fn silent() -> Self {
        Self {
            per_band: [[0.0; SEGMENTS_PER_BAND]; BAND_COUNT],
        }
    }

    /// Segment values for one band
    pub fn band(&self, index: usize) -> Option<&[f32; SEGMENTS_PER_BAND]> {
        self.per_band.get(index)
    }

    /// Mean intensity of one band
    pub fn band_level(&self, index: usize) -> f32 {
        self.band(index)
            .map_or(0.0, |segments| segments.iter().sum::<f32>() / SEGMENTS_PER_BAND as f32)
    }
}

impl Default for SpectrumFrame {
    fn default() -> Self {
        Self::silent()
    }
}

#[derive(Debug)]
struct TapBuffer {
    samples: Box<[AtomicF32]>,
    write_pos: AtomicUsize,
}

/// Lock-free ring of the most recent output samples
///
/// The audio thread pushes, the sampler reads. Reads racing a write may see a
/// mix of old and new samples, which is fine for visualization.
#[derive(Debug, Clone)]
pub struct OutputTap {
    inner: Arc<TapBuffer>,
}

impl OutputTap {
    /// Create a tap holding at least `capacity` samples
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1).next_power_of_two();
        let samples = (0..capacity).map(|_| AtomicF32::new(0.0)).collect();
        Self {
            inner: Arc::new(TapBuffer {
                samples,
                write_pos: AtomicUsize::new(0),
            }),
        }
    }

    /// Number of samples retained
    pub fn capacity(&self) -> usize {
        self.inner.samples.len()
    }

    /// Append one sample, overwriting the oldest
    #[inline]
    pub fn push(&self, sample: f32) {
        let pos = self.inner.write_pos.fetch_add(1, Ordering::AcqRel);
        // capacity is a power of two, so the modulo survives counter wraparound
        self.inner.samples[pos % self.capacity()].store(sample, Ordering::Relaxed);
    }

    /// Copy the newest `out.len()` samples, oldest first
    ///
    /// Slots never written read as silence. `out` longer than the capacity
    /// is zero-padded at the front.
    pub fn read_latest(&self, out: &mut [f32]) {
        let capacity = self.capacity();
        let end = self.inner.write_pos.load(Ordering::Acquire);
        let n = out.len().min(capacity);
        let pad = out.len() - n;

        out[..pad].fill(0.0);
        for (i, slot) in out[pad..].iter_mut().enumerate() {
            let pos = end.wrapping_sub(n - i) % capacity;
            *slot = self.inner.samples[pos].load(Ordering::Relaxed);
        }
    }

    /// Forget everything written so far
    pub fn clear(&self) {
        for sample in self.inner.samples.iter() {
            sample.store(0.0, Ordering::Relaxed);
        }
        self.inner.write_pos.store(0, Ordering::Release);
    }
}

/// Pull-based spectrum sampler
pub struct SpectrumSampler {
    tap: OutputTap,
    config: SpectrumConfig,
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    time: Vec<f32>,
    buffer: Vec<Complex<f32>>,
    scratch: Vec<Complex<f32>>,
    levels: Vec<f32>,
    latest: SpectrumFrame,
}

impl SpectrumSampler {
    /// Create a sampler reading from `tap`
    pub fn new(tap: OutputTap, config: SpectrumConfig) -> Result<Self, SpectrumError> {
        config.validate()?;
        if config.fft_size > tap.capacity() {
            return Err(SpectrumError::TapTooSmall {
                fft_size: config.fft_size,
                capacity: tap.capacity(),
            });
        }

        let n = config.fft_size;
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(n);
        let scratch = vec![Complex::new(0.0, 0.0); fft.get_inplace_scratch_len()];

        // Hann window
        let window = (0..n)
            .map(|i| 0.5 * (1.0 - (2.0 * PI * i as f32 / n as f32).cos()))
            .collect();

        Ok(Self {
            tap,
            config,
            fft,
            window,
            time: vec![0.0; n],
            buffer: vec![Complex::new(0.0, 0.0); n],
            scratch,
            levels: vec![0.0; n / 2],
            latest: SpectrumFrame::silent(),
        })
    }

    /// Sampler with the default configuration
    pub fn with_defaults(tap: OutputTap) -> Result<Self, SpectrumError> {
        Self::new(tap, SpectrumConfig::default())
    }

    /// Active configuration
    pub fn config(&self) -> &SpectrumConfig {
        &self.config
    }

    /// Compute a fresh frame from the current tap contents
    pub fn sample_frame(&mut self) -> SpectrumFrame {
        self.tap.read_latest(&mut self.time);

        for ((slot, &sample), &w) in self.buffer.iter_mut().zip(&self.time).zip(&self.window) {
            *slot = Complex::new(sample * w, 0.0);
        }
        self.fft.process_with_scratch(&mut self.buffer, &mut self.scratch);

        let n = self.config.fft_size as f32;
        let range = self.config.max_decibels - self.config.min_decibels;
        for (level, bin) in self.levels.iter_mut().zip(&self.buffer) {
            let magnitude = bin.norm() / n;
            let db = 20.0 * magnitude.log10();
            let normalized = (db - self.config.min_decibels) / range;
            *level = if normalized.is_nan() {
                0.0
            } else {
                normalized.clamp(0.0, 1.0)
            };
        }

        self.latest = fold_levels(&self.levels);
        self.latest
    }

    /// The most recently computed frame
    pub fn latest(&self) -> &SpectrumFrame {
        &self.latest
    }

    /// Drop the last frame
    pub fn reset(&mut self) {
        self.latest = SpectrumFrame::silent();
    }
}

/// Fold normalized bin levels into bands and segments
///
/// Band `b` owns bins `floor(b/6 * len) .. floor((b+1)/6 * len)`; each band is
/// split the same way into 12 segments whose value is the mean of their bins.
/// Segments with no bins are 0.
pub fn fold_levels(levels: &[f32]) -> SpectrumFrame {
    let mut frame = SpectrumFrame::silent();

    for (band, segments) in frame.per_band.iter_mut().enumerate() {
        let bins = &levels[split(levels.len(), BAND_COUNT, band)];

        for (segment, value) in segments.iter_mut().enumerate() {
            let slice = &bins[split(bins.len(), SEGMENTS_PER_BAND, segment)];
            if !slice.is_empty() {
                *value = slice.iter().sum::<f32>() / slice.len() as f32;
            }
        }
    }

    frame
}

/// Range of part `index` when `len` items are split into `parts` floor-sized parts
fn split(len: usize, parts: usize, index: usize) -> std::ops::Range<usize> {
    (index * len / parts)..((index + 1) * len / parts)
}
