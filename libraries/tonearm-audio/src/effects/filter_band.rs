//! Single equalizer band
//!
//! A biquad filter (RBJ Audio EQ Cookbook) with a fixed kind and corner/center
//! frequency. Only the gain changes after construction; a new gain takes
//! effect on the next sample, without coefficient smoothing.
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// Filter kind for an EQ band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterType {
    /// Low shelf - boosts/cuts everything below the corner frequency
    LowShelf,
    /// Peaking - boosts/cuts a narrow band around the center frequency
    Peaking,
    /// High shelf - boosts/cuts everything above the corner frequency
    HighShelf,
}

/// Band descriptor exposed for display
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    /// Corner (shelf) or center (peaking) frequency in Hz
    pub frequency: f32,
    /// Filter kind
    pub filter_type: FilterType,
    /// Gain in dB
    pub gain_db: f32,
}

/// Normalized biquad coefficients (a0 == 1)
#[derive(Debug, Clone, Copy, PartialEq)]
struct Coefficients {
    b0: f32,
    b1: f32,
    b2: f32,
    a1: f32,
    a2: f32,
}

impl Coefficients {
    const IDENTITY: Self = Self {
        b0: 1.0,
        b1: 0.0,
        b2: 0.0,
        a1: 0.0,
        a2: 0.0,
    };

    /// Compute coefficients for a band
    ///
    /// `shape` is Q for peaking filters and the shelf slope S for shelves.
    fn compute(kind: FilterType, sample_rate: f32, frequency: f32, gain_db: f32, shape: f32) -> Self {
        if sample_rate < 1.0 || gain_db.abs() < 0.01 {
            return Self::IDENTITY;
        }

        let a = 10.0_f32.powf(gain_db / 40.0);
        // Keep the corner away from Nyquist to stay stable
        let frequency = frequency.min(sample_rate * 0.45);
        let omega = 2.0 * PI * frequency / sample_rate;
        let sin_omega = omega.sin();
        let cos_omega = omega.cos();

        let (b0, b1, b2, a0, a1, a2) = match kind {
            FilterType::Peaking => {
                let alpha = sin_omega / (2.0 * shape);
                (
                    1.0 + alpha * a,
                    -2.0 * cos_omega,
                    1.0 - alpha * a,
                    1.0 + alpha / a,
                    -2.0 * cos_omega,
                    1.0 - alpha / a,
                )
            }
            FilterType::LowShelf => {
                let alpha = sin_omega / 2.0 * ((a + 1.0 / a) * (1.0 / shape - 1.0) + 2.0).sqrt();
                let beta = 2.0 * a.sqrt() * alpha;
                (
                    a * ((a + 1.0) - (a - 1.0) * cos_omega + beta),
                    2.0 * a * ((a - 1.0) - (a + 1.0) * cos_omega),
                    a * ((a + 1.0) - (a - 1.0) * cos_omega - beta),
                    (a + 1.0) + (a - 1.0) * cos_omega + beta,
                    -2.0 * ((a - 1.0) + (a + 1.0) * cos_omega),
                    (a + 1.0) + (a - 1.0) * cos_omega - beta,
                )
            }
            FilterType::HighShelf => {
                let alpha = sin_omega / 2.0 * ((a + 1.0 / a) * (1.0 / shape - 1.0) + 2.0).sqrt();
                let beta = 2.0 * a.sqrt() * alpha;
                (
                    a * ((a + 1.0) + (a - 1.0) * cos_omega + beta),
                    -2.0 * a * ((a - 1.0) + (a + 1.0) * cos_omega),
                    a * ((a + 1.0) + (a - 1.0) * cos_omega - beta),
                    (a + 1.0) - (a - 1.0) * cos_omega + beta,
                    2.0 * ((a - 1.0) - (a + 1.0) * cos_omega),
                    (a + 1.0) - (a - 1.0) * cos_omega - beta,
                )
            }
        };

        Self {
            b0: b0 / a0,
            b1: b1 / a0,
            b2: b2 / a0,
            a1: a1 / a0,
            a2: a2 / a0,
        }
    }
}

/// Direct form I history for one channel
#[derive(Debug, Clone, Copy, Default)]
struct ChannelState {
    x1: f32,
    x2: f32,
    y1: f32,
    y2: f32,
}

impl ChannelState {
    #[inline]
    fn tick(&mut self, c: &Coefficients, input: f32) -> f32 {
        let mut out = c.b0 * input + c.b1 * self.x1 + c.b2 * self.x2 - c.a1 * self.y1 - c.a2 * self.y2;

        // Flush denormals
        if out.abs() < 1e-15 {
            out = 0.0;
        }

        self.x2 = self.x1;
        self.x1 = input;
        self.y2 = self.y1;
        self.y1 = out;
        out
    }
}

/// One stereo filter stage of the equalizer cascade
#[derive(Debug, Clone)]
pub struct FilterBand {
    kind: FilterType,
    frequency: f32,
    shape: f32,
    gain_db: f32,
    coefficients: Coefficients,
    left: ChannelState,
    right: ChannelState,
}

impl FilterBand {
    /// Create a neutral band (0 dB)
    ///
    /// `shape` is Q for peaking bands and the shelf slope for shelves.
    pub fn new(kind: FilterType, frequency: f32, shape: f32) -> Self {
        Self {
            kind,
            frequency,
            shape: shape.max(0.01),
            gain_db: 0.0,
            coefficients: Coefficients::IDENTITY,
            left: ChannelState::default(),
            right: ChannelState::default(),
        }
    }

    /// Filter kind
    pub fn kind(&self) -> FilterType {
        self.kind
    }

    /// Corner or center frequency in Hz
    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    /// Gain the coefficients were last computed for
    pub fn gain_db(&self) -> f32 {
        self.gain_db
    }

    /// Descriptor for display
    pub fn descriptor(&self) -> Band {
        Band {
            frequency: self.frequency,
            filter_type: self.kind,
            gain_db: self.gain_db,
        }
    }

    /// Recompute coefficients for a gain at a sample rate
    ///
    /// Filter history is kept so a gain change mid-stream does not restart
    /// the filter.
    pub fn configure(&mut self, sample_rate: u32, gain_db: f32) {
        self.gain_db = gain_db;
        self.coefficients =
            Coefficients::compute(self.kind, sample_rate as f32, self.frequency, gain_db, self.shape);
    }

    /// Process one stereo frame
    #[inline]
    pub fn process_frame(&mut self, left: f32, right: f32) -> (f32, f32) {
        (
            self.left.tick(&self.coefficients, left),
            self.right.tick(&self.coefficients, right),
        )
    }

    /// Clear filter history (coefficients are kept)
    pub fn reset(&mut self) {
        self.left = ChannelState::default();
        self.right = ChannelState::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::tests::generate_sine;

    const SAMPLE_RATE: u32 = 48000;

    /// Steady-state output amplitude for a constant (DC) input
    fn dc_gain(band: &mut FilterBand) -> f32 {
        let mut out = 0.0;
        for _ in 0..48000 {
            out = band.process_frame(0.5, 0.5).0;
        }
        out / 0.5
    }

    /// Steady-state output amplitude at Nyquist (alternating input)
    fn nyquist_gain(band: &mut FilterBand) -> f32 {
        let mut out = 0.0;
        for i in 0..48000 {
            let x = if i % 2 == 0 { 0.25 } else { -0.25 };
            out = band.process_frame(x, x).0;
        }
        out.abs() / 0.25
    }

    fn db_to_linear(db: f32) -> f32 {
        10.0_f32.powf(db / 20.0)
    }

    #[test]
    fn zero_gain_is_transparent() {
        let mut band = FilterBand::new(FilterType::Peaking, 1000.0, 1.0);
        band.configure(SAMPLE_RATE, 0.0);

        for x in [0.1, -0.7, 0.33, 0.0, 1.0] {
            assert_eq!(band.process_frame(x, -x), (x, -x));
        }
    }

    #[test]
    fn low_shelf_boosts_dc_by_full_gain() {
        let mut band = FilterBand::new(FilterType::LowShelf, 60.0, 1.0);
        band.configure(SAMPLE_RATE, 12.0);

        let gain = dc_gain(&mut band);
        assert!((gain - db_to_linear(12.0)).abs() < 0.05, "DC gain {}", gain);
    }

    #[test]
    fn low_shelf_leaves_highs_alone() {
        let mut band = FilterBand::new(FilterType::LowShelf, 60.0, 1.0);
        band.configure(SAMPLE_RATE, 12.0);

        let gain = nyquist_gain(&mut band);
        assert!((gain - 1.0).abs() < 0.01, "Nyquist gain {}", gain);
    }

    #[test]
    fn high_shelf_cuts_nyquist_by_full_gain() {
        let mut band = FilterBand::new(FilterType::HighShelf, 10000.0, 1.0);
        band.configure(SAMPLE_RATE, -12.0);

        let high = nyquist_gain(&mut band);
        assert!((high - db_to_linear(-12.0)).abs() < 0.01, "Nyquist gain {}", high);

        band.reset();
        let low = dc_gain(&mut band);
        assert!((low - 1.0).abs() < 0.01, "DC gain {}", low);
    }

    #[test]
    fn peaking_leaves_dc_and_nyquist_alone() {
        let mut band = FilterBand::new(FilterType::Peaking, 1000.0, 1.0);
        band.configure(SAMPLE_RATE, 6.0);

        assert!((dc_gain(&mut band) - 1.0).abs() < 0.01);
        band.reset();
        assert!((nyquist_gain(&mut band) - 1.0).abs() < 0.01);
    }

    #[test]
    fn peaking_boosts_center_frequency() {
        let mut band = FilterBand::new(FilterType::Peaking, 1000.0, 1.0);
        band.configure(SAMPLE_RATE, 6.0);

        let input = generate_sine(1000.0, SAMPLE_RATE, 1.0);
        let frames = input.len() / 2;
        let mut peak = 0.0_f32;
        for (i, frame) in input.chunks_exact(2).enumerate() {
            let (y, _) = band.process_frame(frame[0], frame[1]);
            // Skip the transient
            if i > frames / 2 {
                peak = peak.max(y.abs());
            }
        }

        assert!((peak - db_to_linear(6.0)).abs() < 0.05, "center gain {}", peak);
    }

    #[test]
    fn high_shelf_passes_low_tone() {
        let mut band = FilterBand::new(FilterType::HighShelf, 10000.0, 1.0);
        band.configure(SAMPLE_RATE, 12.0);

        let input = generate_sine(100.0, SAMPLE_RATE, 0.5);
        let frames = input.len() / 2;
        let mut peak = 0.0_f32;
        for (i, frame) in input.chunks_exact(2).enumerate() {
            let (l, r) = band.process_frame(frame[0], frame[1]);
            assert_eq!(l, r);
            if i > frames / 2 {
                peak = peak.max(l.abs());
            }
        }

        assert!((peak - 1.0).abs() < 0.02, "low tone gain {}", peak);
    }

    #[test]
    fn invalid_sample_rate_is_identity() {
        let mut band = FilterBand::new(FilterType::HighShelf, 10000.0, 1.0);
        band.configure(0, 12.0);
        assert_eq!(band.process_frame(0.5, 0.5), (0.5, 0.5));
        assert_eq!(band.gain_db(), 12.0);
    }
}
