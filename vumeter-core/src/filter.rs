//! Rectifying envelope filter
//!
//! A first-order IIR low-pass applied to the rectified, DC-free signal:
//!
//! ```text
//! x   = |raw - baseline|
//! acc = acc + (x - acc) / smoothing_factor
//! ```
//!
//! Division truncates toward zero, so once the gap to the input is smaller
//! than the smoothing factor the accumulator stops moving. That dead band
//! is part of the observable behavior and is kept.

use vumeter_hal::RawSample;

/// Filtered level, same width as a raw sample
pub type Level = u16;

/// Nominal DC midpoint of a 12-bit converter
pub const DEFAULT_BASELINE: RawSample = 2048;

/// Default inverse time constant
pub const DEFAULT_SMOOTHING_FACTOR: u16 = 16;

/// Envelope filter state
///
/// Holds one persistent accumulator. One instance serves one channel;
/// feeding two signals through the same instance mixes their envelopes.
#[derive(Debug, Clone)]
pub struct EnvelopeFilter {
    accumulator: i32,
    baseline: i32,
    smoothing_factor: i32,
}

impl Default for EnvelopeFilter {
    fn default() -> Self {
        Self::new(DEFAULT_BASELINE, DEFAULT_SMOOTHING_FACTOR)
    }
}

impl EnvelopeFilter {
    /// Create a filter with the accumulator at 0
    ///
    /// A `smoothing_factor` of 0 is treated as 1 (no smoothing).
    pub const fn new(baseline: RawSample, smoothing_factor: u16) -> Self {
        let smoothing_factor = if smoothing_factor == 0 {
            1
        } else {
            smoothing_factor
        };

        Self {
            accumulator: 0,
            baseline: baseline as i32,
            smoothing_factor: smoothing_factor as i32,
        }
    }

    /// Feed one raw sample and return the updated level
    pub fn filter(&mut self, raw: RawSample) -> Level {
        let x = (raw as i32 - self.baseline).abs();
        self.accumulator += (x - self.accumulator) / self.smoothing_factor;
        self.accumulator as Level
    }

    /// Current level without feeding a sample
    pub fn level(&self) -> Level {
        self.accumulator as Level
    }

    /// Return the accumulator to 0
    pub fn reset(&mut self) {
        self.accumulator = 0;
    }

    /// Configured baseline
    pub fn baseline(&self) -> RawSample {
        self.baseline as RawSample
    }

    /// Configured smoothing factor
    pub fn smoothing_factor(&self) -> u16 {
        self.smoothing_factor as u16
    }
}
