//! Meter configuration
//!
//! Board-level rates and filter constants. The firmware builds one of
//! these from `meter.toml` at compile time and validates it again at
//! boot before touching any peripheral.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use vumeter_hal::{SerialConfig, TimerPeriod, RAW_SAMPLE_MAX};

use crate::filter::{EnvelopeFilter, DEFAULT_BASELINE, DEFAULT_SMOOTHING_FACTOR};

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// A tick rate is zero
    ZeroRate,
    /// The timer or counter clock is zero
    ZeroClock,
    /// Counter clock is faster than the timer clock or does not divide it
    CounterClockMismatch,
    /// A tick rate is faster than the counter clock
    RateTooHigh,
    /// A tick period does not fit the 16-bit auto-reload register
    PeriodOutOfRange,
    /// Smoothing factor is zero
    ZeroSmoothingFactor,
    /// Baseline is outside the converter's 12-bit range
    BaselineOutOfRange,
    /// Baud rate is zero or faster than the serial clock allows
    InvalidBaudrate,
}

/// Complete meter configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MeterConfig {
    /// Sample tick rate in Hz
    pub sample_rate_hz: u32,
    /// Display tick rate in Hz
    pub display_rate_hz: u32,
    /// Clock feeding the tick timers in Hz
    pub timer_clock_hz: u32,
    /// Timer counter clock after the prescaler in Hz
    pub counter_clock_hz: u32,
    /// Converter reading that means silence
    pub baseline: u16,
    /// Envelope smoothing factor (larger is slower)
    pub smoothing_factor: u16,
    /// Serial baud rate
    pub baudrate: u32,
    /// Clock feeding the serial port in Hz
    pub serial_clock_hz: u32,
}

impl Default for MeterConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl MeterConfig {
    /// 20 kHz sampling and 30 Hz display on an 84 MHz timer clock
    pub const DEFAULT: Self = Self {
        sample_rate_hz: 20_000,
        display_rate_hz: 30,
        timer_clock_hz: 84_000_000,
        counter_clock_hz: 1_000_000,
        baseline: DEFAULT_BASELINE,
        smoothing_factor: DEFAULT_SMOOTHING_FACTOR,
        baudrate: 115_200,
        serial_clock_hz: 42_000_000,
    };

    /// Check every field and derived register value
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_rate_hz == 0 || self.display_rate_hz == 0 {
            return Err(ConfigError::ZeroRate);
        }
        if self.timer_clock_hz == 0 || self.counter_clock_hz == 0 {
            return Err(ConfigError::ZeroClock);
        }
        if self.counter_clock_hz > self.timer_clock_hz
            || self.timer_clock_hz % self.counter_clock_hz != 0
            || self.timer_clock_hz / self.counter_clock_hz > u16::MAX as u32 + 1
        {
            return Err(ConfigError::CounterClockMismatch);
        }
        if self.sample_rate_hz > self.counter_clock_hz
            || self.display_rate_hz > self.counter_clock_hz
        {
            return Err(ConfigError::RateTooHigh);
        }
        if self.sample_period().is_none() || self.display_period().is_none() {
            return Err(ConfigError::PeriodOutOfRange);
        }
        if self.smoothing_factor == 0 {
            return Err(ConfigError::ZeroSmoothingFactor);
        }
        if self.baseline > RAW_SAMPLE_MAX {
            return Err(ConfigError::BaselineOutOfRange);
        }
        // USARTDIV below 1 cannot be programmed
        if self.baudrate == 0 || self.baudrate > self.serial_clock_hz / 16 {
            return Err(ConfigError::InvalidBaudrate);
        }
        Ok(())
    }

    /// Register values for the sample timer
    pub fn sample_period(&self) -> Option<TimerPeriod> {
        TimerPeriod::from_rate(
            self.timer_clock_hz,
            self.counter_clock_hz,
            self.sample_rate_hz,
        )
    }

    /// Register values for the display timer
    pub fn display_period(&self) -> Option<TimerPeriod> {
        TimerPeriod::from_rate(
            self.timer_clock_hz,
            self.counter_clock_hz,
            self.display_rate_hz,
        )
    }

    /// Envelope filter for this baseline and smoothing factor
    pub const fn filter(&self) -> EnvelopeFilter {
        EnvelopeFilter::new(self.baseline, self.smoothing_factor)
    }

    /// Serial settings for the output port
    pub fn serial(&self) -> SerialConfig {
        SerialConfig {
            baudrate: self.baudrate,
        }
    }
}
