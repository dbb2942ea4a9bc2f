//! Periodic timer abstraction

/// Prescaler and auto-reload pair for a 16-bit update-event timer
///
/// The update rate is `timer_clock / (prescaler + 1) / (autoreload + 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimerPeriod {
    /// Value written to the prescaler register
    pub prescaler: u16,
    /// Value written to the auto-reload register
    pub autoreload: u16,
}

impl TimerPeriod {
    /// Create a period from raw register values
    pub const fn new(prescaler: u16, autoreload: u16) -> Self {
        Self {
            prescaler,
            autoreload,
        }
    }

    /// Derive register values for a tick rate
    ///
    /// The prescaler divides `timer_clock_hz` down to `counter_clock_hz`,
    /// and the auto-reload divides the counter clock down to `rate_hz`.
    /// Returns `None` if any rate is zero, the divisions are not exact
    /// for the prescaler, or a value does not fit its 16-bit register.
    pub fn from_rate(timer_clock_hz: u32, counter_clock_hz: u32, rate_hz: u32) -> Option<Self> {
        if timer_clock_hz == 0 || counter_clock_hz == 0 || rate_hz == 0 {
            return None;
        }
        if counter_clock_hz > timer_clock_hz || timer_clock_hz % counter_clock_hz != 0 {
            return None;
        }
        if rate_hz > counter_clock_hz {
            return None;
        }

        let prescaler = timer_clock_hz / counter_clock_hz - 1;
        let autoreload = counter_clock_hz / rate_hz - 1;

        Some(Self {
            prescaler: u16::try_from(prescaler).ok()?,
            autoreload: u16::try_from(autoreload).ok()?,
        })
    }

    /// Actual update rate in millihertz for a given timer clock
    pub fn rate_millihertz(&self, timer_clock_hz: u32) -> u64 {
        let divisor = (self.prescaler as u64 + 1) * (self.autoreload as u64 + 1);
        timer_clock_hz as u64 * 1000 / divisor
    }
}

/// Timer that raises an update event once per period
pub trait PeriodicTimer {
    /// Program prescaler and auto-reload
    fn configure(&mut self, period: TimerPeriod);

    /// Enable the update interrupt and start counting
    fn enable(&mut self);

    /// Check the update (elapsed) flag
    fn is_elapsed(&self) -> bool;

    /// Clear the update (elapsed) flag
    fn clear_elapsed_flag(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_rate_period() {
        let period = TimerPeriod::from_rate(84_000_000, 1_000_000, 20_000).unwrap();
        assert_eq!(period, TimerPeriod::new(83, 49));
        assert_eq!(period.rate_millihertz(84_000_000), 20_000_000);
    }

    #[test]
    fn test_display_rate_period() {
        let period = TimerPeriod::from_rate(84_000_000, 1_000_000, 30).unwrap();
        assert_eq!(period, TimerPeriod::new(83, 33332));
        // 1 MHz / 33333 = 30.0003 Hz
        assert_eq!(period.rate_millihertz(84_000_000), 30_000);
    }

    #[test]
    fn test_invalid_rates() {
        assert_eq!(TimerPeriod::from_rate(84_000_000, 1_000_000, 0), None);
        assert_eq!(TimerPeriod::from_rate(84_000_000, 0, 30), None);
        // Counter clock must divide the timer clock
        assert_eq!(TimerPeriod::from_rate(84_000_000, 1_100_000, 30), None);
        // 1 MHz / 10 Hz needs a 100 000 auto-reload
        assert_eq!(TimerPeriod::from_rate(84_000_000, 1_000_000, 10), None);
        // Rate above the counter clock
        assert_eq!(TimerPeriod::from_rate(84_000_000, 1_000_000, 2_000_000), None);
    }
}
