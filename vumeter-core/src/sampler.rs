//! Converter-driven sampling
//!
//! The sample tick starts a conversion from loop context; the
//! conversion-complete interrupt reads the result, runs it through the
//! envelope filter and publishes the level for the renderer.

use core::cell::RefCell;
use core::sync::atomic::{AtomicU16, Ordering};

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;
use vumeter_hal::AnalogConverter;

use crate::filter::{EnvelopeFilter, Level};

/// Single-writer cell holding the most recent filtered level
///
/// Written only by the conversion-complete interrupt, read by the
/// renderer in loop context. A 16-bit store is indivisible, so readers
/// never see a torn value.
pub struct PublishedLevel {
    level: AtomicU16,
}

impl Default for PublishedLevel {
    fn default() -> Self {
        Self::new()
    }
}

impl PublishedLevel {
    /// Create a cell holding level 0
    pub const fn new() -> Self {
        Self {
            level: AtomicU16::new(0),
        }
    }

    /// Publish a new level (conversion-complete interrupt only)
    pub fn publish(&self, level: Level) {
        self.level.store(level, Ordering::Release);
    }

    /// Read the latest level
    pub fn get(&self) -> Level {
        self.level.load(Ordering::Acquire)
    }
}

/// Sampler statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SamplerStats {
    /// Conversions started
    pub started: u32,
    /// Samples filtered and published
    pub published: u32,
    /// Samples dropped because the converter overran
    pub overruns: u32,
}

/// Sampler bound to one converter and one published level
pub struct Sampler<'a, A> {
    adc: A,
    filter: EnvelopeFilter,
    level: &'a PublishedLevel,
    started: u32,
    published: u32,
    overruns: u32,
}

impl<'a, A: AnalogConverter> Sampler<'a, A> {
    /// Create a sampler
    pub fn new(adc: A, filter: EnvelopeFilter, level: &'a PublishedLevel) -> Self {
        Self {
            adc,
            filter,
            level,
            started: 0,
            published: 0,
            overruns: 0,
        }
    }

    /// Bring the converter to a known state
    ///
    /// Clears stale completion and overrun flags and flushes the data
    /// register so the first interrupt sees a fresh conversion.
    pub fn init(&mut self) {
        self.adc.clear_complete_flag();
        self.adc.clear_overrun_flag();
        let _ = self.adc.read_result();
        self.filter.reset();
        self.level.publish(0);
    }

    /// Sample tick: start a conversion and return immediately
    pub fn on_tick(&mut self) {
        self.adc.start_conversion();
        self.started = self.started.wrapping_add(1);
    }

    /// Conversion-complete interrupt handler
    ///
    /// Constant time and non-blocking. If the converter overran, the
    /// flag is cleared and the in-flight sample is dropped.
    pub fn on_conversion_complete(&mut self) {
        if self.adc.is_overrun() {
            self.adc.clear_overrun_flag();
            self.adc.clear_complete_flag();
            self.overruns = self.overruns.wrapping_add(1);
            return;
        }

        if !self.adc.is_conversion_complete() {
            return;
        }

        let raw = self.adc.read_result();
        self.adc.clear_complete_flag();

        let level = self.filter.filter(raw);
        self.level.publish(level);
        self.published = self.published.wrapping_add(1);
    }

    /// Latest published level
    pub fn level(&self) -> Level {
        self.level.get()
    }

    /// Counters since creation
    pub fn stats(&self) -> SamplerStats {
        SamplerStats {
            started: self.started,
            published: self.published,
            overruns: self.overruns,
        }
    }

    /// Access the filter (e.g. to inspect its configuration)
    pub fn filter(&self) -> &EnvelopeFilter {
        &self.filter
    }

    /// Access the underlying converter
    pub fn adc(&self) -> &A {
        &self.adc
    }

    /// Mutable access to the underlying converter
    pub fn adc_mut(&mut self) -> &mut A {
        &mut self.adc
    }
}

/// Sampler shared between the tick loop and the conversion interrupt
///
/// The filter accumulator is only touched by the interrupt, but the
/// converter registers are touched by both sides, so every call runs in
/// the mutex's critical section.
pub struct SharedSampler<'a, M: RawMutex, A> {
    sampler: Mutex<M, RefCell<Sampler<'a, A>>>,
}

impl<'a, M: RawMutex, A: AnalogConverter> SharedSampler<'a, M, A> {
    /// Wrap a sampler
    pub const fn new(sampler: Sampler<'a, A>) -> Self {
        Self {
            sampler: Mutex::new(RefCell::new(sampler)),
        }
    }

    /// Run `f` on the sampler inside the critical section
    pub fn with<R>(&self, f: impl FnOnce(&mut Sampler<'a, A>) -> R) -> R {
        self.sampler.lock(|cell| f(&mut cell.borrow_mut()))
    }

    /// See [`Sampler::init`]
    pub fn init(&self) {
        self.with(|sampler| sampler.init());
    }

    /// See [`Sampler::on_tick`]
    pub fn on_tick(&self) {
        self.with(|sampler| sampler.on_tick());
    }

    /// Conversion-complete interrupt entry point
    pub fn on_conversion_complete(&self) {
        self.with(|sampler| sampler.on_conversion_complete());
    }

    /// Counters since creation
    pub fn stats(&self) -> SamplerStats {
        self.with(|sampler| sampler.stats())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockAdc;

    #[test]
    fn test_tick_starts_conversion() {
        let level = PublishedLevel::new();
        let mut sampler = Sampler::new(MockAdc::new(), EnvelopeFilter::default(), &level);

        sampler.on_tick();
        sampler.on_tick();
        assert_eq!(sampler.adc().starts, 2);
        assert_eq!(sampler.stats().started, 2);
        // Nothing published until the converter completes
        assert_eq!(level.get(), 0);
    }

    #[test]
    fn test_completion_publishes_filtered_level() {
        let level = PublishedLevel::new();
        let mut sampler = Sampler::new(MockAdc::new(), EnvelopeFilter::default(), &level);

        sampler.on_tick();
        sampler.adc_mut().complete(2048 + 1600);
        sampler.on_conversion_complete();

        assert_eq!(level.get(), 100);
        assert!(!sampler.adc().complete);
        assert_eq!(sampler.stats().published, 1);
    }

    #[test]
    fn test_spurious_interrupt_is_ignored() {
        let level = PublishedLevel::new();
        let mut sampler = Sampler::new(MockAdc::new(), EnvelopeFilter::default(), &level);

        sampler.on_conversion_complete();
        assert_eq!(sampler.adc().reads, 0);
        assert_eq!(sampler.stats().published, 0);
    }

    #[test]
    fn test_overrun_drops_sample() {
        let level = PublishedLevel::new();
        let mut sampler = Sampler::new(MockAdc::new(), EnvelopeFilter::default(), &level);

        sampler.adc_mut().complete(4095);
        sampler.adc_mut().overrun = true;
        sampler.on_conversion_complete();

        assert_eq!(level.get(), 0);
        assert!(!sampler.adc().overrun);
        assert!(!sampler.adc().complete);
        assert_eq!(sampler.stats().overruns, 1);

        // The next conversion goes through
        sampler.adc_mut().complete(4095);
        sampler.on_conversion_complete();
        assert_eq!(level.get(), 2047 / 16);
    }

    #[test]
    fn test_init_flushes_converter() {
        let level = PublishedLevel::new();
        level.publish(77);
        let mut adc = MockAdc::new();
        adc.complete(1234);
        adc.overrun = true;

        let mut sampler = Sampler::new(adc, EnvelopeFilter::default(), &level);
        sampler.init();

        assert!(!sampler.adc().complete);
        assert!(!sampler.adc().overrun);
        assert_eq!(sampler.adc().reads, 1);
        assert_eq!(level.get(), 0);
    }

    #[test]
    fn test_shared_sampler_round_trip() {
        use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;

        let level = PublishedLevel::new();
        let shared: SharedSampler<CriticalSectionRawMutex, _> =
            SharedSampler::new(Sampler::new(MockAdc::new(), EnvelopeFilter::default(), &level));
        shared.init();

        shared.on_tick();
        shared.with(|sampler| sampler.adc_mut().complete(2048 - 1600));
        shared.on_conversion_complete();

        assert_eq!(level.get(), 100);
        assert_eq!(
            shared.stats(),
            SamplerStats {
                started: 1,
                published: 1,
                overruns: 0,
            }
        );
    }
}
