//! Main-loop dispatcher
//!
//! Waits for tick flags and runs the work behind them: a sample tick
//! starts a conversion, a display tick queues the current bar. All heavy
//! work happens here, never in the timer interrupts.

use embassy_sync::blocking_mutex::raw::RawMutex;
use vumeter_hal::{AnalogConverter, BlockTransfer};

use crate::render::Renderer;
use crate::sampler::SharedSampler;
use crate::tick::{Due, Ticks};
use crate::transmit::SharedTransmitter;

/// The metering pipeline as seen from loop context
pub struct Meter<'a, M: RawMutex, A, D, const N: usize> {
    ticks: &'a Ticks<M>,
    sampler: &'a SharedSampler<'a, M, A>,
    renderer: Renderer<'a>,
    tx: &'a SharedTransmitter<M, D, N>,
}

impl<'a, M, A, D, const N: usize> Meter<'a, M, A, D, N>
where
    M: RawMutex,
    A: AnalogConverter,
    D: BlockTransfer,
{
    /// Assemble the pipeline from its shared parts
    pub fn new(
        ticks: &'a Ticks<M>,
        sampler: &'a SharedSampler<'a, M, A>,
        renderer: Renderer<'a>,
        tx: &'a SharedTransmitter<M, D, N>,
    ) -> Self {
        Self {
            ticks,
            sampler,
            renderer,
            tx,
        }
    }

    /// Run the work for the ticks in `due`
    ///
    /// Sampling goes first so a conversion is in flight while the bar is
    /// queued. Queueing a bar may wait for the previous chain of transfers
    /// to drain; ticks raised meanwhile coalesce.
    pub async fn service(&mut self, due: Due) {
        if due.sample {
            self.sampler.on_tick();
        }
        if due.display {
            self.renderer.on_display_tick(self.tx).await;
        }
    }

    /// Wait for the next tick(s) and service them
    pub async fn step(&mut self) -> Due {
        let due = self.ticks.next().await;
        self.service(due).await;
        due
    }

    /// Service ticks forever
    pub async fn run(&mut self) -> ! {
        loop {
            self.step().await;
        }
    }

    /// Frames queued since creation
    pub fn frames(&self) -> u32 {
        self.renderer.frames()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::EnvelopeFilter;
    use crate::mock::{MockAdc, MockDma};
    use crate::sampler::{PublishedLevel, Sampler};
    use embassy_futures::block_on;
    use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;

    type Tx = SharedTransmitter<CriticalSectionRawMutex, MockDma, 256>;

    /// Let the mock DMA finish whatever is in flight
    fn drain(tx: &Tx) {
        while tx.is_busy() {
            tx.with(|engine| engine.dma_mut().finish());
            tx.on_transfer_complete();
        }
    }

    #[test]
    fn test_sample_tick_starts_conversion() {
        let ticks = Ticks::new();
        let level = PublishedLevel::new();
        let sampler = SharedSampler::new(Sampler::new(
            MockAdc::new(),
            EnvelopeFilter::default(),
            &level,
        ));
        let tx: Tx = SharedTransmitter::new(MockDma::new());
        let mut meter = Meter::new(&ticks, &sampler, Renderer::new(&level), &tx);

        ticks.sample.raise();
        let due = block_on(meter.step());

        assert!(due.sample && !due.display);
        assert_eq!(sampler.with(|s| s.adc().starts), 1);
        assert_eq!(meter.frames(), 0);
    }

    #[test]
    fn test_coalesced_sample_ticks_start_one_conversion() {
        let ticks = Ticks::new();
        let level = PublishedLevel::new();
        let sampler = SharedSampler::new(Sampler::new(
            MockAdc::new(),
            EnvelopeFilter::default(),
            &level,
        ));
        let tx: Tx = SharedTransmitter::new(MockDma::new());
        let mut meter = Meter::new(&ticks, &sampler, Renderer::new(&level), &tx);

        ticks.sample.raise();
        ticks.sample.raise();
        ticks.sample.raise();
        block_on(meter.step());

        assert_eq!(sampler.with(|s| s.adc().starts), 1);
        assert!(!ticks.poll().any());
    }

    #[test]
    fn test_level_reaches_the_wire() {
        let ticks = Ticks::new();
        let level = PublishedLevel::new();
        let sampler = SharedSampler::new(Sampler::new(
            MockAdc::new(),
            EnvelopeFilter::default(),
            &level,
        ));
        let tx: Tx = SharedTransmitter::new(MockDma::new());
        tx.init();
        sampler.init();
        let mut meter = Meter::new(&ticks, &sampler, Renderer::new(&level), &tx);

        // Full-scale input until the envelope settles
        for _ in 0..200 {
            ticks.sample.raise();
            block_on(meter.step());
            sampler.with(|s| s.adc_mut().complete(4095));
            sampler.on_conversion_complete();
        }
        assert!(level.get() >= 750);

        ticks.display.raise();
        block_on(meter.step());
        drain(&tx);

        assert_eq!(
            tx.with(|engine| engine.dma().sent()),
            b"\r[||||||||||||||||||||]"
        );
        assert_eq!(meter.frames(), 1);
    }

    #[test]
    fn test_both_ticks_in_one_step() {
        let ticks = Ticks::new();
        let level = PublishedLevel::new();
        let sampler = SharedSampler::new(Sampler::new(
            MockAdc::new(),
            EnvelopeFilter::default(),
            &level,
        ));
        let tx: Tx = SharedTransmitter::new(MockDma::new());
        tx.init();
        let mut meter = Meter::new(&ticks, &sampler, Renderer::new(&level), &tx);

        ticks.sample.raise();
        ticks.display.raise();
        let due = block_on(meter.step());

        assert!(due.sample && due.display);
        assert_eq!(sampler.with(|s| s.adc().starts), 1);
        assert_eq!(
            tx.with(|engine| engine.dma().sent()),
            b"\r[....................]"
        );
    }

    #[test]
    fn test_consecutive_frames_in_order() {
        let ticks = Ticks::new();
        let level = PublishedLevel::new();
        let sampler = SharedSampler::new(Sampler::new(
            MockAdc::new(),
            EnvelopeFilter::default(),
            &level,
        ));
        let tx: Tx = SharedTransmitter::new(MockDma::new());
        tx.init();
        let mut meter = Meter::new(&ticks, &sampler, Renderer::new(&level), &tx);

        ticks.display.raise();
        block_on(meter.step());
        drain(&tx);

        level.publish(19);
        ticks.display.raise();
        block_on(meter.step());
        drain(&tx);

        assert_eq!(
            tx.with(|engine| engine.dma().sent()),
            b"\r[....................]\r[:...................]"
        );
        assert_eq!(meter.frames(), 2);
    }

    #[test]
    fn test_sampler_stats_follow_ticks() {
        let ticks = Ticks::new();
        let level = PublishedLevel::new();
        let sampler = SharedSampler::new(Sampler::new(
            MockAdc::new(),
            EnvelopeFilter::default(),
            &level,
        ));
        let tx: Tx = SharedTransmitter::new(MockDma::new());
        sampler.init();
        let mut meter = Meter::new(&ticks, &sampler, Renderer::new(&level), &tx);

        for _ in 0..3 {
            ticks.sample.raise();
            block_on(meter.step());
            sampler.with(|s| s.adc_mut().complete(2048));
            sampler.on_conversion_complete();
        }

        let stats: crate::SamplerStats = sampler.stats();
        assert_eq!(
            stats,
            crate::SamplerStats {
                started: 3,
                published: 3,
                overruns: 0,
            }
        );
    }
}
