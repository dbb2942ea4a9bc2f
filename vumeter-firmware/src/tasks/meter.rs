//! Meter task
//!
//! Services the sample and display ticks for the life of the firmware
//! and reports counters once per second.

use defmt::*;

use vumeter_core::{Meter, Renderer};

use crate::channels::{MeterSampler, Transmitter, LEVEL, TICKS};

/// Meter task - waits on tick flags and runs the pipeline
#[embassy_executor::task]
pub async fn meter_task(
    sampler: &'static MeterSampler,
    tx: &'static Transmitter,
    display_rate_hz: u32,
) {
    info!("Meter task started");

    let mut meter = Meter::new(&TICKS, sampler, Renderer::new(&LEVEL), tx);
    let frames_per_report = display_rate_hz.max(1);

    loop {
        let due = meter.step().await;

        if due.display && meter.frames() % frames_per_report == 0 {
            debug!(
                "level={} frames={} sampler={} tx={}",
                LEVEL.get(),
                meter.frames(),
                sampler.stats(),
                tx.stats()
            );
        }
    }
}
