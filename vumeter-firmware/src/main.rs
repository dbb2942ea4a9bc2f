//! Audio level meter firmware
//!
//! Samples an audio signal on PA0 at 20 kHz, follows its envelope and
//! draws it as a 20-character bar on USART2 at 30 frames per second.
//!
//! Timers and the converter run from interrupts; the bar is queued into
//! a ring buffer and shipped by DMA, so the executor thread only ever
//! waits on tick flags.

#![no_std]
#![no_main]

use core::cell::RefCell;

use cortex_m::peripheral::NVIC;
use defmt::*;
use embassy_executor::Spawner;
use embassy_sync::blocking_mutex::Mutex;
use {defmt_rtt as _, panic_probe as _};

use vumeter_core::{Sampler, SharedSampler, SharedTransmitter, TickSource};
use vumeter_hal_stm32f4::{pac, Board, Interrupt};

mod channels;
mod config;
mod interrupts;
mod tasks;

use channels::{DISPLAY_TICK, LEVEL, SAMPLER, SAMPLE_TICK, TICKS, TX};

/// Written with the polled path before the DMA path takes over
const BANNER: &[u8] = b"\r\nvumeter ready\r\n";

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("vumeter firmware starting...");

    let config = config::load();
    // Both are Some for any configuration that passed validation
    let sample_period = unwrap!(config.sample_period());
    let display_period = unwrap!(config.display_period());

    let dp = unwrap!(pac::Peripherals::take());
    let board = Board::init(dp, config.serial());
    info!("Clocks: {}", board.clocks);

    if board.clocks.timer_clock_hz != config.timer_clock_hz {
        warn!(
            "Timer clock is {} Hz but meter.toml assumes {} Hz, tick rates will be off",
            board.clocks.timer_clock_hz, config.timer_clock_hz
        );
    }
    if board.clocks.pclk1_hz != config.serial_clock_hz {
        warn!(
            "Serial clock is {} Hz but meter.toml assumes {} Hz",
            board.clocks.pclk1_hz, config.serial_clock_hz
        );
    }

    let Board {
        adc,
        sample_timer,
        display_timer,
        mut serial,
        dma,
        ..
    } = board;

    let sampler = SAMPLER.get_or_init(|| SharedSampler::new(Sampler::new(adc, config.filter(), &LEVEL)));
    sampler.init();
    info!("ADC initialized");

    let tx = TX.get_or_init(|| SharedTransmitter::new(dma));
    tx.init();
    tx.blocking_write(&mut serial, BANNER);
    info!("USART2 DMA transmitter initialized");

    let sample_tick = SAMPLE_TICK
        .get_or_init(|| Mutex::new(RefCell::new(TickSource::new(sample_timer, &TICKS.sample))));
    let display_tick = DISPLAY_TICK
        .get_or_init(|| Mutex::new(RefCell::new(TickSource::new(display_timer, &TICKS.display))));

    // SAFETY: every handler's state is in place; none of them touches
    // state that the loop holds outside a critical section.
    unsafe {
        NVIC::unmask(Interrupt::ADC);
        NVIC::unmask(Interrupt::DMA1_STREAM6);
        NVIC::unmask(Interrupt::TIM2);
        NVIC::unmask(Interrupt::TIM3);
    }

    sample_tick.lock(|cell| cell.borrow_mut().start(sample_period));
    display_tick.lock(|cell| cell.borrow_mut().start(display_period));
    info!(
        "Ticks running: sample {} Hz, display {} Hz",
        config.sample_rate_hz, config.display_rate_hz
    );

    spawner.spawn(unwrap!(tasks::meter_task(
        sampler,
        tx,
        config.display_rate_hz
    )));
}
