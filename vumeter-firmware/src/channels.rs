//! Statics shared between interrupt handlers and tasks
//!
//! Everything here is written once during boot, before the interrupt
//! lines are unmasked, and only read afterwards.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::once_lock::OnceLock;

use vumeter_core::{PublishedLevel, SharedSampler, SharedTransmitter, TickSource, Ticks};
use vumeter_hal_stm32f4::{pac, Adc1, Timer, UsartTxDma};

/// Transmit ring size (usable capacity is one less)
pub const TX_BUFFER_SIZE: usize = 256;

pub type Transmitter = SharedTransmitter<CriticalSectionRawMutex, UsartTxDma, TX_BUFFER_SIZE>;
pub type MeterSampler = SharedSampler<'static, CriticalSectionRawMutex, Adc1>;
pub type SampleTick = Shared<TickSource<'static, CriticalSectionRawMutex, Timer<pac::TIM2>>>;
pub type DisplayTick = Shared<TickSource<'static, CriticalSectionRawMutex, Timer<pac::TIM3>>>;

/// State touched from one interrupt handler and, at boot, from main
pub type Shared<T> = Mutex<CriticalSectionRawMutex, RefCell<T>>;

/// Sample and display tick flags (raised by TIM2 / TIM3)
pub static TICKS: Ticks<CriticalSectionRawMutex> = Ticks::new();

/// Latest filtered level (written by the ADC interrupt)
pub static LEVEL: PublishedLevel = PublishedLevel::new();

/// USART2 transmitter fed by DMA1 stream 6
pub static TX: OnceLock<Transmitter> = OnceLock::new();

/// ADC1 sampler
pub static SAMPLER: OnceLock<MeterSampler> = OnceLock::new();

/// TIM2 tick source
pub static SAMPLE_TICK: OnceLock<SampleTick> = OnceLock::new();

/// TIM3 tick source
pub static DISPLAY_TICK: OnceLock<DisplayTick> = OnceLock::new();
