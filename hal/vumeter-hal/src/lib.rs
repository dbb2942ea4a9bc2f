//! vumeter Hardware Abstraction Layer
//!
//! This crate defines the hardware contracts the metering pipeline is
//! written against. Chip-specific crates (currently STM32F4) implement
//! them at register level; `vumeter-core` only ever sees the traits.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  vumeter-core / vumeter-firmware        │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  vumeter-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!           ┌───────────────────┐
//!           │ vumeter-hal-      │
//!           │    stm32f4        │
//!           └───────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`adc::AnalogConverter`] - Software-triggered single-channel conversion
//! - [`timer::PeriodicTimer`] - Update-event timer used as a tick source
//! - [`dma::BlockTransfer`] - Memory-to-peripheral block transfer engine
//! - [`uart::SerialTx`] - Polled serial byte engine
//!
//! None of the traits return `Result`: the hardware reports status through
//! flags, and the pipeline observes and clears them.

#![no_std]
#![deny(unsafe_code)]

pub mod adc;
pub mod dma;
pub mod timer;
pub mod uart;

// Re-export key traits at crate root for convenience
pub use adc::{AnalogConverter, RawSample, RAW_SAMPLE_MAX};
pub use dma::{BlockTransfer, TransferErrors};
pub use timer::{PeriodicTimer, TimerPeriod};
pub use uart::{SerialConfig, SerialTx};
