//! Board-agnostic core logic for the audio level meter
//!
//! This crate contains everything between the peripheral traits of
//! `vumeter-hal` and the interrupt vectors of the firmware:
//!
//! - Ring buffer and DMA transmit state machine
//! - Envelope filter and converter-driven sampler
//! - Level-to-bar rendering
//! - Tick flags and the main-loop dispatcher
//! - Configuration types

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod buffer;
pub mod config;
pub mod filter;
pub mod meter;
pub mod render;
pub mod sampler;
pub mod tick;
pub mod transmit;

#[cfg(test)]
mod mock;

pub use buffer::CircularBuffer;
pub use config::{ConfigError, MeterConfig};
pub use filter::{EnvelopeFilter, Level};
pub use meter::Meter;
pub use render::Renderer;
pub use sampler::{PublishedLevel, Sampler, SamplerStats, SharedSampler};
pub use tick::{Due, TickFlag, TickSource, Ticks};
pub use transmit::{SharedTransmitter, TransmitEngine, TxState, TxStats};
