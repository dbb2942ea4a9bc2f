//! Transmit byte buffering
//!
//! A fixed-capacity ring with overwrite-on-full semantics. The ring hands
//! out contiguous runs so a block-transfer engine can drain it without
//! per-byte software work.

pub mod ring;

pub use ring::{CircularBuffer, Run};
