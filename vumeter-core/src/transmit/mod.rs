//! Non-blocking chunked transmitter
//!
//! [`TransmitEngine`] is the `Idle`/`Busy` state machine that drains the
//! ring buffer through a block-transfer engine one contiguous run at a
//! time. [`SharedTransmitter`] wraps it for use from both loop and
//! interrupt context.

pub mod engine;
pub mod shared;

pub use engine::{TransmitEngine, TxState, TxStats};
pub use shared::SharedTransmitter;
