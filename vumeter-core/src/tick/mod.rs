//! Periodic tick sources
//!
//! Timer interrupts only raise a flag; the main loop takes the flags and
//! does the actual work. Flags hold no count, so ticks raised faster than
//! the loop services them are coalesced.

pub mod flag;
pub mod source;

pub use flag::{Due, TickFlag, Ticks};
pub use source::TickSource;
