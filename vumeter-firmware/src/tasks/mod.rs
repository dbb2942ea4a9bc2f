//! Embassy async tasks

pub mod meter;

pub use meter::meter_task;
