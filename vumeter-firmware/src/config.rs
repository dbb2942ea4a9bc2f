//! Boot-time configuration
//!
//! `meter.toml` is compiled in as [`METER_CONFIG`]. It was validated by
//! the build script already; it is checked again here so a stale or
//! hand-edited generated file can never reach the peripherals.

use defmt::*;
use vumeter_core::MeterConfig;

include!(concat!(env!("OUT_DIR"), "/meter_config.rs"));

/// Return the compiled-in configuration, or the defaults if it is invalid
pub fn load() -> MeterConfig {
    match METER_CONFIG.validate() {
        Ok(()) => {
            info!("Configuration: {}", METER_CONFIG);
            METER_CONFIG
        }
        Err(e) => {
            warn!("meter.toml rejected ({}), using defaults", e);
            MeterConfig::DEFAULT
        }
    }
}
