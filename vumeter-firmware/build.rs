//! Build script for vumeter-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates meter.toml at compile time
//! - Generates the `METER_CONFIG` constant from it

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use vumeter_core::{ConfigError, MeterConfig};

fn main() {
    setup_linker();
    let config = validate_config();
    generate_config(&config);
}

/// Set up linker search paths and scripts
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate meter.toml configuration at compile time
fn validate_config() -> MeterConfig {
    // Re-run if meter.toml changes
    println!("cargo:rerun-if-changed=meter.toml");

    let config_path = Path::new("meter.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: meter.toml not found!                                    ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a meter.toml configuration file.          ║\n\
            ║  Please create one in the vumeter-firmware directory.            ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read meter.toml                                ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    // Parse and validate TOML syntax
    let value: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in meter.toml                        ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                {}\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let Some(section) = value.get("meter") else {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Missing [meter] section in meter.toml                    ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    };

    let config: MeterConfig = match section.clone().try_into() {
        Ok(config) => config,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid value in [meter]                                 ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                {}\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    if let Err(e) = config.validate() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid meter configuration                              ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            ║  {:<64} ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            describe(e)
        );
    }

    println!("cargo:warning=meter.toml validated successfully");
    config
}

/// Human-readable reason for a rejected configuration
fn describe(error: ConfigError) -> &'static str {
    match error {
        ConfigError::ZeroRate => "sample_rate_hz and display_rate_hz must be non-zero",
        ConfigError::ZeroClock => "timer_clock_hz and counter_clock_hz must be non-zero",
        ConfigError::CounterClockMismatch => {
            "counter_clock_hz must divide timer_clock_hz (16-bit prescaler)"
        }
        ConfigError::RateTooHigh => "tick rates must not exceed counter_clock_hz",
        ConfigError::PeriodOutOfRange => "counter_clock_hz / rate must fit in 16 bits",
        ConfigError::ZeroSmoothingFactor => "smoothing_factor must be at least 1",
        ConfigError::BaselineOutOfRange => "baseline must be within 0..=4095",
        ConfigError::InvalidBaudrate => "baudrate must be in 1..=serial_clock_hz/16",
    }
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Write the validated configuration as a Rust constant
fn generate_config(config: &MeterConfig) {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let source = format!(
        "/// Configuration from meter.toml, validated at build time\n\
         pub const METER_CONFIG: MeterConfig = MeterConfig {{\n\
         \x20   sample_rate_hz: {},\n\
         \x20   display_rate_hz: {},\n\
         \x20   timer_clock_hz: {},\n\
         \x20   counter_clock_hz: {},\n\
         \x20   baseline: {},\n\
         \x20   smoothing_factor: {},\n\
         \x20   baudrate: {},\n\
         \x20   serial_clock_hz: {},\n\
         }};\n",
        config.sample_rate_hz,
        config.display_rate_hz,
        config.timer_clock_hz,
        config.counter_clock_hz,
        config.baseline,
        config.smoothing_factor,
        config.baudrate,
        config.serial_clock_hz,
    );
    fs::write(out_dir.join("meter_config.rs"), source).unwrap();
}
