//! Analog-to-digital converter abstraction

/// Raw conversion result (12-bit right-aligned on the supported parts)
pub type RawSample = u16;

/// Largest value a 12-bit conversion can return
pub const RAW_SAMPLE_MAX: RawSample = 0x0FFF;

/// Software-triggered analog converter
///
/// The converter is started from loop context and reports completion
/// through a status flag that the conversion-complete interrupt inspects.
pub trait AnalogConverter {
    /// Start a single conversion. Returns immediately.
    fn start_conversion(&mut self);

    /// Check the end-of-conversion flag
    fn is_conversion_complete(&self) -> bool;

    /// Read the data register
    fn read_result(&mut self) -> RawSample;

    /// Clear the end-of-conversion flag
    fn clear_complete_flag(&mut self);

    /// Check the overrun flag (a result was overwritten before it was read)
    fn is_overrun(&self) -> bool {
        false
    }

    /// Clear the overrun flag
    fn clear_overrun_flag(&mut self) {}
}
