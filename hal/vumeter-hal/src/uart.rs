//! Serial byte engine abstraction
//!
//! Only the polled transmit side is modelled. The DMA path never touches
//! this trait; it is used by the blocking diagnostic writer.

/// Polled serial transmitter
pub trait SerialTx {
    /// Check the transmit-data-register-empty flag
    fn is_ready_to_send(&self) -> bool;

    /// Write one byte to the data register
    fn send_byte(&mut self, byte: u8);

    /// Check the transmission-complete flag (shift register drained)
    fn is_transmission_complete(&self) -> bool;
}

/// Serial configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SerialConfig {
    /// Baud rate in bits per second
    pub baudrate: u32,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self { baudrate: 115200 }
    }
}

impl SerialConfig {
    /// Baud rate register value for oversampling by 16
    ///
    /// Rounded to nearest, as the reference manual recommends. Saturates
    /// at the slowest divider for a zero baud rate.
    pub fn brr(&self, peripheral_clock_hz: u32) -> u16 {
        if self.baudrate == 0 {
            return u16::MAX;
        }
        let clock = u64::from(peripheral_clock_hz);
        let baudrate = u64::from(self.baudrate);
        let brr = (clock + baudrate / 2) / baudrate;
        brr.min(u64::from(u16::MAX)) as u16
    }
}
