//! Block-transfer (DMA) engine abstraction

/// Transient error flags reported by a block-transfer engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TransferErrors {
    /// Bus error during the transfer
    pub transfer: bool,
    /// FIFO overrun/underrun
    pub fifo: bool,
    /// Direct-mode error
    pub direct_mode: bool,
}

impl TransferErrors {
    /// No error flags set
    pub const NONE: Self = Self {
        transfer: false,
        fifo: false,
        direct_mode: false,
    };

    /// All error flags set
    pub const ALL: Self = Self {
        transfer: true,
        fifo: true,
        direct_mode: true,
    };

    /// Check if no error flag is set
    pub fn is_empty(&self) -> bool {
        !(self.transfer || self.fifo || self.direct_mode)
    }
}

/// Memory-to-peripheral block-transfer engine
///
/// The engine reads `source.len()` bytes starting at `source.as_ptr()`
/// and writes them to a fixed peripheral register without software
/// involvement, then raises a completion flag.
pub trait BlockTransfer {
    /// Latch the source address and length of the next transfer
    ///
    /// Implementations keep only the address; the caller guarantees the
    /// memory outlives the transfer. In this system the source is always
    /// a region of a ring buffer that lives for the process lifetime.
    fn set_transfer(&mut self, source: &[u8]);

    /// Start the latched transfer
    fn start(&mut self);

    /// Stop (disable) the engine
    fn stop(&mut self);

    /// Check if the engine is still enabled
    fn is_busy(&self) -> bool;

    /// Check the transfer-complete flag
    fn is_complete(&self) -> bool;

    /// Clear the transfer-complete flag
    fn clear_complete_flag(&mut self);

    /// Read the transient error flags
    fn error_flags(&self) -> TransferErrors;

    /// Clear the given error flags
    fn clear_error_flags(&mut self, errors: TransferErrors);
}
