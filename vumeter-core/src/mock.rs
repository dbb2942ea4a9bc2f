//! Hardware doubles for host tests

use vumeter_hal::{
    AnalogConverter, BlockTransfer, PeriodicTimer, RawSample, SerialTx, TimerPeriod,
    TransferErrors,
};

/// Converter that completes only when told to
#[derive(Debug, Default)]
pub struct MockAdc {
    pub starts: u32,
    pub reads: u32,
    pub complete: bool,
    pub overrun: bool,
    pub value: RawSample,
}

impl MockAdc {
    pub fn new() -> Self {
        Self::default()
    }

    /// Finish a conversion with `value`
    pub fn complete(&mut self, value: RawSample) {
        self.value = value;
        self.complete = true;
    }
}

impl AnalogConverter for MockAdc {
    fn start_conversion(&mut self) {
        self.starts += 1;
    }

    fn is_conversion_complete(&self) -> bool {
        self.complete
    }

    fn read_result(&mut self) -> RawSample {
        self.reads += 1;
        self.value
    }

    fn clear_complete_flag(&mut self) {
        self.complete = false;
    }

    fn is_overrun(&self) -> bool {
        self.overrun
    }

    fn clear_overrun_flag(&mut self) {
        self.overrun = false;
    }
}

#[derive(Debug, Default)]
pub struct MockTimer {
    pub period: Option<TimerPeriod>,
    pub enabled: bool,
    pub elapsed: bool,
    pub clears: u32,
}

impl MockTimer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PeriodicTimer for MockTimer {
    fn configure(&mut self, period: TimerPeriod) {
        self.period = Some(period);
    }

    fn enable(&mut self) {
        self.enabled = true;
    }

    fn is_elapsed(&self) -> bool {
        self.elapsed
    }

    fn clear_elapsed_flag(&mut self) {
        self.elapsed = false;
        self.clears += 1;
    }
}

/// Transfer engine that records every started transfer
///
/// The bytes are copied when the transfer starts, which is what the
/// peripheral would have read had nothing overwritten them mid-flight.
#[derive(Debug, Default)]
pub struct MockDma {
    latched: Vec<u8>,
    pub transfers: Vec<Vec<u8>>,
    pub enabled: bool,
    pub complete: bool,
    pub errors: TransferErrors,
    pub stops: u32,
}

impl MockDma {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hardware finished the current transfer
    pub fn finish(&mut self) {
        self.enabled = false;
        self.complete = true;
    }

    /// Every byte sent so far, in order
    pub fn sent(&self) -> Vec<u8> {
        self.transfers.concat()
    }
}

impl BlockTransfer for MockDma {
    fn set_transfer(&mut self, source: &[u8]) {
        self.latched = source.to_vec();
    }

    fn start(&mut self) {
        self.enabled = true;
        self.transfers.push(self.latched.clone());
    }

    fn stop(&mut self) {
        self.enabled = false;
        self.stops += 1;
    }

    fn is_busy(&self) -> bool {
        self.enabled
    }

    fn is_complete(&self) -> bool {
        self.complete
    }

    fn clear_complete_flag(&mut self) {
        self.complete = false;
    }

    fn error_flags(&self) -> TransferErrors {
        self.errors
    }

    fn clear_error_flags(&mut self, errors: TransferErrors) {
        self.errors.transfer &= !errors.transfer;
        self.errors.fifo &= !errors.fifo;
        self.errors.direct_mode &= !errors.direct_mode;
    }
}

/// Serial port that is always ready and records what it sent
#[derive(Debug, Default)]
pub struct MockSerial {
    pub sent: Vec<u8>,
}

impl MockSerial {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SerialTx for MockSerial {
    fn is_ready_to_send(&self) -> bool {
        true
    }

    fn send_byte(&mut self, byte: u8) {
        self.sent.push(byte);
    }

    fn is_transmission_complete(&self) -> bool {
        true
    }
}
