//! Transmit state machine
//!
//! ```text
//!            send_available (run available)
//!   ┌──────┐ ─────────────────────────────► ┌──────────────┐
//!   │ Idle │                                │ Busy { len } │
//!   └──────┘ ◄───────────────────────────── └──────────────┘
//!            on_transfer_complete (advance len,
//!            then send_available again if data remains)
//! ```
//!
//! A payload that wraps past the end of the ring goes out as two chained
//! transfers without the producer being involved.
//!
//! Overwrite-on-full can move the tail into the run that is in flight.
//! Those bytes were already handed to the engine, so they are not counted
//! as evicted and the completion only releases what is left of the run.
//! A fault that disables the engine before completion releases the run
//! the same way, so a later transfer can start.

use vumeter_hal::{BlockTransfer, TransferErrors};

use crate::buffer::CircularBuffer;

/// Transmitter state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TxState {
    /// No transfer in flight
    Idle,
    /// A transfer of `len` bytes from the ring's tail is in flight
    Busy {
        /// Length of the run handed to the engine
        len: usize,
    },
}

impl TxState {
    /// Check if a transfer is in flight
    pub fn is_busy(&self) -> bool {
        matches!(self, TxState::Busy { .. })
    }
}

/// Transmitter counters
///
/// Diagnostic only: faults are counted but never retried.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TxStats {
    /// Transfers started
    pub chunks: u32,
    /// Bytes acknowledged by a completion
    pub bytes_sent: u32,
    /// Unsent bytes dropped by overwrite-on-full
    pub bytes_evicted: u32,
    /// Transfer-error flags observed
    pub transfer_errors: u32,
    /// FIFO-error flags observed
    pub fifo_errors: u32,
    /// Direct-mode-error flags observed
    pub direct_mode_errors: u32,
    /// Runs dropped because a fault stopped the engine before completion
    pub chunks_abandoned: u32,
}

impl TxStats {
    fn record_errors(&mut self, errors: TransferErrors) {
        if errors.transfer {
            self.transfer_errors = self.transfer_errors.wrapping_add(1);
        }
        if errors.fifo {
            self.fifo_errors = self.fifo_errors.wrapping_add(1);
        }
        if errors.direct_mode {
            self.direct_mode_errors = self.direct_mode_errors.wrapping_add(1);
        }
    }
}

/// Ring buffer plus the block-transfer engine draining it
///
/// # Type Parameters
///
/// - `D`: Block-transfer engine
/// - `N`: Ring storage slots (usable capacity `N - 1`)
pub struct TransmitEngine<D, const N: usize> {
    buffer: CircularBuffer<N>,
    dma: D,
    state: TxState,
    /// Bytes of the in-flight run the tail has already moved past
    overtaken: usize,
    stats: TxStats,
}

impl<D: BlockTransfer, const N: usize> TransmitEngine<D, N> {
    /// Create an idle engine with an empty ring
    pub const fn new(dma: D) -> Self {
        Self {
            buffer: CircularBuffer::new(),
            dma,
            state: TxState::Idle,
            overtaken: 0,
            stats: TxStats {
                chunks: 0,
                bytes_sent: 0,
                bytes_evicted: 0,
                transfer_errors: 0,
                fifo_errors: 0,
                direct_mode_errors: 0,
                chunks_abandoned: 0,
            },
        }
    }

    /// Stop the engine, clear every flag and empty the ring
    pub fn init(&mut self) {
        self.stop_and_wait();
        self.dma.clear_complete_flag();
        self.dma.clear_error_flags(TransferErrors::ALL);
        self.buffer.init();
        self.state = TxState::Idle;
        self.overtaken = 0;
    }

    /// Append bytes to the ring without starting a transfer
    ///
    /// Returns the number of unsent bytes evicted to make room. Bytes of
    /// the in-flight run are not counted: the engine is already sending
    /// them.
    pub fn enqueue(&mut self, bytes: &[u8]) -> usize {
        let mut evicted = 0;
        for &byte in bytes {
            if !self.buffer.write_byte(byte) {
                continue;
            }
            match self.state {
                TxState::Busy { len } if self.overtaken < len => self.overtaken += 1,
                _ => evicted += 1,
            }
        }
        self.stats.bytes_evicted = self.stats.bytes_evicted.wrapping_add(evicted as u32);
        evicted
    }

    /// Hand the ring's next contiguous run to the engine
    ///
    /// No-op if a transfer is already in flight or the ring is empty.
    /// Returns `true` if a transfer was started.
    pub fn send_available(&mut self) -> bool {
        if self.state.is_busy() {
            return false;
        }

        let Some(run) = self.buffer.peek_contiguous_run() else {
            return false;
        };

        self.state = TxState::Busy { len: run.len };
        self.overtaken = 0;

        // The engine must be fully disabled before it can be reprogrammed
        self.stop_and_wait();
        self.dma.set_transfer(self.buffer.run_bytes(run));
        self.dma.start();

        self.stats.chunks = self.stats.chunks.wrapping_add(1);
        true
    }

    /// Transfer-complete interrupt handler
    ///
    /// Error flags are observed, counted and cleared first. On completion:
    /// clear the flag, go idle, release the sent run and chain the next run
    /// if data remains. A fault that left the engine stopped without a
    /// completion abandons the run the same way; it is not retried.
    pub fn on_transfer_complete(&mut self) {
        let errors = self.dma.error_flags();
        if !errors.is_empty() {
            self.stats.record_errors(errors);
            self.dma.clear_error_flags(errors);
        }

        if self.dma.is_complete() {
            self.dma.clear_complete_flag();
            if let Some(len) = self.release_in_flight() {
                self.stats.bytes_sent = self.stats.bytes_sent.wrapping_add(len as u32);
            }
        } else if !errors.is_empty() && !self.dma.is_busy() {
            if self.release_in_flight().is_some() {
                self.stats.chunks_abandoned = self.stats.chunks_abandoned.wrapping_add(1);
            }
        } else {
            return;
        }

        if self.buffer.count() > 0 {
            self.send_available();
        }
    }

    /// Current state
    pub fn state(&self) -> TxState {
        self.state
    }

    /// Check if a transfer is in flight
    pub fn is_busy(&self) -> bool {
        self.state.is_busy()
    }

    /// Counters since creation
    pub fn stats(&self) -> TxStats {
        self.stats
    }

    /// The ring being drained
    pub fn buffer(&self) -> &CircularBuffer<N> {
        &self.buffer
    }

    /// Access the block-transfer engine
    pub fn dma(&self) -> &D {
        &self.dma
    }

    /// Mutable access to the block-transfer engine
    pub fn dma_mut(&mut self) -> &mut D {
        &mut self.dma
    }

    /// Go idle and release what is left of the in-flight run
    fn release_in_flight(&mut self) -> Option<usize> {
        let TxState::Busy { len } = self.state else {
            return None;
        };
        self.state = TxState::Idle;
        self.buffer.advance(len - self.overtaken);
        self.overtaken = 0;
        Some(len)
    }

    fn stop_and_wait(&mut self) {
        self.dma.stop();
        while self.dma.is_busy() {
            core::hint::spin_loop();
        }
    }
}
