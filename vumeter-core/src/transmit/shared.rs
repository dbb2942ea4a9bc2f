//! Interrupt-safe transmitter handle
//!
//! The ring's `head` is moved by loop-context producers, its `tail` by
//! the completion interrupt (and by producers on eviction), and the
//! `Busy` state by both. Every access therefore runs inside the mutex's
//! critical section, which on target masks interrupts for its duration.
//!
//! `Busy` is additionally mirrored in an atomic so loop code can poll it
//! without entering a critical section, and an idle [`Signal`] lets async
//! writers suspend until the chain of transfers has drained.

use core::cell::RefCell;
use core::sync::atomic::{AtomicBool, Ordering};

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::signal::Signal;
use vumeter_hal::{BlockTransfer, SerialTx};

use super::engine::{TransmitEngine, TxState, TxStats};

/// Transmitter shared between loop and interrupt context
///
/// # Type Parameters
///
/// - `M`: Raw mutex guarding the engine (`CriticalSectionRawMutex` on target)
/// - `D`: Block-transfer engine
/// - `N`: Ring storage slots
pub struct SharedTransmitter<M: RawMutex, D, const N: usize> {
    engine: Mutex<M, RefCell<TransmitEngine<D, N>>>,
    /// Mirror of `engine.is_busy()`, only stored while the mutex is held
    busy: AtomicBool,
    /// Raised whenever an operation leaves the engine idle
    idle: Signal<M, ()>,
}

impl<M: RawMutex, D: BlockTransfer, const N: usize> SharedTransmitter<M, D, N> {
    /// Create a transmitter around an engine handle
    pub const fn new(dma: D) -> Self {
        Self {
            engine: Mutex::new(RefCell::new(TransmitEngine::new(dma))),
            busy: AtomicBool::new(false),
            idle: Signal::new(),
        }
    }

    /// Run `f` on the engine inside the critical section
    pub fn with<R>(&self, f: impl FnOnce(&mut TransmitEngine<D, N>) -> R) -> R {
        self.engine.lock(|cell| {
            let mut engine = cell.borrow_mut();
            let result = f(&mut engine);

            let busy = engine.is_busy();
            self.busy.store(busy, Ordering::Release);
            if !busy {
                self.idle.signal(());
            }

            result
        })
    }

    /// Stop the transfer engine and reset all state
    pub fn init(&self) {
        self.with(|engine| engine.init());
    }

    /// Start a transfer of the next contiguous run if idle
    pub fn send_available(&self) -> bool {
        self.with(|engine| engine.send_available())
    }

    /// Transfer-complete interrupt entry point
    pub fn on_transfer_complete(&self) {
        self.with(|engine| engine.on_transfer_complete());
    }

    /// Append bytes to the ring in one critical section
    ///
    /// Returns the number of unsent bytes evicted.
    pub fn enqueue(&self, bytes: &[u8]) -> usize {
        self.with(|engine| engine.enqueue(bytes))
    }

    /// Check if a transfer is in flight, without locking
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Current state
    pub fn state(&self) -> TxState {
        self.with(|engine| engine.state())
    }

    /// Counters since creation
    pub fn stats(&self) -> TxStats {
        self.with(|engine| engine.stats())
    }

    /// Suspend until no transfer is in flight
    pub async fn wait_idle(&self) {
        while self.is_busy() {
            self.idle.wait().await;
        }
    }

    /// Queue `bytes` and make sure a transfer is running
    ///
    /// If the ring is full, the oldest unsent bytes are silently evicted.
    /// The caller resumes once the previous chain of transfers has drained
    /// and the new data has been handed to the engine.
    pub async fn buffered_write(&self, bytes: &[u8]) {
        self.enqueue(bytes);
        self.wait_idle().await;
        self.send_available();
    }

    /// Write `bytes` by polling the serial port, bypassing the ring
    ///
    /// Diagnostics only. Spins until any DMA chain has finished, then
    /// until each byte is accepted and the last one has left the shift
    /// register. Must not be called with interrupts masked, or the busy
    /// wait never ends.
    pub fn blocking_write<S: SerialTx>(&self, serial: &mut S, bytes: &[u8]) {
        while self.is_busy() {
            core::hint::spin_loop();
        }

        for &byte in bytes {
            while !serial.is_ready_to_send() {
                core::hint::spin_loop();
            }
            serial.send_byte(byte);
        }

        while !serial.is_transmission_complete() {
            core::hint::spin_loop();
        }
    }
}
