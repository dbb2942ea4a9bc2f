//! Single-slot tick mailboxes

use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::signal::Signal;

/// Single-slot, last-write-wins tick flag
///
/// Raised from interrupt context, taken by the main loop. Raising an
/// already-raised flag is indistinguishable from raising it once.
pub struct TickFlag<M: RawMutex> {
    signal: Signal<M, ()>,
}

impl<M: RawMutex> Default for TickFlag<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: RawMutex> TickFlag<M> {
    /// Create a lowered flag
    pub const fn new() -> Self {
        Self {
            signal: Signal::new(),
        }
    }

    /// Raise the flag (interrupt context)
    pub fn raise(&self) {
        self.signal.signal(());
    }

    /// Lower the flag, returning whether it was raised
    pub fn take(&self) -> bool {
        self.signal.try_take().is_some()
    }

    /// Check the flag without lowering it
    pub fn is_pending(&self) -> bool {
        self.signal.signaled()
    }

    /// Suspend until the flag is raised, then lower it
    pub async fn wait(&self) {
        self.signal.wait().await
    }
}

/// Which ticks were pending when the loop looked
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Due {
    /// Sample tick pending
    pub sample: bool,
    /// Display tick pending
    pub display: bool,
}

impl Due {
    /// Check if any tick was pending
    pub fn any(&self) -> bool {
        self.sample || self.display
    }
}

/// The sample-rate and display-rate tick flags
pub struct Ticks<M: RawMutex> {
    /// Raised by the sample timer
    pub sample: TickFlag<M>,
    /// Raised by the display timer
    pub display: TickFlag<M>,
}

impl<M: RawMutex> Default for Ticks<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: RawMutex> Ticks<M> {
    /// Create both flags lowered
    pub const fn new() -> Self {
        Self {
            sample: TickFlag::new(),
            display: TickFlag::new(),
        }
    }

    /// Take both flags without waiting
    pub fn poll(&self) -> Due {
        Due {
            sample: self.sample.take(),
            display: self.display.take(),
        }
    }

    /// Suspend until at least one flag is raised, then take both
    pub async fn next(&self) -> Due {
        // The winning wait has already lowered its flag
        let woken = match select(self.sample.wait(), self.display.wait()).await {
            Either::First(()) => Due {
                sample: true,
                display: false,
            },
            Either::Second(()) => Due {
                sample: false,
                display: true,
            },
        };

        let rest = self.poll();
        Due {
            sample: woken.sample || rest.sample,
            display: woken.display || rest.display,
        }
    }
}
