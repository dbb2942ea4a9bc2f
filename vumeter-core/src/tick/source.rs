//! Timer-backed tick source

use embassy_sync::blocking_mutex::raw::RawMutex;
use vumeter_hal::{PeriodicTimer, TimerPeriod};

use super::flag::TickFlag;

/// A periodic timer that raises one tick flag
pub struct TickSource<'a, M: RawMutex, T> {
    timer: T,
    flag: &'a TickFlag<M>,
    elapsed: u32,
}

impl<'a, M: RawMutex, T: PeriodicTimer> TickSource<'a, M, T> {
    /// Bind a timer to the flag it raises
    pub fn new(timer: T, flag: &'a TickFlag<M>) -> Self {
        Self {
            timer,
            flag,
            elapsed: 0,
        }
    }

    /// Program the period and start the timer
    pub fn start(&mut self, period: TimerPeriod) {
        self.timer.configure(period);
        self.timer.clear_elapsed_flag();
        self.timer.enable();
    }

    /// Timer interrupt handler
    ///
    /// Constant time: clears the elapsed flag and raises the tick.
    pub fn on_interrupt(&mut self) {
        if self.timer.is_elapsed() {
            self.timer.clear_elapsed_flag();
            self.flag.raise();
            self.elapsed = self.elapsed.wrapping_add(1);
        }
    }

    /// Periods elapsed since start (including coalesced ones)
    pub fn elapsed(&self) -> u32 {
        self.elapsed
    }

    /// Access the underlying timer
    pub fn timer(&self) -> &T {
        &self.timer
    }

    /// Mutable access to the underlying timer
    pub fn timer_mut(&mut self) -> &mut T {
        &mut self.timer
    }
}
