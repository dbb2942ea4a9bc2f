//! General-purpose timers as periodic tick sources

use vumeter_hal::{PeriodicTimer, TimerPeriod};

use crate::pac;

/// A general-purpose timer running in up-counting mode
///
/// Only the update event is used. Both TIM2 (32-bit) and TIM3 (16-bit)
/// are programmed with 16-bit values.
pub struct Timer<TIM> {
    tim: TIM,
}

impl<TIM> Timer<TIM> {
    /// Take ownership of a timer whose bus clock is already enabled
    pub fn new(tim: TIM) -> Self {
        Self { tim }
    }
}

macro_rules! periodic_timer {
    ($($TIM:ident,)+) => {
        $(
            impl PeriodicTimer for Timer<pac::$TIM> {
                fn configure(&mut self, period: TimerPeriod) {
                    self.tim.cr1.modify(|_, w| w.cen().clear_bit());
                    self.tim.psc.write(|w| unsafe { w.bits(u32::from(period.prescaler)) });
                    self.tim.arr.write(|w| unsafe { w.bits(u32::from(period.autoreload)) });
                    // Load the prescaler now instead of at the first overflow
                    self.tim.egr.write(|w| w.ug().set_bit());
                    self.tim.sr.modify(|_, w| w.uif().clear_bit());
                }

                fn enable(&mut self) {
                    self.tim.dier.modify(|_, w| w.uie().set_bit());
                    self.tim.cr1.modify(|_, w| w.cen().set_bit());
                }

                fn is_elapsed(&self) -> bool {
                    self.tim.sr.read().uif().bit_is_set()
                }

                fn clear_elapsed_flag(&mut self) {
                    self.tim.sr.modify(|_, w| w.uif().clear_bit());
                }
            }
        )+
    };
}

periodic_timer! {
    TIM2,
    TIM3,
}
