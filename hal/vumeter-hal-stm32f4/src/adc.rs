//! ADC1 single-channel converter

use vumeter_hal::{AnalogConverter, RawSample};

use crate::pac;

/// End of conversion (SR bit 1)
const SR_EOC: u32 = 1 << 1;
/// Overrun (SR bit 5)
const SR_OVR: u32 = 1 << 5;

/// Sample time code for 56 ADC clock cycles
const SAMPLE_TIME_56: u32 = 0b011;

/// ADC1 converting one regular channel per software trigger
pub struct Adc1 {
    adc: pac::ADC1,
}

impl Adc1 {
    /// Configure ADC1 for single software-triggered conversions
    ///
    /// The ADC clock is PCLK2 / 4, which keeps it under the 36 MHz limit
    /// at an 84 MHz APB2. Completion and overrun interrupts are enabled
    /// at the peripheral; the NVIC line stays masked until the caller
    /// unmasks it.
    pub fn new(adc: pac::ADC1, common: &pac::ADC_COMMON, channel: u8) -> Self {
        common.ccr.modify(|_, w| w.adcpre().div4());

        adc.cr2.modify(|_, w| w.adon().clear_bit());
        // 12-bit, single conversion, EOC after each regular conversion
        adc.cr1.write(|w| w.eocie().set_bit().ovrie().set_bit());
        adc.cr2.write(|w| w.eocs().set_bit());

        let channel = u32::from(channel & 0x1F);
        // Sequence of length 1 holding `channel`
        adc.sqr1.write(|w| unsafe { w.bits(0) });
        adc.sqr3.write(|w| unsafe { w.bits(channel) });
        if channel < 10 {
            adc.smpr2
                .write(|w| unsafe { w.bits(SAMPLE_TIME_56 << (3 * channel)) });
        } else {
            adc.smpr1
                .write(|w| unsafe { w.bits(SAMPLE_TIME_56 << (3 * (channel - 10))) });
        }

        adc.cr2.modify(|_, w| w.adon().set_bit());

        Self { adc }
    }

    /// Clear status flags given by `mask`
    ///
    /// SR flags are cleared by writing 0; writing 1 leaves them alone.
    fn clear_status(&mut self, mask: u32) {
        self.adc.sr.write(|w| unsafe { w.bits(!mask) });
    }
}

impl AnalogConverter for Adc1 {
    fn start_conversion(&mut self) {
        self.adc.cr2.modify(|_, w| w.swstart().set_bit());
    }

    fn is_conversion_complete(&self) -> bool {
        self.adc.sr.read().eoc().bit_is_set()
    }

    fn read_result(&mut self) -> RawSample {
        self.adc.dr.read().data().bits()
    }

    fn clear_complete_flag(&mut self) {
        self.clear_status(SR_EOC);
    }

    fn is_overrun(&self) -> bool {
        self.adc.sr.read().ovr().bit_is_set()
    }

    fn clear_overrun_flag(&mut self) {
        self.clear_status(SR_OVR);
    }
}
