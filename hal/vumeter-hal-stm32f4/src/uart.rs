//! USART2 transmitter

use vumeter_hal::{SerialConfig, SerialTx};

use crate::pac;

/// USART2, transmit side only, 8N1
///
/// DMA requests are enabled so a stream can feed the data register;
/// the polled [`SerialTx`] path keeps working alongside it as long as
/// the two never overlap.
pub struct Usart2 {
    usart: pac::USART2,
}

impl Usart2 {
    /// Configure baud rate and enable the transmitter with DMA requests
    pub fn new(usart: pac::USART2, config: SerialConfig, pclk1_hz: u32) -> Self {
        usart.cr1.modify(|_, w| w.ue().clear_bit());
        usart
            .brr
            .write(|w| unsafe { w.bits(u32::from(config.brr(pclk1_hz))) });
        usart.cr2.reset();
        usart.cr3.write(|w| w.dmat().set_bit());
        usart.cr1.write(|w| w.te().set_bit().ue().set_bit());

        Self { usart }
    }

    /// Address of the data register, for use as a DMA destination
    pub fn data_register_address(&self) -> u32 {
        self.usart.dr.as_ptr() as u32
    }
}

impl SerialTx for Usart2 {
    fn is_ready_to_send(&self) -> bool {
        self.usart.sr.read().txe().bit_is_set()
    }

    fn send_byte(&mut self, byte: u8) {
        self.usart.dr.write(|w| unsafe { w.dr().bits(u16::from(byte)) });
    }

    fn is_transmission_complete(&self) -> bool {
        self.usart.sr.read().tc().bit_is_set()
    }
}
