//! DMA1 stream 6, channel 4: memory to USART2 data register

use vumeter_hal::{BlockTransfer, TransferErrors};

use crate::pac;

const STREAM: usize = 6;

/// Request channel for USART2_TX on stream 6
const CHANNEL: u8 = 4;

// Stream 6 flags in HISR / HIFCR
const FEIF6: u32 = 1 << 16;
const DMEIF6: u32 = 1 << 18;
const TEIF6: u32 = 1 << 19;
const HTIF6: u32 = 1 << 20;
const TCIF6: u32 = 1 << 21;

/// Byte transfers from memory into a peripheral register
///
/// Direct mode (no FIFO), memory increment, interrupts on complete and
/// on error. The peripheral address is fixed at construction.
pub struct UsartTxDma {
    dma: pac::DMA1,
}

impl UsartTxDma {
    /// Configure the stream for transfers into `peripheral_address`
    pub fn new(dma: pac::DMA1, peripheral_address: u32) -> Self {
        let mut this = Self { dma };
        this.stop();
        while this.is_busy() {}
        this.clear_flags(FEIF6 | DMEIF6 | TEIF6 | HTIF6 | TCIF6);

        let st = &this.dma.st[STREAM];
        st.par.write(|w| unsafe { w.bits(peripheral_address) });
        st.fcr.reset();
        st.cr.write(|w| unsafe {
            w.chsel()
                .bits(CHANNEL)
                .dir()
                .memory_to_peripheral()
                .minc()
                .set_bit()
                .tcie()
                .set_bit()
                .teie()
                .set_bit()
                .dmeie()
                .set_bit()
        });

        this
    }

    fn flags(&self) -> u32 {
        self.dma.hisr.read().bits()
    }

    fn clear_flags(&mut self, mask: u32) {
        self.dma.hifcr.write(|w| unsafe { w.bits(mask) });
    }
}

impl BlockTransfer for UsartTxDma {
    fn set_transfer(&mut self, source: &[u8]) {
        let st = &self.dma.st[STREAM];
        st.m0ar.write(|w| unsafe { w.bits(source.as_ptr() as u32) });
        st.ndtr.write(|w| unsafe { w.bits(source.len() as u32) });
    }

    fn start(&mut self) {
        // Stale flags from the previous transfer block re-enabling
        self.clear_flags(TCIF6 | HTIF6);
        self.dma.st[STREAM].cr.modify(|_, w| w.en().set_bit());
    }

    fn stop(&mut self) {
        self.dma.st[STREAM].cr.modify(|_, w| w.en().clear_bit());
    }

    fn is_busy(&self) -> bool {
        self.dma.st[STREAM].cr.read().en().bit_is_set()
    }

    fn is_complete(&self) -> bool {
        self.flags() & TCIF6 != 0
    }

    fn clear_complete_flag(&mut self) {
        self.clear_flags(TCIF6 | HTIF6);
    }

    fn error_flags(&self) -> TransferErrors {
        let flags = self.flags();
        TransferErrors {
            transfer: flags & TEIF6 != 0,
            fifo: flags & FEIF6 != 0,
            direct_mode: flags & DMEIF6 != 0,
        }
    }

    fn clear_error_flags(&mut self, errors: TransferErrors) {
        let mut mask = 0;
        if errors.transfer {
            mask |= TEIF6;
        }
        if errors.fifo {
            mask |= FEIF6;
        }
        if errors.direct_mode {
            mask |= DMEIF6;
        }
        if mask != 0 {
            self.clear_flags(mask);
        }
    }
}
