//! Clock tree, pins and peripheral bring-up

use stm32f4xx_hal::gpio::{Analog, Pin};
use stm32f4xx_hal::prelude::*;
use vumeter_hal::SerialConfig;

use crate::adc::Adc1;
use crate::dma::UsartTxDma;
use crate::pac;
use crate::timer::Timer;
use crate::uart::Usart2;

/// System clock the board is brought up with
pub const SYSCLK_HZ: u32 = 84_000_000;

/// ADC1 channel wired to PA0
const AUDIO_CHANNEL: u8 = 0;

/// Bus clocks after bring-up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BoardClocks {
    /// Core clock
    pub sysclk_hz: u32,
    /// APB1 peripheral clock (USART2)
    pub pclk1_hz: u32,
    /// Clock feeding TIM2 and TIM3
    pub timer_clock_hz: u32,
}

/// Every peripheral the meter drives, configured but not yet running
pub struct Board {
    pub adc: Adc1,
    pub sample_timer: Timer<pac::TIM2>,
    pub display_timer: Timer<pac::TIM3>,
    pub serial: Usart2,
    pub dma: UsartTxDma,
    pub clocks: BoardClocks,
    /// Audio input pin, kept so it stays in analog mode
    pub audio_pin: Pin<'A', 0, Analog>,
}

impl Board {
    /// Bring up clocks, pins and peripherals
    ///
    /// Runs the core from HSI through the PLL at 84 MHz with APB1 at
    /// 42 MHz, which puts TIM2 and TIM3 at 84 MHz. No interrupt line is
    /// unmasked here.
    pub fn init(dp: pac::Peripherals, serial: SerialConfig) -> Self {
        dp.RCC.ahb1enr.modify(|_, w| w.dma1en().set_bit());
        dp.RCC.apb1enr.modify(|_, w| {
            w.tim2en()
                .set_bit()
                .tim3en()
                .set_bit()
                .usart2en()
                .set_bit()
        });
        dp.RCC.apb2enr.modify(|_, w| w.adc1en().set_bit());

        let rcc = dp.RCC.constrain();
        let clocks = rcc
            .cfgr
            .sysclk(SYSCLK_HZ.Hz())
            .pclk1((SYSCLK_HZ / 2).Hz())
            .pclk2(SYSCLK_HZ.Hz())
            .freeze();

        let clocks = BoardClocks {
            sysclk_hz: clocks.sysclk().raw(),
            pclk1_hz: clocks.pclk1().raw(),
            timer_clock_hz: clocks.timclk1().raw(),
        };

        let gpioa = dp.GPIOA.split();
        let audio_pin = gpioa.pa0.into_analog();
        // USART2_TX is AF7; the pin keeps its mode after the handle is dropped
        let _tx_pin = gpioa.pa2.into_alternate::<7>();

        let serial = Usart2::new(dp.USART2, serial, clocks.pclk1_hz);
        let dma = UsartTxDma::new(dp.DMA1, serial.data_register_address());

        Self {
            adc: Adc1::new(dp.ADC1, &dp.ADC_COMMON, AUDIO_CHANNEL),
            sample_timer: Timer::new(dp.TIM2),
            display_timer: Timer::new(dp.TIM3),
            serial,
            dma,
            clocks,
            audio_pin,
        }
    }
}
