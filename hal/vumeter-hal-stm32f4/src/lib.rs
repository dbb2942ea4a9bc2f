//! STM32F401 HAL for the vumeter firmware
//!
//! Register-level implementations of the `vumeter-hal` traits for the
//! peripherals the meter uses:
//!
//! | Peripheral       | Role                         | Interrupt       |
//! |------------------|------------------------------|-----------------|
//! | ADC1 channel 0   | Audio input (PA0)            | `ADC`           |
//! | TIM2             | Sample tick                  | `TIM2`          |
//! | TIM3             | Display tick                 | `TIM3`          |
//! | USART2           | Serial output (PA2)          | -               |
//! | DMA1 stream 6/4  | USART2 TX transfers          | `DMA1_STREAM6`  |
//!
//! Clocks and pins are set up through `stm32f4xx-hal`; the peripherals
//! themselves are driven through the PAC so that the interrupt handlers
//! stay in the firmware's hands.
//!
//! # Features
//!
//! - `stm32f401` - STM32F401 (Nucleo-F401RE)
//! - `defmt` - Enable debug formatting support

#![no_std]

pub mod adc;
pub mod board;
pub mod dma;
pub mod timer;
pub mod uart;

pub use adc::Adc1;
pub use board::{Board, BoardClocks};
pub use dma::UsartTxDma;
pub use timer::Timer;
pub use uart::Usart2;

pub use stm32f4xx_hal::pac;
pub use stm32f4xx_hal::pac::{interrupt, Interrupt};
