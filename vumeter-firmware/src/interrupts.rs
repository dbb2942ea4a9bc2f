//! Interrupt handlers
//!
//! Each handler does constant work and returns. Before boot has filled
//! the statics in, a handler finds nothing to do.

use vumeter_hal_stm32f4::interrupt;

use crate::channels::{DISPLAY_TICK, SAMPLER, SAMPLE_TICK, TX};

#[interrupt]
fn TIM2() {
    if let Some(source) = SAMPLE_TICK.try_get() {
        source.lock(|cell| cell.borrow_mut().on_interrupt());
    }
}

#[interrupt]
fn TIM3() {
    if let Some(source) = DISPLAY_TICK.try_get() {
        source.lock(|cell| cell.borrow_mut().on_interrupt());
    }
}

#[interrupt]
fn ADC() {
    if let Some(sampler) = SAMPLER.try_get() {
        sampler.on_conversion_complete();
    }
}

/// Transfer complete or error on the USART2 TX stream
#[interrupt]
fn DMA1_STREAM6() {
    if let Some(tx) = TX.try_get() {
        tx.on_transfer_complete();
    }
}
