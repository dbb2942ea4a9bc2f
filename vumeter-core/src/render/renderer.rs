//! Display-tick renderer

use embassy_sync::blocking_mutex::raw::RawMutex;
use vumeter_hal::BlockTransfer;

use super::bar::bar_for;
use crate::sampler::PublishedLevel;
use crate::transmit::SharedTransmitter;

/// Renders the published level as a bar
pub struct Renderer<'a> {
    level: &'a PublishedLevel,
    frames: u32,
}

impl<'a> Renderer<'a> {
    /// Create a renderer reading from `level`
    pub const fn new(level: &'a PublishedLevel) -> Self {
        Self { level, frames: 0 }
    }

    /// Bar for the current level
    pub fn frame(&self) -> &'static str {
        bar_for(self.level.get())
    }

    /// Display tick: queue the current bar for transmission
    pub async fn on_display_tick<M, D, const N: usize>(
        &mut self,
        tx: &SharedTransmitter<M, D, N>,
    ) where
        M: RawMutex,
        D: BlockTransfer,
    {
        let bar = self.frame();
        tx.buffered_write(bar.as_bytes()).await;
        self.frames = self.frames.wrapping_add(1);
    }

    /// Frames queued since creation
    pub fn frames(&self) -> u32 {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockDma;
    use embassy_futures::block_on;
    use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;

    #[test]
    fn test_frame_follows_level() {
        let level = PublishedLevel::new();
        let renderer = Renderer::new(&level);
        assert_eq!(renderer.frame(), "\r[....................]");

        level.publish(300);
        assert_eq!(renderer.frame(), "\r[||||||||............]");
    }

    #[test]
    fn test_display_tick_transmits_bar() {
        let level = PublishedLevel::new();
        let tx: SharedTransmitter<CriticalSectionRawMutex, MockDma, 256> =
            SharedTransmitter::new(MockDma::new());
        tx.init();
        let mut renderer = Renderer::new(&level);

        level.publish(131);
        block_on(renderer.on_display_tick(&tx));

        assert_eq!(tx.with(|e| e.dma().sent()), b"\r[|||:................]");
        assert_eq!(renderer.frames(), 1);
    }
}
