//! ASCII bar rendering
//!
//! Maps the published level to one of 41 fixed bar strings and pushes
//! it through the transmitter on every display tick.

pub mod bar;
pub mod renderer;

pub use bar::{bar_for, bucket_for, BARS, BAR_LEN, THRESHOLDS};
pub use renderer::Renderer;
