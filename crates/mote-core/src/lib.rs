//! Core types shared by the mote particle clock crates.

mod color;
mod easing;
mod time;

pub use color::Rgb;
pub use easing::Easing;
pub use time::{DIGIT_COUNT, DisplayedTime, ParseTimeError, TimeFormat};
