pub mod time;
pub mod tween;

pub use time::FrameClock;
pub use tween::{Ease, Tween};
