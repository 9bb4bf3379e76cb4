pub mod fullscreen;
pub mod viewport;
pub mod window;

pub use fullscreen::{DoubleClickDetector, FullscreenSupport};
pub use viewport::Viewport;
pub use window::PlatformConfig;
