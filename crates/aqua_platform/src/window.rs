//! Window bring-up.
//!
//! The config is validated at use rather than at construction: a zero
//! dimension falls back to the default size so a bad value can never request
//! an unmappable window, and a minimum inner size keeps the surface and the
//! camera aspect well-defined however small the user drags the window.

use std::sync::Arc;

use winit::dpi::LogicalSize;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowAttributes};

/// Smallest logical size the window may shrink to.
const MIN_LOGICAL_SIZE: LogicalSize<u32> = LogicalSize::new(320, 180);

pub struct PlatformConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub resizable: bool,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            title: "Aquarelle".to_string(),
            width: 1280,
            height: 720,
            resizable: true,
        }
    }
}

impl PlatformConfig {
    /// Initial logical size, with zero dimensions replaced by the defaults.
    pub fn logical_size(&self) -> LogicalSize<u32> {
        let fallback = Self::default();
        LogicalSize::new(
            if self.width == 0 {
                fallback.width
            } else {
                self.width
            },
            if self.height == 0 {
                fallback.height
            } else {
                self.height
            },
        )
    }
}

pub fn create_window(event_loop: &ActiveEventLoop, config: &PlatformConfig) -> Arc<Window> {
    let size = config.logical_size();
    let attrs = WindowAttributes::default()
        .with_title(&config.title)
        .with_inner_size(size)
        .with_min_inner_size(MIN_LOGICAL_SIZE)
        .with_resizable(config.resizable);

    let window = event_loop
        .create_window(attrs)
        .expect("Failed to create window");
    log::info!(
        "Window '{}' created at {}x{} (scale factor {})",
        config.title,
        size.width,
        size.height,
        window.scale_factor()
    );
    Arc::new(window)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_hd_and_resizable() {
        let config = PlatformConfig::default();
        assert_eq!(config.logical_size(), LogicalSize::new(1280, 720));
        assert!(config.resizable);
    }

    #[test]
    fn zero_dimensions_fall_back_to_defaults() {
        let config = PlatformConfig {
            width: 0,
            height: 480,
            ..Default::default()
        };
        assert_eq!(config.logical_size(), LogicalSize::new(1280, 480));

        let config = PlatformConfig {
            width: 640,
            height: 0,
            ..Default::default()
        };
        assert_eq!(config.logical_size(), LogicalSize::new(640, 720));
    }
}
