//! Logical window size tracking and render-target sizing.
//!
//! The viewport stores the window's logical dimensions and the platform scale
//! factor separately. The render target is sized as logical size times the
//! scale factor, with the scale factor clamped to at most
//! [`MAX_PIXEL_RATIO`] so very-high-density displays don't quadruple the
//! fragment-shading cost for no visible gain.

/// Upper bound on the device pixel ratio used for the render target.
pub const MAX_PIXEL_RATIO: f64 = 2.0;

#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    width: u32,
    height: u32,
    scale_factor: f64,
}

impl Viewport {
    pub fn new(width: u32, height: u32, scale_factor: f64) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            scale_factor: if scale_factor > 0.0 { scale_factor } else { 1.0 },
        }
    }

    /// Record a new logical size. Zero-sized updates (minimized windows)
    /// are ignored so the last valid size stays in effect.
    pub fn set_size(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            return false;
        }
        self.width = width;
        self.height = height;
        true
    }

    pub fn set_scale_factor(&mut self, scale_factor: f64) {
        if scale_factor > 0.0 {
            self.scale_factor = scale_factor;
        }
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Effective pixel ratio after clamping.
    pub fn pixel_ratio(&self) -> f64 {
        self.scale_factor.min(MAX_PIXEL_RATIO)
    }

    /// Physical size of the render target in pixels.
    pub fn render_size(&self) -> (u32, u32) {
        let ratio = self.pixel_ratio();
        let w = (self.width as f64 * ratio).round() as u32;
        let h = (self.height as f64 * ratio).round() as u32;
        (w.max(1), h.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_ratio_is_width_over_height() {
        let vp = Viewport::new(1920, 1080, 1.0);
        assert!((vp.aspect_ratio() - 1920.0 / 1080.0).abs() < f32::EPSILON);
    }

    #[test]
    fn set_size_updates_aspect() {
        let mut vp = Viewport::new(800, 600, 1.0);
        assert!(vp.set_size(1000, 500));
        assert_eq!(vp.size(), (1000, 500));
        assert!((vp.aspect_ratio() - 2.0).abs() < f32::EPSILON);
    }

    #[test]
    fn zero_size_is_ignored() {
        let mut vp = Viewport::new(800, 600, 1.0);
        assert!(!vp.set_size(0, 600));
        assert!(!vp.set_size(800, 0));
        assert_eq!(vp.size(), (800, 600));
    }

    #[test]
    fn render_size_uses_platform_ratio_below_cap() {
        let vp = Viewport::new(800, 600, 1.5);
        assert_eq!(vp.render_size(), (1200, 900));
    }

    #[test]
    fn render_size_clamps_pixel_ratio_to_two() {
        let vp = Viewport::new(800, 600, 3.0);
        assert_eq!(vp.pixel_ratio(), 2.0);
        assert_eq!(vp.render_size(), (1600, 1200));
    }

    #[test]
    fn invalid_scale_factor_keeps_previous() {
        let mut vp = Viewport::new(800, 600, 2.0);
        vp.set_scale_factor(0.0);
        assert_eq!(vp.pixel_ratio(), 2.0);
        vp.set_scale_factor(-1.0);
        assert_eq!(vp.pixel_ratio(), 2.0);
    }
}
