//! Fullscreen presentation toggling.
//!
//! Monitor selection is probed once at startup and stored as a tagged
//! [`FullscreenSupport`] variant rather than re-queried on every toggle. The
//! probe prefers the monitor the window currently occupies and falls back to
//! the primary monitor; if neither is reported the toggle is a logged no-op.
//!
//! The toggle itself is a binary flip: a window that is fullscreen exits, a
//! windowed one requests borderless fullscreen on the probed monitor. Requests
//! the platform denies are fire-and-forget.

use std::time::{Duration, Instant};

use winit::window::{Fullscreen, Window};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FullscreenSupport {
    CurrentMonitor,
    PrimaryMonitor,
    Unsupported,
}

/// Probe which monitor handle the window can go fullscreen on.
pub fn probe(window: &Window) -> FullscreenSupport {
    if window.current_monitor().is_some() {
        FullscreenSupport::CurrentMonitor
    } else if window.primary_monitor().is_some() {
        FullscreenSupport::PrimaryMonitor
    } else {
        FullscreenSupport::Unsupported
    }
}

/// Flip between windowed and borderless fullscreen presentation.
pub fn toggle(window: &Window, support: FullscreenSupport) {
    if window.fullscreen().is_some() {
        window.set_fullscreen(None);
        log::info!("Exiting fullscreen");
        return;
    }

    let monitor = match support {
        FullscreenSupport::CurrentMonitor => window.current_monitor(),
        FullscreenSupport::PrimaryMonitor => window.primary_monitor(),
        FullscreenSupport::Unsupported => {
            log::warn!("Fullscreen is not supported on this platform");
            return;
        }
    };
    window.set_fullscreen(Some(Fullscreen::Borderless(monitor)));
    log::info!("Entering fullscreen");
}

/// Turns discrete click events into double-click activations.
///
/// winit reports raw button presses only, so the pairing is done here: two
/// presses within `threshold` count as one double-click, and the press that
/// completes a pair cannot also start the next one.
pub struct DoubleClickDetector {
    threshold: Duration,
    last_click: Option<Instant>,
}

impl DoubleClickDetector {
    pub const DEFAULT_THRESHOLD: Duration = Duration::from_millis(400);

    pub fn new(threshold: Duration) -> Self {
        Self {
            threshold,
            last_click: None,
        }
    }

    /// Record a click at `now`. Returns true when it completes a double-click.
    pub fn register_click(&mut self, now: Instant) -> bool {
        match self.last_click {
            Some(previous) if now.duration_since(previous) <= self.threshold => {
                self.last_click = None;
                true
            }
            _ => {
                self.last_click = Some(now);
                false
            }
        }
    }
}

impl Default for DoubleClickDetector {
    fn default() -> Self {
        Self::new(Self::DEFAULT_THRESHOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_quick_clicks_are_a_double_click() {
        let mut detector = DoubleClickDetector::new(Duration::from_millis(400));
        let t0 = Instant::now();
        assert!(!detector.register_click(t0));
        assert!(detector.register_click(t0 + Duration::from_millis(100)));
    }

    #[test]
    fn slow_clicks_do_not_pair() {
        let mut detector = DoubleClickDetector::new(Duration::from_millis(400));
        let t0 = Instant::now();
        assert!(!detector.register_click(t0));
        assert!(!detector.register_click(t0 + Duration::from_millis(600)));
    }

    #[test]
    fn completing_click_does_not_start_next_pair() {
        let mut detector = DoubleClickDetector::new(Duration::from_millis(400));
        let t0 = Instant::now();
        assert!(!detector.register_click(t0));
        assert!(detector.register_click(t0 + Duration::from_millis(100)));
        // Third click must start a fresh pair, not chain off the second.
        assert!(!detector.register_click(t0 + Duration::from_millis(200)));
        assert!(detector.register_click(t0 + Duration::from_millis(300)));
    }

    #[test]
    fn click_at_exact_threshold_still_pairs() {
        let mut detector = DoubleClickDetector::new(Duration::from_millis(400));
        let t0 = Instant::now();
        assert!(!detector.register_click(t0));
        assert!(detector.register_click(t0 + Duration::from_millis(400)));
    }
}
