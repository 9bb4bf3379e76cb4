use std::time::Instant;

const FPS_SAMPLE_COUNT: usize = 60;

/// Per-frame wall-clock bookkeeping.
///
/// `begin_frame()` returns the seconds elapsed since construction. Rendering
/// itself doesn't consume the value; it exists as the hook for per-frame logic
/// (the motion driver keeps its own clock) and feeds the smoothed FPS counter.
pub struct FrameClock {
    started: Instant,
    last_instant: Instant,
    pub real_dt: f64,
    pub frame_count: u64,

    fps_samples: [f64; FPS_SAMPLE_COUNT],
    fps_sample_index: usize,
    pub smoothed_fps: f64,
    pub smoothed_frame_time_ms: f64,
}

impl FrameClock {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            started: now,
            last_instant: now,
            real_dt: 0.0,
            frame_count: 0,
            fps_samples: [1.0 / 60.0; FPS_SAMPLE_COUNT],
            fps_sample_index: 0,
            smoothed_fps: 60.0,
            smoothed_frame_time_ms: 16.667,
        }
    }

    /// Advance the clock by one frame and return total elapsed seconds.
    pub fn begin_frame(&mut self) -> f64 {
        let now = Instant::now();
        self.real_dt = now.duration_since(self.last_instant).as_secs_f64();
        self.last_instant = now;
        self.frame_count += 1;

        // FPS smoothing
        self.fps_samples[self.fps_sample_index] = self.real_dt;
        self.fps_sample_index = (self.fps_sample_index + 1) % FPS_SAMPLE_COUNT;
        let avg_dt: f64 = self.fps_samples.iter().sum::<f64>() / FPS_SAMPLE_COUNT as f64;
        self.smoothed_frame_time_ms = avg_dt * 1000.0;
        self.smoothed_fps = if avg_dt > 0.0 { 1.0 / avg_dt } else { 0.0 };

        now.duration_since(self.started).as_secs_f64()
    }

    pub fn elapsed(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;
    use std::time::Duration;

    #[test]
    fn elapsed_is_monotonic() {
        let mut clock = FrameClock::new();
        let a = clock.begin_frame();
        sleep(Duration::from_millis(5));
        let b = clock.begin_frame();
        assert!(b > a);
        assert!(clock.real_dt >= 0.0);
        assert_eq!(clock.frame_count, 2);
    }

    #[test]
    fn elapsed_matches_begin_frame_scale() {
        let mut clock = FrameClock::new();
        sleep(Duration::from_millis(5));
        let frame_elapsed = clock.begin_frame();
        let direct = clock.elapsed();
        assert!(direct >= frame_elapsed);
        assert!(frame_elapsed >= 0.005);
    }
}
