//! Time-based value interpolation with delay and infinite yoyo repeat.
//!
//! A [`Tween`] is sampled statelessly from an elapsed-seconds value: the same
//! input always yields the same output, so the caller can drive sampling from
//! any clock without the tween needing a per-frame update callback. Yoyo
//! semantics run the eased interpolation forward over `duration`, then back
//! over the same `duration`, repeating forever. There is no terminal state and
//! no cancellation; a tween outlives the values it animates.

/// Easing curve applied to the normalized phase of each half-cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ease {
    Linear,
    /// Decelerating quadratic, the conventional default for UI motion.
    #[default]
    QuadOut,
    SineInOut,
}

impl Ease {
    /// Map a phase in [0, 1] to an eased value in [0, 1].
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::QuadOut => t * (2.0 - t),
            Ease::SineInOut => 0.5 - 0.5 * (std::f32::consts::PI * t).cos(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Tween {
    pub from: f32,
    pub to: f32,
    /// Seconds for one half-cycle (forward or backward leg).
    pub duration: f64,
    /// Seconds to hold `from` before the first forward leg.
    pub delay: f64,
    pub ease: Ease,
}

impl Tween {
    pub fn new(from: f32, to: f32, duration: f64, delay: f64) -> Self {
        debug_assert!(duration > 0.0, "tween duration must be positive");
        Self {
            from,
            to,
            duration,
            delay,
            ease: Ease::default(),
        }
    }

    pub fn with_ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    /// Sample the tween at `elapsed` seconds since it was declared.
    pub fn sample(&self, elapsed: f64) -> f32 {
        if elapsed <= self.delay {
            return self.from;
        }
        let cycle = 2.0 * self.duration;
        let local = (elapsed - self.delay) % cycle;
        // Forward leg on [0, duration), backward leg on [duration, 2*duration).
        let phase = if local < self.duration {
            local / self.duration
        } else {
            2.0 - local / self.duration
        };
        self.from + (self.to - self.from) * self.ease.apply(phase as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f32, b: f32) {
        assert!((a - b).abs() < 1e-5, "expected {b}, got {a}");
    }

    #[test]
    fn holds_start_value_through_delay() {
        let tween = Tween::new(1.0, 1.1, 3.0, 2.0);
        assert_close(tween.sample(0.0), 1.0);
        assert_close(tween.sample(1.999), 1.0);
        assert_close(tween.sample(2.0), 1.0);
    }

    #[test]
    fn midpoint_is_strictly_between_endpoints() {
        // The three demo tweens, sampled halfway through the forward leg.
        let cases = [
            Tween::new(1.0, 1.1, 3.0, 0.0),
            Tween::new(1.0, 1.1, 3.0, 2.0),
            Tween::new(0.0, 0.05, 3.0, 2.0),
        ];
        for tween in cases {
            let mid = tween.sample(tween.delay + tween.duration / 2.0);
            assert!(mid > tween.from, "{mid} should exceed {}", tween.from);
            assert!(mid < tween.to, "{mid} should be below {}", tween.to);
        }
    }

    #[test]
    fn reaches_target_at_end_of_forward_leg() {
        let tween = Tween::new(1.0, 1.1, 3.0, 2.0);
        assert_close(tween.sample(5.0), 1.1);
    }

    #[test]
    fn yoyo_returns_to_start_after_full_cycle() {
        let tween = Tween::new(1.0, 1.1, 3.0, 2.0);
        assert_close(tween.sample(2.0 + 6.0), 1.0);
    }

    #[test]
    fn repeats_indefinitely_with_cycle_period() {
        let tween = Tween::new(0.0, 0.05, 3.0, 2.0);
        for offset in [0.7, 1.3, 2.9, 4.4] {
            let a = tween.sample(2.0 + offset);
            let b = tween.sample(2.0 + offset + 6.0);
            let c = tween.sample(2.0 + offset + 60.0);
            assert_close(a, b);
            assert_close(a, c);
        }
    }

    #[test]
    fn backward_leg_mirrors_forward_leg() {
        let tween = Tween::new(1.0, 1.1, 3.0, 0.0);
        let forward = tween.sample(1.0);
        let backward = tween.sample(5.0); // 2*duration - 1.0 into the cycle
        assert_close(forward, backward);
    }

    #[test]
    fn easing_is_monotonic_on_forward_leg() {
        for ease in [Ease::Linear, Ease::QuadOut, Ease::SineInOut] {
            let tween = Tween::new(0.0, 1.0, 1.0, 0.0).with_ease(ease);
            let mut previous = tween.sample(0.0);
            for step in 1..=100 {
                let value = tween.sample(step as f64 / 100.0);
                assert!(
                    value >= previous,
                    "{ease:?} not monotonic at step {step}: {value} < {previous}"
                );
                previous = value;
            }
            assert_close(previous, 1.0);
        }
    }

    #[test]
    fn linear_midpoint_is_exact() {
        let tween = Tween::new(0.0, 2.0, 4.0, 0.0).with_ease(Ease::Linear);
        assert_close(tween.sample(2.0), 1.0);
    }

    #[test]
    fn decreasing_tween_samples_between_endpoints() {
        let tween = Tween::new(1.0, 0.5, 2.0, 0.0);
        let mid = tween.sample(1.0);
        assert!(mid < 1.0 && mid > 0.5);
    }
}
