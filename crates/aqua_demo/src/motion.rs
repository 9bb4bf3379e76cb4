//! The foreground plane's looping motion.
//!
//! Three independent tweens animate the foreground transform: scale.x and
//! scale.y breathe toward the scale target, rotation.y sways toward a small
//! angle. The y-scale and rotation legs start after a stagger delay so the
//! motion never reads as a single pulse. All three yoyo forever.
//!
//! The driver owns its own clock: sampling happens against seconds elapsed
//! since construction, not against the render loop's frame times, so frame
//! pacing never distorts the motion.

use std::time::Instant;

use aqua_core::Tween;

use crate::scene::{MotionSettings, Transform};

pub struct ForegroundMotion {
    started: Instant,
    scale_x: Tween,
    scale_y: Tween,
    rotation_y: Tween,
}

impl ForegroundMotion {
    pub fn new(settings: &MotionSettings) -> Self {
        Self {
            started: Instant::now(),
            scale_x: Tween::new(1.0, settings.scale_target, settings.duration, 0.0),
            scale_y: Tween::new(
                1.0,
                settings.scale_target,
                settings.duration,
                settings.stagger_delay,
            ),
            rotation_y: Tween::new(
                0.0,
                settings.rotation_target,
                settings.duration,
                settings.stagger_delay,
            ),
        }
    }

    /// Write the current sampled values into the foreground transform.
    pub fn apply(&self, transform: &mut Transform) {
        self.apply_at(self.started.elapsed().as_secs_f64(), transform);
    }

    /// Deterministic variant: sample at an explicit elapsed time.
    pub fn apply_at(&self, elapsed: f64, transform: &mut Transform) {
        transform.scale.x = self.scale_x.sample(elapsed);
        transform.scale.y = self.scale_y.sample(elapsed);
        transform.rotation.y = self.rotation_y.sample(elapsed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::MotionSettings;

    fn default_motion() -> ForegroundMotion {
        ForegroundMotion::new(&MotionSettings::default())
    }

    #[test]
    fn at_start_only_identity_values() {
        let motion = default_motion();
        let mut transform = Transform::identity();
        motion.apply_at(0.0, &mut transform);
        assert_eq!(transform.scale.x, 1.0);
        assert_eq!(transform.scale.y, 1.0);
        assert_eq!(transform.rotation.y, 0.0);
    }

    #[test]
    fn delayed_tweens_hold_until_stagger_elapses() {
        let motion = default_motion();
        let mut transform = Transform::identity();
        // scale.x starts immediately; scale.y and rotation.y wait 2 seconds.
        motion.apply_at(1.5, &mut transform);
        assert!(transform.scale.x > 1.0);
        assert_eq!(transform.scale.y, 1.0);
        assert_eq!(transform.rotation.y, 0.0);
    }

    #[test]
    fn midway_values_are_strictly_between_endpoints() {
        let motion = default_motion();
        let mut transform = Transform::identity();
        // 3.5s = delay(2) + duration(3)/2 for the staggered tweens.
        motion.apply_at(3.5, &mut transform);
        assert!(transform.scale.y > 1.0 && transform.scale.y < 1.1);
        assert!(transform.rotation.y > 0.0 && transform.rotation.y < 0.05);
    }

    #[test]
    fn position_is_never_touched() {
        let motion = default_motion();
        let mut transform = Transform::identity();
        transform.position.z = 0.1;
        for t in [0.0, 1.0, 3.5, 8.0, 100.0] {
            motion.apply_at(t, &mut transform);
            assert_eq!(transform.position.z, 0.1);
        }
    }

    #[test]
    fn motion_loops_back_to_identity() {
        let motion = default_motion();
        let mut transform = Transform::identity();
        // delay + a whole number of 6s yoyo cycles lands back at the start.
        motion.apply_at(2.0 + 12.0, &mut transform);
        assert!((transform.scale.y - 1.0).abs() < 1e-5);
        assert!(transform.rotation.y.abs() < 1e-5);
    }
}
