//! Conversion from wall-clock time to animation progress.

use crate::animation::LayoutAnimation;
use crate::config::AnimationConfig;
use crate::easing::EasingFunction;

/// Describes the time scale of a single animation phase, in milliseconds.
///
/// Time scales handle the conversion between elapsed time (since the animation was captured) and
/// normalized progress.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimeScale {
    delay: f32,
    duration: f32,
}

impl TimeScale {
    pub fn new(duration: f32, delay: f32) -> Self {
        Self { duration, delay }
    }

    /// Computes the normalized time, between `0.0` and `1.0`, for some elapsed `time`.
    ///
    /// If the `time` is nowhere on the timeline, returns a [`TimeScaleOutOfBounds`] error. A
    /// timeline with no duration ends as soon as its delay has elapsed.
    pub fn get_normalized_time(&self, time: f32) -> Result<f32, TimeScaleOutOfBounds> {
        let time = time - self.delay;
        if time < 0.0 {
            return Err(TimeScaleOutOfBounds::NotStarted);
        }
        if !(self.duration > 0.0) || time > self.duration {
            return Err(TimeScaleOutOfBounds::Ended);
        }
        Ok(time / self.duration)
    }
}

impl From<&AnimationConfig> for TimeScale {
    fn from(config: &AnimationConfig) -> Self {
        Self::new(config.duration, config.delay)
    }
}

/// Error produced by [`TimeScale::get_normalized_time`], specifying which boundary is exceeded by
/// a given time.
#[derive(Debug, Eq, PartialEq)]
pub enum TimeScaleOutOfBounds {
    /// Still within the configured delay. Equivalent to a normalized time of `0.0`.
    NotStarted,
    /// Past the end of the animation. Equivalent to a normalized time of `1.0`.
    Ended,
}

/// Computes the progress of one phase of `animation` at time `now` (milliseconds).
///
/// Returns `(linear, eased)`: the fraction of the phase's duration that has elapsed after its
/// delay, clamped to `[0, 1]`, and that fraction with the phase's progress function applied. The
/// eased value is exactly `0.0` and `1.0` at the ends of the animation regardless of curve, so that
/// the first and last frames land exactly on the start and final snapshots.
pub fn calculate_animation_progress<P>(
    now: u64,
    animation: &LayoutAnimation<P>,
    config: &AnimationConfig,
) -> (f32, f32) {
    let elapsed = now.saturating_sub(animation.start_time()) as f32;
    let linear = match TimeScale::from(config).get_normalized_time(elapsed) {
        Ok(t) => t.clamp(0.0, 1.0),
        Err(TimeScaleOutOfBounds::NotStarted) => 0.0,
        Err(TimeScaleOutOfBounds::Ended) => 1.0,
    };
    let eased = if linear <= 0.0 {
        0.0
    } else if linear >= 1.0 {
        1.0
    } else {
        config.easing().calc(linear)
    };
    (linear, eased)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AnimationType, LayoutAnimationConfig};

    fn animation_started_at(start_time: u64) -> LayoutAnimation {
        let mut animation = LayoutAnimation::new(1, LayoutAnimationConfig::new(100.0), None);
        animation.start(start_time);
        animation
    }

    #[test]
    fn when_before_delay_then_not_started() {
        let timescale = TimeScale::new(10.0, 2.0);

        assert_eq!(timescale.get_normalized_time(0.0), Err(TimeScaleOutOfBounds::NotStarted));
        assert_eq!(timescale.get_normalized_time(1.99), Err(TimeScaleOutOfBounds::NotStarted));
    }

    #[test]
    fn when_after_delay_then_subtracts_delay() {
        let timescale = TimeScale::new(10.0, 2.0);

        assert_eq!(timescale.get_normalized_time(2.0), Ok(0.0));
        assert_eq!(timescale.get_normalized_time(7.0), Ok(0.5));
        assert_eq!(timescale.get_normalized_time(12.0), Ok(1.0));
        assert_eq!(timescale.get_normalized_time(12.5), Err(TimeScaleOutOfBounds::Ended));
    }

    #[test]
    fn when_zero_duration_then_ended_after_delay() {
        let timescale = TimeScale::new(0.0, 5.0);

        assert_eq!(timescale.get_normalized_time(4.0), Err(TimeScaleOutOfBounds::NotStarted));
        assert_eq!(timescale.get_normalized_time(5.0), Err(TimeScaleOutOfBounds::Ended));
    }

    #[test]
    fn progress_is_zero_during_delay() {
        let animation = animation_started_at(1000);
        let config = AnimationConfig::new(AnimationType::EaseIn, 200.0).delay(100.0);

        assert_eq!(calculate_animation_progress(1000, &animation, &config), (0.0, 0.0));
        assert_eq!(calculate_animation_progress(1099, &animation, &config), (0.0, 0.0));
        assert_eq!(calculate_animation_progress(1200, &animation, &config).0, 0.5);
    }

    #[test]
    fn progress_is_clamped_at_one() {
        let animation = animation_started_at(0);
        let config = AnimationConfig::new(AnimationType::Spring, 200.0);

        assert_eq!(calculate_animation_progress(200, &animation, &config), (1.0, 1.0));
        assert_eq!(calculate_animation_progress(5000, &animation, &config), (1.0, 1.0));
    }

    #[test]
    fn zero_duration_completes_immediately() {
        let animation = animation_started_at(50);
        let config = AnimationConfig::new(AnimationType::Linear, 0.0);

        assert_eq!(calculate_animation_progress(50, &animation, &config), (1.0, 1.0));
    }

    #[test]
    fn clock_before_start_counts_as_not_started() {
        let animation = animation_started_at(500);
        let config = AnimationConfig::new(AnimationType::Linear, 100.0);

        assert_eq!(calculate_animation_progress(10, &animation, &config), (0.0, 0.0));
    }

    #[test]
    fn progress_is_non_decreasing_for_increasing_time() {
        let animation = animation_started_at(0);
        for animation_type in [AnimationType::Linear, AnimationType::EaseInEaseOut] {
            let config = AnimationConfig::new(animation_type, 300.0).delay(40.0);
            let mut previous = (0.0, 0.0);
            for now in (0..400).step_by(7) {
                let progress = calculate_animation_progress(now, &animation, &config);
                assert!(progress.0 >= previous.0);
                assert!(progress.1 >= previous.1 - 1e-6);
                previous = progress;
            }
            assert_eq!(previous, (1.0, 1.0));
        }
    }
}
