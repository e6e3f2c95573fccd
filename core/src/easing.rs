//! Progress functions, AKA easings, applied to the linear progress of a layout animation.

use dyn_clone::{clone_trait_object, DynClone};
use lazy_static::lazy_static;
use lyon_geom::{CubicBezierSegment, Point};
use std::f32::consts::PI;
use std::fmt::Debug;

/// Maps normalized linear progress to the progress used for interpolation.
///
/// Expects `x` to be normalized (from 0 to 1) and returns a normalized y-value which is typically
/// between 0 and 1, but may be outside that range for curves that overshoot (e.g. springs).
pub trait EasingFunction: Debug + DynClone + Send + Sync {
    fn calc(&self, x: f32) -> f32;
}

clone_trait_object!(EasingFunction);

/// Progress function selected by an animation's configuration.
#[derive(Clone, Debug, Default)]
pub enum Easing {
    /// No easing; interpolation follows elapsed time exactly.
    #[default]
    Linear,
    /// Equivalent to CSS `ease-in`.
    EaseIn,
    /// Equivalent to CSS `ease-out`.
    EaseOut,
    /// Equivalent to CSS `ease-in-out`.
    EaseInEaseOut,
    /// Curve approximating the movement of an on-screen keyboard.
    Keyboard,
    /// Decaying oscillation that overshoots and settles at the final value. Smaller `damping`
    /// oscillates faster.
    Spring { damping: f32 },
    /// Application-provided curve.
    Custom(Box<dyn EasingFunction>),
}

impl EasingFunction for Easing {
    fn calc(&self, x: f32) -> f32 {
        match self {
            Self::Linear => x,
            Self::EaseIn => EASE_IN.calc(x),
            Self::EaseOut => EASE_OUT.calc(x),
            Self::EaseInEaseOut => EASE_IN_OUT.calc(x),
            Self::Keyboard => EASE_KEYBOARD.calc(x),
            Self::Spring { damping } => SpringEasing::new(*damping).calc(x),
            Self::Custom(custom) => custom.calc(x),
        }
    }
}

lazy_static! {
    static ref EASE_IN: CubicBezierEasing = CubicBezierEasing::new(0.42, 0.0, 1.0, 1.0);
    static ref EASE_OUT: CubicBezierEasing = CubicBezierEasing::new(0.0, 0.0, 0.58, 1.0);
    static ref EASE_IN_OUT: CubicBezierEasing = CubicBezierEasing::new(0.42, 0.0, 0.58, 1.0);
    static ref EASE_KEYBOARD: CubicBezierEasing = CubicBezierEasing::new(0.38, 0.7, 0.125, 1.0);
}

/// Easing function defined by a cubic bezier curve with the start and end points fixed at `(0, 0)`
/// and `(1, 1)`, i.e. only the control points are specified.
///
/// Control point x-values are expected to be in `[0, 1]`, so that the curve is a function of x.
#[derive(Clone, Debug)]
pub struct CubicBezierEasing {
    segment: CubicBezierSegment<f32>,
}

impl CubicBezierEasing {
    /// Creates a new [`CubicBezierEasing`] with control points `(x1, y1)` and `(x2, y2)`.
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self {
            segment: CubicBezierSegment {
                from: Point::new(0.0, 0.0),
                to: Point::new(1.0, 1.0),
                ctrl1: Point::new(x1, y1),
                ctrl2: Point::new(x2, y2),
            },
        }
    }

    // The curve is parameterized by `t`, not `x`. Bisect for the `t` whose x-coordinate is `x`.
    fn solve_t_for_x(&self, x: f32) -> f32 {
        let (mut lo, mut hi) = (0.0f32, 1.0f32);
        for _ in 0..32 {
            let mid = (lo + hi) * 0.5;
            if self.segment.x(mid) < x {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        (lo + hi) * 0.5
    }
}

impl EasingFunction for CubicBezierEasing {
    fn calc(&self, x: f32) -> f32 {
        if x <= 0.0 {
            return 0.0;
        }
        if x >= 1.0 {
            return 1.0;
        }
        self.segment.y(self.solve_t_for_x(x))
    }
}

/// Exponentially decaying sine wave around the final value.
#[derive(Clone, Debug)]
pub struct SpringEasing {
    damping: f32,
}

impl SpringEasing {
    pub fn new(damping: f32) -> Self {
        Self { damping }
    }
}

impl EasingFunction for SpringEasing {
    fn calc(&self, x: f32) -> f32 {
        if !(self.damping > 0.0) {
            return x;
        }
        1.0 + 2f32.powf(-10.0 * x) * ((x - self.damping / 4.0) * PI * 2.0 / self.damping).sin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn linear_is_identity() {
        for x in [0.0, 0.1, 0.5, 0.99, 1.0] {
            assert_eq!(Easing::Linear.calc(x), x);
        }
    }

    #[test]
    fn bezier_curves_pass_through_endpoints() {
        for easing in [Easing::EaseIn, Easing::EaseOut, Easing::EaseInEaseOut, Easing::Keyboard] {
            assert_eq!(easing.calc(0.0), 0.0);
            assert_eq!(easing.calc(1.0), 1.0);
        }
    }

    #[test]
    fn ease_in_out_is_symmetric() {
        assert_relative_eq!(Easing::EaseInEaseOut.calc(0.5), 0.5, epsilon = 0.001);
        assert_relative_eq!(
            Easing::EaseInEaseOut.calc(0.2),
            1.0 - Easing::EaseInEaseOut.calc(0.8),
            epsilon = 0.001
        );
    }

    #[test]
    fn ease_in_starts_slow_and_ease_out_starts_fast() {
        assert!(Easing::EaseIn.calc(0.25) < 0.25);
        assert!(Easing::EaseOut.calc(0.25) > 0.25);
    }

    #[test]
    fn bezier_is_monotonic() {
        let mut previous = 0.0;
        for step in 0..=50 {
            let y = Easing::EaseInEaseOut.calc(step as f32 / 50.0);
            assert!(y >= previous - 1e-6);
            previous = y;
        }
    }

    #[test]
    fn spring_starts_at_zero_and_settles_near_one() {
        let spring = Easing::Spring { damping: 0.5 };
        assert_relative_eq!(spring.calc(0.0), 0.0, epsilon = 1e-6);
        assert_relative_eq!(spring.calc(1.0), 1.0, epsilon = 0.002);
        let overshoot = (1..100).map(|i| spring.calc(i as f32 / 100.0)).fold(0.0, f32::max);
        assert!(overshoot > 1.0);
    }

    #[test]
    fn custom_easing_is_used() {
        #[derive(Clone, Debug)]
        struct Square;

        impl EasingFunction for Square {
            fn calc(&self, x: f32) -> f32 {
                x * x
            }
        }

        let easing = Easing::Custom(Box::new(Square));
        assert_eq!(easing.clone().calc(0.5), 0.25);
    }
}
