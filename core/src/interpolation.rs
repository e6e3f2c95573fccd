//! Interpolation of animatable values and of whole node snapshots.

use crate::registry::ComponentDescriptor;
use crate::view::ShadowView;
use num_traits::{Bounded, FromPrimitive};

/// Trait for a type that supports the standard `lerp` (**l**inear int**erp**olation) operation.
///
/// `Lerp` assumes a normalized `x` value, such that _x0_ = 0 and _x1_ = 1, which reduces the
/// straight-line equation to:
///
/// `lerp(y0, y1, x) = y0 + x(y1 - y0)`
///
/// All primitive numeric types are implicitly `lerp`able. Integer types are computed in 32-bit
/// floating-point arithmetic and rounded, saturating at the bounds of the type. For any other type
/// composed of numeric values, the trait can be implemented by `lerp`ing the individual values, or
/// derived with [`Lerp`](../../relayout_macros/derive.Lerp.html).
///
/// Implementations must return exactly `self` when `x` is `0.0` and exactly `y1` when `x` is
/// `1.0`; snapshot interpolation relies on it.
pub trait Lerp {
    /// Computes the linear interpolation between this value (`y0`) and a second (`y1`) value of the
    /// same type, at normalized (from 0 to 1) position `x`.
    ///
    /// # Example
    ///
    /// ```
    /// use relayout_core::interpolation::Lerp;
    ///
    /// let y0: f32 = 5.0;
    /// let y1: f32 = 15.0;
    ///
    /// assert_eq!(y0.lerp(&y1, 0.0), 5.0);
    /// assert_eq!(y0.lerp(&y1, 0.25), 7.5);
    /// assert_eq!(y0.lerp(&y1, 1.0), 15.0);
    /// ```
    fn lerp(&self, y1: &Self, x: f32) -> Self;
}

macro_rules! impl_lerp_for_integer_types {
    ($($t:ty),*) => {
        $( impl Lerp for $t {
            fn lerp(&self, y1: &Self, x: f32) -> Self {
                // Wide values do not survive the round trip through f32.
                if x == 0.0 {
                    return *self;
                }
                if x == 1.0 {
                    return *y1;
                }
                let result_f32 = (*self as f32).lerp(&(*y1 as f32), x).round();
                Self::from_f32(result_f32).unwrap_or(if result_f32 < 0.0 {
                    <$t as Bounded>::min_value()
                } else {
                    <$t as Bounded>::max_value()
                })
            }
        }) *
    }
}

impl_lerp_for_integer_types! { i8, i16, i32, i64, u8, u16, u32, u64, usize }

// Weighted form `(1 - t)a + tb`, exact at both ends.
impl Lerp for f32 {
    fn lerp(&self, y1: &Self, x: f32) -> Self {
        self * (1.0 - x) + y1 * x
    }
}

impl Lerp for f64 {
    fn lerp(&self, y1: &Self, x: f32) -> Self {
        let x = x as f64;
        self * (1.0 - x) + y1 * x
    }
}

/// Props without any animatable content.
impl Lerp for () {
    fn lerp(&self, _y1: &Self, _x: f32) -> Self {}
}

/// Creates the snapshot of a node part-way through its animation.
///
/// The frame, appearance and (when `descriptor` allows) props are interpolated at `progress`,
/// which should already have the animation's progress function applied. All other attributes come
/// from `final_view`. A progress of `0.0` or less returns `start_view` unchanged, and `1.0` or
/// more returns `final_view` unchanged.
pub fn create_interpolated_shadow_view<P: Lerp + Clone>(
    progress: f32,
    start_view: &ShadowView<P>,
    final_view: &ShadowView<P>,
    descriptor: &ComponentDescriptor,
) -> ShadowView<P> {
    if progress <= 0.0 {
        return start_view.clone();
    }
    if progress >= 1.0 {
        return final_view.clone();
    }
    let mut view = final_view.clone();
    view.layout = start_view.layout.lerp(&final_view.layout, progress);
    view.appearance = start_view.appearance.lerp(&final_view.appearance, progress);
    if descriptor.interpolates_props() {
        view.props = start_view.props.lerp(&final_view.props, progress);
    }
    view
}
