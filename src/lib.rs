//! Layout animations for retained view trees.
//!
//! Relayout schedules animated transitions between successive states of a mounted tree. The
//! reconciler's mutation batches pass through a [`LayoutAnimationKeyFrameManager`], which applies
//! structural changes right away, holds back removals long enough to animate them out, and turns
//! snapshot updates into a stream of interpolated frames.

pub mod prelude;

pub use relayout_core::{
    animation::{AnimationKeyFrame, AnimationState, LayoutAnimation},
    clock::{Clock, ManualClock, MonotonicClock},
    config::{
        AnimationConfig, AnimationPhase, AnimationProperty, AnimationType, LayoutAnimationConfig,
    },
    easing::{CubicBezierEasing, Easing, EasingFunction, SpringEasing},
    error::ConfigError,
    executor::{
        AnimationCallback, AnimationId, AnimationOutcome, CallbackTask, RuntimeExecutor, TaskQueue,
    },
    interpolation::{create_interpolated_shadow_view, Lerp},
    manager::{
        AnimationDelegate, KeyFrameManagerBuilder, LayoutAnimationKeyFrameManager,
        MountingOverrideDelegate,
    },
    mutation::{Mutation, MutationKind},
    ordering::{should_first_come_before_second, sort_mutations},
    progress::calculate_animation_progress,
    registry::{ComponentDescriptor, ComponentRegistry},
    status::AnimationStatusDelegate,
    view::{Appearance, DisplayType, LayoutMetrics, Props, Rect, ShadowView, SurfaceId, Tag},
};
pub use relayout_macros::Lerp;
