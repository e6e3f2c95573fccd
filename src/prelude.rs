//! Includes the types commonly used for configuring and driving layout animations.

pub use crate::{
    AnimationCallback, AnimationConfig, AnimationDelegate, AnimationOutcome, AnimationPhase,
    AnimationProperty, AnimationType, ComponentDescriptor, ComponentRegistry,
    KeyFrameManagerBuilder, LayoutAnimationConfig, LayoutAnimationKeyFrameManager, Lerp,
    MountingOverrideDelegate, Mutation, ShadowView,
};
