//! Layout animations and the keyframes they drive.

use crate::config::{AnimationConfig, AnimationPhase, LayoutAnimationConfig};
use crate::executor::{AnimationCallback, AnimationId, AnimationOutcome, CallbackTask};
use crate::mutation::Mutation;
use crate::view::{ShadowView, Tag};

/// Lifecycle of a [`LayoutAnimation`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AnimationState {
    /// Configured, waiting for the next batch of mutations.
    Pending,
    /// Captured a batch and has at least one keyframe still running.
    InFlight,
    /// All keyframes resolved. The callback has been dispatched.
    Completed,
    /// Replaced or interrupted before finishing. The callback has been dispatched.
    Canceled,
}

/// The animated transition of a single node within one [`LayoutAnimation`].
#[derive(Clone, Debug)]
pub struct AnimationKeyFrame<P = ()> {
    pub tag: Tag,
    pub parent: Tag,
    /// Selects which of the owning animation's [`AnimationConfig`]s times this keyframe.
    pub phase: AnimationPhase,
    /// The mutation that was diverted into this keyframe.
    pub mutation: Mutation<P>,
    pub start_view: ShadowView<P>,
    pub final_view: ShadowView<P>,
    /// Snapshot most recently sent to the host, i.e. what is currently mounted.
    pub view_prev: ShadowView<P>,
    /// Mutations held back until the keyframe completes, e.g. the `Remove` and `Delete` of an exit
    /// animation. Their indices are kept current as siblings change.
    pub final_mutations: Vec<Mutation<P>>,
    /// Clock time, in milliseconds, at which the keyframe was captured.
    pub start_time: u64,
    pub interrupted: bool,
}

impl<P: Clone> AnimationKeyFrame<P> {
    pub fn new(
        phase: AnimationPhase,
        mutation: Mutation<P>,
        parent: Tag,
        start_view: ShadowView<P>,
        final_view: ShadowView<P>,
    ) -> Self {
        Self {
            tag: final_view.tag,
            parent,
            phase,
            mutation,
            view_prev: start_view.clone(),
            start_view,
            final_view,
            final_mutations: Vec::new(),
            start_time: 0,
            interrupted: false,
        }
    }

    /// Returns `true` if this keyframe holds back a `Remove` of its node, i.e. the node is still
    /// mounted and occupies a slot among its siblings until the keyframe completes.
    pub fn is_exit(&self) -> bool {
        self.final_mutations
            .iter()
            .any(|mutation| matches!(mutation, Mutation::Remove { .. }))
    }
}

/// One user-requested animation, grouping its configuration, keyframes and completion callback.
#[derive(Debug)]
pub struct LayoutAnimation<P = ()> {
    id: AnimationId,
    config: LayoutAnimationConfig,
    start_time: u64,
    state: AnimationState,
    interrupted: bool,
    callback: Option<AnimationCallback>,
    pub key_frames: Vec<AnimationKeyFrame<P>>,
}

impl<P> LayoutAnimation<P> {
    pub fn new(
        id: AnimationId,
        config: LayoutAnimationConfig,
        callback: Option<AnimationCallback>,
    ) -> Self {
        Self {
            id,
            config,
            start_time: 0,
            state: AnimationState::Pending,
            interrupted: false,
            callback,
            key_frames: Vec::new(),
        }
    }

    pub fn id(&self) -> AnimationId {
        self.id
    }

    pub fn config(&self) -> &LayoutAnimationConfig {
        &self.config
    }

    /// Configuration timing the given keyframe. Falls back to an instant animation if the phase
    /// has no configuration, which can only happen if keyframes were added by hand.
    pub fn config_for(&self, key_frame: &AnimationKeyFrame<P>) -> AnimationConfig {
        self.config
            .get(key_frame.phase)
            .cloned()
            .unwrap_or_default()
    }

    pub fn start_time(&self) -> u64 {
        self.start_time
    }

    pub fn state(&self) -> AnimationState {
        self.state
    }

    pub fn is_interrupted(&self) -> bool {
        self.interrupted
    }

    /// Moves a pending animation in flight, starting its clock at `now`.
    pub fn start(&mut self, now: u64) {
        self.start_time = now;
        self.state = AnimationState::InFlight;
    }

    pub fn mark_interrupted(&mut self) {
        self.interrupted = true;
    }

    pub fn is_finished(&self) -> bool {
        self.key_frames.is_empty()
    }

    /// Ends the animation and returns the notification for its callback, if it has one.
    ///
    /// The outcome is [`Failed`](AnimationOutcome::Failed) if any keyframe was interrupted or if
    /// the animation never left [`Pending`](AnimationState::Pending), otherwise
    /// [`Completed`](AnimationOutcome::Completed). Calling this again returns `None`.
    pub fn finish(&mut self) -> Option<CallbackTask> {
        let outcome = if self.interrupted || self.state == AnimationState::Pending {
            self.state = AnimationState::Canceled;
            AnimationOutcome::Failed
        } else {
            self.state = AnimationState::Completed;
            AnimationOutcome::Completed
        };
        tracing::debug!("Layout animation {} finished: {outcome:?}", self.id);
        self.callback
            .take()
            .map(|callback| CallbackTask::new(self.id, outcome, callback))
    }
}
