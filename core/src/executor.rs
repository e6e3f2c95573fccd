//! Delivery of completion notifications to the scripting runtime.
//!
//! The scheduler runs on whichever thread mounts the tree, but the callbacks registered with an
//! animation belong to the scripting runtime, which is single-threaded. Notifications are therefore
//! never invoked directly; each one is wrapped in a [`CallbackTask`] and posted to a
//! [`RuntimeExecutor`], which is responsible for running it on the runtime's own thread.

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::fmt;

/// Unique identity of a configured layout animation.
pub type AnimationId = u64;

/// How a layout animation ended.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AnimationOutcome {
    /// Every keyframe ran to completion, or the animation had nothing to animate.
    Completed,
    /// The animation was interrupted by a conflicting mutation, or replaced by another animation
    /// before it captured any changes.
    Failed,
}

/// Completion callback for a layout animation. Invoked at most once.
pub struct AnimationCallback(Box<dyn FnOnce(AnimationOutcome) + Send>);

impl AnimationCallback {
    pub fn new(callback: impl FnOnce(AnimationOutcome) + Send + 'static) -> Self {
        Self(Box::new(callback))
    }

    /// Creates a callback from separate success and failure handlers, exactly one of which will
    /// run.
    pub fn from_pair(
        on_success: impl FnOnce() + Send + 'static,
        on_failure: impl FnOnce() + Send + 'static,
    ) -> Self {
        Self::new(move |outcome| match outcome {
            AnimationOutcome::Completed => on_success(),
            AnimationOutcome::Failed => on_failure(),
        })
    }
}

impl fmt::Debug for AnimationCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AnimationCallback")
    }
}

/// A completion notification waiting to run on the scripting runtime's thread.
#[derive(Debug)]
pub struct CallbackTask {
    pub animation_id: AnimationId,
    pub outcome: AnimationOutcome,
    callback: AnimationCallback,
}

impl CallbackTask {
    pub fn new(
        animation_id: AnimationId,
        outcome: AnimationOutcome,
        callback: AnimationCallback,
    ) -> Self {
        Self {
            animation_id,
            outcome,
            callback,
        }
    }

    /// Invokes the callback. Must be called on the thread that owns it.
    pub fn run(self) {
        (self.callback.0)(self.outcome);
    }
}

/// Schedules [`CallbackTask`]s onto the scripting runtime.
pub trait RuntimeExecutor: Send + Sync {
    /// Posts a task. Must not run it synchronously on the calling thread.
    fn post(&self, task: CallbackTask);
}

/// A [`RuntimeExecutor`] that queues tasks until the runtime drains them.
///
/// The runtime's event loop calls [`run_pending`](Self::run_pending) on its own thread.
#[derive(Debug, Default)]
pub struct TaskQueue {
    tasks: Mutex<VecDeque<CallbackTask>>,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs every task posted so far, in posting order, and returns how many ran.
    ///
    /// The queue is not locked while tasks run, so a task may post (or cause posting of) new
    /// tasks; those run on the next call.
    pub fn run_pending(&self) -> usize {
        let tasks = std::mem::take(&mut *self.tasks.lock());
        let count = tasks.len();
        for task in tasks {
            task.run();
        }
        count
    }

    pub fn len(&self) -> usize {
        self.tasks.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.lock().is_empty()
    }
}

impl RuntimeExecutor for TaskQueue {
    fn post(&self, task: CallbackTask) {
        tracing::trace!(
            "Posting {:?} callback for animation {}",
            task.outcome,
            task.animation_id
        );
        self.tasks.lock().push_back(task);
    }
}
