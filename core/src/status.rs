//! Notifications to the host about when layout animations are running.

use parking_lot::Mutex;
use std::sync::Arc;

/// Observer told when the scheduler starts or stops needing animation frames.
///
/// Hosts typically use this to start and stop a display-synchronized frame callback that calls
/// back into the mounting layer.
pub trait AnimationStatusDelegate: Send + Sync {
    /// At least one animation went in flight.
    fn on_animation_started(&self);

    /// The last in-flight animation finished.
    fn on_all_animations_complete(&self);
}

/// Holds the current [`AnimationStatusDelegate`].
///
/// Setting or clearing the delegate and every call into it go through the same mutex, so a
/// delegate that has been cleared is never called afterward.
#[derive(Default)]
pub(crate) struct StatusDelegateCell {
    delegate: Mutex<Option<Arc<dyn AnimationStatusDelegate>>>,
}

impl StatusDelegateCell {
    pub fn set(&self, delegate: Option<Arc<dyn AnimationStatusDelegate>>) {
        *self.delegate.lock() = delegate;
    }

    pub fn notify_started(&self) {
        if let Some(delegate) = self.delegate.lock().as_ref() {
            delegate.on_animation_started();
        }
    }

    pub fn notify_all_complete(&self) {
        if let Some(delegate) = self.delegate.lock().as_ref() {
            delegate.on_all_animations_complete();
        }
    }
}
