//! Ownership and synchronization of all animation state.
//!
//! Every [`LayoutAnimation`] lives in an [`AnimationStore`]: either as the single pending
//! animation waiting for the next batch, or in the in-flight set of the surface whose batch it
//! captured. The store owns its lock, and the only way to reach the state is
//! [`AnimationStore::transact`], which runs a closure inside the critical section.

use crate::animation::LayoutAnimation;
use crate::config::LayoutAnimationConfig;
use crate::executor::{AnimationCallback, AnimationId, CallbackTask};
use crate::view::SurfaceId;
use parking_lot::Mutex;
use std::cell::Cell;
use std::collections::HashMap;

thread_local! {
    static IN_CRITICAL_SECTION: Cell<bool> = const { Cell::new(false) };
}

/// Thread-safe registry of pending and in-flight animations.
#[derive(Debug)]
pub struct AnimationStore<P> {
    state: Mutex<StoreState<P>>,
}

impl<P> Default for AnimationStore<P> {
    fn default() -> Self {
        Self {
            state: Mutex::new(StoreState {
                pending: None,
                surfaces: HashMap::new(),
                next_id: 1,
            }),
        }
    }
}

impl<P> AnimationStore<P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `f` with exclusive access to the animation state.
    ///
    /// # Panics
    ///
    /// Panics if called from inside another `transact` on the same thread. Callbacks, delegates
    /// and anything else that might call back into the scheduler must run after `f` returns.
    pub fn transact<R>(&self, f: impl FnOnce(&mut StoreState<P>) -> R) -> R {
        let _section = CriticalSection::enter();
        let mut state = self.state.lock();
        f(&mut state)
    }
}

struct CriticalSection;

impl CriticalSection {
    fn enter() -> Self {
        IN_CRITICAL_SECTION.with(|flag| {
            assert!(!flag.get(), "animation store re-entered from its own critical section");
            flag.set(true);
        });
        CriticalSection
    }
}

impl Drop for CriticalSection {
    fn drop(&mut self) {
        IN_CRITICAL_SECTION.with(|flag| flag.set(false));
    }
}

/// Animation state guarded by an [`AnimationStore`].
#[derive(Debug)]
pub struct StoreState<P> {
    pending: Option<LayoutAnimation<P>>,
    surfaces: HashMap<SurfaceId, InflightAnimations<P>>,
    next_id: AnimationId,
}

impl<P> StoreState<P> {
    /// Registers the animation that will capture the next batch of mutations.
    ///
    /// Returns the notification for a previously pending animation that this one replaces; that
    /// animation is canceled without ever running.
    pub fn configure_pending(
        &mut self,
        config: LayoutAnimationConfig,
        callback: Option<AnimationCallback>,
    ) -> (AnimationId, Option<CallbackTask>) {
        let id = self.next_id;
        self.next_id += 1;
        let replaced = self.pending.replace(LayoutAnimation::new(id, config, callback));
        let canceled = replaced.and_then(|mut animation| {
            tracing::debug!(
                "Layout animation {} replaced by {id} before capturing any mutations",
                animation.id()
            );
            animation.finish()
        });
        (id, canceled)
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn take_pending(&mut self) -> Option<LayoutAnimation<P>> {
        self.pending.take()
    }

    /// Gets the in-flight set of a surface, creating an empty one if necessary.
    pub fn surface_mut(&mut self, surface_id: SurfaceId) -> &mut InflightAnimations<P> {
        self.surfaces.entry(surface_id).or_default()
    }

    /// Removes and returns the in-flight set of a surface.
    pub fn take_surface(&mut self, surface_id: SurfaceId) -> InflightAnimations<P> {
        self.surfaces.remove(&surface_id).unwrap_or_default()
    }

    pub fn is_surface_idle(&self, surface_id: SurfaceId) -> bool {
        self.surfaces
            .get(&surface_id)
            .map_or(true, InflightAnimations::is_empty)
    }

    /// Returns `true` if any surface has an animation in flight.
    pub fn has_inflight(&self) -> bool {
        self.surfaces.values().any(|surface| !surface.is_empty())
    }

    /// Drops the entries of surfaces with nothing in flight.
    pub fn prune_idle_surfaces(&mut self) {
        self.surfaces.retain(|_, surface| !surface.is_empty());
    }
}

/// In-flight animations of a single surface, oldest first.
#[derive(Debug)]
pub struct InflightAnimations<P> {
    pub(crate) animations: Vec<LayoutAnimation<P>>,
}

impl<P> Default for InflightAnimations<P> {
    fn default() -> Self {
        Self {
            animations: Vec::new(),
        }
    }
}

impl<P> InflightAnimations<P> {
    pub fn push(&mut self, animation: LayoutAnimation<P>) {
        self.animations.push(animation);
    }

    pub fn is_empty(&self) -> bool {
        self.animations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.animations.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LayoutAnimation<P>> {
        self.animations.iter()
    }

    pub fn latest_mut(&mut self) -> Option<&mut LayoutAnimation<P>> {
        self.animations.last_mut()
    }

    /// Removes every animation whose keyframes have all resolved and returns their completion
    /// notifications.
    pub fn take_finished(&mut self) -> Vec<CallbackTask> {
        let mut tasks = Vec::new();
        self.animations.retain_mut(|animation| {
            if !animation.is_finished() {
                return true;
            }
            tasks.extend(animation.finish());
            false
        });
        tasks
    }
}
