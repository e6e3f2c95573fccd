//! The layout animation scheduler.
//!
//! [`LayoutAnimationKeyFrameManager`] sits between the reconciler and the mounting layer. Every
//! batch of mutations headed for a surface passes through
//! [`pull_transaction`](MountingOverrideDelegate::pull_transaction), which diverts animatable
//! changes into keyframes and replaces them with a stream of interpolated updates over the
//! following frames.

use crate::animation::{AnimationKeyFrame, LayoutAnimation};
use crate::clock::{Clock, MonotonicClock};
use crate::config::{AnimationPhase, LayoutAnimationConfig};
use crate::conflicts::queue_final_mutations_for_completed_key_frame;
use crate::executor::{AnimationCallback, AnimationId, CallbackTask, RuntimeExecutor};
use crate::indices::DelayedScope;
use crate::interpolation::create_interpolated_shadow_view;
use crate::mutation::{Mutation, MutationKind};
use crate::ordering::sort_mutations;
use crate::progress::calculate_animation_progress;
use crate::registry::{ComponentDescriptor, ComponentRegistry};
use crate::status::{AnimationStatusDelegate, StatusDelegateCell};
use crate::store::{AnimationStore, StoreState};
use crate::view::{Props, SurfaceId, Tag};
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;

/// Capabilities used by the scripting runtime and the host's frame loop.
pub trait AnimationDelegate<P = ()> {
    /// Registers the animation that will apply to the next non-empty batch of mutations on any
    /// surface. A previously configured animation that has not captured anything yet is canceled.
    fn configure_next_animation(
        &self,
        config: LayoutAnimationConfig,
        callback: Option<AnimationCallback>,
    ) -> AnimationId;

    /// Like [`configure_next_animation`](Self::configure_next_animation), but reads the
    /// configuration from a raw document. Invalid settings are logged and replaced with defaults.
    fn configure_next_animation_raw(
        &self,
        raw: &Value,
        callback: Option<AnimationCallback>,
    ) -> AnimationId {
        self.configure_next_animation(LayoutAnimationConfig::from_raw(raw), callback)
    }

    fn set_component_registry(&self, registry: ComponentRegistry);

    /// Returns `true` while any animation is in flight, i.e. while the host should keep pulling
    /// transactions every frame.
    fn should_animate_frame(&self) -> bool;

    /// Ends every animation on a surface immediately, and returns the mutations that move its
    /// nodes to their final states.
    fn stop_surface(&self, surface_id: SurfaceId) -> Vec<Mutation<P>>;
}

/// Capabilities used by the mounting layer.
pub trait MountingOverrideDelegate<P = ()> {
    /// Returns `true` if [`pull_transaction`](Self::pull_transaction) may need to rewrite
    /// transactions.
    fn should_override_pull_transaction(&self) -> bool;

    /// Processes a batch of mutations for a surface, and advances the surface's in-flight
    /// animations.
    ///
    /// Returns the batch to mount instead, or `None` if `mutations` should be mounted unchanged.
    /// An empty batch is how the host requests an animation frame.
    fn pull_transaction(
        &self,
        surface_id: SurfaceId,
        transaction_number: u64,
        mutations: &[Mutation<P>],
    ) -> Option<Vec<Mutation<P>>>;
}

/// Builder for a [`LayoutAnimationKeyFrameManager`].
pub struct KeyFrameManagerBuilder {
    executor: Arc<dyn RuntimeExecutor>,
    registry: ComponentRegistry,
    clock: Arc<dyn Clock>,
    status_delegate: Option<Arc<dyn AnimationStatusDelegate>>,
}

impl KeyFrameManagerBuilder {
    /// Creates a builder with an empty component registry and a monotonic clock. Completion
    /// callbacks are posted to `executor`.
    pub fn new(executor: Arc<dyn RuntimeExecutor>) -> Self {
        Self {
            executor,
            registry: ComponentRegistry::new(),
            clock: Arc::new(MonotonicClock::default()),
            status_delegate: None,
        }
    }

    pub fn registry(mut self, registry: ComponentRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn status_delegate(mut self, delegate: Arc<dyn AnimationStatusDelegate>) -> Self {
        self.status_delegate = Some(delegate);
        self
    }

    pub fn build<P: Props>(self) -> LayoutAnimationKeyFrameManager<P> {
        let status = StatusDelegateCell::default();
        status.set(self.status_delegate);
        LayoutAnimationKeyFrameManager {
            store: AnimationStore::new(),
            registry: RwLock::new(Arc::new(self.registry)),
            executor: self.executor,
            clock: self.clock,
            status,
        }
    }
}

/// Schedules layout animations and rewrites mounting transactions to play them.
///
/// Cannot be created directly; to create an instance, use the [`KeyFrameManagerBuilder`].
pub struct LayoutAnimationKeyFrameManager<P = ()> {
    store: AnimationStore<P>,
    registry: RwLock<Arc<ComponentRegistry>>,
    executor: Arc<dyn RuntimeExecutor>,
    clock: Arc<dyn Clock>,
    status: StatusDelegateCell,
}

impl<P: Props> LayoutAnimationKeyFrameManager<P> {
    /// Replaces the status delegate. Passing `None` stops all further notifications.
    pub fn set_status_delegate(&self, delegate: Option<Arc<dyn AnimationStatusDelegate>>) {
        self.status.set(delegate);
    }

    fn dispatch(&self, tasks: Vec<CallbackTask>) {
        for task in tasks {
            self.executor.post(task);
        }
    }
}

impl<P: Props> AnimationDelegate<P> for LayoutAnimationKeyFrameManager<P> {
    fn configure_next_animation(
        &self,
        config: LayoutAnimationConfig,
        callback: Option<AnimationCallback>,
    ) -> AnimationId {
        let (id, canceled) = self
            .store
            .transact(|state| state.configure_pending(config, callback));
        tracing::debug!("Configured layout animation {id}");
        self.dispatch(canceled.into_iter().collect());
        id
    }

    fn set_component_registry(&self, registry: ComponentRegistry) {
        *self.registry.write() = Arc::new(registry);
    }

    fn should_animate_frame(&self) -> bool {
        self.store.transact(|state| state.has_inflight())
    }

    fn stop_surface(&self, surface_id: SurfaceId) -> Vec<Mutation<P>> {
        let (mut mutations, tasks, all_complete) = self.store.transact(|state| {
            let surface = state.take_surface(surface_id);
            let was_animating = !surface.is_empty();
            let mut mutations = Vec::new();
            let mut tasks = Vec::new();
            for mut animation in surface.animations {
                for key_frame in std::mem::take(&mut animation.key_frames) {
                    queue_final_mutations_for_completed_key_frame(key_frame, &mut mutations, false);
                }
                tasks.extend(animation.finish());
            }
            let all_complete = was_animating && !state.has_inflight() && !state.has_pending();
            (mutations, tasks, all_complete)
        });
        tracing::debug!(
            "Stopped surface {surface_id}: {} finalizing mutations",
            mutations.len()
        );
        sort_mutations(&mut mutations);
        self.dispatch(tasks);
        if all_complete {
            self.status.notify_all_complete();
        }
        mutations
    }
}

impl<P: Props> MountingOverrideDelegate<P> for LayoutAnimationKeyFrameManager<P> {
    fn should_override_pull_transaction(&self) -> bool {
        self.store
            .transact(|state| state.has_pending() || state.has_inflight())
    }

    fn pull_transaction(
        &self,
        surface_id: SurfaceId,
        transaction_number: u64,
        mutations: &[Mutation<P>],
    ) -> Option<Vec<Mutation<P>>> {
        let now = self.clock.now_ms();
        let registry = self.registry.read().clone();
        let output = self.store.transact(|state| {
            let pending = if mutations.is_empty() {
                None
            } else {
                state.take_pending()
            };
            if pending.is_none() && state.is_surface_idle(surface_id) {
                return None;
            }
            Some(run_transaction(state, surface_id, now, pending, mutations.to_vec(), &registry))
        });
        let Some(output) = output else {
            tracing::trace!(
                "Transaction {transaction_number} on surface {surface_id} passed through"
            );
            return None;
        };
        tracing::trace!(
            "Transaction {transaction_number} on surface {surface_id}: {} mutations in, {} out",
            mutations.len(),
            output.mutations.len()
        );
        for mutation in &output.mutations {
            tracing::trace!("  {mutation}");
        }
        self.dispatch(output.tasks);
        if output.started {
            self.status.notify_started();
        }
        if output.all_complete {
            self.status.notify_all_complete();
        }
        Some(output.mutations)
    }
}

struct TransactionOutput<P> {
    mutations: Vec<Mutation<P>>,
    tasks: Vec<CallbackTask>,
    started: bool,
    all_complete: bool,
}

/// Coordinates: incoming `Remove`s are logical indices in the tree before the batch, incoming
/// `Insert`s logical indices after all of its removals. Every emitted `Remove` is relative to the
/// mounted tree before the batch, every emitted `Insert` to the mounted tree after its removals.
fn run_transaction<P: Props>(
    state: &mut StoreState<P>,
    surface_id: SurfaceId,
    now: u64,
    pending: Option<LayoutAnimation<P>>,
    mut incoming: Vec<Mutation<P>>,
    registry: &ComponentRegistry,
) -> TransactionOutput<P> {
    let was_animating = state.has_inflight();
    let surface = state.surface_mut(surface_id);
    let capturing = pending.is_some();
    if let Some(mut animation) = pending {
        animation.start(now);
        surface.push(animation);
    }

    let earlier = if capturing {
        DelayedScope::SkipLatest
    } else {
        DelayedScope::All
    };
    for mutation in incoming.iter_mut() {
        if mutation.kind() == MutationKind::Remove {
            surface.adjust_immediate_mutation_indices_for_delayed_mutations(mutation, earlier);
        }
    }

    let mut finalized = Vec::new();
    for key_frame in surface.take_conflicting_key_frames(&incoming) {
        for mutation in incoming.iter_mut().filter(|m| m.tag() == key_frame.tag) {
            mutation.rebase_on(&key_frame.final_view);
        }
        queue_final_mutations_for_completed_key_frame(key_frame, &mut finalized, true);
    }

    // The new animation is not stepped until the next frame.
    let stepped = surface.len() - usize::from(capturing);
    let mut frames = Vec::new();
    for animation in &mut surface.animations[..stepped] {
        step_animation(animation, now, registry, &mut frames, &mut finalized);
    }

    let mut immediate = Vec::new();
    let mut started = false;
    match surface.latest_mut() {
        Some(animation) if capturing => {
            capture_batch(animation, incoming, registry, &mut immediate);
            started = !animation.key_frames.is_empty();
            tracing::debug!(
                "Layout animation {} captured {} keyframes on surface {surface_id}",
                animation.id(),
                animation.key_frames.len()
            );
        }
        _ => immediate = incoming,
    }

    let mut removes: Vec<Mutation<P>> = immediate
        .iter()
        .chain(&finalized)
        .filter(|m| m.kind() == MutationKind::Remove)
        .cloned()
        .collect();
    removes.sort_by(|a, b| b.index().cmp(&a.index()));
    for remove in &removes {
        surface.adjust_delayed_mutation_indices_for_mutation(remove, DelayedScope::All);
    }
    for mutation in immediate.iter_mut() {
        if mutation.kind() == MutationKind::Insert {
            let scope = DelayedScope::All;
            surface.adjust_immediate_mutation_indices_for_delayed_mutations(mutation, scope);
            surface.adjust_delayed_mutation_indices_for_mutation(mutation, scope);
        }
    }

    let tasks = surface.take_finished();
    state.prune_idle_surfaces();
    let all_complete = (was_animating || started) && !state.has_inflight() && !state.has_pending();

    let mut mutations = finalized;
    mutations.append(&mut frames);
    mutations.append(&mut immediate);
    sort_mutations(&mut mutations);
    TransactionOutput {
        mutations,
        tasks,
        started,
        all_complete,
    }
}

/// Advances every keyframe of `animation` to `now`, finalizing those that have ended.
fn step_animation<P: Props>(
    animation: &mut LayoutAnimation<P>,
    now: u64,
    registry: &ComponentRegistry,
    frames: &mut Vec<Mutation<P>>,
    finalized: &mut Vec<Mutation<P>>,
) {
    for mut key_frame in std::mem::take(&mut animation.key_frames) {
        let config = animation.config_for(&key_frame);
        let (linear, eased) = calculate_animation_progress(now, animation, &config);
        if linear >= 1.0 {
            queue_final_mutations_for_completed_key_frame(key_frame, finalized, false);
            continue;
        }
        let component_name = key_frame.final_view.component_name;
        let descriptor = registry.get(component_name).cloned().unwrap_or_else(|| {
            ComponentDescriptor::new(component_name).with_interpolated_props(false)
        });
        let view = create_interpolated_shadow_view(
            eased,
            &key_frame.start_view,
            &key_frame.final_view,
            &descriptor,
        );
        if view != key_frame.view_prev {
            tracing::trace!("Node {} at {linear:.3} ({eased:.3} eased)", key_frame.tag);
            frames.push(Mutation::Update {
                parent: key_frame.parent,
                old_view: std::mem::replace(&mut key_frame.view_prev, view.clone()),
                new_view: view,
            });
        }
        animation.key_frames.push(key_frame);
    }
}

/// Splits a batch into keyframes of `animation` and mutations to apply right away.
fn capture_batch<P: Props>(
    animation: &mut LayoutAnimation<P>,
    incoming: Vec<Mutation<P>>,
    registry: &ComponentRegistry,
    immediate: &mut Vec<Mutation<P>>,
) {
    let mut created = HashSet::new();
    let mut inserted = HashSet::new();
    for mutation in &incoming {
        match mutation.kind() {
            MutationKind::Create => {
                created.insert(mutation.tag());
            }
            MutationKind::Insert => {
                inserted.insert(mutation.tag());
            }
            _ => {}
        }
    }

    let mut deletes = Vec::new();
    for mutation in incoming {
        match mutation.kind() {
            MutationKind::Create => {
                immediate.push(mutation);
                continue;
            }
            MutationKind::Delete => {
                deletes.push(mutation);
                continue;
            }
            _ => {}
        }
        let Some(mut key_frame) =
            key_frame_for(animation, &mutation, &created, &inserted, registry)
        else {
            immediate.push(mutation);
            continue;
        };
        key_frame.start_time = animation.start_time();
        if let Mutation::Insert { parent, index, .. } = mutation {
            immediate.push(Mutation::Insert {
                parent,
                view: key_frame.start_view.clone(),
                index,
            });
        }
        animation.key_frames.push(key_frame);
    }

    for delete in deletes {
        let exit = animation
            .key_frames
            .iter_mut()
            .find(|key_frame| key_frame.tag == delete.tag() && key_frame.is_exit());
        match exit {
            Some(key_frame) => key_frame.final_mutations.push(delete),
            None => immediate.push(delete),
        }
    }

    for mutation in immediate.iter_mut() {
        let Mutation::Create { view } = mutation else {
            continue;
        };
        let enter = animation.key_frames.iter().find(|key_frame| {
            key_frame.tag == view.tag && key_frame.phase == AnimationPhase::Create
        });
        if let Some(key_frame) = enter {
            *view = key_frame.start_view.clone();
        }
    }
}

/// Creates the keyframe for a mutation, or returns `None` if it should be applied immediately.
fn key_frame_for<P: Props>(
    animation: &LayoutAnimation<P>,
    mutation: &Mutation<P>,
    created: &HashSet<Tag>,
    inserted: &HashSet<Tag>,
    registry: &ComponentRegistry,
) -> Option<AnimationKeyFrame<P>> {
    let tag = mutation.tag();
    if animation.key_frames.iter().any(|key_frame| key_frame.tag == tag) {
        return None;
    }
    let component_name = mutation.target_view().component_name;
    if !registry.contains(component_name) {
        tracing::debug!(
            "No descriptor for component {component_name:?}; node {tag} will not animate"
        );
        return None;
    }
    let config = animation.config();
    match mutation {
        Mutation::Insert { parent, view, .. } if created.contains(&tag) => {
            let phase = config.get(AnimationPhase::Create)?;
            let start_view = view.clone().with_appearance(phase.property.collapse(view.appearance));
            Some(AnimationKeyFrame::new(
                AnimationPhase::Create,
                mutation.clone(),
                *parent,
                start_view,
                view.clone(),
            ))
        }
        Mutation::Remove { parent, view, .. } if !inserted.contains(&tag) => {
            let phase = config.get(AnimationPhase::Delete)?;
            let final_view = view.clone().with_appearance(phase.property.collapse(view.appearance));
            let mut key_frame = AnimationKeyFrame::new(
                AnimationPhase::Delete,
                mutation.clone(),
                *parent,
                view.clone(),
                final_view,
            );
            key_frame.final_mutations.push(mutation.clone());
            Some(key_frame)
        }
        Mutation::Update {
            parent,
            old_view,
            new_view,
        } if old_view != new_view => {
            config.get(AnimationPhase::Update)?;
            Some(AnimationKeyFrame::new(
                AnimationPhase::Update,
                mutation.clone(),
                *parent,
                old_view.clone(),
                new_view.clone(),
            ))
        }
        _ => None,
    }
}
