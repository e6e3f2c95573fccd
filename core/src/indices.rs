//! Sibling index bookkeeping for nodes whose removal is delayed by an exit animation.
//!
//! A node with an exit animation stays mounted after the tree has logically dropped it, so the
//! mounted children of its parent and the logical children produced by the tree diff disagree
//! until its `Remove` is finally applied. Indices coming from the diff are logical and must be
//! shifted past the delayed siblings; the delayed `Remove`s in turn must follow every change made
//! to their siblings while they wait.

use crate::mutation::Mutation;
use crate::store::InflightAnimations;
use crate::view::Tag;

/// Which in-flight animations count as delayed for an index adjustment.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum DelayedScope {
    #[default]
    All,
    /// Every animation except the one most recently added. Used while the newest animation is
    /// still capturing mutations from the batch being adjusted.
    SkipLatest,
    /// Only the animation most recently added.
    LatestOnly,
}

impl<P> InflightAnimations<P> {
    /// Shifts the index of an immediate `Insert` or `Remove` from logical to mounted coordinates,
    /// i.e. past every delayed sibling that still occupies a slot at or before it.
    ///
    /// Other mutation types are left alone, as is a delayed `Remove` for the mutation's own node.
    pub fn adjust_immediate_mutation_indices_for_delayed_mutations(
        &self,
        mutation: &mut Mutation<P>,
        scope: DelayedScope,
    ) {
        let (Some(parent), tag) = (mutation.parent(), mutation.tag()) else {
            return;
        };
        let mut delayed: Vec<usize> = self
            .delayed_removes(parent, scope)
            .filter(|&(delayed_tag, _)| delayed_tag != tag)
            .map(|(_, index)| index)
            .collect();
        delayed.sort_unstable();
        let Some(index) = mutation.index_mut() else {
            return;
        };
        for delayed_index in delayed {
            if delayed_index <= *index {
                *index += 1;
            }
        }
    }

    /// Moves delayed `Remove`s to account for an `Insert` or `Remove` that was just applied to the
    /// mounted tree. `mutation` must already be in mounted coordinates.
    pub fn adjust_delayed_mutation_indices_for_mutation(
        &mut self,
        mutation: &Mutation<P>,
        scope: DelayedScope,
    ) {
        let (parent, applied_tag, applied_index, inserted) = match mutation {
            Mutation::Insert { parent, view, index } => (*parent, view.tag, *index, true),
            Mutation::Remove { parent, view, index } => (*parent, view.tag, *index, false),
            _ => return,
        };
        for (tag, index) in self.delayed_removes_mut(parent, scope) {
            if tag == applied_tag {
                continue;
            }
            if inserted && *index >= applied_index {
                *index += 1;
            } else if !inserted && *index > applied_index {
                *index -= 1;
            }
        }
    }

    fn scoped_range(&self, scope: DelayedScope) -> std::ops::Range<usize> {
        let len = self.animations.len();
        match scope {
            DelayedScope::All => 0..len,
            DelayedScope::SkipLatest => 0..len.saturating_sub(1),
            DelayedScope::LatestOnly => len.saturating_sub(1)..len,
        }
    }

    fn delayed_removes(
        &self,
        parent: Tag,
        scope: DelayedScope,
    ) -> impl Iterator<Item = (Tag, usize)> + '_ {
        self.animations[self.scoped_range(scope)]
            .iter()
            .flat_map(|animation| &animation.key_frames)
            .flat_map(|key_frame| &key_frame.final_mutations)
            .filter_map(move |mutation| match mutation {
                Mutation::Remove {
                    parent: p,
                    view,
                    index,
                } if *p == parent => Some((view.tag, *index)),
                _ => None,
            })
    }

    fn delayed_removes_mut(
        &mut self,
        parent: Tag,
        scope: DelayedScope,
    ) -> impl Iterator<Item = (Tag, &mut usize)> + '_ {
        let range = self.scoped_range(scope);
        self.animations[range]
            .iter_mut()
            .flat_map(|animation| &mut animation.key_frames)
            .flat_map(|key_frame| &mut key_frame.final_mutations)
            .filter_map(move |mutation| match mutation {
                Mutation::Remove {
                    parent: p,
                    view,
                    index,
                } if *p == parent => Some((view.tag, index)),
                _ => None,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{AnimationKeyFrame, LayoutAnimation};
    use crate::config::{AnimationPhase, LayoutAnimationConfig};
    use crate::view::ShadowView;

    const PARENT: Tag = 1;

    fn view(tag: Tag) -> ShadowView {
        ShadowView::new(tag, "View", 1)
    }

    fn remove(tag: Tag, index: usize) -> Mutation {
        Mutation::Remove {
            parent: PARENT,
            view: view(tag),
            index,
        }
    }

    fn insert(tag: Tag, index: usize) -> Mutation {
        Mutation::Insert {
            parent: PARENT,
            view: view(tag),
            index,
        }
    }

    fn exit(tag: Tag, index: usize) -> AnimationKeyFrame {
        let mut key_frame = AnimationKeyFrame::new(
            AnimationPhase::Delete,
            remove(tag, index),
            PARENT,
            view(tag),
            view(tag),
        );
        key_frame.final_mutations.push(remove(tag, index));
        key_frame
    }

    fn animations_with_exits(exits: &[&[(Tag, usize)]]) -> InflightAnimations<()> {
        let mut animations = InflightAnimations::default();
        for (id, group) in exits.iter().enumerate() {
            let config = LayoutAnimationConfig::new(100.0);
            let mut animation = LayoutAnimation::new(id as u64, config, None);
            animation.key_frames = group.iter().map(|&(tag, index)| exit(tag, index)).collect();
            animations.push(animation);
        }
        animations
    }

    fn adjust(animations: &InflightAnimations<()>, mutation: &mut Mutation, scope: DelayedScope) {
        animations.adjust_immediate_mutation_indices_for_delayed_mutations(mutation, scope);
    }

    fn delayed_indices(animations: &InflightAnimations<()>) -> Vec<usize> {
        animations
            .delayed_removes(PARENT, DelayedScope::All)
            .map(|(_, index)| index)
            .collect()
    }

    #[test]
    fn immediate_remove_skips_exiting_sibling() {
        // Children 10..=14; 12 is exiting at index 2. The diff already dropped it, so 14 is
        // logically at index 3.
        let animations = animations_with_exits(&[&[(12, 2)]]);
        let mut mutation = remove(14, 3);

        adjust(&animations, &mut mutation, DelayedScope::All);

        assert_eq!(mutation.index(), Some(4));
    }

    #[test]
    fn immediate_index_walks_past_consecutive_exits() {
        let animations = animations_with_exits(&[&[(13, 3)], &[(12, 2)]]);
        let mut mutation = remove(14, 2);

        adjust(&animations, &mut mutation, DelayedScope::All);

        assert_eq!(mutation.index(), Some(4));
    }

    #[test]
    fn immediate_index_ignores_own_node_and_later_siblings() {
        let animations = animations_with_exits(&[&[(12, 2), (15, 5)]]);

        let mut own = remove(12, 2);
        adjust(&animations, &mut own, DelayedScope::All);
        assert_eq!(own.index(), Some(2));

        let mut before = insert(20, 1);
        adjust(&animations, &mut before, DelayedScope::All);
        assert_eq!(before.index(), Some(1));
    }

    #[test]
    fn other_parents_do_not_interact() {
        let animations = animations_with_exits(&[&[(12, 0)]]);
        let mut mutation = Mutation::Remove {
            parent: PARENT + 1,
            view: view(30),
            index: 0,
        };

        adjust(&animations, &mut mutation, DelayedScope::All);

        assert_eq!(mutation.index(), Some(0));
    }

    #[test]
    fn scope_selects_animations() {
        let animations = animations_with_exits(&[&[(11, 1)], &[(12, 2)]]);

        let mut skip_latest = remove(14, 2);
        adjust(&animations, &mut skip_latest, DelayedScope::SkipLatest);
        assert_eq!(skip_latest.index(), Some(3));

        let mut latest_only = remove(14, 1);
        adjust(&animations, &mut latest_only, DelayedScope::LatestOnly);
        assert_eq!(latest_only.index(), Some(1));
    }

    #[test]
    fn applied_remove_shifts_later_delayed_removes_down() {
        let mut animations = animations_with_exits(&[&[(11, 1), (13, 3)]]);

        animations.adjust_delayed_mutation_indices_for_mutation(&remove(12, 2), DelayedScope::All);

        assert_eq!(delayed_indices(&animations), [1, 2]);
    }

    #[test]
    fn applied_insert_shifts_delayed_removes_at_or_after_up() {
        let mut animations = animations_with_exits(&[&[(11, 1), (13, 3)]]);

        animations.adjust_delayed_mutation_indices_for_mutation(&insert(20, 3), DelayedScope::All);

        assert_eq!(delayed_indices(&animations), [1, 4]);
    }

    #[test]
    fn non_structural_mutations_change_nothing() {
        let mut animations = animations_with_exits(&[&[(11, 1)]]);
        let mut update = Mutation::Update {
            parent: PARENT,
            old_view: view(10),
            new_view: view(10),
        };

        adjust(&animations, &mut update, DelayedScope::All);
        animations.adjust_delayed_mutation_indices_for_mutation(&update, DelayedScope::All);

        assert_eq!(delayed_indices(&animations), [1]);
        assert_eq!(update.index(), None);
    }
}
