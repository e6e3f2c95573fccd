//! Resolution of keyframes that are overtaken by newer mutations.

use crate::animation::AnimationKeyFrame;
use crate::mutation::Mutation;
use crate::store::InflightAnimations;
use crate::view::Tag;
use std::collections::HashSet;

impl<P> InflightAnimations<P> {
    /// Extracts every keyframe whose node is targeted by one of `mutations`.
    ///
    /// The returned keyframes, and the animations they came from, are marked interrupted. Their
    /// animations stay in flight until their remaining keyframes resolve, and then report failure.
    pub fn take_conflicting_key_frames(
        &mut self,
        mutations: &[Mutation<P>],
    ) -> Vec<AnimationKeyFrame<P>> {
        let targets: HashSet<Tag> = mutations.iter().map(Mutation::tag).collect();
        if targets.is_empty() {
            return Vec::new();
        }
        let mut conflicting = Vec::new();
        for animation in &mut self.animations {
            let (taken, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut animation.key_frames)
                .into_iter()
                .partition(|key_frame| targets.contains(&key_frame.tag));
            animation.key_frames = kept;
            if taken.is_empty() {
                continue;
            }
            animation.mark_interrupted();
            for mut key_frame in taken {
                tracing::debug!(
                    "Interrupting {:?} keyframe in layout animation {} (captured {}, at {}ms)",
                    key_frame.phase,
                    animation.id(),
                    key_frame.mutation,
                    key_frame.start_time
                );
                key_frame.interrupted = true;
                conflicting.push(key_frame);
            }
        }
        conflicting
    }
}

/// Queues the mutations that move a keyframe's node to its final state, without interpolation.
///
/// Held-back mutations (the `Remove` and `Delete` of an exit) are released with the final
/// snapshot. Otherwise an `Update` from the last emitted snapshot is queued, unless the node is
/// already there.
pub fn queue_final_mutations_for_completed_key_frame<P: Clone + PartialEq>(
    key_frame: AnimationKeyFrame<P>,
    out: &mut Vec<Mutation<P>>,
    interrupted: bool,
) {
    tracing::debug!(
        "Finalizing {:?} keyframe of node {} (interrupted: {interrupted})",
        key_frame.phase,
        key_frame.tag
    );
    if key_frame.final_mutations.is_empty() {
        if key_frame.view_prev != key_frame.final_view {
            out.push(Mutation::Update {
                parent: key_frame.parent,
                old_view: key_frame.view_prev,
                new_view: key_frame.final_view,
            });
        }
        return;
    }
    for mut mutation in key_frame.final_mutations {
        mutation.rebase_on(&key_frame.final_view);
        out.push(mutation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::LayoutAnimation;
    use crate::config::{AnimationPhase, LayoutAnimationConfig};
    use crate::view::{Appearance, Rect, ShadowView};

    fn view(tag: Tag, x: f32) -> ShadowView {
        ShadowView::new(tag, "View", 1).with_frame(Rect::new(x, 0.0, 10.0, 10.0))
    }

    fn update_key_frame(tag: Tag) -> AnimationKeyFrame {
        AnimationKeyFrame::new(
            AnimationPhase::Update,
            Mutation::Update {
                parent: 1,
                old_view: view(tag, 0.0),
                new_view: view(tag, 100.0),
            },
            1,
            view(tag, 0.0),
            view(tag, 100.0),
        )
    }

    #[test]
    fn takes_only_targeted_key_frames() {
        let mut animations = InflightAnimations::default();
        let mut animation = LayoutAnimation::new(1, LayoutAnimationConfig::new(200.0), None);
        animation.start(0);
        animation.key_frames = vec![update_key_frame(5), update_key_frame(6)];
        animations.push(animation);

        let taken = animations.take_conflicting_key_frames(&[Mutation::Remove {
            parent: 1,
            view: view(5, 100.0),
            index: 0,
        }]);

        assert_eq!(taken.len(), 1);
        assert_eq!(taken[0].tag, 5);
        assert!(taken[0].interrupted);
        let remaining = animations.iter().next().unwrap();
        assert!(remaining.is_interrupted());
        assert_eq!(remaining.key_frames.len(), 1);
        assert_eq!(remaining.key_frames[0].tag, 6);
    }

    #[test]
    fn unrelated_batch_takes_nothing() {
        let mut animations = InflightAnimations::default();
        let mut animation = LayoutAnimation::new(1, LayoutAnimationConfig::new(200.0), None);
        animation.key_frames = vec![update_key_frame(5)];
        animations.push(animation);

        let create = Mutation::Create { view: view(9, 0.0) };
        let taken = animations.take_conflicting_key_frames(&[create]);

        assert!(taken.is_empty());
        assert!(!animations.iter().next().unwrap().is_interrupted());
    }

    #[test]
    fn finalizing_update_jumps_from_last_emitted_to_final() {
        let mut key_frame = update_key_frame(5);
        key_frame.view_prev = view(5, 40.0);
        let mut out = Vec::new();

        queue_final_mutations_for_completed_key_frame(key_frame, &mut out, true);

        assert_eq!(
            out,
            [Mutation::Update {
                parent: 1,
                old_view: view(5, 40.0),
                new_view: view(5, 100.0),
            }]
        );
    }

    #[test]
    fn finalizing_settled_update_queues_nothing() {
        let mut key_frame = update_key_frame(5);
        key_frame.view_prev = key_frame.final_view.clone();
        let mut out = Vec::new();

        queue_final_mutations_for_completed_key_frame(key_frame, &mut out, false);

        assert!(out.is_empty());
    }

    #[test]
    fn finalizing_exit_releases_held_back_mutations() {
        let collapsed = view(5, 0.0).with_appearance(Appearance {
            opacity: 0.0,
            ..Default::default()
        });
        let mut key_frame = AnimationKeyFrame::new(
            AnimationPhase::Delete,
            Mutation::Remove {
                parent: 1,
                view: view(5, 0.0),
                index: 3,
            },
            1,
            view(5, 0.0),
            collapsed.clone(),
        );
        key_frame.final_mutations = vec![
            Mutation::Remove {
                parent: 1,
                view: view(5, 0.0),
                index: 2,
            },
            Mutation::Delete { view: view(5, 0.0) },
        ];
        let mut out = Vec::new();

        queue_final_mutations_for_completed_key_frame(key_frame, &mut out, false);

        assert_eq!(
            out,
            [
                Mutation::Remove {
                    parent: 1,
                    view: collapsed.clone(),
                    index: 2,
                },
                Mutation::Delete { view: collapsed },
            ]
        );
    }
}
