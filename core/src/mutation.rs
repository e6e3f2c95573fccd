//! Individual changes to a mounted view tree.

use crate::view::{ShadowView, Tag};
use std::fmt;

/// Discriminant of a [`Mutation`], without its data.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum MutationKind {
    Create,
    Delete,
    Insert,
    Remove,
    Update,
}

/// A single structural or property change to the tree.
///
/// Structural changes come in pairs: a node is `Create`d, then `Insert`ed under a parent; later it
/// is `Remove`d from its parent, then `Delete`d. `Update` replaces the snapshot of a mounted node.
/// Indices are positions among the parent's children at the time the mutation is applied.
#[derive(Clone, Debug, PartialEq)]
pub enum Mutation<P = ()> {
    Create {
        view: ShadowView<P>,
    },
    Delete {
        view: ShadowView<P>,
    },
    Insert {
        parent: Tag,
        view: ShadowView<P>,
        index: usize,
    },
    Remove {
        parent: Tag,
        view: ShadowView<P>,
        index: usize,
    },
    Update {
        parent: Tag,
        old_view: ShadowView<P>,
        new_view: ShadowView<P>,
    },
}

impl<P> Mutation<P> {
    pub fn kind(&self) -> MutationKind {
        match self {
            Self::Create { .. } => MutationKind::Create,
            Self::Delete { .. } => MutationKind::Delete,
            Self::Insert { .. } => MutationKind::Insert,
            Self::Remove { .. } => MutationKind::Remove,
            Self::Update { .. } => MutationKind::Update,
        }
    }

    /// Tag of the node that this mutation changes.
    pub fn tag(&self) -> Tag {
        match self {
            Self::Create { view }
            | Self::Delete { view }
            | Self::Insert { view, .. }
            | Self::Remove { view, .. } => view.tag,
            Self::Update { new_view, .. } => new_view.tag,
        }
    }

    /// Tag of the parent node, for mutations that have one.
    pub fn parent(&self) -> Option<Tag> {
        match self {
            Self::Insert { parent, .. }
            | Self::Remove { parent, .. }
            | Self::Update { parent, .. } => Some(*parent),
            Self::Create { .. } | Self::Delete { .. } => None,
        }
    }

    /// Sibling index, for `Insert` and `Remove`.
    pub fn index(&self) -> Option<usize> {
        match self {
            Self::Insert { index, .. } | Self::Remove { index, .. } => Some(*index),
            _ => None,
        }
    }

    pub fn index_mut(&mut self) -> Option<&mut usize> {
        match self {
            Self::Insert { index, .. } | Self::Remove { index, .. } => Some(index),
            _ => None,
        }
    }

    /// Snapshot of the node as it will be once this mutation is applied. For `Remove` and `Delete`
    /// this is the snapshot being removed.
    pub fn target_view(&self) -> &ShadowView<P> {
        match self {
            Self::Create { view }
            | Self::Delete { view }
            | Self::Insert { view, .. }
            | Self::Remove { view, .. } => view,
            Self::Update { new_view, .. } => new_view,
        }
    }

    /// Replaces the snapshot that this mutation assumes is currently mounted. Used when the node
    /// has been moved to a different state (e.g. the end of an interrupted animation) since the
    /// mutation was produced. `Create` has no prior snapshot and is unchanged.
    pub fn rebase_on(&mut self, mounted: &ShadowView<P>)
    where
        P: Clone,
    {
        match self {
            Self::Delete { view } | Self::Remove { view, .. } => *view = mounted.clone(),
            Self::Update { old_view, .. } => *old_view = mounted.clone(),
            Self::Insert { .. } | Self::Create { .. } => {}
        }
    }

    /// Returns `true` if this is an `Insert` or `Remove` under `parent`.
    pub fn is_structural_child_of(&self, parent: Tag) -> bool {
        matches!(
            self,
            Self::Insert { parent: p, .. } | Self::Remove { parent: p, .. } if *p == parent
        )
    }
}

/// One-line summary of the mutation, for logs. Props are omitted.
impl<P> fmt::Display for Mutation<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create { view } => write!(f, "Create #{} ({})", view.tag, view.component_name),
            Self::Delete { view } => write!(f, "Delete #{}", view.tag),
            Self::Insert {
                parent,
                view,
                index,
            } => write!(f, "Insert #{} into #{parent} at {index}", view.tag),
            Self::Remove {
                parent,
                view,
                index,
            } => write!(f, "Remove #{} from #{parent} at {index}", view.tag),
            Self::Update {
                parent,
                old_view,
                new_view,
            } => {
                write!(f, "Update #{} in #{parent}", new_view.tag)?;
                if old_view.layout.frame != new_view.layout.frame {
                    write!(f, ", frame {} -> {}", old_view.layout.frame, new_view.layout.frame)?;
                }
                if old_view.appearance.opacity != new_view.appearance.opacity {
                    write!(
                        f,
                        ", opacity {} -> {}",
                        old_view.appearance.opacity, new_view.appearance.opacity
                    )?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rebase_replaces_prior_snapshot_only() {
        let mounted = ShadowView::<()>::new(3, "View", 1).with_frame(crate::view::Rect::new(
            1.0, 2.0, 3.0, 4.0,
        ));
        let mut update = Mutation::Update {
            parent: 1,
            old_view: ShadowView::new(3, "View", 1),
            new_view: ShadowView::new(3, "View", 1),
        };
        update.rebase_on(&mounted);
        let Mutation::Update { old_view, new_view, .. } = &update else {
            unreachable!();
        };
        assert_eq!(old_view, &mounted);
        assert_ne!(new_view, &mounted);

        let mut remove = Mutation::Remove {
            parent: 1,
            view: ShadowView::new(3, "View", 1),
            index: 0,
        };
        remove.rebase_on(&mounted);
        assert_eq!(remove.target_view(), &mounted);
    }

    #[test]
    fn display_is_one_line_summary() {
        let moved = ShadowView::<()>::new(3, "View", 1)
            .with_frame(crate::view::Rect::new(50.0, 0.0, 10.0, 10.0))
            .with_appearance(crate::view::Appearance {
                opacity: 0.5,
                ..Default::default()
            });
        let update = Mutation::Update {
            parent: 1,
            old_view: ShadowView::new(3, "View", 1)
                .with_frame(crate::view::Rect::new(0.0, 0.0, 10.0, 10.0)),
            new_view: moved.clone(),
        };
        let remove = Mutation::Remove {
            parent: 1,
            view: moved.clone(),
            index: 2,
        };

        assert_eq!(
            update.to_string(),
            "Update #3 in #1, frame 0,0 10x10 -> 50,0 10x10, opacity 1 -> 0.5"
        );
        assert_eq!(remove.to_string(), "Remove #3 from #1 at 2");
        assert_eq!(Mutation::Create { view: moved }.to_string(), "Create #3 (View)");
    }

    #[test]
    fn index_only_for_structural_child_mutations() {
        let view = ShadowView::<()>::new(3, "View", 1);
        assert_eq!(Mutation::Create { view: view.clone() }.index(), None);
        assert_eq!(
            Mutation::Insert {
                parent: 1,
                view,
                index: 4
            }
            .index(),
            Some(4)
        );
    }
}
