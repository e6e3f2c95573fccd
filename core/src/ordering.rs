//! Ordering of mutations within an outgoing batch.
//!
//! A batch leaving the scheduler mixes mutations passed straight through from the reconciler with
//! mutations synthesized by animations, and the host must apply them in an order that respects
//! their structural dependencies: a node has to be created before it can be inserted, a slot has
//! to be vacated before a sibling can move into it, and nothing may be deleted while another
//! mutation in the batch might still refer to it.

use crate::mutation::{Mutation, MutationKind};
use crate::view::Tag;
use std::cmp::Reverse;
use std::collections::HashMap;

/// Returns `true` if `lhs` must be applied before `rhs`.
///
/// Rules, in priority order:
///
/// 1. `Delete` comes after every other kind.
/// 2. `Remove` comes before `Insert`.
/// 3. `Create` comes before `Insert`.
/// 4. Two `Remove`s under the same parent are applied highest index first, so that removing one
///    does not shift the index of another that has not been removed yet.
///
/// Any other pair has no preference and this returns `false` in both directions. The relation is
/// never true in both directions for the same pair.
pub fn should_first_come_before_second<P>(lhs: &Mutation<P>, rhs: &Mutation<P>) -> bool {
    use MutationKind::*;

    match (lhs.kind(), rhs.kind()) {
        (Delete, _) => false,
        (_, Delete) => true,
        (Remove, Insert) | (Create, Insert) => true,
        (Remove, Remove) => lhs.parent() == rhs.parent() && lhs.index() > rhs.index(),
        _ => false,
    }
}

/// Stable sort of `mutations` consistent with [`should_first_come_before_second`].
///
/// The comparator is not a total order (e.g. `Update` has no preference relative to anything but
/// `Delete`), so it cannot be handed to [`slice::sort_by`] directly. Instead, mutations are
/// grouped into three bands that satisfy rules 1-3: `Remove`/`Create`/`Update`, then `Insert`,
/// then `Delete`, each band keeping its original relative order. Same-parent `Remove`s are then
/// reordered by descending index within the slots they already occupy, which satisfies rule 4
/// without moving anything else.
pub fn sort_mutations<P>(mutations: &mut Vec<Mutation<P>>) {
    mutations.sort_by_key(|mutation| band(mutation.kind()));

    let mut removes_by_parent: HashMap<Tag, Vec<usize>> = HashMap::new();
    for (position, mutation) in mutations.iter().enumerate() {
        if let Mutation::Remove { parent, .. } = mutation {
            removes_by_parent.entry(*parent).or_default().push(position);
        }
    }
    if removes_by_parent.values().all(|positions| positions.len() < 2) {
        return;
    }

    // order[target] = source: the mutation currently at `source` ends up at `target`.
    let mut slots: Vec<Option<Mutation<P>>> = mutations.drain(..).map(Some).collect();
    let mut order: Vec<usize> = (0..slots.len()).collect();
    for positions in removes_by_parent.values() {
        let mut sources = positions.clone();
        sources.sort_by_key(|&source| Reverse(slots[source].as_ref().and_then(Mutation::index)));
        for (&target, &source) in positions.iter().zip(&sources) {
            order[target] = source;
        }
    }
    mutations.extend(order.into_iter().filter_map(|source| slots[source].take()));
}

fn band(kind: MutationKind) -> u8 {
    match kind {
        MutationKind::Remove | MutationKind::Create | MutationKind::Update => 0,
        MutationKind::Insert => 1,
        MutationKind::Delete => 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::ShadowView;

    fn view(tag: u32) -> ShadowView {
        ShadowView::new(tag, "View", 1)
    }

    fn create(tag: u32) -> Mutation {
        Mutation::Create { view: view(tag) }
    }

    fn delete(tag: u32) -> Mutation {
        Mutation::Delete { view: view(tag) }
    }

    fn insert(parent: u32, tag: u32, index: usize) -> Mutation {
        Mutation::Insert {
            parent,
            view: view(tag),
            index,
        }
    }

    fn remove(parent: u32, tag: u32, index: usize) -> Mutation {
        Mutation::Remove {
            parent,
            view: view(tag),
            index,
        }
    }

    fn update(tag: u32) -> Mutation {
        Mutation::Update {
            parent: 1,
            old_view: view(tag),
            new_view: view(tag),
        }
    }

    fn one_of_each() -> Vec<Mutation> {
        vec![delete(10), insert(1, 11, 0), update(12), remove(1, 13, 2), create(14)]
    }

    fn assert_consistent(sorted: &[Mutation]) {
        for (i, earlier) in sorted.iter().enumerate() {
            for later in &sorted[i + 1..] {
                assert!(
                    !should_first_come_before_second(later, earlier),
                    "{later:?} should have been sorted before {earlier:?}"
                );
            }
        }
    }

    #[test]
    fn delete_comes_after_everything() {
        for other in [create(2), insert(1, 2, 0), remove(1, 2, 0), update(2)] {
            assert!(should_first_come_before_second(&other, &delete(3)));
            assert!(!should_first_come_before_second(&delete(3), &other));
        }
        assert!(!should_first_come_before_second(&delete(3), &delete(4)));
    }

    #[test]
    fn remove_and_create_come_before_insert() {
        assert!(should_first_come_before_second(&remove(1, 2, 0), &insert(1, 3, 0)));
        assert!(!should_first_come_before_second(&insert(1, 3, 0), &remove(1, 2, 0)));
        assert!(should_first_come_before_second(&create(3), &insert(1, 3, 0)));
        assert!(!should_first_come_before_second(&insert(1, 3, 0), &create(3)));
    }

    #[test]
    fn unrelated_pairs_have_no_preference() {
        let pairs = [
            (update(2), insert(1, 3, 0)),
            (update(2), remove(1, 3, 0)),
            (create(2), remove(1, 3, 0)),
            (create(2), update(3)),
            (insert(1, 2, 0), insert(1, 3, 1)),
            (remove(1, 2, 0), remove(5, 3, 1)),
        ];
        for (a, b) in pairs {
            assert!(!should_first_come_before_second(&a, &b));
            assert!(!should_first_come_before_second(&b, &a));
        }
    }

    #[test]
    fn never_asserts_both_directions() {
        let mut all = one_of_each();
        all.extend([remove(1, 20, 0), remove(1, 21, 5), remove(2, 22, 3), insert(2, 23, 1)]);
        for a in &all {
            for b in &all {
                assert!(
                    !(should_first_come_before_second(a, b)
                        && should_first_come_before_second(b, a))
                );
            }
        }
    }

    #[test]
    fn sorted_batch_of_all_kinds_is_consistent() {
        let mut mutations = one_of_each();
        sort_mutations(&mut mutations);

        assert_consistent(&mutations);
        assert_eq!(mutations.last().map(Mutation::kind), Some(MutationKind::Delete));
    }

    #[test]
    fn same_parent_removes_sort_by_descending_index() {
        let mut mutations = vec![
            remove(1, 10, 0),
            update(30),
            remove(1, 11, 3),
            remove(2, 12, 1),
            remove(1, 13, 1),
            remove(2, 14, 4),
            remove(1, 15, 3),
        ];
        sort_mutations(&mut mutations);

        let indices = |parent: u32| {
            mutations
                .iter()
                .filter(|m| m.is_structural_child_of(parent))
                .filter_map(Mutation::index)
                .collect::<Vec<_>>()
        };
        assert_eq!(indices(1), [3, 3, 1, 0]);
        assert_eq!(indices(2), [4, 1]);
        // Equal indices keep their original order.
        let tags = mutations.iter().map(Mutation::tag).collect::<Vec<_>>();
        assert_eq!(tags, [11, 30, 15, 14, 13, 12, 10]);
        assert_consistent(&mutations);
    }

    #[test]
    fn sort_keeps_order_of_pairs_without_preference() {
        let mut mutations = vec![update(1), create(2), update(3), insert(1, 2, 0), insert(1, 4, 1)];
        sort_mutations(&mut mutations);

        let tags = mutations.iter().map(Mutation::tag).collect::<Vec<_>>();
        assert_eq!(tags, [1, 2, 3, 2, 4]);
    }
}
