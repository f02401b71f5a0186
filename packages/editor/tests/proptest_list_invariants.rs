//! Property-based invariant tests for the section list and drag reorder.
//!
//! 1. Positions are always exactly `0..len`, whatever sequence of edits ran.
//! 2. A move followed by the opposite move restores the order.
//! 3. Inserting clamps the index and never loses or duplicates a section.
//! 4. A drop keeps the same set of ids and lands the source at the target's index.

use pagecraft_common::{Section, SectionKind};
use pagecraft_editor::{on_reorder, Mutation, SectionList};
use proptest::prelude::*;
use serde_json::json;

// ── Helpers ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum Op {
    Insert(i64),
    Remove(usize),
    Move(usize, usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (-5i64..20).prop_map(Op::Insert),
        (0usize..20).prop_map(Op::Remove),
        (0usize..20, 0usize..20).prop_map(|(from, to)| Op::Move(from, to)),
    ]
}

fn section(id: String) -> Section {
    Section {
        id,
        page_id: "home".to_string(),
        kind: SectionKind::Generic,
        data: json!({}),
        position: 0,
    }
}

fn list_of(len: usize) -> SectionList {
    let sections = (0..len)
        .map(|i| Section {
            position: i as u32,
            ..section(format!("s{}", i))
        })
        .collect();
    SectionList::from_stored("home", sections)
}

fn assert_contiguous(list: &SectionList) -> Result<(), TestCaseError> {
    for (index, section) in list.sections().iter().enumerate() {
        prop_assert_eq!(section.position as usize, index);
    }
    Ok(())
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Positions stay contiguous
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn positions_contiguous_after_edits(len in 0usize..8, ops in prop::collection::vec(op_strategy(), 0..30)) {
        let mut list = list_of(len);
        let mut next_id = len;

        for op in ops {
            match op {
                Op::Insert(index) => {
                    list.insert_at(index, section(format!("s{}", next_id)));
                    next_id += 1;
                }
                Op::Remove(index) => {
                    if let Some(id) = list.sections().get(index).map(|s| s.id.clone()) {
                        Mutation::RemoveSection { section_id: id }.apply(&mut list).unwrap();
                    }
                }
                Op::Move(from, to) => {
                    list.move_by_index(from, to);
                }
            }
            assert_contiguous(&list)?;
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Moves are invertible
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn move_then_move_back_restores(len in 1usize..12, from in 0usize..12, to in 0usize..12) {
        let from = from % len;
        let to = to % len;
        let original = list_of(len);

        let mut list = original.clone();
        let changed = list.move_by_index(from, to);
        prop_assert_eq!(changed, from != to);

        list.move_by_index(to, from);
        prop_assert_eq!(list, original);
    }

    #[test]
    fn move_to_same_index_is_noop(len in 1usize..12, index in 0usize..12) {
        let index = index % len;
        let original = list_of(len);
        let mut list = original.clone();

        prop_assert!(!list.move_by_index(index, index));
        prop_assert_eq!(list, original);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Insertion clamps
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn insert_clamps_index(len in 0usize..10, index in -50i64..50) {
        let mut list = list_of(len);
        let used = list.insert_at(index, section("new".to_string()));

        prop_assert_eq!(used as i64, index.clamp(0, len as i64));
        prop_assert_eq!(list.len(), len + 1);
        prop_assert_eq!(list.index_of("new"), Some(used));
        assert_contiguous(&list)?;
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Drops permute the order
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn drop_is_a_permutation(len in 2usize..10, source in 0usize..10, target in 0usize..10) {
        let source = source % len;
        let target = target % len;
        let order = list_of(len).ids();

        match on_reorder(&order, &order[source], Some(order[target].as_str())) {
            None => prop_assert_eq!(source, target),
            Some(next) => {
                prop_assert_ne!(source, target);
                prop_assert_eq!(next.len(), order.len());
                prop_assert_eq!(&next[target], &order[source]);

                let mut sorted_before = order.clone();
                let mut sorted_after = next.clone();
                sorted_before.sort();
                sorted_after.sort();
                prop_assert_eq!(sorted_before, sorted_after);
            }
        }
    }

    #[test]
    fn drop_without_target_is_noop(len in 1usize..10, source in 0usize..10) {
        let order = list_of(len).ids();
        prop_assert_eq!(on_reorder(&order, &order[source % len], None), None);
    }
}
