//! Property-based invariant tests for the bounded linear history.
//!
//! 1. `can_undo` / `can_redo` agree with the cursor position
//! 2. Length never exceeds capacity
//! 3. After N+k commits only the newest N survive
//! 4. Committing after undo discards the redo branch
//! 5. The store matches a simple `Vec` model on arbitrary sequences

#![allow(clippy::unwrap_used)]

use proptest::prelude::*;
use retouch_core::{HistoryStore, RgbaImage, Snapshot};

// ── Strategies ──────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum Op {
    Commit(u32),
    Undo,
    Redo,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => any::<u32>().prop_map(Op::Commit),
        2 => Just(Op::Undo),
        1 => Just(Op::Redo),
    ]
}

/// A 1x1 snapshot that encodes `tag` in its pixel bytes.
fn snap(tag: u32) -> Snapshot {
    Snapshot::new(RgbaImage::from_pixel(1, 1, image::Rgba(tag.to_le_bytes())))
}

fn tag(snapshot: &Snapshot) -> u32 {
    u32::from_le_bytes(snapshot.as_image().get_pixel(0, 0).0)
}

/// Reference model: plain vector plus cursor.
#[derive(Debug, Default)]
struct Model {
    items: Vec<u32>,
    cursor: Option<usize>,
}

impl Model {
    fn apply(&mut self, op: &Op, capacity: usize) {
        match *op {
            Op::Commit(t) => {
                if let Some(c) = self.cursor {
                    self.items.truncate(c + 1);
                }
                self.items.push(t);
                if self.items.len() > capacity {
                    self.items.remove(0);
                }
                self.cursor = Some(self.items.len() - 1);
            }
            Op::Undo => {
                if let Some(c) = self.cursor.filter(|&c| c > 0) {
                    self.cursor = Some(c - 1);
                }
            }
            Op::Redo => {
                if let Some(c) = self.cursor.filter(|&c| c + 1 < self.items.len()) {
                    self.cursor = Some(c + 1);
                }
            }
        }
    }
}

fn apply(store: &mut HistoryStore, op: &Op) {
    match *op {
        Op::Commit(t) => store.commit(snap(t)),
        Op::Undo => {
            store.undo();
        }
        Op::Redo => {
            store.redo();
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 1-2. Predicates and bounds hold after every operation
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn predicates_track_cursor(
        capacity in 1usize..8,
        ops in proptest::collection::vec(op_strategy(), 0..60),
    ) {
        let mut store = HistoryStore::new(capacity).unwrap();
        for op in &ops {
            apply(&mut store, op);
            prop_assert!(store.len() <= capacity);
            match store.cursor() {
                None => {
                    prop_assert!(store.is_empty());
                    prop_assert!(!store.can_undo());
                    prop_assert!(!store.can_redo());
                }
                Some(cursor) => {
                    prop_assert!(cursor < store.len());
                    prop_assert_eq!(store.can_undo(), cursor > 0);
                    prop_assert_eq!(store.can_redo(), cursor + 1 < store.len());
                }
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 3. Eviction keeps the newest N
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn overflow_keeps_newest(capacity in 1usize..10, extra in 0usize..10) {
        let mut store = HistoryStore::new(capacity).unwrap();
        let total = u32::try_from(capacity + extra).unwrap();
        for t in 1..=total {
            store.commit(snap(t));
        }

        prop_assert_eq!(store.len(), capacity);
        prop_assert_eq!(tag(store.current().unwrap()), total);
        prop_assert_eq!(store.cursor(), Some(capacity - 1));

        let expected: Vec<u32> = (1..=total).skip(extra).collect();
        let actual: Vec<u32> = store.iter().map(tag).collect();
        prop_assert_eq!(actual, expected);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 4. Redo branch is discarded on commit
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn commit_after_undo_discards_branch(
        commits in 2u32..10,
        undos in 1usize..10,
    ) {
        let mut store = HistoryStore::new(32).unwrap();
        for t in 0..commits {
            store.commit(snap(t));
        }
        for _ in 0..undos {
            store.undo();
        }
        let kept = store.cursor().unwrap() + 1;

        store.commit(snap(u32::MAX));

        prop_assert_eq!(store.len(), kept + 1);
        prop_assert!(!store.can_redo());
        prop_assert!(store.redo().is_none());
        prop_assert_eq!(tag(store.current().unwrap()), u32::MAX);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 5. Model equivalence
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn matches_vec_model(
        capacity in 1usize..6,
        ops in proptest::collection::vec(op_strategy(), 0..80),
    ) {
        let mut store = HistoryStore::new(capacity).unwrap();
        let mut model = Model::default();
        for op in &ops {
            apply(&mut store, op);
            model.apply(op, capacity);

            let items: Vec<u32> = store.iter().map(tag).collect();
            prop_assert_eq!(&items, &model.items);
            prop_assert_eq!(store.cursor(), model.cursor);
        }
    }
}
