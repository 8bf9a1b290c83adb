//! Bounded linear undo/redo history.
//!
//! [`HistoryStore`] keeps committed [`Snapshot`]s in commit order with a
//! single cursor marking the current image. Committing after an undo
//! discards the redo branch; committing past capacity evicts the oldest
//! snapshot. There is never more than one "next" snapshot.
//!
//! Boundary conditions (nothing to undo, nothing to redo, empty store)
//! are reported as `None`, not as errors.

use std::collections::VecDeque;
use std::num::NonZeroUsize;

use tracing::debug;

use crate::types::{ConfigError, Snapshot};

/// Default number of snapshots kept.
pub const DEFAULT_MAX_HISTORY: usize = 20;

/// Append-only, bounded, linear sequence of snapshots with a cursor.
///
/// # Invariants
///
/// - `cursor` is `None` iff the store is empty, otherwise it indexes a
///   stored snapshot.
/// - `len() <= capacity()`.
/// - Immediately after [`commit`](Self::commit), the cursor is at the
///   last snapshot.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    snapshots: VecDeque<Snapshot>,
    cursor: Option<usize>,
    capacity: NonZeroUsize,
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::with_capacity(NonZeroUsize::new(DEFAULT_MAX_HISTORY).unwrap_or(NonZeroUsize::MIN))
    }
}

impl HistoryStore {
    /// Create an empty store holding at most `max_history` snapshots.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroHistoryCapacity`] when `max_history`
    /// is zero.
    pub fn new(max_history: usize) -> Result<Self, ConfigError> {
        NonZeroUsize::new(max_history)
            .map(Self::with_capacity)
            .ok_or(ConfigError::ZeroHistoryCapacity)
    }

    /// Create an empty store with a capacity that is known to be valid.
    #[must_use]
    pub fn with_capacity(capacity: NonZeroUsize) -> Self {
        Self {
            snapshots: VecDeque::with_capacity(capacity.get().min(64)),
            cursor: None,
            capacity,
        }
    }

    /// Append `snapshot` as the new current state.
    ///
    /// Any snapshots after the cursor (the redo branch) are discarded
    /// first. If the append pushes the store past capacity, the oldest
    /// snapshot is evicted and the cursor shifted so it still points at
    /// the snapshot just committed.
    pub fn commit(&mut self, snapshot: Snapshot) {
        if let Some(cursor) = self.cursor {
            let discarded = self.snapshots.len() - (cursor + 1);
            if discarded > 0 {
                self.snapshots.truncate(cursor + 1);
                debug!(discarded, "discarded redo branch");
            }
        }

        self.snapshots.push_back(snapshot);
        let mut cursor = self.snapshots.len() - 1;

        if self.snapshots.len() > self.capacity.get() {
            self.snapshots.pop_front();
            cursor -= 1;
            debug!(capacity = self.capacity.get(), "evicted oldest snapshot");
        }

        self.cursor = Some(cursor);
        debug!(cursor, len = self.snapshots.len(), "committed snapshot");
    }

    /// Step back one snapshot and return it, or `None` when already at
    /// the oldest snapshot (or empty).
    pub fn undo(&mut self) -> Option<&Snapshot> {
        let cursor = self.cursor.filter(|&c| c > 0)? - 1;
        self.cursor = Some(cursor);
        debug!(cursor, "undo");
        self.snapshots.get(cursor)
    }

    /// Step forward one snapshot and return it, or `None` when already
    /// at the newest snapshot (or empty).
    pub fn redo(&mut self) -> Option<&Snapshot> {
        let cursor = self.cursor.filter(|&c| c + 1 < self.snapshots.len())? + 1;
        self.cursor = Some(cursor);
        debug!(cursor, "redo");
        self.snapshots.get(cursor)
    }

    /// The snapshot at the cursor.
    #[must_use]
    pub fn current(&self) -> Option<&Snapshot> {
        self.cursor.and_then(|c| self.snapshots.get(c))
    }

    /// The oldest retained snapshot.
    #[must_use]
    pub fn first(&self) -> Option<&Snapshot> {
        self.snapshots.front()
    }

    /// Drop every snapshot.
    pub fn clear(&mut self) {
        self.snapshots.clear();
        self.cursor = None;
        debug!("history cleared");
    }

    /// Whether [`undo`](Self::undo) would move the cursor.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.cursor.is_some_and(|c| c > 0)
    }

    /// Whether [`redo`](Self::redo) would move the cursor.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.cursor.is_some_and(|c| c + 1 < self.snapshots.len())
    }

    /// Number of stored snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Whether the store holds no snapshots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Index of the current snapshot, `None` when empty.
    #[must_use]
    pub const fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Maximum number of snapshots retained.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity.get()
    }

    /// Iterate stored snapshots from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &Snapshot> {
        self.snapshots.iter()
    }
}
