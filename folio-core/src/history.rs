//! Linear undo/redo history of whole-document snapshots.

use crate::document::DocumentState;

/// Smallest snapshot limit that still allows one undo.
pub const MIN_BOUNDED_LIMIT: usize = 2;

/// A sequence of document snapshots plus a cursor.
///
/// The cursor always indexes a valid snapshot. Pushing truncates everything
/// after the cursor, so there is never more than one redo branch.
#[derive(Debug, Clone)]
pub struct History {
    snapshots: Vec<DocumentState>,
    cursor: usize,
    /// Maximum number of snapshots kept; `0` means unbounded.
    limit: usize,
}

impl History {
    /// Create a history whose only snapshot is `initial`.
    #[must_use]
    pub fn new(initial: DocumentState) -> Self {
        Self::with_limit(initial, 0)
    }

    /// Create a history keeping at most `limit` snapshots (`0` = unbounded).
    ///
    /// A bounded history keeps at least [`MIN_BOUNDED_LIMIT`] snapshots so the
    /// latest commit can always be undone.
    #[must_use]
    pub fn with_limit(initial: DocumentState, limit: usize) -> Self {
        Self {
            snapshots: vec![initial],
            cursor: 0,
            limit: if limit == 0 { 0 } else { limit.max(MIN_BOUNDED_LIMIT) },
        }
    }

    /// The snapshot under the cursor.
    #[must_use]
    pub fn current(&self) -> &DocumentState {
        &self.snapshots[self.cursor]
    }

    /// Mutable access to the snapshot under the cursor.
    ///
    /// Only used for changes that are not undoable edits, such as selection.
    pub(crate) fn current_mut(&mut self) -> &mut DocumentState {
        &mut self.snapshots[self.cursor]
    }

    /// Append a snapshot after the cursor, discarding any redoable snapshots.
    pub fn push(&mut self, snapshot: DocumentState) {
        self.snapshots.truncate(self.cursor + 1);
        self.snapshots.push(snapshot);
        self.cursor = self.snapshots.len() - 1;

        if self.limit > 0 && self.snapshots.len() > self.limit {
            let excess = self.snapshots.len() - self.limit;
            self.snapshots.drain(..excess);
            self.cursor -= excess;
            tracing::trace!("History trimmed {excess} oldest snapshot(s)");
        }
    }

    /// Step back one snapshot. Returns `false` at the oldest snapshot.
    pub fn undo(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        true
    }

    /// Step forward one snapshot. Returns `false` at the newest snapshot.
    pub fn redo(&mut self) -> bool {
        if self.cursor + 1 >= self.snapshots.len() {
            return false;
        }
        self.cursor += 1;
        true
    }

    /// Returns true if there are snapshots that can be undone.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    /// Returns true if there are snapshots that can be redone.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.snapshots.len()
    }

    /// Number of snapshots held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Always `false`: a history holds at least one snapshot.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Index of the current snapshot.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(DocumentState::new())
    }
}
