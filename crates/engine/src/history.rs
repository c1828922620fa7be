//! Linear undo/redo over whole-document snapshots.
//!
//! Each entry is a full deep copy of header + rows; the row metadata
//! overlay is deliberately not part of a snapshot (layout is independent
//! of content history). Consecutive pushes of identical content are
//! deduplicated so notification-driven pushes cannot bloat the stack.

use crate::document::Document;

/// Flat, ordered snapshot list with a cursor. No branching: pushing while
/// the cursor is behind the tail truncates the redo tail.
#[derive(Debug, Clone, Default)]
pub struct HistoryStack {
    snapshots: Vec<Document>,
    cursor: usize,
}

impl HistoryStack {
    pub fn new() -> Self {
        Self { snapshots: Vec::new(), cursor: 0 }
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Push a snapshot. A no-op when it is structurally equal to the
    /// snapshot at the cursor.
    pub fn push(&mut self, snapshot: Document) {
        if let Some(current) = self.snapshots.get(self.cursor) {
            if *current == snapshot {
                return;
            }
        }
        self.snapshots.truncate(self.cursor + 1);
        self.snapshots.push(snapshot);
        self.cursor = self.snapshots.len() - 1;
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        !self.snapshots.is_empty() && self.cursor < self.snapshots.len() - 1
    }

    /// Step back one snapshot. Silent no-op at the boundary.
    pub fn undo(&mut self) -> Option<&Document> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        Some(&self.snapshots[self.cursor])
    }

    /// Step forward one snapshot. Silent no-op at the boundary.
    pub fn redo(&mut self) -> Option<&Document> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        Some(&self.snapshots[self.cursor])
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
        self.cursor = 0;
    }
}
