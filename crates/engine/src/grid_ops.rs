//! Structural edit operations
//!
//! Row/column insert, delete and rename, composed from the model
//! primitives. Inserted columns get a generated unique name; the model
//! keeps the metadata overlay re-indexed underneath.

use crate::session::{EditorSession, ViewMode};

impl EditorSession {
    /// Insert one empty row above `row`.
    pub fn insert_row_above(&mut self, row: usize) -> bool {
        self.insert_rows(row, 1)
    }

    /// Insert one empty row below `row`.
    pub fn insert_row_below(&mut self, row: usize) -> bool {
        self.insert_rows(row + 1, 1)
    }

    /// Delete a single row. Fails when `row` is out of range.
    pub fn delete_row(&mut self, row: usize) -> bool {
        self.remove_rows(row, 1)
    }

    /// Delete a set of rows given in any order. Deletion happens from the
    /// bottom up so earlier removals do not shift later targets.
    pub fn delete_row_set(&mut self, rows: &[usize]) -> usize {
        let mut sorted: Vec<usize> = rows.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        let mut removed = 0;
        for &row in sorted.iter().rev() {
            if self.remove_rows(row, 1) {
                removed += 1;
            }
        }
        removed
    }

    /// Insert a column at `col` with a generated unique name. One history
    /// entry for the whole operation (insert + name).
    pub fn insert_column_at(&mut self, col: usize) -> bool {
        if self.view_mode() != ViewMode::Structured {
            return false;
        }
        let name = self.generate_column_name();
        if !self.model.insert_columns(col, 1) {
            return false;
        }
        let col = col.min(self.model.column_count().saturating_sub(1));
        self.model.set_header(col, &name);
        self.commit();
        true
    }

    /// Insert a named column to the left of `col`.
    pub fn insert_column_left(&mut self, col: usize) -> bool {
        self.insert_column_at(col)
    }

    /// Insert a named column to the right of `col`.
    pub fn insert_column_right(&mut self, col: usize) -> bool {
        self.insert_column_at(col + 1)
    }

    /// Delete a single column. Fails when `col` is out of range.
    pub fn delete_column(&mut self, col: usize) -> bool {
        self.remove_columns(col, 1)
    }

    /// Rename a column header. Fails when `col` is out of range (rename
    /// never grows the header; use `set_header` for that).
    pub fn rename_column(&mut self, col: usize, name: &str) -> bool {
        if col >= self.model.column_count() {
            return false;
        }
        self.set_header(col, name)
    }

    /// Generate a column name not used by any existing header entry:
    /// `new_column`, then `new_column_2`, `new_column_3`, ...
    pub fn generate_column_name(&self) -> String {
        let base = "new_column";
        let existing: Vec<&str> = self
            .model
            .document()
            .header
            .iter()
            .filter(|name| !name.is_empty())
            .map(String::as_str)
            .collect();
        if !existing.contains(&base) {
            return base.to_string();
        }
        let mut counter = 2;
        loop {
            let candidate = format!("{}_{}", base, counter);
            if !existing.contains(&candidate.as_str()) {
                return candidate;
            }
            counter += 1;
        }
    }
}
