//! Search and replace over the grid.
//!
//! Matching is substring containment, optionally case-insensitive.
//! Coordinates are scanned in row-major order; `find_next` treats the
//! grid as circular. All of these require structured access: a pending
//! parse error blocks them (the error stays queryable on the session).

use crate::session::EditorSession;

fn cell_matches(value: &str, query: &str, case_sensitive: bool) -> bool {
    if case_sensitive {
        value.contains(query)
    } else {
        value.to_lowercase().contains(&query.to_lowercase())
    }
}

impl EditorSession {
    /// Find the next matching cell, starting at the row-major successor
    /// of `(from_row, from_col)` and wrapping around. Scans each cell at
    /// most once. Empty queries never match.
    pub fn find_next_from(
        &self,
        query: &str,
        case_sensitive: bool,
        from_row: usize,
        from_col: usize,
    ) -> Option<(usize, usize)> {
        if query.is_empty() {
            return None;
        }
        let rows = self.model.row_count();
        let cols = self.model.column_count();
        if rows == 0 || cols == 0 {
            return None;
        }
        let total = rows * cols;
        let start = from_row * cols + from_col + 1;
        for offset in 0..total {
            let idx = (start + offset) % total;
            let row = idx / cols;
            let col = idx % cols;
            if cell_matches(self.model.get_cell(row, col), query, case_sensitive) {
                return Some((row, col));
            }
        }
        None
    }

    /// Find the next match after the current selection (or from the top
    /// when nothing is selected) and select it.
    pub fn find_next(&mut self, query: &str, case_sensitive: bool) -> Option<(usize, usize)> {
        if self.ensure_structured().is_err() {
            return None;
        }
        let cols = self.model.column_count();
        let (from_row, from_col) = match self.selection {
            Some(cell) => cell,
            // Row-major predecessor of (0, 0), so the scan starts there
            None => (self.model.row_count().saturating_sub(1), cols.saturating_sub(1)),
        };
        let hit = self.find_next_from(query, case_sensitive, from_row, from_col)?;
        self.selection = Some(hit);
        Some(hit)
    }

    /// All matching cells in stable row-major order, with the matched
    /// cell text.
    pub fn find_all(&mut self, query: &str, case_sensitive: bool) -> Vec<(usize, usize, String)> {
        if query.is_empty() || self.ensure_structured().is_err() {
            return Vec::new();
        }
        let mut results = Vec::new();
        for row in 0..self.model.row_count() {
            for col in 0..self.model.column_count() {
                let value = self.model.get_cell(row, col);
                if cell_matches(value, query, case_sensitive) {
                    results.push((row, col, value.to_string()));
                }
            }
        }
        results
    }

    /// Replace the selected cell if it matches; otherwise find the next
    /// match and replace that. A replace without any match never mutates
    /// an unrelated cell. The whole cell is set to `replacement`.
    pub fn replace_current(
        &mut self,
        query: &str,
        replacement: &str,
        case_sensitive: bool,
    ) -> bool {
        if query.is_empty() || self.ensure_structured().is_err() {
            return false;
        }
        if let Some((row, col)) = self.selection {
            if cell_matches(self.model.get_cell(row, col), query, case_sensitive) {
                return self.set_cell(row, col, replacement);
            }
        }
        if let Some((row, col)) = self.find_next(query, case_sensitive) {
            return self.set_cell(row, col, replacement);
        }
        false
    }

    /// Replace every matching cell, returning the count. Each mutation
    /// goes through `set_cell`, so every replaced cell produces its own
    /// history entry and notification.
    pub fn replace_all(&mut self, query: &str, replacement: &str, case_sensitive: bool) -> usize {
        if query.is_empty() || self.ensure_structured().is_err() {
            return 0;
        }
        let mut count = 0;
        for row in 0..self.model.row_count() {
            for col in 0..self.model.column_count() {
                if cell_matches(self.model.get_cell(row, col), query, case_sensitive) {
                    self.set_cell(row, col, replacement);
                    count += 1;
                }
            }
        }
        count
    }
}
