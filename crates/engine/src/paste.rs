//! Clipboard interchange: tab-separated text in and out of the grid.

use crate::session::{EditorSession, ViewMode};

/// Split clipboard text into a grid. Line endings are normalized and
/// trailing all-empty rows (a trailing newline from most sources) are
/// trimmed.
fn parse_tsv(text: &str) -> Vec<Vec<String>> {
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
    let mut rows: Vec<Vec<String>> = normalized
        .split('\n')
        .map(|line| line.split('\t').map(str::to_string).collect())
        .collect();
    while rows
        .last()
        .is_some_and(|row| row.iter().all(String::is_empty))
    {
        rows.pop();
    }
    rows
}

impl EditorSession {
    /// Render a rectangular cell range as tab/newline-delimited text for
    /// the clipboard. Corners may be given in any order.
    pub fn copy_range(&self, a: (usize, usize), b: (usize, usize)) -> String {
        let (min_row, max_row) = (a.0.min(b.0), a.0.max(b.0));
        let (min_col, max_col) = (a.1.min(b.1), a.1.max(b.1));
        let mut lines = Vec::with_capacity(max_row - min_row + 1);
        for row in min_row..=max_row {
            let cells: Vec<&str> = (min_col..=max_col)
                .map(|col| self.model.get_cell(row, col))
                .collect();
            lines.push(cells.join("\t"));
        }
        lines.join("\n")
    }

    /// Paste tab-separated text with its top-left cell at the anchor.
    ///
    /// Rows are grown to fit; columns never are — pasted rows are clipped
    /// at the current column extent, and an anchor column outside the
    /// grid rejects the paste. The whole paste is one history entry.
    pub fn paste_tsv(&mut self, anchor_row: usize, anchor_col: usize, text: &str) -> bool {
        if self.view_mode() != ViewMode::Structured {
            return false;
        }
        let rows = parse_tsv(text);
        if rows.is_empty() {
            return false;
        }
        let max_cols = self.model.column_count();
        if anchor_col >= max_cols {
            return false;
        }
        let needed = (anchor_row + rows.len()).saturating_sub(self.model.row_count());
        if needed > 0 {
            let at = self.model.row_count();
            self.model.insert_rows(at, needed);
        }
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().take(max_cols - anchor_col).enumerate() {
                self.model.set_cell(anchor_row + r, anchor_col + c, value);
            }
        }
        self.commit();
        true
    }
}
