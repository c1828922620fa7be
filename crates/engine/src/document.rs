use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// A delimited-text document: one header record plus a grid of string cells.
///
/// Rows are kept at header width by every completed operation. A row may
/// transiently be wider than the header while an edit is in progress (the
/// extra cells are simply not addressable through the header), but never
/// narrower.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document (no header, no rows)
    pub fn new() -> Self {
        Self { header: Vec::new(), rows: Vec::new() }
    }

    /// Template for a fresh "new document": one unnamed column, no rows
    pub fn with_template() -> Self {
        Self { header: vec!["column1".to_string()], rows: Vec::new() }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.header.len()
    }

    /// Display name for a column header.
    ///
    /// Empty header entries render as "Column N" (1-based). This is a
    /// display concern only; the stored header stays empty.
    pub fn column_display_name(&self, col: usize) -> String {
        match self.header.get(col) {
            Some(name) if !name.is_empty() => name.clone(),
            _ => format!("Column {}", col + 1),
        }
    }
}

/// Owns a [`Document`] plus the row-keyed presentation overlay.
///
/// The overlay (highlight color, custom display height) describes logical
/// rows, not storage indices: every structural edit re-keys it so entries
/// keep following the row they were attached to. Entries that fall outside
/// the row count after an edit are discarded.
#[derive(Debug, Clone, Default)]
pub struct DocumentModel {
    doc: Document,
    row_colors: FxHashMap<usize, String>,
    row_heights: FxHashMap<usize, u32>,
}

impl DocumentModel {
    pub fn new(doc: Document) -> Self {
        Self {
            doc,
            row_colors: FxHashMap::default(),
            row_heights: FxHashMap::default(),
        }
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn row_count(&self) -> usize {
        self.doc.row_count()
    }

    pub fn column_count(&self) -> usize {
        self.doc.column_count()
    }

    /// Cell text at (row, col). Out-of-range coordinates read as empty,
    /// never as an error.
    pub fn get_cell(&self, row: usize, col: usize) -> &str {
        self.doc
            .rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Set a cell, growing the grid as needed.
    ///
    /// Typing past the bottom or right edge grows the sheet: new rows are
    /// padded to header width, and the target row gains empty cells up to
    /// `col`. The header itself is not widened here.
    pub fn set_cell(&mut self, row: usize, col: usize, value: &str) -> bool {
        let width = self.doc.header.len();
        while row >= self.doc.rows.len() {
            self.doc.rows.push(vec![String::new(); width]);
        }
        let cells = &mut self.doc.rows[row];
        while col >= cells.len() {
            cells.push(String::new());
        }
        cells[col] = value.to_string();
        true
    }

    /// Insert `count` empty rows at `at` (clamped into [0, row_count]).
    /// Overlay entries at or below the insertion point shift down.
    pub fn insert_rows(&mut self, at: usize, count: usize) -> bool {
        if count == 0 {
            return false;
        }
        let at = at.min(self.doc.rows.len());
        let width = self.doc.header.len();
        for _ in 0..count {
            self.doc.rows.insert(at, vec![String::new(); width]);
        }
        self.shift_overlay_on_insert(at, count);
        true
    }

    /// Remove up to `count` rows starting at `at`. Fails if `at` is past
    /// the last row; the span is clamped to the rows that exist. Overlay
    /// entries inside the span are dropped, later entries shift up.
    pub fn remove_rows(&mut self, at: usize, count: usize) -> bool {
        if count == 0 || at >= self.doc.rows.len() {
            return false;
        }
        let end = (at + count).min(self.doc.rows.len());
        self.doc.rows.drain(at..end);
        self.shift_overlay_on_remove(at, end - at);
        true
    }

    /// Insert `count` unnamed columns at `at` (clamped into
    /// [0, column_count]). Row metadata is row-keyed and unaffected.
    pub fn insert_columns(&mut self, at: usize, count: usize) -> bool {
        if count == 0 {
            return false;
        }
        let at = at.min(self.doc.header.len());
        for offset in 0..count {
            self.doc.header.insert(at + offset, String::new());
        }
        for row in &mut self.doc.rows {
            let idx = at.min(row.len());
            for offset in 0..count {
                row.insert(idx + offset, String::new());
            }
        }
        true
    }

    /// Remove up to `count` columns starting at `at` from the header and
    /// every row. Fails if `at` is past the last column.
    pub fn remove_columns(&mut self, at: usize, count: usize) -> bool {
        if count == 0 || at >= self.doc.header.len() {
            return false;
        }
        let end = (at + count).min(self.doc.header.len());
        self.doc.header.drain(at..end);
        for row in &mut self.doc.rows {
            let row_end = end.min(row.len());
            if at < row.len() {
                row.drain(at..row_end);
            }
        }
        true
    }

    /// Set a header name, growing the header with empty names if `col` is
    /// beyond the current width.
    pub fn set_header(&mut self, col: usize, name: &str) -> bool {
        while col >= self.doc.header.len() {
            self.doc.header.push(String::new());
        }
        self.doc.header[col] = name.to_string();
        true
    }

    // =========================================================================
    // Row metadata overlay
    // =========================================================================

    pub fn row_color(&self, row: usize) -> Option<&str> {
        self.row_colors.get(&row).map(String::as_str)
    }

    pub fn row_colors(&self) -> &FxHashMap<usize, String> {
        &self.row_colors
    }

    /// Set or clear the highlight color for a row. Out-of-range rows are
    /// ignored.
    pub fn set_row_color(&mut self, row: usize, color: Option<&str>) {
        if row >= self.doc.rows.len() {
            return;
        }
        match color {
            Some(c) => {
                self.row_colors.insert(row, c.to_string());
            }
            None => {
                self.row_colors.remove(&row);
            }
        }
    }

    /// Replace the whole color overlay from untrusted input. Out-of-range
    /// entries are silently dropped (best-effort restore of saved layout
    /// state).
    pub fn set_row_colors<I>(&mut self, mapping: I)
    where
        I: IntoIterator<Item = (usize, String)>,
    {
        let row_count = self.doc.rows.len();
        self.row_colors = mapping
            .into_iter()
            .filter(|(row, _)| *row < row_count)
            .collect();
    }

    pub fn custom_row_height(&self, row: usize) -> Option<u32> {
        self.row_heights.get(&row).copied()
    }

    /// Custom heights in row order, for layout persistence.
    pub fn custom_row_heights(&self) -> Vec<(usize, u32)> {
        let mut heights: Vec<_> = self.row_heights.iter().map(|(&r, &h)| (r, h)).collect();
        heights.sort_unstable();
        heights
    }

    /// Set or clear (back to default) the display height for a row.
    pub fn set_custom_row_height(&mut self, row: usize, height: Option<u32>) {
        if row >= self.doc.rows.len() {
            return;
        }
        match height {
            Some(h) => {
                self.row_heights.insert(row, h);
            }
            None => {
                self.row_heights.remove(&row);
            }
        }
    }

    /// Swap in a new document (reparse, undo restore, file open). The
    /// overlay is kept but normalized: entries past the new row count are
    /// dropped.
    pub fn replace_document(&mut self, doc: Document) {
        self.doc = doc;
        let row_count = self.doc.rows.len();
        self.row_colors.retain(|&row, _| row < row_count);
        self.row_heights.retain(|&row, _| row < row_count);
    }

    fn shift_overlay_on_insert(&mut self, at: usize, count: usize) {
        shift_keys_on_insert(&mut self.row_colors, at, count);
        shift_keys_on_insert(&mut self.row_heights, at, count);
    }

    fn shift_overlay_on_remove(&mut self, at: usize, removed: usize) {
        shift_keys_on_remove(&mut self.row_colors, at, removed);
        shift_keys_on_remove(&mut self.row_heights, at, removed);
    }
}

fn shift_keys_on_insert<V>(map: &mut FxHashMap<usize, V>, at: usize, count: usize) {
    if map.is_empty() {
        return;
    }
    let shifted = std::mem::take(map)
        .into_iter()
        .map(|(row, v)| if row >= at { (row + count, v) } else { (row, v) })
        .collect();
    *map = shifted;
}

fn shift_keys_on_remove<V>(map: &mut FxHashMap<usize, V>, at: usize, removed: usize) {
    if map.is_empty() {
        return;
    }
    let end = at + removed;
    let shifted = std::mem::take(map)
        .into_iter()
        .filter_map(|(row, v)| {
            if row < at {
                Some((row, v))
            } else if row >= end {
                Some((row - removed, v))
            } else {
                None
            }
        })
        .collect();
    *map = shifted;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model_with_rows(rows: usize, cols: usize) -> DocumentModel {
        let header = (0..cols).map(|c| format!("col{}", c)).collect();
        let grid = (0..rows)
            .map(|r| (0..cols).map(|c| format!("{}:{}", r, c)).collect())
            .collect();
        DocumentModel::new(Document { header, rows: grid })
    }

    #[test]
    fn test_get_cell_out_of_range_is_empty() {
        let model = model_with_rows(2, 2);
        assert_eq!(model.get_cell(0, 0), "0:0");
        assert_eq!(model.get_cell(5, 0), "");
        assert_eq!(model.get_cell(0, 5), "");
    }

    #[test]
    fn test_set_cell_grows_grid() {
        let mut model = model_with_rows(1, 2);
        assert!(model.set_cell(3, 1, "deep"));

        assert_eq!(model.get_cell(3, 1), "deep");
        // Intervening rows exist at header width, filled with empty strings
        assert_eq!(model.row_count(), 4);
        assert_eq!(model.get_cell(1, 0), "");
        assert_eq!(model.get_cell(2, 1), "");
        assert_eq!(model.document().rows[2].len(), 2);
    }

    #[test]
    fn test_set_cell_grows_row_past_header() {
        let mut model = model_with_rows(1, 2);
        assert!(model.set_cell(0, 4, "wide"));
        assert_eq!(model.get_cell(0, 4), "wide");
        assert_eq!(model.get_cell(0, 3), "");
        // Header width unchanged; the widened row is transient
        assert_eq!(model.column_count(), 2);
    }

    #[test]
    fn test_insert_rows_clamps_and_pads() {
        let mut model = model_with_rows(2, 3);
        assert!(!model.insert_rows(0, 0));
        assert!(model.insert_rows(99, 2));

        assert_eq!(model.row_count(), 4);
        assert_eq!(model.document().rows[2], vec!["", "", ""]);
        assert_eq!(model.get_cell(1, 1), "1:1");
    }

    #[test]
    fn test_remove_rows_clamps_span() {
        let mut model = model_with_rows(3, 2);
        assert!(!model.remove_rows(3, 1));
        assert!(model.remove_rows(1, 10));
        assert_eq!(model.row_count(), 1);
        assert_eq!(model.get_cell(0, 0), "0:0");
    }

    #[test]
    fn test_insert_columns_example_scenario() {
        let mut model = DocumentModel::new(Document {
            header: vec!["a".into(), "b".into()],
            rows: vec![vec!["1".into(), "2".into()]],
        });
        assert!(model.insert_columns(1, 1));
        assert_eq!(model.document().header, vec!["a", "", "b"]);
        assert_eq!(model.document().rows[0], vec!["1", "", "2"]);
    }

    #[test]
    fn test_remove_columns_touches_every_row() {
        let mut model = model_with_rows(2, 3);
        assert!(model.remove_columns(1, 1));
        assert_eq!(model.column_count(), 2);
        assert_eq!(model.document().rows[0], vec!["0:0", "0:2"]);
        assert_eq!(model.document().rows[1], vec!["1:0", "1:2"]);
        assert!(!model.remove_columns(5, 1));
    }

    #[test]
    fn test_set_header_grows() {
        let mut model = model_with_rows(1, 1);
        assert!(model.set_header(3, "later"));
        assert_eq!(model.document().header, vec!["col0", "", "", "later"]);
    }

    #[test]
    fn test_column_display_name() {
        let doc = Document {
            header: vec!["name".into(), String::new()],
            rows: Vec::new(),
        };
        assert_eq!(doc.column_display_name(0), "name");
        assert_eq!(doc.column_display_name(1), "Column 2");
        assert_eq!(doc.column_display_name(7), "Column 8");
        // The stored header is untouched
        assert_eq!(doc.header[1], "");
    }

    #[test]
    fn test_row_color_reindex_on_insert_and_remove() {
        let mut model = model_with_rows(10, 1);
        model.set_row_color(5, Some("#ffcc00"));

        assert!(model.insert_rows(2, 3));
        assert_eq!(model.row_color(5), None);
        assert_eq!(model.row_color(8), Some("#ffcc00"));

        assert!(model.remove_rows(0, 4));
        assert_eq!(model.row_color(8), None);
        assert_eq!(model.row_color(4), Some("#ffcc00"));
    }

    #[test]
    fn test_row_color_dropped_when_row_removed() {
        let mut model = model_with_rows(4, 1);
        model.set_row_color(1, Some("red"));
        model.set_row_color(3, Some("blue"));

        assert!(model.remove_rows(1, 1));
        assert_eq!(model.row_color(1), None);
        assert_eq!(model.row_color(2), Some("blue"));
        assert_eq!(model.row_colors().len(), 1);
    }

    #[test]
    fn test_row_heights_follow_rows() {
        let mut model = model_with_rows(5, 1);
        model.set_custom_row_height(3, Some(64));

        assert!(model.insert_rows(0, 2));
        assert_eq!(model.custom_row_height(5), Some(64));

        model.set_custom_row_height(5, None);
        assert_eq!(model.custom_row_height(5), None);
    }

    #[test]
    fn test_set_row_colors_filters_out_of_range() {
        let mut model = model_with_rows(2, 1);
        model.set_row_colors(vec![
            (0, "red".to_string()),
            (1, "green".to_string()),
            (17, "blue".to_string()),
        ]);
        assert_eq!(model.row_color(0), Some("red"));
        assert_eq!(model.row_color(1), Some("green"));
        assert_eq!(model.row_colors().len(), 2);
    }

    #[test]
    fn test_overlay_ignores_column_edits() {
        let mut model = model_with_rows(3, 3);
        model.set_row_color(1, Some("red"));
        model.set_custom_row_height(2, Some(40));

        assert!(model.insert_columns(0, 2));
        assert!(model.remove_columns(3, 1));

        assert_eq!(model.row_color(1), Some("red"));
        assert_eq!(model.custom_row_height(2), Some(40));
    }

    #[test]
    fn test_replace_document_normalizes_overlay() {
        let mut model = model_with_rows(5, 1);
        model.set_row_color(4, Some("red"));
        model.set_custom_row_height(4, Some(50));
        model.set_row_color(0, Some("green"));

        let smaller = model_with_rows(2, 1);
        model.replace_document(smaller.document().clone());

        assert_eq!(model.row_color(4), None);
        assert_eq!(model.custom_row_height(4), None);
        assert_eq!(model.row_color(0), Some("green"));
    }
}
