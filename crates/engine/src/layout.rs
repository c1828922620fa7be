//! Display-height estimation for rows with wrapped text.
//!
//! Font metrics arrive as an explicit configuration value; the engine
//! holds no global display state.

use crate::document::DocumentModel;

/// Metrics injected by the presentation layer (derived from its font and
/// cell padding settings).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeightMetrics {
    /// Height of a single-line row, in pixels.
    pub default_height: u32,
    /// Height of one wrapped text line.
    pub line_height: u32,
    /// Average character advance used for wrap estimation.
    pub char_width: u32,
    /// Padding applied above and below the text block.
    pub padding: u32,
}

impl Default for HeightMetrics {
    fn default() -> Self {
        Self {
            default_height: 24,
            line_height: 18,
            char_width: 8,
            padding: 6,
        }
    }
}

/// Estimate how many display lines `text` occupies at `width` pixels.
fn wrapped_lines(text: &str, width: u32, metrics: &HeightMetrics) -> u32 {
    let chars_per_line = (width / metrics.char_width.max(1)).max(1) as usize;
    text.split('\n')
        .map(|line| {
            let chars = line.chars().count();
            (chars.div_ceil(chars_per_line)).max(1) as u32
        })
        .sum()
}

/// Compute the display height for a row: the tallest wrapped cell across
/// all columns. Content that fits on one line stays at the default
/// height; only wrapped cells push the row taller. `col_widths[c]` is
/// the usable pixel width of column `c`; missing entries fall back to a
/// nominal width.
pub fn auto_row_height(
    model: &DocumentModel,
    row: usize,
    col_widths: &[u32],
    metrics: &HeightMetrics,
) -> u32 {
    const FALLBACK_COL_WIDTH: u32 = 80;
    let mut max_height = metrics.default_height;
    for col in 0..model.column_count() {
        let text = model.get_cell(row, col);
        if text.is_empty() {
            continue;
        }
        let width = col_widths
            .get(col)
            .copied()
            .unwrap_or(FALLBACK_COL_WIDTH)
            .saturating_sub(metrics.padding * 2)
            .max(1);
        let lines = wrapped_lines(text, width, metrics);
        if lines <= 1 {
            continue;
        }
        let height = lines * metrics.line_height + metrics.padding * 2;
        if height > max_height {
            max_height = height;
        }
    }
    max_height
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Document, DocumentModel};

    fn model(cells: &[&str]) -> DocumentModel {
        DocumentModel::new(Document {
            header: (0..cells.len()).map(|c| format!("c{}", c)).collect(),
            rows: vec![cells.iter().map(|s| s.to_string()).collect()],
        })
    }

    #[test]
    fn test_short_text_gets_default_height() {
        let m = model(&["short", ""]);
        let metrics = HeightMetrics::default();
        // One line of text never pushes past the default, even though
        // line_height + 2*padding exceeds it
        assert!(metrics.line_height + 2 * metrics.padding > metrics.default_height);
        assert_eq!(auto_row_height(&m, 0, &[200, 200], &metrics), metrics.default_height);
    }

    #[test]
    fn test_height_grows_only_once_text_wraps() {
        let metrics = HeightMetrics::default();
        // 10 chars in a column fitting 11: one line, default height
        let m = model(&["abcdefghij"]);
        let width = 11 * metrics.char_width + 2 * metrics.padding;
        assert_eq!(auto_row_height(&m, 0, &[width], &metrics), metrics.default_height);

        // Same text in a column fitting 6: two lines, padded formula
        let narrow = 6 * metrics.char_width + 2 * metrics.padding;
        assert_eq!(
            auto_row_height(&m, 0, &[narrow], &metrics),
            2 * metrics.line_height + 2 * metrics.padding
        );
    }

    #[test]
    fn test_long_text_wraps_taller() {
        let m = model(&["x".repeat(100).as_str()]);
        let metrics = HeightMetrics::default();
        // 100 chars at 8px in (80 - 12)px of space: many lines
        let height = auto_row_height(&m, 0, &[80], &metrics);
        assert!(height > metrics.default_height);

        // Wider column, fewer lines
        let wide = auto_row_height(&m, 0, &[1000], &metrics);
        assert!(wide < height);
    }

    #[test]
    fn test_embedded_newlines_count_as_lines() {
        let m = model(&["a\nb\nc"]);
        let metrics = HeightMetrics::default();
        let height = auto_row_height(&m, 0, &[200], &metrics);
        assert_eq!(height, 3 * metrics.line_height + 2 * metrics.padding);
    }

    #[test]
    fn test_out_of_range_row_is_default() {
        let m = model(&["text"]);
        let metrics = HeightMetrics::default();
        assert_eq!(auto_row_height(&m, 9, &[100], &metrics), metrics.default_height);
    }
}
