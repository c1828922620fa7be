//! Serial fill: extend a numbered cell down a column.
//!
//! The anchor cell's text is decomposed as `prefix<number>suffix` (the
//! last run of digits, with an optional leading minus); each target row
//! gets the number offset by its distance from the anchor.

use crate::session::EditorSession;

/// Decompose `value` around its trailing number. Returns
/// `(prefix, number, suffix)` where `suffix` contains no digits.
fn split_serial(value: &str) -> Option<(&str, i64, &str)> {
    let bytes = value.as_bytes();
    let mut end = bytes.len();
    while end > 0 && !bytes[end - 1].is_ascii_digit() {
        end -= 1;
    }
    if end == 0 {
        return None;
    }
    let mut start = end;
    while start > 0 && bytes[start - 1].is_ascii_digit() {
        start -= 1;
    }
    if start > 0 && bytes[start - 1] == b'-' {
        start -= 1;
    }
    let number: i64 = value[start..end].parse().ok()?;
    Some((&value[..start], number, &value[end..]))
}

impl EditorSession {
    /// Fill `target_rows` in `col` with the anchor cell's value, its
    /// number offset by each row's distance from `anchor_row`. Fails when
    /// the anchor cell does not end in a number. Each written cell is an
    /// individual edit (one history entry per cell).
    pub fn fill_serial(&mut self, col: usize, anchor_row: usize, target_rows: &[usize]) -> bool {
        if self.ensure_structured().is_err() {
            return false;
        }
        let anchor = self.model.get_cell(anchor_row, col).to_string();
        let (prefix, base, suffix) = match split_serial(&anchor) {
            Some(parts) => parts,
            None => return false,
        };
        let (prefix, suffix) = (prefix.to_string(), suffix.to_string());
        for &row in target_rows {
            if row == anchor_row {
                continue;
            }
            let offset = row as i64 - anchor_row as i64;
            let value = format!("{}{}{}", prefix, base + offset, suffix);
            self.set_cell(row, col, &value);
        }
        true
    }
}
