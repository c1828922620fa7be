//! Per-document layout state: column widths, custom row heights, row
//! highlight colors.
//!
//! Layout files are written by us but treated as untrusted on the way
//! back in: imports are best-effort, and malformed or out-of-range
//! entries are silently dropped rather than failing the load. A document
//! must stay usable with partial or no layout state.

use serde::Serialize;
use serde_json::Value;
use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeMap;
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

/// Column widths and custom row heights for one document.
///
/// `columns[i]` is the pixel width of column `i`; 0 means "no custom
/// width". `rows` holds `(row index, height)` pairs for rows resized
/// away from the default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TableState {
    pub columns: Vec<u32>,
    pub rows: Vec<(usize, u32)>,
}

impl TableState {
    /// Best-effort import. Malformed column entries become 0 (unset, so
    /// positions keep lining up); malformed row pairs are dropped.
    pub fn from_value(value: &Value) -> Self {
        let columns = value
            .get("columns")
            .and_then(Value::as_array)
            .map(|entries| {
                entries
                    .iter()
                    .map(|width| match width.as_u64() {
                        Some(w) if w > 0 && w <= u32::MAX as u64 => w as u32,
                        _ => 0,
                    })
                    .collect()
            })
            .unwrap_or_default();

        let rows = value
            .get("rows")
            .and_then(Value::as_array)
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|pair| {
                        let pair = pair.as_array()?;
                        if pair.len() != 2 {
                            return None;
                        }
                        let row = pair[0].as_u64()? as usize;
                        let height = pair[1].as_u64()?;
                        if height == 0 || height > u32::MAX as u64 {
                            return None;
                        }
                        Some((row, height as u32))
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self { columns, rows }
    }
}

/// Best-effort import of a `{row-index: color-token}` map. Keys must
/// parse as row indices and values must be strings; anything else is
/// dropped. Range checks against the actual row count happen where the
/// colors are applied.
pub fn row_colors_from_value(value: &Value) -> BTreeMap<usize, String> {
    value
        .as_object()
        .map(|entries| {
            entries
                .iter()
                .filter_map(|(key, color)| {
                    let row: usize = key.parse().ok()?;
                    let color = color.as_str()?;
                    Some((row, color.to_string()))
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Layout state persisted per document, keyed by a hash of its path.
///
/// `row_colors` is a map so it serializes to the string-keyed object
/// shape `{"row-index": "color-token"}` the loader reads back.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DocumentState {
    pub table: TableState,
    pub row_colors: BTreeMap<usize, String>,
}

impl DocumentState {
    /// Get the layouts directory
    fn layouts_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("gridpad")
            .join("layouts")
    }

    /// Hash a document path to create a unique filename
    fn hash_path(path: &Path) -> String {
        let mut hasher = DefaultHasher::new();
        path.hash(&mut hasher);
        format!("{:016x}", hasher.finish())
    }

    fn state_path(document: &Path) -> PathBuf {
        Self::layouts_dir().join(format!("{}.json", Self::hash_path(document)))
    }

    /// Load layout state for a document. Missing or unreadable files are
    /// simply no state; partial damage is filtered field by field.
    pub fn load(document: &Path) -> Self {
        let path = Self::state_path(document);
        let value: Value = match fs::read_to_string(&path)
            .ok()
            .and_then(|s| serde_json::from_str(&s).ok())
        {
            Some(value) => value,
            None => return Self::default(),
        };
        Self::from_value(&value)
    }

    pub fn from_value(value: &Value) -> Self {
        Self {
            table: TableState::from_value(value.get("table").unwrap_or(&Value::Null)),
            row_colors: row_colors_from_value(value.get("row_colors").unwrap_or(&Value::Null)),
        }
    }

    pub fn save(&self, document: &Path) -> Result<(), String> {
        let dir = Self::layouts_dir();
        fs::create_dir_all(&dir).map_err(|e| e.to_string())?;
        let path = Self::state_path(document);
        let json = serde_json::to_string_pretty(self).map_err(|e| e.to_string())?;
        fs::write(&path, json).map_err(|e| e.to_string())
    }
}
