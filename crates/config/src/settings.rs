// Application settings
// Loaded from ~/.config/gridpad/settings.json

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Grid appearance
    #[serde(rename = "grid.defaultColumnWidth")]
    pub default_column_width: u32,

    #[serde(rename = "grid.rowHeight")]
    pub row_height: u32,

    #[serde(rename = "grid.cellPadding")]
    pub cell_padding: u32,

    #[serde(rename = "grid.alternateRowColors")]
    pub alternate_row_colors: bool,

    // Editor
    #[serde(rename = "editor.fontSize")]
    pub font_size: u32,

    #[serde(rename = "editor.lineHeight")]
    pub line_height: u32,

    #[serde(rename = "editor.charWidth")]
    pub char_width: u32,

    // File
    #[serde(rename = "file.recentFilesLimit")]
    pub recent_files_limit: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            // Grid
            default_column_width: 80,
            row_height: 24,
            cell_padding: 6,
            alternate_row_colors: true,
            // Editor
            font_size: 13,
            line_height: 18,
            char_width: 8,
            // File
            recent_files_limit: 10,
        }
    }
}

impl Settings {
    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("gridpad")
            .join("settings.json")
    }

    /// Load settings from disk, falling back to defaults
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &PathBuf) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => {
                // Strip comments (lines starting with //)
                let cleaned: String = contents
                    .lines()
                    .filter(|line| !line.trim().starts_with("//"))
                    .collect::<Vec<_>>()
                    .join("\n");

                match serde_json::from_str(&cleaned) {
                    Ok(settings) => settings,
                    Err(e) => {
                        eprintln!("Error parsing settings.json: {}", e);
                        eprintln!("Using default settings");
                        Self::default()
                    }
                }
            }
            Err(_) => Self::default(),
        }
    }

    /// Save current settings to disk
    pub fn save(&self) -> Result<(), String> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|e| e.to_string())?;
        fs::write(&path, json).map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_when_file_missing() {
        let dir = tempdir().unwrap();
        let settings = Settings::load_from(&dir.path().join("nope.json"));
        assert_eq!(settings.row_height, 24);
        assert_eq!(settings.default_column_width, 80);
    }

    #[test]
    fn test_load_with_comments_and_partial_keys() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(
            &path,
            "{\n// taller rows\n\"grid.rowHeight\": 32\n}\n",
        )
        .unwrap();

        let settings = Settings::load_from(&path);
        assert_eq!(settings.row_height, 32);
        // Unspecified keys keep their defaults
        assert_eq!(settings.cell_padding, 6);
    }

    #[test]
    fn test_malformed_file_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "not json at all").unwrap();
        let settings = Settings::load_from(&path);
        assert_eq!(settings.row_height, 24);
    }
}
