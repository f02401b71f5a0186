use crate::placement::{PickerMetrics, PickerMode};
use crate::EditorResult;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_NAME: &str = "pagecraft.config.json";

/// Editor configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorConfig {
    /// Section picker geometry
    #[serde(default)]
    pub picker: PickerMetrics,

    /// Scroll restoration after an edit panel closes
    #[serde(default)]
    pub scroll: ScrollConfig,

    /// Where the section picker opens when no mode is requested
    #[serde(default)]
    pub default_picker_mode: PickerMode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollConfig {
    /// Height of the fixed header; sections are scrolled to sit just below it
    #[serde(default = "default_header_offset")]
    pub header_offset: f64,
}

fn default_header_offset() -> f64 {
    80.0
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            header_offset: default_header_offset(),
        }
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            picker: PickerMetrics::default(),
            scroll: ScrollConfig::default(),
            default_picker_mode: PickerMode::default(),
        }
    }
}

impl EditorConfig {
    /// Load config from a directory, falling back to defaults when no file exists
    pub fn load(dir: &Path) -> EditorResult<Self> {
        let config_path = dir.join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: EditorConfig = serde_json::from_str(&content)?;
            tracing::debug!(path = %config_path.display(), "Loaded editor config");
            Ok(config)
        } else {
            Ok(EditorConfig::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "picker": { "width": 640, "height": 420, "viewportPadding": 24 },
            "scroll": { "headerOffset": 64 },
            "defaultPickerMode": "sidebar"
        }"#;

        let config: EditorConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.picker.width, 640.0);
        assert_eq!(config.picker.height, 420.0);
        assert_eq!(config.picker.viewport_padding, 24.0);
        // Unset fields keep their defaults
        assert_eq!(config.picker.trigger_offset, 8.0);
        assert_eq!(config.scroll.header_offset, 64.0);
        assert_eq!(config.default_picker_mode, PickerMode::Sidebar);
    }

    #[test]
    fn test_default_config() {
        let config = EditorConfig::default();
        assert_eq!(config.picker.width, 700.0);
        assert_eq!(config.picker.height, 500.0);
        assert_eq!(config.picker.viewport_padding, 16.0);
        assert_eq!(config.scroll.header_offset, 80.0);
        assert_eq!(config.default_picker_mode, PickerMode::Popover);
    }

    #[test]
    fn test_load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(EditorConfig::load(dir.path()).unwrap(), EditorConfig::default());

        std::fs::write(
            dir.path().join(DEFAULT_CONFIG_NAME),
            r#"{ "defaultPickerMode": "center" }"#,
        )
        .unwrap();
        let config = EditorConfig::load(dir.path()).unwrap();
        assert_eq!(config.default_picker_mode, PickerMode::Center);
    }

    #[test]
    fn test_load_rejects_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(DEFAULT_CONFIG_NAME), "{ not json").unwrap();
        assert!(EditorConfig::load(dir.path()).is_err());
    }
}
