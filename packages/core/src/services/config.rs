//! Editor configuration
//!
//! Which tools the editor offers, whether plain bulleted lists get structural
//! keys, and the limits of the leveled indent and the normalization loop.
//! Read from JSON; every field is optional.

use crate::models::ToolKind;
use crate::services::EditorError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default deepest indent of a leveled item
pub const DEFAULT_MAX_INDENT: u32 = 8;

/// Default number of normalization fixes before a cycle is declared divergent
pub const DEFAULT_MAX_NORMALIZATION_PASSES: usize = 10_000;

/// Configuration for an `Editor`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct EditorConfig {
    /// Tools offered by the editor, in handler priority order (default: all seven)
    pub enabled_tools: Vec<ToolKind>,
    /// Structural keys for plain bulleted lists (default: true)
    pub generic_lists: bool,
    /// Deepest indent level of a leveled item (default: 8)
    pub max_indent: u32,
    /// Normalization fixes allowed per cycle (default: 10000)
    pub max_normalization_passes: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            enabled_tools: ToolKind::ALL.to_vec(),
            generic_lists: true,
            max_indent: DEFAULT_MAX_INDENT,
            max_normalization_passes: DEFAULT_MAX_NORMALIZATION_PASSES,
        }
    }
}

impl EditorConfig {
    /// Parse a JSON configuration and validate it
    pub fn from_json_str(json: &str) -> Result<Self, EditorError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON configuration file and validate it
    pub fn load(path: impl AsRef<Path>) -> Result<Self, EditorError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        tracing::debug!(path = %path.display(), tools = config.enabled_tools.len(), "editor config loaded");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), EditorError> {
        if self.max_normalization_passes == 0 {
            return Err(EditorError::invalid_config(
                "maxNormalizationPasses must be at least 1",
            ));
        }
        for (index, tool) in self.enabled_tools.iter().enumerate() {
            if self.enabled_tools[..index].contains(tool) {
                return Err(EditorError::invalid_config(format!(
                    "tool {} is enabled twice",
                    tool
                )));
            }
        }
        Ok(())
    }

    pub fn is_enabled(&self, tool: ToolKind) -> bool {
        self.enabled_tools.contains(&tool)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = EditorConfig::default();
        assert_eq!(config.enabled_tools.len(), 7);
        assert!(config.generic_lists);
        assert_eq!(config.max_indent, 8);
        assert_eq!(config.max_normalization_passes, 10_000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config =
            EditorConfig::from_json_str(r#"{"enabledTools": ["ranking", "risks"], "maxIndent": 3}"#)
                .unwrap();
        assert_eq!(config.enabled_tools, vec![ToolKind::Ranking, ToolKind::Risks]);
        assert_eq!(config.max_indent, 3);
        assert!(config.generic_lists);
        assert!(!config.is_enabled(ToolKind::Agenda));
    }

    #[test]
    fn test_unknown_tool_is_parse_error() {
        let err = EditorConfig::from_json_str(r#"{"enabledTools": ["kanban"]}"#).unwrap_err();
        assert!(matches!(err, EditorError::ConfigParse(_)));
    }

    #[test]
    fn test_unknown_field_is_parse_error() {
        let err = EditorConfig::from_json_str(r#"{"maxDepth": 3}"#).unwrap_err();
        assert!(matches!(err, EditorError::ConfigParse(_)));
    }

    #[test]
    fn test_validation_failures() {
        let err = EditorConfig::from_json_str(r#"{"maxNormalizationPasses": 0}"#).unwrap_err();
        assert!(matches!(err, EditorError::InvalidConfig(_)));

        let err =
            EditorConfig::from_json_str(r#"{"enabledTools": ["agenda", "agenda"]}"#).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid configuration: tool agenda is enabled twice"
        );
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"genericLists": false}}"#).unwrap();

        let config = EditorConfig::load(file.path()).unwrap();
        assert!(!config.generic_lists);
        assert_eq!(config.enabled_tools, ToolKind::ALL.to_vec());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = EditorConfig::load(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, EditorError::ConfigIo(_)));
    }
}
