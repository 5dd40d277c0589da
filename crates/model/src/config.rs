//! Picker configuration
//!
//! `PickerConfig` gathers the field schemas of every editor plus the
//! favorites location. It is loaded from TOML or JSON, chosen by file
//! extension, and every section falls back to its defaults.

use crate::schema::{BuildStepsSchema, CollectionsSchema, ExistenceCheckSchema, TagsSchema};
use pickers_core::{PickerError, PickerResult, Validatable};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ============================================================================
// Constants
// ============================================================================

/// Default favorites file name, relative to the working directory
pub const DEFAULT_FAVORITES_FILE: &str = "favorites.json";

// ============================================================================
// Config Format
// ============================================================================

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
}

impl ConfigFormat {
    /// Detect the format from a path's extension
    pub fn from_path(path: &Path) -> PickerResult<Self> {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("toml") => Ok(ConfigFormat::Toml),
            Some("json") => Ok(ConfigFormat::Json),
            _ => Err(PickerError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

// ============================================================================
// PickerConfig
// ============================================================================

/// Configuration for every picker field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PickerConfig {
    pub tags: TagsSchema,
    pub build_steps: BuildStepsSchema,
    pub collections: CollectionsSchema,
    pub existence_check: ExistenceCheckSchema,

    /// Where template favorites are persisted
    pub favorites_path: Option<PathBuf>,
}

impl PickerConfig {
    /// Resolved favorites location
    pub fn favorites_path(&self) -> PathBuf {
        self.favorites_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_FAVORITES_FILE))
    }

    /// Parse configuration text in the given format
    pub fn from_str_with_format(text: &str, format: ConfigFormat) -> PickerResult<Self> {
        let config: PickerConfig = match format {
            ConfigFormat::Toml => {
                toml::from_str(text).map_err(|e| PickerError::Toml(e.to_string()))?
            }
            ConfigFormat::Json => serde_json::from_str(text)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Render as TOML
    pub fn to_toml(&self) -> PickerResult<String> {
        toml::to_string_pretty(self).map_err(|e| PickerError::Toml(e.to_string()))
    }
}

impl Validatable for PickerConfig {
    fn validate(&self) -> PickerResult<()> {
        self.build_steps.validate()?;
        self.collections.validate()?;
        if let Some(default) = &self.tags.default_value {
            crate::validation::NameValidator::new(
                self.tags.label.clone(),
                crate::validation::NameKind::Tag,
            )
            .validate(default)
            .to_result("tags.default_value")
            .map_err(|e| PickerError::config(e.to_string()))?;
        }
        if self.existence_check.kind.trim().is_empty() {
            return Err(PickerError::config("existence_check.kind must not be empty"));
        }
        Ok(())
    }
}

/// Load configuration from a `.toml` or `.json` file
///
/// # Example
///
/// ```rust,ignore
/// use pickers_model::load_config;
///
/// let config = load_config("pickers.toml")?;
/// println!("{} build-step slots", config.build_steps.domain.slots.len());
/// ```
pub fn load_config(path: impl AsRef<Path>) -> PickerResult<PickerConfig> {
    let path = path.as_ref();
    let format = ConfigFormat::from_path(path)?;

    let text = std::fs::read_to_string(path).map_err(|e| PickerError::FileRead {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let config = PickerConfig::from_str_with_format(&text, format)?;
    tracing::info!(path = %path.display(), "Loaded picker configuration");
    Ok(config)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::AddExpansion;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = PickerConfig::from_str_with_format("", ConfigFormat::Toml).unwrap();
        assert_eq!(config, PickerConfig::default());
        assert_eq!(config.favorites_path(), PathBuf::from(DEFAULT_FAVORITES_FILE));
    }

    #[test]
    fn test_toml_sections() {
        let text = r#"
favorites_path = "/tmp/favs.json"

[tags]
required = false
lock_first = false

[build_steps]
add_expansion = "keep_others"

[build_steps.domain]
default_key = "prepend_base"
slots = [
    { key = "prepend_base", display_name = "Prepend base" },
    { key = "append_base", display_name = "Append base" },
]

[existence_check]
debounce_ms = 250
kind = "Component"
"#;
        let config = PickerConfig::from_str_with_format(text, ConfigFormat::Toml).unwrap();
        assert!(!config.tags.required);
        assert_eq!(config.tags.default_value.as_deref(), Some("execution-environment"));
        assert_eq!(config.build_steps.add_expansion, AddExpansion::KeepOthers);
        assert_eq!(config.build_steps.domain.slots.len(), 2);
        assert_eq!(config.existence_check.debounce_ms, 250);
        assert_eq!(config.favorites_path(), PathBuf::from("/tmp/favs.json"));
    }

    #[test]
    fn test_json_camel_case_aliases() {
        let text = r#"{
            "build_steps": {
                "domain": {
                    "defaultKey": "a",
                    "slots": [{"key": "a", "displayName": "A"}]
                }
            }
        }"#;
        let config = PickerConfig::from_str_with_format(text, ConfigFormat::Json).unwrap();
        assert_eq!(config.build_steps.domain.display_name("a"), "A");
    }

    #[test]
    fn test_invalid_default_tag_is_rejected() {
        let text = "[tags]\ndefault_value = \"Not A Tag\"\n";
        let err = PickerConfig::from_str_with_format(text, ConfigFormat::Toml).unwrap_err();
        assert!(matches!(err, PickerError::InvalidConfig(_)));
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(
            ConfigFormat::from_path(Path::new("a/pickers.TOML")).unwrap(),
            ConfigFormat::Toml
        );
        assert!(ConfigFormat::from_path(Path::new("pickers.yaml")).is_err());
    }

    #[test]
    fn test_toml_round_trip_of_defaults() {
        let text = PickerConfig::default().to_toml().unwrap();
        let parsed = PickerConfig::from_str_with_format(&text, ConfigFormat::Toml).unwrap();
        assert_eq!(parsed, PickerConfig::default());
    }
}
