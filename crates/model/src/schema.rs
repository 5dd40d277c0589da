//! Field schemas for the list editors
//!
//! A field schema carries everything the form schema supplies to an editor:
//! labels, policies, the slot domain, default values and the remote
//! resource names used by the cascading selector.

use crate::validation::NameKind;
use pickers_core::{PickerError, PickerResult, Validatable};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// Slot Domain
// ============================================================================

/// One allowed slot key with its display name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotDef {
    pub key: String,

    #[serde(alias = "displayName")]
    pub display_name: String,
}

impl SlotDef {
    /// Create a slot definition
    pub fn new(key: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            display_name: display_name.into(),
        }
    }
}

/// Closed, ordered set of slot keys plus the fallback key used when every
/// slot is taken
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotDomain {
    pub slots: Vec<SlotDef>,

    #[serde(alias = "defaultKey")]
    pub default_key: String,
}

impl SlotDomain {
    /// Create a domain
    pub fn new(slots: Vec<SlotDef>, default_key: impl Into<String>) -> Self {
        Self {
            slots,
            default_key: default_key.into(),
        }
    }

    /// Create a domain whose display names equal the keys
    pub fn from_keys<I, S>(keys: I, default_key: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let slots = keys
            .into_iter()
            .map(|key| {
                let key = key.into();
                SlotDef::new(key.clone(), key)
            })
            .collect();
        Self::new(slots, default_key)
    }

    /// The execution-environment build-step slots
    pub fn build_steps() -> Self {
        Self::new(
            vec![
                SlotDef::new("prepend_base", "Prepend base"),
                SlotDef::new("append_base", "Append base"),
                SlotDef::new("prepend_galaxy", "Prepend galaxy"),
                SlotDef::new("append_galaxy", "Append galaxy"),
                SlotDef::new("prepend_builder", "Prepend builder"),
                SlotDef::new("append_builder", "Append builder"),
                SlotDef::new("prepend_final", "Prepend final"),
                SlotDef::new("append_final", "Append final"),
            ],
            "prepend_base",
        )
    }

    /// All keys in domain order
    pub fn keys(&self) -> Vec<&str> {
        self.slots.iter().map(|slot| slot.key.as_str()).collect()
    }

    /// Check whether a key is part of the domain
    pub fn contains(&self, key: &str) -> bool {
        self.slots.iter().any(|slot| slot.key == key)
    }

    /// Display name for a key, falling back to the key itself
    pub fn display_name<'a>(&'a self, key: &'a str) -> &'a str {
        self.slots
            .iter()
            .find(|slot| slot.key == key)
            .map(|slot| slot.display_name.as_str())
            .unwrap_or(key)
    }
}

impl Default for SlotDomain {
    fn default() -> Self {
        Self::build_steps()
    }
}

impl Validatable for SlotDomain {
    fn validate(&self) -> PickerResult<()> {
        if self.slots.is_empty() {
            return Err(PickerError::config("slot domain must not be empty"));
        }
        let mut seen = std::collections::HashSet::new();
        for slot in &self.slots {
            if slot.key.trim().is_empty() {
                return Err(PickerError::config("slot keys must not be empty"));
            }
            if !seen.insert(slot.key.as_str()) {
                return Err(PickerError::config(format!(
                    "duplicate slot key '{}'",
                    slot.key
                )));
            }
        }
        if !self.contains(&self.default_key) {
            return Err(PickerError::config(format!(
                "default slot key '{}' is not part of the domain",
                self.default_key
            )));
        }
        Ok(())
    }
}

// ============================================================================
// Tags Schema
// ============================================================================

/// Schema and policies for the ordered tags editor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TagsSchema {
    /// Label interpolated into validation messages
    pub label: String,

    /// The list may never become empty
    pub required: bool,

    /// Index 0 holds the default tag and cannot be edited
    pub lock_first: bool,

    /// Value seeded into an empty list and restored into a blank index 0
    pub default_value: Option<String>,
}

impl Default for TagsSchema {
    fn default() -> Self {
        Self {
            label: NameKind::Tag.default_label().to_string(),
            required: true,
            lock_first: true,
            default_value: Some("execution-environment".to_string()),
        }
    }
}

impl TagsSchema {
    /// A permissive schema: optional list, nothing locked, no default
    pub fn optional() -> Self {
        Self {
            required: false,
            lock_first: false,
            default_value: None,
            ..Default::default()
        }
    }
}

// ============================================================================
// Build Steps Schema
// ============================================================================

/// What happens to the other items' expansion when an item is added
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddExpansion {
    /// Collapse everything, expand only the new item
    #[default]
    SingleOpen,
    /// Expand the new item, leave the others as they are
    KeepOthers,
}

/// Schema for the slotted build-steps editor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct BuildStepsSchema {
    pub domain: SlotDomain,
    pub add_expansion: AddExpansion,
}

impl BuildStepsSchema {
    /// Create a schema over a domain with the default expansion policy
    pub fn new(domain: SlotDomain) -> Self {
        Self {
            domain,
            add_expansion: AddExpansion::default(),
        }
    }

    /// Set the expansion policy
    pub fn with_add_expansion(mut self, policy: AddExpansion) -> Self {
        self.add_expansion = policy;
        self
    }
}

impl Validatable for BuildStepsSchema {
    fn validate(&self) -> PickerResult<()> {
        self.domain.validate()
    }
}

// ============================================================================
// Collections Schema
// ============================================================================

/// Schema for the cascading collection / source / version selector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionsSchema {
    /// Label for the primary value in validation messages
    pub label: String,

    /// Autocomplete resource listing primary options
    pub primary_resource: String,

    /// Autocomplete resource listing secondary options for a primary value
    pub secondary_resource: String,

    /// Autocomplete resource listing tertiary options for a primary/secondary pair
    pub tertiary_resource: String,

    /// Context key carrying the primary value
    pub primary_context_key: String,

    /// Context key carrying the secondary value
    pub secondary_context_key: String,
}

impl Default for CollectionsSchema {
    fn default() -> Self {
        Self {
            label: "Collection name".to_string(),
            primary_resource: "collections".to_string(),
            secondary_resource: "collection_sources".to_string(),
            tertiary_resource: "collection_versions".to_string(),
            primary_context_key: "collection".to_string(),
            secondary_context_key: "source".to_string(),
        }
    }
}

impl Validatable for CollectionsSchema {
    fn validate(&self) -> PickerResult<()> {
        for (name, value) in [
            ("primary_resource", &self.primary_resource),
            ("secondary_resource", &self.secondary_resource),
            ("tertiary_resource", &self.tertiary_resource),
        ] {
            if value.trim().is_empty() {
                return Err(PickerError::config(format!("{name} must not be empty")));
            }
        }
        Ok(())
    }
}

// ============================================================================
// Existence Check Schema
// ============================================================================

/// Settings for the debounced "does this name already exist" lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExistenceCheckSchema {
    /// Quiet period after the last keystroke before the lookup fires
    pub debounce_ms: u64,

    /// Catalog kind to query
    pub kind: String,

    /// Additional catalog filter fields
    pub filter: BTreeMap<String, String>,

    /// Noun used in warnings ("An execution environment named ...")
    pub label: String,
}

impl Default for ExistenceCheckSchema {
    fn default() -> Self {
        let mut filter = BTreeMap::new();
        filter.insert("spec.type".to_string(), "execution-environment".to_string());
        Self {
            debounce_ms: 500,
            kind: "Component".to_string(),
            filter,
            label: "execution environment".to_string(),
        }
    }
}

impl ExistenceCheckSchema {
    /// Debounce delay as a Duration
    pub fn debounce(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.debounce_ms)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_steps_domain_is_valid() {
        let domain = SlotDomain::build_steps();
        assert!(domain.is_valid());
        assert_eq!(domain.keys().len(), 8);
        assert_eq!(domain.display_name("append_final"), "Append final");
        assert_eq!(domain.display_name("unknown"), "unknown");
    }

    #[test]
    fn test_domain_rejects_foreign_default() {
        let domain = SlotDomain::from_keys(["prepend_base", "append_base"], "append_final");
        let err = domain.validate().unwrap_err();
        assert!(err.to_string().contains("append_final"));
    }

    #[test]
    fn test_domain_rejects_duplicates_and_empty() {
        let dup = SlotDomain::from_keys(["a", "a"], "a");
        assert!(!dup.is_valid());

        let empty = SlotDomain::new(Vec::new(), "a");
        assert!(!empty.is_valid());
    }

    #[test]
    fn test_tags_schema_defaults() {
        let schema = TagsSchema::default();
        assert!(schema.required);
        assert!(schema.lock_first);
        assert_eq!(schema.default_value.as_deref(), Some("execution-environment"));

        let optional = TagsSchema::optional();
        assert!(!optional.required);
        assert_eq!(optional.label, "Tag");
    }

    #[test]
    fn test_existence_check_defaults() {
        let schema = ExistenceCheckSchema::default();
        assert_eq!(schema.debounce(), std::time::Duration::from_millis(500));
        assert_eq!(
            schema.filter.get("spec.type").map(String::as_str),
            Some("execution-environment")
        );
    }
}
