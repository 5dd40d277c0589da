//! Core types used throughout Scaffold Pickers
//!
//! This module contains the shared vocabulary of the workspace: item
//! identifiers, the option shapes returned by autocomplete collaborators,
//! and the catalog entity shape consumed by existence checks.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// Unique Identifiers
// ============================================================================

/// Type alias for the stable synthetic identifier of a list item
///
/// Assigned when an item enters an editor's mirror and never reused. All
/// auxiliary per-item state (errors, expansion, text buffers) is keyed by it.
pub type ItemId = uuid::Uuid;

/// Mint a fresh item identifier
pub fn new_item_id() -> ItemId {
    uuid::Uuid::new_v4()
}

// ============================================================================
// Picker Options
// ============================================================================

/// An option returned by an autocomplete collaborator
///
/// Remote services answer either with bare strings or with objects exposing
/// some of `name`, `label`, `id`, `version` and, for collections, embedded
/// `sources` / `versions` / `sourceVersions` so that dependent tiers can be
/// resolved without another round trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PickerOption {
    /// A bare string option
    Text(String),
    /// A structured option
    Object(OptionObject),
}

/// Structured autocomplete option
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionObject {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Embedded secondary options (collection sources)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<PickerOption>>,

    /// Embedded flat tertiary options (versions across all sources)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub versions: Option<Vec<PickerOption>>,

    /// Embedded tertiary options keyed by secondary value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_versions: Option<BTreeMap<String, Vec<PickerOption>>>,
}

impl OptionObject {
    /// Create an object option carrying only a name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    /// Attach embedded sources
    pub fn with_sources<I, S>(mut self, sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sources = Some(
            sources
                .into_iter()
                .map(|s| PickerOption::Text(s.into()))
                .collect(),
        );
        self
    }

    /// Attach embedded versions for one source
    pub fn with_source_versions<I, S>(mut self, source: impl Into<String>, versions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.source_versions.get_or_insert_with(BTreeMap::new).insert(
            source.into(),
            versions
                .into_iter()
                .map(|v| PickerOption::Text(v.into()))
                .collect(),
        );
        self
    }

    /// Attach a flat embedded version list
    pub fn with_versions<I, S>(mut self, versions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.versions = Some(
            versions
                .into_iter()
                .map(|v| PickerOption::Text(v.into()))
                .collect(),
        );
        self
    }
}

/// Which tier of a cascading selector an option belongs to
///
/// Each tier reads a different priority list of fields when an option
/// object is normalized to its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionTier {
    Primary,
    Secondary,
    Tertiary,
}

impl OptionTier {
    /// Get the display name for this tier
    pub fn display_name(&self) -> &'static str {
        match self {
            OptionTier::Primary => "primary",
            OptionTier::Secondary => "secondary",
            OptionTier::Tertiary => "tertiary",
        }
    }

    /// Normalize an option into the value stored for this tier
    ///
    /// Primary: `name`, `label`. Secondary: `name`, `label`, `id`.
    /// Tertiary: `name`, `label`, `version`. Bare strings are used as-is.
    pub fn value_of(&self, option: &PickerOption) -> String {
        let object = match option {
            PickerOption::Text(text) => return text.clone(),
            PickerOption::Object(object) => object,
        };
        let fallback = match self {
            OptionTier::Primary => None,
            OptionTier::Secondary => object.id.as_ref(),
            OptionTier::Tertiary => object.version.as_ref(),
        };
        [object.name.as_ref(), object.label.as_ref(), fallback]
            .into_iter()
            .flatten()
            .find(|value| !value.is_empty())
            .cloned()
            .unwrap_or_default()
    }
}

impl std::fmt::Display for OptionTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl PickerOption {
    /// Create a bare string option
    pub fn text(value: impl Into<String>) -> Self {
        PickerOption::Text(value.into())
    }

    /// Get the object form of this option, if any
    pub fn as_object(&self) -> Option<&OptionObject> {
        match self {
            PickerOption::Text(_) => None,
            PickerOption::Object(object) => Some(object),
        }
    }

    /// Human readable label (label, then name, then id, then version)
    pub fn display_label(&self) -> String {
        match self {
            PickerOption::Text(text) => text.clone(),
            PickerOption::Object(object) => [
                object.label.as_ref(),
                object.name.as_ref(),
                object.id.as_ref(),
                object.version.as_ref(),
            ]
            .into_iter()
            .flatten()
            .find(|value| !value.is_empty())
            .cloned()
            .unwrap_or_default(),
        }
    }
}

impl From<&str> for PickerOption {
    fn from(value: &str) -> Self {
        PickerOption::Text(value.to_string())
    }
}

impl From<String> for PickerOption {
    fn from(value: String) -> Self {
        PickerOption::Text(value)
    }
}

impl From<OptionObject> for PickerOption {
    fn from(value: OptionObject) -> Self {
        PickerOption::Object(value)
    }
}

// ============================================================================
// Collaborator Requests
// ============================================================================

/// A request to an autocomplete collaborator
///
/// `resource` names the option list (e.g. `collections`); `context` carries
/// the upstream selections the list is scoped to.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AutocompleteRequest {
    pub resource: String,

    #[serde(default)]
    pub context: BTreeMap<String, String>,
}

impl AutocompleteRequest {
    /// Create a request without context
    pub fn new(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            context: BTreeMap::new(),
        }
    }

    /// Add a context entry
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }
}

/// A catalog query used by existence checks
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EntityQuery {
    pub kind: String,

    #[serde(default)]
    pub filter: BTreeMap<String, String>,
}

impl EntityQuery {
    /// Create a query for one entity kind
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            filter: BTreeMap::new(),
        }
    }

    /// Add a filter field
    pub fn with_filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filter.insert(key.into(), value.into());
        self
    }

    /// Render as a catalog filter expression, e.g. `kind=Component,spec.type=execution-environment`
    pub fn filter_expression(&self) -> String {
        std::iter::once(format!("kind={}", self.kind))
            .chain(self.filter.iter().map(|(k, v)| format!("{k}={v}")))
            .collect::<Vec<_>>()
            .join(",")
    }
}

// ============================================================================
// Catalog Entities
// ============================================================================

/// The subset of a catalog entity consumed by existence checks
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntity {
    #[serde(default)]
    pub metadata: EntityMetadata,

    #[serde(default)]
    pub spec: EntitySpec,
}

/// Catalog entity metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityMetadata {
    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Catalog entity spec fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntitySpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl CatalogEntity {
    /// Create an entity with only a metadata name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            metadata: EntityMetadata {
                name: name.into(),
                title: None,
            },
            spec: EntitySpec::default(),
        }
    }

    /// Check whether this entity matches a candidate name
    ///
    /// Case-insensitive equality against `metadata.name`, `metadata.title`
    /// or `spec.name`.
    pub fn matches_name(&self, candidate: &str) -> bool {
        let candidate = candidate.trim().to_lowercase();
        if candidate.is_empty() {
            return false;
        }
        std::iter::once(Some(&self.metadata.name))
            .chain([self.metadata.title.as_ref(), self.spec.name.as_ref()])
            .flatten()
            .any(|value| value.to_lowercase() == candidate)
    }

    /// Name to show when this entity is reported as a match
    pub fn display_name(&self) -> &str {
        self.metadata
            .title
            .as_deref()
            .filter(|title| !title.is_empty())
            .unwrap_or(&self.metadata.name)
    }
}

// ============================================================================
// Tests
// ============================================================================
