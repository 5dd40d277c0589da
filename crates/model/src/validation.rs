//! Name and tag validation
//!
//! This module provides the validation predicate shared by every picker:
//! execution-environment names, collection names and tags all follow the
//! same DNS-label-like shape, with tags restricted to a lowercase alphabet.
//!
//! Rules are checked in a fixed order and the first failure wins:
//!
//! 1. required (empty or whitespace-only)
//! 2. at most 63 characters
//! 3. no leading separator (`-`, `_`, `.`)
//! 4. no trailing separator
//! 5. no consecutive separators
//! 6. character class
//! 7. names only: no `.yaml` / `.yml` suffix

use pickers_core::{PickerError, PickerResult};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

// ============================================================================
// Constants
// ============================================================================

/// Maximum accepted length of a name or tag
pub const MAX_NAME_LENGTH: usize = 63;

/// Characters that separate alphanumeric runs
pub const SEPARATORS: [char; 3] = ['-', '_', '.'];

static NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9]+(?:[-_.][A-Za-z0-9]+)*$").expect("name pattern is valid")
});

static TAG_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9+#]+(?:[-_.][a-z0-9+#]+)*$").expect("tag pattern is valid")
});

// ============================================================================
// NameKind
// ============================================================================

/// Which family of values is being validated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NameKind {
    /// Entity or file names (mixed case allowed, no YAML suffix)
    #[default]
    Name,
    /// Tags (lowercase, digits, `+` and `#`)
    Tag,
}

impl NameKind {
    /// Get the default field label for this kind
    pub fn default_label(&self) -> &'static str {
        match self {
            NameKind::Name => "Name",
            NameKind::Tag => "Tag",
        }
    }
}

// ============================================================================
// ValidationErrorCode
// ============================================================================

/// Error codes for name validation failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationErrorCode {
    Required,
    TooLong,
    LeadingSeparator,
    TrailingSeparator,
    ConsecutiveSeparators,
    InvalidCharacters,
    YamlExtension,
    Duplicate,
}

// ============================================================================
// ValidationOutcome
// ============================================================================

/// Result of validating a single value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    /// Whether the value passed every rule
    pub valid: bool,

    /// Code of the first failing rule
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<ValidationErrorCode>,

    /// Human-readable message of the first failing rule
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ValidationOutcome {
    /// A passing outcome
    pub fn ok() -> Self {
        Self {
            valid: true,
            code: None,
            error: None,
        }
    }

    /// A failing outcome
    pub fn failed(code: ValidationErrorCode, message: impl Into<String>) -> Self {
        Self {
            valid: false,
            code: Some(code),
            error: Some(message.into()),
        }
    }

    /// Convert to PickerResult (fails with a field validation error)
    pub fn to_result(self, field: &str) -> PickerResult<()> {
        match self.error {
            Some(message) if !self.valid => Err(PickerError::field_validation(field, message)),
            _ => Ok(()),
        }
    }
}

impl Default for ValidationOutcome {
    fn default() -> Self {
        Self::ok()
    }
}

// ============================================================================
// NameValidator
// ============================================================================

/// Validator for one labelled field
///
/// The label is interpolated into messages, so a collection picker reports
/// "Collection name is required" while the tags editor reports
/// "Tag is required".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameValidator {
    label: String,
    kind: NameKind,
}

impl NameValidator {
    /// Create a validator with an explicit label
    pub fn new(label: impl Into<String>, kind: NameKind) -> Self {
        Self {
            label: label.into(),
            kind,
        }
    }

    /// Create a validator using the kind's default label
    pub fn for_kind(kind: NameKind) -> Self {
        Self::new(kind.default_label(), kind)
    }

    /// Get the field label
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Get the validated kind
    pub fn kind(&self) -> NameKind {
        self.kind
    }

    /// Validate a value
    pub fn validate(&self, value: &str) -> ValidationOutcome {
        let label = &self.label;

        if value.trim().is_empty() {
            return ValidationOutcome::failed(
                ValidationErrorCode::Required,
                format!("{label} is required"),
            );
        }

        if value.chars().count() > MAX_NAME_LENGTH {
            return ValidationOutcome::failed(
                ValidationErrorCode::TooLong,
                format!("{label} must be {MAX_NAME_LENGTH} characters or less"),
            );
        }

        if value.starts_with(SEPARATORS) {
            return ValidationOutcome::failed(
                ValidationErrorCode::LeadingSeparator,
                format!("{label} must not start with '-', '_' or '.'"),
            );
        }

        if value.ends_with(SEPARATORS) {
            return ValidationOutcome::failed(
                ValidationErrorCode::TrailingSeparator,
                format!("{label} must not end with '-', '_' or '.'"),
            );
        }

        if has_consecutive_separators(value) {
            return ValidationOutcome::failed(
                ValidationErrorCode::ConsecutiveSeparators,
                format!("{label} must not contain consecutive '-', '_' or '.' characters"),
            );
        }

        match self.kind {
            NameKind::Name if !NAME_PATTERN.is_match(value) => {
                return ValidationOutcome::failed(
                    ValidationErrorCode::InvalidCharacters,
                    format!(
                        "{label} may only contain letters, numbers and single '-', '_' or '.' separators"
                    ),
                );
            }
            NameKind::Tag if !TAG_PATTERN.is_match(value) => {
                return ValidationOutcome::failed(
                    ValidationErrorCode::InvalidCharacters,
                    format!(
                        "{label} may only contain lowercase letters, numbers, '+', '#' and single '-', '_' or '.' separators"
                    ),
                );
            }
            _ => {}
        }

        if self.kind == NameKind::Name && has_yaml_suffix(value) {
            return ValidationOutcome::failed(
                ValidationErrorCode::YamlExtension,
                format!(
                    "{label} must not end with .yaml or .yml; the extension is added automatically"
                ),
            );
        }

        ValidationOutcome::ok()
    }

    /// Check a value without building a message
    pub fn is_valid(&self, value: &str) -> bool {
        self.validate(value).valid
    }
}

/// Validate a value with the kind's default label
///
/// `validate_name(value, NameKind::Tag)` is the tag ("secondary kind")
/// variant of the predicate.
pub fn validate_name(value: &str, kind: NameKind) -> ValidationOutcome {
    NameValidator::for_kind(kind).validate(value)
}

fn has_consecutive_separators(value: &str) -> bool {
    value
        .chars()
        .zip(value.chars().skip(1))
        .any(|(a, b)| SEPARATORS.contains(&a) && SEPARATORS.contains(&b))
}

fn has_yaml_suffix(value: &str) -> bool {
    let lower = value.to_ascii_lowercase();
    lower.ends_with(".yaml") || lower.ends_with(".yml")
}

// ============================================================================
// Tests
// ============================================================================
