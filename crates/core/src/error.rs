//! Error types for Scaffold Pickers
//!
//! This module provides unified error handling across the workspace,
//! including validation errors, configuration errors, IO errors,
//! serialization errors, and failures reported by remote collaborators.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for Scaffold Pickers
#[derive(Debug, Error)]
pub enum PickerError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    /// A single form field failed validation
    #[error("Field validation failed for '{field}': {message}")]
    FieldValidation { field: String, message: String },

    // ========================================================================
    // Not Found Errors
    // ========================================================================
    /// Slot key is not part of the configured domain
    #[error("Unknown slot key: '{0}'")]
    UnknownSlot(String),

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Unsupported configuration file format
    #[error("Unsupported configuration format for '{0}' (expected .toml or .json)")]
    UnsupportedFormat(PathBuf),

    // ========================================================================
    // IO Errors
    // ========================================================================
    /// File read error
    #[error("Failed to read file '{path}': {message}")]
    FileRead { path: PathBuf, message: String },

    /// File write error
    #[error("Failed to write file '{path}': {message}")]
    FileWrite { path: PathBuf, message: String },

    // ========================================================================
    // Serialization Errors
    // ========================================================================
    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    JsonSerialization(#[from] serde_json::Error),

    /// TOML parse error
    #[error("TOML parse error: {0}")]
    Toml(String),

    /// A persisted document is unreadable or too new
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    // ========================================================================
    // Remote Errors
    // ========================================================================
    /// A remote collaborator (autocomplete, catalog lookup) failed
    #[error("Remote call to '{resource}' failed: {message}")]
    Remote { resource: String, message: String },
}

impl PickerError {
    /// Create a field validation error
    pub fn field_validation(field: impl Into<String>, msg: impl Into<String>) -> Self {
        PickerError::FieldValidation {
            field: field.into(),
            message: msg.into(),
        }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        PickerError::InvalidConfig(msg.into())
    }

    /// Create a remote error
    pub fn remote(resource: impl Into<String>, msg: impl Into<String>) -> Self {
        PickerError::Remote {
            resource: resource.into(),
            message: msg.into(),
        }
    }

    /// Check if this error is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            PickerError::FieldValidation { .. } | PickerError::InvalidConfig(_)
        )
    }

    /// Check if this error is a not-found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, PickerError::UnknownSlot(_))
    }

    /// Check if this error is an IO error
    pub fn is_io(&self) -> bool {
        matches!(
            self,
            PickerError::FileRead { .. } | PickerError::FileWrite { .. }
        )
    }

    /// Check if this error came from a remote collaborator
    pub fn is_remote(&self) -> bool {
        matches!(self, PickerError::Remote { .. })
    }
}

/// Result type alias using PickerError
pub type PickerResult<T> = Result<T, PickerError>;

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error() {
        let err = PickerError::config("default_key 'x' is not a slot");
        assert!(err.is_validation());
        assert!(!err.is_not_found());
        assert_eq!(
            err.to_string(),
            "Invalid configuration: default_key 'x' is not a slot"
        );
    }

    #[test]
    fn test_field_validation_error() {
        let err = PickerError::field_validation("collection", "Collection name is required");
        assert!(err.is_validation());
        assert_eq!(
            err.to_string(),
            "Field validation failed for 'collection': Collection name is required"
        );
    }

    #[test]
    fn test_unknown_slot_is_not_found() {
        let err = PickerError::UnknownSlot("replace_base".to_string());
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Unknown slot key: 'replace_base'");
    }

    #[test]
    fn test_remote_error() {
        let err = PickerError::remote("collections", "connection refused");
        assert!(err.is_remote());
        assert!(!err.is_validation());
        assert_eq!(
            err.to_string(),
            "Remote call to 'collections' failed: connection refused"
        );
    }

    #[test]
    fn test_io_error_classification() {
        let err = PickerError::FileRead {
            path: PathBuf::from("pickers.toml"),
            message: "file not found".to_string(),
        };
        assert!(err.is_io());
        assert!(!err.is_remote());
        assert_eq!(
            err.to_string(),
            "Failed to read file 'pickers.toml': file not found"
        );
    }
}
