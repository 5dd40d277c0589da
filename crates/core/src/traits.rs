//! Core traits for Scaffold Pickers
//!
//! This module defines the traits that types throughout the workspace
//! implement to provide consistent behavior for validation, identity,
//! persistence, and pushing list values back to their owner.

use crate::error::{PickerError, PickerResult};
use crate::types::ItemId;
use serde::{Serialize, de::DeserializeOwned};
use std::path::Path;

// ============================================================================
// Validatable Trait
// ============================================================================

/// Self-consistency check for configuration-like values
///
/// ```rust,ignore
/// use pickers_core::{PickerError, PickerResult, Validatable};
///
/// struct Domain {
///     keys: Vec<String>,
/// }
///
/// impl Validatable for Domain {
///     fn validate(&self) -> PickerResult<()> {
///         if self.keys.is_empty() {
///             return Err(PickerError::config("domain must not be empty"));
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Validatable {
    /// Return the first problem found, if any
    fn validate(&self) -> PickerResult<()>;

    /// Whether `validate` succeeds
    fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

// ============================================================================
// Identifiable Trait
// ============================================================================

/// Values carrying a stable item identifier
pub trait Identifiable {
    fn id(&self) -> ItemId;

    fn matches_id(&self, id: ItemId) -> bool {
        self.id() == id
    }
}

// ============================================================================
// Persistable Trait
// ============================================================================

/// Versioned documents stored as pretty-printed JSON
pub trait Persistable: Serialize + DeserializeOwned + Sized {
    /// Newest layout version this build can read
    fn current_version() -> u32;

    /// Layout version recorded in this document
    fn version(&self) -> u32;

    /// Write the document to `path`
    fn save_to_file(&self, path: &Path) -> PickerResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|e| PickerError::FileWrite {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Read a document from `path`, rejecting layouts newer than this build
    fn load_from_file(path: &Path) -> PickerResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| PickerError::FileRead {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let document: Self = serde_json::from_str(&json)?;
        if document.version() > Self::current_version() {
            return Err(PickerError::InvalidDocument(format!(
                "{}: version {} is newer than supported version {}",
                path.display(),
                document.version(),
                Self::current_version()
            )));
        }
        Ok(document)
    }
}

// ============================================================================
// ChangeSink Trait
// ============================================================================

/// Receiver of complete list values
///
/// The external form engine owns every list-valued field. Editors never
/// patch that value: each committed mutation hands the sink the complete
/// new array.
pub trait ChangeSink<T> {
    /// Replace the owned value
    fn on_change(&mut self, value: Vec<T>);
}

impl<T, F> ChangeSink<T> for F
where
    F: FnMut(Vec<T>),
{
    fn on_change(&mut self, value: Vec<T>) {
        self(value)
    }
}

/// A sink that records every pushed value
///
/// Useful when the owner is a plain value rather than a live form, for
/// example when replaying scripted edits.
#[derive(Debug, Clone)]
pub struct RecordingSink<T> {
    pushes: Vec<Vec<T>>,
}

impl<T> Default for RecordingSink<T> {
    fn default() -> Self {
        Self { pushes: Vec::new() }
    }
}

impl<T: Clone> RecordingSink<T> {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Every value pushed so far, oldest first
    pub fn pushes(&self) -> &[Vec<T>] {
        &self.pushes
    }

    /// The most recent value, if any push happened
    pub fn latest(&self) -> Option<&Vec<T>> {
        self.pushes.last()
    }

    /// Number of pushes received
    pub fn count(&self) -> usize {
        self.pushes.len()
    }
}

impl<T> ChangeSink<T> for RecordingSink<T> {
    fn on_change(&mut self, value: Vec<T>) {
        self.pushes.push(value);
    }
}

// ============================================================================
// Tests
// ============================================================================
