//! Template favorites
//!
//! Users can star software templates to surface them first in the catalog.
//! Favorites are a small local file; a missing file simply means no
//! favorites yet.

use chrono::{DateTime, Utc};
use pickers_core::{Persistable, PickerError, PickerResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ============================================================================
// Constants
// ============================================================================

/// Current schema version of the favorites file
pub const FAVORITES_SCHEMA_VERSION: u32 = 1;

// ============================================================================
// Favorite
// ============================================================================

/// One starred template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Favorite {
    /// Template entity reference, e.g. `template:default/create-ee`
    pub template_ref: String,

    /// Display title captured when the template was starred
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    pub added_at: DateTime<Utc>,
}

// ============================================================================
// Favorites File Wrapper
// ============================================================================

/// On-disk layout with version information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoritesFile {
    pub schema_version: u32,
    pub favorites: Vec<Favorite>,
}

impl Persistable for FavoritesFile {
    fn current_version() -> u32 {
        FAVORITES_SCHEMA_VERSION
    }

    fn version(&self) -> u32 {
        self.schema_version
    }
}

// ============================================================================
// FavoritesStore
// ============================================================================

/// In-memory favorites with file persistence
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FavoritesStore {
    favorites: Vec<Favorite>,
}

impl FavoritesStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Load favorites from a file; a missing file yields an empty store
    pub fn load(path: impl AsRef<Path>) -> PickerResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No favorites file yet");
            return Ok(Self::new());
        }

        let file = FavoritesFile::load_from_file(path).map_err(|e| match e {
            PickerError::JsonSerialization(je) => {
                PickerError::InvalidDocument(format!("{}: {je}", path.display()))
            }
            other => other,
        })?;

        Ok(Self {
            favorites: file.favorites,
        })
    }

    /// Save favorites, creating the parent directory if needed
    pub fn save(&self, path: impl AsRef<Path>) -> PickerResult<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| PickerError::FileWrite {
                    path: parent.to_path_buf(),
                    message: e.to_string(),
                })?;
            }
        }

        let file = FavoritesFile {
            schema_version: FAVORITES_SCHEMA_VERSION,
            favorites: self.favorites.clone(),
        };
        file.save_to_file(path)?;
        tracing::info!(path = %path.display(), count = self.favorites.len(), "Saved favorites");
        Ok(())
    }

    /// Star or unstar a template; returns whether it is now a favorite
    pub fn toggle(&mut self, template_ref: &str, title: Option<&str>) -> bool {
        if let Some(pos) = self.position(template_ref) {
            self.favorites.remove(pos);
            false
        } else {
            self.favorites.push(Favorite {
                template_ref: template_ref.to_string(),
                title: title.map(str::to_string),
                added_at: Utc::now(),
            });
            true
        }
    }

    /// Remove a template from favorites; returns whether it was present
    pub fn remove(&mut self, template_ref: &str) -> bool {
        match self.position(template_ref) {
            Some(pos) => {
                self.favorites.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Check whether a template is starred
    pub fn is_favorite(&self, template_ref: &str) -> bool {
        self.position(template_ref).is_some()
    }

    /// Favorites, most recently added first
    pub fn list(&self) -> Vec<&Favorite> {
        let mut list: Vec<&Favorite> = self.favorites.iter().collect();
        list.sort_by(|a, b| b.added_at.cmp(&a.added_at));
        list
    }

    /// Number of favorites
    pub fn len(&self) -> usize {
        self.favorites.len()
    }

    /// Whether there are no favorites
    pub fn is_empty(&self) -> bool {
        self.favorites.is_empty()
    }

    fn position(&self, template_ref: &str) -> Option<usize> {
        self.favorites
            .iter()
            .position(|fav| fav.template_ref.eq_ignore_ascii_case(template_ref))
    }
}

// ============================================================================
// Tests
// ============================================================================
