//! Ordered tags editor
//!
//! An ordered list of tag strings with add, edit, remove, reorder and blur.
//! Three schema policies shape it:
//!
//! - `required`: the list may never become empty, so the remove control of
//!   a lone item is disabled
//! - `lock_first`: index 0 holds the anchor tag and ignores edits
//! - `default_value`: seeded into an empty list, and restored into index 0
//!   whenever a move leaves it blank
//!
//! Validation errors are per item and never block other edits.

use crate::field::ListEditor;
use crate::keyed::{KeyedList, prune};
use pickers_core::{Identifiable, ItemId};
use pickers_model::{NameKind, NameValidator, TagsSchema, ValidationErrorCode};
use std::collections::{BTreeMap, HashMap, HashSet};

// ============================================================================
// TagsEditor
// ============================================================================

/// Editor state for a list of tags
#[derive(Debug, Clone)]
pub struct TagsEditor {
    schema: TagsSchema,
    validator: NameValidator,
    items: KeyedList<String>,
    errors: HashMap<ItemId, String>,
    duplicates: HashMap<ItemId, String>,
}

impl TagsEditor {
    /// Create an editor mirroring the owner's current value
    pub fn new(schema: TagsSchema, value: &[String]) -> Self {
        let validator = NameValidator::new(schema.label.clone(), NameKind::Tag);
        Self {
            schema,
            validator,
            items: KeyedList::from_values(value),
            errors: HashMap::new(),
            duplicates: HashMap::new(),
        }
    }

    /// Seed the default tag into an empty list
    ///
    /// Returns the value to push when seeding happened.
    pub fn initial_commit(&mut self) -> Option<Vec<String>> {
        let default = self.schema.default_value.clone()?;
        if !self.items.is_empty() {
            return None;
        }
        self.items.push(default);
        self.refresh_duplicates();
        tracing::debug!("Seeded default tag into empty list");
        Some(self.items.values())
    }

    /// The field schema
    pub fn schema(&self) -> &TagsSchema {
        &self.schema
    }

    /// Current tags
    pub fn tags(&self) -> Vec<String> {
        self.items.values()
    }

    /// Number of tags
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the list is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether the item at `index` is the locked anchor
    pub fn is_locked(&self, index: usize) -> bool {
        self.schema.lock_first && index == 0
    }

    /// Whether the remove control of `index` is enabled
    pub fn can_remove(&self, index: usize) -> bool {
        index < self.items.len() && !(self.schema.required && self.items.len() == 1)
    }

    /// Whether the move-up control of `index` is enabled
    pub fn can_move_up(&self, index: usize) -> bool {
        index > 0 && index < self.items.len()
    }

    /// Whether the move-down control of `index` is enabled
    pub fn can_move_down(&self, index: usize) -> bool {
        index + 1 < self.items.len()
    }

    /// Validation error shown next to `index`
    ///
    /// Format errors take precedence over the duplicate error.
    pub fn error(&self, index: usize) -> Option<&str> {
        let id = self.items.id_at(index)?;
        self.errors
            .get(&id)
            .or_else(|| self.duplicates.get(&id))
            .map(String::as_str)
    }

    /// All per-item errors by current position
    pub fn errors_by_index(&self) -> BTreeMap<usize, String> {
        let mut errors = self.items.index_view(&self.duplicates);
        errors.extend(self.items.index_view(&self.errors));
        errors
    }

    /// Append an empty tag
    pub fn add(&mut self) -> Option<Vec<String>> {
        self.items.push(String::new());
        Some(self.items.values())
    }

    /// Replace the text of a tag, validating it if non-empty
    pub fn edit(&mut self, index: usize, value: &str) -> Option<Vec<String>> {
        if self.is_locked(index) {
            tracing::debug!(index, "Ignoring edit of locked tag");
            return None;
        }
        let id = self.items.id_at(index)?;
        self.items.replace(index, value.to_string());
        self.revalidate(id, value);
        self.refresh_duplicates();
        Some(self.items.values())
    }

    /// Delete a tag unless that would empty a required list
    pub fn remove(&mut self, index: usize) -> Option<Vec<String>> {
        if !self.can_remove(index) {
            return None;
        }
        let removed = self.items.remove(index)?;
        prune(&mut self.errors, &[removed.id()]);
        self.refresh_duplicates();
        Some(self.items.values())
    }

    /// Swap a tag with its upper neighbour
    pub fn move_up(&mut self, index: usize) -> Option<Vec<String>> {
        if !self.can_move_up(index) {
            return None;
        }
        self.items.swap(index, index - 1);
        self.fill_default_anchor();
        self.refresh_duplicates();
        Some(self.items.values())
    }

    /// Swap a tag with its lower neighbour
    pub fn move_down(&mut self, index: usize) -> Option<Vec<String>> {
        if !self.can_move_down(index) {
            return None;
        }
        self.items.swap(index, index + 1);
        self.fill_default_anchor();
        self.refresh_duplicates();
        Some(self.items.values())
    }

    /// Trim and re-validate a tag when it loses focus
    ///
    /// A tag that trims to empty is left untouched.
    pub fn blur(&mut self, index: usize) -> Option<Vec<String>> {
        let id = self.items.id_at(index)?;
        let trimmed = self.items.get(index)?.trim().to_string();
        if trimmed.is_empty() {
            return None;
        }
        if !self.is_locked(index) {
            self.items.replace(index, trimmed.clone());
        }
        self.revalidate(id, &trimmed);
        self.refresh_duplicates();
        Some(self.items.values())
    }

    fn revalidate(&mut self, id: ItemId, value: &str) {
        if value.is_empty() {
            self.errors.remove(&id);
            return;
        }

        match self.validator.validate(value).error {
            Some(message) => self.errors.insert(id, message),
            None => self.errors.remove(&id),
        };
    }

    /// Flag every occurrence of a tag after its first one
    fn refresh_duplicates(&mut self) {
        let mut seen = HashSet::new();
        let mut duplicates = HashMap::new();
        for item in self.items.iter() {
            let tag = item.value().trim();
            if tag.is_empty() || seen.insert(tag) {
                continue;
            }
            tracing::debug!(code = ?ValidationErrorCode::Duplicate, tag, "Duplicate tag");
            duplicates.insert(
                item.id(),
                format!("{} '{tag}' is already in the list", self.schema.label),
            );
        }
        self.duplicates = duplicates;
    }

    fn fill_default_anchor(&mut self) {
        let Some(default) = self.schema.default_value.clone() else {
            return;
        };
        if self.items.get(0).is_some_and(|first| first.is_empty()) {
            self.items.replace(0, default);
            if let Some(id) = self.items.id_at(0) {
                self.errors.remove(&id);
            }
        }
    }
}

impl ListEditor for TagsEditor {
    type Item = String;

    fn value(&self) -> Vec<String> {
        self.items.values()
    }

    fn sync(&mut self, value: &[String]) {
        let removed = self.items.resync(value);
        prune(&mut self.errors, &removed);
        self.refresh_duplicates();
    }
}

// ============================================================================
// Tests
// ============================================================================
