//! Slotted build-steps editor
//!
//! Each build step carries a slot key drawn from a closed domain, and each
//! key may be used by at most one step. Command lines are edited through a
//! per-item text buffer that is parsed and pushed only on blur.

use crate::field::ListEditor;
use crate::keyed::{KeyedList, prune};
use crate::slots::{available_domain, next_free_key};
use pickers_core::{Identifiable, ItemId};
use pickers_model::{AddExpansion, BuildStep, BuildStepsSchema, SlotDef};
use std::collections::{BTreeSet, HashMap, HashSet};

/// Split raw text area content into command lines
///
/// Lines are trimmed and blank lines dropped.
pub fn parse_command_lines(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

// ============================================================================
// BuildStepsEditor
// ============================================================================

/// Editor state for a list of build steps
#[derive(Debug, Clone)]
pub struct BuildStepsEditor {
    schema: BuildStepsSchema,
    items: KeyedList<BuildStep>,
    expanded: HashSet<ItemId>,
    buffers: HashMap<ItemId, String>,
}

impl BuildStepsEditor {
    /// Create an editor mirroring the owner's current value
    pub fn new(schema: BuildStepsSchema, value: &[BuildStep]) -> Self {
        Self {
            schema,
            items: KeyedList::from_values(value),
            expanded: HashSet::new(),
            buffers: HashMap::new(),
        }
    }

    /// The field schema
    pub fn schema(&self) -> &BuildStepsSchema {
        &self.schema
    }

    /// Current steps
    pub fn steps(&self) -> Vec<BuildStep> {
        self.items.values()
    }

    /// Number of steps
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether there are no steps
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Slots the selector of step `index` may offer
    ///
    /// Empty for an index outside the list, otherwise never empty.
    pub fn available_slots(&self, index: usize) -> Vec<SlotDef> {
        let Some(current) = self.items.get(index) else {
            return Vec::new();
        };
        let used: HashSet<&str> = self
            .items
            .iter()
            .enumerate()
            .filter(|(pos, _)| *pos != index)
            .map(|(_, item)| item.value().step_type.as_str())
            .collect();
        let domain = &self.schema.domain;

        available_domain(
            &domain.keys(),
            &used,
            Some(current.step_type.as_str()),
            &domain.default_key,
        )
        .into_iter()
        .map(|key| {
            let display_name = domain.display_name(&key).to_string();
            SlotDef::new(key, display_name)
        })
        .collect()
    }

    /// Append a step on the first free slot
    pub fn add(&mut self) -> Option<Vec<BuildStep>> {
        let domain = &self.schema.domain;
        let used: HashSet<&str> = self
            .items
            .iter()
            .map(|item| item.value().step_type.as_str())
            .collect();
        let key = next_free_key(&domain.keys(), &used, &domain.default_key);

        tracing::debug!(step_type = %key, "Added build step");
        let id = self.items.push(BuildStep::new(key));
        if self.schema.add_expansion == AddExpansion::SingleOpen {
            self.expanded.clear();
        }
        self.expanded.insert(id);
        Some(self.items.values())
    }

    /// Delete a step
    pub fn remove(&mut self, index: usize) -> Option<Vec<BuildStep>> {
        let removed = self.items.remove(index)?;
        self.expanded.remove(&removed.id());
        prune(&mut self.buffers, &[removed.id()]);
        Some(self.items.values())
    }

    /// Move a step to another slot
    ///
    /// Keys outside `available_slots(index)` are rejected.
    pub fn change_slot_key(&mut self, index: usize, key: &str) -> Option<Vec<BuildStep>> {
        if !self.available_slots(index).iter().any(|slot| slot.key == key) {
            tracing::debug!(index, key, "Rejected unavailable slot key");
            return None;
        }
        self.items.get_mut(index)?.step_type = key.to_string();
        Some(self.items.values())
    }

    /// Record raw text area content without pushing
    ///
    /// Returns whether the index exists.
    pub fn commands_change(&mut self, index: usize, raw: &str) -> bool {
        match self.items.id_at(index) {
            Some(id) => {
                self.buffers.insert(id, raw.to_string());
                true
            }
            None => false,
        }
    }

    /// Parse the pending text of a step into its command lines and push
    pub fn commands_blur(&mut self, index: usize) -> Option<Vec<BuildStep>> {
        let id = self.items.id_at(index)?;
        let raw = match self.buffers.remove(&id) {
            Some(raw) => raw,
            None => self.items.get(index)?.command_text(),
        };
        self.items.get_mut(index)?.commands = parse_command_lines(&raw);
        Some(self.items.values())
    }

    /// Text shown in the text area of a step
    pub fn command_text(&self, index: usize) -> Option<String> {
        let id = self.items.id_at(index)?;
        match self.buffers.get(&id) {
            Some(raw) => Some(raw.clone()),
            None => self.items.get(index).map(BuildStep::command_text),
        }
    }

    /// Whether a step has an unparsed text buffer
    pub fn has_pending_text(&self, index: usize) -> bool {
        self.items
            .id_at(index)
            .is_some_and(|id| self.buffers.contains_key(&id))
    }

    /// Flip the expansion of one step
    ///
    /// Returns the new state, or `None` for an index outside the list.
    pub fn toggle_expand(&mut self, index: usize) -> Option<bool> {
        let id = self.items.id_at(index)?;
        if self.expanded.remove(&id) {
            Some(false)
        } else {
            self.expanded.insert(id);
            Some(true)
        }
    }

    /// Whether step `index` is expanded
    pub fn is_expanded(&self, index: usize) -> bool {
        self.items
            .id_at(index)
            .is_some_and(|id| self.expanded.contains(&id))
    }

    /// Positions of all expanded steps
    pub fn expanded_indices(&self) -> BTreeSet<usize> {
        self.items
            .iter()
            .enumerate()
            .filter(|(_, item)| self.expanded.contains(&item.id()))
            .map(|(pos, _)| pos)
            .collect()
    }
}

impl ListEditor for BuildStepsEditor {
    type Item = BuildStep;

    fn value(&self) -> Vec<BuildStep> {
        self.items.values()
    }

    fn sync(&mut self, value: &[BuildStep]) {
        let removed = self.items.resync(value);
        prune(&mut self.buffers, &removed);
        for id in &removed {
            self.expanded.remove(id);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
