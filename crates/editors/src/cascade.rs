//! Cascading dependent-selector editor
//!
//! Composes one draft record from three dependent selections (collection,
//! source, version) and upserts it into the committed list. Each tier has
//! its own option set; changing an upstream selection synchronously clears
//! everything downstream and starts a fresh fetch for the next tier.
//!
//! The editor performs no I/O. Remote fetches are returned to the caller as
//! [`FetchRequest`]s and their results come back through
//! [`CascadeEditor::apply_fetch`]. Every request carries the generation of
//! its tier at dispatch time, and any result whose generation is no longer
//! current is discarded.

use crate::field::ListEditor;
use crate::keyed::KeyedList;
use pickers_core::{AutocompleteRequest, Identifiable, ItemId, OptionTier, PickerOption};
use pickers_model::{CascadeRecord, CollectionsSchema, NameKind, NameValidator};
use std::fmt;

// ============================================================================
// Stage and Fetch Tokens
// ============================================================================

/// Where the draft is in the selection chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CascadeStage {
    /// No primary value
    Idle,
    /// Primary chosen, no secondary (and no fetch in flight)
    PrimarySelected,
    /// Waiting for secondary options
    SecondaryFetching,
    /// Secondary chosen, no tertiary
    SecondarySelected,
    /// Waiting for tertiary options
    TertiaryFetching,
    /// All three tiers chosen
    Ready,
}

/// Identifies one dispatched fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FetchToken {
    pub tier: OptionTier,
    pub generation: u64,
}

/// A fetch the caller must perform and report back through `apply_fetch`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub token: FetchToken,
    pub request: AutocompleteRequest,
}

/// A committed record as rendered in the chip row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chip {
    pub index: usize,
    pub label: String,
}

// ============================================================================
// Draft
// ============================================================================

/// The uncommitted record being composed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CascadeDraft {
    pub primary: String,
    pub secondary: String,
    pub tertiary: String,
    /// Signature rows; always at least one
    pub signatures: Vec<String>,
    /// Committed item this draft will replace
    pub editing: Option<ItemId>,
}

impl Default for CascadeDraft {
    fn default() -> Self {
        Self {
            primary: String::new(),
            secondary: String::new(),
            tertiary: String::new(),
            signatures: vec![String::new()],
            editing: None,
        }
    }
}

impl CascadeDraft {
    /// Build the record this draft commits to
    fn to_record(&self) -> CascadeRecord {
        let non_empty = |value: &str| {
            let value = value.trim();
            (!value.is_empty()).then(|| value.to_string())
        };
        let signatures: Vec<String> = self
            .signatures
            .iter()
            .filter_map(|line| non_empty(line.as_str()))
            .collect();

        CascadeRecord {
            primary_key: self.primary.trim().to_string(),
            secondary_key: non_empty(self.secondary.as_str()),
            tertiary_key: non_empty(self.tertiary.as_str()),
            signatures: (!signatures.is_empty()).then_some(signatures),
        }
    }
}

#[derive(Debug, Clone, Default)]
struct TierState {
    options: Vec<PickerOption>,
    generation: u64,
    pending: bool,
}

// ============================================================================
// CascadeEditor
// ============================================================================

/// Editor state for the cascading collection selector
#[derive(Debug, Clone)]
pub struct CascadeEditor {
    schema: CollectionsSchema,
    validator: NameValidator,
    items: KeyedList<CascadeRecord>,
    draft: CascadeDraft,
    /// Option object the primary value was chosen from, if any
    selected_primary: Option<PickerOption>,
    primary_error: Option<String>,
    primary: TierState,
    secondary: TierState,
    tertiary: TierState,
}

impl CascadeEditor {
    /// Create an editor mirroring the owner's current value
    pub fn new(schema: CollectionsSchema, value: &[CascadeRecord]) -> Self {
        let validator = NameValidator::new(schema.label.clone(), NameKind::Name);
        Self {
            schema,
            validator,
            items: KeyedList::from_values(value),
            draft: CascadeDraft::default(),
            selected_primary: None,
            primary_error: None,
            primary: TierState::default(),
            secondary: TierState::default(),
            tertiary: TierState::default(),
        }
    }

    /// The field schema
    pub fn schema(&self) -> &CollectionsSchema {
        &self.schema
    }

    /// Committed records
    pub fn records(&self) -> Vec<CascadeRecord> {
        self.items.values()
    }

    /// The draft being composed
    pub fn draft(&self) -> &CascadeDraft {
        &self.draft
    }

    /// Position of the record the draft is editing
    pub fn editing_index(&self) -> Option<usize> {
        self.draft.editing.and_then(|id| self.items.position(id))
    }

    /// Error from the last rejected commit
    pub fn primary_error(&self) -> Option<&str> {
        self.primary_error.as_deref()
    }

    /// Current option set of a tier
    pub fn options(&self, tier: OptionTier) -> &[PickerOption] {
        &self.tier(tier).options
    }

    /// Whether a fetch for a tier is in flight
    pub fn is_pending(&self, tier: OptionTier) -> bool {
        self.tier(tier).pending
    }

    /// Current generation of a tier
    pub fn generation(&self, tier: OptionTier) -> u64 {
        self.tier(tier).generation
    }

    /// Where the draft is in the selection chain
    pub fn stage(&self) -> CascadeStage {
        if self.draft.primary.trim().is_empty() {
            CascadeStage::Idle
        } else if self.secondary.pending {
            CascadeStage::SecondaryFetching
        } else if self.draft.secondary.is_empty() {
            CascadeStage::PrimarySelected
        } else if self.tertiary.pending {
            CascadeStage::TertiaryFetching
        } else if self.draft.tertiary.is_empty() {
            CascadeStage::SecondarySelected
        } else {
            CascadeStage::Ready
        }
    }

    /// Request the primary option set
    pub fn mount(&mut self) -> FetchRequest {
        let request = AutocompleteRequest::new(self.schema.primary_resource.clone());
        self.dispatch(OptionTier::Primary, request)
    }

    /// Choose the primary value
    ///
    /// Clears both downstream tiers. Returns a secondary fetch unless the
    /// value is empty or the chosen option embeds its sources.
    pub fn set_primary(&mut self, value: impl Into<PickerOption>) -> Option<FetchRequest> {
        let option = value.into();
        let primary = OptionTier::Primary.value_of(&option);
        tracing::debug!(primary = %primary, "Primary selection changed");

        self.draft.primary = primary;
        self.draft.secondary.clear();
        self.draft.tertiary.clear();
        self.primary_error = None;
        self.reset_tier(OptionTier::Secondary);
        self.reset_tier(OptionTier::Tertiary);
        self.selected_primary = match option {
            PickerOption::Object(_) => Some(option),
            PickerOption::Text(_) => self.find_primary_option(),
        };

        self.resolve_secondary()
    }

    /// Choose the secondary value
    ///
    /// Clears the tertiary tier. Returns a tertiary fetch unless either
    /// upstream value is empty or the options are embedded.
    pub fn set_secondary(&mut self, value: impl Into<PickerOption>) -> Option<FetchRequest> {
        self.draft.secondary = OptionTier::Secondary.value_of(&value.into());
        self.draft.tertiary.clear();
        self.reset_tier(OptionTier::Tertiary);
        self.resolve_tertiary()
    }

    /// Choose the tertiary value
    pub fn set_tertiary(&mut self, value: impl Into<PickerOption>) {
        self.draft.tertiary = OptionTier::Tertiary.value_of(&value.into());
    }

    /// Apply the outcome of a fetch
    ///
    /// Results for an outdated generation are discarded and `false` is
    /// returned. Failures degrade to an empty option set.
    pub fn apply_fetch<E: fmt::Display>(
        &mut self,
        token: FetchToken,
        result: Result<Vec<PickerOption>, E>,
    ) -> bool {
        let state = self.tier_mut(token.tier);
        if token.generation != state.generation {
            tracing::debug!(
                tier = %token.tier,
                generation = token.generation,
                current = state.generation,
                "Discarding stale fetch result"
            );
            return false;
        }

        state.pending = false;
        state.options = match result {
            Ok(options) => options,
            Err(e) => {
                tracing::warn!(tier = %token.tier, error = %e, "Option fetch failed");
                Vec::new()
            }
        };

        if token.tier == OptionTier::Primary && self.selected_primary.is_none() {
            self.selected_primary = self.find_primary_option();
        }
        true
    }

    /// Whether the commit control is enabled
    pub fn can_commit(&self) -> bool {
        let primary = self.draft.primary.trim();
        !primary.is_empty() && self.validator.is_valid(primary)
    }

    /// Upsert the draft into the committed list
    ///
    /// The record replaces the item being edited, or else an item with the
    /// same primary key, or else is appended. Other items sharing the primary
    /// key are dropped. An invalid primary value records an error and
    /// nothing is pushed.
    pub fn commit(&mut self) -> Option<Vec<CascadeRecord>> {
        let outcome = self.validator.validate(self.draft.primary.trim());
        if let Some(error) = outcome.error {
            self.primary_error = Some(error);
            return None;
        }

        let record = self.draft.to_record();
        let target = self.editing_index().or_else(|| {
            self.items
                .iter()
                .position(|item| item.value().primary_key == record.primary_key)
        });

        let kept = match target {
            Some(index) => {
                self.items.replace(index, record.clone());
                self.items.id_at(index)
            }
            None => Some(self.items.push(record.clone())),
        };

        let duplicates: Vec<usize> = self
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| Some(item.id()) != kept && item.value().primary_key == record.primary_key)
            .map(|(index, _)| index)
            .collect();
        for index in duplicates.into_iter().rev() {
            self.items.remove(index);
        }

        tracing::debug!(primary = %record.primary_key, "Committed cascade record");
        self.reset_draft();
        Some(self.items.values())
    }

    /// Open a committed record in the draft
    ///
    /// The record stays in the list until the next commit. Returns the
    /// fetches needed to re-resolve the dependent option sets.
    pub fn edit_existing(&mut self, index: usize) -> Vec<FetchRequest> {
        let (Some(id), Some(record)) = (self.items.id_at(index), self.items.get(index).cloned())
        else {
            return Vec::new();
        };

        self.reset_tier(OptionTier::Secondary);
        self.reset_tier(OptionTier::Tertiary);
        self.primary_error = None;
        self.draft = CascadeDraft {
            primary: record.primary_key,
            secondary: record.secondary_key.unwrap_or_default(),
            tertiary: record.tertiary_key.unwrap_or_default(),
            signatures: match record.signatures {
                Some(lines) if !lines.is_empty() => lines,
                _ => vec![String::new()],
            },
            editing: Some(id),
        };
        self.selected_primary = self.find_primary_option();

        self.resolve_secondary()
            .into_iter()
            .chain(self.resolve_tertiary())
            .collect()
    }

    /// Delete a committed record
    pub fn remove(&mut self, index: usize) -> Option<Vec<CascadeRecord>> {
        let removed = self.items.remove(index)?;
        if self.draft.editing == Some(removed.id()) {
            self.draft.editing = None;
        }
        Some(self.items.values())
    }

    /// Discard the draft
    pub fn cancel(&mut self) {
        self.reset_draft();
    }

    /// Append an empty signature row
    pub fn add_signature(&mut self) {
        self.draft.signatures.push(String::new());
    }

    /// Replace the text of a signature row
    pub fn set_signature(&mut self, index: usize, value: &str) -> bool {
        match self.draft.signatures.get_mut(index) {
            Some(line) => {
                *line = value.to_string();
                true
            }
            None => false,
        }
    }

    /// Delete a signature row; the last row cannot be removed
    pub fn remove_signature(&mut self, index: usize) -> bool {
        if self.draft.signatures.len() <= 1 || index >= self.draft.signatures.len() {
            return false;
        }
        self.draft.signatures.remove(index);
        true
    }

    /// Committed records shown as chips, excluding the one being edited
    pub fn chips(&self) -> Vec<Chip> {
        self.items
            .iter()
            .enumerate()
            .filter(|(_, item)| Some(item.id()) != self.draft.editing)
            .map(|(index, item)| Chip {
                index,
                label: item.value().chip_label(),
            })
            .collect()
    }

    // ------------------------------------------------------------------------
    // Tier plumbing
    // ------------------------------------------------------------------------

    fn tier(&self, tier: OptionTier) -> &TierState {
        match tier {
            OptionTier::Primary => &self.primary,
            OptionTier::Secondary => &self.secondary,
            OptionTier::Tertiary => &self.tertiary,
        }
    }

    fn tier_mut(&mut self, tier: OptionTier) -> &mut TierState {
        match tier {
            OptionTier::Primary => &mut self.primary,
            OptionTier::Secondary => &mut self.secondary,
            OptionTier::Tertiary => &mut self.tertiary,
        }
    }

    /// Clear a tier and invalidate anything in flight for it
    fn reset_tier(&mut self, tier: OptionTier) {
        let state = self.tier_mut(tier);
        state.options.clear();
        state.pending = false;
        state.generation += 1;
    }

    fn dispatch(&mut self, tier: OptionTier, request: AutocompleteRequest) -> FetchRequest {
        let state = self.tier_mut(tier);
        state.generation += 1;
        state.pending = true;
        FetchRequest {
            token: FetchToken {
                tier,
                generation: state.generation,
            },
            request,
        }
    }

    fn find_primary_option(&self) -> Option<PickerOption> {
        let primary = self.draft.primary.as_str();
        if primary.is_empty() {
            return None;
        }
        self.primary
            .options
            .iter()
            .find(|option| OptionTier::Primary.value_of(option) == primary)
            .filter(|option| option.as_object().is_some())
            .cloned()
    }

    fn resolve_secondary(&mut self) -> Option<FetchRequest> {
        let primary = self.draft.primary.trim().to_string();
        if primary.is_empty() {
            return None;
        }

        let embedded = self
            .selected_primary
            .as_ref()
            .and_then(PickerOption::as_object)
            .and_then(|object| object.sources.clone());
        if let Some(sources) = embedded {
            self.secondary.options = sources;
            return None;
        }

        let request = AutocompleteRequest::new(self.schema.secondary_resource.clone())
            .with_context(self.schema.primary_context_key.clone(), primary);
        Some(self.dispatch(OptionTier::Secondary, request))
    }

    fn resolve_tertiary(&mut self) -> Option<FetchRequest> {
        let primary = self.draft.primary.trim().to_string();
        let secondary = self.draft.secondary.trim().to_string();
        if primary.is_empty() || secondary.is_empty() {
            return None;
        }

        let embedded = self
            .selected_primary
            .as_ref()
            .and_then(PickerOption::as_object)
            .and_then(|object| {
                object
                    .source_versions
                    .as_ref()
                    .and_then(|by_source| by_source.get(&secondary).cloned())
                    .or_else(|| object.versions.clone())
            });
        if let Some(versions) = embedded {
            self.tertiary.options = versions;
            return None;
        }

        let request = AutocompleteRequest::new(self.schema.tertiary_resource.clone())
            .with_context(self.schema.primary_context_key.clone(), primary)
            .with_context(self.schema.secondary_context_key.clone(), secondary);
        Some(self.dispatch(OptionTier::Tertiary, request))
    }

    fn reset_draft(&mut self) {
        self.draft = CascadeDraft::default();
        self.selected_primary = None;
        self.primary_error = None;
        self.reset_tier(OptionTier::Secondary);
        self.reset_tier(OptionTier::Tertiary);
    }
}

impl ListEditor for CascadeEditor {
    type Item = CascadeRecord;

    fn value(&self) -> Vec<CascadeRecord> {
        self.items.values()
    }

    fn sync(&mut self, value: &[CascadeRecord]) {
        let removed = self.items.resync(value);
        if self.draft.editing.is_some_and(|id| removed.contains(&id)) {
            self.draft.editing = None;
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
