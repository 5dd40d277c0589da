//! Field host
//!
//! `FieldHost` binds an editor to the field-extension contract of the form
//! engine: the owner supplies `value`, `disabled` and form-level
//! `validation_errors`, and receives every committed mutation as a complete
//! new array through its `ChangeSink`.

use pickers_core::ChangeSink;

// ============================================================================
// ListEditor Trait
// ============================================================================

/// An editor mirroring a list-valued field
pub trait ListEditor {
    /// Record type of the list
    type Item: Clone + PartialEq;

    /// Snapshot of the mirrored list
    fn value(&self) -> Vec<Self::Item>;

    /// Rebuild the mirror from a value supplied by the owner
    fn sync(&mut self, value: &[Self::Item]);
}

// ============================================================================
// FieldHost
// ============================================================================

/// An editor plus the owner's change sink and field props
#[derive(Debug, Clone)]
pub struct FieldHost<E, S> {
    editor: E,
    sink: S,
    disabled: bool,
    validation_errors: Vec<String>,
}

impl<E, S> FieldHost<E, S>
where
    E: ListEditor,
    S: ChangeSink<E::Item>,
{
    /// Create an enabled host with no form-level errors
    pub fn new(editor: E, sink: S) -> Self {
        Self {
            editor,
            sink,
            disabled: false,
            validation_errors: Vec::new(),
        }
    }

    /// Read access to the editor (for rendering and control state)
    pub fn editor(&self) -> &E {
        &self.editor
    }

    /// Read access to the sink
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Split into editor and sink
    pub fn into_parts(self) -> (E, S) {
        (self.editor, self.sink)
    }

    /// Whether the field is disabled
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Enable or disable the field
    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    /// Errors reported by the owning form's schema validation
    ///
    /// Rendered once below the whole list, independent of per-item errors.
    pub fn validation_errors(&self) -> &[String] {
        &self.validation_errors
    }

    /// Replace the form-level errors
    pub fn set_validation_errors(&mut self, errors: Vec<String>) {
        self.validation_errors = errors;
    }

    /// Run a mutation and push its result to the owner
    ///
    /// Returns whether a push happened. Disabled fields reject every
    /// mutation.
    pub fn apply<F>(&mut self, op: F) -> bool
    where
        F: FnOnce(&mut E) -> Option<Vec<E::Item>>,
    {
        if self.disabled {
            tracing::debug!("Ignoring mutation on disabled field");
            return false;
        }
        match op(&mut self.editor) {
            Some(value) => {
                self.sink.on_change(value);
                true
            }
            None => false,
        }
    }

    /// Run an operation that only touches local UI state
    ///
    /// Returns `None` when the field is disabled.
    pub fn update<F, R>(&mut self, op: F) -> Option<R>
    where
        F: FnOnce(&mut E) -> R,
    {
        if self.disabled {
            return None;
        }
        Some(op(&mut self.editor))
    }

    /// Accept a new value from the owner
    pub fn sync(&mut self, value: &[E::Item]) {
        self.editor.sync(value);
    }
}
