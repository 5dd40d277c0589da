//! # Pickers Editors
//!
//! Headless state machines behind the list-valued form fields of a
//! software-template form. Each editor mirrors a list owned by the form
//! engine and answers every committed mutation with the complete new array.
//!
//! ## Editors
//!
//! - [`TagsEditor`]: ordered tags with a locked default anchor
//! - [`BuildStepsEditor`]: build steps on unique slots of a closed domain
//! - [`CascadeEditor`]: collection / source / version dependent selection
//!
//! [`FieldHost`] binds any of them to an owner's change sink.
//!

pub mod build_steps;
pub mod cascade;
pub mod field;
pub mod keyed;
pub mod slots;
pub mod tags;

pub use build_steps::{BuildStepsEditor, parse_command_lines};
pub use cascade::{CascadeDraft, CascadeEditor, CascadeStage, Chip, FetchRequest, FetchToken};
pub use field::{FieldHost, ListEditor};
pub use keyed::{
    Keyed, KeyedList, prune, reindex_after_insert, reindex_after_remove, reindex_after_swap,
};
pub use slots::{available_domain, next_free_key};
pub use tags::TagsEditor;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
