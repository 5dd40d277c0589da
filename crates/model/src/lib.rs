//! # Pickers Model
//!
//! Data model for Scaffold Pickers: the record payloads stored in
//! list-valued form fields, the field schemas that configure each editor,
//! the name/tag validation predicate, configuration loading, and template
//! favorites.
//!
//! ## Core Concepts
//!
//! - **Record**: one entry of a list-valued field (tag, build step, cascade record)
//! - **Field schema**: labels, policies and domains supplied by the form schema
//! - **Validation**: the ordered name/tag rules shared by every picker
//! - **Config**: every field schema in one TOML or JSON document
//!

// Module declarations
pub mod config;
pub mod favorites;
pub mod records;
pub mod schema;
pub mod validation;

// Re-export commonly used types at crate root
pub use config::{ConfigFormat, PickerConfig, load_config};
pub use favorites::{Favorite, FavoritesStore};
pub use records::{BuildStep, CascadeRecord};
pub use schema::{
    AddExpansion, BuildStepsSchema, CollectionsSchema, ExistenceCheckSchema, SlotDef,
    SlotDomain, TagsSchema,
};
pub use validation::{
    NameKind, NameValidator, ValidationErrorCode, ValidationOutcome, validate_name,
};

// Re-export core types that are commonly used with the model
pub use pickers_core::{ItemId, PickerError, PickerOption, PickerResult};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
