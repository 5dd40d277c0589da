//! # Pickers Core
//!
//! Core types, traits, and error handling for Scaffold Pickers.
//!
//! This crate provides the foundational building blocks used throughout
//! the workspace, including:
//!
//! - **Types**: item identifiers, autocomplete options, catalog entities
//! - **Traits**: common behaviors like `Validatable`, `Persistable` and `ChangeSink`
//! - **Errors**: unified error handling with `PickerError` and `PickerResult`
//!

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items at crate root
pub use error::{PickerError, PickerResult};
pub use traits::{ChangeSink, Identifiable, Persistable, RecordingSink, Validatable};
pub use types::{
    AutocompleteRequest, CatalogEntity, EntityMetadata, EntityQuery, EntitySpec, ItemId,
    OptionObject, OptionTier, PickerOption, new_item_id,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
