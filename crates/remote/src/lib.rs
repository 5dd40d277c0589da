//! # Pickers Remote
//!
//! The asynchronous edge of Scaffold Pickers: collaborator contracts for
//! autocomplete and catalog lookups, a driver that runs a cascade editor's
//! fetches on tokio tasks, and the debounced "name already exists" check.
//!
//! Static in-memory collaborators answer from JSON fixtures for the command
//! line and for tests.
//!

pub mod error;
pub mod existence;
pub mod session;
pub mod source;

pub use error::{RemoteError, RemoteResult};
pub use existence::{ExistenceWarning, NameExistenceCheck};
pub use session::CascadeSession;
pub use source::{
    AutocompleteSource, EntityLookup, StaticEntityLookup, StaticOptionSource, StaticRoute,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
