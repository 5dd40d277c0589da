//! # Pickers CLI
//!
//! Command-line interface for Scaffold Pickers.
//!
//! The pickers are normally embedded in a form. The CLI exercises the same
//! engine without one: validating names, listing slot availability,
//! replaying scripted editing sessions, checking name availability against
//! a catalog fixture, and managing template favorites.
//!
//! ## Commands
//!
//! - `validate` - Check a name or tag against the naming rules
//! - `slots` - Show which build-step slots a step may use
//! - `replay` - Replay a JSON event script and print every pushed value
//! - `check-name` - Debounced "already exists" check against a catalog fixture
//! - `favorites` - List, toggle or remove template favorites
//! - `config` - Print the effective configuration
//!

pub mod commands;
pub mod replay;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use commands::run;
pub use replay::{ReplayReport, ReplayScript, replay};

/// CLI version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// CLI name
pub const NAME: &str = env!("CARGO_PKG_NAME");

// ============================================================================
// Arguments
// ============================================================================

/// Headless list editors and cascading selectors for software-template forms
#[derive(Debug, Parser)]
#[command(name = "scaffold-pickers", version, about)]
pub struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (.toml or .json)
    #[arg(short, long, global = true, env = "SCAFFOLD_PICKERS_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check a name or tag against the naming rules
    Validate {
        /// Value to check
        value: String,

        /// Apply the stricter tag rules
        #[arg(long)]
        tag: bool,

        /// Field label used in messages
        #[arg(long)]
        label: Option<String>,
    },

    /// Show which build-step slots a step may use
    Slots {
        /// Slot keys used by other steps
        #[arg(long = "used", value_name = "KEY")]
        used: Vec<String>,

        /// The step's own current key
        #[arg(long)]
        current: Option<String>,
    },

    /// Replay a JSON event script and print every pushed value
    Replay {
        /// Script file
        script: PathBuf,

        /// Option fixture backing the collections editor
        #[arg(long, value_name = "FILE")]
        options: Option<PathBuf>,

        /// Print one JSON report instead of one line per push
        #[arg(long)]
        json: bool,
    },

    /// Check whether a name is already registered in a catalog fixture
    CheckName {
        /// Name as typed
        name: String,

        /// JSON array of catalog entities
        #[arg(long, value_name = "FILE")]
        catalog: PathBuf,
    },

    /// Manage template favorites
    Favorites {
        /// Favorites file (defaults to the configured location)
        #[arg(long, value_name = "FILE")]
        file: Option<PathBuf>,

        #[command(subcommand)]
        action: FavoritesAction,
    },

    /// Print the effective configuration as TOML
    Config,
}

#[derive(Debug, Subcommand)]
pub enum FavoritesAction {
    /// List favorites, most recent first
    List,

    /// Add a template to favorites, or remove it if already present
    Toggle {
        /// Template reference, e.g. `template:default/ee-builder`
        template_ref: String,

        /// Display title
        #[arg(long)]
        title: Option<String>,
    },

    /// Remove a template from favorites
    Remove {
        /// Template reference
        template_ref: String,
    },
}
