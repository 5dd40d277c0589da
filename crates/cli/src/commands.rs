//! Command implementations

use crate::replay::{ReplayScript, replay};
use crate::{Cli, Command, FavoritesAction};
use anyhow::{Context, Result};
use colored::Colorize;
use pickers_editors::available_domain;
use pickers_model::{
    FavoritesStore, NameKind, NameValidator, PickerConfig, PickerError, load_config,
};
use pickers_remote::{ExistenceWarning, NameExistenceCheck, StaticEntityLookup, StaticOptionSource};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

/// Execute a parsed command line
pub fn run(cli: Cli) -> Result<ExitCode> {
    let config = match &cli.config {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load configuration {}", path.display()))?,
        None => PickerConfig::default(),
    };

    match cli.command {
        Command::Validate { value, tag, label } => validate(&value, tag, label),
        Command::Slots { used, current } => slots(&config, &used, current.as_deref()),
        Command::Replay {
            script,
            options,
            json,
        } => replay_script(&config, &script, options.as_deref(), json),
        Command::CheckName { name, catalog } => check_name(&config, &name, &catalog),
        Command::Favorites { file, action } => favorites(&config, file, action),
        Command::Config => {
            print!("{}", config.to_toml()?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn validate(value: &str, tag: bool, label: Option<String>) -> Result<ExitCode> {
    let kind = if tag { NameKind::Tag } else { NameKind::Name };
    let validator = match label {
        Some(label) => NameValidator::new(label, kind),
        None => NameValidator::for_kind(kind),
    };

    let outcome = validator.validate(value);
    match outcome.error {
        None => {
            println!("{} '{}' is a valid {}", "✓".green(), value, validator.label().to_lowercase());
            Ok(ExitCode::SUCCESS)
        }
        Some(error) => {
            println!("{} {}", "✗".red(), error);
            Ok(ExitCode::FAILURE)
        }
    }
}

fn slots(config: &PickerConfig, used: &[String], current: Option<&str>) -> Result<ExitCode> {
    let domain = &config.build_steps.domain;
    if let Some(key) = current.filter(|key| !domain.contains(key)) {
        return Err(PickerError::UnknownSlot(key.to_string()).into());
    }
    let used: HashSet<&str> = used.iter().map(String::as_str).collect();
    let offered = available_domain(&domain.keys(), &used, current, &domain.default_key);

    for key in &offered {
        let marker = if Some(key.as_str()) == current { "*" } else { " " };
        println!("{} {:<20} {}", marker, key.bold(), domain.display_name(key).dimmed());
    }
    Ok(ExitCode::SUCCESS)
}

fn replay_script(
    config: &PickerConfig,
    script: &Path,
    options: Option<&Path>,
    json: bool,
) -> Result<ExitCode> {
    let script = ReplayScript::load(script)?;
    let options = options
        .map(StaticOptionSource::load)
        .transpose()
        .context("Failed to load option fixture")?;

    let report = replay(script, config, options)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for push in &report.pushes {
            println!("{}", serde_json::to_string(push)?);
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn check_name(config: &PickerConfig, name: &str, catalog: &Path) -> Result<ExitCode> {
    let lookup = Arc::new(StaticEntityLookup::load(catalog).context("Failed to load catalog")?);
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    let warning = runtime.block_on(async {
        let mut check = NameExistenceCheck::new(lookup, config.existence_check.clone());
        check.input(name);
        check.settle().await;
        check.warning()
    });

    match warning {
        None => {
            println!("{} '{}' is available", "✓".green(), name.trim());
            Ok(ExitCode::SUCCESS)
        }
        Some(warning @ ExistenceWarning::AlreadyExists { .. }) => {
            println!("{} {}", "!".yellow().bold(), warning);
            Ok(ExitCode::FAILURE)
        }
        Some(warning) => {
            println!("{} {}", "!".yellow(), warning);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn favorites(config: &PickerConfig, file: Option<PathBuf>, action: FavoritesAction) -> Result<ExitCode> {
    let path = file.unwrap_or_else(|| config.favorites_path());
    let mut store = FavoritesStore::load(&path)
        .with_context(|| format!("Failed to load favorites {}", path.display()))?;

    match action {
        FavoritesAction::List => {
            if store.is_empty() {
                println!("{}", "No favorites yet".dimmed());
            }
            for favorite in store.list() {
                let title = favorite.title.as_deref().unwrap_or("");
                println!(
                    "{} {} {}",
                    "★".yellow(),
                    favorite.template_ref.bold(),
                    title.dimmed()
                );
            }
            return Ok(ExitCode::SUCCESS);
        }
        FavoritesAction::Toggle {
            template_ref,
            title,
        } => {
            if store.toggle(&template_ref, title.as_deref()) {
                println!("{} Added {}", "★".yellow(), template_ref);
            } else {
                println!("{} Removed {}", "☆".dimmed(), template_ref);
            }
        }
        FavoritesAction::Remove { template_ref } => {
            if !store.remove(&template_ref) {
                println!("{} {} is not a favorite", "!".yellow(), template_ref);
                return Ok(ExitCode::FAILURE);
            }
            println!("{} Removed {}", "☆".dimmed(), template_ref);
        }
    }

    store.save(&path)?;
    Ok(ExitCode::SUCCESS)
}
