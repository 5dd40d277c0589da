//! Scripted editing sessions
//!
//! A replay script names an editor, the owner's initial value and a list of
//! UI events. Replaying it drives the editor exactly as a form would and
//! collects every array pushed to the owner. After each push the owner's
//! new value is echoed back into the editor, as a live form engine does.
//!
//! ```json
//! {
//!   "editor": "tags",
//!   "value": ["execution-environment"],
//!   "events": [{"op": "add"}, {"op": "edit", "index": 1, "value": "linux"}]
//! }
//! ```

use anyhow::{Context, Result};
use pickers_core::{ChangeSink, PickerOption, RecordingSink};
use pickers_editors::{BuildStepsEditor, CascadeEditor, FieldHost, ListEditor, TagsEditor};
use pickers_model::{BuildStep, CascadeRecord, PickerConfig};
use pickers_remote::{CascadeSession, StaticOptionSource};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

// ============================================================================
// Script Format
// ============================================================================

/// A replayable editing session
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "editor", rename_all = "snake_case")]
pub enum ReplayScript {
    Tags {
        #[serde(default)]
        value: Vec<String>,
        events: Vec<TagsEvent>,
    },
    BuildSteps {
        #[serde(default)]
        value: Vec<BuildStep>,
        events: Vec<BuildStepsEvent>,
    },
    Collections {
        #[serde(default)]
        value: Vec<CascadeRecord>,
        events: Vec<CascadeEvent>,
    },
}

/// Events understood by the tags editor
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum TagsEvent {
    InitialCommit,
    Add,
    Edit { index: usize, value: String },
    Remove { index: usize },
    MoveUp { index: usize },
    MoveDown { index: usize },
    Blur { index: usize },
    Disable,
    Enable,
}

/// Events understood by the build-steps editor
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum BuildStepsEvent {
    Add,
    Remove { index: usize },
    ChangeSlotKey { index: usize, key: String },
    CommandsChange { index: usize, text: String },
    CommandsBlur { index: usize },
    ToggleExpand { index: usize },
    Disable,
    Enable,
}

/// Events understood by the cascading collections editor
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum CascadeEvent {
    Mount,
    SetPrimary { value: PickerOption },
    SetSecondary { value: PickerOption },
    SetTertiary { value: PickerOption },
    /// Wait for every in-flight fetch
    Settle,
    Commit,
    EditExisting { index: usize },
    Remove { index: usize },
    Cancel,
    AddSignature,
    SetSignature { index: usize, value: String },
    RemoveSignature { index: usize },
}

impl ReplayScript {
    /// Parse a script document
    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("Invalid replay script")
    }

    /// Load a script from disk
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read replay script {}", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Editor kind, for log output
    pub fn editor_name(&self) -> &'static str {
        match self {
            ReplayScript::Tags { .. } => "tags",
            ReplayScript::BuildSteps { .. } => "build_steps",
            ReplayScript::Collections { .. } => "collections",
        }
    }
}

/// Everything the owner received during a replay
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReplayReport {
    /// Every pushed array, in order
    pub pushes: Vec<serde_json::Value>,
    /// The owner's value after the last event
    pub value: serde_json::Value,
}

// ============================================================================
// Replay
// ============================================================================

/// Replay a script against the editor it names
///
/// `options` backs the collections editor's fetches; without it every
/// fetch fails and the option tiers stay empty.
pub fn replay(
    script: ReplayScript,
    config: &PickerConfig,
    options: Option<StaticOptionSource>,
) -> Result<ReplayReport> {
    tracing::info!(editor = script.editor_name(), "Replaying script");
    match script {
        ReplayScript::Tags { value, events } => {
            let mut host = FieldHost::new(
                TagsEditor::new(config.tags.clone(), &value),
                RecordingSink::new(),
            );
            for event in events {
                let pushed = match event {
                    TagsEvent::InitialCommit => host.apply(|ed| ed.initial_commit()),
                    TagsEvent::Add => host.apply(|ed| ed.add()),
                    TagsEvent::Edit { index, value } => host.apply(|ed| ed.edit(index, &value)),
                    TagsEvent::Remove { index } => host.apply(|ed| ed.remove(index)),
                    TagsEvent::MoveUp { index } => host.apply(|ed| ed.move_up(index)),
                    TagsEvent::MoveDown { index } => host.apply(|ed| ed.move_down(index)),
                    TagsEvent::Blur { index } => host.apply(|ed| ed.blur(index)),
                    TagsEvent::Disable => toggle_disabled(&mut host, true),
                    TagsEvent::Enable => toggle_disabled(&mut host, false),
                };
                echo(&mut host, pushed);
            }
            report(host)
        }
        ReplayScript::BuildSteps { value, events } => {
            let mut host = FieldHost::new(
                BuildStepsEditor::new(config.build_steps.clone(), &value),
                RecordingSink::new(),
            );
            for event in events {
                let pushed = match event {
                    BuildStepsEvent::Add => host.apply(|ed| ed.add()),
                    BuildStepsEvent::Remove { index } => host.apply(|ed| ed.remove(index)),
                    BuildStepsEvent::ChangeSlotKey { index, key } => {
                        host.apply(|ed| ed.change_slot_key(index, &key))
                    }
                    BuildStepsEvent::CommandsChange { index, text } => {
                        host.update(|ed| ed.commands_change(index, &text));
                        false
                    }
                    BuildStepsEvent::CommandsBlur { index } => {
                        host.apply(|ed| ed.commands_blur(index))
                    }
                    BuildStepsEvent::ToggleExpand { index } => {
                        host.update(|ed| ed.toggle_expand(index));
                        false
                    }
                    BuildStepsEvent::Disable => toggle_disabled(&mut host, true),
                    BuildStepsEvent::Enable => toggle_disabled(&mut host, false),
                };
                echo(&mut host, pushed);
            }
            report(host)
        }
        ReplayScript::Collections { value, events } => {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .context("Failed to start async runtime")?;
            let source = Arc::new(options.unwrap_or_default());
            let editor = CascadeEditor::new(config.collections.clone(), &value);
            runtime.block_on(replay_collections(editor, source, events))
        }
    }
}

async fn replay_collections(
    editor: CascadeEditor,
    source: Arc<StaticOptionSource>,
    events: Vec<CascadeEvent>,
) -> Result<ReplayReport> {
    let mut session = CascadeSession::new(editor, source);
    let mut sink = RecordingSink::new();

    for event in events {
        let pushed = match event {
            CascadeEvent::Mount => {
                session.mount();
                None
            }
            CascadeEvent::SetPrimary { value } => {
                session.set_primary(value);
                None
            }
            CascadeEvent::SetSecondary { value } => {
                session.set_secondary(value);
                None
            }
            CascadeEvent::SetTertiary { value } => {
                session.set_tertiary(value);
                None
            }
            CascadeEvent::Settle => {
                session.settle().await;
                None
            }
            CascadeEvent::Commit => {
                let pushed = session.editor_mut().commit();
                if pushed.is_none() {
                    if let Some(error) = session.editor().primary_error() {
                        tracing::warn!(error, "Commit rejected");
                    }
                }
                pushed
            }
            CascadeEvent::EditExisting { index } => {
                session.edit_existing(index);
                None
            }
            CascadeEvent::Remove { index } => session.editor_mut().remove(index),
            CascadeEvent::Cancel => {
                session.editor_mut().cancel();
                None
            }
            CascadeEvent::AddSignature => {
                session.editor_mut().add_signature();
                None
            }
            CascadeEvent::SetSignature { index, value } => {
                session.editor_mut().set_signature(index, &value);
                None
            }
            CascadeEvent::RemoveSignature { index } => {
                session.editor_mut().remove_signature(index);
                None
            }
        };
        if let Some(value) = pushed {
            session.editor_mut().sync(&value);
            sink.on_change(value);
        }
    }
    session.settle().await;

    Ok(ReplayReport {
        pushes: to_values(sink.pushes())?,
        value: serde_json::to_value(session.editor().records())?,
    })
}

fn toggle_disabled<E, S>(host: &mut FieldHost<E, S>, disabled: bool) -> bool
where
    E: ListEditor,
    S: ChangeSink<E::Item>,
{
    host.set_disabled(disabled);
    false
}

/// Feed the latest push back into the editor
fn echo<E>(host: &mut FieldHost<E, RecordingSink<E::Item>>, pushed: bool)
where
    E: ListEditor,
{
    if !pushed {
        return;
    }
    if let Some(value) = host.sink().latest().cloned() {
        host.sync(&value);
    }
}

fn report<E>(host: FieldHost<E, RecordingSink<E::Item>>) -> Result<ReplayReport>
where
    E: ListEditor,
    E::Item: Serialize,
{
    let (editor, sink) = host.into_parts();
    Ok(ReplayReport {
        pushes: to_values(sink.pushes())?,
        value: serde_json::to_value(editor.value())?,
    })
}

fn to_values<T: Serialize>(pushes: &[Vec<T>]) -> Result<Vec<serde_json::Value>> {
    pushes
        .iter()
        .map(|push| serde_json::to_value(push).context("Failed to serialize push"))
        .collect()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn run(script: serde_json::Value) -> ReplayReport {
        let script: ReplayScript = serde_json::from_value(script).unwrap();
        replay(script, &PickerConfig::default(), None).unwrap()
    }

    #[test]
    fn test_tags_required_remove_is_not_pushed() {
        let report = run(json!({
            "editor": "tags",
            "value": ["execution-environment"],
            "events": [{"op": "remove", "index": 0}]
        }));
        assert!(report.pushes.is_empty());
        assert_eq!(report.value, json!(["execution-environment"]));
    }

    #[test]
    fn test_tags_disabled_events_are_ignored() {
        let report = run(json!({
            "editor": "tags",
            "events": [
                {"op": "initial_commit"},
                {"op": "disable"},
                {"op": "add"},
                {"op": "enable"},
                {"op": "add"},
                {"op": "edit", "index": 1, "value": " linux "},
                {"op": "blur", "index": 1}
            ]
        }));
        assert_eq!(report.pushes.len(), 4);
        assert_eq!(report.value, json!(["execution-environment", "linux"]));
    }

    #[test]
    fn test_build_steps_add_twice() {
        let mut config = PickerConfig::default();
        config.build_steps.domain =
            pickers_model::SlotDomain::from_keys(["prepend_base", "append_base"], "prepend_base");
        let script = ReplayScript::from_json_str(
            r#"{"editor": "build_steps", "events": [{"op": "add"}, {"op": "add"}]}"#,
        )
        .unwrap();

        let report = replay(script, &config, None).unwrap();
        assert_eq!(
            report.pushes,
            vec![
                json!([{"stepType": "prepend_base", "commands": []}]),
                json!([
                    {"stepType": "prepend_base", "commands": []},
                    {"stepType": "append_base", "commands": []}
                ]),
            ]
        );
    }

    #[test]
    fn test_build_steps_commands_pushed_on_blur_only() {
        let report = run(json!({
            "editor": "build_steps",
            "value": [{"stepType": "append_final", "commands": []}],
            "events": [
                {"op": "commands_change", "index": 0, "text": "RUN a\n\n RUN b"},
                {"op": "commands_blur", "index": 0}
            ]
        }));
        assert_eq!(report.pushes.len(), 1);
        assert_eq!(
            report.value,
            json!([{"stepType": "append_final", "commands": ["RUN a", "RUN b"]}])
        );
    }

    #[test]
    fn test_collections_with_embedded_sources() {
        let report = run(json!({
            "editor": "collections",
            "events": [
                {"op": "set_primary", "value": {
                    "name": "community.general",
                    "sources": ["S1"],
                    "sourceVersions": {"S1": ["1.0.0"]}
                }},
                {"op": "set_secondary", "value": "S1"},
                {"op": "set_tertiary", "value": "1.0.0"},
                {"op": "commit"}
            ]
        }));
        assert_eq!(
            report.value,
            json!([{"primaryKey": "community.general", "secondaryKey": "S1", "tertiaryKey": "1.0.0"}])
        );
    }

    #[test]
    fn test_collections_failed_fetches_still_allow_free_text() {
        let report = run(json!({
            "editor": "collections",
            "events": [
                {"op": "mount"},
                {"op": "set_primary", "value": "ansible.utils"},
                {"op": "settle"},
                {"op": "commit"}
            ]
        }));
        assert_eq!(report.value, json!([{"primaryKey": "ansible.utils"}]));
    }

    #[test]
    fn test_load_script_from_disk() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("tags.json");
        std::fs::write(&path, r#"{"editor": "tags", "events": [{"op": "initial_commit"}]}"#)
            .unwrap();

        let script = ReplayScript::load(&path).unwrap();
        assert_eq!(script.editor_name(), "tags");
        assert!(ReplayScript::load(&dir.path().join("absent.json")).is_err());
    }

    #[test]
    fn test_unknown_editor_is_rejected() {
        assert!(ReplayScript::from_json_str(r#"{"editor": "nope", "events": []}"#).is_err());
    }
}
