//! Editors driven through a field host, observed only through the pushes
//! the owner receives

use pickers_core::{OptionObject, OptionTier, PickerOption, RecordingSink};
use pickers_editors::{
    BuildStepsEditor, CascadeEditor, FieldHost, ListEditor, TagsEditor, reindex_after_remove,
};
use pickers_model::{
    BuildStep, BuildStepsSchema, CascadeRecord, CollectionsSchema, SlotDomain, TagsSchema,
};
use pretty_assertions::assert_eq;
use std::collections::{BTreeMap, HashSet};

fn tags(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[test]
fn required_single_tag_remove_never_pushes() {
    let editor = TagsEditor::new(TagsSchema::default(), &tags(&["execution-environment"]));
    let mut host = FieldHost::new(editor, RecordingSink::new());

    assert!(!host.editor().can_remove(0));
    assert!(!host.apply(|ed| ed.remove(0)));
    assert_eq!(host.sink().count(), 0);
    assert_eq!(host.editor().tags(), tags(&["execution-environment"]));
}

#[test]
fn build_steps_add_twice_pushes_first_free_slots() {
    let schema = BuildStepsSchema::new(SlotDomain::from_keys(
        ["prepend_base", "append_base"],
        "prepend_base",
    ));
    let mut host = FieldHost::new(BuildStepsEditor::new(schema, &[]), RecordingSink::new());

    host.apply(|ed| ed.add());
    host.apply(|ed| ed.add());

    assert_eq!(
        host.sink().pushes(),
        &[
            vec![BuildStep::new("prepend_base")],
            vec![BuildStep::new("prepend_base"), BuildStep::new("append_base")],
        ]
    );
}

#[test]
fn collections_embedded_sources_commit() {
    let mut host = FieldHost::new(
        CascadeEditor::new(CollectionsSchema::default(), &[]),
        RecordingSink::new(),
    );
    let primary = OptionObject::named("community.general")
        .with_sources(["S1"])
        .with_source_versions("S1", ["1.0.0"]);

    let fetches = host
        .update(|ed| {
            let mut fetches = Vec::new();
            fetches.extend(ed.set_primary(primary));
            fetches.extend(ed.set_secondary("S1"));
            ed.set_tertiary("1.0.0");
            fetches
        })
        .unwrap();
    assert!(fetches.is_empty());

    assert!(host.apply(|ed| ed.commit()));
    assert_eq!(
        host.sink().latest(),
        Some(&vec![
            CascadeRecord::new("community.general")
                .with_secondary("S1")
                .with_tertiary("1.0.0")
        ])
    );
    let draft = host.editor().draft();
    assert!(draft.primary.is_empty() && draft.secondary.is_empty() && draft.tertiary.is_empty());
    assert_eq!(draft.editing, None);
}

#[test]
fn cascading_reset_ignores_late_responses() {
    let mut editor = CascadeEditor::new(CollectionsSchema::default(), &[]);

    let late_results: [Result<Vec<PickerOption>, String>; 2] =
        [Ok(vec![PickerOption::text("late")]), Err("timeout".to_string())];

    for late_result in late_results {
        let first = editor.set_primary("a.one").unwrap();
        editor.set_secondary("S-a");
        editor.set_primary("b.two");

        assert!(editor.draft().secondary.is_empty());
        assert!(editor.draft().tertiary.is_empty());
        assert!(editor.options(OptionTier::Secondary).is_empty());
        assert!(editor.options(OptionTier::Tertiary).is_empty());

        assert!(!editor.apply_fetch(first.token, late_result));
        assert!(editor.options(OptionTier::Secondary).is_empty());
        assert!(editor.draft().secondary.is_empty());
    }
}

#[test]
fn available_slots_are_disjoint_from_other_records() {
    let domain = SlotDomain::build_steps();
    let keys = domain.keys();
    let layouts: Vec<Vec<&str>> = vec![
        vec![],
        vec![keys[0]],
        vec![keys[0], keys[3], keys[7]],
        keys.clone(),
        vec![keys[1], keys[1], "legacy_step"],
    ];

    for layout in layouts {
        let steps: Vec<BuildStep> = layout.iter().map(|k| BuildStep::new(*k)).collect();
        let editor = BuildStepsEditor::new(BuildStepsSchema::new(domain.clone()), &steps);

        for (i, step) in steps.iter().enumerate() {
            let offered: HashSet<String> =
                editor.available_slots(i).into_iter().map(|s| s.key).collect();
            assert!(offered.contains(&step.step_type));
            for (j, other) in steps.iter().enumerate() {
                if j != i && other.step_type != step.step_type {
                    assert!(!offered.contains(&other.step_type));
                }
            }
        }
    }
}

#[test]
fn moves_restore_default_anchor_in_same_push() {
    let schema = TagsSchema {
        lock_first: false,
        ..TagsSchema::default()
    };
    let editor = TagsEditor::new(schema, &tags(&["linux", "", "arm64"]));
    let mut host = FieldHost::new(editor, RecordingSink::new());

    host.apply(|ed| ed.move_down(0));
    assert_eq!(
        host.sink().latest(),
        Some(&tags(&["execution-environment", "linux", "arm64"]))
    );
    assert_eq!(host.sink().count(), 1);
}

#[test]
fn blur_without_pending_edits_is_identity() {
    let value = tags(&["execution-environment", "linux"]);
    let editor = TagsEditor::new(TagsSchema::default(), &value);
    let mut host = FieldHost::new(editor, RecordingSink::new());

    host.apply(|ed| ed.blur(1));
    assert_eq!(host.sink().latest(), Some(&value));

    let steps = vec![BuildStep::new("append_base").with_commands(["RUN x"])];
    let mut host = FieldHost::new(
        BuildStepsEditor::new(BuildStepsSchema::default(), &steps),
        RecordingSink::new(),
    );
    host.apply(|ed| ed.commands_blur(0));
    host.apply(|ed| ed.commands_blur(0));
    assert_eq!(host.sink().pushes(), &[steps.clone(), steps]);
}

#[test]
fn disabled_host_rejects_every_mutation() {
    let editor = TagsEditor::new(TagsSchema::default(), &tags(&["execution-environment"]));
    let mut host = FieldHost::new(editor, RecordingSink::new());
    host.set_disabled(true);

    assert!(!host.apply(|ed| ed.add()));
    assert_eq!(host.update(|ed| ed.len()), None);
    assert_eq!(host.sink().count(), 0);

    host.set_disabled(false);
    assert!(host.apply(|ed| ed.add()));
}

#[test]
fn form_errors_are_separate_from_item_errors() {
    let editor = TagsEditor::new(TagsSchema::default(), &tags(&["execution-environment", ""]));
    let mut host = FieldHost::new(editor, RecordingSink::new());
    host.set_validation_errors(vec!["must have at least 2 tags".to_string()]);
    host.apply(|ed| ed.edit(1, "Bad"));

    assert_eq!(host.validation_errors(), ["must have at least 2 tags"]);
    assert_eq!(host.editor().errors_by_index().len(), 1);
}

#[test]
fn closure_sink_receives_full_arrays() {
    let mut received: Vec<Vec<String>> = Vec::new();
    {
        let editor = TagsEditor::new(TagsSchema::optional(), &[]);
        let mut host = FieldHost::new(editor, |value: Vec<String>| received.push(value));
        host.apply(|ed| ed.add());
        host.apply(|ed| ed.edit(0, "linux"));
    }
    assert_eq!(received, vec![tags(&[""]), tags(&["linux"])]);
}

#[test]
fn owner_echo_keeps_item_errors() {
    let editor = TagsEditor::new(TagsSchema::default(), &tags(&["execution-environment", ""]));
    let mut host = FieldHost::new(editor, RecordingSink::new());
    host.apply(|ed| ed.edit(1, "-bad"));

    let echoed = host.sink().latest().cloned().unwrap();
    host.sync(&echoed);
    assert!(host.editor().error(1).is_some());
    assert_eq!(host.editor().value(), echoed);
}

#[test]
fn reindex_after_remove_matches_id_keyed_view() {
    let value = tags(&["execution-environment", "a", "b", "c", "d"]);
    for removed in 1..value.len() {
        let mut editor = TagsEditor::new(TagsSchema::default(), &value);
        for i in 1..value.len() {
            editor.edit(i, &format!("-{}", value[i]));
        }
        let before: BTreeMap<usize, String> = editor.errors_by_index();
        editor.remove(removed);
        assert_eq!(editor.errors_by_index(), reindex_after_remove(&before, removed));
    }
}
