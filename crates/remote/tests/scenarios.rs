//! End-to-end behaviour of the async collaborators with simulated time

use pickers_core::{CatalogEntity, OptionObject, OptionTier, PickerOption};
use pickers_editors::CascadeEditor;
use pickers_model::{CascadeRecord, CollectionsSchema, ExistenceCheckSchema};
use pickers_remote::{
    CascadeSession, NameExistenceCheck, StaticEntityLookup, StaticOptionSource, StaticRoute,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;

#[tokio::test(start_paused = true)]
async fn existing_name_warns_and_clearing_needs_no_lookup() {
    let lookup = Arc::new(StaticEntityLookup::new(vec![CatalogEntity::named("test-ee")]));
    let mut check = NameExistenceCheck::new(Arc::clone(&lookup), ExistenceCheckSchema::default());

    check.input("test-ee");
    tokio::time::sleep(Duration::from_millis(499)).await;
    assert_eq!(lookup.calls(), 0);
    assert_eq!(check.warning(), None);

    check.settle().await;
    let warning = check.warning().unwrap();
    assert!(warning.to_string().contains("test-ee"));
    assert_eq!(lookup.calls(), 1);

    check.input("");
    assert_eq!(check.warning(), None);
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(lookup.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn subscribers_see_warning_changes() {
    let lookup = Arc::new(StaticEntityLookup::new(vec![CatalogEntity::named("test-ee")]));
    let mut check = NameExistenceCheck::new(lookup, ExistenceCheckSchema::default());
    let mut rx = check.subscribe();

    check.input("TEST-EE");
    check.settle().await;
    assert!(rx.has_changed().unwrap());
    assert!(rx.borrow_and_update().as_ref().is_some_and(|w| w.is_match()));
}

#[tokio::test(start_paused = true)]
async fn configured_debounce_is_honoured() {
    let lookup = Arc::new(StaticEntityLookup::new(Vec::new()));
    let schema = ExistenceCheckSchema {
        debounce_ms: 50,
        ..ExistenceCheckSchema::default()
    };
    let mut check = NameExistenceCheck::new(Arc::clone(&lookup), schema);

    check.input("fresh-ee");
    tokio::time::sleep(Duration::from_millis(60)).await;
    assert_eq!(lookup.calls(), 1);
    assert!(!check.is_pending());
}

#[tokio::test]
async fn collections_pick_from_remote_fixture_and_commit() {
    let source = StaticOptionSource::from_json_str(
        r#"{
            "routes": [
                {"resource": "collections", "options": [
                    {"name": "community.general", "sources": ["Galaxy"], "sourceVersions": {"Galaxy": ["9.0.0"]}},
                    "ansible.posix"
                ]},
                {"resource": "collection_sources", "context": {"collection": "ansible.posix"}, "options": [{"id": "hub"}]},
                {"resource": "collection_versions", "context": {"collection": "ansible.posix", "source": "hub"}, "options": [{"version": "1.5.4"}]}
            ]
        }"#,
    )
    .unwrap();
    let source = Arc::new(source);
    let mut session = CascadeSession::new(
        CascadeEditor::new(CollectionsSchema::default(), &[]),
        Arc::clone(&source),
    );

    session.mount();
    session.settle().await;

    // Embedded data: no further requests
    session.set_primary("community.general");
    session.set_secondary("Galaxy");
    assert_eq!(session.in_flight(), 0);
    assert_eq!(
        session.editor().options(OptionTier::Tertiary),
        &[PickerOption::text("9.0.0")]
    );
    session.set_tertiary("9.0.0");
    session.editor_mut().commit().unwrap();

    // Remote data with id / version normalization
    session.set_primary("ansible.posix");
    session.settle().await;
    let secondary = session.editor().options(OptionTier::Secondary)[0].clone();
    session.set_secondary(secondary);
    session.settle().await;
    let tertiary = session.editor().options(OptionTier::Tertiary)[0].clone();
    session.set_tertiary(tertiary);
    let pushed = session.editor_mut().commit().unwrap();

    assert_eq!(
        pushed,
        vec![
            CascadeRecord::new("community.general")
                .with_secondary("Galaxy")
                .with_tertiary("9.0.0"),
            CascadeRecord::new("ansible.posix")
                .with_secondary("hub")
                .with_tertiary("1.5.4"),
        ]
    );
    assert_eq!(source.calls(), 3);
}

#[tokio::test]
async fn editing_existing_record_refetches_without_clearing() {
    let source = StaticOptionSource::new()
        .with_route(StaticRoute::new("collection_sources", vec!["Galaxy".into(), "Hub".into()]))
        .with_route(StaticRoute::new("collection_versions", vec!["1.0.0".into(), "2.0.0".into()]));
    let records = vec![CascadeRecord::new("a.one").with_secondary("Hub").with_tertiary("2.0.0")];
    let mut session = CascadeSession::new(
        CascadeEditor::new(CollectionsSchema::default(), &records),
        Arc::new(source),
    );

    session.edit_existing(0);
    assert_eq!(session.settle().await, 2);
    assert_eq!(session.editor().draft().secondary, "Hub");
    assert_eq!(session.editor().draft().tertiary, "2.0.0");
    assert_eq!(session.editor().options(OptionTier::Secondary).len(), 2);
    assert_eq!(session.editor().options(OptionTier::Tertiary).len(), 2);
}

#[tokio::test]
async fn object_primary_with_embedded_sources_needs_no_fetch() {
    let mut session = CascadeSession::new(
        CascadeEditor::new(CollectionsSchema::default(), &[]),
        Arc::new(StaticOptionSource::new()),
    );
    session.set_primary(OptionObject::named("a.one").with_sources(["S1"]));
    assert_eq!(session.in_flight(), 0);
    assert_eq!(session.editor().options(OptionTier::Secondary).len(), 1);
}
