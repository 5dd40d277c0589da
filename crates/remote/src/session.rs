//! Cascade driver
//!
//! `CascadeSession` owns a [`CascadeEditor`] and an autocomplete source. It
//! runs every fetch the editor asks for on its own tokio task and feeds the
//! completions back through `apply_fetch`, which drops results made stale
//! by a newer upstream selection. Completions are applied one at a time on
//! the caller's task, so the editor itself is never shared.

use crate::error::RemoteResult;
use crate::source::AutocompleteSource;
use pickers_core::PickerOption;
use pickers_editors::{CascadeEditor, FetchRequest, FetchToken};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Result of one spawned fetch
#[derive(Debug)]
struct Completion {
    token: FetchToken,
    result: RemoteResult<Vec<PickerOption>>,
}

/// Drives a cascade editor against an async option source
pub struct CascadeSession<S> {
    editor: CascadeEditor,
    source: Arc<S>,
    tx: mpsc::UnboundedSender<Completion>,
    rx: mpsc::UnboundedReceiver<Completion>,
    in_flight: usize,
    tasks: Vec<JoinHandle<()>>,
}

impl<S> CascadeSession<S>
where
    S: AutocompleteSource + 'static,
{
    /// Wrap an editor
    pub fn new(editor: CascadeEditor, source: Arc<S>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            editor,
            source,
            tx,
            rx,
            in_flight: 0,
            tasks: Vec::new(),
        }
    }

    /// Read access to the editor
    pub fn editor(&self) -> &CascadeEditor {
        &self.editor
    }

    /// Mutable access for operations that never fetch (commit, remove,
    /// cancel, signatures)
    pub fn editor_mut(&mut self) -> &mut CascadeEditor {
        &mut self.editor
    }

    /// Number of fetches whose completion has not been applied yet
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Load the primary option set
    pub fn mount(&mut self) {
        let request = self.editor.mount();
        self.spawn(request);
    }

    /// Choose the primary value, fetching secondary options if needed
    pub fn set_primary(&mut self, value: impl Into<PickerOption>) {
        if let Some(request) = self.editor.set_primary(value) {
            self.spawn(request);
        }
    }

    /// Choose the secondary value, fetching tertiary options if needed
    pub fn set_secondary(&mut self, value: impl Into<PickerOption>) {
        if let Some(request) = self.editor.set_secondary(value) {
            self.spawn(request);
        }
    }

    /// Choose the tertiary value
    pub fn set_tertiary(&mut self, value: impl Into<PickerOption>) {
        self.editor.set_tertiary(value);
    }

    /// Open a committed record, re-resolving its option sets
    pub fn edit_existing(&mut self, index: usize) {
        for request in self.editor.edit_existing(index) {
            self.spawn(request);
        }
    }

    /// Wait for the next completion and apply it
    ///
    /// Returns `None` when nothing is in flight, otherwise whether the
    /// result was current.
    pub async fn next_completion(&mut self) -> Option<bool> {
        if self.in_flight == 0 {
            return None;
        }
        let completion = self.rx.recv().await?;
        self.in_flight -= 1;
        Some(self.editor.apply_fetch(completion.token, completion.result))
    }

    /// Apply every outstanding completion
    ///
    /// Returns how many results were current.
    pub async fn settle(&mut self) -> usize {
        let mut applied = 0;
        while let Some(current) = self.next_completion().await {
            if current {
                applied += 1;
            }
        }
        self.tasks.retain(|task| !task.is_finished());
        applied
    }

    fn spawn(&mut self, fetch: FetchRequest) {
        let FetchRequest { token, request } = fetch;
        tracing::debug!(
            tier = %token.tier,
            generation = token.generation,
            resource = %request.resource,
            "Dispatching option fetch"
        );

        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        self.tasks.retain(|task| !task.is_finished());
        self.tasks.push(tokio::spawn(async move {
            let result = source.autocomplete(request).await;
            let _ = tx.send(Completion { token, result });
        }));
        self.in_flight += 1;
    }
}

impl<S> Drop for CascadeSession<S> {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{StaticOptionSource, StaticRoute};
    use pickers_core::OptionTier;
    use pickers_model::CollectionsSchema;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn session(source: StaticOptionSource) -> CascadeSession<StaticOptionSource> {
        CascadeSession::new(
            CascadeEditor::new(CollectionsSchema::default(), &[]),
            Arc::new(source),
        )
    }

    #[tokio::test]
    async fn test_mount_and_cascade() {
        let source = StaticOptionSource::new()
            .with_route(StaticRoute::new("collections", vec!["a.one".into()]))
            .with_route(StaticRoute::new("collection_sources", vec!["Galaxy".into()]))
            .with_route(StaticRoute::new("collection_versions", vec!["1.0.0".into()]));
        let mut session = session(source);

        session.mount();
        assert_eq!(session.settle().await, 1);
        assert_eq!(session.editor().options(OptionTier::Primary).len(), 1);

        session.set_primary("a.one");
        session.settle().await;
        session.set_secondary("Galaxy");
        session.settle().await;
        assert_eq!(
            session.editor().options(OptionTier::Tertiary),
            &[PickerOption::text("1.0.0")]
        );
        assert_eq!(session.in_flight(), 0);
        assert_eq!(session.next_completion().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_stale_response_loses_to_newer_selection() {
        let source = StaticOptionSource::new()
            .with_route(
                StaticRoute::new("collection_sources", vec!["Slow".into()])
                    .with_context("collection", "a.one")
                    .with_delay(Duration::from_millis(300)),
            )
            .with_route(
                StaticRoute::new("collection_sources", vec!["Fast".into()])
                    .with_context("collection", "b.two")
                    .with_delay(Duration::from_millis(10)),
            );
        let mut session = session(source);

        session.set_primary("a.one");
        session.set_primary("b.two");

        assert_eq!(session.next_completion().await, Some(true));
        assert_eq!(session.next_completion().await, Some(false));
        assert_eq!(
            session.editor().options(OptionTier::Secondary),
            &[PickerOption::text("Fast")]
        );
    }

    #[tokio::test]
    async fn test_failed_fetch_leaves_tier_empty() {
        let source = StaticOptionSource::new()
            .with_route(StaticRoute::new("collection_sources", Vec::new()).failing("boom"));
        let mut session = session(source);

        session.set_primary("a.one");
        assert_eq!(session.settle().await, 1);
        assert!(session.editor().options(OptionTier::Secondary).is_empty());
        assert!(!session.editor().is_pending(OptionTier::Secondary));
    }
}
