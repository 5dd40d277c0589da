//! Debounced name existence check
//!
//! Warns when a name typed into a form already belongs to a catalog entity.
//! Every keystroke aborts the pending timer and starts a new one, so exactly
//! one lookup fires once input has been quiet for the debounce delay.
//! Clearing the input clears the warning without a lookup. Dropping the
//! check (or calling `shutdown`) aborts the timer synchronously.

use crate::source::EntityLookup;
use pickers_core::EntityQuery;
use pickers_model::ExistenceCheckSchema;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;

// ============================================================================
// ExistenceWarning
// ============================================================================

/// A dismissable warning shown next to the name input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExistenceWarning {
    /// An entity with this name is already registered
    AlreadyExists {
        /// The name as typed
        name: String,
        /// Display name of the matching entity
        existing: String,
        message: String,
    },
    /// The lookup itself failed
    LookupFailed { message: String },
}

impl ExistenceWarning {
    /// Text to render
    pub fn message(&self) -> &str {
        match self {
            ExistenceWarning::AlreadyExists { message, .. }
            | ExistenceWarning::LookupFailed { message } => message,
        }
    }

    /// Whether this warning reports a match
    pub fn is_match(&self) -> bool {
        matches!(self, ExistenceWarning::AlreadyExists { .. })
    }
}

impl fmt::Display for ExistenceWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

fn article(noun: &str) -> &'static str {
    match noun.chars().next().map(|c| c.to_ascii_lowercase()) {
        Some('a' | 'e' | 'i' | 'o' | 'u') => "An",
        _ => "A",
    }
}

// ============================================================================
// NameExistenceCheck
// ============================================================================

/// Debounced catalog lookup for one name input
pub struct NameExistenceCheck<L> {
    lookup: Arc<L>,
    schema: ExistenceCheckSchema,
    warning: Arc<watch::Sender<Option<ExistenceWarning>>>,
    generation: Arc<AtomicU64>,
    pending: Option<JoinHandle<()>>,
    runtime: Option<Handle>,
}

impl<L> NameExistenceCheck<L>
where
    L: EntityLookup + 'static,
{
    /// Create a check with no warning
    ///
    /// Lookups run on the tokio runtime current at construction. Outside a
    /// runtime no lookup is ever scheduled until one is supplied with
    /// [`with_runtime`](Self::with_runtime).
    pub fn new(lookup: Arc<L>, schema: ExistenceCheckSchema) -> Self {
        let (warning, _) = watch::channel(None);
        Self {
            lookup,
            schema,
            warning: Arc::new(warning),
            generation: Arc::new(AtomicU64::new(0)),
            pending: None,
            runtime: Handle::try_current().ok(),
        }
    }

    /// Run lookups on an explicit runtime
    pub fn with_runtime(mut self, handle: Handle) -> Self {
        self.runtime = Some(handle);
        self
    }

    /// Current warning
    pub fn warning(&self) -> Option<ExistenceWarning> {
        self.warning.borrow().clone()
    }

    /// Receive every warning change
    pub fn subscribe(&self) -> watch::Receiver<Option<ExistenceWarning>> {
        self.warning.subscribe()
    }

    /// Whether a timer or lookup is outstanding
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Hide the current warning until the next lookup completes
    pub fn dismiss(&self) {
        self.warning.send_replace(None);
    }

    /// Record a keystroke
    ///
    /// Restarts the debounce timer. Empty input clears the warning and
    /// schedules nothing.
    pub fn input(&mut self, value: &str) {
        self.cancel_pending();
        self.warning.send_replace(None);

        let name = value.trim().to_string();
        if name.is_empty() {
            return;
        }
        let Some(runtime) = self.runtime.clone() else {
            tracing::warn!(name = %name, "No async runtime; skipping name availability check");
            return;
        };

        let generation = self.generation.load(Ordering::SeqCst);
        let current = Arc::clone(&self.generation);
        let warning = Arc::clone(&self.warning);
        let lookup = Arc::clone(&self.lookup);
        let delay = self.schema.debounce();
        let label = self.schema.label.clone();
        let query = self
            .schema
            .filter
            .iter()
            .fold(EntityQuery::new(self.schema.kind.clone()), |query, (k, v)| {
                query.with_filter(k.clone(), v.clone())
            });

        self.pending = Some(runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            tracing::debug!(name = %name, filter = %query.filter_expression(), "Checking name availability");
            let result = lookup.lookup_existing(query).await;

            if current.load(Ordering::SeqCst) != generation {
                return;
            }
            let next = match result {
                Ok(entities) => entities
                    .iter()
                    .find(|entity| entity.matches_name(&name))
                    .map(|entity| ExistenceWarning::AlreadyExists {
                        message: format!(
                            "{} {label} named \"{name}\" already exists",
                            article(&label)
                        ),
                        existing: entity.display_name().to_string(),
                        name: name.clone(),
                    }),
                Err(e) => {
                    tracing::warn!(error = %e, "Name availability lookup failed");
                    Some(ExistenceWarning::LookupFailed {
                        message: format!("Could not check whether \"{name}\" is available: {e}"),
                    })
                }
            };
            warning.send_replace(next);
        }));
    }

    /// Wait for the outstanding timer and lookup to finish
    pub async fn settle(&mut self) {
        if let Some(task) = self.pending.take() {
            let _ = task.await;
        }
    }

    /// Abort the outstanding timer and lookup
    pub fn shutdown(&mut self) {
        self.cancel_pending();
    }

    fn cancel_pending(&mut self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(task) = self.pending.take() {
            task.abort();
        }
    }
}

impl<L> Drop for NameExistenceCheck<L> {
    fn drop(&mut self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(task) = self.pending.take() {
            task.abort();
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
