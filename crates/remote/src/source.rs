//! Remote collaborator contracts and static in-memory implementations
//!
//! The autocomplete and catalog services are opaque to the pickers. They are
//! modelled as two traits whose futures are `Send`, so a driver can run each
//! call on its own tokio task. The static implementations answer from
//! fixture data and are used by the command-line front end and the tests.

use crate::error::{RemoteError, RemoteResult};
use pickers_core::{AutocompleteRequest, CatalogEntity, EntityQuery, PickerOption};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::future::Future;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

// ============================================================================
// Collaborator Traits
// ============================================================================

/// Serves option lists for cascading selectors
pub trait AutocompleteSource: Send + Sync {
    /// Fetch the options of `request.resource` scoped to `request.context`
    fn autocomplete(
        &self,
        request: AutocompleteRequest,
    ) -> impl Future<Output = RemoteResult<Vec<PickerOption>>> + Send;
}

/// Looks up catalog entities for "already exists" checks
pub trait EntityLookup: Send + Sync {
    /// Fetch entities matching a kind and filter
    fn lookup_existing(
        &self,
        query: EntityQuery,
    ) -> impl Future<Output = RemoteResult<Vec<CatalogEntity>>> + Send;
}

// ============================================================================
// Static Option Source
// ============================================================================

/// One canned answer of a [`StaticOptionSource`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StaticRoute {
    /// Resource this route answers
    pub resource: String,

    /// Context entries the request must carry (subset match)
    #[serde(default)]
    pub context: BTreeMap<String, String>,

    /// Options returned on success
    #[serde(default)]
    pub options: Vec<PickerOption>,

    /// Simulated latency
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay_ms: Option<u64>,

    /// When set, the route fails with this message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StaticRoute {
    /// A route answering `resource` with `options`
    pub fn new(resource: impl Into<String>, options: Vec<PickerOption>) -> Self {
        Self {
            resource: resource.into(),
            options,
            ..Default::default()
        }
    }

    /// Require a context entry
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Delay the answer
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay_ms = Some(delay.as_millis() as u64);
        self
    }

    /// Make the route fail
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.error = Some(message.into());
        self
    }

    fn matches(&self, request: &AutocompleteRequest) -> bool {
        self.resource == request.resource
            && self
                .context
                .iter()
                .all(|(key, value)| request.context.get(key) == Some(value))
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct OptionFixture {
    #[serde(default)]
    routes: Vec<StaticRoute>,
}

/// Autocomplete source answering from canned routes
///
/// The first route whose resource matches and whose context is contained in
/// the request wins. A request no route matches fails with
/// [`RemoteError::UnknownResource`].
#[derive(Debug, Default)]
pub struct StaticOptionSource {
    routes: Vec<StaticRoute>,
    calls: AtomicUsize,
}

impl StaticOptionSource {
    /// Create a source with no routes
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a route
    pub fn with_route(mut self, route: StaticRoute) -> Self {
        self.routes.push(route);
        self
    }

    /// Parse a fixture document: `{ "routes": [ ... ] }`
    pub fn from_json_str(text: &str) -> RemoteResult<Self> {
        let fixture: OptionFixture =
            serde_json::from_str(text).map_err(|e| RemoteError::Fixture(e.to_string()))?;
        Ok(Self {
            routes: fixture.routes,
            calls: AtomicUsize::new(0),
        })
    }

    /// Load a fixture document from disk
    pub fn load(path: impl AsRef<Path>) -> RemoteResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| RemoteError::Fixture(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&text)
    }

    /// Number of requests served so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl AutocompleteSource for StaticOptionSource {
    async fn autocomplete(&self, request: AutocompleteRequest) -> RemoteResult<Vec<PickerOption>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let route = self
            .routes
            .iter()
            .find(|route| route.matches(&request))
            .cloned();

        let Some(route) = route else {
            return Err(RemoteError::UnknownResource(request.resource));
        };
        if let Some(ms) = route.delay_ms {
            tokio::time::sleep(Duration::from_millis(ms)).await;
        }
        tracing::debug!(resource = %request.resource, "Serving static options");

        match route.error {
            Some(message) => Err(RemoteError::request(request.resource, message)),
            None => Ok(route.options),
        }
    }
}

// ============================================================================
// Static Entity Lookup
// ============================================================================

/// Catalog lookup answering from a fixed entity list
#[derive(Debug, Default)]
pub struct StaticEntityLookup {
    entities: Vec<CatalogEntity>,
    delay: Option<Duration>,
    error: Option<String>,
    calls: AtomicUsize,
}

impl StaticEntityLookup {
    /// Create a lookup returning `entities` for every query
    pub fn new(entities: Vec<CatalogEntity>) -> Self {
        Self {
            entities,
            ..Default::default()
        }
    }

    /// A lookup that always fails
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Default::default()
        }
    }

    /// Delay every answer
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Parse a JSON array of entities
    pub fn from_json_str(text: &str) -> RemoteResult<Self> {
        let entities: Vec<CatalogEntity> =
            serde_json::from_str(text).map_err(|e| RemoteError::Fixture(e.to_string()))?;
        Ok(Self::new(entities))
    }

    /// Load a JSON array of entities from disk
    pub fn load(path: impl AsRef<Path>) -> RemoteResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| RemoteError::Fixture(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&text)
    }

    /// Number of lookups served so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl EntityLookup for StaticEntityLookup {
    async fn lookup_existing(&self, query: EntityQuery) -> RemoteResult<Vec<CatalogEntity>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        tracing::debug!(filter = %query.filter_expression(), "Serving static entities");

        match &self.error {
            Some(message) => Err(RemoteError::request("catalog", message.clone())),
            None => Ok(self.entities.clone()),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
