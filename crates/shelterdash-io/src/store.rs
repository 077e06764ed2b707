//! Record store façade over a document collection.
//!
//! `Collection` is the raw backend contract (one synchronous round-trip per
//! call, no caching). `RecordStore` validates arguments before anything is
//! sent to the backend and normalizes backend failures to `QueryFailure`.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use shelterdash_core::config::StoreConfig;
use shelterdash_core::prelude::{AnimalRecord, Changes, Query, RecordId};

use crate::error::{Error, Result};
use crate::jsonl_store::JsonlCollection;
use crate::memory_store::MemoryCollection;

/// Backend contract. Implementations must be safe to share between sessions:
/// no per-call state may live between calls.
pub trait Collection: Send + Sync {
    /// Human-readable location, used in logs and errors.
    fn describe(&self) -> String;

    /// Cheap reachability check used while connecting.
    fn ping(&self) -> Result<()>;

    fn insert_one(&self, record: AnimalRecord) -> Result<()>;

    /// Matching records in store order.
    fn find(&self, query: &Query) -> Result<Vec<AnimalRecord>>;

    /// Apply `changes` to every match; returns how many records actually changed.
    fn update_many(&self, query: &Query, changes: &Changes) -> Result<u64>;

    fn delete_many(&self, query: &Query) -> Result<u64>;
}

/// Validating CRUD façade. Cloning shares the underlying collection handle.
#[derive(Clone)]
pub struct RecordStore {
    collection: Arc<dyn Collection>,
}

impl std::fmt::Debug for RecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordStore")
            .field("collection", &self.collection.describe())
            .finish()
    }
}

const PROBE_INITIAL_BACKOFF: Duration = Duration::from_millis(25);
const PROBE_MAX_BACKOFF: Duration = Duration::from_millis(500);

impl RecordStore {
    /// Wrap a collection without probing it.
    pub fn new(collection: Arc<dyn Collection>) -> Self {
        Self { collection }
    }

    /// Probe the collection until it answers or `timeout` elapses.
    pub fn connect(collection: Arc<dyn Collection>, timeout: Duration) -> Result<Self> {
        let started = Instant::now();
        let mut backoff = PROBE_INITIAL_BACKOFF;
        loop {
            match collection.ping() {
                Ok(()) => {
                    tracing::info!(
                        collection = %collection.describe(),
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "store connected"
                    );
                    return Ok(Self { collection });
                }
                Err(e) => {
                    let elapsed = started.elapsed();
                    if elapsed >= timeout {
                        return Err(Error::ConnectionFailure(format!(
                            "{} unreachable after {} ms: {e}",
                            collection.describe(),
                            timeout.as_millis()
                        )));
                    }
                    tracing::debug!(error = %e, "store not ready, probing again");
                    thread::sleep(backoff.min(timeout - elapsed));
                    backoff = (backoff * 2).min(PROBE_MAX_BACKOFF);
                }
            }
        }
    }

    pub fn describe(&self) -> String {
        self.collection.describe()
    }

    /// Insert one record. Absent or field-less records are rejected without
    /// touching the backend. A record without an id gets a fresh one.
    pub fn create(&self, record: Option<&AnimalRecord>) -> Result<RecordId> {
        let record = record
            .ok_or_else(|| Error::InvalidInput("nothing to save: record is absent".to_string()))?;
        if record.is_empty() {
            return Err(Error::InvalidInput(
                "nothing to save: record has no fields".to_string(),
            ));
        }
        let mut stored = record.clone();
        let id = stored.id.get_or_insert_with(RecordId::generate).clone();
        self.collection.insert_one(stored).map_err(query_failure)?;
        tracing::debug!(%id, "record created");
        Ok(id)
    }

    /// Matching records in store order. An absent query reads nothing; the
    /// empty query reads everything.
    pub fn read(&self, query: Option<&Query>) -> Result<Vec<AnimalRecord>> {
        let Some(query) = query else {
            return Ok(Vec::new());
        };
        let rows = self.collection.find(query).map_err(query_failure)?;
        tracing::debug!(predicates = query.len(), rows = rows.len(), "read");
        Ok(rows)
    }

    pub fn update(&self, query: Option<&Query>, changes: Option<&Changes>) -> Result<u64> {
        let (Some(query), Some(changes)) = (query, changes) else {
            return Err(Error::MissingArguments("update requires a query and changes"));
        };
        if changes.is_empty() {
            return Err(Error::InvalidInput("update has no changes".to_string()));
        }
        if changes.contains_key(shelterdash_core::record::fields::ID) {
            return Err(Error::InvalidInput(
                "the record identifier cannot be changed".to_string(),
            ));
        }
        let modified = self
            .collection
            .update_many(query, changes)
            .map_err(query_failure)?;
        tracing::debug!(modified, "update");
        Ok(modified)
    }

    pub fn delete(&self, query: Option<&Query>) -> Result<u64> {
        let query = query.ok_or(Error::MissingArguments("delete requires a query"))?;
        let removed = self.collection.delete_many(query).map_err(query_failure)?;
        tracing::debug!(removed, "delete");
        Ok(removed)
    }
}

/// Everything that is not already classified becomes a `QueryFailure`.
fn query_failure(e: Error) -> Error {
    match e {
        Error::QueryFailure(_) | Error::InvalidInput(_) | Error::MissingArguments(_) => e,
        other => Error::QueryFailure(other.to_string()),
    }
}

/// Build and connect the store backend selected by the configured URI.
pub fn build_store_from_config(cfg: &StoreConfig) -> Result<RecordStore> {
    let collection: Arc<dyn Collection> = match cfg.scheme() {
        Some("memory") => Arc::new(MemoryCollection::new()),
        Some("file") | None => Arc::new(JsonlCollection::new(
            &cfg.root,
            &cfg.database,
            &cfg.collection,
            cfg.socket_timeout(),
        )),
        Some(other) => {
            return Err(Error::Config(format!("unsupported store scheme '{other}'")));
        }
    };
    RecordStore::connect(collection, cfg.server_selection_timeout())
}
