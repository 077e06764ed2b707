//! Dashboard runtime: one store connection shared by independent sessions.

use std::sync::atomic::{AtomicU64, Ordering};

use thiserror::Error;

use shelterdash_core::prelude::{DashboardConfig, DataflowGraph, SessionId};
use shelterdash_io::{build_store_from_config, RecordStore};

use crate::session::Session;

#[derive(Debug, Error)]
pub enum ExecError {
    #[error("store: {0}")]
    Store(#[from] shelterdash_io::Error),
    #[error("dataflow graph: {0}")]
    Graph(#[from] shelterdash_core::Error),
    #[error("invalid pass: {0}")]
    Invalid(String),
}

/// Owns the store handle and the validated dataflow graph.
#[derive(Debug)]
pub struct Dashboard {
    cfg: DashboardConfig,
    store: RecordStore,
    graph: DataflowGraph,
    next_session: AtomicU64,
}

impl Dashboard {
    /// Connect to the configured store. Failing to reach it is fatal.
    pub fn connect(cfg: DashboardConfig) -> Result<Self, ExecError> {
        let store = build_store_from_config(&cfg.store_config())?;
        Self::with_store(cfg, store)
    }

    /// Use an already connected store.
    pub fn with_store(cfg: DashboardConfig, store: RecordStore) -> Result<Self, ExecError> {
        let graph = DataflowGraph::standard()?;
        tracing::info!(store = %store.describe(), nodes = graph.order().len(), "dashboard ready");
        Ok(Self {
            cfg,
            store,
            graph,
            next_session: AtomicU64::new(1),
        })
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.cfg
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// New session with its own view state; the collection handle is shared.
    pub fn open_session(&self) -> Session {
        let id = SessionId::new(self.next_session.fetch_add(1, Ordering::Relaxed));
        Session::open(id, self.store.clone(), self.graph.clone(), self.cfg.page_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Event;
    use shelterdash_core::prelude::{AnimalRecord, RescueCategory};

    fn memory_config() -> DashboardConfig {
        DashboardConfig {
            store_uri: "memory://".into(),
            server_selection_timeout_ms: 50,
            ..Default::default()
        }
    }

    #[test]
    fn connects_to_memory_store() {
        let dash = Dashboard::connect(memory_config()).unwrap();
        assert!(dash.store().read(Some(&Default::default())).unwrap().is_empty());
    }

    #[test]
    fn unreachable_store_is_a_connection_failure() {
        let cfg = DashboardConfig {
            store_uri: format!("file:///nonexistent/shelterdash-{}", std::process::id()),
            server_selection_timeout_ms: 50,
            ..Default::default()
        };
        let err = Dashboard::connect(cfg).unwrap_err();
        assert!(matches!(err, ExecError::Store(shelterdash_io::Error::ConnectionFailure(_))));
    }

    #[test]
    fn unsupported_scheme_is_a_config_error() {
        let cfg = DashboardConfig {
            store_uri: "mongodb://localhost:27017".into(),
            ..Default::default()
        };
        assert!(matches!(
            Dashboard::connect(cfg),
            Err(ExecError::Store(shelterdash_io::Error::Config(_)))
        ));
    }

    #[test]
    fn sessions_are_isolated_but_share_the_store() {
        let dash = Dashboard::connect(memory_config()).unwrap();
        let mut a = dash.open_session();
        let b = dash.open_session();
        assert_ne!(a.id(), b.id());

        dash.store()
            .create(Some(&AnimalRecord {
                name: Some("Rex".into()),
                ..Default::default()
            }))
            .unwrap();

        a.handle(Event::CategoryChanged(RescueCategory::Reset));
        assert_eq!(a.view().visible().len(), 1);
        // b has not run a pass since the insert
        assert!(b.view().visible().is_empty());
    }
}
