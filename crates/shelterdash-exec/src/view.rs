//! Per-session view state and the fetch step behind it.

use std::collections::BTreeSet;

use serde::Serialize;

use shelterdash_core::hash::hash_serde;
use shelterdash_core::prelude::{AnimalRecord, Query, RescueCategory};
use shelterdash_io::RecordStore;
use shelterdash_operators::{ProjectionInput, TableState};
use shelterdash_planner::{compile, explain, BreedSelection};

use crate::notification::Notification;

/// Everything one dashboard session knows: its inputs, the current query,
/// the fetched rows and the rows the table currently shows.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ViewState {
    pub(crate) category: RescueCategory,
    pub(crate) breeds: BreedSelection,
    pub(crate) query: Query,
    /// Store order, ids dropped.
    pub(crate) fetched: Vec<AnimalRecord>,
    /// Subset/reorder of `fetched` after the table's sort and filter.
    pub(crate) visible: Vec<AnimalRecord>,
    pub(crate) table_state: TableState,
    pub(crate) selected_row: Option<usize>,
    pub(crate) selected_columns: BTreeSet<String>,
}

impl ViewState {
    pub fn category(&self) -> RescueCategory {
        self.category
    }

    pub fn breeds(&self) -> &BreedSelection {
        &self.breeds
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn fetched(&self) -> &[AnimalRecord] {
        &self.fetched
    }

    pub fn visible(&self) -> &[AnimalRecord] {
        &self.visible
    }

    pub fn table_state(&self) -> &TableState {
        &self.table_state
    }

    /// The selected index, only if it points into the visible rows.
    pub fn selected_row(&self) -> Option<usize> {
        self.selected_row.filter(|i| *i < self.visible.len())
    }

    pub fn selected_record(&self) -> Option<&AnimalRecord> {
        self.selected_row().and_then(|i| self.visible.get(i))
    }

    pub fn selected_columns(&self) -> &BTreeSet<String> {
        &self.selected_columns
    }

    /// What the projections are allowed to see.
    pub fn projection_input(&self) -> ProjectionInput<'_> {
        ProjectionInput {
            visible_rows: &self.visible,
            selected_row: self.selected_row(),
            selected_columns: &self.selected_columns,
        }
    }
}

/// Compile the selection and fetch it.
///
/// Never fails: an empty result carries a warning, a store failure carries an
/// error notification and no rows.
pub fn apply_filter(
    store: &RecordStore,
    category: RescueCategory,
    breeds: &BreedSelection,
) -> (Vec<AnimalRecord>, Option<Notification>) {
    let query = compile(category, breeds);
    fetch(store, &query)
}

pub(crate) fn fetch(store: &RecordStore, query: &Query) -> (Vec<AnimalRecord>, Option<Notification>) {
    let fingerprint = hash_serde(query)
        .map(|h| h.short())
        .unwrap_or_else(|_| "-".to_string());
    tracing::debug!(query = %explain(query), %fingerprint, "fetch");

    match store.read(Some(query)) {
        Ok(rows) if rows.is_empty() => {
            tracing::warn!(%fingerprint, "no results");
            (Vec::new(), Some(Notification::no_results()))
        }
        Ok(rows) => {
            tracing::debug!(%fingerprint, rows = rows.len(), "fetched");
            let rows = rows.iter().map(AnimalRecord::without_id).collect();
            (rows, None)
        }
        Err(e) => {
            tracing::warn!(%fingerprint, error = %e, "fetch failed");
            (Vec::new(), Some(Notification::error(e)))
        }
    }
}
