//! Projection trait + common interfaces.
//!
//! The exec crate builds one `ProjectionInput` per recomputation pass and
//! hands it to each projection that the pass has to refresh.

use std::collections::BTreeSet;

use shelterdash_core::prelude::AnimalRecord;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OpError {
    #[error("filter error: {0}")]
    Filter(String),
}

/// What every projection may look at: the table-visible rows and the
/// current selection.
#[derive(Debug, Clone, Copy)]
pub struct ProjectionInput<'a> {
    pub visible_rows: &'a [AnimalRecord],
    /// Index into `visible_rows`; may be stale or out of range.
    pub selected_row: Option<usize>,
    pub selected_columns: &'a BTreeSet<String>,
}

impl<'a> ProjectionInput<'a> {
    /// The selected row, if the index is valid for the visible rows.
    pub fn selected(&self) -> Option<&'a AnimalRecord> {
        self.selected_row.and_then(|i| self.visible_rows.get(i))
    }
}

/// Trait that all projections implement.
///
/// Invariants:
/// - `project` must be deterministic given the same input.
/// - `project` never fails; missing or empty data yields a placeholder.
pub trait Projection {
    type Output;

    /// Human-readable projection name (stable; used in logs).
    fn name(&self) -> &'static str;

    fn project(&self, input: &ProjectionInput<'_>) -> Self::Output;
}
