//! The table's native sort, filter and paging.
//!
//! The renderer normally reports the rows it shows after its own sort/filter.
//! When it does not (CLI, tests), the same transformation is applied here.

pub mod filter;
pub mod sort;

use serde::{Deserialize, Serialize};

use shelterdash_core::prelude::AnimalRecord;

use crate::traits::OpError;

pub use filter::TableFilter;
pub use sort::{SortDirection, SortKey};

/// Sort keys plus an optional filter expression, as set by the user on the table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableState {
    #[serde(default)]
    pub sort_by: Vec<SortKey>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
}

impl TableState {
    pub fn is_identity(&self) -> bool {
        self.sort_by.is_empty() && self.filter.as_deref().map_or(true, |f| f.trim().is_empty())
    }
}

/// Filter, then stable-sort, the fetched rows.
pub fn apply(rows: &[AnimalRecord], state: &TableState) -> Result<Vec<AnimalRecord>, OpError> {
    let mut out: Vec<AnimalRecord> = match state.filter.as_deref() {
        Some(expr) if !expr.trim().is_empty() => {
            let filter = TableFilter::parse(expr)?;
            rows.iter().filter(|r| filter.matches(r)).cloned().collect()
        }
        _ => rows.to_vec(),
    };
    sort::sort_rows(&mut out, &state.sort_by);
    Ok(out)
}

/// Number of pages for `len` rows; an empty table still has one page.
pub fn page_count(len: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 1;
    }
    len.div_ceil(page_size).max(1)
}

/// Rows on page `index` (zero-based). Out-of-range pages are empty.
pub fn page(rows: &[AnimalRecord], index: usize, page_size: usize) -> &[AnimalRecord] {
    if page_size == 0 {
        return rows;
    }
    let start = index.saturating_mul(page_size).min(rows.len());
    let end = start.saturating_add(page_size).min(rows.len());
    &rows[start..end]
}

/// Column ids across `rows`, in first-seen order.
pub fn columns(rows: &[AnimalRecord]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for row in rows {
        for (name, _) in row.fields() {
            if !out.iter().any(|c| c == name) {
                out.push(name.to_string());
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows() -> Vec<AnimalRecord> {
        [("Rex", "Beagle", 40.0), ("Ace", "Poodle", 12.0), ("Max", "Beagle", 80.0)]
            .iter()
            .map(|(n, b, a)| AnimalRecord {
                name: Some(n.to_string()),
                breed: Some(b.to_string()),
                age_upon_outcome_in_weeks: Some(*a),
                ..Default::default()
            })
            .collect()
    }

    fn names(rows: &[AnimalRecord]) -> Vec<&str> {
        rows.iter().filter_map(|r| r.name.as_deref()).collect()
    }

    #[test]
    fn identity_state_keeps_order() {
        let state = TableState::default();
        assert!(state.is_identity());
        assert_eq!(names(&apply(&rows(), &state).unwrap()), ["Rex", "Ace", "Max"]);
    }

    #[test]
    fn filter_then_sort() {
        let state = TableState {
            sort_by: vec![SortKey::parse("age_upon_outcome_in_weeks:desc").unwrap()],
            filter: Some("{breed} = Beagle".into()),
        };
        assert_eq!(names(&apply(&rows(), &state).unwrap()), ["Max", "Rex"]);
    }

    #[test]
    fn bad_filter_is_an_error() {
        let state = TableState {
            sort_by: vec![],
            filter: Some("breed Beagle".into()),
        };
        assert!(matches!(apply(&rows(), &state), Err(OpError::Filter(_))));
    }

    #[test]
    fn paging() {
        let rows = rows();
        assert_eq!(page_count(rows.len(), 2), 2);
        assert_eq!(page_count(0, 10), 1);
        assert_eq!(names(page(&rows, 1, 2)), ["Max"]);
        assert!(page(&rows, 5, 2).is_empty());
    }

    #[test]
    fn columns_in_first_seen_order() {
        assert_eq!(columns(&rows()), ["name", "breed", "age_upon_outcome_in_weeks"]);
    }
}
