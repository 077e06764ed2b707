//! Multi-key stable row sort.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use shelterdash_core::prelude::{AnimalRecord, Scalar};

use crate::traits::OpError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
    pub column_id: String,
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortKey {
    pub fn asc(column_id: impl Into<String>) -> Self {
        Self {
            column_id: column_id.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(column_id: impl Into<String>) -> Self {
        Self {
            column_id: column_id.into(),
            direction: SortDirection::Desc,
        }
    }

    /// Parse `column` or `column:asc` / `column:desc`.
    pub fn parse(raw: &str) -> Result<Self, OpError> {
        let (col, dir) = match raw.rsplit_once(':') {
            Some((col, dir)) => (col.trim(), dir.trim()),
            None => (raw.trim(), "asc"),
        };
        if col.is_empty() {
            return Err(OpError::Filter(format!("empty sort column in '{raw}'")));
        }
        let direction = match dir.to_ascii_lowercase().as_str() {
            "asc" => SortDirection::Asc,
            "desc" => SortDirection::Desc,
            other => return Err(OpError::Filter(format!("unknown sort direction '{other}'"))),
        };
        Ok(Self {
            column_id: col.to_string(),
            direction,
        })
    }
}

/// Stable sort by `keys` in priority order. Missing cells compare as null.
pub fn sort_rows(rows: &mut [AnimalRecord], keys: &[SortKey]) {
    if keys.is_empty() {
        return;
    }
    rows.sort_by(|a, b| compare(a, b, keys));
}

fn compare(a: &AnimalRecord, b: &AnimalRecord, keys: &[SortKey]) -> Ordering {
    for key in keys {
        let x = a.get(&key.column_id).unwrap_or(Scalar::Null);
        let y = b.get(&key.column_id).unwrap_or(Scalar::Null);
        let ord = match key.direction {
            SortDirection::Asc => x.total_cmp(&y),
            SortDirection::Desc => y.total_cmp(&x),
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}
