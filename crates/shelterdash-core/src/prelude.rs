//! Convenient re-exports for downstream crates.

pub use crate::category::{AgeRange, CategoryPreset, RescueCategory};
pub use crate::config::{DashboardConfig, StoreConfig};
pub use crate::dag::{DataflowGraph, Node};
pub use crate::error::{Error, Result};
pub use crate::id::{PassId, RecordId, SessionId};
pub use crate::query::{Predicate, Query};
pub use crate::record::{AnimalRecord, Changes};
pub use crate::types::Scalar;
