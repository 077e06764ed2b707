#![forbid(unsafe_code)]
//! shelterdash-planner: from a rescue-category + breed selection to a `Query`.
//!
//! Design:
//! - Category presets live in `shelterdash-core::category` as static data.
//! - `compile` starts from the preset (or the empty query for `Reset`) and
//!   narrows the breed constraint with the explicit selection.
//! - `explain` renders a compiled query for logs and the CLI.
//!
//! NOTE: No I/O here; executing the query is the store's job.

pub mod compile;
pub mod explain;

pub use compile::{compile, BreedSelection};
pub use explain::explain;
