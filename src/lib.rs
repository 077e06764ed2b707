#![forbid(unsafe_code)]
//! shelterdash: browse animal-shelter outcome records by rescue category and
//! derive chart and map views from the rows the table shows.
//!
//! This package re-exports the workspace crates; the cross-crate integration
//! tests and benchmarks live next to it.

pub use shelterdash_core;
pub use shelterdash_exec;
pub use shelterdash_io;
pub use shelterdash_operators;
pub use shelterdash_planner;

pub use shelterdash_exec::{Dashboard, Event, Notification, Session, ViewUpdate};
