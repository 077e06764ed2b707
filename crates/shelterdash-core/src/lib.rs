#![forbid(unsafe_code)]
//! shelterdash-core: records, scalars, queries, rescue categories, config,
//! and the dataflow graph declaration shared by every other crate.
//!
//! Pure data and pure functions only. Storage backends live in
//! `shelterdash-io`, projections in `shelterdash-operators`.

pub mod category;
pub mod config;
pub mod dag;
pub mod error;
pub mod hash;
pub mod id;
pub mod prelude;
pub mod query;
pub mod record;
pub mod types;

pub use error::{Error, Result};
