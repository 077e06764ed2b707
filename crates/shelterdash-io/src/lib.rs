#![forbid(unsafe_code)]
//! shelterdash-io: the record store façade and its collection backends.
//!
//! - `store`: `Collection` trait (raw backend) and `RecordStore` (validating
//!   CRUD façade with connect-time probing).
//! - `memory_store`: in-process collection for tests and `memory://`.
//! - `jsonl_store`: one JSON document per line on local disk (`file://`).
//! - `readers`: CSV import of shelter outcome exports.

pub mod error;
pub mod jsonl_store;
pub mod memory_store;
pub mod readers;
pub mod store;

pub use error::{Error, Result};
pub use store::{build_store_from_config, Collection, RecordStore};
