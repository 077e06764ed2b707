//! Bulk readers that turn external exports into `AnimalRecord`s.

pub mod csv;
