#![forbid(unsafe_code)]
//! shelterdash-operators: everything computed from the rows the table shows.
//!
//! Design intent:
//! - Projections are pure and synchronous: no I/O, no clocks, no randomness.
//! - Projections read a `ProjectionInput`, which only carries the visible
//!   rows and the selection, so they cannot observe the raw fetch.
//! - `table` reproduces the table's native sort/filter/paging so the visible
//!   rows can be derived on the core side when the renderer does not report them.

pub mod chart;
pub mod highlight;
pub mod map;
pub mod options;
pub mod table;
pub mod traits;

pub use chart::{BreedChart, ChartSummary, Slice};
pub use highlight::{ColumnHighlight, ColumnStyle};
pub use map::{LatLong, LocationMap, MapDescriptor, Marker, Popup};
pub use table::{SortDirection, SortKey, TableFilter, TableState};
pub use traits::{OpError, Projection, ProjectionInput};
