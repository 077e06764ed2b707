#![forbid(unsafe_code)]
//! shelterdash-exec: dashboard runtime, per-session view state and the
//! recomputation passes that keep the derived views in step with user input.
//!
//! One interaction is one pass: the changed inputs are marked on the dataflow
//! graph and every downstream node is recomputed in topological order.

pub mod metrics;
pub mod notification;
pub mod runtime;
pub mod scheduler;
pub mod session;
pub mod view;

pub use notification::{Notification, Severity};
pub use runtime::{Dashboard, ExecError};
pub use session::{Event, Session, ViewUpdate};
pub use view::{apply_filter, ViewState};
