//! Pass-level tracing hooks.
//!
//! Exporters (OpenTelemetry, Prometheus) belong in the binary layer; this
//! only emits structured events.

use std::time::Duration;

use shelterdash_core::prelude::{Node, PassId, SessionId};

pub fn emit_pass(session: SessionId, pass: PassId, nodes: &[Node], elapsed: Duration) {
    let nodes: Vec<String> = nodes.iter().map(Node::to_string).collect();
    tracing::debug!(
        session = session.get(),
        pass = pass.get(),
        nodes = %nodes.join(","),
        elapsed_us = elapsed.as_micros() as u64,
        "pass complete"
    );
}
