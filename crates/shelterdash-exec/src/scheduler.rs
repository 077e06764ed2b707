//! Pass planning over the dataflow graph.
//!
//! A pass is one recomputation triggered by one interaction. Passes are
//! numbered per session and never overlap: the session runs each plan to
//! completion before accepting the next event.

use std::collections::BTreeSet;

use shelterdash_core::prelude::{DataflowGraph, Node, PassId};

use crate::runtime::ExecError;

/// The nodes one pass has to recompute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassPlan {
    pub id: PassId,
    /// Nodes whose values were set directly by the interaction.
    pub changed: Vec<Node>,
    /// Nodes to recompute, in topological order.
    pub nodes: Vec<Node>,
}

impl PassPlan {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Scheduler {
    graph: DataflowGraph,
    next_pass: u64,
}

impl Scheduler {
    pub fn new(graph: DataflowGraph) -> Self {
        Self { graph, next_pass: 0 }
    }

    pub fn graph(&self) -> &DataflowGraph {
        &self.graph
    }

    /// Plan the pass for a set of changed nodes. Duplicates are ignored.
    pub fn plan(&mut self, changed: &[Node]) -> Result<PassPlan, ExecError> {
        let mut seen = BTreeSet::new();
        let mut marked = Vec::with_capacity(changed.len());
        for node in changed {
            if !self.graph.contains(*node) {
                return Err(ExecError::Invalid(format!("{node} is not part of the dataflow graph")));
            }
            if seen.insert(*node) {
                marked.push(*node);
            }
        }

        let id = PassId::new(self.next_pass);
        self.next_pass += 1;

        Ok(PassPlan {
            id,
            nodes: self.graph.downstream(&marked),
            changed: marked,
        })
    }
}
