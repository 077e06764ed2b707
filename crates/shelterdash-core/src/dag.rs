//! Declared dataflow between the dashboard's inputs and its derived views.
//!
//! Every derived node names the nodes it reads. A user interaction marks one
//! or more nodes as changed; `downstream` returns every node that must be
//! recomputed, in topological order of the declared graph.

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Node {
    // Inputs supplied by the rendering layer.
    Category,
    BreedSelection,
    TableState,
    SelectedRow,
    SelectedColumns,
    // Derived.
    Query,
    Fetch,
    /// Derived from the fetch and table state, but the renderer may also
    /// report it directly after its own sort/filter.
    VisibleRows,
    Chart,
    Map,
    ColumnStyles,
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug, Clone)]
pub struct DataflowGraph {
    deps: BTreeMap<Node, Vec<Node>>,
    dependents: BTreeMap<Node, Vec<Node>>,
    order: Vec<Node>,
}

impl DataflowGraph {
    /// Build from `(node, dependencies)` declarations. Nodes only mentioned as
    /// dependencies become inputs. Fails on cycles.
    pub fn new(decls: &[(Node, &[Node])]) -> Result<Self> {
        let mut deps: BTreeMap<Node, Vec<Node>> = BTreeMap::new();
        let mut dependents: BTreeMap<Node, Vec<Node>> = BTreeMap::new();
        let mut in_degree: BTreeMap<Node, usize> = BTreeMap::new();

        for (node, node_deps) in decls {
            in_degree.entry(*node).or_default();
            let entry = deps.entry(*node).or_default();
            for d in node_deps.iter() {
                if entry.contains(d) {
                    continue;
                }
                entry.push(*d);
                in_degree.entry(*d).or_default();
                *in_degree.entry(*node).or_default() += 1;
                dependents.entry(*d).or_default().push(*node);
            }
        }
        for node in in_degree.keys() {
            deps.entry(*node).or_default();
        }

        let mut ready: VecDeque<Node> = in_degree
            .iter()
            .filter_map(|(n, &deg)| if deg == 0 { Some(*n) } else { None })
            .collect();
        let mut remaining = in_degree.clone();
        let mut order = Vec::with_capacity(in_degree.len());

        while let Some(n) = ready.pop_front() {
            order.push(n);
            if let Some(nexts) = dependents.get(&n) {
                for v in nexts {
                    if let Some(deg) = remaining.get_mut(v) {
                        *deg -= 1;
                        if *deg == 0 {
                            ready.push_back(*v);
                        }
                    }
                }
            }
        }

        if order.len() != in_degree.len() {
            let stuck: Vec<String> = remaining
                .iter()
                .filter(|(_, deg)| **deg > 0)
                .map(|(n, _)| n.to_string())
                .collect();
            return Err(Error::Invariant(format!(
                "dataflow graph has a cycle through {}",
                stuck.join(", ")
            )));
        }

        Ok(Self {
            deps,
            dependents,
            order,
        })
    }

    /// The dashboard graph.
    pub fn standard() -> Result<Self> {
        use Node::*;
        Self::new(&[
            (Query, &[Category, BreedSelection]),
            (Fetch, &[Query]),
            (VisibleRows, &[Fetch, TableState]),
            (Chart, &[VisibleRows]),
            (Map, &[VisibleRows, SelectedRow]),
            (ColumnStyles, &[SelectedColumns]),
        ])
    }

    pub fn dependencies(&self, node: Node) -> &[Node] {
        self.deps.get(&node).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_input(&self, node: Node) -> bool {
        self.deps.contains_key(&node) && self.dependencies(node).is_empty()
    }

    pub fn contains(&self, node: Node) -> bool {
        self.deps.contains_key(&node)
    }

    /// All nodes in topological order.
    pub fn order(&self) -> &[Node] {
        &self.order
    }

    /// Nodes strictly downstream of `changed`, in topological order.
    pub fn downstream(&self, changed: &[Node]) -> Vec<Node> {
        let mut dirty = BTreeSet::new();
        let mut stack: Vec<Node> = changed.to_vec();
        while let Some(n) = stack.pop() {
            for v in self.dependents.get(&n).into_iter().flatten() {
                if dirty.insert(*v) {
                    stack.push(*v);
                }
            }
        }
        self.order
            .iter()
            .copied()
            .filter(|n| dirty.contains(n))
            .collect()
    }
}
