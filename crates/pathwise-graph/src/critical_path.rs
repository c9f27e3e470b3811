//! Hours-weighted critical path.
//!
//! # Overview
//!
//! The critical path is the longest prerequisite chain measured in study
//! hours, a lower bound on how long the roadmap takes end to end.
//!
//! # Algorithm
//!
//! 1. Refuse cyclic input: the longest path is undefined there.
//! 2. Topologically sort the graph.
//! 3. Seed every node's best total with its own hours, so isolated nodes
//!    are candidates too.
//! 4. Relax successors in topological order, keeping a predecessor pointer.
//!    Only a strictly better total replaces an existing one.
//! 5. The end node is the first node in topological order with the maximum
//!    total; walk predecessor pointers back to the source.

#![allow(clippy::module_name_repetitions)]

use petgraph::algo::toposort;
use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::build::RoadmapGraph;
use crate::cycles::detect_cycles;
use crate::error::GraphError;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Longest hours-weighted prerequisite chain.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CriticalPath {
    /// Node ids in prerequisite order (source first).
    pub path: Vec<String>,
    /// Sum of node hours along `path`, counting the final node.
    pub total_hours: f64,
}

impl CriticalPath {
    /// Return an empty result for a graph with no nodes.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            path: Vec::new(),
            total_hours: 0.0,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// Number of nodes on the path.
    #[must_use]
    pub fn len(&self) -> usize {
        self.path.len()
    }
}

// ---------------------------------------------------------------------------
// Core computation
// ---------------------------------------------------------------------------

/// Compute the critical path of `graph`.
///
/// # Errors
///
/// Returns [`GraphError::Cyclic`], carrying the detected cycles, when the
/// graph is not a DAG.
#[instrument(skip_all, fields(nodes = graph.node_count()))]
pub fn compute_critical_path(graph: &RoadmapGraph) -> Result<CriticalPath, GraphError> {
    if graph.is_empty() {
        return Ok(CriticalPath::empty());
    }

    let Ok(topo) = toposort(&graph.graph, None) else {
        return Err(GraphError::Cyclic {
            cycles: detect_cycles(graph),
        });
    };

    let n = graph.node_count();
    let mut best: Vec<f64> = (0..n).map(|i| graph.hours(NodeIndex::new(i))).collect();
    let mut pred: Vec<Option<NodeIndex>> = vec![None; n];

    for &v in &topo {
        let through_v = best[v.index()];
        for s in graph.successors(v) {
            let candidate = through_v + graph.hours(s);
            if candidate > best[s.index()] {
                best[s.index()] = candidate;
                pred[s.index()] = Some(v);
            }
        }
    }

    let mut end = topo[0];
    for &v in &topo {
        if best[v.index()] > best[end.index()] {
            end = v;
        }
    }

    let mut path_idx = vec![end];
    let mut cursor = end;
    while let Some(p) = pred[cursor.index()] {
        path_idx.push(p);
        cursor = p;
    }
    path_idx.reverse();

    let result = CriticalPath {
        path: path_idx.iter().map(|&i| graph.node_id(i)).collect(),
        total_hours: best[end.index()],
    };
    debug!(
        length = result.len(),
        hours = result.total_hours,
        "critical path computed"
    );
    Ok(result)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
