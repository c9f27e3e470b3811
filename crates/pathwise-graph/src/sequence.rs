//! Greedy priority sequencing of what to study next.
//!
//! This is a frontier heuristic rather than a full topological schedule:
//!
//! 1. `completed` nodes are excluded. Walking nodes in input order, each one
//!    joins the completed set as it is reached, so it only satisfies
//!    prerequisites of nodes listed after it.
//! 2. `needs_review` nodes go first, with no prerequisite check.
//! 3. `not_started` and `next` nodes are eligible only when every edge
//!    prerequisite is in the completed set. Ineligible nodes are reported
//!    as blocked.
//! 4. Within the review group and within the fresh group, nodes sort by
//!    ascending `(difficulty weight, estimated hours)`, then input order.

use std::cmp::Ordering;
use std::collections::HashSet;

use pathwise_core::{ProgressIndex, ProgressStatus};
use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::build::RoadmapGraph;
use crate::cycles::detect_cycles;
use crate::error::GraphError;

/// Study order plus the nodes left out of it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningSequence {
    /// Node ids to study, review items first.
    pub order: Vec<String>,
    /// How many leading entries of `order` are reviews.
    pub review_count: usize,
    /// Fresh nodes waiting on an unfinished prerequisite, in input order.
    pub blocked: Vec<String>,
    /// Nodes already completed, in input order.
    pub completed: Vec<String>,
}

impl LearningSequence {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }
}

/// Propose a study order for `graph` given learner `progress`.
///
/// # Errors
///
/// Returns [`GraphError::Cyclic`] when the graph has a prerequisite cycle.
#[instrument(skip_all, fields(nodes = graph.node_count()))]
pub fn suggest_sequence(
    graph: &RoadmapGraph,
    progress: &ProgressIndex,
) -> Result<LearningSequence, GraphError> {
    let cycles = detect_cycles(graph);
    if !cycles.is_empty() {
        return Err(GraphError::Cyclic { cycles });
    }

    let status = |idx: NodeIndex| progress.status_of(&graph.node_id(idx));

    let mut completed_set: HashSet<NodeIndex> = HashSet::new();
    let mut review = Vec::new();
    let mut fresh = Vec::new();
    let mut blocked = Vec::new();
    let mut completed = Vec::new();

    for idx in graph.graph.node_indices() {
        match status(idx) {
            ProgressStatus::Completed => {
                completed_set.insert(idx);
                completed.push(graph.node_id(idx));
            }
            ProgressStatus::NeedsReview => review.push(idx),
            ProgressStatus::NotStarted | ProgressStatus::Next => {
                if graph
                    .predecessors(idx)
                    .iter()
                    .all(|p| completed_set.contains(p))
                {
                    fresh.push(idx);
                } else {
                    blocked.push(graph.node_id(idx));
                }
            }
        }
    }

    // Stable sort keeps input order for full ties.
    review.sort_by(|&a, &b| priority_cmp(graph, a, b));
    fresh.sort_by(|&a, &b| priority_cmp(graph, a, b));

    let review_count = review.len();
    let order: Vec<String> = review
        .into_iter()
        .chain(fresh)
        .map(|idx| graph.node_id(idx))
        .collect();

    debug!(
        ordered = order.len(),
        review = review_count,
        blocked = blocked.len(),
        completed = completed.len(),
        "sequence suggested"
    );

    Ok(LearningSequence {
        order,
        review_count,
        blocked,
        completed,
    })
}

fn priority_cmp(graph: &RoadmapGraph, a: NodeIndex, b: NodeIndex) -> Ordering {
    let (Some(na), Some(nb)) = (graph.graph.node_weight(a), graph.graph.node_weight(b)) else {
        return a.cmp(&b);
    };
    na.difficulty
        .weight()
        .cmp(&nb.difficulty.weight())
        .then_with(|| na.estimated_hours.total_cmp(&nb.estimated_hours))
}
