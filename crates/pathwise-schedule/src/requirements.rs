//! Remaining study hours derived from learner progress.
//!
//! | Status | Share of the estimate still required |
//! |--------|--------------------------------------|
//! | `not_started` | 100% |
//! | `next` | 70% |
//! | `needs_review` | 30% |
//! | `completed` | 0% |

use pathwise_core::{KnowledgeNode, ProgressIndex, ProgressStatus};
use serde::{Deserialize, Serialize};

/// Remaining hours for one node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRequirement {
    pub node_id: String,
    pub status: ProgressStatus,
    pub remaining_hours: f64,
}

/// Roadmap-wide remaining work.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RemainingWork {
    /// One entry per node, in input order.
    pub per_node: Vec<NodeRequirement>,
    pub total_remaining_hours: f64,
    /// Part of the total owed to `needs_review` nodes.
    pub review_hours: f64,
    /// Part of the total owed to `not_started` and `next` nodes.
    pub new_learning_hours: f64,
    /// Estimated hours of nodes already completed.
    pub completed_hours: f64,
    pub completed_nodes: usize,
    pub remaining_nodes: usize,
    /// Completed nodes over all nodes, `0.0` for an empty roadmap.
    pub completion_ratio: f64,
}

impl RemainingWork {
    #[must_use]
    pub fn hours_for(&self, node_id: &str) -> Option<f64> {
        self.per_node
            .iter()
            .find(|r| r.node_id == node_id)
            .map(|r| r.remaining_hours)
    }
}

/// Hours still required for `node` at `status`.
#[must_use]
pub fn required_hours(node: &KnowledgeNode, status: ProgressStatus) -> f64 {
    node.estimated_hours * status.remaining_fraction()
}

/// Sum remaining work over `nodes`. Nodes without a progress record count
/// as `not_started`.
#[must_use]
pub fn estimate_remaining(nodes: &[KnowledgeNode], progress: &ProgressIndex) -> RemainingWork {
    let mut work = RemainingWork {
        per_node: Vec::with_capacity(nodes.len()),
        ..RemainingWork::default()
    };

    for node in nodes {
        let status = progress.status_of(&node.id);
        let hours = required_hours(node, status);
        match status {
            ProgressStatus::Completed => {
                work.completed_nodes += 1;
                work.completed_hours += node.estimated_hours;
            }
            ProgressStatus::NeedsReview => work.review_hours += hours,
            ProgressStatus::NotStarted | ProgressStatus::Next => work.new_learning_hours += hours,
        }
        work.per_node.push(NodeRequirement {
            node_id: node.id.clone(),
            status,
            remaining_hours: hours,
        });
    }

    work.total_remaining_hours = work.review_hours + work.new_learning_hours;
    work.remaining_nodes = nodes.len() - work.completed_nodes;
    work.completion_ratio = if nodes.is_empty() {
        0.0
    } else {
        ratio(work.completed_nodes, nodes.len())
    };
    work
}

#[allow(clippy::cast_precision_loss)]
fn ratio(part: usize, whole: usize) -> f64 {
    part as f64 / whole as f64
}
