use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::node::{Difficulty, KnowledgeNode, PrerequisiteEdge};
use super::progress::ProgressRecord;
use crate::error::ModelError;

/// Node and edge lists as supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Roadmap {
    #[serde(default)]
    pub nodes: Vec<KnowledgeNode>,
    #[serde(default)]
    pub edges: Vec<PrerequisiteEdge>,
}

/// Node counts per difficulty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyDistribution {
    pub easy: usize,
    pub medium: usize,
    pub hard: usize,
}

impl Roadmap {
    #[must_use]
    pub const fn new(nodes: Vec<KnowledgeNode>, edges: Vec<PrerequisiteEdge>) -> Self {
        Self { nodes, edges }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Check ids and hours, plus any attached progress records.
    ///
    /// Dangling edge endpoints are not a shape error; graph validation
    /// reports them as issues.
    ///
    /// # Errors
    ///
    /// Returns the first [`ModelError`] found, in node order then progress order.
    pub fn validate_shape(&self, progress: &[ProgressRecord]) -> Result<(), ModelError> {
        let mut seen = HashSet::with_capacity(self.nodes.len());
        for node in &self.nodes {
            if !seen.insert(node.id.as_str()) {
                return Err(ModelError::DuplicateNodeId(node.id.clone()));
            }
            node.validate()?;
        }
        let mut with_progress = HashSet::with_capacity(progress.len());
        for record in progress {
            record.validate()?;
            if !with_progress.insert(record.node_id.as_str()) {
                return Err(ModelError::DuplicateProgress(record.node_id.clone()));
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn total_estimated_hours(&self) -> f64 {
        self.nodes.iter().map(|n| n.estimated_hours).sum()
    }

    #[must_use]
    pub fn difficulty_distribution(&self) -> DifficultyDistribution {
        let mut dist = DifficultyDistribution::default();
        for node in &self.nodes {
            match node.difficulty {
                Difficulty::Easy => dist.easy += 1,
                Difficulty::Medium => dist.medium += 1,
                Difficulty::Hard => dist.hard += 1,
            }
        }
        dist
    }
}
