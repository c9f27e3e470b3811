use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::{fmt, str::FromStr};

use crate::error::ModelError;

/// Learner status for a single node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressStatus {
    #[default]
    NotStarted,
    Next,
    NeedsReview,
    Completed,
}

impl ProgressStatus {
    const fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::Next => "next",
            Self::NeedsReview => "needs_review",
            Self::Completed => "completed",
        }
    }

    /// Share of a node's estimate still left to study.
    #[must_use]
    pub const fn remaining_fraction(self) -> f64 {
        match self {
            Self::NotStarted => 1.0,
            Self::Next => 0.7,
            Self::NeedsReview => 0.3,
            Self::Completed => 0.0,
        }
    }

    #[must_use]
    pub const fn is_completed(self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl fmt::Display for ProgressStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProgressStatus {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        match normalized.as_str() {
            "not_started" => Ok(Self::NotStarted),
            "next" => Ok(Self::Next),
            "needs_review" => Ok(Self::NeedsReview),
            "completed" => Ok(Self::Completed),
            _ => Err(ModelError::InvalidEnumValue {
                expected: "progress status",
                got: s.to_string(),
            }),
        }
    }
}

/// One learner's standing on one node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressRecord {
    #[serde(alias = "nodeId")]
    pub node_id: String,
    #[serde(default)]
    pub status: ProgressStatus,
    #[serde(default, alias = "masteryScore")]
    pub mastery_score: f64,
    #[serde(default, alias = "studyMinutes")]
    pub study_minutes: u32,
}

impl ProgressRecord {
    #[must_use]
    pub fn new(node_id: impl Into<String>, status: ProgressStatus) -> Self {
        Self {
            node_id: node_id.into(),
            status,
            mastery_score: 0.0,
            study_minutes: 0,
        }
    }

    /// # Errors
    ///
    /// Returns [`ModelError::MasteryOutOfRange`] when the score is outside 0-100.
    pub fn validate(&self) -> Result<(), ModelError> {
        if (0.0..=100.0).contains(&self.mastery_score) {
            Ok(())
        } else {
            Err(ModelError::MasteryOutOfRange {
                node_id: self.node_id.clone(),
                score: self.mastery_score,
            })
        }
    }
}

/// Status lookup keyed by node id. Missing nodes read as `not_started`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProgressIndex {
    records: HashMap<String, ProgressRecord>,
}

impl ProgressIndex {
    /// Build the index, rejecting duplicate or out-of-range records.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::DuplicateProgress`] when two records share a
    /// node id, or the record's own validation error.
    pub fn from_records(records: &[ProgressRecord]) -> Result<Self, ModelError> {
        let mut map = HashMap::with_capacity(records.len());
        for record in records {
            record.validate()?;
            if map.insert(record.node_id.clone(), record.clone()).is_some() {
                return Err(ModelError::DuplicateProgress(record.node_id.clone()));
            }
        }
        Ok(Self { records: map })
    }

    #[must_use]
    pub fn status_of(&self, node_id: &str) -> ProgressStatus {
        self.records
            .get(node_id)
            .map_or(ProgressStatus::NotStarted, |r| r.status)
    }

    #[must_use]
    pub fn get(&self, node_id: &str) -> Option<&ProgressRecord> {
        self.records.get(node_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
