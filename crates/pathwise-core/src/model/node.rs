use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::error::ModelError;

/// Relation label assumed when an edge does not carry one.
pub const DEFAULT_RELATION_TYPE: &str = "prerequisite";

/// How hard a knowledge node is to learn.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }

    /// Sequencing weight: easier material sorts first.
    #[must_use]
    pub const fn weight(self) -> u8 {
        match self {
            Self::Easy => 1,
            Self::Medium => 2,
            Self::Hard => 3,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            _ => Err(ModelError::InvalidEnumValue {
                expected: "difficulty",
                got: s.to_string(),
            }),
        }
    }
}

/// A unit of learnable material.
///
/// Owned by the caller and never mutated by the engines. The
/// `prerequisites` list is advisory: analysis always follows the edge list,
/// and validation reports any disagreement between the two.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeNode {
    pub id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(alias = "estimatedHours")]
    pub estimated_hours: f64,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub prerequisites: Vec<String>,
}

impl KnowledgeNode {
    /// Convenience constructor for a node without title or prerequisites.
    #[must_use]
    pub fn new(id: impl Into<String>, estimated_hours: f64, difficulty: Difficulty) -> Self {
        Self {
            id: id.into(),
            title: String::new(),
            estimated_hours,
            difficulty,
            prerequisites: Vec::new(),
        }
    }

    /// Builder-style helper to declare node-level prerequisites.
    #[must_use]
    pub fn with_prerequisites<I, S>(mut self, prerequisites: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.prerequisites = prerequisites.into_iter().map(Into::into).collect();
        self
    }

    /// Title when present, otherwise the id.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.title.is_empty() {
            &self.id
        } else {
            &self.title
        }
    }

    /// Check the node's own fields (hours must be finite and non-negative).
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidHours`] on a negative or non-finite estimate.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.estimated_hours.is_finite() && self.estimated_hours >= 0.0 {
            Ok(())
        } else {
            Err(ModelError::InvalidHours {
                node_id: self.id.clone(),
                hours: self.estimated_hours,
            })
        }
    }
}

/// Directed "must come before" relation: `from` precedes `to`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PrerequisiteEdge {
    #[serde(alias = "from_node")]
    pub from: String,
    #[serde(alias = "to_node")]
    pub to: String,
    #[serde(default = "default_relation_type", alias = "relationType")]
    pub relation_type: String,
}

fn default_relation_type() -> String {
    DEFAULT_RELATION_TYPE.to_string()
}

impl PrerequisiteEdge {
    #[must_use]
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            relation_type: default_relation_type(),
        }
    }

    /// `true` unless the edge carries a non-default relation label.
    #[must_use]
    pub fn is_plain_prerequisite(&self) -> bool {
        self.relation_type.eq_ignore_ascii_case(DEFAULT_RELATION_TYPE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difficulty_weights_are_ordered() {
        assert!(Difficulty::Easy.weight() < Difficulty::Medium.weight());
        assert!(Difficulty::Medium.weight() < Difficulty::Hard.weight());
    }

    #[test]
    fn difficulty_parse_is_lenient_about_case() {
        assert_eq!("  HARD ".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        let err = "expert".parse::<Difficulty>().unwrap_err();
        assert_eq!(err.to_string(), "invalid difficulty: 'expert'");
    }

    #[test]
    fn node_deserializes_with_defaults() {
        let node: KnowledgeNode =
            serde_json::from_str(r#"{"id": "vars", "estimated_hours": 2.5}"#).unwrap();
        assert_eq!(node.difficulty, Difficulty::Medium);
        assert!(node.prerequisites.is_empty());
        assert_eq!(node.display_name(), "vars");
    }

    #[test]
    fn edge_accepts_from_node_aliases() {
        let edge: PrerequisiteEdge =
            serde_json::from_str(r#"{"from_node": "a", "to_node": "b"}"#).unwrap();
        assert_eq!(edge, PrerequisiteEdge::new("a", "b"));
        assert!(edge.is_plain_prerequisite());

        let related: PrerequisiteEdge =
            serde_json::from_str(r#"{"from": "a", "to": "b", "relation_type": "related"}"#)
                .unwrap();
        assert!(!related.is_plain_prerequisite());
    }

    #[test]
    fn negative_and_nan_hours_rejected() {
        assert!(KnowledgeNode::new("a", -1.0, Difficulty::Easy).validate().is_err());
        assert!(KnowledgeNode::new("a", f64::NAN, Difficulty::Easy).validate().is_err());
        assert!(KnowledgeNode::new("a", 0.0, Difficulty::Easy).validate().is_ok());
    }
}
