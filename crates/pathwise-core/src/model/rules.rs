use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::error::ModelError;

/// Named structural checks a roadmap can be validated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationRule {
    NoCycles,
    ConnectedGraph,
    ReasonableHours,
    ConsistentPrerequisites,
}

impl ValidationRule {
    pub const ALL: [Self; 4] = [
        Self::NoCycles,
        Self::ConnectedGraph,
        Self::ReasonableHours,
        Self::ConsistentPrerequisites,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NoCycles => "no_cycles",
            Self::ConnectedGraph => "connected_graph",
            Self::ReasonableHours => "reasonable_hours",
            Self::ConsistentPrerequisites => "consistent_prerequisites",
        }
    }
}

impl fmt::Display for ValidationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValidationRule {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|rule| rule.as_str() == normalized)
            .ok_or_else(|| ModelError::InvalidEnumValue {
                expected: "validation rule",
                got: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::ValidationRule;

    #[test]
    fn parse_accepts_kebab_case() {
        assert_eq!(
            "no-cycles".parse::<ValidationRule>().unwrap(),
            ValidationRule::NoCycles
        );
        assert_eq!(
            " Consistent_Prerequisites ".parse::<ValidationRule>().unwrap(),
            ValidationRule::ConsistentPrerequisites
        );
        assert!("fast".parse::<ValidationRule>().is_err());
    }

    #[test]
    fn display_round_trips_through_parse() {
        for rule in ValidationRule::ALL {
            assert_eq!(rule.to_string().parse::<ValidationRule>().unwrap(), rule);
        }
    }
}
