use std::fmt;

use crate::model::constraints::{MAX_DAILY_HOURS, MAX_TARGET_DAYS, MIN_DAILY_HOURS};

/// Machine-readable error codes for agent-friendly decision making.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    InvalidConfigValue,
    InvalidConstraints,
    DuplicateNodeId,
    CycleDetected,
    InvalidEnumValue,
    InvalidHours,
    DuplicateProgress,
    MasteryOutOfRange,
    InputParseError,
    InputReadFailed,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1001",
            Self::InvalidConfigValue => "E1002",
            Self::InvalidConstraints => "E2001",
            Self::DuplicateNodeId => "E2002",
            Self::CycleDetected => "E2003",
            Self::InvalidEnumValue => "E2004",
            Self::InvalidHours => "E2005",
            Self::DuplicateProgress => "E2006",
            Self::MasteryOutOfRange => "E2007",
            Self::InputParseError => "E3001",
            Self::InputReadFailed => "E5001",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigParseError => "Config file parse error",
            Self::InvalidConfigValue => "Invalid config value",
            Self::InvalidConstraints => "Invalid time constraints",
            Self::DuplicateNodeId => "Duplicate node ID",
            Self::CycleDetected => "Prerequisite cycle detected",
            Self::InvalidEnumValue => "Invalid difficulty/status value",
            Self::InvalidHours => "Invalid estimated hours",
            Self::DuplicateProgress => "Duplicate progress record",
            Self::MasteryOutOfRange => "Mastery score out of range",
            Self::InputParseError => "Input file parse error",
            Self::InputReadFailed => "Input file read failed",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint that can be surfaced to operators and agents.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => Some("Fix syntax in .pathwise/config.toml and retry."),
            Self::InvalidConfigValue => Some("Use positive values for every schedule and realism setting."),
            Self::InvalidConstraints => {
                Some("Use 1-365 target days and 0.5-12 daily hours.")
            }
            Self::DuplicateNodeId => Some("Give every knowledge node a unique id."),
            Self::CycleDetected => {
                Some("Remove one prerequisite edge from each reported cycle and retry.")
            }
            Self::InvalidEnumValue => Some(
                "Use easy|medium|hard for difficulty and not_started|next|needs_review|completed for status.",
            ),
            Self::InvalidHours => Some("Estimated hours must be finite and non-negative."),
            Self::DuplicateProgress => Some("Keep at most one progress record per node."),
            Self::MasteryOutOfRange => Some("Mastery scores range from 0 to 100."),
            Self::InputParseError => Some("Check the file is valid JSON, YAML, or TOML."),
            Self::InputReadFailed => Some("Check the path exists and is readable."),
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Shape violations in caller-supplied model data.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    #[error("invalid {expected}: '{got}'")]
    InvalidEnumValue { expected: &'static str, got: String },

    #[error("duplicate node id '{0}'")]
    DuplicateNodeId(String),

    #[error("node '{node_id}' has invalid estimated hours {hours}")]
    InvalidHours { node_id: String, hours: f64 },

    #[error("more than one progress record for node '{0}'")]
    DuplicateProgress(String),

    #[error("node '{node_id}' has mastery score {score}, expected 0-100")]
    MasteryOutOfRange { node_id: String, score: f64 },

    #[error("target_days must be between 1 and {MAX_TARGET_DAYS}, got {0}")]
    TargetDaysOutOfRange(u32),

    #[error("daily_hours must be between {MIN_DAILY_HOURS} and {MAX_DAILY_HOURS}, got {0}")]
    DailyHoursOutOfRange(f64),
}

impl ModelError {
    /// The stable [`ErrorCode`] for this failure.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::InvalidEnumValue { .. } => ErrorCode::InvalidEnumValue,
            Self::DuplicateNodeId(_) => ErrorCode::DuplicateNodeId,
            Self::InvalidHours { .. } => ErrorCode::InvalidHours,
            Self::DuplicateProgress(_) => ErrorCode::DuplicateProgress,
            Self::MasteryOutOfRange { .. } => ErrorCode::MasteryOutOfRange,
            Self::TargetDaysOutOfRange(_) | Self::DailyHoursOutOfRange(_) => {
                ErrorCode::InvalidConstraints
            }
        }
    }

    /// Remediation text for CLI and API callers.
    #[must_use]
    pub fn suggestion(&self) -> String {
        self.error_code()
            .hint()
            .unwrap_or("Correct the input and retry.")
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::{ErrorCode, ModelError};
    use std::collections::HashSet;

    const ALL: [ErrorCode; 12] = [
        ErrorCode::ConfigParseError,
        ErrorCode::InvalidConfigValue,
        ErrorCode::InvalidConstraints,
        ErrorCode::DuplicateNodeId,
        ErrorCode::CycleDetected,
        ErrorCode::InvalidEnumValue,
        ErrorCode::InvalidHours,
        ErrorCode::DuplicateProgress,
        ErrorCode::MasteryOutOfRange,
        ErrorCode::InputParseError,
        ErrorCode::InputReadFailed,
        ErrorCode::InternalUnexpected,
    ];

    #[test]
    fn all_codes_are_unique() {
        let mut seen = HashSet::new();
        for code in ALL {
            assert!(seen.insert(code.code()), "duplicate code {}", code.code());
        }
    }

    #[test]
    fn code_format_is_machine_friendly() {
        for code in ALL {
            let text = code.code();
            assert_eq!(text.len(), 5);
            assert!(text.starts_with('E'));
            assert!(text.chars().skip(1).all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn constraint_errors_share_a_code() {
        assert_eq!(
            ModelError::TargetDaysOutOfRange(0).error_code(),
            ErrorCode::InvalidConstraints
        );
        assert_eq!(
            ModelError::DailyHoursOutOfRange(20.0).error_code(),
            ErrorCode::InvalidConstraints
        );
    }

    #[test]
    fn messages_name_the_offender() {
        let err = ModelError::DuplicateNodeId("rust-basics".to_string());
        assert_eq!(err.to_string(), "duplicate node id 'rust-basics'");

        let err = ModelError::DailyHoursOutOfRange(13.0);
        assert!(err.to_string().contains("0.5"), "{err}");
        assert!(err.to_string().contains("13"), "{err}");
        assert!(err.suggestion().contains("daily hours"));
    }
}
