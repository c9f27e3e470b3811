use pathwise_core::ErrorCode;

use crate::cycles::format_cycle;

/// Requests the analyzer refuses to answer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// Critical path and sequencing are undefined on cyclic input.
    #[error("prerequisite graph has {} cycle(s), first: {}", .cycles.len(), first_cycle(.cycles))]
    Cyclic { cycles: Vec<Vec<String>> },
}

impl GraphError {
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::Cyclic { .. } => ErrorCode::CycleDetected,
        }
    }
}

fn first_cycle(cycles: &[Vec<String>]) -> String {
    cycles
        .first()
        .map_or_else(|| "(none)".to_string(), |c| format_cycle(c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_first_cycle() {
        let err = GraphError::Cyclic {
            cycles: vec![
                vec!["a".into(), "b".into(), "a".into()],
                vec!["c".into(), "c".into()],
            ],
        };
        assert_eq!(
            err.to_string(),
            "prerequisite graph has 2 cycle(s), first: a -> b -> a"
        );
        assert_eq!(err.error_code().code(), "E2003");
    }
}
