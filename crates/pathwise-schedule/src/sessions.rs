//! Splitting a day's allocations into bounded study sessions.
//!
//! Times are whole minutes from the start of the study day. Breaks are not
//! emitted as sessions; they only advance the clock.

use crate::distribute::NodeAllocation;
use pathwise_core::config::ScheduleConfig;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Breaks are only inserted when more than this many minutes remain.
const BREAK_SLACK_MINUTES: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    DeepLearning,
    FocusedStudy,
    ReviewPractice,
}

impl ActivityType {
    /// Classify a session by length. `None` below 15 minutes.
    #[must_use]
    pub const fn from_minutes(minutes: u32) -> Option<Self> {
        match minutes {
            60.. => Some(Self::DeepLearning),
            30..=59 => Some(Self::FocusedStudy),
            15..=29 => Some(Self::ReviewPractice),
            _ => None,
        }
    }

    const fn as_str(self) -> &'static str {
        match self {
            Self::DeepLearning => "deep_learning",
            Self::FocusedStudy => "focused_study",
            Self::ReviewPractice => "review_practice",
        }
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudySession {
    pub node_id: String,
    /// Minutes from the start of the day.
    pub start_minute: u32,
    pub duration_minutes: u32,
    pub activity_type: ActivityType,
}

impl StudySession {
    #[must_use]
    pub const fn end_minute(&self) -> u32 {
        self.start_minute + self.duration_minutes
    }
}

/// Pack `allocations` into sessions within a `daily_hours` day.
///
/// Nodes are taken largest allocation first (ties by id). Each session is
/// capped by the node's remaining minutes, `max_session_minutes`,
/// `break_interval_minutes` and what is left of the day. A session that
/// would fall under `min_session_minutes` ends packing for that node.
#[must_use]
pub fn pack_sessions(
    daily_hours: f64,
    allocations: &[NodeAllocation],
    config: &ScheduleConfig,
) -> Vec<StudySession> {
    let day_minutes = whole_minutes(daily_hours);

    let mut ordered: Vec<&NodeAllocation> = allocations.iter().collect();
    ordered.sort_by(|a, b| {
        b.hours
            .total_cmp(&a.hours)
            .then_with(|| a.node_id.cmp(&b.node_id))
    });

    let mut sessions = Vec::new();
    let mut clock = 0u32;
    for alloc in ordered {
        let mut remaining = whole_minutes(alloc.hours);
        while remaining > 0 && clock < day_minutes {
            let length = remaining
                .min(config.max_session_minutes)
                .min(config.break_interval_minutes)
                .min(day_minutes - clock);
            if length < config.min_session_minutes {
                break;
            }
            let Some(activity_type) = ActivityType::from_minutes(length) else {
                break;
            };

            sessions.push(StudySession {
                node_id: alloc.node_id.clone(),
                start_minute: clock,
                duration_minutes: length,
                activity_type,
            });
            clock += length;
            remaining -= length;

            if remaining > 0 && clock + BREAK_SLACK_MINUTES < day_minutes {
                clock += config.max_break_minutes.min((day_minutes - clock) / 10);
            }
        }
    }
    sessions
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn whole_minutes(hours: f64) -> u32 {
    (hours * 60.0).round().max(0.0) as u32
}
