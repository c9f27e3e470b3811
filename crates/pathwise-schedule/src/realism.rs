//! Feasibility estimates for a learner's time budget.
//!
//! Never fails: an infeasible target is reported numerically, with a
//! recommended number of days and hours instead of an error.

use pathwise_core::config::RealismConfig;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Daily load above which the plan is flagged as intense.
pub const INTENSITY_WARNING_HOURS: f64 = 4.0;

/// Daily load considered sustainable long term.
const SUSTAINABLE_DAILY_HOURS: f64 = 3.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RealismEstimate {
    pub is_target_realistic: bool,
    pub minimum_days_needed: u32,
    pub recommended_days: u32,
    pub recommended_daily_hours: f64,
    /// Slack between the recommendation and the minimum.
    pub buffer_days: u32,
    pub intensity_warning: bool,
    pub sustainability_score: f64,
}

/// Estimate whether `target_days × daily_hours` covers `total_required_hours`.
///
/// `minimum_days_needed = ceil(total × buffer / (daily × efficiency))`.
#[must_use]
pub fn estimate_realistic_completion(
    target_days: u32,
    daily_hours: f64,
    total_required_hours: f64,
    config: &RealismConfig,
) -> RealismEstimate {
    let buffered = total_required_hours * config.buffer_factor;
    let effective_daily = daily_hours * config.learning_efficiency;
    let minimum_days_needed = if buffered <= 0.0 {
        0
    } else {
        saturating_u32((buffered / effective_daily).ceil())
    };

    let recommended_days = target_days.max(minimum_days_needed);
    let recommended_daily_hours = buffered / f64::from(recommended_days.max(1));

    RealismEstimate {
        is_target_realistic: target_days >= minimum_days_needed,
        minimum_days_needed,
        recommended_days,
        recommended_daily_hours,
        buffer_days: recommended_days - minimum_days_needed,
        intensity_warning: daily_hours > INTENSITY_WARNING_HOURS,
        sustainability_score: (SUSTAINABLE_DAILY_HOURS / recommended_daily_hours.max(1.0))
            .min(1.0),
    }
}

// Saturates: +inf (zero effective budget) maps to u32::MAX, NaN to 0.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn saturating_u32(days: f64) -> u32 {
    days as u32
}

// ---------------------------------------------------------------------------
// Study intensity
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntensityLevel {
    Low,
    Moderate,
    Medium,
    High,
    VeryHigh,
}

impl IntensityLevel {
    #[must_use]
    pub fn from_daily_hours(daily_hours: f64) -> Self {
        if daily_hours >= 4.0 {
            Self::VeryHigh
        } else if daily_hours >= 3.0 {
            Self::High
        } else if daily_hours >= 2.0 {
            Self::Medium
        } else if daily_hours >= 1.0 {
            Self::Moderate
        } else {
            Self::Low
        }
    }

    const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Moderate => "moderate",
            Self::Medium => "medium",
            Self::High => "high",
            Self::VeryHigh => "very_high",
        }
    }
}

impl fmt::Display for IntensityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyIntensity {
    pub level: IntensityLevel,
    pub daily_hours: f64,
    pub weekly_hours: f64,
    pub nodes_per_week: f64,
    pub sustainability_score: f64,
    pub recommended_breaks: u32,
    pub suggested_session_minutes: f64,
}

/// Describe how demanding `daily_hours` is for `total_nodes` over `target_days`.
#[must_use]
pub fn study_intensity(daily_hours: f64, total_nodes: usize, target_days: u32) -> StudyIntensity {
    let sustainability_score = if daily_hours > 6.0 {
        0.3
    } else if daily_hours > 4.0 {
        0.6
    } else if daily_hours > 3.0 {
        0.8
    } else {
        1.0
    };
    let recommended_breaks = saturating_u32((daily_hours / 1.5).floor()).max(1);

    StudyIntensity {
        level: IntensityLevel::from_daily_hours(daily_hours),
        daily_hours,
        weekly_hours: daily_hours * 7.0,
        nodes_per_week: nodes_per_week(total_nodes, target_days),
        sustainability_score,
        recommended_breaks,
        suggested_session_minutes: (daily_hours * 60.0 / f64::from(recommended_breaks)).min(90.0),
    }
}

#[allow(clippy::cast_precision_loss)]
fn nodes_per_week(total_nodes: usize, target_days: u32) -> f64 {
    if target_days == 0 {
        return 0.0;
    }
    total_nodes as f64 / f64::from(target_days) * 7.0
}
