use serde::{Deserialize, Serialize};

use crate::error::ModelError;

pub const MIN_DAILY_HOURS: f64 = 0.5;
pub const MAX_DAILY_HOURS: f64 = 12.0;
pub const MAX_TARGET_DAYS: u32 = 365;

/// Time budget a learner commits to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeConstraints {
    #[serde(alias = "targetDays")]
    pub target_days: u32,
    #[serde(alias = "dailyHours")]
    pub daily_hours: f64,
    /// `YYYY-MM-DD`. Unparsable or absent dates fall back to today.
    #[serde(default, alias = "startDate", skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, alias = "excludeWeekends")]
    pub exclude_weekends: bool,
}

impl TimeConstraints {
    #[must_use]
    pub const fn new(target_days: u32, daily_hours: f64) -> Self {
        Self {
            target_days,
            daily_hours,
            start_date: None,
            exclude_weekends: false,
        }
    }

    /// # Errors
    ///
    /// Returns [`ModelError::TargetDaysOutOfRange`] or
    /// [`ModelError::DailyHoursOutOfRange`].
    pub fn validate(&self) -> Result<(), ModelError> {
        if !(1..=MAX_TARGET_DAYS).contains(&self.target_days) {
            return Err(ModelError::TargetDaysOutOfRange(self.target_days));
        }
        if !(MIN_DAILY_HOURS..=MAX_DAILY_HOURS).contains(&self.daily_hours) {
            return Err(ModelError::DailyHoursOutOfRange(self.daily_hours));
        }
        Ok(())
    }

    /// Hours available across the whole target window.
    #[must_use]
    pub fn total_hours(&self) -> f64 {
        f64::from(self.target_days) * self.daily_hours
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_are_inclusive() {
        assert!(TimeConstraints::new(1, 0.5).validate().is_ok());
        assert!(TimeConstraints::new(365, 12.0).validate().is_ok());
    }

    #[test]
    fn out_of_range_values_rejected() {
        assert_eq!(
            TimeConstraints::new(0, 2.0).validate(),
            Err(ModelError::TargetDaysOutOfRange(0))
        );
        assert_eq!(
            TimeConstraints::new(366, 2.0).validate(),
            Err(ModelError::TargetDaysOutOfRange(366))
        );
        assert!(matches!(
            TimeConstraints::new(10, 0.25).validate(),
            Err(ModelError::DailyHoursOutOfRange(_))
        ));
        assert!(TimeConstraints::new(10, f64::NAN).validate().is_err());
    }

    #[test]
    fn deserializes_camel_case_fields() {
        let c: TimeConstraints = serde_json::from_str(
            r#"{"targetDays": 14, "dailyHours": 2, "startDate": "2024-01-01", "excludeWeekends": true}"#,
        )
        .unwrap();
        assert_eq!(c.target_days, 14);
        assert!(c.exclude_weekends);
        assert_eq!(c.start_date.as_deref(), Some("2024-01-01"));
        assert!((c.total_hours() - 28.0).abs() < 1e-12);
    }
}
