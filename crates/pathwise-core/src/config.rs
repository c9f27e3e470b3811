use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ErrorCode;
use crate::model::ValidationRule;

/// Project-local config location, relative to the working directory.
pub const PROJECT_CONFIG_PATH: &str = ".pathwise/config.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlannerConfig {
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub realism: RealismConfig,
    #[serde(default)]
    pub validation: ValidationConfig,
}

/// Allocation and session packing limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    #[serde(default = "default_max_node_hours_per_day")]
    pub max_node_hours_per_day: f64,
    #[serde(default = "default_min_allocation_hours")]
    pub min_allocation_hours: f64,
    #[serde(default = "default_max_session_minutes")]
    pub max_session_minutes: u32,
    #[serde(default = "default_break_interval_minutes")]
    pub break_interval_minutes: u32,
    #[serde(default = "default_max_break_minutes")]
    pub max_break_minutes: u32,
    #[serde(default = "default_min_session_minutes")]
    pub min_session_minutes: u32,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            max_node_hours_per_day: default_max_node_hours_per_day(),
            min_allocation_hours: default_min_allocation_hours(),
            max_session_minutes: default_max_session_minutes(),
            break_interval_minutes: default_break_interval_minutes(),
            max_break_minutes: default_max_break_minutes(),
            min_session_minutes: default_min_session_minutes(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RealismConfig {
    /// Share of nominal daily hours that turns into effective study.
    #[serde(default = "default_learning_efficiency")]
    pub learning_efficiency: f64,
    #[serde(default = "default_buffer_factor")]
    pub buffer_factor: f64,
}

impl Default for RealismConfig {
    fn default() -> Self {
        Self {
            learning_efficiency: default_learning_efficiency(),
            buffer_factor: default_buffer_factor(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationConfig {
    #[serde(default = "default_min_node_hours")]
    pub min_node_hours: f64,
    #[serde(default = "default_max_node_hours")]
    pub max_node_hours: f64,
    #[serde(default = "default_rules")]
    pub rules: Vec<ValidationRule>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            min_node_hours: default_min_node_hours(),
            max_node_hours: default_max_node_hours(),
            rules: default_rules(),
        }
    }
}

impl PlannerConfig {
    /// Reject values the engines cannot work with.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first offending key.
    pub fn validate(&self) -> Result<()> {
        let s = &self.schedule;
        positive("schedule.max_node_hours_per_day", s.max_node_hours_per_day)?;
        positive("schedule.min_allocation_hours", s.min_allocation_hours)?;
        positive("schedule.max_session_minutes", f64::from(s.max_session_minutes))?;
        positive(
            "schedule.break_interval_minutes",
            f64::from(s.break_interval_minutes),
        )?;
        positive("schedule.min_session_minutes", f64::from(s.min_session_minutes))?;

        let r = &self.realism;
        positive("realism.learning_efficiency", r.learning_efficiency)?;
        positive("realism.buffer_factor", r.buffer_factor)?;
        if r.learning_efficiency > 1.0 {
            bail!(
                "realism.learning_efficiency must be at most 1.0, got {}",
                r.learning_efficiency
            );
        }

        let v = &self.validation;
        positive("validation.max_node_hours", v.max_node_hours)?;
        if v.min_node_hours < 0.0 || v.min_node_hours > v.max_node_hours {
            bail!(
                "validation.min_node_hours must be between 0 and max_node_hours ({}), got {}",
                v.max_node_hours,
                v.min_node_hours
            );
        }
        Ok(())
    }
}

fn positive(key: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        bail!("{key} must be a positive number, got {value}")
    }
}

/// Load `.pathwise/config.toml` under `project_root`, or defaults when absent.
///
/// # Errors
///
/// Fails when the file exists but cannot be read, parsed, or validated.
pub fn load_project_config(project_root: &Path) -> Result<PlannerConfig> {
    let path = project_root.join(PROJECT_CONFIG_PATH);
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no project config, using defaults");
        return Ok(PlannerConfig::default());
    }
    load_config_file(&path)
}

/// Load an explicit config file. Unlike [`load_project_config`], a missing
/// file is an error.
///
/// # Errors
///
/// Fails when the file cannot be read, parsed, or validated.
pub fn load_config_file(path: &Path) -> Result<PlannerConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let config = toml::from_str::<PlannerConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("Invalid value in {}", path.display()))?;
    Ok(config)
}

/// Classify a failure from [`load_config_file`] or [`load_project_config`].
#[must_use]
pub fn config_error_code(err: &anyhow::Error) -> ErrorCode {
    if err.downcast_ref::<std::io::Error>().is_some() {
        ErrorCode::InputReadFailed
    } else if err.downcast_ref::<toml::de::Error>().is_some() {
        ErrorCode::ConfigParseError
    } else {
        ErrorCode::InvalidConfigValue
    }
}

const fn default_max_node_hours_per_day() -> f64 {
    2.0
}

const fn default_min_allocation_hours() -> f64 {
    0.25
}

const fn default_max_session_minutes() -> u32 {
    90
}

const fn default_break_interval_minutes() -> u32 {
    25
}

const fn default_max_break_minutes() -> u32 {
    10
}

const fn default_min_session_minutes() -> u32 {
    15
}

const fn default_learning_efficiency() -> f64 {
    0.75
}

const fn default_buffer_factor() -> f64 {
    1.2
}

const fn default_min_node_hours() -> f64 {
    0.5
}

const fn default_max_node_hours() -> f64 {
    40.0
}

fn default_rules() -> Vec<ValidationRule> {
    ValidationRule::ALL.to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_project_config(root: &Path, body: &str) {
        let dir = root.join(".pathwise");
        std::fs::create_dir_all(&dir).expect("create .pathwise");
        std::fs::write(dir.join("config.toml"), body).expect("write config");
    }

    #[test]
    fn missing_project_config_uses_defaults() {
        let root = tempfile::tempdir().expect("tempdir");
        let cfg = load_project_config(root.path()).expect("load should succeed");
        assert_eq!(cfg, PlannerConfig::default());
        assert_eq!(cfg.schedule.max_session_minutes, 90);
        assert_eq!(cfg.schedule.break_interval_minutes, 25);
        assert!((cfg.realism.buffer_factor - 1.2).abs() < 1e-12);
        assert_eq!(cfg.validation.rules.len(), 4);
    }

    #[test]
    fn partial_config_keeps_remaining_defaults() {
        let root = tempfile::tempdir().expect("tempdir");
        write_project_config(
            root.path(),
            r#"
[schedule]
max_session_minutes = 50

[validation]
rules = ["no_cycles", "reasonable_hours"]
"#,
        );
        let cfg = load_project_config(root.path()).expect("load");
        assert_eq!(cfg.schedule.max_session_minutes, 50);
        assert_eq!(cfg.schedule.min_session_minutes, 15);
        assert_eq!(
            cfg.validation.rules,
            vec![ValidationRule::NoCycles, ValidationRule::ReasonableHours]
        );
        assert!((cfg.realism.learning_efficiency - 0.75).abs() < 1e-12);
    }

    #[test]
    fn parse_error_names_the_file() {
        let root = tempfile::tempdir().expect("tempdir");
        write_project_config(root.path(), "[schedule\nmax_session_minutes = ");
        let err = load_project_config(root.path()).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse"), "{err:#}");
        assert_eq!(config_error_code(&err), ErrorCode::ConfigParseError);
    }

    #[test]
    fn non_positive_values_rejected() {
        let root = tempfile::tempdir().expect("tempdir");
        write_project_config(root.path(), "[realism]\nbuffer_factor = 0.0\n");
        let err = load_project_config(root.path()).unwrap_err();
        let text = format!("{err:#}");
        assert!(text.contains("realism.buffer_factor"), "{text}");
        assert_eq!(config_error_code(&err), ErrorCode::InvalidConfigValue);
    }

    #[test]
    fn explicit_file_must_exist() {
        let root = tempfile::tempdir().expect("tempdir");
        let err = load_config_file(&root.path().join("nope.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
        assert_eq!(config_error_code(&err), ErrorCode::InputReadFailed);
    }

    #[test]
    fn efficiency_above_one_rejected() {
        let mut cfg = PlannerConfig::default();
        cfg.realism.learning_efficiency = 1.5;
        assert!(cfg.validate().is_err());
        cfg.realism.learning_efficiency = 1.0;
        assert!(cfg.validate().is_ok());
    }
}
