#![forbid(unsafe_code)]
//! pathwise-schedule library.
//!
//! Turns a validated roadmap plus a learner's time budget into a dated study
//! calendar.
//!
//! | Module | Responsibility |
//! |--------|----------------|
//! | [`calendar`] | start date resolution, study-day generation |
//! | [`requirements`] | remaining hours from progress |
//! | [`realism`] | feasibility estimate, study intensity |
//! | [`distribute`] | per-day hour allocation |
//! | [`sessions`] | session packing with breaks |
//! | [`weekly`] | week-level totals |
//! | [`plan`] | the full pipeline and its cached variant |
//!
//! # Conventions
//!
//! - **Determinism**: every function takes `today` explicitly; nothing reads
//!   the clock.
//! - **Errors**: only [`plan`] fails, with [`PlanError`]. Infeasible budgets
//!   are reported through [`RealismEstimate`], never as errors.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod calendar;
pub mod distribute;
pub mod plan;
pub mod realism;
pub mod requirements;
pub mod sessions;
pub mod weekly;

pub use calendar::{available_study_days, parse_date, resolve_start_date};
pub use distribute::{DailyAllocation, NodeAllocation, NodeDemand, distribute_study_time};
pub use plan::{DayPlan, PlanError, PlanRequest, StudyPlan, plan_with_cache, sequence_and_schedule};
pub use realism::{
    IntensityLevel, RealismEstimate, StudyIntensity, estimate_realistic_completion,
    study_intensity,
};
pub use requirements::{NodeRequirement, RemainingWork, estimate_remaining, required_hours};
pub use sessions::{ActivityType, StudySession, pack_sessions};
pub use weekly::{WeeklyBreakdown, weekly_breakdown, weekly_from_allocations};
