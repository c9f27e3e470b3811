//! End-to-end plan synthesis: sequence a roadmap, then lay it on a calendar.
//!
//! ```text
//! PlanRequest
//!   ├─ constraints.validate(), roadmap.validate_shape()
//!   ├─ RoadmapGraph::from_parts()
//!   ├─ suggest_sequence()         → study order (refuses cycles)
//!   ├─ estimate_remaining()       → hours per node
//!   ├─ available_study_days()     → dates
//!   ├─ distribute_study_time()    → DailyAllocation per date
//!   ├─ pack_sessions()            → StudySession per allocation
//!   └─ weekly_from_allocations()  → WeeklyBreakdown
//! ```

use chrono::NaiveDate;
use pathwise_core::{
    ErrorCode, KnowledgeNode, ModelError, PlannerConfig, PrerequisiteEdge, ProgressIndex,
    ProgressRecord, ResultCache, Roadmap, TimeConstraints, stable_key,
};
use pathwise_graph::{
    GraphError, LearningSequence, RoadmapGraph, format_cycle, suggest_sequence,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::calendar::{available_study_days, resolve_start_date};
use crate::distribute::{NodeAllocation, NodeDemand, distribute_study_time};
use crate::realism::{
    RealismEstimate, StudyIntensity, estimate_realistic_completion, study_intensity,
};
use crate::requirements::{RemainingWork, estimate_remaining};
use crate::sessions::{StudySession, pack_sessions};
use crate::weekly::{WeeklyBreakdown, weekly_from_allocations};

/// Cache namespace for study plans.
const PLAN_CACHE_NAMESPACE: &str = "plan";

/// Everything needed to build a study plan.
///
/// The roadmap fields sit at the top level, so a request file reads
/// `{"nodes": [...], "edges": [...], "progress": [...], "constraints": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRequest {
    #[serde(flatten)]
    pub roadmap: Roadmap,
    #[serde(default)]
    pub progress: Vec<ProgressRecord>,
    pub constraints: TimeConstraints,
}

impl PlanRequest {
    #[must_use]
    pub const fn new(roadmap: Roadmap, constraints: TimeConstraints) -> Self {
        Self {
            roadmap,
            progress: Vec::new(),
            constraints,
        }
    }

    #[must_use]
    pub fn with_progress(mut self, progress: Vec<ProgressRecord>) -> Self {
        self.progress = progress;
        self
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    #[error("invalid time constraints: {0}")]
    InvalidConstraints(#[source] ModelError),

    #[error("invalid roadmap: {0}")]
    InvalidRoadmap(#[source] ModelError),

    #[error("cannot schedule a cyclic roadmap ({} cycle(s), first: {})", .cycles.len(), first_cycle(.cycles))]
    CyclicGraph { cycles: Vec<Vec<String>> },
}

impl PlanError {
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::InvalidConstraints(e) | Self::InvalidRoadmap(e) => e.error_code(),
            Self::CyclicGraph { .. } => ErrorCode::CycleDetected,
        }
    }
}

fn first_cycle(cycles: &[Vec<String>]) -> String {
    cycles
        .first()
        .map_or_else(|| "(none)".to_string(), |c| format_cycle(c))
}

/// One study day of the plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayPlan {
    /// 1-based position in the study calendar.
    pub day: usize,
    pub date: NaiveDate,
    pub allocations: Vec<NodeAllocation>,
    pub sessions: Vec<StudySession>,
    pub total_hours: f64,
}

impl DayPlan {
    #[must_use]
    pub fn hours_for(&self, node_id: &str) -> Option<f64> {
        self.allocations
            .iter()
            .find(|a| a.node_id == node_id)
            .map(|a| a.hours)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudyPlan {
    pub start_date: NaiveDate,
    pub study_days: Vec<NaiveDate>,
    pub sequence: LearningSequence,
    pub remaining: RemainingWork,
    pub realism: RealismEstimate,
    pub intensity: StudyIntensity,
    pub days: Vec<DayPlan>,
    pub weekly: WeeklyBreakdown,
}

impl StudyPlan {
    /// Plan for a roadmap with no nodes. The calendar is still reported.
    #[must_use]
    pub fn empty(
        start_date: NaiveDate,
        study_days: Vec<NaiveDate>,
        constraints: &TimeConstraints,
        config: &PlannerConfig,
    ) -> Self {
        Self {
            start_date,
            study_days,
            sequence: LearningSequence::default(),
            remaining: RemainingWork::default(),
            realism: estimate_realistic_completion(
                constraints.target_days,
                constraints.daily_hours,
                0.0,
                &config.realism,
            ),
            intensity: study_intensity(constraints.daily_hours, 0, constraints.target_days),
            days: Vec::new(),
            weekly: WeeklyBreakdown::default(),
        }
    }

    /// `true` when the roadmap had no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.remaining.per_node.is_empty()
    }

    #[must_use]
    pub fn total_scheduled_hours(&self) -> f64 {
        self.days.iter().map(|d| d.total_hours).sum()
    }

    #[must_use]
    pub fn session_count(&self) -> usize {
        self.days.iter().map(|d| d.sessions.len()).sum()
    }
}

/// Build a dated study plan for `request`.
///
/// # Errors
///
/// - [`PlanError::InvalidConstraints`] when the time budget is out of range.
/// - [`PlanError::InvalidRoadmap`] for duplicate ids, bad hours or bad
///   progress records.
/// - [`PlanError::CyclicGraph`] when prerequisites form a cycle.
#[instrument(skip_all, fields(nodes = request.roadmap.nodes.len(), %today))]
pub fn sequence_and_schedule(
    request: &PlanRequest,
    config: &PlannerConfig,
    today: NaiveDate,
) -> Result<StudyPlan, PlanError> {
    let constraints = &request.constraints;
    constraints
        .validate()
        .map_err(PlanError::InvalidConstraints)?;
    request
        .roadmap
        .validate_shape(&request.progress)
        .map_err(PlanError::InvalidRoadmap)?;
    let progress =
        ProgressIndex::from_records(&request.progress).map_err(PlanError::InvalidRoadmap)?;

    let graph = RoadmapGraph::from_parts(&request.roadmap.nodes, &request.roadmap.edges);
    let sequence = suggest_sequence(&graph, &progress).map_err(|e| match e {
        GraphError::Cyclic { cycles } => PlanError::CyclicGraph { cycles },
    })?;

    let start_date = resolve_start_date(constraints.start_date.as_deref(), today);
    let study_days = available_study_days(
        start_date,
        constraints.target_days,
        constraints.exclude_weekends,
    );
    if study_days.len() < constraints.target_days as usize {
        warn!(
            wanted = constraints.target_days,
            found = study_days.len(),
            "calendar scan cap reached before the target day count"
        );
    }

    if request.roadmap.is_empty() {
        debug!("empty roadmap, returning calendar only");
        return Ok(StudyPlan::empty(start_date, study_days, constraints, config));
    }

    let remaining = estimate_remaining(&request.roadmap.nodes, &progress);
    let realism = estimate_realistic_completion(
        constraints.target_days,
        constraints.daily_hours,
        remaining.total_remaining_hours,
        &config.realism,
    );
    let intensity = study_intensity(
        constraints.daily_hours,
        request.roadmap.nodes.len(),
        constraints.target_days,
    );

    let demands = sequenced_demands(&sequence, &remaining);
    let allocations = distribute_study_time(
        &demands,
        &study_days,
        constraints.daily_hours,
        &config.schedule,
    );

    let weekly = weekly_from_allocations(
        &allocations,
        study_days.first().copied().unwrap_or(start_date),
    );
    let days: Vec<DayPlan> = allocations
        .into_iter()
        .enumerate()
        .map(|(i, daily)| {
            let sessions =
                pack_sessions(constraints.daily_hours, &daily.allocations, &config.schedule);
            DayPlan {
                day: i + 1,
                date: daily.date,
                total_hours: daily.total_hours(),
                allocations: daily.allocations,
                sessions,
            }
        })
        .collect();

    let plan = StudyPlan {
        start_date,
        study_days,
        sequence,
        remaining,
        realism,
        intensity,
        days,
        weekly,
    };
    info!(
        sequenced = plan.sequence.len(),
        scheduled_hours = plan.total_scheduled_hours(),
        sessions = plan.session_count(),
        realistic = plan.realism.is_target_realistic,
        "study plan built"
    );
    Ok(plan)
}

/// Sequenced nodes with work left, weighted so earlier positions win.
#[allow(clippy::cast_precision_loss)]
fn sequenced_demands(sequence: &LearningSequence, remaining: &RemainingWork) -> Vec<NodeDemand> {
    let len = sequence.order.len();
    sequence
        .order
        .iter()
        .enumerate()
        .filter_map(|(pos, id)| {
            let hours = remaining.hours_for(id)?;
            (hours > 0.0).then(|| NodeDemand::new(id.clone(), hours).with_priority((len - pos) as f64))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Caching
// ---------------------------------------------------------------------------

/// Order-insensitive view of a request for cache keys. Node order is kept
/// because it breaks sequencing ties.
#[derive(Serialize)]
struct PlanKey<'a> {
    nodes: &'a [KnowledgeNode],
    edges: Vec<&'a PrerequisiteEdge>,
    progress: Vec<&'a ProgressRecord>,
    constraints: &'a TimeConstraints,
    today: NaiveDate,
    config: &'a PlannerConfig,
}

impl<'a> PlanKey<'a> {
    fn new(request: &'a PlanRequest, config: &'a PlannerConfig, today: NaiveDate) -> Self {
        let mut edges: Vec<&PrerequisiteEdge> = request.roadmap.edges.iter().collect();
        edges.sort_by(|a, b| {
            (&a.from, &a.to, &a.relation_type).cmp(&(&b.from, &b.to, &b.relation_type))
        });
        let mut progress: Vec<&ProgressRecord> = request.progress.iter().collect();
        progress.sort_by(|a, b| a.node_id.cmp(&b.node_id));
        Self {
            nodes: &request.roadmap.nodes,
            edges,
            progress,
            constraints: &request.constraints,
            today,
            config,
        }
    }
}

/// [`sequence_and_schedule`] memoized through a caller-owned cache.
///
/// Only successful plans are stored. If the request cannot be hashed the
/// plan is computed without touching the cache.
///
/// # Errors
///
/// Same as [`sequence_and_schedule`].
pub fn plan_with_cache<C: ResultCache<StudyPlan>>(
    request: &PlanRequest,
    config: &PlannerConfig,
    today: NaiveDate,
    cache: &mut C,
) -> Result<StudyPlan, PlanError> {
    let key = match stable_key(PLAN_CACHE_NAMESPACE, &PlanKey::new(request, config, today)) {
        Ok(key) => key,
        Err(err) => {
            warn!(error = %err, "plan request not hashable, skipping cache");
            return sequence_and_schedule(request, config, today);
        }
    };

    if let Some(plan) = cache.get(&key) {
        debug!(%key, "plan cache hit");
        return Ok(plan);
    }

    let plan = sequence_and_schedule(request, config, today)?;
    cache.set(key, plan.clone());
    Ok(plan)
}
