//! Day-by-day allocation of study hours across nodes.
//!
//! # Algorithm
//!
//! 1. `scale = min(1, available / required)` where `available` is
//!    `days × daily_hours`. When time is short every allocation shrinks
//!    proportionally instead of nodes being dropped.
//! 2. For each day, candidates are the nodes with remaining hours, sorted by
//!    descending priority, then ascending remaining hours, then input order.
//! 3. Each candidate in turn gets
//!    `min(day budget left, remaining × scale, max_node_hours_per_day)`,
//!    recorded only when it reaches `min_allocation_hours`.

use chrono::NaiveDate;
use pathwise_core::config::ScheduleConfig;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// A node competing for study time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDemand {
    pub node_id: String,
    pub remaining_hours: f64,
    /// Higher is scheduled earlier within a day.
    pub priority: f64,
}

impl NodeDemand {
    /// Demand with the default priority of `1.0`.
    #[must_use]
    pub fn new(node_id: impl Into<String>, remaining_hours: f64) -> Self {
        Self {
            node_id: node_id.into(),
            remaining_hours,
            priority: 1.0,
        }
    }

    #[must_use]
    pub const fn with_priority(mut self, priority: f64) -> Self {
        self.priority = priority;
        self
    }
}

/// Hours given to one node on one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeAllocation {
    pub node_id: String,
    pub hours: f64,
}

/// Every allocation for one study day, in allocation order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyAllocation {
    pub date: NaiveDate,
    pub allocations: Vec<NodeAllocation>,
}

impl DailyAllocation {
    #[must_use]
    pub fn total_hours(&self) -> f64 {
        self.allocations.iter().map(|a| a.hours).sum()
    }

    #[must_use]
    pub fn hours_for(&self, node_id: &str) -> Option<f64> {
        self.allocations
            .iter()
            .find(|a| a.node_id == node_id)
            .map(|a| a.hours)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.allocations.is_empty()
    }
}

/// Spread `demands` over `days`, at most `daily_hours` per day.
///
/// Returns one [`DailyAllocation`] per day, in day order. Days on which no
/// node clears the minimum allocation come back empty.
#[instrument(skip_all, fields(nodes = demands.len(), days = days.len(), daily_hours))]
#[must_use]
pub fn distribute_study_time(
    demands: &[NodeDemand],
    days: &[NaiveDate],
    daily_hours: f64,
    config: &ScheduleConfig,
) -> Vec<DailyAllocation> {
    let mut remaining: Vec<f64> = demands
        .iter()
        .map(|d| d.remaining_hours.max(0.0))
        .collect();
    let total_required: f64 = remaining.iter().sum();
    let total_available = daily_hours * count_as_f64(days.len());
    let scale = if total_required > 0.0 {
        (total_available / total_required).min(1.0)
    } else {
        1.0
    };

    let mut schedule = Vec::with_capacity(days.len());
    for &date in days {
        let mut candidates: Vec<usize> = (0..demands.len())
            .filter(|&i| remaining[i] > 0.0)
            .collect();
        // Stable sort: full ties stay in input order.
        candidates.sort_by(|&a, &b| {
            demands[b]
                .priority
                .total_cmp(&demands[a].priority)
                .then_with(|| remaining[a].total_cmp(&remaining[b]))
        });

        let mut budget = daily_hours;
        let mut allocations = Vec::new();
        for i in candidates {
            if budget <= 0.0 {
                break;
            }
            let hours = budget
                .min(remaining[i] * scale)
                .min(config.max_node_hours_per_day);
            if hours >= config.min_allocation_hours {
                allocations.push(NodeAllocation {
                    node_id: demands[i].node_id.clone(),
                    hours,
                });
                remaining[i] -= hours;
                budget -= hours;
            }
        }

        schedule.push(DailyAllocation { date, allocations });
    }

    debug!(
        scale,
        total_required,
        total_available,
        "study time distributed"
    );
    schedule
}

#[allow(clippy::cast_precision_loss)]
const fn count_as_f64(n: usize) -> f64 {
    n as f64
}
