//! Aggregate quality metrics for a roadmap graph.
//!
//! | Score | Formula |
//! |-------|---------|
//! | connectivity | `1 − (components − 1) / max(1, n − 1)` |
//! | acyclic | `1.0` without cycles, else `0.0` |
//! | balance | `1 / (1 + variance(hours) / max(1, mean(hours)))` |
//! | complexity | `min(1, average_degree / 3)` |
//!
//! `average_degree = (Σin + Σout) / (2n)` over inserted edges. Variance is
//! the population variance.

#![allow(clippy::module_name_repetitions)]

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::build::RoadmapGraph;
use crate::components::{component_count, isolated_nodes};
use crate::critical_path::{CriticalPath, compute_critical_path};
use crate::cycles::detect_cycles;

/// Numeric quality metrics for a non-empty graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphMetrics {
    pub node_count: usize,
    pub edge_count: usize,
    pub component_count: usize,
    pub isolated_count: usize,
    pub cycle_count: usize,
    pub total_hours: f64,
    pub average_degree: f64,
    pub connectivity_score: f64,
    pub acyclic_score: f64,
    pub balance_score: f64,
    pub complexity_score: f64,
    /// `None` when the graph is cyclic.
    pub critical_path_length: Option<usize>,
    /// `None` when the graph is cyclic.
    pub critical_path_hours: Option<f64>,
}

/// Metrics, or the sentinel for an empty node set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MetricsReport {
    NoNodes,
    Computed(GraphMetrics),
}

impl MetricsReport {
    #[must_use]
    pub const fn metrics(&self) -> Option<&GraphMetrics> {
        match self {
            Self::NoNodes => None,
            Self::Computed(m) => Some(m),
        }
    }
}

/// Compute quality metrics for `graph`.
#[instrument(skip_all, fields(nodes = graph.node_count()))]
#[must_use]
pub fn compute_metrics(graph: &RoadmapGraph) -> MetricsReport {
    let n = graph.node_count();
    if n == 0 {
        return MetricsReport::NoNodes;
    }

    let hours: Vec<f64> = graph
        .graph
        .node_weights()
        .map(|node| node.estimated_hours)
        .collect();
    let components = component_count(graph);
    let cycle_count = detect_cycles(graph).len();
    let average_degree = average_degree(n, graph.edge_count());
    let critical = compute_critical_path(graph).ok();

    MetricsReport::Computed(GraphMetrics {
        node_count: n,
        edge_count: graph.edge_count(),
        component_count: components,
        isolated_count: isolated_nodes(graph).len(),
        cycle_count,
        total_hours: hours.iter().sum(),
        average_degree,
        connectivity_score: connectivity_score(n, components),
        acyclic_score: if cycle_count == 0 { 1.0 } else { 0.0 },
        balance_score: balance_score(&hours),
        complexity_score: (average_degree / 3.0).min(1.0),
        critical_path_length: critical.as_ref().map(CriticalPath::len),
        critical_path_hours: critical.map(|cp| cp.total_hours),
    })
}

#[allow(clippy::cast_precision_loss)]
fn connectivity_score(nodes: usize, components: usize) -> f64 {
    let denom = nodes.saturating_sub(1).max(1) as f64;
    1.0 - components.saturating_sub(1) as f64 / denom
}

#[allow(clippy::cast_precision_loss)]
fn average_degree(nodes: usize, edges: usize) -> f64 {
    // Each edge contributes one in-degree and one out-degree.
    (2 * edges) as f64 / (2 * nodes) as f64
}

#[allow(clippy::cast_precision_loss)]
fn balance_score(hours: &[f64]) -> f64 {
    if hours.is_empty() {
        return 1.0;
    }
    let n = hours.len() as f64;
    let mean = hours.iter().sum::<f64>() / n;
    let variance = hours.iter().map(|h| (h - mean).powi(2)).sum::<f64>() / n;
    1.0 / (1.0 + variance / mean.max(1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathwise_core::{Difficulty, KnowledgeNode, PrerequisiteEdge};

    fn graph(nodes: &[(&str, f64)], edges: &[(&str, &str)]) -> RoadmapGraph {
        let nodes: Vec<KnowledgeNode> = nodes
            .iter()
            .map(|(id, h)| KnowledgeNode::new(*id, *h, Difficulty::Medium))
            .collect();
        let edges: Vec<PrerequisiteEdge> = edges
            .iter()
            .map(|(a, b)| PrerequisiteEdge::new(*a, *b))
            .collect();
        RoadmapGraph::from_parts(&nodes, &edges)
    }

    fn computed(report: MetricsReport) -> GraphMetrics {
        match report {
            MetricsReport::Computed(m) => m,
            MetricsReport::NoNodes => panic!("expected metrics"),
        }
    }

    #[test]
    fn empty_graph_is_sentinel() {
        let report = compute_metrics(&graph(&[], &[]));
        assert_eq!(report, MetricsReport::NoNodes);
        assert!(report.metrics().is_none());
        assert_eq!(
            serde_json::to_value(&report).unwrap(),
            serde_json::json!({"status": "no_nodes"})
        );
    }

    #[test]
    fn single_node_is_fully_connected() {
        let m = computed(compute_metrics(&graph(&[("a", 3.0)], &[])));
        assert!((m.connectivity_score - 1.0).abs() < 1e-10);
        assert!((m.balance_score - 1.0).abs() < 1e-10);
        assert!(m.complexity_score.abs() < 1e-10);
        assert_eq!(m.critical_path_length, Some(1));
    }

    #[test]
    fn singletons_reduce_connectivity() {
        let m = computed(compute_metrics(&graph(
            &[("a", 1.0), ("b", 1.0), ("c", 1.0)],
            &[],
        )));
        assert_eq!(m.component_count, 3);
        assert!(m.connectivity_score.abs() < 1e-10);
        assert_eq!(m.isolated_count, 3);
    }

    #[test]
    fn chain_scores() {
        let m = computed(compute_metrics(&graph(
            &[("a", 2.0), ("b", 4.0), ("c", 6.0)],
            &[("a", "b"), ("b", "c")],
        )));
        assert!((m.connectivity_score - 1.0).abs() < 1e-10);
        assert!((m.acyclic_score - 1.0).abs() < 1e-10);
        // mean 4, population variance 8/3
        let expected_balance = 1.0 / (1.0 + (8.0 / 3.0) / 4.0);
        assert!((m.balance_score - expected_balance).abs() < 1e-10);
        // 2 edges over 3 nodes
        assert!((m.average_degree - 2.0 / 3.0).abs() < 1e-10);
        assert!((m.complexity_score - 2.0 / 9.0).abs() < 1e-10);
        assert_eq!(m.critical_path_length, Some(3));
        assert!((m.critical_path_hours.unwrap() - 12.0).abs() < 1e-10);
        assert!((m.total_hours - 12.0).abs() < 1e-10);
    }

    #[test]
    fn cyclic_graph_has_no_critical_path() {
        let m = computed(compute_metrics(&graph(
            &[("a", 1.0), ("b", 1.0)],
            &[("a", "b"), ("b", "a")],
        )));
        assert!(m.acyclic_score.abs() < 1e-10);
        assert_eq!(m.cycle_count, 1);
        assert_eq!(m.critical_path_length, None);
        assert_eq!(m.critical_path_hours, None);
    }

    #[test]
    fn complexity_caps_at_one() {
        let ids = ["a", "b", "c", "d"];
        let mut edges = Vec::new();
        for from in ids {
            for to in ids {
                edges.push((from, to));
            }
        }
        let nodes: Vec<(&str, f64)> = ids.iter().map(|id| (*id, 1.0)).collect();
        let m = computed(compute_metrics(&graph(&nodes, &edges)));
        // 16 edges over 4 nodes: average degree 4.
        assert!((m.average_degree - 4.0).abs() < 1e-10);
        assert!((m.complexity_score - 1.0).abs() < 1e-10);
    }
}
