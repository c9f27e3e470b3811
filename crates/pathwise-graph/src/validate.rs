//! Rule-based roadmap validation.
//!
//! Structural problems never abort validation. Each rule contributes
//! [`ValidationIssue`]s and the report is valid iff no issue is an error.
//! Improvement suggestions are derived from the metrics afterwards.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;

use pathwise_core::config::ValidationConfig;
use pathwise_core::{KnowledgeNode, PrerequisiteEdge, ValidationRule};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::build::RoadmapGraph;
use crate::components::connected_components;
use crate::cycles::{detect_cycles, format_cycle};
use crate::metrics::{MetricsReport, compute_metrics};

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl Severity {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One finding produced by a validation rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub severity: Severity,
    pub rule: ValidationRule,
    pub message: String,
    pub affected_nodes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl ValidationIssue {
    fn new(
        severity: Severity,
        rule: ValidationRule,
        message: impl Into<String>,
        affected_nodes: Vec<String>,
        suggestion: &str,
    ) -> Self {
        Self {
            severity,
            rule,
            message: message.into(),
            affected_nodes,
            suggestion: Some(suggestion.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub issues: Vec<ValidationIssue>,
    pub suggestions: Vec<String>,
    pub metrics: MetricsReport,
}

impl ValidationReport {
    #[must_use]
    pub fn count(&self, severity: Severity) -> usize {
        self.issues.iter().filter(|i| i.severity == severity).count()
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Run `rules` over the roadmap and collect issues, metrics, and suggestions.
///
/// Rules run in the order given; repeated rules run once.
#[instrument(skip_all, fields(nodes = nodes.len(), edges = edges.len(), rules = rules.len()))]
#[must_use]
pub fn validate_graph(
    nodes: &[KnowledgeNode],
    edges: &[PrerequisiteEdge],
    rules: &[ValidationRule],
    config: &ValidationConfig,
) -> ValidationReport {
    let graph = RoadmapGraph::from_parts(nodes, edges);

    let mut ran = HashSet::new();
    let mut issues = Vec::new();
    for &rule in rules {
        if !ran.insert(rule) {
            continue;
        }
        match rule {
            ValidationRule::NoCycles => check_no_cycles(&graph, &mut issues),
            ValidationRule::ConnectedGraph => check_connected(&graph, &mut issues),
            ValidationRule::ReasonableHours => check_hours(nodes, config, &mut issues),
            ValidationRule::ConsistentPrerequisites => {
                check_prerequisites(nodes, edges, &graph, &mut issues);
            }
        }
    }

    let metrics = compute_metrics(&graph);
    let suggestions = suggestions_for(nodes.len(), &metrics);
    let is_valid = !issues.iter().any(|i| i.severity == Severity::Error);

    debug!(issues = issues.len(), is_valid, "validation finished");
    ValidationReport {
        is_valid,
        issues,
        suggestions,
        metrics,
    }
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

fn check_no_cycles(graph: &RoadmapGraph, issues: &mut Vec<ValidationIssue>) {
    for cycle in detect_cycles(graph) {
        issues.push(ValidationIssue::new(
            Severity::Error,
            ValidationRule::NoCycles,
            format!("Circular dependency detected: {}", format_cycle(&cycle)),
            cycle,
            "Remove one of the dependencies to break the cycle",
        ));
    }
}

fn check_connected(graph: &RoadmapGraph, issues: &mut Vec<ValidationIssue>) {
    for component in connected_components(graph).into_iter().skip(1) {
        issues.push(ValidationIssue::new(
            Severity::Warning,
            ValidationRule::ConnectedGraph,
            format!("Disconnected component found: {}", component.join(", ")),
            component,
            "Add prerequisites to connect this component to the main graph",
        ));
    }
}

fn check_hours(
    nodes: &[KnowledgeNode],
    config: &ValidationConfig,
    issues: &mut Vec<ValidationIssue>,
) {
    for node in nodes {
        let hours = node.estimated_hours;
        if hours < config.min_node_hours {
            issues.push(ValidationIssue::new(
                Severity::Warning,
                ValidationRule::ReasonableHours,
                format!(
                    "Node '{}' has very low estimated hours ({hours})",
                    node.display_name()
                ),
                vec![node.id.clone()],
                "Consider combining with another node or increasing the estimate",
            ));
        } else if hours > config.max_node_hours {
            issues.push(ValidationIssue::new(
                Severity::Warning,
                ValidationRule::ReasonableHours,
                format!(
                    "Node '{}' has very high estimated hours ({hours})",
                    node.display_name()
                ),
                vec![node.id.clone()],
                "Consider breaking this node into smaller, more manageable units",
            ));
        }
    }
}

fn check_prerequisites(
    nodes: &[KnowledgeNode],
    edges: &[PrerequisiteEdge],
    graph: &RoadmapGraph,
    issues: &mut Vec<ValidationIssue>,
) {
    let rule = ValidationRule::ConsistentPrerequisites;

    for edge in &graph.dangling_edges {
        let missing: Vec<String> = [&edge.from, &edge.to]
            .into_iter()
            .filter(|id| graph.node_index(id).is_none())
            .cloned()
            .collect();
        issues.push(ValidationIssue::new(
            Severity::Error,
            rule,
            format!(
                "Edge {} -> {} references unknown node(s): {}",
                edge.from,
                edge.to,
                missing.join(", ")
            ),
            missing,
            "Add the missing node or remove the edge",
        ));
    }

    for node in nodes {
        for prereq in &node.prerequisites {
            if graph.node_index(prereq).is_none() {
                issues.push(ValidationIssue::new(
                    Severity::Error,
                    rule,
                    format!(
                        "Node {} references non-existent prerequisite: {prereq}",
                        node.id
                    ),
                    vec![node.id.clone(), prereq.clone()],
                    "Add the missing node or drop it from the prerequisite list",
                ));
            }
        }
    }

    let mut edge_prereqs: HashMap<&str, BTreeSet<&str>> = HashMap::new();
    for edge in edges {
        edge_prereqs
            .entry(edge.to.as_str())
            .or_default()
            .insert(edge.from.as_str());
    }
    let empty = BTreeSet::new();
    for node in nodes {
        let declared: BTreeSet<&str> = node.prerequisites.iter().map(String::as_str).collect();
        let from_edges = edge_prereqs.get(node.id.as_str()).unwrap_or(&empty);
        if declared != *from_edges {
            issues.push(ValidationIssue::new(
                Severity::Warning,
                rule,
                format!(
                    "Node {} prerequisites [{}] do not match edges [{}]",
                    node.id,
                    declared.iter().copied().collect::<Vec<_>>().join(", "),
                    from_edges.iter().copied().collect::<Vec<_>>().join(", ")
                ),
                vec![node.id.clone()],
                "Scheduling follows the edge list; update the node's prerequisites to match",
            ));
        }
    }

    for edge in edges.iter().filter(|e| !e.is_plain_prerequisite()) {
        issues.push(ValidationIssue::new(
            Severity::Info,
            rule,
            format!(
                "Edge {} -> {} has relation type '{}' and is treated as a prerequisite",
                edge.from, edge.to, edge.relation_type
            ),
            vec![edge.from.clone(), edge.to.clone()],
            "Use relation type 'prerequisite' or remove the edge if it is not a hard dependency",
        ));
    }
}

// ---------------------------------------------------------------------------
// Suggestions
// ---------------------------------------------------------------------------

fn suggestions_for(node_count: usize, metrics: &MetricsReport) -> Vec<String> {
    let mut out = Vec::new();

    if let Some(m) = metrics.metrics() {
        if m.connectivity_score < 0.8 {
            out.push(
                "Consider adding more prerequisite relationships to improve learning flow"
                    .to_string(),
            );
        }
        if m.balance_score < 0.7 {
            out.push("Balance the estimated hours across nodes for better pacing".to_string());
        }
        if m.complexity_score < 0.3 {
            out.push(
                "The roadmap might be too linear - consider adding parallel learning paths"
                    .to_string(),
            );
        } else if m.complexity_score > 0.8 {
            out.push(
                "The roadmap might be too complex - consider simplifying dependencies".to_string(),
            );
        }
    }

    if node_count < 5 {
        out.push("Consider adding more detailed intermediate steps".to_string());
    } else if node_count > 20 {
        out.push("Consider grouping related topics into larger modules".to_string());
    }

    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pathwise_core::Difficulty;

    fn node(id: &str, hours: f64, prereqs: &[&str]) -> KnowledgeNode {
        KnowledgeNode::new(id, hours, Difficulty::Medium).with_prerequisites(prereqs.iter().copied())
    }

    fn all_rules() -> Vec<ValidationRule> {
        ValidationRule::ALL.to_vec()
    }

    #[test]
    fn clean_chain_is_valid() {
        let nodes = [node("a", 2.0, &[]), node("b", 2.0, &["a"])];
        let edges = [PrerequisiteEdge::new("a", "b")];
        let report = validate_graph(&nodes, &edges, &all_rules(), &ValidationConfig::default());
        assert!(report.is_valid);
        assert!(report.issues.is_empty(), "{:?}", report.issues);
    }

    #[test]
    fn cycle_is_an_error_with_arrow_message() {
        let nodes = [node("a", 2.0, &["b"]), node("b", 2.0, &["a"])];
        let edges = [PrerequisiteEdge::new("a", "b"), PrerequisiteEdge::new("b", "a")];
        let report = validate_graph(
            &nodes,
            &edges,
            &[ValidationRule::NoCycles],
            &ValidationConfig::default(),
        );
        assert!(!report.is_valid);
        assert_eq!(report.issues.len(), 1);
        assert_eq!(
            report.issues[0].message,
            "Circular dependency detected: a -> b -> a"
        );
        assert_eq!(report.issues[0].affected_nodes, ["a", "b", "a"]);
    }

    #[test]
    fn extra_components_are_warnings() {
        let nodes = [node("a", 2.0, &[]), node("b", 2.0, &[]), node("c", 2.0, &[])];
        let report = validate_graph(
            &nodes,
            &[],
            &[ValidationRule::ConnectedGraph],
            &ValidationConfig::default(),
        );
        assert!(report.is_valid);
        assert_eq!(report.count(Severity::Warning), 2);
        assert_eq!(report.issues[0].message, "Disconnected component found: b");
    }

    #[test]
    fn hour_bounds_come_from_config() {
        let nodes = [node("tiny", 0.25, &[]), node("huge", 50.0, &[]), node("ok", 5.0, &[])];
        let report = validate_graph(
            &nodes,
            &[],
            &[ValidationRule::ReasonableHours],
            &ValidationConfig::default(),
        );
        assert_eq!(report.issues.len(), 2);
        assert!(report.issues[0].message.contains("very low"));
        assert!(report.issues[1].message.contains("very high"));

        let strict = ValidationConfig {
            max_node_hours: 4.0,
            ..ValidationConfig::default()
        };
        let report = validate_graph(&nodes, &[], &[ValidationRule::ReasonableHours], &strict);
        assert_eq!(report.issues.len(), 3);
    }

    #[test]
    fn dangling_and_unknown_references_are_errors() {
        let nodes = [node("a", 2.0, &["ghost"])];
        let edges = [PrerequisiteEdge::new("phantom", "a")];
        let report = validate_graph(
            &nodes,
            &edges,
            &[ValidationRule::ConsistentPrerequisites],
            &ValidationConfig::default(),
        );
        assert!(!report.is_valid);
        assert_eq!(report.count(Severity::Error), 2);
        assert_eq!(report.issues[0].affected_nodes, ["phantom"]);
        assert!(report.issues[1].message.contains("non-existent prerequisite: ghost"));
        // Declared {ghost} vs edges {phantom}.
        assert_eq!(report.count(Severity::Warning), 1);
    }

    #[test]
    fn mismatch_is_warning_and_relation_type_is_info() {
        let nodes = [node("a", 2.0, &[]), node("b", 2.0, &[])];
        let mut edge = PrerequisiteEdge::new("a", "b");
        edge.relation_type = "related".to_string();
        let report = validate_graph(
            &nodes,
            &[edge],
            &[ValidationRule::ConsistentPrerequisites],
            &ValidationConfig::default(),
        );
        assert!(report.is_valid);
        assert_eq!(report.count(Severity::Warning), 1);
        assert_eq!(report.count(Severity::Info), 1);
        assert_eq!(report.issues[0].affected_nodes, ["b"]);
    }

    #[test]
    fn repeated_rules_run_once() {
        let nodes = [node("a", 0.1, &[])];
        let rules = [ValidationRule::ReasonableHours, ValidationRule::ReasonableHours];
        let report = validate_graph(&nodes, &[], &rules, &ValidationConfig::default());
        assert_eq!(report.issues.len(), 1);
    }

    #[test]
    fn suggestions_follow_metrics() {
        let nodes = [node("a", 1.0, &[]), node("b", 30.0, &[])];
        let report = validate_graph(&nodes, &[], &[], &ValidationConfig::default());
        let text = report.suggestions.join("\n");
        assert!(text.contains("more prerequisite relationships"));
        assert!(text.contains("Balance the estimated hours"));
        assert!(text.contains("too linear"));
        assert!(text.contains("intermediate steps"));
    }

    #[test]
    fn empty_roadmap_reports_no_nodes() {
        let report = validate_graph(&[], &[], &all_rules(), &ValidationConfig::default());
        assert!(report.is_valid);
        assert_eq!(report.metrics, MetricsReport::NoNodes);
        assert_eq!(
            report.suggestions,
            ["Consider adding more detailed intermediate steps"]
        );
    }
}
