//! Weakly connected components (edges treated as undirected).

use petgraph::Direction;
use petgraph::graph::NodeIndex;

use crate::build::RoadmapGraph;

/// Partition node ids into islands.
///
/// Components are ordered by their first node in input order; members are
/// listed in discovery order, walking prerequisites before dependents.
#[must_use]
pub fn connected_components(graph: &RoadmapGraph) -> Vec<Vec<String>> {
    let mut seen = vec![false; graph.node_count()];
    let mut components = Vec::new();

    for root in graph.graph.node_indices() {
        if seen[root.index()] {
            continue;
        }
        let mut members = Vec::new();
        let mut stack: Vec<NodeIndex> = vec![root];
        while let Some(idx) = stack.pop() {
            if seen[idx.index()] {
                continue;
            }
            seen[idx.index()] = true;
            members.push(graph.node_id(idx));

            let mut neighbors = graph.predecessors(idx);
            neighbors.extend(graph.successors(idx));
            // Reverse so the first neighbor is popped first.
            for next in neighbors.into_iter().rev() {
                if !seen[next.index()] {
                    stack.push(next);
                }
            }
        }
        components.push(members);
    }

    components
}

/// Number of weakly connected components.
#[must_use]
pub fn component_count(graph: &RoadmapGraph) -> usize {
    petgraph::algo::connected_components(&graph.graph)
}

/// Nodes with no incoming and no outgoing prerequisite edges.
#[must_use]
pub fn isolated_nodes(graph: &RoadmapGraph) -> Vec<String> {
    graph
        .graph
        .node_indices()
        .filter(|&idx| {
            graph
                .graph
                .neighbors_directed(idx, Direction::Incoming)
                .next()
                .is_none()
                && graph
                    .graph
                    .neighbors_directed(idx, Direction::Outgoing)
                    .next()
                    .is_none()
        })
        .map(|idx| graph.node_id(idx))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathwise_core::{Difficulty, KnowledgeNode, PrerequisiteEdge};

    fn graph(ids: &[&str], edges: &[(&str, &str)]) -> RoadmapGraph {
        let nodes: Vec<KnowledgeNode> = ids
            .iter()
            .map(|id| KnowledgeNode::new(*id, 1.0, Difficulty::Easy))
            .collect();
        let edges: Vec<PrerequisiteEdge> = edges
            .iter()
            .map(|(a, b)| PrerequisiteEdge::new(*a, *b))
            .collect();
        RoadmapGraph::from_parts(&nodes, &edges)
    }

    #[test]
    fn empty_graph_has_no_components() {
        let g = graph(&[], &[]);
        assert!(connected_components(&g).is_empty());
        assert_eq!(component_count(&g), 0);
    }

    #[test]
    fn direction_is_ignored() {
        // b is reachable from c only against edge direction.
        let g = graph(&["a", "b", "c"], &[("a", "b"), ("c", "b")]);
        let comps = connected_components(&g);
        assert_eq!(comps.len(), 1);
        assert_eq!(comps[0], ["a", "b", "c"]);
        assert_eq!(component_count(&g), 1);
    }

    #[test]
    fn islands_ordered_by_first_member() {
        let g = graph(&["x", "a", "y", "b"], &[("a", "b"), ("y", "x")]);
        let comps = connected_components(&g);
        assert_eq!(comps, vec![vec!["x", "y"], vec!["a", "b"]]);
        assert_eq!(component_count(&g), 2);
    }

    #[test]
    fn isolated_nodes_listed() {
        let g = graph(&["a", "b", "lonely"], &[("a", "b")]);
        assert_eq!(isolated_nodes(&g), ["lonely"]);
    }
}
