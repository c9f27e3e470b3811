//! Graph construction from caller-supplied nodes and edges.
//!
//! # Edge Direction
//!
//! An edge `A → B` means "A is a prerequisite of B": A must be studied
//! before B. Nodes are inserted in input order, so `NodeIndex` order is
//! input order and every traversal that walks `node_indices()` is
//! deterministic.
//!
//! ## Dangling Edges
//!
//! Edges naming an id that is not in the node list are kept out of the
//! graph and collected in [`RoadmapGraph::dangling_edges`] so that
//! validation can report them instead of silently dropping them.

#![allow(clippy::module_name_repetitions)]

use std::collections::HashMap;

use pathwise_core::{Difficulty, KnowledgeNode, PrerequisiteEdge};
use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use tracing::{debug, instrument, warn};

// ---------------------------------------------------------------------------
// RoadmapGraph
// ---------------------------------------------------------------------------

/// Per-node payload carried in the petgraph node weight.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    pub id: String,
    pub estimated_hours: f64,
    pub difficulty: Difficulty,
}

/// A directed prerequisite graph.
#[derive(Debug, Clone)]
pub struct RoadmapGraph {
    /// Directed graph: nodes = knowledge units, edges = prerequisite links.
    pub graph: DiGraph<GraphNode, ()>,
    /// Mapping from node id to petgraph `NodeIndex`.
    pub node_map: HashMap<String, NodeIndex>,
    /// Edges with at least one unknown endpoint, in input order.
    pub dangling_edges: Vec<PrerequisiteEdge>,
}

impl RoadmapGraph {
    /// Build a graph from node and edge lists.
    ///
    /// Duplicate node ids keep the first occurrence. Duplicate edges are
    /// collapsed. Self-loops are kept so cycle detection can report them.
    #[instrument(skip_all, fields(nodes = nodes.len(), edges = edges.len()))]
    #[must_use]
    pub fn from_parts(nodes: &[KnowledgeNode], edges: &[PrerequisiteEdge]) -> Self {
        let mut graph = DiGraph::<GraphNode, ()>::with_capacity(nodes.len(), edges.len());
        let mut node_map: HashMap<String, NodeIndex> = HashMap::with_capacity(nodes.len());

        for node in nodes {
            if node_map.contains_key(&node.id) {
                warn!(id = %node.id, "duplicate node id ignored");
                continue;
            }
            let idx = graph.add_node(GraphNode {
                id: node.id.clone(),
                estimated_hours: node.estimated_hours,
                difficulty: node.difficulty,
            });
            node_map.insert(node.id.clone(), idx);
        }

        let mut dangling_edges = Vec::new();
        for edge in edges {
            let (Some(&from), Some(&to)) = (node_map.get(&edge.from), node_map.get(&edge.to))
            else {
                dangling_edges.push(edge.clone());
                continue;
            };
            // petgraph allows parallel edges; the analyzer never wants them.
            if !graph.contains_edge(from, to) {
                graph.add_edge(from, to, ());
            }
        }

        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            dangling = dangling_edges.len(),
            "built roadmap graph"
        );

        Self {
            graph,
            node_map,
            dangling_edges,
        }
    }

    /// Return the number of nodes in the graph.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Return the number of distinct inserted edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Look up the `NodeIndex` for a node id.
    #[must_use]
    pub fn node_index(&self, id: &str) -> Option<NodeIndex> {
        self.node_map.get(id).copied()
    }

    /// Return the id label for a node, or `#<index>` if the index is stale.
    #[must_use]
    pub fn node_id(&self, idx: NodeIndex) -> String {
        self.graph
            .node_weight(idx)
            .map_or_else(|| format!("#{}", idx.index()), |n| n.id.clone())
    }

    #[must_use]
    pub fn hours(&self, idx: NodeIndex) -> f64 {
        self.graph.node_weight(idx).map_or(0.0, |n| n.estimated_hours)
    }

    /// Out-neighbors of `idx` in edge insertion order.
    #[must_use]
    pub fn successors(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        self.ordered_neighbors(idx, Direction::Outgoing)
    }

    /// In-neighbors of `idx` in edge insertion order.
    #[must_use]
    pub fn predecessors(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        self.ordered_neighbors(idx, Direction::Incoming)
    }

    fn ordered_neighbors(&self, idx: NodeIndex, dir: Direction) -> Vec<NodeIndex> {
        // petgraph walks its adjacency list newest-first.
        let mut out: Vec<NodeIndex> = self.graph.neighbors_directed(idx, dir).collect();
        out.reverse();
        out
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
