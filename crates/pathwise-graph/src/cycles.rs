//! Directed cycle detection.
//!
//! Depth-first traversal from every unvisited node in input order, walking
//! successors in edge insertion order. The current path lives in an explicit
//! frame stack and every node records its position on that path, so a back
//! edge yields its cycle by slicing instead of copying the path per call.
//!
//! Each reported cycle starts and ends at the re-entered node
//! (`[A, B, C, A]`); a self-loop is `[A, A]`. Overlapping cycles reachable
//! through different back edges are all reported, without deduplication.

#![allow(clippy::module_name_repetitions)]

use petgraph::graph::NodeIndex;
use tracing::{debug, instrument};

use crate::build::RoadmapGraph;

struct Frame {
    node: NodeIndex,
    successors: Vec<NodeIndex>,
    cursor: usize,
}

impl Frame {
    fn new(graph: &RoadmapGraph, node: NodeIndex) -> Self {
        Self {
            node,
            successors: graph.successors(node),
            cursor: 0,
        }
    }
}

/// Find directed cycles in `graph`.
///
/// Returns an empty list iff the graph is acyclic.
#[instrument(skip_all, fields(nodes = graph.node_count()))]
#[must_use]
pub fn detect_cycles(graph: &RoadmapGraph) -> Vec<Vec<String>> {
    let n = graph.node_count();
    let mut visited = vec![false; n];
    // Position of each node on the current DFS path, if it is on it.
    let mut path_pos: Vec<Option<usize>> = vec![None; n];
    let mut path: Vec<NodeIndex> = Vec::new();
    let mut stack: Vec<Frame> = Vec::new();
    let mut cycles: Vec<Vec<String>> = Vec::new();

    for root in graph.graph.node_indices() {
        if visited[root.index()] {
            continue;
        }
        visited[root.index()] = true;
        path_pos[root.index()] = Some(path.len());
        path.push(root);
        stack.push(Frame::new(graph, root));

        loop {
            let Some(frame) = stack.last_mut() else {
                break;
            };

            if frame.cursor >= frame.successors.len() {
                let done = frame.node;
                stack.pop();
                path.pop();
                path_pos[done.index()] = None;
                continue;
            }

            let next = frame.successors[frame.cursor];
            frame.cursor += 1;

            if let Some(pos) = path_pos[next.index()] {
                let mut cycle: Vec<String> = path[pos..].iter().map(|&i| graph.node_id(i)).collect();
                cycle.push(graph.node_id(next));
                cycles.push(cycle);
            } else if !visited[next.index()] {
                visited[next.index()] = true;
                path_pos[next.index()] = Some(path.len());
                path.push(next);
                stack.push(Frame::new(graph, next));
            }
        }
    }

    debug!(cycles = cycles.len(), "cycle detection finished");
    cycles
}

/// `true` when the graph has at least one directed cycle.
#[must_use]
pub fn has_cycles(graph: &RoadmapGraph) -> bool {
    petgraph::algo::is_cyclic_directed(&graph.graph)
}

/// Render a cycle as `A -> B -> A`.
#[must_use]
pub fn format_cycle(cycle: &[String]) -> String {
    cycle.join(" -> ")
}
