//! Plain reachability BFS.
//!
//! The terminal fallback when the pattern-aware search finds nothing. It
//! walks edges level by level, ignoring which route each edge belongs to,
//! and returns the first path discovered. No transfer minimization.

use std::collections::{HashMap, VecDeque};

use tracing::{debug, trace};

use crate::domain::{Path, StopId};
use crate::graph::ConnectivityGraph;

/// Find any path from `start` to `goal` by breadth-first search.
///
/// Returns the empty path when `start == goal`, and `None` once every stop
/// reachable from `start` has been visited without reaching `goal`.
pub fn reachability_path(graph: &ConnectivityGraph, start: &StopId, goal: &StopId) -> Option<Path> {
    if start == goal {
        return Some(Path::empty());
    }

    // Stop → index of the edge it was first reached by
    let mut reached_by: HashMap<&StopId, usize> = HashMap::new();
    let mut queue: VecDeque<&StopId> = VecDeque::from([start]);
    let mut visited = 0usize;

    while let Some(stop) = queue.pop_front() {
        visited += 1;
        for &idx in graph.outgoing_indices(stop) {
            let edge = graph.edge(idx);
            if &edge.to == start || reached_by.contains_key(&edge.to) {
                continue;
            }
            reached_by.insert(&edge.to, idx);

            if &edge.to == goal {
                trace!(visited, "BFS reached goal");
                return rebuild(graph, &reached_by, start, goal);
            }
            queue.push_back(&edge.to);
        }
    }

    debug!(start = %start, goal = %goal, visited, "BFS exhausted reachable stops");
    None
}

/// Walk the `reached_by` chain back from `goal` to `start`.
fn rebuild(
    graph: &ConnectivityGraph,
    reached_by: &HashMap<&StopId, usize>,
    start: &StopId,
    goal: &StopId,
) -> Option<Path> {
    let mut edges = Vec::new();
    let mut at = goal;
    while at != start {
        let edge = graph.edge(*reached_by.get(at)?);
        edges.push(edge.clone());
        at = &edge.from;
    }
    edges.reverse();
    Path::new(edges).ok()
}
