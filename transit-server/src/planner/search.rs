//! Transfer-minimizing best-first search.
//!
//! Finds a path between two stops, preferring as few route changes as
//! possible and then as few hops as possible.
//!
//! # Algorithm
//!
//! 1. **Direct route**: if one route pattern visits the goal after the start,
//!    that sub-sequence is the answer. No search.
//! 2. **Best-first**: a priority queue of partial paths ordered by
//!    (transfers, stops). Expanding a state pushes continuations on the
//!    current line before those that change line, so among equal keys the
//!    no-transfer continuation is tried first. A state is a (stop, line)
//!    pair; reaching a state no better than a previous visit is pruned.
//! 3. **BFS**: plain edge-level reachability as the last resort.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use tracing::{debug, trace, warn};

use crate::domain::{LineKey, Path, RouteId, StopId};
use crate::graph::ConnectivityGraph;

use super::bfs::reachability_path;
use super::config::PlannerConfig;

/// Which search produced a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStrategy {
    /// Start and goal are the same stop.
    Trivial,
    /// A single route pattern connects start and goal.
    DirectRoute,
    /// The transfer-minimizing best-first search.
    BestFirst,
    /// The plain reachability fallback.
    Bfs,
}

/// A path together with the search strategy that found it.
#[derive(Debug, Clone)]
pub struct PlannedPath {
    pub path: Path,
    pub strategy: SearchStrategy,
}

impl PlannedPath {
    pub fn transfers(&self) -> usize {
        count_transfers(&self.path)
    }
}

/// Number of route changes between consecutive edges of a path.
///
/// The first edge never counts; durations play no part.
pub fn count_transfers(path: &Path) -> usize {
    path.transfer_count()
}

/// One node of the search tree: the edge taken and the node it extends.
#[derive(Debug, Clone, Copy)]
struct Node {
    edge: usize,
    parent: Option<usize>,
}

/// A search state: where we are and which line we arrived on.
type StateKey = (StopId, Option<LineKey>);

/// Queue entry. Ordered by (primary, secondary) key, then insertion order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct Entry {
    key: (usize, usize),
    seq: u64,
    node: Option<usize>,
    transfers: usize,
    stops: usize,
}

/// Path planner over a connectivity graph.
pub struct PathPlanner<'a> {
    graph: &'a ConnectivityGraph,
    config: &'a PlannerConfig,
}

impl<'a> PathPlanner<'a> {
    /// Create a new planner.
    pub fn new(graph: &'a ConnectivityGraph, config: &'a PlannerConfig) -> Self {
        Self { graph, config }
    }

    /// Find a path from `start` to `goal`.
    ///
    /// With `prefer_fewer_transfers` the search minimizes transfers first and
    /// hops second; without it, hops first. Returns `None` when no strategy
    /// finds a path.
    pub fn find_path(
        &self,
        start: &StopId,
        goal: &StopId,
        prefer_fewer_transfers: bool,
    ) -> Option<PlannedPath> {
        if start == goal {
            return Some(PlannedPath {
                path: Path::empty(),
                strategy: SearchStrategy::Trivial,
            });
        }

        if let Some(direct) = self.graph.can_reach_on_single_route(start, goal) {
            debug!(pattern = %direct.pattern, stops = direct.stops.len(), "Direct route found");
            return Some(PlannedPath {
                path: self.graph.direct_path(&direct),
                strategy: SearchStrategy::DirectRoute,
            });
        }

        self.search(start, goal, prefer_fewer_transfers)
    }

    /// Search without the direct-route short-circuit: best-first, then BFS.
    pub fn search(
        &self,
        start: &StopId,
        goal: &StopId,
        prefer_fewer_transfers: bool,
    ) -> Option<PlannedPath> {
        if start == goal {
            return Some(PlannedPath {
                path: Path::empty(),
                strategy: SearchStrategy::Trivial,
            });
        }
        if !self.graph.has_outgoing(start) {
            debug!(start = %start, "Start stop has no outgoing edges");
            return None;
        }

        if let Some(path) = self.best_first(start, goal, prefer_fewer_transfers) {
            return Some(PlannedPath {
                path,
                strategy: SearchStrategy::BestFirst,
            });
        }

        reachability_path(self.graph, start, goal).map(|path| PlannedPath {
            path,
            strategy: SearchStrategy::Bfs,
        })
    }

    /// Transfer-penalized best-first search.
    pub fn best_first(
        &self,
        start: &StopId,
        goal: &StopId,
        prefer_fewer_transfers: bool,
    ) -> Option<Path> {
        let order = |transfers: usize, stops: usize| {
            if prefer_fewer_transfers {
                (transfers, stops)
            } else {
                (stops, transfers)
            }
        };

        let mut arena: Vec<Node> = Vec::new();
        let mut heap: BinaryHeap<Reverse<Entry>> = BinaryHeap::new();
        let mut best_seen: HashMap<StateKey, (usize, usize)> = HashMap::new();
        let mut seq = 0u64;

        best_seen.insert((start.clone(), None), (0, 0));
        heap.push(Reverse(Entry {
            key: order(0, 0),
            seq,
            node: None,
            transfers: 0,
            stops: 0,
        }));

        // Best goal reached that did not meet the acceptance bound:
        // (transfers, ordering key, node)
        let mut fallback: Option<(usize, (usize, usize), usize)> = None;
        let mut expansions = 0usize;

        while let Some(Reverse(entry)) = heap.pop() {
            expansions += 1;
            if expansions > self.config.max_expansions {
                warn!(
                    start = %start,
                    goal = %goal,
                    expansions = self.config.max_expansions,
                    "Search expansion limit reached"
                );
                break;
            }

            if let Some((best_transfers, _, _)) = fallback
                && entry.transfers >= best_transfers
            {
                continue;
            }

            let (stop, line, route) = match entry.node {
                Some(n) => {
                    let edge = self.graph.edge(arena[n].edge);
                    (&edge.to, Some(edge.line_key()), Some(&edge.route))
                }
                None => (start, None, None),
            };

            // Stale entry: this state was since reached more cheaply
            if let Some(&seen) = best_seen.get(&(stop.clone(), line.clone()))
                && seen < entry.key
            {
                continue;
            }

            if stop == goal {
                let node = entry.node?;
                if entry.transfers <= self.config.accept_transfers {
                    trace!(expansions, transfers = entry.transfers, "Accepted path");
                    return self.rebuild(&arena, node);
                }
                if fallback.is_none_or(|(_, key, _)| entry.key < key) {
                    fallback = Some((entry.transfers, entry.key, node));
                }
                continue;
            }

            for idx in self.ordered_outgoing(stop, line.as_ref()) {
                let edge = self.graph.edge(idx);
                let transfers = entry.transfers + usize::from(changes_route(route, &edge.route));
                if transfers > self.config.max_transfers {
                    continue;
                }
                let stops = entry.stops + 1;
                let key = order(transfers, stops);

                let state = (edge.to.clone(), Some(edge.line_key()));
                if let Some(&seen) = best_seen.get(&state)
                    && seen <= key
                {
                    continue;
                }
                best_seen.insert(state, key);

                arena.push(Node {
                    edge: idx,
                    parent: entry.node,
                });
                seq += 1;
                heap.push(Reverse(Entry {
                    key,
                    seq,
                    node: Some(arena.len() - 1),
                    transfers,
                    stops,
                }));
            }
        }

        debug!(
            expansions,
            found = fallback.is_some(),
            "Best-first search complete"
        );

        fallback.and_then(|(_, _, node)| self.rebuild(&arena, node))
    }

    /// Outgoing edge indices of `stop`, those on `line` first.
    fn ordered_outgoing(&self, stop: &StopId, line: Option<&LineKey>) -> Vec<usize> {
        let (mut same, other): (Vec<usize>, Vec<usize>) = self
            .graph
            .outgoing_indices(stop)
            .iter()
            .partition(|&&i| line.is_some_and(|l| &self.graph.edge(i).line_key() == l));
        same.extend(other);
        same
    }

    fn rebuild(&self, arena: &[Node], mut node: usize) -> Option<Path> {
        let mut edges = Vec::new();
        loop {
            edges.push(self.graph.edge(arena[node].edge).clone());
            match arena[node].parent {
                Some(parent) => node = parent,
                None => break,
            }
        }
        edges.reverse();
        Path::new(edges).ok()
    }
}

/// Whether boarding `next` after arriving on `current` is a transfer.
fn changes_route(current: Option<&RouteId>, next: &RouteId) -> bool {
    current.is_some_and(|r| r != next)
}

#[cfg(test)]
#[path = "search_tests.rs"]
mod search_tests;
