//! The connectivity graph.
//!
//! Owns every directed edge of the network plus an adjacency index, and
//! answers single-route reachability queries against the recorded route
//! patterns. Built once; read-only afterwards.

use std::collections::{HashMap, HashSet};

use tracing::info;

use crate::domain::{Edge, LineKey, Path, PatternId, RoutePattern, StopId};

use super::stop_index::StopIndex;

/// A single-pattern connection between two stops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectRoute {
    pub pattern: PatternId,
    /// Stops from start to goal inclusive, in traversal order.
    pub stops: Vec<StopId>,
}

impl DirectRoute {
    /// Number of stops passed between start and goal.
    pub fn intervening_stops(&self) -> usize {
        self.stops.len().saturating_sub(2)
    }
}

/// Directed graph of stop-to-stop edges.
///
/// # Invariants
///
/// - Every edge joins stops adjacent in some pattern or stop-time sequence
/// - No two edges share (from, to, pattern-or-route)
/// - Patterns are ordered by pattern id
#[derive(Debug, Clone, Default)]
pub struct ConnectivityGraph {
    index: StopIndex,
    patterns: Vec<RoutePattern>,
    edges: Vec<Edge>,
    /// Stop → indices into `edges` of its outgoing edges, in edge order.
    adjacency: HashMap<StopId, Vec<usize>>,
    edge_minutes: u32,
}

impl ConnectivityGraph {
    /// Assemble a graph from recorded patterns plus edges that have no
    /// pattern (derived from stop-time sequences).
    ///
    /// Pattern edges come first, then the extra edges; duplicates by
    /// (from, to, pattern-or-route) are dropped.
    pub fn from_parts(
        index: StopIndex,
        mut patterns: Vec<RoutePattern>,
        extra_edges: Vec<Edge>,
        edge_minutes: u32,
    ) -> Self {
        patterns.sort_by(|a, b| a.id().cmp(b.id()));
        patterns.dedup_by(|a, b| a.id() == b.id());

        let mut seen: HashSet<(StopId, StopId, LineKey)> = HashSet::new();
        let mut edges = Vec::new();

        let pattern_edges = patterns.iter().flat_map(|p| {
            p.hops().map(move |(from, to)| {
                Edge::new(
                    from.clone(),
                    to.clone(),
                    p.route().clone(),
                    Some(p.id().clone()),
                    edge_minutes,
                )
            })
        });

        for edge in pattern_edges.chain(extra_edges) {
            if edge.from == edge.to {
                continue;
            }
            if seen.insert((edge.from.clone(), edge.to.clone(), edge.line_key())) {
                edges.push(edge);
            }
        }

        let mut adjacency: HashMap<StopId, Vec<usize>> = HashMap::new();
        for (i, edge) in edges.iter().enumerate() {
            adjacency.entry(edge.from.clone()).or_default().push(i);
        }

        info!(
            stops = index.stop_count(),
            routes = index.route_count(),
            patterns = patterns.len(),
            edges = edges.len(),
            "Built connectivity graph"
        );

        Self {
            index,
            patterns,
            edges,
            adjacency,
            edge_minutes,
        }
    }

    pub fn index(&self) -> &StopIndex {
        &self.index
    }

    pub fn patterns(&self) -> &[RoutePattern] {
        &self.patterns
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn edge(&self, idx: usize) -> &Edge {
        &self.edges[idx]
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn edge_minutes(&self) -> u32 {
        self.edge_minutes
    }

    /// Indices of the edges leaving `stop`.
    pub fn outgoing_indices(&self, stop: &StopId) -> &[usize] {
        self.adjacency.get(stop).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Edges leaving `stop`.
    pub fn outgoing(&self, stop: &StopId) -> impl Iterator<Item = &Edge> {
        self.outgoing_indices(stop).iter().map(|&i| &self.edges[i])
    }

    pub fn has_outgoing(&self, stop: &StopId) -> bool {
        !self.outgoing_indices(stop).is_empty()
    }

    /// Find a pattern that visits `goal` strictly after `start`.
    ///
    /// When several patterns qualify, the one with the fewest intervening
    /// stops wins; remaining ties go to the lowest pattern id.
    pub fn can_reach_on_single_route(&self, start: &StopId, goal: &StopId) -> Option<DirectRoute> {
        self.patterns
            .iter()
            .filter_map(|p| p.slice_between(start, goal).map(|s| (p, s)))
            .min_by_key(|(_, stops)| stops.len())
            .map(|(p, stops)| DirectRoute {
                pattern: p.id().clone(),
                stops: stops.to_vec(),
            })
    }

    /// The edge path along a direct route.
    pub fn direct_path(&self, direct: &DirectRoute) -> Path {
        let edges = direct
            .stops
            .windows(2)
            .map(|w| {
                Edge::new(
                    w[0].clone(),
                    w[1].clone(),
                    direct.pattern.route.clone(),
                    Some(direct.pattern.clone()),
                    self.edge_minutes,
                )
            })
            .collect();
        // Consecutive windows always connect
        Path::new(edges).unwrap_or_default()
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::domain::{Direction, RouteId, Stop};
    use proptest::prelude::*;

    /// Pattern length plus a boarding and an alighting position after it.
    fn positions() -> impl Strategy<Value = (usize, usize, usize)> {
        (2usize..12)
            .prop_flat_map(|len| (Just(len), 0..len - 1))
            .prop_flat_map(|(len, a)| (Just(len), Just(a), a + 1..len))
    }

    proptest! {
        /// Every later stop on a pattern is reachable from every earlier one,
        /// and the sub-sequence runs from start to goal with no transfers
        #[test]
        fn later_stops_reachable((len, a, b) in positions()) {
            let stops: Vec<StopId> = (0..len)
                .map(|i| StopId::parse(&format!("S{i}")).unwrap())
                .collect();
            let mut index = StopIndex::default();
            for s in &stops {
                index.insert_stop(Stop::new(s.clone(), s.as_str(), 46.7, 23.6));
            }
            let pattern = RoutePattern::new(
                PatternId::new(RouteId::parse("R").unwrap(), Direction::new("0")),
                stops.clone(),
            );
            let g = ConnectivityGraph::from_parts(index, vec![pattern], vec![], 5);

            let direct = g.can_reach_on_single_route(&stops[a], &stops[b]).unwrap();
            prop_assert_eq!(direct.stops.first(), Some(&stops[a]));
            prop_assert_eq!(direct.stops.last(), Some(&stops[b]));
            prop_assert_eq!(direct.stops.len(), b - a + 1);
            prop_assert_eq!(g.direct_path(&direct).transfer_count(), 0);
        }
    }
}
