//! Route patterns and the directed edges derived from them.

use serde::Serialize;

use super::{PatternId, RouteId, StopId};

/// One directional, ordered stop sequence realised by a route's geometry.
///
/// # Invariants
///
/// - Stops appear in traversal order
/// - A stop appears at most once (no self-loops within a pattern)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoutePattern {
    id: PatternId,
    stops: Vec<StopId>,
}

impl RoutePattern {
    /// Construct a pattern, dropping any repeat visits of a stop so each stop
    /// keeps only its first position.
    pub fn new(id: PatternId, stops: Vec<StopId>) -> Self {
        let mut seen = std::collections::HashSet::new();
        let stops = stops
            .into_iter()
            .filter(|s| seen.insert(s.clone()))
            .collect();
        Self { id, stops }
    }

    pub fn id(&self) -> &PatternId {
        &self.id
    }

    pub fn route(&self) -> &RouteId {
        &self.id.route
    }

    pub fn stops(&self) -> &[StopId] {
        &self.stops
    }

    /// Position of a stop in traversal order.
    pub fn position(&self, stop: &StopId) -> Option<usize> {
        self.stops.iter().position(|s| s == stop)
    }

    /// The stops from `start` to `goal` inclusive, if `goal` comes strictly
    /// after `start` in this pattern.
    pub fn slice_between(&self, start: &StopId, goal: &StopId) -> Option<&[StopId]> {
        let from = self.position(start)?;
        let to = self.position(goal)?;
        if to <= from {
            return None;
        }
        Some(&self.stops[from..=to])
    }

    /// Pairs of consecutive stops.
    pub fn hops(&self) -> impl Iterator<Item = (&StopId, &StopId)> {
        self.stops.windows(2).map(|w| (&w[0], &w[1]))
    }
}

/// A directed hop between two adjacent stops on some pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Edge {
    pub from: StopId,
    pub to: StopId,
    pub route: RouteId,
    /// The originating pattern. `None` for edges derived from stop-time
    /// sequences when no shape was available.
    pub pattern: Option<PatternId>,
    /// Estimated traversal time in minutes.
    pub duration_mins: u32,
}

/// Grouping key used when searching: the pattern when known, otherwise the
/// route.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LineKey {
    Pattern(PatternId),
    Route(RouteId),
}

impl Edge {
    pub fn new(
        from: StopId,
        to: StopId,
        route: RouteId,
        pattern: Option<PatternId>,
        duration_mins: u32,
    ) -> Self {
        Self {
            from,
            to,
            route,
            pattern,
            duration_mins,
        }
    }

    pub fn line_key(&self) -> LineKey {
        match &self.pattern {
            Some(p) => LineKey::Pattern(p.clone()),
            None => LineKey::Route(self.route.clone()),
        }
    }
}
