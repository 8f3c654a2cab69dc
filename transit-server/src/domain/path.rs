//! Path type.
//!
//! A `Path` is an ordered sequence of edges from a start stop to a goal
//! stop. Paths are created per request and discarded afterwards.

use super::{DomainError, Edge, RouteId, StopId};

/// An ordered, connected sequence of edges.
///
/// # Invariants
///
/// - Consecutive edges connect (`edges[i].to == edges[i + 1].from`)
/// - An empty path is only produced for identical start and goal
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Path {
    edges: Vec<Edge>,
}

impl Path {
    /// Constructs a path, validating that consecutive edges connect.
    ///
    /// # Errors
    ///
    /// Returns `Err` if `edges[i].to != edges[i + 1].from` for some `i`.
    ///
    /// # Examples
    ///
    /// ```
    /// use transit_server::domain::{Edge, Path, RouteId, StopId};
    ///
    /// let r1 = RouteId::parse("R1").unwrap();
    /// let a = StopId::parse("A").unwrap();
    /// let b = StopId::parse("B").unwrap();
    /// let c = StopId::parse("C").unwrap();
    ///
    /// let path = Path::new(vec![
    ///     Edge::new(a.clone(), b.clone(), r1.clone(), None, 5),
    ///     Edge::new(b, c.clone(), r1, None, 5),
    /// ])
    /// .unwrap();
    ///
    /// assert_eq!(path.len(), 2);
    /// assert_eq!(path.origin(), Some(&a));
    /// assert_eq!(path.destination(), Some(&c));
    /// assert_eq!(path.transfer_count(), 0);
    /// ```
    pub fn new(edges: Vec<Edge>) -> Result<Self, DomainError> {
        for window in edges.windows(2) {
            if window[0].to != window[1].from {
                return Err(DomainError::DisconnectedPath {
                    to: window[0].to.clone(),
                    from: window[1].from.clone(),
                });
            }
        }
        Ok(Path { edges })
    }

    /// The zero-length path used when start and goal coincide.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn origin(&self) -> Option<&StopId> {
        self.edges.first().map(|e| &e.from)
    }

    pub fn destination(&self) -> Option<&StopId> {
        self.edges.last().map(|e| &e.to)
    }

    /// Number of route changes between consecutive edges.
    ///
    /// The first edge never counts as a transfer; only a change of route id
    /// does (a change of direction on the same route does not).
    pub fn transfer_count(&self) -> usize {
        self.edges
            .windows(2)
            .filter(|w| w[0].route != w[1].route)
            .count()
    }

    /// Sum of the estimated edge durations in minutes.
    pub fn total_minutes(&self) -> u32 {
        self.edges.iter().map(|e| e.duration_mins).sum()
    }

    /// Stops visited in order, including origin and destination.
    pub fn stops(&self) -> Vec<&StopId> {
        let mut stops = Vec::with_capacity(self.edges.len() + 1);
        if let Some(first) = self.edges.first() {
            stops.push(&first.from);
        }
        stops.extend(self.edges.iter().map(|e| &e.to));
        stops
    }

    /// Routes ridden in order, one entry per unbroken run on a route.
    pub fn routes(&self) -> Vec<&RouteId> {
        let mut routes: Vec<&RouteId> = Vec::new();
        for edge in &self.edges {
            if routes.last() != Some(&&edge.route) {
                routes.push(&edge.route);
            }
        }
        routes
    }
}
