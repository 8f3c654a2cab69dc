//! Search configuration for the path planner.

/// Configuration parameters for path search.
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// A solution with at most this many transfers ends the search
    /// immediately, even if a better one might exist.
    pub accept_transfers: usize,

    /// Partial paths needing more transfers than this are pruned.
    pub max_transfers: usize,

    /// Maximum number of states popped from the queue before giving up.
    pub max_expansions: usize,
}

impl PlannerConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(accept_transfers: usize, max_transfers: usize, max_expansions: usize) -> Self {
        Self {
            accept_transfers,
            max_transfers,
            max_expansions,
        }
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            accept_transfers: 1,
            max_transfers: 4,
            max_expansions: 200_000,
        }
    }
}
