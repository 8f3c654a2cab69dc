//! Graph construction configuration.

/// Configuration parameters for building the connectivity graph.
#[derive(Debug, Clone)]
pub struct GraphConfig {
    /// Maximum distance (metres) between a stop and its nearest shape point
    /// for the stop to be assigned to that shape.
    pub match_threshold_m: f64,

    /// Estimated traversal time of every edge (minutes).
    pub edge_minutes: u32,

    /// Separator before the direction tag in shape identifiers
    /// (e.g. `35_0` → direction `0`).
    pub direction_separator: char,
}

impl GraphConfig {
    pub fn new(match_threshold_m: f64, edge_minutes: u32, direction_separator: char) -> Self {
        Self {
            match_threshold_m,
            edge_minutes,
            direction_separator,
        }
    }
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            match_threshold_m: 50.0,
            edge_minutes: 5,
            direction_separator: '_',
        }
    }
}
