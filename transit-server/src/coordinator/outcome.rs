//! Planning results.

use std::fmt;

use serde::Serialize;

use crate::domain::{Path, RouteId, StopId};
use crate::graph::StopIndex;
use crate::planner::SearchStrategy;

use super::stage::StageReport;

/// Which cascade stage stands behind a returned path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProofMethod {
    /// Start and goal are the same stop.
    Trivial,
    /// One route pattern joins start and goal.
    DirectRoute,
    /// The theorem prover derived the goal from the path.
    TheoremProved,
    /// The model finder confirmed the goal is reachable; the path itself was
    /// not proved.
    ModelFound,
    /// Found by search alone: the oracle was disabled or confirmed nothing.
    Unverified,
}

impl ProofMethod {
    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            ProofMethod::Trivial => "Trivial (same stop)",
            ProofMethod::DirectRoute => "Direct route",
            ProofMethod::TheoremProved => "Prover9 (Theorem Proved)",
            ProofMethod::ModelFound => "Mace4 (Model Found)",
            ProofMethod::Unverified => "Graph search (unverified)",
        }
    }
}

impl fmt::Display for ProofMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One hop of a planned route, with display names resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub from_stop: String,
    pub from_stop_id: StopId,
    pub to_stop: String,
    pub to_stop_id: StopId,
    pub route_name: String,
    pub route_id: RouteId,
    pub duration_minutes: u32,
}

impl Segment {
    /// Segments for every edge of `path`.
    pub fn for_path(path: &Path, index: &StopIndex) -> Vec<Segment> {
        path.edges()
            .iter()
            .map(|edge| Segment {
                from_stop: index.stop_name(&edge.from),
                from_stop_id: edge.from.clone(),
                to_stop: index.stop_name(&edge.to),
                to_stop_id: edge.to.clone(),
                route_name: index.route_name(&edge.route),
                route_id: edge.route.clone(),
                duration_minutes: edge.duration_mins,
            })
            .collect()
    }
}

/// A successful planning result.
#[derive(Debug, Clone)]
pub struct PlanOutcome {
    pub start: StopId,
    pub goal: StopId,
    pub path: Path,
    pub segments: Vec<Segment>,
    pub transfers: usize,
    pub total_minutes: u32,
    pub proof_method: ProofMethod,
    /// The search that found the path.
    pub strategy: SearchStrategy,
    /// Stages that ran, in order.
    pub stages: Vec<StageReport>,
}
