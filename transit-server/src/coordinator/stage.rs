//! The stages of the planning cascade.

use std::fmt;

use serde::Serialize;

use crate::oracle::VerdictKind;

/// One step of the planning cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Look for a single route pattern joining start and goal.
    DirectRoute,
    /// Best-first search, then reachability BFS.
    CandidateSearch,
    /// Model finder confirms the goal is consistently reachable.
    ExistenceCheck,
    /// Theorem prover derives the goal from the candidate's step chain.
    VerificationCheck,
}

/// The stages, in the order they run.
pub const CASCADE: [Stage; 4] = [
    Stage::DirectRoute,
    Stage::CandidateSearch,
    Stage::ExistenceCheck,
    Stage::VerificationCheck,
];

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::DirectRoute => "direct_route",
            Stage::CandidateSearch => "candidate_search",
            Stage::ExistenceCheck => "existence_check",
            Stage::VerificationCheck => "verification_check",
        }
    }

    /// Whether this stage consults the oracle.
    pub fn uses_oracle(&self) -> bool {
        matches!(self, Stage::ExistenceCheck | Stage::VerificationCheck)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the cascade does after a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageOutcome {
    /// Run the next stage.
    Continue,
    /// Stop with the path found so far.
    Finish,
    /// Stop with no path.
    Fail,
}

/// How a stage went, for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    /// The stage produced or confirmed a path.
    Succeeded,
    /// The stage ran without success.
    Failed,
    /// The stage did not run (oracle disabled).
    Skipped,
}

/// A record of one stage that ran.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageReport {
    pub stage: Stage,
    pub status: StageStatus,
    /// Solver verdict, for oracle stages that ran.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verdict: Option<VerdictKind>,
    pub elapsed_ms: u64,
}

impl StageReport {
    pub fn new(stage: Stage, status: StageStatus, elapsed_ms: u64) -> Self {
        Self {
            stage,
            status,
            verdict: None,
            elapsed_ms,
        }
    }

    pub fn with_verdict(mut self, verdict: VerdictKind) -> Self {
        self.verdict = Some(verdict);
        self
    }
}
