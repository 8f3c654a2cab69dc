//! Solver verdicts.

use std::fmt;
use std::time::Duration;

use serde::Serialize;

use super::error::OracleError;

/// Marker printed by the theorem prover on success.
pub const PROOF_MARKER: &str = "THEOREM PROVED";

/// Markers (case-insensitive) printed by the model finder on success.
pub const MODEL_MARKERS: [&str; 2] = ["exiting", "model"];

/// Which kind of external solver produced an output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SolverKind {
    /// Prover9-style theorem prover.
    Prover,
    /// Mace4-style model finder.
    ModelFinder,
}

impl SolverKind {
    /// Classify raw solver output.
    pub fn classify(&self, output: &str) -> VerdictKind {
        match self {
            SolverKind::Prover if output.contains(PROOF_MARKER) => VerdictKind::Proved,
            SolverKind::ModelFinder => {
                let lower = output.to_lowercase();
                if MODEL_MARKERS.iter().any(|m| lower.contains(m)) {
                    VerdictKind::ModelFound
                } else {
                    VerdictKind::Failed
                }
            }
            SolverKind::Prover => VerdictKind::Failed,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SolverKind::Prover => "prover",
            SolverKind::ModelFinder => "model_finder",
        }
    }
}

impl fmt::Display for SolverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome category of one solver invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictKind {
    Proved,
    ModelFound,
    Failed,
    Timeout,
    Error,
}

impl VerdictKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerdictKind::Proved => "proved",
            VerdictKind::ModelFound => "model_found",
            VerdictKind::Failed => "failed",
            VerdictKind::Timeout => "timeout",
            VerdictKind::Error => "error",
        }
    }
}

impl fmt::Display for VerdictKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A categorized solver outcome with the raw output kept for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub kind: VerdictKind,
    /// Captured standard output, or the error message.
    pub output: String,
    pub elapsed: Duration,
}

impl Verdict {
    pub fn new(kind: VerdictKind, output: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            kind,
            output: output.into(),
            elapsed,
        }
    }

    /// Classify the output of a solver that ran to completion.
    pub fn from_output(solver: SolverKind, output: impl Into<String>, elapsed: Duration) -> Self {
        let output = output.into();
        Self::new(solver.classify(&output), output, elapsed)
    }

    /// Turn a solver error into a verdict.
    pub fn from_error(err: &OracleError, elapsed: Duration) -> Self {
        let kind = match err {
            OracleError::Timeout { .. } => VerdictKind::Timeout,
            _ => VerdictKind::Error,
        };
        Self::new(kind, err.to_string(), elapsed)
    }

    /// Whether the solver confirmed what it was asked.
    pub fn is_success(&self) -> bool {
        matches!(self.kind, VerdictKind::Proved | VerdictKind::ModelFound)
    }
}
