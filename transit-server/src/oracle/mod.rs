//! Reasoning oracle.
//!
//! Cross-checks a candidate path with external first-order logic solvers:
//! a model finder confirms the path's goal is consistently reachable, and a
//! theorem prover derives the goal from a step-indexed encoding of the path.
//! The oracle is advisory. Every failure comes back as a [`Verdict`].

mod archive;
mod config;
mod encode;
mod error;
mod mock;
mod remap;
mod solver;
mod verdict;

pub use archive::ProblemArchive;
pub use config::OracleConfig;
pub use encode::{
    Dialect, NodeNumbering, Problem, encode_existence, encode_verification, route_constant,
};
pub use error::OracleError;
pub use mock::ScriptedSolver;
pub use remap::{NodeMapping, remap_nodes};
pub use solver::{ProcessSolver, Solver};
pub use verdict::{MODEL_MARKERS, PROOF_MARKER, SolverKind, Verdict, VerdictKind};

use std::time::Duration;

use tracing::{info, warn};

use crate::domain::Path;

/// Encodes paths, runs the solvers, and archives what it asked.
pub struct ReasoningOracle<S: Solver> {
    model_finder: S,
    prover: S,
    config: OracleConfig,
    archive: Option<ProblemArchive>,
}

impl<S: Solver> ReasoningOracle<S> {
    pub fn new(model_finder: S, prover: S, config: OracleConfig) -> Self {
        let archive = config.archive_dir.clone().map(ProblemArchive::new);
        Self {
            model_finder,
            prover,
            config,
            archive,
        }
    }

    pub fn config(&self) -> &OracleConfig {
        &self.config
    }

    pub fn model_finder(&self) -> &S {
        &self.model_finder
    }

    pub fn prover(&self) -> &S {
        &self.prover
    }

    /// Ask the model finder whether the path's goal is consistently
    /// reachable. A model confirms existence, not this particular path.
    pub async fn confirm_existence(&self, path: &Path) -> Verdict {
        let problem = encode_existence(path, self.config.include_direct, self.config.timeout_secs());
        self.ask(problem, &self.model_finder, self.config.model_finder_timeout())
            .await
    }

    /// Ask the theorem prover to derive the path's goal from its step chain.
    pub async fn verify_path(&self, path: &Path) -> Verdict {
        let problem = encode_verification(path, self.config.timeout_secs());
        self.ask(problem, &self.prover, self.config.timeout).await
    }

    async fn ask(
        &self,
        problem: Result<Problem, OracleError>,
        solver: &S,
        timeout: Duration,
    ) -> Verdict {
        let problem = match problem {
            Ok(problem) => problem,
            Err(err) => {
                warn!(error = %err, "Could not encode solver problem");
                return Verdict::from_error(&err, Duration::ZERO);
            }
        };

        info!(
            dialect = %problem.dialect,
            solver = %solver.kind(),
            nodes = problem.mapping.len(),
            largest = ?problem.mapping.largest(),
            "Invoking solver"
        );

        let verdict = solver.solve(&problem.text, timeout).await;

        info!(
            dialect = %problem.dialect,
            verdict = %verdict.kind,
            elapsed_ms = verdict.elapsed.as_millis() as u64,
            "Solver finished"
        );

        if let Some(archive) = &self.archive {
            archive
                .save(problem.dialect, &problem.text, &verdict.output)
                .await;
        }

        verdict
    }
}
