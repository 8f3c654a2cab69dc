//! Scripted solver for testing without solver binaries.
//!
//! Returns pre-arranged verdicts in order and records every problem it is
//! given, so tests can assert which stages ran.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use super::solver::Solver;
use super::verdict::{SolverKind, Verdict, VerdictKind};

/// A solver that replays a script of verdict kinds.
///
/// Once the script runs out, every further call returns the fallback kind.
#[derive(Debug)]
pub struct ScriptedSolver {
    kind: SolverKind,
    script: Mutex<VecDeque<VerdictKind>>,
    fallback: VerdictKind,
    delay: Duration,
    problems: Mutex<Vec<String>>,
}

impl ScriptedSolver {
    /// A solver that always answers `verdict`.
    pub fn always(kind: SolverKind, verdict: VerdictKind) -> Self {
        Self::scripted(kind, [], verdict)
    }

    /// A solver that answers `script` in order, then `fallback`.
    pub fn scripted(
        kind: SolverKind,
        script: impl IntoIterator<Item = VerdictKind>,
        fallback: VerdictKind,
    ) -> Self {
        Self {
            kind,
            script: Mutex::new(script.into_iter().collect()),
            fallback,
            delay: Duration::ZERO,
            problems: Mutex::new(Vec::new()),
        }
    }

    /// Take `delay` to answer. A delay longer than the timeout yields a
    /// `Timeout` verdict once the timeout elapses.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Number of problems received.
    pub fn calls(&self) -> usize {
        self.problems.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Problems received, in order.
    pub fn problems(&self) -> Vec<String> {
        self.problems.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn next_kind(&self) -> VerdictKind {
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or(self.fallback)
    }

    fn canned_output(&self, kind: VerdictKind) -> &'static str {
        match (self.kind, kind) {
            (SolverKind::Prover, VerdictKind::Proved) => "THEOREM PROVED",
            (SolverKind::ModelFinder, VerdictKind::ModelFound) => "Exiting with 1 model.",
            (_, VerdictKind::Timeout) => "TIMEOUT",
            (_, VerdictKind::Error) => "ERROR: scripted failure",
            _ => "SEARCH FAILED",
        }
    }
}

impl Solver for ScriptedSolver {
    fn kind(&self) -> SolverKind {
        self.kind
    }

    async fn solve(&self, problem: &str, timeout: Duration) -> Verdict {
        self.problems
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(problem.to_string());

        if self.delay > timeout {
            tokio::time::sleep(timeout).await;
            return Verdict::new(VerdictKind::Timeout, "TIMEOUT", timeout);
        }
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let kind = self.next_kind();
        Verdict::new(kind, self.canned_output(kind), self.delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn replays_script_then_fallback() {
        let solver = ScriptedSolver::scripted(
            SolverKind::Prover,
            [VerdictKind::Failed, VerdictKind::Proved],
            VerdictKind::Error,
        );
        let timeout = Duration::from_secs(1);

        assert_eq!(solver.solve("a", timeout).await.kind, VerdictKind::Failed);
        assert_eq!(solver.solve("b", timeout).await.kind, VerdictKind::Proved);
        assert_eq!(solver.solve("c", timeout).await.kind, VerdictKind::Error);
        assert_eq!(solver.calls(), 3);
        assert_eq!(solver.problems(), vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn canned_output_matches_kind() {
        let solver = ScriptedSolver::always(SolverKind::ModelFinder, VerdictKind::ModelFound);
        let verdict = solver.solve("", Duration::from_secs(1)).await;
        assert_eq!(
            SolverKind::ModelFinder.classify(&verdict.output),
            VerdictKind::ModelFound
        );
    }

    #[tokio::test]
    async fn delay_beyond_timeout() {
        let solver = ScriptedSolver::always(SolverKind::Prover, VerdictKind::Proved)
            .with_delay(Duration::from_secs(60));

        let started = std::time::Instant::now();
        let verdict = solver.solve("", Duration::from_millis(50)).await;

        assert_eq!(verdict.kind, VerdictKind::Timeout);
        assert!(started.elapsed() < Duration::from_secs(5));
    }
}
