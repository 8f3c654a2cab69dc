//! The planning coordinator.
//!
//! Runs [`CASCADE`] stage by stage over a shared, read-only graph. Each
//! stage reads and updates a per-request [`PlanState`] and says whether to
//! go on. Only the candidate search can end a request without a path; the
//! oracle stages can only raise or lower confidence in it.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use crate::domain::{Path, StopId};
use crate::graph::ConnectivityGraph;
use crate::oracle::{ReasoningOracle, Solver, Verdict, VerdictKind};
use crate::planner::{PathPlanner, PlannedPath, PlannerConfig, SearchStrategy};

use super::error::PlanError;
use super::outcome::{PlanOutcome, ProofMethod, Segment};
use super::stage::{CASCADE, Stage, StageOutcome, StageReport, StageStatus};

/// Per-request state threaded through the cascade.
#[derive(Debug, Clone)]
pub struct PlanState {
    pub start: StopId,
    pub goal: StopId,
    pub prefer_fewer_transfers: bool,
    pub candidate: Option<PlannedPath>,
    pub existence: Option<Verdict>,
    pub verification: Option<Verdict>,
    pub reports: Vec<StageReport>,
}

impl PlanState {
    pub fn new(start: StopId, goal: StopId, prefer_fewer_transfers: bool) -> Self {
        Self {
            start,
            goal,
            prefer_fewer_transfers,
            candidate: None,
            existence: None,
            verification: None,
            reports: Vec::new(),
        }
    }

    /// The proof method the state supports.
    pub fn proof_method(&self) -> ProofMethod {
        let verdict_is = |v: &Option<Verdict>, kind| v.as_ref().is_some_and(|v| v.kind == kind);

        match self.candidate.as_ref().map(|c| c.strategy) {
            Some(SearchStrategy::Trivial) => ProofMethod::Trivial,
            Some(SearchStrategy::DirectRoute) => ProofMethod::DirectRoute,
            _ if verdict_is(&self.verification, VerdictKind::Proved) => ProofMethod::TheoremProved,
            _ if verdict_is(&self.existence, VerdictKind::ModelFound) => ProofMethod::ModelFound,
            _ => ProofMethod::Unverified,
        }
    }
}

/// Sequences the direct-route check, candidate search and oracle checks.
pub struct PlanningCoordinator<S: Solver> {
    graph: Arc<ConnectivityGraph>,
    config: PlannerConfig,
    oracle: Option<ReasoningOracle<S>>,
}

impl<S: Solver> PlanningCoordinator<S> {
    pub fn new(
        graph: Arc<ConnectivityGraph>,
        config: PlannerConfig,
        oracle: Option<ReasoningOracle<S>>,
    ) -> Self {
        Self {
            graph,
            config,
            oracle,
        }
    }

    pub fn graph(&self) -> &Arc<ConnectivityGraph> {
        &self.graph
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn oracle(&self) -> Option<&ReasoningOracle<S>> {
        self.oracle.as_ref().filter(|o| o.config().enabled)
    }

    /// Resolve a stop id or name.
    pub fn resolve(&self, identifier: &str) -> Result<StopId, PlanError> {
        self.graph
            .index()
            .resolve(identifier)
            .ok_or_else(|| PlanError::NotFound(identifier.to_string()))
    }

    /// Resolve both endpoints of a request, rejecting identical ones.
    pub fn resolve_endpoints(&self, start: &str, goal: &str) -> Result<(StopId, StopId), PlanError> {
        let start = self.resolve(start)?;
        let goal = self.resolve(goal)?;
        if start == goal {
            return Err(PlanError::SameEndpoint(start));
        }
        Ok((start, goal))
    }

    /// Plan a route between two stops.
    ///
    /// Identical endpoints succeed at once with an empty path and no oracle
    /// call. Unknown stops are `NotFound`; `NoPath` only after every search
    /// strategy is exhausted.
    pub async fn plan(
        &self,
        start: &StopId,
        goal: &StopId,
        prefer_fewer_transfers: bool,
    ) -> Result<PlanOutcome, PlanError> {
        for stop in [start, goal] {
            if !self.graph.index().contains_stop(stop) {
                return Err(PlanError::NotFound(stop.to_string()));
            }
        }

        let mut state = PlanState::new(start.clone(), goal.clone(), prefer_fewer_transfers);

        if start == goal {
            state.candidate = Some(PlannedPath {
                path: Path::empty(),
                strategy: SearchStrategy::Trivial,
            });
            return Ok(self.outcome(state));
        }

        info!(start = %start, goal = %goal, prefer_fewer_transfers, "Planning route");

        for stage in CASCADE {
            let started = Instant::now();
            let next = self.run_stage(stage, &mut state).await;
            debug!(
                stage = %stage,
                outcome = ?next,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Stage complete"
            );
            match next {
                StageOutcome::Continue => continue,
                StageOutcome::Finish => break,
                StageOutcome::Fail => {
                    return Err(PlanError::NoPath {
                        start: start.clone(),
                        goal: goal.clone(),
                    });
                }
            }
        }

        if state.candidate.is_none() {
            return Err(PlanError::NoPath {
                start: start.clone(),
                goal: goal.clone(),
            });
        }

        let outcome = self.outcome(state);
        info!(
            hops = outcome.path.len(),
            transfers = outcome.transfers,
            proof = %outcome.proof_method,
            "Route planned"
        );
        Ok(outcome)
    }

    /// Run one stage against the request state.
    pub async fn run_stage(&self, stage: Stage, state: &mut PlanState) -> StageOutcome {
        let started = Instant::now();
        let elapsed_ms = |started: Instant| started.elapsed().as_millis() as u64;

        match stage {
            Stage::DirectRoute => {
                let Some(direct) = self.graph.can_reach_on_single_route(&state.start, &state.goal)
                else {
                    state
                        .reports
                        .push(StageReport::new(stage, StageStatus::Failed, elapsed_ms(started)));
                    return StageOutcome::Continue;
                };
                state.candidate = Some(PlannedPath {
                    path: self.graph.direct_path(&direct),
                    strategy: SearchStrategy::DirectRoute,
                });
                state
                    .reports
                    .push(StageReport::new(stage, StageStatus::Succeeded, elapsed_ms(started)));
                StageOutcome::Finish
            }

            Stage::CandidateSearch => {
                let planner = PathPlanner::new(&self.graph, &self.config);
                let found = planner.search(&state.start, &state.goal, state.prefer_fewer_transfers);
                let status = if found.is_some() {
                    StageStatus::Succeeded
                } else {
                    StageStatus::Failed
                };
                state
                    .reports
                    .push(StageReport::new(stage, status, elapsed_ms(started)));

                match found {
                    Some(candidate) => {
                        state.candidate = Some(candidate);
                        StageOutcome::Continue
                    }
                    None => StageOutcome::Fail,
                }
            }

            Stage::ExistenceCheck | Stage::VerificationCheck => {
                let (Some(oracle), Some(candidate)) = (self.oracle(), state.candidate.as_ref())
                else {
                    state
                        .reports
                        .push(StageReport::new(stage, StageStatus::Skipped, 0));
                    return StageOutcome::Continue;
                };

                let verdict = if stage == Stage::ExistenceCheck {
                    oracle.confirm_existence(&candidate.path).await
                } else {
                    oracle.verify_path(&candidate.path).await
                };

                let status = if verdict.is_success() {
                    StageStatus::Succeeded
                } else {
                    StageStatus::Failed
                };
                state.reports.push(
                    StageReport::new(stage, status, elapsed_ms(started)).with_verdict(verdict.kind),
                );

                if stage == Stage::ExistenceCheck {
                    state.existence = Some(verdict);
                } else {
                    state.verification = Some(verdict);
                }
                StageOutcome::Continue
            }
        }
    }

    fn outcome(&self, state: PlanState) -> PlanOutcome {
        let proof_method = state.proof_method();
        let (path, strategy) = match state.candidate {
            Some(c) => (c.path, c.strategy),
            None => (Path::empty(), SearchStrategy::Trivial),
        };
        PlanOutcome {
            segments: Segment::for_path(&path, self.graph.index()),
            transfers: path.transfer_count(),
            total_minutes: path.total_minutes(),
            start: state.start,
            goal: state.goal,
            path,
            proof_method,
            strategy,
            stages: state.reports,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::domain::{Direction, Edge, PatternId, RouteId, RoutePattern, Stop};
    use crate::graph::StopIndex;
    use crate::oracle::{OracleConfig, ScriptedSolver, SolverKind};

    fn stop(s: &str) -> StopId {
        StopId::parse(s).unwrap()
    }

    /// R1 runs A-B-C as a pattern; R2 runs C-D from stop times only.
    /// Z is disconnected.
    fn graph() -> Arc<ConnectivityGraph> {
        let mut index = StopIndex::default();
        for s in ["A", "B", "C", "D", "Z"] {
            index.insert_stop(Stop::new(stop(s), format!("Stop {s}"), 46.7, 23.6));
        }
        let pattern = RoutePattern::new(
            PatternId::new(RouteId::parse("R1").unwrap(), Direction::new("0")),
            vec![stop("A"), stop("B"), stop("C")],
        );
        let extra = vec![Edge::new(
            stop("C"),
            stop("D"),
            RouteId::parse("R2").unwrap(),
            None,
            5,
        )];
        Arc::new(ConnectivityGraph::from_parts(index, vec![pattern], extra, 5))
    }

    fn coordinator(
        finder: VerdictKind,
        prover: VerdictKind,
    ) -> PlanningCoordinator<ScriptedSolver> {
        let oracle = ReasoningOracle::new(
            ScriptedSolver::always(SolverKind::ModelFinder, finder),
            ScriptedSolver::always(SolverKind::Prover, prover),
            OracleConfig::default(),
        );
        PlanningCoordinator::new(graph(), PlannerConfig::default(), Some(oracle))
    }

    fn oracle_calls(c: &PlanningCoordinator<ScriptedSolver>) -> usize {
        let oracle = c.oracle.as_ref().unwrap();
        oracle.model_finder().calls() + oracle.prover().calls()
    }

    fn stages(outcome: &PlanOutcome) -> Vec<(Stage, StageStatus)> {
        outcome.stages.iter().map(|r| (r.stage, r.status)).collect()
    }

    #[tokio::test]
    async fn direct_route_skips_oracle() {
        let c = coordinator(VerdictKind::ModelFound, VerdictKind::Proved);

        let outcome = c.plan(&stop("A"), &stop("C"), true).await.unwrap();

        assert_eq!(outcome.proof_method, ProofMethod::DirectRoute);
        assert_eq!(outcome.path.len(), 2);
        assert_eq!(outcome.transfers, 0);
        assert_eq!(outcome.total_minutes, 10);
        assert_eq!(oracle_calls(&c), 0);
        assert_eq!(
            stages(&outcome),
            vec![(Stage::DirectRoute, StageStatus::Succeeded)]
        );
    }

    #[tokio::test]
    async fn same_stop_is_trivial() {
        let c = coordinator(VerdictKind::ModelFound, VerdictKind::Proved);

        let outcome = c.plan(&stop("B"), &stop("B"), true).await.unwrap();

        assert_eq!(outcome.proof_method, ProofMethod::Trivial);
        assert!(outcome.path.is_empty());
        assert_eq!(outcome.transfers, 0);
        assert!(outcome.stages.is_empty());
        assert_eq!(oracle_calls(&c), 0);
    }

    #[tokio::test]
    async fn proved_candidate() {
        let c = coordinator(VerdictKind::ModelFound, VerdictKind::Proved);

        let outcome = c.plan(&stop("A"), &stop("D"), true).await.unwrap();

        assert_eq!(outcome.proof_method, ProofMethod::TheoremProved);
        assert_eq!(outcome.strategy, SearchStrategy::BestFirst);
        assert_eq!(outcome.transfers, 1);
        assert_eq!(outcome.segments.last().unwrap().to_stop, "Stop D");
        assert_eq!(
            stages(&outcome),
            vec![
                (Stage::DirectRoute, StageStatus::Failed),
                (Stage::CandidateSearch, StageStatus::Succeeded),
                (Stage::ExistenceCheck, StageStatus::Succeeded),
                (Stage::VerificationCheck, StageStatus::Succeeded),
            ]
        );
    }

    #[tokio::test]
    async fn failed_proof_downgrades_to_model() {
        let c = coordinator(VerdictKind::ModelFound, VerdictKind::Failed);

        let outcome = c.plan(&stop("A"), &stop("D"), true).await.unwrap();

        assert_eq!(outcome.proof_method, ProofMethod::ModelFound);
        assert_eq!(outcome.path.destination(), Some(&stop("D")));
    }

    #[tokio::test]
    async fn oracle_errors_keep_path() {
        let c = coordinator(VerdictKind::Error, VerdictKind::Timeout);

        let outcome = c.plan(&stop("A"), &stop("D"), true).await.unwrap();

        assert_eq!(outcome.proof_method, ProofMethod::Unverified);
        assert_eq!(outcome.path.len(), 3);
        assert_eq!(outcome.stages[2].verdict, Some(VerdictKind::Error));
        assert_eq!(outcome.stages[3].verdict, Some(VerdictKind::Timeout));
    }

    #[tokio::test]
    async fn no_path_never_calls_oracle() {
        let c = coordinator(VerdictKind::ModelFound, VerdictKind::Proved);

        let err = c.plan(&stop("A"), &stop("Z"), true).await.unwrap_err();

        assert_eq!(
            err,
            PlanError::NoPath {
                start: stop("A"),
                goal: stop("Z")
            }
        );
        assert_eq!(oracle_calls(&c), 0);
    }

    #[tokio::test]
    async fn unknown_stop_not_found() {
        let c = coordinator(VerdictKind::ModelFound, VerdictKind::Proved);

        let err = c.plan(&stop("A"), &stop("Nope"), true).await.unwrap_err();
        assert_eq!(err, PlanError::NotFound("Nope".into()));
    }

    #[tokio::test]
    async fn without_oracle_stages_skip() {
        let c: PlanningCoordinator<ScriptedSolver> =
            PlanningCoordinator::new(graph(), PlannerConfig::default(), None);

        let outcome = c.plan(&stop("A"), &stop("D"), true).await.unwrap();

        assert_eq!(outcome.proof_method, ProofMethod::Unverified);
        assert_eq!(outcome.stages[2].status, StageStatus::Skipped);
        assert_eq!(outcome.stages[3].status, StageStatus::Skipped);
    }

    #[tokio::test]
    async fn disabled_oracle_is_not_called() {
        let oracle = ReasoningOracle::new(
            ScriptedSolver::always(SolverKind::ModelFinder, VerdictKind::ModelFound),
            ScriptedSolver::always(SolverKind::Prover, VerdictKind::Proved),
            OracleConfig::disabled(),
        );
        let c = PlanningCoordinator::new(graph(), PlannerConfig::default(), Some(oracle));

        let outcome = c.plan(&stop("A"), &stop("D"), true).await.unwrap();

        assert_eq!(outcome.proof_method, ProofMethod::Unverified);
        assert_eq!(oracle_calls(&c), 0);
    }

    #[tokio::test]
    async fn slow_oracle_times_out_without_blocking() {
        let mut config = OracleConfig::default().with_timeout(Duration::from_millis(50));
        config.model_finder_grace = Duration::ZERO;
        let oracle = ReasoningOracle::new(
            ScriptedSolver::always(SolverKind::ModelFinder, VerdictKind::ModelFound)
                .with_delay(Duration::from_secs(60)),
            ScriptedSolver::always(SolverKind::Prover, VerdictKind::Proved)
                .with_delay(Duration::from_secs(60)),
            config,
        );
        let c = PlanningCoordinator::new(graph(), PlannerConfig::default(), Some(oracle));

        let started = Instant::now();
        let outcome = c.plan(&stop("A"), &stop("D"), true).await.unwrap();

        assert_eq!(outcome.proof_method, ProofMethod::Unverified);
        assert!(started.elapsed() < Duration::from_secs(20));
    }

    #[tokio::test]
    async fn stages_run_individually() {
        let c = coordinator(VerdictKind::ModelFound, VerdictKind::Proved);
        let mut state = PlanState::new(stop("A"), stop("D"), true);

        assert_eq!(
            c.run_stage(Stage::DirectRoute, &mut state).await,
            StageOutcome::Continue
        );
        assert!(state.candidate.is_none());

        // Oracle stages before any candidate skip
        assert_eq!(
            c.run_stage(Stage::VerificationCheck, &mut state).await,
            StageOutcome::Continue
        );
        assert_eq!(state.reports[1].status, StageStatus::Skipped);

        assert_eq!(
            c.run_stage(Stage::CandidateSearch, &mut state).await,
            StageOutcome::Continue
        );
        assert!(state.candidate.is_some());
    }

    #[test]
    fn resolve_endpoints_rejects_same_stop() {
        let c = coordinator(VerdictKind::ModelFound, VerdictKind::Proved);

        assert_eq!(
            c.resolve_endpoints("Stop A", "a"),
            Err(PlanError::SameEndpoint(stop("A")))
        );
        assert_eq!(
            c.resolve_endpoints("A", "Fabricii"),
            Err(PlanError::NotFound("Fabricii".into()))
        );
        assert_eq!(
            c.resolve_endpoints("A", "stop d"),
            Ok((stop("A"), stop("D")))
        );
    }
}
