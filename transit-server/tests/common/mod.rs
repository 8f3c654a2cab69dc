//! Shared fixtures: a small network built from feed records.
//!
//! Route 35 runs 1-2-3 along a shape in both directions. Route 7 has no
//! shape and runs 3-4 from stop times only. Stop 9 is served by nothing.

#![allow(dead_code)]

use std::sync::Arc;

use serde_json::{Value, json};

use transit_server::coordinator::PlanningCoordinator;
use transit_server::domain::StopId;
use transit_server::feed::{FeedSnapshot, Record};
use transit_server::graph::{ConnectivityGraph, GraphConfig};
use transit_server::oracle::{OracleConfig, ReasoningOracle, ScriptedSolver, SolverKind, VerdictKind};
use transit_server::planner::PlannerConfig;

fn records(value: Value) -> Vec<Record> {
    serde_json::from_value(value).unwrap()
}

fn shape_rows(shape_id: &str, reverse: bool) -> Vec<Value> {
    let mut lons: Vec<f64> = (0..9).map(|i| 23.580 + 0.001 * i as f64).collect();
    if reverse {
        lons.reverse();
    }
    lons.iter()
        .enumerate()
        .map(|(i, lon)| {
            json!({"shape_id": shape_id, "shape_pt_lat": 46.77, "shape_pt_lon": lon, "shape_pt_sequence": i + 1})
        })
        .collect()
}

pub fn snapshot() -> FeedSnapshot {
    let mut shapes = shape_rows("35_0", false);
    shapes.extend(shape_rows("35_1", true));

    FeedSnapshot {
        stops: records(json!([
            {"stop_id": "1", "stop_name": "Piata Garii", "stop_lat": 46.7701, "stop_lon": 23.580},
            {"stop_id": "2", "stop_name": "Piata Mihai Viteazu", "stop_lat": 46.7699, "stop_lon": 23.584},
            {"stop_id": "3", "stop_name": "Memorandumului", "stop_lat": 46.7701, "stop_lon": 23.588},
            {"stop_id": "4", "stop_name": "Zorilor", "stop_lat": 46.755, "stop_lon": 23.575},
            {"stop_id": "9", "stop_name": "Aeroport", "stop_lat": 46.785, "stop_lon": 23.686},
        ])),
        routes: records(json!([
            {"route_id": "35", "route_short_name": "35", "route_long_name": "Garii - Centru"},
            {"route_id": 7, "route_short_name": "7", "route_long_name": "Centru - Zorilor"},
        ])),
        trips: records(json!([
            {"trip_id": "t35a", "route_id": "35", "shape_id": "35_0", "direction_id": 0},
            {"trip_id": "t35b", "route_id": "35", "shape_id": "35_1", "direction_id": 1},
            {"trip_id": "t7", "route_id": "7"},
        ])),
        stop_times: records(json!([
            {"trip_id": "t7", "stop_id": "3", "stop_sequence": 1},
            {"trip_id": "t7", "stop_id": "4", "stop_sequence": 2},
        ])),
        shapes: records(Value::Array(shapes)),
    }
}

pub fn graph() -> Arc<ConnectivityGraph> {
    Arc::new(ConnectivityGraph::build(&snapshot(), &GraphConfig::default()))
}

pub fn stop(s: &str) -> StopId {
    StopId::parse(s).unwrap()
}

pub fn oracle(
    model_finder: VerdictKind,
    prover: VerdictKind,
) -> ReasoningOracle<ScriptedSolver> {
    ReasoningOracle::new(
        ScriptedSolver::always(SolverKind::ModelFinder, model_finder),
        ScriptedSolver::always(SolverKind::Prover, prover),
        OracleConfig::default(),
    )
}

pub fn coordinator(
    oracle: Option<ReasoningOracle<ScriptedSolver>>,
) -> PlanningCoordinator<ScriptedSolver> {
    PlanningCoordinator::new(graph(), PlannerConfig::default(), oracle)
}

pub fn oracle_calls(coordinator: &PlanningCoordinator<ScriptedSolver>) -> usize {
    coordinator
        .oracle()
        .map(|o| o.model_finder().calls() + o.prover().calls())
        .unwrap_or(0)
}
