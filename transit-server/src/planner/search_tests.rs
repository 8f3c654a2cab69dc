//! Unit tests for the best-first path search.

use super::*;
use crate::domain::{Direction, Edge, PatternId, RoutePattern, Stop};
use crate::graph::StopIndex;
use proptest::prelude::*;

fn stop(s: &str) -> StopId {
    StopId::parse(s).unwrap()
}

fn route(s: &str) -> RouteId {
    RouteId::parse(s).unwrap()
}

fn pattern(r: &str, stops: &[&str]) -> RoutePattern {
    RoutePattern::new(
        PatternId::new(route(r), Direction::new("0")),
        stops.iter().map(|s| stop(s)).collect(),
    )
}

/// Edges with no pattern, as derived from stop times.
fn hops(r: &str, stops: &[&str]) -> Vec<Edge> {
    stops
        .windows(2)
        .map(|w| Edge::new(stop(w[0]), stop(w[1]), route(r), None, 5))
        .collect()
}

fn graph(patterns: Vec<RoutePattern>, extra: Vec<Edge>) -> ConnectivityGraph {
    let mut index = StopIndex::default();
    for s in ["A", "B", "C", "D", "E", "X", "Y", "Z"] {
        index.insert_stop(Stop::new(stop(s), format!("Stop {s}"), 46.7, 23.6));
    }
    ConnectivityGraph::from_parts(index, patterns, extra, 5)
}

fn routes(path: &Path) -> Vec<&str> {
    path.edges().iter().map(|e| e.route.as_str()).collect()
}

fn stops(path: &Path) -> Vec<&str> {
    path.stops().iter().map(|s| s.as_str()).collect()
}

#[test]
fn single_route_is_direct() {
    let g = graph(vec![pattern("R1", &["A", "B", "C"])], vec![]);
    let config = PlannerConfig::default();
    let planner = PathPlanner::new(&g, &config);

    let planned = planner.find_path(&stop("A"), &stop("C"), true).unwrap();

    assert_eq!(planned.strategy, SearchStrategy::DirectRoute);
    assert_eq!(stops(&planned.path), vec!["A", "B", "C"]);
    assert_eq!(routes(&planned.path), vec!["R1", "R1"]);
    assert_eq!(planned.transfers(), 0);
}

#[test]
fn disconnected_stop_not_found() {
    let g = graph(vec![pattern("R1", &["A", "B", "C"])], vec![]);
    let config = PlannerConfig::default();
    let planner = PathPlanner::new(&g, &config);

    assert!(planner.find_path(&stop("A"), &stop("Z"), true).is_none());
}

#[test]
fn same_stop_is_trivial() {
    let g = graph(vec![], vec![]);
    let config = PlannerConfig::default();
    let planner = PathPlanner::new(&g, &config);

    let planned = planner.find_path(&stop("Z"), &stop("Z"), true).unwrap();
    assert_eq!(planned.strategy, SearchStrategy::Trivial);
    assert!(planned.path.is_empty());
    assert_eq!(planned.transfers(), 0);
}

#[test]
fn start_without_outgoing_edges() {
    let g = graph(vec![pattern("R1", &["A", "B"])], vec![]);
    let config = PlannerConfig::default();
    let planner = PathPlanner::new(&g, &config);

    assert!(planner.find_path(&stop("B"), &stop("A"), true).is_none());
}

#[test]
fn one_transfer_between_patterns() {
    let g = graph(
        vec![pattern("R1", &["A", "B", "C"]), pattern("R2", &["C", "D", "E"])],
        vec![],
    );
    let config = PlannerConfig::default();
    let planner = PathPlanner::new(&g, &config);

    let planned = planner.find_path(&stop("A"), &stop("E"), true).unwrap();

    assert_eq!(planned.strategy, SearchStrategy::BestFirst);
    assert_eq!(stops(&planned.path), vec!["A", "B", "C", "D", "E"]);
    assert_eq!(planned.transfers(), 1);
    assert_eq!(planned.path.total_minutes(), 20);
}

/// R1 runs A-B-C-D-E with no transfers; R2 then R3 reach E in two hops.
fn long_way_or_short_way() -> ConnectivityGraph {
    let mut extra = hops("R1", &["A", "B", "C", "D", "E"]);
    extra.extend(hops("R2", &["A", "X"]));
    extra.extend(hops("R3", &["X", "E"]));
    graph(vec![], extra)
}

#[test]
fn fewer_transfers_preferred() {
    let g = long_way_or_short_way();
    let config = PlannerConfig::default();
    let planner = PathPlanner::new(&g, &config);

    let planned = planner.find_path(&stop("A"), &stop("E"), true).unwrap();

    assert_eq!(planned.strategy, SearchStrategy::BestFirst);
    assert_eq!(planned.transfers(), 0);
    assert_eq!(planned.path.len(), 4);
}

#[test]
fn fewer_stops_when_not_preferring_transfers() {
    let g = long_way_or_short_way();
    let config = PlannerConfig::default();
    let planner = PathPlanner::new(&g, &config);

    let planned = planner.find_path(&stop("A"), &stop("E"), false).unwrap();

    assert_eq!(routes(&planned.path), vec!["R2", "R3"]);
    assert_eq!(planned.transfers(), 1);
}

#[test]
fn solution_above_accept_bound_keeps_searching() {
    let g = long_way_or_short_way();
    let config = PlannerConfig::new(0, 4, 10_000);
    let planner = PathPlanner::new(&g, &config);

    // Shortest path has one transfer, which the bound of zero rejects
    let path = planner.best_first(&stop("A"), &stop("E"), false).unwrap();
    assert_eq!(count_transfers(&path), 0);
    assert_eq!(path.len(), 4);
}

#[test]
fn best_answer_above_bound_still_returned() {
    let mut extra = hops("R2", &["A", "X"]);
    extra.extend(hops("R3", &["X", "E"]));
    let g = graph(vec![], extra);
    let config = PlannerConfig::new(0, 4, 10_000);
    let planner = PathPlanner::new(&g, &config);

    let path = planner.best_first(&stop("A"), &stop("E"), true).unwrap();
    assert_eq!(count_transfers(&path), 1);
}

#[test]
fn stays_on_current_line_at_equal_cost() {
    // From B, both R1 and R2 continue to C; arriving on R1 should keep R1
    let mut extra = hops("R1", &["A", "B", "C"]);
    extra.extend(hops("R2", &["B", "C"]));
    let g = graph(vec![], extra);
    let config = PlannerConfig::default();
    let planner = PathPlanner::new(&g, &config);

    let path = planner.best_first(&stop("A"), &stop("C"), true).unwrap();
    assert_eq!(routes(&path), vec!["R1", "R1"]);
}

#[test]
fn max_transfers_falls_back_to_bfs() {
    let mut extra = hops("R1", &["A", "B"]);
    extra.extend(hops("R2", &["B", "C"]));
    extra.extend(hops("R3", &["C", "D"]));
    let g = graph(vec![], extra);
    let config = PlannerConfig::new(1, 1, 10_000);
    let planner = PathPlanner::new(&g, &config);

    let planned = planner.find_path(&stop("A"), &stop("D"), true).unwrap();

    assert_eq!(planned.strategy, SearchStrategy::Bfs);
    assert_eq!(planned.transfers(), 2);
}

#[test]
fn expansion_cap_falls_back_to_bfs() {
    let g = long_way_or_short_way();
    let config = PlannerConfig::new(1, 4, 1);
    let planner = PathPlanner::new(&g, &config);

    let planned = planner.find_path(&stop("A"), &stop("E"), true).unwrap();
    assert_eq!(planned.strategy, SearchStrategy::Bfs);
    assert_eq!(planned.path.destination(), Some(&stop("E")));
}

#[test]
fn direct_route_checked_before_search() {
    // The R2 pattern is shorter in hops but the direct R1 pattern wins
    let mut extra = hops("R2", &["A", "X"]);
    extra.extend(hops("R3", &["X", "D"]));
    let g = graph(vec![pattern("R1", &["A", "B", "C", "D"])], extra);
    let config = PlannerConfig::default();
    let planner = PathPlanner::new(&g, &config);

    let planned = planner.find_path(&stop("A"), &stop("D"), false).unwrap();
    assert_eq!(planned.strategy, SearchStrategy::DirectRoute);
    assert_eq!(routes(&planned.path), vec!["R1", "R1", "R1"]);
}

#[test]
fn search_skips_direct_route() {
    let g = graph(vec![pattern("R1", &["A", "B", "C"])], vec![]);
    let config = PlannerConfig::default();
    let planner = PathPlanner::new(&g, &config);

    let planned = planner.search(&stop("A"), &stop("C"), true).unwrap();
    assert_eq!(planned.strategy, SearchStrategy::BestFirst);
    assert_eq!(planned.transfers(), 0);
}

#[test]
fn cycles_do_not_hang() {
    let mut extra = hops("R1", &["A", "B", "C", "A"]);
    extra.extend(hops("R2", &["C", "B"]));
    let g = graph(vec![], extra);
    let config = PlannerConfig::default();
    let planner = PathPlanner::new(&g, &config);

    assert!(planner.find_path(&stop("A"), &stop("Z"), true).is_none());
}

proptest! {
    /// Durations never influence the transfer count
    #[test]
    fn transfers_ignore_durations(
        (route_ids, durations, shuffled) in proptest::collection::vec((0u8..3, 1u32..30), 1..12)
            .prop_flat_map(|legs| {
                let routes: Vec<u8> = legs.iter().map(|(r, _)| *r).collect();
                let durations: Vec<u32> = legs.iter().map(|(_, d)| *d).collect();
                (Just(routes), Just(durations.clone()), Just(durations).prop_shuffle())
            })
    ) {
        let build = |durations: &[u32]| {
            let edges = route_ids
                .iter()
                .zip(durations)
                .enumerate()
                .map(|(i, (r, d))| {
                    Edge::new(
                        stop(&format!("S{i}")),
                        stop(&format!("S{}", i + 1)),
                        route(&format!("R{r}")),
                        None,
                        *d,
                    )
                })
                .collect();
            Path::new(edges).unwrap()
        };

        let original = build(&durations);
        let permuted = build(&shuffled);
        prop_assert_eq!(count_transfers(&original), count_transfers(&permuted));

        let expected = route_ids.windows(2).filter(|w| w[0] != w[1]).count();
        prop_assert_eq!(count_transfers(&original), expected);
    }
}
