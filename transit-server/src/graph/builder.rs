//! Graph construction from a feed snapshot.
//!
//! For each route and direction a representative shape is matched against
//! the stops to produce a route pattern. Trips whose shape is missing or
//! unusable fall back to their ordered stop-time sequence; those edges carry
//! no pattern.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use tracing::{debug, warn};

use crate::domain::{Direction, Edge, PatternId, RouteId, RoutePattern, StopId};
use crate::feed::record::{self, Record, fields};
use crate::feed::{FeedSnapshot, Section};

use super::config::GraphConfig;
use super::connectivity::ConnectivityGraph;
use super::shape_matcher::{ShapePoint, match_stops};
use super::stop_index::StopIndex;

/// The parts of a trip record the builder needs.
#[derive(Debug, Clone)]
struct Trip {
    id: String,
    route: RouteId,
    shape_id: Option<String>,
    direction: Option<Direction>,
}

impl Trip {
    fn from_record(row: &Record) -> Option<Self> {
        let id = record::text(row, fields::TRIP_ID)?;
        let route = RouteId::parse(&record::text(row, fields::TRIP_ROUTE_ID)?).ok()?;
        Some(Self {
            id,
            route,
            shape_id: record::text(row, fields::TRIP_SHAPE_ID),
            direction: record::text(row, fields::TRIP_DIRECTION).map(Direction::new),
        })
    }
}

impl ConnectivityGraph {
    /// Build the graph from a feed snapshot.
    ///
    /// Absent sections produce a warning and, at worst, an empty graph;
    /// they are never an error.
    pub fn build(snapshot: &FeedSnapshot, config: &GraphConfig) -> Self {
        for section in Section::ALL {
            if snapshot.section(section).is_empty() {
                warn!(section = %section, "Feed section is empty, connections may be limited");
            }
        }

        let index = StopIndex::index(&snapshot.stops, &snapshot.routes);

        let trips: Vec<Trip> = snapshot
            .trips
            .iter()
            .filter_map(Trip::from_record)
            .filter(|t| index.contains_route(&t.route))
            .collect();

        let shapes = group_shapes(&snapshot.shapes);

        // One representative shape per (route, direction): the first trip seen
        let mut representatives: BTreeMap<PatternId, &str> = BTreeMap::new();
        for trip in &trips {
            let Some(shape_id) = trip.shape_id.as_deref() else {
                continue;
            };
            if !shapes.contains_key(shape_id) {
                continue;
            }
            let direction = Direction::from_shape_id(shape_id, config.direction_separator)
                .or_else(|| trip.direction.clone())
                .unwrap_or_else(|| Direction::new("0"));
            representatives
                .entry(PatternId::new(trip.route.clone(), direction))
                .or_insert(shape_id);
        }

        let mut patterns = Vec::new();
        let mut matched_shapes: BTreeSet<&str> = BTreeSet::new();
        for (pattern_id, shape_id) in representatives {
            let points = &shapes[shape_id];
            let stops = match_stops(points, index.stops(), config.match_threshold_m);
            if stops.len() < 2 {
                debug!(
                    pattern = %pattern_id,
                    shape = shape_id,
                    matched = stops.len(),
                    "Shape matched too few stops, using stop times instead"
                );
                continue;
            }
            debug!(pattern = %pattern_id, stops = stops.len(), "Matched route pattern");
            matched_shapes.insert(shape_id);
            patterns.push(RoutePattern::new(pattern_id, stops));
        }

        let fallback_trips: Vec<&Trip> = trips
            .iter()
            .filter(|t| {
                t.shape_id
                    .as_deref()
                    .is_none_or(|s| !matched_shapes.contains(s))
            })
            .collect();

        let mut extra_edges = stop_time_edges(
            &fallback_trips,
            &snapshot.stop_times,
            &index,
            config.edge_minutes,
        );
        extra_edges.extend(inline_route_edges(&snapshot.routes, &index, config.edge_minutes));

        ConnectivityGraph::from_parts(index, patterns, extra_edges, config.edge_minutes)
    }
}

/// Group shape rows by shape id, each sorted by point sequence.
///
/// Rows without a sequence number keep their feed order after sequenced
/// points.
fn group_shapes(rows: &[Record]) -> HashMap<String, Vec<ShapePoint>> {
    let mut shapes: HashMap<String, Vec<ShapePoint>> = HashMap::new();

    for (row_idx, row) in rows.iter().enumerate() {
        let Some(shape_id) = record::text(row, fields::SHAPE_ID) else {
            continue;
        };
        let (Some(lat), Some(lon)) = (
            record::float(row, fields::SHAPE_LAT),
            record::float(row, fields::SHAPE_LON),
        ) else {
            continue;
        };
        let sequence = record::int(row, fields::SHAPE_SEQUENCE).unwrap_or(i64::MAX / 2 + row_idx as i64);
        shapes
            .entry(shape_id)
            .or_default()
            .push(ShapePoint::new(lat, lon, sequence));
    }

    for points in shapes.values_mut() {
        points.sort_by_key(|p| p.sequence);
    }

    shapes
}

/// Edges between consecutive stops of each trip's stop-time sequence.
fn stop_time_edges(
    trips: &[&Trip],
    stop_times: &[Record],
    index: &StopIndex,
    edge_minutes: u32,
) -> Vec<Edge> {
    if trips.is_empty() {
        return Vec::new();
    }

    let wanted: HashMap<&str, &RouteId> = trips.iter().map(|t| (t.id.as_str(), &t.route)).collect();

    // trip id → (sequence, feed order, stop)
    let mut sequences: BTreeMap<String, Vec<(i64, usize, StopId)>> = BTreeMap::new();
    for (row_idx, row) in stop_times.iter().enumerate() {
        let Some(trip_id) = record::text(row, fields::STOP_TIME_TRIP_ID) else {
            continue;
        };
        if !wanted.contains_key(trip_id.as_str()) {
            continue;
        }
        let Some(stop) =
            record::text(row, fields::STOP_TIME_STOP_ID).and_then(|s| StopId::parse(&s).ok())
        else {
            continue;
        };
        let sequence = record::int(row, fields::STOP_SEQUENCE).unwrap_or(0);
        sequences
            .entry(trip_id)
            .or_default()
            .push((sequence, row_idx, stop));
    }

    let mut edges = Vec::new();
    for (trip_id, mut calls) in sequences {
        let route = wanted[trip_id.as_str()];
        calls.sort_by_key(|(seq, row, _)| (*seq, *row));

        for pair in calls.windows(2) {
            let (from, to) = (&pair[0].2, &pair[1].2);
            if from == to || !index.contains_stop(from) || !index.contains_stop(to) {
                continue;
            }
            edges.push(Edge::new(
                from.clone(),
                to.clone(),
                route.clone(),
                None,
                edge_minutes,
            ));
        }
    }

    edges
}

/// Edges from routes that list their stops inline (`"stops": [{"id": ..}]`),
/// as some feed exports do.
fn inline_route_edges(routes: &[Record], index: &StopIndex, edge_minutes: u32) -> Vec<Edge> {
    let mut edges = Vec::new();

    for row in routes {
        let Some(route) =
            record::text(row, fields::ROUTE_ID).and_then(|s| RouteId::parse(&s).ok())
        else {
            continue;
        };
        let Some(serde_json::Value::Array(items)) = row.get("stops") else {
            continue;
        };

        let stops: Vec<StopId> = items
            .iter()
            .filter_map(|item| match item {
                serde_json::Value::Object(obj) => record::text(obj, fields::STOP_ID),
                serde_json::Value::String(s) => Some(s.clone()),
                serde_json::Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .filter_map(|s| StopId::parse(&s).ok())
            .filter(|s| index.contains_stop(s))
            .collect();

        for pair in stops.windows(2) {
            if pair[0] != pair[1] {
                edges.push(Edge::new(
                    pair[0].clone(),
                    pair[1].clone(),
                    route.clone(),
                    None,
                    edge_minutes,
                ));
            }
        }
    }

    edges
}
