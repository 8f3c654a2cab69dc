//! Data transfer objects for web requests and responses.

use std::collections::BTreeMap;

use chrono::{Duration, Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::coordinator::{PlanOutcome, Segment, StageReport};
use crate::domain::{Route, Stop};
use crate::ticketing::TicketQuote;

/// Request to plan a trip.
#[derive(Debug, Deserialize)]
pub struct PlanTripRequest {
    /// Stop id or (part of a) stop name
    pub start_stop: String,

    /// Stop id or (part of a) stop name
    pub end_stop: String,

    /// ISO 8601 local date-time, or "now" (the default)
    pub departure_time: Option<String>,

    #[serde(default = "default_true")]
    pub prefer_fewer_transfers: bool,
}

fn default_true() -> bool {
    true
}

impl PlanTripRequest {
    /// The requested departure, falling back to now when absent or
    /// unparseable.
    pub fn departure(&self) -> NaiveDateTime {
        self.departure_time
            .as_deref()
            .filter(|t| !t.eq_ignore_ascii_case("now"))
            .and_then(parse_departure)
            .unwrap_or_else(|| Local::now().naive_local())
    }
}

/// Parse an ISO 8601 local date-time, with or without seconds.
fn parse_departure(raw: &str) -> Option<NaiveDateTime> {
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw.trim(), fmt).ok())
}

/// One hop of a planned trip.
#[derive(Debug, Serialize)]
pub struct SegmentResult {
    pub from_stop: String,
    pub from_stop_id: String,
    pub to_stop: String,
    pub to_stop_id: String,
    pub route_name: String,
    pub route_id: String,

    /// Estimated departure (HH:MM)
    pub departure_time: Option<String>,

    /// Estimated arrival (HH:MM)
    pub arrival_time: Option<String>,

    pub duration_minutes: u32,
}

/// Response for a trip plan.
#[derive(Debug, Serialize)]
pub struct PlanTripResponse {
    pub success: bool,
    pub route: Vec<SegmentResult>,
    pub total_duration_minutes: u32,
    pub total_transfers: usize,
    pub total_cost: f64,
    pub tickets_needed: u32,
    pub proof_method: String,

    /// Cascade stages that ran, in order
    pub oracle_stages: Vec<StageReport>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PlanTripResponse {
    /// Build from a planning outcome, estimating segment times from
    /// `departure`.
    pub fn from_outcome(outcome: &PlanOutcome, departure: NaiveDateTime, quote: TicketQuote) -> Self {
        Self {
            success: true,
            route: SegmentResult::timed(&outcome.segments, departure),
            total_duration_minutes: outcome.total_minutes,
            total_transfers: outcome.transfers,
            total_cost: quote.cost,
            tickets_needed: quote.tickets,
            proof_method: outcome.proof_method.label().to_string(),
            oracle_stages: outcome.stages.clone(),
            error: None,
        }
    }

    /// A response for a request that found no route.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            route: Vec::new(),
            total_duration_minutes: 0,
            total_transfers: 0,
            total_cost: 0.0,
            tickets_needed: 0,
            proof_method: "None".to_string(),
            oracle_stages: Vec::new(),
            error: Some(message.into()),
        }
    }
}

impl SegmentResult {
    /// Convert segments, accumulating estimated times from `departure`.
    pub fn timed(segments: &[Segment], departure: NaiveDateTime) -> Vec<Self> {
        let mut clock = departure;
        segments
            .iter()
            .map(|s| {
                let leaves = clock;
                clock += Duration::minutes(i64::from(s.duration_minutes));
                SegmentResult {
                    from_stop: s.from_stop.clone(),
                    from_stop_id: s.from_stop_id.to_string(),
                    to_stop: s.to_stop.clone(),
                    to_stop_id: s.to_stop_id.to_string(),
                    route_name: s.route_name.clone(),
                    route_id: s.route_id.to_string(),
                    departure_time: Some(leaves.format("%H:%M").to_string()),
                    arrival_time: Some(clock.format("%H:%M").to_string()),
                    duration_minutes: s.duration_minutes,
                }
            })
            .collect()
    }
}

/// API overview.
#[derive(Debug, Serialize)]
pub struct IndexResponse {
    pub message: &'static str,
    pub endpoints: BTreeMap<&'static str, &'static str>,
}

/// Health check.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub stops_loaded: usize,
    pub routes_loaded: usize,
    pub patterns: usize,
    pub connections: usize,
    pub oracle_enabled: bool,
    pub cached_plans: u64,
}

#[derive(Debug, Serialize)]
pub struct StopResult {
    pub id: String,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

impl From<&Stop> for StopResult {
    fn from(stop: &Stop) -> Self {
        Self {
            id: stop.id.to_string(),
            name: stop.name.clone(),
            lat: stop.lat,
            lon: stop.lon,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StopsResponse {
    pub stops: Vec<StopResult>,
}

#[derive(Debug, Serialize)]
pub struct RouteResult {
    pub id: String,
    pub name: String,
    pub long_name: String,
}

impl From<&Route> for RouteResult {
    fn from(route: &Route) -> Self {
        Self {
            id: route.id.to_string(),
            name: route.display_name().to_string(),
            long_name: route.long_name.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RoutesResponse {
    pub routes: Vec<RouteResult>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}
