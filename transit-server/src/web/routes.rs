//! HTTP route handlers.

use std::collections::BTreeMap;

use axum::body::Bytes;
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, warn};

use crate::coordinator::PlanError;
use crate::oracle::Solver;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router<S: Solver + 'static>(state: AppState<S>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index))
        .route("/health", get(health::<S>))
        .route("/stops", get(list_stops::<S>))
        .route("/routes", get(list_routes::<S>))
        .route("/plan", post(plan_trip::<S>))
        .layer(cors)
        .with_state(state)
}

/// API overview.
async fn index() -> Json<IndexResponse> {
    let endpoints = BTreeMap::from([
        ("/plan", "POST - Plan a bus trip"),
        ("/stops", "GET - List all stops"),
        ("/routes", "GET - List all routes"),
        ("/health", "GET - Health check"),
    ]);
    Json(IndexResponse {
        message: "Cluj-Napoca Bus Trip Planner API",
        endpoints,
    })
}

/// Health check endpoint.
async fn health<S: Solver>(State(state): State<AppState<S>>) -> Json<HealthResponse> {
    let graph = state.graph();
    Json(HealthResponse {
        status: "healthy",
        stops_loaded: graph.index().stop_count(),
        routes_loaded: graph.index().route_count(),
        patterns: graph.patterns().len(),
        connections: graph.edge_count(),
        oracle_enabled: state.planner.coordinator().oracle().is_some(),
        cached_plans: state.planner.cache_entry_count(),
    })
}

/// All stops, in id order.
async fn list_stops<S: Solver>(State(state): State<AppState<S>>) -> Json<StopsResponse> {
    let stops = state.graph().index().stops().map(StopResult::from).collect();
    Json(StopsResponse { stops })
}

/// All routes, in id order.
async fn list_routes<S: Solver>(State(state): State<AppState<S>>) -> Json<RoutesResponse> {
    let routes = state.graph().index().routes().map(RouteResult::from).collect();
    Json(RoutesResponse { routes })
}

/// Plan a trip between two stops.
///
/// Unresolvable stops are 404 and identical ones 400. A request that finds
/// no route still succeeds at the HTTP level, with `success: false`.
async fn plan_trip<S: Solver>(
    State(state): State<AppState<S>>,
    body: Bytes,
) -> Result<Json<PlanTripResponse>, AppError> {
    // Parse JSON manually so we can log the body on failure
    let req: PlanTripRequest = serde_json::from_slice(&body).map_err(|e| {
        warn!(error = %e, body = %String::from_utf8_lossy(&body), "Invalid plan request");
        AppError::BadRequest {
            message: format!("Invalid JSON: {e}"),
        }
    })?;

    let (start, goal) = state
        .planner
        .coordinator()
        .resolve_endpoints(&req.start_stop, &req.end_stop)?;

    match state
        .planner
        .plan(&start, &goal, req.prefer_fewer_transfers)
        .await
    {
        Ok(outcome) => {
            let quote = state.tickets.quote(i64::from(outcome.total_minutes));
            Ok(Json(PlanTripResponse::from_outcome(
                &outcome,
                req.departure(),
                quote,
            )))
        }
        Err(PlanError::NoPath { .. }) => Ok(Json(PlanTripResponse::failure(
            "No route found between the specified stops",
        ))),
        Err(e) => Err(e.into()),
    }
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Internal { message: String },
}

impl From<PlanError> for AppError {
    fn from(e: PlanError) -> Self {
        match e {
            PlanError::NotFound(_) => AppError::NotFound {
                message: e.to_string(),
            },
            PlanError::SameEndpoint(_) => AppError::BadRequest {
                message: e.to_string(),
            },
            PlanError::NoPath { .. } => AppError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "Request failed");
        } else {
            warn!(%status, %message, "Request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
