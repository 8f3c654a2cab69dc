//! HTTP surface tests against a live server on an ephemeral port.

mod common;

use serde_json::{Value, json};

use common::{coordinator, oracle};
use transit_server::cache::CacheConfig;
use transit_server::oracle::{ScriptedSolver, VerdictKind};
use transit_server::ticketing::TicketPolicy;
use transit_server::web::{AppState, create_router};

/// Start the server and return its base URL.
async fn serve() -> String {
    let state: AppState<ScriptedSolver> = AppState::new(
        coordinator(Some(oracle(VerdictKind::ModelFound, VerdictKind::Proved))),
        &CacheConfig::default(),
        TicketPolicy::default(),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, create_router(state)).await.unwrap();
    });
    format!("http://{addr}")
}

async fn plan(base: &str, body: Value) -> (u16, Value) {
    let response = reqwest::Client::new()
        .post(format!("{base}/plan"))
        .json(&body)
        .send()
        .await
        .unwrap();
    let status = response.status().as_u16();
    (status, response.json().await.unwrap())
}

#[tokio::test]
async fn health_reports_graph_size() {
    let base = serve().await;

    let health: Value = reqwest::get(format!("{base}/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(health["status"], "healthy");
    assert_eq!(health["stops_loaded"], 5);
    assert_eq!(health["routes_loaded"], 2);
    assert_eq!(health["connections"], 5);
    assert_eq!(health["oracle_enabled"], true);
}

#[tokio::test]
async fn lists_stops_and_routes() {
    let base = serve().await;

    let stops: Value = reqwest::get(format!("{base}/stops"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let stops = stops["stops"].as_array().unwrap();
    assert_eq!(stops.len(), 5);
    assert_eq!(stops[0]["id"], "1");
    assert_eq!(stops[0]["name"], "Piata Garii");

    let routes: Value = reqwest::get(format!("{base}/routes"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(routes["routes"][0]["name"], "35");
    assert_eq!(routes["routes"][0]["long_name"], "Garii - Centru");
}

#[tokio::test]
async fn index_lists_endpoints() {
    let base = serve().await;

    let index: Value = reqwest::get(&base).await.unwrap().json().await.unwrap();

    assert!(index["endpoints"]["/plan"].as_str().unwrap().starts_with("POST"));
}

#[tokio::test]
async fn plans_a_trip_with_a_transfer() {
    let base = serve().await;

    let (status, body) = plan(
        &base,
        json!({
            "start_stop": "Piata Garii",
            "end_stop": "Zorilor",
            "departure_time": "2025-03-14T08:30:00"
        }),
    )
    .await;

    assert_eq!(status, 200);
    assert_eq!(body["success"], true);
    assert_eq!(body["total_transfers"], 1);
    assert_eq!(body["total_duration_minutes"], 15);
    assert_eq!(body["tickets_needed"], 1);
    assert_eq!(body["total_cost"], 3.5);
    assert_eq!(body["proof_method"], "Prover9 (Theorem Proved)");

    let route = body["route"].as_array().unwrap();
    assert_eq!(route.len(), 3);
    assert_eq!(route[0]["departure_time"], "08:30");
    assert_eq!(route[2]["arrival_time"], "08:45");
    assert_eq!(route[2]["route_id"], "7");
    assert_eq!(body["oracle_stages"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn unknown_stop_is_not_found() {
    let base = serve().await;

    let (status, body) = plan(&base, json!({"start_stop": "1", "end_stop": "Nowhere"})).await;

    assert_eq!(status, 404);
    assert!(body["error"].as_str().unwrap().contains("Nowhere"));
}

#[tokio::test]
async fn same_endpoints_are_rejected() {
    let base = serve().await;

    let (status, _) = plan(&base, json!({"start_stop": "1", "end_stop": "Piata Garii"})).await;

    assert_eq!(status, 400);
}

#[tokio::test]
async fn no_route_is_unsuccessful_not_an_error() {
    let base = serve().await;

    let (status, body) = plan(&base, json!({"start_stop": "1", "end_stop": "Aeroport"})).await;

    assert_eq!(status, 200);
    assert_eq!(body["success"], false);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn malformed_body_is_bad_request() {
    let base = serve().await;

    let response = reqwest::Client::new()
        .post(format!("{base}/plan"))
        .body("{not json")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);
}
