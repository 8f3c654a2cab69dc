use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use transit_server::cache::CacheConfig;
use transit_server::config::AppConfig;
use transit_server::coordinator::PlanningCoordinator;
use transit_server::feed::{CachedFeed, FeedClient, FeedError, FeedSnapshot, SnapshotCache};
use transit_server::graph::{ConnectivityGraph, GraphConfig};
use transit_server::oracle::{ProcessSolver, ReasoningOracle, SolverKind};
use transit_server::planner::PlannerConfig;
use transit_server::ticketing::TicketPolicy;
use transit_server::web::{AppState, create_router};

/// Load the feed from a local directory, a fresh cached copy, or the API,
/// in that order. A fetched snapshot is written back to the cache; if the
/// fetch fails, a stale cached copy is used instead.
async fn load_snapshot(config: &AppConfig) -> Result<FeedSnapshot, FeedError> {
    if let Some(dir) = &config.feed_dir {
        return FeedSnapshot::from_dir(dir);
    }

    let cache = SnapshotCache::new(config.snapshot_cache());
    let cached = match cache.lookup(&config.agency_id) {
        CachedFeed::Fresh(snapshot) => {
            info!(path = %cache.path().display(), "Using cached feed snapshot");
            return Ok(snapshot);
        }
        other => other,
    };

    match fetch_snapshot(config).await {
        Ok(snapshot) => {
            if let Err(e) = cache.save(&config.agency_id, &snapshot) {
                warn!(error = %e, "Failed to cache feed snapshot");
            }
            Ok(snapshot)
        }
        Err(e) => match cached {
            CachedFeed::Stale { snapshot, fetched_at } => {
                warn!(error = %e, %fetched_at, "Feed fetch failed, using stale cached snapshot");
                Ok(snapshot)
            }
            _ => Err(e),
        },
    }
}

async fn fetch_snapshot(config: &AppConfig) -> Result<FeedSnapshot, FeedError> {
    let client_config = config.feed_client().ok_or(FeedError::MissingApiKey)?;
    let client = FeedClient::new(client_config)?;
    info!(agency = %config.agency_id, "Fetching feed snapshot");
    client.fetch_snapshot().await
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    // Build the graph once; it is read-only from here on
    let snapshot = load_snapshot(&config)
        .await
        .expect("Failed to load feed snapshot");
    let graph = Arc::new(ConnectivityGraph::build(&snapshot, &GraphConfig::default()));
    drop(snapshot);

    let oracle = if config.oracle.enabled {
        info!(
            prover = %config.oracle.prover_path.display(),
            model_finder = %config.oracle.model_finder_path.display(),
            timeout_secs = config.oracle.timeout.as_secs(),
            "Reasoning oracle enabled"
        );
        Some(ReasoningOracle::new(
            ProcessSolver::new(SolverKind::ModelFinder, &config.oracle.model_finder_path),
            ProcessSolver::new(SolverKind::Prover, &config.oracle.prover_path),
            config.oracle.clone(),
        ))
    } else {
        info!("Reasoning oracle disabled");
        None
    };

    let coordinator = PlanningCoordinator::new(graph, PlannerConfig::default(), oracle);
    let state = AppState::new(coordinator, &CacheConfig::default(), TicketPolicy::default());
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .expect("Failed to bind listen address");
    info!(addr = %config.bind_addr, "Bus trip planner listening");
    info!("  GET  /         - API overview");
    info!("  GET  /health   - Health check");
    info!("  GET  /stops    - List all stops");
    info!("  GET  /routes   - List all routes");
    info!("  POST /plan     - Plan a trip");

    axum::serve(listener, app).await.expect("Server error");
}
