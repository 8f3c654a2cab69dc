//! Application state for the web layer.

use std::sync::Arc;

use crate::cache::{CacheConfig, CachedCoordinator};
use crate::coordinator::PlanningCoordinator;
use crate::graph::ConnectivityGraph;
use crate::oracle::{ProcessSolver, Solver};
use crate::ticketing::TicketPolicy;

/// Shared application state.
///
/// Built once at startup and handed to every request; nothing in it is
/// mutated while serving except the plan cache.
pub struct AppState<S: Solver = ProcessSolver> {
    /// Planning cascade behind a result cache
    pub planner: Arc<CachedCoordinator<S>>,

    /// Flat-fare ticket policy
    pub tickets: TicketPolicy,
}

impl<S: Solver> AppState<S> {
    /// Create a new app state.
    pub fn new(
        coordinator: PlanningCoordinator<S>,
        cache_config: &CacheConfig,
        tickets: TicketPolicy,
    ) -> Self {
        Self {
            planner: Arc::new(CachedCoordinator::new(coordinator, cache_config)),
            tickets,
        }
    }

    /// The read-only network graph.
    pub fn graph(&self) -> &Arc<ConnectivityGraph> {
        self.planner.coordinator().graph()
    }
}

// Derived Clone would require S: Clone.
impl<S: Solver> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            planner: Arc::clone(&self.planner),
            tickets: self.tickets,
        }
    }
}
