//! Caching layer for planning results.
//!
//! The graph never changes while serving and the oracle answers the same
//! path the same way, so a plan for (start, goal, preference) can be reused
//! until it expires. This spares repeat requests the solver round trips,
//! which can take tens of seconds.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;
use tracing::debug;

use crate::coordinator::{PlanError, PlanOutcome, PlanningCoordinator};
use crate::domain::StopId;
use crate::oracle::Solver;

/// Cache key: (start, goal, prefer fewer transfers).
type PlanKey = (StopId, StopId, bool);

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(10 * 60),
            max_capacity: 1000,
        }
    }
}

/// Cache for successful planning results.
pub struct PlanCache {
    plans: MokaCache<PlanKey, Arc<PlanOutcome>>,
}

impl PlanCache {
    /// Create a new cache with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let plans = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { plans }
    }

    pub async fn get(&self, key: &PlanKey) -> Option<Arc<PlanOutcome>> {
        self.plans.get(key).await
    }

    pub async fn insert(&self, key: PlanKey, outcome: Arc<PlanOutcome>) {
        self.plans.insert(key, outcome).await;
    }

    /// Number of cached plans (approximate until pending tasks run).
    pub fn entry_count(&self) -> u64 {
        self.plans.entry_count()
    }

    /// Invalidate all cached entries.
    pub fn invalidate_all(&self) {
        self.plans.invalidate_all();
    }
}

/// Planning coordinator with caching.
///
/// Only successful plans are cached; errors are recomputed every time.
pub struct CachedCoordinator<S: Solver> {
    coordinator: PlanningCoordinator<S>,
    cache: PlanCache,
}

impl<S: Solver> CachedCoordinator<S> {
    /// Create a new cached coordinator.
    pub fn new(coordinator: PlanningCoordinator<S>, cache_config: &CacheConfig) -> Self {
        Self {
            coordinator,
            cache: PlanCache::new(cache_config),
        }
    }

    /// Plan a route, using the cache if available.
    pub async fn plan(
        &self,
        start: &StopId,
        goal: &StopId,
        prefer_fewer_transfers: bool,
    ) -> Result<Arc<PlanOutcome>, PlanError> {
        let key = (start.clone(), goal.clone(), prefer_fewer_transfers);

        if let Some(cached) = self.cache.get(&key).await {
            debug!(start = %start, goal = %goal, "Plan cache hit");
            return Ok(cached);
        }

        let outcome = Arc::new(
            self.coordinator
                .plan(start, goal, prefer_fewer_transfers)
                .await?,
        );
        self.cache.insert(key, outcome.clone()).await;

        Ok(outcome)
    }

    /// Access the underlying coordinator for operations that bypass cache.
    pub fn coordinator(&self) -> &PlanningCoordinator<S> {
        &self.coordinator
    }

    /// Get cache statistics.
    pub fn cache_entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    /// Invalidate all cached entries.
    pub fn invalidate_cache(&self) {
        self.cache.invalidate_all();
    }
}
