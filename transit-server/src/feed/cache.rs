//! On-disk copy of the last fetched feed snapshot.
//!
//! The API is slow (shapes alone can take most of a minute) and rate
//! limited, so the server keeps the last good snapshot per agency. A copy
//! older than the TTL is stale: startup refetches, but still falls back to
//! the stale copy if the API is unreachable.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::FeedError;
use super::snapshot::FeedSnapshot;

const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Serialize, Deserialize)]
struct StoredSnapshot {
    agency_id: String,
    fetched_at: DateTime<Utc>,
    snapshot: FeedSnapshot,
}

#[derive(Debug, Clone)]
pub struct SnapshotCacheConfig {
    pub path: PathBuf,
    pub ttl: Duration,
}

impl SnapshotCacheConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ttl: DEFAULT_TTL,
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

impl Default for SnapshotCacheConfig {
    fn default() -> Self {
        Self::new("feed_cache.json")
    }
}

/// What the cache holds for an agency.
#[derive(Debug)]
pub enum CachedFeed {
    Fresh(FeedSnapshot),
    /// Past its TTL; usable only when nothing newer can be fetched.
    Stale {
        snapshot: FeedSnapshot,
        fetched_at: DateTime<Utc>,
    },
    Missing,
}

impl CachedFeed {
    pub fn fresh(self) -> Option<FeedSnapshot> {
        match self {
            CachedFeed::Fresh(snapshot) => Some(snapshot),
            _ => None,
        }
    }

    /// Any snapshot at all, fresh or stale.
    pub fn any(self) -> Option<FeedSnapshot> {
        match self {
            CachedFeed::Fresh(snapshot) | CachedFeed::Stale { snapshot, .. } => Some(snapshot),
            CachedFeed::Missing => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SnapshotCache {
    config: SnapshotCacheConfig,
}

impl SnapshotCache {
    pub fn new(config: SnapshotCacheConfig) -> Self {
        Self { config }
    }

    pub fn path(&self) -> &Path {
        &self.config.path
    }

    /// Look up the snapshot for `agency_id` as of `now`.
    ///
    /// An unreadable file, another agency's snapshot, or one without stops
    /// or routes all count as missing.
    pub fn lookup_at(&self, agency_id: &str, now: DateTime<Utc>) -> CachedFeed {
        let Ok(contents) = std::fs::read_to_string(&self.config.path) else {
            return CachedFeed::Missing;
        };
        let stored: StoredSnapshot = match serde_json::from_str(&contents) {
            Ok(stored) => stored,
            Err(e) => {
                debug!(path = %self.config.path.display(), error = %e, "Unreadable feed cache");
                return CachedFeed::Missing;
            }
        };

        if stored.agency_id != agency_id {
            debug!(cached = %stored.agency_id, wanted = %agency_id, "Feed cache is for another agency");
            return CachedFeed::Missing;
        }
        if let Some(section) = stored.snapshot.missing_required() {
            debug!(%section, "Feed cache has an empty required section");
            return CachedFeed::Missing;
        }

        let age = (now - stored.fetched_at).to_std().unwrap_or(Duration::ZERO);
        if age < self.config.ttl {
            CachedFeed::Fresh(stored.snapshot)
        } else {
            CachedFeed::Stale {
                snapshot: stored.snapshot,
                fetched_at: stored.fetched_at,
            }
        }
    }

    pub fn lookup(&self, agency_id: &str) -> CachedFeed {
        self.lookup_at(agency_id, Utc::now())
    }

    /// Store `snapshot` as fetched at `fetched_at`.
    ///
    /// A snapshot missing stops or routes is refused rather than replacing
    /// a good copy.
    pub fn save_at(
        &self,
        agency_id: &str,
        snapshot: &FeedSnapshot,
        fetched_at: DateTime<Utc>,
    ) -> Result<(), FeedError> {
        if let Some(section) = snapshot.missing_required() {
            return Err(FeedError::Cache {
                message: format!("refusing to cache a snapshot without {section}"),
            });
        }

        if let Some(parent) = self.config.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| FeedError::Cache {
                message: format!("failed to create {}: {e}", parent.display()),
            })?;
        }

        let stored = StoredSnapshot {
            agency_id: agency_id.to_string(),
            fetched_at,
            snapshot: snapshot.clone(),
        };
        let json = serde_json::to_string(&stored).map_err(|e| FeedError::Json {
            message: e.to_string(),
        })?;

        // Write beside the target then rename, so a crash never leaves half a file
        let partial = self.config.path.with_extension("json.partial");
        std::fs::write(&partial, json)
            .and_then(|()| std::fs::rename(&partial, &self.config.path))
            .map_err(|e| FeedError::Cache {
                message: format!("failed to write {}: {e}", self.config.path.display()),
            })
    }

    pub fn save(&self, agency_id: &str, snapshot: &FeedSnapshot) -> Result<(), FeedError> {
        self.save_at(agency_id, snapshot, Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::Record;
    use chrono::TimeDelta;
    use serde_json::json;
    use tempfile::tempdir;

    fn record(value: serde_json::Value) -> Record {
        serde_json::from_value(value).unwrap()
    }

    fn snapshot() -> FeedSnapshot {
        FeedSnapshot {
            stops: vec![record(json!({"stop_id": "1", "stop_name": "Piata Unirii"}))],
            routes: vec![record(json!({"route_id": 35, "route_short_name": "35"}))],
            ..FeedSnapshot::default()
        }
    }

    fn cache_in(dir: &Path) -> SnapshotCache {
        SnapshotCache::new(SnapshotCacheConfig::new(dir.join("feed.json")))
    }

    #[test]
    fn fresh_within_ttl() {
        let dir = tempdir().unwrap();
        let cache = cache_in(dir.path());
        let fetched = Utc::now();

        cache.save_at("2", &snapshot(), fetched).unwrap();

        let loaded = cache.lookup_at("2", fetched + TimeDelta::hours(23)).fresh().unwrap();
        assert_eq!(loaded.stops.len(), 1);
        assert_eq!(loaded.routes.len(), 1);
        assert!(loaded.shapes.is_empty());
    }

    #[test]
    fn stale_after_ttl_but_still_available() {
        let dir = tempdir().unwrap();
        let cache = cache_in(dir.path());
        let fetched = Utc::now();

        cache.save_at("2", &snapshot(), fetched).unwrap();

        match cache.lookup_at("2", fetched + TimeDelta::hours(25)) {
            CachedFeed::Stale { snapshot, fetched_at } => {
                assert_eq!(fetched_at, fetched);
                assert_eq!(snapshot.stops.len(), 1);
            }
            other => panic!("expected stale, got {other:?}"),
        }
    }

    #[test]
    fn other_agency_is_missing() {
        let dir = tempdir().unwrap();
        let cache = cache_in(dir.path());

        cache.save("2", &snapshot()).unwrap();
        assert!(matches!(cache.lookup("4"), CachedFeed::Missing));
    }

    #[test]
    fn refuses_snapshot_without_routes() {
        let dir = tempdir().unwrap();
        let cache = cache_in(dir.path());
        cache.save("2", &snapshot()).unwrap();

        let broken = FeedSnapshot {
            routes: Vec::new(),
            ..snapshot()
        };
        assert!(matches!(cache.save("2", &broken), Err(FeedError::Cache { .. })));

        // The earlier good copy survives
        assert!(cache.lookup("2").fresh().is_some());
    }

    #[test]
    fn hand_edited_empty_snapshot_is_missing() {
        let dir = tempdir().unwrap();
        let cache = cache_in(dir.path());
        let stored = json!({
            "agency_id": "2",
            "fetched_at": Utc::now(),
            "snapshot": {"stops": []}
        });
        std::fs::write(cache.path(), stored.to_string()).unwrap();

        assert!(matches!(cache.lookup("2"), CachedFeed::Missing));
    }

    #[test]
    fn garbage_file_is_missing() {
        let dir = tempdir().unwrap();
        let cache = cache_in(dir.path());
        std::fs::write(cache.path(), "{not json").unwrap();

        assert!(cache.lookup("2").any().is_none());
    }

    #[test]
    fn creates_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("feed.json");
        let cache = SnapshotCache::new(SnapshotCacheConfig::new(&path));

        cache.save("2", &snapshot()).unwrap();
        assert!(path.exists());
        assert!(!path.with_extension("json.partial").exists());
    }
}
