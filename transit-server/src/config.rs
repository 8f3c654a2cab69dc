//! Process configuration from environment variables.
//!
//! Malformed values are logged and replaced by their defaults; only the
//! feed source has no default, and that is checked when the snapshot is
//! loaded.

use std::fmt::{Debug, Display};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

use crate::feed::{FeedClientConfig, SnapshotCacheConfig};
use crate::oracle::OracleConfig;

const DEFAULT_AGENCY_ID: &str = "2";
const DEFAULT_FEED_CACHE_PATH: &str = "feed_cache.json";

/// Everything the binary needs to start serving.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Tranzy API key; required unless `feed_dir` is set.
    pub api_key: Option<String>,
    pub agency_id: String,
    pub base_url: Option<String>,

    /// Load the snapshot from JSON files here instead of the API.
    pub feed_dir: Option<PathBuf>,
    pub feed_cache_path: PathBuf,

    pub oracle: OracleConfig,
    pub bind_addr: SocketAddr,
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through `lookup`, which returns a variable's
    /// value if it is set.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let default_oracle = OracleConfig::default();
        let oracle = OracleConfig {
            enabled: parse_var(&var, "ORACLE_ENABLED", true, parse_flag),
            prover_path: var("PROVER9_PATH")
                .map(PathBuf::from)
                .unwrap_or(default_oracle.prover_path),
            model_finder_path: var("MACE4_PATH")
                .map(PathBuf::from)
                .unwrap_or(default_oracle.model_finder_path),
            timeout: Duration::from_secs(parse_var(
                &var,
                "ORACLE_TIMEOUT_SECS",
                default_oracle.timeout.as_secs(),
                u64::from_str,
            )),
            archive_dir: var("ORACLE_ARCHIVE_DIR").map(PathBuf::from),
            ..default_oracle
        };

        let default_addr = SocketAddr::from(([127, 0, 0, 1], 8000));
        let bind_addr = parse_var(&var, "BIND_ADDR", default_addr, SocketAddr::from_str);

        Self {
            api_key: var("TRANZY_API_KEY"),
            agency_id: var("AGENCY_ID").unwrap_or_else(|| DEFAULT_AGENCY_ID.to_string()),
            base_url: var("TRANZY_BASE_URL"),
            feed_dir: var("FEED_DIR").map(PathBuf::from),
            feed_cache_path: var("FEED_CACHE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_FEED_CACHE_PATH)),
            oracle,
            bind_addr,
        }
    }

    /// Client configuration, if an API key is set.
    pub fn feed_client(&self) -> Option<FeedClientConfig> {
        let api_key = self.api_key.as_ref()?;
        let mut config = FeedClientConfig::new(api_key).with_agency(&self.agency_id);
        if let Some(url) = &self.base_url {
            config = config.with_base_url(url);
        }
        Some(config)
    }

    pub fn snapshot_cache(&self) -> SnapshotCacheConfig {
        SnapshotCacheConfig::new(self.feed_cache_path.clone())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

/// Parse `name` with `parser`, falling back to `default` (with a warning)
/// when the value does not parse.
fn parse_var<T, E>(
    var: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: T,
    parser: impl Fn(&str) -> Result<T, E>,
) -> T
where
    T: Debug,
    E: Display,
{
    let Some(raw) = var(name) else {
        return default;
    };
    match parser(raw.trim()) {
        Ok(value) => value,
        Err(e) => {
            warn!(var = name, value = %raw, error = %e, default = ?default, "Could not parse env var, using default");
            default
        }
    }
}

/// Accept the usual spellings of a boolean flag.
fn parse_flag(raw: &str) -> Result<bool, String> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(format!("not a boolean: {other}")),
    }
}
