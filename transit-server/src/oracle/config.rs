//! Oracle configuration.

use std::path::PathBuf;
use std::time::Duration;

/// Default per-invocation solver timeout: 30 seconds.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Extra time the model finder gets on top of the timeout, so it can
/// report on its own before being killed.
const DEFAULT_MODEL_FINDER_GRACE: Duration = Duration::from_secs(5);

/// Configuration for the reasoning oracle.
#[derive(Debug, Clone)]
pub struct OracleConfig {
    /// Whether the oracle stages run at all.
    pub enabled: bool,

    /// Path to the theorem prover binary.
    pub prover_path: PathBuf,

    /// Path to the model finder binary.
    pub model_finder_path: PathBuf,

    /// Wall-clock limit for one solver invocation.
    pub timeout: Duration,

    /// Added to `timeout` for the model finder.
    pub model_finder_grace: Duration,

    /// Add synthetic shortcut edges to existence problems.
    pub include_direct: bool,

    /// Save every problem and answer here, when set.
    pub archive_dir: Option<PathBuf>,
}

impl OracleConfig {
    /// Create a new config with the given solver binaries and defaults
    /// elsewhere.
    pub fn new(prover_path: impl Into<PathBuf>, model_finder_path: impl Into<PathBuf>) -> Self {
        Self {
            prover_path: prover_path.into(),
            model_finder_path: model_finder_path.into(),
            ..Self::default()
        }
    }

    /// Set the solver timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Save problems and answers under `dir`.
    pub fn with_archive_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.archive_dir = Some(dir.into());
        self
    }

    /// Disable the oracle stages.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Timeout for the model finder.
    pub fn model_finder_timeout(&self) -> Duration {
        self.timeout + self.model_finder_grace
    }

    /// The timeout in whole seconds, at least one, for solver options.
    pub fn timeout_secs(&self) -> u64 {
        self.timeout.as_secs().max(1)
    }
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            prover_path: PathBuf::from("prover9"),
            model_finder_path: PathBuf::from("mace4"),
            timeout: DEFAULT_TIMEOUT,
            model_finder_grace: DEFAULT_MODEL_FINDER_GRACE,
            include_direct: true,
            archive_dir: None,
        }
    }
}
