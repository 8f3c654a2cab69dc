//! Oracle error types.

use std::path::PathBuf;
use std::time::Duration;

/// Errors from encoding a problem or running a solver.
///
/// These never escape the planning cascade: the solver boundary turns them
/// into a [`Verdict`](super::Verdict) and the coordinator downgrades the
/// proof method.
#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    /// The solver did not finish in time
    #[error("solver timed out after {}s", after.as_secs_f64())]
    Timeout { after: Duration },

    /// The solver binary is missing or could not be launched
    #[error("solver {} unavailable: {message}", binary.display())]
    Unavailable { binary: PathBuf, message: String },

    /// Unexpected failure while running the solver
    #[error("solver failed: {message}")]
    Failed { message: String },

    /// There is nothing to encode
    #[error("cannot encode an empty path")]
    EmptyPath,
}
