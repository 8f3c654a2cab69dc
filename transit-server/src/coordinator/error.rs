//! Planning errors.

use crate::domain::StopId;

/// Errors returned by a planning request.
///
/// Oracle failures are not errors: they only downgrade the proof method.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlanError {
    /// A stop identifier or name did not resolve
    #[error("stop '{0}' not found")]
    NotFound(String),

    /// Start and goal resolve to the same stop
    #[error("start and end stops are the same ({0})")]
    SameEndpoint(StopId),

    /// Every search strategy was exhausted
    #[error("no route found between {start} and {goal}")]
    NoPath { start: StopId, goal: StopId },
}
