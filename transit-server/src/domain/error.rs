//! Domain error types.
//!
//! These errors represent validation failures in the domain layer. They are
//! distinct from feed/IO and oracle errors.

use super::StopId;

/// Domain-level errors for validation and data consistency.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// Consecutive edges of a path don't share a stop
    #[error("edge ending at {to} does not connect to edge starting at {from}")]
    DisconnectedPath { to: StopId, from: StopId },
}
