//! Planning coordinator.
//!
//! Turns a request for a route between two stops into a path plus a proof
//! method, by running an explicit list of stages: direct route, candidate
//! search, existence check and path verification.

mod cascade;
mod error;
mod outcome;
mod stage;

pub use cascade::{PlanState, PlanningCoordinator};
pub use error::PlanError;
pub use outcome::{PlanOutcome, ProofMethod, Segment};
pub use stage::{CASCADE, Stage, StageOutcome, StageReport, StageStatus};
