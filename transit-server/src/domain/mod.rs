//! Domain types for the transit planner.
//!
//! This module contains the core model of the bus network: stops, routes,
//! directional route patterns, the edges derived from them, and paths over
//! those edges. Types are immutable once built; invariants are enforced at
//! construction time.

mod edge;
mod error;
mod ids;
mod path;
mod stop;

pub use edge::{Edge, LineKey, RoutePattern};
pub use error::DomainError;
pub use ids::{Direction, InvalidId, PatternId, RouteId, StopId};
pub use path::Path;
pub use stop::{Route, Stop};
