//! Path planner over the connectivity graph.
//!
//! Answers: "which sequence of bus hops gets me from this stop to that one
//! with the fewest route changes?"
//!
//! The planner tries a single-route match first, then a transfer-penalized
//! best-first search, and finally a plain reachability BFS.

mod bfs;
mod config;
mod search;

pub use bfs::reachability_path;
pub use config::PlannerConfig;
pub use search::{PathPlanner, PlannedPath, SearchStrategy, count_transfers};
