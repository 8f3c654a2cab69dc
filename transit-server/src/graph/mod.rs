//! Transit connectivity graph.
//!
//! Built once from a feed snapshot: stops are matched to route shapes to
//! recover each route's stop order per direction, and consecutive stops on
//! a pattern become directed edges.

mod builder;
mod config;
mod connectivity;
mod shape_matcher;
mod stop_index;

pub use config::GraphConfig;
pub use connectivity::{ConnectivityGraph, DirectRoute};
pub use shape_matcher::{EARTH_RADIUS_M, ShapePoint, haversine_m, match_stops};
pub use stop_index::StopIndex;
