//! Bus trip planner server.
//!
//! Builds a connectivity graph of a municipal bus network from transit feed
//! data, plans routes between stops with a transfer-minimising search, and
//! optionally cross-checks each route with external first-order logic
//! solvers.

pub mod cache;
pub mod config;
pub mod coordinator;
pub mod domain;
pub mod feed;
pub mod graph;
pub mod oracle;
pub mod planner;
pub mod ticketing;
pub mod web;
