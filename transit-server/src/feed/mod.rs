//! Transit feed input.
//!
//! Feed data arrives as collections of loosely-typed records (stops,
//! routes, trips, stop times, shapes). This module fetches them from the
//! Tranzy open-data API, caches snapshots on disk, loads snapshots from a
//! local directory, and provides alias-aware field accessors.

mod cache;
mod client;
mod error;
pub mod record;
mod snapshot;

pub use cache::{CachedFeed, SnapshotCache, SnapshotCacheConfig};
pub use client::{FeedClient, FeedClientConfig};
pub use error::FeedError;
pub use record::Record;
pub use snapshot::{FeedSnapshot, Section};
