//! Feed snapshots.
//!
//! A snapshot is the full set of record collections the graph is built
//! from. It can come from the Tranzy API, the on-disk cache, or a directory
//! of JSON files (useful for development without API credentials).

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::error::FeedError;
use super::record::Record;

/// The record collections of a feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Stops,
    Routes,
    Trips,
    StopTimes,
    Shapes,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::Stops,
        Section::Routes,
        Section::Trips,
        Section::StopTimes,
        Section::Shapes,
    ];

    /// Name used for API paths and snapshot file stems.
    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Stops => "stops",
            Section::Routes => "routes",
            Section::Trips => "trips",
            Section::StopTimes => "stop_times",
            Section::Shapes => "shapes",
        }
    }

    /// Whether the graph can be built at all without this section.
    pub fn is_required(&self) -> bool {
        matches!(self, Section::Stops | Section::Routes)
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One snapshot of feed data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedSnapshot {
    #[serde(default)]
    pub stops: Vec<Record>,
    #[serde(default)]
    pub routes: Vec<Record>,
    #[serde(default)]
    pub trips: Vec<Record>,
    #[serde(default)]
    pub stop_times: Vec<Record>,
    #[serde(default)]
    pub shapes: Vec<Record>,
}

impl FeedSnapshot {
    pub fn section(&self, section: Section) -> &[Record] {
        match section {
            Section::Stops => &self.stops,
            Section::Routes => &self.routes,
            Section::Trips => &self.trips,
            Section::StopTimes => &self.stop_times,
            Section::Shapes => &self.shapes,
        }
    }

    pub fn section_mut(&mut self, section: Section) -> &mut Vec<Record> {
        match section {
            Section::Stops => &mut self.stops,
            Section::Routes => &mut self.routes,
            Section::Trips => &mut self.trips,
            Section::StopTimes => &mut self.stop_times,
            Section::Shapes => &mut self.shapes,
        }
    }

    /// First required section that has no records, if any.
    pub fn missing_required(&self) -> Option<Section> {
        Section::ALL
            .into_iter()
            .find(|s| s.is_required() && self.section(*s).is_empty())
    }

    /// Load a snapshot from `{section}.json` files in a directory.
    ///
    /// Expects files named `stops.json`, `routes.json`, `trips.json`,
    /// `stop_times.json` and `shapes.json`, each a JSON array of objects.
    /// A missing file leaves that section empty.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, FeedError> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(FeedError::Cache {
                message: format!("feed directory {:?} does not exist", dir),
            });
        }

        let mut snapshot = FeedSnapshot::default();
        for section in Section::ALL {
            let path = dir.join(format!("{}.json", section.as_str()));
            if !path.is_file() {
                debug!(section = %section, path = ?path, "Feed file missing, section left empty");
                continue;
            }

            let json = std::fs::read_to_string(&path).map_err(|e| FeedError::Cache {
                message: format!("failed to read {:?}: {}", path, e),
            })?;
            let records: Vec<Record> =
                serde_json::from_str(&json).map_err(|e| FeedError::Json {
                    message: format!("failed to parse {:?}: {}", path, e),
                })?;

            *snapshot.section_mut(section) = records;
        }

        info!(
            stops = snapshot.stops.len(),
            routes = snapshot.routes.len(),
            trips = snapshot.trips.len(),
            stop_times = snapshot.stop_times.len(),
            shapes = snapshot.shapes.len(),
            "Loaded feed snapshot from directory"
        );

        Ok(snapshot)
    }
}
