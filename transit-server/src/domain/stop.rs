//! Stops and routes.

use serde::Serialize;

use super::{RouteId, StopId};

/// A physical boarding/alighting location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stop {
    pub id: StopId,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

impl Stop {
    pub fn new(id: StopId, name: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            id,
            name: name.into(),
            lat,
            lon,
        }
    }

    /// Whether the stop carries a usable position.
    ///
    /// Feed rows without coordinates default to (0, 0); such stops are never
    /// matched against route shapes.
    pub fn has_position(&self) -> bool {
        self.lat.is_finite() && self.lon.is_finite() && !(self.lat == 0.0 && self.lon == 0.0)
    }
}

/// A numbered/named bus line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Route {
    pub id: RouteId,
    /// Display name, e.g. "35" or "24B".
    pub short_name: String,
    pub long_name: String,
}

impl Route {
    pub fn new(id: RouteId, short_name: impl Into<String>, long_name: impl Into<String>) -> Self {
        Self {
            id,
            short_name: short_name.into(),
            long_name: long_name.into(),
        }
    }

    /// Name shown to riders; falls back to the route id when the feed has no
    /// short name.
    pub fn display_name(&self) -> &str {
        if self.short_name.is_empty() {
            self.id.as_str()
        } else {
            &self.short_name
        }
    }
}
