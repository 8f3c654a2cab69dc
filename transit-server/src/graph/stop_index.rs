//! Stop and route lookup tables.

use std::collections::BTreeMap;

use tracing::debug;

use crate::domain::{Route, RouteId, Stop, StopId};
use crate::feed::record::{self, Record, fields};

/// Keyed lookup of stops and routes, with a case-insensitive name resolver.
///
/// Maps are ordered by id so listings and substring resolution are
/// deterministic across rebuilds.
#[derive(Debug, Clone, Default)]
pub struct StopIndex {
    stops: BTreeMap<StopId, Stop>,
    routes: BTreeMap<RouteId, Route>,
    /// Lower-cased, trimmed stop name → stop id. The first stop carrying a
    /// given name keeps it.
    names: BTreeMap<String, StopId>,
}

impl StopIndex {
    /// Build the index from raw stop and route records.
    ///
    /// Records without a usable id are skipped. Missing names default to
    /// empty and missing coordinates to (0, 0).
    pub fn index(stops: &[Record], routes: &[Record]) -> Self {
        let mut index = StopIndex::default();

        for row in stops {
            let Some(id) = record::text(row, fields::STOP_ID).and_then(|s| StopId::parse(&s).ok())
            else {
                debug!("Skipping stop record without id");
                continue;
            };
            let name = record::text(row, fields::STOP_NAME).unwrap_or_default();
            let lat = record::float(row, fields::STOP_LAT).unwrap_or(0.0);
            let lon = record::float(row, fields::STOP_LON).unwrap_or(0.0);
            index.insert_stop(Stop::new(id, name, lat, lon));
        }

        for row in routes {
            let Some(id) =
                record::text(row, fields::ROUTE_ID).and_then(|s| RouteId::parse(&s).ok())
            else {
                debug!("Skipping route record without id");
                continue;
            };
            let short_name = record::text(row, fields::ROUTE_SHORT_NAME).unwrap_or_default();
            let long_name = record::text(row, fields::ROUTE_LONG_NAME).unwrap_or_default();
            index.insert_route(Route::new(id, short_name, long_name));
        }

        index
    }

    /// Add a stop, replacing any stop with the same id.
    pub fn insert_stop(&mut self, stop: Stop) {
        let key = stop.name.trim().to_lowercase();
        if !key.is_empty() {
            self.names.entry(key).or_insert_with(|| stop.id.clone());
        }
        self.stops.insert(stop.id.clone(), stop);
    }

    pub fn insert_route(&mut self, route: Route) {
        self.routes.insert(route.id.clone(), route);
    }

    /// Resolve a stop id or name to a stop id.
    ///
    /// Tries, in order: an exact id match, an exact case-insensitive name
    /// match, then the first name (in name order) that contains or is
    /// contained by the query. Blank identifiers never match.
    pub fn resolve(&self, identifier: &str) -> Option<StopId> {
        let trimmed = identifier.trim();
        if trimmed.is_empty() {
            return None;
        }

        if let Ok(id) = StopId::parse(trimmed)
            && self.stops.contains_key(&id)
        {
            return Some(id);
        }

        let query = trimmed.to_lowercase();
        if let Some(id) = self.names.get(&query) {
            return Some(id.clone());
        }

        self.names
            .iter()
            .find(|(name, _)| name.contains(&query) || query.contains(name.as_str()))
            .map(|(_, id)| id.clone())
    }

    pub fn stop(&self, id: &StopId) -> Option<&Stop> {
        self.stops.get(id)
    }

    pub fn route(&self, id: &RouteId) -> Option<&Route> {
        self.routes.get(id)
    }

    pub fn contains_stop(&self, id: &StopId) -> bool {
        self.stops.contains_key(id)
    }

    pub fn contains_route(&self, id: &RouteId) -> bool {
        self.routes.contains_key(id)
    }

    /// All stops in id order.
    pub fn stops(&self) -> impl Iterator<Item = &Stop> {
        self.stops.values()
    }

    /// All routes in id order.
    pub fn routes(&self) -> impl Iterator<Item = &Route> {
        self.routes.values()
    }

    pub fn stop_count(&self) -> usize {
        self.stops.len()
    }

    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    /// Display name of a stop, falling back to its id.
    pub fn stop_name(&self, id: &StopId) -> String {
        match self.stops.get(id) {
            Some(stop) if !stop.name.is_empty() => stop.name.clone(),
            _ => id.to_string(),
        }
    }

    /// Display name of a route, falling back to its id.
    pub fn route_name(&self, id: &RouteId) -> String {
        self.routes
            .get(id)
            .map(|r| r.display_name().to_string())
            .unwrap_or_else(|| id.to_string())
    }
}
