//! Loosely-typed feed records.
//!
//! Feed rows arrive as JSON objects whose field names vary between
//! publishers (`stop_id` vs `id`, `stop_lat` vs `lat`). The accessors here
//! take a list of accepted names and return the first usable value, so
//! missing or malformed optional fields degrade to `None` instead of
//! failing the whole load.

use serde_json::{Map, Value};

/// One feed row.
pub type Record = Map<String, Value>;

/// Accepted field names for each concept, most specific first.
pub mod fields {
    pub const STOP_ID: &[&str] = &["stop_id", "id"];
    pub const STOP_NAME: &[&str] = &["stop_name", "name"];
    pub const STOP_LAT: &[&str] = &["stop_lat", "lat"];
    pub const STOP_LON: &[&str] = &["stop_lon", "lon", "lng"];

    pub const ROUTE_ID: &[&str] = &["route_id", "id"];
    pub const ROUTE_SHORT_NAME: &[&str] = &["route_short_name", "short_name"];
    pub const ROUTE_LONG_NAME: &[&str] = &["route_long_name", "long_name"];

    pub const TRIP_ID: &[&str] = &["trip_id", "id"];
    pub const TRIP_ROUTE_ID: &[&str] = &["route_id"];
    pub const TRIP_SHAPE_ID: &[&str] = &["shape_id"];
    pub const TRIP_DIRECTION: &[&str] = &["direction_id", "direction"];

    pub const STOP_TIME_TRIP_ID: &[&str] = &["trip_id"];
    pub const STOP_TIME_STOP_ID: &[&str] = &["stop_id"];
    pub const STOP_SEQUENCE: &[&str] = &["stop_sequence", "sequence"];

    pub const SHAPE_ID: &[&str] = &["shape_id", "id"];
    pub const SHAPE_LAT: &[&str] = &["shape_pt_lat", "lat"];
    pub const SHAPE_LON: &[&str] = &["shape_pt_lon", "lon", "lng"];
    pub const SHAPE_SEQUENCE: &[&str] = &["shape_pt_sequence", "sequence"];
}

/// First non-blank textual value among `keys`.
///
/// Numbers are rendered in their JSON form, so an integer id `42` and the
/// string `"42"` read the same.
pub fn text(record: &Record, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match record.get(*key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// First numeric value among `keys`, accepting numeric strings.
pub fn float(record: &Record, keys: &[&str]) -> Option<f64> {
    keys.iter().find_map(|key| match record.get(*key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

/// First integer value among `keys`, accepting numeric strings and
/// truncating floats.
pub fn int(record: &Record, keys: &[&str]) -> Option<i64> {
    keys.iter().find_map(|key| match record.get(*key)? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f as i64))
        }
        _ => None,
    })
}
