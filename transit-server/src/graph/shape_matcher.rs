//! Geometric assignment of stops to route shapes.
//!
//! Each stop is assigned the shape point nearest to it. Stops whose nearest
//! point lies within the threshold are kept and ordered by that point's
//! sequence number, giving the stop order of one direction of travel.

use crate::domain::{Stop, StopId};

/// Mean Earth radius in metres.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Metres per degree of latitude on the mean sphere.
const METRES_PER_DEGREE: f64 = EARTH_RADIUS_M * std::f64::consts::PI / 180.0;

/// One vertex of a route shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapePoint {
    pub lat: f64,
    pub lon: f64,
    /// Position of the point along the shape.
    pub sequence: i64,
}

impl ShapePoint {
    pub fn new(lat: f64, lon: f64, sequence: i64) -> Self {
        Self { lat, lon, sequence }
    }
}

/// Great-circle distance in metres between two coordinates.
pub fn haversine_m(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_M * c
}

/// Lat/lon box around a shape, widened by the match threshold.
#[derive(Debug, Clone, Copy)]
struct Bounds {
    min_lat: f64,
    max_lat: f64,
    min_lon: f64,
    max_lon: f64,
}

impl Bounds {
    fn around(shape: &[ShapePoint], margin_m: f64) -> Option<Self> {
        let first = shape.first()?;
        let mut b = Bounds {
            min_lat: first.lat,
            max_lat: first.lat,
            min_lon: first.lon,
            max_lon: first.lon,
        };
        for p in shape {
            b.min_lat = b.min_lat.min(p.lat);
            b.max_lat = b.max_lat.max(p.lat);
            b.min_lon = b.min_lon.min(p.lon);
            b.max_lon = b.max_lon.max(p.lon);
        }

        let lat_margin = margin_m / METRES_PER_DEGREE;
        let widest = b.min_lat.abs().max(b.max_lat.abs()).min(89.0);
        let lon_margin = margin_m / (METRES_PER_DEGREE * widest.to_radians().cos());

        b.min_lat -= lat_margin;
        b.max_lat += lat_margin;
        b.min_lon -= lon_margin;
        b.max_lon += lon_margin;
        Some(b)
    }

    fn contains(&self, lat: f64, lon: f64) -> bool {
        lat >= self.min_lat && lat <= self.max_lat && lon >= self.min_lon && lon <= self.max_lon
    }
}

/// Stops lying within `threshold_m` of a shape, in traversal order.
///
/// Each stop's nearest shape point is found by haversine distance (ties go to
/// the lower sequence number). Stops are ordered by that point's sequence
/// number, then by stop id, so the result is identical across runs regardless
/// of input order. Stops without coordinates are ignored.
pub fn match_stops<'a>(
    shape: &[ShapePoint],
    stops: impl IntoIterator<Item = &'a Stop>,
    threshold_m: f64,
) -> Vec<StopId> {
    let Some(bounds) = Bounds::around(shape, threshold_m) else {
        return Vec::new();
    };

    let mut ordered: Vec<(i64, &StopId)> = Vec::new();

    for stop in stops {
        if !stop.has_position() || !bounds.contains(stop.lat, stop.lon) {
            continue;
        }

        let nearest = shape
            .iter()
            .map(|p| (haversine_m(stop.lat, stop.lon, p.lat, p.lon), p.sequence))
            .min_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

        if let Some((distance, sequence)) = nearest
            && distance <= threshold_m
        {
            ordered.push((sequence, &stop.id));
        }
    }

    ordered.sort();
    ordered.into_iter().map(|(_, id)| id.clone()).collect()
}
