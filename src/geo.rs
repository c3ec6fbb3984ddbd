//! Great-circle primitives over latitude/longitude points.
//!
//! Distances use the haversine formula on a spherical Earth. This is not a
//! geodesy library: the error against the ellipsoid (~0.3%) is irrelevant
//! for animating a marker along a road.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Angular distances below this are blended linearly instead of on the sphere.
const MIN_SPHERICAL_ANGLE: f64 = 1e-9;

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Builds a point from a GeoJSON `[lng, lat]` pair.
    pub fn from_lng_lat([lng, lat]: [f64; 2]) -> Self {
        Self { lat, lng }
    }

    fn radians(self) -> (f64, f64) {
        (self.lat.to_radians(), self.lng.to_radians())
    }
}

impl From<(f64, f64)> for GeoPoint {
    /// Converts a `(lat, lng)` tuple.
    fn from((lat, lng): (f64, f64)) -> Self {
        Self { lat, lng }
    }
}

/// Great-circle distance between two points in meters.
pub fn distance(a: GeoPoint, b: GeoPoint) -> f64 {
    EARTH_RADIUS_M * central_angle(a, b)
}

fn central_angle(a: GeoPoint, b: GeoPoint) -> f64 {
    let (lat1, _) = a.radians();
    let (lat2, _) = b.radians();
    let delta_lat = (b.lat - a.lat).to_radians();
    let delta_lng = (b.lng - a.lng).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lng / 2.0).sin().powi(2);

    2.0 * h.sqrt().min(1.0).asin()
}

/// Initial compass bearing in degrees `[0, 360)` along the great circle
/// from `from` to `to`. Coincident points yield `0.0`.
pub fn bearing(from: GeoPoint, to: GeoPoint) -> f64 {
    if from == to {
        return 0.0;
    }

    let (lat1, _) = from.radians();
    let (lat2, _) = to.radians();
    let delta_lng = (to.lng - from.lng).to_radians();

    let y = delta_lng.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * delta_lng.cos();

    let degrees = y.atan2(x).to_degrees().rem_euclid(360.0);
    if degrees.is_finite() && degrees < 360.0 {
        degrees
    } else {
        0.0
    }
}

/// The point at `fraction` of the great-circle arc from `a` to `b`.
///
/// `fraction` is expected in `[0, 1]`; the arc length from `a` to the result
/// is `fraction * distance(a, b)`.
pub fn intermediate(a: GeoPoint, b: GeoPoint, fraction: f64) -> GeoPoint {
    let delta = central_angle(a, b);
    let sin_delta = delta.sin();
    if delta < MIN_SPHERICAL_ANGLE || sin_delta.abs() < MIN_SPHERICAL_ANGLE {
        return lerp(a, b, fraction);
    }

    let wa = ((1.0 - fraction) * delta).sin() / sin_delta;
    let wb = (fraction * delta).sin() / sin_delta;

    let (lat1, lng1) = a.radians();
    let (lat2, lng2) = b.radians();

    let x = wa * lat1.cos() * lng1.cos() + wb * lat2.cos() * lng2.cos();
    let y = wa * lat1.cos() * lng1.sin() + wb * lat2.cos() * lng2.sin();
    let z = wa * lat1.sin() + wb * lat2.sin();

    GeoPoint {
        lat: z.atan2((x * x + y * y).sqrt()).to_degrees(),
        lng: y.atan2(x).to_degrees(),
    }
}

fn lerp(a: GeoPoint, b: GeoPoint, fraction: f64) -> GeoPoint {
    GeoPoint {
        lat: a.lat + fraction * (b.lat - a.lat),
        lng: a.lng + fraction * (b.lng - a.lng),
    }
}
