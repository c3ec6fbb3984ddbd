//! Polyline geometry: arc-length tables, progress interpolation and
//! traveled/upcoming splitting.
//!
//! Progress `t` is always a fraction of total arc length. Within the pair of
//! vertices bracketing the target distance, the position is placed on the
//! great circle between them at the matching fraction of that pair's
//! haversine length, so the arc length up to the returned point is exactly
//! `t * total`. Fractions of 0 or 1 return the vertex itself.

use serde::{Deserialize, Serialize};

use crate::geo::{self, GeoPoint};

/// A route geometry as an ordered sequence of points.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    points: Vec<GeoPoint>,
}

impl Polyline {
    pub fn new(points: Vec<GeoPoint>) -> Self {
        Self { points }
    }

    /// Builds a polyline from GeoJSON `[lng, lat]` coordinates.
    pub fn from_lng_lat(coords: &[[f64; 2]]) -> Self {
        Self {
            points: coords.iter().copied().map(GeoPoint::from_lng_lat).collect(),
        }
    }

    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    pub fn into_points(self) -> Vec<GeoPoint> {
        self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<GeoPoint> {
        self.points.first().copied()
    }

    pub fn last(&self) -> Option<GeoPoint> {
        self.points.last().copied()
    }
}

impl From<Vec<GeoPoint>> for Polyline {
    fn from(points: Vec<GeoPoint>) -> Self {
        Self::new(points)
    }
}

/// Running arc length in meters from the first point to each point.
pub fn cumulative_distances(points: &[GeoPoint]) -> Vec<f64> {
    let mut cum = Vec::with_capacity(points.len());
    let mut total = 0.0;
    for (i, point) in points.iter().enumerate() {
        if i > 0 {
            total += geo::distance(points[i - 1], *point);
        }
        cum.push(total);
    }
    cum
}

/// Where a progress fraction lands on the polyline.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Location {
    /// Exactly on the vertex with this index.
    Vertex(usize),
    /// Strictly between `lo` and `lo + 1`.
    Between { lo: usize, fraction: f64 },
}

fn locate(cum_dist: &[f64], t: f64) -> Location {
    let last = cum_dist.len() - 1;
    if t.is_nan() || t <= 0.0 {
        return Location::Vertex(0);
    }
    if t >= 1.0 {
        return Location::Vertex(last);
    }

    let total = cum_dist[last];
    if total <= 0.0 {
        return Location::Vertex(0);
    }
    let target = t * total;

    let mut lo = 0;
    let mut hi = last;
    while hi - lo > 1 {
        let mid = (lo + hi) / 2;
        if cum_dist[mid] <= target {
            lo = mid;
        } else {
            hi = mid;
        }
    }

    let span = cum_dist[hi] - cum_dist[lo];
    let fraction = if span > 0.0 {
        (target - cum_dist[lo]) / span
    } else {
        0.0
    };

    if fraction <= 0.0 {
        Location::Vertex(lo)
    } else if fraction >= 1.0 {
        Location::Vertex(hi)
    } else {
        Location::Between { lo, fraction }
    }
}

/// Position at progress `t` along the polyline.
///
/// `t <= 0` returns the first point and `t >= 1` the last, exactly.
/// `points` must be non-empty and `cum_dist` must come from
/// [`cumulative_distances`] over the same points.
pub fn interpolate(points: &[GeoPoint], cum_dist: &[f64], t: f64) -> GeoPoint {
    debug_assert!(!points.is_empty(), "interpolate over an empty polyline");
    debug_assert_eq!(points.len(), cum_dist.len());

    match locate(cum_dist, t) {
        Location::Vertex(index) => points[index],
        Location::Between { lo, fraction } => geo::intermediate(points[lo], points[lo + 1], fraction),
    }
}

/// Splits the polyline at progress `t` into `(traveled, upcoming)`.
///
/// Both halves share the split point so they render without a gap. At
/// `t <= 0` nothing has been traveled; at `t >= 1` nothing is upcoming.
pub fn split_at_progress(points: &[GeoPoint], cum_dist: &[f64], t: f64) -> (Polyline, Polyline) {
    debug_assert!(!points.is_empty(), "split of an empty polyline");
    debug_assert_eq!(points.len(), cum_dist.len());

    if t.is_nan() || t <= 0.0 {
        return (Polyline::default(), Polyline::new(points.to_vec()));
    }
    if t >= 1.0 {
        return (Polyline::new(points.to_vec()), Polyline::default());
    }

    match locate(cum_dist, t) {
        Location::Vertex(index) => (
            Polyline::new(points[..=index].to_vec()),
            Polyline::new(points[index..].to_vec()),
        ),
        Location::Between { lo, fraction } => {
            let split = geo::intermediate(points[lo], points[lo + 1], fraction);

            let mut traveled = Vec::with_capacity(lo + 2);
            traveled.extend_from_slice(&points[..=lo]);
            traveled.push(split);

            let mut upcoming = Vec::with_capacity(points.len() - lo);
            upcoming.push(split);
            upcoming.extend_from_slice(&points[lo + 1..]);

            (Polyline::new(traveled), Polyline::new(upcoming))
        }
    }
}

/// Prefix of the polyline shown by the route-drawing intro at linear
/// animation progress `raw_progress`, eased out cubically.
pub fn reveal_prefix(points: &[GeoPoint], raw_progress: f64) -> &[GeoPoint] {
    if points.is_empty() {
        return points;
    }
    let p = ease_out_cubic(raw_progress.clamp(0.0, 1.0));
    let count = (p * (points.len() - 1) as f64).floor() as usize + 1;
    &points[..count.min(points.len())]
}

fn ease_out_cubic(t: f64) -> f64 {
    1.0 - (1.0 - t).powi(3)
}

/// A polyline with its arc-length table, computed once.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteGeometry {
    polyline: Polyline,
    cum_dist: Vec<f64>,
}

impl RouteGeometry {
    /// Precomputes the arc-length table. Callers guarantee at least one point.
    pub fn new(polyline: Polyline) -> Self {
        let cum_dist = cumulative_distances(polyline.points());
        Self { polyline, cum_dist }
    }

    pub fn polyline(&self) -> &Polyline {
        &self.polyline
    }

    pub fn cumulative_distances(&self) -> &[f64] {
        &self.cum_dist
    }

    /// Arc length of the whole polyline in meters.
    pub fn length(&self) -> f64 {
        self.cum_dist.last().copied().unwrap_or(0.0)
    }

    pub fn position_at(&self, t: f64) -> GeoPoint {
        interpolate(self.polyline.points(), &self.cum_dist, t)
    }

    pub fn split_at(&self, t: f64) -> (Polyline, Polyline) {
        split_at_progress(self.polyline.points(), &self.cum_dist, t)
    }

    /// Heading at `t`, looking `look_ahead` of progress forward. Near the
    /// end, where there is nothing ahead, the heading is taken from behind.
    pub fn heading_at(&self, t: f64, look_ahead: f64) -> f64 {
        let here = self.position_at(t);
        let ahead = self.position_at((t + look_ahead).min(1.0));
        if ahead != here {
            return geo::bearing(here, ahead);
        }
        let behind = self.position_at((t - look_ahead).max(0.0));
        if behind != here {
            geo::bearing(behind, here)
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn equator() -> Vec<GeoPoint> {
        vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.0, 1.0),
            GeoPoint::new(0.0, 2.0),
        ]
    }

    #[test]
    fn test_new_and_points() {
        let points = vec![GeoPoint::new(38.5, -120.2), GeoPoint::new(40.7, -120.95)];
        let polyline = Polyline::new(points.clone());
        assert_eq!(polyline.points(), &points[..]);
        assert_eq!(polyline.into_points(), points);
    }

    #[test]
    fn test_from_lng_lat() {
        let polyline = Polyline::from_lng_lat(&[[-120.2, 38.5], [-120.95, 40.7]]);
        assert_eq!(polyline.first(), Some(GeoPoint::new(38.5, -120.2)));
        assert_eq!(polyline.last(), Some(GeoPoint::new(40.7, -120.95)));
    }

    #[test]
    fn test_cumulative_distances_starts_at_zero() {
        let cum = cumulative_distances(&equator());
        assert_eq!(cum.len(), 3);
        assert_eq!(cum[0], 0.0);
        assert!(cum[1] > 0.0);
        assert_eq!(cum[2], cum[1] * 2.0);
    }

    #[test]
    fn test_interpolate_midpoint_hits_vertex() {
        let points = equator();
        let cum = cumulative_distances(&points);
        assert_eq!(interpolate(&points, &cum, 0.5), GeoPoint::new(0.0, 1.0));
    }

    #[test]
    fn test_interpolate_boundaries_exact() {
        let points = equator();
        let cum = cumulative_distances(&points);
        assert_eq!(interpolate(&points, &cum, 0.0), points[0]);
        assert_eq!(interpolate(&points, &cum, -3.0), points[0]);
        assert_eq!(interpolate(&points, &cum, 1.0), points[2]);
        assert_eq!(interpolate(&points, &cum, 7.0), points[2]);
    }

    #[test]
    fn test_interpolate_quarter_on_equator() {
        let points = equator();
        let cum = cumulative_distances(&points);
        let p = interpolate(&points, &cum, 0.25);
        assert!(p.lat.abs() < 1e-9);
        assert!((p.lng - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_interpolate_skips_zero_length_pairs() {
        let points = vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.0, 1.0),
        ];
        let cum = cumulative_distances(&points);
        let p = interpolate(&points, &cum, 0.5);
        assert!((p.lng - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_split_mid_segment_shares_point() {
        let points = equator();
        let cum = cumulative_distances(&points);
        let (traveled, upcoming) = split_at_progress(&points, &cum, 0.25);
        assert_eq!(traveled.len(), 2);
        assert_eq!(upcoming.len(), 3);
        assert_eq!(traveled.last(), upcoming.first());
    }

    #[test]
    fn test_split_on_vertex_does_not_duplicate() {
        let points = equator();
        let cum = cumulative_distances(&points);
        let (traveled, upcoming) = split_at_progress(&points, &cum, 0.5);
        assert_eq!(traveled.points(), &points[..2]);
        assert_eq!(upcoming.points(), &points[1..]);
    }

    #[test]
    fn test_split_boundaries() {
        let points = equator();
        let cum = cumulative_distances(&points);

        let (traveled, upcoming) = split_at_progress(&points, &cum, 0.0);
        assert!(traveled.is_empty());
        assert_eq!(upcoming.points(), &points[..]);

        let (traveled, upcoming) = split_at_progress(&points, &cum, 1.0);
        assert_eq!(traveled.points(), &points[..]);
        assert!(upcoming.is_empty());
    }

    #[test]
    fn test_reveal_prefix_grows_to_full_route() {
        let points = equator();
        assert_eq!(reveal_prefix(&points, 0.0).len(), 1);
        assert_eq!(reveal_prefix(&points, 1.0).len(), 3);
        // ease-out reaches the middle vertex well before half time
        assert_eq!(reveal_prefix(&points, 0.3).len(), 2);
    }

    #[test]
    fn test_heading_at_end_looks_behind() {
        let geometry = RouteGeometry::new(Polyline::new(equator()));
        assert!((geometry.heading_at(1.0, 0.01) - 90.0).abs() < 1e-6);
        assert!((geometry.heading_at(0.0, 0.01) - 90.0).abs() < 1e-6);
    }
}
