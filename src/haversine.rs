//! Straight-line route provider (fallback when OSRM is unavailable).
//!
//! Connects the two points along the great circle and estimates travel time
//! from an assumed speed. Ignores roads, but always available.

use crate::error::RouteError;
use crate::geo::{self, GeoPoint};
use crate::polyline::Polyline;
use crate::route::{RouteSummary, Segment};
use crate::traits::RouteProvider;

/// Average driving speed assumption for time estimation.
const DEFAULT_SPEED_KMH: f64 = 40.0;

/// Intermediate points per straight-line route, so the line bends with the
/// great circle when rendered on a flat map.
const DEFAULT_STEPS: usize = 32;

#[derive(Debug, Clone)]
pub struct StraightLineRoute {
    /// Assumed average driving speed in km/h.
    pub speed_kmh: f64,
    pub steps: usize,
}

impl Default for StraightLineRoute {
    fn default() -> Self {
        Self {
            speed_kmh: DEFAULT_SPEED_KMH,
            steps: DEFAULT_STEPS,
        }
    }
}

impl StraightLineRoute {
    pub fn new(speed_kmh: f64) -> Self {
        Self {
            speed_kmh,
            ..Self::default()
        }
    }

    /// Convert distance in meters to travel time in seconds.
    fn travel_seconds(&self, meters: f64) -> f64 {
        let hours = meters / 1000.0 / self.speed_kmh;
        (hours * 3600.0).round()
    }
}

impl RouteProvider for StraightLineRoute {
    fn fetch_route(&self, from: GeoPoint, to: GeoPoint) -> Result<RouteSummary, RouteError> {
        let meters = geo::distance(from, to);
        if meters <= 0.0 {
            return Err(RouteError::RouteNotFound);
        }

        let steps = self.steps.max(1);
        let points = (0..=steps)
            .map(|i| match i {
                0 => from,
                i if i == steps => to,
                i => geo::intermediate(from, to, i as f64 / steps as f64),
            })
            .collect();

        let seconds = self.travel_seconds(meters);
        Ok(RouteSummary {
            polyline: Polyline::new(points),
            total_distance_m: meters,
            total_duration_s: seconds,
            segments: vec![
                Segment::new("Straight line", meters, seconds, "depart"),
                Segment::new("Destination", 0.0, 0.0, "arrive"),
            ],
        })
    }
}
