//! Route description handed over by a routing collaborator.

use serde::{Deserialize, Serialize};

use crate::error::RouteError;
use crate::polyline::Polyline;

/// One turn-by-turn instruction covering a contiguous span of the route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub instruction: String,
    pub distance_m: f64,
    pub duration_s: f64,
    /// Maneuver classification, e.g. `"turn"`, `"depart"`, `"arrive"`.
    pub maneuver: String,
}

impl Segment {
    pub fn new(
        instruction: impl Into<String>,
        distance_m: f64,
        duration_s: f64,
        maneuver: impl Into<String>,
    ) -> Self {
        Self {
            instruction: instruction.into(),
            distance_m,
            duration_s,
            maneuver: maneuver.into(),
        }
    }
}

/// A complete route: geometry ordered start to destination, totals and
/// instructions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteSummary {
    pub polyline: Polyline,
    pub total_distance_m: f64,
    pub total_duration_s: f64,
    pub segments: Vec<Segment>,
}

impl RouteSummary {
    /// Checks the invariants the playback core relies on.
    pub fn validate(&self) -> Result<(), RouteError> {
        if self.polyline.len() < 2 {
            return Err(RouteError::InvalidRoute(format!(
                "need at least 2 points, got {}",
                self.polyline.len()
            )));
        }
        if !self.total_distance_m.is_finite() || self.total_distance_m <= 0.0 {
            return Err(RouteError::InvalidRoute(format!(
                "total distance must be positive, got {}",
                self.total_distance_m
            )));
        }
        Ok(())
    }

    /// Progress fraction reached at the end of each segment, preceded by 0.
    ///
    /// The table has `segments.len() + 1` entries.
    pub fn segment_boundaries(&self) -> Vec<f64> {
        let mut boundaries = Vec::with_capacity(self.segments.len() + 1);
        boundaries.push(0.0);
        let mut accumulated = 0.0;
        for segment in &self.segments {
            accumulated += segment.distance_m;
            boundaries.push((accumulated / self.total_distance_m).clamp(0.0, 1.0));
        }
        boundaries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::GeoPoint;

    fn summary(points: usize, distance: f64) -> RouteSummary {
        RouteSummary {
            polyline: Polyline::new((0..points).map(|i| GeoPoint::new(0.0, i as f64)).collect()),
            total_distance_m: distance,
            total_duration_s: 60.0,
            segments: vec![
                Segment::new("Main Street", 100.0, 10.0, "depart"),
                Segment::new("Elm Street", 300.0, 30.0, "turn"),
            ],
        }
    }

    #[test]
    fn test_validate_rejects_single_point() {
        let err = summary(1, 400.0).validate().unwrap_err();
        assert!(matches!(err, RouteError::InvalidRoute(_)));
    }

    #[test]
    fn test_validate_rejects_non_positive_distance() {
        assert!(summary(2, 0.0).validate().is_err());
        assert!(summary(2, -5.0).validate().is_err());
        assert!(summary(2, f64::NAN).validate().is_err());
    }

    #[test]
    fn test_segment_boundaries() {
        assert_eq!(summary(2, 400.0).segment_boundaries(), vec![0.0, 0.25, 1.0]);
    }

    #[test]
    fn test_segment_boundaries_clamped() {
        // Step distances can overshoot the rounded route total.
        assert_eq!(summary(2, 380.0).segment_boundaries().last(), Some(&1.0));
    }
}
