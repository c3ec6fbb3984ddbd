//! Driving routes through Las Vegas for realistic fixtures.
//!
//! Vertices follow Las Vegas Boulevard and Flamingo Road as traced in
//! OpenStreetMap. Instructions are split on vertices so segment boundaries
//! land exactly on polyline points.

use route_playback::polyline::cumulative_distances;
use route_playback::{GeoPoint, Polyline, RouteSummary, Segment};

/// Mandalay Bay north along the Strip, east on Flamingo Road.
pub const STRIP_TO_FLAMINGO: &[GeoPoint] = &[
    GeoPoint::new(36.0919, -115.1752),
    GeoPoint::new(36.0955, -115.1740),
    GeoPoint::new(36.1007, -115.1727),
    GeoPoint::new(36.1023, -115.1724),
    GeoPoint::new(36.1070, -115.1722),
    GeoPoint::new(36.1126, -115.1721),
    GeoPoint::new(36.1162, -115.1716),
    GeoPoint::new(36.1162, -115.1680),
    GeoPoint::new(36.1161, -115.1620),
    GeoPoint::new(36.1160, -115.1530),
];

/// `(instruction, maneuver, last vertex index)` for [`STRIP_TO_FLAMINGO`].
const STRIP_STEPS: &[(&str, &str, usize)] = &[
    ("Las Vegas Boulevard South", "depart", 3),
    ("Las Vegas Boulevard South", "new name", 6),
    ("East Flamingo Road", "turn", 9),
];

pub fn strip_polyline() -> Polyline {
    Polyline::new(STRIP_TO_FLAMINGO.to_vec())
}

/// The Strip route with segments measured from its own geometry.
pub fn strip_route() -> RouteSummary {
    let cum = cumulative_distances(STRIP_TO_FLAMINGO);
    let total = cum[cum.len() - 1];

    let mut previous = 0;
    let segments = STRIP_STEPS
        .iter()
        .map(|&(name, maneuver, end)| {
            let distance = cum[end] - cum[previous];
            previous = end;
            // 35 mph ≈ 15.6 m/s
            Segment::new(name, distance, distance / 15.6, maneuver)
        })
        .collect();

    RouteSummary {
        polyline: strip_polyline(),
        total_distance_m: total,
        total_duration_s: total / 15.6,
        segments,
    }
}

/// Progress at the end of each strip segment, computed independently.
pub fn strip_segment_ends() -> Vec<f64> {
    let cum = cumulative_distances(STRIP_TO_FLAMINGO);
    let total = cum[cum.len() - 1];
    STRIP_STEPS.iter().map(|&(_, _, end)| cum[end] / total).collect()
}

/// Three equally spaced points on the equator.
pub fn equator_route() -> RouteSummary {
    let points = vec![
        GeoPoint::new(0.0, 0.0),
        GeoPoint::new(0.0, 1.0),
        GeoPoint::new(0.0, 2.0),
    ];
    let total = cumulative_distances(&points)[2];
    RouteSummary {
        polyline: Polyline::new(points),
        total_distance_m: total,
        total_duration_s: total / 25.0,
        segments: vec![
            Segment::new("Equator West", total / 2.0, 0.0, "depart"),
            Segment::new("Equator East", total / 2.0, 0.0, "arrive"),
        ],
    }
}

/// A route whose reported totals are chosen by the caller, for pacing
/// and boundary arithmetic.
pub fn route_with(total_distance_m: f64, segment_distances: &[f64]) -> RouteSummary {
    RouteSummary {
        polyline: strip_polyline(),
        total_distance_m,
        total_duration_s: total_distance_m / 15.6,
        segments: segment_distances
            .iter()
            .enumerate()
            .map(|(i, &d)| Segment::new(format!("Step {}", i), d, d / 15.6, "turn"))
            .collect(),
    }
}
