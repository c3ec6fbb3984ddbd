//! Display helpers for labels, route durations and the timeline clock.

use crate::geo::GeoPoint;

/// `"lat, lng"` with four decimals, used when no place name is known.
pub fn coordinate_label(point: GeoPoint) -> String {
    format!("{:.4}, {:.4}", point.lat, point.lng)
}

/// Human duration: `"45s"`, `"12 min"`, `"1h 5m"`.
pub fn format_duration(secs: f64) -> String {
    let secs = secs.max(0.0);
    if secs < 60.0 {
        return format!("{}s", secs.round() as u64);
    }
    if secs < 3600.0 {
        return format!("{} min", (secs / 60.0).floor() as u64);
    }
    let hours = (secs / 3600.0).floor() as u64;
    let minutes = ((secs % 3600.0) / 60.0).round() as u64;
    format!("{}h {}m", hours, minutes)
}

/// Timeline clock `m:ss`.
pub fn format_mmss(secs: f64) -> String {
    let secs = secs.max(0.0);
    let minutes = (secs / 60.0).floor() as u64;
    let seconds = (secs % 60.0).floor() as u64;
    format!("{}:{:02}", minutes, seconds)
}
