//! Seams between the playback core and its collaborators.
//!
//! The core never talks to a map, a network service or a frame loop
//! directly. Hosts implement these traits and hand them in.

use crate::error::RouteError;
use crate::format::coordinate_label;
use crate::geo::GeoPoint;
use crate::playback::PlaybackFrame;
use crate::route::{RouteSummary, Segment};

/// Fetches a driving route between two points.
///
/// Retries, if any, are the provider's business.
pub trait RouteProvider {
    fn fetch_route(&self, from: GeoPoint, to: GeoPoint) -> Result<RouteSummary, RouteError>;
}

/// Resolves a short display label for a point.
pub trait PlaceLookup {
    /// `None` on any failure.
    fn lookup(&self, point: GeoPoint) -> Option<String>;

    /// Label for `point`, falling back to its coordinates.
    fn label_for(&self, point: GeoPoint) -> String {
        self.lookup(point).unwrap_or_else(|| coordinate_label(point))
    }
}

/// Identifies one requested animation frame.
///
/// Tokens are never reused, so a frame delivered after the player has
/// cancelled or re-requested is recognised as stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameToken(pub u64);

/// The host's per-frame scheduling facility.
pub trait FrameScheduler {
    /// Asks the host to deliver `token` to `Player::on_frame` on its next frame.
    fn request_frame(&mut self, token: FrameToken);

    /// Withdraws a requested frame. Hosts that cannot unregister callbacks
    /// may ignore this.
    fn cancel_frame(&mut self, token: FrameToken);
}

/// Receives published playback state. This is where rendering adapters
/// plug in.
pub trait PlaybackListener {
    /// Called once per tick or scrub with a fully computed frame.
    fn on_frame(&mut self, frame: &PlaybackFrame);

    /// Called before `on_frame` when the active segment changes.
    fn on_segment_change(&mut self, _index: usize, _segment: &Segment) {}

    /// Called after the session has been reset.
    fn on_reset(&mut self) {}
}
