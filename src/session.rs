//! Route session: the phase state machine and the derived data of the one
//! active route.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{RouteError, SessionError};
use crate::format::coordinate_label;
use crate::geo::GeoPoint;
use crate::polyline::RouteGeometry;
use crate::route::{RouteSummary, Segment};

/// Coarse session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    /// No start point chosen.
    Idle,
    /// Start chosen, awaiting destination.
    StartPlaced,
    /// Route request in flight.
    Loading,
    /// Route available, playback controls active.
    Ready,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Idle => "idle",
            Phase::StartPlaced => "start-placed",
            Phase::Loading => "loading",
            Phase::Ready => "ready",
        };
        f.write_str(name)
    }
}

/// Inputs that move the session between phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PhaseEvent {
    PlaceStart,
    PlaceDestination,
    /// A validated route was ingested. Legal from `Loading`, and from `Idle`
    /// or `Ready` when a host hands over a route directly.
    RouteReady,
    RouteFailed,
    /// The user drops the current route to pick new points.
    Reselect,
    Reset,
}

impl Phase {
    /// The single authoritative transition function.
    pub fn next(self, event: PhaseEvent) -> Result<Phase, SessionError> {
        use Phase::*;
        use PhaseEvent::*;

        match (self, event) {
            (Idle, PlaceStart) => Ok(StartPlaced),
            (StartPlaced, PlaceDestination) => Ok(Loading),
            // A host may hand over a route without picking points on the
            // map, or replace the ready route. Mid-selection it may not.
            (Loading | Idle | Ready, RouteReady) => Ok(Ready),
            (Ready, Reselect) => Ok(Idle),
            (_, RouteFailed | Reset) => Ok(Idle),
            (from, event) => Err(SessionError::IllegalTransition { from, event }),
        }
    }
}

/// Distance-proportional playback pacing, bounded so short and long routes
/// both animate legibly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PacingRule {
    /// Playback seconds per kilometer of route at 1x.
    pub secs_per_km: f64,
    pub min_secs: f64,
    pub max_secs: f64,
}

impl Default for PacingRule {
    fn default() -> Self {
        Self {
            secs_per_km: 0.15,
            min_secs: 10.0,
            max_secs: 60.0,
        }
    }
}

impl PacingRule {
    pub fn playback_secs(&self, distance_m: f64) -> f64 {
        (distance_m / 1000.0 * self.secs_per_km).clamp(self.min_secs, self.max_secs)
    }
}

/// Mutable playback state of the active route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaybackState {
    /// Fraction of the route traveled, in `[0, 1]`.
    pub progress: f64,
    pub playing: bool,
    pub speed: f64,
    /// `None` until the first frame is published.
    pub active_segment_index: Option<usize>,
    /// Wall-clock seconds from progress 0 to 1 at speed 1.
    pub total_playback_secs: f64,
}

impl PlaybackState {
    fn new(speed: f64) -> Self {
        Self {
            progress: 0.0,
            playing: false,
            speed,
            active_segment_index: None,
            total_playback_secs: 0.0,
        }
    }
}

/// A chosen start or destination with its display label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Waypoint {
    pub point: GeoPoint,
    pub label: String,
}

impl Waypoint {
    fn at(point: GeoPoint) -> Self {
        Self {
            point,
            label: coordinate_label(point),
        }
    }
}

/// Derived data of an ingested route. Never mutated after ingestion.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedRoute {
    geometry: RouteGeometry,
    total_distance_m: f64,
    total_duration_s: f64,
    segments: Vec<Segment>,
    segment_boundaries: Vec<f64>,
}

impl LoadedRoute {
    fn from_summary(summary: RouteSummary) -> Result<Self, RouteError> {
        summary.validate()?;
        let segment_boundaries = summary.segment_boundaries();
        let geometry = RouteGeometry::new(summary.polyline);
        if !(geometry.length() > 0.0) {
            return Err(RouteError::InvalidRoute("polyline has zero length".to_string()));
        }
        Ok(Self {
            geometry,
            total_distance_m: summary.total_distance_m,
            total_duration_s: summary.total_duration_s,
            segments: summary.segments,
            segment_boundaries,
        })
    }

    pub fn geometry(&self) -> &RouteGeometry {
        &self.geometry
    }

    pub fn total_distance_m(&self) -> f64 {
        self.total_distance_m
    }

    pub fn total_duration_s(&self) -> f64 {
        self.total_duration_s
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// `[0, b_1, .., b_n]`: progress reached at the end of each segment.
    pub fn segment_boundaries(&self) -> &[f64] {
        &self.segment_boundaries
    }

    /// Index of the segment being driven at `progress`: the largest `i` with
    /// `boundaries[i] <= progress`, capped at the last segment. `None` when
    /// the route has no segments.
    pub fn active_segment_at(&self, progress: f64) -> Option<usize> {
        if self.segments.is_empty() {
            return None;
        }
        let reached = self.segment_boundaries.partition_point(|&b| b <= progress);
        Some(reached.saturating_sub(1).min(self.segments.len() - 1))
    }
}

/// The one active route session.
#[derive(Debug, Clone)]
pub struct RouteSession {
    phase: Phase,
    start: Option<Waypoint>,
    destination: Option<Waypoint>,
    route: Option<LoadedRoute>,
    playback: PlaybackState,
    pacing: PacingRule,
    default_speed: f64,
}

impl Default for RouteSession {
    fn default() -> Self {
        Self::new(PacingRule::default(), 1.0)
    }
}

impl RouteSession {
    pub fn new(pacing: PacingRule, default_speed: f64) -> Self {
        Self {
            phase: Phase::Idle,
            start: None,
            destination: None,
            route: None,
            playback: PlaybackState::new(default_speed),
            pacing,
            default_speed,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn start(&self) -> Option<&Waypoint> {
        self.start.as_ref()
    }

    pub fn destination(&self) -> Option<&Waypoint> {
        self.destination.as_ref()
    }

    pub fn route(&self) -> Option<&LoadedRoute> {
        self.route.as_ref()
    }

    pub fn playback(&self) -> &PlaybackState {
        &self.playback
    }

    pub(crate) fn playback_mut(&mut self) -> &mut PlaybackState {
        &mut self.playback
    }

    pub fn pacing(&self) -> &PacingRule {
        &self.pacing
    }

    /// See [`LoadedRoute::active_segment_at`]; `None` without a route.
    pub fn active_segment_at(&self, progress: f64) -> Option<usize> {
        self.route.as_ref()?.active_segment_at(progress)
    }

    fn apply(&mut self, event: PhaseEvent) -> Result<(), SessionError> {
        let next = self.phase.next(event)?;
        if next != self.phase {
            debug!(from = %self.phase, to = %next, ?event, "phase transition");
        }
        self.phase = next;
        Ok(())
    }

    pub fn place_start(&mut self, point: GeoPoint) -> Result<(), SessionError> {
        self.apply(PhaseEvent::PlaceStart)?;
        self.start = Some(Waypoint::at(point));
        Ok(())
    }

    pub fn place_destination(&mut self, point: GeoPoint) -> Result<(), SessionError> {
        self.apply(PhaseEvent::PlaceDestination)?;
        self.destination = Some(Waypoint::at(point));
        Ok(())
    }

    pub(crate) fn set_start_label(&mut self, label: String) {
        if let Some(start) = self.start.as_mut() {
            start.label = label;
        }
    }

    pub(crate) fn set_destination_label(&mut self, label: String) {
        if let Some(destination) = self.destination.as_mut() {
            destination.label = label;
        }
    }

    /// Replaces any previous route with `summary` and moves to `Ready`.
    ///
    /// An invalid route resets the whole session to `Idle`.
    pub fn ingest_route(&mut self, summary: RouteSummary) -> Result<(), SessionError> {
        // Checked first so an illegal call leaves the session untouched.
        self.phase.next(PhaseEvent::RouteReady)?;

        let route = match LoadedRoute::from_summary(summary) {
            Ok(route) => route,
            Err(err) => {
                warn!(%err, "rejecting route");
                self.reset();
                return Err(err.into());
            }
        };

        let total_playback_secs = self.pacing.playback_secs(route.total_distance_m);
        info!(
            points = route.geometry.polyline().len(),
            distance_m = route.total_distance_m,
            segments = route.segments.len(),
            total_playback_secs,
            "route ingested"
        );

        let speed = self.playback.speed;
        self.playback = PlaybackState {
            total_playback_secs,
            ..PlaybackState::new(speed)
        };
        self.route = Some(route);
        self.apply(PhaseEvent::RouteReady)
    }

    /// Records a failed route request and resets so new points can be chosen.
    pub fn route_failed(&mut self, err: &RouteError) {
        warn!(%err, phase = %self.phase, "route request failed");
        self.reset();
    }

    /// Drops the ready route to pick new points.
    pub fn reselect(&mut self) -> Result<(), SessionError> {
        self.phase.next(PhaseEvent::Reselect)?;
        self.reset();
        Ok(())
    }

    /// Clears all route data and returns to `Idle`. Callable from any phase.
    pub fn reset(&mut self) {
        self.start = None;
        self.destination = None;
        self.route = None;
        self.playback = PlaybackState::new(self.default_speed);
        if self.phase != Phase::Idle {
            debug!(from = %self.phase, "session reset");
        }
        self.phase = Phase::Idle;
    }
}
