//! Playback scheduler: advances progress over wall-clock time and publishes
//! the derived traveler state.
//!
//! The player is single threaded and frame driven. It holds at most one
//! outstanding [`FrameToken`]; a frame is only honoured if its token is the
//! outstanding one and the player is still playing, so pausing, resetting or
//! replacing the route makes any frame already queued by the host a no-op.

use std::collections::VecDeque;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};

use crate::error::{PlaybackError, RouteError, SessionError};
use crate::geo::GeoPoint;
use crate::polyline::Polyline;
use crate::route::RouteSummary;
use crate::session::{LoadedRoute, PacingRule, PhaseEvent, RouteSession};
use crate::traits::{FrameScheduler, FrameToken, PlaceLookup, PlaybackListener, RouteProvider};

/// Progress this close to 1 counts as arrived, absorbing rounding in the
/// accumulated tick deltas.
const END_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackOptions {
    /// Progress distance to the point used for the heading.
    pub look_ahead_delta: f64,
    /// Camera follow starts once progress exceeds this.
    pub camera_follow_min_progress: f64,
    /// How long the current-instruction overlay stays up.
    pub instruction_dwell_secs: f64,
    pub default_speed: f64,
    pub min_speed: f64,
    pub max_speed: f64,
    pub pacing: PacingRule,
}

impl Default for PlaybackOptions {
    fn default() -> Self {
        Self {
            look_ahead_delta: 0.005,
            camera_follow_min_progress: 0.02,
            instruction_dwell_secs: 3.5,
            default_speed: 1.0,
            min_speed: 0.25,
            max_speed: 5.0,
            pacing: PacingRule::default(),
        }
    }
}

/// Everything a renderer needs to redraw one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaybackFrame {
    pub progress: f64,
    pub position: GeoPoint,
    pub bearing_deg: f64,
    pub traveled: Polyline,
    pub upcoming: Polyline,
    pub active_segment_index: Option<usize>,
    /// Whether a follow camera should track the traveler.
    pub camera_follow: bool,
}

fn frame_at(route: &LoadedRoute, progress: f64, options: &PlaybackOptions) -> PlaybackFrame {
    let geometry = route.geometry();
    let (traveled, upcoming) = geometry.split_at(progress);
    PlaybackFrame {
        progress,
        position: geometry.position_at(progress),
        bearing_deg: geometry.heading_at(progress, options.look_ahead_delta),
        traveled,
        upcoming,
        active_segment_index: route.active_segment_at(progress),
        camera_follow: progress > options.camera_follow_min_progress && progress < 1.0,
    }
}

/// A [`FrameScheduler`] that queues requested frames for a host loop to
/// pump, for headless hosts and simulated time.
#[derive(Debug, Default)]
pub struct QueuedFrames {
    queue: VecDeque<FrameToken>,
}

impl QueuedFrames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pop(&mut self) -> Option<FrameToken> {
        self.queue.pop_front()
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}

impl FrameScheduler for QueuedFrames {
    fn request_frame(&mut self, token: FrameToken) {
        self.queue.push_back(token);
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        self.queue.retain(|queued| *queued != token);
    }
}

/// Drives playback of the session's route.
pub struct Player<F: FrameScheduler> {
    session: RouteSession,
    frames: F,
    listeners: Vec<Box<dyn PlaybackListener>>,
    options: PlaybackOptions,
    next_token: u64,
    pending: Option<FrameToken>,
    last_timestamp: Option<f64>,
}

impl<F: FrameScheduler> Player<F> {
    pub fn new(frames: F, options: PlaybackOptions) -> Self {
        Self {
            session: RouteSession::new(options.pacing, options.default_speed),
            frames,
            listeners: Vec::new(),
            options,
            next_token: 0,
            pending: None,
            last_timestamp: None,
        }
    }

    pub fn session(&self) -> &RouteSession {
        &self.session
    }

    pub fn options(&self) -> &PlaybackOptions {
        &self.options
    }

    pub fn frames(&self) -> &F {
        &self.frames
    }

    pub fn frames_mut(&mut self) -> &mut F {
        &mut self.frames
    }

    pub fn subscribe(&mut self, listener: Box<dyn PlaybackListener>) {
        self.listeners.push(listener);
    }

    pub fn is_playing(&self) -> bool {
        self.session.playback().playing
    }

    pub fn progress(&self) -> f64 {
        self.session.playback().progress
    }

    /// Seconds of playback elapsed and total at speed 1, for the timeline.
    pub fn timeline_clock(&self) -> (f64, f64) {
        let state = self.session.playback();
        (state.progress * state.total_playback_secs, state.total_playback_secs)
    }

    // Session flow. Every path that changes or drops the route stops the
    // frame loop first.

    pub fn place_start(&mut self, point: GeoPoint) -> Result<(), SessionError> {
        self.session.place_start(point)
    }

    pub fn place_destination(&mut self, point: GeoPoint) -> Result<(), SessionError> {
        self.session.place_destination(point)
    }

    /// Looks up place names for the chosen points. Labels keep their
    /// coordinate fallback when the lookup fails.
    pub fn resolve_labels<L: PlaceLookup>(&mut self, lookup: &L) {
        if let Some(point) = self.session.start().map(|w| w.point) {
            self.session.set_start_label(lookup.label_for(point));
        }
        if let Some(point) = self.session.destination().map(|w| w.point) {
            self.session.set_destination_label(lookup.label_for(point));
        }
    }

    /// Stops any running loop and replaces the route. Listeners get the
    /// progress 0 frame of the new route, or a reset if it was rejected.
    /// The active segment stays unset until playback or scrubbing.
    pub fn ingest_route(&mut self, summary: RouteSummary) -> Result<(), SessionError> {
        self.stop_frames();
        self.last_timestamp = None;
        if let Err(err) = self.session.ingest_route(summary) {
            // A rejected route resets the session; an illegal call leaves it.
            if matches!(err, SessionError::Route(_)) {
                self.notify_reset();
            }
            return Err(err);
        }
        if let Some(route) = self.session.route() {
            let frame = frame_at(route, 0.0, &self.options);
            for listener in &mut self.listeners {
                listener.on_frame(&frame);
            }
        }
        Ok(())
    }

    /// Places the destination, fetches the route and ingests it. A failed
    /// fetch resets the session so the user can choose again.
    pub fn load_route<P: RouteProvider>(
        &mut self,
        destination: GeoPoint,
        provider: &P,
    ) -> Result<(), SessionError> {
        self.place_destination(destination)?;
        let Some(start) = self.session.start().map(|w| w.point) else {
            return Err(RouteError::InvalidRoute("no start point".to_string()).into());
        };
        match provider.fetch_route(start, destination) {
            Ok(summary) => self.ingest_route(summary),
            Err(err) => {
                self.route_failed(&err);
                Err(err.into())
            }
        }
    }

    pub fn route_failed(&mut self, err: &RouteError) {
        self.stop_frames();
        self.session.route_failed(err);
        self.notify_reset();
    }

    pub fn reselect(&mut self) -> Result<(), SessionError> {
        self.session.phase().next(PhaseEvent::Reselect)?;
        self.reset();
        Ok(())
    }

    /// Stops playback and clears the session. Callable in any phase.
    pub fn reset(&mut self) {
        self.stop_frames();
        self.session.reset();
        self.notify_reset();
    }

    // Transport.

    /// Starts or resumes playback. Restarts from 0 when already at the end.
    /// Starting while playing is a no-op.
    pub fn start(&mut self) -> Result<(), PlaybackError> {
        if self.session.route().is_none() {
            debug!("start ignored, no route loaded");
            return Err(PlaybackError::NoRouteLoaded);
        }
        if self.is_playing() {
            return Ok(());
        }

        let state = self.session.playback_mut();
        if state.progress >= 1.0 {
            state.progress = 0.0;
        }
        state.playing = true;
        info!(progress = state.progress, speed = state.speed, "playback started");

        self.last_timestamp = None;
        self.request_next_frame();
        Ok(())
    }

    /// Stops playback. No frame fires after this returns. Idempotent.
    pub fn pause(&mut self) {
        if self.is_playing() {
            info!(progress = self.progress(), "playback paused");
        }
        self.stop_frames();
    }

    pub fn toggle(&mut self) -> Result<(), PlaybackError> {
        if self.is_playing() {
            self.pause();
            Ok(())
        } else {
            self.start()
        }
    }

    /// Sets the speed multiplier, clamped to the configured range. Takes
    /// effect on the next tick.
    pub fn set_speed(&mut self, multiplier: f64) {
        if !multiplier.is_finite() || multiplier <= 0.0 {
            warn!(multiplier, "ignoring invalid playback speed");
            return;
        }
        let speed = multiplier.clamp(self.options.min_speed, self.options.max_speed);
        debug!(speed, "playback speed changed");
        self.session.playback_mut().speed = speed;
    }

    /// Scrubs to `progress` and publishes the resulting frame immediately,
    /// leaving the play state alone. `None` without a route.
    pub fn set_progress(&mut self, progress: f64) -> Option<PlaybackFrame> {
        if self.session.route().is_none() || progress.is_nan() {
            return None;
        }
        self.session.playback_mut().progress = progress.clamp(0.0, 1.0);
        self.publish()
    }

    /// Handles a frame delivered by the host at `timestamp_secs`.
    ///
    /// Returns the published frame, or `None` for a stale token.
    pub fn on_frame(&mut self, token: FrameToken, timestamp_secs: f64) -> Option<PlaybackFrame> {
        if self.pending != Some(token) || !self.is_playing() {
            trace!(?token, "dropping stale frame");
            return None;
        }
        self.pending = None;

        let dt = match self.last_timestamp {
            Some(previous) => (timestamp_secs - previous).max(0.0),
            None => 0.0,
        };
        self.last_timestamp = Some(timestamp_secs);

        let state = self.session.playback_mut();
        let effective_secs = state.total_playback_secs / state.speed;
        state.progress += dt / effective_secs;
        if state.progress >= 1.0 - END_TOLERANCE {
            state.progress = 1.0;
            state.playing = false;
            info!("playback finished");
        }

        let frame = self.publish();
        if self.is_playing() {
            self.request_next_frame();
        }
        frame
    }

    /// `count` frames evenly spaced over the route, computed in parallel.
    /// Playback state is not touched.
    pub fn keyframes(&self, count: usize) -> Vec<PlaybackFrame> {
        let Some(route) = self.session.route() else {
            return Vec::new();
        };
        let options = &self.options;
        (0..count)
            .into_par_iter()
            .map(|idx| {
                let progress = if count <= 1 {
                    1.0
                } else {
                    idx as f64 / (count - 1) as f64
                };
                frame_at(route, progress, options)
            })
            .collect()
    }

    /// Computes the frame for the current progress, stores the active
    /// segment and notifies listeners. Listeners only ever see a frame whose
    /// values were all derived from the same progress.
    fn publish(&mut self) -> Option<PlaybackFrame> {
        let route = self.session.route()?;
        let progress = self.session.playback().progress;
        let frame = frame_at(route, progress, &self.options);

        let previous = self.session.playback().active_segment_index;
        self.session.playback_mut().active_segment_index = frame.active_segment_index;

        if let Some(index) = frame.active_segment_index.filter(|_| frame.active_segment_index != previous) {
            let segments = self.session.route().map(|r| r.segments()).unwrap_or_default();
            if let Some(segment) = segments.get(index) {
                debug!(index, instruction = %segment.instruction, "segment changed");
                for listener in &mut self.listeners {
                    listener.on_segment_change(index, segment);
                }
            }
        }
        for listener in &mut self.listeners {
            listener.on_frame(&frame);
        }
        Some(frame)
    }

    fn request_next_frame(&mut self) {
        self.next_token += 1;
        let token = FrameToken(self.next_token);
        self.pending = Some(token);
        self.frames.request_frame(token);
    }

    fn stop_frames(&mut self) {
        self.session.playback_mut().playing = false;
        if let Some(token) = self.pending.take() {
            self.frames.cancel_frame(token);
        }
    }

    fn notify_reset(&mut self) {
        for listener in &mut self.listeners {
            listener.on_reset();
        }
    }
}

impl Player<QueuedFrames> {
    /// Delivers the next queued frame at `timestamp_secs`.
    pub fn pump(&mut self, timestamp_secs: f64) -> Option<PlaybackFrame> {
        let token = self.frames.pop()?;
        self.on_frame(token, timestamp_secs)
    }
}

impl Default for Player<QueuedFrames> {
    fn default() -> Self {
        Self::new(QueuedFrames::new(), PlaybackOptions::default())
    }
}
