//! Error types for route ingestion, session flow and playback.

use crate::session::{Phase, PhaseEvent};

/// Failures while obtaining or validating a route.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RouteError {
    #[error("Invalid route: {0}")]
    InvalidRoute(String),
    #[error("No route found between the selected points")]
    RouteNotFound,
    #[error("Routing service error: {0}")]
    ServiceError(String),
}

impl From<reqwest::Error> for RouteError {
    fn from(err: reqwest::Error) -> Self {
        RouteError::ServiceError(err.to_string())
    }
}

/// Failures of the session state machine.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SessionError {
    #[error("Cannot apply {event:?} while {from}")]
    IllegalTransition { from: Phase, event: PhaseEvent },
    #[error(transparent)]
    Route(#[from] RouteError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PlaybackError {
    #[error("No route loaded")]
    NoRouteLoaded,
}
