//! route-playback core
//!
//! Animates a traveler along a precomputed driving route: arc-length
//! geometry over a polyline, the route session state machine, and a
//! frame-driven playback scheduler that publishes traveler state to
//! rendering adapters.

pub mod error;
pub mod format;
pub mod geo;
pub mod haversine;
pub mod nominatim;
pub mod osrm;
pub mod overlay;
pub mod playback;
pub mod polyline;
pub mod route;
pub mod session;
pub mod traits;

pub use error::{PlaybackError, RouteError, SessionError};
pub use geo::GeoPoint;
pub use playback::{PlaybackFrame, PlaybackOptions, Player, QueuedFrames};
pub use polyline::{Polyline, RouteGeometry};
pub use route::{RouteSummary, Segment};
pub use session::{Phase, PhaseEvent, RouteSession};
