//! Test fixtures for route-playback.
//!
//! Provides:
//! - Real Las Vegas road geometry (from OpenStreetMap) with instructions
//! - Canned OSRM route responses
//! - Recording listeners and frame schedulers for simulated time

#![allow(dead_code)]

pub mod las_vegas_routes;
pub mod osrm_responses;
pub mod recorder;

pub use las_vegas_routes::*;
pub use recorder::*;
