//! OSRM HTTP adapter for driving routes.

use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::RouteError;
use crate::geo::GeoPoint;
use crate::polyline::Polyline;
use crate::route::{RouteSummary, Segment};
use crate::traits::RouteProvider;

const UNNAMED_ROAD: &str = "Unnamed road";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OsrmConfig {
    pub base_url: String,
    pub profile: String,
    pub timeout_secs: u64,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://router.project-osrm.org".to_string(),
            profile: "driving".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OsrmClient {
    config: OsrmConfig,
    client: reqwest::blocking::Client,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    fn route_url(&self, from: GeoPoint, to: GeoPoint) -> String {
        format!(
            "{}/route/v1/{}/{:.6},{:.6};{:.6},{:.6}?overview=full&geometries=geojson&steps=true",
            self.config.base_url, self.config.profile, from.lng, from.lat, to.lng, to.lat
        )
    }
}

impl RouteProvider for OsrmClient {
    fn fetch_route(&self, from: GeoPoint, to: GeoPoint) -> Result<RouteSummary, RouteError> {
        let url = self.route_url(from, to);
        debug!(%url, "requesting OSRM route");

        let response = self.client.get(url).send()?;
        let status = response.status();

        // OSRM reports "NoRoute" with a 400 and a JSON body, so parse
        // before judging the status.
        let body = match response.json::<OsrmRouteResponse>() {
            Ok(body) => body,
            Err(err) if status.is_success() => return Err(err.into()),
            Err(_) => {
                warn!(%status, "OSRM request failed");
                return Err(RouteError::ServiceError(format!("OSRM returned {}", status)));
            }
        };

        route_from_reply(status, body)
    }
}

/// Judges an OSRM reply by its HTTP status first. A non-2xx status is a
/// service error unless OSRM explains it as an unroutable pair.
pub fn route_from_reply(
    status: StatusCode,
    body: OsrmRouteResponse,
) -> Result<RouteSummary, RouteError> {
    if !status.is_success() && !matches!(body.code.as_str(), "NoRoute" | "NoSegment") {
        warn!(%status, code = %body.code, "OSRM request failed");
        return Err(RouteError::ServiceError(
            body.message.unwrap_or_else(|| format!("OSRM returned {}", status)),
        ));
    }
    parse_route_response(body)
}

/// Converts an OSRM `route` response into a validated [`RouteSummary`],
/// using the first route.
pub fn parse_route_response(body: OsrmRouteResponse) -> Result<RouteSummary, RouteError> {
    match body.code.as_str() {
        "Ok" => {}
        "NoRoute" | "NoSegment" => return Err(RouteError::RouteNotFound),
        code => {
            return Err(RouteError::ServiceError(
                body.message.unwrap_or_else(|| code.to_string()),
            ));
        }
    }

    let route = body.routes.into_iter().next().ok_or(RouteError::RouteNotFound)?;

    let segments = route
        .legs
        .into_iter()
        .flat_map(|leg| leg.steps)
        .filter(|step| !step.name.is_empty() || step.maneuver.is_some())
        .map(|step| {
            let instruction = if step.name.is_empty() {
                UNNAMED_ROAD.to_string()
            } else {
                step.name
            };
            let maneuver = step.maneuver.map(|m| m.kind).unwrap_or_default();
            Segment::new(instruction, step.distance, step.duration, maneuver)
        })
        .collect();

    let summary = RouteSummary {
        polyline: Polyline::from_lng_lat(&route.geometry.coordinates),
        total_distance_m: route.distance,
        total_duration_s: route.duration,
        segments,
    };
    summary.validate()?;
    Ok(summary)
}

#[derive(Debug, Deserialize)]
pub struct OsrmRouteResponse {
    code: String,
    message: Option<String>,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    distance: f64,
    duration: f64,
    geometry: OsrmGeometry,
    #[serde(default)]
    legs: Vec<OsrmLeg>,
}

#[derive(Debug, Deserialize)]
struct OsrmGeometry {
    coordinates: Vec<[f64; 2]>,
}

#[derive(Debug, Deserialize)]
struct OsrmLeg {
    #[serde(default)]
    steps: Vec<OsrmStep>,
}

#[derive(Debug, Deserialize)]
struct OsrmStep {
    #[serde(default)]
    name: String,
    distance: f64,
    duration: f64,
    maneuver: Option<OsrmManeuver>,
}

#[derive(Debug, Deserialize)]
struct OsrmManeuver {
    #[serde(rename = "type", default)]
    kind: String,
}
