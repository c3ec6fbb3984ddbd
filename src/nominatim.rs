//! Nominatim reverse-geocoding adapter for place labels.

use serde::Deserialize;
use tracing::debug;

use crate::geo::GeoPoint;
use crate::traits::PlaceLookup;

/// Number of leading `display_name` parts kept in a label.
const LABEL_PARTS: usize = 3;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NominatimConfig {
    pub base_url: String,
    /// Nominatim zoom level; 14 resolves to suburb/major street detail.
    pub zoom: u8,
    pub timeout_secs: u64,
    /// Nominatim's usage policy requires an identifying user agent.
    pub user_agent: String,
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: "https://nominatim.openstreetmap.org".to_string(),
            zoom: 14,
            timeout_secs: 10,
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NominatimClient {
    config: NominatimConfig,
    client: reqwest::blocking::Client,
}

impl NominatimClient {
    pub fn new(config: NominatimConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self { config, client })
    }

    fn reverse_url(&self, point: GeoPoint) -> String {
        format!(
            "{}/reverse?format=json&lat={}&lon={}&zoom={}",
            self.config.base_url, point.lat, point.lng, self.config.zoom
        )
    }
}

impl PlaceLookup for NominatimClient {
    fn lookup(&self, point: GeoPoint) -> Option<String> {
        let response = self
            .client
            .get(self.reverse_url(point))
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.json::<ReverseResponse>());

        match response {
            Ok(body) => body.display_name.as_deref().and_then(short_label),
            Err(err) => {
                debug!(%err, "reverse geocode failed");
                None
            }
        }
    }
}

/// First few comma-separated parts of a Nominatim display name.
pub fn short_label(display_name: &str) -> Option<String> {
    let label = display_name
        .split(',')
        .take(LABEL_PARTS)
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ");
    (!label.is_empty()).then_some(label)
}

#[derive(Debug, Deserialize)]
struct ReverseResponse {
    display_name: Option<String>,
}
