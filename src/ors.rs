//! OpenRouteService directions adapter.
//!
//! Requests the `driving-car` profile with turn instructions. The route
//! geometry comes back as an encoded polyline.

use reqwest::header::AUTHORIZATION;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;
use crate::model::{Coordinate, Instruction, RouteSegment};
use crate::polyline::{DEFAULT_PRECISION, Polyline};
use crate::traits::RoutingProvider;

const SERVICE: &str = "openrouteservice";

#[derive(Debug, Clone)]
pub struct OrsConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub profile: String,
    /// Language of turn instructions.
    pub language: String,
    pub timeout_secs: u64,
}

impl Default for OrsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openrouteservice.org".to_string(),
            api_key: None,
            profile: "driving-car".to_string(),
            language: "fr".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OrsClient {
    config: OrsConfig,
    client: reqwest::blocking::Client,
}

impl OrsClient {
    pub fn new(config: OrsConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }
}

impl RoutingProvider for OrsClient {
    fn route(&self, from: Coordinate, to: Coordinate) -> Result<RouteSegment, ProviderError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(ProviderError::MissingApiKey(SERVICE))?;
        let url = format!("{}/v2/directions/{}", self.config.base_url, self.config.profile);
        let request = DirectionsRequest {
            coordinates: [from.lon_lat(), to.lon_lat()],
            instructions: true,
            language: &self.config.language,
        };

        let response = self
            .client
            .post(url)
            .header(AUTHORIZATION, api_key)
            .json(&request)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().unwrap_or_default();
            return Err(ProviderError::Remote {
                service: SERVICE,
                message: format!("{status}: {message}"),
            });
        }

        response.json::<DirectionsResponse>()?.into_segment()
    }
}

#[derive(Debug, Serialize)]
struct DirectionsRequest<'a> {
    coordinates: [[f64; 2]; 2],
    instructions: bool,
    language: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DirectionsResponse {
    #[serde(default)]
    routes: Vec<Route>,
}

#[derive(Debug, Deserialize)]
struct Route {
    summary: Summary,
    #[serde(default)]
    segments: Vec<Segment>,
    geometry: String,
}

/// Zero-length routes come back with an empty summary.
#[derive(Debug, Deserialize)]
struct Summary {
    #[serde(default)]
    distance: f64,
}

#[derive(Debug, Deserialize)]
struct Segment {
    #[serde(default)]
    steps: Vec<Step>,
}

#[derive(Debug, Deserialize)]
struct Step {
    instruction: String,
    distance: f64,
    duration: f64,
}

impl DirectionsResponse {
    pub(crate) fn into_segment(self) -> Result<RouteSegment, ProviderError> {
        let route = self
            .routes
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::payload(SERVICE, "no route in response"))?;
        let polyline = Polyline::decode(&route.geometry, DEFAULT_PRECISION)?;
        let instructions = route
            .segments
            .into_iter()
            .flat_map(|segment| segment.steps)
            .map(|step| Instruction {
                text: step.instruction,
                distance_m: step.distance,
                duration_s: step.duration,
            })
            .collect();

        Ok(RouteSegment {
            polyline,
            instructions,
            distance_km: route.summary.distance / 1000.0,
        })
    }
}
