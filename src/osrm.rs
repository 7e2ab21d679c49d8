//! OSRM HTTP adapter for road routes.

use serde::Deserialize;

use crate::error::ProviderError;
use crate::model::{Coordinate, Instruction, RouteSegment};
use crate::polyline::{DEFAULT_PRECISION, Polyline};
use crate::traits::RoutingProvider;

const SERVICE: &str = "osrm";

#[derive(Debug, Clone)]
pub struct OsrmConfig {
    pub base_url: String,
    pub profile: String,
    pub timeout_secs: u64,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            profile: "car".to_string(),
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

    fn route_url(&self, from: Coordinate, to: Coordinate) -> String {
        format!(
            "{}/route/v1/{}/{:.6},{:.6};{:.6},{:.6}?overview=full&steps=true&geometries=polyline",
            self.config.base_url, self.config.profile, from.lon, from.lat, to.lon, to.lat
        )
    }
}

impl RoutingProvider for OsrmClient {
    fn route(&self, from: Coordinate, to: Coordinate) -> Result<RouteSegment, ProviderError> {
        let url = self.route_url(from, to);
        tracing::debug!(%url, "requesting OSRM route");

        let body = self
            .client
            .get(url)
            .send()?
            .json::<OsrmRouteResponse>()?;

        body.into_segment()
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct OsrmRouteResponse {
    code: String,
    message: Option<String>,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    geometry: String,
    /// Metres.
    distance: f64,
    #[serde(default)]
    legs: Vec<OsrmLeg>,
}

#[derive(Debug, Deserialize)]
struct OsrmLeg {
    #[serde(default)]
    steps: Vec<OsrmStep>,
}

#[derive(Debug, Deserialize)]
struct OsrmStep {
    distance: f64,
    duration: f64,
    #[serde(default)]
    name: String,
    maneuver: OsrmManeuver,
}

#[derive(Debug, Deserialize)]
struct OsrmManeuver {
    #[serde(rename = "type")]
    kind: String,
    modifier: Option<String>,
}

impl OsrmStep {
    /// OSRM has no instruction text; build one from the maneuver.
    fn text(&self) -> String {
        let mut text = self.maneuver.kind.clone();
        if let Some(modifier) = &self.maneuver.modifier {
            text.push(' ');
            text.push_str(modifier);
        }
        if !self.name.is_empty() {
            text.push_str(" onto ");
            text.push_str(&self.name);
        }
        text
    }
}

impl OsrmRouteResponse {
    pub(crate) fn into_segment(self) -> Result<RouteSegment, ProviderError> {
        if self.code != "Ok" {
            return Err(ProviderError::Remote {
                service: SERVICE,
                message: match self.message {
                    Some(message) => format!("{}: {}", self.code, message),
                    None => self.code,
                },
            });
        }

        let route = self
            .routes
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::payload(SERVICE, "no route in response"))?;
        let polyline = Polyline::decode(&route.geometry, DEFAULT_PRECISION)?;
        let instructions = route
            .legs
            .iter()
            .flat_map(|leg| &leg.steps)
            .map(|step| Instruction {
                text: step.text(),
                distance_m: step.distance,
                duration_s: step.duration,
            })
            .collect();

        Ok(RouteSegment {
            polyline,
            instructions,
            distance_km: route.distance / 1000.0,
        })
    }
}
