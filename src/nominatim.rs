//! Nominatim (OpenStreetMap) geocoding adapter.

use serde::Deserialize;

use crate::error::ProviderError;
use crate::model::Coordinate;
use crate::traits::Geocoder;

const SERVICE: &str = "nominatim";

#[derive(Debug, Clone)]
pub struct NominatimConfig {
    pub base_url: String,
    /// Nominatim's usage policy rejects requests without one.
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: "https://nominatim.openstreetmap.org".to_string(),
            user_agent: concat!("ev-trip-planner/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: 10,
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
}

impl Geocoder for NominatimClient {
    fn geocode(&self, place: &str) -> Result<Option<Coordinate>, ProviderError> {
        let url = format!("{}/search", self.config.base_url);
        let places = self
            .client
            .get(url)
            .query(&[("q", place), ("format", "json"), ("limit", "1")])
            .send()?
            .error_for_status()?
            .json::<Vec<Place>>()?;

        first_coordinate(places)
    }
}

/// Nominatim returns coordinates as decimal strings.
#[derive(Debug, Deserialize)]
pub(crate) struct Place {
    lat: String,
    lon: String,
}

pub(crate) fn first_coordinate(places: Vec<Place>) -> Result<Option<Coordinate>, ProviderError> {
    let Some(place) = places.into_iter().next() else {
        return Ok(None);
    };

    let lat = place
        .lat
        .parse::<f64>()
        .map_err(|err| ProviderError::payload(SERVICE, format!("bad latitude {:?}: {err}", place.lat)))?;
    let lon = place
        .lon
        .parse::<f64>()
        .map_err(|err| ProviderError::payload(SERVICE, format!("bad longitude {:?}: {err}", place.lon)))?;

    Ok(Some(Coordinate::new(lat, lon)))
}
