//! IRVE charging-station locator.
//!
//! Queries the French open-data `bornes-irve` dataset for the nearest
//! charging point within a radius.

use serde::Deserialize;

use crate::error::ProviderError;
use crate::model::{Coordinate, Station};
use crate::traits::StationLocator;

const SERVICE: &str = "irve";

/// Name used when the record has none.
const UNKNOWN_STATION: &str = "Inconnue";

#[derive(Debug, Clone)]
pub struct IrveConfig {
    pub base_url: String,
    pub dataset: String,
    pub timeout_secs: u64,
}

impl Default for IrveConfig {
    fn default() -> Self {
        Self {
            base_url: "https://opendata.reseaux-energies.fr/api/records/1.0/search/".to_string(),
            dataset: "bornes-irve".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct IrveClient {
    config: IrveConfig,
    client: reqwest::blocking::Client,
}

impl IrveClient {
    pub fn new(config: IrveConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }
}

impl StationLocator for IrveClient {
    fn find_station(
        &self,
        at: Coordinate,
        radius_m: u32,
    ) -> Result<Option<Station>, ProviderError> {
        let geofilter = format!("{},{},{}", at.lat, at.lon, radius_m);
        let response = self
            .client
            .get(&self.config.base_url)
            .query(&[
                ("dataset", self.config.dataset.as_str()),
                ("geofilter.distance", geofilter.as_str()),
                ("rows", "1"),
            ])
            .send()?
            .error_for_status()?
            .json::<SearchResponse>()?;

        Ok(response.into_station())
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    records: Vec<Record>,
}

#[derive(Debug, Deserialize)]
struct Record {
    #[serde(default)]
    fields: Fields,
}

#[derive(Debug, Default, Deserialize)]
struct Fields {
    n_station: Option<String>,
    ad_station: Option<String>,
    /// `[lat, lon]`.
    geo_point_borne: Option<[f64; 2]>,
    puiss_max: Option<f64>,
}

impl SearchResponse {
    /// First record with a position; records without one are unusable.
    pub(crate) fn into_station(self) -> Option<Station> {
        let fields = self.records.into_iter().next()?.fields;
        let [lat, lon] = fields.geo_point_borne?;

        Some(Station {
            name: fields
                .n_station
                .unwrap_or_else(|| UNKNOWN_STATION.to_string()),
            address: fields.ad_station.unwrap_or_default(),
            coordinate: Coordinate::new(lat, lon),
            power_kw: fields.puiss_max,
        })
    }
}
