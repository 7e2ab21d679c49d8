//! Chargetrip GraphQL vehicle catalog.

use serde::Deserialize;

use crate::error::ProviderError;
use crate::model::Vehicle;
use crate::traits::VehicleCatalog;

const SERVICE: &str = "chargetrip";

const CAR_LIST_QUERY: &str = "query { carList { id make carModel battery { usable_kwh } } }";

#[derive(Debug, Clone)]
pub struct ChargetripConfig {
    pub base_url: String,
    pub client_id: Option<String>,
    pub app_id: Option<String>,
    pub timeout_secs: u64,
}

impl Default for ChargetripConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.chargetrip.io/graphql".to_string(),
            client_id: None,
            app_id: None,
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChargetripClient {
    config: ChargetripConfig,
    client: reqwest::blocking::Client,
}

impl ChargetripClient {
    pub fn new(config: ChargetripConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }
}

impl VehicleCatalog for ChargetripClient {
    fn vehicles(&self) -> Result<Vec<Vehicle>, ProviderError> {
        let client_id = self
            .config
            .client_id
            .as_deref()
            .ok_or(ProviderError::MissingApiKey(SERVICE))?;
        let app_id = self
            .config
            .app_id
            .as_deref()
            .ok_or(ProviderError::MissingApiKey(SERVICE))?;

        let response = self
            .client
            .post(&self.config.base_url)
            .header("x-client-id", client_id)
            .header("x-app-id", app_id)
            .json(&serde_json::json!({ "query": CAR_LIST_QUERY }))
            .send()?
            .error_for_status()?
            .json::<GraphQlResponse>()?;

        response.into_vehicles()
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct GraphQlResponse {
    data: Option<CarListData>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CarListData {
    #[serde(default)]
    car_list: Vec<Car>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Car {
    id: String,
    make: Option<String>,
    car_model: Option<String>,
    battery: Option<Battery>,
}

#[derive(Debug, Deserialize)]
struct Battery {
    usable_kwh: Option<f64>,
}

impl GraphQlResponse {
    /// Cars without a usable capacity cannot be planned for and are skipped.
    pub(crate) fn into_vehicles(self) -> Result<Vec<Vehicle>, ProviderError> {
        if !self.errors.is_empty() {
            let message = self
                .errors
                .into_iter()
                .map(|err| err.message)
                .collect::<Vec<_>>()
                .join("; ");
            return Err(ProviderError::Remote {
                service: SERVICE,
                message,
            });
        }

        let data = self
            .data
            .ok_or_else(|| ProviderError::payload(SERVICE, "response has no data"))?;

        Ok(data
            .car_list
            .into_iter()
            .filter_map(|car| {
                let usable_kwh = car.battery?.usable_kwh?;
                let name = match (car.make, car.car_model) {
                    (Some(make), Some(model)) => Some(format!("{make} {model}")),
                    (make, model) => make.or(model),
                };
                Some(Vehicle {
                    id: car.id,
                    name,
                    usable_kwh,
                })
            })
            .collect())
    }
}
