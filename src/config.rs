//! Planner, estimator and service configuration.
//!
//! All settings are passed explicitly; nothing is read from process-wide
//! state except in [`ServiceConfig::from_env`].

use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::chargetrip::ChargetripConfig;
use crate::energy::DEFAULT_ECONOMY_KM_PER_KWH;
use crate::irve::IrveConfig;
use crate::nominatim::NominatimConfig;
use crate::ors::OrsConfig;
use crate::osrm::OsrmConfig;

#[derive(Debug, Clone, PartialEq)]
pub struct PlannerConfig {
    pub economy_km_per_kwh: f64,
    /// Fraction of autonomy driven before looking for a station.
    pub safety_margin: f64,
    /// Station search radii in metres, tried in order.
    pub search_radii_m: Vec<u32>,
    /// Loop iterations before giving up with too many stops.
    pub max_iterations: usize,
    /// Power assumed when a station does not report one.
    pub default_power_kw: f64,
    /// Deadline for a whole planning request.
    pub request_timeout: Option<Duration>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            economy_km_per_kwh: DEFAULT_ECONOMY_KM_PER_KWH,
            safety_margin: 0.8,
            search_radii_m: vec![5_000, 20_000, 50_000],
            max_iterations: 20,
            default_power_kw: 22.0,
            request_timeout: None,
        }
    }
}

impl PlannerConfig {
    pub fn with_safety_margin(mut self, safety_margin: f64) -> Self {
        self.safety_margin = safety_margin;
        self
    }

    pub fn with_search_radii(mut self, search_radii_m: Vec<u32>) -> Self {
        self.search_radii_m = search_radii_m;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }
}

/// Trip-level parameters for the estimator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripParameters {
    pub avg_speed_kmh: f64,
    pub cost_per_km: f64,
    pub currency: String,
}

impl Default for TripParameters {
    fn default() -> Self {
        Self {
            avg_speed_kmh: 90.0,
            cost_per_km: 0.1,
            currency: "€".to_string(),
        }
    }
}

/// Endpoints and credentials of the external collaborators.
#[derive(Debug, Clone, Default)]
pub struct ServiceConfig {
    pub ors: OrsConfig,
    pub osrm: OsrmConfig,
    pub nominatim: NominatimConfig,
    pub irve: IrveConfig,
    pub chargetrip: ChargetripConfig,
}

impl ServiceConfig {
    /// Reads overrides from the environment, loading `.env` first if present.
    pub fn from_env() -> Self {
        if let Err(err) = dotenvy::dotenv() {
            if !err.not_found() {
                tracing::warn!(%err, "ignoring unreadable .env file");
            }
        }
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(timeout_secs) = lookup("HTTP_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
            config.ors.timeout_secs = timeout_secs;
            config.osrm.timeout_secs = timeout_secs;
            config.nominatim.timeout_secs = timeout_secs;
            config.irve.timeout_secs = timeout_secs;
            config.chargetrip.timeout_secs = timeout_secs;
        }

        config.ors.api_key = lookup("ORS_API_KEY");
        if let Some(url) = lookup("ORS_BASE_URL") {
            config.ors.base_url = url;
        }
        if let Some(url) = lookup("OSRM_BASE_URL") {
            config.osrm.base_url = url;
        }
        if let Some(url) = lookup("NOMINATIM_URL") {
            config.nominatim.base_url = url;
        }
        if let Some(url) = lookup("IRVE_API_URL") {
            config.irve.base_url = url;
        }
        if let Some(url) = lookup("CHARGETRIP_URL") {
            config.chargetrip.base_url = url;
        }
        config.chargetrip.client_id = lookup("X_CLIENT_ID");
        config.chargetrip.app_id = lookup("X_APP_ID");

        config
    }
}
