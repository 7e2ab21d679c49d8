//! Error types for collaborators, the energy model and the planner.

use std::time::Duration;

use thiserror::Error;

/// Failure talking to an external collaborator service.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("{service} returned an error: {message}")]
    Remote {
        service: &'static str,
        message: String,
    },

    #[error("unusable {service} response: {message}")]
    Payload {
        service: &'static str,
        message: String,
    },

    #[error("missing API key for {0}")]
    MissingApiKey(&'static str),
}

impl ProviderError {
    pub(crate) fn payload(service: &'static str, message: impl Into<String>) -> Self {
        ProviderError::Payload {
            service,
            message: message.into(),
        }
    }
}

/// Out-of-domain input to the energy model.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EnergyError {
    #[error("battery capacity must be positive, got {0} kWh")]
    InvalidCapacity(f64),

    #[error("station power must be positive, got {0} kW")]
    InvalidPower(f64),
}

/// Terminal failure of a planning or estimation request.
///
/// The `Display` output is the human-readable failure reason.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanError {
    #[error("geocoding failed: {0}")]
    GeocodingFailed(String),

    #[error("routing failed: {0}")]
    RoutingFailed(String),

    #[error("autonomy computation error: {0}")]
    AutonomyComputationError(String),

    #[error("no charging station found: {0}")]
    NoStationFound(String),

    #[error("too many stops: {0}")]
    TooManyStops(String),

    #[error("invalid vehicle: {0}")]
    InvalidVehicle(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("planning timed out after {0:?}")]
    Timeout(Duration),
}
