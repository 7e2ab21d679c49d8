//! Collaborator interfaces consumed by the planner.
//!
//! These are intentionally minimal. "Not found" is `Ok(None)` so it stays
//! distinct from transport failures.

use crate::error::ProviderError;
use crate::model::{Coordinate, RouteSegment, Station, Vehicle};

/// Resolves a place name to a coordinate.
pub trait Geocoder {
    fn geocode(&self, place: &str) -> Result<Option<Coordinate>, ProviderError>;
}

/// Computes a road-following route between two coordinates.
pub trait RoutingProvider {
    fn route(&self, from: Coordinate, to: Coordinate) -> Result<RouteSegment, ProviderError>;
}

/// Finds the nearest charging station around a coordinate.
pub trait StationLocator {
    fn find_station(
        &self,
        at: Coordinate,
        radius_m: u32,
    ) -> Result<Option<Station>, ProviderError>;
}

/// Provides vehicles and their usable battery capacity.
pub trait VehicleCatalog {
    fn vehicles(&self) -> Result<Vec<Vehicle>, ProviderError>;

    fn vehicle_by_id(&self, id: &str) -> Result<Option<Vehicle>, ProviderError> {
        Ok(self
            .vehicles()?
            .into_iter()
            .find(|vehicle| vehicle.id == id))
    }
}

impl VehicleCatalog for Vec<Vehicle> {
    fn vehicles(&self) -> Result<Vec<Vehicle>, ProviderError> {
        Ok(self.clone())
    }

    fn vehicle_by_id(&self, id: &str) -> Result<Option<Vehicle>, ProviderError> {
        Ok(self.iter().find(|vehicle| vehicle.id == id).cloned())
    }
}
