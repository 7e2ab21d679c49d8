//! Great-circle distance and a straight-line routing fallback.
//!
//! The router ignores roads, so it is less accurate than a routing service
//! but always available.

use crate::error::ProviderError;
use crate::model::{Coordinate, Instruction, RouteSegment};
use crate::polyline::Polyline;
use crate::traits::RoutingProvider;

/// Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Spacing between interpolated points.
const DEFAULT_STEP_KM: f64 = 1.0;

/// Smallest spacing honoured, to keep polylines bounded.
const MIN_STEP_KM: f64 = 0.01;

/// Average driving speed assumption for instruction durations.
const DEFAULT_SPEED_KMH: f64 = 90.0;

/// Haversine distance between two points in kilometers.
pub fn haversine_km(from: Coordinate, to: Coordinate) -> f64 {
    let lat1_rad = from.lat.to_radians();
    let lat2_rad = to.lat.to_radians();
    let delta_lat = (to.lat - from.lat).to_radians();
    let delta_lon = (to.lon - from.lon).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Straight-line routing provider.
///
/// Produces a polyline interpolated every `step_km` between the two ends and
/// reports the great-circle distance as the driven distance.
#[derive(Debug, Clone)]
pub struct HaversineRouter {
    pub step_km: f64,
    /// Assumed average driving speed in km/h.
    pub speed_kmh: f64,
}

impl Default for HaversineRouter {
    fn default() -> Self {
        Self {
            step_km: DEFAULT_STEP_KM,
            speed_kmh: DEFAULT_SPEED_KMH,
        }
    }
}

impl HaversineRouter {
    pub fn new(step_km: f64) -> Self {
        Self {
            step_km,
            ..Self::default()
        }
    }

    fn interpolate(&self, from: Coordinate, to: Coordinate, distance_km: f64) -> Polyline {
        let step_km = if self.step_km.is_finite() {
            self.step_km.max(MIN_STEP_KM)
        } else {
            DEFAULT_STEP_KM
        };
        let steps = ((distance_km / step_km).ceil() as usize).max(1);

        let points = (0..=steps)
            .map(|i| {
                let t = i as f64 / steps as f64;
                Coordinate::new(
                    from.lat + (to.lat - from.lat) * t,
                    from.lon + (to.lon - from.lon) * t,
                )
            })
            .collect();

        Polyline::new(points)
    }
}

impl RoutingProvider for HaversineRouter {
    fn route(&self, from: Coordinate, to: Coordinate) -> Result<RouteSegment, ProviderError> {
        let distance_km = haversine_km(from, to);
        let polyline = self.interpolate(from, to, distance_km);
        let duration_s = if self.speed_kmh > 0.0 {
            distance_km / self.speed_kmh * 3600.0
        } else {
            0.0
        };

        Ok(RouteSegment {
            polyline,
            instructions: vec![Instruction {
                text: "Head straight to destination".to_string(),
                distance_m: distance_km * 1000.0,
                duration_s,
            }],
            distance_km,
        })
    }
}
