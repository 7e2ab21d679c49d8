//! Domain data for trip planning.
//!
//! These are plain values: a plan is built fresh per request and handed to
//! the estimator once complete.

use serde::{Deserialize, Serialize};

use crate::polyline::Polyline;

/// A WGS84 position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Returns `(lon, lat)`, the axis order most routing APIs expect.
    pub fn lon_lat(&self) -> [f64; 2] {
        [self.lon, self.lat]
    }
}

impl From<(f64, f64)> for Coordinate {
    /// Builds a coordinate from a `(lat, lon)` tuple.
    fn from((lat, lon): (f64, f64)) -> Self {
        Self { lat, lon }
    }
}

/// An electric vehicle as known to the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: String,
    /// Make and model, when the catalog provides them.
    pub name: Option<String>,
    /// Usable battery capacity in kWh.
    pub usable_kwh: f64,
}

impl Vehicle {
    pub fn new(id: impl Into<String>, usable_kwh: f64) -> Self {
        Self {
            id: id.into(),
            name: None,
            usable_kwh,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// A single turn instruction on a driven leg.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    pub text: String,
    pub distance_m: f64,
    pub duration_s: f64,
}

/// One continuous driven leg, as returned by a routing provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteSegment {
    pub polyline: Polyline,
    pub instructions: Vec<Instruction>,
    pub distance_km: f64,
}

/// A charging station as reported by a locator.
///
/// `power_kw` is optional because station datasets frequently omit it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub name: String,
    pub address: String,
    pub coordinate: Coordinate,
    pub power_kw: Option<f64>,
}

/// A charging stop inserted between two route segments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChargingStop {
    pub station_name: String,
    pub address: String,
    pub coordinate: Coordinate,
    /// Power used for the charge time, after defaulting.
    pub power_kw: f64,
    pub charge_minutes: f64,
}

/// A complete multi-leg itinerary.
///
/// Stop `i` lies between `segments[i]` and `segments[i + 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripPlan {
    pub start: Coordinate,
    pub end: Coordinate,
    pub autonomy_km: f64,
    pub segments: Vec<RouteSegment>,
    pub stops: Vec<ChargingStop>,
    /// Sum of driven segment distances.
    pub total_distance_km: f64,
    /// Sum of stop charge durations.
    pub total_charge_minutes: f64,
}

impl TripPlan {
    pub fn recharge_count(&self) -> usize {
        self.stops.len()
    }

    pub fn polylines(&self) -> impl Iterator<Item = &Polyline> {
        self.segments.iter().map(|segment| &segment.polyline)
    }

    /// Turn instructions of the leg that ends at the destination.
    pub fn final_instructions(&self) -> &[Instruction] {
        self.segments
            .last()
            .map(|segment| segment.instructions.as_slice())
            .unwrap_or_default()
    }
}

/// Terminal status of a planning request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlanStatus {
    Planned,
    Failed(String),
}

impl PlanStatus {
    pub fn of<E: std::fmt::Display>(result: &Result<TripPlan, E>) -> Self {
        match result {
            Ok(_) => PlanStatus::Planned,
            Err(err) => PlanStatus::Failed(err.to_string()),
        }
    }
}
