//! Greedy charging-stop planner.
//!
//! Advances from the start towards the destination one full charge at a
//! time: when the destination is out of range, it walks the provisional
//! route to the safety-margin fraction of autonomy, finds the nearest
//! station around that cut-point, drives there and recharges to full.

use std::time::{Duration, Instant};

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::config::{PlannerConfig, TripParameters};
use crate::energy::EnergyModel;
use crate::error::{PlanError, ProviderError};
use crate::estimator::{self, TripSummary};
use crate::haversine::haversine_km;
use crate::model::{ChargingStop, Coordinate, RouteSegment, Station, TripPlan, Vehicle};
use crate::traits::{Geocoder, RoutingProvider, StationLocator, VehicleCatalog};

/// A single independent planning request.
#[derive(Debug, Clone)]
pub struct TripRequest {
    pub start: String,
    pub end: String,
    pub vehicle: Vehicle,
}

/// Planner state. `Reached` and `Failed` are terminal.
#[derive(Debug)]
enum PlanState {
    Advancing(Coordinate),
    Reached,
    Failed(PlanError),
}

#[derive(Debug, Clone, Copy)]
struct Deadline {
    started: Instant,
    limit: Option<Duration>,
}

impl Deadline {
    fn start(limit: Option<Duration>) -> Self {
        Self {
            started: Instant::now(),
            limit,
        }
    }

    fn check(&self) -> Result<(), PlanError> {
        match self.limit {
            Some(limit) if self.started.elapsed() >= limit => Err(PlanError::Timeout(limit)),
            _ => Ok(()),
        }
    }
}

/// Per-request values that stay fixed across iterations.
struct Leg<'a> {
    end: Coordinate,
    vehicle: &'a Vehicle,
    autonomy_km: f64,
    deadline: &'a Deadline,
}

/// Segments and stops accumulated while advancing.
struct TripBuilder {
    segments: Vec<RouteSegment>,
    stops: Vec<ChargingStop>,
    total_distance_km: f64,
    total_charge_minutes: f64,
}

impl TripBuilder {
    fn new() -> Self {
        Self {
            segments: Vec::new(),
            stops: Vec::new(),
            total_distance_km: 0.0,
            total_charge_minutes: 0.0,
        }
    }

    fn push_segment(&mut self, segment: RouteSegment) {
        self.total_distance_km += segment.distance_km;
        self.segments.push(segment);
    }

    fn push_stop(&mut self, stop: ChargingStop) {
        self.total_charge_minutes += stop.charge_minutes;
        self.stops.push(stop);
    }

    fn finish(self, start: Coordinate, end: Coordinate, autonomy_km: f64) -> TripPlan {
        TripPlan {
            start,
            end,
            autonomy_km,
            segments: self.segments,
            stops: self.stops,
            total_distance_km: self.total_distance_km,
            total_charge_minutes: self.total_charge_minutes,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Planner<G, R, S> {
    geocoder: G,
    router: R,
    locator: S,
    config: PlannerConfig,
    energy: EnergyModel,
}

impl<G, R, S> Planner<G, R, S>
where
    G: Geocoder,
    R: RoutingProvider,
    S: StationLocator,
{
    pub fn new(geocoder: G, router: R, locator: S, config: PlannerConfig) -> Self {
        let energy = EnergyModel::new(config.economy_km_per_kwh);
        Self {
            geocoder,
            router,
            locator,
            config,
            energy,
        }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn energy(&self) -> &EnergyModel {
        &self.energy
    }

    pub fn locator(&self) -> &S {
        &self.locator
    }

    /// Plans a trip between two place names.
    pub fn plan(
        &self,
        start_place: &str,
        end_place: &str,
        vehicle: &Vehicle,
    ) -> Result<TripPlan, PlanError> {
        let deadline = Deadline::start(self.config.request_timeout);
        info!(start = start_place, end = end_place, vehicle = %vehicle.id, "planning trip");

        let result = self.validate().and_then(|()| {
            let autonomy_km = self.autonomy(vehicle)?;
            let start = self.resolve(start_place, &deadline)?;
            let end = self.resolve(end_place, &deadline)?;
            self.run(start, end, vehicle, autonomy_km, &deadline)
        });

        result.inspect_err(|err| warn!(%err, "trip planning failed"))
    }

    /// Plans a trip between two already resolved coordinates.
    pub fn plan_between(
        &self,
        start: Coordinate,
        end: Coordinate,
        vehicle: &Vehicle,
    ) -> Result<TripPlan, PlanError> {
        let deadline = Deadline::start(self.config.request_timeout);
        info!(?start, ?end, vehicle = %vehicle.id, "planning trip");

        let result = self.validate().and_then(|()| {
            let autonomy_km = self.autonomy(vehicle)?;
            self.run(start, end, vehicle, autonomy_km, &deadline)
        });

        result.inspect_err(|err| warn!(%err, "trip planning failed"))
    }

    /// Resolves the vehicle through `catalog`, then plans.
    pub fn plan_for_vehicle_id<C>(
        &self,
        catalog: &C,
        start_place: &str,
        end_place: &str,
        vehicle_id: &str,
    ) -> Result<TripPlan, PlanError>
    where
        C: VehicleCatalog + ?Sized,
    {
        let vehicle = catalog
            .vehicle_by_id(vehicle_id)
            .map_err(|err| PlanError::InvalidVehicle(format!("{vehicle_id}: {err}")))?
            .ok_or_else(|| PlanError::InvalidVehicle(format!("unknown vehicle {vehicle_id}")))?;

        self.plan(start_place, end_place, &vehicle)
    }

    /// Plans, then estimates duration and cost from the plan's aggregates.
    pub fn plan_and_estimate(
        &self,
        start_place: &str,
        end_place: &str,
        vehicle: &Vehicle,
        params: &TripParameters,
    ) -> Result<(TripPlan, TripSummary), PlanError> {
        let plan = self.plan(start_place, end_place, vehicle)?;
        let summary = estimator::estimate_plan(&plan, params)?;
        Ok((plan, summary))
    }

    fn validate(&self) -> Result<(), PlanError> {
        let margin = self.config.safety_margin;
        if !(margin > 0.0 && margin <= 1.0) {
            return Err(PlanError::InvalidInput(format!(
                "safety margin must be in (0, 1], got {margin}"
            )));
        }
        if self.config.search_radii_m.is_empty() {
            return Err(PlanError::InvalidInput(
                "at least one station search radius is required".to_string(),
            ));
        }
        let power = self.config.default_power_kw;
        if !(power.is_finite() && power > 0.0) {
            return Err(PlanError::InvalidInput(format!(
                "default station power must be positive, got {power} kW"
            )));
        }
        Ok(())
    }

    fn autonomy(&self, vehicle: &Vehicle) -> Result<f64, PlanError> {
        let autonomy_km = self
            .energy
            .autonomy_km(vehicle)
            .map_err(|err| PlanError::InvalidVehicle(format!("{}: {err}", vehicle.id)))?;
        if !(autonomy_km.is_finite() && autonomy_km > 0.0) {
            return Err(PlanError::InvalidVehicle(format!(
                "{}: autonomy must be positive, got {autonomy_km} km",
                vehicle.id
            )));
        }
        Ok(autonomy_km)
    }

    fn resolve(&self, place: &str, deadline: &Deadline) -> Result<Coordinate, PlanError> {
        deadline.check()?;
        match self.geocoder.geocode(place) {
            Ok(Some(coordinate)) => Ok(coordinate),
            Ok(None) => Err(PlanError::GeocodingFailed(format!("{place:?} not found"))),
            Err(err) => Err(PlanError::GeocodingFailed(format!("{place:?}: {err}"))),
        }
    }

    fn run(
        &self,
        start: Coordinate,
        end: Coordinate,
        vehicle: &Vehicle,
        autonomy_km: f64,
        deadline: &Deadline,
    ) -> Result<TripPlan, PlanError> {
        let leg = Leg {
            end,
            vehicle,
            autonomy_km,
            deadline,
        };
        let mut trip = TripBuilder::new();
        let mut state = PlanState::Advancing(start);
        let mut iterations = 0;

        loop {
            state = match state {
                PlanState::Advancing(_) if iterations >= self.config.max_iterations => {
                    PlanState::Failed(PlanError::TooManyStops(format!(
                        "destination not reached after {iterations} iterations"
                    )))
                }
                PlanState::Advancing(current) => {
                    iterations += 1;
                    self.advance(&mut trip, &leg, current, iterations)
                        .unwrap_or_else(PlanState::Failed)
                }
                PlanState::Reached => {
                    let plan = trip.finish(start, end, autonomy_km);
                    info!(
                        segments = plan.segments.len(),
                        stops = plan.stops.len(),
                        distance_km = plan.total_distance_km,
                        charge_minutes = plan.total_charge_minutes,
                        "trip planned"
                    );
                    return Ok(plan);
                }
                PlanState::Failed(err) => return Err(err),
            };
        }
    }

    /// One `Advancing` transition: either reach the destination or append a
    /// leg to the next charging stop.
    fn advance(
        &self,
        trip: &mut TripBuilder,
        leg: &Leg<'_>,
        current: Coordinate,
        iteration: usize,
    ) -> Result<PlanState, PlanError> {
        let Leg {
            end,
            vehicle,
            autonomy_km,
            deadline,
        } = *leg;
        let remaining_km = haversine_km(current, end);
        debug!(iteration, remaining_km, autonomy_km, "advancing");

        if remaining_km <= autonomy_km {
            let segment = self.route(current, end, deadline)?;
            trip.push_segment(segment);
            return Ok(PlanState::Reached);
        }

        // Provisional route, only walked to find the cut-point.
        let probe = self.route(current, end, deadline)?;
        let threshold_km = autonomy_km * self.config.safety_margin;
        let cut = probe
            .polyline
            .cut_point(current, threshold_km)
            .and_then(|index| probe.polyline.points().get(index).copied())
            .ok_or_else(|| {
                PlanError::AutonomyComputationError(format!(
                    "route of {:.1} km never reaches {threshold_km:.1} km",
                    probe.polyline.length_km()
                ))
            })?;
        debug!(iteration, ?cut, threshold_km, "cut-point found");

        let station = self.find_station(cut, deadline)?;
        let segment = self.route(current, station.coordinate, deadline)?;
        trip.push_segment(segment);

        let power_kw = station
            .power_kw
            .filter(|power| power.is_finite() && *power > 0.0)
            .unwrap_or(self.config.default_power_kw);
        let charge_minutes = self
            .energy
            .charge_minutes(vehicle, power_kw)
            .map_err(|err| PlanError::InvalidInput(err.to_string()))?;
        debug!(iteration, station = %station.name, power_kw, charge_minutes, "charging stop");

        let next = station.coordinate;
        trip.push_stop(ChargingStop {
            station_name: station.name,
            address: station.address,
            coordinate: station.coordinate,
            power_kw,
            charge_minutes,
        });

        Ok(PlanState::Advancing(next))
    }

    fn route(
        &self,
        from: Coordinate,
        to: Coordinate,
        deadline: &Deadline,
    ) -> Result<RouteSegment, PlanError> {
        deadline.check()?;
        let segment = self
            .router
            .route(from, to)
            .map_err(|err| PlanError::RoutingFailed(err.to_string()))?;

        if segment.polyline.len() < 2 {
            return Err(PlanError::RoutingFailed(format!(
                "route has {} point(s), expected at least 2",
                segment.polyline.len()
            )));
        }
        if !(segment.distance_km.is_finite() && segment.distance_km >= 0.0) {
            return Err(PlanError::RoutingFailed(format!(
                "route distance {} km is not usable",
                segment.distance_km
            )));
        }

        Ok(segment)
    }

    /// Tries each configured radius in turn, nearest first.
    fn find_station(&self, at: Coordinate, deadline: &Deadline) -> Result<Station, PlanError> {
        for &radius_m in &self.config.search_radii_m {
            deadline.check()?;
            debug!(?at, radius_m, "searching for charging station");

            match self.locator.find_station(at, radius_m) {
                Ok(Some(station)) => return Ok(station),
                Ok(None) => continue,
                Err(err) => return Err(station_lookup_failed(at, &err)),
            }
        }

        let widest = self.config.search_radii_m.last().copied().unwrap_or_default();
        Err(PlanError::NoStationFound(format!(
            "nothing within {widest} m of ({:.5}, {:.5})",
            at.lat, at.lon
        )))
    }
}

impl<G, R, S> Planner<G, R, S>
where
    G: Geocoder + Sync,
    R: RoutingProvider + Sync,
    S: StationLocator + Sync,
{
    /// Plans independent requests in parallel. Results keep request order.
    pub fn plan_batch(&self, requests: &[TripRequest]) -> Vec<Result<TripPlan, PlanError>> {
        requests
            .par_iter()
            .map(|request| self.plan(&request.start, &request.end, &request.vehicle))
            .collect()
    }
}

fn station_lookup_failed(at: Coordinate, err: &ProviderError) -> PlanError {
    PlanError::NoStationFound(format!(
        "station lookup around ({:.5}, {:.5}) failed: {err}",
        at.lat, at.lon
    ))
}
