//! Comprehensive planner tests
//!
//! Tests for stop insertion, the radius ladder, failure kinds and batching,
//! against mock collaborators on the equator where distances are easy to
//! reason about (one degree of longitude is 111.195 km).

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use ev_trip_planner::config::{PlannerConfig, TripParameters};
use ev_trip_planner::error::{PlanError, ProviderError};
use ev_trip_planner::haversine::{haversine_km, HaversineRouter};
use ev_trip_planner::model::{Coordinate, PlanStatus, RouteSegment, Station, Vehicle};
use ev_trip_planner::planner::{Planner, TripRequest};
use ev_trip_planner::polyline::Polyline;
use ev_trip_planner::traits::{Geocoder, RoutingProvider, StationLocator};

// ============================================================================
// Test Fixtures
// ============================================================================

const ORIGIN: Coordinate = Coordinate::new(0.0, 0.0);

fn east(degrees: f64) -> Coordinate {
    Coordinate::new(0.0, degrees)
}

/// 60 kWh at 5 km/kWh: 300 km autonomy, 240 km before each stop.
fn vehicle() -> Vehicle {
    Vehicle::new("ev-60", 60.0)
}

fn station(name: &str, coordinate: Coordinate, power_kw: Option<f64>) -> Station {
    Station {
        name: name.to_string(),
        address: format!("{name} address"),
        coordinate,
        power_kw,
    }
}

struct MockGeocoder {
    places: HashMap<&'static str, Coordinate>,
}

impl MockGeocoder {
    fn equator() -> Self {
        Self {
            places: HashMap::from([
                ("Origin", ORIGIN),
                ("Near", east(2.0)),
                ("Mid", east(5.0)),
                ("Far", east(9.0)),
            ]),
        }
    }
}

impl Geocoder for MockGeocoder {
    fn geocode(&self, place: &str) -> Result<Option<Coordinate>, ProviderError> {
        Ok(self.places.get(place).copied())
    }
}

type Respond = fn(Coordinate, u32) -> Result<Option<Station>, ProviderError>;

/// Locator that records every query radius and answers with `respond`.
struct RecordingLocator {
    queries: Mutex<Vec<u32>>,
    respond: Respond,
}

impl RecordingLocator {
    fn new(respond: Respond) -> Self {
        Self {
            queries: Mutex::new(Vec::new()),
            respond,
        }
    }

    fn queries(&self) -> Vec<u32> {
        self.queries.lock().unwrap().clone()
    }
}

impl StationLocator for RecordingLocator {
    fn find_station(&self, at: Coordinate, radius_m: u32) -> Result<Option<Station>, ProviderError> {
        self.queries.lock().unwrap().push(radius_m);
        (self.respond)(at, radius_m)
    }
}

/// A station about 1.1 km north of the queried point.
fn beside_query(at: Coordinate, _radius_m: u32) -> Result<Option<Station>, ProviderError> {
    Ok(Some(station(
        "Borne",
        Coordinate::new(at.lat + 0.01, at.lon),
        Some(50.0),
    )))
}

fn at_query(at: Coordinate, _radius_m: u32) -> Result<Option<Station>, ProviderError> {
    Ok(Some(station("Borne", at, Some(50.0))))
}

fn only_wide(at: Coordinate, radius_m: u32) -> Result<Option<Station>, ProviderError> {
    if radius_m >= 20_000 {
        at_query(at, radius_m)
    } else {
        Ok(None)
    }
}

fn nowhere(_at: Coordinate, _radius_m: u32) -> Result<Option<Station>, ProviderError> {
    Ok(None)
}

fn broken(_at: Coordinate, _radius_m: u32) -> Result<Option<Station>, ProviderError> {
    Err(ProviderError::Remote {
        service: "irve",
        message: "503 Service Unavailable".to_string(),
    })
}

/// Always offers the same station at the trip origin, so no progress is made.
fn at_origin(_at: Coordinate, _radius_m: u32) -> Result<Option<Station>, ProviderError> {
    Ok(Some(station("Origin", ORIGIN, Some(50.0))))
}

fn without_power(at: Coordinate, _radius_m: u32) -> Result<Option<Station>, ProviderError> {
    Ok(Some(station("Borne", at, Some(0.0))))
}

fn planner_with<R: RoutingProvider>(
    router: R,
    respond: Respond,
    config: PlannerConfig,
) -> Planner<MockGeocoder, R, RecordingLocator> {
    Planner::new(
        MockGeocoder::equator(),
        router,
        RecordingLocator::new(respond),
        config,
    )
}

fn planner(respond: Respond) -> Planner<MockGeocoder, HaversineRouter, RecordingLocator> {
    planner_with(HaversineRouter::default(), respond, PlannerConfig::default())
}

struct FailingRouter;

impl RoutingProvider for FailingRouter {
    fn route(&self, _from: Coordinate, _to: Coordinate) -> Result<RouteSegment, ProviderError> {
        Err(ProviderError::Remote {
            service: "ors",
            message: "route not found".to_string(),
        })
    }
}

/// Reports the full distance but only returns geometry for the first 100 km.
struct TruncatedRouter;

impl RoutingProvider for TruncatedRouter {
    fn route(&self, from: Coordinate, to: Coordinate) -> Result<RouteSegment, ProviderError> {
        let mut segment = HaversineRouter::default().route(from, to)?;
        let points: Vec<Coordinate> = segment.polyline.points().iter().take(101).copied().collect();
        segment.polyline = Polyline::new(points);
        Ok(segment)
    }
}

/// Returns a single-point polyline.
struct DegenerateRouter;

impl RoutingProvider for DegenerateRouter {
    fn route(&self, from: Coordinate, to: Coordinate) -> Result<RouteSegment, ProviderError> {
        Ok(RouteSegment {
            polyline: Polyline::new(vec![from]),
            instructions: Vec::new(),
            distance_km: haversine_km(from, to),
        })
    }
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}

fn assert_same_point(a: Coordinate, b: Coordinate) {
    assert!(haversine_km(a, b) < 1e-6, "{a:?} != {b:?}");
}

// ============================================================================
// Stop insertion
// ============================================================================

#[test]
fn test_direct_trip_within_autonomy() {
    let planner = planner(beside_query);
    let plan = planner.plan("Origin", "Near", &vehicle()).unwrap();

    assert_eq!(plan.segments.len(), 1);
    assert!(plan.stops.is_empty());
    assert_close(plan.total_distance_km, haversine_km(ORIGIN, east(2.0)));
    assert!(planner_queries(&planner).is_empty());
}

#[test]
fn test_long_trip_inserts_stops() {
    let planner = planner(beside_query);
    let plan = planner.plan("Origin", "Far", &vehicle()).unwrap();

    // 1000.75 km: stops near 240, 480 and 720 km, then 281 km to go
    assert_eq!(plan.stops.len(), 3);
    assert_eq!(plan.segments.len(), 4);
    assert_eq!(plan.recharge_count(), 3);
    assert_same_point(plan.start, ORIGIN);
    assert_same_point(plan.end, east(9.0));
}

#[test]
fn test_segments_connect_through_stops() {
    let planner = planner(beside_query);
    let plan = planner.plan("Origin", "Far", &vehicle()).unwrap();

    for (i, stop) in plan.stops.iter().enumerate() {
        let before = plan.segments[i].polyline.points();
        let after = plan.segments[i + 1].polyline.points();
        assert_same_point(*before.last().unwrap(), stop.coordinate);
        assert_same_point(after[0], stop.coordinate);
    }
    let last = plan.segments.last().unwrap().polyline.points();
    assert_same_point(*last.last().unwrap(), east(9.0));
}

#[test]
fn test_totals_are_sums() {
    let planner = planner(beside_query);
    let plan = planner.plan("Origin", "Far", &vehicle()).unwrap();

    let distance: f64 = plan.segments.iter().map(|s| s.distance_km).sum();
    let charge: f64 = plan.stops.iter().map(|s| s.charge_minutes).sum();
    assert_close(plan.total_distance_km, distance);
    assert_close(plan.total_charge_minutes, charge);
    // 60 kWh at 50 kW
    assert_close(plan.total_charge_minutes, 3.0 * 72.0);
}

#[test]
fn test_each_leg_stays_within_autonomy() {
    let planner = planner(beside_query);
    let plan = planner.plan("Origin", "Far", &vehicle()).unwrap();

    for segment in &plan.segments {
        assert!(segment.distance_km <= plan.autonomy_km, "{}", segment.distance_km);
    }
}

#[test]
fn test_one_locator_query_per_stop() {
    let planner = planner(beside_query);
    let plan = planner.plan("Origin", "Far", &vehicle()).unwrap();

    assert_eq!(planner_queries(&planner), vec![5_000; plan.stops.len()]);
}

#[test]
fn test_safety_margin_changes_stop_count() {
    // 556 km: cut at 240 km leaves 316 km, cut at 300 km leaves 256 km
    let cautious = planner(at_query);
    let plan = cautious.plan("Origin", "Mid", &vehicle()).unwrap();
    assert_eq!(plan.stops.len(), 2);

    let bold = planner_with(
        HaversineRouter::default(),
        at_query,
        PlannerConfig::default().with_safety_margin(1.0),
    );
    let plan = bold.plan("Origin", "Mid", &vehicle()).unwrap();
    assert_eq!(plan.stops.len(), 1);
    assert!((plan.stops[0].coordinate.lon - 300.0 / 111.195).abs() < 0.02);
}

#[test]
fn test_missing_power_uses_default() {
    let planner = planner(without_power);
    let plan = planner.plan("Origin", "Mid", &vehicle()).unwrap();

    for stop in &plan.stops {
        assert_eq!(stop.power_kw, 22.0);
        assert_close(stop.charge_minutes, 60.0 / 22.0 * 60.0);
    }
}

// ============================================================================
// Radius ladder
// ============================================================================

#[test]
fn test_radius_ladder_widens_until_found() {
    let planner = planner(only_wide);
    let plan = planner.plan("Origin", "Mid", &vehicle()).unwrap();

    assert_eq!(plan.stops.len(), 2);
    assert_eq!(
        planner_queries(&planner),
        vec![5_000, 20_000, 5_000, 20_000]
    );
}

#[test]
fn test_no_station_after_widest_radius() {
    let planner = planner(nowhere);
    let err = planner.plan("Origin", "Mid", &vehicle()).unwrap_err();

    assert!(matches!(err, PlanError::NoStationFound(_)), "{err}");
    assert_eq!(planner_queries(&planner), vec![5_000, 20_000, 50_000]);
}

#[test]
fn test_custom_radius_ladder() {
    let planner = planner_with(
        HaversineRouter::default(),
        nowhere,
        PlannerConfig::default().with_search_radii(vec![1_000, 2_000]),
    );
    let err = planner.plan("Origin", "Mid", &vehicle()).unwrap_err();

    assert!(matches!(err, PlanError::NoStationFound(_)));
    assert_eq!(planner_queries(&planner), vec![1_000, 2_000]);
}

#[test]
fn test_locator_failure_is_no_station() {
    let planner = planner(broken);
    let err = planner.plan("Origin", "Mid", &vehicle()).unwrap_err();

    assert!(matches!(err, PlanError::NoStationFound(_)));
    assert!(err.to_string().contains("503"), "{err}");
    // transport errors do not fall through to wider radii
    assert_eq!(planner_queries(&planner), vec![5_000]);
}

// ============================================================================
// Failure kinds
// ============================================================================

#[test]
fn test_no_progress_hits_iteration_cap() {
    let planner = planner(at_origin);
    let err = planner.plan("Origin", "Mid", &vehicle()).unwrap_err();

    assert!(matches!(err, PlanError::TooManyStops(_)), "{err}");
    assert_eq!(planner_queries(&planner).len(), 20);
}

#[test]
fn test_custom_iteration_cap() {
    let planner = planner_with(
        HaversineRouter::default(),
        at_origin,
        PlannerConfig::default().with_max_iterations(3),
    );
    let err = planner.plan("Origin", "Far", &vehicle()).unwrap_err();

    assert!(matches!(err, PlanError::TooManyStops(_)));
    assert_eq!(planner_queries(&planner).len(), 3);
}

#[test]
fn test_unknown_place() {
    let err = planner(at_query)
        .plan("Origin", "Atlantis", &vehicle())
        .unwrap_err();
    assert!(matches!(err, PlanError::GeocodingFailed(_)));
    assert!(err.to_string().contains("Atlantis"));
}

#[test]
fn test_routing_failure() {
    let planner = planner_with(FailingRouter, at_query, PlannerConfig::default());
    let err = planner.plan("Origin", "Near", &vehicle()).unwrap_err();
    assert!(matches!(err, PlanError::RoutingFailed(_)), "{err}");
}

#[test]
fn test_degenerate_route_is_routing_failure() {
    let planner = planner_with(DegenerateRouter, at_query, PlannerConfig::default());
    let err = planner.plan("Origin", "Near", &vehicle()).unwrap_err();
    assert!(matches!(err, PlanError::RoutingFailed(_)), "{err}");
}

#[test]
fn test_route_too_short_for_cut_point() {
    let planner = planner_with(TruncatedRouter, at_query, PlannerConfig::default());
    let err = planner.plan("Origin", "Mid", &vehicle()).unwrap_err();

    assert!(matches!(err, PlanError::AutonomyComputationError(_)), "{err}");
    assert!(planner_queries(&planner).is_empty());
}

#[test]
fn test_zero_capacity_vehicle() {
    let err = planner(at_query)
        .plan("Origin", "Near", &Vehicle::new("empty", 0.0))
        .unwrap_err();
    assert!(matches!(err, PlanError::InvalidVehicle(_)));
}

#[test]
fn test_expired_deadline() {
    let planner = planner_with(
        HaversineRouter::default(),
        at_query,
        PlannerConfig::default().with_request_timeout(Duration::ZERO),
    );
    let err = planner.plan("Origin", "Near", &vehicle()).unwrap_err();
    assert_eq!(err, PlanError::Timeout(Duration::ZERO));
}

#[test]
fn test_generous_deadline() {
    let planner = planner_with(
        HaversineRouter::default(),
        at_query,
        PlannerConfig::default().with_request_timeout(Duration::from_secs(60)),
    );
    assert!(planner.plan("Origin", "Mid", &vehicle()).is_ok());
}

#[test]
fn test_plan_status() {
    let planner = planner(nowhere);
    assert_eq!(
        PlanStatus::of(&planner.plan("Origin", "Near", &vehicle())),
        PlanStatus::Planned
    );

    let failed = planner.plan("Origin", "Mid", &vehicle());
    match PlanStatus::of(&failed) {
        PlanStatus::Failed(reason) => assert!(reason.starts_with("no charging station found")),
        PlanStatus::Planned => panic!("expected failure"),
    }
}

// ============================================================================
// Entry points
// ============================================================================

#[test]
fn test_plan_between_coordinates() {
    let planner = planner(at_query);
    let by_name = planner.plan("Origin", "Mid", &vehicle()).unwrap();
    let by_coordinate = planner.plan_between(ORIGIN, east(5.0), &vehicle()).unwrap();
    assert_eq!(by_name, by_coordinate);
}

#[test]
fn test_plan_for_vehicle_id() {
    let catalog = vec![
        Vehicle::new("zoe", 52.0).with_name("Renault Zoe"),
        Vehicle::new("city", 20.0),
    ];
    let planner = planner(at_query);

    let plan = planner
        .plan_for_vehicle_id(&catalog, "Origin", "Near", "zoe")
        .unwrap();
    assert_eq!(plan.autonomy_km, 260.0);
    assert!(plan.stops.is_empty());

    let err = planner
        .plan_for_vehicle_id(&catalog, "Origin", "Near", "cybertruck")
        .unwrap_err();
    assert!(matches!(err, PlanError::InvalidVehicle(_)));
}

#[test]
fn test_plan_and_estimate_direct() {
    let planner = planner(at_query);
    let (plan, summary) = planner
        .plan_and_estimate("Origin", "Near", &vehicle(), &TripParameters::default())
        .unwrap();

    // 222.39 km at 90 km/h
    assert_eq!(summary.recharge_count, 0);
    assert_close(summary.drive_hours, plan.total_distance_km / 90.0);
    assert_eq!(summary.duration_label(), "2h28");
    assert_eq!(summary.cost_label(), "22.24 €");
}

#[test]
fn test_plan_and_estimate_counts_stops() {
    let planner = planner(at_query);
    let (plan, summary) = planner
        .plan_and_estimate("Origin", "Mid", &vehicle(), &TripParameters::default())
        .unwrap();

    assert_eq!(summary.recharge_count, plan.stops.len());
    assert_close(summary.charge_minutes, plan.total_charge_minutes);
    assert_close(
        summary.total_hours,
        plan.total_distance_km / 90.0 + plan.total_charge_minutes / 60.0,
    );
}

#[test]
fn test_plan_and_estimate_propagates_plan_failure() {
    let err = planner(nowhere)
        .plan_and_estimate("Origin", "Mid", &vehicle(), &TripParameters::default())
        .unwrap_err();
    assert!(matches!(err, PlanError::NoStationFound(_)));
}

#[test]
fn test_plan_batch_keeps_request_order() {
    let planner = planner(at_query);
    let request = |start: &str, end: &str| TripRequest {
        start: start.to_string(),
        end: end.to_string(),
        vehicle: vehicle(),
    };
    let requests = vec![
        request("Origin", "Far"),
        request("Origin", "Atlantis"),
        request("Origin", "Near"),
        request("Origin", "Mid"),
    ];

    let results = planner.plan_batch(&requests);

    assert_eq!(results.len(), 4);
    assert_eq!(results[0].as_ref().unwrap().stops.len(), 3);
    assert!(matches!(results[1], Err(PlanError::GeocodingFailed(_))));
    assert_eq!(results[2].as_ref().unwrap().stops.len(), 0);
    assert_eq!(results[3].as_ref().unwrap().stops.len(), 2);
}

fn planner_queries<R: RoutingProvider>(planner: &Planner<MockGeocoder, R, RecordingLocator>) -> Vec<u32> {
    planner.locator().queries()
}
