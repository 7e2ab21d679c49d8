use std::collections::HashMap;

use ev_trip_planner::config::PlannerConfig;
use ev_trip_planner::error::ProviderError;
use ev_trip_planner::haversine::HaversineRouter;
use ev_trip_planner::model::{Coordinate, Station, Vehicle};
use ev_trip_planner::planner::Planner;
use ev_trip_planner::traits::{Geocoder, StationLocator};

struct MockGeocoder {
    places: HashMap<&'static str, Coordinate>,
}

impl Geocoder for MockGeocoder {
    fn geocode(&self, place: &str) -> Result<Option<Coordinate>, ProviderError> {
        Ok(self.places.get(place).copied())
    }
}

struct MockLocator;

impl StationLocator for MockLocator {
    fn find_station(&self, at: Coordinate, _radius_m: u32) -> Result<Option<Station>, ProviderError> {
        Ok(Some(Station {
            name: "Borne".to_string(),
            address: "Aire de repos".to_string(),
            coordinate: at,
            power_kw: Some(50.0),
        }))
    }
}

fn planner() -> Planner<MockGeocoder, HaversineRouter, MockLocator> {
    let places = HashMap::from([
        ("A", Coordinate::new(0.0, 0.0)),
        ("B", Coordinate::new(0.0, 1.0)),
        ("C", Coordinate::new(0.0, 5.0)),
    ]);
    Planner::new(
        MockGeocoder { places },
        HaversineRouter::default(),
        MockLocator,
        PlannerConfig::default(),
    )
}

#[test]
fn smoke_direct_trip() {
    let plan = planner().plan("A", "B", &Vehicle::new("ev", 60.0)).unwrap();

    assert_eq!(plan.segments.len(), 1);
    assert!(plan.stops.is_empty());
    assert_eq!(plan.autonomy_km, 300.0);
    assert!((plan.total_distance_km - 111.195).abs() < 0.01);
    assert_eq!(plan.total_charge_minutes, 0.0);
}

#[test]
fn smoke_trip_with_stops() {
    // 556 km with 300 km autonomy, stopping every 240 km
    let plan = planner().plan("A", "C", &Vehicle::new("ev", 60.0)).unwrap();

    assert_eq!(plan.stops.len(), 2);
    assert_eq!(plan.segments.len(), plan.stops.len() + 1);
    for stop in &plan.stops {
        assert_eq!(stop.power_kw, 50.0);
        assert!((stop.charge_minutes - 72.0).abs() < 1e-9);
    }
    assert!((plan.total_charge_minutes - 144.0).abs() < 1e-9);
}
