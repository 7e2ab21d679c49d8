//! French cities and charging stations for realistic trip fixtures.
//!
//! Coordinates are rounded town-centre positions; station power ratings are
//! representative, and one station deliberately reports none.

use ev_trip_planner::model::{Coordinate, Station};

/// A named location with coordinates.
#[derive(Debug, Clone)]
pub struct Location {
    pub name: &'static str,
    pub lat: f64,
    pub lon: f64,
}

impl Location {
    pub const fn new(name: &'static str, lat: f64, lon: f64) -> Self {
        Self { name, lat, lon }
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lon)
    }
}

/// A station fixture; `power_kw` of `None` means the dataset omits it.
#[derive(Debug, Clone)]
pub struct StationFixture {
    pub location: Location,
    pub address: &'static str,
    pub power_kw: Option<f64>,
}

impl StationFixture {
    pub const fn new(location: Location, address: &'static str, power_kw: Option<f64>) -> Self {
        Self {
            location,
            address,
            power_kw,
        }
    }

    pub fn station(&self) -> Station {
        Station {
            name: self.location.name.to_string(),
            address: self.address.to_string(),
            coordinate: self.location.coordinate(),
            power_kw: self.power_kw,
        }
    }
}

// ============================================================================
// Trip endpoints
// ============================================================================

pub const PARIS: Location = Location::new("Paris", 48.8566, 2.3522);
pub const LYON: Location = Location::new("Lyon", 45.7640, 4.8357);
pub const MARSEILLE: Location = Location::new("Marseille", 43.2965, 5.3698);
pub const DIJON: Location = Location::new("Dijon", 47.3220, 5.0415);
pub const LILLE: Location = Location::new("Lille", 50.6292, 3.0573);

pub const CITIES: &[Location] = &[PARIS, LYON, MARSEILLE, DIJON, LILLE];

// ============================================================================
// Charging stations
// ============================================================================

pub const STATIONS: &[StationFixture] = &[
    StationFixture::new(Location::new("Aire de Venoy", 47.7980, 3.6420), "A6, 89290 Venoy", Some(50.0)),
    StationFixture::new(Location::new("Beaune Tailly", 46.9900, 4.8000), "A6, 21190 Tailly", Some(150.0)),
    StationFixture::new(Location::new("Mâcon Saint-Albain", 46.4200, 4.8700), "A6, 71260 Saint-Albain", None),
    StationFixture::new(Location::new("Lyon Part-Dieu", 45.7606, 4.8593), "Place Charles Béraudier, 69003 Lyon", Some(22.0)),
    StationFixture::new(Location::new("Valence Nord", 44.9600, 4.8900), "A7, 26000 Valence", Some(50.0)),
    StationFixture::new(Location::new("Montélimar Est", 44.5500, 4.7700), "A7, 26200 Montélimar", Some(150.0)),
    StationFixture::new(Location::new("Avignon Nord", 43.9900, 4.8800), "A7, 84700 Sorgues", Some(22.0)),
    StationFixture::new(Location::new("Nevers Centre", 46.9900, 3.1600), "Place Carnot, 58000 Nevers", Some(22.0)),
    StationFixture::new(Location::new("Clermont-Ferrand Jaude", 45.7770, 3.0820), "Place de Jaude, 63000 Clermont-Ferrand", Some(50.0)),
    StationFixture::new(Location::new("Orléans Gare", 47.9080, 1.9050), "Rue Saint-Yves, 45000 Orléans", Some(22.0)),
    StationFixture::new(Location::new("Saint-Étienne Châteaucreux", 45.4430, 4.3990), "Esplanade de France, 42000 Saint-Étienne", Some(50.0)),
    StationFixture::new(Location::new("Montbard", 47.6230, 4.3380), "Rue de la Gare, 21500 Montbard", Some(22.0)),
    StationFixture::new(Location::new("Sézanne", 48.7200, 3.7200), "Route de Paris, 51120 Sézanne", None),
];
