//! Test fixtures for ev-trip-planner.
//!
//! Provides realistic test data:
//! - French city centres (trip endpoints)
//! - Charging stations along the Paris - Lyon - Marseille corridor

pub mod french_locations;

pub use french_locations::*;
