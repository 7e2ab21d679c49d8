//! ev-trip-planner core
//!
//! Plans electric-vehicle road trips with charging stops and estimates
//! their duration and cost. External services sit behind the traits in
//! [`traits`].

pub mod traits;
pub mod model;
pub mod error;
pub mod config;
pub mod haversine;
pub mod polyline;
pub mod energy;
pub mod planner;
pub mod estimator;
pub mod ors;
pub mod osrm;
pub mod nominatim;
pub mod irve;
pub mod chargetrip;
