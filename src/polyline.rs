//! Polyline representation for route geometries.
//!
//! This module provides a type for working with polylines as decoded
//! coordinate sequences. Encoding/decoding happens at the boundary
//! (when receiving from a routing service).

use serde::{Deserialize, Serialize};

use crate::error::ProviderError;
use crate::haversine::haversine_km;
use crate::model::Coordinate;

/// Precision used by OpenRouteService and OSRM encoded geometries.
pub const DEFAULT_PRECISION: u32 = 5;

const SERVICE: &str = "polyline";

/// A polyline representing a route geometry as decoded coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    points: Vec<Coordinate>,
}

impl Polyline {
    /// Creates a new Polyline from decoded coordinate points.
    pub fn new(points: Vec<Coordinate>) -> Self {
        Self { points }
    }

    /// Returns a reference to the coordinate points.
    pub fn points(&self) -> &[Coordinate] {
        &self.points
    }

    /// Consumes the polyline and returns the owned coordinate points.
    pub fn into_points(self) -> Vec<Coordinate> {
        self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Great-circle length of the polyline, summed point to point.
    pub fn length_km(&self) -> f64 {
        self.points
            .windows(2)
            .map(|pair| haversine_km(pair[0], pair[1]))
            .sum()
    }

    /// Walks the polyline starting from `origin` and returns the index of the
    /// first point at which the cumulative distance reaches `threshold_km`.
    ///
    /// The walk measures `origin -> points[1]` first, then point to point;
    /// `points[0]` is taken to coincide with `origin`. Reaching the threshold
    /// exactly at a sample point selects that point.
    pub fn cut_point(&self, origin: Coordinate, threshold_km: f64) -> Option<usize> {
        let mut accumulated = 0.0;
        let mut last = origin;

        for (index, point) in self.points.iter().enumerate().skip(1) {
            accumulated += haversine_km(last, *point);
            if accumulated >= threshold_km {
                return Some(index);
            }
            last = *point;
        }

        None
    }

    /// Decodes a Google encoded polyline string.
    pub fn decode(encoded: &str, precision: u32) -> Result<Self, ProviderError> {
        let factor = 10f64.powi(precision as i32);
        let bytes = encoded.as_bytes();
        let mut index = 0;
        let mut lat = 0i64;
        let mut lon = 0i64;
        let mut points = Vec::new();

        while index < bytes.len() {
            lat += next_value(bytes, &mut index)?;
            lon += next_value(bytes, &mut index)?;
            points.push(Coordinate::new(lat as f64 / factor, lon as f64 / factor));
        }

        Ok(Self { points })
    }

    /// Encodes the polyline using the Google encoded polyline algorithm.
    pub fn encode(&self, precision: u32) -> String {
        let factor = 10f64.powi(precision as i32);
        let mut out = String::new();
        let mut prev_lat = 0i64;
        let mut prev_lon = 0i64;

        for point in &self.points {
            let lat = (point.lat * factor).round() as i64;
            let lon = (point.lon * factor).round() as i64;
            encode_value(lat - prev_lat, &mut out);
            encode_value(lon - prev_lon, &mut out);
            prev_lat = lat;
            prev_lon = lon;
        }

        out
    }
}

fn next_value(bytes: &[u8], index: &mut usize) -> Result<i64, ProviderError> {
    let mut result = 0i64;
    let mut shift = 0u32;

    loop {
        let byte = *bytes
            .get(*index)
            .ok_or_else(|| ProviderError::payload(SERVICE, "truncated encoded polyline"))?;
        if !(63..=126).contains(&byte) {
            return Err(ProviderError::payload(
                SERVICE,
                format!("invalid character {:?} at offset {}", byte as char, index),
            ));
        }
        *index += 1;

        let chunk = i64::from(byte - 63);
        result |= (chunk & 0x1f) << shift;
        shift += 5;

        if chunk < 0x20 {
            break;
        }
        if shift > 60 {
            return Err(ProviderError::payload(SERVICE, "encoded value overflows"));
        }
    }

    Ok(if result & 1 != 0 {
        !(result >> 1)
    } else {
        result >> 1
    })
}

fn encode_value(value: i64, out: &mut String) {
    let mut rest = if value < 0 { !(value << 1) } else { value << 1 };
    while rest >= 0x20 {
        out.push(char::from(((0x20 | (rest & 0x1f)) + 63) as u8));
        rest >>= 5;
    }
    out.push(char::from((rest + 63) as u8));
}
