//! Trip duration and cost estimation.
//!
//! [`estimate_plan`] is the route-aware estimator: it takes the charge time
//! and recharge count from a planned trip. [`estimate_offline`] derives them
//! from distance and autonomy alone, for when no stations are queried.
//! The two count recharges differently and are not interchangeable.
//!
//! Minutes are rounded half away from zero; 60 carries into the hour.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::TripParameters;
use crate::error::PlanError;
use crate::model::TripPlan;

pub const DEFAULT_CURRENCY: &str = "€";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripSummary {
    pub drive_hours: f64,
    pub charge_minutes: f64,
    pub total_hours: f64,
    /// Whole hours of the formatted duration.
    pub hours: u64,
    /// Remaining minutes of the formatted duration, 0..=59.
    pub minutes: u64,
    pub total_cost: f64,
    pub currency: String,
    pub recharge_count: usize,
}

impl TripSummary {
    /// Duration as `H h MM`, e.g. `3h05`.
    pub fn duration_label(&self) -> String {
        format!("{}h{:02}", self.hours, self.minutes)
    }

    pub fn cost_label(&self) -> String {
        format!("{:.2} {}", self.total_cost, self.currency)
    }
}

impl fmt::Display for TripSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Total time: {}, cost: {} (recharges: {})",
            self.duration_label(),
            self.cost_label(),
            self.recharge_count
        )
    }
}

/// Estimates duration and cost from aggregate distance and charge time.
///
/// The recharge count is left at zero; see [`estimate_plan`].
pub fn estimate(
    distance_km: f64,
    avg_speed_kmh: f64,
    charge_minutes: f64,
    cost_per_km: f64,
) -> Result<TripSummary, PlanError> {
    check_speed(avg_speed_kmh)?;
    check_non_negative("distance", distance_km)?;
    check_non_negative("charge time", charge_minutes)?;
    check_non_negative("cost per km", cost_per_km)?;

    let drive_hours = distance_km / avg_speed_kmh;
    let total_hours = drive_hours + charge_minutes / 60.0;
    let (hours, minutes) = split_hours(total_hours);

    Ok(TripSummary {
        drive_hours,
        charge_minutes,
        total_hours,
        hours,
        minutes,
        total_cost: distance_km * cost_per_km,
        currency: DEFAULT_CURRENCY.to_string(),
        recharge_count: 0,
    })
}

/// Estimates a planned trip using its driven distance and charging stops.
pub fn estimate_plan(plan: &TripPlan, params: &TripParameters) -> Result<TripSummary, PlanError> {
    let mut summary = estimate(
        plan.total_distance_km,
        params.avg_speed_kmh,
        plan.total_charge_minutes,
        params.cost_per_km,
    )?;
    summary.recharge_count = plan.recharge_count();
    summary.currency = params.currency.clone();
    Ok(summary)
}

/// Closed-form estimate without station data.
///
/// Every full autonomy span after the first costs a full recharge; a
/// leftover span costs a partial recharge proportional to its length. A
/// distance that is an exact multiple of autonomy ends at the destination
/// and needs no trailing recharge.
pub fn estimate_offline(
    distance_km: f64,
    avg_speed_kmh: f64,
    autonomy_km: f64,
    full_charge_minutes: f64,
    cost_per_km: f64,
) -> Result<TripSummary, PlanError> {
    check_non_negative("distance", distance_km)?;
    check_non_negative("charge time", full_charge_minutes)?;
    if !(autonomy_km.is_finite() && autonomy_km > 0.0) {
        return Err(PlanError::InvalidInput(format!(
            "autonomy must be positive, got {autonomy_km} km"
        )));
    }

    let (recharges, charge_minutes) = offline_recharges(distance_km, autonomy_km, full_charge_minutes);
    let mut summary = estimate(distance_km, avg_speed_kmh, charge_minutes, cost_per_km)?;
    summary.recharge_count = recharges;
    Ok(summary)
}

/// Returns `(full recharges, total charge minutes)`.
fn offline_recharges(distance_km: f64, autonomy_km: f64, full_charge_minutes: f64) -> (usize, f64) {
    let full_segments = (distance_km / autonomy_km).floor() as usize;
    let leftover_km = distance_km % autonomy_km;

    if full_segments == 0 {
        return (0, 0.0);
    }

    if leftover_km == 0.0 {
        let recharges = full_segments - 1;
        (recharges, recharges as f64 * full_charge_minutes)
    } else {
        let partial = leftover_km / autonomy_km * full_charge_minutes;
        (full_segments, full_segments as f64 * full_charge_minutes + partial)
    }
}

fn split_hours(total_hours: f64) -> (u64, u64) {
    let hours = total_hours.floor();
    let minutes = ((total_hours - hours) * 60.0).round();
    if minutes >= 60.0 {
        (hours as u64 + 1, 0)
    } else {
        (hours as u64, minutes as u64)
    }
}

fn check_speed(avg_speed_kmh: f64) -> Result<(), PlanError> {
    if avg_speed_kmh.is_finite() && avg_speed_kmh > 0.0 {
        Ok(())
    } else {
        Err(PlanError::InvalidInput(format!(
            "average speed must be positive, got {avg_speed_kmh} km/h"
        )))
    }
}

fn check_non_negative(what: &str, value: f64) -> Result<(), PlanError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(PlanError::InvalidInput(format!(
            "{what} must be a non-negative number, got {value}"
        )))
    }
}
