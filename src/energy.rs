//! Battery capacity to range, and station power to charge time.
//!
//! Every stop is modelled as a full recharge of the usable capacity, not
//! proportional to the energy actually consumed on arrival.

use crate::error::EnergyError;
use crate::model::Vehicle;

/// Kilometres driven per kWh of usable capacity.
pub const DEFAULT_ECONOMY_KM_PER_KWH: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergyModel {
    pub economy_km_per_kwh: f64,
}

impl Default for EnergyModel {
    fn default() -> Self {
        Self {
            economy_km_per_kwh: DEFAULT_ECONOMY_KM_PER_KWH,
        }
    }
}

impl EnergyModel {
    pub fn new(economy_km_per_kwh: f64) -> Self {
        Self { economy_km_per_kwh }
    }

    /// Range on a full charge, in km.
    pub fn autonomy_km(&self, vehicle: &Vehicle) -> Result<f64, EnergyError> {
        let capacity = checked_capacity(vehicle)?;
        Ok(capacity * self.economy_km_per_kwh)
    }

    /// Minutes to recharge the full usable capacity at `power_kw`.
    pub fn charge_minutes(&self, vehicle: &Vehicle, power_kw: f64) -> Result<f64, EnergyError> {
        let capacity = checked_capacity(vehicle)?;
        if !(power_kw.is_finite() && power_kw > 0.0) {
            return Err(EnergyError::InvalidPower(power_kw));
        }
        Ok(capacity / power_kw * 60.0)
    }
}

fn checked_capacity(vehicle: &Vehicle) -> Result<f64, EnergyError> {
    if vehicle.usable_kwh.is_finite() && vehicle.usable_kwh > 0.0 {
        Ok(vehicle.usable_kwh)
    } else {
        Err(EnergyError::InvalidCapacity(vehicle.usable_kwh))
    }
}
