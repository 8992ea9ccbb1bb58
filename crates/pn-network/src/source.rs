//! Energy sources: battery modules and fuel tanks.
//!
//! These carry the only state that changes from one control point to the
//! next. They are mutated solely through a distributor commit.

use serde::{Deserialize, Serialize};

/// Battery module with a linear open-circuit voltage curve.
///
/// `V_oc = V_min + SOC·(V_max − V_min)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatteryModule {
    pub name: String,
    /// Usable energy when full (J)
    pub energy_capacity_j: f64,
    /// Present stored energy (J)
    pub energy_j: f64,
    pub min_voltage: f64,
    pub max_voltage: f64,
    pub internal_resistance_ohm: f64,
    pub max_power_w: f64,
}

impl BatteryModule {
    /// A fully charged module.
    pub fn full(
        name: impl Into<String>,
        energy_capacity_j: f64,
        min_voltage: f64,
        max_voltage: f64,
        internal_resistance_ohm: f64,
        max_power_w: f64,
    ) -> Self {
        Self {
            name: name.into(),
            energy_capacity_j,
            energy_j: energy_capacity_j,
            min_voltage,
            max_voltage,
            internal_resistance_ohm,
            max_power_w,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if !self.energy_capacity_j.is_finite() || self.energy_capacity_j <= 0.0 {
            return Err(format!("battery '{}' capacity must be positive", self.name));
        }
        if !(0.0..=self.energy_capacity_j).contains(&self.energy_j) {
            return Err(format!(
                "battery '{}' energy must lie within its capacity",
                self.name
            ));
        }
        if !(self.min_voltage > 0.0 && self.max_voltage >= self.min_voltage) {
            return Err(format!("battery '{}' voltage range is invalid", self.name));
        }
        if self.internal_resistance_ohm < 0.0 || self.max_power_w <= 0.0 {
            return Err(format!(
                "battery '{}' needs non-negative resistance and positive max power",
                self.name
            ));
        }
        Ok(())
    }

    pub fn state_of_charge(&self) -> f64 {
        self.energy_j / self.energy_capacity_j
    }

    pub fn open_circuit_voltage(&self) -> f64 {
        let soc = self.state_of_charge().clamp(0.0, 1.0);
        self.min_voltage + soc * (self.max_voltage - self.min_voltage)
    }

    /// Energy needed to deliver `power_w` at `current_a` for `dt_s`,
    /// including the resistive loss.
    pub fn energy_demand(&self, power_w: f64, current_a: f64, dt_s: f64) -> f64 {
        (power_w + current_a * current_a * self.internal_resistance_ohm) * dt_s
    }

    /// Remove the energy demand of `power_w` at `current_a` over `dt_s`.
    ///
    /// Returns the energy actually removed. A negative demand (regeneration)
    /// charges the module. Stored energy stays within `0..=capacity`.
    pub fn discharge(&mut self, power_w: f64, current_a: f64, dt_s: f64) -> f64 {
        let demand = self.energy_demand(power_w, current_a, dt_s);
        let removed = demand.clamp(self.energy_j - self.energy_capacity_j, self.energy_j);
        self.energy_j -= removed;
        removed
    }

    pub fn is_depleted(&self) -> bool {
        self.energy_j <= 0.0
    }
}

/// Fuel tank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelTank {
    pub name: String,
    pub capacity_kg: f64,
    pub mass_kg: f64,
    /// Deliverable fuel flow (kg/s)
    pub max_flow_kgps: f64,
}

impl FuelTank {
    pub fn full(name: impl Into<String>, capacity_kg: f64, max_flow_kgps: f64) -> Self {
        Self {
            name: name.into(),
            capacity_kg,
            mass_kg: capacity_kg,
            max_flow_kgps,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if !self.capacity_kg.is_finite() || self.capacity_kg <= 0.0 {
            return Err(format!("tank '{}' capacity must be positive", self.name));
        }
        if !(0.0..=self.capacity_kg).contains(&self.mass_kg) {
            return Err(format!(
                "tank '{}' fuel mass must lie within its capacity",
                self.name
            ));
        }
        if !self.max_flow_kgps.is_finite() || self.max_flow_kgps <= 0.0 {
            return Err(format!("tank '{}' max flow must be positive", self.name));
        }
        Ok(())
    }

    /// Burn `mass_kg`; returns the mass actually removed.
    pub fn burn(&mut self, mass_kg: f64) -> f64 {
        let removed = mass_kg.clamp(0.0, self.mass_kg);
        self.mass_kg -= removed;
        removed
    }

    pub fn is_depleted(&self) -> bool {
        self.mass_kg <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_circuit_voltage_tracks_charge() {
        let mut b = BatteryModule::full("pack", 1000.0, 300.0, 400.0, 0.0, 10_000.0);
        assert_eq!(b.open_circuit_voltage(), 400.0);
        b.discharge(500.0, 0.0, 1.0);
        assert_eq!(b.state_of_charge(), 0.5);
        assert_eq!(b.open_circuit_voltage(), 350.0);
    }

    #[test]
    fn discharge_clamps_at_empty() {
        let mut b = BatteryModule::full("pack", 100.0, 300.0, 400.0, 0.1, 10_000.0);
        let removed = b.discharge(1000.0, 10.0, 1.0);
        assert_eq!(removed, 100.0);
        assert_eq!(b.energy_j, 0.0);
        assert!(b.is_depleted());
    }

    #[test]
    fn resistive_loss_adds_to_draw() {
        let mut b = BatteryModule::full("pack", 1.0e6, 300.0, 400.0, 0.05, 10_000.0);
        let removed = b.discharge(1000.0, 20.0, 2.0);
        assert!((removed - (1000.0 + 400.0 * 0.05) * 2.0).abs() < 1e-9);
    }

    #[test]
    fn regeneration_stops_at_capacity() {
        let mut b = BatteryModule::full("pack", 1000.0, 300.0, 400.0, 0.0, 10_000.0);
        let removed = b.discharge(-50.0, -0.2, 10.0);
        assert_eq!(removed, 0.0);
        assert_eq!(b.energy_j, 1000.0);
        assert_eq!(b.state_of_charge(), 1.0);
        assert_eq!(b.open_circuit_voltage(), 400.0);
        assert!(b.validate().is_ok());
    }

    #[test]
    fn regeneration_refills_a_partial_pack() {
        let mut b = BatteryModule::full("pack", 1000.0, 300.0, 400.0, 0.0, 10_000.0);
        b.discharge(600.0, 0.0, 1.0);
        assert_eq!(b.discharge(-100.0, 0.0, 1.0), -100.0);
        assert_eq!(b.energy_j, 500.0);
        assert_eq!(b.discharge(-1000.0, 0.0, 1.0), -500.0);
        assert_eq!(b.energy_j, 1000.0);
    }

    #[test]
    fn voltage_stays_in_range_for_out_of_range_charge() {
        let mut b = BatteryModule::full("pack", 1000.0, 300.0, 400.0, 0.0, 10_000.0);
        b.energy_j = 1200.0;
        assert_eq!(b.open_circuit_voltage(), 400.0);
        b.energy_j = -10.0;
        assert_eq!(b.open_circuit_voltage(), 300.0);
    }

    #[test]
    fn tank_burn_clamps() {
        let mut t = FuelTank::full("main", 10.0, 1.0);
        assert_eq!(t.burn(4.0), 4.0);
        assert_eq!(t.burn(10.0), 6.0);
        assert!(t.is_depleted());
    }
}
