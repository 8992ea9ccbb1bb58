//! The flow state passed between conversion stages.

use crate::error::{FlowError, FlowResult};
use crate::freestream::Freestream;
use crate::gas::GasProperties;
use crate::isentropic::{stagnation_pressure_ratio, stagnation_temperature_ratio};
use pn_core::units::{
    AngularVelocity, Current, Pressure, Temperature, Torque, Voltage, amps, k, newton_meters, pa,
    rad_per_s, volts,
};

/// Thermodynamic and electrical quantities at a stage boundary.
///
/// A `FlowState` is immutable once produced: stages read their inlet state and
/// derive a new outlet state through the constructors and `with_*` methods.
/// Stagnation temperature and pressure are never negative.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowState {
    tt: Temperature,
    pt: Pressure,
    t: Temperature,
    p: Pressure,
    mach: f64,
    velocity_mps: f64,
    gas: GasProperties,
    voltage: Voltage,
    current: Current,
    omega: AngularVelocity,
    torque: Torque,
}

impl FlowState {
    /// Create a state from stagnation conditions and Mach number.
    ///
    /// Static temperature and pressure follow from the isentropic relations.
    pub fn from_stagnation(
        tt: Temperature,
        pt: Pressure,
        mach: f64,
        gas: GasProperties,
    ) -> FlowResult<Self> {
        let tt_val = tt.value;
        if !tt_val.is_finite() || tt_val <= 0.0 {
            return Err(FlowError::NonPhysical {
                what: "stagnation temperature must be positive and finite",
            });
        }
        let pt_val = pt.value;
        if !pt_val.is_finite() || pt_val < 0.0 {
            return Err(FlowError::NonPhysical {
                what: "stagnation pressure must be non-negative and finite",
            });
        }
        if !mach.is_finite() || mach < 0.0 {
            return Err(FlowError::NonPhysical {
                what: "mach number must be non-negative and finite",
            });
        }

        let t_val = tt_val / stagnation_temperature_ratio(gas.gamma, mach);
        let p_val = pt_val / stagnation_pressure_ratio(gas.gamma, mach);

        Ok(Self {
            tt,
            pt,
            t: k(t_val),
            p: pa(p_val),
            mach,
            velocity_mps: mach * gas.speed_of_sound(t_val),
            gas,
            voltage: volts(0.0),
            current: amps(0.0),
            omega: rad_per_s(0.0),
            torque: newton_meters(0.0),
        })
    }

    /// Stagnation state of the undisturbed freestream.
    pub fn from_freestream(fs: &Freestream) -> FlowResult<Self> {
        let tt = fs.temperature_k * stagnation_temperature_ratio(fs.gas.gamma, fs.mach);
        let pt = fs.pressure_pa * stagnation_pressure_ratio(fs.gas.gamma, fs.mach);
        Self::from_stagnation(k(tt), pa(pt), fs.mach, fs.gas)
    }

    pub fn total_temperature(&self) -> Temperature {
        self.tt
    }

    pub fn total_pressure(&self) -> Pressure {
        self.pt
    }

    pub fn static_temperature(&self) -> Temperature {
        self.t
    }

    pub fn static_pressure(&self) -> Pressure {
        self.p
    }

    pub fn mach(&self) -> f64 {
        self.mach
    }

    /// Flow velocity implied by the Mach number (m/s).
    pub fn velocity_mps(&self) -> f64 {
        self.velocity_mps
    }

    pub fn gas(&self) -> &GasProperties {
        &self.gas
    }

    /// Stagnation specific enthalpy `cp·Tt` (J/kg).
    pub fn total_enthalpy(&self) -> f64 {
        self.gas.cp * self.tt.value
    }

    pub fn voltage(&self) -> Voltage {
        self.voltage
    }

    pub fn current(&self) -> Current {
        self.current
    }

    pub fn angular_velocity(&self) -> AngularVelocity {
        self.omega
    }

    pub fn torque(&self) -> Torque {
        self.torque
    }

    /// Same stagnation conditions with a different gas model.
    pub fn with_gas(&self, gas: GasProperties) -> FlowResult<Self> {
        let next = Self::from_stagnation(self.tt, self.pt, self.mach, gas)?;
        Ok(next.with_electrical_from(self))
    }

    pub fn with_voltage(mut self, voltage: Voltage) -> Self {
        self.voltage = voltage;
        self
    }

    pub fn with_current(mut self, current: Current) -> Self {
        self.current = current;
        self
    }

    pub fn with_angular_velocity(mut self, omega: AngularVelocity) -> Self {
        self.omega = omega;
        self
    }

    pub fn with_torque(mut self, torque: Torque) -> Self {
        self.torque = torque;
        self
    }

    /// Carry the electrical/mechanical quantities of `other` onto this state.
    pub fn with_electrical_from(mut self, other: &FlowState) -> Self {
        self.voltage = other.voltage;
        self.current = other.current;
        self.omega = other.omega;
        self.torque = other.torque;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statics_follow_mach() {
        let s = FlowState::from_stagnation(k(300.0), pa(200_000.0), 0.5, GasProperties::air())
            .unwrap();
        assert!(s.static_temperature().value < 300.0);
        assert!(s.static_pressure().value < 200_000.0);
        assert!(s.velocity_mps() > 0.0);
    }

    #[test]
    fn at_rest_static_equals_stagnation() {
        let s = FlowState::from_stagnation(k(288.15), pa(101_325.0), 0.0, GasProperties::air())
            .unwrap();
        assert_eq!(s.static_temperature().value, 288.15);
        assert_eq!(s.static_pressure().value, 101_325.0);
    }

    #[test]
    fn negative_stagnation_pressure_rejected() {
        let r = FlowState::from_stagnation(k(300.0), pa(-1.0), 0.1, GasProperties::air());
        assert!(r.is_err());
    }

    #[test]
    fn non_positive_temperature_rejected() {
        let r = FlowState::from_stagnation(k(0.0), pa(1.0), 0.1, GasProperties::air());
        assert!(r.is_err());
    }

    #[test]
    fn from_freestream_recovers_statics() {
        let fs = Freestream::sea_level(0.6).unwrap();
        let s = FlowState::from_freestream(&fs).unwrap();
        assert!((s.static_pressure().value - fs.pressure_pa).abs() < 1e-6);
        assert!((s.static_temperature().value - fs.temperature_k).abs() < 1e-9);
    }

    #[test]
    fn with_methods_derive_new_state() {
        let base = FlowState::from_freestream(&Freestream::sea_level(0.0).unwrap()).unwrap();
        let charged = base.clone().with_voltage(volts(48.0)).with_current(amps(3.0));
        assert_eq!(base.voltage().value, 0.0);
        assert_eq!(charged.voltage().value, 48.0);
        assert_eq!(charged.current().value, 3.0);
    }
}
