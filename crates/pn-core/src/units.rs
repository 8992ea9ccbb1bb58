// pn-core/src/units.rs

use uom::si::f64::{
    AngularVelocity as UomAngularVelocity, ElectricCurrent as UomElectricCurrent,
    ElectricPotential as UomElectricPotential, Force as UomForce, Power as UomPower,
    Pressure as UomPressure, ThermodynamicTemperature as UomThermodynamicTemperature,
    Torque as UomTorque,
};

// Flow-state and shaft quantities carried between stages (SI, f64)
pub type AngularVelocity = UomAngularVelocity;
pub type Current = UomElectricCurrent;
pub type Pressure = UomPressure;
pub type Temperature = UomThermodynamicTemperature;
pub type Torque = UomTorque;
pub type Voltage = UomElectricPotential;

// Result quantities
pub type Force = UomForce;
pub type Power = UomPower;

#[inline]
pub fn pa(v: f64) -> Pressure {
    use uom::si::pressure::pascal;
    Pressure::new::<pascal>(v)
}

#[inline]
pub fn k(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::kelvin;
    Temperature::new::<kelvin>(v)
}

#[inline]
pub fn volts(v: f64) -> Voltage {
    use uom::si::electric_potential::volt;
    Voltage::new::<volt>(v)
}

#[inline]
pub fn amps(v: f64) -> Current {
    use uom::si::electric_current::ampere;
    Current::new::<ampere>(v)
}

#[inline]
pub fn rad_per_s(v: f64) -> AngularVelocity {
    use uom::si::angular_velocity::radian_per_second;
    AngularVelocity::new::<radian_per_second>(v)
}

#[inline]
pub fn newton_meters(v: f64) -> Torque {
    use uom::si::torque::newton_meter;
    Torque::new::<newton_meter>(v)
}

#[inline]
pub fn newtons(v: f64) -> Force {
    use uom::si::force::newton;
    Force::new::<newton>(v)
}

#[inline]
pub fn watts(v: f64) -> Power {
    use uom::si::power::watt;
    Power::new::<watt>(v)
}

/// Revolutions per minute to radians per second.
#[inline]
pub fn rpm_to_rad_per_s(rpm: f64) -> f64 {
    rpm * core::f64::consts::PI / 30.0
}

/// Radians per second to revolutions per minute.
#[inline]
pub fn rad_per_s_to_rpm(omega: f64) -> f64 {
    omega * 30.0 / core::f64::consts::PI
}

pub mod constants {
    pub const G0_MPS2: f64 = 9.806_65;

    /// Sea-level standard pressure (Pa)
    pub const P_REF_PA: f64 = 101_325.0;

    /// Sea-level standard temperature (K)
    pub const T_REF_K: f64 = 288.15;

    /// Sea-level standard density (kg/m³)
    pub const RHO_REF_KG_M3: f64 = 1.225;

    /// Specific gas constant of dry air (J/(kg·K))
    pub const R_AIR: f64 = 287.0528;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_values_are_si() {
        assert_eq!(pa(5.0).value, 5.0);
        assert_eq!(k(300.0).value, 300.0);
        assert_eq!(volts(12.0).value, 12.0);
        assert_eq!(rad_per_s(3.0).value, 3.0);
        assert_eq!(newton_meters(2.5).value, 2.5);
        assert_eq!(amps(4.0).value, 4.0);
        assert_eq!(newtons(100.0).value, 100.0);
        assert_eq!(watts(1000.0).value, 1000.0);
    }

    #[test]
    fn rpm_conversion_round_trip() {
        let omega = rpm_to_rad_per_s(2400.0);
        assert!((rad_per_s_to_rpm(omega) - 2400.0).abs() < 1e-9);
    }
}
