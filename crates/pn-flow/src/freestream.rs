//! Freestream conditions at a single control point.

use crate::error::{FlowError, FlowResult};
use crate::gas::GasProperties;
use pn_core::units::constants::G0_MPS2;
use serde::{Deserialize, Serialize};

/// Undisturbed flow ahead of the vehicle.
///
/// Supplied by the mission-segment solver for every control point. Two
/// freestreams compare equal only when every field is bit-identical.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Freestream {
    pub temperature_k: f64,
    pub pressure_pa: f64,
    pub density_kg_m3: f64,
    pub mach: f64,
    pub velocity_mps: f64,
    pub speed_of_sound_mps: f64,
    pub gravity_mps2: f64,
    pub gas: GasProperties,
}

impl Freestream {
    /// Build from static temperature, static pressure and Mach number.
    pub fn from_static(
        temperature_k: f64,
        pressure_pa: f64,
        mach: f64,
        gravity_mps2: f64,
        gas: GasProperties,
    ) -> FlowResult<Self> {
        if !temperature_k.is_finite() || temperature_k <= 0.0 {
            return Err(FlowError::NonPhysical {
                what: "freestream temperature must be positive",
            });
        }
        if !pressure_pa.is_finite() || pressure_pa <= 0.0 {
            return Err(FlowError::NonPhysical {
                what: "freestream pressure must be positive",
            });
        }
        if !mach.is_finite() || mach < 0.0 {
            return Err(FlowError::NonPhysical {
                what: "freestream mach must be non-negative",
            });
        }

        let speed_of_sound_mps = gas.speed_of_sound(temperature_k);
        Ok(Self {
            temperature_k,
            pressure_pa,
            density_kg_m3: pressure_pa / (gas.gas_constant * temperature_k),
            mach,
            velocity_mps: mach * speed_of_sound_mps,
            speed_of_sound_mps,
            gravity_mps2,
            gas,
        })
    }

    /// Sea-level standard day in air at the given Mach number.
    pub fn sea_level(mach: f64) -> FlowResult<Self> {
        Self::from_static(288.15, 101_325.0, mach, G0_MPS2, GasProperties::air())
    }

    /// Bitwise comparison of every field.
    pub fn same_conditions(&self, other: &Freestream) -> bool {
        let a = self.bits();
        let b = other.bits();
        a == b
    }

    fn bits(&self) -> [u64; 10] {
        [
            self.temperature_k.to_bits(),
            self.pressure_pa.to_bits(),
            self.density_kg_m3.to_bits(),
            self.mach.to_bits(),
            self.velocity_mps.to_bits(),
            self.speed_of_sound_mps.to_bits(),
            self.gravity_mps2.to_bits(),
            self.gas.gamma.to_bits(),
            self.gas.gas_constant.to_bits(),
            self.gas.cp.to_bits(),
        ]
    }
}

impl PartialEq for Freestream {
    fn eq(&self, other: &Self) -> bool {
        self.same_conditions(other)
    }
}
