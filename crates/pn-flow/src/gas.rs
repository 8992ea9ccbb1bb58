//! Calorically perfect gas properties.

use crate::error::{FlowError, FlowResult};
use pn_core::units::constants::R_AIR;
use serde::{Deserialize, Serialize};

/// Ratio of specific heats, gas constant and specific heat at constant pressure.
///
/// `cp` is kept consistent with `gamma` and `gas_constant`:
/// `cp = γ·R / (γ − 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GasProperties {
    /// Ratio of specific heats (-)
    pub gamma: f64,
    /// Specific gas constant (J/(kg·K))
    pub gas_constant: f64,
    /// Specific heat at constant pressure (J/(kg·K))
    pub cp: f64,
}

impl GasProperties {
    pub fn new(gamma: f64, gas_constant: f64) -> FlowResult<Self> {
        if !gamma.is_finite() || gamma <= 1.0 {
            return Err(FlowError::InvalidArg {
                what: "ratio of specific heats must exceed 1",
            });
        }
        if !gas_constant.is_finite() || gas_constant <= 0.0 {
            return Err(FlowError::InvalidArg {
                what: "gas constant must be positive",
            });
        }
        Ok(Self {
            gamma,
            gas_constant,
            cp: gamma * gas_constant / (gamma - 1.0),
        })
    }

    /// Dry air at standard conditions.
    pub fn air() -> Self {
        let gamma = 1.4;
        Self {
            gamma,
            gas_constant: R_AIR,
            cp: gamma * R_AIR / (gamma - 1.0),
        }
    }

    /// Override specific heat while keeping γ (used for hot-section gas tables).
    pub fn with_cp(self, cp: f64) -> FlowResult<Self> {
        if !cp.is_finite() || cp <= 0.0 {
            return Err(FlowError::InvalidArg {
                what: "specific heat must be positive",
            });
        }
        Ok(Self { cp, ..self })
    }

    /// Speed of sound at static temperature `t_k`.
    pub fn speed_of_sound(&self, t_k: f64) -> f64 {
        (self.gamma * self.gas_constant * t_k.max(0.0)).sqrt()
    }
}

impl Default for GasProperties {
    fn default() -> Self {
        Self::air()
    }
}
