//! Operating conditions handed to an assembly for one control point.

use crate::error::{AssemblyError, AssemblyResult};
use nalgebra::Vector3;
use pn_flow::Freestream;
use pn_stages::StageEnv;

/// Inputs from the mission-segment solver and the vehicle model.
#[derive(Debug, Clone, Copy)]
pub struct OperatingConditions {
    pub control_point: usize,
    pub freestream: Freestream,
    /// Throttle setting in [0, 1].
    pub throttle: f64,
    /// Collective pitch command (rad) for rotors.
    pub pitch_command: f64,
    /// Bus voltage supplied by the owning distributor (electric variants).
    pub bus_voltage: Option<f64>,
    pub center_of_gravity: Vector3<f64>,
}

impl OperatingConditions {
    pub fn new(control_point: usize, freestream: Freestream) -> Self {
        Self {
            control_point,
            freestream,
            throttle: 1.0,
            pitch_command: 0.0,
            bus_voltage: None,
            center_of_gravity: Vector3::zeros(),
        }
    }

    pub fn with_throttle(self, throttle: f64) -> Self {
        Self { throttle, ..self }
    }

    pub fn with_pitch_command(self, pitch_command: f64) -> Self {
        Self {
            pitch_command,
            ..self
        }
    }

    pub fn with_bus_voltage(self, voltage: f64) -> Self {
        Self {
            bus_voltage: Some(voltage),
            ..self
        }
    }

    pub fn with_center_of_gravity(self, cg: Vector3<f64>) -> Self {
        Self {
            center_of_gravity: cg,
            ..self
        }
    }

    pub(crate) fn check(&self) -> AssemblyResult<()> {
        if !self.throttle.is_finite() || !(0.0..=1.0).contains(&self.throttle) {
            return Err(AssemblyError::InvalidArg {
                what: "throttle must be in [0,1]",
            });
        }
        if !self.pitch_command.is_finite() {
            return Err(AssemblyError::InvalidArg {
                what: "pitch command must be finite",
            });
        }
        Ok(())
    }

    /// Stage environment for these conditions.
    pub fn stage_env(&self) -> StageEnv<'_> {
        StageEnv::new(&self.freestream)
            .with_throttle(self.throttle)
            .with_pitch_command(self.pitch_command)
    }
}
