//! The conversion-stage contract.

use crate::error::StageResult;
use pn_flow::{FlowState, Freestream};
use serde::{Deserialize, Serialize};

/// Kind tag for every stage in the library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    Ram,
    CompressionNozzle,
    Compressor,
    Fan,
    Combustor,
    Turbine,
    ExpansionNozzle,
    SpeedController,
    Motor,
    Rotor,
    Engine,
}

/// Work demanded from a turbine by the components on its spool.
///
/// All work terms are specific (J per kg of core flow entering the
/// compressor stages). `offtake_work` is zero when the spool carries no
/// shaft power off-take.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ShaftLoad {
    pub compressor_work: f64,
    pub fan_work: f64,
    pub bypass_ratio: f64,
    pub fuel_to_air: f64,
    pub offtake_work: f64,
}

/// How a motor is driven during evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DriveCommand {
    /// Shaft angular velocity at the rotor side of the gearbox (rad/s).
    AngularVelocity(f64),
    /// Shaft torque at the rotor side of the gearbox (N·m).
    Torque(f64),
}

/// Everything a stage may read besides its inlet state.
#[derive(Debug, Clone, Copy)]
pub struct StageEnv<'a> {
    pub freestream: &'a Freestream,
    /// Throttle setting in [0, 1].
    pub throttle: f64,
    /// Collective pitch command (rad) for rotors.
    pub pitch_command: f64,
    pub shaft_load: Option<ShaftLoad>,
    pub drive: Option<DriveCommand>,
}

impl<'a> StageEnv<'a> {
    pub fn new(freestream: &'a Freestream) -> Self {
        Self {
            freestream,
            throttle: 1.0,
            pitch_command: 0.0,
            shaft_load: None,
            drive: None,
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

    pub fn with_shaft_load(self, load: ShaftLoad) -> Self {
        Self {
            shaft_load: Some(load),
            ..self
        }
    }

    pub fn with_drive(self, drive: DriveCommand) -> Self {
        Self {
            drive: Some(drive),
            ..self
        }
    }
}

/// Stage-specific results that are not part of the flow state.
///
/// Fields that a stage does not produce stay at zero.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SideOutputs {
    /// Specific stagnation enthalpy change across the stage (J/kg).
    pub specific_work: f64,
    pub fuel_to_air: f64,
    pub thrust_n: f64,
    pub exit_velocity_mps: f64,
    pub exit_density_kg_m3: f64,
    /// Exit area over sonic throat area.
    pub area_ratio: f64,
    pub choked: bool,
    pub shaft_power_w: f64,
    pub electrical_power_w: f64,
    pub fuel_rate_kgps: f64,
    pub induced_velocity_mps: f64,
    pub efficiency: f64,
}

/// Outlet state plus side outputs.
#[derive(Debug, Clone, PartialEq)]
pub struct StageOutput {
    pub state: FlowState,
    pub side: SideOutputs,
}

impl StageOutput {
    pub fn new(state: FlowState, side: SideOutputs) -> Self {
        Self { state, side }
    }
}

/// A single-purpose conversion stage.
///
/// Stages are deterministic functions of the inlet state, their parameters and
/// the environment: evaluating twice with the same inputs yields identical
/// outputs.
pub trait ConversionStage: Send + Sync {
    /// Stage name for debugging and trace records.
    fn name(&self) -> &str;

    fn kind(&self) -> StageKind;

    /// Check design parameters. Called once when an assembly is built.
    fn validate(&self) -> StageResult<()> {
        Ok(())
    }

    /// Derive the outlet state from the inlet state.
    ///
    /// # Errors
    /// `StageError::InvalidThermodynamicState` when a derived quantity is
    /// undefined for this inlet.
    fn evaluate(&self, inlet: &FlowState, env: &StageEnv<'_>) -> StageResult<StageOutput>;
}
