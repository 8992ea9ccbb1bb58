//! Project schema definitions.

use pn_assembly::{
    ElectricRotorSlots, InternalCombustionPropellerSlots, TurbofanSlots, TurbojetSlots,
};
use pn_core::constants::{G0_MPS2, P_REF_PA, T_REF_K};
use pn_network::{BatteryModule, BusVoltage, FuelTank, SplitPolicy};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub version: u32,
    pub name: String,
    pub vehicle: VehicleDef,
    #[serde(default)]
    pub mission: MissionDef,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleDef {
    #[serde(default)]
    pub center_of_gravity: [f64; 3],
    #[serde(default)]
    pub distributors: Vec<DistributorDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistributorDef {
    pub tag: String,
    pub source: SourceDef,
    #[serde(default)]
    pub propulsor_split: SplitPolicy,
    #[serde(default)]
    pub source_split: SplitPolicy,
    #[serde(default)]
    pub propulsors: Vec<PropulsorDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SourceDef {
    Batteries {
        modules: Vec<BatteryModule>,
        voltage: BusVoltage,
    },
    Fuel {
        tanks: Vec<FuelTank>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropulsorDef {
    pub tag: String,
    #[serde(default)]
    pub origin: [f64; 3],
    #[serde(default = "default_thrust_axis")]
    pub thrust_axis: [f64; 3],
    #[serde(default)]
    pub identical: bool,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(flatten)]
    pub variant: VariantDef,
}

/// Stage tables of a propulsor. Every table is optional in the file; a
/// missing one is reported when the network is built.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "variant", rename_all = "snake_case")]
pub enum VariantDef {
    Turbofan(TurbofanSlots),
    Turbojet(TurbojetSlots),
    ElectricRotor(ElectricRotorSlots),
    InternalCombustionPropeller(InternalCombustionPropellerSlots),
}

impl VariantDef {
    pub fn name(&self) -> &'static str {
        match self {
            VariantDef::Turbofan(_) => "turbofan",
            VariantDef::Turbojet(_) => "turbojet",
            VariantDef::ElectricRotor(_) => "electric_rotor",
            VariantDef::InternalCombustionPropeller(_) => "internal_combustion_propeller",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MissionDef {
    #[serde(default)]
    pub solver: SolverDef,
    #[serde(default)]
    pub points: Vec<PointDef>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverDef {
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    #[serde(default = "default_abs_tol")]
    pub abs_tol: f64,
}

impl Default for SolverDef {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            abs_tol: default_abs_tol(),
        }
    }
}

/// One control point: freestream, commands and time spent there.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointDef {
    #[serde(default = "default_temperature")]
    pub temperature_k: f64,
    #[serde(default = "default_pressure")]
    pub pressure_pa: f64,
    pub mach: f64,
    #[serde(default = "default_gravity")]
    pub gravity_mps2: f64,
    #[serde(default = "default_throttle")]
    pub throttle: f64,
    #[serde(default)]
    pub pitch_command: f64,
    #[serde(default)]
    pub dt_s: f64,
}

fn default_thrust_axis() -> [f64; 3] {
    [1.0, 0.0, 0.0]
}

fn default_true() -> bool {
    true
}

fn default_max_iterations() -> usize {
    50
}

fn default_abs_tol() -> f64 {
    1e-6
}

fn default_temperature() -> f64 {
    T_REF_K
}

fn default_pressure() -> f64 {
    P_REF_PA
}

fn default_gravity() -> f64 {
    G0_MPS2
}

fn default_throttle() -> f64 {
    1.0
}
