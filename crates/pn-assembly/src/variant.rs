//! Variant dispatch, selected once at construction.

use crate::conditions::OperatingConditions;
use crate::electric::ElectricRotor;
use crate::error::{AssemblyError, AssemblyResult};
use crate::gas_turbine::{Turbofan, Turbojet};
use crate::piston::InternalCombustionPropeller;
use crate::result::PerformanceCore;
use crate::unknowns::{Residual, Unknown};
use nalgebra::Vector3;
use pn_stages::ConversionStage;
use serde::Serialize;

/// The fixed stage topology of a propulsor.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "variant", rename_all = "snake_case")]
pub enum PropulsorVariant {
    Turbofan(Turbofan),
    Turbojet(Turbojet),
    ElectricRotor(ElectricRotor),
    InternalCombustionPropeller(InternalCombustionPropeller),
}

/// Output of one pass through a variant's stage chain.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub core: PerformanceCore,
    pub residuals: Vec<Residual>,
}

impl Evaluation {
    pub(crate) fn uncoupled(core: PerformanceCore) -> Self {
        Self {
            core,
            residuals: Vec::new(),
        }
    }
}

pub(crate) fn check_stage(tag: &str, stage: &dyn ConversionStage) -> AssemblyResult<()> {
    stage.validate().map_err(|e| {
        AssemblyError::configuration(tag, format!("stage '{}': {e}", stage.name()))
    })
}

impl PropulsorVariant {
    pub fn name(&self) -> &'static str {
        match self {
            PropulsorVariant::Turbofan(_) => "turbofan",
            PropulsorVariant::Turbojet(_) => "turbojet",
            PropulsorVariant::ElectricRotor(_) => "electric_rotor",
            PropulsorVariant::InternalCombustionPropeller(_) => "internal_combustion_propeller",
        }
    }

    pub(crate) fn validate(&self, tag: &str) -> AssemblyResult<()> {
        match self {
            PropulsorVariant::Turbofan(v) => v.validate(tag),
            PropulsorVariant::Turbojet(v) => v.validate(tag),
            PropulsorVariant::ElectricRotor(v) => v.validate(tag),
            PropulsorVariant::InternalCombustionPropeller(v) => v.validate(tag),
        }
    }

    /// Ordered unknowns; empty for variants without a shared shaft to balance.
    pub fn unknowns(&self) -> Vec<Unknown> {
        match self {
            PropulsorVariant::Turbofan(_) | PropulsorVariant::Turbojet(_) => Vec::new(),
            PropulsorVariant::ElectricRotor(v) => v.unknowns(),
            PropulsorVariant::InternalCombustionPropeller(v) => v.unknowns(),
        }
    }

    pub fn is_coupled(&self) -> bool {
        matches!(
            self,
            PropulsorVariant::ElectricRotor(_) | PropulsorVariant::InternalCombustionPropeller(_)
        )
    }

    pub fn is_electric(&self) -> bool {
        matches!(self, PropulsorVariant::ElectricRotor(_))
    }

    pub(crate) fn evaluate(
        &self,
        tag: &str,
        axis: &Vector3<f64>,
        cond: &OperatingConditions,
        trial: &[f64],
    ) -> AssemblyResult<Evaluation> {
        match self {
            PropulsorVariant::Turbofan(v) => v.evaluate(tag, axis, cond),
            PropulsorVariant::Turbojet(v) => v.evaluate(tag, axis, cond),
            PropulsorVariant::ElectricRotor(v) => v.evaluate(tag, axis, cond, trial),
            PropulsorVariant::InternalCombustionPropeller(v) => v.evaluate(tag, axis, cond, trial),
        }
    }
}
