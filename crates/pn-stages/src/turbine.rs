//! Turbine stage.

use crate::common::check_efficiency;
use crate::error::{InStage, StageError, StageResult};
use crate::traits::{ConversionStage, ShaftLoad, SideOutputs, StageEnv, StageKind, StageOutput};
use pn_core::units::{k, pa};
use pn_flow::FlowState;
use serde::{Deserialize, Serialize};

/// Gas turbine that powers the compressors (and fan) on its spool.
///
/// ## Model
///
/// The enthalpy drop is set by the work demanded from the spool:
///
/// ```text
/// Δht    = −(w_comp + α·w_fan + w_offtake) / ((1 + f) · η_mech)
/// Tt_out = Tt_in + Δht / cp
/// Pt_out = Pt_in · (Tt_out/Tt_in)^(γ/((γ−1)·η_poly))
/// ```
///
/// The spool demand arrives through `StageEnv::shaft_load`; evaluating a
/// turbine without one is an error.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Turbine {
    pub name: String,
    pub polytropic_efficiency: f64,
    pub mechanical_efficiency: f64,
}

impl Turbine {
    pub fn new(
        name: impl Into<String>,
        polytropic_efficiency: f64,
        mechanical_efficiency: f64,
    ) -> StageResult<Self> {
        let stage = Self {
            name: name.into(),
            polytropic_efficiency,
            mechanical_efficiency,
        };
        stage.validate()?;
        Ok(stage)
    }

    /// Stagnation enthalpy change (negative) needed to carry `load`.
    pub fn enthalpy_drop(&self, load: &ShaftLoad) -> f64 {
        let demand = load.compressor_work + load.bypass_ratio * load.fan_work + load.offtake_work;
        -demand / ((1.0 + load.fuel_to_air) * self.mechanical_efficiency)
    }
}

impl ConversionStage for Turbine {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> StageKind {
        StageKind::Turbine
    }

    fn validate(&self) -> StageResult<()> {
        check_efficiency(
            self.polytropic_efficiency,
            "turbine polytropic efficiency must be in (0,1]",
        )?;
        check_efficiency(
            self.mechanical_efficiency,
            "turbine mechanical efficiency must be in (0,1]",
        )
    }

    fn evaluate(&self, inlet: &FlowState, env: &StageEnv<'_>) -> StageResult<StageOutput> {
        let load = env.shaft_load.ok_or_else(|| StageError::MissingInput {
            stage: self.name.clone(),
            what: "shaft load",
        })?;

        let gas = *inlet.gas();
        let tt_in = inlet.total_temperature().value;
        let delta_ht = self.enthalpy_drop(&load);
        let tt_out = tt_in + delta_ht / gas.cp;
        if !tt_out.is_finite() || tt_out <= 0.0 {
            return Err(StageError::invalid_state(
                &self.name,
                "spool demand exceeds available turbine enthalpy",
            ));
        }

        let exponent = gas.gamma / ((gas.gamma - 1.0) * self.polytropic_efficiency);
        let pt_out = inlet.total_pressure().value * (tt_out / tt_in).powf(exponent);

        let state = FlowState::from_stagnation(k(tt_out), pa(pt_out), inlet.mach(), gas)
            .in_stage(&self.name)?
            .with_electrical_from(inlet);

        let side = SideOutputs {
            specific_work: delta_ht,
            fuel_to_air: load.fuel_to_air,
            ..SideOutputs::default()
        };
        Ok(StageOutput::new(state, side))
    }
}
