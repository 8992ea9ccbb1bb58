//! Expansion nozzle (core or fan exhaust).

use crate::common::{check_efficiency, check_positive};
use crate::error::{InStage, StageError, StageResult};
use crate::traits::{ConversionStage, SideOutputs, StageEnv, StageKind, StageOutput};
use pn_core::units::{k, pa};
use pn_flow::FlowState;
use pn_flow::isentropic::{area_ratio, critical_pressure_ratio, mach_from_pressure_ratio};
use serde::{Deserialize, Serialize};

/// Convergent exhaust nozzle.
///
/// ## Model
///
/// ```text
/// Pt_out = Pt_in · π_n
/// Tt_out = Tt_in · π_n^((γ−1)/γ · η_poly)
/// ```
///
/// With `PR = Pt_out / p0` and `PR_crit = ((γ+1)/2)^(γ/(γ−1))`:
/// - `PR ≥ PR_crit`: choked, `M = 1`, `p_exit = Pt_out / PR_crit`
/// - otherwise: fully expanded, `p_exit = p0`, `M` from `PR`
///
/// An exit pressure ratio below one has no real exit Mach number and is
/// reported as an invalid state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExpansionNozzle {
    pub name: String,
    pub pressure_ratio: f64,
    pub polytropic_efficiency: f64,
}

impl ExpansionNozzle {
    pub fn new(
        name: impl Into<String>,
        pressure_ratio: f64,
        polytropic_efficiency: f64,
    ) -> StageResult<Self> {
        let stage = Self {
            name: name.into(),
            pressure_ratio,
            polytropic_efficiency,
        };
        stage.validate()?;
        Ok(stage)
    }
}

impl ConversionStage for ExpansionNozzle {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> StageKind {
        StageKind::ExpansionNozzle
    }

    fn validate(&self) -> StageResult<()> {
        check_positive(self.pressure_ratio, "nozzle pressure ratio must be positive")?;
        check_efficiency(
            self.polytropic_efficiency,
            "nozzle polytropic efficiency must be in (0,1]",
        )
    }

    fn evaluate(&self, inlet: &FlowState, env: &StageEnv<'_>) -> StageResult<StageOutput> {
        let gas = *inlet.gas();
        let p0 = env.freestream.pressure_pa;
        let pt_out = inlet.total_pressure().value * self.pressure_ratio;
        let tt_out = inlet.total_temperature().value
            * self
                .pressure_ratio
                .powf((gas.gamma - 1.0) / gas.gamma * self.polytropic_efficiency);

        let pr = pt_out / p0;
        let choked = pr >= critical_pressure_ratio(gas.gamma);
        let mach = if choked {
            1.0
        } else {
            mach_from_pressure_ratio(gas.gamma, pr).in_stage(&self.name)?
        };
        if mach <= 0.0 {
            return Err(StageError::invalid_state(
                &self.name,
                "nozzle pressure ratio yields no exit flow",
            ));
        }

        let state = FlowState::from_stagnation(k(tt_out), pa(pt_out), mach, gas)
            .in_stage(&self.name)?
            .with_electrical_from(inlet);

        let t_exit = state.static_temperature().value;
        let p_exit = state.static_pressure().value;
        let side = SideOutputs {
            exit_velocity_mps: state.velocity_mps(),
            exit_density_kg_m3: p_exit / (gas.gas_constant * t_exit),
            area_ratio: area_ratio(gas.gamma, mach).in_stage(&self.name)?,
            choked,
            ..SideOutputs::default()
        };
        Ok(StageOutput::new(state, side))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pn_flow::{Freestream, GasProperties};

    fn nozzle() -> ExpansionNozzle {
        ExpansionNozzle::new("core_nozzle", 0.99, 1.0).unwrap()
    }

    #[test]
    fn high_pressure_ratio_chokes() {
        let fs = Freestream::sea_level(0.0).unwrap();
        let inlet =
            FlowState::from_stagnation(k(900.0), pa(300_000.0), 0.3, GasProperties::air()).unwrap();
        let out = nozzle().evaluate(&inlet, &StageEnv::new(&fs)).unwrap();

        assert!(out.side.choked);
        assert_eq!(out.state.mach(), 1.0);
        assert!(out.state.static_pressure().value > fs.pressure_pa);
        assert!((out.side.area_ratio - 1.0).abs() < 1e-12);
    }

    #[test]
    fn low_pressure_ratio_expands_to_ambient() {
        let fs = Freestream::sea_level(0.0).unwrap();
        let inlet =
            FlowState::from_stagnation(k(320.0), pa(140_000.0), 0.3, GasProperties::air()).unwrap();
        let out = nozzle().evaluate(&inlet, &StageEnv::new(&fs)).unwrap();

        assert!(!out.side.choked);
        assert!(out.state.mach() < 1.0);
        assert!((out.state.static_pressure().value - fs.pressure_pa).abs() < 1e-6);
        assert!(out.side.exit_velocity_mps > 0.0);
    }

    #[test]
    fn sub_ambient_stagnation_is_invalid() {
        let fs = Freestream::sea_level(0.0).unwrap();
        let inlet =
            FlowState::from_stagnation(k(320.0), pa(90_000.0), 0.3, GasProperties::air()).unwrap();
        let err = nozzle().evaluate(&inlet, &StageEnv::new(&fs)).unwrap_err();
        assert!(err.is_invalid_state());
    }
}
