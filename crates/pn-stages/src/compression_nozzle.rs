//! Compression nozzle (inlet diffuser).

use crate::common::{check_efficiency, check_positive, polytropic_temperature_ratio};
use crate::error::{InStage, StageResult};
use crate::traits::{ConversionStage, SideOutputs, StageEnv, StageKind, StageOutput};
use pn_core::units::{k, pa};
use pn_flow::FlowState;
use pn_flow::isentropic::mach_from_pressure_ratio;
use serde::{Deserialize, Serialize};

/// Inlet diffuser with a stagnation pressure recovery and polytropic loss.
///
/// ## Model
///
/// ```text
/// Pt_out = Pt_in · π_d
/// Tt_out = Tt_in · π_d^((γ−1)/(γ·η_poly))
/// M_out  = sqrt(2/(γ−1) · ((Pt_out/p0)^((γ−1)/γ) − 1))
/// ```
///
/// where `p0` is the freestream static pressure. The exit Mach number is
/// undefined when `Pt_out < p0`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompressionNozzle {
    pub name: String,
    pub pressure_ratio: f64,
    pub polytropic_efficiency: f64,
}

impl CompressionNozzle {
    pub fn new(
        name: impl Into<String>,
        pressure_ratio: f64,
        polytropic_efficiency: f64,
    ) -> StageResult<Self> {
        let nozzle = Self {
            name: name.into(),
            pressure_ratio,
            polytropic_efficiency,
        };
        nozzle.validate()?;
        Ok(nozzle)
    }
}

impl ConversionStage for CompressionNozzle {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> StageKind {
        StageKind::CompressionNozzle
    }

    fn validate(&self) -> StageResult<()> {
        check_positive(self.pressure_ratio, "inlet pressure ratio must be positive")?;
        check_efficiency(
            self.polytropic_efficiency,
            "inlet polytropic efficiency must be in (0,1]",
        )
    }

    fn evaluate(&self, inlet: &FlowState, env: &StageEnv<'_>) -> StageResult<StageOutput> {
        let gas = *inlet.gas();
        let pt_out = inlet.total_pressure().value * self.pressure_ratio;
        let tt_out = inlet.total_temperature().value
            * polytropic_temperature_ratio(
                self.pressure_ratio,
                gas.gamma,
                self.polytropic_efficiency,
            );

        let mach = mach_from_pressure_ratio(gas.gamma, pt_out / env.freestream.pressure_pa)
            .in_stage(&self.name)?;

        let state = FlowState::from_stagnation(k(tt_out), pa(pt_out), mach, gas)
            .in_stage(&self.name)?
            .with_electrical_from(inlet);

        let side = SideOutputs {
            specific_work: gas.cp * (tt_out - inlet.total_temperature().value),
            exit_velocity_mps: state.velocity_mps(),
            ..SideOutputs::default()
        };
        Ok(StageOutput::new(state, side))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pn_flow::Freestream;

    #[test]
    fn diffuser_loses_pressure() {
        let fs = Freestream::sea_level(0.8).unwrap();
        let inlet = FlowState::from_freestream(&fs).unwrap();
        let nozzle = CompressionNozzle::new("inlet", 0.98, 1.0).unwrap();
        let out = nozzle.evaluate(&inlet, &StageEnv::new(&fs)).unwrap();

        assert!((out.state.total_pressure().value - 0.98 * inlet.total_pressure().value).abs() < 1e-6);
        assert!(out.state.mach() < fs.mach);
        assert!(out.state.mach() > 0.0);
    }

    #[test]
    fn exit_below_ambient_is_invalid() {
        let fs = Freestream::sea_level(0.0).unwrap();
        let inlet = FlowState::from_freestream(&fs).unwrap();
        let nozzle = CompressionNozzle::new("inlet", 0.95, 1.0).unwrap();
        let err = nozzle.evaluate(&inlet, &StageEnv::new(&fs)).unwrap_err();
        assert!(err.is_invalid_state());
    }

    #[test]
    fn rejects_bad_efficiency() {
        assert!(CompressionNozzle::new("inlet", 0.98, 1.2).is_err());
    }
}
