//! Compressor and fan stages.

use crate::common::{check_efficiency, polytropic_temperature_ratio};
use crate::error::{InStage, StageError, StageResult};
use crate::traits::{ConversionStage, SideOutputs, StageEnv, StageKind, StageOutput};
use pn_core::units::{k, pa};
use pn_flow::FlowState;
use serde::{Deserialize, Serialize};

/// Axial or centrifugal compressor.
///
/// ## Model
///
/// ```text
/// Pt_out = Pt_in · PR
/// Tt_out = Tt_in · PR^((γ−1)/(γ·η_poly))
/// w      = cp · (Tt_out − Tt_in)
/// ```
///
/// Static conditions at the exit are backed out with the inlet Mach number.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Compressor {
    pub name: String,
    pub pressure_ratio: f64,
    pub polytropic_efficiency: f64,
}

/// Fan stage. Same thermodynamics as [`Compressor`]; its work is charged to
/// the bypass and core flow together through the bypass ratio.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Fan {
    pub name: String,
    pub pressure_ratio: f64,
    pub polytropic_efficiency: f64,
}

impl Compressor {
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

impl Fan {
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

fn validate_compression(pressure_ratio: f64, eta: f64) -> StageResult<()> {
    if !pressure_ratio.is_finite() || pressure_ratio < 1.0 {
        return Err(StageError::InvalidArg {
            what: "compression pressure ratio must be at least 1",
        });
    }
    check_efficiency(eta, "compression polytropic efficiency must be in (0,1]")
}

fn compress(
    name: &str,
    pressure_ratio: f64,
    eta_poly: f64,
    inlet: &FlowState,
) -> StageResult<StageOutput> {
    let gas = *inlet.gas();
    let tt_in = inlet.total_temperature().value;
    let pt_out = inlet.total_pressure().value * pressure_ratio;
    let tt_out = tt_in * polytropic_temperature_ratio(pressure_ratio, gas.gamma, eta_poly);

    let state = FlowState::from_stagnation(k(tt_out), pa(pt_out), inlet.mach(), gas)
        .in_stage(name)?
        .with_electrical_from(inlet);

    let side = SideOutputs {
        specific_work: gas.cp * (tt_out - tt_in),
        ..SideOutputs::default()
    };
    Ok(StageOutput::new(state, side))
}

impl ConversionStage for Compressor {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> StageKind {
        StageKind::Compressor
    }

    fn validate(&self) -> StageResult<()> {
        validate_compression(self.pressure_ratio, self.polytropic_efficiency)
    }

    fn evaluate(&self, inlet: &FlowState, _env: &StageEnv<'_>) -> StageResult<StageOutput> {
        compress(
            &self.name,
            self.pressure_ratio,
            self.polytropic_efficiency,
            inlet,
        )
    }
}

impl ConversionStage for Fan {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> StageKind {
        StageKind::Fan
    }

    fn validate(&self) -> StageResult<()> {
        validate_compression(self.pressure_ratio, self.polytropic_efficiency)
    }

    fn evaluate(&self, inlet: &FlowState, _env: &StageEnv<'_>) -> StageResult<StageOutput> {
        compress(
            &self.name,
            self.pressure_ratio,
            self.polytropic_efficiency,
            inlet,
        )
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use pn_flow::{Freestream, GasProperties};
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn pressure_scales_by_ratio(
            tt in 200.0_f64..900.0,
            pt in 10_000.0_f64..2_000_000.0,
            mach in 0.0_f64..0.9,
            pr in 1.0_f64..30.0,
            eta in 0.5_f64..1.0,
        ) {
            let fs = Freestream::sea_level(0.0).unwrap();
            let inlet = FlowState::from_stagnation(k(tt), pa(pt), mach, GasProperties::air()).unwrap();
            let c = Compressor::new("c", pr, eta).unwrap();
            let out = c.evaluate(&inlet, &StageEnv::new(&fs)).unwrap();

            let pt_out = out.state.total_pressure().value;
            prop_assert!((pt_out - pt * pr).abs() <= 1e-9 * pt * pr);
            prop_assert!(pt_out >= pt);
            prop_assert!(out.state.total_temperature().value >= tt);
        }

        #[test]
        fn evaluation_is_idempotent(pr in 1.0_f64..20.0, eta in 0.6_f64..1.0) {
            let fs = Freestream::sea_level(0.5).unwrap();
            let inlet = FlowState::from_freestream(&fs).unwrap();
            let c = Compressor::new("c", pr, eta).unwrap();
            let env = StageEnv::new(&fs);
            let first = c.evaluate(&inlet, &env).unwrap();
            let second = c.evaluate(&inlet, &env).unwrap();
            prop_assert_eq!(first, second);
        }
    }
}
