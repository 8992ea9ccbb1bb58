//! Electronic speed controller.

use crate::common::check_efficiency;
use crate::error::{StageError, StageResult};
use crate::traits::{ConversionStage, SideOutputs, StageEnv, StageKind, StageOutput};
use pn_core::units::volts;
use pn_flow::FlowState;
use serde::{Deserialize, Serialize};

/// Throttles bus voltage down to the motor terminal voltage.
///
/// `V_out = throttle · V_bus`. The current drawn from the bus follows from the
/// downstream motor current once it is known: `I_in = throttle · I_out / η`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpeedController {
    pub name: String,
    pub efficiency: f64,
}

impl SpeedController {
    pub fn new(name: impl Into<String>, efficiency: f64) -> StageResult<Self> {
        let stage = Self {
            name: name.into(),
            efficiency,
        };
        stage.validate()?;
        Ok(stage)
    }

    /// Bus-side current for a given motor-side current.
    pub fn current_in(&self, current_out: f64, throttle: f64) -> f64 {
        throttle * current_out / self.efficiency
    }
}

impl ConversionStage for SpeedController {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> StageKind {
        StageKind::SpeedController
    }

    fn validate(&self) -> StageResult<()> {
        check_efficiency(self.efficiency, "speed controller efficiency must be in (0,1]")
    }

    fn evaluate(&self, inlet: &FlowState, env: &StageEnv<'_>) -> StageResult<StageOutput> {
        if !env.throttle.is_finite() || !(0.0..=1.0).contains(&env.throttle) {
            return Err(StageError::InvalidArg {
                what: "throttle must be in [0,1]",
            });
        }
        let v_out = env.throttle * inlet.voltage().value;
        let state = inlet.clone().with_voltage(volts(v_out));
        let side = SideOutputs {
            efficiency: self.efficiency,
            ..SideOutputs::default()
        };
        Ok(StageOutput::new(state, side))
    }
}
