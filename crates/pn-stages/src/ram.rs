//! Ram stage: freestream to stagnation conditions.

use crate::error::{InStage, StageResult};
use crate::traits::{ConversionStage, SideOutputs, StageEnv, StageKind, StageOutput};
use pn_flow::FlowState;
use serde::{Deserialize, Serialize};

/// Decelerates the freestream to stagnation conditions ahead of the inlet.
///
/// Reads the freestream from the environment; the inlet state only carries
/// electrical quantities through.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ram {
    pub name: String,
}

impl Ram {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl ConversionStage for Ram {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> StageKind {
        StageKind::Ram
    }

    fn evaluate(&self, inlet: &FlowState, env: &StageEnv<'_>) -> StageResult<StageOutput> {
        let state = FlowState::from_freestream(env.freestream)
            .in_stage(&self.name)?
            .with_electrical_from(inlet);

        let side = SideOutputs {
            exit_velocity_mps: env.freestream.velocity_mps,
            exit_density_kg_m3: env.freestream.density_kg_m3,
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
    fn ram_raises_stagnation_temperature() {
        let fs = Freestream::sea_level(0.8).unwrap();
        let inlet = FlowState::from_freestream(&Freestream::sea_level(0.0).unwrap()).unwrap();
        let out = Ram::new("ram")
            .evaluate(&inlet, &StageEnv::new(&fs))
            .unwrap();

        let expected = 288.15 * (1.0 + 0.2 * 0.64);
        assert!((out.state.total_temperature().value - expected).abs() < 1e-9);
        assert_eq!(out.side.exit_velocity_mps, fs.velocity_mps);
    }
}
