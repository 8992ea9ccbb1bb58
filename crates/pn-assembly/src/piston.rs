//! Internal-combustion propeller: piston engine driving a propeller directly.

use crate::builder::{VariantSlots, require};
use crate::conditions::OperatingConditions;
use crate::error::{AssemblyResult, InAssembly};
use crate::gas_turbine::step;
use crate::result::{EnergyDraw, PerformanceCore, Trace};
use crate::unknowns::{Residual, Unknown};
use crate::variant::{Evaluation, PropulsorVariant, check_stage};
use nalgebra::Vector3;
use pn_core::units::rpm_to_rad_per_s;
use pn_flow::FlowState;
use pn_stages::error::InStage;
use pn_stages::{DriveCommand, InternalCombustionEngine, Rotor};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const ENGINE_RPM: &str = "engine_rpm";
pub const ENGINE_TORQUE_BALANCE: &str = "engine_torque_balance";

#[derive(Clone, Debug, Serialize)]
pub struct InternalCombustionPropeller {
    pub engine: InternalCombustionEngine,
    pub propeller: Rotor,
}

impl InternalCombustionPropeller {
    pub(crate) fn validate(&self, tag: &str) -> AssemblyResult<()> {
        check_stage(tag, &self.engine)?;
        check_stage(tag, &self.propeller)
    }

    pub(crate) fn unknowns(&self) -> Vec<Unknown> {
        vec![Unknown {
            name: ENGINE_RPM,
            initial_guess: self.engine.rated_rpm,
        }]
    }

    pub(crate) fn evaluate(
        &self,
        tag: &str,
        axis: &Vector3<f64>,
        cond: &OperatingConditions,
        trial: &[f64],
    ) -> AssemblyResult<Evaluation> {
        let rpm = trial[0];
        let omega = rpm_to_rad_per_s(rpm);
        let fs = &cond.freestream;
        let env = cond
            .stage_env()
            .with_drive(DriveCommand::AngularVelocity(omega));
        let mut trace = Trace::default();

        let start = FlowState::from_freestream(fs)
            .in_stage("freestream")
            .in_assembly(tag)?;
        let engine = step(tag, &mut trace, &self.engine, &start, &env)?;
        let prop = step(tag, &mut trace, &self.propeller, &engine.state, &env)?;

        let engine_torque = engine.state.torque().value;
        let prop_torque = prop.state.torque().value;

        let mut outputs = BTreeMap::new();
        outputs.insert("engine_rpm".to_string(), rpm);
        outputs.insert("rotor_angular_velocity_rad_s".to_string(), omega);
        outputs.insert("engine_torque_nm".to_string(), engine_torque);
        outputs.insert("rotor_torque_nm".to_string(), prop_torque);
        outputs.insert("engine_power_w".to_string(), engine.side.shaft_power_w);
        outputs.insert("propulsive_efficiency".to_string(), prop.side.efficiency);

        let core = PerformanceCore {
            thrust: axis * prop.side.thrust_n,
            power_w: prop.side.shaft_power_w,
            draw: EnergyDraw::fuel(engine.side.fuel_rate_kgps),
            trace: trace.into_records(),
            outputs,
        };
        Ok(Evaluation {
            core,
            residuals: vec![Residual {
                name: ENGINE_TORQUE_BALANCE,
                value: engine_torque - prop_torque,
            }],
        })
    }
}

/// Stage slots for an internal-combustion propeller under construction.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InternalCombustionPropellerSlots {
    pub engine: Option<InternalCombustionEngine>,
    pub propeller: Option<Rotor>,
}

impl VariantSlots for InternalCombustionPropellerSlots {
    fn finish(self, tag: &str) -> AssemblyResult<PropulsorVariant> {
        Ok(PropulsorVariant::InternalCombustionPropeller(
            InternalCombustionPropeller {
                engine: require(self.engine, tag, "engine")?,
                propeller: require(self.propeller, tag, "propeller")?,
            },
        ))
    }
}
