//! Electric rotor: speed controller → motor → rotor on a shared shaft.

use crate::builder::{VariantSlots, require};
use crate::conditions::OperatingConditions;
use crate::error::{AssemblyError, AssemblyResult, InAssembly};
use crate::gas_turbine::step;
use crate::result::{EnergyDraw, PerformanceCore, Trace};
use crate::unknowns::{Residual, Unknown};
use crate::variant::{Evaluation, PropulsorVariant, check_stage};
use nalgebra::Vector3;
use pn_core::units::{rad_per_s_to_rpm, volts};
use pn_flow::FlowState;
use pn_stages::error::InStage;
use pn_stages::{DriveCommand, Motor, Rotor, RotorAero, SpeedController};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

pub const ROTOR_POWER_COEFFICIENT: &str = "rotor_power_coefficient";
pub const SHAFT_TORQUE_BALANCE: &str = "shaft_torque_balance";

/// Starting guess when the rotor model has no coefficient table.
const FALLBACK_POWER_COEFFICIENT: f64 = 0.05;

/// Battery-driven rotor.
///
/// The solver iterates on the rotor power coefficient. Each trial fixes the
/// shaft speed at which the motor balances that coefficient; motor and rotor
/// are then evaluated independently at that speed and the torque mismatch is
/// the residual.
#[derive(Clone, Debug, Serialize)]
pub struct ElectricRotor {
    pub esc: SpeedController,
    pub motor: Motor,
    pub rotor: Rotor,
    pub initial_power_coefficient: f64,
}

impl ElectricRotor {
    pub(crate) fn validate(&self, tag: &str) -> AssemblyResult<()> {
        check_stage(tag, &self.esc)?;
        check_stage(tag, &self.motor)?;
        check_stage(tag, &self.rotor)?;
        if !self.initial_power_coefficient.is_finite() || self.initial_power_coefficient <= 0.0 {
            return Err(AssemblyError::configuration(
                tag,
                "initial power coefficient must be positive",
            ));
        }
        Ok(())
    }

    pub(crate) fn unknowns(&self) -> Vec<Unknown> {
        vec![Unknown {
            name: ROTOR_POWER_COEFFICIENT,
            initial_guess: self.initial_power_coefficient,
        }]
    }

    pub(crate) fn evaluate(
        &self,
        tag: &str,
        axis: &Vector3<f64>,
        cond: &OperatingConditions,
        trial: &[f64],
    ) -> AssemblyResult<Evaluation> {
        let bus_voltage = cond.bus_voltage.ok_or_else(|| AssemblyError::MissingCondition {
            assembly: tag.to_string(),
            what: "bus voltage",
        })?;
        let cp = trial[0];
        let fs = &cond.freestream;
        let env = cond.stage_env();
        let mut trace = Trace::default();

        let bus = FlowState::from_freestream(fs)
            .in_stage("freestream")
            .in_assembly(tag)?
            .with_voltage(volts(bus_voltage));
        let esc = step(tag, &mut trace, &self.esc, &bus, &env)?;
        let motor_voltage = esc.state.voltage().value;

        if self.motor.stalls_at(motor_voltage) {
            debug!(assembly = tag, motor_voltage, "motor stalled, shaft at rest");
            return Ok(self.stalled(motor_voltage, trace));
        }

        let omega = self
            .motor
            .omega_for_power_coefficient(
                motor_voltage,
                cp,
                fs.density_kg_m3,
                self.rotor.geometry.diameter(),
            )
            .in_assembly(tag)?;
        let drive = env.with_drive(DriveCommand::AngularVelocity(omega));

        let motor = step(tag, &mut trace, &self.motor, &esc.state, &drive)?;
        let rotor = step(tag, &mut trace, &self.rotor, &motor.state, &drive)?;

        let motor_torque = motor.state.torque().value;
        let rotor_torque = rotor.state.torque().value;
        let motor_current = motor.state.current().value;
        let bus_current = self.esc.current_in(motor_current, cond.throttle);

        let mut outputs = BTreeMap::new();
        outputs.insert("rotor_angular_velocity_rad_s".to_string(), omega);
        outputs.insert("rotor_rpm".to_string(), rad_per_s_to_rpm(omega));
        outputs.insert("motor_torque_nm".to_string(), motor_torque);
        outputs.insert("rotor_torque_nm".to_string(), rotor_torque);
        outputs.insert("motor_current_a".to_string(), motor_current);
        outputs.insert("motor_voltage_v".to_string(), motor_voltage);
        outputs.insert(
            "induced_velocity_mps".to_string(),
            rotor.side.induced_velocity_mps,
        );
        outputs.insert("propulsive_efficiency".to_string(), rotor.side.efficiency);

        let core = PerformanceCore {
            thrust: axis * rotor.side.thrust_n,
            power_w: rotor.side.shaft_power_w,
            draw: EnergyDraw::electrical(bus_voltage * bus_current, bus_current),
            trace: trace.into_records(),
            outputs,
        };
        Ok(Evaluation {
            core,
            residuals: vec![Residual {
                name: SHAFT_TORQUE_BALANCE,
                value: motor_torque - rotor_torque,
            }],
        })
    }

    /// Shaft at rest: no torque, thrust, or current. The torque balance is
    /// met for any trial coefficient.
    fn stalled(&self, motor_voltage: f64, trace: Trace) -> Evaluation {
        let mut outputs = BTreeMap::new();
        for key in [
            "rotor_angular_velocity_rad_s",
            "rotor_rpm",
            "motor_torque_nm",
            "rotor_torque_nm",
            "motor_current_a",
            "induced_velocity_mps",
            "propulsive_efficiency",
        ] {
            outputs.insert(key.to_string(), 0.0);
        }
        outputs.insert("motor_voltage_v".to_string(), motor_voltage);

        Evaluation {
            core: PerformanceCore {
                thrust: Vector3::zeros(),
                power_w: 0.0,
                draw: EnergyDraw::electrical(0.0, 0.0),
                trace: trace.into_records(),
                outputs,
            },
            residuals: vec![Residual {
                name: SHAFT_TORQUE_BALANCE,
                value: 0.0,
            }],
        }
    }
}

/// Stage slots for an electric rotor under construction.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ElectricRotorSlots {
    pub esc: Option<SpeedController>,
    pub motor: Option<Motor>,
    pub rotor: Option<Rotor>,
    pub initial_power_coefficient: Option<f64>,
}

impl VariantSlots for ElectricRotorSlots {
    fn finish(self, tag: &str) -> AssemblyResult<PropulsorVariant> {
        let rotor = require(self.rotor, tag, "rotor")?;
        let initial_power_coefficient = self.initial_power_coefficient.unwrap_or(
            match &rotor.aero {
                RotorAero::Coefficients(model) if model.cp[0] > 0.0 => model.cp[0],
                _ => FALLBACK_POWER_COEFFICIENT,
            },
        );
        Ok(PropulsorVariant::ElectricRotor(ElectricRotor {
            esc: require(self.esc, tag, "esc")?,
            motor: require(self.motor, tag, "motor")?,
            rotor,
            initial_power_coefficient,
        }))
    }
}
