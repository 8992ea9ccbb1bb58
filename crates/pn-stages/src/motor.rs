//! DC motor with optional gearbox.

use crate::common::{check_efficiency, check_finite, check_non_negative, check_positive};
use crate::error::{StageError, StageResult};
use crate::traits::{ConversionStage, DriveCommand, SideOutputs, StageEnv, StageKind, StageOutput};
use pn_core::units::{amps, newton_meters, rad_per_s, volts};
use pn_flow::FlowState;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Brushless DC motor with resistive and no-load-current losses.
///
/// ## Model
///
/// With motor speed `ω_m = G·ω` (G = gear ratio, ω = rotor-side speed):
///
/// ```text
/// V = I·R + ω_m / K_v
/// Q_m = (I − I₀) / K_v
/// Q   = G · η_g · Q_m        (rotor-side torque)
/// ```
///
/// `K_v` is in rad/s per volt. The motor is driven either by a rotor-side
/// angular velocity (current follows from the terminal voltage) or by a
/// rotor-side torque (current and required voltage follow from the torque).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Motor {
    pub name: String,
    /// Speed constant (rad/s per V)
    pub speed_constant: f64,
    /// Winding resistance (Ω)
    pub resistance: f64,
    /// No-load current (A)
    pub no_load_current: f64,
    /// Motor speed over rotor speed
    #[serde(default = "unit_ratio")]
    pub gear_ratio: f64,
    #[serde(default = "unit_ratio")]
    pub gearbox_efficiency: f64,
}

fn unit_ratio() -> f64 {
    1.0
}

/// Operating point of a motor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotorPoint {
    pub voltage: f64,
    pub current: f64,
    /// Rotor-side torque (N·m)
    pub torque: f64,
    /// Rotor-side angular velocity (rad/s)
    pub omega: f64,
}

impl MotorPoint {
    pub fn mechanical_power(&self) -> f64 {
        self.torque * self.omega
    }

    pub fn electrical_power(&self) -> f64 {
        self.voltage * self.current
    }
}

impl Motor {
    pub fn new(
        name: impl Into<String>,
        speed_constant: f64,
        resistance: f64,
        no_load_current: f64,
    ) -> StageResult<Self> {
        let stage = Self {
            name: name.into(),
            speed_constant,
            resistance,
            no_load_current,
            gear_ratio: 1.0,
            gearbox_efficiency: 1.0,
        };
        stage.validate()?;
        Ok(stage)
    }

    pub fn with_gearbox(self, gear_ratio: f64, gearbox_efficiency: f64) -> StageResult<Self> {
        let stage = Self {
            gear_ratio,
            gearbox_efficiency,
            ..self
        };
        stage.validate()?;
        Ok(stage)
    }

    /// Operating point at terminal voltage `voltage` and rotor-side speed `omega`.
    pub fn at_speed(&self, voltage: f64, omega: f64) -> MotorPoint {
        let omega_m = self.gear_ratio * omega;
        let current = (voltage - omega_m / self.speed_constant) / self.resistance;
        let motor_torque = (current - self.no_load_current) / self.speed_constant;
        MotorPoint {
            voltage,
            current,
            torque: self.gear_ratio * self.gearbox_efficiency * motor_torque,
            omega,
        }
    }

    /// Operating point delivering rotor-side `torque` at rotor-side speed `omega`.
    pub fn at_torque(&self, torque: f64, omega: f64) -> MotorPoint {
        let motor_torque = torque / (self.gear_ratio * self.gearbox_efficiency);
        let current = motor_torque * self.speed_constant + self.no_load_current;
        let voltage = current * self.resistance + self.gear_ratio * omega / self.speed_constant;
        MotorPoint {
            voltage,
            current,
            torque,
            omega,
        }
    }

    /// True when `voltage` cannot drive more than the no-load current, so the
    /// shaft stays at rest.
    pub fn stalls_at(&self, voltage: f64) -> bool {
        voltage / self.resistance <= self.no_load_current
    }

    /// Rotor-side speed at which this motor balances a rotor absorbing power
    /// coefficient `cp` (`P = Cp·ρ·n³·D⁵`).
    ///
    /// Solves `a·ω² + b·ω − c = 0` with
    /// `a = Cp·ρ·D⁵/(2π)³`, `b = G²·η_g/(K_v²·R)`, `c = G·η_g·(V/R − I₀)/K_v`.
    pub fn omega_for_power_coefficient(
        &self,
        voltage: f64,
        cp: f64,
        density: f64,
        diameter: f64,
    ) -> StageResult<f64> {
        let g = self.gear_ratio;
        let eta = self.gearbox_efficiency;
        let kv = self.speed_constant;
        let r = self.resistance;

        let a = cp * density * diameter.powi(5) / (2.0 * PI).powi(3);
        let b = g * g * eta / (kv * kv * r);
        let c = g * eta * (voltage / r - self.no_load_current) / kv;

        let omega = if a.abs() < 1e-12 {
            c / b
        } else {
            let disc = b * b + 4.0 * a * c;
            if disc < 0.0 {
                return Err(StageError::invalid_state(
                    &self.name,
                    "no shaft speed balances the trial power coefficient",
                ));
            }
            (-b + disc.sqrt()) / (2.0 * a)
        };

        let omega = check_finite(omega, &self.name, "shaft speed")?;
        if omega <= 0.0 {
            return Err(StageError::invalid_state(
                &self.name,
                "trial power coefficient implies non-positive shaft speed",
            ));
        }
        Ok(omega)
    }
}

impl ConversionStage for Motor {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> StageKind {
        StageKind::Motor
    }

    fn validate(&self) -> StageResult<()> {
        check_positive(self.speed_constant, "motor speed constant must be positive")?;
        check_positive(self.resistance, "motor resistance must be positive")?;
        check_non_negative(self.no_load_current, "no-load current cannot be negative")?;
        check_positive(self.gear_ratio, "gear ratio must be positive")?;
        check_efficiency(self.gearbox_efficiency, "gearbox efficiency must be in (0,1]")
    }

    fn evaluate(&self, inlet: &FlowState, env: &StageEnv<'_>) -> StageResult<StageOutput> {
        let drive = env
            .drive
            .unwrap_or(DriveCommand::AngularVelocity(inlet.angular_velocity().value));

        let point = match drive {
            DriveCommand::AngularVelocity(omega) => self.at_speed(inlet.voltage().value, omega),
            DriveCommand::Torque(torque) => {
                self.at_torque(torque, inlet.angular_velocity().value)
            }
        };

        check_finite(point.current, &self.name, "motor current")?;
        check_finite(point.torque, &self.name, "motor torque")?;
        check_finite(point.voltage, &self.name, "motor voltage")?;

        let state = inlet
            .clone()
            .with_voltage(volts(point.voltage))
            .with_current(amps(point.current))
            .with_angular_velocity(rad_per_s(point.omega))
            .with_torque(newton_meters(point.torque));

        let electrical = point.electrical_power();
        let mechanical = point.mechanical_power();
        let side = SideOutputs {
            shaft_power_w: mechanical,
            electrical_power_w: electrical,
            efficiency: if electrical > 0.0 {
                mechanical / electrical
            } else {
                0.0
            },
            ..SideOutputs::default()
        };
        Ok(StageOutput::new(state, side))
    }
}
