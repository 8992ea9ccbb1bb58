//! Reciprocating internal-combustion engine.

use crate::common::{check_finite, check_positive};
use crate::error::{StageError, StageResult};
use crate::traits::{ConversionStage, DriveCommand, SideOutputs, StageEnv, StageKind, StageOutput};
use pn_core::units::constants::RHO_REF_KG_M3;
use pn_core::units::{newton_meters, rad_per_s, rpm_to_rad_per_s};
use pn_flow::{FlowState, Freestream};
use serde::{Deserialize, Serialize};

/// Piston engine with Gagg-Ferrar altitude lapse.
///
/// ```text
/// σ = ρ / ρ_SL
/// P = P_rated · max(0, 1.132·σ − 0.132) · throttle
/// Q = P / ω,   ṁ_fuel = PSFC · P
/// ```
///
/// Power is taken as flat with speed up to the rated rpm; the caller drives
/// the engine at the shaft speed it is trying.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InternalCombustionEngine {
    pub name: String,
    /// Sea-level rated shaft power (W)
    pub rated_power_w: f64,
    pub rated_rpm: f64,
    /// Power-specific fuel consumption (kg/J)
    pub psfc: f64,
}

impl InternalCombustionEngine {
    pub fn new(
        name: impl Into<String>,
        rated_power_w: f64,
        rated_rpm: f64,
        psfc: f64,
    ) -> StageResult<Self> {
        let stage = Self {
            name: name.into(),
            rated_power_w,
            rated_rpm,
            psfc,
        };
        stage.validate()?;
        Ok(stage)
    }

    pub fn rated_angular_velocity(&self) -> f64 {
        rpm_to_rad_per_s(self.rated_rpm)
    }

    /// Available shaft power at the freestream density and throttle.
    pub fn available_power(&self, freestream: &Freestream, throttle: f64) -> f64 {
        let sigma = freestream.density_kg_m3 / RHO_REF_KG_M3;
        self.rated_power_w * (1.132 * sigma - 0.132).max(0.0) * throttle
    }

    /// Shaft torque at rotor speed `omega`.
    pub fn torque_at(&self, omega: f64, freestream: &Freestream, throttle: f64) -> StageResult<f64> {
        if !omega.is_finite() || omega <= 0.0 {
            return Err(StageError::invalid_state(
                &self.name,
                "engine speed must be positive",
            ));
        }
        check_finite(
            self.available_power(freestream, throttle) / omega,
            &self.name,
            "engine torque",
        )
    }
}

impl ConversionStage for InternalCombustionEngine {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> StageKind {
        StageKind::Engine
    }

    fn validate(&self) -> StageResult<()> {
        check_positive(self.rated_power_w, "engine rated power must be positive")?;
        check_positive(self.rated_rpm, "engine rated rpm must be positive")?;
        check_positive(self.psfc, "engine PSFC must be positive")
    }

    fn evaluate(&self, inlet: &FlowState, env: &StageEnv<'_>) -> StageResult<StageOutput> {
        if !env.throttle.is_finite() || !(0.0..=1.0).contains(&env.throttle) {
            return Err(StageError::InvalidArg {
                what: "throttle must be in [0,1]",
            });
        }
        let omega = match env.drive {
            Some(DriveCommand::AngularVelocity(omega)) => omega,
            _ => self.rated_angular_velocity(),
        };
        let torque = self.torque_at(omega, env.freestream, env.throttle)?;
        let power = torque * omega;

        let state = inlet
            .clone()
            .with_angular_velocity(rad_per_s(omega))
            .with_torque(newton_meters(torque));
        let side = SideOutputs {
            shaft_power_w: power,
            fuel_rate_kgps: self.psfc * power,
            ..SideOutputs::default()
        };
        Ok(StageOutput::new(state, side))
    }
}
