//! Rotor (propeller / lift rotor) stage.
//!
//! Rotor aerodynamics are delegated to a model implementing
//! [`RotorAerodynamics`]. A coefficient model is built in; blade-element or
//! vortex models live outside this crate and plug in through
//! [`ExternalRotorModel`].

use crate::common::{check_finite, check_positive};
use crate::error::{StageError, StageResult};
use crate::traits::{ConversionStage, DriveCommand, SideOutputs, StageEnv, StageKind, StageOutput};
use pn_core::units::{newton_meters, rad_per_s};
use pn_flow::{FlowState, Freestream};
use serde::{Deserialize, Serialize, Serializer};
use std::f64::consts::PI;
use std::fmt;
use std::sync::Arc;

/// Geometry shared by every rotor model.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RotorGeometry {
    pub tip_radius_m: f64,
    pub blade_count: u32,
}

impl RotorGeometry {
    pub fn diameter(&self) -> f64 {
        2.0 * self.tip_radius_m
    }

    pub fn disc_area(&self) -> f64 {
        PI * self.tip_radius_m * self.tip_radius_m
    }
}

/// Aerodynamic performance at one operating point.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RotorPerformance {
    pub thrust_n: f64,
    pub torque_nm: f64,
    pub power_w: f64,
    pub thrust_coefficient: f64,
    pub power_coefficient: f64,
    pub advance_ratio: f64,
}

/// Rotor aerodynamic model.
pub trait RotorAerodynamics: Send + Sync + fmt::Debug {
    /// Performance at rotor speed `omega` (rad/s) and pitch command (rad).
    fn performance(
        &self,
        geometry: &RotorGeometry,
        omega: f64,
        pitch_command: f64,
        freestream: &Freestream,
    ) -> StageResult<RotorPerformance>;
}

/// Thrust and power coefficients quadratic in advance ratio `J = V/(n·D)`.
///
/// ```text
/// Ct = (ct[0] + ct[1]·J + ct[2]·J²) · (1 + k_θ·θ)
/// Cp = (cp[0] + cp[1]·J + cp[2]·J²) · (1 + k_θ·θ)
/// T  = Ct·ρ·n²·D⁴,  P = Cp·ρ·n³·D⁵,  Q = P/ω
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CoefficientRotorModel {
    pub ct: [f64; 3],
    pub cp: [f64; 3],
    #[serde(default)]
    pub pitch_sensitivity: f64,
}

impl RotorAerodynamics for CoefficientRotorModel {
    fn performance(
        &self,
        geometry: &RotorGeometry,
        omega: f64,
        pitch_command: f64,
        freestream: &Freestream,
    ) -> StageResult<RotorPerformance> {
        let n = omega / (2.0 * PI);
        let d = geometry.diameter();
        let rho = freestream.density_kg_m3;
        let j = freestream.velocity_mps / (n * d);
        let pitch = 1.0 + self.pitch_sensitivity * pitch_command;

        let ct = (self.ct[0] + self.ct[1] * j + self.ct[2] * j * j) * pitch;
        let cp = (self.cp[0] + self.cp[1] * j + self.cp[2] * j * j) * pitch;
        let thrust = ct * rho * n * n * d.powi(4);
        let power = cp * rho * n.powi(3) * d.powi(5);

        Ok(RotorPerformance {
            thrust_n: thrust,
            torque_nm: power / omega,
            power_w: power,
            thrust_coefficient: ct,
            power_coefficient: cp,
            advance_ratio: j,
        })
    }
}

/// A rotor model supplied by the caller, identified by `id`.
///
/// Only the id takes part in serialization, so two rotors sharing a model id
/// are treated as structurally identical.
#[derive(Clone)]
pub struct ExternalRotorModel {
    pub id: String,
    pub model: Arc<dyn RotorAerodynamics>,
}

impl ExternalRotorModel {
    pub fn new(id: impl Into<String>, model: Arc<dyn RotorAerodynamics>) -> Self {
        Self {
            id: id.into(),
            model,
        }
    }
}

impl fmt::Debug for ExternalRotorModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExternalRotorModel")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

impl Serialize for ExternalRotorModel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.id)
    }
}

/// Aerodynamic model selection for a rotor.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotorAero {
    Coefficients(CoefficientRotorModel),
    #[serde(skip_deserializing)]
    External(ExternalRotorModel),
}

impl RotorAero {
    fn model(&self) -> &dyn RotorAerodynamics {
        match self {
            RotorAero::Coefficients(m) => m,
            RotorAero::External(m) => m.model.as_ref(),
        }
    }

    fn label(&self) -> &str {
        match self {
            RotorAero::Coefficients(_) => "coefficients",
            RotorAero::External(m) => &m.id,
        }
    }
}

/// Rotor stage: maps shaft speed to thrust and absorbed torque.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Rotor {
    pub name: String,
    pub geometry: RotorGeometry,
    pub aero: RotorAero,
}

impl Rotor {
    pub fn new(name: impl Into<String>, geometry: RotorGeometry, aero: RotorAero) -> StageResult<Self> {
        let stage = Self {
            name: name.into(),
            geometry,
            aero,
        };
        stage.validate()?;
        Ok(stage)
    }

    /// Aerodynamic performance at rotor speed `omega`.
    pub fn performance(
        &self,
        omega: f64,
        pitch_command: f64,
        freestream: &Freestream,
    ) -> StageResult<RotorPerformance> {
        if !omega.is_finite() || omega <= 0.0 {
            return Err(StageError::invalid_state(
                &self.name,
                "rotor speed must be positive",
            ));
        }
        let perf = self
            .aero
            .model()
            .performance(&self.geometry, omega, pitch_command, freestream)
            .map_err(|e| match e {
                StageError::InvalidThermodynamicState { .. } => e,
                other => StageError::RotorModel {
                    model: self.aero.label().to_string(),
                    message: other.to_string(),
                },
            })?;
        check_finite(perf.thrust_n, &self.name, "rotor thrust")?;
        check_finite(perf.torque_nm, &self.name, "rotor torque")?;
        Ok(perf)
    }

    /// Momentum-theory induced velocity for a given thrust.
    pub fn induced_velocity(&self, thrust: f64, freestream: &Freestream) -> f64 {
        if thrust <= 0.0 {
            return 0.0;
        }
        let v = freestream.velocity_mps;
        let area = self.geometry.disc_area();
        -0.5 * v + ((0.5 * v).powi(2) + thrust / (2.0 * freestream.density_kg_m3 * area)).sqrt()
    }
}

impl ConversionStage for Rotor {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> StageKind {
        StageKind::Rotor
    }

    fn validate(&self) -> StageResult<()> {
        check_positive(self.geometry.tip_radius_m, "rotor tip radius must be positive")?;
        if self.geometry.blade_count == 0 {
            return Err(StageError::InvalidArg {
                what: "rotor needs at least one blade",
            });
        }
        Ok(())
    }

    fn evaluate(&self, inlet: &FlowState, env: &StageEnv<'_>) -> StageResult<StageOutput> {
        let omega = match env.drive {
            Some(DriveCommand::AngularVelocity(omega)) => omega,
            _ => inlet.angular_velocity().value,
        };
        let perf = self.performance(omega, env.pitch_command, env.freestream)?;

        let state = inlet
            .clone()
            .with_angular_velocity(rad_per_s(omega))
            .with_torque(newton_meters(perf.torque_nm));

        let useful = perf.thrust_n * env.freestream.velocity_mps;
        let side = SideOutputs {
            thrust_n: perf.thrust_n,
            shaft_power_w: perf.power_w,
            induced_velocity_mps: self.induced_velocity(perf.thrust_n, env.freestream),
            efficiency: if perf.power_w > 0.0 {
                useful / perf.power_w
            } else {
                0.0
            },
            ..SideOutputs::default()
        };
        Ok(StageOutput::new(state, side))
    }
}
