//! Performance results produced by an assembly evaluation.

use nalgebra::Vector3;
use pn_core::units::{Force, Power, newtons, watts};
use pn_flow::FlowState;
use pn_stages::{SideOutputs, StageKind, StageOutput};
use std::collections::BTreeMap;
use std::sync::Arc;

/// One entry of the per-stage trace.
#[derive(Debug, Clone, PartialEq)]
pub struct StageRecord {
    pub stage: String,
    pub kind: StageKind,
    pub state: FlowState,
    pub side: SideOutputs,
}

/// Energy drawn from the owning distributor.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EnergyDraw {
    pub electrical_power_w: f64,
    pub current_a: f64,
    pub fuel_rate_kgps: f64,
}

impl EnergyDraw {
    pub fn electrical(power_w: f64, current_a: f64) -> Self {
        Self {
            electrical_power_w: power_w,
            current_a,
            fuel_rate_kgps: 0.0,
        }
    }

    pub fn fuel(rate_kgps: f64) -> Self {
        Self {
            fuel_rate_kgps: rate_kgps,
            ..Self::default()
        }
    }
}

/// Position-independent part of a result.
///
/// This is what identical propulsors share through the result cache.
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceCore {
    pub thrust: Vector3<f64>,
    /// Shaft power for rotor variants, propulsive power (`F·V0`) for gas
    /// turbines (W).
    pub power_w: f64,
    pub draw: EnergyDraw,
    pub trace: Vec<StageRecord>,
    /// Named values for downstream analyses.
    pub outputs: BTreeMap<String, f64>,
}

impl PerformanceCore {
    pub fn thrust_magnitude(&self) -> Force {
        newtons(self.thrust.norm())
    }

    pub fn power(&self) -> Power {
        watts(self.power_w)
    }

    pub fn output(&self, name: &str) -> Option<f64> {
        self.outputs.get(name).copied()
    }
}

/// Moment of `thrust` applied at `origin` about `center_of_gravity`.
pub fn thrust_moment(
    origin: &Vector3<f64>,
    center_of_gravity: &Vector3<f64>,
    thrust: &Vector3<f64>,
) -> Vector3<f64> {
    (origin - center_of_gravity).cross(thrust)
}

/// Result of one assembly at one control point.
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceResult {
    pub core: Arc<PerformanceCore>,
    /// Moment about the vehicle center of gravity (N·m).
    pub moment: Vector3<f64>,
}

impl PerformanceResult {
    /// Attach the moment for an assembly at `origin`.
    pub fn place(
        core: Arc<PerformanceCore>,
        origin: &Vector3<f64>,
        center_of_gravity: &Vector3<f64>,
    ) -> Self {
        let moment = thrust_moment(origin, center_of_gravity, &core.thrust);
        Self { core, moment }
    }

    pub fn thrust(&self) -> &Vector3<f64> {
        &self.core.thrust
    }

    pub fn power_w(&self) -> f64 {
        self.core.power_w
    }

    /// True when both results are backed by the same cached core.
    pub fn shares_core_with(&self, other: &PerformanceResult) -> bool {
        Arc::ptr_eq(&self.core, &other.core)
    }
}

/// Accumulates the stage trace while an assembly threads its flow state.
#[derive(Debug, Default)]
pub(crate) struct Trace {
    records: Vec<StageRecord>,
}

impl Trace {
    pub(crate) fn push(&mut self, stage: &dyn pn_stages::ConversionStage, out: &StageOutput) {
        self.records.push(StageRecord {
            stage: stage.name().to_string(),
            kind: stage.kind(),
            state: out.state.clone(),
            side: out.side,
        });
    }

    pub(crate) fn into_records(self) -> Vec<StageRecord> {
        self.records
    }
}
