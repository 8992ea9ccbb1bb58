//! PropulsorAssembly: a placed variant plus its per-segment evaluation state.

use crate::builder::{AssemblyBuilder, Placement};
use crate::conditions::OperatingConditions;
use crate::electric::ElectricRotorSlots;
use crate::error::{AssemblyError, AssemblyResult};
use crate::gas_turbine::{TurbofanSlots, TurbojetSlots};
use crate::phase::EvaluationPhase;
use crate::piston::InternalCombustionPropellerSlots;
use crate::result::{PerformanceCore, PerformanceResult};
use crate::unknowns::{Residual, Unknown, UnknownsResiduals};
use crate::variant::PropulsorVariant;
use nalgebra::Vector3;
use std::sync::Arc;
use tracing::{debug, trace};

#[derive(Debug, Clone)]
struct Pending {
    control_point: usize,
    result: PerformanceResult,
    residuals: Vec<Residual>,
}

/// A propulsor on the vehicle.
///
/// Design data is fixed at construction. The only mutable parts are the
/// trial values, the evaluation phase and the per-control-point results of
/// the current mission segment.
#[derive(Debug, Clone)]
pub struct PropulsorAssembly {
    tag: String,
    placement: Placement,
    variant: PropulsorVariant,
    phase: EvaluationPhase,
    trial: Vec<f64>,
    pending: Option<Pending>,
    results: Vec<Option<PerformanceResult>>,
}

impl PropulsorAssembly {
    pub fn new(
        tag: impl Into<String>,
        placement: Placement,
        variant: PropulsorVariant,
    ) -> AssemblyResult<Self> {
        let tag = tag.into();
        if tag.trim().is_empty() {
            return Err(AssemblyError::InvalidArg {
                what: "assembly tag cannot be empty",
            });
        }
        let axis = placement.thrust_axis;
        let norm = axis.norm();
        if !norm.is_finite() || norm <= 0.0 {
            return Err(AssemblyError::configuration(
                &tag,
                "thrust axis must be a finite non-zero vector",
            ));
        }
        if !placement.origin.iter().all(|c| c.is_finite()) {
            return Err(AssemblyError::configuration(&tag, "origin must be finite"));
        }
        variant.validate(&tag)?;

        let trial = variant.unknowns().iter().map(|u| u.initial_guess).collect();
        Ok(Self {
            tag,
            placement: Placement {
                thrust_axis: axis / norm,
                ..placement
            },
            variant,
            phase: EvaluationPhase::Idle,
            trial,
            pending: None,
            results: Vec::new(),
        })
    }

    pub fn turbofan(tag: impl Into<String>) -> AssemblyBuilder<TurbofanSlots> {
        AssemblyBuilder::with_slots(tag, TurbofanSlots::default())
    }

    pub fn turbojet(tag: impl Into<String>) -> AssemblyBuilder<TurbojetSlots> {
        AssemblyBuilder::with_slots(tag, TurbojetSlots::default())
    }

    pub fn electric_rotor(tag: impl Into<String>) -> AssemblyBuilder<ElectricRotorSlots> {
        AssemblyBuilder::with_slots(tag, ElectricRotorSlots::default())
    }

    pub fn internal_combustion_propeller(
        tag: impl Into<String>,
    ) -> AssemblyBuilder<InternalCombustionPropellerSlots> {
        AssemblyBuilder::with_slots(tag, InternalCombustionPropellerSlots::default())
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn origin(&self) -> &Vector3<f64> {
        &self.placement.origin
    }

    /// Unit thrust direction.
    pub fn thrust_axis(&self) -> &Vector3<f64> {
        &self.placement.thrust_axis
    }

    pub fn is_identical(&self) -> bool {
        self.placement.identical
    }

    pub fn is_active(&self) -> bool {
        self.placement.active
    }

    pub fn variant(&self) -> &PropulsorVariant {
        &self.variant
    }

    pub fn phase(&self) -> EvaluationPhase {
        self.phase
    }

    pub fn is_coupled(&self) -> bool {
        self.variant.is_coupled()
    }

    pub fn current_trial(&self) -> &[f64] {
        &self.trial
    }

    /// Results of the current segment, one slot per control point.
    pub fn results(&self) -> &[Option<PerformanceResult>] {
        &self.results
    }

    pub fn result_at(&self, control_point: usize) -> Option<&PerformanceResult> {
        self.results.get(control_point).and_then(Option::as_ref)
    }

    /// Start a mission segment with `control_points` points.
    ///
    /// Allocates result storage and resets trial values to the initial
    /// guesses.
    pub fn append_conditions(&mut self, control_points: usize) {
        self.results = vec![None; control_points];
        self.trial = self
            .variant
            .unknowns()
            .iter()
            .map(|u| u.initial_guess)
            .collect();
        self.pending = None;
        self.phase = EvaluationPhase::ConditionsAppended;
        trace!(assembly = %self.tag, control_points, "conditions appended");
    }

    fn violation(&self, action: &'static str) -> AssemblyError {
        AssemblyError::PhaseViolation {
            assembly: self.tag.clone(),
            action,
            phase: self.phase,
        }
    }

    fn check_point(&self, control_point: usize) -> AssemblyResult<()> {
        if control_point >= self.results.len() {
            return Err(AssemblyError::InvalidArg {
                what: "control point outside the appended segment",
            });
        }
        Ok(())
    }

    /// Accept the converged trial and store its result.
    pub fn finish_point(&mut self) -> AssemblyResult<PerformanceResult> {
        if !self.phase.can_finish() {
            return Err(self.violation("finish a control point"));
        }
        let pending = self
            .pending
            .take()
            .ok_or_else(|| self.violation("finish a control point"))?;
        self.results[pending.control_point] = Some(pending.result.clone());
        self.phase = EvaluationPhase::Done;
        Ok(pending.result)
    }

    /// Take over a result computed by an identical canonical assembly.
    ///
    /// Only the moment is recomputed, about this assembly's own origin.
    pub fn adopt(
        &mut self,
        core: Arc<PerformanceCore>,
        conditions: &OperatingConditions,
    ) -> AssemblyResult<PerformanceResult> {
        if !self.phase.can_adopt() {
            return Err(self.violation("adopt a cached result"));
        }
        self.check_point(conditions.control_point)?;
        let result = PerformanceResult::place(
            core,
            &self.placement.origin,
            &conditions.center_of_gravity,
        );
        self.results[conditions.control_point] = Some(result.clone());
        self.phase = EvaluationPhase::Done;
        Ok(result)
    }
}

impl UnknownsResiduals for PropulsorAssembly {
    fn declare_unknowns(&self) -> Vec<Unknown> {
        self.variant.unknowns()
    }

    fn apply_trial(&mut self, values: &[f64]) -> AssemblyResult<()> {
        if !self.phase.can_apply_trial() {
            return Err(self.violation("apply trial values"));
        }
        if values.len() != self.trial.len() {
            return Err(AssemblyError::TrialLength {
                assembly: self.tag.clone(),
                expected: self.trial.len(),
                found: values.len(),
            });
        }
        if !values.iter().all(|v| v.is_finite()) {
            return Err(AssemblyError::InvalidArg {
                what: "trial values must be finite",
            });
        }
        if !self.is_coupled() {
            return Ok(());
        }
        self.trial.copy_from_slice(values);
        self.pending = None;
        self.phase = EvaluationPhase::UnknownsApplied;
        Ok(())
    }

    fn evaluate(&mut self, conditions: &OperatingConditions) -> AssemblyResult<PerformanceResult> {
        let coupled = self.is_coupled();
        if !self.phase.can_evaluate(coupled) {
            return Err(self.violation("evaluate stages"));
        }
        conditions.check()?;
        self.check_point(conditions.control_point)?;

        let evaluation = self.variant.evaluate(
            &self.tag,
            &self.placement.thrust_axis,
            conditions,
            &self.trial,
        )?;
        let result = PerformanceResult::place(
            Arc::new(evaluation.core),
            &self.placement.origin,
            &conditions.center_of_gravity,
        );
        debug!(
            assembly = %self.tag,
            control_point = conditions.control_point,
            thrust_n = result.core.thrust_magnitude().value,
            power_w = result.core.power_w,
            "stages evaluated"
        );

        if coupled {
            self.pending = Some(Pending {
                control_point: conditions.control_point,
                result: result.clone(),
                residuals: evaluation.residuals,
            });
            self.phase = EvaluationPhase::StagesEvaluated;
        } else {
            self.results[conditions.control_point] = Some(result.clone());
            self.phase = EvaluationPhase::Done;
        }
        Ok(result)
    }

    fn residuals(&mut self) -> AssemblyResult<Vec<Residual>> {
        if !self.is_coupled() && self.phase == EvaluationPhase::Done {
            return Ok(Vec::new());
        }
        if !self.phase.can_compute_residuals() {
            return Err(self.violation("compute residuals"));
        }
        let residuals = self
            .pending
            .as_ref()
            .map(|p| p.residuals.clone())
            .ok_or_else(|| self.violation("compute residuals"))?;
        self.phase = EvaluationPhase::ResidualsComputed;
        Ok(residuals)
    }
}
