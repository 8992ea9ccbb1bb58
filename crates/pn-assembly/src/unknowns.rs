//! Contract between shaft-coupled assemblies and an outer nonlinear solver.

use crate::conditions::OperatingConditions;
use crate::error::AssemblyResult;
use crate::result::PerformanceResult;

/// An implicit quantity the outer solver iterates on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Unknown {
    pub name: &'static str,
    pub initial_guess: f64,
}

/// Mismatch that vanishes at a converged solution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Residual {
    pub name: &'static str,
    pub value: f64,
}

/// Ordered unknowns in, ordered residuals out.
///
/// The number of residuals always equals the number of declared unknowns.
/// Call order per solver iteration: `apply_trial`, `evaluate`, `residuals`.
pub trait UnknownsResiduals {
    fn declare_unknowns(&self) -> Vec<Unknown>;

    fn apply_trial(&mut self, values: &[f64]) -> AssemblyResult<()>;

    fn evaluate(&mut self, conditions: &OperatingConditions) -> AssemblyResult<PerformanceResult>;

    fn residuals(&mut self) -> AssemblyResult<Vec<Residual>>;

    fn unknown_count(&self) -> usize {
        self.declare_unknowns().len()
    }
}
