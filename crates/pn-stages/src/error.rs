//! Error types for stage evaluation.

use pn_core::PnError;
use pn_flow::FlowError;
use thiserror::Error;

/// Errors that can occur while evaluating a conversion stage.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StageError {
    /// A derived quantity is undefined for the given inlet (for example a
    /// negative radicand). Signals an upstream value outside its physical
    /// domain; never clamped.
    #[error("Invalid thermodynamic state in stage '{stage}': {what}")]
    InvalidThermodynamicState { stage: String, what: &'static str },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Stage '{stage}' is missing required input: {what}")]
    MissingInput { stage: String, what: &'static str },

    #[error("Rotor model '{model}' failed: {message}")]
    RotorModel { model: String, message: String },
}

pub type StageResult<T> = Result<T, StageError>;

impl StageError {
    pub fn invalid_state(stage: &str, what: &'static str) -> Self {
        StageError::InvalidThermodynamicState {
            stage: stage.to_string(),
            what,
        }
    }

    /// True for the error kind that an outer solver may answer by shrinking its step.
    pub fn is_invalid_state(&self) -> bool {
        matches!(
            self,
            StageError::InvalidThermodynamicState { .. } | StageError::RotorModel { .. }
        )
    }
}

/// Attach a stage name to lower-level numeric failures.
pub trait InStage<T> {
    fn in_stage(self, stage: &str) -> StageResult<T>;
}

impl<T> InStage<T> for Result<T, FlowError> {
    fn in_stage(self, stage: &str) -> StageResult<T> {
        self.map_err(|e| match e {
            FlowError::NonPhysical { what } | FlowError::InvalidArg { what } => {
                StageError::invalid_state(stage, what)
            }
        })
    }
}

impl<T> InStage<T> for Result<T, PnError> {
    fn in_stage(self, stage: &str) -> StageResult<T> {
        self.map_err(|e| StageError::invalid_state(stage, e.what()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_names_stage() {
        let err = StageError::invalid_state("hpt", "exit temperature");
        let msg = err.to_string();
        assert!(msg.contains("hpt"));
        assert!(msg.contains("exit temperature"));
    }

    #[test]
    fn flow_errors_become_invalid_state() {
        let r: Result<(), FlowError> = Err(FlowError::NonPhysical { what: "mach" });
        let err = r.in_stage("inlet").unwrap_err();
        assert!(err.is_invalid_state());
    }

    #[test]
    fn numeric_errors_name_the_stage() {
        let r: Result<f64, PnError> = Err(PnError::NegativeRadicand {
            what: "exit mach",
            value: -1.0,
        });
        let err = r.in_stage("nozzle").unwrap_err();
        assert!(err.is_invalid_state());
        assert!(err.to_string().contains("nozzle"));
    }
}
