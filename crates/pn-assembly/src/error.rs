//! Error types for propulsor assemblies.

use crate::phase::EvaluationPhase;
use pn_stages::StageError;
use thiserror::Error;

/// Errors raised while building or evaluating a propulsor assembly.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AssemblyError {
    /// Missing or inconsistent design data. Never retried.
    #[error("Configuration error in '{assembly}': {what}")]
    Configuration { assembly: String, what: String },

    /// A stage produced an undefined physical quantity for the current
    /// trial values.
    #[error("Evaluation of '{assembly}' diverged")]
    EvaluationDiverged {
        assembly: String,
        #[source]
        source: StageError,
    },

    #[error("Stage failure in '{assembly}'")]
    Stage {
        assembly: String,
        #[source]
        source: StageError,
    },

    #[error("'{assembly}' cannot {action} while {phase:?}")]
    PhaseViolation {
        assembly: String,
        action: &'static str,
        phase: EvaluationPhase,
    },

    #[error("'{assembly}' expects {expected} trial values, got {found}")]
    TrialLength {
        assembly: String,
        expected: usize,
        found: usize,
    },

    #[error("'{assembly}' is missing operating condition: {what}")]
    MissingCondition {
        assembly: String,
        what: &'static str,
    },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },
}

pub type AssemblyResult<T> = Result<T, AssemblyError>;

impl AssemblyError {
    pub fn configuration(assembly: &str, what: impl Into<String>) -> Self {
        AssemblyError::Configuration {
            assembly: assembly.to_string(),
            what: what.into(),
        }
    }

    /// Wrap a stage failure, sorting out the divergence case.
    pub fn from_stage(assembly: &str, source: StageError) -> Self {
        if source.is_invalid_state() {
            AssemblyError::EvaluationDiverged {
                assembly: assembly.to_string(),
                source,
            }
        } else {
            AssemblyError::Stage {
                assembly: assembly.to_string(),
                source,
            }
        }
    }

    pub fn is_diverged(&self) -> bool {
        matches!(self, AssemblyError::EvaluationDiverged { .. })
    }
}

/// Attach an assembly tag to stage failures.
pub(crate) trait InAssembly<T> {
    fn in_assembly(self, assembly: &str) -> AssemblyResult<T>;
}

impl<T> InAssembly<T> for Result<T, StageError> {
    fn in_assembly(self, assembly: &str) -> AssemblyResult<T> {
        self.map_err(|e| AssemblyError::from_stage(assembly, e))
    }
}
