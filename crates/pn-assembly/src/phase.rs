//! Per-evaluation state machine.
//!
//! ```text
//! Idle → ConditionsAppended → (UnknownsApplied → StagesEvaluated → ResidualsComputed)* → Done
//! ```
//!
//! Assemblies without unknowns go straight from `StagesEvaluated` to `Done`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EvaluationPhase {
    Idle,
    ConditionsAppended,
    UnknownsApplied,
    StagesEvaluated,
    ResidualsComputed,
    Done,
}

impl EvaluationPhase {
    /// A new control point (or a new trial) may start from here.
    pub fn can_apply_trial(self) -> bool {
        matches!(
            self,
            EvaluationPhase::ConditionsAppended
                | EvaluationPhase::UnknownsApplied
                | EvaluationPhase::ResidualsComputed
                | EvaluationPhase::Done
        )
    }

    pub fn can_evaluate(self, coupled: bool) -> bool {
        if coupled {
            self == EvaluationPhase::UnknownsApplied
        } else {
            matches!(
                self,
                EvaluationPhase::ConditionsAppended | EvaluationPhase::Done
            )
        }
    }

    pub fn can_compute_residuals(self) -> bool {
        self == EvaluationPhase::StagesEvaluated
    }

    /// Peers adopting a cached result skip the unknowns entirely.
    pub fn can_adopt(self) -> bool {
        matches!(
            self,
            EvaluationPhase::ConditionsAppended | EvaluationPhase::Done
        )
    }

    pub fn can_finish(self) -> bool {
        matches!(
            self,
            EvaluationPhase::StagesEvaluated | EvaluationPhase::ResidualsComputed
        )
    }
}
