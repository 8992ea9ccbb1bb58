//! Error types for flow-state construction.

use pn_core::PnError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FlowError {
    #[error("Non-physical value: {what}")]
    NonPhysical { what: &'static str },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },
}

pub type FlowResult<T> = Result<T, FlowError>;

impl From<PnError> for FlowError {
    fn from(e: PnError) -> Self {
        match e {
            PnError::NonFinite { what, .. } | PnError::NegativeRadicand { what, .. } => {
                FlowError::NonPhysical { what }
            }
            PnError::InvalidArg { what } => FlowError::InvalidArg { what },
        }
    }
}
