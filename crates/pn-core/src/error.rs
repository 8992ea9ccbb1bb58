use thiserror::Error;

pub type PnResult<T> = Result<T, PnError>;

/// Numeric failures shared by the flow and stage layers.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PnError {
    #[error("{what} is not finite ({value})")]
    NonFinite { what: &'static str, value: f64 },

    #[error("{what}: square root of negative value {value}")]
    NegativeRadicand { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },
}

impl PnError {
    pub fn what(&self) -> &'static str {
        match self {
            PnError::NonFinite { what, .. }
            | PnError::NegativeRadicand { what, .. }
            | PnError::InvalidArg { what } => what,
        }
    }
}
