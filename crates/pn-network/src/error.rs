//! Error types for distributors, the result cache and the network.

use pn_assembly::AssemblyError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("Assembly error: {0}")]
    Assembly(#[from] AssemblyError),

    #[error("Configuration error in '{owner}': {what}")]
    Configuration { owner: String, what: String },

    /// A cache read that should never have been attempted.
    #[error("Cache consistency error for '{assembly}': {reason}")]
    CacheConsistency {
        assembly: String,
        reason: &'static str,
    },

    #[error("Distributor '{distributor}' already committed control point {control_point}")]
    AlreadyCommitted {
        distributor: String,
        control_point: usize,
    },

    #[error("Distributor '{distributor}' has no result from '{assembly}' at control point {control_point}")]
    TallyIncomplete {
        distributor: String,
        assembly: String,
        control_point: usize,
    },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type NetworkResult<T> = Result<T, NetworkError>;

impl NetworkError {
    pub fn configuration(owner: &str, what: impl Into<String>) -> Self {
        NetworkError::Configuration {
            owner: owner.to_string(),
            what: what.into(),
        }
    }

    /// True when an assembly evaluation diverged for the current trial.
    pub fn is_diverged(&self) -> bool {
        matches!(self, NetworkError::Assembly(e) if e.is_diverged())
    }
}
