//! Common utilities for stage calculations.

use crate::error::{StageError, StageResult};
use pn_core::numeric::ensure_finite;

/// Ensure a derived value is finite, naming the stage on failure.
pub fn check_finite(value: f64, stage: &str, what: &'static str) -> StageResult<f64> {
    ensure_finite(value, what).map_err(|_| StageError::invalid_state(stage, what))
}

/// Efficiency parameters must lie in (0, 1].
pub fn check_efficiency(value: f64, what: &'static str) -> StageResult<()> {
    if !value.is_finite() || value <= 0.0 || value > 1.0 {
        return Err(StageError::InvalidArg { what });
    }
    Ok(())
}

pub fn check_positive(value: f64, what: &'static str) -> StageResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(StageError::InvalidArg { what });
    }
    Ok(())
}

pub fn check_non_negative(value: f64, what: &'static str) -> StageResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(StageError::InvalidArg { what });
    }
    Ok(())
}

/// Polytropic temperature ratio for a compression with pressure ratio `pr`.
pub fn polytropic_temperature_ratio(pr: f64, gamma: f64, eta_poly: f64) -> f64 {
    pr.powf((gamma - 1.0) / (gamma * eta_poly))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_finite() {
        assert!(check_finite(1.0, "s", "test").is_ok());
        assert!(check_finite(f64::INFINITY, "s", "test").is_err());
        assert!(check_finite(f64::NAN, "s", "test").is_err());
    }

    #[test]
    fn test_check_efficiency() {
        assert!(check_efficiency(0.9, "eta").is_ok());
        assert!(check_efficiency(1.0, "eta").is_ok());
        assert!(check_efficiency(0.0, "eta").is_err());
        assert!(check_efficiency(1.01, "eta").is_err());
    }

    #[test]
    fn isentropic_limit_of_polytropic_ratio() {
        let r = polytropic_temperature_ratio(2.0, 1.4, 1.0);
        assert!((r - 2.0_f64.powf(0.4 / 1.4)).abs() < 1e-12);
    }
}
