//! Scalar bracketing root finder.

use crate::error::{SolverError, SolverResult};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BisectConfig {
    pub max_iterations: usize,
    /// Stop once the bracket is narrower than this.
    pub x_tol: f64,
    /// Stop once |f| falls below this.
    pub f_tol: f64,
}

impl Default for BisectConfig {
    fn default() -> Self {
        Self {
            max_iterations: 200,
            x_tol: 1e-12,
            f_tol: 1e-9,
        }
    }
}

/// Root of `f` on `[lo, hi]`. `f(lo)` and `f(hi)` must differ in sign.
pub fn bisect<F>(mut f: F, lo: f64, hi: f64, config: &BisectConfig) -> SolverResult<f64>
where
    F: FnMut(f64) -> SolverResult<f64>,
{
    if !(lo.is_finite() && hi.is_finite() && lo < hi) {
        return Err(SolverError::InvalidArg {
            what: "bracket must be finite with lo < hi",
        });
    }
    let (mut lo, mut hi) = (lo, hi);
    let mut f_lo = f(lo)?;
    let f_hi = f(hi)?;
    if f_lo == 0.0 {
        return Ok(lo);
    }
    if f_hi == 0.0 {
        return Ok(hi);
    }
    if f_lo.signum() == f_hi.signum() {
        return Err(SolverError::InvalidArg {
            what: "bracket does not change sign",
        });
    }

    for _ in 0..config.max_iterations {
        let mid = 0.5 * (lo + hi);
        let f_mid = f(mid)?;
        if f_mid.abs() < config.f_tol || hi - lo < config.x_tol {
            return Ok(mid);
        }
        if f_mid.signum() == f_lo.signum() {
            lo = mid;
            f_lo = f_mid;
        } else {
            hi = mid;
        }
    }
    Ok(0.5 * (lo + hi))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_square_root() {
        let root = bisect(|x| Ok(x * x - 2.0), 0.0, 2.0, &BisectConfig::default()).unwrap();
        assert!((root - 2.0_f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn rejects_bracket_without_sign_change() {
        assert!(matches!(
            bisect(|x| Ok(x * x + 1.0), -1.0, 1.0, &BisectConfig::default()),
            Err(SolverError::InvalidArg { .. })
        ));
    }

    #[test]
    fn endpoint_root_is_returned() {
        let root = bisect(|x| Ok(x - 1.0), 1.0, 3.0, &BisectConfig::default()).unwrap();
        assert_eq!(root, 1.0);
    }
}
