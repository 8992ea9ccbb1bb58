//! Guarded float helpers for the stage formulas.

use crate::PnError;

/// Absolute and relative closeness bounds.
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: f64,
    pub rel: f64,
}

impl Tolerances {
    /// For split fractions, which are user-entered and summed.
    pub const FRACTIONS: Tolerances = Tolerances {
        abs: 1e-9,
        rel: 1e-9,
    };
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: f64, b: f64, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    diff <= tol.abs || diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: f64, what: &'static str) -> Result<f64, PnError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(PnError::NonFinite { what, value: v })
    }
}

/// Square root that rejects negative radicands, which in the isentropic
/// relations mean a pressure ratio no Mach number can produce.
pub fn checked_sqrt(v: f64, what: &'static str) -> Result<f64, PnError> {
    if v < 0.0 {
        return Err(PnError::NegativeRadicand { what, value: v });
    }
    ensure_finite(v.sqrt(), what)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fractions_tolerate_rounding() {
        assert!(nearly_equal(0.1 + 0.2 + 0.7, 1.0, Tolerances::FRACTIONS));
        assert!(!nearly_equal(0.99, 1.0, Tolerances::FRACTIONS));
        assert!(nearly_equal(0.0, 1e-13, Tolerances::default()));
    }

    #[test]
    fn ensure_finite_names_the_quantity() {
        let err = ensure_finite(f64::NAN, "exit temperature").unwrap_err();
        assert!(err.to_string().contains("exit temperature"));
    }

    #[test]
    fn checked_sqrt_rejects_negative() {
        assert!(matches!(
            checked_sqrt(-1e-9, "radicand"),
            Err(PnError::NegativeRadicand { .. })
        ));
        assert_eq!(checked_sqrt(4.0, "radicand").unwrap(), 2.0);
    }
}
