//! Isentropic and compressible-flow relations for a calorically perfect gas.

use pn_core::numeric::checked_sqrt;

use crate::error::{FlowError, FlowResult};

/// Stagnation-to-static temperature ratio `Tt/T = 1 + (γ−1)/2·M²`.
pub fn stagnation_temperature_ratio(gamma: f64, mach: f64) -> f64 {
    1.0 + 0.5 * (gamma - 1.0) * mach * mach
}

/// Stagnation-to-static pressure ratio `Pt/p = (Tt/T)^(γ/(γ−1))`.
pub fn stagnation_pressure_ratio(gamma: f64, mach: f64) -> f64 {
    stagnation_temperature_ratio(gamma, mach).powf(gamma / (gamma - 1.0))
}

/// Mach number reached by expanding isentropically from `Pt` to `p`.
///
/// Fails when `Pt/p < 1`, where the relation has no real solution.
pub fn mach_from_pressure_ratio(gamma: f64, pt_over_p: f64) -> FlowResult<f64> {
    if !pt_over_p.is_finite() || pt_over_p <= 0.0 {
        return Err(FlowError::NonPhysical {
            what: "pressure ratio must be positive",
        });
    }
    let radicand = 2.0 / (gamma - 1.0) * (pt_over_p.powf((gamma - 1.0) / gamma) - 1.0);
    Ok(checked_sqrt(radicand, "mach from pressure ratio")?)
}

/// Stagnation-to-static pressure ratio at which a convergent nozzle chokes.
pub fn critical_pressure_ratio(gamma: f64) -> f64 {
    (0.5 * (gamma + 1.0)).powf(gamma / (gamma - 1.0))
}

/// Isentropic area ratio `A/A*` at Mach `mach`.
pub fn area_ratio(gamma: f64, mach: f64) -> FlowResult<f64> {
    if !mach.is_finite() || mach <= 0.0 {
        return Err(FlowError::NonPhysical {
            what: "area ratio requires positive mach",
        });
    }
    let exponent = (gamma + 1.0) / (2.0 * (gamma - 1.0));
    let term = 2.0 / (gamma + 1.0) * stagnation_temperature_ratio(gamma, mach);
    Ok(term.powf(exponent) / mach)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratios_at_rest_are_unity() {
        assert_eq!(stagnation_temperature_ratio(1.4, 0.0), 1.0);
        assert_eq!(stagnation_pressure_ratio(1.4, 0.0), 1.0);
    }

    #[test]
    fn mach_inverts_pressure_ratio() {
        let pr = stagnation_pressure_ratio(1.4, 0.8);
        let m = mach_from_pressure_ratio(1.4, pr).unwrap();
        assert!((m - 0.8).abs() < 1e-12);
    }

    #[test]
    fn sub_ambient_pressure_ratio_is_undefined() {
        assert!(mach_from_pressure_ratio(1.4, 0.9).is_err());
    }

    #[test]
    fn critical_ratio_for_air() {
        assert!((critical_pressure_ratio(1.4) - 1.8929).abs() < 1e-4);
    }

    #[test]
    fn sonic_area_ratio_is_one() {
        assert!((area_ratio(1.4, 1.0).unwrap() - 1.0).abs() < 1e-12);
        assert!(area_ratio(1.4, 0.5).unwrap() > 1.0);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn mach_round_trips(gamma in 1.1_f64..1.67, mach in 0.05_f64..3.0) {
            let pr = stagnation_pressure_ratio(gamma, mach);
            let back = mach_from_pressure_ratio(gamma, pr).unwrap();
            prop_assert!((back - mach).abs() < 1e-9);
        }
    }
}
