//! Split policies for apportioning power, fuel flow and draw.

use pn_core::{Tolerances, nearly_equal};
use serde::{Deserialize, Serialize};

/// How a quantity is divided among `n` recipients.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitPolicy {
    #[default]
    Equal,
    /// One ratio per recipient, summing to one.
    Ratios(Vec<f64>),
}

impl SplitPolicy {
    pub fn validate(&self, recipients: usize) -> Result<(), String> {
        match self {
            SplitPolicy::Equal => Ok(()),
            SplitPolicy::Ratios(ratios) => {
                if ratios.len() != recipients {
                    return Err(format!(
                        "split lists {} ratios for {} recipients",
                        ratios.len(),
                        recipients
                    ));
                }
                if ratios.iter().any(|r| !r.is_finite() || *r < 0.0) {
                    return Err("split ratios must be non-negative".to_string());
                }
                let sum: f64 = ratios.iter().sum();
                if !nearly_equal(sum, 1.0, Tolerances::FRACTIONS) {
                    return Err(format!("split ratios sum to {sum}, expected 1"));
                }
                Ok(())
            }
        }
    }

    /// Shares for each recipient; `participating[i] == false` gets zero.
    ///
    /// Equal splits divide among participants only. Explicit ratios keep
    /// their configured values.
    pub fn shares(&self, participating: &[bool]) -> Vec<f64> {
        match self {
            SplitPolicy::Equal => {
                let n = participating.iter().filter(|p| **p).count();
                participating
                    .iter()
                    .map(|p| if *p && n > 0 { 1.0 / n as f64 } else { 0.0 })
                    .collect()
            }
            SplitPolicy::Ratios(ratios) => ratios
                .iter()
                .zip(participating)
                .map(|(r, p)| if *p { *r } else { 0.0 })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_split_skips_non_participants() {
        let shares = SplitPolicy::Equal.shares(&[true, false, true, true]);
        assert_eq!(shares.len(), 4);
        assert_eq!(shares[1], 0.0);
        assert!((shares.iter().sum::<f64>() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn ratios_must_match_and_sum_to_one() {
        assert!(SplitPolicy::Ratios(vec![0.5, 0.5]).validate(2).is_ok());
        assert!(SplitPolicy::Ratios(vec![0.5, 0.5]).validate(3).is_err());
        assert!(SplitPolicy::Ratios(vec![0.6, 0.6]).validate(2).is_err());
        assert!(SplitPolicy::Ratios(vec![1.2, -0.2]).validate(2).is_err());
    }

    #[test]
    fn ratio_shares_keep_configured_values() {
        let policy = SplitPolicy::Ratios(vec![0.7, 0.3]);
        assert_eq!(policy.shares(&[true, true]), vec![0.7, 0.3]);
        assert_eq!(policy.shares(&[true, false]), vec![0.7, 0.0]);
    }
}
