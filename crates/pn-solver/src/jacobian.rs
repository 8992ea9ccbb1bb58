//! Finite difference Jacobian.

use crate::error::SolverResult;
use nalgebra::{DMatrix, DVector};

/// Forward-difference Jacobian of `f` at `x`, reusing `f_x = f(x)`.
///
/// A column whose forward step diverges is retried with a backward step.
pub fn finite_difference_jacobian<F>(
    x: &DVector<f64>,
    f_x: &DVector<f64>,
    f: &mut F,
    epsilon: f64,
) -> SolverResult<DMatrix<f64>>
where
    F: FnMut(&DVector<f64>) -> SolverResult<DVector<f64>>,
{
    let n = x.len();
    let m = f_x.len();
    let mut jac = DMatrix::zeros(m, n);

    for j in 0..n {
        let dx = epsilon * x[j].abs().max(1.0);
        let mut x_perturbed = x.clone();
        x_perturbed[j] += dx;

        let (f_perturbed, step) = match f(&x_perturbed) {
            Ok(v) => (v, dx),
            Err(e) if e.is_diverged() => {
                x_perturbed[j] = x[j] - dx;
                (f(&x_perturbed)?, -dx)
            }
            Err(e) => return Err(e),
        };
        let df = (f_perturbed - f_x) / step;
        jac.set_column(j, &df);
    }

    Ok(jac)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jacobian_quadratic() {
        let mut f = |x: &DVector<f64>| -> SolverResult<DVector<f64>> {
            Ok(DVector::from_vec(vec![x[0] * x[0], x[0] * x[1]]))
        };
        let x = DVector::from_vec(vec![3.0, 2.0]);
        let f_x = f(&x).unwrap();
        let jac = finite_difference_jacobian(&x, &f_x, &mut f, 1e-7).unwrap();

        assert!((jac[(0, 0)] - 6.0).abs() < 1e-5);
        assert!(jac[(0, 1)].abs() < 1e-5);
        assert!((jac[(1, 0)] - 2.0).abs() < 1e-5);
        assert!((jac[(1, 1)] - 3.0).abs() < 1e-5);
    }
}
