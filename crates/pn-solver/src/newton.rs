//! Damped Newton solver.

use crate::error::{SolverError, SolverResult};
use crate::jacobian::finite_difference_jacobian;
use nalgebra::DVector;
use tracing::{debug, trace};

/// Newton solver configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewtonConfig {
    /// Maximum iterations
    pub max_iterations: usize,
    /// Absolute tolerance for residual norm
    pub abs_tol: f64,
    /// Relative finite-difference step
    pub fd_epsilon: f64,
    /// Line search backtracking factor
    pub line_search_beta: f64,
    /// Maximum line search iterations
    pub max_line_search_iters: usize,
}

impl Default for NewtonConfig {
    fn default() -> Self {
        Self {
            max_iterations: 50,
            abs_tol: 1e-6,
            fd_epsilon: 1e-6,
            line_search_beta: 0.5,
            max_line_search_iters: 20,
        }
    }
}

/// Newton iteration result.
#[derive(Debug, Clone)]
pub struct NewtonResult {
    /// Solution vector
    pub x: DVector<f64>,
    /// Final residual norm
    pub residual_norm: f64,
    /// Number of iterations
    pub iterations: usize,
}

/// Newton solver with backtracking line search.
///
/// Trial points where the residual function diverges are treated like a
/// residual increase: the step is halved and retried.
pub fn newton_solve<F>(
    x0: DVector<f64>,
    mut residual_fn: F,
    config: &NewtonConfig,
) -> SolverResult<NewtonResult>
where
    F: FnMut(&DVector<f64>) -> SolverResult<DVector<f64>>,
{
    let mut x = x0;
    let mut r = residual_fn(&x)?;
    let mut r_norm = r.norm();

    for iter in 0..config.max_iterations {
        trace!(iteration = iter, residual_norm = r_norm, "newton iteration");
        if r_norm < config.abs_tol {
            debug!(iterations = iter, residual_norm = r_norm, "newton converged");
            return Ok(NewtonResult {
                x,
                residual_norm: r_norm,
                iterations: iter,
            });
        }

        let jac = finite_difference_jacobian(&x, &r, &mut residual_fn, config.fd_epsilon)?;

        // Solve J * dx = -r
        let dx = jac
            .lu()
            .solve(&(-&r))
            .ok_or_else(|| SolverError::Numeric {
                what: format!("singular Jacobian at iteration {iter}"),
            })?;

        let mut alpha = 1.0;
        let mut accepted = None;
        for _ in 0..=config.max_line_search_iters {
            let x_new = &x + alpha * &dx;
            match residual_fn(&x_new) {
                Ok(r_new) if r_new.norm() < r_norm => {
                    accepted = Some((x_new, r_new));
                    break;
                }
                Ok(_) => {}
                Err(e) if e.is_diverged() => {
                    trace!(alpha, "trial diverged, shrinking step");
                }
                Err(e) => return Err(e),
            }
            alpha *= config.line_search_beta;
        }

        let Some((x_new, r_new)) = accepted else {
            return Err(SolverError::ConvergenceFailure {
                what: format!("line search stagnated at iteration {iter}"),
                iterations: iter,
                residual_norm: r_norm,
            });
        };
        x = x_new;
        r_norm = r_new.norm();
        r = r_new;
    }

    if r_norm < config.abs_tol {
        return Ok(NewtonResult {
            x,
            residual_norm: r_norm,
            iterations: config.max_iterations,
        });
    }
    Err(SolverError::ConvergenceFailure {
        what: format!("maximum iterations {} reached", config.max_iterations),
        iterations: config.max_iterations,
        residual_norm: r_norm,
    })
}
