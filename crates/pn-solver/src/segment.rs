//! Control-point and mission-segment drivers.

use crate::error::{SolverError, SolverResult};
use crate::newton::{NewtonConfig, newton_solve};
use nalgebra::DVector;
use pn_network::{CommitReport, ControlPoint, NetworkEvaluation, PerformanceNetwork};
use tracing::{debug, info};

/// Converged state of the network at one control point.
#[derive(Debug, Clone)]
pub struct PointSolution {
    pub x: Vec<f64>,
    pub iterations: usize,
    /// Evaluation at the converged unknowns.
    pub evaluation: NetworkEvaluation,
}

#[derive(Debug, Clone)]
pub struct SegmentSolution {
    pub points: Vec<PointSolution>,
    /// Energy commits per control point, one report per distributor.
    pub commits: Vec<Vec<CommitReport>>,
}

/// Drive the network's residuals to zero at `point`, starting from `x0`.
///
/// The network must already have conditions appended for the segment.
/// Converged results are stored in the assemblies; energy is not committed.
pub fn solve_control_point(
    network: &mut PerformanceNetwork,
    point: &ControlPoint,
    x0: &[f64],
    config: &NewtonConfig,
) -> SolverResult<PointSolution> {
    if x0.len() != network.unknowns().len() {
        return Err(SolverError::InvalidArg {
            what: "initial guess length differs from the unknown count",
        });
    }

    let newton = newton_solve(
        DVector::from_column_slice(x0),
        |x| {
            let eval = network.evaluate(point, x.as_slice())?;
            Ok(DVector::from_vec(eval.residuals))
        },
        config,
    )?;

    let x: Vec<f64> = newton.x.iter().copied().collect();
    let evaluation = network.evaluate(point, &x)?;
    network.finish_point()?;
    debug!(
        control_point = point.index,
        iterations = newton.iterations,
        residual_norm = newton.residual_norm,
        "control point converged"
    );
    Ok(PointSolution {
        x,
        iterations: newton.iterations,
        evaluation,
    })
}

/// Solve every control point of a segment in order and commit its energy.
///
/// Each point starts from the previous point's solution.
pub fn solve_segment(
    network: &mut PerformanceNetwork,
    points: &[ControlPoint],
    config: &NewtonConfig,
) -> SolverResult<SegmentSolution> {
    if points.iter().enumerate().any(|(i, p)| p.index != i) {
        return Err(SolverError::InvalidArg {
            what: "control points must be indexed 0..n in order",
        });
    }

    network.append_conditions(points.len());
    let mut x = network.initial_guess();
    let mut solution = SegmentSolution {
        points: Vec::with_capacity(points.len()),
        commits: Vec::with_capacity(points.len()),
    };

    for point in points {
        let point_solution = solve_control_point(network, point, &x, config)?;
        x.clone_from(&point_solution.x);
        solution.commits.push(network.commit_point(point)?);
        solution.points.push(point_solution);
    }

    info!(
        network = %network.name(),
        control_points = points.len(),
        "segment solved"
    );
    Ok(solution)
}
