//! Reference outer solver for performance networks.
//!
//! The network is treated as one vector function of its declared unknowns.
//! `solve_control_point` drives it to zero with a damped Newton iteration;
//! `solve_segment` walks a mission segment with warm starts and commits
//! energy after each point.

pub mod bisect;
pub mod error;
pub mod jacobian;
pub mod newton;
pub mod segment;

pub use bisect::{BisectConfig, bisect};
pub use error::{SolverError, SolverResult};
pub use newton::{NewtonConfig, NewtonResult, newton_solve};
pub use segment::{PointSolution, SegmentSolution, solve_control_point, solve_segment};
