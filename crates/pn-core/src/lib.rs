//! pn-core: shared vocabulary for the propulsion network crates.
//!
//! - `units`: uom quantities for flow and electrical states, rpm helpers and
//!   sea-level reference constants
//! - `numeric`: guarded float helpers used by the stage formulas
//! - `ids`: positional ids for distributors and assemblies

pub mod error;
pub mod ids;
pub mod numeric;
pub mod units;

pub use error::{PnError, PnResult};
pub use ids::{AssemblyId, DistributorId};
pub use numeric::*;
pub use units::*;
