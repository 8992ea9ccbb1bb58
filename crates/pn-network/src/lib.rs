//! pn-network: energy distributors and the vehicle performance network.
//!
//! Provides:
//! - Battery modules and fuel tanks with clamped depletion
//! - Electrical busses and fuel lines with split policies and a once-per-point
//!   energy commit
//! - `PerformanceNetwork`, which evaluates every propulsor per control point and
//!   reuses results of structurally identical propulsors through `ResultCache`

pub mod cache;
pub mod distributor;
pub mod error;
pub mod fingerprint;
pub mod network;
pub mod source;
pub mod split;

pub use cache::{CacheEntry, CacheKey, CacheReader, ResultCache};
pub use distributor::{
    BusVoltage, CommitReport, EnergyDistributor, EnergyStore, PropulsorDraw, Tally,
};
pub use error::{NetworkError, NetworkResult};
pub use fingerprint::structural_fingerprint;
pub use network::{
    AssemblyReport, ControlPoint, NetworkEvaluation, PerformanceNetwork, Role, UnknownSlot,
};
pub use source::{BatteryModule, FuelTank};
pub use split::SplitPolicy;
