//! pn-flow: gas properties and the flow state threaded through propulsor stages.
//!
//! Provides:
//! - `GasProperties` for a calorically perfect gas
//! - `Freestream` conditions at a control point
//! - Immutable `FlowState` (thermodynamic and electrical quantities)
//! - Isentropic and compressible-flow relations

pub mod error;
pub mod freestream;
pub mod gas;
pub mod isentropic;
pub mod state;

pub use error::{FlowError, FlowResult};
pub use freestream::Freestream;
pub use gas::GasProperties;
pub use state::FlowState;
