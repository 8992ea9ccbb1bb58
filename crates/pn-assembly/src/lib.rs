//! pn-assembly: propulsor assemblies built from conversion stages.
//!
//! Each assembly is one of a fixed set of variants (turbofan, turbojet,
//! electric rotor, internal-combustion propeller) chosen at construction. An
//! assembly threads a `FlowState` through its stages in variant order and
//! reports thrust, moment, power and energy draw. Shaft-coupled variants expose
//! unknowns and residuals to an outer solver through [`UnknownsResiduals`].
//!
//! # Example
//!
//! ```
//! use pn_assembly::{OperatingConditions, PropulsorAssembly, UnknownsResiduals};
//! use pn_flow::Freestream;
//! use pn_stages::{CoefficientRotorModel, Motor, Rotor, RotorAero, RotorGeometry, SpeedController};
//!
//! let rotor = Rotor::new(
//!     "prop",
//!     RotorGeometry { tip_radius_m: 0.2, blade_count: 2 },
//!     RotorAero::Coefficients(CoefficientRotorModel {
//!         ct: [0.1, -0.1, 0.0],
//!         cp: [0.045, 0.0, -0.02],
//!         pitch_sensitivity: 0.0,
//!     }),
//! )
//! .unwrap();
//! let mut prop = PropulsorAssembly::electric_rotor("prop_1")
//!     .esc(SpeedController::new("esc", 0.95).unwrap())
//!     .motor(Motor::new("motor", 40.0, 0.05, 1.0).unwrap())
//!     .rotor(rotor)
//!     .build()
//!     .unwrap();
//!
//! let fs = Freestream::sea_level(0.0).unwrap();
//! let cond = OperatingConditions::new(0, fs).with_bus_voltage(48.0);
//! prop.append_conditions(1);
//! let guess: Vec<f64> = prop.declare_unknowns().iter().map(|u| u.initial_guess).collect();
//! prop.apply_trial(&guess).unwrap();
//! prop.evaluate(&cond).unwrap();
//! assert_eq!(prop.residuals().unwrap().len(), 1);
//! ```

pub mod assembly;
pub mod builder;
pub mod conditions;
pub mod electric;
pub mod error;
pub mod gas_turbine;
pub mod phase;
pub mod piston;
pub mod result;
pub mod unknowns;
pub mod variant;

pub use assembly::PropulsorAssembly;
pub use builder::{AssemblyBuilder, Placement, VariantSlots};
pub use conditions::OperatingConditions;
pub use electric::{ElectricRotor, ElectricRotorSlots};
pub use error::{AssemblyError, AssemblyResult};
pub use gas_turbine::{
    GasTurbineDesign, ShaftOfftake, Turbofan, TurbofanSlots, Turbojet, TurbojetSlots,
};
pub use phase::EvaluationPhase;
pub use piston::{InternalCombustionPropeller, InternalCombustionPropellerSlots};
pub use result::{EnergyDraw, PerformanceCore, PerformanceResult, StageRecord, thrust_moment};
pub use unknowns::{Residual, Unknown, UnknownsResiduals};
pub use variant::{Evaluation, PropulsorVariant};
