//! pn-stages: conversion-stage library for propulsor assemblies.
//!
//! Provides models for single-purpose conversion stages:
//! - Gas path: ram, compression nozzle, compressor, fan, combustor, turbine,
//!   expansion nozzle
//! - Electric drive: electronic speed controller, motor, rotor
//! - Reciprocating: internal-combustion engine
//!
//! All stages implement the `ConversionStage` trait and are deterministic
//! functions of their inlet `FlowState`, their parameters and the evaluation
//! environment. A stage never mutates its inlet; it derives a new outlet state.
//!
//! # Example
//!
//! ```
//! use pn_flow::{FlowState, Freestream};
//! use pn_stages::{Compressor, ConversionStage, StageEnv};
//!
//! let fs = Freestream::sea_level(0.3).unwrap();
//! let inlet = FlowState::from_freestream(&fs).unwrap();
//! let lpc = Compressor::new("lpc", 1.14, 0.91).unwrap();
//!
//! let out = lpc.evaluate(&inlet, &StageEnv::new(&fs)).unwrap();
//! assert!(out.state.total_pressure() > inlet.total_pressure());
//! ```

pub mod combustor;
pub mod common;
pub mod compression_nozzle;
pub mod compressor;
pub mod engine;
pub mod error;
pub mod esc;
pub mod expansion_nozzle;
pub mod motor;
pub mod ram;
pub mod rotor;
pub mod traits;
pub mod turbine;

// Re-exports
pub use combustor::Combustor;
pub use compression_nozzle::CompressionNozzle;
pub use compressor::{Compressor, Fan};
pub use engine::InternalCombustionEngine;
pub use error::{StageError, StageResult};
pub use esc::SpeedController;
pub use expansion_nozzle::ExpansionNozzle;
pub use motor::{Motor, MotorPoint};
pub use ram::Ram;
pub use rotor::{
    CoefficientRotorModel, ExternalRotorModel, Rotor, RotorAero, RotorAerodynamics, RotorGeometry,
    RotorPerformance,
};
pub use traits::{
    ConversionStage, DriveCommand, ShaftLoad, SideOutputs, StageEnv, StageKind, StageOutput,
};
pub use turbine::Turbine;
