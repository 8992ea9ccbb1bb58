//! Reference assemblies shared by the integration tests.

#![allow(dead_code)]

use nalgebra::Vector3;
use pn_assembly::{GasTurbineDesign, PropulsorAssembly};
use pn_stages::{
    CoefficientRotorModel, Combustor, CompressionNozzle, Compressor, ExpansionNozzle, Fan,
    InternalCombustionEngine, Motor, Ram, Rotor, RotorAero, RotorGeometry, SpeedController,
    Turbine,
};

pub fn turbofan(tag: &str, origin: Vector3<f64>) -> PropulsorAssembly {
    PropulsorAssembly::turbofan(tag)
        .origin(origin)
        .identical(true)
        .ram(Ram::new("ram"))
        .inlet(CompressionNozzle::new("inlet", 0.98, 1.0).unwrap())
        .fan(Fan::new("fan", 1.7, 0.93).unwrap())
        .low_pressure_compressor(Compressor::new("lpc", 1.14, 0.91).unwrap())
        .high_pressure_compressor(Compressor::new("hpc", 13.415, 0.91).unwrap())
        .combustor(Combustor::new("combustor", 0.95, 0.99, 1500.0, 43.0e6).unwrap())
        .high_pressure_turbine(Turbine::new("hpt", 0.93, 0.99).unwrap())
        .low_pressure_turbine(Turbine::new("lpt", 0.93, 0.99).unwrap())
        .core_nozzle(ExpansionNozzle::new("core_nozzle", 0.99, 1.0).unwrap())
        .fan_nozzle(ExpansionNozzle::new("fan_nozzle", 0.99, 1.0).unwrap())
        .bypass_ratio(5.4)
        .design(GasTurbineDesign {
            design_mass_flow_kgps: 20.0,
            offtake: None,
        })
        .build()
        .unwrap()
}

pub fn turbojet(tag: &str) -> PropulsorAssembly {
    PropulsorAssembly::turbojet(tag)
        .ram(Ram::new("ram"))
        .inlet(CompressionNozzle::new("inlet", 0.98, 1.0).unwrap())
        .low_pressure_compressor(Compressor::new("lpc", 3.0, 0.9).unwrap())
        .high_pressure_compressor(Compressor::new("hpc", 5.0, 0.9).unwrap())
        .combustor(Combustor::new("combustor", 0.95, 0.99, 1500.0, 43.0e6).unwrap())
        .high_pressure_turbine(Turbine::new("hpt", 0.93, 0.99).unwrap())
        .low_pressure_turbine(Turbine::new("lpt", 0.93, 0.99).unwrap())
        .core_nozzle(ExpansionNozzle::new("core_nozzle", 0.99, 1.0).unwrap())
        .design(GasTurbineDesign {
            design_mass_flow_kgps: 15.0,
            offtake: None,
        })
        .build()
        .unwrap()
}

pub fn small_rotor(name: &str) -> Rotor {
    Rotor::new(
        name,
        RotorGeometry {
            tip_radius_m: 0.2,
            blade_count: 2,
        },
        RotorAero::Coefficients(CoefficientRotorModel {
            ct: [0.11, -0.1, -0.02],
            cp: [0.045, 0.01, -0.04],
            pitch_sensitivity: 0.0,
        }),
    )
    .unwrap()
}

pub fn electric_rotor(tag: &str) -> PropulsorAssembly {
    PropulsorAssembly::electric_rotor(tag)
        .esc(SpeedController::new("esc", 0.95).unwrap())
        .motor(Motor::new("motor", 40.0, 0.05, 1.0).unwrap())
        .rotor(small_rotor("rotor"))
        .build()
        .unwrap()
}

pub fn piston_propeller(tag: &str) -> PropulsorAssembly {
    PropulsorAssembly::internal_combustion_propeller(tag)
        .engine(InternalCombustionEngine::new("engine", 100_000.0, 2700.0, 0.3 / 3.6e6).unwrap())
        .propeller(
            Rotor::new(
                "propeller",
                RotorGeometry {
                    tip_radius_m: 0.9,
                    blade_count: 2,
                },
                RotorAero::Coefficients(CoefficientRotorModel {
                    ct: [0.12, -0.1, -0.05],
                    cp: [0.05, 0.02, -0.01],
                    pitch_sensitivity: 0.0,
                }),
            )
            .unwrap(),
        )
        .build()
        .unwrap()
}
