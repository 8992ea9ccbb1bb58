//! Conversion of a project into a performance network.

use crate::ProjectResult;
use crate::schema::{MissionDef, Project, PropulsorDef, SolverDef, SourceDef, VariantDef};
use nalgebra::Vector3;
use pn_assembly::{AssemblyBuilder, Placement, PropulsorAssembly};
use pn_flow::{Freestream, GasProperties};
use pn_network::{ControlPoint, EnergyDistributor, EnergyStore, PerformanceNetwork};
use pn_solver::NewtonConfig;

fn vector(v: [f64; 3]) -> Vector3<f64> {
    Vector3::new(v[0], v[1], v[2])
}

pub fn build_propulsor(def: &PropulsorDef) -> ProjectResult<PropulsorAssembly> {
    let placement = Placement {
        origin: vector(def.origin),
        thrust_axis: vector(def.thrust_axis),
        identical: def.identical,
        active: def.active,
    };
    let tag = def.tag.as_str();
    let assembly = match def.variant.clone() {
        VariantDef::Turbofan(slots) => AssemblyBuilder::with_slots(tag, slots)
            .placement(placement)
            .build(),
        VariantDef::Turbojet(slots) => AssemblyBuilder::with_slots(tag, slots)
            .placement(placement)
            .build(),
        VariantDef::ElectricRotor(slots) => AssemblyBuilder::with_slots(tag, slots)
            .placement(placement)
            .build(),
        VariantDef::InternalCombustionPropeller(slots) => AssemblyBuilder::with_slots(tag, slots)
            .placement(placement)
            .build(),
    }?;
    Ok(assembly)
}

/// Build the vehicle's performance network. Missing stage tables surface
/// here as configuration errors naming the stage.
pub fn build_network(project: &Project) -> ProjectResult<PerformanceNetwork> {
    let mut distributors = Vec::with_capacity(project.vehicle.distributors.len());
    for d in &project.vehicle.distributors {
        let propulsors = d
            .propulsors
            .iter()
            .map(build_propulsor)
            .collect::<ProjectResult<Vec<_>>>()?;
        let store = match &d.source {
            SourceDef::Batteries { modules, voltage } => EnergyStore::Batteries {
                modules: modules.clone(),
                voltage: *voltage,
            },
            SourceDef::Fuel { tanks } => EnergyStore::Fuel {
                tanks: tanks.clone(),
            },
        };
        distributors.push(EnergyDistributor::new(
            d.tag.clone(),
            store,
            propulsors,
            d.propulsor_split.clone(),
            d.source_split.clone(),
        )?);
    }
    Ok(PerformanceNetwork::new(
        project.name.clone(),
        vector(project.vehicle.center_of_gravity),
        distributors,
    )?)
}

/// Control points of the mission, indexed in file order.
pub fn control_points(mission: &MissionDef) -> ProjectResult<Vec<ControlPoint>> {
    mission
        .points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let freestream = Freestream::from_static(
                p.temperature_k,
                p.pressure_pa,
                p.mach,
                p.gravity_mps2,
                GasProperties::air(),
            )?;
            Ok(ControlPoint::new(i, freestream)
                .with_throttle(p.throttle)
                .with_pitch_command(p.pitch_command)
                .with_dt(p.dt_s))
        })
        .collect()
}

impl SolverDef {
    pub fn newton_config(&self) -> NewtonConfig {
        NewtonConfig {
            max_iterations: self.max_iterations,
            abs_tol: self.abs_tol,
            ..NewtonConfig::default()
        }
    }
}
