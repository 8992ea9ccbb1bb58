use nalgebra::Vector3;
use pn_assembly::{GasTurbineDesign, PropulsorAssembly};
use pn_core::{AssemblyId, DistributorId};
use pn_flow::Freestream;
use pn_network::{
    BatteryModule, BusVoltage, ControlPoint, EnergyDistributor, FuelTank, NetworkError,
    PerformanceNetwork, Role, structural_fingerprint,
};
use pn_stages::{
    CoefficientRotorModel, Combustor, CompressionNozzle, Compressor, ExpansionNozzle, Fan, Motor,
    Ram, Rotor, RotorAero, RotorGeometry, SpeedController, Turbine,
};

fn turbofan(tag: &str, origin: Vector3<f64>) -> PropulsorAssembly {
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

fn electric_rotor(tag: &str, origin: Vector3<f64>) -> PropulsorAssembly {
    PropulsorAssembly::electric_rotor(tag)
        .origin(origin)
        .identical(true)
        .esc(SpeedController::new("esc", 0.95).unwrap())
        .motor(Motor::new("motor", 40.0, 0.05, 1.0).unwrap())
        .rotor(
            Rotor::new(
                "rotor",
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
            .unwrap(),
        )
        .build()
        .unwrap()
}

fn twin_turbofan() -> PerformanceNetwork {
    let line = EnergyDistributor::fuel_line(
        "fuel_line",
        vec![FuelTank::full("main", 5000.0, 10.0)],
        vec![
            turbofan("left", Vector3::new(10.0, 0.0, 0.0)),
            turbofan("right", Vector3::new(10.0, 5.0, 0.0)),
        ],
    )
    .unwrap();
    PerformanceNetwork::new("twin", Vector3::new(12.0, 0.0, 0.0), vec![line]).unwrap()
}

fn battery() -> BatteryModule {
    BatteryModule::full("pack", 3.6e6, 40.0, 50.4, 0.01, 20_000.0)
}

fn quad_bus() -> PerformanceNetwork {
    let bus = EnergyDistributor::electrical_bus(
        "bus",
        vec![battery()],
        BusVoltage::Fixed(48.0),
        vec![
            electric_rotor("r1", Vector3::new(0.3, 0.3, 0.0)),
            electric_rotor("r2", Vector3::new(0.3, -0.3, 0.0)),
        ],
    )
    .unwrap();
    PerformanceNetwork::new("quad", Vector3::zeros(), vec![bus]).unwrap()
}

#[test]
fn identical_turbofans_share_one_evaluation() {
    let mut net = twin_turbofan();
    assert!(net.unknowns().is_empty());
    net.append_conditions(1);

    let point = ControlPoint::new(0, Freestream::sea_level(0.8).unwrap());
    let eval = net.evaluate(&point, &[]).unwrap();

    assert_eq!(eval.cache_hits, 1);
    let left = &eval.report("left").unwrap().result;
    let right = &eval.report("right").unwrap().result;
    assert!(left.shares_core_with(right));
    assert_eq!(left.thrust(), right.thrust());
    assert_eq!(left.power_w(), right.power_w());

    let offset = Vector3::new(0.0, 5.0, 0.0);
    let expected = offset.cross(left.thrust());
    let diff = right.moment - left.moment;
    assert!((diff - expected).norm() < 1e-9 * (1.0 + expected.norm()));
}

#[test]
fn peer_roles_follow_declaration_order() {
    let net = twin_turbofan();
    let d = DistributorId::from_index(0);
    assert_eq!(net.role(d, AssemblyId::from_index(0)), Some(Role::Canonical));
    assert_eq!(
        net.role(d, AssemblyId::from_index(1)),
        Some(Role::Peer {
            canonical: AssemblyId::from_index(0)
        })
    );
    assert_eq!(
        net.fingerprint(d, AssemblyId::from_index(0)),
        net.fingerprint(d, AssemblyId::from_index(1))
    );
}

#[test]
fn placement_does_not_change_fingerprint_but_design_does() {
    let a = turbofan("a", Vector3::zeros());
    let b = turbofan("b", Vector3::new(3.0, -2.0, 1.0));
    assert_eq!(
        structural_fingerprint(&a).unwrap(),
        structural_fingerprint(&b).unwrap()
    );

    let c = PropulsorAssembly::turbofan("c")
        .ram(Ram::new("ram"))
        .inlet(CompressionNozzle::new("inlet", 0.98, 1.0).unwrap())
        .fan(Fan::new("fan", 1.6, 0.93).unwrap())
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
        .unwrap();
    assert_ne!(
        structural_fingerprint(&a).unwrap(),
        structural_fingerprint(&c).unwrap()
    );
}

#[test]
fn lone_identical_propulsor_is_evaluated_on_its_own() {
    let line = EnergyDistributor::fuel_line(
        "fuel_line",
        vec![FuelTank::full("main", 5000.0, 10.0)],
        vec![turbofan("solo", Vector3::zeros())],
    )
    .unwrap();
    let mut net = PerformanceNetwork::new("single", Vector3::zeros(), vec![line]).unwrap();
    assert_eq!(
        net.role(DistributorId::from_index(0), AssemblyId::from_index(0)),
        Some(Role::Unique)
    );
    net.append_conditions(1);
    let eval = net
        .evaluate(&ControlPoint::new(0, Freestream::sea_level(0.8).unwrap()), &[])
        .unwrap();
    assert_eq!(eval.cache_hits, 0);
    assert!(eval.total_thrust().x > 0.0);
    assert_eq!(eval.net_thrust().value, eval.total_thrust().norm());
    assert!(eval.total_power().value > 0.0);
}

#[test]
fn duplicate_tags_are_rejected() {
    let a = EnergyDistributor::fuel_line(
        "line_a",
        vec![FuelTank::full("a", 100.0, 1.0)],
        vec![turbofan("engine", Vector3::zeros())],
    )
    .unwrap();
    let b = EnergyDistributor::fuel_line(
        "line_b",
        vec![FuelTank::full("b", 100.0, 1.0)],
        vec![turbofan("engine", Vector3::zeros())],
    )
    .unwrap();
    assert!(matches!(
        PerformanceNetwork::new("dup", Vector3::zeros(), vec![a, b]),
        Err(NetworkError::Configuration { .. })
    ));
}

#[test]
fn electric_peers_expose_only_canonical_unknowns() {
    let net = quad_bus();
    let unknowns = net.unknowns();
    assert_eq!(unknowns.len(), 1);
    assert_eq!(unknowns[0].tag, "r1");
    assert_eq!(net.initial_guess().len(), 1);
}

#[test]
fn trial_length_is_checked() {
    let mut net = quad_bus();
    net.append_conditions(1);
    let point = ControlPoint::new(0, Freestream::sea_level(0.0).unwrap());
    assert!(matches!(
        net.evaluate(&point, &[0.04, 0.04]),
        Err(NetworkError::InvalidArg { .. })
    ));
}

#[test]
fn energy_is_committed_exactly_once_per_point() {
    let mut net = quad_bus();
    net.append_conditions(2);
    let point = ControlPoint::new(0, Freestream::sea_level(0.0).unwrap()).with_dt(10.0);

    let eval = net.evaluate(&point, &[0.045]).unwrap();
    assert_eq!(eval.residuals.len(), 1);
    assert_eq!(eval.cache_hits, 1);
    net.finish_point().unwrap();

    let reports = net.commit_point(&point).unwrap();
    assert_eq!(reports.len(), 1);
    assert!(reports[0].energy_removed_j > 0.0);
    assert!(!reports[0].shortfall);
    assert!(net.distributors()[0].is_committed(0));

    assert!(matches!(
        net.commit_point(&point),
        Err(NetworkError::AlreadyCommitted { control_point: 0, .. })
    ));
}

#[test]
fn commit_needs_every_active_result() {
    let mut net = quad_bus();
    net.append_conditions(2);
    let point = ControlPoint::new(1, Freestream::sea_level(0.0).unwrap());
    assert!(matches!(
        net.commit_point(&point),
        Err(NetworkError::TallyIncomplete { .. })
    ));
}
