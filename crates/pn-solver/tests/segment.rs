use nalgebra::Vector3;
use pn_assembly::PropulsorAssembly;
use pn_flow::Freestream;
use pn_network::{
    BatteryModule, BusVoltage, ControlPoint, EnergyDistributor, EnergyStore, PerformanceNetwork,
};
use pn_solver::{NewtonConfig, SolverError, solve_control_point, solve_segment};
use pn_stages::{
    CoefficientRotorModel, Motor, Rotor, RotorAero, RotorGeometry, SpeedController,
};

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

fn twin_rotor() -> PerformanceNetwork {
    let bus = EnergyDistributor::electrical_bus(
        "bus",
        vec![BatteryModule::full("pack", 3.6e6, 40.0, 50.4, 0.01, 20_000.0)],
        BusVoltage::Fixed(48.0),
        vec![
            electric_rotor("left", Vector3::new(0.0, -0.4, 0.0)),
            electric_rotor("right", Vector3::new(0.0, 0.4, 0.0)),
        ],
    )
    .unwrap();
    PerformanceNetwork::new("twin_rotor", Vector3::zeros(), vec![bus]).unwrap()
}

fn battery_energy(net: &PerformanceNetwork) -> f64 {
    match net.distributors()[0].store() {
        EnergyStore::Batteries { modules, .. } => modules.iter().map(|m| m.energy_j).sum(),
        EnergyStore::Fuel { .. } => unreachable!(),
    }
}

fn segment() -> Vec<ControlPoint> {
    [0.0, 0.03, 0.06]
        .iter()
        .enumerate()
        .map(|(i, &mach)| {
            ControlPoint::new(i, Freestream::sea_level(mach).unwrap())
                .with_throttle(0.9)
                .with_dt(30.0)
        })
        .collect()
}

#[test]
fn segment_converges_and_drains_the_battery() {
    let mut net = twin_rotor();
    let before = battery_energy(&net);
    let points = segment();

    let solution = solve_segment(&mut net, &points, &NewtonConfig::default()).unwrap();
    assert_eq!(solution.points.len(), 3);
    assert_eq!(solution.commits.len(), 3);

    for p in &solution.points {
        assert!(p.evaluation.residual_norm() < 1e-6);
        assert!(p.evaluation.total_thrust().x > 0.0);
        assert_eq!(p.evaluation.cache_hits, 1);
    }

    let removed: f64 = solution
        .commits
        .iter()
        .flatten()
        .map(|c| c.energy_removed_j)
        .sum();
    assert!(removed > 0.0);
    assert!((before - battery_energy(&net) - removed).abs() < 1e-6 * before);

    let left = net.assembly("left").unwrap();
    let right = net.assembly("right").unwrap();
    for i in 0..points.len() {
        let l = left.result_at(i).unwrap();
        let r = right.result_at(i).unwrap();
        assert_eq!(l.thrust(), r.thrust());
        // Mirrored placement about the CG gives opposite yawing moments.
        assert!((l.moment.z + r.moment.z).abs() < 1e-9);
    }
}

#[test]
fn converged_point_balances_the_shaft() {
    let mut net = twin_rotor();
    net.append_conditions(1);
    let point = ControlPoint::new(0, Freestream::sea_level(0.0).unwrap());
    let guess = net.initial_guess();

    let solution = solve_control_point(&mut net, &point, &guess, &NewtonConfig::default()).unwrap();
    let report = solution.evaluation.report("left").unwrap();
    let motor = report.result.core.output("motor_torque_nm").unwrap();
    let rotor = report.result.core.output("rotor_torque_nm").unwrap();
    assert!((motor - rotor).abs() < 1e-6);
}

#[test]
fn iteration_cap_reports_convergence_failure() {
    let mut net = twin_rotor();
    net.append_conditions(1);
    let point = ControlPoint::new(0, Freestream::sea_level(0.0).unwrap());
    let config = NewtonConfig {
        max_iterations: 0,
        ..NewtonConfig::default()
    };

    let err = solve_control_point(&mut net, &point, &[0.02], &config).unwrap_err();
    assert!(matches!(err, SolverError::ConvergenceFailure { .. }));
}

#[test]
fn out_of_order_points_are_rejected() {
    let mut net = twin_rotor();
    let mut points = segment();
    points.swap(0, 1);
    assert!(matches!(
        solve_segment(&mut net, &points, &NewtonConfig::default()),
        Err(SolverError::InvalidArg { .. })
    ));
}

#[test]
fn windmilling_rotors_do_not_overfill_a_full_pack() {
    let mut net = twin_rotor();
    let capacity = battery_energy(&net);
    let points = vec![
        ControlPoint::new(0, Freestream::sea_level(0.15).unwrap())
            .with_throttle(0.3)
            .with_dt(60.0),
    ];

    let solution = solve_segment(&mut net, &points, &NewtonConfig::default()).unwrap();
    let point = &solution.points[0];
    assert!(point.evaluation.residual_norm() < 1e-6);
    let draw: f64 = point
        .evaluation
        .reports
        .iter()
        .map(|r| r.result.core.draw.electrical_power_w)
        .sum();
    assert!(draw < 0.0, "rotors should regenerate, drew {draw} W");

    let commit = &solution.commits[0][0];
    assert_eq!(commit.energy_removed_j, 0.0);
    assert!(!commit.shortfall);
    assert_eq!(battery_energy(&net), capacity);
    match net.distributors()[0].store() {
        EnergyStore::Batteries { modules, .. } => {
            assert!(modules.iter().all(|m| m.state_of_charge() <= 1.0));
        }
        EnergyStore::Fuel { .. } => unreachable!(),
    }
}

#[test]
fn idle_point_converges_with_rotors_at_rest() {
    let mut net = twin_rotor();
    let before = battery_energy(&net);
    let points = vec![
        ControlPoint::new(0, Freestream::sea_level(0.0).unwrap())
            .with_throttle(0.0)
            .with_dt(30.0),
    ];

    let solution = solve_segment(&mut net, &points, &NewtonConfig::default()).unwrap();
    let point = &solution.points[0];
    assert_eq!(point.iterations, 0);
    assert_eq!(point.evaluation.total_thrust(), Vector3::zeros());
    assert_eq!(solution.commits[0][0].energy_removed_j, 0.0);
    assert_eq!(battery_energy(&net), before);
}
