//! Integration tests chaining stages along a turbojet gas path and an
//! electric drive.

use pn_flow::{FlowState, Freestream};
use pn_stages::{
    CoefficientRotorModel, Combustor, Compressor, ConversionStage, DriveCommand, ExpansionNozzle,
    Motor, Ram, Rotor, RotorAero, RotorGeometry, ShaftLoad, SpeedController, StageEnv, Turbine,
};
use pn_core::units::volts;

#[test]
fn turbojet_core_balances_spool_work() {
    let fs = Freestream::sea_level(0.5).unwrap();
    let env = StageEnv::new(&fs);
    let start = FlowState::from_freestream(&fs).unwrap();

    let ram = Ram::new("ram").evaluate(&start, &env).unwrap();
    let hpc = Compressor::new("hpc", 10.0, 0.9)
        .unwrap()
        .evaluate(&ram.state, &env)
        .unwrap();
    let burner = Combustor::new("burner", 0.95, 0.99, 1500.0, 43.0e6)
        .unwrap()
        .evaluate(&hpc.state, &env)
        .unwrap();

    let load = ShaftLoad {
        compressor_work: hpc.side.specific_work,
        fuel_to_air: burner.side.fuel_to_air,
        ..ShaftLoad::default()
    };
    let hpt = Turbine::new("hpt", 0.93, 0.99)
        .unwrap()
        .evaluate(&burner.state, &env.with_shaft_load(load))
        .unwrap();
    let nozzle = ExpansionNozzle::new("core_nozzle", 0.99, 1.0)
        .unwrap()
        .evaluate(&hpt.state, &env)
        .unwrap();

    // Turbine work delivered to the shaft equals compressor demand
    let delivered = -hpt.side.specific_work * (1.0 + load.fuel_to_air) * 0.99;
    assert!((delivered - hpc.side.specific_work).abs() < 1e-6);

    assert!(nozzle.side.choked, "core nozzle should choke at this pressure ratio");
    assert!(nozzle.side.exit_velocity_mps > fs.velocity_mps);

    let specific_thrust =
        (1.0 + load.fuel_to_air) * nozzle.side.exit_velocity_mps - fs.velocity_mps;
    assert!(specific_thrust > 0.0);
}

#[test]
fn electric_drive_chain_reaches_rotor() {
    let fs = Freestream::sea_level(0.05).unwrap();
    let env = StageEnv::new(&fs).with_throttle(0.8);
    let bus = FlowState::from_freestream(&fs).unwrap().with_voltage(volts(48.0));

    let esc = SpeedController::new("esc", 0.95).unwrap();
    let motor = Motor::new("motor", 400.0 * std::f64::consts::PI / 30.0, 0.04, 1.0).unwrap();
    let rotor = Rotor::new(
        "prop",
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
    .unwrap();

    let after_esc = esc.evaluate(&bus, &env).unwrap();
    let omega = 600.0;
    let drive = env.with_drive(DriveCommand::AngularVelocity(omega));
    let after_motor = motor.evaluate(&after_esc.state, &drive).unwrap();
    let after_rotor = rotor.evaluate(&after_motor.state, &drive).unwrap();

    assert!((after_esc.state.voltage().value - 38.4).abs() < 1e-12);
    assert!(after_rotor.side.thrust_n > 0.0);
    assert_eq!(after_rotor.state.voltage(), after_esc.state.voltage());
    // The rotor keeps the electrical quantities set upstream
    assert_eq!(after_rotor.state.current(), after_motor.state.current());
}
