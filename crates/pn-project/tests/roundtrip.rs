use pn_assembly::{AssemblyError, ElectricRotorSlots};
use pn_network::{BatteryModule, BusVoltage, SplitPolicy};
use pn_project::*;
use pn_stages::{Motor, SpeedController};

fn project_with(variant: VariantDef) -> Project {
    Project {
        version: 1,
        name: "Single rotor".to_string(),
        vehicle: VehicleDef {
            center_of_gravity: [0.0, 0.0, 0.0],
            distributors: vec![DistributorDef {
                tag: "bus".to_string(),
                source: SourceDef::Batteries {
                    modules: vec![BatteryModule::full("pack", 1.0e6, 40.0, 50.0, 0.02, 5000.0)],
                    voltage: BusVoltage::FromSource,
                },
                propulsor_split: SplitPolicy::Equal,
                source_split: SplitPolicy::Equal,
                propulsors: vec![PropulsorDef {
                    tag: "rotor".to_string(),
                    origin: [0.0, 0.0, 0.5],
                    thrust_axis: [0.0, 0.0, -1.0],
                    identical: false,
                    active: true,
                    variant,
                }],
            }],
        },
        mission: MissionDef {
            solver: SolverDef::default(),
            points: vec![PointDef {
                temperature_k: 288.15,
                pressure_pa: 101_325.0,
                mach: 0.0,
                gravity_mps2: 9.806_65,
                throttle: 0.5,
                pitch_command: 0.0,
                dt_s: 10.0,
            }],
        },
    }
}

fn rotorless() -> VariantDef {
    VariantDef::ElectricRotor(ElectricRotorSlots {
        esc: Some(SpeedController::new("esc", 0.95).unwrap()),
        motor: Some(Motor::new("motor", 40.0, 0.05, 1.0).unwrap()),
        rotor: None,
        initial_power_coefficient: None,
    })
}

#[test]
fn roundtrip_yaml_keeps_the_document() {
    let project = project_with(rotorless());
    let path = std::env::temp_dir().join("pn_project_roundtrip.yaml");

    save_yaml(&path, &project).unwrap();
    let loaded = load_yaml(&path).unwrap();

    assert_eq!(
        serde_yaml::to_string(&project).unwrap(),
        serde_yaml::to_string(&loaded).unwrap()
    );
}

#[test]
fn missing_stage_table_is_named_at_build() {
    let project = project_with(rotorless());
    validate_project(&project).unwrap();

    match build_network(&project) {
        Err(ProjectError::Assembly(AssemblyError::Configuration { what, .. })) => {
            assert!(what.contains("rotor"), "{what}");
        }
        other => panic!("expected a configuration error, got {other:?}"),
    }
}

#[test]
fn duplicate_tags_fail_validation() {
    let mut project = project_with(rotorless());
    project.vehicle.distributors[0].propulsors[0].tag = "bus".to_string();
    assert!(matches!(
        validate_project(&project),
        Err(ValidationError::DuplicateTag { .. })
    ));
}

#[test]
fn out_of_range_throttle_fails_validation() {
    let mut project = project_with(rotorless());
    project.mission.points[0].throttle = 1.5;
    assert!(matches!(
        validate_project(&project),
        Err(ValidationError::InvalidValue { .. })
    ));
}

#[test]
fn future_version_is_rejected() {
    let mut project = project_with(rotorless());
    project.version = LATEST_VERSION + 1;
    assert!(matches!(
        validate_project(&project),
        Err(ValidationError::UnsupportedVersion { .. })
    ));
}

#[test]
fn defaults_fill_in_omitted_fields() {
    let project = from_yaml_str(
        r#"
version: 1
name: Minimal
vehicle:
  distributors:
    - tag: line
      source:
        type: fuel
        tanks: [{ name: t, capacity_kg: 10.0, mass_kg: 10.0, max_flow_kgps: 1.0 }]
      propulsors:
        - tag: jet
          variant: turbojet
mission:
  points:
    - mach: 0.5
"#,
    )
    .unwrap();
    let p = &project.vehicle.distributors[0].propulsors[0];
    assert_eq!(p.thrust_axis, [1.0, 0.0, 0.0]);
    assert!(p.active);
    assert!(!p.identical);
    assert_eq!(project.mission.points[0].throttle, 1.0);
    assert_eq!(project.mission.solver.max_iterations, 50);
    assert!(matches!(
        build_network(&project),
        Err(ProjectError::Assembly(AssemblyError::Configuration { .. }))
    ));
}
