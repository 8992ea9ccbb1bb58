use pn_core::{AssemblyId, DistributorId};
use pn_network::Role;
use pn_project::{build_network, control_points, load_yaml};
use pn_solver::solve_segment;
use std::path::{Path, PathBuf};

fn demo(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../demos")
        .join(name)
}

#[test]
fn demos_load_and_build() {
    for name in ["twin_turbofan.yaml", "electric_twin_rotor.yaml"] {
        let project = load_yaml(&demo(name)).unwrap_or_else(|e| panic!("Failed to load {name}: {e}"));
        let network =
            build_network(&project).unwrap_or_else(|e| panic!("Failed to build {name}: {e}"));
        assert_eq!(network.assemblies().count(), 2);
        assert_eq!(control_points(&project.mission).unwrap().len(), 3);
    }
}

#[test]
fn twin_turbofan_engines_share_a_fingerprint() {
    let project = load_yaml(&demo("twin_turbofan.yaml")).unwrap();
    let network = build_network(&project).unwrap();
    let d = DistributorId::from_index(0);
    assert_eq!(
        network.role(d, AssemblyId::from_index(1)),
        Some(Role::Peer {
            canonical: AssemblyId::from_index(0)
        })
    );
    assert!(network.unknowns().is_empty());
}

#[test]
fn twin_turbofan_mission_burns_fuel() {
    let project = load_yaml(&demo("twin_turbofan.yaml")).unwrap();
    let mut network = build_network(&project).unwrap();
    let points = control_points(&project.mission).unwrap();

    let solution = solve_segment(
        &mut network,
        &points,
        &project.mission.solver.newton_config(),
    )
    .unwrap();
    let burned: f64 = solution
        .commits
        .iter()
        .flatten()
        .map(|c| c.fuel_removed_kg)
        .sum();
    assert!(burned > 0.0);
    for p in &solution.points {
        assert!(p.evaluation.total_thrust().x > 0.0);
        // Symmetric engines about the CG: no net yawing moment.
        assert!(p.evaluation.total_moment().z.abs() < 1e-6 * p.evaluation.total_thrust().x);
    }
}

#[test]
fn electric_mission_converges() {
    let project = load_yaml(&demo("electric_twin_rotor.yaml")).unwrap();
    let mut network = build_network(&project).unwrap();
    let points = control_points(&project.mission).unwrap();

    let solution = solve_segment(
        &mut network,
        &points,
        &project.mission.solver.newton_config(),
    )
    .unwrap();
    for p in &solution.points {
        assert_eq!(p.x.len(), 1);
        assert!(p.evaluation.residual_norm() < project.mission.solver.abs_tol);
    }
}
