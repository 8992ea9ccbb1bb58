use clap::{Parser, Subcommand};
use pn_core::{AssemblyId, DistributorId};
use pn_network::Role;
use pn_project::{ProjectError, build_network, control_points, load_yaml};
use pn_solver::{SolverError, solve_segment};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error("{0}")]
    Project(#[from] ProjectError),

    #[error("{0}")]
    Solver(#[from] SolverError),
}

type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "pn-cli")]
#[command(about = "Propulsion network performance CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a project file and build its network
    Validate {
        /// Path to the project YAML file
        project_path: PathBuf,
    },
    /// Print structural fingerprints and cache roles of every propulsor
    Fingerprint {
        /// Path to the project YAML file
        project_path: PathBuf,
    },
    /// Solve the mission segment and commit energy use
    Run {
        /// Path to the project YAML file
        project_path: PathBuf,
        /// Override the solver iteration cap
        #[arg(long)]
        max_iterations: Option<usize>,
    },
}

fn main() -> CliResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { project_path } => cmd_validate(&project_path),
        Commands::Fingerprint { project_path } => cmd_fingerprint(&project_path),
        Commands::Run {
            project_path,
            max_iterations,
        } => cmd_run(&project_path, max_iterations),
    }
}

fn cmd_validate(project_path: &Path) -> CliResult<()> {
    println!("Validating project: {}", project_path.display());
    let project = load_yaml(project_path)?;
    let network = build_network(&project)?;
    control_points(&project.mission)?;
    println!("✓ Project is valid");
    println!(
        "  Distributors: {}, propulsors: {}, unknowns: {}, control points: {}",
        network.distributors().len(),
        network.assemblies().count(),
        network.unknowns().len(),
        project.mission.points.len()
    );
    Ok(())
}

fn cmd_fingerprint(project_path: &Path) -> CliResult<()> {
    let project = load_yaml(project_path)?;
    let network = build_network(&project)?;

    for (d_idx, distributor) in network.distributors().iter().enumerate() {
        println!("{}:", distributor.tag());
        let d = DistributorId::from_usize(d_idx);
        for (p_idx, assembly) in distributor.propulsors().iter().enumerate() {
            let p = AssemblyId::from_usize(p_idx);
            let role = match network.role(d, p) {
                Some(Role::Unique) => "unique".to_string(),
                Some(Role::Canonical) => "canonical".to_string(),
                Some(Role::Peer { canonical }) => {
                    let source = distributor
                        .propulsors()
                        .get(canonical.as_usize())
                        .map_or("?", |c| c.tag());
                    format!("peer of {source}")
                }
                Some(Role::Inactive) => "inactive".to_string(),
                None => "unknown".to_string(),
            };
            println!(
                "  {:<16} {:<30} {}  [{}]",
                assembly.tag(),
                assembly.variant().name(),
                network.fingerprint(d, p).unwrap_or("-"),
                role
            );
        }
    }
    Ok(())
}

fn cmd_run(project_path: &Path, max_iterations: Option<usize>) -> CliResult<()> {
    let start = Instant::now();
    let project = load_yaml(project_path)?;
    let mut network = build_network(&project)?;
    let points = control_points(&project.mission)?;

    let mut config = project.mission.solver.newton_config();
    if let Some(n) = max_iterations {
        config.max_iterations = n;
    }

    println!(
        "Solving {} control points for '{}' ({} unknowns)",
        points.len(),
        network.name(),
        network.unknowns().len()
    );
    let solution = solve_segment(&mut network, &points, &config)?;
    info!(
        network = network.name(),
        points = solution.points.len(),
        newton_iterations = solution.points.iter().map(|p| p.iterations).sum::<usize>(),
        "segment solved"
    );

    println!(
        "{:>5} {:>8} {:>14} {:>14} {:>10} {:>11}",
        "point", "mach", "thrust [N]", "power [W]", "residual", "iterations"
    );
    for (point, sol) in points.iter().zip(&solution.points) {
        println!(
            "{:>5} {:>8.3} {:>14.1} {:>14.1} {:>10.2e} {:>11}",
            point.index,
            point.freestream.mach,
            sol.evaluation.net_thrust().value,
            sol.evaluation.total_power().value,
            sol.evaluation.residual_norm(),
            sol.iterations
        );
    }

    println!("\nEnergy use:");
    for commits in &solution.commits {
        for c in commits {
            let flag = if c.shortfall { " (shortfall)" } else { "" };
            println!(
                "  point {:>3} {:<16} {:>12.1} J {:>10.3} kg{}",
                c.control_point, c.distributor, c.energy_removed_j, c.fuel_removed_kg, flag
            );
        }
    }
    let elapsed = start.elapsed().as_secs_f64();
    info!(elapsed_s = elapsed, "run finished");
    println!("\nTotal: {elapsed:.3}s");
    Ok(())
}
