//! pn-project: vehicle and mission description files.

pub mod build;
pub mod schema;
pub mod validate;

pub use build::{build_network, build_propulsor, control_points};
pub use schema::*;
pub use validate::{LATEST_VERSION, ValidationError, validate_project};

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Assembly error: {0}")]
    Assembly(#[from] pn_assembly::AssemblyError),

    #[error("Network error: {0}")]
    Network(#[from] pn_network::NetworkError),

    #[error("Freestream error: {0}")]
    Flow(#[from] pn_flow::FlowError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub fn load_yaml(path: &std::path::Path) -> ProjectResult<Project> {
    let content = std::fs::read_to_string(path)?;
    from_yaml_str(&content)
}

pub fn from_yaml_str(content: &str) -> ProjectResult<Project> {
    let project: Project = serde_yaml::from_str(content)?;
    validate_project(&project)?;
    Ok(project)
}

pub fn save_yaml(path: &std::path::Path, project: &Project) -> ProjectResult<()> {
    validate_project(project)?;
    let content = serde_yaml::to_string(project)?;
    std::fs::write(path, content)?;
    Ok(())
}
