//! Project validation logic.

use crate::schema::{MissionDef, PointDef, Project, PropulsorDef, SourceDef};
use std::collections::HashSet;

pub const LATEST_VERSION: u32 = 1;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Duplicate tag: {tag} in {context}")]
    DuplicateTag { tag: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Empty: {context}")]
    Empty { context: String },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

fn invalid(field: impl Into<String>, value: impl ToString, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.into(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn finite3(v: &[f64; 3]) -> bool {
    v.iter().all(|x| x.is_finite())
}

pub fn validate_project(project: &Project) -> Result<(), ValidationError> {
    if project.version == 0 || project.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: project.version,
        });
    }
    if !finite3(&project.vehicle.center_of_gravity) {
        return Err(invalid(
            "vehicle.center_of_gravity",
            format!("{:?}", project.vehicle.center_of_gravity),
            "must be finite",
        ));
    }
    if project.vehicle.distributors.is_empty() {
        return Err(ValidationError::Empty {
            context: "vehicle.distributors".to_string(),
        });
    }

    let mut tags = HashSet::new();
    for d in &project.vehicle.distributors {
        if !tags.insert(d.tag.as_str()) {
            return Err(ValidationError::DuplicateTag {
                tag: d.tag.clone(),
                context: "vehicle".to_string(),
            });
        }
        let sources = match &d.source {
            SourceDef::Batteries { modules, .. } => modules.len(),
            SourceDef::Fuel { tanks } => tanks.len(),
        };
        if sources == 0 {
            return Err(ValidationError::Empty {
                context: format!("distributor '{}' sources", d.tag),
            });
        }
        for p in &d.propulsors {
            if !tags.insert(p.tag.as_str()) {
                return Err(ValidationError::DuplicateTag {
                    tag: p.tag.clone(),
                    context: format!("distributor '{}'", d.tag),
                });
            }
            validate_propulsor(p)?;
        }
    }

    validate_mission(&project.mission)
}

fn validate_propulsor(p: &PropulsorDef) -> Result<(), ValidationError> {
    if !finite3(&p.origin) {
        return Err(invalid(
            format!("{}.origin", p.tag),
            format!("{:?}", p.origin),
            "must be finite",
        ));
    }
    let axis_norm = p.thrust_axis.iter().map(|x| x * x).sum::<f64>().sqrt();
    if !finite3(&p.thrust_axis) || axis_norm == 0.0 {
        return Err(invalid(
            format!("{}.thrust_axis", p.tag),
            format!("{:?}", p.thrust_axis),
            "must be a finite non-zero vector",
        ));
    }
    Ok(())
}

fn validate_mission(mission: &MissionDef) -> Result<(), ValidationError> {
    if mission.solver.max_iterations == 0 {
        return Err(invalid("mission.solver.max_iterations", 0, "must be positive"));
    }
    if !(mission.solver.abs_tol > 0.0) {
        return Err(invalid(
            "mission.solver.abs_tol",
            mission.solver.abs_tol,
            "must be positive",
        ));
    }
    for (i, point) in mission.points.iter().enumerate() {
        validate_point(i, point)?;
    }
    Ok(())
}

fn validate_point(i: usize, p: &PointDef) -> Result<(), ValidationError> {
    let field = |name: &str| format!("mission.points[{i}].{name}");
    if !(p.temperature_k > 0.0) {
        return Err(invalid(field("temperature_k"), p.temperature_k, "must be positive"));
    }
    if !(p.pressure_pa > 0.0) {
        return Err(invalid(field("pressure_pa"), p.pressure_pa, "must be positive"));
    }
    if !(p.mach >= 0.0) {
        return Err(invalid(field("mach"), p.mach, "must be non-negative"));
    }
    if !(0.0..=1.0).contains(&p.throttle) {
        return Err(invalid(field("throttle"), p.throttle, "must lie in [0, 1]"));
    }
    if !(p.dt_s >= 0.0) {
        return Err(invalid(field("dt_s"), p.dt_s, "must be non-negative"));
    }
    if !p.pitch_command.is_finite() {
        return Err(invalid(field("pitch_command"), p.pitch_command, "must be finite"));
    }
    Ok(())
}
