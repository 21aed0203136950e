//! wf-project: wind farm project files and their validation.
//!
//! A project names its turbine types, places turbines, and fixes the wind,
//! flow and wake-model settings. [`load_project`] reads YAML or JSON by file
//! extension; [`build_flow_field`] turns a validated project into a ready
//! [`wf_flow::FlowField`].

pub mod build;
pub mod schema;
pub mod validate;

pub use build::{build_config, build_flow_field, build_turbine_map, build_wind_map};
pub use schema::*;
pub use validate::{LATEST_VERSION, ValidationError, validate_project};

use std::path::Path;

use tracing::info;

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Build error: {what}")]
    Build { what: String },

    #[error("Unsupported project format: {what}")]
    UnsupportedFormat { what: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Turbine error: {0}")]
    Turbine(#[from] wf_turbine::TurbineError),

    #[error("Wake model error: {0}")]
    Wake(#[from] wf_wake::WakeError),

    #[error("Flow field error: {0}")]
    Flow(#[from] wf_flow::FlowError),

    #[error("Core error: {0}")]
    Core(#[from] wf_core::WfError),
}

/// Load a project, choosing the parser from the file extension.
pub fn load_project(path: &Path) -> ProjectResult<Project> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("yaml" | "yml") => load_yaml(path),
        Some("json") => load_json(path),
        other => Err(ProjectError::UnsupportedFormat {
            what: format!(
                "{} (extension {:?}, expected .yaml, .yml or .json)",
                path.display(),
                other
            ),
        }),
    }
}

pub fn load_yaml(path: &Path) -> ProjectResult<Project> {
    let content = std::fs::read_to_string(path)?;
    let project = from_yaml_str(&content)?;
    info!(path = %path.display(), name = %project.name, turbines = project.turbines.len(), "project loaded");
    Ok(project)
}

pub fn from_yaml_str(content: &str) -> ProjectResult<Project> {
    let project: Project = serde_yaml::from_str(content)?;
    validate_project(&project)?;
    Ok(project)
}

pub fn save_yaml(path: &Path, project: &Project) -> ProjectResult<()> {
    validate_project(project)?;
    let content = serde_yaml::to_string(project)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &Path) -> ProjectResult<Project> {
    let content = std::fs::read_to_string(path)?;
    let project: Project = serde_json::from_str(&content)?;
    validate_project(&project)?;
    info!(path = %path.display(), name = %project.name, turbines = project.turbines.len(), "project loaded");
    Ok(project)
}

pub fn save_json(path: &Path, project: &Project) -> ProjectResult<()> {
    validate_project(project)?;
    let content = serde_json::to_string_pretty(project)?;
    std::fs::write(path, content)?;
    Ok(())
}
