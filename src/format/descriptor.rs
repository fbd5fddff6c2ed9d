//! Project descriptor persistence.
//!
//! The descriptor is a YAML file at `<project_dir>/project.yaml` holding
//! every [`Project`] field. Saving accepts any project type; loading
//! dispatches on the stored `project_type` and only reconstructs
//! classification projects. That asymmetry is deliberate: keypoint and
//! panoptic projects can be scaffolded and described, but no annotator
//! exists for them yet.

use std::fs;
use std::path::Path;

use crate::format::ProjectError;
use crate::model::Project;

/// File name of the persisted descriptor inside the project directory.
pub const DESCRIPTOR_FILE: &str = "project.yaml";

impl Project {
    /// Serialize the descriptor to `<project_dir>/project.yaml`.
    ///
    /// Creates the project directory if needed. The descriptor is validated
    /// before writing, so an invalid project never reaches disk.
    pub fn save(&self) -> Result<(), ProjectError> {
        self.validate()?;
        fs::create_dir_all(&self.project_dir)?;

        let yaml = serde_yaml::to_string(self)?;
        let path = self.descriptor_path();
        fs::write(&path, yaml)?;

        log::info!("Saved project '{}' to {:?}", self.name, path);
        Ok(())
    }

    /// Reconstruct a project from the descriptor in `project_dir`.
    ///
    /// The stored `project_type` field decides how the descriptor is
    /// reconstructed. A missing field or an unrecognized value is a
    /// configuration error; `keypoint` and `panoptic` are recognized but
    /// not reconstructible.
    pub fn load(project_dir: &Path) -> Result<Self, ProjectError> {
        let path = project_dir.join(DESCRIPTOR_FILE);
        let text = fs::read_to_string(&path)?;

        // Dispatch on the raw field first so the error can name exactly
        // what the descriptor says, not what serde failed to match.
        let doc: serde_yaml::Value = serde_yaml::from_str(&text)?;
        let project_type = doc
            .get("project_type")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ProjectError::missing_field("project_type"))?;

        if project_type != "classification" {
            return Err(ProjectError::UnsupportedProjectType {
                project_type: project_type.to_string(),
            });
        }

        let project: Project = serde_yaml::from_str(&text)?;
        project.validate()?;

        if project.project_dir != project_dir {
            log::warn!(
                "Descriptor at {:?} records project_dir {:?}; the stored path is used",
                path,
                project.project_dir
            );
        }

        log::info!("Loaded project '{}' from {:?}", project.name, path);
        Ok(project)
    }
}
