//! Project descriptor data model.
//!
//! A `Project` describes one annotation task: where the raw images live,
//! where the label data goes, and (for classification projects) the class
//! vocabulary. The descriptor is persisted as YAML at
//! `<project_dir>/project.yaml` (see [`crate::format`]).

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::format::ProjectError;

/// Kind of image data a project annotates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageType {
    /// Multichannel images (e.g. RGB, RGBA).
    Multichannel,
    /// Z-stacks (multiple z-slices of the same scene).
    Zstack,
    /// Time series (multiple time points of the same scene).
    TimeSeries,
}

impl ImageType {
    /// Identifier used in the persisted descriptor.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Multichannel => "multichannel",
            Self::Zstack => "zstack",
            Self::TimeSeries => "time_series",
        }
    }
}

/// Kind of annotation a project collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectType {
    /// One class label per image.
    Classification,
    /// Keypoint annotations, stored per data directory.
    Keypoint,
    /// Panoptic segmentation annotations, stored per data directory.
    Panoptic,
}

impl ProjectType {
    /// Identifier used in the persisted descriptor.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Classification => "classification",
            Self::Keypoint => "keypoint",
            Self::Panoptic => "panoptic",
        }
    }
}

/// Descriptor of one annotation project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Human-chosen project name.
    pub name: String,
    /// Kind of image data being annotated.
    pub image_type: ImageType,
    /// Kind of annotation collected.
    pub project_type: ProjectType,
    /// Source directories for raw images, in order.
    pub data_directories: Vec<PathBuf>,
    /// Directories holding label data, in order.
    pub annotation_directories: Vec<PathBuf>,
    /// Root directory; the descriptor and all label data live under it.
    pub project_dir: PathBuf,
    /// Class vocabulary; non-empty for classification projects.
    #[serde(default)]
    pub classes: Vec<String>,
    /// Images excluded from annotation.
    #[serde(default)]
    pub ignored_images: Vec<PathBuf>,
    /// Path of the classification label table, if one exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotation_table: Option<PathBuf>,
}

impl Project {
    /// Create a new project descriptor.
    ///
    /// Directory lists start empty; creation-time scaffolding fills them in
    /// (see [`crate::create::ProjectBuilder`]).
    ///
    /// Fails when the name is empty, or when a classification project is
    /// given an empty class vocabulary.
    pub fn new(
        name: impl Into<String>,
        image_type: ImageType,
        project_type: ProjectType,
        project_dir: impl Into<PathBuf>,
        classes: Vec<String>,
    ) -> Result<Self, ProjectError> {
        let project = Self {
            name: name.into(),
            image_type,
            project_type,
            data_directories: Vec::new(),
            annotation_directories: Vec::new(),
            project_dir: project_dir.into(),
            classes,
            ignored_images: Vec::new(),
            annotation_table: None,
        };
        project.validate()?;
        Ok(project)
    }

    /// Check descriptor invariants.
    pub fn validate(&self) -> Result<(), ProjectError> {
        if self.name.trim().is_empty() {
            return Err(ProjectError::invalid_project("project name must not be empty"));
        }
        if self.project_type == ProjectType::Classification && self.classes.is_empty() {
            return Err(ProjectError::NoClasses);
        }
        Ok(())
    }

    /// Whether this is a classification project.
    pub fn is_classification(&self) -> bool {
        self.project_type == ProjectType::Classification
    }

    /// Path of the persisted descriptor file.
    pub fn descriptor_path(&self) -> PathBuf {
        self.project_dir.join(crate::format::DESCRIPTOR_FILE)
    }

    /// Directory holding label data, `<project_dir>/annotations`.
    pub fn annotations_dir(&self) -> PathBuf {
        self.project_dir.join("annotations")
    }

    /// Path of the classification label table, explicit or conventional.
    pub fn annotation_table_path(&self) -> PathBuf {
        self.annotation_table
            .clone()
            .unwrap_or_else(|| self.annotations_dir().join(crate::format::TABLE_FILE))
    }

    /// Whether the vocabulary contains `class`.
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Record an image as excluded from annotation.
    pub fn record_ignored(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        if !self.ignored_images.contains(&path) {
            self.ignored_images.push(path);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    fn classes(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_new_classification_project() {
        let project = Project::new(
            "test_project",
            ImageType::Multichannel,
            ProjectType::Classification,
            "/tmp/test_project",
            classes(&["worm", "egg", "error"]),
        )
        .unwrap();

        assert_eq!(project.name, "test_project");
        assert_eq!(project.classes.len(), 3);
        assert!(project.is_classification());
        assert!(project.data_directories.is_empty());
    }

    #[test]
    fn test_classification_requires_classes() {
        let result = Project::new(
            "empty",
            ImageType::Multichannel,
            ProjectType::Classification,
            "/tmp/empty",
            Vec::new(),
        );
        assert!(matches!(result, Err(ProjectError::NoClasses)));
    }

    #[test]
    fn test_keypoint_allows_empty_classes() {
        let project = Project::new(
            "kp",
            ImageType::Zstack,
            ProjectType::Keypoint,
            "/tmp/kp",
            Vec::new(),
        );
        assert!(project.is_ok());
    }

    #[test]
    fn test_empty_name_rejected() {
        let result = Project::new(
            "  ",
            ImageType::Multichannel,
            ProjectType::Classification,
            "/tmp/unnamed",
            classes(&["a"]),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_conventional_table_path() {
        let project = Project::new(
            "p",
            ImageType::TimeSeries,
            ProjectType::Classification,
            "/data/p",
            classes(&["a"]),
        )
        .unwrap();

        assert_eq!(
            project.annotation_table_path(),
            Path::new("/data/p/annotations/annotations.csv")
        );
    }

    #[test]
    fn test_record_ignored_deduplicates() {
        let mut project = Project::new(
            "p",
            ImageType::Multichannel,
            ProjectType::Classification,
            "/data/p",
            classes(&["a"]),
        )
        .unwrap();

        project.record_ignored("/data/img1.tif");
        project.record_ignored("/data/img1.tif");
        assert_eq!(project.ignored_images.len(), 1);
    }
}
