//! Project creation and directory scaffolding.
//!
//! [`ProjectBuilder`] turns a handful of choices (name, image type, project
//! type, data directories, classes) into an on-disk project: it creates the
//! directory layout, optionally copies the raw data into the project,
//! scans the data directories, writes the initial annotation table (for
//! classification) or per-directory annotation subdirectories (keypoint,
//! panoptic), and saves the descriptor.

use std::fs;
use std::path::{Path, PathBuf};

use crate::format::{AnnotationRecord, AnnotationTable, ProjectError};
use crate::model::{ImageType, Project, ProjectType};

/// Builder for creating a new annotation project on disk.
#[derive(Debug, Clone)]
pub struct ProjectBuilder {
    name: String,
    image_type: ImageType,
    project_type: ProjectType,
    data_directories: Vec<PathBuf>,
    classes: Vec<String>,
    copy_data: bool,
}

impl ProjectBuilder {
    /// Start a builder for a project named `name`.
    ///
    /// Defaults to a multichannel classification project with no data
    /// directories and no classes.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image_type: ImageType::Multichannel,
            project_type: ProjectType::Classification,
            data_directories: Vec::new(),
            classes: Vec::new(),
            copy_data: false,
        }
    }

    /// Set the image type.
    pub fn image_type(mut self, image_type: ImageType) -> Self {
        self.image_type = image_type;
        self
    }

    /// Set the project type.
    pub fn project_type(mut self, project_type: ProjectType) -> Self {
        self.project_type = project_type;
        self
    }

    /// Add a source directory of raw images.
    pub fn data_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_directories.push(dir.into());
        self
    }

    /// Add a class to the vocabulary.
    pub fn class(mut self, name: impl Into<String>) -> Self {
        self.classes.push(name.into());
        self
    }

    /// Replace the class vocabulary.
    pub fn classes<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.classes = names.into_iter().map(Into::into).collect();
        self
    }

    /// Copy raw data into `<project_dir>/data` instead of referencing the
    /// source directories in place.
    pub fn copy_data(mut self, copy: bool) -> Self {
        self.copy_data = copy;
        self
    }

    /// Create the project under `<root>/<name>` and write its descriptor.
    pub fn create(self, root: &Path) -> Result<Project, ProjectError> {
        let project_dir = root.join(&self.name);
        let mut project = Project::new(
            self.name,
            self.image_type,
            self.project_type,
            &project_dir,
            self.classes,
        )?;

        for dir in &self.data_directories {
            if !dir.is_dir() {
                return Err(ProjectError::DirectoryNotFound { path: dir.clone() });
            }
        }

        log::info!(
            "Creating {} project '{}' at {:?}",
            project.project_type.as_str(),
            project.name,
            project_dir
        );
        let annotations_dir = project.annotations_dir();
        fs::create_dir_all(&annotations_dir)?;

        project.data_directories = if self.copy_data {
            copy_data_directories(&self.data_directories, &project_dir)?
        } else {
            self.data_directories
        };

        match project.project_type {
            ProjectType::Classification => {
                let table = scan_data_files(&project.data_directories)?;
                let table_path = annotations_dir.join(crate::format::TABLE_FILE);
                table.write(&table_path)?;
                project.annotation_table = Some(table_path);
                project.annotation_directories = vec![annotations_dir];
            }
            ProjectType::Keypoint | ProjectType::Panoptic => {
                // One annotation subdirectory per data directory.
                let mut annotation_dirs = Vec::new();
                for dir in &project.data_directories {
                    let sub = annotations_dir.join(sanitize_dir_name(dir));
                    fs::create_dir_all(&sub)?;
                    annotation_dirs.push(sub);
                }
                project.annotation_directories = annotation_dirs;
            }
        }

        project.save()?;
        Ok(project)
    }
}

/// Flatten a path into a single directory name: path separators and drive
/// colons become underscores, leading/trailing underscores are trimmed.
pub fn sanitize_dir_name(path: &Path) -> String {
    path.to_string_lossy()
        .replace([':', '\\', '/'], "_")
        .trim_matches('_')
        .to_string()
}

/// Copy each data directory into `<project_dir>/data/<sanitized name>` and
/// return the new directory list. Existing copies are kept as-is.
fn copy_data_directories(
    sources: &[PathBuf],
    project_dir: &Path,
) -> Result<Vec<PathBuf>, ProjectError> {
    let data_root = project_dir.join("data");
    fs::create_dir_all(&data_root)?;

    let mut copied = Vec::new();
    for src in sources {
        let dest = data_root.join(sanitize_dir_name(src));
        if dest.exists() {
            log::warn!("Skipping copy of {:?}; {:?} already exists", src, dest);
        } else {
            copy_tree(src, &dest)?;
            log::info!("Copied {:?} into {:?}", src, dest);
        }
        copied.push(dest);
    }
    Ok(copied)
}

fn copy_tree(src: &Path, dest: &Path) -> Result<(), ProjectError> {
    fs::create_dir_all(dest)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let target = dest.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_tree(&entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

/// Scan data directories for regular files and build the initial, fully
/// unlabeled table. Files are sorted within each directory so a fresh
/// project has a deterministic row order.
fn scan_data_files(data_directories: &[PathBuf]) -> Result<AnnotationTable, ProjectError> {
    let mut records = Vec::new();
    for dir in data_directories {
        let mut files = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                files.push(entry.path());
            }
        }
        files.sort();
        records.extend(
            files
                .into_iter()
                .map(|p| AnnotationRecord::unlabeled(p.to_string_lossy().into_owned())),
        );
    }
    log::info!("Scanned {} data files", records.len());
    AnnotationTable::from_records(records)
}
