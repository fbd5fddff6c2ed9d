//! Data models for annotation projects.

mod project;

pub use project::{ImageType, Project, ProjectType};
