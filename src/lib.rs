//! Data layer for image annotation projects.
//!
//! An annotation project is a directory tree pairing image files with
//! human-assigned labels. This crate owns the project descriptor and its
//! persistence format, the classification label table, the session cursor
//! used to step through images, and project scaffolding. Rendering and
//! widgets stay in the hosting viewer, reached through the
//! [`viewer::ImageViewer`] contract.
//!
//! ```rust,ignore
//! use annoproj::{AnnotationSession, Project, ProjectBuilder};
//!
//! let project = ProjectBuilder::new("20260830_project")
//!     .data_directory("/data/plates/run_1")
//!     .classes(["worm", "egg", "error"])
//!     .create(std::path::Path::new("/projects"))?;
//!
//! let mut session = AnnotationSession::open(project)?;
//! session.assign_class("worm")?;
//! ```

pub mod create;
pub mod format;
pub mod model;
pub mod session;
pub mod viewer;

pub use create::ProjectBuilder;
pub use format::{AnnotationRecord, AnnotationTable, ProjectError};
pub use model::{ImageType, Project, ProjectType};
pub use session::AnnotationSession;
pub use viewer::{DisplayRecord, ImageViewer, LabelOverlay};
