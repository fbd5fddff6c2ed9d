//! Directory-convention persistence for annotation projects.
//!
//! On disk a project looks like:
//!
//! ```text
//! <project_dir>/
//!   project.yaml            # Project descriptor
//!   annotations/
//!     annotations.csv       # classification label table
//!     <per-data-dir dirs>/  # keypoint/panoptic label data
//!   data/                   # only when data was copied at creation
//! ```

mod descriptor;
mod error;
mod table;

pub use descriptor::DESCRIPTOR_FILE;
pub use error::ProjectError;
pub use table::{AnnotationRecord, AnnotationTable, TABLE_FILE};
