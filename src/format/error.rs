//! Error types for project persistence operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while creating, saving, or loading projects.
#[derive(Error, Debug)]
pub enum ProjectError {
    /// I/O error during file operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing or serialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Descriptor or table content violates an invariant
    #[error("Invalid project: {message}")]
    InvalidProject {
        /// Description of the violation
        message: String,
    },

    /// Classification project constructed without a class vocabulary
    #[error("classification projects require at least one class")]
    NoClasses,

    /// Required descriptor field is missing
    #[error("Missing required field: {field}")]
    MissingField {
        /// Name of the missing field
        field: String,
    },

    /// Stored project type cannot be reconstructed by this version
    #[error("Unsupported project type '{project_type}'")]
    UnsupportedProjectType {
        /// The project type string found in the descriptor
        project_type: String,
    },

    /// Annotation table file is malformed
    #[error("Invalid annotation table: {message}")]
    InvalidTable {
        /// Description of the table error
        message: String,
    },

    /// Two table rows reference the same image
    #[error("Duplicate image path in annotation table: {path}")]
    DuplicateImage {
        /// The repeated image path
        path: String,
    },

    /// Row index outside the current table
    #[error("Row {index} out of range (table has {len} rows)")]
    RowOutOfRange {
        /// The requested row index
        index: usize,
        /// Current number of rows
        len: usize,
    },

    /// Label not present in the project's class vocabulary
    #[error("Unknown class '{class}'")]
    UnknownClass {
        /// The rejected label
        class: String,
    },

    /// Data directory referenced at creation does not exist
    #[error("Directory not found: {path:?}")]
    DirectoryNotFound {
        /// The missing directory
        path: PathBuf,
    },
}

impl ProjectError {
    /// Create an invalid project error with a message.
    pub fn invalid_project(message: impl Into<String>) -> Self {
        Self::InvalidProject {
            message: message.into(),
        }
    }

    /// Create a missing field error.
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Create an invalid table error.
    pub fn invalid_table(message: impl Into<String>) -> Self {
        Self::InvalidTable {
            message: message.into(),
        }
    }
}
