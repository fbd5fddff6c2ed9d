//! Contract with the hosting image viewer.
//!
//! The viewer is an external collaborator: it renders images and draws
//! overlays, and this crate only tells it what to show. Hosts implement
//! [`ImageViewer`]; the session produces [`DisplayRecord`]s describing the
//! current row.

use std::path::{Path, PathBuf};

/// Viewer operations consumed by the annotation session.
///
/// Implemented by the hosting application, never by this crate.
pub trait ImageViewer {
    /// Error type of the hosting viewer.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Display the image at `path`, replacing what is currently shown.
    fn open(&mut self, path: &Path) -> Result<(), Self::Error>;

    /// Overlay a label annotation on the currently displayed image.
    fn add_shapes(&mut self, overlay: &LabelOverlay) -> Result<(), Self::Error>;
}

/// Label overlay the viewer should draw over the current image.
///
/// Geometry is left to the viewer, which knows the displayed image's
/// dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelOverlay {
    /// Class name to render.
    pub class: String,
}

impl LabelOverlay {
    /// Create an overlay for a class name.
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
        }
    }
}

/// What the viewer should show for one annotation row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRecord {
    /// Image to open.
    pub image_path: PathBuf,
    /// Assigned class, if the row is labeled.
    pub class: Option<String>,
}

impl DisplayRecord {
    /// Overlay for this record, if it is labeled.
    pub fn overlay(&self) -> Option<LabelOverlay> {
        self.class.as_deref().map(LabelOverlay::new)
    }
}
