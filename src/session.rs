//! Classification annotation session.
//!
//! A session is a cursor over the row-ordered annotation table. Every
//! mutation (assign a class, ignore an image) rewrites the whole table to
//! disk immediately; there is no batching and no transaction. The cursor
//! resumes one row past the last labeled row, so reopening a half-finished
//! project continues where the annotator left off.

use std::path::PathBuf;

use crate::format::{AnnotationTable, ProjectError};
use crate::model::Project;
use crate::viewer::{DisplayRecord, ImageViewer};

/// Annotation session over one classification project.
#[derive(Debug)]
pub struct AnnotationSession {
    project: Project,
    table: AnnotationTable,
    table_path: PathBuf,
    cursor: usize,
}

impl AnnotationSession {
    /// Open a session by reading the project's annotation table.
    ///
    /// Fails for non-classification projects and for unreadable tables.
    pub fn open(project: Project) -> Result<Self, ProjectError> {
        if !project.is_classification() {
            return Err(ProjectError::invalid_project(format!(
                "cannot annotate a {} project",
                project.project_type.as_str()
            )));
        }

        let table_path = project.annotation_table_path();
        let table = AnnotationTable::read(&table_path)?;
        let cursor = resume_index(&table);

        log::info!(
            "Opened session for '{}': {} rows, {} labeled, resuming at row {}",
            project.name,
            table.len(),
            table.labeled_count(),
            cursor
        );

        Ok(Self {
            project,
            table,
            table_path,
            cursor,
        })
    }

    /// The project this session annotates.
    pub fn project(&self) -> &Project {
        &self.project
    }

    /// The in-memory annotation table.
    pub fn table(&self) -> &AnnotationTable {
        &self.table
    }

    /// Current cursor position.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Whether every remaining row is labeled.
    pub fn is_complete(&self) -> bool {
        self.table.labeled_count() == self.table.len()
    }

    /// Move the cursor to `index` (e.g. the user picked a row in a list).
    pub fn select(&mut self, index: usize) -> Result<(), ProjectError> {
        if index >= self.table.len() {
            return Err(ProjectError::RowOutOfRange {
                index,
                len: self.table.len(),
            });
        }
        self.cursor = index;
        Ok(())
    }

    /// What the viewer should display for the current row, if any.
    pub fn current(&self) -> Option<DisplayRecord> {
        self.table.get(self.cursor).map(|record| DisplayRecord {
            image_path: PathBuf::from(&record.image_path),
            class: record.is_labeled().then(|| record.class.clone()),
        })
    }

    /// Drive `viewer` to show the current row: open the image and, when the
    /// row is labeled, overlay the label.
    pub fn show_current<V: ImageViewer>(&self, viewer: &mut V) -> Result<(), V::Error> {
        let Some(record) = self.current() else {
            log::warn!("No row at cursor {}; nothing to display", self.cursor);
            return Ok(());
        };
        viewer.open(&record.image_path)?;
        if let Some(overlay) = record.overlay() {
            viewer.add_shapes(&overlay)?;
        }
        Ok(())
    }

    /// Assign `class` to the current row, persist the table, and advance
    /// the cursor by one, wrapping to row 0 past the end.
    pub fn assign_class(&mut self, class: &str) -> Result<(), ProjectError> {
        if !self.project.has_class(class) {
            return Err(ProjectError::UnknownClass {
                class: class.to_string(),
            });
        }

        self.table.set_class(self.cursor, class)?;
        self.table.write(&self.table_path)?;

        self.cursor += 1;
        if self.cursor >= self.table.len() {
            self.cursor = 0;
        }
        Ok(())
    }

    /// Remove the current row from the table, persist, record the image in
    /// the project's ignore list, and clamp the cursor into the now-shorter
    /// table. Returns the removed image path.
    pub fn ignore(&mut self) -> Result<String, ProjectError> {
        let removed = self.table.remove(self.cursor)?;
        self.table.write(&self.table_path)?;

        self.project.record_ignored(&removed.image_path);
        self.project.save()?;

        if !self.table.is_empty() {
            self.cursor = self.cursor.min(self.table.len() - 1);
        } else {
            self.cursor = 0;
            log::info!("No more rows to annotate in '{}'", self.project.name);
        }
        Ok(removed.image_path)
    }
}

/// Resume point: one past the last labeled row, or 0 when there is none or
/// the next row would fall off the end.
fn resume_index(table: &AnnotationTable) -> usize {
    match table.last_labeled_index() {
        Some(last) if last + 1 < table.len() => last + 1,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;
    use std::path::Path;

    use tempfile::{TempDir, tempdir};

    use super::*;
    use crate::format::AnnotationRecord;
    use crate::model::{ImageType, ProjectType};

    /// Viewer that records what it was asked to show.
    #[derive(Default)]
    struct RecordingViewer {
        opened: Vec<PathBuf>,
        overlays: Vec<String>,
    }

    impl ImageViewer for RecordingViewer {
        type Error = Infallible;

        fn open(&mut self, path: &Path) -> Result<(), Self::Error> {
            self.opened.push(path.to_path_buf());
            Ok(())
        }

        fn add_shapes(&mut self, overlay: &crate::viewer::LabelOverlay) -> Result<(), Self::Error> {
            self.overlays.push(overlay.class.clone());
            Ok(())
        }
    }

    fn project_with_rows(rows: Vec<AnnotationRecord>) -> (TempDir, Project) {
        let dir = tempdir().unwrap();
        let mut project = Project::new(
            "session_test",
            ImageType::Multichannel,
            ProjectType::Classification,
            dir.path(),
            vec!["worm".to_string(), "egg".to_string()],
        )
        .unwrap();
        project.annotation_directories = vec![project.annotations_dir()];
        project.annotation_table = Some(project.annotation_table_path());

        let table = AnnotationTable::from_records(rows).unwrap();
        table.write(&project.annotation_table_path()).unwrap();
        project.save().unwrap();
        (dir, project)
    }

    fn unlabeled_rows(n: usize) -> Vec<AnnotationRecord> {
        (0..n)
            .map(|i| AnnotationRecord::unlabeled(format!("img_{i:03}.tif")))
            .collect()
    }

    #[test]
    fn test_assign_advances_and_persists() {
        let (_dir, project) = project_with_rows(unlabeled_rows(3));
        let table_path = project.annotation_table_path();
        let mut session = AnnotationSession::open(project).unwrap();

        assert_eq!(session.cursor(), 0);
        session.assign_class("worm").unwrap();
        assert_eq!(session.cursor(), 1);

        // The mutation must already be on disk.
        let on_disk = AnnotationTable::read(&table_path).unwrap();
        assert_eq!(on_disk.get(0).unwrap().class, "worm");
        assert_eq!(on_disk.get(1).unwrap().class, "");
    }

    #[test]
    fn test_assign_on_last_row_wraps_to_zero() {
        let (_dir, project) = project_with_rows(unlabeled_rows(3));
        let mut session = AnnotationSession::open(project).unwrap();

        session.select(2).unwrap();
        session.assign_class("egg").unwrap();
        assert_eq!(session.cursor(), 0);
    }

    #[test]
    fn test_assign_unknown_class_rejected() {
        let (_dir, project) = project_with_rows(unlabeled_rows(1));
        let mut session = AnnotationSession::open(project).unwrap();

        let result = session.assign_class("larva");
        assert!(matches!(
            result,
            Err(ProjectError::UnknownClass { ref class }) if class == "larva"
        ));
        assert_eq!(session.cursor(), 0);
    }

    #[test]
    fn test_ignore_removes_row_and_preserves_order() {
        let (dir, project) = project_with_rows(unlabeled_rows(4));
        let mut session = AnnotationSession::open(project).unwrap();

        session.select(1).unwrap();
        let removed = session.ignore().unwrap();
        assert_eq!(removed, "img_001.tif");
        assert_eq!(session.table().len(), 3);

        let paths: Vec<_> = session
            .table()
            .records()
            .iter()
            .map(|r| r.image_path.as_str())
            .collect();
        assert_eq!(paths, ["img_000.tif", "img_002.tif", "img_003.tif"]);

        // Descriptor on disk now carries the ignored image.
        let reloaded = Project::load(dir.path()).unwrap();
        assert_eq!(reloaded.ignored_images, vec![PathBuf::from("img_001.tif")]);
    }

    #[test]
    fn test_ignore_last_row_clamps_cursor() {
        let (_dir, project) = project_with_rows(unlabeled_rows(3));
        let mut session = AnnotationSession::open(project).unwrap();

        session.select(2).unwrap();
        session.ignore().unwrap();
        assert_eq!(session.cursor(), 1);
    }

    #[test]
    fn test_ignore_on_empty_table_fails() {
        let (_dir, project) = project_with_rows(Vec::new());
        let mut session = AnnotationSession::open(project).unwrap();

        assert!(session.current().is_none());
        assert!(matches!(
            session.ignore(),
            Err(ProjectError::RowOutOfRange { .. })
        ));
    }

    #[test]
    fn test_resume_after_last_labeled_row() {
        let rows = vec![
            AnnotationRecord::new("a.tif", "worm"),
            AnnotationRecord::new("b.tif", "egg"),
            AnnotationRecord::unlabeled("c.tif"),
            AnnotationRecord::unlabeled("d.tif"),
        ];
        let (_dir, project) = project_with_rows(rows);
        let session = AnnotationSession::open(project).unwrap();
        assert_eq!(session.cursor(), 2);
    }

    #[test]
    fn test_resume_wraps_when_everything_labeled() {
        let rows = vec![
            AnnotationRecord::new("a.tif", "worm"),
            AnnotationRecord::new("b.tif", "egg"),
        ];
        let (_dir, project) = project_with_rows(rows);
        let session = AnnotationSession::open(project).unwrap();
        assert_eq!(session.cursor(), 0);
        assert!(session.is_complete());
    }

    #[test]
    fn test_resume_at_zero_when_nothing_labeled() {
        let (_dir, project) = project_with_rows(unlabeled_rows(5));
        let session = AnnotationSession::open(project).unwrap();
        assert_eq!(session.cursor(), 0);
    }

    #[test]
    fn test_show_current_drives_viewer() {
        let rows = vec![
            AnnotationRecord::new("a.tif", "worm"),
            AnnotationRecord::unlabeled("b.tif"),
        ];
        let (_dir, project) = project_with_rows(rows);
        let mut session = AnnotationSession::open(project).unwrap();
        let mut viewer = RecordingViewer::default();

        // Cursor resumed at the unlabeled row; no overlay expected.
        session.show_current(&mut viewer).unwrap();
        assert_eq!(viewer.opened, vec![PathBuf::from("b.tif")]);
        assert!(viewer.overlays.is_empty());

        // Labeled row gets its class overlaid.
        session.select(0).unwrap();
        session.show_current(&mut viewer).unwrap();
        assert_eq!(viewer.overlays, vec!["worm".to_string()]);
    }

    #[test]
    fn test_open_rejects_non_classification() {
        let dir = tempdir().unwrap();
        let project = Project::new(
            "kp",
            ImageType::Multichannel,
            ProjectType::Keypoint,
            dir.path(),
            Vec::new(),
        )
        .unwrap();

        assert!(matches!(
            AnnotationSession::open(project),
            Err(ProjectError::InvalidProject { .. })
        ));
    }
}
