//! Classification annotation table.
//!
//! One row per image, columns `ImagePath` and `Class`, persisted as
//! delimited text at `<project_dir>/annotations/annotations.csv`. Row order
//! is the navigation order of the annotation session, so the table never
//! re-sorts. The file is rewritten whole on every mutation; writes are not
//! atomic and a crash mid-write can corrupt the table.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::format::ProjectError;

/// File name of the classification table inside the annotations directory.
pub const TABLE_FILE: &str = "annotations.csv";

const HEADER: [&str; 2] = ["ImagePath", "Class"];

/// One row of the annotation table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationRecord {
    /// Path of the image this row labels; unique within a table.
    pub image_path: String,
    /// Assigned class; empty string means unlabeled.
    pub class: String,
}

impl AnnotationRecord {
    /// Create a labeled record.
    pub fn new(image_path: impl Into<String>, class: impl Into<String>) -> Self {
        Self {
            image_path: image_path.into(),
            class: class.into(),
        }
    }

    /// Create an unlabeled record.
    pub fn unlabeled(image_path: impl Into<String>) -> Self {
        Self::new(image_path, "")
    }

    /// Whether this row carries a non-empty label.
    pub fn is_labeled(&self) -> bool {
        !self.class.trim().is_empty()
    }
}

/// In-memory annotation table with whole-file persistence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotationTable {
    records: Vec<AnnotationRecord>,
}

impl AnnotationTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from records, rejecting duplicate image paths.
    pub fn from_records(records: Vec<AnnotationRecord>) -> Result<Self, ProjectError> {
        let mut seen = HashSet::new();
        for record in &records {
            if !seen.insert(record.image_path.as_str()) {
                return Err(ProjectError::DuplicateImage {
                    path: record.image_path.clone(),
                });
            }
        }
        Ok(Self { records })
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All rows, in navigation order.
    pub fn records(&self) -> &[AnnotationRecord] {
        &self.records
    }

    /// Row at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&AnnotationRecord> {
        self.records.get(index)
    }

    /// Number of rows with a non-empty label.
    pub fn labeled_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_labeled()).count()
    }

    /// Index of the last row with a non-empty label, if any.
    pub fn last_labeled_index(&self) -> Option<usize> {
        self.records.iter().rposition(|r| r.is_labeled())
    }

    /// Set the class of the row at `index`.
    pub fn set_class(&mut self, index: usize, class: impl Into<String>) -> Result<(), ProjectError> {
        let len = self.len();
        let record = self
            .records
            .get_mut(index)
            .ok_or(ProjectError::RowOutOfRange { index, len })?;
        record.class = class.into();
        Ok(())
    }

    /// Remove and return the row at `index`; later rows shift up.
    pub fn remove(&mut self, index: usize) -> Result<AnnotationRecord, ProjectError> {
        if index >= self.len() {
            return Err(ProjectError::RowOutOfRange {
                index,
                len: self.len(),
            });
        }
        Ok(self.records.remove(index))
    }

    /// Read a table from disk.
    pub fn read(path: &Path) -> Result<Self, ProjectError> {
        let text = fs::read_to_string(path)?;
        let rows = parse_delimited(&text)?;

        let mut rows = rows.into_iter();
        let header = rows
            .next()
            .ok_or_else(|| ProjectError::invalid_table("missing header row"))?;
        if header != HEADER {
            return Err(ProjectError::invalid_table(format!(
                "unexpected header {:?}, expected {:?}",
                header, HEADER
            )));
        }

        let mut records = Vec::new();
        for (line, row) in rows.enumerate() {
            if row.len() != 2 {
                return Err(ProjectError::invalid_table(format!(
                    "row {} has {} fields, expected 2",
                    line + 2,
                    row.len()
                )));
            }
            let mut row = row.into_iter();
            records.push(AnnotationRecord {
                image_path: row.next().unwrap_or_default(),
                class: row.next().unwrap_or_default(),
            });
        }

        log::debug!("Read {} annotation rows from {:?}", records.len(), path);
        Self::from_records(records)
    }

    /// Rewrite the whole table to disk.
    pub fn write(&self, path: &Path) -> Result<(), ProjectError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut out = String::new();
        out.push_str(&HEADER.join(","));
        out.push('\n');
        for record in &self.records {
            out.push_str(&escape_field(&record.image_path));
            out.push(',');
            out.push_str(&escape_field(&record.class));
            out.push('\n');
        }
        fs::write(path, out)?;

        log::debug!("Wrote {} annotation rows to {:?}", self.records.len(), path);
        Ok(())
    }
}

/// Quote a field when it contains the delimiter, quotes, or newlines.
fn escape_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Parse comma-delimited text with double-quote quoting into rows of fields.
fn parse_delimited(text: &str) -> Result<Vec<Vec<String>>, ProjectError> {
    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;

    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(c);
            }
            continue;
        }
        match c {
            '"' => in_quotes = true,
            ',' => row.push(std::mem::take(&mut field)),
            '\r' => {}
            '\n' => {
                // Blank lines separate nothing; skip them.
                if !(row.is_empty() && field.is_empty()) {
                    row.push(std::mem::take(&mut field));
                    rows.push(std::mem::take(&mut row));
                }
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(ProjectError::invalid_table("unterminated quoted field"));
    }
    if !(row.is_empty() && field.is_empty()) {
        row.push(field);
        rows.push(row);
    }
    Ok(rows)
}
