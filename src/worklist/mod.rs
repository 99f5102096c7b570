//! Worklist rows and their spreadsheet representation
//!
//! A worklist is a workbook whose first sheet has a header row naming an
//! identifier column and two URL columns. Each data row becomes a
//! [`WorkItem`]; after reconciliation the same rows are written back with
//! the resolved file name and download status appended.

mod xlsx;

pub use xlsx::{FILE_NAME_HEADER, STATUS_HEADER, read_worklist, write_annotated};

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::WorklistConfig;

#[derive(Debug, Error)]
pub enum WorklistError {
    #[error("Failed to open worklist {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    #[error("Worklist {} contains no sheets", .0.display())]
    NoSheets(PathBuf),

    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("Failed to write annotated worklist: {0}")]
    Write(#[from] rust_xlsxwriter::XlsxError),
}

pub type Result<T> = std::result::Result<T, WorklistError>;

/// One worklist row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    pub identifier: String,
    pub primary: Option<String>,
    pub fallback: Option<String>,
}

impl WorkItem {
    pub fn new(
        identifier: impl Into<String>,
        primary: Option<&str>,
        fallback: Option<&str>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            primary: primary.map(str::to_string),
            fallback: fallback.map(str::to_string),
        }
    }

    /// Usable source references in priority order
    pub fn sources(&self) -> Vec<&str> {
        [self.primary.as_deref(), self.fallback.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .collect()
    }

    /// `{identifier}.{extension}`
    pub fn file_name(&self, extension: &str) -> String {
        format!("{}.{}", self.identifier, extension)
    }

    pub fn destination(&self, output_dir: &Path, extension: &str) -> PathBuf {
        output_dir.join(self.file_name(extension))
    }
}

/// Header names the loader looks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Columns {
    pub id: String,
    pub primary: String,
    pub fallback: String,
    pub na_values: Vec<String>,
}

impl Columns {
    fn required(&self) -> [&str; 3] {
        [self.id.as_str(), self.primary.as_str(), self.fallback.as_str()]
    }

    fn is_na(&self, value: &str) -> bool {
        self.na_values.iter().any(|na| na == value)
    }
}

impl From<&WorklistConfig> for Columns {
    fn from(config: &WorklistConfig) -> Self {
        Self {
            id: config.id_column.clone(),
            primary: config.primary_url_column.clone(),
            fallback: config.fallback_url_column.clone(),
            na_values: config.na_values.clone(),
        }
    }
}

impl Default for Columns {
    fn default() -> Self {
        Columns::from(&WorklistConfig::default())
    }
}
