//! Bulk loader - pushes validated documents into the record store

use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};
use std::io;
use std::path::Path;
use tracing::{error, info, warn};

use super::{Result, StorageClient};
use crate::status::list_documents;
use crate::validator::DocumentValidator;

/// One `(filename, pdf_binary)` row; the binary is base64 text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub filename: String,
    pub pdf_binary: String,
}

impl DocumentRecord {
    pub fn new(filename: impl Into<String>, content: &[u8]) -> Self {
        Self {
            filename: filename.into(),
            pdf_binary: STANDARD.encode(content),
        }
    }

    pub fn decode(&self) -> std::result::Result<Vec<u8>, base64::DecodeError> {
        STANDARD.decode(&self.pdf_binary)
    }
}

/// Destination for document records
#[async_trait]
pub trait RecordSink: Send + Sync {
    async fn insert(&self, record: &DocumentRecord) -> Result<()>;
}

#[async_trait]
impl RecordSink for StorageClient {
    async fn insert(&self, record: &DocumentRecord) -> Result<()> {
        let body = serde_json::to_vec(record)?;
        self.upload(&self.record_key(&record.filename), body).await?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadSummary {
    pub inserted: usize,
    pub skipped_invalid: usize,
    pub failed: usize,
}

/// Insert every valid document in `dir` into `sink`, in file name order.
///
/// Per-file read or insert failures are logged and counted; only a failure
/// to list the directory is returned as an error.
pub async fn load_documents(
    dir: &Path,
    extension: &str,
    validator: &impl DocumentValidator,
    sink: &impl RecordSink,
) -> io::Result<LoadSummary> {
    let documents = list_documents(dir, extension)?;
    let mut summary = LoadSummary::default();

    if documents.is_empty() {
        info!(dir = %dir.display(), "No documents to load");
        return Ok(summary);
    }

    for path in documents {
        let Some(filename) = path.file_name().and_then(|s| s.to_str()) else {
            warn!(path = %path.display(), "Skipping document with a non UTF-8 name");
            summary.failed += 1;
            continue;
        };

        if !validator.is_valid_document(&path) {
            warn!(filename, "Skipping invalid document");
            summary.skipped_invalid += 1;
            continue;
        }

        let content = match tokio::fs::read(&path).await {
            Ok(content) => content,
            Err(e) => {
                error!(filename, error = %e, "Failed to read document");
                summary.failed += 1;
                continue;
            }
        };

        match sink.insert(&DocumentRecord::new(filename, &content)).await {
            Ok(()) => {
                info!(filename, bytes = content.len(), "Inserted document");
                summary.inserted += 1;
            }
            Err(e) => {
                error!(filename, error = %e, "Failed to insert document");
                summary.failed += 1;
            }
        }
    }

    info!(
        inserted = summary.inserted,
        skipped_invalid = summary.skipped_invalid,
        failed = summary.failed,
        "Load finished"
    );
    Ok(summary)
}
