use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::mapping::StatusMapping;
use crate::validator::DocumentValidator;

/// Regular files in `dir` with the given extension, sorted by file name
pub fn list_documents(dir: &Path, extension: &str) -> io::Result<Vec<PathBuf>> {
    let mut documents = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if !entry.file_type()?.is_file() {
            continue;
        }
        if path.extension().and_then(|ext| ext.to_str()) == Some(extension) {
            documents.push(path);
        }
    }

    documents.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(documents)
}

/// Classify every document in `dir` as Downloaded or Corrupted.
///
/// Files are visited in lexicographic order, so the result is
/// deterministic for a given directory snapshot.
pub fn build_status_mapping(
    dir: &Path,
    extension: &str,
    validator: &impl DocumentValidator,
) -> io::Result<StatusMapping> {
    let documents = list_documents(dir, extension)?;
    info!(dir = %dir.display(), count = documents.len(), "Scanning documents");

    let mut mapping = StatusMapping::new(extension);

    for path in documents {
        let (Some(identifier), Some(file_name)) = (
            path.file_stem().and_then(|s| s.to_str()),
            path.file_name().and_then(|s| s.to_str()),
        ) else {
            warn!(path = %path.display(), "Skipping document with a non UTF-8 name");
            continue;
        };

        let valid = validator.is_valid_document(&path);
        if valid {
            mapping.record_valid(identifier, file_name);
        } else {
            mapping.record_corrupted(identifier);
        }
        info!(file = file_name, valid, "Classified document");
    }

    Ok(mapping)
}
