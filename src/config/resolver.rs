use super::models::PathsConfig;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PathError {
    #[error("Invalid source filename {0:?}: must be a bare file name")]
    UnsafeFilename(String),

    #[error("Worklist file not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("Failed to create output directory {}: {source}", .path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// True if `name` is a single path component that cannot escape its directory
pub fn is_safe_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0'])
}

/// Resolves the configured worklist and output locations
pub struct PathResolver<'a> {
    paths: &'a PathsConfig,
}

impl<'a> PathResolver<'a> {
    pub fn new(paths: &'a PathsConfig) -> Self {
        Self { paths }
    }

    /// Absolute path of the worklist file, which must already exist
    pub fn resolve_source_path(&self) -> Result<PathBuf, PathError> {
        let filename = &self.paths.source_filename;
        if !is_safe_file_name(filename) {
            return Err(PathError::UnsafeFilename(filename.clone()));
        }

        let source_dir = absolute_or_raw(&self.paths.source_dir);
        let path = source_dir.join(filename);

        if !path.is_file() {
            return Err(PathError::SourceNotFound(path));
        }

        Ok(path)
    }

    /// Output directory, created with its ancestors when missing
    pub fn resolve_output_directory(&self) -> Result<PathBuf, PathError> {
        let path = &self.paths.output_dir;

        std::fs::create_dir_all(path).map_err(|source| PathError::OutputDir {
            path: path.clone(),
            source,
        })?;

        tracing::debug!(path = %path.display(), "Output directory ready");
        Ok(absolute_or_raw(path))
    }
}

fn absolute_or_raw(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
