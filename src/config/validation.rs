use super::models::Config;
use super::resolver::is_safe_file_name;
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field} must be a bare file name, got {value:?}")]
    UnsafeFilename { field: &'static str, value: String },

    #[error("Worklist column name '{field}' must not be empty")]
    EmptyColumnName { field: &'static str },

    #[error("Worklist column '{name}' is configured more than once")]
    DuplicateColumn { name: String },

    #[error("Invalid document extension {0:?}: expected e.g. \"pdf\" without a dot")]
    InvalidExtension(String),

    #[error("HTTP timeout must be positive: {field} = 0")]
    InvalidTimeout { field: &'static str },

    #[error("Store table name must not be empty")]
    EmptyTableName,
}

/// Validate the entire configuration
pub fn validate(config: &Config) -> Result<(), ValidationError> {
    validate_paths(config)?;
    validate_worklist(config)?;
    validate_http(config)?;
    validate_output(config)?;
    validate_store(config)?;
    Ok(())
}

fn validate_paths(config: &Config) -> Result<(), ValidationError> {
    if !is_safe_file_name(&config.paths.source_filename) {
        return Err(ValidationError::UnsafeFilename {
            field: "paths.source_filename",
            value: config.paths.source_filename.clone(),
        });
    }
    Ok(())
}

/// Column names must be present and distinct, otherwise two roles read the same cell
fn validate_worklist(config: &Config) -> Result<(), ValidationError> {
    let columns = [
        ("worklist.id_column", &config.worklist.id_column),
        ("worklist.primary_url_column", &config.worklist.primary_url_column),
        ("worklist.fallback_url_column", &config.worklist.fallback_url_column),
    ];

    let mut seen = HashSet::new();
    for (field, name) in columns {
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyColumnName { field });
        }
        if !seen.insert(name.as_str()) {
            return Err(ValidationError::DuplicateColumn { name: name.clone() });
        }
    }

    Ok(())
}

fn validate_http(config: &Config) -> Result<(), ValidationError> {
    if config.http.connect_timeout_secs == 0 {
        return Err(ValidationError::InvalidTimeout {
            field: "http.connect_timeout_secs",
        });
    }
    if config.http.read_timeout_secs == 0 {
        return Err(ValidationError::InvalidTimeout {
            field: "http.read_timeout_secs",
        });
    }
    Ok(())
}

fn validate_output(config: &Config) -> Result<(), ValidationError> {
    let extension = &config.output.extension;
    if !is_safe_file_name(extension) || extension.contains('.') {
        return Err(ValidationError::InvalidExtension(extension.clone()));
    }

    if !is_safe_file_name(&config.output.metadata_filename) {
        return Err(ValidationError::UnsafeFilename {
            field: "output.metadata_filename",
            value: config.output.metadata_filename.clone(),
        });
    }

    Ok(())
}

fn validate_store(config: &Config) -> Result<(), ValidationError> {
    if config.store.table.trim().is_empty() {
        return Err(ValidationError::EmptyTableName);
    }
    Ok(())
}
