//! Configuration management for reportfetch
//!
//! This module provides a layered configuration system that loads settings from:
//! 1. Default values (embedded in structs)
//! 2. TOML configuration file
//! 3. Environment variables (highest priority)
//!
//! # Usage
//!
//! ```no_run
//! use reportfetch::config::Config;
//!
//! let config = Config::load().expect("Failed to load configuration");
//! println!("Documents go to: {}", config.paths.output_dir.display());
//! ```
//!
//! # Environment Variables
//!
//! Configuration can be overridden using environment variables with the pattern:
//! `REPORTFETCH__<section>__<key>`
//!
//! Examples:
//! - `REPORTFETCH__PATHS__OUTPUT_DIR=/srv/reports`
//! - `REPORTFETCH__HTTP__READ_TIMEOUT_SECS=60`
//! - `REPORTFETCH__STORE__PROVIDER=memory`
//!
//! The flat variables `XLSX_SOURCE_DIR`, `XLSX_FILENAME` and `PDF_OUTPUT_DIR`
//! are applied last and win over every other source.
//!
//! # Configuration File
//!
//! By default, the configuration is loaded from `config/reportfetch.toml`.
//! This can be overridden using the `REPORTFETCH_CONFIG` environment variable.

mod models;
mod resolver;
mod sources;
mod validation;

pub use models::{
    Config, HttpSettings, OutputConfig, PathsConfig, StoreConfig, StoreProvider, WorklistConfig,
};
pub use resolver::{PathError, PathResolver, is_safe_file_name};
pub use validation::ValidationError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] ValidationError),
}

impl Config {
    /// Load configuration from all sources (file + environment)
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. `XLSX_SOURCE_DIR`, `XLSX_FILENAME`, `PDF_OUTPUT_DIR`
    /// 2. Environment variables (`REPORTFETCH__*`)
    /// 3. TOML file (default: `config/reportfetch.toml`)
    /// 4. Default values
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Configuration file is malformed
    /// - Validation fails (unsafe filenames, empty columns, zero timeouts)
    pub fn load() -> Result<Self, ConfigError> {
        let config = sources::load()?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: std::path::PathBuf) -> Result<Self, ConfigError> {
        let config = sources::load_from_sources(path)?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Get a path resolver for this configuration
    pub fn path_resolver(&self) -> PathResolver<'_> {
        PathResolver::new(&self.paths)
    }
}
