use super::models::Config;
use config::{ConfigError, Environment, File};
use std::env;
use std::path::PathBuf;

const CONFIG_ENV_VAR: &str = "REPORTFETCH_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config/reportfetch.toml";
const ENV_PREFIX: &str = "REPORTFETCH";
const ENV_SEPARATOR: &str = "__";

/// Load configuration from multiple sources with priority:
/// 1. Defaults (embedded in structs)
/// 2. TOML file (if exists)
/// 3. Environment variables from .env file (via dotenvy)
/// 4. System environment variables, including the flat path variables
pub fn load() -> Result<Config, ConfigError> {
    // Load .env file if it exists (ignore errors if file doesn't exist)
    let _ = dotenvy::dotenv();

    let config_path = env::var(CONFIG_ENV_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));

    load_from_sources(config_path)
}

/// Apply `XLSX_SOURCE_DIR`, `XLSX_FILENAME` and `PDF_OUTPUT_DIR` on top of everything else
fn apply_path_overrides(config: &mut Config, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(source_dir) = lookup("XLSX_SOURCE_DIR") {
        config.paths.source_dir = PathBuf::from(source_dir);
    }
    if let Some(filename) = lookup("XLSX_FILENAME") {
        config.paths.source_filename = filename;
    }
    if let Some(output_dir) = lookup("PDF_OUTPUT_DIR") {
        config.paths.output_dir = PathBuf::from(output_dir);
    }
}

/// Load configuration from a specific path and environment
pub fn load_from_sources(config_path: PathBuf) -> Result<Config, ConfigError> {
    let mut builder = config::Config::builder();

    if config_path.exists() {
        tracing::info!("Loading configuration from: {}", config_path.display());
        builder = builder.add_source(File::from(config_path).required(false));
    } else {
        tracing::debug!(
            "Configuration file not found at {}, using defaults and environment overrides",
            config_path.display()
        );
    }

    // REPORTFETCH__PATHS__OUTPUT_DIR -> paths.output_dir
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .separator(ENV_SEPARATOR)
            .try_parsing(true),
    );

    let mut config: Config = builder.build()?.try_deserialize()?;
    apply_path_overrides(&mut config, |key| env::var(key).ok());
    Ok(config)
}
