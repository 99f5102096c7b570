use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub worklist: WorklistConfig,
    #[serde(default)]
    pub http: HttpSettings,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

/// Locations of the worklist and the document output directory
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PathsConfig {
    #[serde(default = "default_source_dir")]
    pub source_dir: PathBuf,
    /// Bare file name inside `source_dir`; separators and `..` are rejected
    #[serde(default = "default_source_filename")]
    pub source_filename: String,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            source_dir: default_source_dir(),
            source_filename: default_source_filename(),
            output_dir: default_output_dir(),
        }
    }
}

fn default_source_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_source_filename() -> String {
    "GRI_2017_2020.xlsx".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("pdf_output")
}

/// Worklist column layout
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WorklistConfig {
    #[serde(default = "default_id_column")]
    pub id_column: String,
    #[serde(default = "default_primary_url_column")]
    pub primary_url_column: String,
    #[serde(default = "default_fallback_url_column")]
    pub fallback_url_column: String,
    /// Cell values treated as blank (compared after trimming)
    #[serde(default = "default_na_values")]
    pub na_values: Vec<String>,
}

impl Default for WorklistConfig {
    fn default() -> Self {
        Self {
            id_column: default_id_column(),
            primary_url_column: default_primary_url_column(),
            fallback_url_column: default_fallback_url_column(),
            na_values: default_na_values(),
        }
    }
}

fn default_id_column() -> String {
    "BRnum".to_string()
}

fn default_primary_url_column() -> String {
    "Pdf_URL".to_string()
}

fn default_fallback_url_column() -> String {
    "Report Html Address".to_string()
}

fn default_na_values() -> Vec<String> {
    vec!["missing".to_string()]
}

/// HTTP transport settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HttpSettings {
    #[serde(default = "default_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_timeout_secs")]
    pub read_timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl HttpSettings {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            connect_timeout_secs: default_timeout_secs(),
            read_timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    concat!("reportfetch/", env!("CARGO_PKG_VERSION")).to_string()
}

/// Output artifacts
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    /// Document extension without the leading dot
    #[serde(default = "default_extension")]
    pub extension: String,
    /// Annotated worklist written into the output directory
    #[serde(default = "default_metadata_filename")]
    pub metadata_filename: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            extension: default_extension(),
            metadata_filename: default_metadata_filename(),
        }
    }
}

fn default_extension() -> String {
    "pdf".to_string()
}

fn default_metadata_filename() -> String {
    "metadata_with_filenames.xlsx".to_string()
}

/// Record store backend type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreProvider {
    #[default]
    Local,
    Memory,
}

impl StoreProvider {
    /// Whether records outlive the process
    pub fn is_persistent(&self) -> bool {
        matches!(self, StoreProvider::Local)
    }
}

/// Record store used by the bulk loader
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub provider: StoreProvider,
    #[serde(default = "default_store_root")]
    pub root: PathBuf,
    #[serde(default = "default_table")]
    pub table: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            provider: StoreProvider::Local,
            root: default_store_root(),
            table: default_table(),
        }
    }
}

fn default_store_root() -> PathBuf {
    PathBuf::from("data/store")
}

fn default_table() -> String {
    "pdf_storage".to_string()
}
