use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use uuid::Uuid;

use crate::config::{Config, PathError};
use crate::observability::Metrics;
use crate::worklist::Columns;

/// Locations resolved once at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPaths {
    pub worklist: PathBuf,
    pub output_dir: PathBuf,
}

/// Everything a pipeline stage needs, passed explicitly
#[derive(Clone)]
pub struct ExecutionContext {
    pub config: Arc<Config>,
    pub paths: RunPaths,
    pub metrics: Arc<Metrics>,
    pub run_id: Uuid,
    shutdown: Arc<AtomicBool>,
}

impl ExecutionContext {
    pub fn new(config: Config, paths: RunPaths) -> Self {
        Self {
            config: Arc::new(config),
            paths,
            metrics: Arc::new(Metrics::new()),
            run_id: Uuid::now_v7(),
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Resolve the worklist path and create the output directory
    pub fn from_config(config: Config) -> Result<Self, PathError> {
        let resolver = config.path_resolver();
        let paths = RunPaths {
            worklist: resolver.resolve_source_path()?,
            output_dir: resolver.resolve_output_directory()?,
        };
        Ok(Self::new(config, paths))
    }

    /// Like [`from_config`](Self::from_config) but without requiring the
    /// worklist to exist; used by stages that only read the output directory
    pub fn for_output_dir(config: Config) -> Result<Self, PathError> {
        let output_dir = config.path_resolver().resolve_output_directory()?;
        let paths = RunPaths {
            worklist: config.paths.source_dir.join(&config.paths.source_filename),
            output_dir,
        };
        Ok(Self::new(config, paths))
    }

    pub fn columns(&self) -> Columns {
        Columns::from(&self.config.worklist)
    }

    pub fn extension(&self) -> &str {
        &self.config.output.extension
    }

    /// Path of the annotated worklist inside the output directory
    pub fn annotated_worklist_path(&self) -> PathBuf {
        self.paths
            .output_dir
            .join(&self.config.output.metadata_filename)
    }

    /// Handle a signal listener can hold to stop the run
    pub fn shutdown_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    pub fn request_shutdown(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }

    pub fn is_shutdown_requested(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }
}
