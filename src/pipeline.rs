//! Pipeline stages: download, reconcile, load
//!
//! Each stage takes an [`ExecutionContext`] and returns a typed report.
//! Per-row problems are logged and counted inside the stages; only
//! startup and filesystem failures surface as [`PipelineError`].

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{info, warn};

use crate::context::ExecutionContext;
use crate::observability::MetricsSnapshot;
use crate::status::{StatusCounts, build_status_mapping};
use crate::storage::{LoadSummary, RecordSink, StorageClient, StorageError, load_documents};
use crate::validator::PdfValidator;
use crate::worker::{
    DestinationError, DownloadError, DownloadSummary, FetchStrategy, HttpClient, HttpConfig,
    Transport, run_downloads,
};
use crate::worklist::{self, WorkItem, WorklistError};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Worklist(#[from] WorklistError),

    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] DownloadError),

    #[error(transparent)]
    Destination(#[from] DestinationError),

    #[error("Failed to scan {}: {source}", .path.display())]
    Scan {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub type Result<T> = std::result::Result<T, PipelineError>;

/// Outcome of reconciling the output directory with the worklist
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    pub run_id: String,
    pub rows: usize,
    pub documents: usize,
    pub counts: StatusCounts,
    pub annotated_worklist: PathBuf,
}

/// Download then reconcile
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub download: DownloadSummary,
    pub reconcile: ReconcileReport,
    pub metrics: MetricsSnapshot,
}

fn load_items(ctx: &ExecutionContext) -> Result<Vec<WorkItem>> {
    Ok(worklist::read_worklist(&ctx.paths.worklist, &ctx.columns())?)
}

/// Fetch every row of the worklist over HTTP
pub async fn download_worklist(ctx: &ExecutionContext) -> Result<DownloadSummary> {
    let client = HttpClient::new(HttpConfig::from(&ctx.config.http))?;
    download_with(ctx, client).await
}

/// Fetch every row of the worklist through `transport`
pub async fn download_with<T: Transport>(
    ctx: &ExecutionContext,
    transport: T,
) -> Result<DownloadSummary> {
    let items = load_items(ctx)?;
    let strategy = FetchStrategy::new(transport);
    Ok(run_downloads(ctx, &strategy, &items).await?)
}

/// Classify the output directory and write the annotated worklist
pub fn reconcile_worklist(ctx: &ExecutionContext) -> Result<ReconcileReport> {
    let items = load_items(ctx)?;
    let output_dir = &ctx.paths.output_dir;

    let mapping = build_status_mapping(output_dir, ctx.extension(), &PdfValidator::new())
        .map_err(|source| PipelineError::Scan {
            path: output_dir.clone(),
            source,
        })?;

    let annotated = ctx.annotated_worklist_path();
    worklist::write_annotated(&annotated, &items, &mapping, &ctx.columns())?;

    let counts = StatusCounts::tally(&mapping, items.iter().map(|i| i.identifier.as_str()));
    info!(
        run_id = %ctx.run_id,
        downloaded = counts.downloaded,
        corrupted = counts.corrupted,
        not_found = counts.not_found,
        "Status summary: {}",
        counts
    );

    Ok(ReconcileReport {
        run_id: ctx.run_id.to_string(),
        rows: items.len(),
        documents: mapping.len(),
        counts,
        annotated_worklist: annotated,
    })
}

/// Full pass: download, then reconcile whatever is on disk
pub async fn run(ctx: &ExecutionContext) -> Result<RunReport> {
    let download = download_worklist(ctx).await?;
    let reconcile = reconcile_worklist(ctx)?;
    Ok(RunReport {
        download,
        reconcile,
        metrics: ctx.metrics.snapshot(),
    })
}

/// Bulk-load valid documents into the configured record store
pub async fn load_store(ctx: &ExecutionContext) -> Result<LoadSummary> {
    if !ctx.config.store.provider.is_persistent() {
        warn!("Store provider is in-memory; loaded records are discarded on exit");
    }
    let client = StorageClient::from_config(&ctx.config.store)?;
    load_into(ctx, &client).await
}

pub async fn load_into(ctx: &ExecutionContext, sink: &impl RecordSink) -> Result<LoadSummary> {
    let output_dir = &ctx.paths.output_dir;
    load_documents(output_dir, ctx.extension(), &PdfValidator::new(), sink)
        .await
        .map_err(|source| PipelineError::Scan {
            path: output_dir.clone(),
            source,
        })
}
