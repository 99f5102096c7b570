//! Row runner - drives the fetch strategy over worklist rows

use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{error, info, warn};

use super::fetch::{FetchOutcome, FetchStrategy};
use super::http::Transport;
use crate::context::ExecutionContext;
use crate::worklist::WorkItem;

/// Per-row result; failures are values, never propagated
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    Downloaded,
    AlreadyPresent,
    NoSource,
    Failed(FetchOutcome),
}

/// The output directory stopped accepting writes; the run cannot continue
#[derive(Debug, Error)]
#[error("Cannot write {} for {identifier}: {detail}", .path.display())]
pub struct DestinationError {
    pub identifier: String,
    pub path: PathBuf,
    pub detail: String,
}

/// Totals for one pass over the worklist
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DownloadSummary {
    pub downloaded: usize,
    pub already_present: usize,
    pub no_source: usize,
    pub failed: usize,
    /// Rows not attempted because shutdown was requested
    pub skipped: usize,
}

impl DownloadSummary {
    fn record(&mut self, outcome: &RowOutcome) {
        match outcome {
            RowOutcome::Downloaded => self.downloaded += 1,
            RowOutcome::AlreadyPresent => self.already_present += 1,
            RowOutcome::NoSource => self.no_source += 1,
            RowOutcome::Failed(_) => self.failed += 1,
        }
    }

    pub fn attempted(&self) -> usize {
        self.downloaded + self.already_present + self.no_source + self.failed
    }
}

/// Process a single worklist row.
///
/// Existing destinations are left untouched, so re-running is idempotent.
pub async fn process_item<T: Transport>(
    strategy: &FetchStrategy<T>,
    item: &WorkItem,
    output_dir: &Path,
    extension: &str,
) -> RowOutcome {
    let identifier = item.identifier.as_str();
    let sources = item.sources();

    if sources.is_empty() {
        warn!(identifier, "No valid URLs available for download");
        return RowOutcome::NoSource;
    }

    let destination = item.destination(output_dir, extension);
    if destination.exists() {
        info!(identifier, path = %destination.display(), "Already present, skipping");
        return RowOutcome::AlreadyPresent;
    }

    match strategy.fetch_from(&sources, &destination).await {
        FetchOutcome::Success { source, bytes } => {
            info!(identifier, url = %source, bytes, "Downloaded");
            RowOutcome::Downloaded
        }
        FetchOutcome::NoSourceProvided => RowOutcome::NoSource,
        failure => {
            error!(
                identifier,
                urls = ?sources,
                cause = %failure,
                "Failed to download"
            );
            RowOutcome::Failed(failure)
        }
    }
}

/// Run every row in worklist order, stopping early on shutdown.
///
/// Source failures are counted and skipped; a destination write failure
/// aborts the run.
pub async fn run_downloads<T: Transport>(
    ctx: &ExecutionContext,
    strategy: &FetchStrategy<T>,
    items: &[WorkItem],
) -> Result<DownloadSummary, DestinationError> {
    let mut summary = DownloadSummary::default();
    let output_dir = ctx.paths.output_dir.as_path();

    info!(run_id = %ctx.run_id, rows = items.len(), "Starting downloads");

    for (index, item) in items.iter().enumerate() {
        if ctx.is_shutdown_requested() {
            summary.skipped = items.len() - index;
            warn!(remaining = summary.skipped, "Shutdown requested, stopping downloads");
            break;
        }

        let outcome = process_item(strategy, item, output_dir, ctx.extension()).await;
        match &outcome {
            RowOutcome::Downloaded => ctx.metrics.row_downloaded(),
            RowOutcome::AlreadyPresent => ctx.metrics.row_already_present(),
            RowOutcome::NoSource => ctx.metrics.row_without_source(),
            RowOutcome::Failed(_) => ctx.metrics.row_failed(),
        }
        summary.record(&outcome);

        if let RowOutcome::Failed(FetchOutcome::DestinationUnwritable { path, detail }) = outcome {
            return Err(DestinationError {
                identifier: item.identifier.clone(),
                path,
                detail,
            });
        }
    }

    info!(
        run_id = %ctx.run_id,
        downloaded = summary.downloaded,
        already_present = summary.already_present,
        no_source = summary.no_source,
        failed = summary.failed,
        skipped = summary.skipped,
        "Downloads finished"
    );

    let metrics = ctx.metrics.snapshot();
    info!(
        run_id = %ctx.run_id,
        downloaded = metrics.downloaded,
        already_present = metrics.already_present,
        no_source = metrics.no_source,
        failed = metrics.failed,
        "Run metrics"
    );

    Ok(summary)
}
